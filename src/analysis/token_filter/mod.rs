//! Filters applied to the terms a tokenizer produced.

pub mod lowercase;
pub mod stop;

pub use lowercase::LowercaseFilter;
pub use stop::StopFilter;

/// Rewrites or removes terms in place.
pub trait Filter: Send + Sync {
    /// Apply this filter to `terms`.
    fn apply(&self, terms: &mut Vec<String>);

    /// Get the name of this filter (for debugging and configuration).
    fn name(&self) -> &'static str;
}
