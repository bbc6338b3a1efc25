//! Analyzers that combine a tokenizer with term filters.
//!
//! ```text
//! text → Tokenizer → terms → Filter 1 … Filter N → terms
//! ```

mod pipeline;

pub use pipeline::PipelineAnalyzer;

use crate::error::Result;

/// Converts a text into the terms a vectorizer counts, in text order.
///
/// `Send + Sync` because one analyzer is shared by the tokenization workers
/// of a vectorizer.
pub trait Analyzer: Send + Sync {
    /// The terms of `text`. Repeated terms are kept.
    fn analyze(&self, text: &str) -> Result<Vec<String>>;

    /// Get the name of this analyzer (for debugging and configuration).
    fn name(&self) -> &str;
}
