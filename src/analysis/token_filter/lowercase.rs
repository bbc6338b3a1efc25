//! Lowercase filter.

use crate::analysis::token_filter::Filter;

/// Lowercases every term.
#[derive(Clone, Copy, Debug, Default)]
pub struct LowercaseFilter;

impl LowercaseFilter {
    pub fn new() -> Self {
        LowercaseFilter
    }
}

impl Filter for LowercaseFilter {
    fn apply(&self, terms: &mut Vec<String>) {
        for term in terms.iter_mut() {
            if term.is_ascii() {
                term.make_ascii_lowercase();
            } else {
                *term = term.to_lowercase();
            }
        }
    }

    fn name(&self) -> &'static str {
        "lowercase"
    }
}
