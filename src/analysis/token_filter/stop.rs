//! Stop word filter.

use std::collections::HashSet;
use std::sync::{Arc, LazyLock};

use crate::analysis::token_filter::Filter;

const ENGLISH_STOP_WORDS: &[&str] = &[
    "a", "an", "and", "are", "as", "at", "be", "but", "by", "for", "if", "in", "into", "is", "it",
    "no", "not", "of", "on", "or", "such", "that", "the", "their", "then", "there", "these",
    "they", "this", "to", "was", "will", "with",
];

static ENGLISH: LazyLock<Arc<HashSet<String>>> = LazyLock::new(|| {
    Arc::new(ENGLISH_STOP_WORDS.iter().map(|w| w.to_string()).collect())
});

/// Drops terms found in a stop list.
///
/// Matching is exact, so the filter belongs after a
/// [`LowercaseFilter`](super::LowercaseFilter).
///
/// ```
/// use mosaic::analysis::{Filter, StopFilter};
///
/// let mut terms = vec!["the".to_string(), "orbit".to_string(), "of".to_string()];
/// StopFilter::new().apply(&mut terms);
/// assert_eq!(terms, ["orbit"]);
/// ```
#[derive(Clone, Debug)]
pub struct StopFilter {
    words: Arc<HashSet<String>>,
}

impl StopFilter {
    /// The built-in English list.
    pub fn new() -> Self {
        StopFilter {
            words: Arc::clone(&ENGLISH),
        }
    }

    pub fn from_words<I, S>(words: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        StopFilter {
            words: Arc::new(words.into_iter().map(Into::into).collect()),
        }
    }

    pub fn contains(&self, word: &str) -> bool {
        self.words.contains(word)
    }

    pub fn len(&self) -> usize {
        self.words.len()
    }

    pub fn is_empty(&self) -> bool {
        self.words.is_empty()
    }
}

impl Default for StopFilter {
    fn default() -> Self {
        Self::new()
    }
}

impl Filter for StopFilter {
    fn apply(&self, terms: &mut Vec<String>) {
        terms.retain(|term| !self.words.contains(term));
    }

    fn name(&self) -> &'static str {
        "stop"
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_custom_list() {
        let filter = StopFilter::from_words(["re", "fwd"]);
        let mut terms: Vec<String> = ["re", "fwd", "re", "launch"].map(String::from).to_vec();
        filter.apply(&mut terms);
        assert_eq!(terms, ["launch"]);
        assert_eq!(filter.len(), 2);
    }

    #[test]
    fn test_english_list() {
        let filter = StopFilter::new();
        assert_eq!(filter.len(), 33);
        assert!(filter.contains("the"));
        assert!(!filter.contains("atheism"));
        // Case sensitive.
        assert!(!filter.contains("The"));
    }
}
