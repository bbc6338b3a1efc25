//! Regex tokenizer.

use regex::Regex;

use super::Tokenizer;
use crate::error::{MosaicError, Result};

/// Runs of two or more word characters.
///
/// Single-character words such as "a" or "I" never reach the vocabulary.
pub const DEFAULT_TOKEN_PATTERN: &str = r"\b\w\w+\b";

/// Emits every non-overlapping match of a pattern as a term.
#[derive(Clone, Debug)]
pub struct RegexTokenizer {
    pattern: Regex,
}

impl RegexTokenizer {
    /// Tokenizer with [`DEFAULT_TOKEN_PATTERN`].
    pub fn new() -> Result<Self> {
        Self::with_pattern(DEFAULT_TOKEN_PATTERN)
    }

    pub fn with_pattern(pattern: &str) -> Result<Self> {
        let pattern = Regex::new(pattern)
            .map_err(|e| MosaicError::analysis(format!("invalid token pattern: {e}")))?;
        Ok(RegexTokenizer { pattern })
    }

    pub fn pattern(&self) -> &str {
        self.pattern.as_str()
    }
}

impl Tokenizer for RegexTokenizer {
    fn tokenize(&self, text: &str) -> Vec<String> {
        self.pattern
            .find_iter(text)
            .map(|m| m.as_str().to_string())
            .collect()
    }

    fn name(&self) -> &'static str {
        "regex"
    }
}
