//! Tokenizers that cut text into raw terms.

pub mod regex;

pub use self::regex::RegexTokenizer;

/// Splits a text into terms.
pub trait Tokenizer: Send + Sync {
    /// Every term of `text`, in order.
    fn tokenize(&self, text: &str) -> Vec<String>;

    /// Get the name of this tokenizer (for debugging and configuration).
    fn name(&self) -> &'static str;
}
