//! Text analysis for the TF-IDF vectorizer.
//!
//! An [`Analyzer`] turns a text into the terms a vectorizer counts. The
//! [`PipelineAnalyzer`] is a [`Tokenizer`] followed by a chain of [`Filter`]s
//! that rewrite or drop terms in place.

pub mod analyzer;
pub mod token_filter;
pub mod tokenizer;

pub use analyzer::{Analyzer, PipelineAnalyzer};
pub use token_filter::{Filter, LowercaseFilter, StopFilter};
pub use tokenizer::{RegexTokenizer, Tokenizer};
