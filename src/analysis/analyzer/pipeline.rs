//! Tokenizer followed by a chain of filters.

use std::fmt;
use std::sync::Arc;

use crate::analysis::analyzer::Analyzer;
use crate::analysis::token_filter::Filter;
use crate::analysis::tokenizer::Tokenizer;
use crate::error::Result;

/// A tokenizer followed by filters, applied in the order they were added.
///
/// # Examples
///
/// ```
/// use std::sync::Arc;
///
/// use mosaic::analysis::{Analyzer, LowercaseFilter, PipelineAnalyzer, RegexTokenizer, StopFilter};
///
/// let analyzer = PipelineAnalyzer::new(Arc::new(RegexTokenizer::new().unwrap()))
///     .add_filter(Arc::new(LowercaseFilter::new()))
///     .add_filter(Arc::new(StopFilter::from_words(["the", "and"])));
///
/// assert_eq!(analyzer.analyze("The Moon and the Sun").unwrap(), ["moon", "sun"]);
/// ```
#[derive(Clone)]
pub struct PipelineAnalyzer {
    tokenizer: Arc<dyn Tokenizer>,
    filters: Vec<Arc<dyn Filter>>,
    name: String,
}

impl PipelineAnalyzer {
    pub fn new(tokenizer: Arc<dyn Tokenizer>) -> Self {
        PipelineAnalyzer {
            name: tokenizer.name().to_string(),
            tokenizer,
            filters: Vec::new(),
        }
    }

    /// Append a filter to the chain.
    pub fn add_filter(mut self, filter: Arc<dyn Filter>) -> Self {
        self.filters.push(filter);
        self
    }

    pub fn with_name<S: Into<String>>(mut self, name: S) -> Self {
        self.name = name.into();
        self
    }

    /// Names of the filters, in application order.
    pub fn filter_names(&self) -> Vec<&'static str> {
        self.filters.iter().map(|f| f.name()).collect()
    }
}

impl Analyzer for PipelineAnalyzer {
    fn analyze(&self, text: &str) -> Result<Vec<String>> {
        let mut terms = self.tokenizer.tokenize(text);
        for filter in &self.filters {
            if terms.is_empty() {
                break;
            }
            filter.apply(&mut terms);
        }
        Ok(terms)
    }

    fn name(&self) -> &str {
        &self.name
    }
}

impl fmt::Debug for PipelineAnalyzer {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("PipelineAnalyzer")
            .field("name", &self.name)
            .field("tokenizer", &self.tokenizer.name())
            .field("filters", &self.filter_names())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::analysis::token_filter::{LowercaseFilter, StopFilter};
    use crate::analysis::tokenizer::RegexTokenizer;

    fn tokenizer() -> Arc<dyn Tokenizer> {
        Arc::new(RegexTokenizer::new().unwrap())
    }

    #[test]
    fn test_tokenizer_only() {
        let analyzer = PipelineAnalyzer::new(tokenizer());
        assert_eq!(analyzer.analyze("Orbit of Mars").unwrap(), ["Orbit", "of", "Mars"]);
        assert_eq!(analyzer.name(), "regex");
        assert!(analyzer.filter_names().is_empty());
    }

    #[test]
    fn test_filters_run_in_order() {
        // Stop words match exact text, so "THE" survives a stop filter that runs first.
        let analyzer = PipelineAnalyzer::new(tokenizer())
            .add_filter(Arc::new(StopFilter::from_words(["the"])))
            .add_filter(Arc::new(LowercaseFilter::new()))
            .with_name("subject");

        assert_eq!(analyzer.analyze("THE thing the").unwrap(), ["the", "thing"]);
        assert_eq!(analyzer.filter_names(), ["stop", "lowercase"]);
        assert_eq!(analyzer.name(), "subject");
    }

    #[test]
    fn test_empty_text() {
        let analyzer = PipelineAnalyzer::new(tokenizer()).add_filter(Arc::new(LowercaseFilter::new()));
        assert!(analyzer.analyze("").unwrap().is_empty());
        assert!(analyzer.analyze("a ? !").unwrap().is_empty());
    }
}
