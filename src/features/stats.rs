//! Ad hoc text statistics.

use log::debug;

use crate::error::Result;
use crate::features::record::{FeatureRecord, RecordValue};
use crate::pipeline::batch::Batch;
use crate::pipeline::transformer::Transformer;

/// Record key for the character count.
pub const LENGTH: &str = "length";

/// Record key for the sentence estimate.
pub const NUM_SENTENCES: &str = "num_sentences";

/// Maps each text to `{length, num_sentences}`.
///
/// `length` counts characters. `num_sentences` counts `'.'` characters, so
/// "e.g." counts as two and a sentence ending in `!` counts as none.
///
/// # Examples
///
/// ```
/// use mosaic::features::TextStats;
///
/// let stats = TextStats::extract("Hello. World.");
/// assert_eq!(stats["length"].as_number(), Some(13.0));
/// assert_eq!(stats["num_sentences"].as_number(), Some(2.0));
/// ```
#[derive(Debug, Clone, Default)]
pub struct TextStats;

impl TextStats {
    /// Create a new statistics extractor.
    pub fn new() -> Self {
        TextStats
    }

    /// Statistics for one text.
    pub fn extract(text: &str) -> FeatureRecord {
        let mut record = FeatureRecord::new();
        record.insert(LENGTH.to_string(), RecordValue::from(text.chars().count()));
        record.insert(
            NUM_SENTENCES.to_string(),
            RecordValue::from(text.matches('.').count()),
        );
        record
    }
}

impl Transformer for TextStats {
    fn fit(&mut self, _input: &Batch, _labels: Option<&[usize]>) -> Result<()> {
        Ok(())
    }

    fn transform(&self, input: &Batch) -> Result<Batch> {
        let texts = input.as_texts(self.name())?;
        debug!("extracting statistics from {} texts", texts.len());
        Ok(Batch::Records(
            texts.iter().map(|text| Self::extract(text)).collect(),
        ))
    }

    fn name(&self) -> &'static str {
        "text_stats"
    }
}
