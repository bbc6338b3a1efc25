//! Selects one column of a field batch.

use crate::error::Result;
use crate::pipeline::batch::Batch;
use crate::pipeline::transformer::Transformer;

/// Returns the texts stored under one key of a [`FieldBatch`](crate::document::FieldBatch).
///
/// A missing key is a field error, never an empty default.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FieldSelector {
    key: String,
}

impl FieldSelector {
    /// Create a selector for `key`.
    pub fn new<S: Into<String>>(key: S) -> Self {
        FieldSelector { key: key.into() }
    }

    /// The selected key.
    pub fn key(&self) -> &str {
        &self.key
    }
}

impl Transformer for FieldSelector {
    fn fit(&mut self, _input: &Batch, _labels: Option<&[usize]>) -> Result<()> {
        Ok(())
    }

    fn transform(&self, input: &Batch) -> Result<Batch> {
        let fields = input.as_fields(self.name())?;
        Ok(Batch::Texts(fields.get(&self.key)?.to_vec()))
    }

    fn name(&self) -> &'static str {
        "field_selector"
    }
}
