//! Field batches: named, equal-length columns of per-document values.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use crate::error::{MosaicError, Result};

/// A mapping from field name to one value per document.
///
/// Every column holds exactly `len()` entries and entry `i` of each column
/// belongs to document `i`. The length is fixed by the first inserted column.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct FieldBatch {
    len: Option<usize>,
    fields: BTreeMap<String, Vec<String>>,
}

impl FieldBatch {
    /// Create an empty batch with no columns.
    pub fn new() -> Self {
        Self::default()
    }

    /// Create an empty batch whose columns must all have `len` entries.
    pub fn with_len(len: usize) -> Self {
        FieldBatch {
            len: Some(len),
            fields: BTreeMap::new(),
        }
    }

    /// Insert (or replace) a column.
    ///
    /// Fails with a shape error when the column length differs from the batch length.
    pub fn insert<S: Into<String>>(&mut self, name: S, values: Vec<String>) -> Result<()> {
        let name = name.into();
        match self.len {
            Some(len) if len != values.len() => {
                return Err(MosaicError::shape(format!(
                    "field '{name}' has {} values but the batch holds {len} documents",
                    values.len()
                )));
            }
            Some(_) => {}
            None => self.len = Some(values.len()),
        }
        self.fields.insert(name, values);
        Ok(())
    }

    /// Builder-style [`insert`](Self::insert).
    pub fn with_field<S: Into<String>>(mut self, name: S, values: Vec<String>) -> Result<Self> {
        self.insert(name, values)?;
        Ok(self)
    }

    /// The column stored under `name`, or a field error when absent.
    pub fn get(&self, name: &str) -> Result<&[String]> {
        self.fields
            .get(name)
            .map(Vec::as_slice)
            .ok_or_else(|| MosaicError::field_not_found(name))
    }

    /// Check if the batch has a column.
    pub fn contains(&self, name: &str) -> bool {
        self.fields.contains_key(name)
    }

    /// Column names in sorted order.
    pub fn field_names(&self) -> Vec<&str> {
        self.fields.keys().map(String::as_str).collect()
    }

    /// Number of documents.
    pub fn len(&self) -> usize {
        self.len.unwrap_or(0)
    }

    /// Check if the batch holds no documents.
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}
