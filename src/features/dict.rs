//! Feature records to dense matrices.

use std::collections::BTreeSet;

use ahash::AHashMap;
use log::info;
use ndarray::Array2;

use crate::error::{MosaicError, Result};
use crate::features::record::{FeatureRecord, RecordValue};
use crate::matrix::FeatureMatrix;
use crate::pipeline::batch::Batch;
use crate::pipeline::transformer::Transformer;

/// Learns a column per feature name and emits dense rows.
///
/// Numeric values land in the column named after their key. Text values are
/// one-hot encoded into a `key=value` column. Names unseen during fit are
/// dropped at transform time.
#[derive(Debug, Clone, Default)]
pub struct DictVectorizer {
    feature_names: Option<Vec<String>>,
    index: AHashMap<String, usize>,
}

impl DictVectorizer {
    /// Create an unfitted vectorizer.
    pub fn new() -> Self {
        Self::default()
    }

    fn column(key: &str, value: &RecordValue) -> (String, f64) {
        match value {
            RecordValue::Number(n) => (key.to_string(), *n),
            RecordValue::Text(s) => (format!("{key}={s}"), 1.0),
        }
    }

    /// Learn the sorted set of column names.
    pub fn fit_records(&mut self, records: &[FeatureRecord]) {
        let names: BTreeSet<String> = records
            .iter()
            .flat_map(|record| record.iter().map(|(k, v)| Self::column(k, v).0))
            .collect();

        let names: Vec<String> = names.into_iter().collect();
        self.index = names
            .iter()
            .enumerate()
            .map(|(i, name)| (name.clone(), i))
            .collect();
        info!("dict vectorizer learned {} features", names.len());
        self.feature_names = Some(names);
    }

    /// Encode records into an N × M dense matrix.
    pub fn transform_records(&self, records: &[FeatureRecord]) -> Result<Array2<f64>> {
        let names = self
            .feature_names
            .as_ref()
            .ok_or_else(|| MosaicError::not_fitted("dict_vectorizer"))?;

        let mut out = Array2::zeros((records.len(), names.len()));
        for (row, record) in records.iter().enumerate() {
            for (key, value) in record {
                let (name, v) = Self::column(key, value);
                if let Some(&col) = self.index.get(&name) {
                    out[[row, col]] = v;
                }
            }
        }
        Ok(out)
    }
}

impl Transformer for DictVectorizer {
    fn fit(&mut self, input: &Batch, _labels: Option<&[usize]>) -> Result<()> {
        let records = input.as_records(self.name())?;
        self.fit_records(records);
        Ok(())
    }

    fn transform(&self, input: &Batch) -> Result<Batch> {
        let records = input.as_records(self.name())?;
        Ok(Batch::Matrix(FeatureMatrix::Dense(
            self.transform_records(records)?,
        )))
    }

    fn feature_names(&self) -> Option<Vec<String>> {
        self.feature_names.clone()
    }

    fn name(&self) -> &'static str {
        "dict_vectorizer"
    }
}
