//! The values that flow between pipeline steps.

use crate::document::FieldBatch;
use crate::error::{MosaicError, Result};
use crate::features::record::FeatureRecord;
use crate::matrix::FeatureMatrix;

/// Input or output of a pipeline step.
///
/// Each step accepts exactly one kind and rejects the others with an
/// invalid-input error naming the step.
#[derive(Debug, Clone, PartialEq)]
pub enum Batch {
    /// One string per document (raw posts or a selected field).
    Texts(Vec<String>),
    /// Named per-document columns.
    Fields(FieldBatch),
    /// One feature record per document.
    Records(Vec<FeatureRecord>),
    /// A numeric feature matrix, one row per document.
    Matrix(FeatureMatrix),
}

impl Batch {
    /// Number of documents in the batch.
    pub fn len(&self) -> usize {
        match self {
            Batch::Texts(v) => v.len(),
            Batch::Fields(f) => f.len(),
            Batch::Records(r) => r.len(),
            Batch::Matrix(m) => m.n_rows(),
        }
    }

    /// Check if the batch holds no documents.
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Short name of the variant, used in error messages.
    pub fn kind(&self) -> &'static str {
        match self {
            Batch::Texts(_) => "texts",
            Batch::Fields(_) => "fields",
            Batch::Records(_) => "records",
            Batch::Matrix(_) => "matrix",
        }
    }

    fn mismatch(&self, step: &str, expected: &str) -> MosaicError {
        MosaicError::invalid_input(format!(
            "{step} expects {expected} input, got {}",
            self.kind()
        ))
    }

    /// Borrow as texts or fail on behalf of `step`.
    pub fn as_texts(&self, step: &str) -> Result<&[String]> {
        match self {
            Batch::Texts(v) => Ok(v),
            other => Err(other.mismatch(step, "texts")),
        }
    }

    /// Borrow as a field batch or fail on behalf of `step`.
    pub fn as_fields(&self, step: &str) -> Result<&FieldBatch> {
        match self {
            Batch::Fields(f) => Ok(f),
            other => Err(other.mismatch(step, "fields")),
        }
    }

    /// Borrow as records or fail on behalf of `step`.
    pub fn as_records(&self, step: &str) -> Result<&[FeatureRecord]> {
        match self {
            Batch::Records(r) => Ok(r),
            other => Err(other.mismatch(step, "records")),
        }
    }

    /// Borrow as a matrix or fail on behalf of `step`.
    pub fn as_matrix(&self, step: &str) -> Result<&FeatureMatrix> {
        match self {
            Batch::Matrix(m) => Ok(m),
            other => Err(other.mismatch(step, "matrix")),
        }
    }

    /// Take the matrix out or fail on behalf of `step`.
    pub fn into_matrix(self, step: &str) -> Result<FeatureMatrix> {
        match self {
            Batch::Matrix(m) => Ok(m),
            other => Err(other.mismatch(step, "matrix")),
        }
    }
}

impl From<Vec<String>> for Batch {
    fn from(v: Vec<String>) -> Self {
        Batch::Texts(v)
    }
}

impl From<FieldBatch> for Batch {
    fn from(f: FieldBatch) -> Self {
        Batch::Fields(f)
    }
}

impl From<Vec<FeatureRecord>> for Batch {
    fn from(r: Vec<FeatureRecord>) -> Self {
        Batch::Records(r)
    }
}

impl From<FeatureMatrix> for Batch {
    fn from(m: FeatureMatrix) -> Self {
        Batch::Matrix(m)
    }
}
