//! Error types for the Mosaic library.
//!
//! All fallible operations return [`Result`], whose error side is the
//! [`MosaicError`] enum. Failures are never swallowed by a pipeline step: the
//! first error raised by any transformer aborts the whole batch.
//!
//! # Examples
//!
//! ```
//! use mosaic::error::{MosaicError, Result};
//!
//! fn lookup() -> Result<()> {
//!     Err(MosaicError::field_not_found("missing"))
//! }
//!
//! assert_eq!(
//!     lookup().unwrap_err().to_string(),
//!     "Field error: no field named 'missing' in batch"
//! );
//! ```

use std::io;

use thiserror::Error;

/// The main error type for Mosaic operations.
#[derive(Error, Debug)]
pub enum MosaicError {
    /// I/O errors (reading corpora, configuration files)
    #[error("I/O error: {0}")]
    Io(#[from] io::Error),

    /// Analysis-related errors (tokenization, vocabulary building)
    #[error("Analysis error: {0}")]
    Analysis(String),

    /// Field lookup errors
    #[error("Field error: {0}")]
    Field(String),

    /// Row or column counts that do not line up
    #[error("Shape error: {0}")]
    Shape(String),

    /// A learning step was used before `fit`
    #[error("Not fitted: {0}")]
    NotFitted(String),

    /// A step received a batch of the wrong kind
    #[error("Invalid input: {0}")]
    InvalidInput(String),

    /// Invalid configuration
    #[error("Configuration error: {0}")]
    Config(String),

    /// Classifier training or prediction errors
    #[error("Model error: {0}")]
    Model(String),

    /// JSON serialization/deserialization errors
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// Generic error for other cases
    #[error("Error: {0}")]
    Other(String),

    /// Generic anyhow error
    #[error("Anyhow error: {0}")]
    Anyhow(#[from] anyhow::Error),
}

/// Result type alias for operations that may fail with MosaicError.
pub type Result<T> = std::result::Result<T, MosaicError>;

impl MosaicError {
    /// Create a new analysis error.
    pub fn analysis<S: Into<String>>(msg: S) -> Self {
        MosaicError::Analysis(msg.into())
    }

    /// Create the error raised when a field batch has no such key.
    pub fn field_not_found(name: &str) -> Self {
        MosaicError::Field(format!("no field named '{name}' in batch"))
    }

    /// Create a new shape error.
    pub fn shape<S: Into<String>>(msg: S) -> Self {
        MosaicError::Shape(msg.into())
    }

    /// Create a new not-fitted error for the named component.
    pub fn not_fitted(component: &str) -> Self {
        MosaicError::NotFitted(format!("{component} must be fitted before use"))
    }

    /// Create a new invalid input error.
    pub fn invalid_input<S: Into<String>>(msg: S) -> Self {
        MosaicError::InvalidInput(msg.into())
    }

    /// Create a new configuration error.
    pub fn config<S: Into<String>>(msg: S) -> Self {
        MosaicError::Config(msg.into())
    }

    /// Create a new model error.
    pub fn model<S: Into<String>>(msg: S) -> Self {
        MosaicError::Model(msg.into())
    }

    /// Create a new generic error.
    pub fn other<S: Into<String>>(msg: S) -> Self {
        MosaicError::Other(msg.into())
    }

    /// Create a new invalid argument error.
    pub fn invalid_argument<S: Into<String>>(msg: S) -> Self {
        MosaicError::Other(format!("Invalid argument: {}", msg.into()))
    }

    /// Whether this error is a field lookup miss.
    pub fn is_field_error(&self) -> bool {
        matches!(self, MosaicError::Field(_))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_construction() {
        let error = MosaicError::analysis("empty vocabulary");
        assert_eq!(error.to_string(), "Analysis error: empty vocabulary");

        let error = MosaicError::shape("3 rows vs 4 rows");
        assert_eq!(error.to_string(), "Shape error: 3 rows vs 4 rows");

        let error = MosaicError::not_fitted("TfidfVectorizer");
        assert_eq!(
            error.to_string(),
            "Not fitted: TfidfVectorizer must be fitted before use"
        );
    }

    #[test]
    fn test_field_not_found() {
        let error = MosaicError::field_not_found("missing");
        assert!(error.is_field_error());
        assert!(error.to_string().contains("'missing'"));
    }

    #[test]
    fn test_io_error_conversion() {
        let io_error = io::Error::new(io::ErrorKind::NotFound, "File not found");
        let mosaic_error = MosaicError::from(io_error);

        match mosaic_error {
            MosaicError::Io(_) => {} // Expected
            _ => panic!("Expected IO error variant"),
        }
    }

    #[test]
    fn test_anyhow_conversion() {
        fn external() -> anyhow::Result<()> {
            anyhow::bail!("dictionary unavailable")
        }
        fn analyze() -> Result<()> {
            external()?;
            Ok(())
        }

        let err = analyze().unwrap_err();
        assert!(matches!(err, MosaicError::Anyhow(_)));
        assert_eq!(err.to_string(), "Anyhow error: dictionary unavailable");
    }
}
