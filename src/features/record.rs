//! Per-document feature records.

use std::collections::BTreeMap;
use std::fmt;

use serde::{Deserialize, Serialize};

/// One value in a [`FeatureRecord`].
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum RecordValue {
    /// A numeric feature, used as-is.
    Number(f64),
    /// A categorical feature, one-hot encoded as `name=value`.
    Text(String),
}

impl RecordValue {
    /// The numeric value, if this is a number.
    pub fn as_number(&self) -> Option<f64> {
        match self {
            RecordValue::Number(n) => Some(*n),
            RecordValue::Text(_) => None,
        }
    }
}

impl From<f64> for RecordValue {
    fn from(n: f64) -> Self {
        RecordValue::Number(n)
    }
}

impl From<usize> for RecordValue {
    fn from(n: usize) -> Self {
        RecordValue::Number(n as f64)
    }
}

impl From<&str> for RecordValue {
    fn from(s: &str) -> Self {
        RecordValue::Text(s.to_string())
    }
}

impl From<String> for RecordValue {
    fn from(s: String) -> Self {
        RecordValue::Text(s)
    }
}

impl fmt::Display for RecordValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            RecordValue::Number(n) => write!(f, "{n}"),
            RecordValue::Text(s) => write!(f, "{s}"),
        }
    }
}

/// Feature name → value for one document, iterated in name order.
pub type FeatureRecord = BTreeMap<String, RecordValue>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_untagged_serialization() {
        let mut record = FeatureRecord::new();
        record.insert("length".to_string(), 13usize.into());
        record.insert("topic".to_string(), "space".into());

        let json = serde_json::to_string(&record).unwrap();
        assert_eq!(json, r#"{"length":13.0,"topic":"space"}"#);

        let back: FeatureRecord = serde_json::from_str(&json).unwrap();
        assert_eq!(back, record);
    }

    #[test]
    fn test_as_number() {
        assert_eq!(RecordValue::from(2.5).as_number(), Some(2.5));
        assert_eq!(RecordValue::from("x").as_number(), None);
    }
}
