//! Feature extractors: text statistics, vectorizers and dimensionality reduction.
//!
//! Every extractor implements [`Transformer`](crate::pipeline::Transformer) and
//! can be used as a [`Step`](crate::pipeline::Step).

pub mod dict;
pub mod record;
pub mod stats;
pub mod svd;
pub mod tfidf;

pub use dict::DictVectorizer;
pub use record::{FeatureRecord, RecordValue};
pub use stats::TextStats;
pub use svd::{SvdConfig, TruncatedSvd};
pub use tfidf::{Norm, TfidfConfig, TfidfVectorizer};
