//! Fit/transform composition: batches, steps, pipelines and the feature union.
//!
//! ```text
//! Texts ──▶ DocumentSplitter ──▶ Fields ──▶ FeatureUnion ──▶ Matrix
//!                                          ├─ subject:    FieldSelector → TfidfVectorizer
//!                                          ├─ body_bow:   FieldSelector → TfidfVectorizer → TruncatedSvd
//!                                          └─ body_stats: FieldSelector → TextStats → DictVectorizer
//! ```

pub mod batch;
pub mod newsgroups;
#[allow(clippy::module_inception)]
pub mod pipeline;
pub mod selector;
pub mod step;
pub mod transformer;
pub mod union;

pub use batch::Batch;
pub use newsgroups::{BODY_BOW, BODY_STATS, SUBJECT, subject_body_features};
pub use pipeline::Pipeline;
pub use selector::FieldSelector;
pub use step::Step;
pub use transformer::Transformer;
pub use union::{FeatureUnion, FeatureUnionConfig};
