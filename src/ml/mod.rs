//! Classification on top of the feature pipelines.
//!
//! [`LinearSvc`] trains on a [`FeatureMatrix`](crate::matrix::FeatureMatrix),
//! [`ClassificationPipeline`] wraps a feature pipeline and a classifier, and
//! [`classification_report`] scores predictions.

pub mod metrics;
pub mod model;
pub mod svm;

pub use metrics::{ClassMetrics, ClassificationReport, classification_report};
pub use model::ClassificationPipeline;
pub use svm::{LinearSvc, SvcConfig};
