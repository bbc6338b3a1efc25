//! The two-phase fit/transform contract shared by every step.

use crate::error::Result;
use crate::pipeline::batch::Batch;

/// A pipeline component with a learning phase and an application phase.
///
/// Stateless components implement `fit` as a no-op. Components that learn
/// (vectorizers, reducers) fail with a not-fitted error when `transform` is
/// called first.
pub trait Transformer: Send + Sync {
    /// Learn parameters from a training batch.
    fn fit(&mut self, input: &Batch, labels: Option<&[usize]>) -> Result<()>;

    /// Apply learned parameters to any batch.
    fn transform(&self, input: &Batch) -> Result<Batch>;

    /// Fit, then transform the same batch.
    fn fit_transform(&mut self, input: &Batch, labels: Option<&[usize]>) -> Result<Batch> {
        self.fit(input, labels)?;
        self.transform(input)
    }

    /// Names of the output columns, when the output is a matrix and the step is fitted.
    fn feature_names(&self) -> Option<Vec<String>> {
        None
    }

    /// Get the name of this transformer (for debugging and logging).
    fn name(&self) -> &'static str;
}
