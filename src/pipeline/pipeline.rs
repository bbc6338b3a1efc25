//! Ordered chains of named steps.

use std::collections::HashSet;

use log::debug;

use crate::error::{MosaicError, Result};
use crate::pipeline::batch::Batch;
use crate::pipeline::step::Step;
use crate::pipeline::transformer::Transformer;

/// An ordered chain of named steps; each step's output feeds the next.
///
/// Fitting runs `fit_transform` through every step but the last, then fits
/// the last step on the result. Transforming chains `transform` calls.
///
/// # Examples
///
/// ```
/// use mosaic::pipeline::{FieldSelector, Pipeline};
/// use mosaic::features::TextStats;
///
/// let pipeline = Pipeline::new(vec![
///     ("selector".to_string(), FieldSelector::new("body").into()),
///     ("stats".to_string(), TextStats::new().into()),
/// ])
/// .unwrap();
/// assert_eq!(pipeline.len(), 2);
/// ```
#[derive(Debug)]
pub struct Pipeline {
    steps: Vec<(String, Step)>,
}

impl Pipeline {
    /// Create a pipeline. Fails on an empty list or duplicate step names.
    pub fn new(steps: Vec<(String, Step)>) -> Result<Self> {
        if steps.is_empty() {
            return Err(MosaicError::config("pipeline needs at least one step"));
        }
        let mut seen = HashSet::new();
        for (name, _) in &steps {
            if !seen.insert(name.as_str()) {
                return Err(MosaicError::config(format!(
                    "duplicate pipeline step name '{name}'"
                )));
            }
        }
        Ok(Pipeline { steps })
    }

    /// The named steps in order.
    pub fn steps(&self) -> &[(String, Step)] {
        &self.steps
    }

    /// Look up a step by name.
    pub fn step(&self, name: &str) -> Option<&Step> {
        self.steps.iter().find(|(n, _)| n == name).map(|(_, s)| s)
    }

    /// Number of steps.
    pub fn len(&self) -> usize {
        self.steps.len()
    }

    /// Always false: a pipeline holds at least one step.
    pub fn is_empty(&self) -> bool {
        self.steps.is_empty()
    }
}

impl Transformer for Pipeline {
    fn fit(&mut self, input: &Batch, labels: Option<&[usize]>) -> Result<()> {
        let Some(((last_name, last), head)) = self.steps.split_last_mut() else {
            return Ok(());
        };

        let mut owned: Option<Batch> = None;
        for (name, step) in head.iter_mut() {
            let current = owned.as_ref().unwrap_or(input);
            debug!("fit_transform step '{name}' on {} {}", current.len(), current.kind());
            let next = step.fit_transform(current, labels)?;
            owned = Some(next);
        }

        let current = owned.as_ref().unwrap_or(input);
        debug!("fit step '{last_name}' on {} {}", current.len(), current.kind());
        last.fit(current, labels)
    }

    fn transform(&self, input: &Batch) -> Result<Batch> {
        let mut owned: Option<Batch> = None;
        for (name, step) in &self.steps {
            let current = owned.as_ref().unwrap_or(input);
            debug!("transform step '{name}' on {} {}", current.len(), current.kind());
            let next = step.transform(current)?;
            owned = Some(next);
        }
        owned.ok_or_else(|| MosaicError::config("pipeline needs at least one step"))
    }

    fn fit_transform(&mut self, input: &Batch, labels: Option<&[usize]>) -> Result<Batch> {
        let mut owned: Option<Batch> = None;
        for (name, step) in self.steps.iter_mut() {
            let current = owned.as_ref().unwrap_or(input);
            debug!("fit_transform step '{name}' on {} {}", current.len(), current.kind());
            let next = step.fit_transform(current, labels)?;
            owned = Some(next);
        }
        owned.ok_or_else(|| MosaicError::config("pipeline needs at least one step"))
    }

    fn feature_names(&self) -> Option<Vec<String>> {
        self.steps.last().and_then(|(_, step)| step.feature_names())
    }

    fn name(&self) -> &'static str {
        "pipeline"
    }
}
