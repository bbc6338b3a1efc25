//! Feature union: several feature pipelines over one batch, stacked column-wise.

use std::collections::{HashMap, HashSet};
use std::sync::Arc;

use log::{debug, info};
use rayon::ThreadPool;
use rayon::prelude::*;
use serde::{Deserialize, Serialize};

use crate::error::{MosaicError, Result};
use crate::matrix::FeatureMatrix;
use crate::pipeline::batch::Batch;
use crate::pipeline::step::Step;
use crate::pipeline::transformer::Transformer;

/// Configuration for a [`FeatureUnion`].
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct FeatureUnionConfig {
    /// Multiplicative weight per transformer name. Unlisted transformers get 1.0.
    pub weights: HashMap<String, f64>,

    /// Number of worker threads. 1 runs the transformers sequentially.
    pub n_jobs: usize,
}

impl Default for FeatureUnionConfig {
    fn default() -> Self {
        Self {
            weights: HashMap::new(),
            n_jobs: num_cpus::get(),
        }
    }
}

impl FeatureUnionConfig {
    /// Create a config with the given weights and the default thread count.
    pub fn with_weights<I, S>(weights: I) -> Self
    where
        I: IntoIterator<Item = (S, f64)>,
        S: Into<String>,
    {
        Self {
            weights: weights.into_iter().map(|(k, v)| (k.into(), v)).collect(),
            ..Default::default()
        }
    }

    /// Set the number of worker threads.
    pub fn n_jobs(mut self, n_jobs: usize) -> Self {
        self.n_jobs = n_jobs;
        self
    }
}

/// Runs every named transformer over the same input, scales each output
/// matrix by its weight, and concatenates them in list order.
///
/// Any failing transformer fails the whole call. Outputs that do not share a
/// row count are a shape error.
///
/// # Examples
///
/// ```
/// use mosaic::pipeline::{FeatureUnion, FeatureUnionConfig, FieldSelector, Pipeline};
/// use mosaic::features::{DictVectorizer, TextStats};
///
/// let stats = Pipeline::new(vec![
///     ("selector".to_string(), FieldSelector::new("body").into()),
///     ("stats".to_string(), TextStats::new().into()),
///     ("vect".to_string(), DictVectorizer::new().into()),
/// ])
/// .unwrap();
///
/// let union = FeatureUnion::new(
///     vec![("body_stats".to_string(), stats.into())],
///     FeatureUnionConfig::with_weights([("body_stats", 1.0)]),
/// )
/// .unwrap();
/// assert_eq!(union.weight("body_stats"), 1.0);
/// ```
pub struct FeatureUnion {
    transformers: Vec<(String, Step)>,
    weights: HashMap<String, f64>,
    n_jobs: usize,
    pool: Option<Arc<ThreadPool>>,
}

impl FeatureUnion {
    /// Create a union.
    ///
    /// Fails on an empty transformer list, duplicate names, a weight naming an
    /// unknown transformer, or a weight that is not a positive finite number.
    pub fn new(transformers: Vec<(String, Step)>, config: FeatureUnionConfig) -> Result<Self> {
        if transformers.is_empty() {
            return Err(MosaicError::config(
                "feature union needs at least one transformer",
            ));
        }

        let mut names = HashSet::new();
        for (name, _) in &transformers {
            if !names.insert(name.as_str()) {
                return Err(MosaicError::config(format!(
                    "duplicate transformer name '{name}' in feature union"
                )));
            }
        }

        for (name, &weight) in &config.weights {
            if !names.contains(name.as_str()) {
                return Err(MosaicError::config(format!(
                    "weight given for unknown transformer '{name}'"
                )));
            }
            if !weight.is_finite() || weight <= 0.0 {
                return Err(MosaicError::config(format!(
                    "weight for '{name}' must be a positive number, got {weight}"
                )));
            }
        }

        let n_jobs = config.n_jobs.max(1).min(transformers.len());
        let pool = if n_jobs > 1 {
            let pool = rayon::ThreadPoolBuilder::new()
                .num_threads(n_jobs)
                .thread_name(|i| format!("mosaic-union-{i}"))
                .build()
                .map_err(|e| MosaicError::other(format!("failed to build thread pool: {e}")))?;
            Some(Arc::new(pool))
        } else {
            None
        };

        Ok(FeatureUnion {
            transformers,
            weights: config.weights,
            n_jobs,
            pool,
        })
    }

    /// The weight applied to `name`'s output.
    pub fn weight(&self, name: &str) -> f64 {
        self.weights.get(name).copied().unwrap_or(1.0)
    }

    /// The named transformers in stacking order.
    pub fn transformers(&self) -> &[(String, Step)] {
        &self.transformers
    }

    /// Number of worker threads in use.
    pub fn n_jobs(&self) -> usize {
        self.n_jobs
    }

    /// Output width of each fitted transformer, in stacking order.
    pub fn block_widths(&self) -> Option<Vec<(String, usize)>> {
        self.transformers
            .iter()
            .map(|(name, step)| step.feature_names().map(|f| (name.clone(), f.len())))
            .collect()
    }

    fn stack(&self, blocks: Vec<FeatureMatrix>) -> Result<Batch> {
        let widths: Vec<usize> = blocks.iter().map(FeatureMatrix::n_cols).collect();
        let stacked = FeatureMatrix::hstack(blocks)?;
        debug!(
            "stacked feature blocks {:?} into {:?}",
            widths,
            stacked.shape()
        );
        Ok(Batch::Matrix(stacked))
    }
}

impl Transformer for FeatureUnion {
    fn fit(&mut self, input: &Batch, labels: Option<&[usize]>) -> Result<()> {
        let job = |(name, step): &mut (String, Step)| -> Result<()> {
            debug!("fitting union member '{name}'");
            step.fit(input, labels)
        };

        let results: Vec<()> = match &self.pool {
            Some(pool) => pool.install(|| {
                self.transformers
                    .par_iter_mut()
                    .map(job)
                    .collect::<Result<Vec<_>>>()
            })?,
            None => self.transformers.iter_mut().map(job).collect::<Result<Vec<_>>>()?,
        };

        info!("fitted feature union of {} transformers", results.len());
        Ok(())
    }

    fn transform(&self, input: &Batch) -> Result<Batch> {
        let job = |(name, step): &(String, Step)| -> Result<FeatureMatrix> {
            let block = step.transform(input)?.into_matrix(name)?;
            Ok(block.scaled(self.weight(name)))
        };

        let blocks: Vec<FeatureMatrix> = match &self.pool {
            Some(pool) => pool.install(|| {
                self.transformers
                    .par_iter()
                    .map(job)
                    .collect::<Result<Vec<_>>>()
            })?,
            None => self.transformers.iter().map(job).collect::<Result<Vec<_>>>()?,
        };

        self.stack(blocks)
    }

    fn fit_transform(&mut self, input: &Batch, labels: Option<&[usize]>) -> Result<Batch> {
        let weights = &self.weights;
        let job = |(name, step): &mut (String, Step)| -> Result<FeatureMatrix> {
            debug!("fitting union member '{name}'");
            let block = step.fit_transform(input, labels)?.into_matrix(name.as_str())?;
            let weight = weights.get(name.as_str()).copied().unwrap_or(1.0);
            Ok(block.scaled(weight))
        };

        let blocks: Vec<FeatureMatrix> = match &self.pool {
            Some(pool) => pool.install(|| {
                self.transformers
                    .par_iter_mut()
                    .map(job)
                    .collect::<Result<Vec<_>>>()
            })?,
            None => self.transformers.iter_mut().map(job).collect::<Result<Vec<_>>>()?,
        };

        info!("fitted feature union of {} transformers", blocks.len());
        self.stack(blocks)
    }

    fn feature_names(&self) -> Option<Vec<String>> {
        let mut names = Vec::new();
        for (prefix, step) in &self.transformers {
            names.extend(
                step.feature_names()?
                    .into_iter()
                    .map(|f| format!("{prefix}__{f}")),
            );
        }
        Some(names)
    }

    fn name(&self) -> &'static str {
        "feature_union"
    }
}

impl std::fmt::Debug for FeatureUnion {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("FeatureUnion")
            .field("transformers", &self.transformers)
            .field("weights", &self.weights)
            .field("n_jobs", &self.n_jobs)
            .finish()
    }
}
