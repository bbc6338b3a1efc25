//! Configuration for the subject/body classification pipeline.
//!
//! Every field has a default, so a JSON file only needs the values it changes.
//! Union weights given in the file are merged onto the default weights:
//!
//! ```json
//! {
//!   "subject_tfidf": { "min_df": 5 },
//!   "svd": { "n_components": 20 },
//!   "union": { "weights": { "subject": 0.8, "body_bow": 0.5, "body_stats": 1.0 }, "n_jobs": 2 }
//! }
//! ```

use std::collections::HashMap;
use std::fs;
use std::path::Path;

use log::debug;
use serde::{Deserialize, Deserializer, Serialize};

use crate::error::{MosaicError, Result};
use crate::features::{SvdConfig, TfidfConfig};
use crate::ml::SvcConfig;
use crate::pipeline::newsgroups::{BODY_BOW, BODY_STATS, SUBJECT};
use crate::pipeline::FeatureUnionConfig;

/// Settings for every learning component of the pipeline.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PipelineConfig {
    /// Vectorizer for the subject line.
    pub subject_tfidf: TfidfConfig,
    /// Vectorizer for the body ahead of the SVD.
    pub body_tfidf: TfidfConfig,
    /// Reducer for the body bag of words.
    pub svd: SvdConfig,
    /// Classifier on the combined features.
    pub svc: SvcConfig,
    /// Union weights and worker threads.
    #[serde(deserialize_with = "deserialize_union")]
    pub union: FeatureUnionConfig,
}

/// The `union` section as written in a file.
#[derive(Deserialize)]
struct UnionSection {
    weights: Option<HashMap<String, f64>>,
    n_jobs: Option<usize>,
}

fn default_union() -> FeatureUnionConfig {
    FeatureUnionConfig::with_weights([(SUBJECT, 0.8), (BODY_BOW, 0.5), (BODY_STATS, 1.0)])
}

fn deserialize_union<'de, D>(deserializer: D) -> std::result::Result<FeatureUnionConfig, D::Error>
where
    D: Deserializer<'de>,
{
    let section = UnionSection::deserialize(deserializer)?;
    let mut union = default_union();
    if let Some(weights) = section.weights {
        union.weights.extend(weights);
    }
    if let Some(n_jobs) = section.n_jobs {
        union.n_jobs = n_jobs;
    }
    Ok(union)
}

impl Default for PipelineConfig {
    fn default() -> Self {
        Self {
            subject_tfidf: TfidfConfig::default().min_df(50),
            body_tfidf: TfidfConfig::default(),
            svd: SvdConfig::default(),
            svc: SvcConfig::default(),
            union: default_union(),
        }
    }
}

impl PipelineConfig {
    /// Load a JSON configuration file.
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();
        let content = fs::read_to_string(path).map_err(|e| {
            MosaicError::config(format!("cannot read config file {}: {e}", path.display()))
        })?;
        let config: PipelineConfig = serde_json::from_str(&content)?;
        debug!("loaded pipeline config from {}", path.display());
        config.validate()?;
        Ok(config)
    }

    /// Check every section.
    pub fn validate(&self) -> Result<()> {
        self.subject_tfidf.validate()?;
        self.body_tfidf.validate()?;
        if self.svd.n_components == 0 {
            return Err(MosaicError::config("svd.n_components must be at least 1"));
        }
        self.svc.validate()?;

        for (name, &weight) in &self.union.weights {
            if ![SUBJECT, BODY_BOW, BODY_STATS].contains(&name.as_str()) {
                return Err(MosaicError::config(format!(
                    "union weight for unknown transformer '{name}'"
                )));
            }
            if !weight.is_finite() || weight <= 0.0 {
                return Err(MosaicError::config(format!(
                    "union weight for '{name}' must be a positive number, got {weight}"
                )));
            }
        }
        Ok(())
    }
}
