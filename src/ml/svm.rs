//! Linear support vector classification by dual coordinate descent.

use log::{debug, info, warn};
use ndarray::Array2;
use rand::SeedableRng;
use rand::rngs::StdRng;
use rand::seq::SliceRandom;
use rayon::prelude::*;
use serde::{Deserialize, Serialize};

use crate::error::{MosaicError, Result};
use crate::matrix::FeatureMatrix;

/// Configuration for [`LinearSvc`].
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SvcConfig {
    /// Inverse regularization strength; the upper bound on each dual variable.
    pub c: f64,
    /// Stop when the projected-gradient spread falls below this.
    pub tol: f64,
    /// Maximum passes over the training rows.
    pub max_iter: usize,
    /// Seed for the visiting order.
    pub seed: u64,
}

impl Default for SvcConfig {
    fn default() -> Self {
        Self {
            c: 1.0,
            tol: 1e-4,
            max_iter: 1000,
            seed: 0,
        }
    }
}

impl SvcConfig {
    /// Check that `c` and `tol` are positive and `max_iter` is non-zero.
    pub fn validate(&self) -> Result<()> {
        if !(self.c.is_finite() && self.c > 0.0) {
            return Err(MosaicError::config(format!(
                "c must be a positive number, got {}",
                self.c
            )));
        }
        if !(self.tol.is_finite() && self.tol > 0.0) {
            return Err(MosaicError::config(format!(
                "tol must be a positive number, got {}",
                self.tol
            )));
        }
        if self.max_iter == 0 {
            return Err(MosaicError::config("max_iter must be at least 1"));
        }
        Ok(())
    }
}

/// One hyperplane `w · x + b`.
#[derive(Debug, Clone)]
struct Hyperplane {
    weights: Vec<f64>,
    bias: f64,
    iterations: usize,
    converged: bool,
}

impl Hyperplane {
    fn decision(&self, x: &FeatureMatrix, row: usize) -> f64 {
        x.row_dot(row, &self.weights) + self.bias
    }
}

#[derive(Debug, Clone)]
struct Fitted {
    classes: Vec<usize>,
    n_features: usize,
    /// One plane for two classes, one per class otherwise.
    planes: Vec<Hyperplane>,
}

/// Hinge-loss linear SVM with a bias term.
///
/// Two classes train a single plane whose positive side is the larger class
/// index. More classes train one plane per class, one-vs-rest, and predict the
/// class with the highest decision value.
///
/// # Examples
///
/// ```
/// use mosaic::matrix::FeatureMatrix;
/// use mosaic::ml::{LinearSvc, SvcConfig};
/// use ndarray::array;
///
/// let x = FeatureMatrix::from(array![[0.0, 1.0], [0.0, 2.0], [3.0, 0.0], [4.0, 0.0]]);
/// let mut svc = LinearSvc::new(SvcConfig::default());
/// svc.fit(&x, &[0, 0, 1, 1]).unwrap();
/// assert_eq!(svc.predict(&x).unwrap(), vec![0, 0, 1, 1]);
/// ```
#[derive(Debug, Clone)]
pub struct LinearSvc {
    config: SvcConfig,
    fitted: Option<Fitted>,
}

impl LinearSvc {
    /// Create an untrained classifier.
    pub fn new(config: SvcConfig) -> Self {
        Self {
            config,
            fitted: None,
        }
    }

    /// The configuration this classifier was built with.
    pub fn config(&self) -> &SvcConfig {
        &self.config
    }

    /// Train on `x` with one label per row.
    pub fn fit(&mut self, x: &FeatureMatrix, labels: &[usize]) -> Result<()> {
        self.config.validate()?;
        if labels.len() != x.n_rows() {
            return Err(MosaicError::shape(format!(
                "{} labels for {} rows",
                labels.len(),
                x.n_rows()
            )));
        }

        let mut classes = labels.to_vec();
        classes.sort_unstable();
        classes.dedup();
        if classes.len() < 2 {
            return Err(MosaicError::model(format!(
                "need at least two classes to train, got {}",
                classes.len()
            )));
        }

        let positives: Vec<usize> = if classes.len() == 2 {
            vec![classes[1]]
        } else {
            classes.clone()
        };

        let planes: Vec<Hyperplane> = positives
            .par_iter()
            .map(|&positive| {
                let signs: Vec<f64> = labels
                    .iter()
                    .map(|&l| if l == positive { 1.0 } else { -1.0 })
                    .collect();
                let plane = self.solve(x, &signs);
                debug!(
                    "class {positive}: {} iterations, converged={}",
                    plane.iterations, plane.converged
                );
                plane
            })
            .collect();

        let unconverged = planes.iter().filter(|p| !p.converged).count();
        if unconverged > 0 {
            warn!(
                "solver did not converge for {unconverged} of {} planes within {} iterations; consider increasing max_iter",
                planes.len(),
                self.config.max_iter
            );
        }

        info!(
            "trained linear svc: {} classes, {} features, {} rows",
            classes.len(),
            x.n_cols(),
            x.n_rows()
        );

        self.fitted = Some(Fitted {
            classes,
            n_features: x.n_cols(),
            planes,
        });
        Ok(())
    }

    /// Dual coordinate descent for `min ½‖w‖² + C Σ max(0, 1 − yᵢ(w·xᵢ + b))`.
    ///
    /// The bias is learned as the weight of a constant feature equal to 1.
    fn solve(&self, x: &FeatureMatrix, signs: &[f64]) -> Hyperplane {
        let n = x.n_rows();
        let c = self.config.c;
        let mut weights = vec![0.0; x.n_cols()];
        let mut bias = 0.0;
        let mut alpha = vec![0.0; n];
        let diagonal: Vec<f64> = (0..n).map(|i| x.row_squared_norm(i) + 1.0).collect();

        let mut rng = StdRng::seed_from_u64(self.config.seed);
        let mut order: Vec<usize> = (0..n).collect();

        let mut iterations = 0;
        let mut converged = false;
        while iterations < self.config.max_iter {
            iterations += 1;
            order.shuffle(&mut rng);

            let mut pg_max = f64::NEG_INFINITY;
            let mut pg_min = f64::INFINITY;
            for &i in &order {
                let y = signs[i];
                let gradient = y * (x.row_dot(i, &weights) + bias) - 1.0;

                let projected = if alpha[i] == 0.0 {
                    gradient.min(0.0)
                } else if alpha[i] == c {
                    gradient.max(0.0)
                } else {
                    gradient
                };
                pg_max = pg_max.max(projected);
                pg_min = pg_min.min(projected);

                if projected.abs() > 1e-12 {
                    let previous = alpha[i];
                    alpha[i] = (previous - gradient / diagonal[i]).clamp(0.0, c);
                    let step = (alpha[i] - previous) * y;
                    x.add_scaled_row(i, step, &mut weights);
                    bias += step;
                }
            }

            if pg_max - pg_min <= self.config.tol {
                converged = true;
                break;
            }
        }

        Hyperplane {
            weights,
            bias,
            iterations,
            converged,
        }
    }

    fn fitted(&self, x: &FeatureMatrix) -> Result<&Fitted> {
        let fitted = self
            .fitted
            .as_ref()
            .ok_or_else(|| MosaicError::not_fitted("linear_svc"))?;
        if x.n_cols() != fitted.n_features {
            return Err(MosaicError::shape(format!(
                "classifier was trained on {} features, got {}",
                fitted.n_features,
                x.n_cols()
            )));
        }
        Ok(fitted)
    }

    /// Signed distance of each row to each plane, N × planes.
    pub fn decision_function(&self, x: &FeatureMatrix) -> Result<Array2<f64>> {
        let fitted = self.fitted(x)?;
        Ok(Array2::from_shape_fn(
            (x.n_rows(), fitted.planes.len()),
            |(row, plane)| fitted.planes[plane].decision(x, row),
        ))
    }

    /// Predicted label for every row.
    pub fn predict(&self, x: &FeatureMatrix) -> Result<Vec<usize>> {
        let fitted = self.fitted(x)?;
        let scores = self.decision_function(x)?;

        Ok(scores
            .rows()
            .into_iter()
            .map(|row| {
                if fitted.planes.len() == 1 {
                    if row[0] > 0.0 {
                        fitted.classes[1]
                    } else {
                        fitted.classes[0]
                    }
                } else {
                    let best = row
                        .iter()
                        .enumerate()
                        .fold((0, f64::NEG_INFINITY), |best, (i, &s)| {
                            if s > best.1 { (i, s) } else { best }
                        })
                        .0;
                    fitted.classes[best]
                }
            })
            .collect())
    }

    /// Class labels seen during training, ascending.
    pub fn classes(&self) -> Option<&[usize]> {
        self.fitted.as_ref().map(|f| f.classes.as_slice())
    }

    /// Whether every plane met the tolerance.
    pub fn converged(&self) -> Option<bool> {
        self.fitted
            .as_ref()
            .map(|f| f.planes.iter().all(|p| p.converged))
    }
}
