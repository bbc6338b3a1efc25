//! Truncated singular value decomposition (latent semantic analysis).

use log::{debug, info};
use ndarray::{Array1, Array2, s};
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use rayon::prelude::*;
use serde::{Deserialize, Serialize};

use crate::error::{MosaicError, Result};
use crate::matrix::FeatureMatrix;
use crate::matrix::linalg::{orthonormalize_rows, symmetric_eigen};
use crate::pipeline::batch::Batch;
use crate::pipeline::transformer::Transformer;

const JACOBI_SWEEPS: usize = 100;

/// Configuration for a [`TruncatedSvd`].
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SvdConfig {
    /// Number of components to keep.
    pub n_components: usize,
    /// Power iterations of the randomized range finder.
    pub n_iter: usize,
    /// Extra basis vectors beyond `n_components` used while iterating.
    pub n_oversamples: usize,
    /// Seed for the random starting basis.
    pub seed: u64,
}

impl Default for SvdConfig {
    fn default() -> Self {
        Self {
            n_components: 50,
            n_iter: 5,
            n_oversamples: 10,
            seed: 42,
        }
    }
}

impl SvdConfig {
    /// Set the number of components.
    pub fn n_components(mut self, n_components: usize) -> Self {
        self.n_components = n_components;
        self
    }

    /// Set the random seed.
    pub fn seed(mut self, seed: u64) -> Self {
        self.seed = seed;
        self
    }
}

#[derive(Debug, Clone)]
struct Decomposition {
    /// K × M, one unit component per row.
    components: Array2<f64>,
    singular_values: Array1<f64>,
    explained_variance_ratio: Array1<f64>,
}

/// Projects a feature matrix onto its top right singular vectors.
///
/// Fitting runs randomized subspace iteration on `XᵀX` followed by a
/// Rayleigh-Ritz step. Each component is sign-fixed so that its largest
/// magnitude entry is positive, making results deterministic for a seed.
#[derive(Debug, Clone)]
pub struct TruncatedSvd {
    config: SvdConfig,
    decomposition: Option<Decomposition>,
}

impl TruncatedSvd {
    /// Create an unfitted reducer.
    pub fn new(config: SvdConfig) -> Self {
        Self {
            config,
            decomposition: None,
        }
    }

    /// The configuration this reducer was built with.
    pub fn config(&self) -> &SvdConfig {
        &self.config
    }

    /// Learn the top components of `x`.
    pub fn fit_matrix(&mut self, x: &FeatureMatrix) -> Result<()> {
        let (n_rows, n_features) = x.shape();
        let k = self.config.n_components;
        if k == 0 || k > n_features {
            return Err(MosaicError::config(format!(
                "n_components must be between 1 and {n_features}, got {k}"
            )));
        }
        if n_rows == 0 {
            return Err(MosaicError::shape("cannot fit SVD on a matrix with no rows"));
        }

        let width = (k + self.config.n_oversamples).min(n_features);
        let mut rng = StdRng::seed_from_u64(self.config.seed);
        let mut basis =
            Array2::from_shape_fn((width, n_features), |_| rng.random_range(-1.0..1.0));
        orthonormalize_rows(&mut basis);

        for iteration in 0..self.config.n_iter {
            basis = Self::gram_step(x, &basis);
            orthonormalize_rows(&mut basis);
            debug!("svd power iteration {}/{}", iteration + 1, self.config.n_iter);
        }

        // Rayleigh-Ritz: eigen-decompose B XᵀX Bᵀ within the subspace.
        let projected = x.project(&basis)?;
        let small = projected.t().dot(&projected);
        let (eigenvalues, eigenvectors) = symmetric_eigen(&small, JACOBI_SWEEPS);

        let mut components = eigenvectors
            .t()
            .dot(&basis)
            .slice(s![..k, ..])
            .to_owned();
        for mut component in components.rows_mut() {
            let pivot = component
                .iter()
                .copied()
                .fold(0.0f64, |best, v| if v.abs() > best.abs() { v } else { best });
            if pivot < 0.0 {
                component.mapv_inplace(|v| -v);
            }
        }

        let singular_values: Array1<f64> = eigenvalues
            .iter()
            .take(k)
            .map(|&lambda| lambda.max(0.0).sqrt())
            .collect();

        let total_variance: f64 = x.column_variances().iter().sum();
        let reduced = FeatureMatrix::Dense(x.project(&components)?);
        let explained_variance_ratio: Array1<f64> = reduced
            .column_variances()
            .into_iter()
            .map(|v| if total_variance > 0.0 { v / total_variance } else { 0.0 })
            .collect();

        info!(
            "truncated svd: {} components from {} features, {:.4} variance explained",
            k,
            n_features,
            explained_variance_ratio.sum()
        );

        self.decomposition = Some(Decomposition {
            components,
            singular_values,
            explained_variance_ratio,
        });
        Ok(())
    }

    /// `XᵀX bᵢ` for every basis row `bᵢ`.
    fn gram_step(x: &FeatureMatrix, basis: &Array2<f64>) -> Array2<f64> {
        let rows: Vec<Vec<f64>> = (0..basis.nrows())
            .into_par_iter()
            .map(|i| x.t_mul_vec(&x.mul_vec(&basis.row(i).to_vec())))
            .collect();

        let mut next = Array2::zeros(basis.raw_dim());
        for (mut target, row) in next.rows_mut().into_iter().zip(rows) {
            target.assign(&Array1::from(row));
        }
        next
    }

    /// Project `x` onto the learned components.
    pub fn transform_matrix(&self, x: &FeatureMatrix) -> Result<Array2<f64>> {
        let decomposition = self
            .decomposition
            .as_ref()
            .ok_or_else(|| MosaicError::not_fitted("truncated_svd"))?;
        x.project(&decomposition.components)
    }

    /// K × M matrix of components, one per row.
    pub fn components(&self) -> Option<&Array2<f64>> {
        self.decomposition.as_ref().map(|d| &d.components)
    }

    /// Singular values, largest first.
    pub fn singular_values(&self) -> Option<&Array1<f64>> {
        self.decomposition.as_ref().map(|d| &d.singular_values)
    }

    /// Fraction of the input's total variance captured by each component.
    pub fn explained_variance_ratio(&self) -> Option<&Array1<f64>> {
        self.decomposition
            .as_ref()
            .map(|d| &d.explained_variance_ratio)
    }
}

impl Transformer for TruncatedSvd {
    fn fit(&mut self, input: &Batch, _labels: Option<&[usize]>) -> Result<()> {
        let x = input.as_matrix(self.name())?;
        self.fit_matrix(x)
    }

    fn transform(&self, input: &Batch) -> Result<Batch> {
        let x = input.as_matrix(self.name())?;
        Ok(Batch::Matrix(FeatureMatrix::Dense(self.transform_matrix(x)?)))
    }

    fn feature_names(&self) -> Option<Vec<String>> {
        self.decomposition.as_ref().map(|d| {
            (0..d.components.nrows())
                .map(|i| format!("component_{i}"))
                .collect()
        })
    }

    fn name(&self) -> &'static str {
        "truncated_svd"
    }
}
