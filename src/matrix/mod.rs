//! Feature matrices produced by vectorizers and combined by the feature union.
//!
//! A [`FeatureMatrix`] has one row per document and one column per feature.
//! Text vectorizers produce sparse blocks, reducers and record vectorizers
//! produce dense ones. Stacking keeps the result sparse when any block is.

pub mod linalg;
pub mod sparse;

use ndarray::{Array2, Axis, concatenate};
use serde::{Deserialize, Serialize};

use crate::error::{MosaicError, Result};

pub use sparse::CsrMatrix;

/// A numeric N × M feature matrix.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum FeatureMatrix {
    /// Row-major dense storage.
    Dense(Array2<f64>),
    /// Compressed sparse rows.
    Sparse(CsrMatrix),
}

impl FeatureMatrix {
    /// Number of rows (documents).
    pub fn n_rows(&self) -> usize {
        match self {
            FeatureMatrix::Dense(m) => m.nrows(),
            FeatureMatrix::Sparse(m) => m.n_rows(),
        }
    }

    /// Number of columns (features).
    pub fn n_cols(&self) -> usize {
        match self {
            FeatureMatrix::Dense(m) => m.ncols(),
            FeatureMatrix::Sparse(m) => m.n_cols(),
        }
    }

    /// `(rows, columns)`.
    pub fn shape(&self) -> (usize, usize) {
        (self.n_rows(), self.n_cols())
    }

    /// Whether this matrix uses sparse storage.
    pub fn is_sparse(&self) -> bool {
        matches!(self, FeatureMatrix::Sparse(_))
    }

    /// Value at `(row, col)`.
    pub fn get(&self, row: usize, col: usize) -> f64 {
        match self {
            FeatureMatrix::Dense(m) => m[[row, col]],
            FeatureMatrix::Sparse(m) => m.get(row, col),
        }
    }

    /// Multiply every entry by `factor`.
    pub fn scale(&mut self, factor: f64) {
        match self {
            FeatureMatrix::Dense(m) => m.mapv_inplace(|v| v * factor),
            FeatureMatrix::Sparse(m) => m.scale(factor),
        }
    }

    /// Return a copy scaled by `factor`.
    pub fn scaled(mut self, factor: f64) -> Self {
        if factor != 1.0 {
            self.scale(factor);
        }
        self
    }

    /// Dot product of one row with `vector`.
    pub fn row_dot(&self, row: usize, vector: &[f64]) -> f64 {
        match self {
            FeatureMatrix::Dense(m) => m.row(row).iter().zip(vector).map(|(a, b)| a * b).sum(),
            FeatureMatrix::Sparse(m) => m.row_dot(row, vector),
        }
    }

    /// Squared Euclidean norm of one row.
    pub fn row_squared_norm(&self, row: usize) -> f64 {
        match self {
            FeatureMatrix::Dense(m) => m.row(row).iter().map(|v| v * v).sum(),
            FeatureMatrix::Sparse(m) => m.row_squared_norm(row),
        }
    }

    /// `target += factor · row`.
    pub fn add_scaled_row(&self, row: usize, factor: f64, target: &mut [f64]) {
        match self {
            FeatureMatrix::Dense(m) => {
                for (acc, value) in target.iter_mut().zip(m.row(row).iter()) {
                    *acc += factor * value;
                }
            }
            FeatureMatrix::Sparse(m) => {
                let (indices, values) = m.row(row);
                for (&col, &value) in indices.iter().zip(values) {
                    target[col] += factor * value;
                }
            }
        }
    }

    /// `X · v` for a vector of length `n_cols`.
    pub fn mul_vec(&self, vector: &[f64]) -> Vec<f64> {
        match self {
            FeatureMatrix::Dense(m) => m
                .rows()
                .into_iter()
                .map(|row| row.iter().zip(vector).map(|(a, b)| a * b).sum())
                .collect(),
            FeatureMatrix::Sparse(m) => m.mul_vec(vector),
        }
    }

    /// `Xᵀ · u` for a vector of length `n_rows`.
    pub fn t_mul_vec(&self, vector: &[f64]) -> Vec<f64> {
        match self {
            FeatureMatrix::Dense(m) => {
                let mut out = vec![0.0; m.ncols()];
                for (row, &weight) in m.rows().into_iter().zip(vector) {
                    for (acc, value) in out.iter_mut().zip(row.iter()) {
                        *acc += weight * value;
                    }
                }
                out
            }
            FeatureMatrix::Sparse(m) => m.t_mul_vec(vector),
        }
    }

    /// `X · Bᵀ` where `basis` is K × n_cols; the result is dense N × K.
    pub fn project(&self, basis: &Array2<f64>) -> Result<Array2<f64>> {
        if basis.ncols() != self.n_cols() {
            return Err(MosaicError::shape(format!(
                "cannot project {} features onto a basis of width {}",
                self.n_cols(),
                basis.ncols()
            )));
        }
        match self {
            FeatureMatrix::Dense(m) => Ok(m.dot(&basis.t())),
            FeatureMatrix::Sparse(m) => {
                let k = basis.nrows();
                let mut out = Array2::zeros((m.n_rows(), k));
                for row in 0..m.n_rows() {
                    let (indices, values) = m.row(row);
                    for c in 0..k {
                        let component = basis.row(c);
                        out[[row, c]] = indices
                            .iter()
                            .zip(values)
                            .map(|(&col, &value)| value * component[col])
                            .sum();
                    }
                }
                Ok(out)
            }
        }
    }

    /// Population variance of every column.
    pub fn column_variances(&self) -> Vec<f64> {
        let n_cols = self.n_cols();
        let n = self.n_rows() as f64;
        if n == 0.0 {
            return vec![0.0; n_cols];
        }

        let mut sum = vec![0.0; n_cols];
        let mut sum_sq = vec![0.0; n_cols];
        match self {
            FeatureMatrix::Dense(m) => {
                for row in m.rows() {
                    for (col, &value) in row.iter().enumerate() {
                        sum[col] += value;
                        sum_sq[col] += value * value;
                    }
                }
            }
            FeatureMatrix::Sparse(m) => {
                for row in 0..m.n_rows() {
                    let (indices, values) = m.row(row);
                    for (&col, &value) in indices.iter().zip(values) {
                        sum[col] += value;
                        sum_sq[col] += value * value;
                    }
                }
            }
        }

        sum.iter()
            .zip(&sum_sq)
            .map(|(s, sq)| {
                let mean = s / n;
                (sq / n - mean * mean).max(0.0)
            })
            .collect()
    }

    /// Dense copy of this matrix.
    pub fn to_dense(&self) -> Array2<f64> {
        match self {
            FeatureMatrix::Dense(m) => m.clone(),
            FeatureMatrix::Sparse(m) => m.to_dense(),
        }
    }

    /// Consume into CSR form.
    pub fn into_csr(self) -> CsrMatrix {
        match self {
            FeatureMatrix::Dense(m) => CsrMatrix::from_dense(&m),
            FeatureMatrix::Sparse(m) => m,
        }
    }

    /// Concatenate blocks column-wise, preserving row order.
    ///
    /// The result is sparse if any block is sparse. Blocks with differing row
    /// counts are a shape error.
    pub fn hstack(blocks: Vec<FeatureMatrix>) -> Result<FeatureMatrix> {
        let Some(first) = blocks.first() else {
            return Err(MosaicError::shape("cannot stack an empty list of matrices"));
        };
        let n_rows = first.n_rows();
        if let Some(bad) = blocks.iter().find(|b| b.n_rows() != n_rows) {
            return Err(MosaicError::shape(format!(
                "feature blocks disagree on row count: {} vs {}",
                n_rows,
                bad.n_rows()
            )));
        }

        if blocks.iter().any(FeatureMatrix::is_sparse) {
            let csr: Vec<CsrMatrix> = blocks.into_iter().map(FeatureMatrix::into_csr).collect();
            let refs: Vec<&CsrMatrix> = csr.iter().collect();
            return Ok(FeatureMatrix::Sparse(CsrMatrix::hstack(&refs)?));
        }

        let dense: Vec<Array2<f64>> = blocks
            .into_iter()
            .map(|b| match b {
                FeatureMatrix::Dense(m) => m,
                FeatureMatrix::Sparse(m) => m.to_dense(),
            })
            .collect();
        let views: Vec<_> = dense.iter().map(|m| m.view()).collect();
        let stacked = concatenate(Axis(1), &views)
            .map_err(|e| MosaicError::shape(format!("failed to stack blocks: {e}")))?;
        Ok(FeatureMatrix::Dense(stacked))
    }
}

impl From<Array2<f64>> for FeatureMatrix {
    fn from(m: Array2<f64>) -> Self {
        FeatureMatrix::Dense(m)
    }
}

impl From<CsrMatrix> for FeatureMatrix {
    fn from(m: CsrMatrix) -> Self {
        FeatureMatrix::Sparse(m)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use ndarray::array;

    #[test]
    fn test_dense_hstack() {
        let a = FeatureMatrix::from(array![[1.0], [2.0]]);
        let b = FeatureMatrix::from(array![[3.0, 4.0], [5.0, 6.0]]);
        let stacked = FeatureMatrix::hstack(vec![a, b]).unwrap();

        assert!(!stacked.is_sparse());
        assert_eq!(stacked.to_dense(), array![[1.0, 3.0, 4.0], [2.0, 5.0, 6.0]]);
    }

    #[test]
    fn test_mixed_hstack_is_sparse() {
        let a = FeatureMatrix::from(CsrMatrix::from_dense(&array![[0.0, 1.0], [2.0, 0.0]]));
        let b = FeatureMatrix::from(array![[7.0], [8.0]]);
        let stacked = FeatureMatrix::hstack(vec![a, b]).unwrap();

        assert!(stacked.is_sparse());
        assert_eq!(stacked.shape(), (2, 3));
        assert_eq!(stacked.get(0, 2), 7.0);
        assert_eq!(stacked.get(1, 0), 2.0);
    }

    #[test]
    fn test_hstack_row_mismatch() {
        let a = FeatureMatrix::from(Array2::<f64>::zeros((2, 1)));
        let b = FeatureMatrix::from(Array2::<f64>::zeros((3, 1)));
        let err = FeatureMatrix::hstack(vec![a, b]).unwrap_err();
        assert!(matches!(err, MosaicError::Shape(_)));
    }

    #[test]
    fn test_scaled() {
        let m = FeatureMatrix::from(array![[2.0, 4.0]]).scaled(0.5);
        assert_eq!(m.to_dense(), array![[1.0, 2.0]]);
    }

    #[test]
    fn test_products_agree() {
        let dense = array![[1.0, 0.0, 2.0], [0.0, 3.0, 1.0]];
        let d = FeatureMatrix::from(dense.clone());
        let s = FeatureMatrix::from(CsrMatrix::from_dense(&dense));

        assert_eq!(d.mul_vec(&[1.0, 2.0, 3.0]), s.mul_vec(&[1.0, 2.0, 3.0]));
        assert_eq!(d.t_mul_vec(&[1.0, -1.0]), s.t_mul_vec(&[1.0, -1.0]));

        let basis = array![[1.0, 1.0, 1.0]];
        assert_eq!(d.project(&basis).unwrap(), s.project(&basis).unwrap());
    }

    #[test]
    fn test_column_variances() {
        let dense = array![[1.0, 0.0], [3.0, 0.0]];
        let d = FeatureMatrix::from(dense.clone());
        let s = FeatureMatrix::from(CsrMatrix::from_dense(&dense));

        assert_eq!(d.column_variances(), vec![1.0, 0.0]);
        assert_eq!(s.column_variances(), vec![1.0, 0.0]);
    }
}
