//! Compressed sparse row matrix.
//!
//! TF-IDF output over a newsgroup body vocabulary has tens of thousands of
//! columns with a few hundred non-zeros per row, so it is stored in CSR form.

use ndarray::Array2;
use serde::{Deserialize, Serialize};

use crate::error::{MosaicError, Result};

/// A row-major sparse matrix of `f64`.
///
/// Column indices within a row are strictly increasing.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CsrMatrix {
    n_rows: usize,
    n_cols: usize,
    indptr: Vec<usize>,
    indices: Vec<usize>,
    data: Vec<f64>,
}

impl CsrMatrix {
    /// Create an all-zero matrix.
    pub fn zeros(n_rows: usize, n_cols: usize) -> Self {
        CsrMatrix {
            n_rows,
            n_cols,
            indptr: vec![0; n_rows + 1],
            indices: Vec::new(),
            data: Vec::new(),
        }
    }

    /// Build a matrix from per-row `(column, value)` entries.
    ///
    /// Entries are sorted by column; duplicate columns within a row are summed
    /// and explicit zeros are dropped.
    pub fn from_rows(n_cols: usize, rows: Vec<Vec<(usize, f64)>>) -> Result<Self> {
        let n_rows = rows.len();
        let mut indptr = Vec::with_capacity(n_rows + 1);
        let mut indices = Vec::new();
        let mut data = Vec::new();
        indptr.push(0);

        for (row_idx, mut row) in rows.into_iter().enumerate() {
            row.sort_by_key(|&(col, _)| col);
            let mut last_col: Option<usize> = None;
            for (col, value) in row {
                if col >= n_cols {
                    return Err(MosaicError::shape(format!(
                        "column {col} out of bounds for {n_cols} columns in row {row_idx}"
                    )));
                }
                if last_col == Some(col) {
                    if let Some(last) = data.last_mut() {
                        *last += value;
                    }
                } else {
                    indices.push(col);
                    data.push(value);
                    last_col = Some(col);
                }
            }
            // Drop zeros produced by summing or given explicitly.
            let start = indptr[row_idx];
            let mut write = start;
            for read in start..indices.len() {
                if data[read] != 0.0 {
                    indices[write] = indices[read];
                    data[write] = data[read];
                    write += 1;
                }
            }
            indices.truncate(write);
            data.truncate(write);
            indptr.push(indices.len());
        }

        Ok(CsrMatrix {
            n_rows,
            n_cols,
            indptr,
            indices,
            data,
        })
    }

    /// Convert a dense matrix, keeping only non-zero entries.
    pub fn from_dense(dense: &Array2<f64>) -> Self {
        let (n_rows, n_cols) = dense.dim();
        let mut indptr = Vec::with_capacity(n_rows + 1);
        let mut indices = Vec::new();
        let mut data = Vec::new();
        indptr.push(0);

        for row in dense.rows() {
            for (col, &value) in row.iter().enumerate() {
                if value != 0.0 {
                    indices.push(col);
                    data.push(value);
                }
            }
            indptr.push(indices.len());
        }

        CsrMatrix {
            n_rows,
            n_cols,
            indptr,
            indices,
            data,
        }
    }

    /// Number of rows.
    pub fn n_rows(&self) -> usize {
        self.n_rows
    }

    /// Number of columns.
    pub fn n_cols(&self) -> usize {
        self.n_cols
    }

    /// Number of stored (non-zero) entries.
    pub fn nnz(&self) -> usize {
        self.data.len()
    }

    /// Column indices and values of one row.
    pub fn row(&self, row: usize) -> (&[usize], &[f64]) {
        let start = self.indptr[row];
        let end = self.indptr[row + 1];
        (&self.indices[start..end], &self.data[start..end])
    }

    /// Value at `(row, col)`, zero when not stored.
    pub fn get(&self, row: usize, col: usize) -> f64 {
        let (indices, values) = self.row(row);
        match indices.binary_search(&col) {
            Ok(pos) => values[pos],
            Err(_) => 0.0,
        }
    }

    /// Multiply every stored value by `factor`.
    pub fn scale(&mut self, factor: f64) {
        for value in &mut self.data {
            *value *= factor;
        }
    }

    /// Dot product of one row with a dense vector of length `n_cols`.
    pub fn row_dot(&self, row: usize, vector: &[f64]) -> f64 {
        let (indices, values) = self.row(row);
        indices
            .iter()
            .zip(values)
            .map(|(&col, &value)| value * vector[col])
            .sum()
    }

    /// Squared L2 norm of one row.
    pub fn row_squared_norm(&self, row: usize) -> f64 {
        let (_, values) = self.row(row);
        values.iter().map(|v| v * v).sum()
    }

    /// `X · v` for a vector of length `n_cols`.
    pub fn mul_vec(&self, vector: &[f64]) -> Vec<f64> {
        (0..self.n_rows).map(|row| self.row_dot(row, vector)).collect()
    }

    /// `Xᵀ · u` for a vector of length `n_rows`.
    pub fn t_mul_vec(&self, vector: &[f64]) -> Vec<f64> {
        let mut out = vec![0.0; self.n_cols];
        for (row, &weight) in vector.iter().enumerate().take(self.n_rows) {
            if weight == 0.0 {
                continue;
            }
            let (indices, values) = self.row(row);
            for (&col, &value) in indices.iter().zip(values) {
                out[col] += weight * value;
            }
        }
        out
    }

    /// Expand into a dense matrix.
    pub fn to_dense(&self) -> Array2<f64> {
        let mut dense = Array2::zeros((self.n_rows, self.n_cols));
        for row in 0..self.n_rows {
            let (indices, values) = self.row(row);
            for (&col, &value) in indices.iter().zip(values) {
                dense[[row, col]] = value;
            }
        }
        dense
    }

    /// Concatenate matrices column-wise. All blocks must share a row count.
    pub fn hstack(blocks: &[&CsrMatrix]) -> Result<CsrMatrix> {
        let Some(first) = blocks.first() else {
            return Ok(CsrMatrix::zeros(0, 0));
        };
        let n_rows = first.n_rows;
        if let Some(bad) = blocks.iter().find(|b| b.n_rows != n_rows) {
            return Err(MosaicError::shape(format!(
                "cannot stack blocks with {} and {} rows",
                n_rows, bad.n_rows
            )));
        }

        let n_cols = blocks.iter().map(|b| b.n_cols).sum();
        let nnz = blocks.iter().map(|b| b.nnz()).sum();
        let mut indptr = Vec::with_capacity(n_rows + 1);
        let mut indices = Vec::with_capacity(nnz);
        let mut data = Vec::with_capacity(nnz);
        indptr.push(0);

        for row in 0..n_rows {
            let mut offset = 0;
            for block in blocks {
                let (cols, values) = block.row(row);
                indices.extend(cols.iter().map(|&c| c + offset));
                data.extend_from_slice(values);
                offset += block.n_cols;
            }
            indptr.push(indices.len());
        }

        Ok(CsrMatrix {
            n_rows,
            n_cols,
            indptr,
            indices,
            data,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use ndarray::array;

    #[test]
    fn test_from_rows_sorts_and_merges() {
        let m = CsrMatrix::from_rows(4, vec![vec![(3, 1.0), (0, 2.0), (3, 1.0)], vec![]]).unwrap();
        assert_eq!(m.n_rows(), 2);
        assert_eq!(m.nnz(), 2);
        assert_eq!(m.row(0), (&[0usize, 3][..], &[2.0, 2.0][..]));
        assert_eq!(m.get(1, 2), 0.0);
    }

    #[test]
    fn test_from_rows_rejects_out_of_bounds() {
        assert!(CsrMatrix::from_rows(2, vec![vec![(2, 1.0)]]).is_err());
    }

    #[test]
    fn test_dense_round_trip_and_products() {
        let dense = array![[1.0, 0.0, 2.0], [0.0, 3.0, 0.0]];
        let m = CsrMatrix::from_dense(&dense);
        assert_eq!(m.nnz(), 3);
        assert_eq!(m.to_dense(), dense);

        assert_eq!(m.mul_vec(&[1.0, 1.0, 1.0]), vec![3.0, 3.0]);
        assert_eq!(m.t_mul_vec(&[1.0, 2.0]), vec![1.0, 6.0, 2.0]);
        assert_eq!(m.row_squared_norm(0), 5.0);
    }

    #[test]
    fn test_hstack() {
        let a = CsrMatrix::from_dense(&array![[1.0], [0.0]]);
        let b = CsrMatrix::from_dense(&array![[0.0, 2.0], [3.0, 0.0]]);
        let stacked = CsrMatrix::hstack(&[&a, &b]).unwrap();

        assert_eq!(stacked.to_dense(), array![[1.0, 0.0, 2.0], [0.0, 3.0, 0.0]]);
    }

    #[test]
    fn test_hstack_row_mismatch() {
        let a = CsrMatrix::zeros(2, 1);
        let b = CsrMatrix::zeros(3, 1);
        assert!(CsrMatrix::hstack(&[&a, &b]).is_err());
    }
}
