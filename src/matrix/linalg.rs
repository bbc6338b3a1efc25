//! Small dense linear algebra kernels used by the truncated SVD.

use ndarray::{Array1, Array2, Axis};

/// Rows whose norm falls below this after orthogonalisation are zeroed.
const RANK_EPSILON: f64 = 1e-10;

/// Relative off-diagonal mass at which Jacobi rotations stop.
const JACOBI_TOLERANCE: f64 = 1e-22;

/// Orthonormalise the rows of `basis` in place (modified Gram-Schmidt, two passes).
///
/// Rows that are linearly dependent on earlier rows become zero rows.
pub fn orthonormalize_rows(basis: &mut Array2<f64>) {
    let n = basis.nrows();
    for i in 0..n {
        for _ in 0..2 {
            for j in 0..i {
                let projection = basis.row(i).dot(&basis.row(j));
                if projection != 0.0 {
                    let prev = basis.row(j).to_owned();
                    basis.row_mut(i).scaled_add(-projection, &prev);
                }
            }
        }
        let norm = basis.row(i).dot(&basis.row(i)).sqrt();
        if norm > RANK_EPSILON {
            basis.row_mut(i).mapv_inplace(|v| v / norm);
        } else {
            basis.row_mut(i).fill(0.0);
        }
    }
}

/// Eigen-decomposition of a symmetric matrix by cyclic Jacobi rotations.
///
/// Returns eigenvalues sorted descending and the matching eigenvectors as the
/// columns of the second matrix.
pub fn symmetric_eigen(matrix: &Array2<f64>, max_sweeps: usize) -> (Array1<f64>, Array2<f64>) {
    let (values, vectors, _) = jacobi(matrix, max_sweeps);
    (values, vectors)
}

/// Cyclic Jacobi, also returning the number of sweeps run.
///
/// Stops once the off-diagonal mass is negligible relative to the squared
/// Frobenius norm of the input.
fn jacobi(matrix: &Array2<f64>, max_sweeps: usize) -> (Array1<f64>, Array2<f64>, usize) {
    let n = matrix.nrows();
    let mut a = matrix.clone();
    let mut v = Array2::<f64>::eye(n);
    let tolerance = JACOBI_TOLERANCE * matrix.iter().map(|x| x * x).sum::<f64>();

    let mut sweeps = 0;
    while sweeps < max_sweeps {
        let mut off_diagonal = 0.0;
        for p in 0..n {
            for q in (p + 1)..n {
                off_diagonal += a[[p, q]] * a[[p, q]];
            }
        }
        if off_diagonal <= tolerance {
            break;
        }
        sweeps += 1;

        for p in 0..n {
            for q in (p + 1)..n {
                let apq = a[[p, q]];
                if apq.abs() < 1e-300 {
                    continue;
                }
                let theta = (a[[q, q]] - a[[p, p]]) / (2.0 * apq);
                let t = theta.signum() / (theta.abs() + (theta * theta + 1.0).sqrt());
                let c = 1.0 / (t * t + 1.0).sqrt();
                let s = t * c;

                for k in 0..n {
                    let akp = a[[k, p]];
                    let akq = a[[k, q]];
                    a[[k, p]] = c * akp - s * akq;
                    a[[k, q]] = s * akp + c * akq;
                }
                for k in 0..n {
                    let apk = a[[p, k]];
                    let aqk = a[[q, k]];
                    a[[p, k]] = c * apk - s * aqk;
                    a[[q, k]] = s * apk + c * aqk;
                }
                for k in 0..n {
                    let vkp = v[[k, p]];
                    let vkq = v[[k, q]];
                    v[[k, p]] = c * vkp - s * vkq;
                    v[[k, q]] = s * vkp + c * vkq;
                }
            }
        }
    }

    let mut order: Vec<usize> = (0..n).collect();
    order.sort_by(|&i, &j| a[[j, j]].total_cmp(&a[[i, i]]));

    let values = Array1::from_iter(order.iter().map(|&i| a[[i, i]]));
    let vectors = v.select(Axis(1), &order);
    (values, vectors, sweeps)
}

#[cfg(test)]
mod tests {
    use super::*;
    use ndarray::array;

    #[test]
    fn test_orthonormalize_rows() {
        let mut basis = array![[3.0, 4.0, 0.0], [1.0, 1.0, 1.0], [6.0, 8.0, 0.0]];
        orthonormalize_rows(&mut basis);

        let r0 = basis.row(0);
        let r1 = basis.row(1);
        assert!((r0.dot(&r0) - 1.0).abs() < 1e-12);
        assert!((r1.dot(&r1) - 1.0).abs() < 1e-12);
        assert!(r0.dot(&r1).abs() < 1e-12);
        // Third row is parallel to the first.
        assert!(basis.row(2).iter().all(|&v| v == 0.0));
    }

    #[test]
    fn test_symmetric_eigen() {
        let m = array![[2.0, 1.0], [1.0, 2.0]];
        let (values, vectors) = symmetric_eigen(&m, 50);

        assert!((values[0] - 3.0).abs() < 1e-10);
        assert!((values[1] - 1.0).abs() < 1e-10);

        // A v = λ v for each column.
        for k in 0..2 {
            let col = vectors.column(k);
            let av = m.dot(&col);
            for i in 0..2 {
                assert!((av[i] - values[k] * col[i]).abs() < 1e-10);
            }
        }
    }

    #[test]
    fn test_symmetric_eigen_diagonal() {
        let m = array![[1.0, 0.0, 0.0], [0.0, 5.0, 0.0], [0.0, 0.0, 3.0]];
        let (values, _) = symmetric_eigen(&m, 10);
        assert_eq!(values.to_vec(), vec![5.0, 3.0, 1.0]);
    }

    #[test]
    fn test_jacobi_stops_early_on_large_eigenvalues() {
        // Gram matrices of real corpora have entries far above 1.
        let m = array![[4.0, 1.0, 0.5], [1.0, 3.0, 0.25], [0.5, 0.25, 2.0]].mapv(|x| x * 1e8);
        let (values, vectors, sweeps) = jacobi(&m, 100);
        assert!(sweeps < 20, "ran {sweeps} sweeps");

        for k in 0..3 {
            let col = vectors.column(k);
            let av = m.dot(&col);
            for i in 0..3 {
                assert!((av[i] - values[k] * col[i]).abs() < 1e-6 * values[0]);
            }
        }
    }

    #[test]
    fn test_jacobi_zero_matrix() {
        let (values, _, sweeps) = jacobi(&Array2::zeros((2, 2)), 10);
        assert_eq!(sweeps, 0);
        assert_eq!(values.to_vec(), vec![0.0, 0.0]);
    }
}
