//! Matrix multiplication with shape validation
//!
//! Plain triple-loop products in f64 accumulation. The inner dimension is
//! accumulated into a local sum so cumulative rounding stays O(k * ulp)
//! per output element.

use crate::error::{Error, Result};
use crate::matrix::MatrixBuffer;

/// Matrix-matrix product `A @ B`.
///
/// Precondition: `a.cols() == b.rows()`. The result is row-major with shape
/// `(a.rows(), b.cols())`. Matrix-vector multiplication is the degenerate
/// case `b.cols() == 1`; see [`matvec`] for the slice-based convenience.
///
/// # Errors
///
/// `Error::ShapeMismatch` when the inner dimensions disagree.
pub fn matmul(a: &MatrixBuffer<f64>, b: &MatrixBuffer<f64>) -> Result<MatrixBuffer<f64>> {
    let (m, ka) = a.shape();
    let (kb, n) = b.shape();
    if ka != kb {
        return Err(Error::ShapeMismatch {
            expected: vec![ka, n],
            got: vec![kb, n],
        });
    }

    let mut out = vec![0.0; m * n];
    for i in 0..m {
        for j in 0..n {
            let mut sum = 0.0;
            for k in 0..ka {
                sum += a.get(i, k) * b.get(k, j);
            }
            out[i * n + j] = sum;
        }
    }
    MatrixBuffer::from_vec(m, n, out)
}

/// Matrix-vector product `A @ x`.
///
/// # Errors
///
/// `Error::ShapeMismatch` when `x.len() != a.cols()`.
pub fn matvec(a: &MatrixBuffer<f64>, x: &[f64]) -> Result<Vec<f64>> {
    let (m, k) = a.shape();
    if x.len() != k {
        return Err(Error::ShapeMismatch {
            expected: vec![k],
            got: vec![x.len()],
        });
    }

    let mut out = vec![0.0; m];
    for i in 0..m {
        let mut sum = 0.0;
        for (j, xj) in x.iter().enumerate() {
            sum += a.get(i, j) * xj;
        }
        out[i] = sum;
    }
    Ok(out)
}
