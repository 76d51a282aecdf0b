//! LU factorization with partial pivoting
//!
//! Gaussian elimination with row interchanges: at each elimination step the
//! pivot is the largest-magnitude entry in the active column, which bounds
//! the growth factor on non-diagonally-dominant inputs. An exactly-zero
//! pivot after pivoting means the matrix is singular to working precision;
//! the factorization still completes and the condition is reported through
//! the non-fatal [`PluFactorization::singular`] flag rather than an error.

use crate::error::{Error, Result};
use crate::matrix::MatrixBuffer;

use super::validate_square;

/// LU factorization result: `permute(A) = L @ U`.
///
/// `permutation[i]` is the row of the original matrix that ends up in row
/// `i` of the permuted matrix, so `A[permutation[i], j] == (L @ U)[i, j]`
/// within numerical tolerance.
#[derive(Debug, Clone)]
pub struct PluFactorization {
    /// Row-permutation indices, length = order of the matrix
    pub permutation: Vec<usize>,

    /// Unit lower-triangular factor L
    pub lower: MatrixBuffer<f64>,

    /// Upper-triangular factor U
    pub upper: MatrixBuffer<f64>,

    /// Number of row swaps performed (determinant sign)
    pub num_swaps: usize,

    /// True when some pivot was exactly zero after pivoting. The factors
    /// are still valid, but U is singular and `solve` will refuse to run.
    pub singular: bool,
}

impl PluFactorization {
    /// Determinant of the factored matrix: `(-1)^num_swaps * prod(diag(U))`.
    pub fn det(&self) -> f64 {
        let n = self.upper.rows();
        let sign = if self.num_swaps % 2 == 0 { 1.0 } else { -1.0 };
        (0..n).fold(sign, |acc, i| acc * self.upper.get(i, i))
    }

    /// Solves `A x = b` using the stored factors.
    ///
    /// # Errors
    ///
    /// `Error::Singular` if the factorization flagged a zero pivot,
    /// `Error::ShapeMismatch` if `b.len()` differs from the matrix order.
    pub fn solve(&self, b: &[f64]) -> Result<Vec<f64>> {
        let n = self.lower.rows();
        if b.len() != n {
            return Err(Error::ShapeMismatch {
                expected: vec![n],
                got: vec![b.len()],
            });
        }
        if self.singular {
            let pivot = (0..n)
                .find(|&i| self.upper.get(i, i) == 0.0)
                .unwrap_or(n - 1);
            return Err(Error::Singular { pivot });
        }

        // Permute b, then Ly = Pb by forward substitution (unit diagonal)
        let mut y = vec![0.0; n];
        for i in 0..n {
            let mut sum = b[self.permutation[i]];
            for j in 0..i {
                sum -= self.lower.get(i, j) * y[j];
            }
            y[i] = sum;
        }

        // Ux = y by backward substitution
        let mut x = vec![0.0; n];
        for i in (0..n).rev() {
            let mut sum = y[i];
            for j in (i + 1)..n {
                sum -= self.upper.get(i, j) * x[j];
            }
            x[i] = sum / self.upper.get(i, i);
        }
        Ok(x)
    }
}

/// LU decomposition with partial pivoting.
///
/// # Errors
///
/// `Error::NotSquare` for rectangular input. A singular matrix is not an
/// error; see [`PluFactorization::singular`].
pub fn lu_decompose(a: &MatrixBuffer<f64>) -> Result<PluFactorization> {
    let n = validate_square(a)?;

    // Working copy, eliminated in place; multipliers overwrite the
    // eliminated entries below the diagonal.
    let mut lu = a.to_row_major_vec();
    let mut permutation: Vec<usize> = (0..n).collect();
    let mut num_swaps = 0usize;
    let mut singular = false;

    for col in 0..n {
        // Pivot: largest absolute value in the active column
        let mut pivot_row = col;
        let mut max_val = lu[col * n + col].abs();
        for row in (col + 1)..n {
            let val = lu[row * n + col].abs();
            if val > max_val {
                max_val = val;
                pivot_row = row;
            }
        }

        if pivot_row != col {
            for j in 0..n {
                lu.swap(col * n + j, pivot_row * n + j);
            }
            permutation.swap(col, pivot_row);
            num_swaps += 1;
        }

        let pivot = lu[col * n + col];
        if pivot == 0.0 {
            // Singular to working precision: nothing to eliminate in this
            // column, the multipliers stay zero.
            singular = true;
            continue;
        }

        for row in (col + 1)..n {
            lu[row * n + col] /= pivot;
            let multiplier = lu[row * n + col];
            for j in (col + 1)..n {
                lu[row * n + j] -= multiplier * lu[col * n + j];
            }
        }
    }

    // Split the packed factorization into explicit L and U
    let mut lower = MatrixBuffer::<f64>::identity(n);
    let mut upper = MatrixBuffer::<f64>::zeros(n, n);
    for i in 0..n {
        for j in 0..n {
            if i > j {
                lower.set(i, j, lu[i * n + j]);
            } else {
                upper.set(i, j, lu[i * n + j]);
            }
        }
    }

    Ok(PluFactorization {
        permutation,
        lower,
        upper,
        num_swaps,
        singular,
    })
}
