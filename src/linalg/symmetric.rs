//! Symmetric eigendecomposition via tridiagonal QL iteration
//!
//! Algorithm:
//! 1. Mirror the selected triangle into a full symmetric working matrix.
//! 2. Reduce to tridiagonal form with Householder reflections, accumulating
//!    the orthogonal transform (tred2).
//! 3. Implicit-shift QL iteration on the tridiagonal form, rotating the
//!    accumulated transform into the eigenvector matrix (tqli).
//! 4. Sort eigenvalues ascending and fix a deterministic sign convention:
//!    the largest-magnitude component of each eigenvector is positive.
//!
//! The sign convention makes results reproducible across runs and across
//! independent implementations, up to this documented choice.

use crate::error::{Error, Result};
use crate::matrix::MatrixBuffer;

use super::validate_square;

/// Iteration budget per eigenvalue in the QL phase.
const MAX_QL_ITER: usize = 30;

/// Which triangle of the input matrix is read; the other is assumed
/// mirrored.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Uplo {
    /// Read the lower triangle (including the diagonal)
    Lower,
    /// Read the upper triangle (including the diagonal)
    Upper,
}

/// Symmetric eigendecomposition result: `A = V @ diag(λ) @ V^T`.
///
/// Eigenvalues are sorted ascending; eigenvector columns are orthonormal
/// and `eigenvectors[:, j]` pairs with `eigenvalues[j]`.
#[derive(Debug, Clone)]
pub struct SymmetricEigenDecomposition {
    /// Eigenvalues in non-decreasing order
    pub eigenvalues: Vec<f64>,

    /// Orthonormal eigenvector columns
    pub eigenvectors: MatrixBuffer<f64>,
}

/// Eigendecomposition of a (numerically) symmetric matrix.
///
/// Only the triangle selected by `uplo` is read.
///
/// # Errors
///
/// `Error::NotSquare` for rectangular input, `Error::NonConvergence` if the
/// QL iteration exceeds its budget for some eigenvalue.
pub fn eig_symmetric(
    a: &MatrixBuffer<f64>,
    uplo: Uplo,
) -> Result<SymmetricEigenDecomposition> {
    let n = validate_square(a)?;

    // Full symmetric working matrix from the selected triangle
    let mut z = vec![0.0; n * n];
    for i in 0..n {
        for j in 0..=i {
            let val = match uplo {
                Uplo::Lower => a.get(i, j),
                Uplo::Upper => a.get(j, i),
            };
            z[i * n + j] = val;
            z[j * n + i] = val;
        }
    }

    let mut d = vec![0.0; n];
    let mut e = vec![0.0; n];
    tridiagonalize(&mut z, n, &mut d, &mut e);
    tridiagonal_ql(&mut d, &mut e, &mut z, n)?;

    // Sort ascending, reordering eigenvector columns to match
    let mut order: Vec<usize> = (0..n).collect();
    order.sort_by(|&i, &j| d[i].total_cmp(&d[j]));

    let eigenvalues: Vec<f64> = order.iter().map(|&i| d[i]).collect();
    let mut vectors = vec![0.0; n * n];
    for (new_col, &old_col) in order.iter().enumerate() {
        for row in 0..n {
            vectors[row * n + new_col] = z[row * n + old_col];
        }
    }

    // Deterministic sign convention: largest-magnitude component positive
    for col in 0..n {
        let mut max_row = 0;
        let mut max_abs = 0.0;
        for row in 0..n {
            let v = vectors[row * n + col].abs();
            if v > max_abs {
                max_abs = v;
                max_row = row;
            }
        }
        if vectors[max_row * n + col] < 0.0 {
            for row in 0..n {
                vectors[row * n + col] = -vectors[row * n + col];
            }
        }
    }

    Ok(SymmetricEigenDecomposition {
        eigenvalues,
        eigenvectors: MatrixBuffer::from_vec(n, n, vectors)?,
    })
}

/// Householder reduction to tridiagonal form with accumulation of the
/// orthogonal transform. On exit `a` holds the transform, `d` the diagonal
/// and `e[1..]` the subdiagonal.
fn tridiagonalize(a: &mut [f64], n: usize, d: &mut [f64], e: &mut [f64]) {
    for i in (1..n).rev() {
        let l = i - 1;
        let mut h = 0.0;
        if l > 0 {
            let mut scale = 0.0;
            for k in 0..=l {
                scale += a[i * n + k].abs();
            }
            if scale == 0.0 {
                // Row already tridiagonal, skip the reflection
                e[i] = a[i * n + l];
            } else {
                for k in 0..=l {
                    a[i * n + k] /= scale;
                    h += a[i * n + k] * a[i * n + k];
                }
                let mut f = a[i * n + l];
                let g = if f >= 0.0 { -h.sqrt() } else { h.sqrt() };
                e[i] = scale * g;
                h -= f * g;
                a[i * n + l] = f - g;

                f = 0.0;
                for j in 0..=l {
                    // Store u/H in column i for the accumulation pass
                    a[j * n + i] = a[i * n + j] / h;
                    let mut g_acc = 0.0;
                    for k in 0..=j {
                        g_acc += a[j * n + k] * a[i * n + k];
                    }
                    for k in (j + 1)..=l {
                        g_acc += a[k * n + j] * a[i * n + k];
                    }
                    e[j] = g_acc / h;
                    f += e[j] * a[i * n + j];
                }
                let hh = f / (h + h);
                for j in 0..=l {
                    let fj = a[i * n + j];
                    let gj = e[j] - hh * fj;
                    e[j] = gj;
                    for k in 0..=j {
                        a[j * n + k] -= fj * e[k] + gj * a[i * n + k];
                    }
                }
            }
        } else {
            e[i] = a[i * n + l];
        }
        d[i] = h;
    }
    d[0] = 0.0;
    e[0] = 0.0;

    // Accumulate the transform
    for i in 0..n {
        if d[i] != 0.0 {
            for j in 0..i {
                let mut g = 0.0;
                for k in 0..i {
                    g += a[i * n + k] * a[k * n + j];
                }
                for k in 0..i {
                    a[k * n + j] -= g * a[k * n + i];
                }
            }
        }
        d[i] = a[i * n + i];
        a[i * n + i] = 1.0;
        for j in 0..i {
            a[j * n + i] = 0.0;
            a[i * n + j] = 0.0;
        }
    }
}

/// Implicit-shift QL iteration on a tridiagonal matrix (d, e), rotating the
/// accumulated transform `z` into the eigenvector matrix.
fn tridiagonal_ql(d: &mut [f64], e: &mut [f64], z: &mut [f64], n: usize) -> Result<()> {
    for i in 1..n {
        e[i - 1] = e[i];
    }
    e[n - 1] = 0.0;

    for l in 0..n {
        let mut iter = 0usize;
        loop {
            // Locate a negligible subdiagonal element to split the problem
            let mut m = l;
            while m + 1 < n {
                let dd = d[m].abs() + d[m + 1].abs();
                if e[m].abs() <= f64::EPSILON * dd {
                    break;
                }
                m += 1;
            }
            if m == l {
                break;
            }
            if iter == MAX_QL_ITER {
                return Err(Error::NonConvergence {
                    op: "eig_symmetric",
                    iterations: iter,
                });
            }
            iter += 1;

            // Implicit shift from the leading 2x2
            let mut g = (d[l + 1] - d[l]) / (2.0 * e[l]);
            let mut r = g.hypot(1.0);
            g = d[m] - d[l] + e[l] / (g + r.copysign(g));

            let mut s = 1.0;
            let mut c = 1.0;
            let mut p = 0.0;
            let mut underflow = false;
            for i in (l..m).rev() {
                let mut f = s * e[i];
                let b = c * e[i];
                r = f.hypot(g);
                e[i + 1] = r;
                if r == 0.0 {
                    // Recover from underflow: split and retry
                    d[i + 1] -= p;
                    e[m] = 0.0;
                    underflow = true;
                    break;
                }
                s = f / r;
                c = g / r;
                g = d[i + 1] - p;
                r = (d[i] - g) * s + 2.0 * c * b;
                p = s * r;
                d[i + 1] = g + p;
                g = c * r - b;

                for k in 0..n {
                    f = z[k * n + i + 1];
                    z[k * n + i + 1] = s * z[k * n + i] + c * f;
                    z[k * n + i] = c * z[k * n + i] - s * f;
                }
            }
            if underflow {
                continue;
            }
            d[l] -= p;
            e[l] = g;
            e[m] = 0.0;
        }
    }
    Ok(())
}
