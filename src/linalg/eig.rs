//! General eigendecomposition of real square matrices
//!
//! Algorithm:
//! 1. Reduce to upper Hessenberg form with Householder reflections,
//!    accumulating the orthogonal transform.
//! 2. Francis double-shift QR iteration with deflation drives the Hessenberg
//!    matrix to real Schur (quasi-triangular) form; eigenvalues come off the
//!    diagonal, 2x2 blocks yielding complex-conjugate pairs.
//! 3. Back-substitution in Schur form recovers the right eigenvectors, which
//!    are then transformed back to the original basis.
//!
//! Left eigenvectors are obtained by running the same machinery on the
//! transpose and pairing each eigenvalue of the transpose with the nearest
//! eigenvalue of the original, so `left[j, :]` always corresponds to
//! `eigenvalues[j]`.
//!
//! Eigenvalue order is the deflation order of the QR iteration. It is
//! deterministic for a given input but otherwise unspecified; the pairing
//! with eigenvector columns is the only guarantee callers should rely on.

use num_complex::Complex64;

use crate::error::{Error, Result};
use crate::matrix::MatrixBuffer;

use super::validate_square;

/// Iteration budget per deflation step in the QR phase.
const MAX_QR_ITER: usize = 30;

/// General eigendecomposition result.
///
/// `eigenvalues[j]` pairs with right-eigenvector column `right[:, j]` and
/// left-eigenvector row `left[j, :]`. Complex-conjugate eigenvalue pairs of
/// a real matrix occupy adjacent slots with conjugate eigenvectors.
#[derive(Debug, Clone)]
pub struct EigenDecomposition {
    /// Eigenvalues in deflation order
    pub eigenvalues: Vec<Complex64>,

    /// Right eigenvectors as unit-norm columns, `A v = λ v`. Present when
    /// requested.
    pub right: Option<MatrixBuffer<Complex64>>,

    /// Left eigenvectors as unit-norm rows, `u^H A = λ u^H`. Present when
    /// requested.
    pub left: Option<MatrixBuffer<Complex64>>,
}

/// Eigendecomposition of a general real square matrix.
///
/// Eigenvalues are always computed; `want_left` / `want_right` control which
/// eigenvector sets are materialized.
///
/// # Errors
///
/// `Error::NotSquare` for rectangular input, `Error::NonConvergence` if some
/// deflation step exhausts its iteration budget.
pub fn eig(
    a: &MatrixBuffer<f64>,
    want_left: bool,
    want_right: bool,
) -> Result<EigenDecomposition> {
    let n = validate_square(a)?;

    let mut h = a.to_row_major_vec();
    let mut v = identity_flat(n);
    hessenberg(&mut h, &mut v, n);
    let mut d = vec![0.0; n];
    let mut e = vec![0.0; n];
    schur(&mut h, &mut v, &mut d, &mut e, n)?;

    let eigenvalues: Vec<Complex64> = d
        .iter()
        .zip(e.iter())
        .map(|(&re, &im)| Complex64::new(re, im))
        .collect();

    let right = if want_right {
        Some(compact_columns_to_complex(&v, &e, n)?)
    } else {
        None
    };

    let left = if want_left {
        Some(left_vectors(a, &eigenvalues, n)?)
    } else {
        None
    };

    Ok(EigenDecomposition {
        eigenvalues,
        right,
        left,
    })
}

fn identity_flat(n: usize) -> Vec<f64> {
    let mut v = vec![0.0; n * n];
    for i in 0..n {
        v[i * n + i] = 1.0;
    }
    v
}

/// Householder reduction of `h` to upper Hessenberg form, accumulating the
/// orthogonal transform into `v`.
fn hessenberg(h: &mut [f64], v: &mut [f64], n: usize) {
    if n < 3 {
        return;
    }
    let high = n - 1;
    let mut ort = vec![0.0; n];

    for m in 1..high {
        let mut scale = 0.0;
        for i in m..=high {
            scale += h[i * n + m - 1].abs();
        }
        if scale == 0.0 {
            continue;
        }

        // Householder vector for column m-1 below the subdiagonal
        let mut hh = 0.0;
        for i in (m..=high).rev() {
            ort[i] = h[i * n + m - 1] / scale;
            hh += ort[i] * ort[i];
        }
        let mut g = hh.sqrt();
        if ort[m] > 0.0 {
            g = -g;
        }
        hh -= ort[m] * g;
        ort[m] -= g;

        // Similarity transform H <- (I - u u^T / hh) H (I - u u^T / hh)
        for j in m..n {
            let mut f = 0.0;
            for i in (m..=high).rev() {
                f += ort[i] * h[i * n + j];
            }
            f /= hh;
            for i in m..=high {
                h[i * n + j] -= f * ort[i];
            }
        }
        for i in 0..=high {
            let mut f = 0.0;
            for j in (m..=high).rev() {
                f += ort[j] * h[i * n + j];
            }
            f /= hh;
            for j in m..=high {
                h[i * n + j] -= f * ort[j];
            }
        }

        ort[m] *= scale;
        h[m * n + m - 1] = scale * g;
    }

    // Accumulate the transforms, last reflection first
    for m in (1..high).rev() {
        if h[m * n + m - 1] == 0.0 {
            continue;
        }
        for i in (m + 1)..=high {
            ort[i] = h[i * n + m - 1];
        }
        for j in m..=high {
            let mut g = 0.0;
            for i in m..=high {
                g += ort[i] * v[i * n + j];
            }
            // Double division guards against underflow of ort[m] * h[m][m-1]
            g = (g / ort[m]) / h[m * n + m - 1];
            for i in m..=high {
                v[i * n + j] += g * ort[i];
            }
        }
    }
}

/// Complex scalar division `(xr + i xi) / (yr + i yi)` in real arithmetic,
/// scaled to avoid overflow.
fn cdiv(xr: f64, xi: f64, yr: f64, yi: f64) -> (f64, f64) {
    if yr.abs() > yi.abs() {
        let r = yi / yr;
        let d = yr + r * yi;
        ((xr + r * xi) / d, (xi - r * xr) / d)
    } else {
        let r = yr / yi;
        let d = yi + r * yr;
        ((r * xr + xi) / d, (r * xi - xr) / d)
    }
}

/// Francis double-shift QR on an upper Hessenberg matrix, then eigenvector
/// back-substitution in the resulting Schur form.
///
/// On exit `(d, e)` hold the real and imaginary eigenvalue parts in
/// deflation order and `v` holds the eigenvectors of the original matrix in
/// compact real form: a real column per real eigenvalue, and for a conjugate
/// pair at slots (j, j+1) with `e[j] > 0`, columns j and j+1 hold the real
/// and imaginary parts of the eigenvector of `d[j] + i e[j]`.
#[allow(clippy::too_many_lines)]
fn schur(h: &mut [f64], v: &mut [f64], d: &mut [f64], e: &mut [f64], n: usize) -> Result<()> {
    let eps = f64::EPSILON;
    let mut exshift = 0.0;
    let (mut p, mut q, mut r) = (0.0f64, 0.0f64, 0.0f64);
    let (mut s, mut z, mut w, mut x, mut y) = (0.0f64, 0.0f64, 0.0f64, 0.0f64, 0.0f64);

    let mut norm = 0.0;
    for i in 0..n {
        for j in i.saturating_sub(1)..n {
            norm += h[i * n + j].abs();
        }
    }

    // Deflation loop: the active block is rows/columns 0..en
    let mut en = n;
    let mut iter = 0usize;
    while en > 0 {
        let n1 = en - 1;

        // Look for a single negligible subdiagonal element
        let mut l = n1;
        while l > 0 {
            s = h[(l - 1) * n + l - 1].abs() + h[l * n + l].abs();
            if s == 0.0 {
                s = norm;
            }
            if h[l * n + l - 1].abs() < eps * s {
                break;
            }
            l -= 1;
        }

        if l == n1 {
            // One real root
            h[n1 * n + n1] += exshift;
            d[n1] = h[n1 * n + n1];
            e[n1] = 0.0;
            en -= 1;
            iter = 0;
        } else if l == n1 - 1 {
            // Two roots, real or a conjugate pair
            w = h[n1 * n + n1 - 1] * h[(n1 - 1) * n + n1];
            p = (h[(n1 - 1) * n + n1 - 1] - h[n1 * n + n1]) / 2.0;
            q = p * p + w;
            z = q.abs().sqrt();
            h[n1 * n + n1] += exshift;
            h[(n1 - 1) * n + n1 - 1] += exshift;
            x = h[n1 * n + n1];

            if q >= 0.0 {
                // Real pair
                z = if p >= 0.0 { p + z } else { p - z };
                d[n1 - 1] = x + z;
                d[n1] = d[n1 - 1];
                if z != 0.0 {
                    d[n1] = x - w / z;
                }
                e[n1 - 1] = 0.0;
                e[n1] = 0.0;

                // One Givens rotation finishes the 2x2 block
                x = h[n1 * n + n1 - 1];
                s = x.abs() + z.abs();
                p = x / s;
                q = z / s;
                r = (p * p + q * q).sqrt();
                p /= r;
                q /= r;
                for j in (n1 - 1)..n {
                    z = h[(n1 - 1) * n + j];
                    h[(n1 - 1) * n + j] = q * z + p * h[n1 * n + j];
                    h[n1 * n + j] = q * h[n1 * n + j] - p * z;
                }
                for i in 0..=n1 {
                    z = h[i * n + n1 - 1];
                    h[i * n + n1 - 1] = q * z + p * h[i * n + n1];
                    h[i * n + n1] = q * h[i * n + n1] - p * z;
                }
                for i in 0..n {
                    z = v[i * n + n1 - 1];
                    v[i * n + n1 - 1] = q * z + p * v[i * n + n1];
                    v[i * n + n1] = q * v[i * n + n1] - p * z;
                }
            } else {
                // Complex conjugate pair
                d[n1 - 1] = x + p;
                d[n1] = x + p;
                e[n1 - 1] = z;
                e[n1] = -z;
            }
            en -= 2;
            iter = 0;
        } else {
            // No convergence yet: form a shift
            x = h[n1 * n + n1];
            y = h[(n1 - 1) * n + n1 - 1];
            w = h[n1 * n + n1 - 1] * h[(n1 - 1) * n + n1];

            // Exceptional shifts break cyclic stalls
            if iter == 10 || iter == 20 {
                exshift += x;
                for i in 0..en {
                    h[i * n + i] -= x;
                }
                s = h[n1 * n + n1 - 1].abs() + h[(n1 - 1) * n + n1 - 2].abs();
                x = 0.75 * s;
                y = x;
                w = -0.4375 * s * s;
            }
            if iter == MAX_QR_ITER {
                return Err(Error::NonConvergence {
                    op: "eig",
                    iterations: iter,
                });
            }
            iter += 1;

            // Look for two consecutive small subdiagonal elements
            let mut m = n1 - 2;
            loop {
                z = h[m * n + m];
                r = x - z;
                s = y - z;
                p = (r * s - w) / h[(m + 1) * n + m] + h[m * n + m + 1];
                q = h[(m + 1) * n + m + 1] - z - r - s;
                r = h[(m + 2) * n + m + 1];
                s = p.abs() + q.abs() + r.abs();
                p /= s;
                q /= s;
                r /= s;
                if m == l {
                    break;
                }
                if h[m * n + m - 1].abs() * (q.abs() + r.abs())
                    < eps
                        * (p.abs()
                            * (h[(m - 1) * n + m - 1].abs()
                                + z.abs()
                                + h[(m + 1) * n + m + 1].abs()))
                {
                    break;
                }
                m -= 1;
            }
            for i in (m + 2)..=n1 {
                h[i * n + i - 2] = 0.0;
                if i > m + 2 {
                    h[i * n + i - 3] = 0.0;
                }
            }

            // Double QR step on rows l..=n1, columns m..=n1
            for k in m..n1 {
                let notlast = k != n1 - 1;
                if k != m {
                    p = h[k * n + k - 1];
                    q = h[(k + 1) * n + k - 1];
                    r = if notlast { h[(k + 2) * n + k - 1] } else { 0.0 };
                    x = p.abs() + q.abs() + r.abs();
                    if x == 0.0 {
                        continue;
                    }
                    p /= x;
                    q /= x;
                    r /= x;
                }

                s = (p * p + q * q + r * r).sqrt();
                if p < 0.0 {
                    s = -s;
                }
                if s == 0.0 {
                    continue;
                }
                if k != m {
                    h[k * n + k - 1] = -s * x;
                } else if l != m {
                    h[k * n + k - 1] = -h[k * n + k - 1];
                }
                p += s;
                x = p / s;
                y = q / s;
                z = r / s;
                q /= p;
                r /= p;

                // Row modification
                for j in k..n {
                    p = h[k * n + j] + q * h[(k + 1) * n + j];
                    if notlast {
                        p += r * h[(k + 2) * n + j];
                        h[(k + 2) * n + j] -= p * z;
                    }
                    h[k * n + j] -= p * x;
                    h[(k + 1) * n + j] -= p * y;
                }

                // Column modification
                for i in 0..=n1.min(k + 3) {
                    p = x * h[i * n + k] + y * h[i * n + k + 1];
                    if notlast {
                        p += z * h[i * n + k + 2];
                        h[i * n + k + 2] -= p * r;
                    }
                    h[i * n + k] -= p;
                    h[i * n + k + 1] -= p * q;
                }

                // Accumulate transformations
                for i in 0..n {
                    p = x * v[i * n + k] + y * v[i * n + k + 1];
                    if notlast {
                        p += z * v[i * n + k + 2];
                        v[i * n + k + 2] -= p * r;
                    }
                    v[i * n + k] -= p;
                    v[i * n + k + 1] -= p * q;
                }
            }
        }
    }

    if norm == 0.0 {
        return Ok(());
    }

    // Back-substitute for the eigenvectors of the quasi-triangular form
    for nj in (0..n).rev() {
        p = d[nj];
        q = e[nj];

        if q == 0.0 {
            // Real eigenvector
            let mut l = nj;
            h[nj * n + nj] = 1.0;
            for i in (0..nj).rev() {
                w = h[i * n + i] - p;
                r = 0.0;
                for j in l..=nj {
                    r += h[i * n + j] * h[j * n + nj];
                }
                if e[i] < 0.0 {
                    z = w;
                    s = r;
                } else {
                    l = i;
                    if e[i] == 0.0 {
                        h[i * n + nj] = if w != 0.0 { -r / w } else { -r / (eps * norm) };
                    } else {
                        // Solve the real 2x2 block equations
                        x = h[i * n + i + 1];
                        y = h[(i + 1) * n + i];
                        q = (d[i] - p) * (d[i] - p) + e[i] * e[i];
                        let t = (x * s - z * r) / q;
                        h[i * n + nj] = t;
                        h[(i + 1) * n + nj] = if x.abs() > z.abs() {
                            (-r - w * t) / x
                        } else {
                            (-s - y * t) / z
                        };
                    }

                    // Overflow control
                    let t = h[i * n + nj].abs();
                    if (eps * t) * t > 1.0 {
                        for j in i..=nj {
                            h[j * n + nj] /= t;
                        }
                    }
                }
            }
        } else if q < 0.0 {
            // Complex eigenvector, stored in columns nj-1 (real part) and
            // nj (imaginary part)
            let mut l = nj - 1;

            if h[nj * n + nj - 1].abs() > h[(nj - 1) * n + nj].abs() {
                h[(nj - 1) * n + nj - 1] = q / h[nj * n + nj - 1];
                h[(nj - 1) * n + nj] = -(h[nj * n + nj] - p) / h[nj * n + nj - 1];
            } else {
                let (cr, ci) = cdiv(
                    0.0,
                    -h[(nj - 1) * n + nj],
                    h[(nj - 1) * n + nj - 1] - p,
                    q,
                );
                h[(nj - 1) * n + nj - 1] = cr;
                h[(nj - 1) * n + nj] = ci;
            }
            h[nj * n + nj - 1] = 0.0;
            h[nj * n + nj] = 1.0;

            for i in (0..nj - 1).rev() {
                let mut ra = 0.0;
                let mut sa = 0.0;
                for j in l..=nj {
                    ra += h[i * n + j] * h[j * n + nj - 1];
                    sa += h[i * n + j] * h[j * n + nj];
                }
                w = h[i * n + i] - p;

                if e[i] < 0.0 {
                    z = w;
                    r = ra;
                    s = sa;
                } else {
                    l = i;
                    if e[i] == 0.0 {
                        let (cr, ci) = cdiv(-ra, -sa, w, q);
                        h[i * n + nj - 1] = cr;
                        h[i * n + nj] = ci;
                    } else {
                        // Solve the complex 2x2 block equations
                        x = h[i * n + i + 1];
                        y = h[(i + 1) * n + i];
                        let mut vr = (d[i] - p) * (d[i] - p) + e[i] * e[i] - q * q;
                        let vi = (d[i] - p) * 2.0 * q;
                        if vr == 0.0 && vi == 0.0 {
                            vr = eps
                                * norm
                                * (w.abs() + q.abs() + x.abs() + y.abs() + z.abs());
                        }
                        let (cr, ci) = cdiv(
                            x * r - z * ra + q * sa,
                            x * s - z * sa - q * ra,
                            vr,
                            vi,
                        );
                        h[i * n + nj - 1] = cr;
                        h[i * n + nj] = ci;

                        if x.abs() > z.abs() + q.abs() {
                            h[(i + 1) * n + nj - 1] =
                                (-ra - w * h[i * n + nj - 1] + q * h[i * n + nj]) / x;
                            h[(i + 1) * n + nj] =
                                (-sa - w * h[i * n + nj] - q * h[i * n + nj - 1]) / x;
                        } else {
                            let (cr, ci) = cdiv(
                                -r - y * h[i * n + nj - 1],
                                -s - y * h[i * n + nj],
                                z,
                                q,
                            );
                            h[(i + 1) * n + nj - 1] = cr;
                            h[(i + 1) * n + nj] = ci;
                        }
                    }

                    // Overflow control
                    let t = h[i * n + nj - 1].abs().max(h[i * n + nj].abs());
                    if (eps * t) * t > 1.0 {
                        for j in i..=nj {
                            h[j * n + nj - 1] /= t;
                            h[j * n + nj] /= t;
                        }
                    }
                }
            }
        }
    }

    // Transform back to the original basis
    for j in (0..n).rev() {
        for i in 0..n {
            z = 0.0;
            for k in 0..=j {
                z += v[i * n + k] * h[k * n + j];
            }
            v[i * n + j] = z;
        }
    }

    Ok(())
}

/// Expands the compact real eigenvector storage into unit-norm complex
/// columns. For a conjugate pair at slots (j, j+1), column j is
/// `v[:, j] + i v[:, j+1]` and column j+1 is its conjugate.
fn compact_columns_to_complex(v: &[f64], e: &[f64], n: usize) -> Result<MatrixBuffer<Complex64>> {
    let mut out = vec![Complex64::new(0.0, 0.0); n * n];
    let mut j = 0;
    while j < n {
        if e[j] == 0.0 {
            let mut norm = 0.0;
            for i in 0..n {
                norm += v[i * n + j] * v[i * n + j];
            }
            let norm = norm.sqrt();
            for i in 0..n {
                out[i * n + j] = Complex64::new(v[i * n + j] / norm, 0.0);
            }
            j += 1;
        } else {
            let mut norm = 0.0;
            for i in 0..n {
                norm += v[i * n + j] * v[i * n + j] + v[i * n + j + 1] * v[i * n + j + 1];
            }
            let norm = norm.sqrt();
            for i in 0..n {
                let val = Complex64::new(v[i * n + j] / norm, v[i * n + j + 1] / norm);
                out[i * n + j] = val;
                out[i * n + j + 1] = val.conj();
            }
            j += 2;
        }
    }
    MatrixBuffer::from_vec(n, n, out)
}

/// Left eigenvectors via the transpose: if `A^T w = μ w` then
/// `conj(w)^H A = μ conj(w)^H`. Each eigenvalue of the original is paired
/// with the nearest eigenvalue of the transpose so rows line up with the
/// caller-visible ordering.
fn left_vectors(
    a: &MatrixBuffer<f64>,
    eigenvalues: &[Complex64],
    n: usize,
) -> Result<MatrixBuffer<Complex64>> {
    let at = a.transposed().to_matrix();
    let mut h = at.to_row_major_vec();
    let mut v = identity_flat(n);
    hessenberg(&mut h, &mut v, n);
    let mut d = vec![0.0; n];
    let mut e = vec![0.0; n];
    schur(&mut h, &mut v, &mut d, &mut e, n)?;
    let w = compact_columns_to_complex(&v, &e, n)?;

    let mut used = vec![false; n];
    let mut out = vec![Complex64::new(0.0, 0.0); n * n];
    for (j, lambda) in eigenvalues.iter().enumerate() {
        let mut best = usize::MAX;
        let mut best_dist = f64::INFINITY;
        for k in 0..n {
            if used[k] {
                continue;
            }
            let dist = (Complex64::new(d[k], e[k]) - lambda).norm();
            if dist < best_dist {
                best_dist = dist;
                best = k;
            }
        }
        used[best] = true;
        for i in 0..n {
            out[j * n + i] = w.get(i, best).conj();
        }
    }
    MatrixBuffer::from_vec(n, n, out)
}
