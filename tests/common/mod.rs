//! Common test utilities
#![allow(dead_code)]

use num_complex::Complex64;
use refla::matrix::MatrixBuffer;

/// Assert two f64 slices are close within tolerance
///
/// Uses the formula: |a - b| <= atol + rtol * |b|
pub fn assert_allclose_f64(a: &[f64], b: &[f64], rtol: f64, atol: f64, msg: &str) {
    assert_eq!(a.len(), b.len(), "{}: length mismatch", msg);
    for (i, (x, y)) in a.iter().zip(b.iter()).enumerate() {
        let diff = (x - y).abs();
        let tol = atol + rtol * y.abs();
        assert!(
            diff <= tol,
            "{}: element {} differs: {} vs {} (diff={}, tol={})",
            msg,
            i,
            x,
            y,
            diff,
            tol
        );
    }
}

/// Check a square f64 matrix is close to the identity
pub fn assert_near_identity(m: &MatrixBuffer<f64>, tol: f64, msg: &str) {
    let (rows, cols) = m.shape();
    assert_eq!(rows, cols, "{}: not square", msg);
    for i in 0..rows {
        for j in 0..cols {
            let expected = if i == j { 1.0 } else { 0.0 };
            let diff = (m.get(i, j) - expected).abs();
            assert!(
                diff <= tol,
                "{}: ({}, {}) = {} differs from identity by {}",
                msg,
                i,
                j,
                m.get(i, j),
                diff
            );
        }
    }
}

/// Residual `max_i |A v - λ v|_i` for one right eigenpair of a real matrix
pub fn right_eigenpair_residual(
    a: &MatrixBuffer<f64>,
    v: &MatrixBuffer<Complex64>,
    col: usize,
    lambda: Complex64,
) -> f64 {
    let n = a.rows();
    let mut residual = 0.0f64;
    for i in 0..n {
        let mut av = Complex64::new(0.0, 0.0);
        for k in 0..n {
            av += a.get(i, k) * v.get(k, col);
        }
        residual = residual.max((av - lambda * v.get(i, col)).norm());
    }
    residual
}

/// Euclidean norm of one column of a complex matrix
pub fn column_norm(v: &MatrixBuffer<Complex64>, col: usize) -> f64 {
    (0..v.rows())
        .map(|i| v.get(i, col).norm_sqr())
        .sum::<f64>()
        .sqrt()
}
