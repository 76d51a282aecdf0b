//! Integration tests for LU factorization with partial pivoting
//!
//! Tests verify:
//! - Reconstruction: permute(A) ≈ L @ U within 1e-9 relative Frobenius error
//! - Correctness on both diagonally dominant and non-dominant inputs
//! - L unit lower-triangular, U upper-triangular
//! - Singular input completes with the non-fatal flag set
//! - solve and det against known values

use refla::error::Error;
use refla::linalg::{lu_decompose, PluFactorization};
use refla::matrix::MatrixBuffer;

mod common;
use common::assert_allclose_f64;

// ============================================================================
// Helper Functions
// ============================================================================

/// Relative Frobenius-norm error of permute(A) - L @ U
fn reconstruction_error(f: &PluFactorization, a: &MatrixBuffer<f64>) -> f64 {
    let n = a.rows();
    let mut diff_sq = 0.0;
    let mut norm_sq = 0.0;
    for i in 0..n {
        for j in 0..n {
            let mut lu_ij = 0.0;
            for k in 0..n {
                lu_ij += f.lower.get(i, k) * f.upper.get(k, j);
            }
            let a_ij = a.get(f.permutation[i], j);
            diff_sq += (lu_ij - a_ij) * (lu_ij - a_ij);
            norm_sq += a_ij * a_ij;
        }
    }
    (diff_sq / norm_sq).sqrt()
}

fn assert_triangular_shape(f: &PluFactorization) {
    let n = f.lower.rows();
    for i in 0..n {
        assert_eq!(f.lower.get(i, i), 1.0, "L diagonal at {i}");
        for j in (i + 1)..n {
            assert_eq!(f.lower.get(i, j), 0.0, "L above diagonal at ({i}, {j})");
        }
        for j in 0..i {
            assert_eq!(f.upper.get(i, j), 0.0, "U below diagonal at ({i}, {j})");
        }
    }
}

// ============================================================================
// Reconstruction
// ============================================================================

#[test]
fn test_diagonally_dominant_reconstruction() {
    let a = MatrixBuffer::from_vec(
        3,
        3,
        vec![10.0, 2.0, 3.0, 4.0, 20.0, 6.0, 7.0, 8.0, 30.0],
    )
    .unwrap();
    let f = lu_decompose(&a).unwrap();
    assert!(!f.singular);
    assert_triangular_shape(&f);
    assert!(reconstruction_error(&f, &a) <= 1e-9);
}

#[test]
fn test_non_dominant_reconstruction() {
    // Small leading pivots; without row interchanges this input loses
    // accuracy, which is exactly what the case probes
    let a = MatrixBuffer::from_vec(
        3,
        3,
        vec![1.0e-3, 2.0, 3.0, 4.0, 5.0, 6.0, 7.0, 8.0, 10.0],
    )
    .unwrap();
    let f = lu_decompose(&a).unwrap();
    assert!(!f.singular);
    assert!(f.num_swaps > 0, "pivoting must reorder rows");
    assert_triangular_shape(&f);
    assert!(reconstruction_error(&f, &a) <= 1e-9);
}

#[test]
fn test_4x4_reconstruction() {
    let a = MatrixBuffer::from_vec(
        4,
        4,
        vec![
            2.0, -1.0, 3.0, 0.5, 4.0, 2.0, -2.0, 1.0, -6.0, 3.0, 1.0, -1.5, 8.0, -4.0, 0.0,
            2.0,
        ],
    )
    .unwrap();
    let f = lu_decompose(&a).unwrap();
    assert!(reconstruction_error(&f, &a) <= 1e-9);
}

#[test]
fn test_random_matrices_reconstruct() {
    use rand::rngs::StdRng;
    use rand::SeedableRng;
    use refla::golden::cases::{random_diagonally_dominant, random_matrix};

    let mut rng = StdRng::seed_from_u64(1234);
    for n in [2, 5, 8] {
        let dominant = random_diagonally_dominant(&mut rng, n).unwrap();
        let f = lu_decompose(&dominant).unwrap();
        assert!(!f.singular, "order {n} dominant");
        assert!(reconstruction_error(&f, &dominant) <= 1e-9, "order {n} dominant");

        let general = random_matrix(&mut rng, n, n).unwrap();
        let f = lu_decompose(&general).unwrap();
        assert!(reconstruction_error(&f, &general) <= 1e-9, "order {n} general");
    }
}

// ============================================================================
// Pivoting and the singular flag
// ============================================================================

#[test]
fn test_pivot_is_column_maximum() {
    let a = MatrixBuffer::from_vec(2, 2, vec![1.0, 3.0, 4.0, 3.0]).unwrap();
    let f = lu_decompose(&a).unwrap();
    assert_eq!(f.permutation, vec![1, 0]);
    assert_eq!(f.num_swaps, 1);
    assert_eq!(f.upper.get(0, 0), 4.0);
}

#[test]
fn test_singular_completes_with_flag() {
    let a = MatrixBuffer::from_vec(3, 3, vec![1.0, 2.0, 3.0, 2.0, 4.0, 6.0, 1.0, 0.0, 1.0])
        .unwrap();
    let f = lu_decompose(&a).unwrap();
    assert!(f.singular);
    // Factors are still returned and consistent in shape
    assert_triangular_shape(&f);
    assert_eq!(f.det(), 0.0);
    assert!(matches!(
        f.solve(&[1.0, 1.0, 1.0]),
        Err(Error::Singular { .. })
    ));
}

#[test]
fn test_rectangular_rejected() {
    let a = MatrixBuffer::from_vec(2, 3, vec![0.0; 6]).unwrap();
    assert!(matches!(lu_decompose(&a), Err(Error::NotSquare { .. })));
}

// ============================================================================
// solve and det
// ============================================================================

#[test]
fn test_solve_known_system() {
    // A = [[2, 1, 1], [4, -6, 0], [-2, 7, 2]], x = [1, 2, 3]
    let a = MatrixBuffer::from_vec(
        3,
        3,
        vec![2.0, 1.0, 1.0, 4.0, -6.0, 0.0, -2.0, 7.0, 2.0],
    )
    .unwrap();
    let b = [7.0, -8.0, 18.0];
    let f = lu_decompose(&a).unwrap();
    let x = f.solve(&b).unwrap();
    assert_allclose_f64(&x, &[1.0, 2.0, 3.0], 1e-12, 1e-12, "solution");
}

#[test]
fn test_det_known_value() {
    let a = MatrixBuffer::from_vec(2, 2, vec![4.0, 7.0, 2.0, 6.0]).unwrap();
    let f = lu_decompose(&a).unwrap();
    assert!((f.det() - 10.0).abs() < 1e-12);
}

#[test]
fn test_solve_length_mismatch() {
    let a = MatrixBuffer::from_vec(2, 2, vec![4.0, 7.0, 2.0, 6.0]).unwrap();
    let f = lu_decompose(&a).unwrap();
    assert!(matches!(
        f.solve(&[1.0, 2.0, 3.0]),
        Err(Error::ShapeMismatch { .. })
    ));
}
