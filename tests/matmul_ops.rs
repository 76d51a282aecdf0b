//! Integration tests for matrix multiplication
//!
//! Tests verify:
//! - Exact results on the pinned reference products
//! - Matrix-vector multiplication as the single-column degenerate case
//! - Associativity within rounding tolerance
//! - Shape errors on incompatible dimensions

use refla::error::Error;
use refla::linalg::{matmul, matvec};
use refla::matrix::MatrixBuffer;

mod common;
use common::assert_allclose_f64;

#[test]
fn test_reference_product_exact() {
    let a = MatrixBuffer::from_vec(2, 3, vec![1.0, 2.0, 3.0, 4.0, 5.0, 6.0]).unwrap();
    let b = MatrixBuffer::from_vec(3, 2, vec![1.0, 2.0, 3.0, 4.0, 5.0, 6.0]).unwrap();
    let c = matmul(&a, &b).unwrap();
    assert_eq!(c.shape(), (2, 2));
    assert_eq!(c.as_slice(), &[22.0, 28.0, 49.0, 64.0]);
}

#[test]
fn test_reference_matvec_exact() {
    let a = MatrixBuffer::from_vec(2, 3, vec![1.0, 2.0, 3.0, 4.0, 5.0, 6.0]).unwrap();
    let y = matvec(&a, &[1.0, 2.0, 3.0]).unwrap();
    assert_eq!(y, vec![14.0, 32.0]);
}

#[test]
fn test_identity_is_neutral() {
    let a = MatrixBuffer::from_vec(3, 3, vec![1.0, -2.0, 0.5, 3.0, 4.0, -1.0, 0.0, 2.0, 9.0])
        .unwrap();
    let id = MatrixBuffer::<f64>::identity(3);
    let left = matmul(&id, &a).unwrap();
    let right = matmul(&a, &id).unwrap();
    assert_eq!(left.as_slice(), a.as_slice());
    assert_eq!(right.as_slice(), a.as_slice());
}

#[test]
fn test_associativity_within_rounding() {
    let a = MatrixBuffer::from_vec(2, 3, vec![0.1, 0.2, 0.3, 0.4, 0.5, 0.6]).unwrap();
    let b = MatrixBuffer::from_vec(3, 4, (1..=12).map(f64::from).collect()).unwrap();
    let c = MatrixBuffer::from_vec(4, 2, vec![-1.0, 2.0, 0.5, -0.25, 3.0, 1.0, 0.0, -2.0])
        .unwrap();

    let ab_c = matmul(&matmul(&a, &b).unwrap(), &c).unwrap();
    let a_bc = matmul(&a, &matmul(&b, &c).unwrap()).unwrap();
    assert_allclose_f64(
        ab_c.as_slice(),
        a_bc.as_slice(),
        1e-13,
        1e-13,
        "(AB)C vs A(BC)",
    );
}

#[test]
fn test_inner_dimension_mismatch() {
    let a = MatrixBuffer::from_vec(2, 3, vec![0.0; 6]).unwrap();
    let b = MatrixBuffer::from_vec(2, 2, vec![0.0; 4]).unwrap();
    assert!(matches!(matmul(&a, &b), Err(Error::ShapeMismatch { .. })));
    assert!(matches!(
        matvec(&a, &[0.0, 0.0]),
        Err(Error::ShapeMismatch { .. })
    ));
}

#[test]
fn test_matvec_matches_single_column_product() {
    let a = MatrixBuffer::from_vec(3, 3, vec![1.0, -2.0, 0.5, 3.0, 4.0, -1.0, 0.0, 2.0, 9.0])
        .unwrap();
    let x = [0.25, -1.5, 2.0];
    let col = MatrixBuffer::from_vec(3, 1, x.to_vec()).unwrap();
    let as_matrix = matmul(&a, &col).unwrap();
    let as_vector = matvec(&a, &x).unwrap();
    assert_eq!(as_matrix.as_slice(), as_vector.as_slice());
}
