//! Dense linear algebra kernels
//!
//! Each submodule implements one operation family with a narrow contract so
//! it can be validated (and swapped for a vendor routine) without touching
//! callers:
//!
//! - `matmul`: rectangular matrix and matrix-vector products
//! - `lu`: LU factorization with partial pivoting
//! - `eig`: general (possibly complex) eigendecomposition
//! - `symmetric`: symmetric eigendecomposition via tridiagonal QL
//!
//! All kernels copy their input into row-major working storage and return
//! fresh outputs; inputs are never mutated.

pub mod eig;
pub mod lu;
pub mod matmul;
pub mod symmetric;

pub use eig::{eig, EigenDecomposition};
pub use lu::{lu_decompose, PluFactorization};
pub use matmul::{matmul, matvec};
pub use symmetric::{eig_symmetric, SymmetricEigenDecomposition, Uplo};

use crate::error::{Error, Result};
use crate::matrix::MatrixBuffer;

/// Validate a matrix is square, returning its order.
pub fn validate_square<T: Copy>(a: &MatrixBuffer<T>) -> Result<usize> {
    let (rows, cols) = a.shape();
    if rows != cols {
        return Err(Error::NotSquare { rows, cols });
    }
    Ok(rows)
}
