//! # refla
//!
//! **Reference dense linear algebra kernels with golden-record output.**
//!
//! refla implements a small set of double-precision kernels - matrix
//! multiplication, LU factorization with partial pivoting, general and
//! symmetric eigendecomposition - in pure Rust, and serializes their inputs
//! and outputs into canonical fixed-precision golden records for comparison
//! against independent implementations.
//!
//! ## Components
//!
//! - [`matrix::MatrixBuffer`]: dense 2D storage with explicit layout
//! - [`linalg::matmul`] / [`linalg::matvec`]: shape-checked products
//! - [`linalg::lu_decompose`]: `permute(A) = L @ U` with partial pivoting
//! - [`linalg::eig`]: general eigendecomposition (Hessenberg + shifted QR)
//! - [`linalg::eig_symmetric`]: symmetric path (tridiagonal + implicit QL)
//! - [`golden`]: precision-pinned serialization of reference cases
//!
//! ## Quick Start
//!
//! ```rust
//! use refla::matrix::MatrixBuffer;
//! use refla::linalg::{lu_decompose, matmul};
//!
//! # fn main() -> refla::error::Result<()> {
//! let a = MatrixBuffer::from_vec(2, 2, vec![4.0, 7.0, 2.0, 6.0])?;
//! let b = MatrixBuffer::from_vec(2, 2, vec![1.0, 0.0, 0.0, 1.0])?;
//!
//! let product = matmul(&a, &b)?;
//! let factors = lu_decompose(&product)?;
//! assert!((factors.det() - 10.0).abs() < 1e-12);
//! # Ok(())
//! # }
//! ```
//!
//! ## Feature Flags
//!
//! - `rayon` (default): parallel generation of independent grid cases

#![warn(missing_docs)]
#![warn(clippy::all)]

pub mod error;
pub mod golden;
pub mod linalg;
pub mod matrix;

pub use error::{Error, Result};
pub use matrix::{Layout, MatrixBuffer};
