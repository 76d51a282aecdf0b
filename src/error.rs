//! Error types for refla

use thiserror::Error;

/// Result type alias using refla's Error
pub type Result<T> = std::result::Result<T, Error>;

/// Errors that can occur in refla operations
#[derive(Error, Debug)]
pub enum Error {
    /// Shape mismatch in an operation
    #[error("Shape mismatch: expected {expected:?}, got {got:?}")]
    ShapeMismatch {
        /// Expected shape
        expected: Vec<usize>,
        /// Actual shape
        got: Vec<usize>,
    },

    /// Matrix is not square where a square matrix is required
    #[error("Expected square matrix, got {rows}x{cols}")]
    NotSquare {
        /// Number of rows
        rows: usize,
        /// Number of columns
        cols: usize,
    },

    /// Index out of bounds
    #[error("Index ({row}, {col}) out of bounds for {rows}x{cols} matrix")]
    IndexOutOfBounds {
        /// Requested row
        row: usize,
        /// Requested column
        col: usize,
        /// Number of rows
        rows: usize,
        /// Number of columns
        cols: usize,
    },

    /// Iterative algorithm exceeded its iteration budget
    #[error("{op} failed to converge after {iterations} iterations")]
    NonConvergence {
        /// The operation name
        op: &'static str,
        /// Iterations performed before giving up
        iterations: usize,
    },

    /// Factorization is singular and cannot be used for this operation
    #[error("Matrix is singular to working precision (zero pivot in column {pivot})")]
    Singular {
        /// Column of the first exactly-zero pivot
        pivot: usize,
    },

    /// Invalid argument provided to an operation
    #[error("Invalid argument '{arg}': {reason}")]
    InvalidArgument {
        /// The argument name
        arg: &'static str,
        /// Why it was rejected
        reason: String,
    },

    /// Golden record could not be decoded
    #[error("Failed to decode golden record: {0}")]
    Decode(String),

    /// I/O error while reading or writing a golden file
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}
