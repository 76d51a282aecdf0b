//! Dense matrix storage with explicit layout
//!
//! [`MatrixBuffer`] is the single data type every kernel in this crate
//! consumes and produces: a flat, owned buffer with shape metadata and a
//! declared element order. Decompositions never mutate their input; they
//! copy into row-major working storage and return fresh buffers.

use num_complex::Complex64;
use num_traits::{One, Zero};

use crate::error::{Error, Result};

/// Element traversal order of the flat buffer.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Layout {
    /// Element (i, j) lives at `i * cols + j`
    RowMajor,
    /// Element (i, j) lives at `j * rows + i`
    ColMajor,
}

/// Dense 2D matrix backed by a flat `Vec`.
///
/// The buffer owns its data exclusively. Invariant: `data.len() == rows * cols`,
/// enforced at construction. Both dimensions must be non-zero.
#[derive(Debug, Clone, PartialEq)]
pub struct MatrixBuffer<T> {
    rows: usize,
    cols: usize,
    layout: Layout,
    data: Vec<T>,
}

impl<T: Copy> MatrixBuffer<T> {
    /// Creates a row-major matrix from a flat vector.
    ///
    /// # Errors
    ///
    /// `Error::ShapeMismatch` if `data.len() != rows * cols`,
    /// `Error::InvalidArgument` if either dimension is zero.
    pub fn from_vec(rows: usize, cols: usize, data: Vec<T>) -> Result<Self> {
        Self::from_vec_with_layout(rows, cols, Layout::RowMajor, data)
    }

    /// Creates a matrix from a flat vector in the given layout.
    pub fn from_vec_with_layout(
        rows: usize,
        cols: usize,
        layout: Layout,
        data: Vec<T>,
    ) -> Result<Self> {
        if rows == 0 || cols == 0 {
            return Err(Error::InvalidArgument {
                arg: "shape",
                reason: format!("dimensions must be non-zero, got {rows}x{cols}"),
            });
        }
        if data.len() != rows * cols {
            return Err(Error::ShapeMismatch {
                expected: vec![rows, cols],
                got: vec![data.len()],
            });
        }
        Ok(Self {
            rows,
            cols,
            layout,
            data,
        })
    }

    /// Builds a row-major matrix from row slices. Convenience for literals.
    ///
    /// # Errors
    ///
    /// `Error::ShapeMismatch` if the rows have uneven lengths,
    /// `Error::InvalidArgument` on an empty row set.
    pub fn from_rows(rows: &[&[T]]) -> Result<Self> {
        let nrows = rows.len();
        let ncols = rows.first().map_or(0, |r| r.len());
        let mut data = Vec::with_capacity(nrows * ncols);
        for row in rows {
            if row.len() != ncols {
                return Err(Error::ShapeMismatch {
                    expected: vec![nrows, ncols],
                    got: vec![nrows, row.len()],
                });
            }
            data.extend_from_slice(row);
        }
        Self::from_vec(nrows, ncols, data)
    }

    /// Returns the number of rows.
    pub fn rows(&self) -> usize {
        self.rows
    }

    /// Returns the number of columns.
    pub fn cols(&self) -> usize {
        self.cols
    }

    /// Returns the shape as (rows, cols).
    pub fn shape(&self) -> (usize, usize) {
        (self.rows, self.cols)
    }

    /// Returns the declared layout of the flat buffer.
    pub fn layout(&self) -> Layout {
        self.layout
    }

    /// Returns the underlying flat buffer in its declared layout.
    pub fn as_slice(&self) -> &[T] {
        &self.data
    }

    /// Consumes the matrix, returning the flat buffer in its declared layout.
    pub fn into_vec(self) -> Vec<T> {
        self.data
    }

    #[inline]
    fn index_of(&self, row: usize, col: usize) -> usize {
        match self.layout {
            Layout::RowMajor => row * self.cols + col,
            Layout::ColMajor => col * self.rows + row,
        }
    }

    /// Gets element (row, col), honoring the declared layout.
    ///
    /// # Panics
    ///
    /// Panics on out-of-bounds indices. Use [`MatrixBuffer::try_get`] for a
    /// checked variant.
    #[inline]
    pub fn get(&self, row: usize, col: usize) -> T {
        assert!(
            row < self.rows && col < self.cols,
            "index ({row}, {col}) out of bounds for {}x{} matrix",
            self.rows,
            self.cols
        );
        self.data[self.index_of(row, col)]
    }

    /// Sets element (row, col), honoring the declared layout.
    ///
    /// # Panics
    ///
    /// Panics on out-of-bounds indices.
    #[inline]
    pub fn set(&mut self, row: usize, col: usize, value: T) {
        assert!(
            row < self.rows && col < self.cols,
            "index ({row}, {col}) out of bounds for {}x{} matrix",
            self.rows,
            self.cols
        );
        let idx = self.index_of(row, col);
        self.data[idx] = value;
    }

    /// Checked element access.
    ///
    /// # Errors
    ///
    /// `Error::IndexOutOfBounds` if the indices exceed the matrix shape.
    pub fn try_get(&self, row: usize, col: usize) -> Result<T> {
        if row >= self.rows || col >= self.cols {
            return Err(Error::IndexOutOfBounds {
                row,
                col,
                rows: self.rows,
                cols: self.cols,
            });
        }
        Ok(self.data[self.index_of(row, col)])
    }

    /// Checked element assignment.
    ///
    /// # Errors
    ///
    /// `Error::IndexOutOfBounds` if the indices exceed the matrix shape.
    pub fn try_set(&mut self, row: usize, col: usize, value: T) -> Result<()> {
        if row >= self.rows || col >= self.cols {
            return Err(Error::IndexOutOfBounds {
                row,
                col,
                rows: self.rows,
                cols: self.cols,
            });
        }
        let idx = self.index_of(row, col);
        self.data[idx] = value;
        Ok(())
    }

    /// Returns a transpose view without copying.
    ///
    /// The view borrows this buffer and reinterprets indices; materialize it
    /// with [`TransposeView::to_matrix`] when an owned transpose is needed.
    pub fn transposed(&self) -> TransposeView<'_, T> {
        TransposeView { inner: self }
    }

    /// Copies the elements into a fresh row-major `Vec`, whatever the layout.
    pub fn to_row_major_vec(&self) -> Vec<T> {
        match self.layout {
            Layout::RowMajor => self.data.clone(),
            Layout::ColMajor => {
                let mut out = Vec::with_capacity(self.rows * self.cols);
                for i in 0..self.rows {
                    for j in 0..self.cols {
                        out.push(self.data[j * self.rows + i]);
                    }
                }
                out
            }
        }
    }

    /// Deep copy normalized to row-major storage.
    pub fn to_row_major(&self) -> Self {
        Self {
            rows: self.rows,
            cols: self.cols,
            layout: Layout::RowMajor,
            data: self.to_row_major_vec(),
        }
    }
}

impl<T: Copy + Zero> MatrixBuffer<T> {
    /// Creates a row-major matrix of zeros.
    pub fn zeros(rows: usize, cols: usize) -> Self {
        assert!(rows > 0 && cols > 0, "dimensions must be non-zero");
        Self {
            rows,
            cols,
            layout: Layout::RowMajor,
            data: vec![T::zero(); rows * cols],
        }
    }
}

impl<T: Copy + Zero + One> MatrixBuffer<T> {
    /// Creates an identity matrix of order `n`.
    pub fn identity(n: usize) -> Self {
        let mut m = Self::zeros(n, n);
        for i in 0..n {
            m.set(i, i, T::one());
        }
        m
    }
}

impl MatrixBuffer<f64> {
    /// Sum of the diagonal elements.
    pub fn trace(&self) -> f64 {
        let k = self.rows.min(self.cols);
        (0..k).map(|i| self.get(i, i)).sum()
    }

    /// Frobenius norm: sqrt of the sum of squared elements.
    pub fn frobenius_norm(&self) -> f64 {
        self.data.iter().map(|x| x * x).sum::<f64>().sqrt()
    }
}

impl MatrixBuffer<Complex64> {
    /// Frobenius norm over complex entries.
    pub fn frobenius_norm(&self) -> f64 {
        self.data.iter().map(|z| z.norm_sqr()).sum::<f64>().sqrt()
    }
}

/// Borrowed transpose of a [`MatrixBuffer`]. No data is copied; element
/// access swaps the index pair.
#[derive(Debug, Clone, Copy)]
pub struct TransposeView<'a, T> {
    inner: &'a MatrixBuffer<T>,
}

impl<T: Copy> TransposeView<'_, T> {
    /// Rows of the transposed matrix.
    pub fn rows(&self) -> usize {
        self.inner.cols
    }

    /// Columns of the transposed matrix.
    pub fn cols(&self) -> usize {
        self.inner.rows
    }

    /// Element (i, j) of the transpose, i.e. element (j, i) of the base.
    pub fn get(&self, row: usize, col: usize) -> T {
        self.inner.get(col, row)
    }

    /// Materializes the transpose as an owned row-major matrix.
    pub fn to_matrix(&self) -> MatrixBuffer<T> {
        let rows = self.rows();
        let cols = self.cols();
        let mut data = Vec::with_capacity(rows * cols);
        for i in 0..rows {
            for j in 0..cols {
                data.push(self.get(i, j));
            }
        }
        MatrixBuffer {
            rows,
            cols,
            layout: Layout::RowMajor,
            data,
        }
    }
}
