//! Canonical golden-record serialization
//!
//! Reference inputs and outputs are persisted as a tree of JSON mappings in
//! which every floating value is a fixed-precision scientific-notation
//! string. Text rather than binary floats keeps the artifact diffable
//! between independent implementations and pins the precision contract:
//! with the default 15 significant digits, decode-encode round-trips are
//! exact and decoded values are within `1e-12` relative error of the
//! originals.
//!
//! Formatting is an explicit [`FloatFormat`] passed to every conversion; no
//! process-wide precision state exists.

pub mod cases;

use std::collections::BTreeMap;

use num_complex::Complex64;
use serde::{Deserialize, Serialize};

use crate::error::{Error, Result};
use crate::matrix::MatrixBuffer;

/// Schema version stamped into every record.
pub const SCHEMA_VERSION: u32 = 1;

/// Fixed-precision textual rendering of floats.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FloatFormat {
    /// Significant decimal digits emitted per value. 15 digits round-trips
    /// f64 within 1e-12 relative error; 17 is exact.
    pub sig_digits: usize,
}

impl Default for FloatFormat {
    fn default() -> Self {
        Self { sig_digits: 15 }
    }
}

impl FloatFormat {
    /// Format with an explicit digit count.
    pub fn with_digits(sig_digits: usize) -> Self {
        Self { sig_digits }
    }

    /// Renders one value in scientific notation, e.g. `-1.25000000000000e1`.
    pub fn render(&self, x: f64) -> String {
        format!("{:.*e}", self.sig_digits.saturating_sub(1), x)
    }
}

/// A real matrix flattened row-major, values as fixed-precision strings.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct GoldenMatrix {
    /// Number of rows
    pub nrows: usize,
    /// Number of columns
    pub ncols: usize,
    /// Row-major flattened values
    pub data: Vec<String>,
}

impl GoldenMatrix {
    /// Renders a matrix with the given format.
    pub fn from_matrix(m: &MatrixBuffer<f64>, fmt: &FloatFormat) -> Self {
        let (nrows, ncols) = m.shape();
        let mut data = Vec::with_capacity(nrows * ncols);
        for i in 0..nrows {
            for j in 0..ncols {
                data.push(fmt.render(m.get(i, j)));
            }
        }
        Self { nrows, ncols, data }
    }

    /// Renders a vector as a single-column matrix.
    pub fn from_column(v: &[f64], fmt: &FloatFormat) -> Self {
        Self {
            nrows: v.len(),
            ncols: 1,
            data: v.iter().map(|&x| fmt.render(x)).collect(),
        }
    }

    /// Parses the stored strings back into a matrix.
    ///
    /// # Errors
    ///
    /// `Error::Decode` on a malformed value, `Error::ShapeMismatch` if the
    /// flattened length disagrees with the declared shape.
    pub fn to_matrix(&self) -> Result<MatrixBuffer<f64>> {
        let data = self
            .data
            .iter()
            .map(|s| {
                s.parse::<f64>()
                    .map_err(|e| Error::Decode(format!("bad float {s:?}: {e}")))
            })
            .collect::<Result<Vec<f64>>>()?;
        MatrixBuffer::from_vec(self.nrows, self.ncols, data)
    }
}

/// A complex matrix flattened row-major, split into real and imaginary
/// string planes.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct GoldenComplexMatrix {
    /// Number of rows
    pub nrows: usize,
    /// Number of columns
    pub ncols: usize,
    /// Row-major flattened real parts
    pub re: Vec<String>,
    /// Row-major flattened imaginary parts
    pub im: Vec<String>,
}

impl GoldenComplexMatrix {
    /// Renders a complex matrix with the given format.
    pub fn from_matrix(m: &MatrixBuffer<Complex64>, fmt: &FloatFormat) -> Self {
        let (nrows, ncols) = m.shape();
        let mut re = Vec::with_capacity(nrows * ncols);
        let mut im = Vec::with_capacity(nrows * ncols);
        for i in 0..nrows {
            for j in 0..ncols {
                let z = m.get(i, j);
                re.push(fmt.render(z.re));
                im.push(fmt.render(z.im));
            }
        }
        Self {
            nrows,
            ncols,
            re,
            im,
        }
    }

    /// Renders a complex vector as a single-column matrix.
    pub fn from_column(v: &[Complex64], fmt: &FloatFormat) -> Self {
        Self {
            nrows: v.len(),
            ncols: 1,
            re: v.iter().map(|z| fmt.render(z.re)).collect(),
            im: v.iter().map(|z| fmt.render(z.im)).collect(),
        }
    }

    /// Parses the stored strings back into a complex matrix.
    ///
    /// # Errors
    ///
    /// `Error::Decode` on a malformed value or mismatched plane lengths.
    pub fn to_matrix(&self) -> Result<MatrixBuffer<Complex64>> {
        if self.re.len() != self.im.len() {
            return Err(Error::Decode(format!(
                "real/imaginary plane lengths differ: {} vs {}",
                self.re.len(),
                self.im.len()
            )));
        }
        let data = self
            .re
            .iter()
            .zip(self.im.iter())
            .map(|(r, i)| {
                let re = r
                    .parse::<f64>()
                    .map_err(|e| Error::Decode(format!("bad float {r:?}: {e}")))?;
                let im = i
                    .parse::<f64>()
                    .map_err(|e| Error::Decode(format!("bad float {i:?}: {e}")))?;
                Ok(Complex64::new(re, im))
            })
            .collect::<Result<Vec<Complex64>>>()?;
        MatrixBuffer::from_vec(self.nrows, self.ncols, data)
    }
}

/// One named value inside a golden case.
///
/// Untagged on the wire; variants are ordered so the most field-demanding
/// shape is tried first and decoding is unambiguous.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum GoldenEntry {
    /// Complex matrix (also carries eigenvalue vectors as single columns)
    ComplexMatrix(GoldenComplexMatrix),
    /// Real matrix or vector
    Matrix(GoldenMatrix),
    /// Integer index sequence, e.g. a row permutation
    Indices {
        /// The index values
        data: Vec<usize>,
    },
}

/// Named values of one reference case, e.g. `{"m1": ..., "m2": ..., "m3": ...}`.
pub type GoldenCase = BTreeMap<String, GoldenEntry>;

/// A named, versioned bundle of reference cases.
///
/// Cases form a two-level tree: a group key, then a case key within the
/// group. The multiplication grid uses the matrix order as group and the
/// inner dimension as case; single-case records use one group with one
/// entry. `BTreeMap` keeps the serialized key order canonical.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct GoldenRecord {
    /// Record name, e.g. the case-selection identifier that produced it
    pub name: String,
    /// Format version for forward compatibility
    pub schema_version: u32,
    /// Significant digits every float in this record was rendered with
    pub sig_digits: usize,
    /// group key -> case key -> named entries
    pub cases: BTreeMap<String, BTreeMap<String, GoldenCase>>,
}

impl GoldenRecord {
    /// Creates an empty record stamped with the current schema version.
    pub fn new(name: impl Into<String>, fmt: &FloatFormat) -> Self {
        Self {
            name: name.into(),
            schema_version: SCHEMA_VERSION,
            sig_digits: fmt.sig_digits,
            cases: BTreeMap::new(),
        }
    }

    /// Inserts a case under `group` / `key`.
    pub fn insert(&mut self, group: impl Into<String>, key: impl Into<String>, case: GoldenCase) {
        self.cases
            .entry(group.into())
            .or_default()
            .insert(key.into(), case);
    }

    /// Serializes to pretty-printed JSON bytes.
    ///
    /// # Errors
    ///
    /// `Error::Decode` if serialization fails.
    pub fn encode(&self) -> Result<Vec<u8>> {
        serde_json::to_vec_pretty(self).map_err(|e| Error::Decode(e.to_string()))
    }

    /// Deserializes from JSON bytes.
    ///
    /// # Errors
    ///
    /// `Error::Decode` on malformed input.
    pub fn decode(bytes: &[u8]) -> Result<Self> {
        serde_json::from_slice(bytes).map_err(|e| Error::Decode(e.to_string()))
    }
}
