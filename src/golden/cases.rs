//! Reference case generators
//!
//! Each generator runs one kernel on pinned or seeded inputs and packs the
//! inputs and outputs into a [`GoldenRecord`]. Generation is deterministic:
//! fixed matrices are compile-time literals and random ones derive their
//! stream from the user seed plus the case coordinates, so a case produces
//! the same bytes regardless of how many grid cells run or in which order.

use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

use crate::error::Result;
use crate::linalg::{eig, eig_symmetric, lu_decompose, matmul, Uplo};
use crate::matrix::MatrixBuffer;

use super::{FloatFormat, GoldenCase, GoldenComplexMatrix, GoldenEntry, GoldenMatrix, GoldenRecord};

/// Matrix orders enumerated by the multiplication grid.
pub const GRID_ORDERS: [usize; 4] = [2, 4, 8, 16];

/// Inner dimensions enumerated by the multiplication grid.
pub const GRID_INNER_DIMS: [usize; 4] = [1, 2, 4, 8];

/// Uniform random matrix with entries in [-1, 1).
pub fn random_matrix(rng: &mut StdRng, rows: usize, cols: usize) -> Result<MatrixBuffer<f64>> {
    let data = (0..rows * cols)
        .map(|_| rng.random_range(-1.0..1.0))
        .collect();
    MatrixBuffer::from_vec(rows, cols, data)
}

/// Seeded random matrix made strictly diagonally dominant by adding each
/// row's magnitude sum to its diagonal entry.
pub fn random_diagonally_dominant(rng: &mut StdRng, n: usize) -> Result<MatrixBuffer<f64>> {
    let mut m = random_matrix(rng, n, n)?;
    for i in 0..n {
        let row_sum: f64 = (0..n).map(|j| m.get(i, j).abs()).sum();
        m.set(i, i, m.get(i, i) + row_sum);
    }
    Ok(m)
}

/// Per-cell seed: mixes the grid coordinates into the user seed so each
/// cell owns an independent stream.
fn cell_seed(seed: u64, n: usize, k: usize) -> u64 {
    seed ^ ((n as u64) << 32) ^ (k as u64)
}

fn grid_cell(seed: u64, n: usize, k: usize, fmt: &FloatFormat) -> Result<GoldenCase> {
    let mut rng = StdRng::seed_from_u64(cell_seed(seed, n, k));
    let m1 = random_matrix(&mut rng, n, k)?;
    let m2 = random_matrix(&mut rng, k, n)?;
    let m3 = matmul(&m1, &m2)?;

    let mut case = GoldenCase::new();
    case.insert(
        "m1".to_string(),
        GoldenEntry::Matrix(GoldenMatrix::from_matrix(&m1, fmt)),
    );
    case.insert(
        "m2".to_string(),
        GoldenEntry::Matrix(GoldenMatrix::from_matrix(&m2, fmt)),
    );
    case.insert(
        "m3".to_string(),
        GoldenEntry::Matrix(GoldenMatrix::from_matrix(&m3, fmt)),
    );
    Ok(case)
}

#[cfg(feature = "rayon")]
fn grid_cells(seed: u64, fmt: &FloatFormat) -> Result<Vec<(usize, usize, GoldenCase)>> {
    use rayon::prelude::*;

    let pairs: Vec<(usize, usize)> = GRID_ORDERS
        .iter()
        .flat_map(|&n| GRID_INNER_DIMS.iter().map(move |&k| (n, k)))
        .collect();
    pairs
        .par_iter()
        .map(|&(n, k)| grid_cell(seed, n, k, fmt).map(|c| (n, k, c)))
        .collect()
}

#[cfg(not(feature = "rayon"))]
fn grid_cells(seed: u64, fmt: &FloatFormat) -> Result<Vec<(usize, usize, GoldenCase)>> {
    let mut out = Vec::with_capacity(GRID_ORDERS.len() * GRID_INNER_DIMS.len());
    for &n in &GRID_ORDERS {
        for &k in &GRID_INNER_DIMS {
            out.push((n, k, grid_cell(seed, n, k, fmt)?));
        }
    }
    Ok(out)
}

/// Multiplication grid: for every `(n, k)` in the enumerated grid, two
/// seeded random factors `m1 (n x k)`, `m2 (k x n)` and their product `m3`.
/// Grouped by order `n`, keyed by inner dimension `k`.
pub fn matmul_grid(seed: u64, fmt: &FloatFormat) -> Result<GoldenRecord> {
    let mut record = GoldenRecord::new("matmul-grid", fmt);
    for (n, k, case) in grid_cells(seed, fmt)? {
        record.insert(n.to_string(), k.to_string(), case);
    }
    Ok(record)
}

/// LU reference case on a diagonally dominant or non-dominant pinned
/// matrix. The non-dominant input forces row interchanges, which is the
/// property the case probes.
pub fn lu_case(dominant: bool, fmt: &FloatFormat) -> Result<GoldenRecord> {
    let (name, a) = if dominant {
        (
            "lu-diagonal-dominant",
            MatrixBuffer::from_vec(
                3,
                3,
                vec![10.0, 2.0, 3.0, 4.0, 20.0, 6.0, 7.0, 8.0, 30.0],
            )?,
        )
    } else {
        (
            "lu-non-dominant",
            MatrixBuffer::from_vec(
                3,
                3,
                vec![1.0, 2.0, 3.0, 4.0, 5.0, 6.0, 7.0, 8.0, 10.0],
            )?,
        )
    };

    let f = lu_decompose(&a)?;

    let mut case = GoldenCase::new();
    case.insert(
        "a".to_string(),
        GoldenEntry::Matrix(GoldenMatrix::from_matrix(&a, fmt)),
    );
    case.insert(
        "p".to_string(),
        GoldenEntry::Indices {
            data: f.permutation.clone(),
        },
    );
    case.insert(
        "l".to_string(),
        GoldenEntry::Matrix(GoldenMatrix::from_matrix(&f.lower, fmt)),
    );
    case.insert(
        "u".to_string(),
        GoldenEntry::Matrix(GoldenMatrix::from_matrix(&f.upper, fmt)),
    );

    let mut record = GoldenRecord::new(name, fmt);
    record.insert(name, "3", case);
    Ok(record)
}

/// General eigendecomposition reference case: a pinned non-symmetric 3x3
/// with eigenvalues, right eigenvectors and left eigenvectors.
pub fn eig_case(fmt: &FloatFormat) -> Result<GoldenRecord> {
    let a = MatrixBuffer::from_vec(
        3,
        3,
        vec![1.0, 5.0, 0.0, 2.0, 4.0, -1.0, 0.0, 2.0, 3.0],
    )?;
    let r = eig(&a, true, true)?;
    let right = r.right.as_ref().ok_or_else(|| {
        crate::error::Error::InvalidArgument {
            arg: "right",
            reason: "right eigenvectors were requested but not produced".to_string(),
        }
    })?;
    let left = r.left.as_ref().ok_or_else(|| {
        crate::error::Error::InvalidArgument {
            arg: "left",
            reason: "left eigenvectors were requested but not produced".to_string(),
        }
    })?;

    let mut case = GoldenCase::new();
    case.insert(
        "a".to_string(),
        GoldenEntry::Matrix(GoldenMatrix::from_matrix(&a, fmt)),
    );
    case.insert(
        "eigenvalues".to_string(),
        GoldenEntry::ComplexMatrix(GoldenComplexMatrix::from_column(&r.eigenvalues, fmt)),
    );
    case.insert(
        "right".to_string(),
        GoldenEntry::ComplexMatrix(GoldenComplexMatrix::from_matrix(right, fmt)),
    );
    case.insert(
        "left".to_string(),
        GoldenEntry::ComplexMatrix(GoldenComplexMatrix::from_matrix(left, fmt)),
    );

    let mut record = GoldenRecord::new("eig", fmt);
    record.insert("eig", "3", case);
    Ok(record)
}

/// Symmetric eigendecomposition reference case: a pinned symmetric 3x3
/// with ascending eigenvalues and orthonormal eigenvectors.
pub fn symmetric_eig_case(fmt: &FloatFormat) -> Result<GoldenRecord> {
    let a = MatrixBuffer::from_vec(
        3,
        3,
        vec![1.0, 2.0, 3.0, 2.0, 4.0, 5.0, 3.0, 5.0, 6.0],
    )?;
    let r = eig_symmetric(&a, Uplo::Lower)?;

    let mut case = GoldenCase::new();
    case.insert(
        "a".to_string(),
        GoldenEntry::Matrix(GoldenMatrix::from_matrix(&a, fmt)),
    );
    case.insert(
        "eigenvalues".to_string(),
        GoldenEntry::Matrix(GoldenMatrix::from_column(&r.eigenvalues, fmt)),
    );
    case.insert(
        "eigenvectors".to_string(),
        GoldenEntry::Matrix(GoldenMatrix::from_matrix(&r.eigenvectors, fmt)),
    );

    let mut record = GoldenRecord::new("symmetric-eig", fmt);
    record.insert("symmetric-eig", "3", case);
    Ok(record)
}
