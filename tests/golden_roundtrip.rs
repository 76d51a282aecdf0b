//! Integration tests for golden-record encoding
//!
//! Tests verify:
//! - Round-trip law: decode(encode(r)) == r
//! - Decoded values within 1e-12 relative error of the originals
//! - Grid structure: order -> inner dimension -> {m1, m2, m3}
//! - Case records carry every named output of their kernel
//! - Malformed input rejected with a decode error

use refla::error::Error;
use refla::golden::{cases, FloatFormat, GoldenEntry, GoldenRecord};
use refla::linalg::matmul;

mod common;

#[test]
fn test_round_trip_identity() {
    let fmt = FloatFormat::default();
    for record in [
        cases::eig_case(&fmt).unwrap(),
        cases::symmetric_eig_case(&fmt).unwrap(),
        cases::lu_case(true, &fmt).unwrap(),
        cases::lu_case(false, &fmt).unwrap(),
        cases::matmul_grid(42, &fmt).unwrap(),
    ] {
        let bytes = record.encode().unwrap();
        let back = GoldenRecord::decode(&bytes).unwrap();
        assert_eq!(back, record, "round trip of {}", record.name);
    }
}

#[test]
fn test_grid_values_round_trip_within_tolerance() {
    let fmt = FloatFormat::default();
    let record = cases::matmul_grid(7, &fmt).unwrap();
    let back = GoldenRecord::decode(&record.encode().unwrap()).unwrap();

    for (n, group) in &back.cases {
        for (k, case) in group {
            let GoldenEntry::Matrix(m1) = &case["m1"] else {
                panic!("m1 is not a real matrix");
            };
            let GoldenEntry::Matrix(m2) = &case["m2"] else {
                panic!("m2 is not a real matrix");
            };
            let GoldenEntry::Matrix(m3) = &case["m3"] else {
                panic!("m3 is not a real matrix");
            };
            // Decoded factors must still multiply to the decoded product
            // within the declared precision
            let product = matmul(&m1.to_matrix().unwrap(), &m2.to_matrix().unwrap()).unwrap();
            let stored = m3.to_matrix().unwrap();
            for (a, b) in product.as_slice().iter().zip(stored.as_slice()) {
                let tol = 1e-12 * b.abs().max(1.0);
                assert!((a - b).abs() <= tol, "grid ({n}, {k}): {a} vs {b}");
            }
        }
    }
}

#[test]
fn test_record_metadata() {
    let fmt = FloatFormat::with_digits(14);
    let record = cases::eig_case(&fmt).unwrap();
    assert_eq!(record.name, "eig");
    assert_eq!(record.sig_digits, 14);
    assert_eq!(record.schema_version, refla::golden::SCHEMA_VERSION);
}

#[test]
fn test_lu_case_carries_all_factors() {
    let fmt = FloatFormat::default();
    let record = cases::lu_case(true, &fmt).unwrap();
    let case = &record.cases["lu-diagonal-dominant"]["3"];
    for key in ["a", "p", "l", "u"] {
        assert!(case.contains_key(key), "missing entry {key}");
    }
    assert!(matches!(case["p"], GoldenEntry::Indices { .. }));
}

#[test]
fn test_decode_rejects_malformed() {
    assert!(matches!(
        GoldenRecord::decode(b"{\"name\": 3}"),
        Err(Error::Decode(_))
    ));
    assert!(matches!(
        GoldenRecord::decode(b"\xff\xfe"),
        Err(Error::Decode(_))
    ));
}
