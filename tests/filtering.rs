//! Integration tests for row filters

use std::collections::HashSet;

use proptest::prelude::*;
use spmv_analysis::filter::rows_where_less;
use spmv_analysis::{filter_by_nnz, Frame, RowFilter};

fn frame(rows: &[(f64, f64, f64, f64)]) -> Frame {
    let index = (0..rows.len()).map(|i| format!("m{}", i)).collect();
    let columns = ["nnz", "std_deviation", "GPU CSR", "GPU CSR (vector)"]
        .iter()
        .map(|s| s.to_string())
        .collect();
    let cells = rows.iter().flat_map(|&(a, b, c, d)| [a, b, c, d]).collect();
    Frame::from_rows(index, columns, cells).unwrap()
}

fn key_set(frame: &Frame) -> HashSet<String> {
    frame.index().iter().cloned().collect()
}

#[test]
fn test_nnz_thresholds() {
    let speedups = frame(&[
        (9_000.0, 10.0, 2.0, 1.0),
        (10_000.0, 10.0, 2.0, 1.0),
        (10_001.0, 300.0, 2.0, 3.0),
        (250_000.0, 50.0, f64::NAN, 1.0),
    ]);

    let mid = filter_by_nnz(&speedups, 10_000.0).unwrap();
    assert_eq!(mid.index(), &["m2".to_string(), "m3".to_string()][..]);

    let large = filter_by_nnz(&speedups, 100_000.0).unwrap();
    assert_eq!(large.index(), &["m3".to_string()][..]);

    assert!(filter_by_nnz(&speedups, 1e9).unwrap().is_empty());
}

#[test]
fn test_joint_plot_query() {
    let speedups = frame(&[
        (20_000.0, 150.0, 2.0, 1.0),
        (20_000.0, 250.0, 2.0, 1.0),
        (5_000.0, 10.0, 2.0, 1.0),
        (20_000.0, f64::NAN, 2.0, 1.0),
    ]);

    let query = RowFilter::new()
        .greater_than("nnz", 10_000.0)
        .less_than("std_deviation", 200.0);
    let subset = query.apply(&speedups).unwrap();
    assert_eq!(subset.index(), &["m0".to_string()][..]);
    assert_eq!(subset.columns(), speedups.columns());
}

#[test]
fn test_unknown_column_is_an_error() {
    let speedups = frame(&[(20_000.0, 150.0, 2.0, 1.0)]);
    assert!(RowFilter::new().less_than("bandwidth", 1.0).apply(&speedups).is_err());
}

#[test]
fn test_csr_vector_slower_than_csr() {
    let speedups = frame(&[
        (20_000.0, 1.0, 4.0, 2.0),
        (20_000.0, 1.0, 1.0, 2.0),
        (20_000.0, 1.0, 3.0, 3.0),
        (20_000.0, 1.0, f64::NAN, 1.0),
    ]);

    let slower = rows_where_less(&speedups, "GPU CSR (vector)", "GPU CSR").unwrap();
    assert_eq!(slower.index(), &["m0".to_string()][..]);
}

proptest! {
    #[test]
    fn prop_nnz_filter_is_monotonic(
        nnz in prop::collection::vec(0.0f64..1e6, 0..50),
        low in 0.0f64..5e5,
        gap in 0.0f64..5e5,
    ) {
        let rows: Vec<_> = nnz.iter().map(|&n| (n, 1.0, 1.0, 1.0)).collect();
        let speedups = frame(&rows);

        let wide = filter_by_nnz(&speedups, low).unwrap();
        let narrow = filter_by_nnz(&speedups, low + gap).unwrap();

        prop_assert!(key_set(&narrow).is_subset(&key_set(&wide)));
        prop_assert!(wide.column("nnz").unwrap().iter().all(|&v| v > low));
    }
}
