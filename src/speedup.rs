//! Speedup of every configuration relative to a baseline
//!
//! `speedup = baseline_time / config_time`, so values above one mean the
//! configuration ran faster than the baseline. Zero or missing timings
//! produce infinite or NaN speedups, which are kept as they are; statistics
//! downstream skip NaN and therefore see fewer samples.

use ndarray::Array1;
use tracing::debug;

use crate::error::{AnalysisError, Result};
use crate::table::Frame;

/// Computes `source[base] / source[column]` for the rows of `merged`, matched by key
///
/// Rows of `merged` missing from `source` get NaN.
pub fn speedup_column(merged: &Frame, source: &Frame, base: &str, column: &str) -> Result<Array1<f64>> {
    let base_values = source.column(base)?;
    let values = source.column(column)?;
    let positions = source.key_positions();

    Ok(merged
        .index()
        .iter()
        .map(|key| match positions.get(key.as_str()) {
            Some(&i) => base_values[i] / values[i],
            None => f64::NAN,
        })
        .collect())
}

/// Replaces every timing column of `merged` with its speedup over `base`
///
/// Metadata columns are carried over unchanged.
pub fn calculate_speedup(merged: &Frame, source: &Frame, base: &str) -> Result<Frame> {
    if !source.has_column(base) {
        return Err(AnalysisError::MissingColumn(base.to_string()));
    }

    let mut speedup = merged.clone();
    for column in source.columns() {
        let values = speedup_column(merged, source, base, column)?;
        speedup.set_column(column, values)?;
    }

    let non_finite = source
        .columns()
        .iter()
        .filter_map(|c| speedup.column(c).ok())
        .map(|col| col.iter().filter(|v| !v.is_finite()).count())
        .sum::<usize>();
    if non_finite > 0 {
        debug!(non_finite, base, "speedup table contains infinite or NaN entries");
    }

    Ok(speedup)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::constants::BASELINE_CONFIGURATION;

    fn strings(names: &[&str]) -> Vec<String> {
        names.iter().map(|s| s.to_string()).collect()
    }

    #[test]
    fn test_baseline_becomes_one() {
        let source = Frame::from_rows(
            strings(&["m1", "m2"]),
            strings(&["CPU CSR", "GPU COO"]),
            vec![2.0, 1.0, 3.0, 6.0],
        )
        .unwrap();

        let speedup = calculate_speedup(&source, &source, BASELINE_CONFIGURATION).unwrap();
        assert_eq!(speedup.value("m1", "CPU CSR"), Some(1.0));
        assert_eq!(speedup.value("m2", "CPU CSR"), Some(1.0));
        assert_eq!(speedup.value("m1", "GPU COO"), Some(2.0));
        assert_eq!(speedup.value("m2", "GPU COO"), Some(0.5));
    }

    #[test]
    fn test_zero_and_missing_propagate() {
        let source = Frame::from_rows(
            strings(&["m1", "m2"]),
            strings(&["CPU CSR", "GPU ELL"]),
            vec![2.0, 0.0, 1.0, f64::NAN],
        )
        .unwrap();

        let speedup = calculate_speedup(&source, &source, "CPU CSR").unwrap();
        assert_eq!(speedup.value("m1", "GPU ELL"), Some(f64::INFINITY));
        assert!(speedup.value("m2", "GPU ELL").unwrap().is_nan());
        assert_eq!(speedup.n_rows(), 2);
    }

    #[test]
    fn test_missing_baseline() {
        let source = Frame::from_rows(strings(&["m1"]), strings(&["GPU COO"]), vec![1.0]).unwrap();
        let err = calculate_speedup(&source, &source, "CPU CSR").unwrap_err();
        assert!(matches!(err, AnalysisError::MissingColumn(c) if c == "CPU CSR"));
    }

    #[test]
    fn test_rows_follow_merged_order() {
        let source = Frame::from_rows(
            strings(&["a", "b"]),
            strings(&["CPU CSR", "GPU CSR"]),
            vec![4.0, 2.0, 9.0, 3.0],
        )
        .unwrap();
        let merged = source.take_rows(&[1]);

        let speedup = calculate_speedup(&merged, &source, "CPU CSR").unwrap();
        assert_eq!(speedup.index(), &strings(&["b"])[..]);
        assert_eq!(speedup.value("b", "GPU CSR"), Some(3.0));
    }
}
