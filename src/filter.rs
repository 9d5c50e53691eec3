//! Row subsets of speedup tables
//!
//! Comparisons involving NaN are false, so rows with missing values never
//! survive a filter on that column.

use crate::constants::NNZ_COLUMN;
use crate::error::Result;
use crate::table::Frame;

/// Direction of a single-column comparison
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Comparison {
    Greater,
    Less,
}

impl Comparison {
    fn holds(&self, value: f64, threshold: f64) -> bool {
        match self {
            Comparison::Greater => value > threshold,
            Comparison::Less => value < threshold,
        }
    }
}

/// One `column <op> threshold` condition
#[derive(Debug, Clone, PartialEq)]
pub struct Condition {
    pub column: String,
    pub comparison: Comparison,
    pub threshold: f64,
}

/// Conjunction of column conditions
///
/// ```
/// use spmv_analysis::filter::RowFilter;
///
/// let query = RowFilter::new()
///     .greater_than("nnz", 10_000.0)
///     .less_than("std_deviation", 200.0);
/// assert_eq!(query.to_string(), "nnz > 10000 & std_deviation < 200");
/// ```
#[derive(Debug, Clone, Default, PartialEq)]
pub struct RowFilter {
    conditions: Vec<Condition>,
}

impl RowFilter {
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds `column > threshold`
    pub fn greater_than(mut self, column: &str, threshold: f64) -> Self {
        self.conditions.push(Condition {
            column: column.to_string(),
            comparison: Comparison::Greater,
            threshold,
        });
        self
    }

    /// Adds `column < threshold`
    pub fn less_than(mut self, column: &str, threshold: f64) -> Self {
        self.conditions.push(Condition {
            column: column.to_string(),
            comparison: Comparison::Less,
            threshold,
        });
        self
    }

    pub fn conditions(&self) -> &[Condition] {
        &self.conditions
    }

    /// Rows satisfying every condition, in original order
    pub fn apply(&self, frame: &Frame) -> Result<Frame> {
        let mut mask = vec![true; frame.n_rows()];
        for condition in &self.conditions {
            let values = frame.column(&condition.column)?;
            for (keep, &value) in mask.iter_mut().zip(values.iter()) {
                *keep = *keep && condition.comparison.holds(value, condition.threshold);
            }
        }
        Ok(frame.filter(&mask))
    }
}

impl std::fmt::Display for RowFilter {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        for (i, condition) in self.conditions.iter().enumerate() {
            if i > 0 {
                f.write_str(" & ")?;
            }
            let op = match condition.comparison {
                Comparison::Greater => '>',
                Comparison::Less => '<',
            };
            write!(f, "{} {} {}", condition.column, op, condition.threshold)?;
        }
        Ok(())
    }
}

/// Rows with `nnz > limit`
pub fn filter_by_nnz(frame: &Frame, limit: f64) -> Result<Frame> {
    frame.where_column(NNZ_COLUMN, |nnz| nnz > limit)
}

/// Rows where `left < right`
pub fn rows_where_less(frame: &Frame, left: &str, right: &str) -> Result<Frame> {
    let lhs = frame.column(left)?;
    let rhs = frame.column(right)?;
    let mask: Vec<bool> = lhs.iter().zip(rhs.iter()).map(|(a, b)| a < b).collect();
    Ok(frame.filter(&mask))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn frame() -> Frame {
        Frame::from_rows(
            vec!["a".into(), "b".into(), "c".into(), "d".into()],
            vec!["nnz".into(), "std_deviation".into(), "GPU CSR".into()],
            vec![
                5_000.0, 10.0, 1.0, //
                50_000.0, 150.0, 2.0, //
                500_000.0, 300.0, f64::NAN, //
                200_000.0, 20.0, 4.0,
            ],
        )
        .unwrap()
    }

    #[test]
    fn test_filter_by_nnz_is_strict() {
        let subset = filter_by_nnz(&frame(), 50_000.0).unwrap();
        assert_eq!(subset.index(), &["c".to_string(), "d".to_string()][..]);
    }

    #[test]
    fn test_row_filter_conjunction() {
        let subset = RowFilter::new()
            .greater_than("nnz", 10_000.0)
            .less_than("std_deviation", 200.0)
            .apply(&frame())
            .unwrap();
        assert_eq!(subset.index(), &["b".to_string(), "d".to_string()][..]);
    }

    #[test]
    fn test_empty_filter_keeps_everything() {
        let subset = RowFilter::new().apply(&frame()).unwrap();
        assert_eq!(subset.n_rows(), 4);
    }

    #[test]
    fn test_rows_where_less_skips_nan() {
        let subset = rows_where_less(&frame(), "GPU CSR", "std_deviation").unwrap();
        assert_eq!(subset.index(), &["a".to_string(), "b".to_string(), "d".to_string()][..]);
    }
}
