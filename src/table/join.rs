//! Inner join of two frames on their row keys

use ndarray::{concatenate, Axis};

use crate::constants::{LEFT_SUFFIX, RIGHT_SUFFIX};
use crate::error::{AnalysisError, Result};
use crate::table::Frame;

/// Result of joining two frames on their keys
#[derive(Debug, Clone)]
pub struct JoinOutcome {
    /// Rows whose key exists on both sides, in left order
    pub frame: Frame,
    /// Keys found only in the left frame
    pub left_only: Vec<String>,
    /// Keys found only in the right frame
    pub right_only: Vec<String>,
}

impl JoinOutcome {
    /// Whether any key was dropped from either side
    pub fn dropped_any(&self) -> bool {
        !self.left_only.is_empty() || !self.right_only.is_empty()
    }
}

impl Frame {
    /// Joins `right` onto `self`, keeping only keys present in both.
    ///
    /// Left columns come first. A column name shared by both frames is
    /// suffixed with `_x` on the left and `_y` on the right.
    pub fn inner_join(&self, right: &Frame) -> Result<JoinOutcome> {
        let right_positions = right.key_positions();

        let mut left_rows = Vec::new();
        let mut right_rows = Vec::new();
        let mut left_only = Vec::new();
        for (i, key) in self.index().iter().enumerate() {
            match right_positions.get(key.as_str()) {
                Some(&j) => {
                    left_rows.push(i);
                    right_rows.push(j);
                }
                None => left_only.push(key.clone()),
            }
        }

        let left_positions = self.key_positions();
        let right_only: Vec<String> = right
            .index()
            .iter()
            .filter(|k| !left_positions.contains_key(k.as_str()))
            .cloned()
            .collect();

        let columns = joined_columns(self.columns(), right.columns());
        let left = self.take_rows(&left_rows);
        let right = right.take_rows(&right_rows);

        let data = concatenate(Axis(1), &[left.data().view(), right.data().view()])
            .map_err(|e| AnalysisError::Shape(e.to_string()))?;
        let frame = Frame::new(left.index().to_vec(), columns, data)?;

        Ok(JoinOutcome {
            frame,
            left_only,
            right_only,
        })
    }
}

fn joined_columns(left: &[String], right: &[String]) -> Vec<String> {
    let clashes = |name: &String, other: &[String]| other.iter().any(|o| o == name);

    let mut columns = Vec::with_capacity(left.len() + right.len());
    for name in left {
        if clashes(name, right) {
            columns.push(format!("{}{}", name, LEFT_SUFFIX));
        } else {
            columns.push(name.clone());
        }
    }
    for name in right {
        if clashes(name, left) {
            columns.push(format!("{}{}", name, RIGHT_SUFFIX));
        } else {
            columns.push(name.clone());
        }
    }
    columns
}

#[cfg(test)]
mod tests {
    use super::*;

    fn strings(names: &[&str]) -> Vec<String> {
        names.iter().map(|s| s.to_string()).collect()
    }

    #[test]
    fn test_inner_join_keeps_shared_keys() {
        let timings = Frame::from_rows(
            strings(&["m1", "m2", "m3"]),
            strings(&["CPU CSR"]),
            vec![1.0, 2.0, 3.0],
        )
        .unwrap();
        let info = Frame::from_rows(
            strings(&["m3", "m1", "m4"]),
            strings(&["rows", "nnz"]),
            vec![30.0, 300.0, 10.0, 100.0, 40.0, 400.0],
        )
        .unwrap();

        let outcome = timings.inner_join(&info).unwrap();
        assert_eq!(outcome.frame.index(), &strings(&["m1", "m3"])[..]);
        assert_eq!(outcome.frame.columns(), &strings(&["CPU CSR", "rows", "nnz"])[..]);
        assert_eq!(outcome.frame.value("m1", "nnz"), Some(100.0));
        assert_eq!(outcome.frame.value("m3", "CPU CSR"), Some(3.0));
        assert_eq!(outcome.left_only, strings(&["m2"]));
        assert_eq!(outcome.right_only, strings(&["m4"]));
        assert!(outcome.dropped_any());
    }

    #[test]
    fn test_disjoint_join_is_empty() {
        let left = Frame::from_rows(strings(&["a"]), strings(&["x"]), vec![1.0]).unwrap();
        let right = Frame::from_rows(strings(&["b"]), strings(&["y"]), vec![2.0]).unwrap();

        let outcome = left.inner_join(&right).unwrap();
        assert!(outcome.frame.is_empty());
        assert_eq!(outcome.frame.columns(), &strings(&["x", "y"])[..]);
    }

    #[test]
    fn test_clashing_columns_are_suffixed() {
        let left = Frame::from_rows(strings(&["a"]), strings(&["rows", "t"]), vec![1.0, 2.0]).unwrap();
        let right = Frame::from_rows(strings(&["a"]), strings(&["rows"]), vec![5.0]).unwrap();

        let outcome = left.inner_join(&right).unwrap();
        assert_eq!(outcome.frame.columns(), &strings(&["rows_x", "t", "rows_y"])[..]);
        assert!(!outcome.dropped_any());
    }
}
