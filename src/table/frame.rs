//! Keyed numeric table
//!
//! A [`Frame`] stores one row per matrix key and one column per named
//! quantity (a timing configuration, a metadata attribute or a derived
//! value). Cells are `f64`; missing measurements are NaN.

use std::collections::{HashMap, HashSet};

use ndarray::{concatenate, Array1, Array2, ArrayView1, Axis};

use crate::error::{AnalysisError, Result};

/// Numeric table indexed by matrix key.
#[derive(Debug, Clone, PartialEq)]
pub struct Frame {
    index: Vec<String>,
    columns: Vec<String>,
    data: Array2<f64>,
}

impl Frame {
    /// Creates a frame from row keys, column names and a rows × columns cell array.
    ///
    /// Fails if the array shape disagrees with the labels or a key or
    /// column name repeats.
    pub fn new(index: Vec<String>, columns: Vec<String>, data: Array2<f64>) -> Result<Self> {
        if data.nrows() != index.len() || data.ncols() != columns.len() {
            return Err(AnalysisError::Shape(format!(
                "{} keys × {} columns but cells are {}×{}",
                index.len(),
                columns.len(),
                data.nrows(),
                data.ncols()
            )));
        }

        let mut seen = HashSet::with_capacity(index.len());
        for key in &index {
            if !seen.insert(key.as_str()) {
                return Err(AnalysisError::DuplicateKey(key.clone()));
            }
        }

        let mut seen = HashSet::with_capacity(columns.len());
        for name in &columns {
            if !seen.insert(name.as_str()) {
                return Err(AnalysisError::Shape(format!("column `{}` repeats", name)));
            }
        }

        Ok(Self {
            index,
            columns,
            data,
        })
    }

    /// Creates a frame from row-major cell values
    pub fn from_rows(index: Vec<String>, columns: Vec<String>, cells: Vec<f64>) -> Result<Self> {
        let shape = (index.len(), columns.len());
        let data = Array2::from_shape_vec(shape, cells)
            .map_err(|e| AnalysisError::Shape(e.to_string()))?;
        Self::new(index, columns, data)
    }

    /// A frame with the given columns and no rows
    pub fn empty(columns: Vec<String>) -> Self {
        let n_cols = columns.len();
        Self {
            index: Vec::new(),
            columns,
            data: Array2::zeros((0, n_cols)),
        }
    }

    /// Row keys in order
    pub fn index(&self) -> &[String] {
        &self.index
    }

    /// Column names in order
    pub fn columns(&self) -> &[String] {
        &self.columns
    }

    /// Cell array, rows × columns
    pub fn data(&self) -> &Array2<f64> {
        &self.data
    }

    pub fn n_rows(&self) -> usize {
        self.index.len()
    }

    pub fn n_cols(&self) -> usize {
        self.columns.len()
    }

    pub fn is_empty(&self) -> bool {
        self.index.is_empty()
    }

    pub fn has_column(&self, name: &str) -> bool {
        self.column_position(name).is_some()
    }

    /// Position of a column, if present
    pub fn column_position(&self, name: &str) -> Option<usize> {
        self.columns.iter().position(|c| c == name)
    }

    /// Position of a row key, if present
    pub fn position(&self, key: &str) -> Option<usize> {
        self.index.iter().position(|k| k == key)
    }

    /// Map from row key to position, for repeated lookups
    pub fn key_positions(&self) -> HashMap<&str, usize> {
        self.index
            .iter()
            .enumerate()
            .map(|(i, k)| (k.as_str(), i))
            .collect()
    }

    /// Values of one column, in row order
    pub fn column(&self, name: &str) -> Result<ArrayView1<'_, f64>> {
        let j = self
            .column_position(name)
            .ok_or_else(|| AnalysisError::MissingColumn(name.to_string()))?;
        Ok(self.data.column(j))
    }

    /// Value of one cell, if both the key and the column exist
    pub fn value(&self, key: &str, column: &str) -> Option<f64> {
        let i = self.position(key)?;
        let j = self.column_position(column)?;
        Some(self.data[[i, j]])
    }

    /// Replaces the column `name`, or appends it if absent
    pub fn set_column(&mut self, name: &str, values: Array1<f64>) -> Result<()> {
        if values.len() != self.n_rows() {
            return Err(AnalysisError::Shape(format!(
                "column `{}` has {} values for {} rows",
                name,
                values.len(),
                self.n_rows()
            )));
        }

        match self.column_position(name) {
            Some(j) => self.data.column_mut(j).assign(&values),
            None => {
                let appended = values.view().insert_axis(Axis(1));
                self.data = concatenate(Axis(1), &[self.data.view(), appended])
                    .map_err(|e| AnalysisError::Shape(e.to_string()))?;
                self.columns.push(name.to_string());
            }
        }
        Ok(())
    }

    /// Projects the frame onto the named columns, in the given order
    pub fn select(&self, names: &[&str]) -> Result<Frame> {
        let positions = names
            .iter()
            .map(|name| {
                self.column_position(name)
                    .ok_or_else(|| AnalysisError::MissingColumn(name.to_string()))
            })
            .collect::<Result<Vec<_>>>()?;

        if positions.is_empty() {
            return Frame::new(self.index.clone(), Vec::new(), Array2::zeros((self.n_rows(), 0)));
        }

        Frame::new(
            self.index.clone(),
            names.iter().map(|n| n.to_string()).collect(),
            self.data.select(Axis(1), &positions),
        )
    }

    /// Keeps the rows at the given positions, in the given order
    pub fn take_rows(&self, positions: &[usize]) -> Frame {
        if positions.is_empty() {
            return Frame::empty(self.columns.clone());
        }
        Self {
            index: positions.iter().map(|&i| self.index[i].clone()).collect(),
            columns: self.columns.clone(),
            data: self.data.select(Axis(0), positions),
        }
    }

    /// Keeps the rows whose mask entry is true
    ///
    /// # Panics
    ///
    /// Panics if the mask length differs from the row count.
    pub fn filter(&self, mask: &[bool]) -> Frame {
        assert_eq!(mask.len(), self.n_rows(), "mask length must match row count");
        let positions: Vec<usize> = mask
            .iter()
            .enumerate()
            .filter_map(|(i, &keep)| keep.then_some(i))
            .collect();
        self.take_rows(&positions)
    }

    /// Keeps the rows where `predicate` holds for the value of `column`
    pub fn where_column<F>(&self, column: &str, predicate: F) -> Result<Frame>
    where
        F: Fn(f64) -> bool,
    {
        let mask: Vec<bool> = self.column(column)?.iter().map(|&v| predicate(v)).collect();
        Ok(self.filter(&mask))
    }

    /// The `n` rows with the largest values of `column`, largest first
    ///
    /// NaN values never rank; ties keep row order.
    pub fn nlargest(&self, n: usize, column: &str) -> Result<Frame> {
        let values = self.column(column)?;
        let mut ranked: Vec<usize> = (0..self.n_rows()).filter(|&i| !values[i].is_nan()).collect();
        ranked.sort_by(|&a, &b| values[b].total_cmp(&values[a]));
        ranked.truncate(n);
        Ok(self.take_rows(&ranked))
    }
}
