//! Loading benchmark result documents
//!
//! The benchmark harness writes one JSON object per document, keyed by
//! matrix id, whose values map attribute or configuration names to numbers:
//!
//! ```json
//! {"cage4": {"CPU CSR": 0.0021, "GPU COO": 0.0004}}
//! ```
//!
//! Each document is transposed into a [`Frame`] with one row per matrix.
//! Timings are joined with the shared `matrices_info.json` metadata and a
//! nonzeros-per-row column is derived.

use std::collections::HashMap;
use std::fs::File;
use std::io::BufReader;
use std::path::Path;

use ndarray::Array1;
use serde_json::{Map, Value};
use tracing::{debug, info, warn};

use crate::config::Precision;
use crate::constants::{MATRICES_INFO_FILE, NNZPR_COLUMN, NNZ_COLUMN, ROWS_COLUMN};
use crate::error::{AnalysisError, Result};
use crate::table::{Frame, JoinOutcome};

/// Number of dropped keys named in a join warning
const SAMPLE_KEYS_IN_WARNING: usize = 5;

/// Tables produced by loading one precision
#[derive(Debug, Clone)]
pub struct LoadedData {
    /// Raw timings, one column per configuration
    pub source: Frame,
    /// Timings joined with metadata, plus `nnzpr`
    pub merged: Frame,
}

/// How strictly record values are interpreted
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum CellPolicy {
    /// Every value must be a number or null
    NumericOnly,
    /// Non-numeric values are skipped
    SkipNonNumeric,
}

/// Loads the shared metadata document from a results directory
pub fn load_metadata<P: AsRef<Path>>(results_dir: P) -> Result<Frame> {
    let path = results_dir.as_ref().join(MATRICES_INFO_FILE);
    load_metadata_file(&path)
}

fn load_metadata_file(path: &Path) -> Result<Frame> {
    let doc = read_document(path)?;
    let frame = records_to_frame(path, &doc, CellPolicy::SkipNonNumeric)?;
    debug!(
        path = %path.display(),
        matrices = frame.n_rows(),
        attributes = frame.n_cols(),
        "loaded matrix metadata"
    );
    Ok(frame)
}

/// Loads a timing document
pub fn load_timings<P: AsRef<Path>>(path: P) -> Result<Frame> {
    let path = path.as_ref();
    let doc = read_document(path)?;
    let frame = records_to_frame(path, &doc, CellPolicy::NumericOnly)?;
    debug!(
        path = %path.display(),
        matrices = frame.n_rows(),
        configurations = frame.n_cols(),
        "loaded timings"
    );
    Ok(frame)
}

/// Loads the timings of one precision and joins them with the metadata
pub fn load_data<P: AsRef<Path>>(results_dir: P, precision: Precision) -> Result<LoadedData> {
    let dir = results_dir.as_ref();
    info!(precision = %precision, dir = %dir.display(), "loading benchmark results");
    load_data_from_paths(dir.join(MATRICES_INFO_FILE), dir.join(precision.file_name()))
}

/// Loads a metadata document and a timing document from explicit paths
pub fn load_data_from_paths<P, Q>(metadata: P, timings: Q) -> Result<LoadedData>
where
    P: AsRef<Path>,
    Q: AsRef<Path>,
{
    let info = load_metadata_file(metadata.as_ref())?;
    let source = load_timings(timings)?;
    let merged = merge(&source, &info)?;
    Ok(LoadedData { source, merged })
}

/// Inner-joins timings with metadata and derives `nnzpr = nnz / rows`
pub fn merge(source: &Frame, info: &Frame) -> Result<Frame> {
    let outcome = source.inner_join(info)?;
    report_dropped_keys(&outcome);

    let mut merged = outcome.frame;
    let nnz = merged.column(NNZ_COLUMN)?;
    let rows = merged.column(ROWS_COLUMN)?;
    let nnzpr: Array1<f64> = &nnz / &rows;
    merged.set_column(NNZPR_COLUMN, nnzpr)?;

    if merged.is_empty() {
        warn!("timings and metadata share no matrix keys; statistics will be empty");
    }
    Ok(merged)
}

fn report_dropped_keys(outcome: &JoinOutcome) {
    if !outcome.dropped_any() {
        debug!(matrices = outcome.frame.n_rows(), "every matrix has timings and metadata");
        return;
    }
    if !outcome.left_only.is_empty() {
        warn!(
            count = outcome.left_only.len(),
            sample = ?sample_keys(&outcome.left_only),
            "matrices with timings but no metadata were dropped"
        );
    }
    if !outcome.right_only.is_empty() {
        debug!(
            count = outcome.right_only.len(),
            sample = ?sample_keys(&outcome.right_only),
            "matrices with metadata but no timings were dropped"
        );
    }
}

fn sample_keys(keys: &[String]) -> &[String] {
    &keys[..keys.len().min(SAMPLE_KEYS_IN_WARNING)]
}

fn read_document(path: &Path) -> Result<Map<String, Value>> {
    let file = File::open(path).map_err(|source| AnalysisError::Io {
        path: path.to_path_buf(),
        source,
    })?;

    let value: Value =
        serde_json::from_reader(BufReader::new(file)).map_err(|source| AnalysisError::Json {
            path: path.to_path_buf(),
            source,
        })?;

    match value {
        Value::Object(map) => Ok(map),
        other => Err(AnalysisError::Layout {
            path: path.to_path_buf(),
            reason: format!("top level is {}, expected an object", kind(&other)),
        }),
    }
}

/// Transposes `{key: {name: value}}` into a frame with one row per key
fn records_to_frame(path: &Path, doc: &Map<String, Value>, policy: CellPolicy) -> Result<Frame> {
    let layout_error = |reason: String| AnalysisError::Layout {
        path: path.to_path_buf(),
        reason,
    };

    let mut records = Vec::with_capacity(doc.len());
    for (key, record) in doc {
        match record {
            Value::Object(fields) => records.push((key, fields)),
            other => {
                return Err(layout_error(format!(
                    "record `{}` is {}, expected an object",
                    key,
                    kind(other)
                )))
            }
        }
    }

    // Columns in order of first appearance
    let mut columns: Vec<String> = Vec::new();
    let mut column_of: HashMap<&str, usize> = HashMap::new();
    for (key, fields) in &records {
        for (name, value) in fields.iter() {
            let numeric = matches!(value, Value::Number(_) | Value::Null);
            if !numeric && policy == CellPolicy::NumericOnly {
                return Err(layout_error(format!(
                    "`{}` of record `{}` is {}, expected a number",
                    name,
                    key,
                    kind(value)
                )));
            }
            if matches!(value, Value::Number(_)) && !column_of.contains_key(name.as_str()) {
                column_of.insert(name.as_str(), columns.len());
                columns.push(name.clone());
            }
        }
    }

    let n_cols = columns.len();
    let mut cells = vec![f64::NAN; records.len() * n_cols];
    for (i, (_, fields)) in records.iter().enumerate() {
        for (name, value) in fields.iter() {
            if let (Some(&j), Some(number)) = (column_of.get(name.as_str()), value.as_f64()) {
                cells[i * n_cols + j] = number;
            }
        }
    }

    let index = records.iter().map(|(key, _)| key.to_string()).collect();
    Frame::from_rows(index, columns, cells)
}

fn kind(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "a boolean",
        Value::Number(_) => "a number",
        Value::String(_) => "a string",
        Value::Array(_) => "an array",
        Value::Object(_) => "an object",
    }
}
