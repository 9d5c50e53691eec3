//! Console reporting of speedup statistics
//!
//! Prints a label line followed by a table of descriptive statistics with
//! one column per frame column:
//!
//! ```text
//! Data for float =>
//!         CPU CSR   GPU COO
//! count  3.000000  3.000000
//! mean   1.000000  2.500000
//! ...
//! ```

use std::io::{self, Write};

use crate::constants::{BASELINE_CONFIGURATION, DEFAULT_DISPLAY_PRECISION, DEFAULT_MAX_COLUMNS, NNZ_COLUMN};
use crate::error::Result;
use crate::stats::{describe, Summary};
use crate::table::Frame;

/// Console formatting of frames and statistics
#[derive(Debug, Clone, PartialEq)]
pub struct DisplayOptions {
    /// Decimal places for every value
    pub precision: usize,
    /// Columns shown before the middle of a wide table is elided
    pub max_columns: usize,
    /// Longest column header shown in full; `None` for no limit
    pub max_colwidth: Option<usize>,
}

impl Default for DisplayOptions {
    fn default() -> Self {
        Self {
            precision: DEFAULT_DISPLAY_PRECISION,
            max_columns: DEFAULT_MAX_COLUMNS,
            max_colwidth: None,
        }
    }
}

/// Request to list the rows with the largest speedups
#[derive(Debug, Clone, PartialEq)]
pub struct TopN {
    /// Rows listed per target
    pub n: usize,
    /// Columns ranked, one listing each
    pub targets: Vec<String>,
    /// Reference column shown next to each target
    pub baseline: String,
}

impl TopN {
    pub fn new(n: usize, targets: &[&str]) -> Self {
        Self {
            n,
            targets: targets.iter().map(|t| t.to_string()).collect(),
            baseline: BASELINE_CONFIGURATION.to_string(),
        }
    }
}

/// Statistics of every column of a frame
#[derive(Debug, Clone)]
pub struct DescribeTable {
    pub columns: Vec<String>,
    pub summaries: Vec<Summary>,
}

impl DescribeTable {
    /// Summary of one column, if present
    pub fn get(&self, column: &str) -> Option<&Summary> {
        self.columns
            .iter()
            .position(|c| c == column)
            .map(|j| &self.summaries[j])
    }
}

/// Describes every column of `frame`
pub fn describe_frame(frame: &Frame) -> DescribeTable {
    let summaries = frame
        .data()
        .columns()
        .into_iter()
        .map(|col| describe(col.iter()))
        .collect();
    DescribeTable {
        columns: frame.columns().to_vec(),
        summaries,
    }
}

/// Writes the label line and the statistics table for `frame`
///
/// With `top`, the largest rows of each target column are listed first.
pub fn write_stats<W: Write>(
    out: &mut W,
    label: &str,
    frame: &Frame,
    top: Option<&TopN>,
    options: &DisplayOptions,
) -> Result<()> {
    writeln!(out, "Data for {} => ", label)?;

    if let Some(top) = top {
        for target in &top.targets {
            let mut shown: Vec<&str> = vec![top.baseline.as_str()];
            if target != &top.baseline {
                shown.push(target.as_str());
            }
            if frame.has_column(NNZ_COLUMN) {
                shown.push(NNZ_COLUMN);
            }
            let largest = frame.nlargest(top.n, target)?.select(&shown)?;
            write_frame(out, &largest, options)?;
        }
    }

    let table = describe_frame(frame);
    let labels: Vec<String> = Summary::LABELS.iter().map(|l| l.to_string()).collect();
    let rows: Vec<Vec<f64>> = (0..Summary::LABELS.len())
        .map(|i| table.summaries.iter().map(|s| s.values()[i]).collect())
        .collect();
    write_table(out, &labels, &table.columns, &rows, options)?;
    Ok(())
}

/// Prints [`write_stats`] output to stdout
pub fn print_stats(label: &str, frame: &Frame, top: Option<&TopN>, options: &DisplayOptions) -> Result<()> {
    let stdout = io::stdout();
    let mut out = stdout.lock();
    write_stats(&mut out, label, frame, top, options)?;
    out.flush()?;
    Ok(())
}

/// Writes a frame with its row keys
pub fn write_frame<W: Write>(out: &mut W, frame: &Frame, options: &DisplayOptions) -> io::Result<()> {
    let rows: Vec<Vec<f64>> = frame.data().rows().into_iter().map(|r| r.to_vec()).collect();
    write_table(out, frame.index(), frame.columns(), &rows, options)
}

fn write_table<W: Write>(
    out: &mut W,
    row_labels: &[String],
    columns: &[String],
    rows: &[Vec<f64>],
    options: &DisplayOptions,
) -> io::Result<()> {
    let shown = shown_columns(columns.len(), options.max_columns);

    let headers: Vec<String> = shown
        .iter()
        .map(|slot| match slot {
            Some(j) => truncate(&columns[*j], options.max_colwidth),
            None => "...".to_string(),
        })
        .collect();

    let cells: Vec<Vec<String>> = rows
        .iter()
        .map(|row| {
            shown
                .iter()
                .map(|slot| match slot {
                    Some(j) => format_value(row[*j], options.precision),
                    None => "...".to_string(),
                })
                .collect()
        })
        .collect();

    let label_width = row_labels.iter().map(|l| l.chars().count()).max().unwrap_or(0);
    let widths: Vec<usize> = headers
        .iter()
        .enumerate()
        .map(|(k, h)| {
            cells
                .iter()
                .map(|row| row[k].chars().count())
                .chain(std::iter::once(h.chars().count()))
                .max()
                .unwrap_or(0)
        })
        .collect();

    write!(out, "{:width$}", "", width = label_width)?;
    for (h, w) in headers.iter().zip(&widths) {
        write!(out, "  {:>width$}", h, width = *w)?;
    }
    writeln!(out)?;

    for (label, row) in row_labels.iter().zip(&cells) {
        write!(out, "{:<width$}", label, width = label_width)?;
        for (cell, w) in row.iter().zip(&widths) {
            write!(out, "  {:>width$}", cell, width = *w)?;
        }
        writeln!(out)?;
    }
    Ok(())
}

/// Column positions to print; `None` marks the elided middle
fn shown_columns(n_cols: usize, max_columns: usize) -> Vec<Option<usize>> {
    if max_columns == 0 || n_cols <= max_columns {
        return (0..n_cols).map(Some).collect();
    }
    let head = (max_columns + 1) / 2;
    let tail = max_columns / 2;
    (0..head)
        .map(Some)
        .chain(std::iter::once(None))
        .chain((n_cols - tail..n_cols).map(Some))
        .collect()
}

fn truncate(text: &str, limit: Option<usize>) -> String {
    match limit {
        Some(limit) if text.chars().count() > limit => {
            let kept: String = text.chars().take(limit.saturating_sub(3)).collect();
            format!("{}...", kept)
        }
        _ => text.to_string(),
    }
}

fn format_value(value: f64, precision: usize) -> String {
    if value.is_nan() {
        "NaN".to_string()
    } else if value.is_infinite() {
        let sign = if value > 0.0 { "" } else { "-" };
        format!("{}inf", sign)
    } else {
        format!("{:.*}", precision, value)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn frame() -> Frame {
        Frame::from_rows(
            vec!["m1".into(), "m2".into(), "m3".into()],
            vec!["CPU CSR".into(), "GPU COO".into(), "nnz".into()],
            vec![
                1.0, 2.0, 100.0, //
                1.0, 4.0, 200.0, //
                1.0, f64::NAN, 300.0,
            ],
        )
        .unwrap()
    }

    fn render(frame: &Frame, top: Option<&TopN>, options: &DisplayOptions) -> String {
        let mut out = Vec::new();
        write_stats(&mut out, "float", frame, top, options).unwrap();
        String::from_utf8(out).unwrap()
    }

    #[test]
    fn test_stats_layout() {
        let text = render(&frame(), None, &DisplayOptions::default());
        let lines: Vec<&str> = text.lines().collect();

        assert_eq!(lines[0], "Data for float => ");
        assert!(lines[1].contains("CPU CSR") && lines[1].contains("GPU COO"));
        assert_eq!(lines.len(), 2 + Summary::LABELS.len());
        assert!(lines[2].starts_with("count"));
        assert!(lines[2].contains("3.000000"));
        assert!(lines[2].contains("2.000000"));
        assert!(lines[9].starts_with("max"));
    }

    #[test]
    fn test_precision_option() {
        let options = DisplayOptions {
            precision: 2,
            ..DisplayOptions::default()
        };
        let text = render(&frame(), None, &options);
        assert!(text.contains("3.00"));
        assert!(!text.contains("3.000"));
    }

    #[test]
    fn test_empty_frame_reports_nan() {
        let empty = Frame::empty(vec!["GPU COO".into()]);
        let text = render(&empty, None, &DisplayOptions::default());
        assert!(text.contains("0.000000"));
        assert!(text.contains("NaN"));
    }

    #[test]
    fn test_top_n_lists_largest_first() {
        let top = TopN::new(1, &["GPU COO"]);
        let text = render(&frame(), Some(&top), &DisplayOptions::default());
        let lines: Vec<&str> = text.lines().collect();
        assert!(lines[1].contains("CPU CSR") && lines[1].contains("nnz"));
        assert!(lines[2].starts_with("m2"));
        assert!(lines[4].starts_with("count"));
    }

    #[test]
    fn test_wide_tables_are_elided() {
        assert_eq!(shown_columns(3, 30), vec![Some(0), Some(1), Some(2)]);
        assert_eq!(
            shown_columns(6, 4),
            vec![Some(0), Some(1), None, Some(4), Some(5)]
        );
    }

    #[test]
    fn test_format_value() {
        assert_eq!(format_value(f64::INFINITY, 3), "inf");
        assert_eq!(format_value(-f64::INFINITY, 3), "-inf");
        assert_eq!(format_value(1.5, 3), "1.500");
        assert_eq!(truncate("GPU Hybrid (atomic)", Some(8)), "GPU H...");
    }
}
