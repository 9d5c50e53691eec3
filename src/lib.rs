//! # spmv-analysis: speedup analysis of SpMV benchmark results
//!
//! Reads the JSON documents written by the sparse matrix-vector
//! multiplication benchmark, computes how much faster every kernel
//! configuration is than a CPU CSR baseline, and summarizes the result as
//! console statistics and plots.
//!
//! ## Overview
//!
//! 1. **Loading** ([`loader`]): `matrices_info.json` holds per-matrix
//!    attributes (`rows`, `nnz`, `std_deviation`, ...), `float.json` and
//!    `double.json` hold per-matrix kernel timings. Both are transposed
//!    into [`Frame`]s and inner-joined on the matrix key.
//!
//! 2. **Speedup** ([`speedup`]): every timing column becomes
//!    `baseline_time / config_time`.
//!
//! 3. **Filtering and reporting** ([`filter`], [`report`]): subsets by
//!    `nnz` and other thresholds, printed as descriptive statistics.
//!
//! 4. **Plotting** ([`plot`]): overlaid speedup distributions and joint
//!    regression plots, rendered to SVG.
//!
//! ## Usage
//!
//! ```
//! use spmv_analysis::{calculate_speedup, merge, Frame, BASELINE_CONFIGURATION};
//!
//! let timings = Frame::from_rows(
//!     vec!["m1".into()],
//!     vec!["CPU CSR".into(), "GPU COO".into()],
//!     vec![2.0, 1.0],
//! )?;
//! let info = Frame::from_rows(vec!["m1".into()], vec!["rows".into(), "nnz".into()], vec![10.0, 100.0])?;
//!
//! let merged = merge(&timings, &info)?;
//! assert_eq!(merged.value("m1", "nnzpr"), Some(10.0));
//!
//! let speedup = calculate_speedup(&merged, &timings, BASELINE_CONFIGURATION)?;
//! assert_eq!(speedup.value("m1", "GPU COO"), Some(2.0));
//! # Ok::<(), spmv_analysis::AnalysisError>(())
//! ```
//!
//! The complete run over a results directory is [`analysis::run`].

pub mod analysis;
pub mod config;
pub mod constants;
pub mod error;
pub mod filter;
pub mod loader;
pub mod plot;
pub mod report;
pub mod speedup;
pub mod stats;
pub mod table;

// Re-export primary components
pub use analysis::{run, AnalysisReport};
pub use config::{AnalysisConfig, Precision};
pub use constants::BASELINE_CONFIGURATION;
pub use error::{AnalysisError, Result};
pub use filter::{filter_by_nnz, RowFilter};
pub use loader::{load_data, load_data_from_paths, merge, LoadedData};
pub use plot::{dist_show, joint_plot, PlotTheme};
pub use report::{print_stats, DisplayOptions, TopN};
pub use speedup::calculate_speedup;
pub use stats::{describe, Summary};
pub use table::Frame;

/// Version information for the crate
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
