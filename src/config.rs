//! Configuration for an analysis run

use std::fmt;
use std::path::{Path, PathBuf};

use crate::constants::*;
use crate::plot::PlotTheme;
use crate::report::DisplayOptions;

/// Numeric precision a timing document was measured in
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Precision {
    /// Single precision (`float.json`)
    Float,
    /// Double precision (`double.json`)
    Double,
}

impl Precision {
    /// Every precision, in the order they are analyzed
    pub const ALL: [Precision; 2] = [Precision::Float, Precision::Double];

    /// Name of the timing document for this precision
    pub fn file_name(&self) -> &'static str {
        match self {
            Precision::Float => FLOAT_TIMINGS_FILE,
            Precision::Double => DOUBLE_TIMINGS_FILE,
        }
    }

    /// Tag used in labels and output file names
    pub fn label(&self) -> &'static str {
        match self {
            Precision::Float => "float",
            Precision::Double => "double",
        }
    }
}

impl fmt::Display for Precision {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// Configuration for the analysis run
#[derive(Debug, Clone)]
pub struct AnalysisConfig {
    /// Directory holding `matrices_info.json`, `float.json` and `double.json`
    pub results_dir: PathBuf,

    /// Directory saved distribution plots are written to
    pub image_dir: PathBuf,

    /// Directory for figures that are shown rather than saved
    pub preview_dir: PathBuf,

    /// Configuration every speedup is measured against
    pub baseline: String,

    /// Rows with `nnz` at or below this are dropped before any analysis
    pub min_nnz_to_compare: f64,

    /// nnz thresholds overlaid on distribution plots
    pub nnz_limits: Vec<f64>,

    /// Whether to regenerate the documentation distribution plots
    pub update_dist_plots: bool,

    /// Whether to analyze matrices where CSR-vector is slower than CSR
    pub compare_csr_vector: bool,

    /// Whether to draw the std_deviation joint regression plots
    pub joint_plots: bool,

    /// Whether to print statistics for the full speedup tables
    pub print_speedup_stats: bool,

    /// Console formatting of statistics
    pub display: DisplayOptions,

    /// Plot styling
    pub theme: PlotTheme,
}

impl Default for AnalysisConfig {
    fn default() -> Self {
        Self::for_results_dir(DEFAULT_RESULTS_DIR)
    }
}

impl AnalysisConfig {
    /// Create the default configuration for a results directory
    pub fn for_results_dir<P: AsRef<Path>>(results_dir: P) -> Self {
        Self {
            results_dir: results_dir.as_ref().to_path_buf(),
            image_dir: PathBuf::from(DEFAULT_IMAGE_DIR),
            preview_dir: std::env::temp_dir().join("spmv-analysis"),
            baseline: BASELINE_CONFIGURATION.to_string(),
            min_nnz_to_compare: 0.0,
            nnz_limits: NNZ_LIMITS.to_vec(),
            update_dist_plots: false,
            compare_csr_vector: false,
            joint_plots: true,
            print_speedup_stats: false,
            display: DisplayOptions::default(),
            theme: PlotTheme::default(),
        }
    }

    /// Path of the timing document for a precision
    pub fn timings_path(&self, precision: Precision) -> PathBuf {
        self.results_dir.join(precision.file_name())
    }

    /// Path of the shared metadata document
    pub fn metadata_path(&self) -> PathBuf {
        self.results_dir.join(MATRICES_INFO_FILE)
    }

    /// Path a distribution plot for `kernel` at `precision` is saved to
    pub fn dist_plot_path(&self, kernel: &str, precision: Precision) -> PathBuf {
        self.image_dir
            .join(format!("{}_{}_dist", kernel, precision.label()))
            .with_extension(SAVED_FIGURE_EXTENSION)
    }
}
