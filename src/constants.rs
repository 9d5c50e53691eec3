//! Centralized constants for the SpMV benchmark analysis
//!
//! File names, the baseline configuration, filtering thresholds and plot
//! geometry used throughout the crate. New constants belong here rather
//! than scattered through the code.

// ============================================================================
// INPUT DOCUMENTS
// ============================================================================

/// Metadata document shared by every precision
pub const MATRICES_INFO_FILE: &str = "matrices_info.json";

/// Timing document for single precision runs
pub const FLOAT_TIMINGS_FILE: &str = "float.json";

/// Timing document for double precision runs
pub const DOUBLE_TIMINGS_FILE: &str = "double.json";

/// Default location of the benchmark results
pub const DEFAULT_RESULTS_DIR: &str = "../results/scoo";

/// Default location for documentation images
pub const DEFAULT_IMAGE_DIR: &str = "../doc/img";

// ============================================================================
// COLUMNS
// ============================================================================

/// Configuration every speedup is measured against
pub const BASELINE_CONFIGURATION: &str = "CPU CSR";

/// Number of rows in a matrix
pub const ROWS_COLUMN: &str = "rows";

/// Number of nonzeros in a matrix
pub const NNZ_COLUMN: &str = "nnz";

/// Standard deviation of nonzeros per row
pub const STD_DEVIATION_COLUMN: &str = "std_deviation";

/// Derived nonzeros-per-row column
pub const NNZPR_COLUMN: &str = "nnzpr";

/// Suffix for a timing column whose name clashes with a metadata column
pub const LEFT_SUFFIX: &str = "_x";

/// Suffix for a metadata column whose name clashes with a timing column
pub const RIGHT_SUFFIX: &str = "_y";

// ============================================================================
// FILTERING
// ============================================================================

/// nnz thresholds overlaid on every distribution plot
pub const NNZ_LIMITS: [f64; 2] = [10_000.0, 100_000.0];

/// Lower nnz bound for the joint regression subset
pub const JOINT_MIN_NNZ: f64 = 10_000.0;

/// Upper std_deviation bound for the joint regression subset
pub const JOINT_MAX_STD_DEVIATION: f64 = 200.0;

// ============================================================================
// REPORTING
// ============================================================================

/// Decimal places printed for statistics
pub const DEFAULT_DISPLAY_PRECISION: usize = 6;

/// Columns printed before a frame is elided in the middle
pub const DEFAULT_MAX_COLUMNS: usize = 30;

// ============================================================================
// PLOT GEOMETRY
// ============================================================================

/// Lower bound of the speedup axis
pub const SPEEDUP_AXIS_MIN: f64 = -3.0;

/// Upper bound of the speedup axis
pub const SPEEDUP_AXIS_MAX: f64 = 39.0;

/// Integer ticks on the speedup axis cover 0..SPEEDUP_TICK_COUNT
pub const SPEEDUP_TICK_COUNT: usize = 40;

/// Distribution figure size in inches (width, height)
pub const DIST_FIGURE_INCHES: (f64, f64) = (16.0, 6.0);

/// Joint figure size in inches (square)
pub const JOINT_FIGURE_INCHES: f64 = 6.0;

/// Resolution of saved figures
pub const SAVE_DPI: f64 = 200.0;

/// Resolution of preview figures
pub const PREVIEW_DPI: f64 = 100.0;

/// Legend font size in points for saved figures
pub const SAVE_LEGEND_POINTS: f64 = 12.0;

/// Legend font size in points for previews
pub const PREVIEW_LEGEND_POINTS: f64 = 22.0;

/// Base font size in points for axis labels and captions
pub const LABEL_POINTS: f64 = 11.0;

/// Typographic points per inch
pub const POINTS_PER_INCH: f64 = 72.0;

/// Maximum number of histogram bins
pub const MAX_HISTOGRAM_BINS: usize = 50;

/// Grid points on which a density estimate is evaluated
pub const KDE_GRID_SIZE: usize = 100;

/// Bandwidths the density grid extends past the data
pub const KDE_CUT: f64 = 3.0;

/// Fraction of the joint figure used by the main scatter panel
pub const JOINT_MAIN_RATIO: f64 = 0.8;

/// Extension of saved documentation figures
pub const SAVED_FIGURE_EXTENSION: &str = "pdf";

/// Extension of previewed figures
pub const PREVIEW_FIGURE_EXTENSION: &str = "svg";

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_limits_ascending() {
        assert!(NNZ_LIMITS.windows(2).all(|w| w[0] < w[1]));
    }

    #[test]
    fn test_axis_covers_ticks() {
        assert!(SPEEDUP_AXIS_MIN < 0.0);
        assert!(SPEEDUP_AXIS_MAX >= (SPEEDUP_TICK_COUNT - 1) as f64);
    }
}
