//! The full analysis run over one results directory
//!
//! Loads both precisions, derives speedups and then, depending on the
//! switches in [`AnalysisConfig`], prints statistics, regenerates the
//! documentation distribution plots, compares CSR against CSR-vector and
//! draws the std_deviation joint plots.

use std::path::PathBuf;

use tracing::{info, warn};

use crate::config::{AnalysisConfig, Precision};
use crate::constants::*;
use crate::error::Result;
use crate::filter::{filter_by_nnz, rows_where_less, RowFilter};
use crate::loader::load_data;
use crate::plot::{dist_show, joint_plot};
use crate::report::{describe_frame, print_stats};
use crate::speedup::calculate_speedup;
use crate::table::Frame;

/// Configurations with a documentation distribution plot, and the file stem used for each
pub const DIST_PLOT_CATALOG: [(&str, &str); 8] = [
    ("GPU CSR", "csr"),
    ("GPU CSR (cuSparse)", "csr_cusparse"),
    ("GPU CSR (vector)", "csr_vector"),
    ("GPU CSR-Adaptive", "csr_adaptive"),
    ("GPU ELL", "csr_ell"),
    ("GPU COO", "coo"),
    ("GPU SCOO", "scoo"),
    ("GPU Hybrid (atomic)", "hybrid"),
];

pub const CSR_COLUMN: &str = "GPU CSR";
pub const CSR_VECTOR_COLUMN: &str = "GPU CSR (vector)";
pub const CSR_ADAPTIVE_COLUMN: &str = "GPU CSR-Adaptive";

/// Plots of the rows where CSR-vector is slower than CSR
pub const CSR_VECTOR_COMPARISON_PLOTS: [(&str, &str); 3] = [
    (CSR_COLUMN, "csr_csr_outperform_csr_vec"),
    (CSR_VECTOR_COLUMN, "vec_csr_outperform_csr_vec"),
    (CSR_ADAPTIVE_COLUMN, "ada_csr_outperform_csr_vec"),
];

/// Configurations plotted against std_deviation
pub const JOINT_PLOT_TARGETS: [&str; 2] = ["GPU ELL", "GPU Hybrid (atomic)"];

/// Outcome of [`run`]
#[derive(Debug, Clone)]
pub struct AnalysisReport {
    /// Single precision speedups after the `min_nnz_to_compare` cut
    pub float: Frame,
    /// Double precision speedups after the `min_nnz_to_compare` cut
    pub double: Frame,
    /// Every figure written, saved or previewed
    pub written: Vec<PathBuf>,
}

impl AnalysisReport {
    pub fn speedup(&self, precision: Precision) -> &Frame {
        match precision {
            Precision::Float => &self.float,
            Precision::Double => &self.double,
        }
    }
}

/// Runs the analysis described by `config`
pub fn run(config: &AnalysisConfig) -> Result<AnalysisReport> {
    let float = speedup_for(config, Precision::Float)?;
    let double = speedup_for(config, Precision::Double)?;
    let mut report = AnalysisReport {
        float,
        double,
        written: Vec::new(),
    };

    if config.print_speedup_stats {
        for precision in Precision::ALL {
            print_stats(precision.label(), report.speedup(precision), None, &config.display)?;
        }
    }

    if config.update_dist_plots {
        let written = update_dist_plots(&report, config)?;
        report.written.extend(written);
    }

    if config.compare_csr_vector {
        let written = compare_csr_vector(&report.float, config)?;
        report.written.extend(written);
    }

    if config.joint_plots {
        let written = std_deviation_joint_plots(&report.double, config)?;
        report.written.extend(written);
    }

    info!(figures = report.written.len(), "analysis complete");
    Ok(report)
}

/// Loads one precision and keeps rows with `nnz > min_nnz_to_compare`
pub fn speedup_for(config: &AnalysisConfig, precision: Precision) -> Result<Frame> {
    let data = load_data(&config.results_dir, precision)?;
    let speedup = calculate_speedup(&data.merged, &data.source, &config.baseline)?;
    let speedup = filter_by_nnz(&speedup, config.min_nnz_to_compare)?;
    info!(
        %precision,
        matrices = speedup.n_rows(),
        configurations = data.source.n_cols(),
        "computed speedups"
    );
    Ok(speedup)
}

/// Saves a distribution plot for every catalog configuration and precision
pub fn update_dist_plots(report: &AnalysisReport, config: &AnalysisConfig) -> Result<Vec<PathBuf>> {
    let mut written = Vec::new();
    for (target, kernel) in DIST_PLOT_CATALOG {
        for precision in Precision::ALL {
            let frame = report.speedup(precision);
            if !frame.has_column(target) {
                warn!(configuration = target, %precision, "configuration not measured, skipping plot");
                continue;
            }
            let path = config.dist_plot_path(kernel, precision);
            let plot = dist_show(frame, target, Some(&path), config)?;
            written.push(plot.path);
        }
    }
    Ok(written)
}

/// Analyzes the single precision matrices where CSR-vector is slower than CSR
pub fn compare_csr_vector(float: &Frame, config: &AnalysisConfig) -> Result<Vec<PathBuf>> {
    if !float.has_column(CSR_COLUMN) || !float.has_column(CSR_VECTOR_COLUMN) {
        warn!("CSR or CSR-vector timings missing, skipping comparison");
        return Ok(Vec::new());
    }

    let slower = rows_where_less(float, CSR_VECTOR_COLUMN, CSR_COLUMN)?;
    let medians = describe_frame(&slower.select(&[CSR_COLUMN, CSR_VECTOR_COLUMN])?);
    info!(
        matrices = slower.n_rows(),
        csr_median = medians.get(CSR_COLUMN).map_or(f64::NAN, |s| s.q50),
        vector_median = medians.get(CSR_VECTOR_COLUMN).map_or(f64::NAN, |s| s.q50),
        "CSR-vector slower than CSR"
    );
    for &limit in &config.nnz_limits {
        let subset = filter_by_nnz(&slower, limit)?;
        print_stats("CSR-Vec < GPU CSR", &subset, None, &config.display)?;
    }

    let mut written = Vec::new();
    for (target, stem) in CSR_VECTOR_COMPARISON_PLOTS {
        if !slower.has_column(target) {
            warn!(configuration = target, "configuration not measured, skipping plot");
            continue;
        }
        let path = config.image_dir.join(stem).with_extension(SAVED_FIGURE_EXTENSION);
        let plot = dist_show(&slower, target, Some(&path), config)?;
        written.push(plot.path);
    }
    Ok(written)
}

/// Previews std_deviation joint plots over regular, reasonably large matrices
pub fn std_deviation_joint_plots(double: &Frame, config: &AnalysisConfig) -> Result<Vec<PathBuf>> {
    if !double.has_column(STD_DEVIATION_COLUMN) {
        warn!("metadata has no std_deviation, skipping joint plots");
        return Ok(Vec::new());
    }

    let query = RowFilter::new()
        .greater_than(NNZ_COLUMN, JOINT_MIN_NNZ)
        .less_than(STD_DEVIATION_COLUMN, JOINT_MAX_STD_DEVIATION);
    let subset = query.apply(double)?;
    info!(%query, matrices = subset.n_rows(), "joint plot subset");

    let mut written = Vec::new();
    for target in JOINT_PLOT_TARGETS {
        if !subset.has_column(target) {
            warn!(configuration = target, "configuration not measured, skipping joint plot");
            continue;
        }
        let plot = joint_plot(&subset, STD_DEVIATION_COLUMN, target, None, config)?;
        written.push(plot.path);
    }
    Ok(written)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_catalog_stems_are_unique() {
        let mut stems: Vec<&str> = DIST_PLOT_CATALOG.iter().map(|(_, s)| *s).collect();
        stems.sort_unstable();
        stems.dedup();
        assert_eq!(stems.len(), DIST_PLOT_CATALOG.len());
    }

    #[test]
    fn test_comparison_without_csr_columns_is_skipped() {
        let frame = Frame::from_rows(
            vec!["m1".into()],
            vec!["nnz".into(), "GPU COO".into()],
            vec![20_000.0, 2.0],
        )
        .unwrap();
        let config = AnalysisConfig::default();
        assert!(compare_csr_vector(&frame, &config).unwrap().is_empty());
        assert!(std_deviation_joint_plots(&frame, &config).unwrap().is_empty());
    }
}
