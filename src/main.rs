//! Command-line driver for the SpMV speedup analysis
//!
//! # Usage
//!
//! ```bash
//! # Joint plots only, reading ../results/scoo
//! spmv-analysis
//!
//! # Regenerate the documentation distribution plots
//! spmv-analysis --results-dir results/scoo --image-dir doc/img --update-dist-plots
//!
//! # Print statistics and study where CSR-vector loses to CSR
//! spmv-analysis --print-stats --compare-csr-vector --no-joint-plots
//! ```
//!
//! Logging follows `RUST_LOG` and defaults to `info`.

use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::Parser;
use spmv_analysis::constants::{BASELINE_CONFIGURATION, DEFAULT_IMAGE_DIR, DEFAULT_RESULTS_DIR};
use spmv_analysis::{analysis, AnalysisConfig};
use tracing_subscriber::EnvFilter;

/// Speedup statistics and plots for SpMV benchmark results
#[derive(Parser, Debug)]
#[command(name = "spmv-analysis")]
#[command(version)]
struct Args {
    /// Directory holding matrices_info.json, float.json and double.json
    #[arg(long, default_value = DEFAULT_RESULTS_DIR)]
    results_dir: PathBuf,

    /// Directory saved distribution plots are written to
    #[arg(long, default_value = DEFAULT_IMAGE_DIR)]
    image_dir: PathBuf,

    /// Directory for previewed figures [default: <tmp>/spmv-analysis]
    #[arg(long)]
    preview_dir: Option<PathBuf>,

    /// Configuration speedups are measured against
    #[arg(long, default_value = BASELINE_CONFIGURATION)]
    baseline: String,

    /// Drop matrices with nnz at or below this before analysis
    #[arg(long, default_value_t = 0.0)]
    min_nnz: f64,

    /// Regenerate the per-kernel distribution plots in the image directory
    #[arg(long)]
    update_dist_plots: bool,

    /// Analyze matrices where CSR-vector is slower than CSR
    #[arg(long)]
    compare_csr_vector: bool,

    /// Skip the std_deviation joint plots
    #[arg(long)]
    no_joint_plots: bool,

    /// Print statistics for the full float and double speedup tables
    #[arg(long)]
    print_stats: bool,
}

impl Args {
    fn into_config(self) -> AnalysisConfig {
        let mut config = AnalysisConfig::for_results_dir(&self.results_dir);
        config.image_dir = self.image_dir;
        if let Some(preview_dir) = self.preview_dir {
            config.preview_dir = preview_dir;
        }
        config.baseline = self.baseline;
        config.min_nnz_to_compare = self.min_nnz;
        config.update_dist_plots = self.update_dist_plots;
        config.compare_csr_vector = self.compare_csr_vector;
        config.joint_plots = !self.no_joint_plots;
        config.print_speedup_stats = self.print_stats;
        config
    }
}

/// `RUST_LOG`-style directives, or `info` when unset, empty or invalid
fn log_filter(directives: Option<&str>) -> EnvFilter {
    directives
        .filter(|d| !d.trim().is_empty())
        .and_then(|d| EnvFilter::try_new(d).ok())
        .unwrap_or_else(|| EnvFilter::new("info"))
}

fn main() -> Result<()> {
    let directives = std::env::var(EnvFilter::DEFAULT_ENV).ok();
    tracing_subscriber::fmt()
        .with_env_filter(log_filter(directives.as_deref()))
        .init();

    let config = Args::parse().into_config();
    tracing::info!(
        results = %config.results_dir.display(),
        baseline = %config.baseline,
        "starting analysis"
    );

    let report = analysis::run(&config)
        .with_context(|| format!("analysis of {} failed", config.results_dir.display()))?;

    for path in &report.written {
        tracing::info!("  {}", path.display());
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use tracing_subscriber::filter::LevelFilter;

    #[test]
    fn test_log_filter_defaults_to_info() {
        assert_eq!(log_filter(None).max_level_hint(), Some(LevelFilter::INFO));
        assert_eq!(log_filter(Some("")).max_level_hint(), Some(LevelFilter::INFO));
    }

    #[test]
    fn test_log_filter_honours_global_level() {
        assert_eq!(log_filter(Some("debug")).max_level_hint(), Some(LevelFilter::DEBUG));
        assert_eq!(log_filter(Some("warn")).max_level_hint(), Some(LevelFilter::WARN));
    }

    #[test]
    fn test_cli_switches() {
        let args = Args::parse_from(["spmv-analysis", "--no-joint-plots", "--min-nnz", "50000"]);
        let config = args.into_config();
        assert!(!config.joint_plots);
        assert_eq!(config.min_nnz_to_compare, 50_000.0);
        assert_eq!(config.baseline, "CPU CSR");
    }
}
