//! Integration tests for rendering distribution and joint plots

use std::fs;

use spmv_analysis::plot::{prepare_joint, DistPlot};
use spmv_analysis::{dist_show, joint_plot, AnalysisConfig, Frame};

/// Speedups for `n` matrices with growing nnz and a mild trend in std_deviation
fn speedups(n: usize) -> Frame {
    let index = (0..n).map(|i| format!("m{}", i)).collect();
    let columns = ["nnz", "std_deviation", "GPU COO", "GPU ELL"]
        .iter()
        .map(|s| s.to_string())
        .collect();
    let cells = (0..n)
        .flat_map(|i| {
            let x = i as f64;
            [
                5_000.0 + 4_000.0 * x,
                1.0 + 3.0 * x,
                1.0 + (x * 0.7) % 9.0,
                10.0 - 0.2 * x + (x * 1.3) % 2.0,
            ]
        })
        .collect();
    Frame::from_rows(index, columns, cells).unwrap()
}

fn config_in(dir: &std::path::Path) -> AnalysisConfig {
    let mut config = AnalysisConfig::for_results_dir(dir);
    config.image_dir = dir.join("img");
    config.preview_dir = dir.join("preview");
    config
}

fn assert_svg(plot_path: &std::path::Path) -> String {
    let text = fs::read_to_string(plot_path).unwrap();
    assert!(text.contains("<svg"), "not an SVG document");
    text
}

#[test]
fn test_saved_dist_plot_is_pdf() {
    let dir = tempfile::tempdir().unwrap();
    let config = config_in(dir.path());
    let frame = speedups(60);

    let output = config.image_dir.join("coo_float_dist.pdf");
    let plot: DistPlot = dist_show(&frame, "GPU COO", Some(&output), &config).unwrap();

    assert_eq!(plot.path, output);
    assert_eq!(plot.series.len(), 2);
    assert!(plot.series.iter().all(|s| s.is_drawable()));
    assert!(plot.series[1].matrices < plot.series[0].matrices);

    let bytes = fs::read(&plot.path).unwrap();
    assert!(bytes.starts_with(b"%PDF"));
}

#[test]
fn test_saved_dist_plot_as_svg() {
    let dir = tempfile::tempdir().unwrap();
    let config = config_in(dir.path());
    let frame = speedups(60);

    let output = config.image_dir.join("coo_float_dist.svg");
    let plot = dist_show(&frame, "GPU COO", Some(&output), &config).unwrap();
    assert_eq!(plot.path, output);

    let svg = assert_svg(&plot.path);
    assert!(svg.contains("Speedup"));
    assert!(svg.contains(&format!("{} matrices", plot.series[0].matrices)));
}

#[test]
fn test_shown_dist_plot_goes_to_preview_dir() {
    let dir = tempfile::tempdir().unwrap();
    let config = config_in(dir.path());

    let plot = dist_show(&speedups(30), "GPU ELL", None, &config).unwrap();
    assert!(plot.path.starts_with(&config.preview_dir));
    assert_svg(&plot.path);
    assert!(!config.image_dir.exists());
}

#[test]
fn test_dist_plot_of_empty_subsets() {
    let dir = tempfile::tempdir().unwrap();
    let config = config_in(dir.path());
    // Every matrix is below the smallest threshold
    let frame = speedups(1);

    let plot = dist_show(&frame, "GPU COO", Some(&config.image_dir.join("small.svg")), &config).unwrap();
    assert!(plot.series.iter().all(|s| !s.is_drawable()));
    assert!(plot.series.iter().all(|s| s.summary.count == 0));
    assert_svg(&plot.path);
}

#[test]
fn test_dist_plot_unknown_target() {
    let dir = tempfile::tempdir().unwrap();
    let config = config_in(dir.path());
    assert!(dist_show(&speedups(10), "GPU SCOO", None, &config).is_err());
}

#[test]
fn test_joint_plot() {
    let dir = tempfile::tempdir().unwrap();
    let config = config_in(dir.path());

    let plot = joint_plot(&speedups(40), "std_deviation", "GPU ELL", None, &config).unwrap();
    assert_eq!(plot.data.points.len(), 40);
    let fit = plot.data.regression.unwrap();
    assert!(fit.r < 0.0);

    let svg = assert_svg(&plot.path);
    assert!(svg.contains("std_deviation"));
    assert!(svg.contains("pearsonr"));
}

#[test]
fn test_joint_plot_of_empty_frame() {
    let dir = tempfile::tempdir().unwrap();
    let config = config_in(dir.path());
    let empty = speedups(5).filter(&[false; 5]);

    let data = prepare_joint(&empty, "std_deviation", "GPU ELL").unwrap();
    assert!(data.regression.is_none());

    let plot = joint_plot(&empty, "std_deviation", "GPU ELL", None, &config).unwrap();
    assert_svg(&plot.path);
}
