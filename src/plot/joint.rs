//! Joint regression plots: scatter, least-squares line and marginal distributions

use std::path::{Path, PathBuf};

use plotters::coord::Shift;
use plotters::drawing::DrawingAreaErrorKind;
use plotters::prelude::*;

use crate::config::AnalysisConfig;
use crate::constants::*;
use crate::error::Result;
use crate::plot::{padded_range, plot_error, Canvas, PlotTheme};
use crate::stats::{histogram, linear_regression, Bin, GaussianKde, Regression};
use crate::table::Frame;

/// Data behind a joint plot
#[derive(Debug, Clone)]
pub struct JointData {
    pub x_column: String,
    pub y_column: String,
    /// Rows where both values are finite
    pub points: Vec<(f64, f64)>,
    /// Least-squares fit; `None` for fewer than two points or constant x
    pub regression: Option<Regression>,
    pub x_bins: Vec<Bin>,
    pub y_bins: Vec<Bin>,
    /// Density curves of the marginals; empty when they cannot be estimated
    pub x_density: Vec<(f64, f64)>,
    pub y_density: Vec<(f64, f64)>,
}

/// A rendered joint plot
#[derive(Debug, Clone)]
pub struct JointPlot {
    pub data: JointData,
    /// File the figure was written to
    pub path: PathBuf,
}

/// Collects the points, fit and marginals of `y` against `x`
pub fn prepare_joint(frame: &Frame, x: &str, y: &str) -> Result<JointData> {
    let xs = frame.column(x)?;
    let ys = frame.column(y)?;
    let points: Vec<(f64, f64)> = xs
        .iter()
        .zip(ys.iter())
        .filter(|(a, b)| a.is_finite() && b.is_finite())
        .map(|(&a, &b)| (a, b))
        .collect();

    let px: Vec<f64> = points.iter().map(|p| p.0).collect();
    let py: Vec<f64> = points.iter().map(|p| p.1).collect();

    Ok(JointData {
        x_column: x.to_string(),
        y_column: y.to_string(),
        regression: linear_regression(&px, &py),
        x_bins: histogram(&px),
        y_bins: histogram(&py),
        x_density: density_curve(&px),
        y_density: density_curve(&py),
        points,
    })
}

/// Renders `y` against `x` with a regression line and marginal histograms
///
/// With `output` the figure is saved there; otherwise a preview is written
/// to the configured preview directory. An empty frame gives empty axes.
pub fn joint_plot(
    frame: &Frame,
    x: &str,
    y: &str,
    output: Option<&Path>,
    config: &AnalysisConfig,
) -> Result<JointPlot> {
    let data = prepare_joint(frame, x, y)?;

    let canvas = Canvas::resolve(output, &config.preview_dir, &format!("{} vs {}", x, y))?;
    let size = canvas.pixels((JOINT_FIGURE_INCHES, JOINT_FIGURE_INCHES));
    let mut svg = String::new();
    {
        let root = SVGBackend::with_string(&mut svg, size).into_drawing_area();
        draw(&root, size, &data, &canvas, &config.theme).map_err(plot_error)?;
        root.present().map_err(plot_error)?;
    }
    canvas.write(&svg)?;
    canvas.announce(output);

    Ok(JointPlot {
        data,
        path: canvas.path,
    })
}

fn draw<DB: DrawingBackend>(
    root: &DrawingArea<DB, Shift>,
    size: (u32, u32),
    data: &JointData,
    canvas: &Canvas,
    theme: &PlotTheme,
) -> std::result::Result<(), DrawingAreaErrorKind<DB::ErrorType>> {
    root.fill(&theme.figure)?;

    let main_w = (size.0 as f64 * JOINT_MAIN_RATIO) as u32;
    let main_h = (size.1 as f64 * JOINT_MAIN_RATIO) as u32;
    let (top, bottom) = root.split_vertically(size.1 - main_h);
    let (top_margin, _) = top.split_horizontally(main_w);
    let (main, right_margin) = bottom.split_horizontally(main_w);

    let (x_lo, x_hi) = padded_range(data.points.iter().map(|p| p.0));
    let (y_lo, y_hi) = padded_range(data.points.iter().map(|p| p.1));

    let label_px = canvas.font_px(LABEL_POINTS);
    let area_px = (label_px * 3.0) as u32;
    let pad = (label_px * 0.5) as u32;
    let color = theme.color(0);

    let mut chart = ChartBuilder::on(&main)
        .margin(pad)
        .x_label_area_size(area_px)
        .y_label_area_size(area_px)
        .build_cartesian_2d(x_lo..x_hi, y_lo..y_hi)?;
    chart.plotting_area().fill(&theme.background)?;
    chart
        .configure_mesh()
        .x_desc(data.x_column.as_str())
        .y_desc(data.y_column.as_str())
        .label_style(("sans-serif", label_px))
        .axis_desc_style(("sans-serif", label_px))
        .bold_line_style(theme.grid.stroke_width(1))
        .light_line_style(theme.background.stroke_width(1))
        .draw()?;

    let radius = (label_px / 4.0).max(1.0) as i32;
    chart.draw_series(
        data.points
            .iter()
            .map(|&(px, py)| Circle::new((px, py), radius, color.mix(0.6).filled())),
    )?;

    if let Some(fit) = data.regression {
        let line = theme.color(1);
        let marker = (canvas.legend_px() / 2.0).max(1.0) as i32;
        chart
            .draw_series(LineSeries::new(
                vec![(x_lo, fit.predict(x_lo)), (x_hi, fit.predict(x_hi))],
                line.stroke_width(2),
            ))?
            .label(format!("pearsonr = {:.2}", fit.r))
            .legend(move |(lx, ly)| {
                PathElement::new(vec![(lx, ly), (lx + 2 * marker, ly)], line.stroke_width(2))
            });
        chart
            .configure_series_labels()
            .position(SeriesLabelPosition::UpperRight)
            .label_font(("sans-serif", canvas.legend_px()))
            .background_style(WHITE.mix(0.8).filled())
            .border_style(BLACK.stroke_width(1))
            .draw()?;
    }

    // Marginals share the main panel's label areas so their axes line up
    let x_peak = peak_density(&data.x_bins, &data.x_density, (x_lo, x_hi));
    let mut top_chart = ChartBuilder::on(&top_margin)
        .margin(pad)
        .y_label_area_size(area_px)
        .build_cartesian_2d(x_lo..x_hi, 0.0..x_peak)?;
    top_chart.draw_series(data.x_bins.iter().map(|b| {
        Rectangle::new(
            [(b.left.max(x_lo), 0.0), (b.right.min(x_hi), b.density)],
            color.mix(0.5).filled(),
        )
    }))?;
    top_chart.draw_series(LineSeries::new(
        data.x_density
            .iter()
            .copied()
            .filter(|&(x, _)| (x_lo..=x_hi).contains(&x)),
        color.stroke_width(2),
    ))?;

    let y_peak = peak_density(&data.y_bins, &data.y_density, (y_lo, y_hi));
    let mut right_chart = ChartBuilder::on(&right_margin)
        .margin(pad)
        .x_label_area_size(area_px)
        .build_cartesian_2d(0.0..y_peak, y_lo..y_hi)?;
    right_chart.draw_series(data.y_bins.iter().map(|b| {
        Rectangle::new(
            [(0.0, b.left.max(y_lo)), (b.density, b.right.min(y_hi))],
            color.mix(0.5).filled(),
        )
    }))?;
    right_chart.draw_series(LineSeries::new(
        data.y_density
            .iter()
            .filter(|&&(y, _)| (y_lo..=y_hi).contains(&y))
            .map(|&(y, d)| (d, y)),
        color.stroke_width(2),
    ))?;

    Ok(())
}

fn density_curve(values: &[f64]) -> Vec<(f64, f64)> {
    GaussianKde::new(values)
        .map(|kde| kde.curve())
        .unwrap_or_default()
}

/// Upper bound of a marginal's density axis, covering bars and the curve inside `range`
fn peak_density(bins: &[Bin], curve: &[(f64, f64)], range: (f64, f64)) -> f64 {
    let peak = bins
        .iter()
        .map(|b| b.density)
        .chain(
            curve
                .iter()
                .filter(|p| (range.0..=range.1).contains(&p.0))
                .map(|p| p.1),
        )
        .fold(0.0f64, f64::max);
    if peak > 0.0 {
        peak * 1.05
    } else {
        1.0
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_prepare_joint_drops_non_finite_pairs() {
        let frame = Frame::from_rows(
            vec!["a".into(), "b".into(), "c".into(), "d".into()],
            vec!["std_deviation".into(), "GPU ELL".into()],
            vec![
                10.0, 2.0, //
                20.0, 4.0, //
                30.0, f64::INFINITY, //
                40.0, 8.0,
            ],
        )
        .unwrap();

        let data = prepare_joint(&frame, "std_deviation", "GPU ELL").unwrap();
        assert_eq!(data.points.len(), 3);
        let fit = data.regression.unwrap();
        assert_eq!(fit.n, 3);
        assert!(fit.slope > 0.0);
        assert!(!data.x_bins.is_empty() && !data.y_bins.is_empty());
        assert_eq!(data.x_density.len(), KDE_GRID_SIZE);
        assert_eq!(data.y_density.len(), KDE_GRID_SIZE);
        assert!(data.y_density.iter().all(|&(_, d)| d >= 0.0));
    }

    #[test]
    fn test_prepare_joint_empty() {
        let frame = Frame::empty(vec!["std_deviation".into(), "GPU ELL".into()]);
        let data = prepare_joint(&frame, "std_deviation", "GPU ELL").unwrap();
        assert!(data.points.is_empty());
        assert!(data.regression.is_none());
        assert!(data.x_bins.is_empty());
        assert!(data.x_density.is_empty() && data.y_density.is_empty());
    }

    #[test]
    fn test_peak_density_defaults() {
        assert_eq!(peak_density(&[], &[], (0.0, 1.0)), 1.0);
        // Curve points outside the axis do not raise the bound
        let curve = [(-5.0, 9.0), (0.5, 2.0)];
        assert_eq!(peak_density(&[], &curve, (0.0, 1.0)), 2.0 * 1.05);
    }
}
