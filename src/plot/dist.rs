//! Speedup distribution plots, one layer per nnz threshold

use std::path::{Path, PathBuf};

use plotters::coord::Shift;
use plotters::drawing::DrawingAreaErrorKind;
use plotters::prelude::*;
use tracing::debug;

use crate::config::AnalysisConfig;
use crate::constants::*;
use crate::error::Result;
use crate::filter::filter_by_nnz;
use crate::plot::{plot_error, Canvas, PlotTheme};
use crate::report::print_stats;
use crate::stats::{describe, histogram, Bin, GaussianKde, Summary};
use crate::table::Frame;

/// One layer of a distribution plot
#[derive(Debug, Clone)]
pub struct DistSeries {
    /// Rows kept have `nnz > limit`
    pub limit: f64,
    /// Legend text
    pub label: String,
    /// Rows in the subset, including those with NaN speedup
    pub matrices: usize,
    /// Statistics of the target column over the subset
    pub summary: Summary,
    /// Histogram of the finite speedups
    pub bins: Vec<Bin>,
    /// Density curve of the finite speedups; empty when it cannot be estimated
    pub density: Vec<(f64, f64)>,
}

impl DistSeries {
    fn from_subset(subset: &Frame, target: &str, limit: f64) -> Result<Self> {
        let values: Vec<f64> = subset.column(target)?.to_vec();
        let density = match GaussianKde::new(&values) {
            Some(kde) => {
                debug!(configuration = target, limit, bandwidth = kde.bandwidth(), "density estimate");
                kde.curve()
            }
            None => Vec::new(),
        };

        Ok(Self {
            limit,
            label: series_label(target, limit, subset.n_rows()),
            matrices: subset.n_rows(),
            summary: describe(&values),
            bins: histogram(&values),
            density,
        })
    }

    /// Whether anything would be drawn for this layer
    pub fn is_drawable(&self) -> bool {
        !self.bins.is_empty()
    }
}

/// A rendered distribution plot
#[derive(Debug, Clone)]
pub struct DistPlot {
    pub target: String,
    pub series: Vec<DistSeries>,
    /// File the figure was written to
    pub path: PathBuf,
}

/// Legend text of a layer, e.g. `GPU COO (nnz>10000, 42 matrices)`
pub fn series_label(target: &str, limit: f64, matrices: usize) -> String {
    format!("{} (nnz>{}, {} matrices)", target, limit, matrices)
}

/// Computes the layers of a distribution plot without rendering it
pub fn prepare_dist(frame: &Frame, target: &str, limits: &[f64]) -> Result<Vec<DistSeries>> {
    frame.column(target)?;
    limits
        .iter()
        .map(|&limit| {
            let subset = filter_by_nnz(frame, limit)?;
            DistSeries::from_subset(&subset, target, limit)
        })
        .collect()
}

/// Prints statistics for each nnz threshold and renders the overlaid distributions
///
/// With `output` the figure is saved there; otherwise a preview is
/// written to the configured preview directory. Empty subsets contribute
/// no layer.
pub fn dist_show(
    frame: &Frame,
    target: &str,
    output: Option<&Path>,
    config: &AnalysisConfig,
) -> Result<DistPlot> {
    frame.column(target)?;

    let mut series = Vec::with_capacity(config.nnz_limits.len());
    for &limit in &config.nnz_limits {
        let subset = filter_by_nnz(frame, limit)?;
        let layer = DistSeries::from_subset(&subset, target, limit)?;
        print_stats(&layer.label, &subset.select(&[target])?, None, &config.display)?;
        series.push(layer);
    }

    let canvas = Canvas::resolve(output, &config.preview_dir, &format!("{} dist", target))?;
    let size = canvas.pixels(DIST_FIGURE_INCHES);
    let mut svg = String::new();
    {
        let root = SVGBackend::with_string(&mut svg, size).into_drawing_area();
        draw(&root, &series, &canvas, &config.theme).map_err(plot_error)?;
        root.present().map_err(plot_error)?;
    }
    canvas.write(&svg)?;
    canvas.announce(output);

    Ok(DistPlot {
        target: target.to_string(),
        series,
        path: canvas.path,
    })
}

fn draw<DB: DrawingBackend>(
    root: &DrawingArea<DB, Shift>,
    series: &[DistSeries],
    canvas: &Canvas,
    theme: &PlotTheme,
) -> std::result::Result<(), DrawingAreaErrorKind<DB::ErrorType>> {
    root.fill(&theme.figure)?;

    let in_axis = |x: f64| (SPEEDUP_AXIS_MIN..=SPEEDUP_AXIS_MAX).contains(&x);
    let y_max = series
        .iter()
        .flat_map(|s| {
            s.bins
                .iter()
                .map(|b| b.density)
                .chain(s.density.iter().filter(|p| in_axis(p.0)).map(|p| p.1))
        })
        .fold(0.0f64, f64::max);
    let y_max = if y_max > 0.0 { y_max * 1.05 } else { 1.0 };

    let label_px = canvas.font_px(LABEL_POINTS);
    let area_px = (label_px * 3.0) as u32;
    let mut chart = ChartBuilder::on(root)
        .margin((label_px * 0.5) as u32)
        .x_label_area_size(area_px)
        .y_label_area_size(area_px)
        .build_cartesian_2d(SPEEDUP_AXIS_MIN..SPEEDUP_AXIS_MAX, 0.0..y_max)?;

    chart.plotting_area().fill(&theme.background)?;
    chart
        .configure_mesh()
        .x_labels(SPEEDUP_TICK_COUNT + 3)
        .x_label_formatter(&|x| speedup_tick_label(*x))
        .x_desc("Speedup")
        .label_style(("sans-serif", label_px))
        .axis_desc_style(("sans-serif", label_px))
        .bold_line_style(theme.grid.stroke_width(1))
        .light_line_style(theme.background.stroke_width(1))
        .draw()?;

    let marker = (canvas.legend_px() / 2.0).max(1.0) as i32;
    let mut drawn = 0;
    for (i, layer) in series.iter().enumerate() {
        if !layer.is_drawable() {
            continue;
        }
        let color = theme.color(i);

        chart
            .draw_series(
                layer
                    .bins
                    .iter()
                    .filter(|b| b.right > SPEEDUP_AXIS_MIN && b.left < SPEEDUP_AXIS_MAX)
                    .map(move |b| {
                        Rectangle::new(
                            [
                                (b.left.max(SPEEDUP_AXIS_MIN), 0.0),
                                (b.right.min(SPEEDUP_AXIS_MAX), b.density),
                            ],
                            color.mix(0.4).filled(),
                        )
                    }),
            )?
            .label(layer.label.as_str())
            .legend(move |(x, y)| {
                Rectangle::new([(x, y - marker), (x + 2 * marker, y + marker)], color.filled())
            });

        chart.draw_series(LineSeries::new(
            layer.density.iter().copied().filter(|p| in_axis(p.0)),
            color.stroke_width(2),
        ))?;
        drawn += 1;
    }

    if drawn > 0 {
        chart
            .configure_series_labels()
            .position(SeriesLabelPosition::UpperRight)
            .label_font(("sans-serif", canvas.legend_px()))
            .background_style(WHITE.mix(0.8).filled())
            .border_style(BLACK.stroke_width(1))
            .draw()?;
    }

    Ok(())
}

/// Integer tick labels from 0 to 39; the padding below zero stays unlabelled
fn speedup_tick_label(x: f64) -> String {
    let tick = x.round();
    if tick < 0.0 || tick >= SPEEDUP_TICK_COUNT as f64 || (x - tick).abs() > 1e-6 {
        String::new()
    } else {
        format!("{:.0}", tick + 0.0)
    }
}
