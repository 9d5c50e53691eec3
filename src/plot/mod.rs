//! # Speedup plots
//!
//! Two figure kinds are produced:
//!
//! - **Distribution** ([`dist_show`]): overlaid histograms with density
//!   curves of one configuration's speedup, one layer per nnz threshold.
//! - **Joint** ([`joint_plot`]): scatter of a configuration's speedup
//!   against a matrix attribute with a least-squares line and marginal
//!   histograms.
//!
//! Figures are drawn as SVG. Passing an output path saves the figure there
//! at print resolution with a compact legend, converted to PDF when the
//! path ends in `.pdf`; passing `None` renders an SVG preview with a large
//! legend into [`AnalysisConfig::preview_dir`].
//!
//! [`AnalysisConfig::preview_dir`]: crate::config::AnalysisConfig::preview_dir

pub mod dist;
pub mod joint;

pub use dist::{dist_show, prepare_dist, DistPlot, DistSeries};
pub use joint::{joint_plot, prepare_joint, JointData, JointPlot};

use std::path::{Path, PathBuf};
use std::sync::Arc;

use plotters::drawing::DrawingAreaErrorKind;
use svg2pdf::usvg;
use svg2pdf::usvg::fontdb;
use plotters::style::RGBColor;
use tracing::{info, warn};

use crate::constants::*;
use crate::error::{AnalysisError, Result};

/// Colours shared by every figure
#[derive(Debug, Clone)]
pub struct PlotTheme {
    /// Figure background
    pub figure: RGBColor,
    /// Plotting area background
    pub background: RGBColor,
    /// Grid lines
    pub grid: RGBColor,
    /// Series colours, cycled
    pub palette: Vec<RGBColor>,
}

impl Default for PlotTheme {
    fn default() -> Self {
        Self {
            figure: RGBColor(255, 255, 255),
            background: RGBColor(234, 234, 242),
            grid: RGBColor(255, 255, 255),
            palette: vec![
                RGBColor(76, 114, 176),
                RGBColor(221, 132, 82),
                RGBColor(85, 168, 104),
                RGBColor(196, 78, 82),
                RGBColor(129, 114, 179),
                RGBColor(147, 120, 96),
            ],
        }
    }
}

impl PlotTheme {
    /// Colour of the `i`-th series
    pub fn color(&self, i: usize) -> RGBColor {
        if self.palette.is_empty() {
            return RGBColor(0, 0, 0);
        }
        self.palette[i % self.palette.len()]
    }
}

/// File format a figure is written in
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum FigureFormat {
    Svg,
    /// Drawn as SVG, then converted
    Pdf,
}

impl FigureFormat {
    /// Format implied by the extension of `path`; `None` if unsupported
    pub fn from_path(path: &Path) -> Option<Self> {
        let ext = path.extension()?.to_str()?.to_ascii_lowercase();
        match ext.as_str() {
            "svg" => Some(FigureFormat::Svg),
            "pdf" => Some(FigureFormat::Pdf),
            _ => None,
        }
    }
}

/// Where, in which format and at what scale a figure is rendered
#[derive(Debug, Clone)]
pub(crate) struct Canvas {
    pub path: PathBuf,
    pub format: FigureFormat,
    pub dpi: f64,
    pub legend_points: f64,
}

impl Canvas {
    /// Resolves `output` to a saved figure, or a preview named after `stem`
    ///
    /// Saved figures keep the requested path when it ends in `.pdf` or
    /// `.svg`; any other extension is replaced by `.pdf`.
    pub fn resolve(output: Option<&Path>, preview_dir: &Path, stem: &str) -> Result<Self> {
        let canvas = match output {
            Some(path) => {
                let (path, format) = match FigureFormat::from_path(path) {
                    Some(format) => (path.to_path_buf(), format),
                    None => {
                        let pdf = path.with_extension(SAVED_FIGURE_EXTENSION);
                        warn!(
                            requested = %path.display(),
                            written = %pdf.display(),
                            "unsupported figure format, saving as PDF"
                        );
                        (pdf, FigureFormat::Pdf)
                    }
                };
                Self {
                    path,
                    format,
                    dpi: SAVE_DPI,
                    legend_points: SAVE_LEGEND_POINTS,
                }
            }
            None => Self {
                path: preview_dir.join(slug(stem)).with_extension(PREVIEW_FIGURE_EXTENSION),
                format: FigureFormat::Svg,
                dpi: PREVIEW_DPI,
                legend_points: PREVIEW_LEGEND_POINTS,
            },
        };

        if let Some(parent) = canvas.path.parent() {
            if !parent.as_os_str().is_empty() {
                std::fs::create_dir_all(parent).map_err(|source| AnalysisError::Io {
                    path: parent.to_path_buf(),
                    source,
                })?;
            }
        }
        Ok(canvas)
    }

    /// Pixel size of a figure measured in inches
    pub fn pixels(&self, inches: (f64, f64)) -> (u32, u32) {
        (
            (inches.0 * self.dpi).round() as u32,
            (inches.1 * self.dpi).round() as u32,
        )
    }

    /// Pixel height of text set at `points`
    pub fn font_px(&self, points: f64) -> f64 {
        points * self.dpi / POINTS_PER_INCH
    }

    pub fn legend_px(&self) -> f64 {
        self.font_px(self.legend_points)
    }

    /// Writes a rendered SVG document in the canvas format
    pub fn write(&self, svg: &str) -> Result<()> {
        let bytes = match self.format {
            FigureFormat::Svg => svg.as_bytes().to_vec(),
            FigureFormat::Pdf => svg_to_pdf(svg)?,
        };
        std::fs::write(&self.path, bytes).map_err(|source| AnalysisError::Io {
            path: self.path.clone(),
            source,
        })
    }

    /// Logs where the figure went
    pub fn announce(&self, output: Option<&Path>) {
        match output {
            Some(_) => info!(path = %self.path.display(), "saved figure"),
            None => info!(path = %self.path.display(), "figure preview ready"),
        }
    }
}

/// Converts an SVG document to a single-page PDF
///
/// Text is laid out with the system fonts; without any, labels are dropped
/// from the PDF but the figure is still written.
pub(crate) fn svg_to_pdf(svg: &str) -> Result<Vec<u8>> {
    let mut fonts = fontdb::Database::new();
    fonts.load_system_fonts();
    let options = usvg::Options {
        fontdb: Arc::new(fonts),
        ..usvg::Options::default()
    };

    let tree = usvg::Tree::from_str(svg, &options).map_err(|e| AnalysisError::Plot(e.to_string()))?;
    svg2pdf::to_pdf(
        &tree,
        svg2pdf::ConversionOptions::default(),
        svg2pdf::PageOptions::default(),
    )
    .map_err(|e| AnalysisError::Plot(e.to_string()))
}

/// Lower-case file stem with runs of non-alphanumerics collapsed to `_`
pub(crate) fn slug(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    for c in text.chars() {
        if c.is_ascii_alphanumeric() {
            out.push(c.to_ascii_lowercase());
        } else if !out.ends_with('_') {
            out.push('_');
        }
    }
    out.trim_matches('_').to_string()
}

pub(crate) fn plot_error<E>(err: DrawingAreaErrorKind<E>) -> AnalysisError
where
    E: std::error::Error + Send + Sync,
{
    AnalysisError::Plot(err.to_string())
}

/// Axis range spanning `values` with a small margin; `(0, 1)` when empty
pub(crate) fn padded_range<I>(values: I) -> (f64, f64)
where
    I: IntoIterator<Item = f64>,
{
    let (lo, hi) = values
        .into_iter()
        .filter(|v| v.is_finite())
        .fold((f64::INFINITY, f64::NEG_INFINITY), |(lo, hi), v| (lo.min(v), hi.max(v)));
    if lo > hi {
        return (0.0, 1.0);
    }
    if lo == hi {
        return (lo - 0.5, hi + 0.5);
    }
    let pad = (hi - lo) * 0.05;
    (lo - pad, hi + pad)
}
