//! Descriptive statistics and the estimators behind the plots
//!
//! - [`describe`]: count, mean, std, min, quartiles and max of a column
//! - [`histogram`]: density-normalized bins (Freedman-Diaconis rule)
//! - [`GaussianKde`]: kernel density estimate with Scott's bandwidth
//! - [`linear_regression`]: least-squares line with Pearson's r

use std::f64::consts::PI;

use crate::constants::{KDE_CUT, KDE_GRID_SIZE, MAX_HISTOGRAM_BINS};

/// Descriptive statistics of one column
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Summary {
    /// Number of non-NaN values
    pub count: usize,
    pub mean: f64,
    /// Sample standard deviation
    pub std: f64,
    pub min: f64,
    pub q25: f64,
    pub q50: f64,
    pub q75: f64,
    pub max: f64,
}

impl Summary {
    /// Row labels matching [`Summary::values`]
    pub const LABELS: [&'static str; 8] = ["count", "mean", "std", "min", "25%", "50%", "75%", "max"];

    /// Statistics in [`Summary::LABELS`] order
    pub fn values(&self) -> [f64; 8] {
        [
            self.count as f64,
            self.mean,
            self.std,
            self.min,
            self.q25,
            self.q50,
            self.q75,
            self.max,
        ]
    }
}

/// Summarizes `values`, skipping NaN
///
/// Infinite values are kept. The standard deviation uses `n - 1` in the
/// denominator and is NaN for fewer than two values; an empty input gives
/// a zero count and NaN everywhere else.
pub fn describe<'a, I>(values: I) -> Summary
where
    I: IntoIterator<Item = &'a f64>,
{
    let mut sorted: Vec<f64> = values.into_iter().copied().filter(|v| !v.is_nan()).collect();
    sorted.sort_by(f64::total_cmp);

    let count = sorted.len();
    if count == 0 {
        return Summary {
            count,
            mean: f64::NAN,
            std: f64::NAN,
            min: f64::NAN,
            q25: f64::NAN,
            q50: f64::NAN,
            q75: f64::NAN,
            max: f64::NAN,
        };
    }

    let n = count as f64;
    let mean = sorted.iter().sum::<f64>() / n;
    let std = if count < 2 {
        f64::NAN
    } else {
        (sorted.iter().map(|v| (v - mean).powi(2)).sum::<f64>() / (n - 1.0)).sqrt()
    };

    Summary {
        count,
        mean,
        std,
        min: sorted[0],
        q25: quantile(&sorted, 0.25),
        q50: quantile(&sorted, 0.50),
        q75: quantile(&sorted, 0.75),
        max: sorted[count - 1],
    }
}

/// Quantile of ascending `sorted` data by linear interpolation
///
/// Returns NaN for empty input.
pub fn quantile(sorted: &[f64], q: f64) -> f64 {
    if sorted.is_empty() {
        return f64::NAN;
    }
    let pos = q.clamp(0.0, 1.0) * (sorted.len() - 1) as f64;
    let lo = pos.floor() as usize;
    let hi = pos.ceil() as usize;
    let frac = pos - lo as f64;
    if frac == 0.0 || lo == hi {
        sorted[lo]
    } else {
        sorted[lo] + (sorted[hi] - sorted[lo]) * frac
    }
}

/// One histogram bar
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Bin {
    pub left: f64,
    pub right: f64,
    pub count: usize,
    /// `count / (total * width)`, so bar areas sum to one
    pub density: f64,
}

/// Number of bins by the Freedman-Diaconis rule, capped at [`MAX_HISTOGRAM_BINS`]
pub fn freedman_diaconis_bins(sorted: &[f64]) -> usize {
    let n = sorted.len();
    if n < 2 {
        return 1;
    }
    let iqr = quantile(sorted, 0.75) - quantile(sorted, 0.25);
    let width = 2.0 * iqr / (n as f64).cbrt();
    let bins = if width == 0.0 || !width.is_finite() {
        (n as f64).sqrt() as usize
    } else {
        ((sorted[n - 1] - sorted[0]) / width).ceil() as usize
    };
    bins.clamp(1, MAX_HISTOGRAM_BINS)
}

/// Density histogram of the finite entries of `values`
///
/// Empty input gives no bins.
pub fn histogram(values: &[f64]) -> Vec<Bin> {
    let mut sorted: Vec<f64> = values.iter().copied().filter(|v| v.is_finite()).collect();
    if sorted.is_empty() {
        return Vec::new();
    }
    sorted.sort_by(f64::total_cmp);

    let n_bins = freedman_diaconis_bins(&sorted);
    let (mut lo, mut hi) = (sorted[0], sorted[sorted.len() - 1]);
    if lo == hi {
        lo -= 0.5;
        hi += 0.5;
    }
    let width = (hi - lo) / n_bins as f64;

    let mut counts = vec![0usize; n_bins];
    for &v in &sorted {
        let slot = (((v - lo) / width) as usize).min(n_bins - 1);
        counts[slot] += 1;
    }

    let total = sorted.len() as f64;
    counts
        .into_iter()
        .enumerate()
        .map(|(i, count)| Bin {
            left: lo + i as f64 * width,
            right: lo + (i + 1) as f64 * width,
            count,
            density: count as f64 / (total * width),
        })
        .collect()
}

/// Gaussian kernel density estimate
#[derive(Debug, Clone)]
pub struct GaussianKde {
    samples: Vec<f64>,
    bandwidth: f64,
}

impl GaussianKde {
    /// Fits the finite entries of `values` with Scott's rule bandwidth
    ///
    /// Returns `None` for fewer than two values or zero spread.
    pub fn new(values: &[f64]) -> Option<Self> {
        let samples: Vec<f64> = values.iter().copied().filter(|v| v.is_finite()).collect();
        let summary = describe(&samples);
        if summary.count < 2 || !(summary.std > 0.0) {
            return None;
        }
        let bandwidth = summary.std * (summary.count as f64).powf(-0.2);
        Some(Self { samples, bandwidth })
    }

    pub fn bandwidth(&self) -> f64 {
        self.bandwidth
    }

    /// Density at `x`
    pub fn evaluate(&self, x: f64) -> f64 {
        let norm = 1.0 / (self.samples.len() as f64 * self.bandwidth * (2.0 * PI).sqrt());
        self.samples
            .iter()
            .map(|s| {
                let z = (x - s) / self.bandwidth;
                (-0.5 * z * z).exp()
            })
            .sum::<f64>()
            * norm
    }

    /// Density on an evenly spaced grid reaching [`KDE_CUT`] bandwidths past the data
    pub fn curve(&self) -> Vec<(f64, f64)> {
        let (min, max) = self
            .samples
            .iter()
            .fold((f64::INFINITY, f64::NEG_INFINITY), |(lo, hi), &v| (lo.min(v), hi.max(v)));
        let lo = min - KDE_CUT * self.bandwidth;
        let hi = max + KDE_CUT * self.bandwidth;
        let step = (hi - lo) / (KDE_GRID_SIZE - 1) as f64;
        (0..KDE_GRID_SIZE)
            .map(|i| {
                let x = lo + i as f64 * step;
                (x, self.evaluate(x))
            })
            .collect()
    }
}

/// Least-squares fit `y = slope * x + intercept`
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Regression {
    pub slope: f64,
    pub intercept: f64,
    /// Pearson correlation; NaN when `y` is constant
    pub r: f64,
    /// Number of finite pairs used
    pub n: usize,
}

impl Regression {
    pub fn predict(&self, x: f64) -> f64 {
        self.slope * x + self.intercept
    }
}

/// Fits a line through the pairs where both coordinates are finite
///
/// Returns `None` for fewer than two pairs or constant `x`.
pub fn linear_regression(xs: &[f64], ys: &[f64]) -> Option<Regression> {
    let pairs: Vec<(f64, f64)> = xs
        .iter()
        .zip(ys)
        .filter(|(x, y)| x.is_finite() && y.is_finite())
        .map(|(&x, &y)| (x, y))
        .collect();
    if pairs.len() < 2 {
        return None;
    }

    let n = pairs.len() as f64;
    let mean_x = pairs.iter().map(|p| p.0).sum::<f64>() / n;
    let mean_y = pairs.iter().map(|p| p.1).sum::<f64>() / n;

    let (mut sxx, mut syy, mut sxy) = (0.0, 0.0, 0.0);
    for &(x, y) in &pairs {
        let (dx, dy) = (x - mean_x, y - mean_y);
        sxx += dx * dx;
        syy += dy * dy;
        sxy += dx * dy;
    }
    if sxx == 0.0 {
        return None;
    }

    let slope = sxy / sxx;
    let r = if syy == 0.0 { f64::NAN } else { sxy / (sxx * syy).sqrt() };
    Some(Regression {
        slope,
        intercept: mean_y - slope * mean_x,
        r,
        n: pairs.len(),
    })
}
