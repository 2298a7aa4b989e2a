//! Histogram of the measured values for the capability view.
//!
//! The capability view plots the flattened measurements as a
//! density-normalised histogram against the specification limits and the
//! grand mean. This module produces the bins; drawing them is left to the
//! caller.
//!
//! # Examples
//!
//! ```
//! use u_spc::distribution::{histogram, BinMethod};
//!
//! let data = [1.0, 1.5, 2.0, 2.5, 3.0, 3.5, 4.0, 4.5, 5.0];
//! let h = histogram(&data, BinMethod::Fixed(4)).unwrap();
//! assert_eq!(h.edges.len(), 5);
//! assert_eq!(h.counts.iter().sum::<usize>(), 9);
//! ```

use serde::Serialize;
use u_numflow::stats;

/// Number of bins the capability view uses by default.
pub const DEFAULT_BINS: usize = 15;

/// How the number of bins is chosen.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BinMethod {
    /// A fixed bin count (at least 1). Capped at the larger of the number
    /// of values and [`DEFAULT_BINS`].
    Fixed(usize),
    /// Sturges' rule: k = ⌈log₂(n)⌉ + 1. Best for near-normal data.
    Sturges,
    /// Scott's rule: h = 3.49·σ·n^(-1/3). Width-based.
    Scott,
}

impl Default for BinMethod {
    fn default() -> Self {
        BinMethod::Fixed(DEFAULT_BINS)
    }
}

/// Equal-width histogram over `[min, max]`.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Histogram {
    /// Number of bins.
    pub n_bins: usize,
    /// Bin width.
    pub bin_width: f64,
    /// Bin edges (length = n_bins + 1).
    pub edges: Vec<f64>,
    /// Observations per bin. The last bin is closed on the right.
    pub counts: Vec<usize>,
    /// Relative frequency density: count / (total · bin_width). Integrates
    /// to 1 over the histogram.
    pub density: Vec<f64>,
}

/// Bins `data` into equal-width bins.
///
/// # Returns
///
/// `None` if `data` has fewer than 2 values, contains non-finite values,
/// has zero range, or the method asks for zero bins.
pub fn histogram(data: &[f64], method: BinMethod) -> Option<Histogram> {
    let n = data.len();
    if n < 2 || data.iter().any(|v| !v.is_finite()) {
        return None;
    }

    let min_val = stats::min(data)?;
    let max_val = stats::max(data)?;
    let range = max_val - min_val;
    if range <= 0.0 {
        return None;
    }

    let nf = n as f64;
    let n_bins = match method {
        BinMethod::Fixed(k) => k.min(n.max(DEFAULT_BINS)),
        BinMethod::Sturges => (nf.log2()).ceil() as usize + 1,
        BinMethod::Scott => {
            let sd = stats::std_dev(data)?;
            if sd <= 0.0 {
                return None;
            }
            let h = 3.49 * sd * nf.powf(-1.0 / 3.0);
            ((range / h).ceil() as usize).max(1)
        }
    };
    if n_bins == 0 {
        return None;
    }

    let bin_width = range / n_bins as f64;

    let mut edges: Vec<f64> = (0..n_bins)
        .map(|i| min_val + i as f64 * bin_width)
        .collect();
    edges.push(max_val);

    let mut counts = vec![0_usize; n_bins];
    for &x in data {
        let bin = ((x - min_val) / bin_width).floor() as usize;
        counts[bin.min(n_bins - 1)] += 1;
    }

    let density = counts
        .iter()
        .map(|&c| c as f64 / (nf * bin_width))
        .collect();

    Some(Histogram {
        n_bins,
        bin_width,
        edges,
        counts,
        density,
    })
}
