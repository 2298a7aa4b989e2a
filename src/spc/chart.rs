//! Control limits and single-point classification.
//!
//! Defines the building blocks of the X-bar and R charts: the limit triple
//! for one chart, the process-wide limit bundle derived from subgroup
//! statistics, and the in-control/out-of-control tag attached to every
//! plotted point.
//!
//! # References
//!
//! - Montgomery, D.C. (2019). *Introduction to Statistical Quality Control*, 8th ed.
//! - ASTM E2587 — Standard Practice for Use of Control Charts

use serde::Serialize;

use super::constants::ControlConstants;
use super::subgroup::SubgroupStatistics;

/// Control limits for a chart.
///
/// # Invariants
///
/// - `lcl <= cl <= ucl`
/// - All values are finite
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct ControlLimits {
    /// Upper control limit (LSC).
    pub ucl: f64,
    /// Center line (LC).
    pub cl: f64,
    /// Lower control limit (LIC).
    pub lcl: f64,
}

impl ControlLimits {
    /// Whether `value` lies within `[lcl, ucl]`. Boundaries are in control.
    pub fn contains(&self, value: f64) -> bool {
        !(value > self.ucl || value < self.lcl)
    }

    /// Classifies `value` against these limits.
    pub fn classify(&self, value: f64) -> PointStatus {
        if self.contains(value) {
            PointStatus::InControl
        } else {
            PointStatus::OutOfControl
        }
    }
}

/// Process-wide limits derived from subgroup statistics.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct ProcessLimits {
    /// X-double-bar: mean of the subgroup means.
    pub grand_mean: f64,
    /// R-bar: mean of the subgroup ranges.
    pub mean_range: f64,
    /// X-bar chart limits.
    pub xbar: ControlLimits,
    /// R chart limits.
    pub range: ControlLimits,
}

/// Computes the X-bar and R chart limits.
///
/// - X-bar chart: CL = X-double-bar, UCL/LCL = CL ± A2 · R-bar.
/// - R chart: CL = R-bar, UCL = D4 · R-bar, LCL = D3 · R-bar.
///
/// Ranges are non-negative and every tabulated D3 is non-negative, so the
/// R chart LCL is non-negative as computed.
///
/// # Examples
///
/// ```
/// use u_spc::spc::{control_constants, process_limits, subgroup_statistics, SubgroupMatrix};
///
/// let m = SubgroupMatrix::new(vec![vec![45.0, 47.0, 50.0, 53.0, 55.0]]).unwrap();
/// let limits = process_limits(&subgroup_statistics(&m), &control_constants(5).unwrap());
///
/// assert_eq!(limits.grand_mean, 50.0);
/// assert_eq!(limits.mean_range, 10.0);
/// assert!((limits.xbar.ucl - 55.77).abs() < 1e-9);
/// assert_eq!(limits.range.lcl, 0.0);
/// ```
pub fn process_limits(stats: &SubgroupStatistics, constants: &ControlConstants) -> ProcessLimits {
    let grand_mean = stats.grand_mean();
    let mean_range = stats.mean_range();
    let half_width = constants.a2 * mean_range;

    ProcessLimits {
        grand_mean,
        mean_range,
        xbar: ControlLimits {
            ucl: grand_mean + half_width,
            cl: grand_mean,
            lcl: grand_mean - half_width,
        },
        range: ControlLimits {
            ucl: constants.d4 * mean_range,
            cl: mean_range,
            lcl: constants.d3 * mean_range,
        },
    }
}

/// Single-point limit classification.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum PointStatus {
    /// Within `[lcl, ucl]`, boundaries included.
    InControl,
    /// Strictly above the UCL or strictly below the LCL.
    OutOfControl,
}

/// A single point on a control chart.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct ChartPoint {
    /// Zero-based subgroup index.
    pub index: usize,
    /// The plotted statistic (subgroup mean or range).
    pub value: f64,
    /// Classification against the chart's limits.
    pub status: PointStatus,
}

impl ChartPoint {
    /// Whether this point violates the chart's limits.
    pub fn is_out_of_control(&self) -> bool {
        self.status == PointStatus::OutOfControl
    }
}

/// Tags each value against `limits`, preserving order.
///
/// # Examples
///
/// ```
/// use u_spc::spc::{classify_points, ControlLimits, PointStatus};
///
/// let limits = ControlLimits { ucl: 12.0, cl: 10.0, lcl: 8.0 };
/// let tags = classify_points(&[10.0, 12.0, 12.5, 7.9], &limits);
/// assert_eq!(tags, vec![
///     PointStatus::InControl,
///     PointStatus::InControl,
///     PointStatus::OutOfControl,
///     PointStatus::OutOfControl,
/// ]);
/// ```
pub fn classify_points(values: &[f64], limits: &ControlLimits) -> Vec<PointStatus> {
    values.iter().map(|&v| limits.classify(v)).collect()
}

/// Builds chart points for `values`, classified against `limits`.
pub fn chart_points(values: &[f64], limits: &ControlLimits) -> Vec<ChartPoint> {
    values
        .iter()
        .enumerate()
        .map(|(index, &value)| ChartPoint {
            index,
            value,
            status: limits.classify(value),
        })
        .collect()
}
