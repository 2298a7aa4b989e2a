//! X-bar and Range (X-bar-R) control chart.
//!
//! Monitors the process mean (X-bar chart) and within-subgroup variability
//! (R chart) for subgroup sizes n = 2..=10.
//!
//! # Algorithm
//!
//! 1. For each subgroup, compute the mean (X-bar) and range (R).
//! 2. Look up A2, D3, D4 for the subgroup size.
//! 3. Compute the grand mean (X-double-bar) and average range (R-bar).
//! 4. X-bar chart limits: CL = X-double-bar, UCL/LCL = CL ± A2 · R-bar.
//! 5. R chart limits: CL = R-bar, UCL = D4 · R-bar, LCL = D3 · R-bar.
//! 6. Tag every point that falls strictly outside its chart's limits.
//!
//! # Reference
//!
//! Montgomery, D.C. (2019). *Introduction to Statistical Quality Control*, 8th ed.,
//! Chapter 6: Control Charts for Variables.

use serde::Serialize;
use tracing::{debug, warn};

use super::chart::{chart_points, process_limits, ChartPoint, ControlLimits, ProcessLimits};
use super::constants::{control_constants, ControlConstants};
use super::subgroup::{subgroup_statistics, SubgroupMatrix, SubgroupStatistics};
use crate::error::Result;

/// A fully computed X-bar-R chart.
///
/// # Examples
///
/// ```
/// use u_spc::spc::{SubgroupMatrix, XBarRChart};
///
/// let m = SubgroupMatrix::new(vec![
///     vec![25.0, 26.0, 24.5, 25.5, 25.0],
///     vec![25.2, 24.8, 25.1, 24.9, 25.3],
///     vec![25.1, 25.0, 24.7, 25.3, 24.9],
/// ]).unwrap();
///
/// let chart = XBarRChart::new(&m).unwrap();
/// assert!(chart.xbar_limits().ucl > chart.xbar_limits().cl);
/// assert!(chart.is_in_control());
/// ```
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct XBarRChart {
    constants: ControlConstants,
    statistics: SubgroupStatistics,
    limits: ProcessLimits,
    xbar_points: Vec<ChartPoint>,
    range_points: Vec<ChartPoint>,
}

impl XBarRChart {
    /// Builds the chart for `matrix`.
    ///
    /// # Errors
    ///
    /// [`SpcError::UnsupportedSubgroupSize`](crate::SpcError::UnsupportedSubgroupSize)
    /// when the subgroup size has no tabulated factors. No partial chart is
    /// produced.
    pub fn new(matrix: &SubgroupMatrix) -> Result<Self> {
        let constants = control_constants(matrix.subgroup_size())?;
        Ok(Self::from_parts(subgroup_statistics(matrix), constants))
    }

    /// Builds the chart from already computed statistics and factors.
    pub fn from_parts(statistics: SubgroupStatistics, constants: ControlConstants) -> Self {
        let limits = process_limits(&statistics, &constants);
        let xbar_points = chart_points(statistics.means(), &limits.xbar);
        let range_points = chart_points(statistics.ranges(), &limits.range);

        debug!(
            subgroups = statistics.len(),
            subgroup_size = constants.subgroup_size,
            grand_mean = limits.grand_mean,
            mean_range = limits.mean_range,
            "x-bar/R limits computed"
        );

        let chart = Self {
            constants,
            statistics,
            limits,
            xbar_points,
            range_points,
        };

        if !chart.is_in_control() {
            warn!(
                xbar = ?chart.xbar_out_of_control(),
                range = ?chart.range_out_of_control(),
                "subgroups outside control limits"
            );
        }
        chart
    }

    /// Factors used for the limits.
    pub fn constants(&self) -> &ControlConstants {
        &self.constants
    }

    /// Per-subgroup means and ranges.
    pub fn statistics(&self) -> &SubgroupStatistics {
        &self.statistics
    }

    /// Grand mean, mean range and both limit triples.
    pub fn limits(&self) -> &ProcessLimits {
        &self.limits
    }

    /// X-bar chart limits.
    pub fn xbar_limits(&self) -> &ControlLimits {
        &self.limits.xbar
    }

    /// R chart limits.
    pub fn range_limits(&self) -> &ControlLimits {
        &self.limits.range
    }

    /// X-bar chart points, in subgroup order.
    pub fn xbar_points(&self) -> &[ChartPoint] {
        &self.xbar_points
    }

    /// R chart points, in subgroup order.
    pub fn range_points(&self) -> &[ChartPoint] {
        &self.range_points
    }

    /// `true` when no point on either chart is out of control.
    pub fn is_in_control(&self) -> bool {
        !self
            .xbar_points
            .iter()
            .chain(&self.range_points)
            .any(ChartPoint::is_out_of_control)
    }

    /// Indices of subgroups whose mean is out of control.
    pub fn xbar_out_of_control(&self) -> Vec<usize> {
        out_of_control_indices(&self.xbar_points)
    }

    /// Indices of subgroups whose range is out of control.
    pub fn range_out_of_control(&self) -> Vec<usize> {
        out_of_control_indices(&self.range_points)
    }
}

fn out_of_control_indices(points: &[ChartPoint]) -> Vec<usize> {
    points
        .iter()
        .filter(|p| p.is_out_of_control())
        .map(|p| p.index)
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::SpcError;
    use crate::spc::PointStatus;

    #[test]
    fn scenario_chart_is_in_control() {
        let m = SubgroupMatrix::new(vec![
            vec![10.0, 12.0, 11.0],
            vec![9.0, 13.0, 11.0],
            vec![10.0, 10.0, 10.0],
        ])
        .unwrap();
        let chart = XBarRChart::new(&m).unwrap();

        assert_eq!(chart.constants().a2, 1.023);
        assert_eq!(chart.xbar_points().len(), 3);
        assert_eq!(chart.range_points().len(), 3);
        assert!(chart.is_in_control());
        assert!(chart.xbar_out_of_control().is_empty());
        assert!(chart.range_out_of_control().is_empty());
    }

    #[test]
    fn detects_shifted_subgroup() {
        let mut rows = vec![vec![10.0, 10.5, 9.5]; 5];
        rows.push(vec![50.0, 51.0, 49.0]);
        let chart = XBarRChart::new(&SubgroupMatrix::new(rows).unwrap()).unwrap();

        assert!(!chart.is_in_control());
        assert!(chart.xbar_out_of_control().contains(&5));
        assert_eq!(chart.xbar_points()[5].status, PointStatus::OutOfControl);
        assert!(chart.range_out_of_control().is_empty());
    }

    #[test]
    fn detects_range_spike() {
        let mut rows = vec![vec![10.0, 10.1]; 9];
        rows.push(vec![5.0, 15.0]);
        let chart = XBarRChart::new(&SubgroupMatrix::new(rows).unwrap()).unwrap();

        assert_eq!(chart.range_out_of_control(), vec![9]);
    }

    #[test]
    fn unsupported_size_yields_no_chart() {
        let m = SubgroupMatrix::new(vec![vec![1.0; 11]; 4]).unwrap();
        assert_eq!(
            XBarRChart::new(&m),
            Err(SpcError::UnsupportedSubgroupSize(11))
        );
    }

    #[test]
    fn constant_subgroups_collapse_limits() {
        let m = SubgroupMatrix::new(vec![vec![10.0; 4]; 5]).unwrap();
        let chart = XBarRChart::new(&m).unwrap();
        let limits = chart.xbar_limits();
        assert_eq!(limits.cl, 10.0);
        assert_eq!(limits.ucl, 10.0);
        assert_eq!(limits.lcl, 10.0);
        assert!(chart.is_in_control());
    }

    #[test]
    fn textbook_factors_n5() {
        // Mean 50, range 10: UCL = 50 + 0.577 * 10, UCL_R = 2.115 * 10
        let m = SubgroupMatrix::new(vec![vec![45.0, 47.0, 50.0, 53.0, 55.0]]).unwrap();
        let chart = XBarRChart::new(&m).unwrap();

        assert!((chart.xbar_limits().ucl - 55.77).abs() < 1e-9);
        assert!((chart.xbar_limits().lcl - 44.23).abs() < 1e-9);
        assert!((chart.range_limits().ucl - 21.15).abs() < 1e-9);
        assert_eq!(chart.range_limits().cl, 10.0);
    }

    #[test]
    fn range_lcl_uses_d3_for_large_subgroups() {
        let m = SubgroupMatrix::new(vec![
            vec![1.0, 2.0, 3.0, 4.0, 5.0, 6.0, 7.0, 8.0],
            vec![2.0, 3.0, 4.0, 5.0, 6.0, 7.0, 8.0, 9.0],
        ])
        .unwrap();
        let chart = XBarRChart::new(&m).unwrap();
        // R-bar = 7, D3(8) = 0.184
        assert!((chart.range_limits().lcl - 0.184 * 7.0).abs() < 1e-12);
    }
}
