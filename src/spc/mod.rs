//! Statistical Process Control (SPC) charts.
//!
//! The chart layer of the engine: subgroup statistics, tabulated control
//! chart factors, X-bar and R chart limits, and single-point limit
//! classification.
//!
//! # Pipeline
//!
//! [`subgroup_statistics`] → [`control_constants`] → [`process_limits`] →
//! [`classify_points`], assembled by [`XBarRChart`].
//!
//! # References
//!
//! - Montgomery, D.C. (2019). *Introduction to Statistical Quality Control*, 8th ed.
//! - ASTM E2587 — Standard Practice for Use of Control Charts
//! - Shewhart, W.A. (1931). *Economic Control of Quality of Manufactured Product*.

mod chart;
mod constants;
mod subgroup;
mod xbar_r;

pub use chart::{
    chart_points, classify_points, process_limits, ChartPoint, ControlLimits, PointStatus,
    ProcessLimits,
};
pub use constants::{control_constants, ControlConstants, MAX_SUBGROUP_SIZE, MIN_SUBGROUP_SIZE};
pub use subgroup::{subgroup_statistics, SubgroupMatrix, SubgroupStatistics};
pub use xbar_r::XBarRChart;
