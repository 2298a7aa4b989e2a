//! End-to-end analysis of one dataset.
//!
//! Runs the chart layer and, when a specification is supplied, the
//! capability layer, and collects everything a presentation layer needs to
//! draw the X-bar chart, the R chart and the capability histogram.
//!
//! The control constants are looked up before anything else is computed:
//! an unsupported subgroup size aborts the whole analysis, so callers never
//! see a chart without a capability section or the other way round.

use serde::Serialize;
use tracing::{debug, info};

use crate::capability::{assess, CapabilityReport, SpecificationLimits};
use crate::distribution::{histogram, BinMethod, Histogram};
use crate::error::Result;
use crate::spc::{control_constants, subgroup_statistics, SubgroupMatrix, XBarRChart};

/// Options that do not affect the statistics themselves.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct AnalysisOptions {
    /// Binning for the capability histogram.
    pub bins: BinMethod,
}

/// Output of [`analyze`].
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SpcReport {
    /// Number of subgroups (`k`).
    pub subgroup_count: usize,
    /// Measurements per subgroup (`n`).
    pub subgroup_size: usize,
    /// X-bar and R charts.
    pub chart: XBarRChart,
    /// Capability section, present when a specification was supplied.
    pub capability: Option<CapabilityReport>,
    /// Histogram of all measurements, present alongside the capability
    /// section unless the data has zero spread.
    pub histogram: Option<Histogram>,
}

/// Analyzes one dataset.
///
/// # Errors
///
/// - [`SpcError::UnsupportedSubgroupSize`](crate::SpcError::UnsupportedSubgroupSize)
///   before any statistic is computed.
/// - [`SpcError::InvalidSpecification`](crate::SpcError::InvalidSpecification) and
///   [`SpcError::DegenerateProcess`](crate::SpcError::DegenerateProcess) from the
///   capability layer when `spec` is given.
///
/// # Examples
///
/// ```
/// use u_spc::capability::SpecificationLimits;
/// use u_spc::report::{analyze, AnalysisOptions};
/// use u_spc::spc::SubgroupMatrix;
///
/// let m = SubgroupMatrix::new(vec![
///     vec![449.0, 451.0, 450.0],
///     vec![448.0, 452.0, 450.0],
///     vec![450.5, 449.5, 450.0],
/// ]).unwrap();
///
/// let spec = SpecificationLimits::default();
/// let report = analyze(&m, Some(&spec), AnalysisOptions::default()).unwrap();
/// assert!(report.chart.is_in_control());
/// assert!(report.capability.unwrap().indices.cpk > 1.0);
/// ```
pub fn analyze(
    matrix: &SubgroupMatrix,
    spec: Option<&SpecificationLimits>,
    options: AnalysisOptions,
) -> Result<SpcReport> {
    let constants = control_constants(matrix.subgroup_size())?;
    let statistics = subgroup_statistics(matrix);
    debug!(
        subgroups = matrix.subgroup_count(),
        subgroup_size = matrix.subgroup_size(),
        "subgroup statistics computed"
    );

    let capability = spec
        .map(|s| assess(s, matrix, &statistics, &constants))
        .transpose()?;

    let histogram = capability
        .as_ref()
        .and_then(|_| histogram(&matrix.flattened(), options.bins));

    let chart = XBarRChart::from_parts(statistics, constants);

    info!(
        subgroups = matrix.subgroup_count(),
        in_control = chart.is_in_control(),
        cpk = capability.as_ref().map(|c| c.indices.cpk),
        "analysis complete"
    );

    Ok(SpcReport {
        subgroup_count: matrix.subgroup_count(),
        subgroup_size: matrix.subgroup_size(),
        chart,
        capability,
        histogram,
    })
}
