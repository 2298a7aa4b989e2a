//! Process capability indices (Cp, Cpk, Cpm).
//!
//! Capability indices quantify how well the natural spread of a process
//! fits inside the customer's specification limits. All indices here are
//! short-term: they use the within-subgroup sigma estimate.
//!
//! # References
//!
//! - Montgomery (2019), *Introduction to Statistical Quality Control*, 8th ed.,
//!   Chapter 8.
//! - Kane (1986), "Process Capability Indices", *Journal of Quality Technology*
//!   18(1), pp. 41--52.
//! - Chan, Cheng & Spiring (1988), "A New Measure of Process Capability: Cpm",
//!   *Journal of Quality Technology* 20(3), pp. 162--175.

use serde::Serialize;
use tracing::debug;

use super::sigma::{estimate_sigma, SigmaEstimate};
use super::spec::SpecificationLimits;
use crate::error::{Result, SpcError};
use crate::spc::{
    process_limits, ControlConstants, ProcessLimits, SubgroupMatrix, SubgroupStatistics,
};

/// Computed capability indices.
///
/// Indices are not clamped: a negative Cpk means the process mean lies
/// outside the specification.
///
/// # Index interpretation
///
/// | Index | Value | Interpretation |
/// |-------|-------|----------------|
/// | Cp | >= 1.33 | Spread fits the tolerance |
/// | Cpk | >= 1.33 | Spread fits and the process is centered |
/// | Cpm | >= 1.33 | Process meets Taguchi loss criterion |
///
/// Reference: Montgomery (2019), Chapter 8, Table 8.5.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct CapabilityIndices {
    /// Cp = (USL - LSL) / (6 * sigma).
    pub cp: f64,
    /// Cpk = min(Cpu, Cpl).
    pub cpk: f64,
    /// Cpu = (USL - mean) / (3 * sigma).
    pub cpu: f64,
    /// Cpl = (mean - LSL) / (3 * sigma).
    pub cpl: f64,
    /// Cpm = Cp / sqrt(1 + ((mean - target) / sigma)^2).
    pub cpm: f64,
    /// Grand mean the indices were computed against.
    pub mean: f64,
    /// Sigma estimate used.
    pub sigma: f64,
    /// Lower specification limit.
    pub lsl: f64,
    /// Upper specification limit.
    pub usl: f64,
}

/// Computes Cp, Cpk and the side indices.
///
/// # Errors
///
/// [`SpcError::DegenerateProcess`] when `sigma` is zero, negative or not
/// finite; the indices are undefined for a process without variation.
///
/// # Examples
///
/// ```
/// use u_spc::capability::{capability_indices, SpecificationLimits};
/// use u_spc::spc::{control_constants, process_limits, subgroup_statistics, SubgroupMatrix};
///
/// let m = SubgroupMatrix::new(vec![
///     vec![449.0, 451.0],
///     vec![448.0, 452.0],
/// ]).unwrap();
/// let limits = process_limits(&subgroup_statistics(&m), &control_constants(2).unwrap());
/// let spec = SpecificationLimits::default();
///
/// let idx = capability_indices(&spec, &limits, 2.0).unwrap();
/// assert!((idx.cp - 20.0 / 12.0).abs() < 1e-12);
/// assert_eq!(idx.cp, idx.cpk);
/// ```
pub fn capability_indices(
    spec: &SpecificationLimits,
    limits: &ProcessLimits,
    sigma: f64,
) -> Result<CapabilityIndices> {
    if !sigma.is_finite() || sigma <= 0.0 {
        return Err(SpcError::DegenerateProcess { sigma });
    }

    let x_bar = limits.grand_mean;
    let offset = x_bar - spec.target;

    // Measured from the target: centered with equal tolerances gives Cp == Cpk exactly.
    let cp = (spec.tolerance_lower + spec.tolerance_upper) / (6.0 * sigma);
    let cpu = (spec.tolerance_upper - offset) / (3.0 * sigma);
    let cpl = (spec.tolerance_lower + offset) / (3.0 * sigma);
    let cpk = cpu.min(cpl);

    let deviation_ratio = offset / sigma;
    let cpm = cp / (1.0 + deviation_ratio * deviation_ratio).sqrt();

    Ok(CapabilityIndices {
        cp,
        cpk,
        cpu,
        cpl,
        cpm,
        mean: x_bar,
        sigma,
        lsl: spec.lsl(),
        usl: spec.usl(),
    })
}

/// Everything the capability view needs: the specification, the sigma
/// estimate with its method, and the indices.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct CapabilityReport {
    /// Specification the indices refer to.
    pub specification: SpecificationLimits,
    /// Sigma estimate and estimator.
    pub sigma: SigmaEstimate,
    /// Computed indices.
    pub indices: CapabilityIndices,
}

/// Runs the capability layer: sigma estimate, then indices.
///
/// Independent of the chart layer; the grand mean is recomputed from
/// `stats`.
///
/// # Errors
///
/// - [`SpcError::InvalidSpecification`] if `spec` fails validation.
/// - [`SpcError::DegenerateProcess`] if the estimated sigma is zero.
pub fn assess(
    spec: &SpecificationLimits,
    matrix: &SubgroupMatrix,
    stats: &SubgroupStatistics,
    constants: &ControlConstants,
) -> Result<CapabilityReport> {
    spec.validate()?;
    let sigma = estimate_sigma(stats, matrix, Some(constants));
    let limits = process_limits(stats, constants);
    let indices = capability_indices(spec, &limits, sigma.value)?;

    debug!(
        lsl = indices.lsl,
        usl = indices.usl,
        cp = indices.cp,
        cpk = indices.cpk,
        "capability computed"
    );

    Ok(CapabilityReport {
        specification: *spec,
        sigma,
        indices,
    })
}
