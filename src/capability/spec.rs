//! Customer specification: nominal target with asymmetric tolerances.

use serde::{Deserialize, Serialize};

use crate::error::{Result, SpcError};

/// Nominal value used when no target is configured.
pub const DEFAULT_TARGET: f64 = 450.0;

/// Tolerance used on either side when none is configured.
pub const DEFAULT_TOLERANCE: f64 = 10.0;

/// Target and tolerances; the limits are `target - tolerance_lower` and
/// `target + tolerance_upper`.
///
/// # Examples
///
/// ```
/// use u_spc::capability::SpecificationLimits;
///
/// let spec = SpecificationLimits::new(450.0, 10.0, 15.0).unwrap();
/// assert_eq!(spec.lsl(), 440.0);
/// assert_eq!(spec.usl(), 465.0);
///
/// // Any finite tolerances are accepted; a collapsed spec just gives Cp = 0
/// assert_eq!(SpecificationLimits::new(450.0, 0.0, 0.0).unwrap().width(), 0.0);
/// assert!(SpecificationLimits::new(f64::NAN, 10.0, 10.0).is_err());
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct SpecificationLimits {
    /// Nominal value.
    pub target: f64,
    /// Distance from the target down to the LSL.
    pub tolerance_lower: f64,
    /// Distance from the target up to the USL.
    pub tolerance_upper: f64,
}

impl Default for SpecificationLimits {
    fn default() -> Self {
        Self {
            target: DEFAULT_TARGET,
            tolerance_lower: DEFAULT_TOLERANCE,
            tolerance_upper: DEFAULT_TOLERANCE,
        }
    }
}

impl SpecificationLimits {
    /// Creates a validated specification.
    ///
    /// # Errors
    ///
    /// [`SpcError::InvalidSpecification`] if any value is non-finite. The
    /// limits are not required to be ordered: a collapsed or inverted
    /// specification yields a zero or negative Cp.
    pub fn new(target: f64, tolerance_lower: f64, tolerance_upper: f64) -> Result<Self> {
        let spec = Self {
            target,
            tolerance_lower,
            tolerance_upper,
        };
        spec.validate()?;
        Ok(spec)
    }

    /// Checks a specification built field by field (e.g. deserialized).
    ///
    /// # Errors
    ///
    /// Same conditions as [`SpecificationLimits::new`].
    pub fn validate(&self) -> Result<()> {
        if !self.target.is_finite() {
            return Err(SpcError::InvalidSpecification("target must be finite"));
        }
        if !self.tolerance_lower.is_finite() || !self.tolerance_upper.is_finite() {
            return Err(SpcError::InvalidSpecification("tolerances must be finite"));
        }
        Ok(())
    }

    /// Lower specification limit.
    pub fn lsl(&self) -> f64 {
        self.target - self.tolerance_lower
    }

    /// Upper specification limit.
    pub fn usl(&self) -> f64 {
        self.target + self.tolerance_upper
    }

    /// Total tolerance width, `USL - LSL`.
    pub fn width(&self) -> f64 {
        self.usl() - self.lsl()
    }
}
