//! Control chart factors for X-bar-R charts.
//!
//! The factors are empirical standard values, reproduced literally and never
//! re-derived. Subgroup sizes outside `2..=10` have no entry and are
//! rejected.
//!
//! # References
//!
//! - Montgomery, D.C. (2019). *Introduction to Statistical Quality Control*,
//!   8th ed., Appendix Table VI.
//! - ASTM E2587 — Standard Practice for Use of Control Charts

use serde::Serialize;

use crate::error::{Result, SpcError};

/// Smallest tabulated subgroup size.
pub const MIN_SUBGROUP_SIZE: usize = 2;

/// Largest tabulated subgroup size.
pub const MAX_SUBGROUP_SIZE: usize = 10;

// ---------------------------------------------------------------------------
// Factor tables, indexed by subgroup size n=2..10 (index 0 corresponds to n=2)
// ---------------------------------------------------------------------------

/// A2: UCL/LCL = X-double-bar ± A2 · R-bar.
const A2: [f64; 9] = [1.880, 1.023, 0.729, 0.577, 0.483, 0.419, 0.373, 0.337, 0.308];

/// D3: LCL_R = D3 · R-bar.
const D3: [f64; 9] = [0.0, 0.0, 0.0, 0.0, 0.076, 0.136, 0.184, 0.223, 0.256];

/// D4: UCL_R = D4 · R-bar.
const D4: [f64; 9] = [3.267, 2.574, 2.282, 2.115, 2.004, 1.924, 1.864, 1.816, 1.777];

/// d2: mean of the relative range distribution, sigma-hat = R-bar / d2.
const D2: [f64; 9] = [1.128, 1.693, 2.059, 2.326, 2.534, 2.704, 2.847, 2.970, 3.078];

/// Factors for one subgroup size.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct ControlConstants {
    /// Subgroup size the factors were looked up for.
    pub subgroup_size: usize,
    /// X-bar chart limit multiplier.
    pub a2: f64,
    /// R chart lower limit multiplier.
    pub d3: f64,
    /// R chart upper limit multiplier.
    pub d4: f64,
    /// Bias-correction divisor for sigma-hat.
    pub d2: f64,
}

/// Looks up the control chart factors for subgroup size `n`.
///
/// # Errors
///
/// [`SpcError::UnsupportedSubgroupSize`] when `n` is outside `2..=10`.
///
/// # Examples
///
/// ```
/// use u_spc::spc::control_constants;
///
/// let c = control_constants(5).unwrap();
/// assert_eq!(c.a2, 0.577);
/// assert_eq!(c.d4, 2.115);
/// assert!(control_constants(11).is_err());
/// ```
pub fn control_constants(n: usize) -> Result<ControlConstants> {
    if !(MIN_SUBGROUP_SIZE..=MAX_SUBGROUP_SIZE).contains(&n) {
        return Err(SpcError::UnsupportedSubgroupSize(n));
    }
    let idx = n - MIN_SUBGROUP_SIZE;
    Ok(ControlConstants {
        subgroup_size: n,
        a2: A2[idx],
        d3: D3[idx],
        d4: D4[idx],
        d2: D2[idx],
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn table_is_reproduced_exactly() {
        let expected = [
            (2, 1.880, 0.0, 3.267, 1.128),
            (3, 1.023, 0.0, 2.574, 1.693),
            (4, 0.729, 0.0, 2.282, 2.059),
            (5, 0.577, 0.0, 2.115, 2.326),
            (6, 0.483, 0.076, 2.004, 2.534),
            (7, 0.419, 0.136, 1.924, 2.704),
            (8, 0.373, 0.184, 1.864, 2.847),
            (9, 0.337, 0.223, 1.816, 2.970),
            (10, 0.308, 0.256, 1.777, 3.078),
        ];
        for (n, a2, d3, d4, d2) in expected {
            let c = control_constants(n).unwrap();
            assert_eq!(c.subgroup_size, n);
            assert_eq!(c.a2, a2, "A2 for n={n}");
            assert_eq!(c.d3, d3, "D3 for n={n}");
            assert_eq!(c.d4, d4, "D4 for n={n}");
            assert_eq!(c.d2, d2, "d2 for n={n}");
        }
    }

    #[test]
    fn rejects_sizes_outside_table() {
        for n in [0, 1, 11, 25] {
            assert_eq!(
                control_constants(n),
                Err(SpcError::UnsupportedSubgroupSize(n))
            );
        }
    }

    #[test]
    fn d3_is_never_negative() {
        for n in MIN_SUBGROUP_SIZE..=MAX_SUBGROUP_SIZE {
            assert!(control_constants(n).unwrap().d3 >= 0.0);
        }
    }
}
