//! Process sigma estimation.
//!
//! Short-term sigma comes from the average range when a d2 factor is
//! available: sigma-hat = R-bar / d2. Without one, the estimate falls back
//! to the sample standard deviation of every measurement in the matrix
//! (denominator `k·n − 1`).
//!
//! # References
//!
//! - Montgomery (2019), *Introduction to Statistical Quality Control*, 8th ed.,
//!   Section 6.2.

use serde::Serialize;
use tracing::{debug, warn};
use u_numflow::stats::WelfordAccumulator;

use crate::spc::{ControlConstants, SubgroupMatrix, SubgroupStatistics};

/// Which estimator produced a [`SigmaEstimate`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum SigmaMethod {
    /// R-bar / d2.
    RangeOverD2,
    /// Sample standard deviation of the flattened matrix.
    SampleStdDev,
}

/// Estimated process standard deviation, tagged with its estimator.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct SigmaEstimate {
    /// The estimate. Zero for a process with no variation.
    pub value: f64,
    /// How it was obtained.
    pub method: SigmaMethod,
}

/// Estimates sigma from the subgroup ranges, or from the raw data when
/// `constants` is `None`.
///
/// The matrix always holds at least two finite measurements, so both
/// branches produce a finite, non-negative value.
///
/// # Examples
///
/// ```
/// use u_spc::capability::{estimate_sigma, SigmaMethod};
/// use u_spc::spc::{control_constants, subgroup_statistics, SubgroupMatrix};
///
/// let m = SubgroupMatrix::new(vec![vec![1.0, 3.0], vec![2.0, 6.0]]).unwrap();
/// let stats = subgroup_statistics(&m);
///
/// let short_term = estimate_sigma(&stats, &m, Some(&control_constants(2).unwrap()));
/// assert_eq!(short_term.method, SigmaMethod::RangeOverD2);
/// assert!((short_term.value - 3.0 / 1.128).abs() < 1e-12);
///
/// let fallback = estimate_sigma(&stats, &m, None);
/// assert_eq!(fallback.method, SigmaMethod::SampleStdDev);
/// ```
pub fn estimate_sigma(
    stats: &SubgroupStatistics,
    matrix: &SubgroupMatrix,
    constants: Option<&ControlConstants>,
) -> SigmaEstimate {
    match constants {
        Some(c) => {
            let value = stats.mean_range() / c.d2;
            debug!(sigma = value, d2 = c.d2, "sigma from R-bar/d2");
            SigmaEstimate {
                value,
                method: SigmaMethod::RangeOverD2,
            }
        }
        None => {
            let mut acc = WelfordAccumulator::new();
            matrix.values().for_each(|x| acc.update(x));
            let value = acc.sample_std_dev().unwrap_or(0.0);
            warn!(
                sigma = value,
                subgroup_size = matrix.subgroup_size(),
                "no d2 factor for subgroup size, using overall sample std dev"
            );
            SigmaEstimate {
                value,
                method: SigmaMethod::SampleStdDev,
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::spc::{control_constants, subgroup_statistics};
    use u_numflow::stats;

    #[test]
    fn range_over_d2() {
        let m = SubgroupMatrix::new(vec![
            vec![10.0, 12.0, 11.0],
            vec![9.0, 13.0, 11.0],
            vec![10.0, 10.0, 10.0],
        ])
        .unwrap();
        let c = control_constants(3).unwrap();
        let sigma = estimate_sigma(&subgroup_statistics(&m), &m, Some(&c));
        assert_eq!(sigma.method, SigmaMethod::RangeOverD2);
        assert!((sigma.value - 2.0 / 1.693).abs() < 1e-12);
    }

    #[test]
    fn fallback_uses_flattened_sample_std_dev() {
        // n = 12 has no tabulated d2
        let rows: Vec<Vec<f64>> = (0..4)
            .map(|i| (0..12).map(|j| (i * 12 + j) as f64 * 0.5).collect())
            .collect();
        let m = SubgroupMatrix::new(rows).unwrap();
        assert!(control_constants(m.subgroup_size()).is_err());

        let sigma = estimate_sigma(&subgroup_statistics(&m), &m, None);
        let expected = stats::std_dev(&m.flattened()).unwrap();
        assert_eq!(sigma.method, SigmaMethod::SampleStdDev);
        assert!((sigma.value - expected).abs() < 1e-12);
    }

    #[test]
    fn fallback_divisor_is_total_count_minus_one() {
        let m = SubgroupMatrix::new(vec![vec![1.0, 2.0], vec![3.0, 4.0]]).unwrap();
        let sigma = estimate_sigma(&subgroup_statistics(&m), &m, None);
        // mean 2.5, squared deviations sum to 5, divided by 4 - 1
        assert!((sigma.value - (5.0_f64 / 3.0).sqrt()).abs() < 1e-12);
    }

    #[test]
    fn fallback_is_not_a_per_subgroup_average() {
        // Per-subgroup std devs are both sqrt(0.5); the overall is larger
        let m = SubgroupMatrix::new(vec![vec![0.0, 1.0], vec![10.0, 11.0]]).unwrap();
        let sigma = estimate_sigma(&subgroup_statistics(&m), &m, None);
        assert!(sigma.value > 5.0);
    }

    #[test]
    fn constant_data_gives_zero_on_both_paths() {
        let m = SubgroupMatrix::new(vec![vec![5.0; 3]; 4]).unwrap();
        let s = subgroup_statistics(&m);
        let c = control_constants(3).unwrap();
        assert_eq!(estimate_sigma(&s, &m, Some(&c)).value, 0.0);
        assert!(estimate_sigma(&s, &m, None).value.abs() < 1e-15);
    }
}
