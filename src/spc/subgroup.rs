//! Subgroup matrix and per-subgroup statistics.
//!
//! A [`SubgroupMatrix`] is validated once on construction (non-empty,
//! rectangular, width >= 2, finite cells). Everything downstream works on
//! the validated matrix and cannot fail on shape.

use serde::Serialize;
use u_numflow::stats;

use crate::error::{Result, SpcError};

/// `k` subgroups of `n` measurements each, in time order.
///
/// # Examples
///
/// ```
/// use u_spc::spc::SubgroupMatrix;
///
/// let m = SubgroupMatrix::new(vec![
///     vec![10.0, 12.0, 11.0],
///     vec![9.0, 13.0, 11.0],
/// ]).unwrap();
/// assert_eq!(m.subgroup_count(), 2);
/// assert_eq!(m.subgroup_size(), 3);
/// ```
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SubgroupMatrix {
    rows: Vec<Vec<f64>>,
    subgroup_size: usize,
}

impl SubgroupMatrix {
    /// Validates `rows` and wraps them.
    ///
    /// # Errors
    ///
    /// - [`SpcError::EmptyInput`] if there are no rows.
    /// - [`SpcError::InvalidShape`] if a row's width differs from the first
    ///   row's, or the common width is below 2.
    /// - [`SpcError::NonNumeric`] if any cell is NaN or infinite.
    ///
    /// Cells are not bounded in magnitude. A subgroup whose sum or spread
    /// exceeds `f64::MAX` (values within a factor of two of it) produces an
    /// infinite mean or range, and the limits derived from it are infinite
    /// as well.
    pub fn new(rows: Vec<Vec<f64>>) -> Result<Self> {
        let first = rows.first().ok_or(SpcError::EmptyInput)?;
        let n = first.len();
        if n < 2 {
            return Err(SpcError::InvalidShape {
                subgroup: 0,
                expected: 2,
                found: n,
            });
        }

        for (i, row) in rows.iter().enumerate() {
            if row.len() != n {
                return Err(SpcError::InvalidShape {
                    subgroup: i,
                    expected: n,
                    found: row.len(),
                });
            }
            if let Some(j) = row.iter().position(|x| !x.is_finite()) {
                return Err(SpcError::NonNumeric {
                    subgroup: i,
                    position: j,
                });
            }
        }

        Ok(Self {
            rows,
            subgroup_size: n,
        })
    }

    /// Number of subgroups (`k`).
    pub fn subgroup_count(&self) -> usize {
        self.rows.len()
    }

    /// Measurements per subgroup (`n`).
    pub fn subgroup_size(&self) -> usize {
        self.subgroup_size
    }

    /// Subgroups in time order.
    pub fn rows(&self) -> &[Vec<f64>] {
        &self.rows
    }

    /// All measurements, row-major.
    pub fn values(&self) -> impl Iterator<Item = f64> + '_ {
        self.rows.iter().flatten().copied()
    }

    /// All measurements collected into one buffer, row-major.
    pub fn flattened(&self) -> Vec<f64> {
        self.values().collect()
    }
}

/// Mean and range of every subgroup, index-aligned with the matrix rows.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SubgroupStatistics {
    means: Vec<f64>,
    ranges: Vec<f64>,
}

impl SubgroupStatistics {
    /// Subgroup means (X-bar values).
    pub fn means(&self) -> &[f64] {
        &self.means
    }

    /// Subgroup ranges (max − min), never negative.
    pub fn ranges(&self) -> &[f64] {
        &self.ranges
    }

    /// Number of subgroups.
    pub fn len(&self) -> usize {
        self.means.len()
    }

    /// Always `false`: statistics only exist for a non-empty matrix.
    pub fn is_empty(&self) -> bool {
        self.means.is_empty()
    }

    /// X-double-bar: mean of the subgroup means.
    pub fn grand_mean(&self) -> f64 {
        stats::kahan_sum(&self.means) / self.means.len() as f64
    }

    /// R-bar: mean of the subgroup ranges.
    pub fn mean_range(&self) -> f64 {
        stats::kahan_sum(&self.ranges) / self.ranges.len() as f64
    }
}

/// Computes the mean and range of every subgroup in one pass.
///
/// # Examples
///
/// ```
/// use u_spc::spc::{subgroup_statistics, SubgroupMatrix};
///
/// let m = SubgroupMatrix::new(vec![
///     vec![10.0, 12.0, 11.0],
///     vec![9.0, 13.0, 11.0],
///     vec![10.0, 10.0, 10.0],
/// ]).unwrap();
/// let s = subgroup_statistics(&m);
/// assert_eq!(s.means(), &[11.0, 11.0, 10.0]);
/// assert_eq!(s.ranges(), &[2.0, 4.0, 0.0]);
/// ```
pub fn subgroup_statistics(matrix: &SubgroupMatrix) -> SubgroupStatistics {
    let (means, ranges) = matrix
        .rows()
        .iter()
        .map(|row| {
            let n = row.len() as f64;
            let mean = stats::kahan_sum(row) / n;
            let range = match (stats::min(row), stats::max(row)) {
                (Some(lo), Some(hi)) => hi - lo,
                _ => 0.0,
            };
            (mean, range)
        })
        .unzip();

    SubgroupStatistics { means, ranges }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn scenario_matrix() -> SubgroupMatrix {
        SubgroupMatrix::new(vec![
            vec![10.0, 12.0, 11.0],
            vec![9.0, 13.0, 11.0],
            vec![10.0, 10.0, 10.0],
        ])
        .unwrap()
    }

    #[test]
    fn rejects_empty_matrix() {
        assert_eq!(SubgroupMatrix::new(vec![]), Err(SpcError::EmptyInput));
    }

    #[test]
    fn rejects_ragged_rows() {
        let err = SubgroupMatrix::new(vec![vec![1.0, 2.0, 3.0], vec![1.0, 2.0]]).unwrap_err();
        assert_eq!(
            err,
            SpcError::InvalidShape {
                subgroup: 1,
                expected: 3,
                found: 2
            }
        );
    }

    #[test]
    fn rejects_single_measurement_subgroups() {
        let err = SubgroupMatrix::new(vec![vec![1.0], vec![2.0]]).unwrap_err();
        assert!(matches!(err, SpcError::InvalidShape { found: 1, .. }));
    }

    #[test]
    fn rejects_non_finite_cells() {
        let err = SubgroupMatrix::new(vec![vec![1.0, 2.0], vec![3.0, f64::NAN]]).unwrap_err();
        assert_eq!(
            err,
            SpcError::NonNumeric {
                subgroup: 1,
                position: 1
            }
        );

        let err = SubgroupMatrix::new(vec![vec![f64::INFINITY, 2.0]]).unwrap_err();
        assert_eq!(
            err,
            SpcError::NonNumeric {
                subgroup: 0,
                position: 0
            }
        );
    }

    #[test]
    fn flattened_is_row_major() {
        let m = SubgroupMatrix::new(vec![vec![1.0, 2.0], vec![3.0, 4.0]]).unwrap();
        assert_eq!(m.flattened(), vec![1.0, 2.0, 3.0, 4.0]);
    }

    #[test]
    fn scenario_means_and_ranges() {
        let s = subgroup_statistics(&scenario_matrix());
        assert_eq!(s.means(), &[11.0, 11.0, 10.0]);
        assert_eq!(s.ranges(), &[2.0, 4.0, 0.0]);
        assert_eq!(s.len(), 3);
        assert!(!s.is_empty());
    }

    #[test]
    fn scenario_grand_mean_and_mean_range() {
        let s = subgroup_statistics(&scenario_matrix());
        assert!((s.grand_mean() - 32.0 / 3.0).abs() < 1e-12);
        assert_eq!(s.mean_range(), 2.0);
    }

    #[test]
    fn large_magnitudes_stay_finite() {
        let m = SubgroupMatrix::new(vec![vec![-1e300, 1e300], vec![1e300, 1e300]]).unwrap();
        let s = subgroup_statistics(&m);
        assert_eq!(s.ranges(), &[2e300, 0.0]);
        assert!(s.means().iter().all(|x| x.is_finite()));
        assert!(s.mean_range().is_finite());
    }

    #[test]
    fn spread_beyond_f64_max_overflows_range() {
        let m = SubgroupMatrix::new(vec![vec![-f64::MAX, f64::MAX]]).unwrap();
        let s = subgroup_statistics(&m);
        assert_eq!(s.ranges(), &[f64::INFINITY]);
    }

    #[test]
    fn constant_matrix_has_zero_ranges() {
        let m = SubgroupMatrix::new(vec![vec![5.0; 4]; 6]).unwrap();
        let s = subgroup_statistics(&m);
        assert!(s.ranges().iter().all(|&r| r == 0.0));
        assert_eq!(s.mean_range(), 0.0);
        assert_eq!(s.grand_mean(), 5.0);
    }
}

#[cfg(test)]
mod proptests {
    use super::*;
    use proptest::prelude::*;

    fn matrix_strategy() -> impl Strategy<Value = Vec<Vec<f64>>> {
        (2_usize..=10, 1_usize..=25).prop_flat_map(|(n, k)| {
            proptest::collection::vec(proptest::collection::vec(-1e4_f64..1e4, n), k)
        })
    }

    proptest! {
        #[test]
        fn statistics_align_with_rows(rows in matrix_strategy()) {
            let k = rows.len();
            let m = SubgroupMatrix::new(rows).unwrap();
            let s = subgroup_statistics(&m);
            prop_assert_eq!(s.means().len(), k);
            prop_assert_eq!(s.ranges().len(), k);
        }

        #[test]
        fn ranges_are_non_negative(rows in matrix_strategy()) {
            let m = SubgroupMatrix::new(rows).unwrap();
            let s = subgroup_statistics(&m);
            prop_assert!(s.ranges().iter().all(|&r| r >= 0.0));
        }

        #[test]
        fn mean_lies_within_subgroup_extent(rows in matrix_strategy()) {
            let m = SubgroupMatrix::new(rows).unwrap();
            let s = subgroup_statistics(&m);
            for (row, &mean) in m.rows().iter().zip(s.means()) {
                let lo = stats::min(row).unwrap();
                let hi = stats::max(row).unwrap();
                prop_assert!(mean >= lo - 1e-9 && mean <= hi + 1e-9);
            }
        }
    }
}
