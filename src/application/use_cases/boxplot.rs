// ============================================================
// BOXPLOT SUMMARIZER
// ============================================================
// Five-number summary with IQR-fence trimmed whiskers

use serde::Serialize;

use crate::domain::error::{AppError, Result};

/// Five-number summary for one numeric column.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct BoxplotSummary {
    pub min: f64,
    pub q1: f64,
    pub median: f64,
    pub q3: f64,
    pub max: f64,
}

impl BoxplotSummary {
    /// Compute the summary over a column's cells.
    ///
    /// Missing cells are dropped before any statistic is computed.
    /// Quartiles use linear interpolation between the two nearest ranks
    /// of the sorted values. The whiskers are the extreme values inside
    /// the Tukey fences at `q1 - 1.5*iqr` and `q3 + 1.5*iqr`; values
    /// beyond a fence still participate in the quartiles, only the
    /// whiskers exclude them.
    pub fn compute(cells: &[Option<f64>]) -> Result<Self> {
        let mut sorted: Vec<f64> = cells
            .iter()
            .filter_map(|c| *c)
            .filter(|v| v.is_finite())
            .collect();

        if sorted.is_empty() {
            return Err(AppError::InsufficientData(
                "no numeric values to summarize".to_string(),
            ));
        }

        sorted.sort_unstable_by(f64::total_cmp);

        let q1 = quantile_sorted(&sorted, 0.25);
        let median = quantile_sorted(&sorted, 0.5);
        let q3 = quantile_sorted(&sorted, 0.75);

        let iqr = q3 - q1;
        let lower_fence = q1 - 1.5 * iqr;
        let upper_fence = q3 + 1.5 * iqr;

        let min = sorted
            .iter()
            .copied()
            .find(|v| *v >= lower_fence)
            .ok_or_else(|| {
                AppError::InsufficientData("no values inside the lower fence".to_string())
            })?;
        let max = sorted
            .iter()
            .rev()
            .copied()
            .find(|v| *v <= upper_fence)
            .ok_or_else(|| {
                AppError::InsufficientData("no values inside the upper fence".to_string())
            })?;

        Ok(Self {
            min,
            q1,
            median,
            q3,
            max,
        })
    }
}

/// The `p`-th quantile of pre-sorted values, interpolating linearly
/// between the floor and ceil of the fractional rank `p * (n - 1)`.
/// Callers guarantee a non-empty slice.
fn quantile_sorted(sorted: &[f64], p: f64) -> f64 {
    let n = sorted.len();
    if n == 1 {
        return sorted[0];
    }

    let rank = (n - 1) as f64 * p;
    let lower = rank.floor() as usize;
    let fraction = rank - rank.floor();

    if lower + 1 >= n {
        sorted[n - 1]
    } else {
        sorted[lower] + fraction * (sorted[lower + 1] - sorted[lower])
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn cells(values: &[f64]) -> Vec<Option<f64>> {
        values.iter().copied().map(Some).collect()
    }

    #[test]
    fn test_decile_sequence_quartiles() {
        let input = cells(&[1.0, 2.0, 3.0, 4.0, 5.0, 6.0, 7.0, 8.0, 9.0, 10.0]);
        let summary = BoxplotSummary::compute(&input).unwrap();

        assert_eq!(summary.q1, 3.25);
        assert_eq!(summary.median, 5.5);
        assert_eq!(summary.q3, 7.75);
        assert_eq!(summary.min, 1.0);
        assert_eq!(summary.max, 10.0);
    }

    #[test]
    fn test_outlier_excluded_from_whisker_only() {
        let input = cells(&[1.0, 2.0, 3.0, 4.0, 100.0]);
        let summary = BoxplotSummary::compute(&input).unwrap();

        // The outlier still shapes the quartiles via the sort.
        assert_eq!(summary.q1, 2.0);
        assert_eq!(summary.median, 3.0);
        assert_eq!(summary.q3, 4.0);
        // But the upper whisker stops at the fence.
        assert_eq!(summary.min, 1.0);
        assert_eq!(summary.max, 4.0);
    }

    #[test]
    fn test_compute_is_idempotent() {
        let input = cells(&[4.0, 1.0, 7.0, 2.0, 9.0]);
        let first = BoxplotSummary::compute(&input).unwrap();
        let second = BoxplotSummary::compute(&input).unwrap();
        assert_eq!(first, second);
    }

    #[test]
    fn test_unsorted_input_matches_sorted() {
        let shuffled = cells(&[7.0, 1.0, 10.0, 3.0, 5.0, 9.0, 2.0, 8.0, 4.0, 6.0]);
        let summary = BoxplotSummary::compute(&shuffled).unwrap();
        assert_eq!(summary.q1, 3.25);
        assert_eq!(summary.median, 5.5);
        assert_eq!(summary.q3, 7.75);
    }

    #[test]
    fn test_missing_cells_dropped() {
        let input = vec![None, Some(5.0), None, Some(5.0), Some(5.0)];
        let summary = BoxplotSummary::compute(&input).unwrap();
        assert_eq!(summary.min, 5.0);
        assert_eq!(summary.median, 5.0);
        assert_eq!(summary.max, 5.0);
    }

    #[test]
    fn test_empty_input_fails() {
        let err = BoxplotSummary::compute(&[]).unwrap_err();
        assert!(matches!(err, AppError::InsufficientData(_)));
    }

    #[test]
    fn test_all_missing_fails() {
        let err = BoxplotSummary::compute(&[None, None]).unwrap_err();
        assert!(matches!(err, AppError::InsufficientData(_)));
    }

    #[test]
    fn test_single_value() {
        let summary = BoxplotSummary::compute(&cells(&[42.0])).unwrap();
        assert_eq!(summary.min, 42.0);
        assert_eq!(summary.q1, 42.0);
        assert_eq!(summary.median, 42.0);
        assert_eq!(summary.q3, 42.0);
        assert_eq!(summary.max, 42.0);
    }

    #[test]
    fn test_two_values_interpolate() {
        let summary = BoxplotSummary::compute(&cells(&[1.0, 3.0])).unwrap();
        assert_eq!(summary.q1, 1.5);
        assert_eq!(summary.median, 2.0);
        assert_eq!(summary.q3, 2.5);
    }
}
