//! Issue aggregation.
//!
//! The issue total is a raw sum of affected rows per check, not a count of
//! distinct rows: a record flagged by two checks contributes twice, and a
//! duplicate pair contributes two rows.

use crate::checks::{CheckKind, CheckResult};
use crate::config::IssueSumPolicy;
use crate::error::{QualityError, Result};
use serde::Serialize;
use std::path::Path;

/// Totals shown at the top of the report.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct IssueSummary {
    pub total_rows: usize,
    pub rows_with_issues: usize,
    /// `rows_with_issues / total_rows * 100`, unrounded.
    pub percentage_errors: f64,
    pub policy: IssueSumPolicy,
}

impl IssueSummary {
    /// Aggregate check results over a dataset of `total_rows` records.
    ///
    /// # Errors
    ///
    /// Returns [`QualityError::EmptyDataset`] when `total_rows` is zero.
    pub fn compute(
        source: &Path,
        total_rows: usize,
        results: &[CheckResult],
        policy: IssueSumPolicy,
    ) -> Result<Self> {
        if total_rows == 0 {
            return Err(QualityError::EmptyDataset {
                path: source.to_path_buf(),
            });
        }

        let rows_with_issues: usize = results
            .iter()
            .filter(|result| policy.includes(result.kind))
            .map(CheckResult::affected_rows)
            .sum();

        Ok(Self {
            total_rows,
            rows_with_issues,
            percentage_errors: rows_with_issues as f64 / total_rows as f64 * 100.0,
            policy,
        })
    }

    /// Percentage formatted with two decimals, e.g. `80.00`.
    pub fn percentage_display(&self) -> String {
        format!("{:.2}", self.percentage_errors)
    }
}

impl IssueSumPolicy {
    /// Whether a check's affected rows count toward the issue total.
    pub fn includes(&self, kind: CheckKind) -> bool {
        match self {
            IssueSumPolicy::AllChecks => true,
            IssueSumPolicy::ExcludeTotalAmount => kind != CheckKind::TotalAmountOutliers,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::checks::DuplicateGroup;

    fn sample_results() -> Vec<CheckResult> {
        vec![
            CheckResult::rows(CheckKind::MissingValues, vec![3]),
            CheckResult::groups(
                CheckKind::DuplicateRows,
                vec![DuplicateGroup {
                    order_id: "7".to_string(),
                    rows: vec![2, 5],
                }],
            ),
            CheckResult::rows(CheckKind::PriceOutliers, vec![]),
            CheckResult::rows(CheckKind::QuantityOutliers, vec![6]),
            CheckResult::rows(CheckKind::TotalAmountOutliers, vec![3, 4]),
            CheckResult::rows(CheckKind::InvalidDates, vec![]),
        ]
    }

    #[test]
    fn test_raw_sum_counts_overlaps_twice() {
        // row 3 is both missing and a total amount outlier
        let summary =
            IssueSummary::compute(Path::new("x.csv"), 5, &sample_results(), IssueSumPolicy::AllChecks)
                .unwrap();
        assert_eq!(summary.rows_with_issues, 1 + 2 + 1 + 2);
        assert_eq!(summary.percentage_display(), "120.00");
    }

    #[test]
    fn test_exclude_total_amount_policy() {
        let summary = IssueSummary::compute(
            Path::new("x.csv"),
            5,
            &sample_results(),
            IssueSumPolicy::ExcludeTotalAmount,
        )
        .unwrap();
        assert_eq!(summary.rows_with_issues, 4);
        assert_eq!(summary.percentage_display(), "80.00");
    }

    #[test]
    fn test_zero_rows_is_empty_dataset_error() {
        let err = IssueSummary::compute(Path::new("empty.csv"), 0, &[], IssueSumPolicy::AllChecks)
            .unwrap_err();
        assert!(err.is_empty_dataset());
    }

    #[test]
    fn test_percentage_rounds_to_two_decimals() {
        let results = vec![CheckResult::rows(CheckKind::MissingValues, vec![2])];
        let summary =
            IssueSummary::compute(Path::new("x.csv"), 3, &results, IssueSumPolicy::AllChecks).unwrap();
        assert_eq!(summary.percentage_display(), "33.33");
    }

    #[test]
    fn test_policy_includes() {
        assert!(IssueSumPolicy::AllChecks.includes(CheckKind::TotalAmountOutliers));
        assert!(!IssueSumPolicy::ExcludeTotalAmount.includes(CheckKind::TotalAmountOutliers));
        assert!(IssueSumPolicy::ExcludeTotalAmount.includes(CheckKind::InvalidDates));
    }
}
