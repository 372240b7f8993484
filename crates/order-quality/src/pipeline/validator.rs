//! Runs the checks over a dataset and aggregates their results.

use crate::checks::{QualityCheck, default_checks};
use crate::config::{IssueSumPolicy, ValidationConfig};
use crate::dataset::{Dataset, REQUIRED_COLUMNS};
use crate::error::{QualityError, Result, ResultExt};
use crate::reporting::QualityReport;
use crate::summary::IssueSummary;
use tracing::{debug, info};

/// Applies the six checks in report order and builds a [`QualityReport`].
///
/// Holds no per-run state; one validator can check any number of datasets.
pub struct Validator {
    checks: Vec<Box<dyn QualityCheck>>,
    policy: IssueSumPolicy,
}

static_assertions::assert_impl_all!(Validator: Send, Sync);

impl Default for Validator {
    fn default() -> Self {
        Self::new(&ValidationConfig::default())
    }
}

impl Validator {
    pub fn new(config: &ValidationConfig) -> Self {
        Self {
            checks: default_checks(config.total_amount_tolerance),
            policy: config.issue_sum_policy,
        }
    }

    pub fn policy(&self) -> IssueSumPolicy {
        self.policy
    }

    /// Validate a loaded dataset.
    ///
    /// # Errors
    ///
    /// - [`QualityError::Schema`] if a required column is absent
    /// - [`QualityError::EmptyDataset`] if there are no data rows
    /// - [`QualityError::TypeCoercion`] if a numeric column holds text
    pub fn validate(&self, dataset: &Dataset) -> Result<QualityReport> {
        dataset.require_columns(&REQUIRED_COLUMNS)?;

        let total_rows = dataset.total_rows();
        if total_rows == 0 {
            return Err(QualityError::EmptyDataset {
                path: dataset.source().to_path_buf(),
            });
        }

        let mut results = Vec::with_capacity(self.checks.len());
        for check in &self.checks {
            let kind = check.kind();
            let result = check
                .run(dataset)
                .context(format!("Running check '{}'", kind))?;
            debug!("{}: {} flagged", kind, result.count());
            results.push(result);
        }

        let summary = IssueSummary::compute(dataset.source(), total_rows, &results, self.policy)?;
        info!(
            "{} of {} rows flagged ({}%)",
            summary.rows_with_issues,
            summary.total_rows,
            summary.percentage_display()
        );

        Ok(QualityReport::new(dataset.source(), summary, results))
    }
}
