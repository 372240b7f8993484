//! Missing value detection.

use super::{CheckKind, CheckResult, QualityCheck, flagged_rows};
use crate::dataset::Dataset;
use crate::error::Result;
use tracing::debug;

/// Flags every record with at least one null or empty field, in any column.
#[derive(Debug, Clone, Copy, Default)]
pub struct MissingValuesCheck;

impl QualityCheck for MissingValuesCheck {
    fn kind(&self) -> CheckKind {
        CheckKind::MissingValues
    }

    fn run(&self, dataset: &Dataset) -> Result<CheckResult> {
        let rows = flagged_rows(dataset.rows_with_nulls());
        debug!("{} rows with missing values", rows.len());
        Ok(CheckResult::rows(self.kind(), rows))
    }
}
