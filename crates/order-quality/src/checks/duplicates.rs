//! Duplicate `OrderID` detection.
//!
//! `OrderID` is treated as the primary key: every value held by more than one
//! record forms one group. Records with a null `OrderID` are not grouped; the
//! missing-values check reports them.
//!
//! Groups are listed in the order their `OrderID` first appears in the file,
//! not sorted by `OrderID`, so the report reads top to bottom.

use super::{CheckKind, CheckResult, DuplicateGroup, QualityCheck};
use crate::dataset::{Dataset, ORDER_ID, row_number};
use crate::error::Result;
use std::collections::HashMap;
use tracing::debug;

#[derive(Debug, Clone, Copy, Default)]
pub struct DuplicateRowsCheck;

impl QualityCheck for DuplicateRowsCheck {
    fn kind(&self) -> CheckKind {
        CheckKind::DuplicateRows
    }

    fn run(&self, dataset: &Dataset) -> Result<CheckResult> {
        let ids = dataset.string_column(ORDER_ID)?;

        // groups keep first-seen order
        let mut group_index: HashMap<&str, usize> = HashMap::new();
        let mut groups: Vec<DuplicateGroup> = Vec::new();

        for (index, id) in ids.into_iter().enumerate() {
            let Some(id) = id else { continue };
            match group_index.get(id) {
                Some(&position) => groups[position].rows.push(row_number(index)),
                None => {
                    group_index.insert(id, groups.len());
                    groups.push(DuplicateGroup {
                        order_id: id.to_string(),
                        rows: vec![row_number(index)],
                    });
                }
            }
        }

        groups.retain(|group| group.rows.len() > 1);
        debug!("{} duplicated OrderID values", groups.len());

        Ok(CheckResult::groups(self.kind(), groups))
    }
}
