//! Data-quality checks.
//!
//! Each check reads the whole [`Dataset`] and reports the spreadsheet row
//! numbers of the records it flags. Checks are independent: a record may be
//! flagged by several of them and nothing is deduplicated across checks.
//!
//! [`default_checks`] returns the six checks in report order:
//!
//! 1. Missing Values
//! 2. Duplicate Rows (grouped by `OrderID`)
//! 3. Price Outliers
//! 4. Quantity Outliers
//! 5. Total Amount Outliers
//! 6. Invalid Dates

mod dates;
mod duplicates;
mod missing;
mod outliers;

pub use dates::{InvalidDateCheck, parse_lenient_date};
pub use duplicates::DuplicateRowsCheck;
pub use missing::MissingValuesCheck;
pub use outliers::{
    PRICE_MAX, PRICE_MIN, PriceOutlierCheck, QUANTITY_MAX, QUANTITY_MIN, QuantityOutlierCheck,
    TotalAmountCheck,
};

use crate::dataset::{Dataset, row_number};
use crate::error::Result;
use serde::Serialize;
use serde::ser::SerializeStruct;
use std::fmt;

/// Identifies one of the six checks.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum CheckKind {
    MissingValues,
    DuplicateRows,
    PriceOutliers,
    QuantityOutliers,
    TotalAmountOutliers,
    InvalidDates,
}

impl CheckKind {
    /// All checks in report order.
    pub const ALL: [CheckKind; 6] = [
        CheckKind::MissingValues,
        CheckKind::DuplicateRows,
        CheckKind::PriceOutliers,
        CheckKind::QuantityOutliers,
        CheckKind::TotalAmountOutliers,
        CheckKind::InvalidDates,
    ];

    /// Name shown in the report table.
    pub fn display_name(&self) -> &'static str {
        match self {
            Self::MissingValues => "Missing Values",
            Self::DuplicateRows => "Duplicate Rows",
            Self::PriceOutliers => "Price Outliers",
            Self::QuantityOutliers => "Quantity Outliers",
            Self::TotalAmountOutliers => "Total Amount Outliers",
            Self::InvalidDates => "Invalid Dates",
        }
    }

    /// Stable machine-readable identifier.
    pub fn id(&self) -> &'static str {
        match self {
            Self::MissingValues => "missing_values",
            Self::DuplicateRows => "duplicate_rows",
            Self::PriceOutliers => "price_outliers",
            Self::QuantityOutliers => "quantity_outliers",
            Self::TotalAmountOutliers => "total_amount_outliers",
            Self::InvalidDates => "invalid_dates",
        }
    }
}

impl fmt::Display for CheckKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.display_name())
    }
}

/// Rows sharing one duplicated `OrderID`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct DuplicateGroup {
    pub order_id: String,
    /// Row numbers in ascending order.
    pub rows: Vec<usize>,
}

impl fmt::Display for DuplicateGroup {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{{{}}}", join_numbers(&self.rows))
    }
}

/// What a check flagged.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "type", content = "values", rename_all = "snake_case")]
pub enum Findings {
    /// Individually flagged rows, ascending.
    Rows(Vec<usize>),
    /// Groups of rows flagged together, ordered by their first row.
    Groups(Vec<DuplicateGroup>),
}

impl fmt::Display for Findings {
    /// `3, 7, 9` for rows and `{3, 7}, {4, 5}` for groups. Empty when nothing
    /// was flagged.
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Findings::Rows(rows) => f.write_str(&join_numbers(rows)),
            Findings::Groups(groups) => {
                let parts: Vec<String> = groups.iter().map(ToString::to_string).collect();
                f.write_str(&parts.join(", "))
            }
        }
    }
}

fn join_numbers(rows: &[usize]) -> String {
    rows.iter()
        .map(ToString::to_string)
        .collect::<Vec<_>>()
        .join(", ")
}

/// Outcome of one check.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CheckResult {
    pub kind: CheckKind,
    pub findings: Findings,
}

impl CheckResult {
    pub fn rows(kind: CheckKind, rows: Vec<usize>) -> Self {
        Self {
            kind,
            findings: Findings::Rows(rows),
        }
    }

    pub fn groups(kind: CheckKind, groups: Vec<DuplicateGroup>) -> Self {
        Self {
            kind,
            findings: Findings::Groups(groups),
        }
    }

    /// The count shown in the report: flagged rows, or for duplicates the
    /// number of duplicated `OrderID` groups.
    pub fn count(&self) -> usize {
        match &self.findings {
            Findings::Rows(rows) => rows.len(),
            Findings::Groups(groups) => groups.len(),
        }
    }

    /// Number of rows involved. For duplicates this counts every row of every
    /// group, so a pair contributes two.
    pub fn affected_rows(&self) -> usize {
        match &self.findings {
            Findings::Rows(rows) => rows.len(),
            Findings::Groups(groups) => groups.iter().map(|g| g.rows.len()).sum(),
        }
    }

    pub fn is_clean(&self) -> bool {
        self.count() == 0
    }
}

impl Serialize for CheckResult {
    fn serialize<S>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error>
    where
        S: serde::Serializer,
    {
        let mut state = serializer.serialize_struct("CheckResult", 5)?;
        state.serialize_field("id", self.kind.id())?;
        state.serialize_field("name", self.kind.display_name())?;
        state.serialize_field("count", &self.count())?;
        state.serialize_field("affected_rows", &self.affected_rows())?;
        state.serialize_field("findings", &self.findings)?;
        state.end()
    }
}

/// A single data-quality rule.
///
/// Implementations only read the dataset, so one instance can be shared
/// across threads.
pub trait QualityCheck: Send + Sync {
    /// Which check this is.
    fn kind(&self) -> CheckKind;

    /// Run the check against the whole dataset.
    fn run(&self, dataset: &Dataset) -> Result<CheckResult>;
}

static_assertions::assert_impl_all!(CheckResult: Send, Sync);

/// The six checks in report order.
///
/// `total_amount_tolerance` is passed to [`TotalAmountCheck`]; `0.0` keeps
/// exact equality.
pub fn default_checks(total_amount_tolerance: f64) -> Vec<Box<dyn QualityCheck>> {
    vec![
        Box::new(MissingValuesCheck),
        Box::new(DuplicateRowsCheck),
        Box::new(PriceOutlierCheck),
        Box::new(QuantityOutlierCheck),
        Box::new(TotalAmountCheck::new(total_amount_tolerance)),
        Box::new(InvalidDateCheck),
    ]
}

/// Row numbers of the records whose flag is set.
pub(crate) fn flagged_rows(flags: impl IntoIterator<Item = bool>) -> Vec<usize> {
    flags
        .into_iter()
        .enumerate()
        .filter(|(_, flagged)| *flagged)
        .map(|(index, _)| row_number(index))
        .collect()
}
