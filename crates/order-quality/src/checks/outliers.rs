//! Numeric range and consistency checks.
//!
//! Null values never satisfy a predicate: a record with a missing `Price` is
//! reported by the missing-values check, not as an outlier.

use super::{CheckKind, CheckResult, QualityCheck, flagged_rows};
use crate::dataset::{Dataset, PRICE, QUANTITY, TOTAL_AMOUNT};
use crate::error::Result;
use polars::prelude::*;
use tracing::debug;

/// Lowest acceptable price.
pub const PRICE_MIN: f64 = 0.0;
/// Highest acceptable price.
pub const PRICE_MAX: f64 = 10_000.0;
/// Quantities must be strictly above this.
pub const QUANTITY_MIN: f64 = 0.0;
/// Highest acceptable quantity.
pub const QUANTITY_MAX: f64 = 100.0;

fn flag_values(values: &Float64Chunked, predicate: impl Fn(f64) -> bool) -> Vec<usize> {
    flagged_rows(
        values
            .into_iter()
            .map(|value| value.is_some_and(&predicate)),
    )
}

/// `Price < 0` or `Price > 10000`.
#[derive(Debug, Clone, Copy, Default)]
pub struct PriceOutlierCheck;

impl QualityCheck for PriceOutlierCheck {
    fn kind(&self) -> CheckKind {
        CheckKind::PriceOutliers
    }

    fn run(&self, dataset: &Dataset) -> Result<CheckResult> {
        let price = dataset.numeric_column(PRICE)?;
        let rows = flag_values(&price, |p| p < PRICE_MIN || p > PRICE_MAX);
        debug!("{} price outliers", rows.len());
        Ok(CheckResult::rows(self.kind(), rows))
    }
}

/// `Quantity <= 0` or `Quantity > 100`.
#[derive(Debug, Clone, Copy, Default)]
pub struct QuantityOutlierCheck;

impl QualityCheck for QuantityOutlierCheck {
    fn kind(&self) -> CheckKind {
        CheckKind::QuantityOutliers
    }

    fn run(&self, dataset: &Dataset) -> Result<CheckResult> {
        let quantity = dataset.numeric_column(QUANTITY)?;
        let rows = flag_values(&quantity, |q| q <= QUANTITY_MIN || q > QUANTITY_MAX);
        debug!("{} quantity outliers", rows.len());
        Ok(CheckResult::rows(self.kind(), rows))
    }
}

/// `TotalAmount` disagrees with `Price * Quantity`.
///
/// With the default tolerance of zero the comparison is exact, so a total
/// stored as `19.999999` against a computed `20.0` is flagged. A positive
/// tolerance flags only deviations strictly larger than it.
#[derive(Debug, Clone, Copy, Default)]
pub struct TotalAmountCheck {
    tolerance: f64,
}

impl TotalAmountCheck {
    pub fn new(tolerance: f64) -> Self {
        Self { tolerance }
    }

    pub fn tolerance(&self) -> f64 {
        self.tolerance
    }

    fn differs(&self, stored: f64, calculated: f64) -> bool {
        if self.tolerance == 0.0 {
            stored != calculated
        } else {
            (stored - calculated).abs() > self.tolerance
        }
    }
}

impl QualityCheck for TotalAmountCheck {
    fn kind(&self) -> CheckKind {
        CheckKind::TotalAmountOutliers
    }

    fn run(&self, dataset: &Dataset) -> Result<CheckResult> {
        let stored = dataset.numeric_column(TOTAL_AMOUNT)?;
        let calculated = dataset.calculated_total_amount()?;
        let calculated = calculated.f64()?;

        let rows = flagged_rows(stored.into_iter().zip(calculated.into_iter()).map(
            |pair| match pair {
                (Some(stored), Some(calculated)) => self.differs(stored, calculated),
                _ => false,
            },
        ));
        debug!(
            "{} total amount outliers (tolerance {})",
            rows.len(),
            self.tolerance
        );
        Ok(CheckResult::rows(self.kind(), rows))
    }
}
