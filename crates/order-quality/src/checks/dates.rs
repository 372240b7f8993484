//! Order date validation with lenient parsing.
//!
//! A value is valid when any of the accepted layouts parses it into a real
//! calendar date. Unparseable and null dates are findings, never errors.

use super::{CheckKind, CheckResult, QualityCheck, flagged_rows};
use crate::dataset::{Dataset, ORDER_DATE};
use crate::error::Result;
use chrono::{DateTime, NaiveDate, NaiveDateTime};
use once_cell::sync::Lazy;
use regex::Regex;
use tracing::debug;

static ORDINAL_SUFFIX: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"(?i)\b(\d{1,2})(st|nd|rd|th)\b").expect("Invalid regex: ordinal suffix")
});
static WHITESPACE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"\s+").expect("Invalid regex: whitespace"));
static COMPACT_DATE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^(\d{4})(\d{2})(\d{2})$").expect("Invalid regex: YYYYMMDD"));

// Month-first before day-first for ambiguous numeric dates.
const DATE_FORMATS: [&str; 16] = [
    "%Y-%m-%d", "%Y/%m/%d", "%m/%d/%Y", "%m-%d-%Y", "%d/%m/%Y", "%d-%m-%Y", "%d.%m.%Y",
    "%B %d, %Y", "%B %d %Y", "%b %d, %Y", "%b %d %Y", "%d %B %Y", "%d %b %Y", "%d-%b-%Y",
    "%d %B, %Y", "%Y-%b-%d",
];

const TIME_FORMATS: [&str; 3] = ["%H:%M:%S%.f", "%H:%M:%S", "%H:%M"];

static DATETIME_FORMATS: Lazy<Vec<String>> = Lazy::new(|| {
    let mut formats = Vec::with_capacity(DATE_FORMATS.len() * TIME_FORMATS.len() * 2);
    for date in DATE_FORMATS {
        for time in TIME_FORMATS {
            formats.push(format!("{date} {time}"));
            formats.push(format!("{date}T{time}"));
        }
    }
    formats
});

/// Parse a date-like string the way a spreadsheet user would expect.
///
/// Returns `None` when no accepted layout yields a valid calendar date.
/// Date-only values resolve to midnight.
pub fn parse_lenient_date(raw: &str) -> Option<NaiveDateTime> {
    let trimmed = raw.trim();
    if trimmed.is_empty() {
        return None;
    }

    if let Ok(dt) = DateTime::parse_from_rfc3339(trimmed) {
        return Some(dt.naive_utc());
    }

    if let Some(caps) = COMPACT_DATE.captures(trimmed) {
        let year: i32 = caps[1].parse().ok()?;
        let month: u32 = caps[2].parse().ok()?;
        let day: u32 = caps[3].parse().ok()?;
        return NaiveDate::from_ymd_opt(year, month, day)?.and_hms_opt(0, 0, 0);
    }

    let normalized = ORDINAL_SUFFIX.replace_all(trimmed, "$1");
    let normalized = WHITESPACE.replace_all(&normalized, " ");
    let normalized = normalized.as_ref();

    for format in DATE_FORMATS {
        if let Ok(date) = NaiveDate::parse_from_str(normalized, format) {
            return date.and_hms_opt(0, 0, 0);
        }
    }

    DATETIME_FORMATS
        .iter()
        .find_map(|format| NaiveDateTime::parse_from_str(normalized, format).ok())
}

/// Flags records whose `OrderDate` is null or not a recognisable date.
#[derive(Debug, Clone, Copy, Default)]
pub struct InvalidDateCheck;

impl QualityCheck for InvalidDateCheck {
    fn kind(&self) -> CheckKind {
        CheckKind::InvalidDates
    }

    fn run(&self, dataset: &Dataset) -> Result<CheckResult> {
        let dates = dataset.string_column(ORDER_DATE)?;
        let rows = flagged_rows(
            dates
                .into_iter()
                .map(|value| value.and_then(parse_lenient_date).is_none()),
        );
        debug!("{} invalid order dates", rows.len());
        Ok(CheckResult::rows(self.kind(), rows))
    }
}
