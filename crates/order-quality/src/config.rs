//! Configuration types for the validator.
//!
//! The check thresholds are fixed; configuration only covers where data comes
//! from, where reports go, how the report is styled, and the two behaviours
//! the report variants disagree on: whether Total Amount outliers count toward
//! the issue total, and how strict the Total Amount comparison is.

use crate::error::{QualityError, Result};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

/// Default stylesheet href used by the externally styled report.
pub const DEFAULT_STYLESHEET_HREF: &str = "../CSS/style.css";

/// Which checks contribute to the "rows with issues" total.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
pub enum IssueSumPolicy {
    /// Sum the affected rows of all six checks.
    #[default]
    AllChecks,
    /// Sum every check except Total Amount Outliers. The Total Amount row is
    /// still shown in the report table.
    ExcludeTotalAmount,
}

/// How the HTML report is styled.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, Default)]
pub enum StylesheetMode {
    /// Embed the default CSS in a `<style>` block.
    #[default]
    Inline,
    /// Reference a stylesheet by relative path.
    External { href: String },
}

impl StylesheetMode {
    /// External stylesheet at the default href.
    pub fn external_default() -> Self {
        Self::External {
            href: DEFAULT_STYLESHEET_HREF.to_string(),
        }
    }
}

/// Configuration for a validation run.
///
/// Use [`ValidationConfig::builder()`] for a fluent setup, or
/// [`ValidationConfig::from_json_file`] to read one from disk. Missing JSON
/// fields fall back to their defaults.
///
/// # Example
///
/// ```rust,ignore
/// use order_quality::config::{IssueSumPolicy, ValidationConfig};
///
/// let config = ValidationConfig::builder()
///     .input_path("data/orders.csv")
///     .issue_sum_policy(IssueSumPolicy::ExcludeTotalAmount)
///     .total_amount_tolerance(0.01)
///     .build()?;
/// ```
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ValidationConfig {
    /// Path of the delimited input file.
    /// Default: "ecommerce-dataset.csv"
    pub input_path: PathBuf,

    /// Field separator. Must be a single ASCII character.
    /// Default: ','
    pub delimiter: char,

    /// Directory the report is written into. Created if absent.
    /// Default: "output"
    pub output_dir: PathBuf,

    /// File name of the HTML report inside `output_dir`.
    /// Default: "data_quality_report.html"
    pub report_file_name: String,

    /// Report styling.
    /// Default: Inline
    pub stylesheet: StylesheetMode,

    /// Which checks count toward the issue total.
    /// Default: AllChecks
    pub issue_sum_policy: IssueSumPolicy,

    /// Allowed absolute deviation between `TotalAmount` and
    /// `Price * Quantity`. Zero means exact equality.
    /// Default: 0.0
    pub total_amount_tolerance: f64,

    /// Also write the report as JSON next to the HTML file.
    /// Default: false
    pub emit_json: bool,
}

impl Default for ValidationConfig {
    fn default() -> Self {
        Self {
            input_path: PathBuf::from("ecommerce-dataset.csv"),
            delimiter: ',',
            output_dir: PathBuf::from("output"),
            report_file_name: "data_quality_report.html".to_string(),
            stylesheet: StylesheetMode::default(),
            issue_sum_policy: IssueSumPolicy::default(),
            total_amount_tolerance: 0.0,
            emit_json: false,
        }
    }
}

impl ValidationConfig {
    /// Create a new configuration builder.
    pub fn builder() -> ValidationConfigBuilder {
        ValidationConfigBuilder::default()
    }

    /// Read a configuration from a JSON file and validate it.
    pub fn from_json_file(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let content = std::fs::read_to_string(path).map_err(|e| {
            QualityError::InvalidConfig(format!(
                "cannot read config file '{}': {}",
                path.display(),
                e
            ))
        })?;
        let config: ValidationConfig = serde_json::from_str(&content)?;
        config.validate()?;
        Ok(config)
    }

    /// Full path of the HTML report.
    pub fn report_path(&self) -> PathBuf {
        self.output_dir.join(&self.report_file_name)
    }

    /// The delimiter as the byte the CSV reader expects.
    pub fn delimiter_byte(&self) -> u8 {
        // validate() guarantees ASCII
        self.delimiter as u8
    }

    /// Validate the configuration and return errors if invalid.
    pub fn validate(&self) -> std::result::Result<(), ConfigValidationError> {
        if !self.delimiter.is_ascii() || matches!(self.delimiter, '"' | '\n' | '\r') {
            return Err(ConfigValidationError::InvalidDelimiter(self.delimiter));
        }

        if !self.total_amount_tolerance.is_finite() || self.total_amount_tolerance < 0.0 {
            return Err(ConfigValidationError::InvalidTolerance(
                self.total_amount_tolerance,
            ));
        }

        let name = self.report_file_name.trim();
        if name.is_empty() || name.contains(['/', '\\']) {
            return Err(ConfigValidationError::InvalidReportName(
                self.report_file_name.clone(),
            ));
        }

        if let StylesheetMode::External { href } = &self.stylesheet
            && href.trim().is_empty()
        {
            return Err(ConfigValidationError::EmptyStylesheetHref);
        }

        Ok(())
    }
}

/// Errors that can occur during configuration validation.
#[derive(Debug, thiserror::Error)]
pub enum ConfigValidationError {
    #[error("Invalid delimiter {0:?} (must be a single ASCII character other than a quote or newline)")]
    InvalidDelimiter(char),

    #[error("Invalid total amount tolerance: {0} (must be finite and >= 0)")]
    InvalidTolerance(f64),

    #[error("Invalid report file name '{0}' (must be a non-empty file name without path separators)")]
    InvalidReportName(String),

    #[error("External stylesheet href must not be empty")]
    EmptyStylesheetHref,
}

impl From<ConfigValidationError> for QualityError {
    fn from(err: ConfigValidationError) -> Self {
        QualityError::InvalidConfig(err.to_string())
    }
}

/// Builder for [`ValidationConfig`] with fluent API.
#[derive(Debug, Default)]
pub struct ValidationConfigBuilder {
    input_path: Option<PathBuf>,
    delimiter: Option<char>,
    output_dir: Option<PathBuf>,
    report_file_name: Option<String>,
    stylesheet: Option<StylesheetMode>,
    issue_sum_policy: Option<IssueSumPolicy>,
    total_amount_tolerance: Option<f64>,
    emit_json: Option<bool>,
}

impl ValidationConfigBuilder {
    /// Start from an existing configuration, e.g. one read from a file.
    pub fn from_config(config: ValidationConfig) -> Self {
        Self {
            input_path: Some(config.input_path),
            delimiter: Some(config.delimiter),
            output_dir: Some(config.output_dir),
            report_file_name: Some(config.report_file_name),
            stylesheet: Some(config.stylesheet),
            issue_sum_policy: Some(config.issue_sum_policy),
            total_amount_tolerance: Some(config.total_amount_tolerance),
            emit_json: Some(config.emit_json),
        }
    }

    /// Set the input file path.
    pub fn input_path(mut self, path: impl Into<PathBuf>) -> Self {
        self.input_path = Some(path.into());
        self
    }

    /// Set the field separator.
    pub fn delimiter(mut self, delimiter: char) -> Self {
        self.delimiter = Some(delimiter);
        self
    }

    /// Set the output directory for reports.
    pub fn output_dir(mut self, path: impl Into<PathBuf>) -> Self {
        self.output_dir = Some(path.into());
        self
    }

    /// Set the HTML report file name.
    pub fn report_file_name(mut self, name: impl Into<String>) -> Self {
        self.report_file_name = Some(name.into());
        self
    }

    /// Set the report styling mode.
    pub fn stylesheet(mut self, mode: StylesheetMode) -> Self {
        self.stylesheet = Some(mode);
        self
    }

    /// Set which checks count toward the issue total.
    pub fn issue_sum_policy(mut self, policy: IssueSumPolicy) -> Self {
        self.issue_sum_policy = Some(policy);
        self
    }

    /// Set the Total Amount comparison tolerance.
    ///
    /// # Arguments
    /// * `tolerance` - Absolute deviation allowed; 0.0 keeps exact equality
    pub fn total_amount_tolerance(mut self, tolerance: f64) -> Self {
        self.total_amount_tolerance = Some(tolerance);
        self
    }

    /// Enable or disable the JSON copy of the report.
    pub fn emit_json(mut self, emit: bool) -> Self {
        self.emit_json = Some(emit);
        self
    }

    /// Build the configuration.
    ///
    /// Returns a validated `ValidationConfig` or an error if validation fails.
    pub fn build(self) -> std::result::Result<ValidationConfig, ConfigValidationError> {
        let defaults = ValidationConfig::default();
        let config = ValidationConfig {
            input_path: self.input_path.unwrap_or(defaults.input_path),
            delimiter: self.delimiter.unwrap_or(defaults.delimiter),
            output_dir: self.output_dir.unwrap_or(defaults.output_dir),
            report_file_name: self.report_file_name.unwrap_or(defaults.report_file_name),
            stylesheet: self.stylesheet.unwrap_or(defaults.stylesheet),
            issue_sum_policy: self.issue_sum_policy.unwrap_or_default(),
            total_amount_tolerance: self
                .total_amount_tolerance
                .unwrap_or(defaults.total_amount_tolerance),
            emit_json: self.emit_json.unwrap_or(defaults.emit_json),
        };

        config.validate()?;
        Ok(config)
    }
}
