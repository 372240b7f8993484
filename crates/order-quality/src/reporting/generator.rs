use crate::checks::{CheckKind, CheckResult};
use crate::config::{IssueSumPolicy, StylesheetMode, ValidationConfig};
use crate::error::{QualityError, Result};
use crate::summary::IssueSummary;
use askama::Template;
use chrono::Local;
use serde::Serialize;
use std::fs;
use std::path::{Path, PathBuf};
use tracing::{debug, info};

// ============================================================================
// Report Types
// ============================================================================

/// Everything a validation run found, in report order.
///
/// Serializes to the JSON written by `--emit-json` and printed by `--json`.
#[derive(Debug, Clone, Serialize)]
pub struct QualityReport {
    /// Timestamp when the report was generated
    pub generated_at: String,
    /// Path to the validated file
    pub source_file: String,
    /// Totals and issue percentage
    pub summary: IssueSummary,
    /// One result per check, in the fixed report order
    pub checks: Vec<CheckResult>,
}

impl QualityReport {
    pub fn new(source: &Path, summary: IssueSummary, checks: Vec<CheckResult>) -> Self {
        Self {
            generated_at: Local::now().format("%Y-%m-%d %H:%M:%S").to_string(),
            source_file: source.display().to_string(),
            summary,
            checks,
        }
    }

    /// Result of one check, if it ran.
    pub fn check(&self, kind: CheckKind) -> Option<&CheckResult> {
        self.checks.iter().find(|result| result.kind == kind)
    }
}

// ============================================================================
// HTML Rendering
// ============================================================================

const REPORT_TITLE: &str = "Data Quality Report";

/// Report markup; askama escapes every interpolated value.
#[derive(Template)]
#[template(path = "report.html")]
struct ReportTemplate<'a> {
    title: &'a str,
    summary: &'a IssueSummary,
    percentage: String,
    checks: &'a [CheckResult],
    /// `None` embeds the default CSS.
    stylesheet_href: Option<&'a str>,
    excludes_total_amount: bool,
    total_amount_name: &'a str,
    source_file: &'a str,
    generated_at: &'a str,
}

impl<'a> ReportTemplate<'a> {
    fn new(report: &'a QualityReport, stylesheet: &'a StylesheetMode) -> Self {
        let stylesheet_href = match stylesheet {
            StylesheetMode::Inline => None,
            StylesheetMode::External { href } => Some(href.as_str()),
        };
        Self {
            title: REPORT_TITLE,
            summary: &report.summary,
            percentage: report.summary.percentage_display(),
            checks: &report.checks,
            stylesheet_href,
            excludes_total_amount: report.summary.policy == IssueSumPolicy::ExcludeTotalAmount,
            total_amount_name: CheckKind::TotalAmountOutliers.display_name(),
            source_file: &report.source_file,
            generated_at: &report.generated_at,
        }
    }
}

/// Renders and writes data-quality reports.
pub struct ReportGenerator {
    output_dir: PathBuf,
    report_file_name: String,
    stylesheet: StylesheetMode,
}

impl Default for ReportGenerator {
    fn default() -> Self {
        Self::from_config(&ValidationConfig::default())
    }
}

impl ReportGenerator {
    pub fn new(
        output_dir: PathBuf,
        report_file_name: impl Into<String>,
        stylesheet: StylesheetMode,
    ) -> Self {
        Self {
            output_dir,
            report_file_name: report_file_name.into(),
            stylesheet,
        }
    }

    pub fn from_config(config: &ValidationConfig) -> Self {
        Self::new(
            config.output_dir.clone(),
            config.report_file_name.clone(),
            config.stylesheet.clone(),
        )
    }

    /// Where the HTML report is written.
    pub fn report_path(&self) -> PathBuf {
        self.output_dir.join(&self.report_file_name)
    }

    /// Where the JSON copy of the report is written: the HTML path with a
    /// `.json` extension.
    pub fn json_path(&self) -> PathBuf {
        self.report_path().with_extension("json")
    }

    /// Render the report as a standalone HTML document.
    ///
    /// Checks with no findings render an empty row-number cell.
    pub fn render_html(&self, report: &QualityReport) -> Result<String> {
        let html = ReportTemplate::new(report, &self.stylesheet).render()?;
        debug!("Rendered {} bytes of HTML", html.len());
        Ok(html)
    }

    /// Write a rendered report, creating the output directory if needed.
    pub fn write_html(&self, html: &str) -> Result<PathBuf> {
        let path = self.report_path();
        self.write_file(&path, html.as_bytes())?;
        info!("Report saved: {}", path.display());
        Ok(path)
    }

    /// Write the report as pretty-printed JSON next to the HTML report.
    pub fn write_json(&self, report: &QualityReport) -> Result<PathBuf> {
        let path = self.json_path();
        let json = serde_json::to_string_pretty(report)?;
        self.write_file(&path, json.as_bytes())?;
        info!("JSON report saved: {}", path.display());
        Ok(path)
    }

    fn write_file(&self, path: &Path, contents: &[u8]) -> Result<()> {
        fs::create_dir_all(&self.output_dir).map_err(|source| QualityError::Write {
            path: self.output_dir.clone(),
            source,
        })?;
        fs::write(path, contents).map_err(|source| QualityError::Write {
            path: path.to_path_buf(),
            source,
        })?;
        debug!("Wrote {} bytes to {}", contents.len(), path.display());
        Ok(())
    }
}
