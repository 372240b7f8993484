//! Integration tests for the order-quality validator.
//!
//! These tests run the full pipeline and the CLI against the CSV fixtures in
//! `tests/fixtures`.

use order_quality::{
    CheckKind, Dataset, IssueSumPolicy, Pipeline, PipelineOutput, QualityError, QualityReport,
    QualityResult, StylesheetMode, ValidationConfig, ValidationConfigBuilder, Validator,
};
use pretty_assertions::assert_eq;
use std::fs;
use std::path::{Path, PathBuf};
use std::process::Command;

// ============================================================================
// Helper Functions
// ============================================================================

fn fixtures_path() -> PathBuf {
    PathBuf::from(env!("CARGO_MANIFEST_DIR")).join("tests/fixtures")
}

fn config_for(fixture: &str, output_dir: &Path) -> ValidationConfig {
    ValidationConfig::builder()
        .input_path(fixtures_path().join(fixture))
        .output_dir(output_dir)
        .build()
        .unwrap()
}

fn run_fixture(fixture: &str, output_dir: &Path) -> QualityResult<PipelineOutput> {
    Pipeline::builder()
        .config(config_for(fixture, output_dir))
        .build()
        .unwrap()
        .run()
}

/// (display name, count, rendered findings) per check, in report order.
fn table(report: &QualityReport) -> Vec<(String, usize, String)> {
    report
        .checks
        .iter()
        .map(|r| (r.kind.to_string(), r.count(), r.findings.to_string()))
        .collect()
}

fn row(name: &str, count: usize, findings: &str) -> (String, usize, String) {
    (name.to_string(), count, findings.to_string())
}

// ============================================================================
// Full Pipeline Tests
// ============================================================================

#[test]
fn test_scenario_counts_and_percentage() {
    let dir = tempfile::tempdir().unwrap();
    let output = run_fixture("orders_scenario.csv", dir.path()).unwrap();
    let report = &output.report;

    assert_eq!(
        table(report),
        vec![
            row("Missing Values", 1, "3"),
            row("Duplicate Rows", 1, "{3, 5}"),
            row("Price Outliers", 0, ""),
            row("Quantity Outliers", 1, "4"),
            row("Total Amount Outliers", 0, ""),
            row("Invalid Dates", 0, ""),
        ]
    );
    assert_eq!(report.summary.total_rows, 5);
    assert_eq!(report.summary.rows_with_issues, 4);
    assert_eq!(report.summary.percentage_display(), "80.00");
}

#[test]
fn test_scenario_report_file() {
    let dir = tempfile::tempdir().unwrap();
    let output = run_fixture("orders_scenario.csv", dir.path()).unwrap();

    assert_eq!(output.report_path, dir.path().join("data_quality_report.html"));
    let html = fs::read_to_string(&output.report_path).unwrap();
    assert!(html.contains("<h1>Data Quality Report</h1>"));
    assert!(html.contains("<h2>Breakdown of Issues</h2>"));
    assert!(html.contains("<tr><th>Issue</th><th>Count</th><th>Row Numbers</th></tr>"));
    assert!(html.contains(
        "<tr><td>Duplicate Rows</td><td class=\"issue-count\">1</td><td class=\"row-num\">{3, 5}</td></tr>"
    ));
    assert!(html.contains(
        "<tr><td>Price Outliers</td><td class=\"issue-count\">0</td><td class=\"row-num\"></td></tr>"
    ));
    assert!(html.contains("80.00%"));
    assert!(html.contains("<style>"));
    assert!(html.contains("orders_scenario.csv"));
}

#[test]
fn test_mixed_dataset_hits_every_check() {
    let dir = tempfile::tempdir().unwrap();
    let report = run_fixture("orders_mixed.csv", dir.path()).unwrap().report;

    assert_eq!(
        table(&report),
        vec![
            row("Missing Values", 1, "8"),
            row("Duplicate Rows", 2, "{2, 6}, {4, 9}"),
            row("Price Outliers", 2, "3, 4"),
            row("Quantity Outliers", 2, "5, 10"),
            row("Total Amount Outliers", 1, "7"),
            row("Invalid Dates", 3, "6, 8, 10"),
        ]
    );

    // 1 + 4 + 2 + 2 + 1 + 3, counted per check, so it may exceed the row count
    assert_eq!(report.summary.total_rows, 9);
    assert_eq!(report.summary.rows_with_issues, 13);
    assert_eq!(report.summary.percentage_display(), "144.44");
}

#[test]
fn test_row_numbers_match_counts() {
    let dir = tempfile::tempdir().unwrap();
    let report = run_fixture("orders_mixed.csv", dir.path()).unwrap().report;

    for result in &report.checks {
        if result.kind == CheckKind::DuplicateRows {
            continue;
        }
        let rendered = result.findings.to_string();
        let listed = rendered.split(", ").filter(|s| !s.is_empty()).count();
        assert_eq!(listed, result.count(), "{}", result.kind);
    }
}

#[test]
fn test_clean_dataset() {
    let dir = tempfile::tempdir().unwrap();
    let report = run_fixture("orders_clean.csv", dir.path()).unwrap().report;

    assert!(report.checks.iter().all(|r| r.is_clean()));
    assert_eq!(report.summary.rows_with_issues, 0);
    assert_eq!(report.summary.percentage_display(), "0.00");
}

#[test]
fn test_semicolon_delimiter_and_null_markers() {
    let dir = tempfile::tempdir().unwrap();
    let config = ValidationConfig::builder()
        .input_path(fixtures_path().join("orders_semicolon.csv"))
        .output_dir(dir.path())
        .delimiter(';')
        .build()
        .unwrap();
    let report = Pipeline::builder()
        .config(config)
        .build()
        .unwrap()
        .run()
        .unwrap()
        .report;

    assert_eq!(report.summary.total_rows, 2);
    assert_eq!(report.check(CheckKind::MissingValues).unwrap().findings.to_string(), "3");
    // a null price is never an outlier
    assert!(report.check(CheckKind::TotalAmountOutliers).unwrap().is_clean());
    assert_eq!(report.summary.percentage_display(), "50.00");
}

#[test]
fn test_lowercase_null_counts_as_missing() {
    let dataset = Dataset::load(fixtures_path().join("orders_null_marker.csv"), b',').unwrap();
    let report = Validator::default().validate(&dataset).unwrap();

    assert_eq!(
        table(&report),
        vec![
            row("Missing Values", 1, "3"),
            row("Duplicate Rows", 0, ""),
            row("Price Outliers", 0, ""),
            row("Quantity Outliers", 0, ""),
            row("Total Amount Outliers", 0, ""),
            row("Invalid Dates", 0, ""),
        ]
    );
}

// ============================================================================
// Total Amount Tolerance and Issue Sum Policy
// ============================================================================

#[test]
fn test_total_amount_exact_by_default() {
    let dataset = Dataset::load(fixtures_path().join("orders_rounding.csv"), b',').unwrap();
    let report = Validator::default().validate(&dataset).unwrap();

    let total = report.check(CheckKind::TotalAmountOutliers).unwrap();
    assert_eq!(total.findings.to_string(), "2");
}

#[test]
fn test_total_amount_with_tolerance() {
    let dataset = Dataset::load(fixtures_path().join("orders_rounding.csv"), b',').unwrap();
    let config = ValidationConfig::builder()
        .total_amount_tolerance(0.001)
        .build()
        .unwrap();
    let report = Validator::new(&config).validate(&dataset).unwrap();

    assert!(report.check(CheckKind::TotalAmountOutliers).unwrap().is_clean());
    assert_eq!(report.summary.rows_with_issues, 0);
}

#[test]
fn test_exclude_total_amount_policy_keeps_table_row() {
    let dir = tempfile::tempdir().unwrap();
    let config = ValidationConfig::builder()
        .input_path(fixtures_path().join("orders_mixed.csv"))
        .output_dir(dir.path())
        .issue_sum_policy(IssueSumPolicy::ExcludeTotalAmount)
        .stylesheet(StylesheetMode::external_default())
        .build()
        .unwrap();
    let output = Pipeline::builder().config(config).build().unwrap().run().unwrap();

    assert_eq!(output.report.summary.rows_with_issues, 12);
    assert_eq!(output.report.summary.percentage_display(), "133.33");
    assert_eq!(
        output
            .report
            .check(CheckKind::TotalAmountOutliers)
            .unwrap()
            .count(),
        1
    );

    let html = fs::read_to_string(&output.report_path).unwrap();
    assert!(html.contains("<link rel=\"stylesheet\" type=\"text/css\" href=\"../CSS/style.css\">"));
    assert!(!html.contains("<style>"));
    assert!(html.contains("<td>Total Amount Outliers</td><td class=\"issue-count\">1</td>"));
}

#[test]
fn test_config_file_round_trip_through_pipeline() {
    let dir = tempfile::tempdir().unwrap();
    let base = ValidationConfig::from_json_file(fixtures_path().join("config_external.json")).unwrap();
    assert_eq!(base.issue_sum_policy, IssueSumPolicy::ExcludeTotalAmount);
    assert_eq!(base.stylesheet, StylesheetMode::external_default());
    // fields absent from the file keep their defaults
    assert_eq!(base.report_file_name, "data_quality_report.html");

    let config = ValidationConfigBuilder::from_config(base)
        .input_path(fixtures_path().join("orders_rounding.csv"))
        .output_dir(dir.path())
        .build()
        .unwrap();
    let report = Pipeline::builder()
        .config(config)
        .build()
        .unwrap()
        .run()
        .unwrap()
        .report;
    assert_eq!(report.summary.rows_with_issues, 0);
}

// ============================================================================
// Failure Modes
// ============================================================================

#[test]
fn test_empty_dataset_writes_no_report() {
    let dir = tempfile::tempdir().unwrap();
    let output_dir = dir.path().join("output");
    let err = run_fixture("empty.csv", &output_dir).unwrap_err();

    assert!(err.is_empty_dataset());
    assert_eq!(err.error_code(), "EMPTY_DATASET");
    assert!(!output_dir.exists());
}

#[test]
fn test_missing_column_is_schema_error() {
    let dir = tempfile::tempdir().unwrap();
    let err = run_fixture("missing_column.csv", dir.path()).unwrap_err();

    match err {
        QualityError::Schema { column, path } => {
            assert_eq!(column, "OrderDate");
            assert!(path.ends_with("missing_column.csv"));
        }
        other => panic!("expected schema error, got {other:?}"),
    }
}

#[test]
fn test_non_numeric_price_is_type_error() {
    let dir = tempfile::tempdir().unwrap();
    let err = run_fixture("non_numeric_price.csv", dir.path()).unwrap_err();

    assert_eq!(err.error_code(), "TYPE_COERCION_ERROR");
    assert!(err.to_string().contains("Price"));
}

#[test]
fn test_malformed_file_is_load_error() {
    let dir = tempfile::tempdir().unwrap();
    let err = run_fixture("malformed.csv", dir.path()).unwrap_err();
    assert_eq!(err.error_code(), "LOAD_ERROR");
}

#[test]
fn test_missing_input_is_load_error() {
    let dir = tempfile::tempdir().unwrap();
    let err = run_fixture("does_not_exist.csv", dir.path()).unwrap_err();

    assert_eq!(err.error_code(), "LOAD_ERROR");
    assert!(err.to_string().contains("does_not_exist.csv"));
}

// ============================================================================
// CLI Tests
// ============================================================================

fn cli() -> Command {
    let mut cmd = Command::new(env!("CARGO_BIN_EXE_order-quality"));
    cmd.env_remove("RUST_LOG");
    cmd
}

#[test]
fn test_cli_prints_report_path() {
    let dir = tempfile::tempdir().unwrap();
    let out = cli()
        .arg("-i")
        .arg(fixtures_path().join("orders_scenario.csv"))
        .arg("-o")
        .arg(dir.path())
        .arg("--quiet")
        .output()
        .unwrap();

    assert!(out.status.success());
    let stdout = String::from_utf8(out.stdout).unwrap();
    let expected = dir.path().join("data_quality_report.html");
    assert_eq!(
        stdout.trim(),
        format!("Data quality report saved to: {}", expected.display())
    );
    assert!(expected.is_file());
}

#[test]
fn test_cli_json_output() {
    let dir = tempfile::tempdir().unwrap();
    let out = cli()
        .arg("-i")
        .arg(fixtures_path().join("orders_scenario.csv"))
        .arg("-o")
        .arg(dir.path())
        .args(["--json", "--emit-json", "--stylesheet", "external"])
        .output()
        .unwrap();

    assert!(out.status.success());
    let value: serde_json::Value = serde_json::from_slice(&out.stdout).unwrap();
    assert_eq!(value["report"]["summary"]["rows_with_issues"], 4);
    assert_eq!(value["report"]["checks"][1]["id"], "duplicate_rows");
    assert_eq!(value["report"]["checks"][1]["affected_rows"], 2);
    assert!(dir.path().join("data_quality_report.json").is_file());

    let html = fs::read_to_string(dir.path().join("data_quality_report.html")).unwrap();
    assert!(html.contains("../CSS/style.css"));
}

#[test]
fn test_cli_external_flag_keeps_config_href() {
    let dir = tempfile::tempdir().unwrap();
    let out = cli()
        .arg("-c")
        .arg(fixtures_path().join("config_custom_href.json"))
        .arg("-i")
        .arg(fixtures_path().join("orders_scenario.csv"))
        .arg("-o")
        .arg(dir.path())
        .args(["--stylesheet", "external", "--quiet"])
        .output()
        .unwrap();

    assert!(out.status.success());
    let html = fs::read_to_string(dir.path().join("data_quality_report.html")).unwrap();
    assert!(html.contains("href=\"custom/report.css\""));
    assert!(!html.contains("../CSS/style.css"));
}

#[test]
fn test_cli_fails_on_empty_dataset() {
    let dir = tempfile::tempdir().unwrap();
    let output_dir = dir.path().join("output");
    let out = cli()
        .arg("-i")
        .arg(fixtures_path().join("empty.csv"))
        .arg("-o")
        .arg(&output_dir)
        .arg("--json")
        .output()
        .unwrap();

    assert!(!out.status.success());
    let value: serde_json::Value = serde_json::from_slice(&out.stdout).unwrap();
    assert_eq!(value["error"]["code"], "EMPTY_DATASET");
    assert!(!output_dir.exists());
}

#[test]
fn test_cli_rejects_negative_tolerance() {
    let out = cli()
        .args(["--total-amount-tolerance=-1", "--quiet"])
        .output()
        .unwrap();
    assert!(!out.status.success());
}
