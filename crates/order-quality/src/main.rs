//! CLI entry point for the order-quality validator.

use anyhow::{Context, Result};
use clap::{Parser, ValueEnum};
use dotenv::dotenv;
use order_quality::{
    DEFAULT_STYLESHEET_HREF, IssueSumPolicy, Pipeline, PipelineOutput, StylesheetMode,
    ValidationConfig, ValidationConfigBuilder,
};
use tracing::{info, warn};

/// CLI-compatible stylesheet mode
#[derive(Debug, Clone, Copy, ValueEnum)]
enum CliStylesheet {
    /// Embed the default CSS in the report
    Inline,
    /// Link an external stylesheet (see --stylesheet-href)
    External,
}

/// CLI-compatible issue sum policy
#[derive(Debug, Clone, Copy, ValueEnum)]
enum CliIssueSum {
    /// Every check contributes to the issue total
    AllChecks,
    /// Total Amount Outliers are listed but not counted
    ExcludeTotalAmount,
}

impl From<CliIssueSum> for IssueSumPolicy {
    fn from(cli: CliIssueSum) -> Self {
        match cli {
            CliIssueSum::AllChecks => IssueSumPolicy::AllChecks,
            CliIssueSum::ExcludeTotalAmount => IssueSumPolicy::ExcludeTotalAmount,
        }
    }
}

#[derive(Parser, Debug)]
#[command(
    version,
    about = "Data-quality validator for e-commerce order datasets",
    long_about = "Runs six data-quality checks over an order CSV and writes an HTML report.\n\n\
                  Flags override values from --config; unset flags keep the config value\n\
                  or the built-in default.\n\n\
                  EXAMPLES:\n  \
                  # Validate the default file into ./output\n  \
                  order-quality\n\n  \
                  # Semicolon-separated input, linked stylesheet\n  \
                  order-quality -i orders.csv --delimiter ';' --stylesheet external\n\n  \
                  # Machine-readable output\n  \
                  order-quality -i orders.csv --json | jq .report.summary"
)]
struct Args {
    /// Path to the CSV file to validate [default: ecommerce-dataset.csv]
    #[arg(short, long)]
    input: Option<String>,

    /// Directory the report is written into [default: output]
    #[arg(short, long)]
    output_dir: Option<String>,

    /// File name of the HTML report [default: data_quality_report.html]
    #[arg(long)]
    report_name: Option<String>,

    /// Field separator [default: ,]
    #[arg(long)]
    delimiter: Option<char>,

    /// Report styling [default: inline]
    #[arg(long, value_enum)]
    stylesheet: Option<CliStylesheet>,

    /// Href of the external stylesheet; implies --stylesheet external
    /// [default: ../CSS/style.css]
    #[arg(long)]
    stylesheet_href: Option<String>,

    /// Which checks count toward the issue total [default: all-checks]
    #[arg(long, value_enum)]
    issue_sum: Option<CliIssueSum>,

    /// Allowed deviation between TotalAmount and Price * Quantity [default: 0.0]
    ///
    /// Zero keeps exact equality.
    #[arg(long)]
    total_amount_tolerance: Option<f64>,

    /// JSON configuration file
    #[arg(short, long)]
    config: Option<String>,

    /// Output JSON to stdout instead of the report path
    ///
    /// Disables all logs; only the final JSON is written.
    #[arg(long)]
    json: bool,

    /// Also write the report as JSON next to the HTML file
    #[arg(long)]
    emit_json: bool,

    /// Log level (trace, debug, info, warn, error)
    #[arg(short, long, default_value = "info")]
    log_level: String,

    /// Only show warnings and errors
    #[arg(short, long)]
    quiet: bool,
}

/// Initialize the tracing subscriber for logging.
///
/// When `json_output` is true, logging is completely disabled to ensure
/// only JSON is written to stdout.
fn init_logging(level: &str, quiet: bool, json_output: bool) {
    if json_output {
        return;
    }

    use tracing_subscriber::EnvFilter;

    let effective_level = if quiet { "warn" } else { level };

    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(effective_level));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .init();
}

fn main() -> Result<()> {
    // Load .env first so RUST_LOG from there reaches the filter
    dotenv().ok();

    let args = Args::parse();
    init_logging(&args.log_level, args.quiet, args.json);

    let config = build_config(&args)?;
    let pipeline = Pipeline::builder().config(config).build()?;

    match pipeline.run() {
        Ok(output) => handle_output(&output, &args),
        Err(e) => {
            if args.json {
                println!("{}", serde_json::json!({ "error": e }));
            }
            if e.is_empty_dataset() {
                warn!("No report written: the dataset has no rows");
            }
            Err(e.into())
        }
    }
}

/// Start from the config file (or defaults) and apply CLI overrides.
fn build_config(args: &Args) -> Result<ValidationConfig> {
    let base = match &args.config {
        Some(path) => {
            info!("Loading configuration from: {}", path);
            ValidationConfig::from_json_file(path)
                .with_context(|| format!("Failed to load config '{}'", path))?
        }
        None => ValidationConfig::default(),
    };

    let stylesheet = stylesheet_override(
        args.stylesheet,
        args.stylesheet_href.as_deref(),
        &base.stylesheet,
    );
    let mut builder = ValidationConfigBuilder::from_config(base);

    if let Some(ref input) = args.input {
        builder = builder.input_path(input);
    }
    if let Some(ref dir) = args.output_dir {
        builder = builder.output_dir(dir);
    }
    if let Some(ref name) = args.report_name {
        builder = builder.report_file_name(name);
    }
    if let Some(delimiter) = args.delimiter {
        builder = builder.delimiter(delimiter);
    }
    if let Some(mode) = stylesheet {
        builder = builder.stylesheet(mode);
    }
    if let Some(policy) = args.issue_sum {
        builder = builder.issue_sum_policy(policy.into());
    }
    if let Some(tolerance) = args.total_amount_tolerance {
        builder = builder.total_amount_tolerance(tolerance);
    }
    if args.emit_json {
        builder = builder.emit_json(true);
    }

    Ok(builder.build()?)
}

/// The stylesheet mode the CLI flags ask for, or `None` to keep `current`.
///
/// `--stylesheet external` without an href keeps an external href that is
/// already configured.
fn stylesheet_override(
    mode: Option<CliStylesheet>,
    href: Option<&str>,
    current: &StylesheetMode,
) -> Option<StylesheetMode> {
    match (mode, href) {
        (Some(CliStylesheet::Inline), Some(_)) => {
            warn!("--stylesheet-href is ignored with --stylesheet inline");
            Some(StylesheetMode::Inline)
        }
        (Some(CliStylesheet::Inline), None) => Some(StylesheetMode::Inline),
        (Some(CliStylesheet::External), Some(href)) | (None, Some(href)) => {
            Some(StylesheetMode::External {
                href: href.to_string(),
            })
        }
        (Some(CliStylesheet::External), None) => match current {
            StylesheetMode::External { .. } => None,
            StylesheetMode::Inline => Some(StylesheetMode::External {
                href: DEFAULT_STYLESHEET_HREF.to_string(),
            }),
        },
        (None, None) => None,
    }
}

/// Print the result.
///
/// Uses `println!` on purpose: the report path (or JSON) is the program's
/// output and must show regardless of the log level.
fn handle_output(output: &PipelineOutput, args: &Args) -> Result<()> {
    if args.json {
        println!("{}", serde_json::to_string_pretty(output)?);
        return Ok(());
    }

    let summary = &output.report.summary;
    info!(
        "Total rows: {} | Rows with issues: {} | Percentage of errors: {}%",
        summary.total_rows,
        summary.rows_with_issues,
        summary.percentage_display()
    );
    for check in output.report.checks.iter().filter(|c| !c.is_clean()) {
        info!("  {}: {}", check.kind, check.count());
    }
    if let Some(ref json_path) = output.json_path {
        info!("JSON report written to: {}", json_path.display());
    }

    if summary.rows_with_issues > summary.total_rows {
        warn!(
            "Issue count exceeds row count ({}%): rows are counted once per check",
            summary.percentage_display()
        );
    }

    println!("Data quality report saved to: {}", output.report_path.display());
    Ok(())
}
