//! The validation pipeline and its builder.

use crate::config::ValidationConfig;
use crate::dataset::Dataset;
use crate::error::Result;
use crate::pipeline::Validator;
use crate::reporting::{QualityReport, ReportGenerator};
use serde::Serialize;
use std::path::PathBuf;
use std::time::Instant;
use tracing::{error, info};

/// One validation run: load, validate, aggregate, render, persist.
///
/// Use [`Pipeline::builder()`] to create a pipeline with custom configuration.
///
/// # Example
///
/// ```rust,ignore
/// use order_quality::{Pipeline, ValidationConfig};
///
/// let config = ValidationConfig::builder()
///     .input_path("orders.csv")
///     .output_dir("output")
///     .build()?;
///
/// let output = Pipeline::builder().config(config).build()?.run()?;
/// println!("Data quality report saved to: {}", output.report_path.display());
/// ```
pub struct Pipeline {
    config: ValidationConfig,
    validator: Validator,
    generator: ReportGenerator,
}

static_assertions::assert_impl_all!(Pipeline: Send, Sync);

/// What a completed run produced.
#[derive(Debug, Clone, Serialize)]
pub struct PipelineOutput {
    pub report: QualityReport,
    pub report_path: PathBuf,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub json_path: Option<PathBuf>,
}

impl Pipeline {
    /// Create a new pipeline builder.
    pub fn builder() -> PipelineBuilder {
        PipelineBuilder::default()
    }

    pub fn config(&self) -> &ValidationConfig {
        &self.config
    }

    /// Load the configured input and validate it without writing anything.
    pub fn validate_file(&self) -> Result<QualityReport> {
        info!("Step 1: Loading '{}'...", self.config.input_path.display());
        let dataset = Dataset::load(&self.config.input_path, self.config.delimiter_byte())?;
        info!(
            "Loaded {} rows, {} columns",
            dataset.total_rows(),
            dataset.column_names().len()
        );

        info!("Step 2: Running checks...");
        self.validator.validate(&dataset)
    }

    /// Run the whole pipeline and write the report.
    ///
    /// Nothing is written when validation fails, so an empty or malformed
    /// input never leaves a partial report behind.
    pub fn run(&self) -> Result<PipelineOutput> {
        match self.run_internal() {
            Ok(output) => Ok(output),
            Err(e) => {
                error!("Validation failed: {}", e);
                Err(e)
            }
        }
    }

    fn run_internal(&self) -> Result<PipelineOutput> {
        let start_time = Instant::now();

        let report = self.validate_file()?;

        info!("Step 3: Rendering report...");
        let html = self.generator.render_html(&report)?;

        info!("Step 4: Writing report...");
        let report_path = self.generator.write_html(&html)?;
        let json_path = if self.config.emit_json {
            Some(self.generator.write_json(&report)?)
        } else {
            None
        };

        info!(
            "Validation complete in {:.2?}: {} issues across {} rows",
            start_time.elapsed(),
            report.summary.rows_with_issues,
            report.summary.total_rows
        );

        Ok(PipelineOutput {
            report,
            report_path,
            json_path,
        })
    }
}

/// Builder for creating a [`Pipeline`].
#[derive(Default)]
pub struct PipelineBuilder {
    config: Option<ValidationConfig>,
}

impl PipelineBuilder {
    /// Set the configuration. Defaults to [`ValidationConfig::default`].
    pub fn config(mut self, config: ValidationConfig) -> Self {
        self.config = Some(config);
        self
    }

    /// Build the pipeline, validating the configuration first.
    pub fn build(self) -> Result<Pipeline> {
        let config = self.config.unwrap_or_default();
        config.validate()?;

        Ok(Pipeline {
            validator: Validator::new(&config),
            generator: ReportGenerator::from_config(&config),
            config,
        })
    }
}
