//! E-commerce order data-quality validator.
//!
//! Loads an order dataset from CSV, runs six fixed checks over it and writes a
//! static HTML report listing, for each check, how many rows it flagged and
//! their spreadsheet row numbers.
//!
//! # Overview
//!
//! - **Missing Values**: rows with any empty field
//! - **Duplicate Rows**: rows sharing an `OrderID`, grouped per ID
//! - **Price Outliers**: `Price < 0` or `Price > 10000`
//! - **Quantity Outliers**: `Quantity <= 0` or `Quantity > 100`
//! - **Total Amount Outliers**: `TotalAmount != Price * Quantity`
//! - **Invalid Dates**: `OrderDate` values no lenient parser accepts
//!
//! Row numbers are spreadsheet rows: the first data record is row 2.
//!
//! # Quick Start
//!
//! ```rust,ignore
//! use order_quality::{Pipeline, ValidationConfig};
//!
//! let config = ValidationConfig::builder()
//!     .input_path("ecommerce-dataset.csv")
//!     .build()?;
//!
//! let output = Pipeline::builder().config(config).build()?.run()?;
//! println!("Data quality report saved to: {}", output.report_path.display());
//! ```
//!
//! To validate without writing a report, load a [`Dataset`] and call
//! [`Validator::validate`] directly:
//!
//! ```rust,ignore
//! use order_quality::{Dataset, Validator};
//!
//! let dataset = Dataset::load("orders.csv", b',')?;
//! let report = Validator::default().validate(&dataset)?;
//! println!("{}% of rows have issues", report.summary.percentage_display());
//! ```

pub mod checks;
pub mod config;
pub mod dataset;
pub mod error;
pub mod pipeline;
pub mod reporting;
pub mod summary;

// Re-exports for convenient access
pub use checks::{CheckKind, CheckResult, DuplicateGroup, Findings, QualityCheck};
pub use config::{
    ConfigValidationError, DEFAULT_STYLESHEET_HREF, IssueSumPolicy, StylesheetMode,
    ValidationConfig, ValidationConfigBuilder,
};
pub use dataset::{Dataset, HEADER_OFFSET, REQUIRED_COLUMNS};
pub use error::{QualityError, Result as QualityResult, ResultExt};
pub use pipeline::{Pipeline, PipelineBuilder, PipelineOutput, Validator};
pub use reporting::{QualityReport, ReportGenerator};
pub use summary::IssueSummary;
