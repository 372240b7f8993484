//! Report rendering and persistence.
//!
//! A [`QualityReport`] is rendered to a static HTML document by
//! [`ReportGenerator::render_html`] from the askama template
//! `templates/report.html` and written under the configured output
//! directory. The same report serializes to JSON for `--json` and
//! `--emit-json`.
//!
//! # Example
//!
//! ```rust,ignore
//! use order_quality::reporting::ReportGenerator;
//!
//! let generator = ReportGenerator::from_config(&config);
//! let html = generator.render_html(&report)?;
//! let path = generator.write_html(&html)?;
//! println!("Data quality report saved to: {}", path.display());
//! ```

mod generator;

pub use generator::{QualityReport, ReportGenerator};
