//! Pipeline module.
//!
//! Wires the loader, the validator and the report generator into one run.

mod builder;
mod validator;

pub use builder::{Pipeline, PipelineBuilder, PipelineOutput};
pub use validator::Validator;
