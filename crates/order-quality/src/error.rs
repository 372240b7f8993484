//! Error types for the order-quality validator.
//!
//! Every failure that aborts a run maps to one [`QualityError`] variant and
//! carries enough context (file path, column name) to diagnose it. Per-field
//! parse failures are not errors: they are findings reported by the checks.
//!
//! Errors are serializable as `{code, message}` so the `--json` output mode can
//! report them in the same shape as a successful run.

use serde::Serialize;
use serde::ser::SerializeStruct;
use std::path::PathBuf;
use thiserror::Error;

/// The main error type for the validator.
#[derive(Error, Debug)]
pub enum QualityError {
    /// Input file is missing, unreadable or malformed.
    #[error("Failed to load dataset '{}': {reason}", path.display())]
    Load { path: PathBuf, reason: String },

    /// A column the checks depend on is absent.
    #[error("Required column '{column}' not found in '{}'", path.display())]
    Schema { column: String, path: PathBuf },

    /// A numeric column holds values that cannot be read as numbers.
    #[error("Column '{column}' could not be read as numeric: {reason}")]
    TypeCoercion { column: String, reason: String },

    /// The dataset has a header but no data rows.
    #[error("Dataset '{}' has no data rows", path.display())]
    EmptyDataset { path: PathBuf },

    /// The report could not be written.
    #[error("Failed to write report '{}': {source}", path.display())]
    Write {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// The HTML template failed to render.
    #[error("Failed to render report: {0}")]
    Render(#[from] askama::Error),

    /// Invalid configuration provided.
    #[error("Invalid configuration: {0}")]
    InvalidConfig(String),

    /// Polars error wrapper.
    #[error("Polars error: {0}")]
    Polars(#[from] polars::error::PolarsError),

    /// JSON serialization/deserialization error.
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// Generic error with context.
    #[error("{context}: {source}")]
    WithContext {
        context: String,
        #[source]
        source: Box<QualityError>,
    },
}

impl QualityError {
    /// Add context to an error.
    pub fn with_context(self, context: impl Into<String>) -> Self {
        QualityError::WithContext {
            context: context.into(),
            source: Box::new(self),
        }
    }

    /// Stable machine-readable code for this error.
    pub fn error_code(&self) -> &'static str {
        match self {
            Self::Load { .. } => "LOAD_ERROR",
            Self::Schema { .. } => "SCHEMA_ERROR",
            Self::TypeCoercion { .. } => "TYPE_COERCION_ERROR",
            Self::EmptyDataset { .. } => "EMPTY_DATASET",
            Self::Write { .. } => "WRITE_ERROR",
            Self::Render(_) => "RENDER_ERROR",
            Self::InvalidConfig(_) => "INVALID_CONFIG",
            Self::Polars(_) => "POLARS_ERROR",
            Self::Json(_) => "JSON_ERROR",
            Self::WithContext { source, .. } => source.error_code(),
        }
    }

    /// Check whether this error means the dataset had no rows to validate.
    pub fn is_empty_dataset(&self) -> bool {
        match self {
            Self::EmptyDataset { .. } => true,
            Self::WithContext { source, .. } => source.is_empty_dataset(),
            _ => false,
        }
    }
}

impl Serialize for QualityError {
    fn serialize<S>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error>
    where
        S: serde::Serializer,
    {
        let mut state = serializer.serialize_struct("QualityError", 2)?;
        state.serialize_field("code", &self.error_code())?;
        state.serialize_field("message", &self.to_string())?;
        state.end()
    }
}

/// Result type alias for validator operations.
pub type Result<T> = std::result::Result<T, QualityError>;

/// Extension trait for adding context to Results.
pub trait ResultExt<T> {
    /// Add context to an error result.
    fn context(self, context: impl Into<String>) -> Result<T>;
}

impl<T> ResultExt<T> for Result<T> {
    fn context(self, context: impl Into<String>) -> Result<T> {
        self.map_err(|e| e.with_context(context))
    }
}

impl<T> ResultExt<T> for std::result::Result<T, polars::error::PolarsError> {
    fn context(self, context: impl Into<String>) -> Result<T> {
        self.map_err(|e| QualityError::Polars(e).with_context(context))
    }
}
