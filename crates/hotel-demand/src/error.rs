//! Error types for the booking pipeline.
//!
//! Two kinds of failure are fatal to a pipeline run: the source cannot be
//! loaded ([`PipelineError::DataLoad`]) or its columns do not match the
//! booking schema ([`PipelineError::Schema`]). Rows outside the valid ranges
//! and empty views are normal operation and never surface here.
//!
//! Errors are serializable so presentation layers can show a code and a
//! message without matching on the enum.

use serde::Serialize;
use serde::ser::SerializeStruct;
use thiserror::Error;

/// The main error type for the booking pipeline.
#[derive(Error, Debug)]
pub enum PipelineError {
    /// The source file is missing, unreadable, or not parseable as CSV.
    #[error("Failed to load data from '{path}': {reason}")]
    DataLoad { path: String, reason: String },

    /// A required column is absent or holds values of an incompatible type.
    #[error("Schema error: {0}")]
    Schema(#[from] SchemaError),

    /// Invalid configuration provided.
    #[error("Invalid configuration: {0}")]
    InvalidConfig(String),

    /// Internal error (broken invariant between pipeline stages).
    #[error("Internal error: {0}")]
    Internal(String),

    /// IO error wrapper.
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

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
        source: Box<PipelineError>,
    },
}

/// Ways in which an ingested table can disagree with the booking schema.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum SchemaError {
    #[error("required column '{0}' is missing")]
    MissingColumn(String),

    #[error("column '{column}' has type {found}, expected {expected}")]
    IncompatibleType {
        column: String,
        expected: &'static str,
        found: String,
    },

    #[error("column '{column}' row {row}: '{value}' is not a valid {expected}")]
    InvalidValue {
        column: String,
        row: usize,
        value: String,
        expected: &'static str,
    },

    #[error("column '{column}' row {row}: missing value in key column")]
    MissingKeyValue { column: String, row: usize },

    #[error("row {row}: unrecognized month name '{name}'")]
    UnknownMonth { row: usize, name: String },
}

impl PipelineError {
    /// Add context to an error.
    pub fn with_context(self, context: impl Into<String>) -> Self {
        PipelineError::WithContext {
            context: context.into(),
            source: Box::new(self),
        }
    }

    /// Shorthand for a load failure on `path`.
    pub fn data_load(path: impl Into<String>, reason: impl ToString) -> Self {
        PipelineError::DataLoad {
            path: path.into(),
            reason: reason.to_string(),
        }
    }

    /// Get error code for frontend handling.
    pub fn error_code(&self) -> &'static str {
        match self {
            Self::DataLoad { .. } => "DATA_LOAD_ERROR",
            Self::Schema(_) => "SCHEMA_ERROR",
            Self::InvalidConfig(_) => "INVALID_CONFIG",
            Self::Internal(_) => "INTERNAL_ERROR",
            Self::Io(_) => "IO_ERROR",
            Self::Polars(_) => "POLARS_ERROR",
            Self::Json(_) => "JSON_ERROR",
            Self::WithContext { source, .. } => source.error_code(),
        }
    }

    /// Whether this error aborts a pipeline run before any cleaning happens.
    pub fn is_fatal_input_error(&self) -> bool {
        match self {
            Self::DataLoad { .. } | Self::Schema(_) => true,
            Self::WithContext { source, .. } => source.is_fatal_input_error(),
            _ => false,
        }
    }
}

/// Errors are serialized as a struct with `code` and `message` fields.
impl Serialize for PipelineError {
    fn serialize<S>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error>
    where
        S: serde::Serializer,
    {
        let mut state = serializer.serialize_struct("PipelineError", 2)?;
        state.serialize_field("code", &self.error_code())?;
        state.serialize_field("message", &self.to_string())?;
        state.end()
    }
}

/// Result type alias for pipeline operations.
pub type Result<T> = std::result::Result<T, PipelineError>;

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
        self.map_err(|e| PipelineError::Polars(e).with_context(context))
    }
}
