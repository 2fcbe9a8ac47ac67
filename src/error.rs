//! Error types for report loading and metric extraction.

use std::path::PathBuf;
use thiserror::Error;

/// Convenience alias used throughout the library.
pub type Result<T> = std::result::Result<T, ReportError>;

/// Errors raised while loading a report or extracting metrics from it.
///
/// Missing nested fields are never an error: extractors default them.
/// Only structural problems surface here.
#[derive(Debug, Error)]
pub enum ReportError {
    /// The top-level document is not a JSON object.
    #[error("Malformed report: expected a JSON object at the top level, found {0}")]
    Malformed(&'static str),

    /// A section an operation cannot work without is absent.
    #[error("Missing data: {0}")]
    MissingData(String),

    /// A field is present but holds the wrong kind of value.
    #[error("Unexpected type at `{path}`: expected {expected}, found {found}")]
    FieldType {
        path: String,
        expected: &'static str,
        found: &'static str,
    },

    #[error("Failed to read report {}: {source}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Invalid JSON in report: {0}")]
    Json(#[from] serde_json::Error),
}

/// Human-readable name of a JSON value's kind, for error messages.
pub(crate) fn kind_of(value: &serde_json::Value) -> &'static str {
    use serde_json::Value;

    match value {
        Value::Null => "null",
        Value::Bool(_) => "a boolean",
        Value::Number(_) => "a number",
        Value::String(_) => "a string",
        Value::Array(_) => "an array",
        Value::Object(_) => "an object",
    }
}
