//! Error types produced while reading or mutating business documents.

use serde_json::Value;
use thiserror::Error;

/// Errors that can occur while reading or mutating a business document.
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum DocumentError {
    /// A parameter lookup by id found no match.
    #[error("missing parameter '{id}'")]
    MissingParameter {
        /// Identifier of the parameter that was looked up.
        id: String,
    },

    /// An item lookup by id found no match.
    #[error("missing item '{id}'")]
    MissingItem {
        /// Identifier of the item that was looked up.
        id: String,
    },

    /// A façade was constructed from a value that is not a JSON object.
    #[error("document must be a JSON object, got {found}")]
    InvalidDocument {
        /// JSON type name of the rejected value.
        found: &'static str,
    },

    /// A timestamp field did not hold a valid RFC 3339 string.
    #[error("invalid timestamp in '{field}'")]
    InvalidTimestamp {
        /// Document key holding the offending value.
        field: &'static str,
        /// Underlying parse failure, absent when the field was not a
        /// string at all.
        #[source]
        source: Option<time::error::Parse>,
    },

    /// A timestamp could not be rendered as RFC 3339.
    #[error("cannot format timestamp for '{field}'")]
    TimestampFormat {
        /// Document key that was being written.
        field: &'static str,
        /// Underlying formatting failure.
        #[source]
        source: time::error::Format,
    },
}

/// Convenience alias for results produced by this crate.
pub type DocumentResult<T> = Result<T, DocumentError>;

/// Stable JSON type name used in error messages.
pub(crate) const fn json_type_name(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "boolean",
        Value::Number(_) => "number",
        Value::String(_) => "string",
        Value::Array(_) => "array",
        Value::Object(_) => "object",
    }
}
