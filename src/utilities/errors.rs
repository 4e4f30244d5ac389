//! Error types for tool invocation.
//!
//! Every failure a tool can produce is returned as data. Nothing in here is
//! meant to cross the tool boundary as a panic.

use serde::{Deserialize, Serialize};
use serde_json::Value;
use thiserror::Error;

/// Result of a single tool invocation: the decoded remote payload or an error.
pub type FetchResult = Result<Value, ToolError>;

/// Errors raised while turning raw tool input into query parameters.
///
/// None of these are retried; they are reported straight back to the caller
/// and never reach the network.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum NormalizationError {
    /// Textual input could not be parsed as JSON.
    #[error("Invalid input format. Expected JSON: {0}")]
    MalformedPayload(String),

    /// Input parsed, but it is not a key-value object.
    #[error("Invalid input format. Expected a JSON object, got {0}")]
    WrongShape(&'static str),

    /// A required parameter is absent or blank.
    #[error("Missing required field '{0}'")]
    MissingField(String),

    /// A declared parameter holds a value that cannot be sent as a query value.
    #[error("Invalid value for field '{field}': expected {expected}")]
    InvalidField {
        field: String,
        expected: &'static str,
    },
}

/// Errors returned by a tool invocation.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ToolError {
    /// The raw input was rejected before any request was made.
    #[error(transparent)]
    Input(#[from] NormalizationError),

    /// No tool is registered under the requested name.
    #[error("Action '{name}' doesn't exist, these are the only available Actions: {available}")]
    UnknownCapability { name: String, available: String },

    /// Every attempt failed. Terminal for this call.
    #[error("Failed to fetch {resource} after multiple attempts.")]
    Exhausted {
        resource: String,
        attempts: u32,
        last_error: String,
    },
}

/// Machine-readable classification of a [`ToolError`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ErrorKind {
    MalformedPayload,
    WrongShape,
    MissingField,
    InvalidField,
    UnknownCapability,
    Exhausted,
}

impl ErrorKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            ErrorKind::MalformedPayload => "malformed_payload",
            ErrorKind::WrongShape => "wrong_shape",
            ErrorKind::MissingField => "missing_field",
            ErrorKind::InvalidField => "invalid_field",
            ErrorKind::UnknownCapability => "unknown_capability",
            ErrorKind::Exhausted => "exhausted",
        }
    }
}

impl ToolError {
    /// Classify this error.
    pub fn kind(&self) -> ErrorKind {
        match self {
            ToolError::Input(NormalizationError::MalformedPayload(_)) => ErrorKind::MalformedPayload,
            ToolError::Input(NormalizationError::WrongShape(_)) => ErrorKind::WrongShape,
            ToolError::Input(NormalizationError::MissingField(_)) => ErrorKind::MissingField,
            ToolError::Input(NormalizationError::InvalidField { .. }) => ErrorKind::InvalidField,
            ToolError::UnknownCapability { .. } => ErrorKind::UnknownCapability,
            ToolError::Exhausted { .. } => ErrorKind::Exhausted,
        }
    }

    /// Render the error the way an agent observes it: `{"error": ..., "kind": ...}`.
    pub fn to_value(&self) -> Value {
        let mut obj = serde_json::json!({
            "error": self.to_string(),
            "kind": self.kind().as_str(),
        });
        if let ToolError::Exhausted {
            attempts,
            last_error,
            ..
        } = self
        {
            obj["attempts"] = Value::from(*attempts);
            obj["last_error"] = Value::String(last_error.clone());
        }
        obj
    }
}
