//! Shared utilities: configuration and error types.

pub mod config;
pub mod errors;

pub use config::{ConfigError, Settings};
pub use errors::{ErrorKind, FetchResult, NormalizationError, ToolError};
