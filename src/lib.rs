//! # SpaceAce tools
//!
//! Named, independently invocable data-fetch tools for an LLM agent: who is
//! in space, where the ISS is, and the weather family (current, forecast,
//! history, marine, timezone, astronomy).
//!
//! The agent picks a tool by name and passes raw arguments, either a JSON
//! string or a structured value. Each call is normalized against the tool's
//! declared parameters, fetched with a fixed retry budget, and answered with
//! the decoded payload or a structured error. The reasoning loop itself lives
//! outside this crate.
//!
//! ```no_run
//! # async fn demo() -> anyhow::Result<()> {
//! use spaceace::{Settings, ToolRegistry};
//!
//! let registry = ToolRegistry::with_defaults(Settings::from_env()?)?;
//! let weather = registry
//!     .invoke("fetch_weather", r#"{"latitude": "23.5", "longitude": "-45.3"}"#)
//!     .await?;
//! println!("{}", weather["current"]["temp_c"]);
//! # Ok(())
//! # }
//! ```

pub mod catalog;
pub mod http;
pub mod server;
pub mod tools;
pub mod utilities;

#[cfg(test)]
pub(crate) mod test_support;

pub use catalog::{Capability, CATALOG};
pub use http::{Fetcher, RetryPolicy};
pub use tools::{BaseTool, ToolCalling, ToolInput, ToolRegistry};
pub use utilities::{ErrorKind, FetchResult, NormalizationError, Settings, ToolError};

/// Crate version reported by the HTTP surface.
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
