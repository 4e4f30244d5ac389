//! Base tool definitions.
//!
//! Provides `EnvVar` and the `BaseTool` trait every agent-facing tool
//! implements.

use std::fmt;

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use serde_json::Value;

use super::tool_input::ToolInput;
use crate::utilities::errors::FetchResult;

// ---------------------------------------------------------------------------
// EnvVar
// ---------------------------------------------------------------------------

/// Environment variable definition used by a tool.
///
/// Describes an environment variable that a tool requires or optionally uses,
/// along with its description and default value.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct EnvVar {
    /// Name of the environment variable.
    pub name: String,
    /// Human-readable description of the environment variable.
    pub description: String,
    /// Whether the environment variable is required.
    #[serde(default = "default_true")]
    pub required: bool,
    /// Default value if the environment variable is not set.
    #[serde(default)]
    pub default: Option<String>,
}

fn default_true() -> bool {
    true
}

impl EnvVar {
    /// A variable the tool reads if set and works without.
    pub fn optional(name: impl Into<String>, description: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            description: description.into(),
            required: false,
            default: None,
        }
    }
}

// ---------------------------------------------------------------------------
// BaseTool trait
// ---------------------------------------------------------------------------

/// Contract for a tool the agent can select by name and invoke.
///
/// Implementors must be stateless between calls: `invoke` takes `&self`, and
/// concurrent invocations of the same tool must not interfere.
#[async_trait]
pub trait BaseTool: Send + Sync + fmt::Debug {
    /// The unique name of the tool that clearly communicates its purpose.
    fn name(&self) -> &str;

    /// Description used to tell the model how/when/why to use the tool.
    fn description(&self) -> &str;

    /// JSON schema for the arguments that the tool accepts.
    fn args_schema(&self) -> Value {
        serde_json::json!({ "type": "object", "properties": {} })
    }

    /// List of environment variables used by the tool.
    fn env_vars(&self) -> Vec<EnvVar> {
        Vec::new()
    }

    /// Run the tool on raw agent input.
    ///
    /// Never panics on bad input; every failure comes back as a `ToolError`.
    async fn invoke(&self, input: ToolInput) -> FetchResult;
}
