//! Tool calling data structures.
//!
//! Provides the `ToolCalling` struct an agent sends to run a tool by name.

use serde::{Deserialize, Serialize};
use serde_json::Value;

use super::tool_input::ToolInput;

/// Represents a tool call with its name and arguments.
///
/// `arguments` may be a JSON object or a string holding serialized JSON;
/// both are accepted and normalized the same way.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ToolCalling {
    /// The name of the tool to be called.
    pub tool_name: String,
    /// Raw arguments. `None` for argument-less tools.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub arguments: Option<Value>,
}

impl ToolCalling {
    /// Create a new `ToolCalling` instance.
    pub fn new(tool_name: impl Into<String>, arguments: Option<Value>) -> Self {
        Self {
            tool_name: tool_name.into(),
            arguments,
        }
    }

    /// The arguments as tool input.
    pub fn input(&self) -> ToolInput {
        ToolInput::from(self.arguments.clone())
    }
}
