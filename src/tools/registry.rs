//! Tool registry handed to the agent.
//!
//! Built once at startup from the catalog: one `CapabilityTool` per row,
//! looked up by exact name. Holds no mutable state, so it can be shared
//! behind an `Arc` and invoked concurrently.

use std::collections::HashMap;
use std::sync::Arc;

use serde::{Deserialize, Serialize};
use serde_json::Value;

use super::base_tool::BaseTool;
use super::capability_tool::CapabilityTool;
use super::tool_calling::ToolCalling;
use super::tool_input::ToolInput;
use crate::catalog::{Capability, CATALOG};
use crate::http::{Fetcher, ReqwestTransport, TransportError};
use crate::utilities::config::Settings;
use crate::utilities::errors::{FetchResult, ToolError};

/// What the agent sees of a tool before calling it.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ToolDescriptor {
    pub name: String,
    pub description: String,
    pub args_schema: Value,
}

/// Registry of available tools, in registration order.
#[derive(Debug, Default)]
pub struct ToolRegistry {
    tools: Vec<Arc<dyn BaseTool>>,
    index: HashMap<String, usize>,
}

impl ToolRegistry {
    /// Create a new empty registry.
    pub fn new() -> Self {
        Self::default()
    }

    /// One tool per catalog row, all sharing `settings` and `fetcher`.
    pub fn from_catalog(
        catalog: &'static [Capability],
        settings: Arc<Settings>,
        fetcher: Arc<Fetcher>,
    ) -> Self {
        let mut registry = Self::new();
        for capability in catalog {
            registry.register(Arc::new(CapabilityTool::new(
                capability,
                settings.clone(),
                fetcher.clone(),
            )));
        }
        log::debug!("Registered {} tools", registry.len());
        registry
    }

    /// The full catalog over a production reqwest transport.
    pub fn with_defaults(settings: Settings) -> Result<Self, TransportError> {
        let fetcher = Fetcher::new(Arc::new(ReqwestTransport::new()?), settings.retry);
        Ok(Self::from_catalog(CATALOG, Arc::new(settings), Arc::new(fetcher)))
    }

    /// Register a tool, replacing any tool with the same name in place.
    pub fn register(&mut self, tool: Arc<dyn BaseTool>) -> Option<Arc<dyn BaseTool>> {
        let name = tool.name().to_string();
        match self.index.get(&name) {
            Some(&idx) => Some(std::mem::replace(&mut self.tools[idx], tool)),
            None => {
                self.index.insert(name, self.tools.len());
                self.tools.push(tool);
                None
            }
        }
    }

    /// Get a tool by exact name.
    pub fn get(&self, name: &str) -> Option<&Arc<dyn BaseTool>> {
        self.index.get(name).map(|&idx| &self.tools[idx])
    }

    pub fn has(&self, name: &str) -> bool {
        self.index.contains_key(name)
    }

    pub fn len(&self) -> usize {
        self.tools.len()
    }

    pub fn is_empty(&self) -> bool {
        self.tools.is_empty()
    }

    /// Tool names, in registration order.
    pub fn names(&self) -> Vec<&str> {
        self.tools.iter().map(|t| t.name()).collect()
    }

    /// Comma-separated tool names.
    pub fn tool_names(&self) -> String {
        self.names().join(", ")
    }

    /// One `name: description` line per tool.
    pub fn render_descriptions(&self) -> String {
        self.tools
            .iter()
            .map(|t| format!("{}: {}", t.name(), t.description()))
            .collect::<Vec<_>>()
            .join("\n")
    }

    pub fn descriptors(&self) -> Vec<ToolDescriptor> {
        self.tools
            .iter()
            .map(|t| ToolDescriptor {
                name: t.name().to_string(),
                description: t.description().to_string(),
                args_schema: t.args_schema(),
            })
            .collect()
    }

    /// Invoke a tool by name. Unknown names fail closed.
    pub async fn invoke(&self, name: &str, input: impl Into<ToolInput>) -> FetchResult {
        let Some(tool) = self.get(name) else {
            log::debug!("Rejected call to unknown tool '{}'", name);
            return Err(ToolError::UnknownCapability {
                name: name.to_string(),
                available: self.tool_names(),
            });
        };
        tool.invoke(input.into()).await
    }

    /// Invoke a tool from an agent's `ToolCalling`.
    pub async fn execute(&self, calling: &ToolCalling) -> FetchResult {
        self.invoke(&calling.tool_name, calling.input()).await
    }
}
