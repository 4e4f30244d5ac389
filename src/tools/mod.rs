//! Tools exposed to the agent.
//!
//! This module provides the `BaseTool` contract, input normalization, the
//! per-capability dispatcher and the registry the agent looks tools up in.

pub mod base_tool;
pub mod capability_tool;
pub mod registry;
pub mod tool_calling;
pub mod tool_input;

// Re-exports for convenience
pub use base_tool::{BaseTool, EnvVar};
pub use capability_tool::CapabilityTool;
pub use registry::{ToolDescriptor, ToolRegistry};
pub use tool_calling::ToolCalling;
pub use tool_input::{normalize, ParamValue, QueryParams, ToolInput};
