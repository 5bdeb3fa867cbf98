//! Tool schema conversion port.
//!
//! Separates "which tools exist" (domain catalog) from "how a client sees
//! them" (JSON Schema, produced in infrastructure).

use rhmcp_domain::tool::entities::{ToolDefinition, ToolSpec};

/// Port for converting tool definitions to the protocol's JSON Schema form.
pub trait ToolSchemaPort: Send + Sync {
    /// Convert a single tool definition to a `tools/list` entry.
    fn tool_to_schema(&self, tool: &ToolDefinition) -> serde_json::Value;

    /// Convert all tools to `tools/list` entries (sorted by name).
    fn all_tools_schema(&self, spec: &ToolSpec) -> Vec<serde_json::Value> {
        spec.sorted()
            .into_iter()
            .map(|t| self.tool_to_schema(t))
            .collect()
    }
}
