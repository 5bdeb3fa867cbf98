//! JSON Schema tool converter.
//!
//! Default implementation of [`ToolSchemaPort`] producing MCP `tools/list`
//! entries.

use rhmcp_application::ports::tool_schema::ToolSchemaPort;
use rhmcp_domain::tool::entities::{ToolDefinition, ToolParameter};
use serde_json::{Map, Value, json};

/// Default implementation producing MCP-shaped JSON Schema.
///
/// Each entry carries `name`, `description`, `inputSchema` (an object
/// schema), and `annotations.readOnlyHint` derived from the risk level.
pub struct JsonSchemaToolConverter;

fn parameter_schema(param: &ToolParameter) -> Value {
    let mut prop = Map::new();
    prop.insert("type".to_string(), json!(param.param_type.as_str()));
    prop.insert("description".to_string(), json!(param.description));
    if let Some(items) = param.items {
        prop.insert("items".to_string(), json!({ "type": items.as_str() }));
    }
    if !param.allowed_values.is_empty() {
        prop.insert("enum".to_string(), json!(param.allowed_values));
    }
    if let Some(default) = &param.default {
        prop.insert("default".to_string(), default.clone());
    }
    Value::Object(prop)
}

impl ToolSchemaPort for JsonSchemaToolConverter {
    fn tool_to_schema(&self, tool: &ToolDefinition) -> Value {
        let mut properties = Map::new();
        let mut required = Vec::new();

        for param in &tool.parameters {
            properties.insert(param.name.clone(), parameter_schema(param));
            if param.required {
                required.push(json!(param.name));
            }
        }

        let mut schema = json!({
            "name": tool.name,
            "description": tool.description,
            "inputSchema": {
                "type": "object",
                "properties": properties,
                "required": required,
            },
            "annotations": {
                "readOnlyHint": tool.risk_level.is_read_only(),
            }
        });
        if let Some(returns) = &tool.returns {
            schema["returns"] = json!(returns);
        }
        schema
    }
}
