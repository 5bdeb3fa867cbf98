//! Tool domain traits
//!
//! Pure validation of a [`ToolCall`] against its [`ToolDefinition`], run by
//! the dispatcher before any boundary call is made.

use super::entities::{ParamType, ToolCall, ToolDefinition};
use serde_json::Value;

/// Validator for tool calls
pub trait ToolValidator {
    /// Validate a tool call against its definition
    fn validate(&self, call: &ToolCall, definition: &ToolDefinition) -> Result<(), String>;
}

/// Default implementation of ToolValidator
///
/// Checks, in order: required parameters present, no unknown parameters,
/// declared types respected (array elements included), closed value sets.
/// An explicit `null` is treated the same as an omitted argument.
#[derive(Debug, Clone, Default)]
pub struct DefaultToolValidator;

impl ToolValidator for DefaultToolValidator {
    fn validate(&self, call: &ToolCall, definition: &ToolDefinition) -> Result<(), String> {
        for param in definition.required_parameters() {
            match call.arguments.get(&param.name) {
                None | Some(Value::Null) => {
                    return Err(format!(
                        "Missing required parameter '{}' for tool '{}'",
                        param.name, definition.name
                    ));
                }
                Some(_) => {}
            }
        }

        for (name, value) in &call.arguments {
            let Some(param) = definition.parameter(name) else {
                return Err(format!(
                    "Unknown parameter '{}' for tool '{}'",
                    name, definition.name
                ));
            };

            if value.is_null() {
                continue;
            }

            if !param.param_type.matches(value) {
                return Err(format!(
                    "Parameter '{}' must be of type {}",
                    name,
                    param.param_type.as_str()
                ));
            }

            if let (ParamType::Array, Some(items), Value::Array(elements)) =
                (param.param_type, param.items, value)
                && let Some(bad) = elements.iter().find(|e| !items.matches(e))
            {
                return Err(format!(
                    "Parameter '{}' must contain only {} values, got {}",
                    name,
                    items.as_str(),
                    bad
                ));
            }

            // An empty string on an optional parameter means "use the default".
            if !param.allowed_values.is_empty()
                && let Some(s) = value.as_str()
                && (param.required || !s.is_empty())
                && !param.allowed_values.iter().any(|allowed| allowed == s)
            {
                return Err(format!(
                    "Parameter '{}' must be one of [{}], got '{}'",
                    name,
                    param.allowed_values.join(", "),
                    s
                ));
            }
        }

        Ok(())
    }
}
