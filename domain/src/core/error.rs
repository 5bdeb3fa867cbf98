//! Bridge error taxonomy
//!
//! Every failure the dispatcher can observe is one of these variants. Each
//! variant maps to a stable JSON-RPC error code via [`BridgeError::code`], so
//! transports never have to inspect error strings.

use crate::protocol::codes;
use serde_json::json;
use std::time::Duration;
use thiserror::Error;

/// Broad classification of a [`BridgeError`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorCategory {
    /// Missing or invalid credentials. Fatal to the operation, not the process.
    Configuration,
    /// Malformed or unknown message. Reported per request.
    Protocol,
    /// The isolated execution context failed. Reported per request.
    Boundary,
}

/// Errors surfaced by the request-dispatch bridge
#[derive(Error, Debug, Clone, PartialEq)]
pub enum BridgeError {
    #[error("Configuration error: {0}")]
    Configuration(String),

    #[error("Parse error: {0}")]
    Parse(String),

    #[error("Invalid request: {0}")]
    InvalidRequest(String),

    #[error("Method not found: {0}")]
    MethodNotFound(String),

    #[error("Tool not found: {0}")]
    ToolNotFound(String),

    #[error("Invalid params: {0}")]
    InvalidParams(String),

    #[error("Tool execution failed: {}", describe_exit(*.exit_code))]
    BoundaryProcess {
        exit_code: Option<i32>,
        stderr: String,
    },

    #[error("Tool execution failed: boundary output is not valid JSON ({message})")]
    BoundaryParse { message: String, raw: String },

    #[error("Tool execution failed: boundary call timed out after {}s", .0.as_secs())]
    BoundaryTimeout(Duration),

    #[error("Tool execution cancelled")]
    Cancelled,
}

fn describe_exit(code: Option<i32>) -> String {
    match code {
        Some(code) => format!("boundary process exited with status {}", code),
        None => "boundary process terminated abnormally".to_string(),
    }
}

impl BridgeError {
    /// Missing-setting configuration error, e.g. `ROBINHOOD_API_KEY not set`.
    pub fn missing_setting(name: &str) -> Self {
        BridgeError::Configuration(format!("{} not set", name))
    }

    pub fn category(&self) -> ErrorCategory {
        match self {
            BridgeError::Configuration(_) => ErrorCategory::Configuration,
            BridgeError::Parse(_)
            | BridgeError::InvalidRequest(_)
            | BridgeError::MethodNotFound(_)
            | BridgeError::ToolNotFound(_)
            | BridgeError::InvalidParams(_) => ErrorCategory::Protocol,
            BridgeError::BoundaryProcess { .. }
            | BridgeError::BoundaryParse { .. }
            | BridgeError::BoundaryTimeout(_)
            | BridgeError::Cancelled => ErrorCategory::Boundary,
        }
    }

    /// Stable machine-readable kind, echoed in the error `data` payload.
    pub fn kind(&self) -> &'static str {
        match self {
            BridgeError::Configuration(_) => "configuration",
            BridgeError::Parse(_) => "parse",
            BridgeError::InvalidRequest(_) => "invalid_request",
            BridgeError::MethodNotFound(_) => "method_not_found",
            BridgeError::ToolNotFound(_) => "tool_not_found",
            BridgeError::InvalidParams(_) => "invalid_params",
            BridgeError::BoundaryProcess { .. } => "boundary_process",
            BridgeError::BoundaryParse { .. } => "boundary_parse",
            BridgeError::BoundaryTimeout(_) => "boundary_timeout",
            BridgeError::Cancelled => "cancelled",
        }
    }

    /// JSON-RPC error code for this error.
    pub fn code(&self) -> i64 {
        match self {
            BridgeError::Configuration(_) => codes::INTERNAL_ERROR,
            BridgeError::Parse(_) => codes::PARSE_ERROR,
            BridgeError::InvalidRequest(_) => codes::INVALID_REQUEST,
            BridgeError::MethodNotFound(_) | BridgeError::ToolNotFound(_) => {
                codes::METHOD_NOT_FOUND
            }
            BridgeError::InvalidParams(_) => codes::INVALID_PARAMS,
            BridgeError::BoundaryProcess { .. }
            | BridgeError::BoundaryParse { .. }
            | BridgeError::BoundaryTimeout(_)
            | BridgeError::Cancelled => codes::TOOL_EXECUTION_FAILED,
        }
    }

    /// Structured `data` for the JSON-RPC error object.
    ///
    /// Only boundary failures carry data. Configuration errors never do, so
    /// nothing derived from credential settings can reach a client.
    pub fn data(&self) -> Option<serde_json::Value> {
        match self {
            BridgeError::BoundaryProcess { exit_code, stderr } => Some(json!({
                "kind": self.kind(),
                "exit_code": exit_code,
                "stderr": stderr,
            })),
            BridgeError::BoundaryParse { raw, .. } => Some(json!({
                "kind": self.kind(),
                "output": raw,
            })),
            BridgeError::BoundaryTimeout(budget) => Some(json!({
                "kind": self.kind(),
                "timeout_secs": budget.as_secs(),
            })),
            BridgeError::Cancelled => Some(json!({ "kind": self.kind() })),
            _ => None,
        }
    }
}
