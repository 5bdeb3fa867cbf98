//! Domain layer for robinhood-mcp
//!
//! This crate contains the core types of the request-dispatch bridge.
//! It has no dependencies on infrastructure or presentation concerns.
//!
//! # Core Concepts
//!
//! - **Tool catalog** ([`tool`]): named, schema-described operations and the
//!   validation applied before any of them runs.
//! - **Protocol** ([`protocol`]): JSON-RPC 2.0 requests and responses.
//! - **Boundary contract** ([`boundary`]): what crosses into the isolated
//!   execution context that performs the network call.
//! - **Credentials** ([`credential`]): key material and signed-call values.
//! - **Errors** ([`core::error`]): one taxonomy, one JSON-RPC code per kind.

pub mod boundary;
pub mod core;
pub mod credential;
pub mod protocol;
pub mod tool;

// Re-export commonly used types
pub use boundary::{BoundaryCallSpec, OperationGroup};
pub use crate::core::error::{BridgeError, ErrorCategory};
pub use credential::{API_KEY_ENV, Credential, PRIVATE_KEY_ENV, SecretString, SignedCall};
pub use protocol::{
    FrameError, JsonRpcRequest, JsonRpcResponse, Outcome, RequestId, RpcError, ToolCallParams,
    codes, decode_message,
};
pub use tool::{
    CatalogError, DefaultToolValidator, ParamType, RiskLevel, ToolCall, ToolDefinition,
    ToolParameter, ToolSpec, ToolValidator,
};
