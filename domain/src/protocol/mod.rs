//! Protocol domain module
//!
//! JSON-RPC 2.0 framing shared by every transport. The dispatcher only ever
//! sees [`JsonRpcRequest`] values and produces [`JsonRpcResponse`] values;
//! transports are responsible for moving bytes.

pub mod messages;

pub use messages::{
    FrameError, JSONRPC_VERSION, JsonRpcRequest, JsonRpcResponse, Outcome, RequestId, RpcError,
    ToolCallParams, decode_message,
};

/// JSON-RPC error codes used by the bridge.
pub mod codes {
    /// Invalid JSON was received.
    pub const PARSE_ERROR: i64 = -32700;
    /// The JSON sent is not a valid request object.
    pub const INVALID_REQUEST: i64 = -32600;
    /// Unknown method or tool.
    pub const METHOD_NOT_FOUND: i64 = -32601;
    /// Arguments do not match the tool schema.
    pub const INVALID_PARAMS: i64 = -32602;
    /// Internal error (also used for configuration failures).
    pub const INTERNAL_ERROR: i64 = -32603;
    /// The tool ran but its execution failed.
    pub const TOOL_EXECUTION_FAILED: i64 = -32000;
}
