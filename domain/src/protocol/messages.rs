//! JSON-RPC 2.0 message types.
//!
//! - **Requests**: client → server (`initialize`, `tools/list`, `tools/execute`)
//! - **Notifications**: client → server, no `id`, never answered
//! - **Responses**: server → client, exactly one of `result` / `error`

use crate::core::error::BridgeError;
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use std::fmt;

/// Protocol version string carried in every frame.
pub const JSONRPC_VERSION: &str = "2.0";

/// Caller-supplied correlation token.
///
/// An explicit `"id": null` is a request (it is answered, with a null id),
/// unlike an absent id, which marks a notification.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(untagged)]
pub enum RequestId {
    Number(i64),
    String(String),
    Null,
}

impl fmt::Display for RequestId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            RequestId::Number(n) => write!(f, "{}", n),
            RequestId::String(s) => write!(f, "{}", s),
            RequestId::Null => f.write_str("null"),
        }
    }
}

impl From<i64> for RequestId {
    fn from(value: i64) -> Self {
        RequestId::Number(value)
    }
}

impl From<&str> for RequestId {
    fn from(value: &str) -> Self {
        RequestId::String(value.to_string())
    }
}

/// Inbound JSON-RPC request or notification
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct JsonRpcRequest {
    pub jsonrpc: String,
    #[serde(
        default,
        deserialize_with = "present_id",
        skip_serializing_if = "Option::is_none"
    )]
    pub id: Option<RequestId>,
    pub method: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub params: Option<Value>,
}

impl JsonRpcRequest {
    pub fn new(id: impl Into<RequestId>, method: impl Into<String>, params: Option<Value>) -> Self {
        Self {
            jsonrpc: JSONRPC_VERSION.to_string(),
            id: Some(id.into()),
            method: method.into(),
            params,
        }
    }

    /// A request without an `id` is a notification and gets no response.
    pub fn is_notification(&self) -> bool {
        self.id.is_none()
    }
}

/// A present `id` field, `null` included, is always `Some`.
fn present_id<'de, D>(deserializer: D) -> Result<Option<RequestId>, D::Error>
where
    D: serde::Deserializer<'de>,
{
    RequestId::deserialize(deserializer).map(Some)
}

/// JSON-RPC error object
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RpcError {
    pub code: i64,
    pub message: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub data: Option<Value>,
}

impl From<&BridgeError> for RpcError {
    fn from(err: &BridgeError) -> Self {
        Self {
            code: err.code(),
            message: err.to_string(),
            data: err.data(),
        }
    }
}

/// Outcome of a request: success payload XOR error.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Outcome {
    Result(Value),
    Error(RpcError),
}

/// Outbound JSON-RPC response
///
/// `id` serializes as `null` when the request id could not be recovered
/// (parse errors), as the protocol requires.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct JsonRpcResponse {
    pub jsonrpc: String,
    pub id: Option<RequestId>,
    #[serde(flatten)]
    pub outcome: Outcome,
}

impl JsonRpcResponse {
    pub fn success(id: Option<RequestId>, result: Value) -> Self {
        Self {
            jsonrpc: JSONRPC_VERSION.to_string(),
            id,
            outcome: Outcome::Result(result),
        }
    }

    pub fn failure(id: Option<RequestId>, error: &BridgeError) -> Self {
        Self {
            jsonrpc: JSONRPC_VERSION.to_string(),
            id,
            outcome: Outcome::Error(RpcError::from(error)),
        }
    }

    pub fn from_result(id: Option<RequestId>, result: Result<Value, BridgeError>) -> Self {
        match result {
            Ok(value) => Self::success(id, value),
            Err(e) => Self::failure(id, &e),
        }
    }

    pub fn result(&self) -> Option<&Value> {
        match &self.outcome {
            Outcome::Result(value) => Some(value),
            Outcome::Error(_) => None,
        }
    }

    pub fn error(&self) -> Option<&RpcError> {
        match &self.outcome {
            Outcome::Error(error) => Some(error),
            Outcome::Result(_) => None,
        }
    }

    pub fn is_success(&self) -> bool {
        matches!(self.outcome, Outcome::Result(_))
    }
}

/// Parameters of `tools/execute` / `tools/call`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ToolCallParams {
    pub name: String,
    #[serde(default)]
    pub arguments: Option<Map<String, Value>>,
}

/// A frame that could not be turned into a [`JsonRpcRequest`].
///
/// Carries the request id when one could still be read from the raw frame,
/// so the error response can be correlated.
#[derive(Debug, Clone)]
pub struct FrameError {
    pub id: Option<RequestId>,
    pub error: BridgeError,
}

impl FrameError {
    pub fn into_response(self) -> JsonRpcResponse {
        JsonRpcResponse::failure(self.id, &self.error)
    }
}

/// Decode a single raw frame into a request.
///
/// - not JSON → `Parse` error, `id: null`
/// - JSON but not a request object → `InvalidRequest`, with the id if present
pub fn decode_message(raw: &str) -> Result<JsonRpcRequest, FrameError> {
    let value: Value = serde_json::from_str(raw).map_err(|e| FrameError {
        id: None,
        error: BridgeError::Parse(e.to_string()),
    })?;

    let id = value
        .get("id")
        .and_then(|v| serde_json::from_value::<RequestId>(v.clone()).ok());

    if value.get("jsonrpc").and_then(|v| v.as_str()) != Some(JSONRPC_VERSION) {
        return Err(FrameError {
            id,
            error: BridgeError::InvalidRequest("jsonrpc must be \"2.0\"".to_string()),
        });
    }

    serde_json::from_value::<JsonRpcRequest>(value).map_err(|e| FrameError {
        id,
        error: BridgeError::InvalidRequest(e.to_string()),
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_success_response_shape() {
        let resp = JsonRpcResponse::success(Some(7.into()), json!({"ok": true}));
        let json = serde_json::to_value(&resp).unwrap();

        assert_eq!(json["jsonrpc"], "2.0");
        assert_eq!(json["id"], 7);
        assert_eq!(json["result"]["ok"], true);
        assert!(json.get("error").is_none());
    }

    #[test]
    fn test_error_response_shape() {
        let resp = JsonRpcResponse::failure(
            Some("abc".into()),
            &BridgeError::ToolNotFound("nope".into()),
        );
        let json = serde_json::to_value(&resp).unwrap();

        assert_eq!(json["id"], "abc");
        assert_eq!(json["error"]["code"], -32601);
        assert!(json["error"]["message"].as_str().unwrap().contains("nope"));
        assert!(json.get("result").is_none());
        assert!(json["error"].get("data").is_none());
    }

    #[test]
    fn test_parse_error_has_null_id() {
        let err = decode_message("{not json").unwrap_err();
        let json = serde_json::to_value(err.into_response()).unwrap();

        assert!(json["id"].is_null());
        assert_eq!(json["error"]["code"], -32700);
    }

    #[test]
    fn test_invalid_request_keeps_id() {
        let err = decode_message(r#"{"jsonrpc":"2.0","id":3}"#).unwrap_err();
        assert_eq!(err.id, Some(RequestId::Number(3)));
        assert_eq!(err.error.code(), -32600);
    }

    #[test]
    fn test_wrong_version_rejected() {
        let err = decode_message(r#"{"jsonrpc":"1.0","id":1,"method":"ping"}"#).unwrap_err();
        assert_eq!(err.error.code(), -32600);
    }

    #[test]
    fn test_decode_notification() {
        let req =
            decode_message(r#"{"jsonrpc":"2.0","method":"notifications/initialized"}"#).unwrap();
        assert!(req.is_notification());
        assert_eq!(req.method, "notifications/initialized");
    }

    #[test]
    fn test_null_id_is_a_request() {
        let req = decode_message(r#"{"jsonrpc":"2.0","id":null,"method":"tools/list"}"#).unwrap();
        assert!(!req.is_notification());
        assert_eq!(req.id, Some(RequestId::Null));

        let resp = JsonRpcResponse::success(req.id, json!({}));
        let json = serde_json::to_value(&resp).unwrap();
        assert!(json["id"].is_null());
        assert!(json.get("result").is_some());
    }

    #[test]
    fn test_decode_string_id() {
        let req = decode_message(r#"{"jsonrpc":"2.0","id":"req-1","method":"tools/list"}"#)
            .unwrap();
        assert_eq!(req.id, Some(RequestId::String("req-1".to_string())));
        assert!(req.params.is_none());
    }

    #[test]
    fn test_response_roundtrip_keeps_outcome() {
        let resp = JsonRpcResponse::success(Some(1.into()), json!([1, 2]));
        let text = serde_json::to_string(&resp).unwrap();
        let back: JsonRpcResponse = serde_json::from_str(&text).unwrap();
        assert_eq!(back, resp);
    }

    #[test]
    fn test_tool_call_params_without_arguments() {
        let params: ToolCallParams = serde_json::from_value(json!({"name": "getAccount"})).unwrap();
        assert_eq!(params.name, "getAccount");
        assert!(params.arguments.is_none());
    }
}
