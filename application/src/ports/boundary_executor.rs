//! Boundary Executor port
//!
//! Defines how the application layer runs one operation in the isolated
//! execution context. The adapter (a subprocess runner) lives in the
//! infrastructure layer; use cases only see a JSON value or a [`BridgeError`].

use async_trait::async_trait;
use rhmcp_domain::{BoundaryCallSpec, BridgeError};
use serde_json::Value;
use tokio_util::sync::CancellationToken;

/// Per-request context handed from the transport down to the executor.
///
/// `api_key` is a transport-injected override (e.g. an `x-api-key` header on
/// the HTTP transport). When present it takes precedence over the configured
/// key for this request only.
#[derive(Clone, Default)]
pub struct CallContext {
    pub api_key: Option<String>,
    pub cancel: CancellationToken,
}

impl CallContext {
    pub fn new(cancel: CancellationToken) -> Self {
        Self {
            api_key: None,
            cancel,
        }
    }

    pub fn with_api_key(mut self, api_key: impl Into<String>) -> Self {
        let api_key = api_key.into();
        self.api_key = (!api_key.trim().is_empty()).then_some(api_key);
        self
    }
}

impl std::fmt::Debug for CallContext {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("CallContext")
            .field("api_key", &self.api_key.as_ref().map(|_| "***"))
            .field("cancelled", &self.cancel.is_cancelled())
            .finish()
    }
}

/// Port for boundary execution
///
/// Implementations must spawn a fresh execution context per call, deliver
/// credentials out of band (never as positional arguments), and reclaim the
/// context on every exit path, including cancellation.
#[async_trait]
pub trait BoundaryExecutor: Send + Sync {
    /// Run `spec` and return the single JSON value it produced.
    async fn invoke(&self, spec: BoundaryCallSpec, ctx: &CallContext) -> Result<Value, BridgeError>;
}
