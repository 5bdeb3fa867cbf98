//! HTTP transport
//!
//! `POST {endpoint}` takes one JSON-RPC message as the body and answers with
//! the response as JSON (HTTP 200 even for JSON-RPC errors). Notifications
//! get `202 Accepted` with no body. `GET /health` is a liveness check.
//!
//! An `x-api-key` header overrides the configured API key for that request.
//! If the client disconnects, the request future is dropped and the child
//! process with it.

use axum::{
    Json, Router,
    extract::State,
    http::{HeaderMap, StatusCode},
    response::{IntoResponse, Response},
    routing::{get, post},
};
use rhmcp_application::{CallContext, Dispatcher};
use rhmcp_domain::SignedCall;
use std::io;
use std::sync::Arc;
use tokio_util::sync::CancellationToken;
use tower_http::trace::TraceLayer;
use tracing::info;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HttpServerConfig {
    /// `host:port`
    pub bind_address: String,
    /// Request path for JSON-RPC, with a leading `/`
    pub endpoint: String,
}

struct AppState {
    dispatcher: Dispatcher,
    shutdown: CancellationToken,
}

pub struct HttpServer {
    dispatcher: Dispatcher,
    config: HttpServerConfig,
}

impl HttpServer {
    pub fn new(dispatcher: Dispatcher, config: HttpServerConfig) -> Self {
        Self { dispatcher, config }
    }

    /// Build the router. In-flight calls are cancelled through `shutdown`.
    pub fn router(&self, shutdown: CancellationToken) -> Router {
        let state = Arc::new(AppState {
            dispatcher: self.dispatcher.clone(),
            shutdown,
        });

        Router::new()
            .route(&self.config.endpoint, post(handle_rpc))
            .route("/health", get(health_check))
            .layer(TraceLayer::new_for_http())
            .with_state(state)
    }

    /// Listen until `shutdown` is cancelled.
    pub async fn run(&self, shutdown: CancellationToken) -> io::Result<()> {
        let listener = tokio::net::TcpListener::bind(&self.config.bind_address).await?;
        info!(
            "Serving MCP over HTTP on {}{}",
            self.config.bind_address, self.config.endpoint
        );

        let app = self.router(shutdown.clone());
        axum::serve(listener, app)
            .with_graceful_shutdown(async move { shutdown.cancelled().await })
            .await
    }
}

async fn handle_rpc(
    State(state): State<Arc<AppState>>,
    headers: HeaderMap,
    body: String,
) -> Response {
    let mut ctx = CallContext::new(state.shutdown.child_token());
    if let Some(api_key) = headers
        .get(SignedCall::API_KEY_HEADER)
        .and_then(|v| v.to_str().ok())
    {
        ctx = ctx.with_api_key(api_key);
    }

    match state.dispatcher.handle_frame(&body, &ctx).await {
        Some(response) => Json(response).into_response(),
        None => StatusCode::ACCEPTED.into_response(),
    }
}

async fn health_check() -> impl IntoResponse {
    Json(serde_json::json!({
        "status": "ok",
        "version": env!("CARGO_PKG_VERSION"),
    }))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::server::testing::{EchoExecutor, dispatcher};
    use axum::body::{Body, to_bytes};
    use axum::http::Request;
    use serde_json::{Value, json};
    use tower::ServiceExt;

    fn server(with_api_key: bool) -> HttpServer {
        HttpServer::new(
            dispatcher(EchoExecutor::instant(), with_api_key),
            HttpServerConfig {
                bind_address: "127.0.0.1:0".to_string(),
                endpoint: "/mcp".to_string(),
            },
        )
    }

    fn rpc() -> axum::http::request::Builder {
        Request::builder()
            .method("POST")
            .uri("/mcp")
            .header("content-type", "application/json")
    }

    async fn send(router: Router, request: Request<Body>) -> (StatusCode, Value) {
        let response = router.oneshot(request).await.unwrap();
        let status = response.status();
        let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
        let body = if bytes.is_empty() {
            Value::Null
        } else {
            serde_json::from_slice(&bytes).unwrap()
        };
        (status, body)
    }

    #[tokio::test]
    async fn test_health() {
        let router = server(true).router(CancellationToken::new());
        let request = Request::builder()
            .uri("/health")
            .body(Body::empty())
            .unwrap();

        let (status, body) = send(router, request).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["status"], "ok");
    }

    #[tokio::test]
    async fn test_rpc_roundtrip() {
        let router = server(true).router(CancellationToken::new());
        let frame = r#"{"jsonrpc":"2.0","id":3,"method":"tools/execute","params":{"name":"getOrder","arguments":{"order_id":"o-1"}}}"#;
        let request = rpc().body(Body::from(frame)).unwrap();

        let (status, body) = send(router, request).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["id"], 3);
        assert_eq!(
            body["result"]["argv"],
            json!(["trading", "get_order", "o-1"])
        );
        assert_eq!(body["result"]["api_key_override"], false);
    }

    #[tokio::test]
    async fn test_header_api_key_satisfies_guard() {
        let frame = r#"{"jsonrpc":"2.0","id":1,"method":"tools/execute","params":{"name":"getAccount"}}"#;

        let router = server(false).router(CancellationToken::new());
        let (_, body) = send(router, rpc().body(Body::from(frame)).unwrap()).await;
        assert_eq!(body["error"]["code"], -32603);

        let router = server(false).router(CancellationToken::new());
        let request = rpc()
            .header("x-api-key", "from-header")
            .body(Body::from(frame))
            .unwrap();
        let (_, body) = send(router, request).await;
        assert_eq!(body["result"]["api_key_override"], true);
        assert!(!body.to_string().contains("from-header"));
    }

    #[tokio::test]
    async fn test_notification_is_accepted_without_body() {
        let router = server(true).router(CancellationToken::new());
        let frame = r#"{"jsonrpc":"2.0","method":"notifications/initialized"}"#;

        let (status, body) = send(router, rpc().body(Body::from(frame)).unwrap()).await;
        assert_eq!(status, StatusCode::ACCEPTED);
        assert_eq!(body, Value::Null);
    }

    #[tokio::test]
    async fn test_malformed_body_is_parse_error() {
        let router = server(true).router(CancellationToken::new());
        let (status, body) = send(router, rpc().body(Body::from("{oops")).unwrap()).await;

        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["error"]["code"], -32700);
        assert_eq!(body["id"], Value::Null);
    }
}
