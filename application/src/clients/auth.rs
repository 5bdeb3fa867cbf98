//! Auth client: credential health check and the raw signed-request escape hatch.

use crate::ports::boundary_executor::{BoundaryExecutor, CallContext};
use rhmcp_domain::tool::entities::{RiskLevel, ToolDefinition};
use rhmcp_domain::{BoundaryCallSpec, BridgeError, OperationGroup};
use serde_json::Value;
use std::sync::Arc;

#[derive(Clone)]
pub struct AuthClient {
    executor: Arc<dyn BoundaryExecutor>,
}

impl AuthClient {
    pub fn new(executor: Arc<dyn BoundaryExecutor>) -> Self {
        Self { executor }
    }

    /// Verify credentials with one cheap signed call upstream.
    pub async fn check_auth_status(&self, ctx: &CallContext) -> Result<Value, BridgeError> {
        let spec = BoundaryCallSpec::new(OperationGroup::Auth, "check_auth_status");
        self.executor.invoke(spec, ctx).await
    }

    /// Send an arbitrary signed request.
    ///
    /// `body` and `params` travel as JSON text; an absent value is sent as
    /// the empty-string sentinel.
    pub async fn make_api_request(
        &self,
        method: &str,
        path: &str,
        body: Option<&Value>,
        params: Option<&Value>,
        ctx: &CallContext,
    ) -> Result<Value, BridgeError> {
        let mut spec = BoundaryCallSpec::new(OperationGroup::Auth, "make_api_request")
            .with_arg(method.to_ascii_uppercase())
            .with_arg(path);
        spec = match body {
            Some(body) => spec.with_json_arg(body),
            None => spec.with_arg(""),
        };
        spec = match params {
            Some(params) => spec.with_json_arg(params),
            None => spec.with_arg(""),
        };
        self.executor.invoke(spec, ctx).await
    }
}

pub fn auth_status_definition() -> ToolDefinition {
    ToolDefinition::new(
        "getAuthStatus",
        "Check whether the configured API credentials are accepted by the broker",
        RiskLevel::Low,
    )
    .with_returns("{status: \"authenticated\" | \"error\", message, timestamp}")
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::clients::testing::RecordingExecutor;
    use serde_json::json;

    #[tokio::test]
    async fn test_check_auth_status_has_no_args() {
        let executor = Arc::new(RecordingExecutor::returning(json!({"status": "authenticated"})));
        let client = AuthClient::new(executor.clone());

        let result = client.check_auth_status(&CallContext::default()).await.unwrap();
        assert_eq!(result["status"], "authenticated");
        assert_eq!(executor.last_call().to_argv(), vec!["auth", "check_auth_status"]);
    }

    #[tokio::test]
    async fn test_make_api_request_argv() {
        let executor = Arc::new(RecordingExecutor::returning(json!({})));
        let client = AuthClient::new(executor.clone());

        client
            .make_api_request(
                "get",
                "/api/v1/crypto/trading/orders/",
                None,
                Some(&json!({"state": "open"})),
                &CallContext::default(),
            )
            .await
            .unwrap();

        assert_eq!(
            executor.last_call().to_argv(),
            vec![
                "auth",
                "make_api_request",
                "GET",
                "/api/v1/crypto/trading/orders/",
                "",
                r#"{"state":"open"}"#,
            ]
        );
    }
}
