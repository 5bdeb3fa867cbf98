//! Account client: account summary and holdings.

use crate::ports::boundary_executor::{BoundaryExecutor, CallContext};
use rhmcp_domain::tool::entities::{ParamType, RiskLevel, ToolDefinition, ToolParameter};
use rhmcp_domain::{BoundaryCallSpec, BridgeError, OperationGroup};
use serde_json::{Value, json};
use std::sync::Arc;

#[derive(Clone)]
pub struct AccountClient {
    executor: Arc<dyn BoundaryExecutor>,
}

impl AccountClient {
    pub fn new(executor: Arc<dyn BoundaryExecutor>) -> Self {
        Self { executor }
    }

    pub async fn get_account(&self, ctx: &CallContext) -> Result<Value, BridgeError> {
        let spec = BoundaryCallSpec::new(OperationGroup::Account, "get_account");
        self.executor.invoke(spec, ctx).await
    }

    /// Holdings, optionally filtered by asset code. An empty filter means all.
    pub async fn get_holdings(
        &self,
        asset_codes: &[String],
        ctx: &CallContext,
    ) -> Result<Value, BridgeError> {
        let spec = BoundaryCallSpec::new(OperationGroup::Account, "get_holdings")
            .with_json_arg(&json!(asset_codes));
        self.executor.invoke(spec, ctx).await
    }
}

pub fn get_account_definition() -> ToolDefinition {
    ToolDefinition::new(
        "getAccount",
        "Get crypto trading account details (account number, status, buying power)",
        RiskLevel::Low,
    )
    .with_returns("Account object as returned by the broker")
}

pub fn get_holdings_definition() -> ToolDefinition {
    ToolDefinition::new(
        "getHoldings",
        "Get crypto holdings, optionally filtered by asset code",
        RiskLevel::Low,
    )
    .with_parameter(
        ToolParameter::new(
            "asset_codes",
            "Asset codes to filter by (e.g. [\"BTC\", \"ETH\"]); empty for all holdings",
            false,
        )
        .array_of(ParamType::String)
        .with_default(json!([])),
    )
    .with_returns("Paginated list of holdings")
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::clients::testing::RecordingExecutor;

    #[tokio::test]
    async fn test_get_account_passes_payload_through() {
        let payload = json!({"account_number": "abc123", "status": "active"});
        let executor = Arc::new(RecordingExecutor::returning(payload.clone()));
        let client = AccountClient::new(executor.clone());

        let result = client.get_account(&CallContext::default()).await.unwrap();
        assert_eq!(result, payload);
        assert_eq!(executor.last_call().to_argv(), vec!["account", "get_account"]);
    }

    #[tokio::test]
    async fn test_empty_holdings_filter_is_empty_array() {
        let executor = Arc::new(RecordingExecutor::returning(json!({"results": []})));
        let client = AccountClient::new(executor.clone());

        client.get_holdings(&[], &CallContext::default()).await.unwrap();
        assert_eq!(executor.last_call().args, vec!["[]"]);
    }

    #[tokio::test]
    async fn test_errors_propagate_unchanged() {
        let error = BridgeError::BoundaryProcess {
            exit_code: Some(1),
            stderr: "boom".to_string(),
        };
        let executor = Arc::new(RecordingExecutor::failing(error.clone()));
        let client = AccountClient::new(executor);

        let err = client.get_account(&CallContext::default()).await.unwrap_err();
        assert_eq!(err, error);
    }
}
