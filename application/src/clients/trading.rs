//! Trading client: trading pairs and the order lifecycle.

use crate::ports::boundary_executor::{BoundaryExecutor, CallContext};
use rhmcp_domain::tool::entities::{ParamType, RiskLevel, ToolDefinition, ToolParameter};
use rhmcp_domain::{BoundaryCallSpec, BridgeError, OperationGroup};
use serde_json::{Value, json};
use std::sync::Arc;

pub const DEFAULT_ORDER_TYPE: &str = "market";
pub const DEFAULT_TIME_IN_FORCE: &str = "gtc";

/// A new order as submitted by a caller.
///
/// Optional fields left as `None` (or empty) are defaulted when the order is
/// turned into positional arguments.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OrderRequest {
    pub symbol: String,
    pub side: String,
    pub quantity: String,
    pub order_type: Option<String>,
    pub price: Option<String>,
    pub time_in_force: Option<String>,
    pub stop_price: Option<String>,
}

fn or_default(value: &Option<String>, default: &str) -> String {
    match value.as_deref() {
        Some(v) if !v.is_empty() => v.to_string(),
        _ => default.to_string(),
    }
}

impl OrderRequest {
    pub fn new(
        symbol: impl Into<String>,
        side: impl Into<String>,
        quantity: impl Into<String>,
    ) -> Self {
        Self {
            symbol: symbol.into(),
            side: side.into(),
            quantity: quantity.into(),
            order_type: None,
            price: None,
            time_in_force: None,
            stop_price: None,
        }
    }

    /// Positional boundary arguments, always seven:
    /// symbol, side, quantity, type, price, time_in_force, stop_price.
    ///
    /// `price`/`stop_price` use the empty string as the "not set" sentinel.
    pub fn to_args(&self) -> Vec<String> {
        vec![
            self.symbol.clone(),
            self.side.clone(),
            self.quantity.clone(),
            or_default(&self.order_type, DEFAULT_ORDER_TYPE),
            or_default(&self.price, ""),
            or_default(&self.time_in_force, DEFAULT_TIME_IN_FORCE),
            or_default(&self.stop_price, ""),
        ]
    }
}

#[derive(Clone)]
pub struct TradingClient {
    executor: Arc<dyn BoundaryExecutor>,
}

impl TradingClient {
    pub fn new(executor: Arc<dyn BoundaryExecutor>) -> Self {
        Self { executor }
    }

    pub async fn get_trading_pairs(
        &self,
        symbols: &[String],
        ctx: &CallContext,
    ) -> Result<Value, BridgeError> {
        let spec = BoundaryCallSpec::new(OperationGroup::Trading, "get_trading_pairs")
            .with_json_arg(&json!(symbols));
        self.executor.invoke(spec, ctx).await
    }

    pub async fn place_order(
        &self,
        order: &OrderRequest,
        ctx: &CallContext,
    ) -> Result<Value, BridgeError> {
        let spec = order
            .to_args()
            .into_iter()
            .fold(
                BoundaryCallSpec::new(OperationGroup::Trading, "place_order"),
                |spec, arg| spec.with_arg(arg),
            );
        self.executor.invoke(spec, ctx).await
    }

    /// Orders, optionally filtered by state. `None` lists every order.
    pub async fn get_orders(
        &self,
        status: Option<&str>,
        ctx: &CallContext,
    ) -> Result<Value, BridgeError> {
        let spec = BoundaryCallSpec::new(OperationGroup::Trading, "get_orders")
            .with_arg(status.unwrap_or_default());
        self.executor.invoke(spec, ctx).await
    }

    pub async fn get_order(&self, order_id: &str, ctx: &CallContext) -> Result<Value, BridgeError> {
        let spec = BoundaryCallSpec::new(OperationGroup::Trading, "get_order").with_arg(order_id);
        self.executor.invoke(spec, ctx).await
    }

    pub async fn cancel_order(
        &self,
        order_id: &str,
        ctx: &CallContext,
    ) -> Result<Value, BridgeError> {
        let spec =
            BoundaryCallSpec::new(OperationGroup::Trading, "cancel_order").with_arg(order_id);
        self.executor.invoke(spec, ctx).await
    }
}

pub fn get_trading_pairs_definition() -> ToolDefinition {
    ToolDefinition::new(
        "getTradingPairs",
        "List tradable crypto pairs and their order size limits",
        RiskLevel::Low,
    )
    .with_parameter(
        ToolParameter::new(
            "symbols",
            "Trading pairs to look up (e.g. [\"BTC-USD\"]); empty for all",
            false,
        )
        .array_of(ParamType::String)
        .with_default(json!([])),
    )
    .with_returns("Paginated list of trading pairs")
}

pub fn place_order_definition() -> ToolDefinition {
    ToolDefinition::new(
        "placeOrder",
        "Place a crypto order (market, limit, stop_loss or stop_limit)",
        RiskLevel::High,
    )
    .with_parameter(ToolParameter::new("symbol", "Trading pair, e.g. BTC-USD", true))
    .with_parameter(ToolParameter::new("side", "Order side", true).one_of(["buy", "sell"]))
    .with_parameter(ToolParameter::new(
        "quantity",
        "Asset quantity as a decimal string, e.g. \"0.1\"",
        true,
    ))
    .with_parameter(
        ToolParameter::new("type", "Order type", false)
            .one_of(["market", "limit", "stop_loss", "stop_limit"])
            .with_default(DEFAULT_ORDER_TYPE),
    )
    .with_parameter(
        ToolParameter::new("price", "Limit price (limit orders only)", false).with_default(""),
    )
    .with_parameter(
        ToolParameter::new("time_in_force", "Time in force", false)
            .one_of(["gtc", "ioc", "fok"])
            .with_default(DEFAULT_TIME_IN_FORCE),
    )
    .with_parameter(
        ToolParameter::new("stop_price", "Stop trigger price (stop orders only)", false)
            .with_default(""),
    )
    .with_returns("The created order")
}

pub fn get_orders_definition() -> ToolDefinition {
    ToolDefinition::new(
        "getOrders",
        "List orders, optionally filtered by state",
        RiskLevel::Low,
    )
    .with_parameter(
        ToolParameter::new(
            "status",
            "Order state filter (e.g. open, filled, canceled); empty for all",
            false,
        )
        .with_default(""),
    )
    .with_returns("Paginated list of orders")
}

pub fn get_order_definition() -> ToolDefinition {
    ToolDefinition::new("getOrder", "Get a single order by ID", RiskLevel::Low)
        .with_parameter(ToolParameter::new("order_id", "Order ID", true))
        .with_returns("Order details")
}

pub fn cancel_order_definition() -> ToolDefinition {
    ToolDefinition::new("cancelOrder", "Cancel an open order by ID", RiskLevel::High)
        .with_parameter(ToolParameter::new("order_id", "Order ID", true))
        .with_returns("Cancellation acknowledgement")
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::clients::testing::RecordingExecutor;

    #[test]
    fn test_order_defaults() {
        let order = OrderRequest::new("BTC-USD", "buy", "0.1");
        assert_eq!(
            order.to_args(),
            vec!["BTC-USD", "buy", "0.1", "market", "", "gtc", ""]
        );
    }

    #[test]
    fn test_empty_optional_fields_count_as_omitted() {
        let order = OrderRequest {
            order_type: Some(String::new()),
            time_in_force: Some(String::new()),
            ..OrderRequest::new("ETH-USD", "sell", "2")
        };
        let args = order.to_args();
        assert_eq!(args[3], "market");
        assert_eq!(args[5], "gtc");
    }

    #[test]
    fn test_limit_order_args() {
        let order = OrderRequest {
            order_type: Some("limit".into()),
            price: Some("65000".into()),
            time_in_force: Some("ioc".into()),
            ..OrderRequest::new("BTC-USD", "buy", "0.01")
        };
        assert_eq!(
            order.to_args(),
            vec!["BTC-USD", "buy", "0.01", "limit", "65000", "ioc", ""]
        );
    }

    #[tokio::test]
    async fn test_place_order_spec() {
        let executor = Arc::new(RecordingExecutor::returning(json!({"id": "ord1"})));
        let client = TradingClient::new(executor.clone());

        let result = client
            .place_order(&OrderRequest::new("BTC-USD", "buy", "0.1"), &CallContext::default())
            .await
            .unwrap();

        assert_eq!(result["id"], "ord1");
        let call = executor.last_call();
        assert_eq!(call.qualified_name(), "trading.place_order");
        assert_eq!(call.args.len(), 7);
    }

    #[tokio::test]
    async fn test_get_orders_without_filter_sends_empty_sentinel() {
        let executor = Arc::new(RecordingExecutor::returning(json!({"results": []})));
        let client = TradingClient::new(executor.clone());

        client.get_orders(None, &CallContext::default()).await.unwrap();
        assert_eq!(executor.last_call().to_argv(), vec!["trading", "get_orders", ""]);
    }

    #[tokio::test]
    async fn test_cancel_order_spec() {
        let executor = Arc::new(RecordingExecutor::returning(json!({})));
        let client = TradingClient::new(executor.clone());

        client.cancel_order("ord1", &CallContext::default()).await.unwrap();
        assert_eq!(
            executor.last_call().to_argv(),
            vec!["trading", "cancel_order", "ord1"]
        );
    }
}
