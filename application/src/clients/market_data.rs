//! Market data client: best bid/ask and estimated execution price.

use crate::ports::boundary_executor::{BoundaryExecutor, CallContext};
use rhmcp_domain::tool::entities::{ParamType, RiskLevel, ToolDefinition, ToolParameter};
use rhmcp_domain::{BoundaryCallSpec, BridgeError, OperationGroup};
use serde_json::{Value, json};
use std::sync::Arc;

#[derive(Clone)]
pub struct MarketDataClient {
    executor: Arc<dyn BoundaryExecutor>,
}

impl MarketDataClient {
    pub fn new(executor: Arc<dyn BoundaryExecutor>) -> Self {
        Self { executor }
    }

    pub async fn get_best_bid_ask(
        &self,
        symbols: &[String],
        ctx: &CallContext,
    ) -> Result<Value, BridgeError> {
        let spec = BoundaryCallSpec::new(OperationGroup::MarketData, "get_best_bid_ask")
            .with_json_arg(&json!(symbols));
        self.executor.invoke(spec, ctx).await
    }

    /// `quantity` stays textual; the broker parses decimals itself.
    pub async fn get_estimated_price(
        &self,
        symbol: &str,
        side: &str,
        quantity: &str,
        ctx: &CallContext,
    ) -> Result<Value, BridgeError> {
        let spec = BoundaryCallSpec::new(OperationGroup::MarketData, "get_estimated_price")
            .with_arg(symbol)
            .with_arg(side)
            .with_arg(quantity);
        self.executor.invoke(spec, ctx).await
    }
}

pub fn get_best_price_definition() -> ToolDefinition {
    ToolDefinition::new(
        "getBestPrice",
        "Get the best bid and ask for one or more trading pairs",
        RiskLevel::Low,
    )
    .with_parameter(
        ToolParameter::new(
            "symbols",
            "Trading pairs (e.g. [\"BTC-USD\"]); empty for all supported pairs",
            false,
        )
        .array_of(ParamType::String)
        .with_default(json!([])),
    )
    .with_returns("Best bid/ask quote per symbol")
}

pub fn get_estimated_price_definition() -> ToolDefinition {
    ToolDefinition::new(
        "getEstimatedPrice",
        "Estimate the execution price for a quantity on one side of the book",
        RiskLevel::Low,
    )
    .with_parameter(ToolParameter::new("symbol", "Trading pair, e.g. BTC-USD", true))
    .with_parameter(ToolParameter::new("side", "Trade side: buy or sell", true))
    .with_parameter(ToolParameter::new(
        "quantity",
        "Quantity, or comma-separated quantities (e.g. \"0.1,1\")",
        true,
    ))
    .with_returns("Estimated price per requested quantity")
}
