//! Dispatch use case.
//!
//! Turns one JSON-RPC request into at most one response. The dispatcher is
//! stateless per message: the only shared state is the read-only tool
//! catalog, the credential, and the Domain Client handles.
//!
//! For `tools/execute` the checks run in this order:
//! 1. tool lookup (unknown name → `-32601`)
//! 2. argument validation (`-32602`)
//! 3. credential guard (`-32603`)
//! 4. the Domain Client call (boundary failures → `-32000`)

use crate::catalog::{BrokerTool, ToolCatalog};
use crate::clients::{BrokerClients, OrderRequest};
use crate::ports::boundary_executor::{BoundaryExecutor, CallContext};
use crate::ports::tool_schema::ToolSchemaPort;
use rhmcp_domain::tool::entities::{ToolCall, ToolDefinition};
use rhmcp_domain::tool::traits::{DefaultToolValidator, ToolValidator};
use rhmcp_domain::{
    API_KEY_ENV, BridgeError, Credential, JsonRpcRequest, JsonRpcResponse, ToolCallParams,
    decode_message,
};
use serde_json::{Value, json};
use std::sync::Arc;
use tracing::{debug, info, warn};

/// MCP protocol revision advertised by `initialize`.
pub const PROTOCOL_VERSION: &str = "2024-11-05";

/// Server name advertised by `initialize`.
pub const SERVER_NAME: &str = "robinhood-mcp";

/// Methods the dispatcher answers.
pub mod methods {
    pub const INITIALIZE: &str = "initialize";
    pub const TOOLS_LIST: &str = "tools/list";
    pub const TOOLS_EXECUTE: &str = "tools/execute";
    pub const TOOLS_CALL: &str = "tools/call";
    pub const PING: &str = "ping";
}

/// How a successful tool payload is returned.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum ResultShape {
    /// Payload verbatim (`tools/execute`)
    Raw,
    /// MCP text content envelope (`tools/call`)
    Content,
}

/// Routes protocol requests to Domain Client operations.
pub struct Dispatcher {
    catalog: Arc<ToolCatalog>,
    clients: BrokerClients,
    credential: Arc<Credential>,
    validator: DefaultToolValidator,
    /// `tools/list` payload, rendered once
    tools: Arc<Vec<Value>>,
}

impl Clone for Dispatcher {
    fn clone(&self) -> Self {
        Self {
            catalog: self.catalog.clone(),
            clients: self.clients.clone(),
            credential: self.credential.clone(),
            validator: self.validator.clone(),
            tools: self.tools.clone(),
        }
    }
}

impl Dispatcher {
    pub fn new(
        catalog: Arc<ToolCatalog>,
        executor: Arc<dyn BoundaryExecutor>,
        credential: Arc<Credential>,
        tool_schema: &dyn ToolSchemaPort,
    ) -> Self {
        let tools = Arc::new(tool_schema.all_tools_schema(catalog.spec()));
        Self {
            catalog,
            clients: BrokerClients::new(executor),
            credential,
            validator: DefaultToolValidator,
            tools,
        }
    }

    /// The catalog snapshot returned by `tools/list`.
    pub fn tools(&self) -> &[Value] {
        &self.tools
    }

    /// Decode and handle one raw frame.
    ///
    /// Returns `None` for notifications. Undecodable frames always get an
    /// error response.
    pub async fn handle_frame(&self, raw: &str, ctx: &CallContext) -> Option<JsonRpcResponse> {
        match decode_message(raw) {
            Ok(request) => self.handle(request, ctx).await,
            Err(frame_error) => {
                warn!("Rejecting frame: {}", frame_error.error);
                Some(frame_error.into_response())
            }
        }
    }

    /// Handle one decoded request.
    pub async fn handle(&self, request: JsonRpcRequest, ctx: &CallContext) -> Option<JsonRpcResponse> {
        if request.is_notification() {
            debug!("Notification received: {}", request.method);
            return None;
        }

        let JsonRpcRequest {
            id, method, params, ..
        } = request;

        debug!("Request {:?}: {}", id, method);
        let result = self.route(&method, params, ctx).await;
        if let Err(e) = &result {
            warn!("Request {:?} ({}) failed: {}", id, method, e);
        }
        Some(JsonRpcResponse::from_result(id, result))
    }

    async fn route(
        &self,
        method: &str,
        params: Option<Value>,
        ctx: &CallContext,
    ) -> Result<Value, BridgeError> {
        match method {
            methods::INITIALIZE => Ok(self.initialize_result()),
            methods::TOOLS_LIST => Ok(json!({ "tools": self.tools.as_slice() })),
            methods::TOOLS_EXECUTE => self.execute(params, ctx, ResultShape::Raw).await,
            methods::TOOLS_CALL => self.execute(params, ctx, ResultShape::Content).await,
            methods::PING => Ok(json!({})),
            other => Err(BridgeError::MethodNotFound(other.to_string())),
        }
    }

    fn initialize_result(&self) -> Value {
        json!({
            "protocolVersion": PROTOCOL_VERSION,
            "capabilities": {
                "tools": { "listChanged": false }
            },
            "serverInfo": {
                "name": SERVER_NAME,
                "version": env!("CARGO_PKG_VERSION"),
            }
        })
    }

    async fn execute(
        &self,
        params: Option<Value>,
        ctx: &CallContext,
        shape: ResultShape,
    ) -> Result<Value, BridgeError> {
        let params = params
            .ok_or_else(|| BridgeError::InvalidParams("missing params".to_string()))?;
        let ToolCallParams { name, arguments } = serde_json::from_value(params)
            .map_err(|e| BridgeError::InvalidParams(e.to_string()))?;

        let (tool, definition) = self
            .catalog
            .resolve(&name)
            .ok_or_else(|| BridgeError::ToolNotFound(name.clone()))?;

        let call = ToolCall::new(definition.name.clone())
            .with_arguments(arguments.unwrap_or_default());
        self.validator
            .validate(&call, definition)
            .map_err(BridgeError::InvalidParams)?;

        self.check_credentials(ctx)?;

        let call = with_defaults(call, definition);
        info!("Executing tool: {}", definition.name);
        let payload = self.run(tool, &call, ctx).await?;

        Ok(match shape {
            ResultShape::Raw => payload,
            ResultShape::Content => json!({
                "content": [{ "type": "text", "text": payload.to_string() }],
                "isError": false,
            }),
        })
    }

    /// An API key (configured or transport-injected) and a signing key are
    /// both needed before anything crosses the boundary.
    fn check_credentials(&self, ctx: &CallContext) -> Result<(), BridgeError> {
        if ctx.api_key.is_none() && !self.credential.has_api_key() {
            return Err(BridgeError::missing_setting(API_KEY_ENV));
        }
        self.credential.require_signing_key()?;
        Ok(())
    }

    async fn run(
        &self,
        tool: BrokerTool,
        call: &ToolCall,
        ctx: &CallContext,
    ) -> Result<Value, BridgeError> {
        let c = &self.clients;
        match tool {
            BrokerTool::GetAuthStatus => c.auth.check_auth_status(ctx).await,
            BrokerTool::GetAccount => c.account.get_account(ctx).await,
            BrokerTool::GetHoldings => {
                c.account
                    .get_holdings(&string_list(call, "asset_codes"), ctx)
                    .await
            }
            BrokerTool::GetBestPrice => {
                c.market_data
                    .get_best_bid_ask(&string_list(call, "symbols"), ctx)
                    .await
            }
            BrokerTool::GetEstimatedPrice => {
                c.market_data
                    .get_estimated_price(
                        required(call, "symbol")?,
                        required(call, "side")?,
                        required(call, "quantity")?,
                        ctx,
                    )
                    .await
            }
            BrokerTool::GetTradingPairs => {
                c.trading
                    .get_trading_pairs(&string_list(call, "symbols"), ctx)
                    .await
            }
            BrokerTool::PlaceOrder => {
                let order = OrderRequest {
                    order_type: optional(call, "type"),
                    price: optional(call, "price"),
                    time_in_force: optional(call, "time_in_force"),
                    stop_price: optional(call, "stop_price"),
                    ..OrderRequest::new(
                        required(call, "symbol")?,
                        required(call, "side")?,
                        required(call, "quantity")?,
                    )
                };
                c.trading.place_order(&order, ctx).await
            }
            BrokerTool::GetOrders => {
                let status = call.get_string("status").filter(|s| !s.is_empty());
                c.trading.get_orders(status, ctx).await
            }
            BrokerTool::GetOrder => c.trading.get_order(required(call, "order_id")?, ctx).await,
            BrokerTool::CancelOrder => {
                c.trading
                    .cancel_order(required(call, "order_id")?, ctx)
                    .await
            }
        }
    }
}

/// Fill omitted (or `null`) arguments from the definition's declared defaults.
fn with_defaults(mut call: ToolCall, definition: &ToolDefinition) -> ToolCall {
    for param in &definition.parameters {
        let Some(default) = &param.default else {
            continue;
        };
        let missing = call.arguments.get(&param.name).is_none_or(Value::is_null);
        if missing {
            call.arguments.insert(param.name.clone(), default.clone());
        }
    }
    call
}

fn required<'a>(call: &'a ToolCall, name: &str) -> Result<&'a str, BridgeError> {
    call.require_string(name).map_err(BridgeError::InvalidParams)
}

fn optional(call: &ToolCall, name: &str) -> Option<String> {
    call.get_string(name).map(str::to_string)
}

fn string_list(call: &ToolCall, name: &str) -> Vec<String> {
    call.get_string_list(name).unwrap_or_default()
}
