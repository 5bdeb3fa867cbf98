//! Boundary worker: the child side of the boundary.
//!
//! Parses `<group> <operation> [args...]`, turns it into one signed REST
//! call, and yields the JSON payload. The caller prints that payload on
//! stdout; failures are reported on stderr with a non-zero exit status.

use crate::config::FileConfig;
use crate::signing::CredentialSigner;
use crate::upstream::{RestClient, UpstreamError, UpstreamRequest};
use reqwest::Method;
use rhmcp_application::OrderRequest;
use rhmcp_domain::OperationGroup;
use serde_json::{Value, json};
use std::time::Duration;
use thiserror::Error;
use tracing::{debug, warn};

const ACCOUNTS_PATH: &str = "/api/v1/crypto/trading/accounts/";
const HOLDINGS_PATH: &str = "/api/v1/crypto/trading/holdings/";
const BEST_BID_ASK_PATH: &str = "/api/v1/crypto/marketdata/best_bid_ask/";
const ESTIMATED_PRICE_PATH: &str = "/api/v1/crypto/marketdata/estimated_price/";
const TRADING_PAIRS_PATH: &str = "/api/v1/crypto/trading/trading_pairs/";
const ORDERS_PATH: &str = "/api/v1/crypto/trading/orders/";

/// Worker failures, printed to stderr by the caller
#[derive(Debug, Error)]
pub enum WorkerError {
    #[error("Unknown module: {0}")]
    UnknownGroup(String),

    #[error("Unknown {group} function: {operation}")]
    UnknownOperation {
        group: OperationGroup,
        operation: String,
    },

    #[error("Invalid arguments for {operation}: missing {name}")]
    MissingArgument {
        operation: &'static str,
        name: &'static str,
    },

    #[error("Invalid arguments for {operation}: {name} is not valid JSON ({message})")]
    InvalidJson {
        operation: &'static str,
        name: &'static str,
        message: String,
    },

    #[error("Invalid arguments for {operation}: {name} must contain only letters, digits, '-' or '_'")]
    InvalidIdentifier {
        operation: &'static str,
        name: &'static str,
    },

    #[error("Invalid HTTP method: {0}")]
    InvalidMethod(String),

    #[error(transparent)]
    Upstream(#[from] UpstreamError),
}

/// One parsed worker invocation.
#[derive(Debug, Clone, PartialEq)]
pub enum WorkerOperation {
    CheckAuthStatus,
    MakeApiRequest {
        method: Method,
        path: String,
        body: Option<Value>,
        params: Option<Value>,
    },
    GetAccount,
    GetHoldings { asset_codes: Vec<String> },
    GetBestBidAsk { symbols: Vec<String> },
    GetEstimatedPrice { symbol: String, side: String, quantity: String },
    GetTradingPairs { symbols: Vec<String> },
    PlaceOrder(OrderRequest),
    GetOrders { status: Option<String> },
    GetOrder { order_id: String },
    CancelOrder { order_id: String },
}

/// Positional argument reader for one operation.
struct Args<'a> {
    operation: &'static str,
    args: &'a [String],
}

impl<'a> Args<'a> {
    fn required(&self, index: usize, name: &'static str) -> Result<String, WorkerError> {
        self.args
            .get(index)
            .filter(|s| !s.is_empty())
            .cloned()
            .ok_or(WorkerError::MissingArgument {
                operation: self.operation,
                name,
            })
    }

    /// A required value interpolated into a URL path as one segment.
    fn path_segment(&self, index: usize, name: &'static str) -> Result<String, WorkerError> {
        let value = self.required(index, name)?;
        if value
            .chars()
            .all(|c| c.is_ascii_alphanumeric() || c == '-' || c == '_')
        {
            Ok(value)
        } else {
            Err(WorkerError::InvalidIdentifier {
                operation: self.operation,
                name,
            })
        }
    }

    /// Absent and empty both mean "not set".
    fn optional(&self, index: usize) -> Option<String> {
        self.args.get(index).filter(|s| !s.is_empty()).cloned()
    }

    fn json(&self, index: usize, name: &'static str) -> Result<Option<Value>, WorkerError> {
        self.optional(index)
            .map(|raw| {
                serde_json::from_str(&raw).map_err(|e| WorkerError::InvalidJson {
                    operation: self.operation,
                    name,
                    message: e.to_string(),
                })
            })
            .transpose()
    }

    /// A JSON array of strings, a bare string, or nothing.
    fn string_list(&self, index: usize, name: &'static str) -> Result<Vec<String>, WorkerError> {
        Ok(match self.json(index, name)? {
            Some(Value::Array(items)) => items
                .into_iter()
                .filter_map(|v| v.as_str().map(str::to_string))
                .collect(),
            Some(Value::String(s)) => vec![s],
            _ => Vec::new(),
        })
    }
}

impl WorkerOperation {
    pub fn parse(group: &str, operation: &str, args: &[String]) -> Result<Self, WorkerError> {
        let group: OperationGroup = group
            .parse()
            .map_err(|_| WorkerError::UnknownGroup(group.to_string()))?;
        let unknown = || WorkerError::UnknownOperation {
            group,
            operation: operation.to_string(),
        };

        let op = match (group, operation) {
            (OperationGroup::Auth, "check_auth_status") => WorkerOperation::CheckAuthStatus,
            (OperationGroup::Auth, "make_api_request") => {
                let a = Args { operation: "make_api_request", args };
                let method = a.required(0, "method")?.to_ascii_uppercase();
                let method = Method::from_bytes(method.as_bytes())
                    .map_err(|_| WorkerError::InvalidMethod(method.clone()))?;
                WorkerOperation::MakeApiRequest {
                    method,
                    path: a.required(1, "path")?,
                    body: a.json(2, "body")?,
                    params: a.json(3, "params")?,
                }
            }
            (OperationGroup::Account, "get_account") => WorkerOperation::GetAccount,
            (OperationGroup::Account, "get_holdings") => {
                let a = Args { operation: "get_holdings", args };
                WorkerOperation::GetHoldings {
                    asset_codes: a.string_list(0, "asset_codes")?,
                }
            }
            (OperationGroup::MarketData, "get_best_bid_ask") => {
                let a = Args { operation: "get_best_bid_ask", args };
                WorkerOperation::GetBestBidAsk {
                    symbols: a.string_list(0, "symbols")?,
                }
            }
            (OperationGroup::MarketData, "get_estimated_price") => {
                let a = Args { operation: "get_estimated_price", args };
                WorkerOperation::GetEstimatedPrice {
                    symbol: a.required(0, "symbol")?,
                    side: a.required(1, "side")?,
                    quantity: a.required(2, "quantity")?,
                }
            }
            (OperationGroup::Trading, "get_trading_pairs") => {
                let a = Args { operation: "get_trading_pairs", args };
                WorkerOperation::GetTradingPairs {
                    symbols: a.string_list(0, "symbols")?,
                }
            }
            (OperationGroup::Trading, "place_order") => {
                let a = Args { operation: "place_order", args };
                WorkerOperation::PlaceOrder(OrderRequest {
                    order_type: a.optional(3),
                    price: a.optional(4),
                    time_in_force: a.optional(5),
                    stop_price: a.optional(6),
                    ..OrderRequest::new(
                        a.required(0, "symbol")?,
                        a.required(1, "side")?,
                        a.required(2, "quantity")?,
                    )
                })
            }
            (OperationGroup::Trading, "get_orders") => {
                let a = Args { operation: "get_orders", args };
                WorkerOperation::GetOrders {
                    status: a.optional(0),
                }
            }
            (OperationGroup::Trading, "get_order") => {
                let a = Args { operation: "get_order", args };
                WorkerOperation::GetOrder {
                    order_id: a.path_segment(0, "order_id")?,
                }
            }
            (OperationGroup::Trading, "cancel_order") => {
                let a = Args { operation: "cancel_order", args };
                WorkerOperation::CancelOrder {
                    order_id: a.path_segment(0, "order_id")?,
                }
            }
            _ => return Err(unknown()),
        };
        Ok(op)
    }

    /// The upstream request this operation performs.
    pub fn to_request(&self) -> UpstreamRequest {
        match self {
            WorkerOperation::CheckAuthStatus | WorkerOperation::GetAccount => {
                UpstreamRequest::get(ACCOUNTS_PATH)
            }
            WorkerOperation::MakeApiRequest {
                method,
                path,
                body,
                params,
            } => {
                let query = match params {
                    Some(Value::Object(map)) => map
                        .iter()
                        .map(|(k, v)| (k.clone(), query_value(v)))
                        .collect(),
                    _ => Vec::new(),
                };
                UpstreamRequest {
                    method: method.clone(),
                    path: path.clone(),
                    query,
                    body: body.clone(),
                }
            }
            WorkerOperation::GetHoldings { asset_codes } => {
                UpstreamRequest::get(HOLDINGS_PATH).with_list_query("asset_code", asset_codes)
            }
            WorkerOperation::GetBestBidAsk { symbols } => {
                UpstreamRequest::get(BEST_BID_ASK_PATH).with_list_query("symbol", symbols)
            }
            WorkerOperation::GetEstimatedPrice {
                symbol,
                side,
                quantity,
            } => UpstreamRequest::get(ESTIMATED_PRICE_PATH)
                .with_query("symbol", symbol.as_str())
                .with_query("side", side.as_str())
                .with_query("quantity", quantity.as_str()),
            WorkerOperation::GetTradingPairs { symbols } => {
                UpstreamRequest::get(TRADING_PAIRS_PATH).with_list_query("symbol", symbols)
            }
            WorkerOperation::PlaceOrder(order) => {
                UpstreamRequest::post(ORDERS_PATH, Some(order_body(order)))
            }
            WorkerOperation::GetOrders { status } => match status {
                Some(status) => UpstreamRequest::get(ORDERS_PATH).with_query("status", status.as_str()),
                None => UpstreamRequest::get(ORDERS_PATH),
            },
            WorkerOperation::GetOrder { order_id } => {
                UpstreamRequest::get(format!("{}{}/", ORDERS_PATH, order_id))
            }
            WorkerOperation::CancelOrder { order_id } => {
                UpstreamRequest::post(format!("{}{}/cancel/", ORDERS_PATH, order_id), None)
            }
        }
    }

    /// Execute against the broker.
    ///
    /// The auth check never fails: upstream errors become a
    /// `{status: "error"}` payload.
    pub async fn run(&self, client: &RestClient) -> Result<Value, WorkerError> {
        let request = self.to_request();
        match self {
            WorkerOperation::CheckAuthStatus => {
                let (status, message) = match client.send(&request).await {
                    Ok(_) => ("authenticated", "Authentication successful".to_string()),
                    Err(e) => {
                        warn!("Auth check failed: {}", e);
                        ("error", e.to_string())
                    }
                };
                Ok(json!({
                    "status": status,
                    "message": message,
                    "timestamp": chrono::Utc::now().timestamp(),
                }))
            }
            _ => Ok(client.send(&request).await?),
        }
    }
}

fn query_value(value: &Value) -> String {
    match value {
        Value::String(s) => s.clone(),
        Value::Array(items) => items
            .iter()
            .map(query_value)
            .collect::<Vec<_>>()
            .join(","),
        other => other.to_string(),
    }
}

/// Order body: `price` only for limit orders, `stop_price` only when set.
pub fn order_body(order: &OrderRequest) -> Value {
    let args = order.to_args();
    let (order_type, price, time_in_force, stop_price) = (&args[3], &args[4], &args[5], &args[6]);

    let mut body = json!({
        "symbol": order.symbol,
        "side": order.side,
        "quantity": order.quantity,
        "type": order_type,
        "time_in_force": time_in_force,
    });
    if order_type == "limit" && !price.is_empty() {
        body["price"] = json!(price);
    }
    if !stop_price.is_empty() {
        body["stop_price"] = json!(stop_price);
    }
    body
}

/// Run one worker invocation end to end with settings from `config`.
pub async fn run_worker(
    config: &FileConfig,
    group: &str,
    operation: &str,
    args: &[String],
) -> Result<Value, WorkerError> {
    let op = WorkerOperation::parse(group, operation, args)?;
    debug!("Worker operation: {:?}", op);

    let signer = CredentialSigner::from_credential(&config.credentials.to_credential())
        .map_err(UpstreamError::from)?;
    let client = RestClient::new(
        &config.upstream.base_url,
        Duration::from_secs(config.upstream.timeout_seconds),
        signer,
    )?;
    op.run(&client).await
}
