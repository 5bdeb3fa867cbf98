//! Application layer for robinhood-mcp
//!
//! This crate contains the Domain Clients, the tool catalog, the dispatcher
//! use case, and the ports infrastructure adapters implement.
//! It depends only on the domain layer.

pub mod catalog;
pub mod clients;
pub mod ports;
pub mod use_cases;

// Re-export commonly used types
pub use catalog::{BrokerTool, TOOL_ALIASES, ToolCatalog};
pub use clients::{
    AccountClient, AuthClient, BrokerClients, MarketDataClient, OrderRequest, TradingClient,
};
pub use ports::{
    boundary_executor::{BoundaryExecutor, CallContext},
    tool_schema::ToolSchemaPort,
};
pub use use_cases::dispatch::{Dispatcher, PROTOCOL_VERSION, SERVER_NAME};
