//! Domain Clients
//!
//! Four capability groups with the same shape: turn typed arguments into one
//! [`BoundaryCallSpec`](rhmcp_domain::BoundaryCallSpec), hand it to the
//! [`BoundaryExecutor`], and return the parsed payload unmodified.
//! Executor errors are never caught here.

pub mod account;
pub mod auth;
pub mod market_data;
pub mod trading;

pub use account::AccountClient;
pub use auth::AuthClient;
pub use market_data::MarketDataClient;
pub use trading::{OrderRequest, TradingClient};

use crate::ports::boundary_executor::BoundaryExecutor;
use std::sync::Arc;

/// All four clients sharing one executor handle.
#[derive(Clone)]
pub struct BrokerClients {
    pub auth: AuthClient,
    pub account: AccountClient,
    pub market_data: MarketDataClient,
    pub trading: TradingClient,
}

impl BrokerClients {
    pub fn new(executor: Arc<dyn BoundaryExecutor>) -> Self {
        Self {
            auth: AuthClient::new(executor.clone()),
            account: AccountClient::new(executor.clone()),
            market_data: MarketDataClient::new(executor.clone()),
            trading: TradingClient::new(executor),
        }
    }
}
