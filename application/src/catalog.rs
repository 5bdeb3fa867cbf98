//! Broker tool catalog
//!
//! A closed set of tools ([`BrokerTool`]) mapped to their definitions. The
//! catalog is built once at startup, rejecting duplicate names and alias
//! collisions, and is read-only afterwards. Unknown tool names are a lookup
//! miss, not a fallthrough.

use crate::clients::{account, auth, market_data, trading};
use rhmcp_domain::tool::entities::{CatalogError, ToolDefinition, ToolSpec};

/// Alternate names accepted for a canonical tool.
pub const TOOL_ALIASES: &[(&str, &str)] = &[("getCryptoQuote", "getBestPrice")];

/// Every tool the bridge exposes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum BrokerTool {
    GetAuthStatus,
    GetAccount,
    GetHoldings,
    GetBestPrice,
    GetEstimatedPrice,
    GetTradingPairs,
    PlaceOrder,
    GetOrders,
    GetOrder,
    CancelOrder,
}

impl BrokerTool {
    pub const ALL: [BrokerTool; 10] = [
        BrokerTool::GetAuthStatus,
        BrokerTool::GetAccount,
        BrokerTool::GetHoldings,
        BrokerTool::GetBestPrice,
        BrokerTool::GetEstimatedPrice,
        BrokerTool::GetTradingPairs,
        BrokerTool::PlaceOrder,
        BrokerTool::GetOrders,
        BrokerTool::GetOrder,
        BrokerTool::CancelOrder,
    ];

    pub fn name(&self) -> &'static str {
        match self {
            BrokerTool::GetAuthStatus => "getAuthStatus",
            BrokerTool::GetAccount => "getAccount",
            BrokerTool::GetHoldings => "getHoldings",
            BrokerTool::GetBestPrice => "getBestPrice",
            BrokerTool::GetEstimatedPrice => "getEstimatedPrice",
            BrokerTool::GetTradingPairs => "getTradingPairs",
            BrokerTool::PlaceOrder => "placeOrder",
            BrokerTool::GetOrders => "getOrders",
            BrokerTool::GetOrder => "getOrder",
            BrokerTool::CancelOrder => "cancelOrder",
        }
    }

    /// Canonical name lookup (aliases are resolved by [`ToolCatalog`]).
    pub fn from_name(name: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|t| t.name() == name)
    }

    pub fn definition(&self) -> ToolDefinition {
        match self {
            BrokerTool::GetAuthStatus => auth::auth_status_definition(),
            BrokerTool::GetAccount => account::get_account_definition(),
            BrokerTool::GetHoldings => account::get_holdings_definition(),
            BrokerTool::GetBestPrice => market_data::get_best_price_definition(),
            BrokerTool::GetEstimatedPrice => market_data::get_estimated_price_definition(),
            BrokerTool::GetTradingPairs => trading::get_trading_pairs_definition(),
            BrokerTool::PlaceOrder => trading::place_order_definition(),
            BrokerTool::GetOrders => trading::get_orders_definition(),
            BrokerTool::GetOrder => trading::get_order_definition(),
            BrokerTool::CancelOrder => trading::cancel_order_definition(),
        }
    }
}

/// The process-wide tool catalog.
#[derive(Debug, Clone)]
pub struct ToolCatalog {
    spec: ToolSpec,
}

impl ToolCatalog {
    /// Register every [`BrokerTool`] plus [`TOOL_ALIASES`].
    pub fn build() -> Result<Self, CatalogError> {
        let spec = BrokerTool::ALL
            .iter()
            .try_fold(ToolSpec::new(), |spec, tool| spec.register(tool.definition()))?;
        let spec = TOOL_ALIASES
            .iter()
            .try_fold(spec, |spec, (alias, canonical)| {
                spec.register_alias(*alias, *canonical)
            })?;
        Ok(Self { spec })
    }

    pub fn spec(&self) -> &ToolSpec {
        &self.spec
    }

    /// Resolve a canonical name or alias to its tool and definition.
    pub fn resolve(&self, name: &str) -> Option<(BrokerTool, &ToolDefinition)> {
        let canonical = self.spec.resolve(name)?;
        let tool = BrokerTool::from_name(canonical)?;
        let definition = self.spec.get(canonical)?;
        Some((tool, definition))
    }

    pub fn len(&self) -> usize {
        self.spec.len()
    }

    pub fn is_empty(&self) -> bool {
        self.spec.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_catalog_builds() {
        let catalog = ToolCatalog::build().unwrap();
        assert_eq!(catalog.len(), BrokerTool::ALL.len());

        for tool in BrokerTool::ALL {
            let (resolved, def) = catalog.resolve(tool.name()).unwrap();
            assert_eq!(resolved, tool);
            assert_eq!(def.name, tool.name());
        }
    }

    #[test]
    fn test_alias_resolves_to_canonical() {
        let catalog = ToolCatalog::build().unwrap();
        let (tool, def) = catalog.resolve("getCryptoQuote").unwrap();
        assert_eq!(tool, BrokerTool::GetBestPrice);
        assert_eq!(def.name, "getBestPrice");
    }

    #[test]
    fn test_unknown_tool_is_a_miss() {
        let catalog = ToolCatalog::build().unwrap();
        assert!(catalog.resolve("transferFunds").is_none());
        assert!(BrokerTool::from_name("getCryptoQuote").is_none());
    }

    #[test]
    fn test_mutating_tools_are_high_risk() {
        for tool in [BrokerTool::PlaceOrder, BrokerTool::CancelOrder] {
            assert!(!tool.definition().risk_level.is_read_only());
        }
        assert!(BrokerTool::GetOrders.definition().risk_level.is_read_only());
    }

    #[test]
    fn test_place_order_defaults_declared() {
        let def = BrokerTool::PlaceOrder.definition();
        assert_eq!(def.parameter("type").unwrap().default.as_ref().unwrap(), "market");
        assert_eq!(
            def.parameter("time_in_force").unwrap().default.as_ref().unwrap(),
            "gtc"
        );
        assert_eq!(def.required_parameters().count(), 3);
    }
}
