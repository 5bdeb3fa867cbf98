//! Upstream REST settings (`[upstream]` section)

use serde::{Deserialize, Serialize};

pub const DEFAULT_BASE_URL: &str = "https://trading.robinhood.com";

/// Raw upstream configuration from TOML
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct FileUpstreamConfig {
    /// Broker API base URL
    pub base_url: String,
    /// Per-request HTTP timeout in seconds
    pub timeout_seconds: u64,
}

impl Default for FileUpstreamConfig {
    fn default() -> Self {
        Self {
            base_url: DEFAULT_BASE_URL.to_string(),
            timeout_seconds: 10,
        }
    }
}
