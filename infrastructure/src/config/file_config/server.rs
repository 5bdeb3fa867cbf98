//! Transport settings (`[server]` section)

use serde::{Deserialize, Serialize};

/// Channel the dispatcher is served over
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TransportKind {
    /// Newline-delimited JSON on stdin/stdout
    #[default]
    Stdio,
    /// JSON-RPC over `POST {endpoint}`
    Http,
}

/// Raw server configuration from TOML
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct FileServerConfig {
    pub transport: TransportKind,
    /// Bind address (HTTP transport)
    pub host: String,
    /// Listening port (HTTP transport)
    pub port: u16,
    /// JSON-RPC endpoint path (HTTP transport)
    pub endpoint: String,
}

impl Default for FileServerConfig {
    fn default() -> Self {
        Self {
            transport: TransportKind::Stdio,
            host: "0.0.0.0".to_string(),
            port: 8000,
            endpoint: "/mcp".to_string(),
        }
    }
}

impl FileServerConfig {
    /// `host:port`, for binding.
    pub fn bind_address(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }
}
