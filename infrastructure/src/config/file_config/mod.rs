//! Raw TOML configuration data types
//!
//! These structs represent the exact structure of the TOML config file.
//! Environment variables are mapped onto the same keys by the loader.

mod boundary;
mod credentials;
mod logging;
mod server;
mod upstream;

pub use boundary::FileBoundaryConfig;
pub use credentials::FileCredentialsConfig;
pub use logging::FileLoggingConfig;
pub use server::{FileServerConfig, TransportKind};
pub use upstream::{DEFAULT_BASE_URL, FileUpstreamConfig};

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Configuration validation errors
#[derive(Debug, Error, PartialEq, Eq)]
pub enum ConfigValidationError {
    #[error("{0} cannot be 0")]
    InvalidTimeout(&'static str),

    #[error("server.endpoint must start with '/', got '{0}'")]
    InvalidEndpoint(String),

    #[error("upstream.base_url must be an http(s) URL, got '{0}'")]
    InvalidBaseUrl(String),
}

/// Complete file configuration (raw TOML structure)
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct FileConfig {
    /// API key and signing key
    pub credentials: FileCredentialsConfig,
    /// Broker REST API
    pub upstream: FileUpstreamConfig,
    /// Transport settings
    pub server: FileServerConfig,
    /// Boundary process settings
    pub boundary: FileBoundaryConfig,
    /// Logging settings
    pub logging: FileLoggingConfig,
}

impl FileConfig {
    /// Validate the configuration
    pub fn validate(&self) -> Result<(), ConfigValidationError> {
        if self.boundary.timeout_seconds == 0 {
            return Err(ConfigValidationError::InvalidTimeout(
                "boundary.timeout_seconds",
            ));
        }
        if self.upstream.timeout_seconds == 0 {
            return Err(ConfigValidationError::InvalidTimeout(
                "upstream.timeout_seconds",
            ));
        }
        if !self.server.endpoint.starts_with('/') {
            return Err(ConfigValidationError::InvalidEndpoint(
                self.server.endpoint.clone(),
            ));
        }
        let base = self.upstream.base_url.as_str();
        if !(base.starts_with("https://") || base.starts_with("http://")) {
            return Err(ConfigValidationError::InvalidBaseUrl(base.to_string()));
        }
        Ok(())
    }
}
