//! Configuration loading for robinhood-mcp
//!
//! This module handles file I/O and merging of configuration from multiple sources.
//! The priority order (highest to lowest):
//!
//! 1. Environment variables (`ROBINHOOD_API_KEY`, `PORT`, ...)
//! 2. `--config <path>` specified file
//! 3. Project root: `./robinhood-mcp.toml`
//! 4. XDG config: `$XDG_CONFIG_HOME/robinhood-mcp/config.toml`
//! 5. Default values
//!
//! Command-line flags are applied on top by the presentation layer.

mod file_config;
mod loader;

pub use file_config::{
    ConfigValidationError, DEFAULT_BASE_URL, FileBoundaryConfig, FileConfig,
    FileCredentialsConfig, FileLoggingConfig, FileServerConfig, FileUpstreamConfig,
    TransportKind,
};
pub use loader::{ConfigLoader, ENV_KEYS, PROJECT_CONFIG_FILE};
