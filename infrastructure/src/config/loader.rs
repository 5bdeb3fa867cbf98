//! Configuration loader with multi-source merging

use super::file_config::FileConfig;
use figment::{
    Figment,
    providers::{Env, Format, Serialized, Toml},
};
use std::path::{Path, PathBuf};

/// Directory name under the platform config dir.
const APP_DIR: &str = "robinhood-mcp";

/// Project-level config file, looked up in the working directory.
pub const PROJECT_CONFIG_FILE: &str = "robinhood-mcp.toml";

/// Environment variables and the config keys they set.
pub const ENV_KEYS: &[(&str, &str)] = &[
    ("ROBINHOOD_API_KEY", "credentials.api_key"),
    ("ROBINHOOD_PRIVATE_KEY", "credentials.private_key"),
    ("ROBINHOOD_BASE_URL", "upstream.base_url"),
    ("HOST", "server.host"),
    ("PORT", "server.port"),
    ("MCP_ENDPOINT", "server.endpoint"),
    ("LOG_LEVEL", "logging.level"),
    ("LOG_FILE", "logging.file"),
    ("BRIDGE_TIMEOUT_SECS", "boundary.timeout_seconds"),
];

/// Configuration loader that handles file discovery and merging
pub struct ConfigLoader;

impl ConfigLoader {
    /// Load configuration from all sources with proper priority
    ///
    /// Priority (highest to lowest):
    /// 1. Environment variables ([`ENV_KEYS`])
    /// 2. Explicit config path (if provided)
    /// 3. Project root: `./robinhood-mcp.toml`
    /// 4. Global: `$XDG_CONFIG_HOME/robinhood-mcp/config.toml`
    /// 5. Default values
    pub fn load(config_path: Option<&PathBuf>) -> Result<FileConfig, Box<figment::Error>> {
        let mut figment = Figment::new().merge(Serialized::defaults(FileConfig::default()));

        if let Some(global_path) = Self::global_config_path()
            && global_path.exists()
        {
            figment = figment.merge(Toml::file(&global_path));
        }

        if let Some(project_path) = Self::project_config_path() {
            figment = figment.merge(Toml::file(&project_path));
        }

        if let Some(path) = config_path {
            figment = figment.merge(Toml::file(path));
        }

        figment.merge(Self::env_provider()).extract().map_err(Box::new)
    }

    /// Defaults plus environment, no files (for --no-config)
    pub fn load_defaults() -> Result<FileConfig, Box<figment::Error>> {
        Figment::new()
            .merge(Serialized::defaults(FileConfig::default()))
            .merge(Self::env_provider())
            .extract()
            .map_err(Box::new)
    }

    /// Environment provider that only sees [`ENV_KEYS`].
    pub fn env_provider() -> Env {
        Env::raw().filter_map(|key| {
            ENV_KEYS
                .iter()
                .find(|(var, _)| key == *var)
                .map(|(_, path)| (*path).into())
        })
    }

    /// Get the global config file path
    ///
    /// Returns XDG_CONFIG_HOME/robinhood-mcp/config.toml if set,
    /// otherwise falls back to ~/.config/robinhood-mcp/config.toml
    pub fn global_config_path() -> Option<PathBuf> {
        dirs::config_dir().map(|d| d.join(APP_DIR).join("config.toml"))
    }

    /// Get the project-level config file path (if it exists)
    pub fn project_config_path() -> Option<PathBuf> {
        let path = Path::new(PROJECT_CONFIG_FILE);
        path.exists().then(|| path.to_path_buf())
    }
}
