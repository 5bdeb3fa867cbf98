//! Logging settings (`[logging]` section)

use serde::{Deserialize, Serialize};

/// Raw logging configuration from TOML
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct FileLoggingConfig {
    /// Filter directive, e.g. `info` or `rhmcp_infrastructure=debug`
    pub level: Option<String>,
    /// Also write logs to this file
    pub file: Option<String>,
}
