//! Boundary process settings (`[boundary]` section)

use serde::{Deserialize, Serialize};

/// Raw boundary configuration from TOML
///
/// With no `program` the server re-invokes its own executable with the
/// `bridge` subcommand.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct FileBoundaryConfig {
    /// Worker executable (default: the running binary)
    pub program: Option<String>,
    /// Arguments placed before `<group> <operation> ...`
    pub args: Option<Vec<String>>,
    /// Wall-clock budget per call, in seconds
    pub timeout_seconds: u64,
}

impl Default for FileBoundaryConfig {
    fn default() -> Self {
        Self {
            program: None,
            args: None,
            timeout_seconds: 30,
        }
    }
}
