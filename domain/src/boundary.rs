//! Boundary call contract
//!
//! The narrow, serializable RPC contract between the dispatcher side and the
//! isolated execution context: an operation group, an operation name, and
//! positional textual arguments. On the wire this is the child's argv:
//!
//! ```text
//! <program> [prefix args...] <group> <operation> [args...]
//! ```
//!
//! The child prints exactly one JSON value on stdout.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Capability group an operation belongs to
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum OperationGroup {
    Auth,
    Account,
    MarketData,
    Trading,
}

impl OperationGroup {
    pub const ALL: [OperationGroup; 4] = [
        OperationGroup::Auth,
        OperationGroup::Account,
        OperationGroup::MarketData,
        OperationGroup::Trading,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            OperationGroup::Auth => "auth",
            OperationGroup::Account => "account",
            OperationGroup::MarketData => "market_data",
            OperationGroup::Trading => "trading",
        }
    }
}

impl fmt::Display for OperationGroup {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for OperationGroup {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        OperationGroup::ALL
            .into_iter()
            .find(|g| g.as_str() == s)
            .ok_or_else(|| format!("Unknown module: {}", s))
    }
}

/// One boundary invocation, consumed once by the executor
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BoundaryCallSpec {
    pub group: OperationGroup,
    pub operation: String,
    pub args: Vec<String>,
}

impl BoundaryCallSpec {
    pub fn new(group: OperationGroup, operation: impl Into<String>) -> Self {
        Self {
            group,
            operation: operation.into(),
            args: Vec::new(),
        }
    }

    pub fn with_arg(mut self, arg: impl Into<String>) -> Self {
        self.args.push(arg.into());
        self
    }

    /// Append a structured argument in its JSON text form.
    pub fn with_json_arg(mut self, value: &serde_json::Value) -> Self {
        self.args.push(value.to_string());
        self
    }

    /// Positional argv handed to the child: group, operation, then args.
    pub fn to_argv(&self) -> Vec<String> {
        let mut argv = Vec::with_capacity(self.args.len() + 2);
        argv.push(self.group.as_str().to_string());
        argv.push(self.operation.clone());
        argv.extend(self.args.iter().cloned());
        argv
    }

    /// `group.operation`, for logs.
    pub fn qualified_name(&self) -> String {
        format!("{}.{}", self.group, self.operation)
    }
}
