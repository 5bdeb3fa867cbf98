//! CLI command definitions

use clap::{Args, Parser, Subcommand, ValueEnum};
use std::path::PathBuf;

/// Transport the server listens on
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum TransportChoice {
    /// Newline-delimited JSON-RPC on stdin/stdout
    Stdio,
    /// JSON-RPC over HTTP POST
    Http,
}

/// CLI arguments for robinhood-mcp
#[derive(Parser, Debug)]
#[command(name = "robinhood-mcp")]
#[command(author, version, about = "MCP bridge to the Robinhood Crypto trading API")]
#[command(long_about = r#"
robinhood-mcp exposes the Robinhood Crypto trading API as MCP tools.

Every tool call is performed by a short-lived child process (the `bridge`
subcommand) that signs the request with your Ed25519 key and prints one
JSON result.

Credentials are read from the environment:
  ROBINHOOD_API_KEY       API key issued by Robinhood
  ROBINHOOD_PRIVATE_KEY   base64 Ed25519 private key

Configuration files are loaded from (in priority order):
1. --config <path>           Explicit config file
2. ./robinhood-mcp.toml      Project-level config
3. ~/.config/robinhood-mcp/config.toml   Global config

Example:
  robinhood-mcp                          # stdio server
  robinhood-mcp serve --transport http --port 8000
  robinhood-mcp tools
  robinhood-mcp bridge account get_account
"#)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Option<Command>,

    /// Verbosity level (-v = info, -vv = debug, -vvv = trace)
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    pub verbose: u8,

    /// Path to configuration file
    #[arg(long, value_name = "PATH", global = true)]
    pub config: Option<PathBuf>,

    /// Disable loading of configuration files (environment still applies)
    #[arg(long, global = true)]
    pub no_config: bool,
}

impl Cli {
    /// The subcommand to run; `serve` with defaults when none is given.
    pub fn command(&self) -> Command {
        self.command
            .clone()
            .unwrap_or_else(|| Command::Serve(ServeArgs::default()))
    }
}

#[derive(Subcommand, Debug, Clone)]
pub enum Command {
    /// Run the MCP server (default)
    Serve(ServeArgs),

    /// Run one boundary operation and print its JSON result
    Bridge(BridgeArgs),

    /// Print the tool catalog as JSON and exit
    Tools,
}

/// Overrides for the `[server]` configuration section
#[derive(Args, Debug, Clone, Default)]
pub struct ServeArgs {
    /// Transport to listen on
    #[arg(long, value_enum)]
    pub transport: Option<TransportChoice>,

    /// Bind host for the http transport
    #[arg(long)]
    pub host: Option<String>,

    /// Bind port for the http transport
    #[arg(long)]
    pub port: Option<u16>,

    /// Request path for the http transport
    #[arg(long, value_name = "PATH")]
    pub endpoint: Option<String>,
}

#[derive(Args, Debug, Clone)]
pub struct BridgeArgs {
    /// Operation group (auth, account, market_data, trading)
    pub group: String,

    /// Operation name within the group
    pub operation: String,

    /// Positional operation arguments
    #[arg(allow_hyphen_values = true)]
    pub args: Vec<String>,
}
