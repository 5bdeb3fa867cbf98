//! Presentation layer for robinhood-mcp
//!
//! This crate contains the CLI definitions and the transport adapters
//! (stdio and HTTP) that feed protocol frames to the dispatcher.

pub mod cli;
pub mod server;

// Re-export commonly used types
pub use cli::commands::{BridgeArgs, Cli, Command, ServeArgs, TransportChoice};
pub use server::{HttpServer, HttpServerConfig, StdioServer};
