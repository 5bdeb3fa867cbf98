//! Core domain concepts shared across all subdomains.
//!
//! - [`error::BridgeError`]: the error taxonomy and its JSON-RPC mapping
//! - [`string::clip`]: bounded diagnostics

pub mod error;
pub mod string;
