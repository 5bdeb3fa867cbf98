//! Signed REST client for the broker API
//!
//! Only the boundary worker talks to the network; the server process never
//! constructs one of these.

mod rest;

pub use rest::{RestClient, UpstreamError, UpstreamRequest};
