//! Tool domain module
//!
//! A **tool** is a named, schema-described remote operation that a protocol
//! client can invoke. The catalog of tools is a [`ToolSpec`], built once at
//! startup and shared read-only afterwards.
//!
//! ```text
//! ┌──────────────┐    ┌──────────────┐    ┌──────────────────┐
//! │ ToolSpec     │───▶│ ToolCall     │───▶│ BoundaryCallSpec │
//! │ (catalog)    │    │ (validated)  │    │ (one per call)   │
//! └──────┬───────┘    └──────────────┘    └──────────────────┘
//!        │
//!        ├─ aliases: "getCryptoQuote" → "getBestPrice"
//!        └─ tools:   "getBestPrice"   → ToolDefinition
//! ```
//!
//! # Key Types
//!
//! - [`ToolSpec`]: the catalog plus alias mappings; rejects duplicates
//! - [`ToolDefinition`]: schema for a single tool
//! - [`ToolCall`]: an invocation with its arguments
//! - [`ToolValidator`]: pure argument validation, no I/O

pub mod entities;
pub mod traits;

pub use entities::{
    CatalogError, ParamType, RiskLevel, ToolCall, ToolDefinition, ToolParameter, ToolSpec,
};
pub use traits::{DefaultToolValidator, ToolValidator};
