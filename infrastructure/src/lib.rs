//! Infrastructure layer for robinhood-mcp
//!
//! This crate contains adapters that implement the ports defined
//! in the application layer: the subprocess boundary executor, the worker
//! that performs signed REST calls, configuration loading, and log setup.

pub mod boundary;
pub mod config;
pub mod logging;
pub mod signing;
pub mod tools;
pub mod upstream;

// Re-export commonly used types
pub use boundary::{SubprocessExecutor, WorkerError, run_worker};
pub use config::{
    ConfigLoader, ConfigValidationError, FileBoundaryConfig, FileConfig, FileLoggingConfig,
    FileServerConfig, FileUpstreamConfig, TransportKind,
};
pub use logging::{LoggingError, init_logging};
pub use signing::{CredentialSigner, SignerError};
pub use tools::JsonSchemaToolConverter;
pub use upstream::{RestClient, UpstreamError, UpstreamRequest};
