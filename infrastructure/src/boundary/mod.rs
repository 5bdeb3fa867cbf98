//! Boundary crossing
//!
//! - [`executor`]: the parent side, running each call in a child process
//! - [`worker`]: the child side, performing the signed upstream call

pub mod executor;
pub mod worker;

pub use executor::{DEFAULT_BOUNDARY_TIMEOUT, SubprocessExecutor};
pub use worker::{WorkerError, WorkerOperation, order_body, run_worker};
