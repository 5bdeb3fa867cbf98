//! Request signing for the broker API
//!
//! Each upstream call is signed immediately before it is sent. Signatures
//! are bound to one timestamp and one body and are never cached.

mod signer;

pub use signer::{CredentialSigner, SignerError};
