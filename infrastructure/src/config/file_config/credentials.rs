//! Credentials from TOML (`[credentials]` section) or the environment

use rhmcp_domain::Credential;
use serde::{Deserialize, Serialize};

/// Raw credential settings
///
/// Usually supplied through `ROBINHOOD_API_KEY` / `ROBINHOOD_PRIVATE_KEY`
/// rather than a file.
#[derive(Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct FileCredentialsConfig {
    /// API key issued by the broker
    pub api_key: Option<String>,
    /// Base64-encoded Ed25519 private key seed
    pub private_key: Option<String>,
}

impl FileCredentialsConfig {
    pub fn to_credential(&self) -> Credential {
        Credential::new(self.api_key.clone(), self.private_key.clone())
    }
}

impl std::fmt::Debug for FileCredentialsConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("FileCredentialsConfig")
            .field("api_key", &self.api_key.as_ref().map(|_| "***"))
            .field("private_key", &self.private_key.as_ref().map(|_| "***"))
            .finish()
    }
}
