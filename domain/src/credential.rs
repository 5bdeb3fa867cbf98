//! Credential value types
//!
//! A [`Credential`] is built once from configuration and shared by reference
//! for the life of the process. Key material is wrapped in [`SecretString`],
//! which never prints its contents and is zeroed on drop.

use crate::core::error::BridgeError;
use zeroize::{Zeroize, ZeroizeOnDrop};

/// Environment variable holding the API key.
pub const API_KEY_ENV: &str = "ROBINHOOD_API_KEY";

/// Environment variable holding the base64-encoded Ed25519 private key seed.
pub const PRIVATE_KEY_ENV: &str = "ROBINHOOD_PRIVATE_KEY";

/// Secret text that redacts itself in `Debug` and zeroizes on drop.
#[derive(Clone, Zeroize, ZeroizeOnDrop)]
pub struct SecretString {
    inner: String,
}

impl SecretString {
    pub fn new(value: impl Into<String>) -> Self {
        Self {
            inner: value.into(),
        }
    }

    /// Borrow the secret. Use immediately; do not store the slice.
    pub fn expose(&self) -> &str {
        &self.inner
    }
}

impl std::fmt::Debug for SecretString {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str("SecretString(***)")
    }
}

/// API key plus signing key.
///
/// Either half may be missing or malformed: neither is fatal at startup,
/// each authenticated call fails with a configuration error instead.
#[derive(Clone, Default)]
pub struct Credential {
    api_key: Option<String>,
    signing_key: Option<SecretString>,
    /// Why the configured signing key cannot be used, if it cannot
    signing_key_error: Option<String>,
}

fn non_empty(value: Option<String>) -> Option<String> {
    value.filter(|v| !v.trim().is_empty())
}

impl Credential {
    pub fn new(api_key: Option<String>, signing_key: Option<String>) -> Self {
        Self {
            api_key: non_empty(api_key),
            signing_key: non_empty(signing_key).map(SecretString::new),
            signing_key_error: None,
        }
    }

    /// Record that the signing key is present but unusable (e.g. not
    /// decodable). `reason` must name the setting, never its value.
    pub fn with_unusable_signing_key(mut self, reason: impl Into<String>) -> Self {
        self.signing_key_error = Some(reason.into());
        self
    }

    pub fn api_key(&self) -> Option<&str> {
        self.api_key.as_deref()
    }

    pub fn signing_key(&self) -> Option<&SecretString> {
        self.signing_key.as_ref()
    }

    pub fn has_api_key(&self) -> bool {
        self.api_key.is_some()
    }

    pub fn has_signing_key(&self) -> bool {
        self.signing_key.is_some()
    }

    pub fn require_api_key(&self) -> Result<&str, BridgeError> {
        self.api_key()
            .ok_or_else(|| BridgeError::missing_setting(API_KEY_ENV))
    }

    pub fn require_signing_key(&self) -> Result<&SecretString, BridgeError> {
        let key = self
            .signing_key()
            .ok_or_else(|| BridgeError::missing_setting(PRIVATE_KEY_ENV))?;
        match &self.signing_key_error {
            Some(reason) => Err(BridgeError::Configuration(reason.clone())),
            None => Ok(key),
        }
    }

    /// Same signing key, different API key (a transport-injected override).
    pub fn with_api_key(&self, api_key: impl Into<String>) -> Self {
        Self {
            api_key: non_empty(Some(api_key.into())),
            signing_key: self.signing_key.clone(),
            signing_key_error: self.signing_key_error.clone(),
        }
    }
}

impl std::fmt::Debug for Credential {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Credential")
            .field("api_key", &self.api_key.as_ref().map(|_| "***"))
            .field("signing_key", &self.signing_key)
            .finish()
    }
}

/// A request authenticated for one upstream call.
///
/// Built immediately before sending and dropped afterwards. The signature
/// is bound to this exact timestamp and body.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SignedCall {
    pub method: String,
    pub path: String,
    pub body: String,
    pub timestamp: i64,
    pub api_key: String,
    /// Base64 signature
    pub signature: String,
}

impl SignedCall {
    pub const API_KEY_HEADER: &'static str = "x-api-key";
    pub const SIGNATURE_HEADER: &'static str = "x-signature";
    pub const TIMESTAMP_HEADER: &'static str = "x-timestamp";

    /// Authentication headers to attach to the outbound request.
    pub fn headers(&self) -> [(&'static str, String); 3] {
        [
            (Self::API_KEY_HEADER, self.api_key.clone()),
            (Self::SIGNATURE_HEADER, self.signature.clone()),
            (Self::TIMESTAMP_HEADER, self.timestamp.to_string()),
        ]
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_empty_values_are_absent() {
        let cred = Credential::new(Some("  ".to_string()), Some(String::new()));
        assert!(!cred.has_api_key());
        assert!(!cred.has_signing_key());

        let err = cred.require_api_key().unwrap_err();
        assert!(err.to_string().contains("ROBINHOOD_API_KEY not set"));
        let err = cred.require_signing_key().unwrap_err();
        assert!(err.to_string().contains("ROBINHOOD_PRIVATE_KEY not set"));
    }

    #[test]
    fn test_debug_redacts_everything() {
        let cred = Credential::new(Some("rh-key-123".to_string()), Some("c2VjcmV0".to_string()));
        let debug = format!("{:?}", cred);
        assert!(!debug.contains("rh-key-123"));
        assert!(!debug.contains("c2VjcmV0"));
        assert!(debug.contains("***"));
    }

    #[test]
    fn test_api_key_override_keeps_signing_key() {
        let cred = Credential::new(None, Some("c2VjcmV0".to_string()));
        let overridden = cred.with_api_key("injected");
        assert_eq!(overridden.api_key(), Some("injected"));
        assert_eq!(overridden.signing_key().unwrap().expose(), "c2VjcmV0");
    }

    #[test]
    fn test_unusable_signing_key_is_a_configuration_error() {
        let cred = Credential::new(Some("rh-key".to_string()), Some("not base64!!".to_string()))
            .with_unusable_signing_key("ROBINHOOD_PRIVATE_KEY is not valid base64");
        assert!(cred.has_signing_key());

        let err = cred.require_signing_key().unwrap_err();
        assert!(matches!(err, BridgeError::Configuration(_)));
        assert!(err.to_string().contains("ROBINHOOD_PRIVATE_KEY is not valid base64"));
        assert!(!err.to_string().contains("not base64!!"));

        let overridden = cred.with_api_key("injected");
        assert!(overridden.require_signing_key().is_err());
    }

    #[test]
    fn test_signed_call_headers() {
        let call = SignedCall {
            method: "GET".into(),
            path: "/api/v1/crypto/trading/accounts/".into(),
            body: String::new(),
            timestamp: 1_700_000_000,
            api_key: "key".into(),
            signature: "c2ln".into(),
        };
        let headers = call.headers();
        assert_eq!(headers[0], ("x-api-key", "key".to_string()));
        assert_eq!(headers[1], ("x-signature", "c2ln".to_string()));
        assert_eq!(headers[2], ("x-timestamp", "1700000000".to_string()));
    }
}
