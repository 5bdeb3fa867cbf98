//! Ed25519 credential signer

use base64::{Engine as _, engine::general_purpose::STANDARD};
use ed25519_dalek::{Signer, SigningKey, VerifyingKey};
use rhmcp_domain::{
    API_KEY_ENV, BridgeError, Credential, PRIVATE_KEY_ENV, SecretString, SignedCall,
};
use thiserror::Error;
use zeroize::Zeroizing;

/// Errors building a signer from configuration.
///
/// Messages name the offending setting, never its value.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum SignerError {
    #[error("{0} not set")]
    Missing(&'static str),

    #[error("ROBINHOOD_PRIVATE_KEY is not valid base64")]
    InvalidEncoding,

    #[error("ROBINHOOD_PRIVATE_KEY must decode to a 32-byte Ed25519 seed, got {0} bytes")]
    InvalidKeyLength(usize),
}

impl From<SignerError> for BridgeError {
    fn from(err: SignerError) -> Self {
        BridgeError::Configuration(err.to_string())
    }
}

/// Holds the API key and the Ed25519 signing key.
///
/// The signing key is zeroized when the signer is dropped.
pub struct CredentialSigner {
    api_key: String,
    key: SigningKey,
}

impl CredentialSigner {
    pub fn from_credential(credential: &Credential) -> Result<Self, SignerError> {
        let api_key = credential
            .api_key()
            .ok_or(SignerError::Missing(API_KEY_ENV))?
            .to_string();
        let encoded = credential
            .signing_key()
            .ok_or(SignerError::Missing(PRIVATE_KEY_ENV))?;

        Ok(Self {
            api_key,
            key: decode_signing_key(encoded)?,
        })
    }

    /// Check that a configured signing key decodes, without needing an API
    /// key. An absent key is not an error here.
    pub fn check_signing_key(credential: &Credential) -> Result<(), SignerError> {
        match credential.signing_key() {
            Some(encoded) => decode_signing_key(encoded).map(|_| ()),
            None => Ok(()),
        }
    }

    /// Sign a call at the current wall-clock time (UTC seconds).
    pub fn sign(&self, method: &str, path: &str, body: &str) -> SignedCall {
        self.sign_at(method, path, body, chrono::Utc::now().timestamp())
    }

    /// Sign a call at an explicit timestamp.
    ///
    /// The signed message is `api_key ‖ timestamp ‖ path ‖ method ‖ body`.
    pub fn sign_at(&self, method: &str, path: &str, body: &str, timestamp: i64) -> SignedCall {
        let message = format!("{}{}{}{}{}", self.api_key, timestamp, path, method, body);
        let signature = self.key.sign(message.as_bytes());

        SignedCall {
            method: method.to_string(),
            path: path.to_string(),
            body: body.to_string(),
            timestamp,
            api_key: self.api_key.clone(),
            signature: STANDARD.encode(signature.to_bytes()),
        }
    }

    pub fn verifying_key(&self) -> VerifyingKey {
        self.key.verifying_key()
    }
}

fn decode_signing_key(encoded: &SecretString) -> Result<SigningKey, SignerError> {
    let decoded = Zeroizing::new(
        STANDARD
            .decode(encoded.expose().trim())
            .map_err(|_| SignerError::InvalidEncoding)?,
    );
    // A 64-byte keypair export carries the seed in its first half.
    let seed: &[u8; 32] = match decoded.len() {
        32 | 64 => <&[u8; 32]>::try_from(&decoded[..32])
            .map_err(|_| SignerError::InvalidKeyLength(decoded.len()))?,
        n => return Err(SignerError::InvalidKeyLength(n)),
    };
    Ok(SigningKey::from_bytes(seed))
}

impl std::fmt::Debug for CredentialSigner {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("CredentialSigner")
            .field("api_key", &"***")
            .field("key", &"***")
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use ed25519_dalek::{Signature, Verifier};

    const SEED: [u8; 32] = [7u8; 32];

    fn signer() -> CredentialSigner {
        let credential = Credential::new(Some("rh-key".to_string()), Some(STANDARD.encode(SEED)));
        CredentialSigner::from_credential(&credential).unwrap()
    }

    fn decode_signature(call: &SignedCall) -> Signature {
        let bytes: [u8; 64] = STANDARD.decode(&call.signature).unwrap().try_into().unwrap();
        Signature::from_bytes(&bytes)
    }

    #[test]
    fn test_signature_verifies_over_documented_message() {
        let signer = signer();
        let call = signer.sign_at("GET", "/api/v1/crypto/trading/accounts/", "", 1_700_000_000);

        let message = "rh-key1700000000/api/v1/crypto/trading/accounts/GET";
        signer
            .verifying_key()
            .verify(message.as_bytes(), &decode_signature(&call))
            .unwrap();
        assert_eq!(call.timestamp, 1_700_000_000);
        assert_eq!(call.api_key, "rh-key");
    }

    #[test]
    fn test_signature_is_bound_to_timestamp_and_body() {
        let signer = signer();
        let path = "/api/v1/crypto/trading/orders/";
        let a = signer.sign_at("POST", path, r#"{"side":"buy"}"#, 100);
        let b = signer.sign_at("POST", path, r#"{"side":"buy"}"#, 101);
        let c = signer.sign_at("POST", path, r#"{"side":"sell"}"#, 100);

        assert_ne!(a.signature, b.signature);
        assert_ne!(a.signature, c.signature);

        // a's signature must not verify for c's message
        let tampered = format!("rh-key100{}POST{}", path, r#"{"side":"sell"}"#);
        assert!(
            signer
                .verifying_key()
                .verify(tampered.as_bytes(), &decode_signature(&a))
                .is_err()
        );
    }

    #[test]
    fn test_sign_uses_current_time() {
        let before = chrono::Utc::now().timestamp();
        let call = signer().sign("GET", "/", "");
        let after = chrono::Utc::now().timestamp();
        assert!(call.timestamp >= before && call.timestamp <= after);
    }

    #[test]
    fn test_missing_and_malformed_keys() {
        let err = CredentialSigner::from_credential(&Credential::new(None, Some("x".into())))
            .unwrap_err();
        assert_eq!(err.to_string(), "ROBINHOOD_API_KEY not set");

        let err = CredentialSigner::from_credential(&Credential::new(Some("k".into()), None))
            .unwrap_err();
        assert_eq!(err.to_string(), "ROBINHOOD_PRIVATE_KEY not set");

        let err = CredentialSigner::from_credential(&Credential::new(
            Some("k".into()),
            Some("not base64!".into()),
        ))
        .unwrap_err();
        assert_eq!(err, SignerError::InvalidEncoding);

        let err = CredentialSigner::from_credential(&Credential::new(
            Some("k".into()),
            Some(STANDARD.encode([1u8; 16])),
        ))
        .unwrap_err();
        assert_eq!(err, SignerError::InvalidKeyLength(16));
    }

    #[test]
    fn test_check_signing_key_needs_no_api_key() {
        let ok = Credential::new(None, Some(STANDARD.encode(SEED)));
        assert!(CredentialSigner::check_signing_key(&ok).is_ok());
        assert!(CredentialSigner::check_signing_key(&Credential::default()).is_ok());

        let bad = Credential::new(None, Some("not base64!!".into()));
        assert_eq!(
            CredentialSigner::check_signing_key(&bad),
            Err(SignerError::InvalidEncoding)
        );
    }

    #[test]
    fn test_keypair_export_accepted() {
        let mut keypair = [0u8; 64];
        keypair[..32].copy_from_slice(&SEED);
        keypair[32..].copy_from_slice(&SigningKey::from_bytes(&SEED).verifying_key().to_bytes());

        let credential = Credential::new(Some("rh-key".into()), Some(STANDARD.encode(keypair)));
        let from_pair = CredentialSigner::from_credential(&credential).unwrap();
        assert_eq!(from_pair.verifying_key(), signer().verifying_key());
    }

    #[test]
    fn test_errors_never_contain_key_material() {
        let secret = STANDARD.encode([9u8; 20]);
        let err = CredentialSigner::from_credential(&Credential::new(
            Some("rh-key".into()),
            Some(secret.clone()),
        ))
        .unwrap_err();
        let bridge: BridgeError = err.into();
        assert!(!bridge.to_string().contains(&secret));
        assert!(bridge.to_string().starts_with("Configuration error:"));
        assert!(!format!("{:?}", signer()).contains("rh-key"));
    }
}
