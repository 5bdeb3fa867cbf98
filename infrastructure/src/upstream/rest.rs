//! Blocking-free REST calls with per-request signing.

use crate::signing::{CredentialSigner, SignerError};
use reqwest::{Method, Url, header::CONTENT_TYPE};
use rhmcp_domain::core::string::clip;
use serde_json::Value;
use std::time::Duration;
use thiserror::Error;
use tracing::debug;

/// Longest upstream error body kept in an error message
const MAX_ERROR_BODY: usize = 2048;

/// Upstream call failures
#[derive(Debug, Error)]
pub enum UpstreamError {
    #[error("Invalid request URL: {0}")]
    InvalidUrl(String),

    #[error("Error making API request: {0}")]
    Http(#[from] reqwest::Error),

    #[error("Error making API request: status {status}, response: {body}")]
    Status { status: u16, body: String },

    #[error("Upstream response is not valid JSON: {0}")]
    Decode(String),

    #[error("Configuration error: {0}")]
    Signing(#[from] SignerError),
}

/// One upstream request before signing.
#[derive(Debug, Clone, PartialEq)]
pub struct UpstreamRequest {
    pub method: Method,
    pub path: String,
    pub query: Vec<(String, String)>,
    pub body: Option<Value>,
}

impl UpstreamRequest {
    pub fn get(path: impl Into<String>) -> Self {
        Self {
            method: Method::GET,
            path: path.into(),
            query: Vec::new(),
            body: None,
        }
    }

    pub fn post(path: impl Into<String>, body: Option<Value>) -> Self {
        Self {
            method: Method::POST,
            path: path.into(),
            query: Vec::new(),
            body,
        }
    }

    pub fn with_query(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.query.push((key.into(), value.into()));
        self
    }

    /// Add `key` only when `values` is non-empty, comma-joined.
    pub fn with_list_query(self, key: &str, values: &[String]) -> Self {
        if values.is_empty() {
            self
        } else {
            self.with_query(key, values.join(","))
        }
    }

    pub fn body_text(&self) -> String {
        self.body.as_ref().map(Value::to_string).unwrap_or_default()
    }
}

/// REST client that signs every request just before sending it.
pub struct RestClient {
    http: reqwest::Client,
    base_url: Url,
    signer: CredentialSigner,
}

impl RestClient {
    pub fn new(
        base_url: &str,
        timeout: Duration,
        signer: CredentialSigner,
    ) -> Result<Self, UpstreamError> {
        let base_url =
            Url::parse(base_url).map_err(|e| UpstreamError::InvalidUrl(e.to_string()))?;
        let http = reqwest::Client::builder().timeout(timeout).build()?;
        Ok(Self {
            http,
            base_url,
            signer,
        })
    }

    /// Absolute URL for `request`, query string included.
    pub fn url_for(&self, request: &UpstreamRequest) -> Result<Url, UpstreamError> {
        let mut url = self
            .base_url
            .join(&request.path)
            .map_err(|e| UpstreamError::InvalidUrl(e.to_string()))?;
        if !request.query.is_empty() {
            url.query_pairs_mut().extend_pairs(&request.query);
        }
        Ok(url)
    }

    /// Send `request` and decode the JSON response (an empty body is `{}`).
    pub async fn send(&self, request: &UpstreamRequest) -> Result<Value, UpstreamError> {
        let url = self.url_for(request)?;
        let body = request.body_text();

        // The signed path covers the query string exactly as sent.
        let signed_path = match url.query() {
            Some(query) => format!("{}?{}", url.path(), query),
            None => url.path().to_string(),
        };
        let signed = self.signer.sign(request.method.as_str(), &signed_path, &body);

        debug!("{} {}", request.method, signed_path);
        let mut builder = self.http.request(request.method.clone(), url);
        for (name, value) in signed.headers() {
            builder = builder.header(name, value);
        }
        if !body.is_empty() {
            builder = builder.header(CONTENT_TYPE, "application/json").body(body);
        }

        let response = builder.send().await?;
        let status = response.status();
        let text = response.text().await?;

        if !status.is_success() {
            return Err(UpstreamError::Status {
                status: status.as_u16(),
                body: clip(&text, MAX_ERROR_BODY),
            });
        }
        if text.trim().is_empty() {
            return Ok(Value::Object(Default::default()));
        }
        serde_json::from_str(&text).map_err(|e| UpstreamError::Decode(e.to_string()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use base64::{Engine as _, engine::general_purpose::STANDARD};
    use rhmcp_domain::Credential;
    use serde_json::json;

    fn client() -> RestClient {
        let credential = Credential::new(Some("rh-key".into()), Some(STANDARD.encode([3u8; 32])));
        let signer = CredentialSigner::from_credential(&credential).unwrap();
        RestClient::new("https://trading.robinhood.com", Duration::from_secs(10), signer).unwrap()
    }

    #[test]
    fn test_url_with_comma_joined_filter() {
        let request = UpstreamRequest::get("/api/v1/crypto/trading/holdings/")
            .with_list_query("asset_code", &["BTC".to_string(), "ETH".to_string()]);
        let url = client().url_for(&request).unwrap();

        assert_eq!(url.path(), "/api/v1/crypto/trading/holdings/");
        assert_eq!(url.query(), Some("asset_code=BTC%2CETH"));
    }

    #[test]
    fn test_empty_filter_adds_no_query() {
        let request = UpstreamRequest::get("/api/v1/crypto/trading/trading_pairs/")
            .with_list_query("symbol", &[]);
        assert!(request.query.is_empty());
        assert_eq!(client().url_for(&request).unwrap().query(), None);
    }

    #[test]
    fn test_body_text() {
        let request = UpstreamRequest::post(
            "/api/v1/crypto/trading/orders/",
            Some(json!({"symbol": "BTC-USD"})),
        );
        assert_eq!(request.body_text(), r#"{"symbol":"BTC-USD"}"#);
        assert_eq!(UpstreamRequest::get("/").body_text(), "");
    }

    #[test]
    fn test_invalid_base_url() {
        let credential = Credential::new(Some("k".into()), Some(STANDARD.encode([3u8; 32])));
        let signer = CredentialSigner::from_credential(&credential).unwrap();
        let result = RestClient::new("not a url", Duration::from_secs(1), signer);
        assert!(matches!(result, Err(UpstreamError::InvalidUrl(_))));
    }
}
