//! EdgeGrid request signing (EG1-HMAC-SHA256)
//!
//! Every API request carries an `Authorization` header of the form
//!
//! ```text
//! EG1-HMAC-SHA256 client_token=…;access_token=…;timestamp=…;nonce=…;signature=…
//! ```
//!
//! The signature is an HMAC-SHA256 over the tab-joined request line, keyed
//! with an HMAC-SHA256 of the timestamp under the client secret.

use base64::{Engine, engine::general_purpose::STANDARD as BASE64};
use hmac::{Hmac, Mac};
use reqwest::Url;
use sha2::{Digest, Sha256};

use crate::config::EdgeGridConfig;
use crate::error::{Error, Result};

type HmacSha256 = Hmac<Sha256>;

/// Signing algorithm name
const ALGORITHM: &str = "EG1-HMAC-SHA256";

/// Signs requests with EdgeGrid credentials
pub struct EdgeGridSigner {
    client_token: String,
    client_secret: String,
    access_token: String,
    max_body: usize,
}

impl std::fmt::Debug for EdgeGridSigner {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("EdgeGridSigner")
            .field("client_token", &"<REDACTED>")
            .field("client_secret", &"<REDACTED>")
            .field("access_token", &"<REDACTED>")
            .field("max_body", &self.max_body)
            .finish()
    }
}

impl EdgeGridSigner {
    /// Create a signer from credentials
    pub fn new(config: &EdgeGridConfig) -> Self {
        Self {
            client_token: config.client_token.clone(),
            client_secret: config.client_secret.clone(),
            access_token: config.access_token.clone(),
            max_body: config.max_body,
        }
    }

    /// Build the Authorization header for a request, using the current time and a fresh nonce
    pub fn authorization(&self, method: &str, url: &Url, body: &[u8]) -> Result<String> {
        let timestamp = chrono::Utc::now().format("%Y%m%dT%H:%M:%S+0000").to_string();
        let nonce = uuid::Uuid::new_v4().to_string();
        self.authorization_at(method, url, body, &timestamp, &nonce)
    }

    /// Build the Authorization header for a request with a fixed timestamp and nonce
    pub fn authorization_at(
        &self,
        method: &str,
        url: &Url,
        body: &[u8],
        timestamp: &str,
        nonce: &str,
    ) -> Result<String> {
        let auth_header = format!(
            "{} client_token={};access_token={};timestamp={};nonce={};",
            ALGORITHM, self.client_token, self.access_token, timestamp, nonce
        );

        let host = url
            .host_str()
            .ok_or_else(|| Error::invalid_input(format!("URL has no host: {}", url)))?;
        let host = match url.port() {
            Some(port) => format!("{}:{}", host, port),
            None => host.to_string(),
        };
        let path_and_query = match url.query() {
            Some(query) => format!("{}?{}", url.path(), query),
            None => url.path().to_string(),
        };

        let method = method.to_uppercase();
        let content_hash = self.content_hash(&method, body);

        // Canonical headers are empty: no headers are signed
        let data_to_sign = [
            method.as_str(),
            url.scheme(),
            host.as_str(),
            path_and_query.as_str(),
            "",
            content_hash.as_str(),
            auth_header.as_str(),
        ]
        .join("\t");

        let signing_key = base64_hmac(self.client_secret.as_bytes(), timestamp.as_bytes())?;
        let signature = base64_hmac(signing_key.as_bytes(), data_to_sign.as_bytes())?;

        Ok(format!("{}signature={}", auth_header, signature))
    }

    /// Only POST bodies are hashed, truncated to `max_body`
    fn content_hash(&self, method: &str, body: &[u8]) -> String {
        if method != "POST" || body.is_empty() {
            return String::new();
        }
        let end = body.len().min(self.max_body);
        BASE64.encode(Sha256::digest(&body[..end]))
    }
}

fn base64_hmac(key: &[u8], data: &[u8]) -> Result<String> {
    let mut mac = HmacSha256::new_from_slice(key)
        .map_err(|e| Error::config(format!("invalid HMAC key: {}", e)))?;
    mac.update(data);
    Ok(BASE64.encode(mac.finalize().into_bytes()))
}
