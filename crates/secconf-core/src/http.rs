// # API Client
//
// Shared HTTP plumbing for the remote client facades.
//
// - ✅ Signs every request with EdgeGrid credentials
// - ✅ HTTP timeout configured (`ClientConfig::request_timeout_secs`)
// - ✅ Specific error mapping for HTTP status codes (401/403, 404, 409, 429, 5xx)
// - ❌ NO retry logic (errors are returned to the handler, which returns them to its caller)
// - ❌ NO caching
//
// ## Security Requirements
//
// - Credentials NEVER appear in logs or error messages
// - Requests with an invalid configuration are rejected at construction

use std::time::Duration;

use reqwest::{Method, StatusCode, Url};
use serde::Serialize;
use serde::de::DeserializeOwned;

use crate::config::ProviderConfig;
use crate::edgegrid::EdgeGridSigner;
use crate::error::{Error, Result};

/// EdgeGrid-signed JSON API client
pub struct ApiClient {
    base_url: String,
    signer: EdgeGridSigner,
    client: reqwest::Client,
}

impl std::fmt::Debug for ApiClient {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ApiClient")
            .field("base_url", &self.base_url)
            .field("signer", &self.signer)
            .finish()
    }
}

impl ApiClient {
    /// Create a client from a validated configuration
    pub fn new(config: &ProviderConfig) -> Result<Self> {
        config.validate()?;

        let client = reqwest::Client::builder()
            .timeout(Duration::from_secs(config.client.request_timeout_secs))
            .user_agent(config.client.user_agent.clone())
            .build()
            .map_err(|e| Error::config(format!("Failed to build HTTP client: {}", e)))?;

        Ok(Self {
            base_url: config.edgegrid.base_url(),
            signer: EdgeGridSigner::new(&config.edgegrid),
            client,
        })
    }

    /// Base URL requests are issued against
    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    /// GET `path` and decode the JSON response
    ///
    /// ```http
    /// GET {path}
    /// Authorization: EG1-HMAC-SHA256 …
    /// ```
    pub async fn get_json<T: DeserializeOwned>(&self, path: &str) -> Result<T> {
        let body = self.send(Method::GET, path, None).await?;
        Ok(serde_json::from_slice(&body)?)
    }

    /// PUT a JSON body to `path` and decode the JSON response
    ///
    /// ```http
    /// PUT {path}
    /// Authorization: EG1-HMAC-SHA256 …
    /// Content-Type: application/json
    /// ```
    pub async fn put_json<B, T>(&self, path: &str, body: &B) -> Result<T>
    where
        B: Serialize + ?Sized,
        T: DeserializeOwned,
    {
        let payload = serde_json::to_vec(body)?;
        let body = self.send(Method::PUT, path, Some(payload)).await?;
        Ok(serde_json::from_slice(&body)?)
    }

    async fn send(&self, method: Method, path: &str, payload: Option<Vec<u8>>) -> Result<Vec<u8>> {
        let url = Url::parse(&format!("{}{}", self.base_url, path))
            .map_err(|e| Error::invalid_input(format!("Invalid request URL {}: {}", path, e)))?;

        let authorization = self.signer.authorization(
            method.as_str(),
            &url,
            payload.as_deref().unwrap_or_default(),
        )?;

        tracing::debug!("{} {}", method, url.path());

        let mut request = self
            .client
            .request(method.clone(), url)
            .header("Authorization", authorization)
            .header("Accept", "application/json");
        if let Some(payload) = payload {
            request = request
                .header("Content-Type", "application/json")
                .body(payload);
        }

        let response = request
            .send()
            .await
            .map_err(|e| Error::http(format!("HTTP request failed: {}", e)))?;

        let status = response.status();
        let body = response
            .bytes()
            .await
            .map_err(|e| Error::http(format!("Failed to read response: {}", e)))?;

        if !status.is_success() {
            let error_text = String::from_utf8_lossy(&body);
            return Err(status_error(status, path, &error_text));
        }

        Ok(body.to_vec())
    }
}

/// Encode a user-supplied ID as one URL path segment
///
/// `/`, `?` and `#` are escaped so the ID cannot leave its segment. The dot
/// segments `.` and `..` are rejected since URL parsing would resolve them.
pub fn path_segment(raw: &str) -> Result<String> {
    if raw.is_empty() || raw == "." || raw == ".." {
        return Err(Error::invalid_input(format!(
            "'{}' is not a valid path segment",
            raw
        )));
    }
    Ok(urlencoding::encode(raw).into_owned())
}

/// Map a non-success status to an error
fn status_error(status: StatusCode, path: &str, error_text: &str) -> Error {
    match status.as_u16() {
        401 | 403 => Error::auth(format!(
            "Invalid credentials or insufficient permissions for {}. Status: {}",
            path, status
        )),
        404 => Error::not_found(format!("{} - {}", path, error_text)),
        409 => Error::conflict(format!(
            "{} is being modified by another request. Status: {}",
            path, status
        )),
        429 => Error::rate_limited(format!(
            "Rate limit exceeded for {}. Status: {}",
            path, status
        )),
        500..=599 => Error::http(format!(
            "Server error (transient): {} - {}",
            status, error_text
        )),
        _ => Error::http(format!("Request failed: {} - {}", status, error_text)),
    }
}
