//! Configuration types for the provider handlers
//!
//! This module defines the client-side configuration: EdgeGrid credentials
//! and HTTP client settings. Handler inputs are not configured here; they
//! arrive as Local State (see [`crate::state::ResourceData`]).

use serde::{Deserialize, Serialize};

/// Main provider configuration
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ProviderConfig {
    /// EdgeGrid credentials
    pub edgegrid: EdgeGridConfig,

    /// Optional HTTP client settings
    #[serde(default)]
    pub client: ClientConfig,
}

impl ProviderConfig {
    /// Create a configuration from credentials with default client settings
    pub fn new(edgegrid: EdgeGridConfig) -> Self {
        Self {
            edgegrid,
            client: ClientConfig::default(),
        }
    }

    /// Validate the configuration
    pub fn validate(&self) -> Result<(), crate::Error> {
        self.edgegrid.validate()?;
        self.client.validate()?;
        Ok(())
    }
}

/// EdgeGrid API credentials
///
/// The Debug implementation does NOT expose the secret or the tokens.
#[derive(Clone, Default, Serialize, Deserialize)]
pub struct EdgeGridConfig {
    /// API host, without scheme (e.g. "akab-xxxx.luna.akamaiapis.net")
    pub host: String,

    /// Client token
    pub client_token: String,

    /// Client secret
    pub client_secret: String,

    /// Access token
    pub access_token: String,

    /// Maximum number of body bytes included in the content hash
    #[serde(default = "default_max_body")]
    pub max_body: usize,

    /// Override for the base URL (tests, proxies). Defaults to `https://{host}`.
    #[serde(default)]
    pub base_url: Option<String>,
}

impl EdgeGridConfig {
    /// Create credentials for a host
    pub fn new(
        host: impl Into<String>,
        client_token: impl Into<String>,
        client_secret: impl Into<String>,
        access_token: impl Into<String>,
    ) -> Self {
        Self {
            host: host.into(),
            client_token: client_token.into(),
            client_secret: client_secret.into(),
            access_token: access_token.into(),
            max_body: default_max_body(),
            base_url: None,
        }
    }

    /// Point the client at a different base URL
    pub fn with_base_url(mut self, base_url: impl Into<String>) -> Self {
        self.base_url = Some(base_url.into());
        self
    }

    /// Base URL requests are issued against
    pub fn base_url(&self) -> String {
        match &self.base_url {
            Some(url) => url.trim_end_matches('/').to_string(),
            None => format!("https://{}", self.host.trim_end_matches('/')),
        }
    }

    /// Validate the credentials
    pub fn validate(&self) -> Result<(), crate::Error> {
        if self.host.is_empty() && self.base_url.is_none() {
            return Err(crate::Error::config("EdgeGrid host cannot be empty"));
        }
        if self.host.starts_with("http://") || self.host.starts_with("https://") {
            return Err(crate::Error::config(
                "EdgeGrid host must not include a scheme",
            ));
        }
        if self.client_token.is_empty() {
            return Err(crate::Error::config("EdgeGrid client_token cannot be empty"));
        }
        if self.client_secret.is_empty() {
            return Err(crate::Error::config("EdgeGrid client_secret cannot be empty"));
        }
        if self.access_token.is_empty() {
            return Err(crate::Error::config("EdgeGrid access_token cannot be empty"));
        }
        if self.max_body == 0 {
            return Err(crate::Error::config("EdgeGrid max_body must be > 0"));
        }
        Ok(())
    }
}

impl std::fmt::Debug for EdgeGridConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("EdgeGridConfig")
            .field("host", &self.host)
            .field("client_token", &"<REDACTED>")
            .field("client_secret", &"<REDACTED>")
            .field("access_token", &"<REDACTED>")
            .field("max_body", &self.max_body)
            .field("base_url", &self.base_url)
            .finish()
    }
}

/// HTTP client settings
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ClientConfig {
    /// Timeout applied to every HTTP request (in seconds)
    #[serde(default = "default_request_timeout_secs")]
    pub request_timeout_secs: u64,

    /// User-Agent header sent with every request
    #[serde(default = "default_user_agent")]
    pub user_agent: String,
}

impl ClientConfig {
    /// Validate the client settings
    pub fn validate(&self) -> Result<(), crate::Error> {
        if self.request_timeout_secs == 0 {
            return Err(crate::Error::config("Request timeout must be > 0"));
        }
        if self.user_agent.is_empty() {
            return Err(crate::Error::config("User agent cannot be empty"));
        }
        Ok(())
    }
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self {
            request_timeout_secs: default_request_timeout_secs(),
            user_agent: default_user_agent(),
        }
    }
}

fn default_max_body() -> usize {
    131_072
}

fn default_request_timeout_secs() -> u64 {
    30
}

fn default_user_agent() -> String {
    format!("secconf/{}", env!("CARGO_PKG_VERSION"))
}
