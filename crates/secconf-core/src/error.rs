//! Error types for the provider handlers
//!
//! This module defines all error types used throughout the workspace.

use thiserror::Error;

/// Result type alias for handler operations
pub type Result<T> = std::result::Result<T, Error>;

/// Core error type for the provider handlers
#[derive(Error, Debug)]
pub enum Error {
    /// A required Local State field is missing or has the wrong shape
    #[error("Configuration extraction error: {0}")]
    Extraction(String),

    /// Provider configuration errors
    #[error("Configuration error: {0}")]
    Config(String),

    /// Invalid input
    #[error("Invalid input: {0}")]
    InvalidInput(String),

    /// A remote operation failed
    #[error("calling '{operation}': {source}")]
    Remote {
        /// Name of the remote operation (e.g. "GetApiRequestConstraints")
        operation: String,
        /// Underlying failure
        #[source]
        source: Box<Error>,
    },

    /// HTTP client errors (transport, unexpected status)
    #[error("HTTP error: {0}")]
    Http(String),

    /// Authentication errors
    #[error("Authentication failed: {0}")]
    Authentication(String),

    /// Rate limiting errors
    #[error("Rate limited: {0}")]
    RateLimited(String),

    /// Concurrent modification reported by the remote side
    #[error("Conflict: {0}")]
    Conflict(String),

    /// Remote object not found
    #[error("Not found: {0}")]
    NotFound(String),

    /// Derived text rendering failed
    #[error("Render error: {0}")]
    Render(String),

    /// JSON serialization/deserialization errors
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// Filesystem errors
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// State store-related errors
    #[error("State store error: {0}")]
    StateStore(String),

    /// The caller cancelled the operation
    #[error("Operation cancelled: {0}")]
    Cancelled(String),

    /// The caller's deadline elapsed
    #[error("Deadline exceeded: {0}")]
    DeadlineExceeded(String),

    /// Generic error with context
    #[error("{0}")]
    Other(String),
}

impl Error {
    /// Create a configuration extraction error
    pub fn extraction(msg: impl Into<String>) -> Self {
        Self::Extraction(msg.into())
    }

    /// Create a configuration error
    pub fn config(msg: impl Into<String>) -> Self {
        Self::Config(msg.into())
    }

    /// Create an invalid input error
    pub fn invalid_input(msg: impl Into<String>) -> Self {
        Self::InvalidInput(msg.into())
    }

    /// Wrap an error with the name of the remote operation that produced it
    pub fn remote(operation: impl Into<String>, source: Error) -> Self {
        Self::Remote {
            operation: operation.into(),
            source: Box::new(source),
        }
    }

    /// Create an HTTP error
    pub fn http(msg: impl Into<String>) -> Self {
        Self::Http(msg.into())
    }

    /// Create an authentication error
    pub fn auth(msg: impl Into<String>) -> Self {
        Self::Authentication(msg.into())
    }

    /// Create a rate limit error
    pub fn rate_limited(msg: impl Into<String>) -> Self {
        Self::RateLimited(msg.into())
    }

    /// Create a conflict error
    pub fn conflict(msg: impl Into<String>) -> Self {
        Self::Conflict(msg.into())
    }

    /// Create a "not found" error
    pub fn not_found(msg: impl Into<String>) -> Self {
        Self::NotFound(msg.into())
    }

    /// Create a render error
    pub fn render(msg: impl Into<String>) -> Self {
        Self::Render(msg.into())
    }

    /// Create a state store error
    pub fn state_store(msg: impl Into<String>) -> Self {
        Self::StateStore(msg.into())
    }

    /// Create a cancellation error
    pub fn cancelled(msg: impl Into<String>) -> Self {
        Self::Cancelled(msg.into())
    }

    /// Create a deadline error
    pub fn deadline_exceeded(msg: impl Into<String>) -> Self {
        Self::DeadlineExceeded(msg.into())
    }

    /// True when the remote object does not exist, looking through remote wrappers
    pub fn is_not_found(&self) -> bool {
        match self {
            Self::NotFound(_) => true,
            Self::Remote { source, .. } => source.is_not_found(),
            _ => false,
        }
    }

    /// True when the operation was aborted by its caller
    pub fn is_cancelled(&self) -> bool {
        match self {
            Self::Cancelled(_) | Self::DeadlineExceeded(_) => true,
            Self::Remote { source, .. } => source.is_cancelled(),
            _ => false,
        }
    }

    /// Name of the failing remote operation, if this is a remote error
    pub fn operation(&self) -> Option<&str> {
        match self {
            Self::Remote { operation, .. } => Some(operation),
            _ => None,
        }
    }
}

/// Log a failed remote call and wrap it with the operation name
///
/// ```rust,ignore
/// let response = client
///     .get_policy_protections(ctx, &request)
///     .await
///     .map_err(calling("GetPolicyProtections"))?;
/// ```
pub fn calling(operation: &'static str) -> impl FnOnce(Error) -> Error {
    move |err| {
        tracing::error!("calling '{}': {}", operation, err);
        Error::remote(operation, err)
    }
}

/// Helper for converting anyhow::Error to our Error type
impl From<anyhow::Error> for Error {
    fn from(err: anyhow::Error) -> Self {
        Self::Other(err.to_string())
    }
}
