// # State Store Trait
//
// Defines the interface for persisting Local State between invocations.
//
// ## Purpose
//
// Handlers own Local State only for the duration of one operation. The
// state store keeps the last reconciled view of every resource instance,
// keyed by its address, so the next invocation can tell whether an instance
// is absent or present.
//
// ## Implementations
//
// - In-memory: tests and one-shot usage
// - File-based: JSON file with atomic writes and backup recovery

use async_trait::async_trait;

use crate::state::ResourceData;

/// Persisted Local State of one resource instance
#[derive(Debug, Clone, PartialEq, serde::Serialize, serde::Deserialize)]
pub struct StateRecord {
    /// Handler type name
    pub type_name: String,
    /// Last reconciled Local State
    pub data: ResourceData,
    /// Timestamp of the last successful operation
    pub last_updated: chrono::DateTime<chrono::Utc>,
}

impl StateRecord {
    /// Create a state record stamped with the current time
    pub fn new(type_name: impl Into<String>, data: ResourceData) -> Self {
        Self {
            type_name: type_name.into(),
            data,
            last_updated: chrono::Utc::now(),
        }
    }

    /// Check if the record is stale (older than given duration)
    pub fn is_stale(&self, max_age: chrono::Duration) -> bool {
        let now = chrono::Utc::now();
        now.signed_duration_since(self.last_updated) > max_age
    }
}

/// Trait for state store implementations
///
/// # Thread Safety
///
/// All methods must be safe to call concurrently from multiple tasks.
///
/// # Implementation Guidelines
///
/// - **Async I/O only**: Use async file/database operations, never blocking I/O
/// - **Explicit flush**: `flush()` must persist all pending changes
/// - **No business logic**: Deciding what to store is the `Reconciler`'s job
#[async_trait]
pub trait StateStore: Send + Sync {
    /// Get the record stored under `address`
    ///
    /// # Returns
    ///
    /// - `Ok(Some(StateRecord))`: The stored record
    /// - `Ok(None)`: No record found (instance absent)
    /// - `Err(Error)`: Storage error
    async fn get(&self, address: &str) -> Result<Option<StateRecord>, crate::Error>;

    /// Create or replace the record stored under `address`
    async fn put(&self, address: &str, record: &StateRecord) -> Result<(), crate::Error>;

    /// Delete the record stored under `address`
    ///
    /// Succeeds if the record did not exist.
    async fn delete(&self, address: &str) -> Result<(), crate::Error>;

    /// List all stored addresses
    async fn list(&self) -> Result<Vec<String>, crate::Error>;

    /// Persist any pending changes
    async fn flush(&self) -> Result<(), crate::Error>;
}
