// # Memory State Store
//
// In-memory implementation of StateStore.
//
// ## Purpose
//
// Provides a simple, fast state store that doesn't persist across restarts.
// Useful for tests and for embedding the handlers in a process that owns
// persistence itself.

use std::collections::HashMap;
use std::sync::Arc;
use tokio::sync::RwLock;
use async_trait::async_trait;

use crate::traits::state_store::{StateRecord, StateStore};
use crate::Error;

/// In-memory state store implementation
///
/// # Example
///
/// ```rust,no_run
/// use secconf_core::state::{MemoryStateStore, ResourceData};
/// use secconf_core::traits::{StateRecord, StateStore};
///
/// #[tokio::main]
/// async fn main() -> Result<(), Box<dyn std::error::Error>> {
///     let store = MemoryStateStore::new();
///
///     let record = StateRecord::new("akamai_appsec_api_request_constraints", ResourceData::with_id("43253:7:AAAA_81230"));
///     store.put("akamai_appsec_api_request_constraints.policy", &record).await?;
///
///     let stored = store.get("akamai_appsec_api_request_constraints.policy").await?;
///     assert_eq!(stored, Some(record));
///
///     Ok(())
/// }
/// ```
#[derive(Debug, Clone)]
pub struct MemoryStateStore {
    inner: Arc<RwLock<HashMap<String, StateRecord>>>,
}

impl MemoryStateStore {
    /// Create a new empty memory state store
    pub fn new() -> Self {
        Self {
            inner: Arc::new(RwLock::new(HashMap::new())),
        }
    }

    /// Get the number of records in the store
    pub async fn len(&self) -> usize {
        self.inner.read().await.len()
    }

    /// Check if the store is empty
    pub async fn is_empty(&self) -> bool {
        self.inner.read().await.is_empty()
    }

    /// Clear all records from the store
    pub async fn clear(&self) {
        self.inner.write().await.clear();
    }
}

impl Default for MemoryStateStore {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl StateStore for MemoryStateStore {
    async fn get(&self, address: &str) -> Result<Option<StateRecord>, Error> {
        let guard = self.inner.read().await;
        Ok(guard.get(address).cloned())
    }

    async fn put(&self, address: &str, record: &StateRecord) -> Result<(), Error> {
        let mut guard = self.inner.write().await;
        guard.insert(address.to_string(), record.clone());
        Ok(())
    }

    async fn delete(&self, address: &str) -> Result<(), Error> {
        let mut guard = self.inner.write().await;
        guard.remove(address);
        Ok(())
    }

    async fn list(&self) -> Result<Vec<String>, Error> {
        let guard = self.inner.read().await;
        Ok(guard.keys().cloned().collect())
    }

    async fn flush(&self) -> Result<(), Error> {
        // Nothing buffered
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::state::ResourceData;

    fn record(id: &str) -> StateRecord {
        StateRecord::new("akamai_appsec_api_request_constraints", ResourceData::with_id(id))
    }

    #[tokio::test]
    async fn test_memory_store_basic() {
        let store = MemoryStateStore::new();
        assert!(store.is_empty().await);

        store.put("constraints.a", &record("43253:7:AAAA_81230")).await.unwrap();
        assert_eq!(store.len().await, 1);

        let stored = store.get("constraints.a").await.unwrap().unwrap();
        assert_eq!(stored.data.id(), Some("43253:7:AAAA_81230"));

        store.delete("constraints.a").await.unwrap();
        assert!(store.is_empty().await);

        // Deleting an absent record succeeds
        store.delete("constraints.a").await.unwrap();
    }

    #[tokio::test]
    async fn test_memory_store_list() {
        let store = MemoryStateStore::new();
        store.put("constraints.a", &record("1:1:A")).await.unwrap();
        store.put("constraints.b", &record("1:1:B")).await.unwrap();

        let addresses = store.list().await.unwrap();
        assert_eq!(addresses.len(), 2);
        assert!(addresses.contains(&"constraints.a".to_string()));
        assert!(addresses.contains(&"constraints.b".to_string()));
    }
}
