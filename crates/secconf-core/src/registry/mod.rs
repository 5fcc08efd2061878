//! Plugin-based handler registry
//!
//! The registry maps configuration type names to resource and data-source
//! handlers, avoiding hardcoded if-else chains in the driver.
//!
//! ## Registration
//!
//! Handler crates register themselves during initialization, passing the
//! client each handler will use:
//!
//! ```rust,ignore
//! // In the secconf-appsec crate
//! pub fn register(registry: &HandlerRegistry, client: Arc<dyn AppSecClient>) {
//!     registry.register_resource(Arc::new(ApiRequestConstraintsResource::new(client.clone())));
//!     registry.register_data_source(Arc::new(ReputationProfilesDataSource::new(client)));
//! }
//! ```

use crate::error::{Error, Result};
use crate::traits::{DataSource, Resource};
use std::collections::HashMap;
use std::sync::{Arc, PoisonError, RwLock};

/// Registry of handlers keyed by type name
///
/// ## Thread Safety
///
/// The registry uses interior mutability with RwLock, allowing concurrent
/// reads and exclusive writes.
#[derive(Default)]
pub struct HandlerRegistry {
    /// Registered resource handlers
    resources: RwLock<HashMap<String, Arc<dyn Resource>>>,

    /// Registered data-source handlers
    data_sources: RwLock<HashMap<String, Arc<dyn DataSource>>>,
}

impl HandlerRegistry {
    /// Create a new empty registry
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a resource handler under its type name
    pub fn register_resource(&self, handler: Arc<dyn Resource>) {
        let name = handler.type_name().to_string();
        tracing::debug!("Registering resource handler: {}", name);
        let mut resources = self.resources.write().unwrap_or_else(PoisonError::into_inner);
        resources.insert(name, handler);
    }

    /// Register a data-source handler under its type name
    pub fn register_data_source(&self, handler: Arc<dyn DataSource>) {
        let name = handler.type_name().to_string();
        tracing::debug!("Registering data source handler: {}", name);
        let mut sources = self
            .data_sources
            .write()
            .unwrap_or_else(PoisonError::into_inner);
        sources.insert(name, handler);
    }

    /// Look up a resource handler
    ///
    /// # Returns
    ///
    /// - `Ok(Arc<dyn Resource>)`: The registered handler
    /// - `Err(Error)`: If no handler is registered under `type_name`
    pub fn resource(&self, type_name: &str) -> Result<Arc<dyn Resource>> {
        let resources = self.resources.read().unwrap_or_else(PoisonError::into_inner);
        resources
            .get(type_name)
            .cloned()
            .ok_or_else(|| Error::config(format!("Unknown resource type: {}", type_name)))
    }

    /// Look up a data-source handler
    pub fn data_source(&self, type_name: &str) -> Result<Arc<dyn DataSource>> {
        let sources = self.data_sources.read().unwrap_or_else(PoisonError::into_inner);
        sources
            .get(type_name)
            .cloned()
            .ok_or_else(|| Error::config(format!("Unknown data source type: {}", type_name)))
    }

    /// List all registered resource types, sorted
    pub fn list_resources(&self) -> Vec<String> {
        let resources = self.resources.read().unwrap_or_else(PoisonError::into_inner);
        let mut names: Vec<String> = resources.keys().cloned().collect();
        names.sort();
        names
    }

    /// List all registered data-source types, sorted
    pub fn list_data_sources(&self) -> Vec<String> {
        let sources = self.data_sources.read().unwrap_or_else(PoisonError::into_inner);
        let mut names: Vec<String> = sources.keys().cloned().collect();
        names.sort();
        names
    }

    /// Check if a resource type is registered
    pub fn has_resource(&self, type_name: &str) -> bool {
        let resources = self.resources.read().unwrap_or_else(PoisonError::into_inner);
        resources.contains_key(type_name)
    }

    /// Check if a data-source type is registered
    pub fn has_data_source(&self, type_name: &str) -> bool {
        let sources = self.data_sources.read().unwrap_or_else(PoisonError::into_inner);
        sources.contains_key(type_name)
    }
}
