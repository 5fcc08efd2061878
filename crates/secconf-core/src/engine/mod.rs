//! Lifecycle reconciler
//!
//! The Reconciler drives a handler through the absent/present state machine
//! and persists Local State only after an operation succeeds.
//!
//! ## Architecture
//!
//! ```text
//!                   ┌──────────────┐
//!  address, config ─▶  Reconciler  │
//!                   └──────────────┘
//!                          │
//!          ┌───────────────┼────────────────┐
//!          ▼               ▼                ▼
//!  ┌──────────────┐ ┌──────────────┐ ┌─────────────┐
//!  │HandlerRegistry│ │ Resource /   │ │ StateStore  │
//!  │ (lookup)      │ │ DataSource   │ │ (commit)    │
//!  └──────────────┘ └──────────────┘ └─────────────┘
//! ```
//!
//! ## Transitions
//!
//! | operation | stored before | handler result | stored after        |
//! |-----------|---------------|----------------|---------------------|
//! | apply     | absent        | Ok             | present (create)    |
//! | apply     | absent        | Err            | absent              |
//! | apply     | present       | Ok             | present (update)    |
//! | apply     | present       | Err            | present, unchanged  |
//! | destroy   | present       | Ok             | absent              |
//! | destroy   | present       | Err            | present, unchanged  |
//! | import    | absent        | Ok             | present             |
//!
//! Handlers always work on a copy of the stored Local State, so a failure
//! part-way through an operation never leaks into the store.

use std::sync::Arc;

use crate::context::OpContext;
use crate::error::{Error, Result};
use crate::registry::HandlerRegistry;
use crate::state::ResourceData;
use crate::traits::{StateRecord, StateStore};
use tracing::{debug, error, info, warn};

/// Drives lifecycle operations against a state store
pub struct Reconciler {
    /// Handler lookup by type name
    registry: Arc<HandlerRegistry>,

    /// Local State persistence
    store: Arc<dyn StateStore>,
}

impl Reconciler {
    /// Create a reconciler
    pub fn new(registry: Arc<HandlerRegistry>, store: Arc<dyn StateStore>) -> Self {
        Self { registry, store }
    }

    /// Create the resource at `address`, or update it if it already exists
    ///
    /// # Returns
    ///
    /// The refreshed Local State that was committed to the store.
    pub async fn apply(
        &self,
        ctx: &OpContext,
        address: &str,
        type_name: &str,
        config: ResourceData,
    ) -> Result<ResourceData> {
        let handler = self.registry.resource(type_name)?;
        handler.schema().validate(&config)?;

        let mut working = config;
        match self.store.get(address).await? {
            Some(prior) => {
                if prior.type_name != type_name {
                    return Err(Error::config(format!(
                        "{} is managed as {}, not {}",
                        address, prior.type_name, type_name
                    )));
                }
                if let Some(id) = prior.data.id() {
                    working.set_id(id);
                }

                info!("Updating {}", address);
                if let Err(e) = handler.update(ctx, &mut working).await {
                    error!("Update of {} failed, keeping prior state: {}", address, e);
                    return Err(e);
                }
            }
            None => {
                info!("Creating {}", address);
                if let Err(e) = handler.create(ctx, &mut working).await {
                    error!("Create of {} failed: {}", address, e);
                    return Err(e);
                }
            }
        }

        if working.id().is_none() {
            return Err(Error::Other(format!(
                "{} handler did not set an identifier for {}",
                type_name, address
            )));
        }

        self.store
            .put(address, &StateRecord::new(type_name, working.clone()))
            .await?;
        Ok(working)
    }

    /// Refresh the stored Local State of `address` from the remote side
    pub async fn refresh(&self, ctx: &OpContext, address: &str) -> Result<ResourceData> {
        let record = self.stored(address).await?;
        let handler = self.registry.resource(&record.type_name)?;

        let mut working = record.data.clone();
        debug!("Refreshing {}", address);
        handler.read(ctx, &mut working).await?;

        self.store
            .put(address, &StateRecord::new(record.type_name, working.clone()))
            .await?;
        Ok(working)
    }

    /// Delete the resource at `address`
    ///
    /// Destroying an address that is not stored is a no-op.
    pub async fn destroy(&self, ctx: &OpContext, address: &str) -> Result<()> {
        let Some(record) = self.store.get(address).await? else {
            warn!("{} is not managed, nothing to destroy", address);
            return Ok(());
        };
        let handler = self.registry.resource(&record.type_name)?;

        let mut working = record.data.clone();
        info!("Destroying {}", address);
        if let Err(e) = handler.delete(ctx, &mut working).await {
            error!("Delete of {} failed, keeping state: {}", address, e);
            return Err(e);
        }

        if working.id().is_some() {
            return Err(Error::Other(format!(
                "{} handler did not clear the identifier of {}",
                record.type_name, address
            )));
        }

        self.store.delete(address).await
    }

    /// Adopt an existing remote object under `address`
    ///
    /// The handler's import is followed by a read, so the stored Local State
    /// is complete even though only the identifier was supplied.
    pub async fn import(
        &self,
        ctx: &OpContext,
        address: &str,
        type_name: &str,
        id: &str,
    ) -> Result<ResourceData> {
        if self.store.get(address).await?.is_some() {
            return Err(Error::config(format!("{} is already managed", address)));
        }
        let handler = self.registry.resource(type_name)?;

        info!("Importing {} as {}", id, address);
        let mut working = handler.import(ctx, id).await?;
        handler.read(ctx, &mut working).await?;

        self.store
            .put(address, &StateRecord::new(type_name, working.clone()))
            .await?;
        Ok(working)
    }

    /// Read a data source; nothing is stored
    pub async fn read_data_source(
        &self,
        ctx: &OpContext,
        type_name: &str,
        config: ResourceData,
    ) -> Result<ResourceData> {
        let handler = self.registry.data_source(type_name)?;
        handler.schema().validate(&config)?;

        let mut working = config;
        handler.read(ctx, &mut working).await?;
        Ok(working)
    }

    /// Stored record of `address`, if any
    pub async fn get(&self, address: &str) -> Result<Option<StateRecord>> {
        self.store.get(address).await
    }

    /// All managed addresses
    pub async fn addresses(&self) -> Result<Vec<String>> {
        self.store.list().await
    }

    async fn stored(&self, address: &str) -> Result<StateRecord> {
        self.store
            .get(address)
            .await?
            .ok_or_else(|| Error::state_store(format!("{} is not managed", address)))
    }
}
