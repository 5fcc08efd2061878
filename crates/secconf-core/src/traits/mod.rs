//! Core traits for the provider handlers
//!
//! This module defines the abstract interfaces that all implementations must follow.
//!
//! - [`Resource`]: Lifecycle handler for one remote object class
//! - [`DataSource`]: Read-only projection handler
//! - [`StateStore`]: Persistence of Local State between invocations

pub mod data_source;
pub mod resource;
pub mod state_store;

pub use data_source::DataSource;
pub use resource::Resource;
pub use state_store::{StateRecord, StateStore};
