// # secconf-core
//
// Core library for the security-configuration provider handlers.
//
// ## Architecture Overview
//
// This library provides the shared machinery every handler crate builds on:
// - **Resource**: Trait for lifecycle handlers (create/read/update/delete/import)
// - **DataSource**: Trait for read-only projection handlers
// - **ResourceData**: Local State of one instance, with a typed field accessor
// - **Schema**: Per-handler field declarations, validated at the boundary
// - **OpContext**: Caller-supplied cancellation and deadline, threaded through every remote call
// - **ApiClient**: EdgeGrid-signed HTTP plumbing shared by the remote client facades
// - **HandlerRegistry**: Plugin-based registry of handlers keyed by type name
// - **StateStore**: Persistence of Local State between invocations
// - **Reconciler**: Drives the absent/present state machine against a store
//
// ## Design Principles
//
// 1. **Thin handlers**: One request value, one remote call, one projection
// 2. **Authoritative remote**: Create/Update always finish with a Read
// 3. **Explicit injection**: Handlers receive their client at construction
// 4. **No retries**: Errors are wrapped with the failing operation and returned
// 5. **Commit on success**: Local State is persisted only after a successful operation

pub mod config;
pub mod context;
pub mod edgegrid;
pub mod engine;
pub mod error;
pub mod field;
pub mod http;
pub mod identity;
pub mod registry;
pub mod render;
pub mod schema;
pub mod state;
pub mod traits;

// Re-export core types for convenience
pub use config::{ClientConfig, EdgeGridConfig, ProviderConfig};
pub use context::OpContext;
pub use engine::Reconciler;
pub use error::{Error, Result};
pub use field::Field;
pub use http::ApiClient;
pub use identity::IdentityKey;
pub use registry::HandlerRegistry;
pub use render::OutputTemplates;
pub use schema::{FieldKind, FieldMode, FieldSchema, Schema};
pub use state::{FileStateStore, MemoryStateStore, ResourceData};
pub use traits::{DataSource, Resource, StateRecord, StateStore};
