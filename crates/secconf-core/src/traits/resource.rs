// # Resource Trait
//
// Defines the lifecycle interface of a handler that owns one remote object
// class (e.g. the API request constraints of a security policy).
//
// ## Implementations
//
// - `akamai_appsec_api_request_constraints`: `secconf-appsec` crate
//
// ## Usage
//
// ```rust,ignore
// use secconf_core::{OpContext, Resource, ResourceData};
//
// async fn create(resource: &dyn Resource, mut data: ResourceData) -> secconf_core::Result<ResourceData> {
//     resource.create(&OpContext::new(), &mut data).await?;
//     Ok(data)
// }
// ```

use async_trait::async_trait;

use crate::context::OpContext;
use crate::error::Result;
use crate::schema::Schema;
use crate::state::ResourceData;

/// Lifecycle handler for one remote object class
///
/// # State Machine
///
/// Every instance is either **absent** (no identifier) or **present**
/// (identifier set):
///
/// - `create` / `import`: absent → present. On a remote error the instance
///   stays absent.
/// - `update`: present → present. On failure the identifier is kept; the
///   stale Local State is reconciled by the next successful `read`.
/// - `delete`: present → absent once the removal path completes. On a remote
///   error the identifier is kept.
///
/// # Contract
///
/// ## Allowed
/// - ✅ One mutating remote call per `create`/`update` (two calls for `delete`:
///   read current state, then write)
/// - ✅ Delegate to `read` after a mutation to refresh from the remote side
/// - ✅ Leave a computed text field unset when rendering fails
///
/// ## Forbidden
/// - ❌ Retry or back off (the caller decides)
/// - ❌ Trust a mutation's response instead of reading back
/// - ❌ Ignore an invalid (as opposed to absent) field
/// - ❌ Swallow cancellation from the [`OpContext`]
/// - ❌ Touch process-wide state; the client is injected at construction
#[async_trait]
pub trait Resource: Send + Sync {
    /// Type name used in configuration (e.g. "akamai_appsec_api_request_constraints")
    fn type_name(&self) -> &'static str;

    /// Field declarations
    fn schema(&self) -> &'static Schema;

    /// Create the remote object described by `data`, then refresh `data`
    async fn create(&self, ctx: &OpContext, data: &mut ResourceData) -> Result<()>;

    /// Refresh `data` from the remote object
    async fn read(&self, ctx: &OpContext, data: &mut ResourceData) -> Result<()>;

    /// Replace the remote object with `data`, then refresh `data`
    async fn update(&self, ctx: &OpContext, data: &mut ResourceData) -> Result<()>;

    /// Remove the remote object and clear the identifier of `data`
    async fn delete(&self, ctx: &OpContext, data: &mut ResourceData) -> Result<()>;

    /// Adopt an existing remote object by identifier
    ///
    /// The default is a passthrough: the identifier is stored as-is and the
    /// next `read` re-derives everything else from it.
    async fn import(&self, _ctx: &OpContext, id: &str) -> Result<ResourceData> {
        Ok(ResourceData::with_id(id))
    }
}
