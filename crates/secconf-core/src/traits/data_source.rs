// # Data Source Trait
//
// Defines the interface of a read-only projection handler.
//
// ## Implementations
//
// - `akamai_appsec_api_request_constraints`: `secconf-appsec` crate
// - `akamai_appsec_reputation_profiles`: `secconf-appsec` crate
// - `akamai_botman_recategorized_akamai_defined_bot`: `secconf-botman` crate

use async_trait::async_trait;

use crate::context::OpContext;
use crate::error::Result;
use crate::schema::Schema;
use crate::state::ResourceData;

/// Read-only projection of remote state into Local State
///
/// A data source sets a synthetic identifier (typically the config ID) so
/// the caller can track the instance, and otherwise has no side effects.
///
/// # Contract
///
/// - ✅ Resolve a requested sub-resource ID when forming the request
///   (targeted fetch), never by fetching the whole collection and filtering
/// - ✅ Emit a JSON blob of the full response when its shape is too variable
///   to flatten
/// - ❌ Tolerate getter errors: they are always fatal
/// - ❌ Tolerate serialization errors: the JSON blob is often the only output
#[async_trait]
pub trait DataSource: Send + Sync {
    /// Type name used in configuration (e.g. "akamai_appsec_reputation_profiles")
    fn type_name(&self) -> &'static str;

    /// Field declarations
    fn schema(&self) -> &'static Schema;

    /// Fill the computed fields and identifier of `data`
    async fn read(&self, ctx: &OpContext, data: &mut ResourceData) -> Result<()>;
}
