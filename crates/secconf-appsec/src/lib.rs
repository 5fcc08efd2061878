// # Application Security Handlers
//
// Resource and data-source handlers backed by the Application Security API.
//
// | type name                                 | kind        |
// |-------------------------------------------|-------------|
// | `akamai_appsec_api_request_constraints`   | resource    |
// | `akamai_appsec_api_request_constraints`   | data source |
// | `akamai_appsec_reputation_profiles`       | data source |
//
// ## Handler Contract
//
// - ✅ One request value, one mutating remote call per Create/Update
// - ✅ Create/Update finish with a Read of the authoritative remote object
// - ✅ Remote failures are logged and wrapped with the operation name
// - ✅ Rendering `output_text` is best-effort; serializing `json` is not
// - ❌ NO retry logic (a failed call aborts the operation)
// - ❌ NO access to the state store (owned by the Reconciler)

use std::sync::Arc;

use secconf_core::HandlerRegistry;

pub mod client;
pub mod data_api_request_constraints;
pub mod data_reputation_profiles;
pub mod model;
pub mod resource_api_request_constraints;
pub mod templates;

pub use client::{AppSecClient, HttpAppSecClient};
pub use data_api_request_constraints::ApiRequestConstraintsDataSource;
pub use data_reputation_profiles::ReputationProfilesDataSource;
pub use resource_api_request_constraints::ApiRequestConstraintsResource;

/// Register every handler of this crate, sharing one client
pub fn register(registry: &HandlerRegistry, client: Arc<dyn AppSecClient>) {
    registry.register_resource(Arc::new(ApiRequestConstraintsResource::new(client.clone())));
    registry.register_data_source(Arc::new(ApiRequestConstraintsDataSource::new(
        client.clone(),
    )));
    registry.register_data_source(Arc::new(ReputationProfilesDataSource::new(client)));
}
