// # Bot Manager Handlers
//
// | type name                                         | kind        |
// |---------------------------------------------------|-------------|
// | `akamai_botman_recategorized_akamai_defined_bot`  | data source |
//
// Bot Manager reads always target the latest version of a configuration,
// looked up per read.

use std::sync::Arc;

use secconf_core::HandlerRegistry;

pub mod client;
pub mod data_recategorized_akamai_defined_bot;
pub mod model;

pub use client::{BotmanClient, HttpBotmanClient};
pub use data_recategorized_akamai_defined_bot::RecategorizedAkamaiDefinedBotDataSource;

/// Register every handler of this crate
pub fn register(registry: &HandlerRegistry, client: Arc<dyn BotmanClient>) {
    registry.register_data_source(Arc::new(RecategorizedAkamaiDefinedBotDataSource::new(client)));
}
