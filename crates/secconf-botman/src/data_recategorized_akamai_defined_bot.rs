//! Recategorized Akamai-defined bot data source
//!
//! Reads against the latest version of the configuration. The response is
//! exported as a single `json` blob.

use std::sync::Arc;

use async_trait::async_trait;
use secconf_core::error::{Result, calling};
use secconf_core::schema::{FieldKind, FieldSchema, Schema};
use secconf_core::{DataSource, OpContext, ResourceData};
use tracing::debug;

use crate::client::BotmanClient;
use crate::model::GetRecategorizedAkamaiDefinedBotListRequest;

/// Type name of the data source
pub const TYPE_NAME: &str = "akamai_botman_recategorized_akamai_defined_bot";

static SCHEMA: Schema = Schema::new(&[
    FieldSchema::required("config_id", FieldKind::Int),
    FieldSchema::optional("bot_id", FieldKind::String),
    FieldSchema::computed("json", FieldKind::String),
]);

/// Read-only view of recategorized Akamai-defined bots
pub struct RecategorizedAkamaiDefinedBotDataSource {
    client: Arc<dyn BotmanClient>,
}

impl RecategorizedAkamaiDefinedBotDataSource {
    pub fn new(client: Arc<dyn BotmanClient>) -> Self {
        Self { client }
    }
}

#[async_trait]
impl DataSource for RecategorizedAkamaiDefinedBotDataSource {
    fn type_name(&self) -> &'static str {
        TYPE_NAME
    }

    fn schema(&self) -> &'static Schema {
        &SCHEMA
    }

    async fn read(&self, ctx: &OpContext, data: &mut ResourceData) -> Result<()> {
        debug!("Reading recategorized Akamai-defined bots");
        let config_id = data.get_int("config_id").required("config_id")?;

        let version = self
            .client
            .get_latest_config_version(ctx, config_id)
            .await
            .map_err(calling("GetLatestConfigVersion"))?;

        let request = GetRecategorizedAkamaiDefinedBotListRequest {
            config_id,
            version,
            bot_id: data.get_string("bot_id").or_default()?,
        };

        let response = self
            .client
            .get_recategorized_akamai_defined_bot_list(ctx, &request)
            .await
            .map_err(calling("GetRecategorizedAkamaiDefinedBotList"))?;

        data.set("json", serde_json::to_string(&response)?)?;
        data.set_id(config_id.to_string());
        Ok(())
    }
}
