//! Reputation profiles data source
//!
//! Lists the reputation profiles of a configuration version. When
//! `reputation_profile_id` is set, only that profile is requested from the
//! API; the collection is never fetched and filtered locally.

use std::sync::Arc;

use async_trait::async_trait;
use secconf_core::error::{Result, calling};
use secconf_core::schema::{FieldKind, FieldSchema, Schema};
use secconf_core::{DataSource, OpContext, OutputTemplates, ResourceData};
use tracing::{debug, warn};

use crate::client::AppSecClient;
use crate::model::GetReputationProfilesRequest;
use crate::templates::{self, output_templates};

/// Type name of the data source
pub const TYPE_NAME: &str = "akamai_appsec_reputation_profiles";

static SCHEMA: Schema = Schema::new(&[
    FieldSchema::required("config_id", FieldKind::Int),
    FieldSchema::required("version", FieldKind::Int),
    FieldSchema::optional("reputation_profile_id", FieldKind::Int),
    FieldSchema::computed("json", FieldKind::String),
    FieldSchema::computed("output_text", FieldKind::String).describe("Text Export representation"),
]);

/// Read-only view of reputation profiles
pub struct ReputationProfilesDataSource {
    client: Arc<dyn AppSecClient>,
    templates: OutputTemplates,
}

impl ReputationProfilesDataSource {
    pub fn new(client: Arc<dyn AppSecClient>) -> Self {
        Self {
            client,
            templates: output_templates(),
        }
    }
}

#[async_trait]
impl DataSource for ReputationProfilesDataSource {
    fn type_name(&self) -> &'static str {
        TYPE_NAME
    }

    fn schema(&self) -> &'static Schema {
        &SCHEMA
    }

    async fn read(&self, ctx: &OpContext, data: &mut ResourceData) -> Result<()> {
        let request = GetReputationProfilesRequest {
            config_id: data.get_int("config_id").required("config_id")?,
            config_version: data.get_int("version").required("version")?,
            reputation_profile_id: data.get_int("reputation_profile_id").or_default()?,
        };

        debug!("Reading reputation profiles {:?}", request);
        let response = self
            .client
            .get_reputation_profiles(ctx, &request)
            .await
            .map_err(calling("GetReputationProfiles"))?;

        data.set("json", serde_json::to_string(&response)?)?;

        match self.templates.render(templates::REPUTATION_PROFILES, &response) {
            Ok(text) => data.set("output_text", text)?,
            Err(e) => warn!("Leaving output_text unset: {}", e),
        }

        data.set_id(request.config_id.to_string());
        Ok(())
    }
}
