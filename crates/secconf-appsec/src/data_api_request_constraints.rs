//! API request constraints data source

use std::sync::Arc;

use async_trait::async_trait;
use secconf_core::error::{Result, calling};
use secconf_core::schema::{FieldKind, FieldSchema, Schema};
use secconf_core::{DataSource, OpContext, OutputTemplates, ResourceData};
use tracing::{debug, warn};

use crate::client::AppSecClient;
use crate::model::GetApiRequestConstraintsRequest;
use crate::templates::{self, output_templates};

/// Type name of the data source
pub const TYPE_NAME: &str = "akamai_appsec_api_request_constraints";

static SCHEMA: Schema = Schema::new(&[
    FieldSchema::required("config_id", FieldKind::Int),
    FieldSchema::required("version", FieldKind::Int),
    FieldSchema::required("security_policy_id", FieldKind::String),
    FieldSchema::optional("api_id", FieldKind::Int),
    FieldSchema::computed("json", FieldKind::String),
    FieldSchema::computed("output_text", FieldKind::String).describe("Text Export representation"),
]);

/// Read-only view of the API request constraints of a policy
pub struct ApiRequestConstraintsDataSource {
    client: Arc<dyn AppSecClient>,
    templates: OutputTemplates,
}

impl ApiRequestConstraintsDataSource {
    pub fn new(client: Arc<dyn AppSecClient>) -> Self {
        Self::with_templates(client, output_templates())
    }

    pub fn with_templates(client: Arc<dyn AppSecClient>, templates: OutputTemplates) -> Self {
        Self { client, templates }
    }
}

#[async_trait]
impl DataSource for ApiRequestConstraintsDataSource {
    fn type_name(&self) -> &'static str {
        TYPE_NAME
    }

    fn schema(&self) -> &'static Schema {
        &SCHEMA
    }

    async fn read(&self, ctx: &OpContext, data: &mut ResourceData) -> Result<()> {
        let request = GetApiRequestConstraintsRequest {
            config_id: data.get_int("config_id").required("config_id")?,
            version: data.get_int("version").required("version")?,
            policy_id: data
                .get_string("security_policy_id")
                .required("security_policy_id")?,
            api_id: data.get_int("api_id").or_default()?,
        };

        debug!("Reading API request constraints data source {:?}", request);
        let response = self
            .client
            .get_api_request_constraints(ctx, &request)
            .await
            .map_err(calling("GetApiRequestConstraints"))?;

        data.set("json", serde_json::to_string(&response)?)?;

        match self
            .templates
            .render(templates::API_REQUEST_CONSTRAINTS, &response)
        {
            Ok(text) => data.set("output_text", text)?,
            Err(e) => {
                warn!("Leaving output_text unset: {}", e);
                data.remove("output_text");
            }
        }

        data.set_id(request.config_id.to_string());
        Ok(())
    }
}
