//! API request constraints resource
//!
//! Manages the constraint action of a security policy, or of one API endpoint
//! within it.
//!
//! ## Identifier
//!
//! The identifier is the [`IdentityKey`] of the constraint
//! (`config_id:version:policy_id[:api_endpoint_id]`), so an imported
//! identifier alone is enough for the next Read.
//!
//! ## Delete
//!
//! The API has no DELETE verb. An endpoint-scoped constraint is removed by
//! setting its action to `none`; a policy-scoped constraint is removed by
//! turning `applyApiConstraints` off in the policy's protections record,
//! leaving every other protection flag exactly as read.

use std::sync::Arc;

use async_trait::async_trait;
use secconf_core::error::{Error, Result, calling};
use secconf_core::schema::{FieldKind, FieldSchema, Schema};
use secconf_core::{IdentityKey, OpContext, OutputTemplates, Resource, ResourceData};
use tracing::{debug, info, warn};

use crate::client::AppSecClient;
use crate::model::*;
use crate::templates::{self, output_templates};

/// Type name of the resource
pub const TYPE_NAME: &str = "akamai_appsec_api_request_constraints";

static SCHEMA: Schema = Schema::new(&[
    FieldSchema::required("config_id", FieldKind::Int).describe("Security configuration ID"),
    FieldSchema::required("version", FieldKind::Int).describe("Security configuration version"),
    FieldSchema::required("security_policy_id", FieldKind::String)
        .describe("Security policy ID"),
    FieldSchema::optional("api_endpoint_id", FieldKind::Int)
        .describe("API endpoint ID; unset for a policy-wide constraint"),
    FieldSchema::required("action", FieldKind::String)
        .one_of(ConstraintAction::VALUES)
        .describe("Action for requests that violate the constraints"),
    FieldSchema::computed("output_text", FieldKind::String)
        .describe("Text Export representation"),
]);

/// Resource handler for API request constraints
pub struct ApiRequestConstraintsResource {
    client: Arc<dyn AppSecClient>,
    templates: OutputTemplates,
}

impl ApiRequestConstraintsResource {
    /// Create the handler with an injected client
    pub fn new(client: Arc<dyn AppSecClient>) -> Self {
        Self::with_templates(client, output_templates())
    }

    /// Create the handler with its own output templates
    pub fn with_templates(client: Arc<dyn AppSecClient>, templates: OutputTemplates) -> Self {
        Self { client, templates }
    }

    /// Issue the update described by `data` and refresh it
    async fn apply(&self, ctx: &OpContext, data: &mut ResourceData) -> Result<()> {
        let config = ConstraintsConfig::from_data(data)?;
        let request = UpdateApiRequestConstraintsRequest {
            config_id: config.key.config_id,
            version: config.key.version,
            policy_id: config.key.policy_id.clone(),
            api_id: config.key.sub_id_as_int()?,
            action: config.action,
        };

        info!("Setting API request constraints {} to {}", config.key, config.action);
        self.client
            .update_api_request_constraints(ctx, &request)
            .await
            .map_err(calling("UpdateApiRequestConstraints"))?;

        self.read(ctx, data).await
    }
}

/// Typed configuration of one constraint
struct ConstraintsConfig {
    key: IdentityKey,
    action: ConstraintAction,
}

impl ConstraintsConfig {
    fn from_data(data: &ResourceData) -> Result<Self> {
        Ok(Self {
            key: identity(data)?,
            action: data.get_string("action").required("action")?.parse()?,
        })
    }
}

/// Identity key of the constraint
///
/// Taken from the identity fields when they are set, otherwise parsed from
/// the identifier (the state right after an import).
fn identity(data: &ResourceData) -> Result<IdentityKey> {
    let Some(config_id) = data.get_int("config_id").optional()? else {
        let id = data
            .id()
            .ok_or_else(|| Error::extraction("required field 'config_id' is not set"))?;
        return id.parse();
    };

    let version = data.get_int("version").required("version")?;
    let policy_id = data
        .get_string("security_policy_id")
        .required("security_policy_id")?;
    let api_id = data.get_int("api_endpoint_id").or_default()?;

    let key = IdentityKey::new(config_id, version, policy_id);
    Ok(if api_id != 0 {
        key.with_sub_id(api_id.to_string())
    } else {
        key
    })
}

/// Treat "not found" from a removal call as already removed
fn tolerate_not_found<T>(result: Result<T>, operation: &'static str, key: &IdentityKey) -> Result<()> {
    match result {
        Ok(_) => Ok(()),
        Err(e) if e.is_not_found() => {
            warn!("{} for {}: already removed ({})", operation, key, e);
            Ok(())
        }
        Err(e) => Err(calling(operation)(e)),
    }
}

#[async_trait]
impl Resource for ApiRequestConstraintsResource {
    fn type_name(&self) -> &'static str {
        TYPE_NAME
    }

    fn schema(&self) -> &'static Schema {
        &SCHEMA
    }

    async fn create(&self, ctx: &OpContext, data: &mut ResourceData) -> Result<()> {
        self.apply(ctx, data).await
    }

    async fn read(&self, ctx: &OpContext, data: &mut ResourceData) -> Result<()> {
        let key = identity(data)?;
        let api_id = key.sub_id_as_int()?;
        let request = GetApiRequestConstraintsRequest {
            config_id: key.config_id,
            version: key.version,
            policy_id: key.policy_id.clone(),
            api_id,
        };

        debug!("Reading API request constraints {}", key);
        let response = self
            .client
            .get_api_request_constraints(ctx, &request)
            .await
            .map_err(calling("GetApiRequestConstraints"))?;

        data.set("config_id", key.config_id)?;
        data.set("version", key.version)?;
        data.set("security_policy_id", &key.policy_id)?;
        if api_id != 0 {
            data.set("api_endpoint_id", api_id)?;
            match response.action_for(api_id) {
                Some(action) => data.set("action", action)?,
                None => {
                    warn!("API endpoint {} has no constraints entry, dropping action", key);
                    data.remove("action");
                }
            }
        }

        match self
            .templates
            .render(templates::API_REQUEST_CONSTRAINTS, &response)
        {
            Ok(text) => data.set("output_text", text)?,
            Err(e) => {
                warn!("Leaving output_text unset for {}: {}", key, e);
                data.remove("output_text");
            }
        }

        data.set_id(key.to_string());
        Ok(())
    }

    async fn update(&self, ctx: &OpContext, data: &mut ResourceData) -> Result<()> {
        if let Some(id) = data.id() {
            let current: IdentityKey = id.parse()?;
            let requested = identity(data)?;
            if !current.same_object(&requested) {
                return Err(Error::config(format!(
                    "API request constraints {} cannot be moved to {}; only the version may change",
                    current, requested
                )));
            }
        }
        self.apply(ctx, data).await
    }

    async fn delete(&self, ctx: &OpContext, data: &mut ResourceData) -> Result<()> {
        let key = identity(data)?;
        let api_id = key.sub_id_as_int()?;

        let request = GetPolicyProtectionsRequest {
            config_id: key.config_id,
            version: key.version,
            policy_id: key.policy_id.clone(),
        };
        let protections = match self.client.get_policy_protections(ctx, &request).await {
            Ok(protections) => Some(protections),
            Err(e) if e.is_not_found() => {
                warn!("Policy of {} no longer exists: {}", key, e);
                None
            }
            Err(e) => return Err(calling("GetPolicyProtections")(e)),
        };

        match protections {
            None => {}
            Some(_) if api_id != 0 => {
                info!("Removing API request constraints {}", key);
                let request = RemoveApiRequestConstraintsRequest {
                    config_id: key.config_id,
                    version: key.version,
                    policy_id: key.policy_id.clone(),
                    api_id,
                };
                tolerate_not_found(
                    self.client.remove_api_request_constraints(ctx, &request).await,
                    "RemoveApiRequestConstraints",
                    &key,
                )?;
            }
            Some(protections) if protections.apply_api_constraints => {
                info!("Disabling API request constraints for {}", key);
                let request = UpdatePolicyProtectionsRequest {
                    config_id: key.config_id,
                    version: key.version,
                    policy_id: key.policy_id.clone(),
                    protections: PolicyProtections {
                        apply_api_constraints: false,
                        ..protections
                    },
                };
                tolerate_not_found(
                    self.client.update_policy_protections(ctx, &request).await,
                    "UpdatePolicyProtections",
                    &key,
                )?;
            }
            Some(_) => debug!("API request constraints already disabled for {}", key),
        }

        data.clear_id();
        Ok(())
    }
}
