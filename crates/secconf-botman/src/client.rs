// # Bot Manager Client
//
// ## API Reference
//
// - Configuration summary: GET `/appsec/v1/configs/:c`
// - Recategorized bots: GET `/appsec/v1/configs/:c/versions/:v/recategorized-akamai-defined-bots[/:botId]`

use async_trait::async_trait;
use secconf_core::http::path_segment;
use secconf_core::{ApiClient, OpContext, Result};

use crate::model::*;

/// Remote calls used by the Bot Manager handlers
#[async_trait]
pub trait BotmanClient: Send + Sync {
    /// Latest version of a security configuration
    async fn get_latest_config_version(&self, ctx: &OpContext, config_id: i64) -> Result<i64>;

    /// Fetch all recategorized bots, or one when `bot_id` is set
    async fn get_recategorized_akamai_defined_bot_list(
        &self,
        ctx: &OpContext,
        request: &GetRecategorizedAkamaiDefinedBotListRequest,
    ) -> Result<GetRecategorizedAkamaiDefinedBotListResponse>;
}

/// HTTP implementation of [`BotmanClient`]
#[derive(Debug)]
pub struct HttpBotmanClient {
    api: ApiClient,
}

impl HttpBotmanClient {
    /// Wrap a configured API client
    pub fn new(api: ApiClient) -> Self {
        Self { api }
    }
}

#[async_trait]
impl BotmanClient for HttpBotmanClient {
    async fn get_latest_config_version(&self, ctx: &OpContext, config_id: i64) -> Result<i64> {
        let path = format!("/appsec/v1/configs/{}", config_id);
        let summary: ConfigSummary = ctx
            .run("GetLatestConfigVersion", self.api.get_json(&path))
            .await?;
        Ok(summary.latest_version)
    }

    async fn get_recategorized_akamai_defined_bot_list(
        &self,
        ctx: &OpContext,
        request: &GetRecategorizedAkamaiDefinedBotListRequest,
    ) -> Result<GetRecategorizedAkamaiDefinedBotListResponse> {
        let path = format!(
            "/appsec/v1/configs/{}/versions/{}/recategorized-akamai-defined-bots",
            request.config_id, request.version
        );

        if request.bot_id.is_empty() {
            return ctx
                .run("GetRecategorizedAkamaiDefinedBotList", self.api.get_json(&path))
                .await;
        }

        let path = format!("{}/{}", path, path_segment(&request.bot_id)?);
        let bot: RecategorizedAkamaiDefinedBot = ctx
            .run("GetRecategorizedAkamaiDefinedBotList", self.api.get_json(&path))
            .await?;
        Ok(GetRecategorizedAkamaiDefinedBotListResponse {
            recategorized_bots: vec![bot],
        })
    }
}
