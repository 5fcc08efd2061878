//! Test doubles for Bot Manager handler tests

#![allow(dead_code)]

use async_trait::async_trait;
use secconf_botman::BotmanClient;
use secconf_botman::model::*;
use secconf_core::error::{Error, Result};
use secconf_core::OpContext;
use std::sync::Mutex;
use std::sync::atomic::{AtomicBool, Ordering};

pub const CONFIG_ID: i64 = 43253;
pub const LATEST_VERSION: i64 = 15;

/// Recategorized bot list fixture
pub const BOT_LIST_FIXTURE: &str = include_str!("../testdata/RecategorizedAkamaiDefinedBotList.json");

/// Recording Bot Manager client serving the fixture
#[derive(Default)]
pub struct MockBotmanClient {
    version_lookups: Mutex<Vec<i64>>,
    requests: Mutex<Vec<GetRecategorizedAkamaiDefinedBotListRequest>>,
    pub fail_version_lookup: AtomicBool,
}

impl MockBotmanClient {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn version_lookups(&self) -> Vec<i64> {
        self.version_lookups.lock().unwrap().clone()
    }

    pub fn requests(&self) -> Vec<GetRecategorizedAkamaiDefinedBotListRequest> {
        self.requests.lock().unwrap().clone()
    }
}

#[async_trait]
impl BotmanClient for MockBotmanClient {
    async fn get_latest_config_version(&self, _ctx: &OpContext, config_id: i64) -> Result<i64> {
        self.version_lookups.lock().unwrap().push(config_id);
        if self.fail_version_lookup.load(Ordering::SeqCst) {
            return Err(Error::auth("Invalid credentials or insufficient permissions"));
        }
        Ok(LATEST_VERSION)
    }

    async fn get_recategorized_akamai_defined_bot_list(
        &self,
        _ctx: &OpContext,
        request: &GetRecategorizedAkamaiDefinedBotListRequest,
    ) -> Result<GetRecategorizedAkamaiDefinedBotListResponse> {
        self.requests.lock().unwrap().push(request.clone());
        let mut response: GetRecategorizedAkamaiDefinedBotListResponse =
            serde_json::from_str(BOT_LIST_FIXTURE)?;

        if !request.bot_id.is_empty() {
            response.recategorized_bots.retain(|bot| bot.bot_id == request.bot_id);
            if response.recategorized_bots.is_empty() {
                return Err(Error::not_found(format!("bot {}", request.bot_id)));
            }
        }
        Ok(response)
    }
}
