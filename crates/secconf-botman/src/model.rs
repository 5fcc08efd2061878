//! Request and response values of the Bot Manager API

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

/// Summary of a security configuration
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ConfigSummary {
    pub id: i64,
    pub latest_version: i64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
}

/// Fetch the recategorized Akamai-defined bots of a configuration version
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GetRecategorizedAkamaiDefinedBotListRequest {
    pub config_id: i64,
    pub version: i64,
    /// Bot ID; empty means all recategorized bots
    pub bot_id: String,
}

/// Recategorized Akamai-defined bots
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct GetRecategorizedAkamaiDefinedBotListResponse {
    #[serde(rename = "recategorizedBots", default)]
    pub recategorized_bots: Vec<RecategorizedAkamaiDefinedBot>,
}

/// An Akamai-defined bot moved into a custom category
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RecategorizedAkamaiDefinedBot {
    pub bot_id: String,
    pub custom_bot_category_id: String,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}
