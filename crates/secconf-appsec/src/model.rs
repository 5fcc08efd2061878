//! Request and response values of the Application Security API
//!
//! Requests carry the full identity key plus the mutation payload. Responses
//! mirror the remote JSON so they can be serialized back verbatim into the
//! `json` output of the data sources.

use std::fmt;
use std::str::FromStr;

use secconf_core::Error;
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

/// Action applied to requests that violate API request constraints
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ConstraintAction {
    /// Log the violation
    Alert,
    /// Block the request
    Deny,
    /// Take no action; used to remove an endpoint-scoped constraint
    None,
}

impl ConstraintAction {
    /// Accepted textual values, in schema order
    pub const VALUES: &'static [&'static str] = &["alert", "deny", "none"];

    /// Textual value sent to the API
    pub fn as_str(&self) -> &'static str {
        match self {
            ConstraintAction::Alert => "alert",
            ConstraintAction::Deny => "deny",
            ConstraintAction::None => "none",
        }
    }
}

impl fmt::Display for ConstraintAction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for ConstraintAction {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "alert" => Ok(ConstraintAction::Alert),
            "deny" => Ok(ConstraintAction::Deny),
            "none" => Ok(ConstraintAction::None),
            other => Err(Error::extraction(format!(
                "field 'action': expected one of [{}], got '{}'",
                Self::VALUES.join(", "),
                other
            ))),
        }
    }
}

/// Fetch the API request constraints of a policy, or of one endpoint
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GetApiRequestConstraintsRequest {
    pub config_id: i64,
    pub version: i64,
    pub policy_id: String,
    /// API endpoint ID; 0 means policy-scoped
    pub api_id: i64,
}

/// API request constraints of a policy
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct GetApiRequestConstraintsResponse {
    #[serde(rename = "apiEndpoints", default)]
    pub api_endpoints: Vec<ApiEndpointConstraint>,
}

impl GetApiRequestConstraintsResponse {
    /// Action configured for one endpoint, if listed
    pub fn action_for(&self, api_id: i64) -> Option<&str> {
        self.api_endpoints
            .iter()
            .find(|endpoint| endpoint.id == api_id)
            .map(|endpoint| endpoint.action.as_str())
    }
}

/// Constraint action of one API endpoint
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ApiEndpointConstraint {
    pub id: i64,
    pub action: String,
}

/// Set the constraint action of a policy, or of one endpoint
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UpdateApiRequestConstraintsRequest {
    pub config_id: i64,
    pub version: i64,
    pub policy_id: String,
    /// API endpoint ID; 0 means policy-scoped
    pub api_id: i64,
    pub action: ConstraintAction,
}

/// Remove the constraint of one endpoint
///
/// The API has no DELETE verb for endpoint constraints; removal is an update
/// with [`ConstraintAction::None`], which is why the action is not a field.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RemoveApiRequestConstraintsRequest {
    pub config_id: i64,
    pub version: i64,
    pub policy_id: String,
    pub api_id: i64,
}

impl RemoveApiRequestConstraintsRequest {
    /// The equivalent update request
    pub fn as_update(&self) -> UpdateApiRequestConstraintsRequest {
        UpdateApiRequestConstraintsRequest {
            config_id: self.config_id,
            version: self.version,
            policy_id: self.policy_id.clone(),
            api_id: self.api_id,
            action: ConstraintAction::None,
        }
    }
}

/// Body and response of a constraint update
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct UpdateApiRequestConstraintsResponse {
    pub action: String,
}

/// Fetch the protections record of a policy
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GetPolicyProtectionsRequest {
    pub config_id: i64,
    pub version: i64,
    pub policy_id: String,
}

/// Capability flags of a security policy
///
/// Flags the crate does not know by name are kept in `extra`, so a
/// read-modify-write never drops them.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PolicyProtections {
    #[serde(default)]
    pub apply_api_constraints: bool,
    #[serde(default)]
    pub apply_application_layer_controls: bool,
    #[serde(default)]
    pub apply_botman_controls: bool,
    #[serde(default)]
    pub apply_network_layer_controls: bool,
    #[serde(default)]
    pub apply_rate_controls: bool,
    #[serde(default)]
    pub apply_reputation_controls: bool,
    #[serde(default)]
    pub apply_slow_post_controls: bool,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

/// Replace the protections record of a policy
#[derive(Debug, Clone, PartialEq)]
pub struct UpdatePolicyProtectionsRequest {
    pub config_id: i64,
    pub version: i64,
    pub policy_id: String,
    pub protections: PolicyProtections,
}

/// Fetch the reputation profiles of a configuration version, or one of them
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GetReputationProfilesRequest {
    pub config_id: i64,
    pub config_version: i64,
    /// Reputation profile ID; 0 means all profiles
    pub reputation_profile_id: i64,
}

/// Reputation profiles of a configuration version
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct GetReputationProfilesResponse {
    #[serde(rename = "reputationProfiles", default)]
    pub reputation_profiles: Vec<ReputationProfile>,
}

/// One reputation profile
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ReputationProfile {
    pub id: i64,
    pub name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub context: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub threshold: Option<i64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub shared_ip_handling: Option<String>,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}
