//! Test doubles and common utilities for handler contract tests
//!
//! `MockAppSecClient` keeps a small in-process model of the remote API and
//! records every call, so tests can assert both on the Local State a handler
//! produces and on the exact requests it issued.

#![allow(dead_code)]

use async_trait::async_trait;
use secconf_core::error::{Error, Result};
use secconf_core::{OpContext, ResourceData};
use secconf_appsec::AppSecClient;
use secconf_appsec::model::*;
use serde_json::json;
use std::collections::HashMap;
use std::sync::Mutex;

pub const CONFIG_ID: i64 = 43253;
pub const VERSION: i64 = 7;
pub const POLICY_ID: &str = "AAAA_81230";
pub const API_ID: i64 = 619183;

/// Reputation profile collection fixture
pub const REPUTATION_PROFILES_FIXTURE: &str = include_str!("../testdata/ReputationProfiles.json");

/// One recorded remote call
#[derive(Debug, Clone, PartialEq)]
pub enum Call {
    GetApiRequestConstraints(GetApiRequestConstraintsRequest),
    UpdateApiRequestConstraints(UpdateApiRequestConstraintsRequest),
    RemoveApiRequestConstraints(RemoveApiRequestConstraintsRequest),
    GetPolicyProtections(GetPolicyProtectionsRequest),
    UpdatePolicyProtections(UpdatePolicyProtectionsRequest),
    GetReputationProfiles(GetReputationProfilesRequest),
}

impl Call {
    pub fn operation(&self) -> &'static str {
        match self {
            Call::GetApiRequestConstraints(_) => "GetApiRequestConstraints",
            Call::UpdateApiRequestConstraints(_) => "UpdateApiRequestConstraints",
            Call::RemoveApiRequestConstraints(_) => "RemoveApiRequestConstraints",
            Call::GetPolicyProtections(_) => "GetPolicyProtections",
            Call::UpdatePolicyProtections(_) => "UpdatePolicyProtections",
            Call::GetReputationProfiles(_) => "GetReputationProfiles",
        }
    }
}

type PolicyKey = (i64, i64, String);

/// In-process model of the Application Security API
#[derive(Default)]
pub struct MockAppSecClient {
    calls: Mutex<Vec<Call>>,
    policy_actions: Mutex<HashMap<PolicyKey, String>>,
    endpoint_actions: Mutex<HashMap<(PolicyKey, i64), String>>,
    protections: Mutex<HashMap<PolicyKey, PolicyProtections>>,
    reputation_profiles: Mutex<Option<GetReputationProfilesResponse>>,
    failing: Mutex<Option<&'static str>>,
}

fn policy_key(config_id: i64, version: i64, policy_id: &str) -> PolicyKey {
    (config_id, version, policy_id.to_string())
}

impl MockAppSecClient {
    pub fn new() -> Self {
        Self::default()
    }

    /// A client whose policy exists with the given protections
    pub fn with_protections(protections: PolicyProtections) -> Self {
        let client = Self::new();
        client.set_protections(protections);
        client
    }

    /// A client serving the reputation profile fixture
    pub fn with_reputation_profiles() -> Self {
        let client = Self::new();
        let response = serde_json::from_str(REPUTATION_PROFILES_FIXTURE).unwrap();
        *client.reputation_profiles.lock().unwrap() = Some(response);
        client
    }

    pub fn set_protections(&self, protections: PolicyProtections) {
        self.protections
            .lock()
            .unwrap()
            .insert(policy_key(CONFIG_ID, VERSION, POLICY_ID), protections);
    }

    pub fn protections(&self) -> Option<PolicyProtections> {
        self.protections
            .lock()
            .unwrap()
            .get(&policy_key(CONFIG_ID, VERSION, POLICY_ID))
            .cloned()
    }

    pub fn endpoint_action(&self, api_id: i64) -> Option<String> {
        self.endpoint_actions
            .lock()
            .unwrap()
            .get(&(policy_key(CONFIG_ID, VERSION, POLICY_ID), api_id))
            .cloned()
    }

    /// Make every call of `operation` fail with a server error
    pub fn fail_on(&self, operation: &'static str) {
        *self.failing.lock().unwrap() = Some(operation);
    }

    pub fn calls(&self) -> Vec<Call> {
        self.calls.lock().unwrap().clone()
    }

    /// Operation names of the recorded calls, in order
    pub fn operations(&self) -> Vec<&'static str> {
        self.calls().iter().map(Call::operation).collect()
    }

    pub fn clear_calls(&self) {
        self.calls.lock().unwrap().clear();
    }

    fn record(&self, call: Call) -> Result<()> {
        let operation = call.operation();
        self.calls.lock().unwrap().push(call);
        if *self.failing.lock().unwrap() == Some(operation) {
            return Err(Error::http("Server error (transient): 500 Internal Server Error"));
        }
        Ok(())
    }
}

#[async_trait]
impl AppSecClient for MockAppSecClient {
    async fn get_api_request_constraints(
        &self,
        _ctx: &OpContext,
        request: &GetApiRequestConstraintsRequest,
    ) -> Result<GetApiRequestConstraintsResponse> {
        self.record(Call::GetApiRequestConstraints(request.clone()))?;
        let key = policy_key(request.config_id, request.version, &request.policy_id);

        let mut api_endpoints: Vec<ApiEndpointConstraint> = self
            .endpoint_actions
            .lock()
            .unwrap()
            .iter()
            .filter(|((policy, api_id), _)| {
                *policy == key && (request.api_id == 0 || *api_id == request.api_id)
            })
            .map(|((_, api_id), action)| ApiEndpointConstraint {
                id: *api_id,
                action: action.clone(),
            })
            .collect();
        api_endpoints.sort_by_key(|endpoint| endpoint.id);

        Ok(GetApiRequestConstraintsResponse { api_endpoints })
    }

    async fn update_api_request_constraints(
        &self,
        _ctx: &OpContext,
        request: &UpdateApiRequestConstraintsRequest,
    ) -> Result<UpdateApiRequestConstraintsResponse> {
        self.record(Call::UpdateApiRequestConstraints(request.clone()))?;
        let key = policy_key(request.config_id, request.version, &request.policy_id);
        let action = request.action.to_string();

        if request.api_id == 0 {
            self.policy_actions.lock().unwrap().insert(key.clone(), action.clone());
            self.protections
                .lock()
                .unwrap()
                .entry(key)
                .or_default()
                .apply_api_constraints = true;
        } else {
            self.endpoint_actions
                .lock()
                .unwrap()
                .insert((key, request.api_id), action.clone());
        }

        Ok(UpdateApiRequestConstraintsResponse { action })
    }

    async fn remove_api_request_constraints(
        &self,
        _ctx: &OpContext,
        request: &RemoveApiRequestConstraintsRequest,
    ) -> Result<UpdateApiRequestConstraintsResponse> {
        self.record(Call::RemoveApiRequestConstraints(request.clone()))?;
        let key = policy_key(request.config_id, request.version, &request.policy_id);

        match self.endpoint_actions.lock().unwrap().remove(&(key, request.api_id)) {
            Some(_) => Ok(UpdateApiRequestConstraintsResponse {
                action: ConstraintAction::None.to_string(),
            }),
            None => Err(Error::not_found(format!("API endpoint {}", request.api_id))),
        }
    }

    async fn get_policy_protections(
        &self,
        _ctx: &OpContext,
        request: &GetPolicyProtectionsRequest,
    ) -> Result<PolicyProtections> {
        self.record(Call::GetPolicyProtections(request.clone()))?;
        let key = policy_key(request.config_id, request.version, &request.policy_id);

        self.protections
            .lock()
            .unwrap()
            .get(&key)
            .cloned()
            .ok_or_else(|| Error::not_found(format!("security policy {}", request.policy_id)))
    }

    async fn update_policy_protections(
        &self,
        _ctx: &OpContext,
        request: &UpdatePolicyProtectionsRequest,
    ) -> Result<PolicyProtections> {
        self.record(Call::UpdatePolicyProtections(request.clone()))?;
        let key = policy_key(request.config_id, request.version, &request.policy_id);

        self.protections
            .lock()
            .unwrap()
            .insert(key, request.protections.clone());
        Ok(request.protections.clone())
    }

    async fn get_reputation_profiles(
        &self,
        _ctx: &OpContext,
        request: &GetReputationProfilesRequest,
    ) -> Result<GetReputationProfilesResponse> {
        self.record(Call::GetReputationProfiles(request.clone()))?;
        let all = self
            .reputation_profiles
            .lock()
            .unwrap()
            .clone()
            .ok_or_else(|| Error::not_found(format!("configuration {}", request.config_id)))?;

        if request.reputation_profile_id == 0 {
            return Ok(all);
        }

        let profile = all
            .reputation_profiles
            .into_iter()
            .find(|profile| profile.id == request.reputation_profile_id)
            .ok_or_else(|| {
                Error::not_found(format!("reputation profile {}", request.reputation_profile_id))
            })?;
        Ok(GetReputationProfilesResponse {
            reputation_profiles: vec![profile],
        })
    }
}

/// Protections with every flag set, plus one flag unknown to the model
pub fn all_protections() -> PolicyProtections {
    serde_json::from_value(json!({
        "applyApiConstraints": true,
        "applyApplicationLayerControls": true,
        "applyBotmanControls": true,
        "applyNetworkLayerControls": false,
        "applyRateControls": true,
        "applyReputationControls": false,
        "applySlowPostControls": true,
        "applyMalwareControls": true
    }))
    .unwrap()
}

/// Local State of a policy-scoped constraint
pub fn policy_config(action: &str) -> ResourceData {
    ResourceData::from_attributes([
        ("config_id", json!(CONFIG_ID)),
        ("version", json!(VERSION)),
        ("security_policy_id", json!(POLICY_ID)),
        ("action", json!(action)),
    ])
}

/// Local State of an endpoint-scoped constraint
pub fn endpoint_config(action: &str) -> ResourceData {
    let mut data = policy_config(action);
    data.set_raw("api_endpoint_id", json!(API_ID));
    data
}
