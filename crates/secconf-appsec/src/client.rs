// # Application Security Client
//
// The client facade is the sole I/O boundary of the handlers in this crate.
// Handlers receive an `Arc<dyn AppSecClient>` at construction; tests inject a
// recording mock, the driver injects `HttpAppSecClient`.
//
// Every call goes through `OpContext::run`, so cancellation and deadlines
// abort the in-flight request.
//
// ## API Reference
//
// - Get constraints: GET `/appsec/v1/configs/:c/versions/:v/security-policies/:p/api-request-constraints[?apiId=:a]`
// - Update constraints: PUT `/appsec/v1/configs/:c/versions/:v/security-policies/:p/api-request-constraints[/:a]`
// - Protections: GET/PUT `/appsec/v1/configs/:c/versions/:v/security-policies/:p/protections`
// - Reputation profiles: GET `/appsec/v1/configs/:c/versions/:v/reputation-profiles[/:id]`

use async_trait::async_trait;
use secconf_core::http::path_segment;
use secconf_core::{ApiClient, OpContext, Result};
use serde_json::json;

use crate::model::*;

/// Remote calls used by the Application Security handlers
#[async_trait]
pub trait AppSecClient: Send + Sync {
    /// Fetch the constraints of a policy, or of one endpoint when `api_id` is set
    async fn get_api_request_constraints(
        &self,
        ctx: &OpContext,
        request: &GetApiRequestConstraintsRequest,
    ) -> Result<GetApiRequestConstraintsResponse>;

    /// Set the constraint action of a policy, or of one endpoint
    async fn update_api_request_constraints(
        &self,
        ctx: &OpContext,
        request: &UpdateApiRequestConstraintsRequest,
    ) -> Result<UpdateApiRequestConstraintsResponse>;

    /// Remove the constraint of one endpoint
    async fn remove_api_request_constraints(
        &self,
        ctx: &OpContext,
        request: &RemoveApiRequestConstraintsRequest,
    ) -> Result<UpdateApiRequestConstraintsResponse>;

    /// Fetch the protections record of a policy
    async fn get_policy_protections(
        &self,
        ctx: &OpContext,
        request: &GetPolicyProtectionsRequest,
    ) -> Result<PolicyProtections>;

    /// Replace the protections record of a policy
    async fn update_policy_protections(
        &self,
        ctx: &OpContext,
        request: &UpdatePolicyProtectionsRequest,
    ) -> Result<PolicyProtections>;

    /// Fetch all reputation profiles, or one when `reputation_profile_id` is set
    async fn get_reputation_profiles(
        &self,
        ctx: &OpContext,
        request: &GetReputationProfilesRequest,
    ) -> Result<GetReputationProfilesResponse>;
}

/// HTTP implementation of [`AppSecClient`]
#[derive(Debug)]
pub struct HttpAppSecClient {
    api: ApiClient,
}

impl HttpAppSecClient {
    /// Wrap a configured API client
    pub fn new(api: ApiClient) -> Self {
        Self { api }
    }

    fn version_path(config_id: i64, version: i64) -> String {
        format!("/appsec/v1/configs/{}/versions/{}", config_id, version)
    }

    fn policy_path(config_id: i64, version: i64, policy_id: &str) -> Result<String> {
        Ok(format!(
            "{}/security-policies/{}",
            Self::version_path(config_id, version),
            path_segment(policy_id)?
        ))
    }

    fn constraints_path(config_id: i64, version: i64, policy_id: &str) -> Result<String> {
        Ok(format!(
            "{}/api-request-constraints",
            Self::policy_path(config_id, version, policy_id)?
        ))
    }

    async fn put_action(
        &self,
        ctx: &OpContext,
        operation: &str,
        request: &UpdateApiRequestConstraintsRequest,
    ) -> Result<UpdateApiRequestConstraintsResponse> {
        let mut path =
            Self::constraints_path(request.config_id, request.version, &request.policy_id)?;
        if request.api_id != 0 {
            path = format!("{}/{}", path, request.api_id);
        }

        let body = json!({ "action": request.action });
        ctx.run(operation, self.api.put_json(&path, &body)).await
    }
}

#[async_trait]
impl AppSecClient for HttpAppSecClient {
    async fn get_api_request_constraints(
        &self,
        ctx: &OpContext,
        request: &GetApiRequestConstraintsRequest,
    ) -> Result<GetApiRequestConstraintsResponse> {
        let mut path =
            Self::constraints_path(request.config_id, request.version, &request.policy_id)?;
        if request.api_id != 0 {
            path = format!("{}?apiId={}", path, request.api_id);
        }

        ctx.run("GetApiRequestConstraints", self.api.get_json(&path))
            .await
    }

    async fn update_api_request_constraints(
        &self,
        ctx: &OpContext,
        request: &UpdateApiRequestConstraintsRequest,
    ) -> Result<UpdateApiRequestConstraintsResponse> {
        self.put_action(ctx, "UpdateApiRequestConstraints", request)
            .await
    }

    async fn remove_api_request_constraints(
        &self,
        ctx: &OpContext,
        request: &RemoveApiRequestConstraintsRequest,
    ) -> Result<UpdateApiRequestConstraintsResponse> {
        self.put_action(ctx, "RemoveApiRequestConstraints", &request.as_update())
            .await
    }

    async fn get_policy_protections(
        &self,
        ctx: &OpContext,
        request: &GetPolicyProtectionsRequest,
    ) -> Result<PolicyProtections> {
        let path = format!(
            "{}/protections",
            Self::policy_path(request.config_id, request.version, &request.policy_id)?
        );
        ctx.run("GetPolicyProtections", self.api.get_json(&path))
            .await
    }

    async fn update_policy_protections(
        &self,
        ctx: &OpContext,
        request: &UpdatePolicyProtectionsRequest,
    ) -> Result<PolicyProtections> {
        let path = format!(
            "{}/protections",
            Self::policy_path(request.config_id, request.version, &request.policy_id)?
        );
        ctx.run(
            "UpdatePolicyProtections",
            self.api.put_json(&path, &request.protections),
        )
        .await
    }

    async fn get_reputation_profiles(
        &self,
        ctx: &OpContext,
        request: &GetReputationProfilesRequest,
    ) -> Result<GetReputationProfilesResponse> {
        let path = format!(
            "{}/reputation-profiles",
            Self::version_path(request.config_id, request.config_version)
        );

        if request.reputation_profile_id == 0 {
            return ctx.run("GetReputationProfiles", self.api.get_json(&path)).await;
        }

        // A single profile is fetched directly and wrapped into the collection shape
        let path = format!("{}/{}", path, request.reputation_profile_id);
        let profile: ReputationProfile = ctx
            .run("GetReputationProfiles", self.api.get_json(&path))
            .await?;
        Ok(GetReputationProfilesResponse {
            reputation_profiles: vec![profile],
        })
    }
}
