//! Text export templates
//!
//! Each template decodes the response's JSON form and renders it as a table.

use secconf_core::{Error, OutputTemplates, Result};
use serde::de::DeserializeOwned;
use serde_json::Value;
use tabled::{Table, Tabled};

use crate::model::{GetApiRequestConstraintsResponse, GetReputationProfilesResponse};

/// Template for API request constraints
pub const API_REQUEST_CONSTRAINTS: &str = "apiRequestConstraintsDS";

/// Template for reputation profiles
pub const REPUTATION_PROFILES: &str = "reputationProfilesDS";

#[derive(Tabled)]
struct ApiEndpointRow {
    #[tabled(rename = "API ENDPOINT ID")]
    id: i64,
    #[tabled(rename = "ACTION")]
    action: String,
}

#[derive(Tabled)]
struct ReputationProfileRow {
    #[tabled(rename = "ID")]
    id: i64,
    #[tabled(rename = "NAME")]
    name: String,
    #[tabled(rename = "CONTEXT")]
    context: String,
    #[tabled(rename = "THRESHOLD")]
    threshold: String,
}

/// Templates used by this crate's handlers
pub fn output_templates() -> OutputTemplates {
    let mut templates = OutputTemplates::new();
    templates.register(API_REQUEST_CONSTRAINTS, render_api_request_constraints);
    templates.register(REPUTATION_PROFILES, render_reputation_profiles);
    templates
}

fn decode<T: DeserializeOwned>(template: &str, value: &Value) -> Result<T> {
    serde_json::from_value(value.clone())
        .map_err(|e| Error::render(format!("template '{}': {}", template, e)))
}

fn render_api_request_constraints(value: &Value) -> Result<String> {
    let response: GetApiRequestConstraintsResponse = decode(API_REQUEST_CONSTRAINTS, value)?;
    let rows = response.api_endpoints.into_iter().map(|endpoint| ApiEndpointRow {
        id: endpoint.id,
        action: endpoint.action,
    });
    Ok(Table::new(rows).to_string())
}

fn render_reputation_profiles(value: &Value) -> Result<String> {
    let response: GetReputationProfilesResponse = decode(REPUTATION_PROFILES, value)?;
    let rows = response
        .reputation_profiles
        .into_iter()
        .map(|profile| ReputationProfileRow {
            id: profile.id,
            name: profile.name,
            context: profile.context.unwrap_or_else(|| "-".to_string()),
            threshold: profile
                .threshold
                .map(|t| t.to_string())
                .unwrap_or_else(|| "-".to_string()),
        });
    Ok(Table::new(rows).to_string())
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_api_request_constraints_table() {
        let text = output_templates()
            .render(
                API_REQUEST_CONSTRAINTS,
                &json!({ "apiEndpoints": [{ "id": 619183, "action": "deny" }] }),
            )
            .unwrap();

        assert!(text.contains("API ENDPOINT ID"));
        assert!(text.contains("619183"));
        assert!(text.contains("deny"));
    }

    #[test]
    fn test_reputation_profiles_table() {
        let text = output_templates()
            .render(
                REPUTATION_PROFILES,
                &json!({ "reputationProfiles": [
                    { "id": 12345, "name": "Web Attackers (High Threat)", "context": "WEBATCK", "threshold": 9 },
                    { "id": 12346, "name": "Scanning Tools" }
                ]}),
            )
            .unwrap();

        assert!(text.contains("Web Attackers (High Threat)"));
        assert!(text.contains("WEBATCK"));
        assert!(text.contains("Scanning Tools"));
    }

    #[test]
    fn test_malformed_response_is_render_error() {
        let err = output_templates()
            .render(REPUTATION_PROFILES, &json!({ "reputationProfiles": [{ "id": "x" }] }))
            .unwrap_err();
        assert!(matches!(err, Error::Render(_)));
    }
}
