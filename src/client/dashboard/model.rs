//! Envelopes specific to the dashboard REST API.

use serde::{Deserialize, Serialize};

use crate::model::ApiDefinitionSpec;

/// An API definition as stored by the dashboard, with its owners.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct DashboardApi {
    #[serde(skip_serializing_if = "String::is_empty")]
    pub created_at: String,
    pub api_definition: ApiDefinitionSpec,
    pub user_owners: Vec<String>,
    pub user_group_owners: Vec<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(default)]
pub struct ApisResponse {
    pub apis: Vec<DashboardApi>,
    pub pages: i64,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct CertificateList {
    pub certs: Vec<String>,
    pub pages: i64,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct CertResponse {
    pub id: String,
    pub message: String,
    pub status: String,
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_dashboard_api_keeps_empty_owner_lists() {
        let body = serde_json::to_value(DashboardApi::default()).unwrap();
        assert_eq!(body["user_owners"], json!([]));
        assert_eq!(body["user_group_owners"], json!([]));
        assert!(body.get("created_at").is_none());
    }

    #[test]
    fn test_apis_response() {
        let page: ApisResponse = serde_json::from_value(json!({
            "apis": [
                {"created_at": "2021-01-01", "api_definition": {"name": "a", "api_id": "a-id"}},
                {"api_definition": {"name": "b"}}
            ],
            "pages": 1
        }))
        .unwrap();

        assert_eq!(page.apis.len(), 2);
        assert_eq!(page.apis[0].api_definition.api_id(), "a-id");
        assert_eq!(page.apis[1].api_definition.name, "b");
    }
}
