//! Security policies and the per-API access rights they grant.

use std::collections::{BTreeMap, HashMap};

use serde::{Deserialize, Serialize};

use super::target::Target;

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct GraphQlType {
    pub name: String,
    pub fields: Vec<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct FieldLimits {
    pub max_query_depth: i64,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct FieldAccessDefinition {
    #[serde(skip_serializing_if = "String::is_empty")]
    pub type_name: String,
    #[serde(skip_serializing_if = "String::is_empty")]
    pub field_name: String,
    pub limits: FieldLimits,
}

/// A URL regex and the methods allowed on it.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct AccessSpec {
    pub url: String,
    pub methods: Vec<String>,
}

/// Access granted to one API.
///
/// `namespace` and `name` reference the `ApiDefinition` resource and only
/// exist in custom resources; the backends identify the API by `api_id`.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct AccessDefinition {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub namespace: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(skip_serializing_if = "String::is_empty")]
    pub api_name: String,
    #[serde(skip_serializing_if = "String::is_empty")]
    pub api_id: String,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub versions: Vec<String>,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub allowed_types: Vec<GraphQlType>,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub restricted_types: Vec<GraphQlType>,
    #[serde(skip_serializing_if = "std::ops::Not::not")]
    pub disable_introspection: bool,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub field_access_rights: Vec<FieldAccessDefinition>,
    #[serde(skip_serializing_if = "String::is_empty")]
    pub allowance_scope: String,
    #[serde(rename = "allowed_urls", skip_serializing_if = "Vec::is_empty")]
    pub allowed_urls: Vec<AccessSpec>,
}

impl AccessDefinition {
    /// The referenced `ApiDefinition`, if this entry names one.
    pub fn target(&self) -> Option<Target> {
        self.name.as_ref().map(|name| Target {
            name: name.clone(),
            namespace: self.namespace.clone(),
        })
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct PolicyPartitions {
    #[serde(skip_serializing_if = "std::ops::Not::not")]
    pub quota: bool,
    #[serde(skip_serializing_if = "std::ops::Not::not")]
    pub rate_limit: bool,
    #[serde(skip_serializing_if = "std::ops::Not::not")]
    pub complexity: bool,
    #[serde(skip_serializing_if = "std::ops::Not::not")]
    pub acl: bool,
    #[serde(skip_serializing_if = "std::ops::Not::not")]
    pub per_api: bool,
}

/// A policy as stored by the gateway or dashboard.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct SecurityPolicySpec {
    /// Dashboard object id
    #[serde(rename = "_id", skip_serializing_if = "String::is_empty")]
    pub mid: String,
    #[serde(skip_serializing_if = "String::is_empty")]
    pub id: String,
    pub name: String,
    #[serde(skip_serializing_if = "String::is_empty")]
    pub org_id: String,
    /// `active`, `draft` or `deny`
    pub state: String,
    pub active: bool,
    #[serde(skip_serializing_if = "std::ops::Not::not")]
    pub is_inactive: bool,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub access_rights_array: Vec<AccessDefinition>,
    #[serde(skip_serializing_if = "BTreeMap::is_empty")]
    pub access_rights: BTreeMap<String, AccessDefinition>,
    #[serde(skip_serializing_if = "is_zero")]
    pub rate: i64,
    #[serde(skip_serializing_if = "is_zero")]
    pub per: i64,
    #[serde(skip_serializing_if = "is_zero")]
    pub quota_max: i64,
    #[serde(skip_serializing_if = "is_zero")]
    pub quota_renewal_rate: i64,
    #[serde(skip_serializing_if = "is_zero")]
    pub throttle_interval: i64,
    #[serde(skip_serializing_if = "is_zero")]
    pub throttle_retry_limit: i64,
    #[serde(skip_serializing_if = "is_zero")]
    pub max_query_depth: i64,
    #[serde(skip_serializing_if = "std::ops::Not::not")]
    pub hmac_enabled: bool,
    #[serde(skip_serializing_if = "std::ops::Not::not")]
    pub enable_http_signature_validation: bool,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub tags: Vec<String>,
    #[serde(skip_serializing_if = "is_zero")]
    pub key_expires_in: i64,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub partitions: Option<PolicyPartitions>,
    #[serde(skip_serializing_if = "HashMap::is_empty")]
    pub meta_data: HashMap<String, String>,
}

impl SecurityPolicySpec {
    /// Copy for the dashboard, with resource references removed from the
    /// access rights.
    pub fn dashboard_payload(&self) -> Self {
        let mut policy = self.clone();
        policy.strip_resource_refs();
        policy
    }

    /// Copy for the gateway, which also has no use for the dashboard object id,
    /// the policy state or the access rights array.
    pub fn gateway_payload(&self) -> Self {
        let mut policy = self.dashboard_payload();
        policy.mid.clear();
        policy.state.clear();
        policy.access_rights_array.clear();
        policy
    }

    fn strip_resource_refs(&mut self) {
        for access in self.access_rights_array.iter_mut().chain(self.access_rights.values_mut()) {
            access.namespace = None;
            access.name = None;
        }
    }
}

/// Page of policies as returned by the dashboard.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct PoliciesResponse {
    #[serde(rename = "Data", alias = "data")]
    pub policies: Vec<SecurityPolicySpec>,
    #[serde(rename = "Pages", alias = "pages")]
    pub pages: i64,
}

fn is_zero(v: &i64) -> bool {
    *v == 0
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn policy() -> SecurityPolicySpec {
        serde_json::from_value(json!({
            "_id": "61a1",
            "id": "gold",
            "name": "Gold plan",
            "state": "active",
            "active": true,
            "rate": 100,
            "per": 1,
            "access_rights_array": [
                {"namespace": "shop", "name": "orders", "api_id": "orders-id", "versions": ["Default"]}
            ],
            "access_rights": {
                "orders-id": {"namespace": "shop", "name": "orders", "api_id": "orders-id"}
            }
        }))
        .unwrap()
    }

    #[test]
    fn test_access_target() {
        let policy = policy();
        assert_eq!(
            policy.access_rights_array[0].target(),
            Some(Target::namespaced("shop", "orders"))
        );
        assert_eq!(AccessDefinition::default().target(), None);
    }

    #[test]
    fn test_dashboard_payload_keeps_dashboard_fields() {
        let payload = serde_json::to_value(policy().dashboard_payload()).unwrap();

        assert_eq!(payload["_id"], "61a1");
        assert_eq!(payload["state"], "active");
        assert!(payload["access_rights_array"][0].get("namespace").is_none());
        assert!(payload["access_rights"]["orders-id"].get("name").is_none());
        assert_eq!(payload["access_rights"]["orders-id"]["api_id"], "orders-id");
    }

    #[test]
    fn test_gateway_payload_drops_dashboard_fields() {
        let payload = serde_json::to_value(policy().gateway_payload()).unwrap();

        assert!(payload.get("_id").is_none());
        assert_eq!(payload["state"], "");
        assert!(payload.get("access_rights_array").is_none());
        assert_eq!(payload["rate"], 100);
    }

    #[test]
    fn test_policies_response() {
        let page: PoliciesResponse =
            serde_json::from_value(json!({"Data": [{"name": "a"}, {"name": "b"}], "Pages": 1})).unwrap();
        assert_eq!(page.policies.len(), 2);
        assert_eq!(page.pages, 1);
    }
}
