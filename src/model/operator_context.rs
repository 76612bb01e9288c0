//! Per-resource connection settings that override the process environment.

use serde::{Deserialize, Serialize};

use super::target::Target;
use crate::config::OperatorMode;

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct Ingress {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub http_port: Option<u16>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub https_port: Option<u16>,
}

/// Backend connection details. Unset fields fall back to the operator's own
/// configuration.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct Environment {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub mode: Option<OperatorMode>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub url: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub auth: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub org: Option<String>,
    pub ingress: Ingress,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub insecure_skip_verify: Option<bool>,
    #[serde(rename = "user_owners", skip_serializing_if = "Vec::is_empty")]
    pub user_owners: Vec<String>,
    #[serde(rename = "user_group_owners", skip_serializing_if = "Vec::is_empty")]
    pub user_group_owners: Vec<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct OperatorContextSpec {
    /// Secret holding the environment as keys such as `TYK_URL`
    #[serde(rename = "secretRef", skip_serializing_if = "Option::is_none")]
    pub from_secret: Option<Target>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub env: Option<Environment>,
}

/// Resources currently using a context.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct OperatorContextStatus {
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub linked_api_definitions: Vec<Target>,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub linked_api_descriptions: Vec<Target>,
    #[serde(rename = "linked_portal_catalogues", skip_serializing_if = "Vec::is_empty")]
    pub linked_portal_api_catalogues: Vec<Target>,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub linked_security_policies: Vec<Target>,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub linked_portal_configs: Vec<Target>,
}

impl OperatorContextStatus {
    pub fn remove_linked_api_definition(&mut self, target: &Target) -> bool {
        remove_first(&mut self.linked_api_definitions, target)
    }

    pub fn remove_linked_api_description(&mut self, target: &Target) -> bool {
        remove_first(&mut self.linked_api_descriptions, target)
    }

    pub fn remove_linked_portal_api_catalogue(&mut self, target: &Target) -> bool {
        remove_first(&mut self.linked_portal_api_catalogues, target)
    }

    pub fn remove_linked_security_policy(&mut self, target: &Target) -> bool {
        remove_first(&mut self.linked_security_policies, target)
    }

    pub fn remove_linked_portal_config(&mut self, target: &Target) -> bool {
        remove_first(&mut self.linked_portal_configs, target)
    }
}

/// Drop the first entry with the same namespace and name. Returns whether one
/// was removed.
fn remove_first(targets: &mut Vec<Target>, target: &Target) -> bool {
    match targets.iter().position(|t| t.namespace == target.namespace && t.name == target.name) {
        Some(index) => {
            targets.remove(index);
            true
        }
        None => false,
    }
}
