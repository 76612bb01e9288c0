//! Custom resource envelopes for the `tyk.tyk.io` group.

use std::collections::BTreeMap;

use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};

use super::api_definition::ApiDefinitionSpec;
use super::operator_context::{OperatorContextSpec, OperatorContextStatus};
use super::security_policy::SecurityPolicySpec;
use super::target::Target;

pub const API_VERSION: &str = "tyk.tyk.io/v1alpha1";

/// Static description of a custom resource kind.
pub trait Kind {
    const KIND: &'static str;
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TypeMeta {
    pub api_version: String,
    pub kind: String,
}

impl TypeMeta {
    pub fn of<S: Kind>() -> Self {
        Self { api_version: API_VERSION.to_string(), kind: S::KIND.to_string() }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct ObjectMeta {
    pub name: String,
    #[serde(skip_serializing_if = "String::is_empty")]
    pub namespace: String,
    #[serde(skip_serializing_if = "BTreeMap::is_empty")]
    pub labels: BTreeMap<String, String>,
    #[serde(skip_serializing_if = "BTreeMap::is_empty")]
    pub annotations: BTreeMap<String, String>,
}

impl ObjectMeta {
    pub fn new<N: Into<String>, S: Into<String>>(name: N, namespace: S) -> Self {
        Self { name: name.into(), namespace: namespace.into(), ..Default::default() }
    }

    pub fn named<N: Into<String>>(name: N) -> Self {
        Self { name: name.into(), ..Default::default() }
    }
}

/// A resource of kind `S::KIND` with its spec and optional status.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(bound(
    serialize = "S: Serialize, St: Serialize",
    deserialize = "S: DeserializeOwned, St: DeserializeOwned"
))]
pub struct CustomResource<S, St = ()> {
    #[serde(flatten)]
    pub type_meta: TypeMeta,
    pub metadata: ObjectMeta,
    pub spec: S,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub status: Option<St>,
}

impl<S: Kind, St> CustomResource<S, St> {
    pub fn new(metadata: ObjectMeta, spec: S) -> Self {
        Self { type_meta: TypeMeta::of::<S>(), metadata, spec, status: None }
    }
}

/// Spec of an `ApiDefinition` resource.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ApiDefinitionResourceSpec {
    #[serde(flatten)]
    pub api: ApiDefinitionSpec,
    #[serde(rename = "contextRef", default, skip_serializing_if = "Option::is_none")]
    pub context: Option<Target>,
}

impl Kind for ApiDefinitionResourceSpec {
    const KIND: &'static str = "ApiDefinition";
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ApiDefinitionStatus {
    pub api_id: String,
}

/// Spec of a `SecurityPolicy` resource.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SecurityPolicyResourceSpec {
    #[serde(flatten)]
    pub policy: SecurityPolicySpec,
    #[serde(rename = "contextRef", default, skip_serializing_if = "Option::is_none")]
    pub context: Option<Target>,
}

impl Kind for SecurityPolicyResourceSpec {
    const KIND: &'static str = "SecurityPolicy";
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct SecurityPolicyStatus {
    pub pol_id: String,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub linked_apis: Vec<Target>,
}

/// ConfigMap key holding an OAS document.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct OasReference {
    #[serde(flatten)]
    pub target: Target,
    pub key_name: String,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct TykOasApiDefinitionSpec {
    #[serde(rename = "oas_ref", default, skip_serializing_if = "Option::is_none")]
    pub oas_ref: Option<OasReference>,
    #[serde(rename = "contextRef", default, skip_serializing_if = "Option::is_none")]
    pub context: Option<Target>,
}

impl Kind for TykOasApiDefinitionSpec {
    const KIND: &'static str = "TykOasApiDefinition";
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct TykOasApiDefinitionStatus {
    pub api_id: String,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub linked_by_policies: Vec<Target>,
}

impl Kind for OperatorContextSpec {
    const KIND: &'static str = "OperatorContext";
}

pub type ApiDefinition = CustomResource<ApiDefinitionResourceSpec, ApiDefinitionStatus>;
pub type SecurityPolicy = CustomResource<SecurityPolicyResourceSpec, SecurityPolicyStatus>;
pub type TykOasApiDefinition = CustomResource<TykOasApiDefinitionSpec, TykOasApiDefinitionStatus>;
pub type OperatorContext = CustomResource<OperatorContextSpec, OperatorContextStatus>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_api_definition_yaml() {
        let mut api = ApiDefinitionSpec { name: "httpbin".to_string(), ..Default::default() };
        api.proxy.target_url = "http://httpbin.org".to_string();

        let resource = ApiDefinition::new(
            ObjectMeta::new("httpbin", "default"),
            ApiDefinitionResourceSpec { api, context: Some(Target::namespaced("tyk", "ctx")) },
        );

        let yaml = serde_yaml::to_string(&resource).unwrap();
        assert!(yaml.starts_with("apiVersion: tyk.tyk.io/v1alpha1\nkind: ApiDefinition\n"), "{}", yaml);
        assert!(yaml.contains("  name: httpbin\n"));
        assert!(yaml.contains("contextRef:"));
        assert!(!yaml.contains("status:"));

        let back: ApiDefinition = serde_yaml::from_str(&yaml).unwrap();
        assert_eq!(back.spec.api.proxy.target_url, "http://httpbin.org");
        assert_eq!(back.spec.context, Some(Target::namespaced("tyk", "ctx")));
    }

    #[test]
    fn test_operator_context_from_yaml() {
        let yaml = r#"
apiVersion: tyk.tyk.io/v1alpha1
kind: OperatorContext
metadata:
  name: community-edition
  namespace: tyk
spec:
  env:
    mode: ce
    url: http://tyk.tykce-control-plane.svc.cluster.local:8001
    auth: foo
    ingress:
      httpPort: 8000
status:
  linked_api_definitions:
    - name: httpbin
      namespace: default
"#;

        let ctx: OperatorContext = serde_yaml::from_str(yaml).unwrap();
        assert_eq!(ctx.type_meta.kind, "OperatorContext");
        assert_eq!(ctx.metadata.namespace, "tyk");
        let env = ctx.spec.env.unwrap();
        assert_eq!(env.ingress.http_port, Some(8000));
        assert_eq!(ctx.status.unwrap().linked_api_definitions[0].name, "httpbin");
    }

    #[test]
    fn test_oas_reference_is_inline() {
        let spec = TykOasApiDefinitionSpec {
            oas_ref: Some(OasReference {
                target: Target::namespaced("default", "petstore"),
                key_name: "oas.json".to_string(),
            }),
            context: None,
        };
        let value = serde_json::to_value(&spec).unwrap();
        assert_eq!(value["oas_ref"]["name"], "petstore");
        assert_eq!(value["oas_ref"]["key_name"], "oas.json");
    }
}
