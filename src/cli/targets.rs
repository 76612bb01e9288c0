//! Offline helpers for `tyk://` internal targets. Neither command talks to a
//! backend.

use std::path::Path;

use anyhow::{Context, Result};
use serde::Serialize;

use super::output::{print_output, OutputFormat};
use crate::model::resources::ApiDefinition;
use crate::model::{decode_internal_url, ApiDefinitionSpec, ResolvedSpec};

#[derive(Debug, Serialize)]
struct DecodedTarget {
    target: String,
    name: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    namespace: Option<String>,
    path: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    query: Option<String>,
}

/// Read an `ApiDefinition` resource, or a bare API definition, from YAML or
/// JSON.
pub fn load_api_definition(contents: &str) -> Result<ApiDefinitionSpec> {
    let value: serde_yaml::Value = serde_yaml::from_str(contents).context("File is not valid YAML or JSON")?;

    if value.get("kind").is_some() && value.get("spec").is_some() {
        let resource: ApiDefinition =
            serde_yaml::from_value(value).context("Failed to parse ApiDefinition resource")?;
        return Ok(resource.spec.api);
    }

    serde_yaml::from_value(value).context("Failed to parse API definition")
}

pub fn handle_resolve(file: &Path, output: OutputFormat) -> Result<()> {
    let contents =
        std::fs::read_to_string(file).with_context(|| format!("Failed to read file: {}", file.display()))?;
    let spec = load_api_definition(&contents)?;

    let resolved: ResolvedSpec = spec.resolve_internal_targets();
    print_output(&resolved, output)
}

pub fn handle_decode_target(url: &str, output: OutputFormat) -> Result<()> {
    let decoded = decode_internal_url(url)?;
    print_output(
        &DecodedTarget {
            target: decoded.target.to_string(),
            name: decoded.target.name.clone(),
            namespace: decoded.target.namespace.clone(),
            path: decoded.path,
            query: decoded.query,
        },
        output,
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_load_resource() {
        let yaml = r#"
apiVersion: tyk.tyk.io/v1alpha1
kind: ApiDefinition
metadata:
  name: gateway
spec:
  name: gateway
  proxy:
    listen_path: /orders
    target_internal:
      target:
        name: orders
      path: /v2
"#;
        let spec = load_api_definition(yaml).unwrap();
        let resolved = spec.resolve_internal_targets();
        assert_eq!(resolved.spec.proxy.target_url, "tyk://b3JkZXJz/v2");
        assert_eq!(resolved.targets.len(), 1);
    }

    #[test]
    fn test_load_bare_spec_as_json() {
        let json = r#"{"name": "httpbin", "proxy": {"target_url": "http://httpbin.org"}}"#;
        let spec = load_api_definition(json).unwrap();
        assert_eq!(spec.name, "httpbin");
        assert!(spec.resolve_internal_targets().targets.is_empty());
    }

    #[test]
    fn test_decode_rejects_other_schemes() {
        assert!(handle_decode_target("http://example.com", OutputFormat::Json).is_err());
    }
}
