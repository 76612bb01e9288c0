//! # Snapshot Export
//!
//! Reads the API definitions and policies stored on a backend and writes them
//! out as `ApiDefinition` and `SecurityPolicy` resources, one YAML document
//! each, separated by `---`.
//!
//! Resource names come from the `k8sName` and `k8sNamespace` keys of an API's
//! `config_data`. APIs without them are exported under a `REPLACE_ME_<n>`
//! placeholder. Policy access rights are pointed back at the exported
//! `ApiDefinition` resources by API id.

use std::collections::HashMap;
use std::fs;
use std::path::{Path, PathBuf};

use serde::Serialize;
use tracing::{info, warn};

use crate::client::Universal;
use crate::errors::{OperatorError, Result};
use crate::model::api_definition::{CONFIG_DATA_NAMESPACE_KEY, CONFIG_DATA_NAME_KEY};
use crate::model::resources::{
    ApiDefinition, ApiDefinitionResourceSpec, ObjectMeta, SecurityPolicy, SecurityPolicyResourceSpec,
};
use crate::model::{ApiDefinitionSpec, ListApiOptions, SecurityPolicySpec};

/// Name given to APIs whose `config_data` does not name a resource.
pub const DEFAULT_NAME: &str = "REPLACE_ME";

/// Written after every YAML document.
pub const DOCUMENT_SEPARATOR: &str = "\n---\n\n";

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SnapshotOptions {
    /// Output file for API definitions. Unused with `separate`.
    pub api_definitions_file: PathBuf,
    /// Output file for policies. Policies are skipped when unset, unless
    /// `separate` is given.
    pub policies_file: Option<PathBuf>,
    /// Only export APIs whose name carries this `#category` tag.
    pub category: Option<String>,
    /// One file per API and per policy, in `output_dir`.
    pub separate: bool,
    pub output_dir: PathBuf,
}

/// What an export wrote.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct SnapshotReport {
    pub files: Vec<PathBuf>,
    pub api_definitions: usize,
    pub policies: usize,
}

/// `{namespace, name}` of an exported API, keyed by API id.
type ExportedNames = HashMap<String, (String, String)>;

/// Export a snapshot of the backend `client` points at.
pub async fn export(client: &Universal, options: &SnapshotOptions) -> Result<SnapshotReport> {
    let apis = client.api().list(&ListApiOptions::all_pages()).await?.apis;

    let policies = if options.policies_file.is_some() || options.separate {
        client.portal().policy().all().await?
    } else {
        Vec::new()
    };

    info!(apis = apis.len(), policies = policies.len(), "Exporting snapshot");

    if options.separate {
        write_separate(&apis, &policies, &options.output_dir)
    } else {
        write_combined(&apis, &policies, options)
    }
}

fn write_combined(
    apis: &[ApiDefinitionSpec],
    policies: &[SecurityPolicySpec],
    options: &SnapshotOptions,
) -> Result<SnapshotReport> {
    let category = options.category.as_deref().map(normalize_category);
    if let Some(category) = &category {
        info!(category = %category, "Looking for API definitions in category");
    }

    let mut names = ExportedNames::new();
    let mut report = SnapshotReport::default();
    let mut out = String::new();

    for (index, spec) in apis.iter().enumerate() {
        if let Some(category) = &category {
            if !spec.name.contains(category.as_str()) {
                continue;
            }
        }

        let resource = api_resource(index, spec);
        record_name(&mut names, &resource);
        push_document(&mut out, &resource)?;
        report.api_definitions += 1;
    }

    write_file(&options.api_definitions_file, &out)?;
    report.files.push(options.api_definitions_file.clone());

    if let Some(path) = &options.policies_file {
        let mut out = String::new();
        for (index, policy) in policies.iter().enumerate() {
            push_document(&mut out, &policy_resource(index, policy, &names))?;
            report.policies += 1;
        }
        write_file(path, &out)?;
        report.files.push(path.clone());
    }

    Ok(report)
}

fn write_separate(
    apis: &[ApiDefinitionSpec],
    policies: &[SecurityPolicySpec],
    dir: &Path,
) -> Result<SnapshotReport> {
    let mut names = ExportedNames::new();
    let mut report = SnapshotReport::default();

    for (index, spec) in apis.iter().enumerate() {
        let resource = api_resource(index, spec);
        record_name(&mut names, &resource);

        let meta = &resource.metadata;
        let stem = if meta.namespace.is_empty() {
            meta.name.clone()
        } else {
            format!("{}-{}", meta.namespace, meta.name)
        };

        let path = generate_filename(dir, &stem)?;
        let mut out = String::new();
        push_document(&mut out, &resource)?;
        write_file(&path, &out)?;

        report.files.push(path);
        report.api_definitions += 1;
    }

    for (index, policy) in policies.iter().enumerate() {
        let path = dir.join(format!("policy-{}.yaml", policy.mid));
        let mut out = String::new();
        push_document(&mut out, &policy_resource(index, policy, &names))?;
        write_file(&path, &out)?;

        report.files.push(path);
        report.policies += 1;
    }

    Ok(report)
}

/// `{name, namespace}` named by the API's `config_data`.
///
/// Returns `None` when there is no `config_data` or it has no string
/// `k8sName`. The namespace is empty when `k8sNamespace` is absent.
pub fn parse_config_data(spec: &ApiDefinitionSpec) -> Option<(String, String)> {
    spec.config_data.as_ref()?;
    let name = spec.config_data_str(CONFIG_DATA_NAME_KEY)?.to_string();
    let namespace = spec.config_data_str(CONFIG_DATA_NAMESPACE_KEY).unwrap_or_default().to_string();

    if name.contains(' ') || namespace.contains(' ') {
        warn!(
            api_id = spec.api_id(),
            "config_data name or namespace contains a space, which is not a valid resource name"
        );
    }

    Some((name, namespace))
}

/// The `ApiDefinition` resource for the `index`th API.
pub fn api_resource(index: usize, spec: &ApiDefinitionSpec) -> ApiDefinition {
    let (name, namespace) = parse_config_data(spec).unwrap_or_else(|| {
        warn!(
            api_id = spec.api_id(),
            "API has no {} in config_data, using a placeholder name", CONFIG_DATA_NAME_KEY
        );
        (format!("{}_{}", DEFAULT_NAME, index), String::new())
    });

    ApiDefinition::new(
        ObjectMeta::new(name, namespace),
        ApiDefinitionResourceSpec { api: spec.clone(), context: None },
    )
}

/// The `SecurityPolicy` resource for the `index`th policy, with access rights
/// naming the exported APIs.
fn policy_resource(index: usize, policy: &SecurityPolicySpec, names: &ExportedNames) -> SecurityPolicy {
    let mut spec = policy.clone();
    spec.id = policy.mid.clone();

    let lookup = |api_id: &str| -> (Option<String>, Option<String>) {
        match names.get(api_id) {
            Some((namespace, name)) => {
                (Some(name.clone()), Some(namespace.clone()).filter(|ns| !ns.is_empty()))
            }
            None => {
                warn!(api_id, "Policy grants access to an API that was not exported");
                (None, None)
            }
        }
    };

    for access in spec.access_rights_array.iter_mut() {
        let (name, namespace) = lookup(&access.api_id);
        access.name = name;
        access.namespace = namespace;
    }
    for (api_id, access) in spec.access_rights.iter_mut() {
        let (name, namespace) = lookup(api_id);
        access.name = name;
        access.namespace = namespace;
    }

    SecurityPolicy::new(
        ObjectMeta::named(format!("security-policy-{}", index)),
        SecurityPolicyResourceSpec { policy: spec, context: None },
    )
}

fn record_name(names: &mut ExportedNames, resource: &ApiDefinition) {
    let api_id = resource.spec.api.api_id();
    if !api_id.is_empty() {
        names.insert(
            api_id.to_string(),
            (resource.metadata.namespace.clone(), resource.metadata.name.clone()),
        );
    }
}

/// `payments` and ` #payments ` both become `#payments`.
fn normalize_category(category: &str) -> String {
    let category = category.trim();
    if category.starts_with('#') {
        category.to_string()
    } else {
        format!("#{}", category)
    }
}

fn push_document<T: Serialize>(out: &mut String, resource: &T) -> Result<()> {
    let yaml = serde_yaml::to_string(resource)
        .map_err(|e| OperatorError::yaml("Failed to encode resource", e))?;
    out.push_str(&yaml);
    out.push_str(DOCUMENT_SEPARATOR);
    Ok(())
}

fn write_file(path: &Path, contents: &str) -> Result<()> {
    fs::write(path, contents)
        .map_err(|e| OperatorError::io(format!("Failed to write {}", path.display()), e))?;
    info!(path = %path.display(), "Wrote snapshot file");
    Ok(())
}

/// `<stem>.yaml` in `dir`, or `<stem>-<n>.yaml` with `n` one past the highest
/// existing copy when that file already exists.
pub fn generate_filename(dir: &Path, stem: &str) -> Result<PathBuf> {
    let first = dir.join(format!("{}.yaml", stem));
    if !first.exists() {
        return Ok(first);
    }

    let prefix = format!("{}-", stem);
    let entries = fs::read_dir(dir)
        .map_err(|e| OperatorError::io(format!("Failed to read {}", dir.display()), e))?;

    let mut highest = 0u32;
    for entry in entries {
        let entry = entry.map_err(|e| OperatorError::io(format!("Failed to read {}", dir.display()), e))?;
        let file_name = entry.file_name();
        let copy = file_name
            .to_str()
            .and_then(|name| name.strip_prefix(&prefix))
            .and_then(|rest| rest.strip_suffix(".yaml"))
            .and_then(|n| n.parse::<u32>().ok());
        if let Some(n) = copy {
            highest = highest.max(n);
        }
    }

    Ok(dir.join(format!("{}-{}.yaml", stem, highest + 1)))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::AccessDefinition;
    use serde_json::json;

    fn api(api_id: &str, config_data: Option<serde_json::Value>) -> ApiDefinitionSpec {
        ApiDefinitionSpec {
            name: format!("{} #payments", api_id),
            api_id: Some(api_id.to_string()),
            config_data: config_data.and_then(|v| v.as_object().cloned()),
            ..Default::default()
        }
    }

    #[test]
    fn test_parse_config_data() {
        assert_eq!(parse_config_data(&api("a", None)), None);
        assert_eq!(parse_config_data(&api("a", Some(json!({})))), None);
        assert_eq!(parse_config_data(&api("a", Some(json!({"k8sName": 3})))), None);

        assert_eq!(
            parse_config_data(&api("a", Some(json!({"k8sName": " orders "})))),
            Some(("orders".to_string(), String::new()))
        );
        assert_eq!(
            parse_config_data(&api("a", Some(json!({"k8sName": "orders", "k8sNamespace": "shop"})))),
            Some(("orders".to_string(), "shop".to_string()))
        );
    }

    #[test]
    fn test_api_resource_placeholder_name() {
        let resource = api_resource(3, &api("a", None));
        assert_eq!(resource.metadata.name, "REPLACE_ME_3");
        assert!(resource.metadata.namespace.is_empty());
        assert_eq!(resource.type_meta.kind, "ApiDefinition");
    }

    #[test]
    fn test_policy_access_rights_point_at_exported_apis() {
        let mut names = ExportedNames::new();
        names.insert("orders-id".to_string(), ("shop".to_string(), "orders".to_string()));
        names.insert("users-id".to_string(), (String::new(), "users".to_string()));

        let policy = SecurityPolicySpec {
            mid: "61a1".to_string(),
            name: "gold".to_string(),
            access_rights_array: vec![
                AccessDefinition { api_id: "orders-id".to_string(), ..Default::default() },
                AccessDefinition { api_id: "users-id".to_string(), ..Default::default() },
                AccessDefinition { api_id: "unknown".to_string(), ..Default::default() },
            ],
            access_rights: [(
                "orders-id".to_string(),
                AccessDefinition { api_id: "orders-id".to_string(), ..Default::default() },
            )]
            .into_iter()
            .collect(),
            ..Default::default()
        };

        let resource = policy_resource(0, &policy, &names);
        let spec = &resource.spec.policy;

        assert_eq!(resource.metadata.name, "security-policy-0");
        assert_eq!(spec.id, "61a1");
        assert_eq!(spec.access_rights_array[0].name.as_deref(), Some("orders"));
        assert_eq!(spec.access_rights_array[0].namespace.as_deref(), Some("shop"));
        assert_eq!(spec.access_rights_array[1].namespace, None);
        assert_eq!(spec.access_rights_array[2].name, None);
        assert_eq!(spec.access_rights["orders-id"].name.as_deref(), Some("orders"));
    }

    #[test]
    fn test_normalize_category() {
        assert_eq!(normalize_category("payments"), "#payments");
        assert_eq!(normalize_category(" #payments "), "#payments");
    }

    #[test]
    fn test_generate_filename() {
        let dir = tempfile::tempdir().unwrap();

        assert_eq!(generate_filename(dir.path(), "orders").unwrap(), dir.path().join("orders.yaml"));

        fs::write(dir.path().join("orders.yaml"), "").unwrap();
        assert_eq!(generate_filename(dir.path(), "orders").unwrap(), dir.path().join("orders-1.yaml"));

        fs::write(dir.path().join("orders-1.yaml"), "").unwrap();
        fs::write(dir.path().join("orders-7.yaml"), "").unwrap();
        fs::write(dir.path().join("orders-old.yaml"), "").unwrap();
        assert_eq!(generate_filename(dir.path(), "orders").unwrap(), dir.path().join("orders-8.yaml"));
    }

    #[test]
    fn test_push_document_separator() {
        let mut out = String::new();
        push_document(&mut out, &api_resource(0, &api("a", None))).unwrap();
        assert!(out.ends_with("\n---\n\n"));
        assert!(out.starts_with("apiVersion: tyk.tyk.io/v1alpha1\n"));
    }
}
