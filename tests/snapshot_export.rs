//! Snapshot export from a mock dashboard into temporary directories.

mod common;

use std::path::Path;

use common::dashboard;
use serde::Deserialize;
use serde_json::json;
use tyk_operator::snapshot::{export, SnapshotOptions};
use wiremock::matchers::{method, path, query_param};
use wiremock::{Mock, MockServer, ResponseTemplate};

async fn mock_dashboard() -> MockServer {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/api/apis"))
        .and(query_param("p", "-2"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "apis": [
                {"api_definition": {
                    "name": "orders #payments",
                    "api_id": "orders-id",
                    "proxy": {"listen_path": "/orders", "target_url": "http://orders"},
                    "config_data": {"k8sName": "orders", "k8sNamespace": "shop"}
                }},
                {"api_definition": {
                    "name": "users",
                    "api_id": "users-id",
                    "proxy": {"listen_path": "/users", "target_url": "http://users"},
                    "config_data": {"k8sName": "users"}
                }},
                {"api_definition": {
                    "name": "legacy #payments",
                    "api_id": "legacy-id",
                    "proxy": {"listen_path": "/legacy", "target_url": "http://legacy"}
                }}
            ],
            "pages": 1
        })))
        .mount(&server)
        .await;

    Mock::given(method("GET"))
        .and(path("/api/portal/policies"))
        .and(query_param("p", "-2"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "Data": [
                {
                    "_id": "61a1",
                    "name": "gold",
                    "state": "active",
                    "active": true,
                    "access_rights_array": [{"api_id": "orders-id", "api_name": "orders", "versions": ["Default"]}]
                },
                {
                    "_id": "61a2",
                    "name": "silver",
                    "state": "active",
                    "active": true,
                    "access_rights_array": [{"api_id": "users-id", "api_name": "users", "versions": ["Default"]}]
                }
            ],
            "Pages": 1
        })))
        .mount(&server)
        .await;

    server
}

fn documents(file: &Path) -> Vec<serde_yaml::Value> {
    let contents = std::fs::read_to_string(file).unwrap();
    assert!(contents.ends_with("\n---\n\n"));
    serde_yaml::Deserializer::from_str(&contents)
        .map(serde_yaml::Value::deserialize)
        .collect::<Result<Vec<_>, _>>()
        .unwrap()
        .into_iter()
        .filter(|doc| !doc.is_null())
        .collect()
}

fn str_at<'a>(doc: &'a serde_yaml::Value, keys: &[&str]) -> Option<&'a str> {
    keys.iter().try_fold(doc, |value, key| value.get(*key))?.as_str()
}

#[tokio::test]
async fn test_combined_export() {
    let server = mock_dashboard().await;
    let dir = tempfile::tempdir().unwrap();
    let options = SnapshotOptions {
        api_definitions_file: dir.path().join("apis.yaml"),
        policies_file: Some(dir.path().join("policies.yaml")),
        ..Default::default()
    };

    let report = export(&dashboard(&server), &options).await.unwrap();
    assert_eq!(report.api_definitions, 3);
    assert_eq!(report.policies, 2);
    assert_eq!(report.files.len(), 2);

    let apis = documents(&options.api_definitions_file);
    assert_eq!(apis.len(), 3);
    assert_eq!(str_at(&apis[0], &["kind"]), Some("ApiDefinition"));
    assert_eq!(str_at(&apis[0], &["metadata", "name"]), Some("orders"));
    assert_eq!(str_at(&apis[0], &["metadata", "namespace"]), Some("shop"));
    assert_eq!(str_at(&apis[0], &["spec", "proxy", "listen_path"]), Some("/orders"));
    assert_eq!(str_at(&apis[1], &["metadata", "namespace"]), None);
    assert_eq!(str_at(&apis[2], &["metadata", "name"]), Some("REPLACE_ME_2"));

    // Every policy lands in the one file
    let policies = documents(&dir.path().join("policies.yaml"));
    assert_eq!(policies.len(), 2);
    assert_eq!(str_at(&policies[0], &["kind"]), Some("SecurityPolicy"));
    assert_eq!(str_at(&policies[0], &["metadata", "name"]), Some("security-policy-0"));
    assert_eq!(str_at(&policies[0], &["spec", "id"]), Some("61a1"));

    let access = &policies[0]["spec"]["access_rights_array"][0];
    assert_eq!(str_at(access, &["name"]), Some("orders"));
    assert_eq!(str_at(access, &["namespace"]), Some("shop"));

    let access = &policies[1]["spec"]["access_rights_array"][0];
    assert_eq!(str_at(access, &["name"]), Some("users"));
    assert_eq!(str_at(access, &["namespace"]), None);
}

#[tokio::test]
async fn test_category_filter() {
    let server = mock_dashboard().await;
    let dir = tempfile::tempdir().unwrap();
    let options = SnapshotOptions {
        api_definitions_file: dir.path().join("apis.yaml"),
        category: Some("payments".to_string()),
        ..Default::default()
    };

    let report = export(&dashboard(&server), &options).await.unwrap();
    assert_eq!(report.api_definitions, 2);
    assert_eq!(report.policies, 0);

    let docs = documents(&options.api_definitions_file);
    let names: Vec<&str> = docs.iter().filter_map(|doc| str_at(doc, &["spec", "name"])).collect();
    assert_eq!(names, vec!["orders #payments", "legacy #payments"]);

    // No policy file was asked for, so policies are never fetched
    let requests = server.received_requests().await.unwrap();
    assert!(requests.iter().all(|r| r.url.path() != "/api/portal/policies"));
}

#[tokio::test]
async fn test_separate_files() {
    let server = mock_dashboard().await;
    let dir = tempfile::tempdir().unwrap();
    std::fs::write(dir.path().join("shop-orders.yaml"), "existing").unwrap();

    let options = SnapshotOptions { separate: true, output_dir: dir.path().to_path_buf(), ..Default::default() };
    let report = export(&dashboard(&server), &options).await.unwrap();

    assert_eq!(report.api_definitions, 3);
    assert_eq!(report.policies, 2);
    assert_eq!(
        report.files,
        vec![
            dir.path().join("shop-orders-1.yaml"),
            dir.path().join("users.yaml"),
            dir.path().join("REPLACE_ME_2.yaml"),
            dir.path().join("policy-61a1.yaml"),
            dir.path().join("policy-61a2.yaml"),
        ]
    );

    assert_eq!(std::fs::read_to_string(dir.path().join("shop-orders.yaml")).unwrap(), "existing");
    let policy = documents(&dir.path().join("policy-61a2.yaml"));
    assert_eq!(str_at(&policy[0], &["metadata", "name"]), Some("security-policy-1"));
}
