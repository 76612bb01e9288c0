//! Shared helpers for backend integration tests.
//!
//! Every test gets its own wiremock server standing in for the gateway or the
//! dashboard.

#![allow(dead_code)]

use serde_json::{json, Value};
use tyk_operator::client::Universal;
use tyk_operator::config::{OperatorConfig, OperatorMode};
use wiremock::{MockServer, ResponseTemplate};

pub const AUTH: &str = "test-secret";
pub const ORG: &str = "test-org";

pub fn config(mode: OperatorMode, server: &MockServer) -> OperatorConfig {
    OperatorConfig {
        mode,
        url: server.uri(),
        auth: AUTH.to_string(),
        org: ORG.to_string(),
        timeout_seconds: 5,
        ..Default::default()
    }
}

pub fn gateway(server: &MockServer) -> Universal {
    Universal::from_config(&config(OperatorMode::Gateway, server)).expect("gateway client")
}

pub fn dashboard(server: &MockServer) -> Universal {
    Universal::from_config(&config(OperatorMode::Dashboard, server)).expect("dashboard client")
}

pub fn dashboard_with_owners(server: &MockServer, owners: &[&str], groups: &[&str]) -> Universal {
    let mut config = config(OperatorMode::Dashboard, server);
    config.user_owners = owners.iter().map(|s| s.to_string()).collect();
    config.user_group_owners = groups.iter().map(|s| s.to_string()).collect();
    Universal::from_config(&config).expect("dashboard client")
}

/// `{"key": ..., "status": "ok", "action": ...}` as the gateway answers writes.
pub fn gateway_ok(key: &str, action: &str) -> ResponseTemplate {
    ResponseTemplate::new(200).set_body_json(json!({"key": key, "status": "ok", "action": action}))
}

/// `{"Status": "OK", "Message": ..., "Meta": ...}` as the dashboard answers writes.
pub fn dashboard_ok(message: &str, meta: &str) -> ResponseTemplate {
    ResponseTemplate::new(200).set_body_json(json!({"Status": "OK", "Message": message, "Meta": meta}))
}

pub fn not_found() -> ResponseTemplate {
    ResponseTemplate::new(404).set_body_json(json!({"Status": "Error", "Message": "Could not retrieve API detail"}))
}

/// Body of the `n`th request the server received, as JSON.
pub async fn request_json(server: &MockServer, n: usize) -> Value {
    let requests = server.received_requests().await.expect("request recording enabled");
    serde_json::from_slice(&requests[n].body).expect("JSON request body")
}
