//! The status envelope both backends answer mutating calls with.

use serde::{Deserialize, Serialize};

/// `{"Status": "OK", "Message": "...", "Meta": "..."}` as written by the
/// dashboard, or `{"status": "ok", "key": "...", "action": "added"}` as
/// written by the gateway.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ApiResult {
    #[serde(rename = "Status", alias = "status")]
    pub status: String,
    #[serde(rename = "Message", alias = "message")]
    pub message: String,
    /// Identifier of the created object on the dashboard
    #[serde(rename = "Meta", alias = "meta", deserialize_with = "meta_as_string")]
    pub meta: String,
    pub key: String,
    pub action: String,
    #[serde(skip_serializing_if = "String::is_empty")]
    pub key_hash: String,
}

impl ApiResult {
    /// Whether the backend reported success, case-insensitively.
    pub fn is_ok(&self) -> bool {
        self.status.eq_ignore_ascii_case("ok")
    }
}

// The dashboard occasionally sends `null` or a non-string `Meta`.
fn meta_as_string<'de, D>(deserializer: D) -> Result<String, D::Error>
where
    D: serde::Deserializer<'de>,
{
    let value = serde_json::Value::deserialize(deserializer)?;
    Ok(match value {
        serde_json::Value::Null => String::new(),
        serde_json::Value::String(s) => s,
        other => other.to_string(),
    })
}
