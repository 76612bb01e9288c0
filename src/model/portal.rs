//! Developer portal documents, managed through the dashboard only.

use std::collections::HashMap;

use serde::{Deserialize, Serialize};

/// Documentation attached to a catalogue entry.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ApiDocumentation {
    #[serde(skip_serializing_if = "String::is_empty")]
    pub id: String,
    /// Base64 encoded document
    pub documentation: String,
    /// `swagger` or `blueprint`
    pub doc_type: String,
    pub api_id: String,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ApiCatalogue {
    pub id: String,
    pub org_id: String,
    pub apis: Vec<ApiDescription>,
    pub email: String,
}

/// One API published in the catalogue.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ApiDescription {
    #[serde(skip_serializing_if = "String::is_empty")]
    pub name: String,
    /// `keyless`, `jwt`, `oauth`, `multiAuth` or `authToken`
    #[serde(skip_serializing_if = "String::is_empty")]
    pub auth_type: String,
    #[serde(skip_serializing_if = "std::ops::Not::not")]
    pub show: bool,
    #[serde(skip_serializing_if = "String::is_empty")]
    pub short_description: String,
    #[serde(skip_serializing_if = "String::is_empty")]
    pub long_description: String,
    #[serde(skip_serializing_if = "std::ops::Not::not")]
    pub is_keyless: bool,
    #[serde(skip_serializing_if = "String::is_empty")]
    pub version: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub config: Option<PortalConfig>,
    #[serde(skip_serializing_if = "HashMap::is_empty")]
    pub fields: HashMap<String, String>,
    #[serde(skip_serializing_if = "String::is_empty")]
    pub policy_id: String,
    /// Id of the uploaded [`ApiDocumentation`]
    #[serde(skip_serializing_if = "String::is_empty")]
    pub documentation: String,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct EmailConfigMeta {
    pub enabled: bool,
    pub subject: String,
    pub body: String,
    pub sign_off: String,
    pub hide_token_data: bool,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct EmailCopyOptions {
    pub welcome_email: EmailConfigMeta,
    #[serde(rename = "key_email")]
    pub api_key_email: EmailConfigMeta,
    pub reset_password_email: EmailConfigMeta,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct MailOptions {
    pub mail_from_name: String,
    pub mail_from_email: String,
    pub email_copy: EmailCopyOptions,
}

/// Dynamic client registration against an identity provider.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct DcrOptions {
    pub idp_host: String,
    pub registration_endpoint: String,
    #[serde(skip_serializing_if = "String::is_empty")]
    pub access_token: String,
    /// `gluu`, `keycloak`, `okta` or `other`
    #[serde(skip_serializing_if = "String::is_empty")]
    pub provider: String,
    pub grant_types: Vec<String>,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub response_types: Vec<String>,
    pub token_endpoint_auth_method: String,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct PortalConfig {
    #[serde(skip_serializing_if = "String::is_empty")]
    pub id: String,
    #[serde(skip_serializing_if = "String::is_empty")]
    pub org_id: String,
    #[serde(rename = "signup_fields", skip_serializing_if = "Vec::is_empty")]
    pub sign_up_fields: Vec<String>,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub key_request_fields: Vec<String>,
    #[serde(skip_serializing_if = "std::ops::Not::not")]
    pub require_key_approval: bool,
    #[serde(skip_serializing_if = "std::ops::Not::not")]
    pub secure_key_approval: bool,
    #[serde(skip_serializing_if = "std::ops::Not::not")]
    pub redirect_on_key_request: bool,
    #[serde(skip_serializing_if = "String::is_empty")]
    pub redirect_to: String,
    #[serde(skip_serializing_if = "std::ops::Not::not")]
    pub enable_multi_selection: bool,
    #[serde(skip_serializing_if = "std::ops::Not::not")]
    pub disable_login: bool,
    #[serde(skip_serializing_if = "std::ops::Not::not")]
    pub disable_signup: bool,
    #[serde(skip_serializing_if = "std::ops::Not::not")]
    pub disable_auto_login: bool,
    #[serde(skip_serializing_if = "std::ops::Not::not")]
    pub catalogue_login_only: bool,
    #[serde(skip_serializing_if = "is_zero")]
    pub oauth_usage_limit: i64,
    #[serde(skip_serializing_if = "String::is_empty")]
    pub email: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub mail_options: Option<MailOptions>,
    #[serde(rename = "enable_dcr", skip_serializing_if = "std::ops::Not::not")]
    pub enable_dcr: bool,
    #[serde(rename = "dcr_options", skip_serializing_if = "Option::is_none")]
    pub dcr_options: Option<DcrOptions>,
    #[serde(rename = "override", skip_serializing_if = "std::ops::Not::not")]
    pub override_: bool,
}

fn is_zero(v: &i64) -> bool {
    *v == 0
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_catalogue_from_dashboard() {
        let catalogue: ApiCatalogue = serde_json::from_value(json!({
            "id": "cat",
            "org_id": "org",
            "email": "",
            "apis": [{
                "name": "Orders",
                "auth_type": "authToken",
                "show": true,
                "policy_id": "gold",
                "documentation": "doc-1",
                "config": {"signup_fields": ["company"], "enable_dcr": true,
                           "dcr_options": {"idp_host": "https://idp", "registration_endpoint": "/reg",
                                           "grant_types": ["client_credentials"],
                                           "token_endpoint_auth_method": "client_secret_basic"}}
            }]
        }))
        .unwrap();

        let api = &catalogue.apis[0];
        assert_eq!(api.policy_id, "gold");
        let config = api.config.as_ref().unwrap();
        assert!(config.enable_dcr);
        assert_eq!(config.sign_up_fields, vec!["company"]);
        assert_eq!(config.dcr_options.as_ref().unwrap().grant_types, vec!["client_credentials"]);
    }

    #[test]
    fn test_portal_config_field_names() {
        let config = PortalConfig {
            override_: true,
            mail_options: Some(MailOptions {
                mail_from_name: "Portal".to_string(),
                ..Default::default()
            }),
            ..Default::default()
        };

        let value = serde_json::to_value(&config).unwrap();
        assert_eq!(value["override"], true);
        assert_eq!(value["mail_options"]["mail_from_name"], "Portal");
        assert!(value["mail_options"]["email_copy"].get("key_email").is_some());
        assert!(value.get("id").is_none());
    }
}
