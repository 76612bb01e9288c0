//! # Configuration Settings
//!
//! Defines the configuration structure for the operator.

use std::time::Duration;

use serde::{Deserialize, Serialize};
use validator::Validate;

use super::OperatorMode;
use crate::errors::{OperatorError, Result};
use crate::model::Environment;

/// Environment variable names read by [`OperatorConfig::from_env`].
pub mod env_keys {
    pub const WATCH_NAMESPACE: &str = "WATCH_NAMESPACE";
    pub const TYK_MODE: &str = "TYK_MODE";
    pub const TYK_URL: &str = "TYK_URL";
    pub const TYK_AUTH: &str = "TYK_AUTH";
    pub const TYK_ORG: &str = "TYK_ORG";
    pub const SKIP_VERIFY: &str = "TYK_TLS_INSECURE_SKIP_VERIFY";
    pub const INGRESS_CLASS: &str = "WATCH_INGRESS_CLASS";
    pub const INGRESS_TLS_PORT: &str = "TYK_HTTPS_INGRESS_PORT";
    pub const INGRESS_HTTP_PORT: &str = "TYK_HTTP_INGRESS_PORT";
    pub const USER_OWNERS: &str = "TYK_USER_OWNERS";
    pub const USER_GROUP_OWNERS: &str = "TYK_USER_GROUP_OWNERS";
    pub const HTTP_TIMEOUT: &str = "TYK_HTTP_TIMEOUT_SECONDS";
    pub const METRICS_PORT: &str = "TYK_METRICS_PORT";
    pub const LOG_FORMAT: &str = "TYK_LOG_FORMAT";
}

const DEFAULT_HTTPS_INGRESS_PORT: u16 = 8443;
const DEFAULT_TIMEOUT_SECONDS: u64 = 30;

/// Operator configuration
#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
pub struct OperatorConfig {
    /// Backend kind
    pub mode: OperatorMode,

    /// Base URL of the gateway or dashboard
    #[validate(url(message = "TYK_URL must be a valid URL"))]
    pub url: String,

    /// Gateway secret or dashboard user key
    #[serde(skip_serializing)]
    #[validate(length(min = 1, message = "TYK_AUTH cannot be empty"))]
    pub auth: String,

    /// Organisation id
    #[validate(length(min = 1, message = "TYK_ORG cannot be empty"))]
    pub org: String,

    /// Skip TLS certificate verification
    pub insecure_skip_verify: bool,

    /// Dashboard users owning created APIs
    pub user_owners: Vec<String>,

    /// Dashboard user groups owning created APIs
    pub user_group_owners: Vec<String>,

    /// Namespace to watch (empty = all)
    pub namespace: String,

    /// Ingress handling
    #[validate(nested)]
    pub ingress: IngressConfig,

    /// Per-request timeout in seconds
    #[validate(range(min = 1, max = 300, message = "Timeout must be between 1 and 300 seconds"))]
    pub timeout_seconds: u64,

    /// Logging and metrics
    #[validate(nested)]
    pub observability: ObservabilityConfig,
}

/// Ingress controller settings
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, Validate)]
pub struct IngressConfig {
    /// Ingress class to watch (empty = tyk)
    pub class: String,

    /// Port the gateway serves plain HTTP ingress on (0 = unset)
    pub http_port: u16,

    /// Port the gateway serves TLS ingress on
    #[validate(range(min = 1, message = "HTTPS ingress port must be between 1 and 65535"))]
    pub https_port: u16,
}

impl Default for OperatorConfig {
    fn default() -> Self {
        Self {
            mode: OperatorMode::Gateway,
            url: "http://localhost:8080".to_string(),
            auth: String::new(),
            org: String::new(),
            insecure_skip_verify: false,
            user_owners: Vec::new(),
            user_group_owners: Vec::new(),
            namespace: String::new(),
            ingress: IngressConfig::default(),
            timeout_seconds: DEFAULT_TIMEOUT_SECONDS,
            observability: ObservabilityConfig::default(),
        }
    }
}

impl Default for IngressConfig {
    fn default() -> Self {
        Self {
            class: String::new(),
            http_port: 0,
            https_port: DEFAULT_HTTPS_INGRESS_PORT,
        }
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LogFormat {
    #[default]
    Text,
    Json,
}

/// Observability configuration
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize, Validate)]
pub struct ObservabilityConfig {
    /// Prometheus exporter port (None = disabled)
    pub metrics_port: Option<u16>,

    /// Log output format
    pub log_format: LogFormat,
}

impl ObservabilityConfig {
    /// Get metrics bind address (None if disabled)
    pub fn metrics_bind_address(&self) -> Option<String> {
        match self.metrics_port {
            Some(port) if port != 0 => Some(format!("0.0.0.0:{}", port)),
            _ => None,
        }
    }
}

impl OperatorConfig {
    /// Create configuration from the process environment
    pub fn from_env() -> Result<Self> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Create configuration from any key lookup, trimming every value.
    ///
    /// `TYK_MODE`, `TYK_URL`, `TYK_AUTH` and `TYK_ORG` are required; all
    /// missing ones are reported together.
    pub fn from_lookup<F>(lookup: F) -> Result<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let get = |key: &str| lookup(key).map(|v| v.trim().to_string()).unwrap_or_default();

        let required = [env_keys::TYK_MODE, env_keys::TYK_URL, env_keys::TYK_AUTH, env_keys::TYK_ORG];
        let missing: Vec<&str> = required.iter().copied().filter(|key| get(key).is_empty()).collect();
        if !missing.is_empty() {
            return Err(OperatorError::config(format!(
                "environment vars {:?} are missing",
                missing
            )));
        }

        let mode: OperatorMode = get(env_keys::TYK_MODE).parse()?;

        let https_port = parse_or(&get(env_keys::INGRESS_TLS_PORT), env_keys::INGRESS_TLS_PORT, 0)?;
        let http_port = parse_or(&get(env_keys::INGRESS_HTTP_PORT), env_keys::INGRESS_HTTP_PORT, 0)?;
        let timeout_seconds = parse_or(
            &get(env_keys::HTTP_TIMEOUT),
            env_keys::HTTP_TIMEOUT,
            DEFAULT_TIMEOUT_SECONDS,
        )?;

        let metrics_port = match get(env_keys::METRICS_PORT).as_str() {
            "" => None,
            value => Some(parse_or(value, env_keys::METRICS_PORT, 0)?),
        };

        let log_format = match get(env_keys::LOG_FORMAT).to_lowercase().as_str() {
            "json" => LogFormat::Json,
            _ => LogFormat::Text,
        };

        let config = Self {
            mode,
            url: get(env_keys::TYK_URL),
            auth: get(env_keys::TYK_AUTH),
            org: get(env_keys::TYK_ORG),
            insecure_skip_verify: parse_bool(&get(env_keys::SKIP_VERIFY)),
            user_owners: split_list(&get(env_keys::USER_OWNERS)),
            user_group_owners: split_list(&get(env_keys::USER_GROUP_OWNERS)),
            namespace: get(env_keys::WATCH_NAMESPACE),
            ingress: IngressConfig {
                class: get(env_keys::INGRESS_CLASS),
                http_port,
                https_port: if https_port == 0 { DEFAULT_HTTPS_INGRESS_PORT } else { https_port },
            },
            timeout_seconds,
            observability: ObservabilityConfig { metrics_port, log_format },
        };

        config.validate()?;
        Ok(config)
    }

    /// Validate the entire configuration
    pub fn validate(&self) -> Result<()> {
        Validate::validate(self).map_err(OperatorError::from)
    }

    /// Overlay the set fields of an `OperatorContext` environment.
    pub fn merge(&self, env: &Environment) -> Self {
        let mut merged = self.clone();

        if let Some(mode) = env.mode {
            merged.mode = mode;
        }
        overlay(&mut merged.url, env.url.as_deref());
        overlay(&mut merged.auth, env.auth.as_deref());
        overlay(&mut merged.org, env.org.as_deref());
        if let Some(skip) = env.insecure_skip_verify {
            merged.insecure_skip_verify = skip;
        }
        if let Some(port) = env.ingress.http_port.filter(|p| *p != 0) {
            merged.ingress.http_port = port;
        }
        if let Some(port) = env.ingress.https_port.filter(|p| *p != 0) {
            merged.ingress.https_port = port;
        }
        if !env.user_owners.is_empty() {
            merged.user_owners = env.user_owners.clone();
        }
        if !env.user_group_owners.is_empty() {
            merged.user_group_owners = env.user_group_owners.clone();
        }

        merged
    }

    /// Get request timeout as Duration
    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_seconds)
    }
}

fn overlay(field: &mut String, value: Option<&str>) {
    if let Some(value) = value.map(str::trim).filter(|v| !v.is_empty()) {
        *field = value.to_string();
    }
}

fn parse_or<T: std::str::FromStr>(value: &str, key: &str, default: T) -> Result<T> {
    if value.is_empty() {
        return Ok(default);
    }
    value
        .parse()
        .map_err(|_| OperatorError::config(format!("Invalid {}: {:?}", key, value)))
}

fn parse_bool(value: &str) -> bool {
    matches!(value.to_lowercase().as_str(), "true" | "1" | "t")
}

fn split_list(value: &str) -> Vec<String> {
    value
        .split(',')
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .map(str::to_string)
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn lookup(pairs: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let map: HashMap<String, String> =
            pairs.iter().map(|(k, v)| (k.to_string(), v.to_string())).collect();
        move |key| map.get(key).cloned()
    }

    fn base() -> Vec<(&'static str, &'static str)> {
        vec![
            ("TYK_MODE", "ce"),
            ("TYK_URL", "http://localhost:8080"),
            ("TYK_AUTH", "secret"),
            ("TYK_ORG", "org"),
        ]
    }

    #[test]
    fn test_defaults() {
        let config = OperatorConfig::from_lookup(lookup(&base())).unwrap();
        assert_eq!(config.mode, OperatorMode::Gateway);
        assert_eq!(config.ingress.https_port, 8443);
        assert_eq!(config.ingress.http_port, 0);
        assert_eq!(config.timeout(), Duration::from_secs(30));
        assert!(!config.insecure_skip_verify);
        assert!(config.user_owners.is_empty());
        assert_eq!(config.observability.metrics_bind_address(), None);
    }

    #[test]
    fn test_missing_vars_are_listed() {
        let err = OperatorConfig::from_lookup(lookup(&[("TYK_MODE", "pro")])).unwrap_err();
        let message = err.to_string();
        assert!(message.contains("TYK_URL"), "{}", message);
        assert!(message.contains("TYK_AUTH"), "{}", message);
        assert!(message.contains("TYK_ORG"), "{}", message);
        assert!(!message.contains("TYK_MODE"), "{}", message);
    }

    #[test]
    fn test_unknown_mode() {
        let mut vars = base();
        vars[0] = ("TYK_MODE", "enterprise");
        let err = OperatorConfig::from_lookup(lookup(&vars)).unwrap_err();
        assert!(err.to_string().contains("enterprise"));
    }

    #[test]
    fn test_invalid_port() {
        let mut vars = base();
        vars.push(("TYK_HTTPS_INGRESS_PORT", "https"));
        assert!(OperatorConfig::from_lookup(lookup(&vars)).is_err());
    }

    #[test]
    fn test_invalid_url() {
        let mut vars = base();
        vars[1] = ("TYK_URL", "not a url");
        assert!(matches!(
            OperatorConfig::from_lookup(lookup(&vars)),
            Err(OperatorError::Validation { .. })
        ));
    }

    #[test]
    fn test_merge_overlays_set_fields() {
        let mut vars = base();
        vars.push(("TYK_USER_OWNERS", "alice, bob"));
        let config = OperatorConfig::from_lookup(lookup(&vars)).unwrap();
        assert_eq!(config.user_owners, vec!["alice", "bob"]);

        let env = Environment {
            mode: Some(OperatorMode::Dashboard),
            url: Some("http://dashboard:3000".to_string()),
            auth: Some("  ".to_string()),
            user_owners: vec!["carol".to_string()],
            ..Default::default()
        };

        let merged = config.merge(&env);
        assert_eq!(merged.mode, OperatorMode::Dashboard);
        assert_eq!(merged.url, "http://dashboard:3000");
        assert_eq!(merged.auth, "secret");
        assert_eq!(merged.org, "org");
        assert_eq!(merged.user_owners, vec!["carol"]);
        assert_eq!(merged.ingress.https_port, 8443);
    }
}
