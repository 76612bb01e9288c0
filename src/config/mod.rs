//! # Configuration Management
//!
//! The operator is configured from environment variables, optionally loaded
//! from a `.env` file by the binary. An `OperatorContext` resource can then
//! override the connection settings per resource with
//! [`OperatorConfig::merge`].

mod settings;

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::errors::{OperatorError, Result};

pub use settings::{env_keys, IngressConfig, LogFormat, ObservabilityConfig, OperatorConfig};

/// Which control plane the operator talks to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum OperatorMode {
    /// Tyk Gateway, `ce` (`oss` is accepted as an alias)
    #[serde(rename = "ce", alias = "oss")]
    Gateway,
    /// Tyk Dashboard, `pro`
    #[serde(rename = "pro")]
    Dashboard,
}

impl OperatorMode {
    /// Header carrying the configured secret.
    pub fn auth_header(&self) -> &'static str {
        match self {
            OperatorMode::Gateway => "x-tyk-authorization",
            OperatorMode::Dashboard => "authorization",
        }
    }

    /// Short name used in logs and metrics labels.
    pub fn backend_name(&self) -> &'static str {
        match self {
            OperatorMode::Gateway => "gateway",
            OperatorMode::Dashboard => "dashboard",
        }
    }
}

impl fmt::Display for OperatorMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            OperatorMode::Gateway => f.write_str("ce"),
            OperatorMode::Dashboard => f.write_str("pro"),
        }
    }
}

impl FromStr for OperatorMode {
    type Err = OperatorError;

    fn from_str(s: &str) -> Result<Self> {
        match s.trim() {
            "ce" | "oss" => Ok(OperatorMode::Gateway),
            "pro" => Ok(OperatorMode::Dashboard),
            other => Err(OperatorError::validation_field(
                format!("unknown TYK_MODE value {:?}", other),
                "mode",
            )),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_mode_from_str() {
        assert_eq!("ce".parse::<OperatorMode>().unwrap(), OperatorMode::Gateway);
        assert_eq!("oss".parse::<OperatorMode>().unwrap(), OperatorMode::Gateway);
        assert_eq!("pro".parse::<OperatorMode>().unwrap(), OperatorMode::Dashboard);
        assert!("enterprise".parse::<OperatorMode>().is_err());
    }

    #[test]
    fn test_mode_headers() {
        assert_eq!(OperatorMode::Gateway.auth_header(), "x-tyk-authorization");
        assert_eq!(OperatorMode::Dashboard.auth_header(), "authorization");
        assert_eq!(OperatorMode::Dashboard.to_string(), "pro");
    }

    #[test]
    fn test_mode_serde() {
        let mode: OperatorMode = serde_json::from_str(r#""oss""#).unwrap();
        assert_eq!(mode, OperatorMode::Gateway);
        assert_eq!(serde_json::to_string(&mode).unwrap(), r#""ce""#);
    }
}
