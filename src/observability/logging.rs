//! # Structured Logging
//!
//! Span macros and subscriber setup using the tracing ecosystem.

use tracing_subscriber::EnvFilter;

use crate::config::{LogFormat, OperatorConfig};
use crate::errors::{OperatorError, Result};

/// Create a tracing span for a call to the gateway or dashboard.
///
/// ```rust,ignore
/// let span = client_span!("gateway", "api.create");
/// let span = client_span!("dashboard", "api.update", api_id = %id);
/// ```
#[macro_export]
macro_rules! client_span {
    ($backend:expr, $operation:expr) => {
        $crate::__private::tracing::debug_span!(
            "backend_call",
            backend = %$backend,
            operation = %$operation,
            operation_id = %$crate::__private::uuid::Uuid::new_v4()
        )
    };
    ($backend:expr, $operation:expr, $($field:tt)*) => {
        $crate::__private::tracing::debug_span!(
            "backend_call",
            backend = %$backend,
            operation = %$operation,
            operation_id = %$crate::__private::uuid::Uuid::new_v4(),
            $($field)*
        )
    };
}

/// Install the global subscriber. `RUST_LOG` wins over `verbose`.
///
/// Returns an error only when a subscriber is already installed.
pub fn init_logging(verbose: bool, format: LogFormat) -> Result<()> {
    let default_level = if verbose { "debug" } else { "info" };
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level));

    let builder = tracing_subscriber::fmt().with_env_filter(filter).with_target(verbose);

    let installed = match format {
        LogFormat::Json => builder.json().try_init(),
        LogFormat::Text => builder.try_init(),
    };

    installed.map_err(|e| OperatorError::config(format!("Failed to initialize logging: {}", e)))
}

/// Log configuration at startup
pub fn log_config_info(config: &OperatorConfig) {
    tracing::info!(
        mode = %config.mode,
        url = %config.url,
        org = %config.org,
        namespace = %config.namespace,
        insecure_skip_verify = config.insecure_skip_verify,
        timeout_seconds = config.timeout_seconds,
        https_ingress_port = config.ingress.https_port,
        metrics_enabled = config.observability.metrics_port.is_some(),
        "Tyk operator configuration"
    );
}

#[cfg(test)]
mod tests {
    use super::*;
    use tracing_test::traced_test;

    #[test]
    fn test_macros_compile() {
        let _span = client_span!("gateway", "api.create");
        let _span = client_span!("dashboard", "api.update", api_id = "abc");
    }

    #[traced_test]
    #[test]
    fn test_log_config_info_omits_secret() {
        let config = OperatorConfig::from_lookup(|key| match key {
            "TYK_MODE" => Some("pro".to_string()),
            "TYK_URL" => Some("http://dashboard:3000".to_string()),
            "TYK_AUTH" => Some("very-secret".to_string()),
            "TYK_ORG" => Some("org".to_string()),
            _ => None,
        })
        .unwrap();

        log_config_info(&config);

        assert!(logs_contain("Tyk operator configuration"));
        assert!(logs_contain("mode=pro"));
        assert!(!logs_contain("very-secret"));
    }
}
