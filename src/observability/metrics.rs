//! # Metrics Collection
//!
//! Prometheus metrics for calls made to the gateway or dashboard. Recording
//! is a no-op until [`init_metrics`] installs the exporter.

use std::net::SocketAddr;
use std::time::Duration;

use ::tracing::{info, warn};
use metrics::{counter, describe_counter, describe_histogram, histogram, Unit};
use metrics_exporter_prometheus::PrometheusBuilder;

use crate::config::ObservabilityConfig;
use crate::errors::{OperatorError, Result};

pub const REQUESTS_TOTAL: &str = "tyk_operator_backend_requests_total";
pub const REQUEST_DURATION: &str = "tyk_operator_backend_request_duration_seconds";

/// Records backend call outcomes for one backend.
#[derive(Debug, Clone)]
pub struct BackendMetrics {
    backend: &'static str,
}

impl BackendMetrics {
    pub fn new(backend: &'static str) -> Self {
        Self { backend }
    }

    /// Record a completed call. `status` is `None` when no response arrived.
    pub fn record(&self, method: &str, status: Option<u16>, duration: Duration) {
        let status = status.map_or_else(|| "error".to_string(), |s| s.to_string());
        let labels = [
            ("backend", self.backend.to_string()),
            ("method", method.to_string()),
            ("status", status),
        ];
        counter!(REQUESTS_TOTAL, &labels).increment(1);

        let duration_labels = [("backend", self.backend.to_string()), ("method", method.to_string())];
        histogram!(REQUEST_DURATION, &duration_labels).record(duration.as_secs_f64());
    }

    fn describe() {
        describe_counter!(REQUESTS_TOTAL, Unit::Count, "Calls made to the Tyk backend");
        describe_histogram!(
            REQUEST_DURATION,
            Unit::Seconds,
            "Latency of calls made to the Tyk backend"
        );
    }
}

/// Install the Prometheus exporter when a metrics port is configured.
pub async fn init_metrics(config: &ObservabilityConfig) -> Result<()> {
    let metrics_addr = match config.metrics_bind_address() {
        Some(addr) => addr,
        None => {
            warn!("Metrics disabled: no bind address configured");
            return Ok(());
        }
    };

    let socket_addr: SocketAddr = metrics_addr.parse().map_err(|e| {
        OperatorError::config(format!("Invalid metrics bind address '{}': {}", metrics_addr, e))
    })?;

    PrometheusBuilder::new()
        .with_http_listener(socket_addr)
        .add_global_label("service", "tyk-operator")
        .install()
        .map_err(|e| OperatorError::config(format!("Failed to initialize metrics exporter: {}", e)))?;

    BackendMetrics::describe();

    info!(metrics_addr = %metrics_addr, "Metrics collection initialized");

    Ok(())
}
