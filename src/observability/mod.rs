//! # Observability Infrastructure
//!
//! Structured logging through `tracing` and Prometheus metrics for calls
//! made to the gateway or dashboard.

pub mod logging;
pub mod metrics;

pub use logging::{init_logging, log_config_info};
pub use metrics::{init_metrics, BackendMetrics};
