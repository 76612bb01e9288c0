//! # tyk-operator
//!
//! Support library for a Kubernetes operator that keeps a Tyk Gateway or a
//! Tyk Dashboard in sync with custom resources.
//!
//! ## Architecture
//!
//! ```text
//! custom resource → model (target resolution) → Universal client → gateway | dashboard
//!                                                      ↓
//!                                      tracing spans + Prometheus metrics
//! ```
//!
//! ## Core Components
//!
//! - **Model**: API definitions, security policies, portal documents and the
//!   resources that carry them, with `tyk://` target resolution
//! - **Client**: one capability interface over both control planes, the
//!   adapter picked from the operating mode
//! - **Snapshot**: export of a running control plane as resource YAML
//!
//! ## Example Usage
//!
//! ```rust,no_run
//! use tyk_operator::{client::Universal, config::OperatorConfig, Result};
//!
//! #[tokio::main]
//! async fn main() -> Result<()> {
//!     let config = OperatorConfig::from_env()?;
//!     let client = Universal::from_config(&config)?;
//!     client.hot_reload().await
//! }
//! ```

pub mod cli;
pub mod client;
pub mod config;
pub mod errors;
pub mod model;
pub mod observability;
pub mod snapshot;

#[doc(hidden)]
pub mod __private {
    pub use tracing;
    pub use uuid;
}

pub use client::Universal;
pub use config::{OperatorConfig, OperatorMode};
pub use errors::{OperatorError, Result};

/// Application version from Cargo.toml
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Application name from Cargo.toml
pub const APP_NAME: &str = env!("CARGO_PKG_NAME");
