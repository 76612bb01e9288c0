//! Dispatches every call to the backend picked by the operating mode.

use std::sync::Arc;

use tracing::info;

use super::{ApiClient, Backend, CertificateClient, DashboardBackend, GatewayBackend, OasClient, PortalClient};
use crate::config::{OperatorConfig, OperatorMode};
use crate::errors::Result;

/// Backend-agnostic client. Cheap to clone; holds no state of its own.
#[derive(Clone)]
pub struct Universal {
    backend: Arc<dyn Backend>,
}

impl std::fmt::Debug for Universal {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Universal").field("mode", &self.backend.mode()).finish()
    }
}

impl Universal {
    /// `ce` selects the gateway adapter, `pro` the dashboard one.
    pub fn from_config(config: &OperatorConfig) -> Result<Self> {
        config.validate()?;

        let backend: Arc<dyn Backend> = match config.mode {
            OperatorMode::Gateway => Arc::new(GatewayBackend::new(config)?),
            OperatorMode::Dashboard => Arc::new(DashboardBackend::new(config)?),
        };

        info!(mode = %config.mode, url = %config.url, "Backend client ready");
        Ok(Self { backend })
    }

    pub fn with_backend(backend: Arc<dyn Backend>) -> Self {
        Self { backend }
    }

    pub fn mode(&self) -> OperatorMode {
        self.backend.mode()
    }

    pub fn api(&self) -> &dyn ApiClient {
        self.backend.api()
    }

    pub fn certificate(&self) -> &dyn CertificateClient {
        self.backend.certificate()
    }

    pub fn portal(&self) -> &dyn PortalClient {
        self.backend.portal()
    }

    pub fn oas(&self) -> &dyn OasClient {
        self.backend.oas()
    }

    pub async fn hot_reload(&self) -> Result<()> {
        self.backend.hot_reload().await
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn config(mode: OperatorMode) -> OperatorConfig {
        OperatorConfig {
            mode,
            url: "http://localhost:8080".to_string(),
            auth: "secret".to_string(),
            org: "org".to_string(),
            ..Default::default()
        }
    }

    #[test]
    fn test_mode_selects_backend() {
        let gateway = Universal::from_config(&config(OperatorMode::Gateway)).unwrap();
        assert_eq!(gateway.mode(), OperatorMode::Gateway);

        let dashboard = Universal::from_config(&config(OperatorMode::Dashboard)).unwrap();
        assert_eq!(dashboard.mode(), OperatorMode::Dashboard);
        assert!(format!("{:?}", dashboard).contains("Dashboard"));
    }

    #[test]
    fn test_invalid_config_is_rejected() {
        let mut bad = config(OperatorMode::Gateway);
        bad.url = "not a url".to_string();
        assert!(Universal::from_config(&bad).is_err());
    }

    #[tokio::test]
    async fn test_dashboard_hot_reload_is_a_noop() {
        // Unroutable URL: any request would fail.
        let mut cfg = config(OperatorMode::Dashboard);
        cfg.url = "http://127.0.0.1:9".to_string();
        let client = Universal::from_config(&cfg).unwrap();
        client.hot_reload().await.unwrap();
    }
}
