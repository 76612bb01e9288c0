//! Adapter for the Tyk Gateway REST API (`/tyk/...`).

use async_trait::async_trait;
use serde::Deserialize;
use tracing::info;

use super::http::{ensure_ok, HttpClient};
use super::{ApiClient, Backend, CertificateClient, OasClient, PortalClient};
use crate::config::{OperatorConfig, OperatorMode};
use crate::errors::Result;
use crate::model::ApiResult;

mod api;
mod certificate;
mod oas;
mod policy;
mod portal;

pub use api::Api;
pub use certificate::Certificates;
pub use oas::Oas;
pub use policy::Policies;
pub use portal::Portal;

pub(crate) const ENDPOINT_APIS: &str = "/tyk/apis";
pub(crate) const ENDPOINT_CERTS: &str = "/tyk/certs";
pub(crate) const ENDPOINT_POLICIES: &str = "/tyk/policies";
pub(crate) const ENDPOINT_RELOAD: &str = "/tyk/reload/group";
pub(crate) const ENDPOINT_OAS: &str = "/tyk/apis/oas";

/// Answer to a certificate upload.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub(crate) struct CertResponse {
    pub id: String,
    pub message: String,
    pub status: String,
}

/// Talks to a gateway directly. Changes take effect after [`Backend::hot_reload`].
#[derive(Debug, Clone)]
pub struct GatewayBackend {
    http: HttpClient,
    api: Api,
    certificates: Certificates,
    portal: Portal,
    oas: Oas,
}

impl GatewayBackend {
    pub fn new(config: &OperatorConfig) -> Result<Self> {
        Ok(Self::with_http(HttpClient::new(config)?))
    }

    pub fn with_http(http: HttpClient) -> Self {
        Self {
            api: Api::new(http.clone()),
            certificates: Certificates::new(http.clone()),
            portal: Portal::new(http.clone()),
            oas: Oas::new(http.clone()),
            http,
        }
    }
}

#[async_trait]
impl Backend for GatewayBackend {
    fn mode(&self) -> OperatorMode {
        OperatorMode::Gateway
    }

    fn api(&self) -> &dyn ApiClient {
        &self.api
    }

    fn certificate(&self) -> &dyn CertificateClient {
        &self.certificates
    }

    fn portal(&self) -> &dyn PortalClient {
        &self.portal
    }

    fn oas(&self) -> &dyn OasClient {
        &self.oas
    }

    async fn hot_reload(&self) -> Result<()> {
        let result: ApiResult = self.http.get_json(ENDPOINT_RELOAD, &[]).await?;
        ensure_ok(result)?;
        info!("Gateway group reload requested");
        Ok(())
    }
}
