//! Adapter for the Tyk Dashboard REST API (`/api/...`).

use async_trait::async_trait;
use tracing::debug;

use super::http::HttpClient;
use super::{ApiClient, Backend, CertificateClient, OasClient, PortalClient};
use crate::config::{OperatorConfig, OperatorMode};
use crate::errors::Result;

mod api;
mod certificate;
pub mod model;
mod oas;
mod policy;
mod portal;

pub use api::Api;
pub use certificate::Certificates;
pub use oas::Oas;
pub use policy::Policies;
pub use portal::{Catalogue, Documentation, Portal, PortalConfiguration};

pub(crate) const ENDPOINT_APIS: &str = "/api/apis";
pub(crate) const ENDPOINT_CERTS: &str = "/api/certs";
pub(crate) const ENDPOINT_POLICIES: &str = "/api/portal/policies";
pub(crate) const ENDPOINT_DOCUMENTATION: &str = "/api/portal/documentation/";
pub(crate) const ENDPOINT_CATALOGUE: &str = "/api/portal/catalogue/";
pub(crate) const ENDPOINT_CONFIGURATION: &str = "/api/portal/configuration";
pub(crate) const ENDPOINT_OAS: &str = "/api/apis/oas";

/// Query asking the dashboard for every page at once.
pub(crate) fn all_pages() -> [(String, String); 1] {
    [("p".to_string(), "-2".to_string())]
}

/// Talks to the dashboard, which pushes changes to its gateways itself.
#[derive(Debug, Clone)]
pub struct DashboardBackend {
    api: Api,
    certificates: Certificates,
    portal: Portal,
    oas: Oas,
}

impl DashboardBackend {
    pub fn new(config: &OperatorConfig) -> Result<Self> {
        Ok(Self::with_http(
            HttpClient::new(config)?,
            config.user_owners.clone(),
            config.user_group_owners.clone(),
        ))
    }

    /// Owners are attached to every API this backend creates or updates.
    pub fn with_http(http: HttpClient, user_owners: Vec<String>, user_group_owners: Vec<String>) -> Self {
        Self {
            api: Api::new(http.clone(), user_owners, user_group_owners),
            certificates: Certificates::new(http.clone()),
            portal: Portal::new(http.clone()),
            oas: Oas::new(http),
        }
    }
}

#[async_trait]
impl Backend for DashboardBackend {
    fn mode(&self) -> OperatorMode {
        OperatorMode::Dashboard
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
        debug!("Dashboard reloads its gateways itself, nothing to do");
        Ok(())
    }
}
