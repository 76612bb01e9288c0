//! The gateway only knows policies. Portal documents live on the dashboard.

use async_trait::async_trait;

use super::Policies;
use crate::client::http::HttpClient;
use crate::client::{CatalogueClient, DocumentationClient, PolicyClient, PortalClient, PortalConfigClient};
use crate::errors::{OperatorError, Result};
use crate::model::{ApiCatalogue, ApiDocumentation, ApiResult, PortalConfig};

const BACKEND: &str = "gateway";

#[derive(Debug, Clone)]
pub struct Portal {
    policies: Policies,
    unsupported: Unsupported,
}

impl Portal {
    pub(crate) fn new(http: HttpClient) -> Self {
        Self { policies: Policies::new(http), unsupported: Unsupported }
    }
}

impl PortalClient for Portal {
    fn policy(&self) -> &dyn PolicyClient {
        &self.policies
    }

    fn documentation(&self) -> &dyn DocumentationClient {
        &self.unsupported
    }

    fn catalogue(&self) -> &dyn CatalogueClient {
        &self.unsupported
    }

    fn configuration(&self) -> &dyn PortalConfigClient {
        &self.unsupported
    }
}

#[derive(Debug, Clone, Copy)]
struct Unsupported;

#[async_trait]
impl DocumentationClient for Unsupported {
    async fn upload(&self, _doc: &ApiDocumentation) -> Result<ApiResult> {
        Err(OperatorError::unsupported("portal.documentation.upload", BACKEND))
    }

    async fn delete(&self, _id: &str) -> Result<ApiResult> {
        Err(OperatorError::unsupported("portal.documentation.delete", BACKEND))
    }
}

#[async_trait]
impl CatalogueClient for Unsupported {
    async fn get(&self) -> Result<ApiCatalogue> {
        Err(OperatorError::unsupported("portal.catalogue.get", BACKEND))
    }

    async fn create(&self, _catalogue: &ApiCatalogue) -> Result<ApiResult> {
        Err(OperatorError::unsupported("portal.catalogue.create", BACKEND))
    }

    async fn update(&self, _catalogue: &ApiCatalogue) -> Result<ApiResult> {
        Err(OperatorError::unsupported("portal.catalogue.update", BACKEND))
    }
}

#[async_trait]
impl PortalConfigClient for Unsupported {
    async fn get(&self) -> Result<PortalConfig> {
        Err(OperatorError::unsupported("portal.configuration.get", BACKEND))
    }

    async fn create(&self, _config: &PortalConfig) -> Result<ApiResult> {
        Err(OperatorError::unsupported("portal.configuration.create", BACKEND))
    }

    async fn update(&self, _config: &PortalConfig) -> Result<ApiResult> {
        Err(OperatorError::unsupported("portal.configuration.update", BACKEND))
    }
}
