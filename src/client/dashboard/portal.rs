use async_trait::async_trait;

use super::{Policies, ENDPOINT_CATALOGUE, ENDPOINT_CONFIGURATION, ENDPOINT_DOCUMENTATION};
use crate::client::http::{ensure_ok, join_path, HttpClient};
use crate::client::{CatalogueClient, DocumentationClient, PolicyClient, PortalClient, PortalConfigClient};
use crate::errors::Result;
use crate::model::{ApiCatalogue, ApiDocumentation, ApiResult, PortalConfig};

#[derive(Debug, Clone)]
pub struct Portal {
    policies: Policies,
    documentation: Documentation,
    catalogue: Catalogue,
    configuration: PortalConfiguration,
}

impl Portal {
    pub(crate) fn new(http: HttpClient) -> Self {
        Self {
            policies: Policies::new(http.clone()),
            documentation: Documentation { http: http.clone() },
            catalogue: Catalogue { http: http.clone() },
            configuration: PortalConfiguration { http },
        }
    }
}

impl PortalClient for Portal {
    fn policy(&self) -> &dyn PolicyClient {
        &self.policies
    }

    fn documentation(&self) -> &dyn DocumentationClient {
        &self.documentation
    }

    fn catalogue(&self) -> &dyn CatalogueClient {
        &self.catalogue
    }

    fn configuration(&self) -> &dyn PortalConfigClient {
        &self.configuration
    }
}

#[derive(Debug, Clone)]
pub struct Documentation {
    http: HttpClient,
}

#[async_trait]
impl DocumentationClient for Documentation {
    async fn upload(&self, doc: &ApiDocumentation) -> Result<ApiResult> {
        ensure_ok(self.http.post_json(ENDPOINT_DOCUMENTATION, doc).await?)
    }

    async fn delete(&self, id: &str) -> Result<ApiResult> {
        ensure_ok(self.http.delete_json(&join_path(&[ENDPOINT_DOCUMENTATION, id])).await?)
    }
}

/// The organisation's single catalogue.
#[derive(Debug, Clone)]
pub struct Catalogue {
    http: HttpClient,
}

#[async_trait]
impl CatalogueClient for Catalogue {
    async fn get(&self) -> Result<ApiCatalogue> {
        self.http.get_json(ENDPOINT_CATALOGUE, &[]).await
    }

    async fn create(&self, catalogue: &ApiCatalogue) -> Result<ApiResult> {
        ensure_ok(self.http.post_json(ENDPOINT_CATALOGUE, catalogue).await?)
    }

    async fn update(&self, catalogue: &ApiCatalogue) -> Result<ApiResult> {
        ensure_ok(self.http.put_json(ENDPOINT_CATALOGUE, catalogue).await?)
    }
}

#[derive(Debug, Clone)]
pub struct PortalConfiguration {
    http: HttpClient,
}

#[async_trait]
impl PortalConfigClient for PortalConfiguration {
    async fn get(&self) -> Result<PortalConfig> {
        self.http.get_json(ENDPOINT_CONFIGURATION, &[]).await
    }

    async fn create(&self, config: &PortalConfig) -> Result<ApiResult> {
        ensure_ok(self.http.post_json(ENDPOINT_CONFIGURATION, config).await?)
    }

    async fn update(&self, config: &PortalConfig) -> Result<ApiResult> {
        ensure_ok(self.http.put_json(ENDPOINT_CONFIGURATION, config).await?)
    }
}
