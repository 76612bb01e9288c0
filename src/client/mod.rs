//! # Backend Clients
//!
//! Capability traits shared by the gateway and dashboard adapters, and the
//! [`Universal`] client that dispatches to whichever one the operating mode
//! selects.
//!
//! ```rust,ignore
//! let config = OperatorConfig::from_env()?;
//! let client = Universal::from_config(&config)?;
//!
//! client.api().create(&spec).await?;
//! client.hot_reload().await?;
//! ```

use async_trait::async_trait;

use crate::config::OperatorMode;
use crate::errors::{OperatorError, Result};
use crate::model::{
    ApiCatalogue, ApiDefinitionSpec, ApiDefinitionSpecList, ApiDocumentation, ApiResult,
    ListApiOptions, PortalConfig, SecurityPolicySpec,
};

pub mod dashboard;
pub mod gateway;
pub mod http;
pub mod universal;

pub use dashboard::DashboardBackend;
pub use gateway::GatewayBackend;
pub use http::HttpClient;
pub use universal::Universal;

/// Classic API definitions.
#[async_trait]
pub trait ApiClient: Send + Sync {
    async fn create(&self, spec: &ApiDefinitionSpec) -> Result<ApiResult>;
    async fn get(&self, api_id: &str) -> Result<ApiDefinitionSpec>;
    async fn update(&self, spec: &ApiDefinitionSpec) -> Result<ApiResult>;
    async fn delete(&self, api_id: &str) -> Result<ApiResult>;
    async fn list(&self, options: &ListApiOptions) -> Result<ApiDefinitionSpecList>;
}

/// TLS certificates stored by the backend.
#[async_trait]
pub trait CertificateClient: Send + Sync {
    /// Ids of every stored certificate
    async fn all(&self) -> Result<Vec<String>>;
    /// Store `key` and `crt` as one PEM bundle and return its id
    async fn upload(&self, key: &[u8], crt: &[u8]) -> Result<String>;
    async fn delete(&self, id: &str) -> Result<()>;
    async fn exists(&self, id: &str) -> bool;
}

#[async_trait]
pub trait PolicyClient: Send + Sync {
    async fn all(&self) -> Result<Vec<SecurityPolicySpec>>;
    async fn get(&self, id: &str) -> Result<SecurityPolicySpec>;
    /// Create the policy and return it with the identifiers assigned by the
    /// backend.
    async fn create(&self, policy: &SecurityPolicySpec) -> Result<SecurityPolicySpec>;
    async fn update(&self, policy: &SecurityPolicySpec) -> Result<SecurityPolicySpec>;
    async fn delete(&self, id: &str) -> Result<()>;
}

#[async_trait]
pub trait DocumentationClient: Send + Sync {
    async fn upload(&self, doc: &ApiDocumentation) -> Result<ApiResult>;
    async fn delete(&self, id: &str) -> Result<ApiResult>;
}

#[async_trait]
pub trait CatalogueClient: Send + Sync {
    async fn get(&self) -> Result<ApiCatalogue>;
    async fn create(&self, catalogue: &ApiCatalogue) -> Result<ApiResult>;
    async fn update(&self, catalogue: &ApiCatalogue) -> Result<ApiResult>;
}

#[async_trait]
pub trait PortalConfigClient: Send + Sync {
    async fn get(&self) -> Result<PortalConfig>;
    async fn create(&self, config: &PortalConfig) -> Result<ApiResult>;
    async fn update(&self, config: &PortalConfig) -> Result<ApiResult>;
}

/// Developer portal resources, and the policies keys are issued against.
pub trait PortalClient: Send + Sync {
    fn policy(&self) -> &dyn PolicyClient;
    fn documentation(&self) -> &dyn DocumentationClient;
    fn catalogue(&self) -> &dyn CatalogueClient;
    fn configuration(&self) -> &dyn PortalConfigClient;
}

/// APIs described by an OAS document. Documents travel as raw JSON text.
#[async_trait]
pub trait OasClient: Send + Sync {
    async fn create(&self, id: &str, doc: &str) -> Result<()>;
    async fn get(&self, id: &str) -> Result<String>;
    async fn exists(&self, id: &str) -> bool;
    async fn update(&self, id: &str, doc: &str) -> Result<()>;
    async fn delete(&self, id: &str) -> Result<()>;
}

/// Everything the operator needs from one control plane.
#[async_trait]
pub trait Backend: Send + Sync {
    fn mode(&self) -> OperatorMode;
    fn api(&self) -> &dyn ApiClient;
    fn certificate(&self) -> &dyn CertificateClient;
    fn portal(&self) -> &dyn PortalClient;
    fn oas(&self) -> &dyn OasClient;
    /// Ask the control plane to load the latest definitions.
    async fn hot_reload(&self) -> Result<()>;
}

/// Set `x-tyk-api-gateway.info.id` in an OAS document.
pub(crate) fn with_oas_id(doc: &str, id: &str) -> Result<String> {
    let mut value: serde_json::Value = serde_json::from_str(doc)
        .map_err(|e| OperatorError::serialization("OAS document is not valid JSON", e))?;

    let root = value
        .as_object_mut()
        .ok_or_else(|| OperatorError::validation("OAS document must be a JSON object"))?;
    let info = root
        .entry("x-tyk-api-gateway")
        .or_insert_with(|| serde_json::json!({}))
        .as_object_mut()
        .and_then(|ext| {
            ext.entry("info").or_insert_with(|| serde_json::json!({})).as_object_mut()
        })
        .ok_or_else(|| {
            OperatorError::validation_field("expected an object", "x-tyk-api-gateway.info")
        })?;
    info.insert("id".to_string(), serde_json::Value::String(id.to_string()));

    serde_json::to_string(&value).map_err(|e| OperatorError::serialization("Failed to encode OAS document", e))
}
