use async_trait::async_trait;
use tracing::debug;

use super::ENDPOINT_APIS;
use crate::client::http::{ensure_ok, join_path, require_api_id, HttpClient};
use crate::client::ApiClient;
use crate::errors::Result;
use crate::model::{ApiDefinitionSpec, ApiDefinitionSpecList, ApiResult, ListApiOptions};

#[derive(Debug, Clone)]
pub struct Api {
    http: HttpClient,
}

impl Api {
    pub(crate) fn new(http: HttpClient) -> Self {
        Self { http }
    }
}

#[async_trait]
impl ApiClient for Api {
    /// Blind write. The gateway answers `added` or rejects on an id, listen
    /// path or slug collision.
    async fn create(&self, spec: &ApiDefinitionSpec) -> Result<ApiResult> {
        let resolved = spec.resolve_internal_targets();
        let result: ApiResult = self.http.post_json(ENDPOINT_APIS, &resolved.spec).await?;
        ensure_ok(result)
    }

    async fn get(&self, api_id: &str) -> Result<ApiDefinitionSpec> {
        self.http.get_json(&join_path(&[ENDPOINT_APIS, api_id]), &[]).await
    }

    async fn update(&self, spec: &ApiDefinitionSpec) -> Result<ApiResult> {
        require_api_id(spec.api_id())?;
        let resolved = spec.resolve_internal_targets();
        let path = join_path(&[ENDPOINT_APIS, spec.api_id()]);
        let result: ApiResult = self.http.put_json(&path, &resolved.spec).await?;
        ensure_ok(result)
    }

    async fn delete(&self, api_id: &str) -> Result<ApiResult> {
        require_api_id(api_id)?;
        let result: ApiResult = self.http.delete_json(&join_path(&[ENDPOINT_APIS, api_id])).await?;
        ensure_ok(result)
    }

    /// The gateway has no paging or filters, `options` are ignored.
    async fn list(&self, options: &ListApiOptions) -> Result<ApiDefinitionSpecList> {
        if *options != ListApiOptions::default() {
            debug!(?options, "Gateway ignores list options");
        }
        let apis: Vec<ApiDefinitionSpec> = self.http.get_json(ENDPOINT_APIS, &[]).await?;
        Ok(ApiDefinitionSpecList { apis })
    }
}
