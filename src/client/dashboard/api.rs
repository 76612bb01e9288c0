use async_trait::async_trait;
use tracing::{debug, info};

use super::model::{ApisResponse, DashboardApi};
use super::ENDPOINT_APIS;
use crate::client::http::{ensure_created_id, ensure_ok, join_path, require_api_id, HttpClient};
use crate::client::ApiClient;
use crate::errors::Result;
use crate::model::{ApiDefinitionSpec, ApiDefinitionSpecList, ApiResult, ListApiOptions};

#[derive(Debug, Clone)]
pub struct Api {
    http: HttpClient,
    user_owners: Vec<String>,
    user_group_owners: Vec<String>,
}

impl Api {
    pub(crate) fn new(http: HttpClient, user_owners: Vec<String>, user_group_owners: Vec<String>) -> Self {
        Self { http, user_owners, user_group_owners }
    }

    fn wrap(&self, spec: ApiDefinitionSpec) -> DashboardApi {
        DashboardApi {
            api_definition: spec,
            user_owners: self.user_owners.clone(),
            user_group_owners: self.user_group_owners.clone(),
            ..Default::default()
        }
    }

    async fn fetch(&self, id: &str) -> Result<DashboardApi> {
        self.http.get_json(&join_path(&[ENDPOINT_APIS, id]), &[]).await
    }

    async fn put(&self, id: &str, spec: ApiDefinitionSpec) -> Result<ApiResult> {
        let result: ApiResult = self.http.put_json(&join_path(&[ENDPOINT_APIS, id]), &self.wrap(spec)).await?;
        ensure_ok(result)
    }

    /// POST a new definition, then pin the requested `api_id` onto the object
    /// the dashboard created.
    async fn create_new(&self, spec: ApiDefinitionSpec) -> Result<ApiResult> {
        let api_id = spec.api_id.clone().filter(|id| !id.is_empty());

        let created: ApiResult = self.http.post_json(ENDPOINT_APIS, &self.wrap(spec)).await?;
        let created = ensure_ok(created)?;
        ensure_created_id(&created.meta, &created)?;
        let object_id = created.meta.clone();
        debug!(object_id = %object_id, "Dashboard created API");

        let mut stored = self.fetch(&object_id).await?.api_definition;
        if api_id.is_some() {
            stored.api_id = api_id;
        }

        let mut result = self.put(&object_id, stored).await?;
        if result.meta.is_empty() {
            result.meta = object_id;
        }
        Ok(result)
    }
}

#[async_trait]
impl ApiClient for Api {
    /// Update the API when `api_id` already exists, create it otherwise.
    async fn create(&self, spec: &ApiDefinitionSpec) -> Result<ApiResult> {
        let resolved = spec.resolve_internal_targets().spec;
        let api_id = resolved.api_id().to_string();

        if api_id.is_empty() {
            return self.create_new(resolved).await;
        }

        match self.fetch(&api_id).await {
            Ok(existing) => {
                info!(api_id = %api_id, "API exists, updating");
                let mut spec = resolved;
                if spec.id.is_none() {
                    spec.id = existing.api_definition.id;
                }
                self.put(&api_id, spec).await
            }
            Err(e) if e.is_not_found() => {
                info!(api_id = %api_id, "Creating API");
                self.create_new(resolved).await
            }
            Err(e) => Err(e),
        }
    }

    async fn get(&self, api_id: &str) -> Result<ApiDefinitionSpec> {
        Ok(self.fetch(api_id).await?.api_definition)
    }

    async fn update(&self, spec: &ApiDefinitionSpec) -> Result<ApiResult> {
        let resolved = spec.resolve_internal_targets().spec;
        let api_id = resolved.api_id().to_string();
        require_api_id(&api_id)?;
        self.put(&api_id, resolved).await
    }

    async fn delete(&self, api_id: &str) -> Result<ApiResult> {
        require_api_id(api_id)?;
        let result: ApiResult = self.http.delete_json(&join_path(&[ENDPOINT_APIS, api_id])).await?;
        ensure_ok(result)
    }

    async fn list(&self, options: &ListApiOptions) -> Result<ApiDefinitionSpecList> {
        let response: ApisResponse = self.http.get_json(ENDPOINT_APIS, &options.params()).await?;
        let apis: Vec<ApiDefinitionSpec> = response.apis.into_iter().map(|api| api.api_definition).collect();
        debug!(count = apis.len(), "Listed APIs");
        Ok(ApiDefinitionSpecList { apis })
    }
}
