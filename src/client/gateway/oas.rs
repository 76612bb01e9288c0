use async_trait::async_trait;
use reqwest::Method;
use tracing::info;

use super::ENDPOINT_OAS;
use crate::client::http::{ensure_ok, join_path, HttpClient};
use crate::client::{with_oas_id, OasClient};
use crate::errors::Result;
use crate::model::ApiResult;

#[derive(Debug, Clone)]
pub struct Oas {
    http: HttpClient,
}

impl Oas {
    pub(crate) fn new(http: HttpClient) -> Self {
        Self { http }
    }

    async fn write(&self, method: Method, path: &str, doc: String) -> Result<()> {
        let response = self.http.send_raw(method, path, doc).await?;
        let result: ApiResult = self.http.json(response).await?;
        ensure_ok(result)?;
        Ok(())
    }
}

#[async_trait]
impl OasClient for Oas {
    async fn create(&self, id: &str, doc: &str) -> Result<()> {
        info!(id, "Creating OAS API");
        self.write(Method::POST, ENDPOINT_OAS, with_oas_id(doc, id)?).await
    }

    async fn get(&self, id: &str) -> Result<String> {
        self.http.get_text(&join_path(&[ENDPOINT_OAS, id])).await
    }

    async fn exists(&self, id: &str) -> bool {
        self.http.exists(&join_path(&[ENDPOINT_OAS, id])).await
    }

    async fn update(&self, id: &str, doc: &str) -> Result<()> {
        info!(id, "Updating OAS API");
        self.write(Method::PUT, &join_path(&[ENDPOINT_OAS, id]), doc.to_string()).await
    }

    async fn delete(&self, id: &str) -> Result<()> {
        info!(id, "Deleting OAS API");
        let result: ApiResult = self.http.delete_json(&join_path(&[ENDPOINT_OAS, id])).await?;
        ensure_ok(result)?;
        Ok(())
    }
}
