use async_trait::async_trait;
use reqwest::Method;

use super::ENDPOINT_OAS;
use crate::client::http::{join_path, HttpClient};
use crate::client::{with_oas_id, OasClient};
use crate::errors::Result;

#[derive(Debug, Clone)]
pub struct Oas {
    http: HttpClient,
}

impl Oas {
    pub(crate) fn new(http: HttpClient) -> Self {
        Self { http }
    }
}

#[async_trait]
impl OasClient for Oas {
    async fn create(&self, id: &str, doc: &str) -> Result<()> {
        self.http.send_raw(Method::POST, ENDPOINT_OAS, with_oas_id(doc, id)?).await?;
        Ok(())
    }

    async fn get(&self, id: &str) -> Result<String> {
        self.http.get_text(&join_path(&[ENDPOINT_OAS, id])).await
    }

    async fn exists(&self, id: &str) -> bool {
        self.http.exists(&join_path(&[ENDPOINT_OAS, id])).await
    }

    async fn update(&self, id: &str, doc: &str) -> Result<()> {
        self.http.send_raw(Method::PUT, &join_path(&[ENDPOINT_OAS, id]), doc.to_string()).await?;
        Ok(())
    }

    async fn delete(&self, id: &str) -> Result<()> {
        self.http.delete(&join_path(&[ENDPOINT_OAS, id])).await
    }
}
