use async_trait::async_trait;
use serde::Deserialize;

use super::{CertResponse, ENDPOINT_CERTS};
use crate::client::http::{join_path, HttpClient};
use crate::client::CertificateClient;
use crate::errors::Result;

#[derive(Debug, Default, Deserialize)]
#[serde(default)]
struct CertificateList {
    certs: Vec<String>,
}

#[derive(Debug, Clone)]
pub struct Certificates {
    http: HttpClient,
}

impl Certificates {
    pub(crate) fn new(http: HttpClient) -> Self {
        Self { http }
    }
}

#[async_trait]
impl CertificateClient for Certificates {
    async fn all(&self) -> Result<Vec<String>> {
        let list: CertificateList = self.http.get_json(ENDPOINT_CERTS, &[]).await?;
        Ok(list.certs)
    }

    async fn upload(&self, key: &[u8], crt: &[u8]) -> Result<String> {
        let response: CertResponse = self.http.upload_pem(ENDPOINT_CERTS, key, crt).await?;
        Ok(response.id)
    }

    async fn delete(&self, id: &str) -> Result<()> {
        self.http.delete(&join_path(&[ENDPOINT_CERTS, id])).await
    }

    async fn exists(&self, id: &str) -> bool {
        self.http.exists(&join_path(&[ENDPOINT_CERTS, id])).await
    }
}
