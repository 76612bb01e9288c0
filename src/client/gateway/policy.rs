use async_trait::async_trait;
use serde::Deserialize;

use super::ENDPOINT_POLICIES;
use crate::client::http::{ensure_ok, join_path, HttpClient};
use crate::client::PolicyClient;
use crate::errors::Result;
use crate::model::security_policy::PoliciesResponse;
use crate::model::{ApiResult, SecurityPolicySpec};

/// Gateways answer with a bare array, older ones with a paged envelope.
#[derive(Debug, Deserialize)]
#[serde(untagged)]
enum PolicyListing {
    Plain(Vec<SecurityPolicySpec>),
    Paged(PoliciesResponse),
}

#[derive(Debug, Clone)]
pub struct Policies {
    http: HttpClient,
}

impl Policies {
    pub(crate) fn new(http: HttpClient) -> Self {
        Self { http }
    }
}

#[async_trait]
impl PolicyClient for Policies {
    async fn all(&self) -> Result<Vec<SecurityPolicySpec>> {
        let query = [("p".to_string(), "-2".to_string())];
        let listing: PolicyListing = self.http.get_json(ENDPOINT_POLICIES, &query).await?;
        Ok(match listing {
            PolicyListing::Plain(policies) => policies,
            PolicyListing::Paged(page) => page.policies,
        })
    }

    async fn get(&self, id: &str) -> Result<SecurityPolicySpec> {
        self.http.get_json(&join_path(&[ENDPOINT_POLICIES, id]), &[]).await
    }

    /// The returned policy carries the id the gateway stored it under.
    async fn create(&self, policy: &SecurityPolicySpec) -> Result<SecurityPolicySpec> {
        let payload = policy.gateway_payload();
        let result: ApiResult = self.http.post_json(ENDPOINT_POLICIES, &payload).await?;
        let result = ensure_ok(result)?;

        let mut created = policy.clone();
        if created.id.is_empty() {
            created.id = result.key;
        }
        Ok(created)
    }

    async fn update(&self, policy: &SecurityPolicySpec) -> Result<SecurityPolicySpec> {
        let payload = policy.gateway_payload();
        let path = join_path(&[ENDPOINT_POLICIES, &policy.id]);
        let result: ApiResult = self.http.put_json(&path, &payload).await?;
        ensure_ok(result)?;
        Ok(policy.clone())
    }

    async fn delete(&self, id: &str) -> Result<()> {
        self.http.delete(&join_path(&[ENDPOINT_POLICIES, id])).await
    }
}
