use async_trait::async_trait;

use super::{all_pages, ENDPOINT_POLICIES};
use crate::client::http::{ensure_created_id, ensure_ok, join_path, HttpClient};
use crate::client::PolicyClient;
use crate::errors::Result;
use crate::model::security_policy::PoliciesResponse;
use crate::model::{ApiResult, SecurityPolicySpec};

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
        let response: PoliciesResponse = self.http.get_json(ENDPOINT_POLICIES, &all_pages()).await?;
        Ok(response.policies)
    }

    async fn get(&self, id: &str) -> Result<SecurityPolicySpec> {
        self.http.get_json(&join_path(&[ENDPOINT_POLICIES, id]), &[]).await
    }

    /// The dashboard answers with the new object id in `Message`; it becomes
    /// the returned policy's `_id`.
    async fn create(&self, policy: &SecurityPolicySpec) -> Result<SecurityPolicySpec> {
        let result: ApiResult = self.http.post_json(ENDPOINT_POLICIES, &policy.dashboard_payload()).await?;
        let result = ensure_ok(result)?;
        ensure_created_id(&result.message, &result)?;

        let mut created = policy.clone();
        created.mid = result.message;
        Ok(created)
    }

    /// Returns the policy as stored by the dashboard.
    async fn update(&self, policy: &SecurityPolicySpec) -> Result<SecurityPolicySpec> {
        let path = join_path(&[ENDPOINT_POLICIES, &policy.mid]);
        self.http.put_json(&path, &policy.dashboard_payload()).await
    }

    async fn delete(&self, id: &str) -> Result<()> {
        self.http.delete(&join_path(&[ENDPOINT_POLICIES, id])).await
    }
}
