//! HTTP plumbing shared by the gateway and dashboard adapters.
//!
//! Every call goes through [`HttpClient::send`], which adds the auth header,
//! logs the call, records metrics and maps non-2xx answers onto
//! [`OperatorError`].

use std::time::Instant;

use reqwest::{Client, Method, RequestBuilder, Response, StatusCode};
use serde::de::DeserializeOwned;
use serde::Serialize;
use tracing::{debug, trace, warn, Instrument};

use crate::client_span;
use crate::config::{OperatorConfig, OperatorMode};
use crate::errors::{OperatorError, Result};
use crate::model::{to_wire_vec, ApiResult};
use crate::observability::BackendMetrics;

/// Authenticated client for one backend.
#[derive(Debug, Clone)]
pub struct HttpClient {
    client: Client,
    base_url: String,
    mode: OperatorMode,
    auth: String,
    verbose: bool,
    metrics: BackendMetrics,
}

impl HttpClient {
    pub fn new(config: &OperatorConfig) -> Result<Self> {
        let client = Client::builder()
            .timeout(config.timeout())
            .danger_accept_invalid_certs(config.insecure_skip_verify)
            .build()
            .map_err(|e| OperatorError::transport("Failed to build HTTP client", e))?;

        Ok(Self {
            client,
            base_url: config.url.clone(),
            mode: config.mode,
            auth: config.auth.clone(),
            verbose: tracing::enabled!(tracing::Level::TRACE),
            metrics: BackendMetrics::new(config.mode.backend_name()),
        })
    }

    pub fn mode(&self) -> OperatorMode {
        self.mode
    }

    pub fn backend(&self) -> &'static str {
        self.mode.backend_name()
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    /// Full URL for `path` under the base URL.
    pub fn url(&self, path: &str) -> String {
        join_url(&self.base_url, path)
    }

    /// Build a request with the auth header for this backend.
    pub fn request(&self, method: Method, path: &str) -> RequestBuilder {
        self.client
            .request(method, self.url(path))
            .header(self.mode.auth_header(), &self.auth)
    }

    /// Send `builder`, failing on transport errors and non-2xx answers.
    pub async fn send(&self, builder: RequestBuilder, path: &str) -> Result<Response> {
        let request = builder
            .build()
            .map_err(|e| OperatorError::transport(format!("Failed to build request for {}", path), e))?;
        let method = request.method().clone();
        let url = request.url().to_string();

        let span = client_span!(self.backend(), path, method = %method);
        let started = Instant::now();
        let result = self.client.execute(request).instrument(span).await;
        let elapsed = started.elapsed();

        let response = match result {
            Ok(response) => response,
            Err(e) => {
                self.metrics.record(method.as_str(), None, elapsed);
                warn!(backend = self.backend(), %method, %url, error = %e, "Call failed");
                return Err(OperatorError::transport(format!("{} {} failed", method, url), e));
            }
        };

        let status = response.status();
        self.metrics.record(method.as_str(), Some(status.as_u16()), elapsed);
        debug!(
            backend = self.backend(),
            %method,
            %url,
            status = status.as_u16(),
            elapsed_ms = elapsed.as_millis() as u64,
            "Call"
        );

        if status.is_success() {
            return Ok(response);
        }

        Err(self.error_from(response, path).await)
    }

    async fn error_from(&self, response: Response, path: &str) -> OperatorError {
        let status = response.status();
        let body = response.text().await.unwrap_or_default();
        if !body.is_empty() {
            debug!(status = status.as_u16(), body = %body, "Error response");
        }

        if status == StatusCode::NOT_FOUND {
            let (resource, id) = split_resource(path);
            return OperatorError::not_found(resource, id);
        }

        let message = format!("{} API call failed with {}", status.as_u16(), body.trim());
        match serde_json::from_str::<ApiResult>(&body) {
            Ok(result) => OperatorError::http_with_body(message, status.as_u16(), result),
            Err(_) => OperatorError::http(message, status.as_u16()),
        }
    }

    /// Decode a JSON response body.
    pub async fn json<T: DeserializeOwned>(&self, response: Response) -> Result<T> {
        let body = response
            .text()
            .await
            .map_err(|e| OperatorError::transport("Failed to read response body", e))?;

        if self.verbose {
            trace!("Response body:\n{}", body);
        }

        serde_json::from_str(&body)
            .map_err(|e| OperatorError::serialization(format!("Failed to decode response: {}", body), e))
    }

    pub async fn get_json<T: DeserializeOwned>(&self, path: &str, query: &[(String, String)]) -> Result<T> {
        let response = self.send(self.request(Method::GET, path).query(query), path).await?;
        self.json(response).await
    }

    pub async fn get_text(&self, path: &str) -> Result<String> {
        let response = self.send(self.request(Method::GET, path), path).await?;
        response
            .text()
            .await
            .map_err(|e| OperatorError::transport("Failed to read response body", e))
    }

    /// Whether `path` answers with a 2xx status. Failures are logged and
    /// reported as absent.
    pub async fn exists(&self, path: &str) -> bool {
        match self.send(self.request(Method::GET, path), path).await {
            Ok(_) => true,
            Err(e) => {
                debug!(path, error = %e, "Resource does not exist");
                false
            }
        }
    }

    /// Send `body` encoded with the wire encoder.
    pub async fn send_json<B: Serialize + ?Sized, T: DeserializeOwned>(
        &self,
        method: Method,
        path: &str,
        body: &B,
    ) -> Result<T> {
        let bytes = to_wire_vec(body).map_err(|e| {
            OperatorError::serialization(format!("Failed to encode request for {}", path), e)
        })?;

        if self.verbose {
            trace!("Request body:\n{}", String::from_utf8_lossy(&bytes));
        }

        let builder = self
            .request(method, path)
            .header(reqwest::header::CONTENT_TYPE, "application/json")
            .body(bytes);
        let response = self.send(builder, path).await?;
        self.json(response).await
    }

    /// Send a body that is already JSON text, such as an OAS document.
    pub async fn send_raw(&self, method: Method, path: &str, body: String) -> Result<Response> {
        let builder = self
            .request(method, path)
            .header(reqwest::header::CONTENT_TYPE, "application/json")
            .body(body);
        self.send(builder, path).await
    }

    pub async fn post_json<B: Serialize + ?Sized, T: DeserializeOwned>(&self, path: &str, body: &B) -> Result<T> {
        self.send_json(Method::POST, path, body).await
    }

    pub async fn put_json<B: Serialize + ?Sized, T: DeserializeOwned>(&self, path: &str, body: &B) -> Result<T> {
        self.send_json(Method::PUT, path, body).await
    }

    pub async fn delete_json<T: DeserializeOwned>(&self, path: &str) -> Result<T> {
        let response = self.send(self.request(Method::DELETE, path), path).await?;
        self.json(response).await
    }

    /// Delete `path`, ignoring the response body.
    pub async fn delete(&self, path: &str) -> Result<()> {
        self.send(self.request(Method::DELETE, path), path).await?;
        Ok(())
    }

    /// Upload `key` followed by `crt` as the `cert` form field.
    pub async fn upload_pem<T: DeserializeOwned>(&self, path: &str, key: &[u8], crt: &[u8]) -> Result<T> {
        let mut combined = Vec::with_capacity(key.len() + crt.len());
        combined.extend_from_slice(key);
        combined.extend_from_slice(crt);

        let part = reqwest::multipart::Part::bytes(combined).file_name("cert.pem");
        let form = reqwest::multipart::Form::new().part("cert", part);

        let response = self.send(self.request(Method::POST, path).multipart(form), path).await?;
        self.json(response).await
    }
}

/// Fail unless the envelope reports success.
pub(crate) fn ensure_ok(result: ApiResult) -> Result<ApiResult> {
    if result.is_ok() {
        return Ok(result);
    }

    Err(OperatorError::http_with_body(
        format!("API request completed, but with error: {}", result.message),
        200,
        result,
    ))
}

/// Reject a successful envelope that names no created object.
pub(crate) fn ensure_created_id(id: &str, result: &ApiResult) -> Result<()> {
    if id.trim().is_empty() {
        return Err(OperatorError::http_with_body(
            "API request completed, but no object id was returned",
            200,
            result.clone(),
        ));
    }
    Ok(())
}

/// An empty id would address the whole collection.
pub(crate) fn require_api_id(api_id: &str) -> Result<()> {
    if api_id.trim().is_empty() {
        return Err(OperatorError::validation_field("api_id is required", "api_id"));
    }
    Ok(())
}

/// Join `base` and `path` with exactly one slash between them.
pub fn join_url(base: &str, path: &str) -> String {
    if path.is_empty() {
        return base.to_string();
    }
    format!("{}/{}", base.trim_end_matches('/'), path.trim_start_matches('/'))
}

/// Join path segments, trimming the slashes at each seam.
pub fn join_path(parts: &[&str]) -> String {
    let mut joined = String::new();
    for (i, part) in parts.iter().enumerate() {
        if i == 0 {
            joined.push_str(part.trim_end_matches('/'));
        } else {
            joined.push('/');
            joined.push_str(part.trim_start_matches('/'));
        }
    }
    joined
}

fn split_resource(path: &str) -> (&str, &str) {
    let trimmed = path.trim_end_matches('/');
    match trimmed.rsplit_once('/') {
        Some((resource, id)) if !resource.is_empty() => (resource, id),
        _ => (trimmed, ""),
    }
}
