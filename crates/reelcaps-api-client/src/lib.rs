//! HTTP client for the remote subtitle rendering service.
//!
//! Provides a minimal client with a single configurable auth mode (Bearer token
//! or none), a shared request timeout, JSON/multipart POST helpers, and the
//! [`RequestDispatcher`] implementation used by the session orchestrator.

pub mod api;
pub mod dispatch;

use reelcaps_core::{AuthMode, ClientConfig, SessionError, SessionResult};
use reqwest::Client;
use serde::de::DeserializeOwned;

pub use api::{ProcessResponse, ProcessVideoRequest, SessionRequest, UploadResponse};
pub use dispatch::RequestDispatcher;

/// HTTP client for the rendering service.
#[derive(Clone, Debug)]
pub struct ApiClient {
    client: Client,
    base_url: String,
    auth: AuthMode,
    timeout_ms: u64,
}

impl ApiClient {
    pub fn new(config: &ClientConfig) -> SessionResult<Self> {
        config.validate()?;

        let client = Client::builder()
            .timeout(config.request_timeout())
            .build()
            .map_err(|e| SessionError::network("Failed to create HTTP client", e))?;

        Ok(Self {
            client,
            base_url: config.api_url.trim_end_matches('/').to_string(),
            auth: config.auth.clone(),
            timeout_ms: config.request_timeout_ms,
        })
    }

    pub fn build_url(&self, path: &str) -> String {
        format!("{}{}", self.base_url, path)
    }

    fn apply_auth(&self, request: reqwest::RequestBuilder) -> reqwest::RequestBuilder {
        match &self.auth {
            AuthMode::Bearer(token) => request.header("Authorization", format!("Bearer {}", token)),
            AuthMode::None => request,
        }
    }

    fn transport_error(&self, err: reqwest::Error) -> SessionError {
        if err.is_timeout() {
            SessionError::Timeout {
                timeout_ms: self.timeout_ms,
            }
        } else {
            SessionError::network("Failed to send request", err)
        }
    }

    async fn send(&self, request: reqwest::RequestBuilder) -> SessionResult<reqwest::Response> {
        let request = self.apply_auth(request);
        let response = request.send().await.map_err(|e| self.transport_error(e))?;

        let status = response.status();
        if !status.is_success() {
            let body = response
                .text()
                .await
                .unwrap_or_else(|_| "Unknown error".to_string());
            return Err(SessionError::Remote {
                status: status.as_u16(),
                body,
            });
        }

        Ok(response)
    }

    async fn parse_json<T: DeserializeOwned>(&self, response: reqwest::Response) -> SessionResult<T> {
        response.json().await.map_err(|e| {
            if e.is_timeout() {
                SessionError::Timeout {
                    timeout_ms: self.timeout_ms,
                }
            } else {
                SessionError::network("Failed to parse response as JSON", e)
            }
        })
    }

    /// POST JSON body and deserialize response.
    pub async fn post_json<T: DeserializeOwned, B: serde::Serialize + ?Sized>(
        &self,
        path: &str,
        body: &B,
    ) -> SessionResult<T> {
        let url = self.build_url(path);
        let response = self.send(self.client.post(&url).json(body)).await?;
        self.parse_json(response).await
    }

    /// POST JSON body, ignoring any response body.
    pub async fn post_json_no_content<B: serde::Serialize + ?Sized>(
        &self,
        path: &str,
        body: &B,
    ) -> SessionResult<()> {
        let url = self.build_url(path);
        self.send(self.client.post(&url).json(body)).await?;
        Ok(())
    }

    /// POST multipart form and deserialize response.
    pub async fn post_multipart<T: DeserializeOwned>(
        &self,
        path: &str,
        form: reqwest::multipart::Form,
    ) -> SessionResult<T> {
        let url = self.build_url(path);
        let response = self.send(self.client.post(&url).multipart(form)).await?;
        self.parse_json(response).await
    }
}
