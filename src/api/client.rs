//! Shared HTTP plumbing for the backend API
//!
//! Every endpoint is a form-encoded POST under the configured base URL and
//! answers with a `{code, success, message, data}` envelope. Auth failures
//! surface as `ApiError::AuthExpired`; the caller decides what to do with
//! the session.

use reqwest::StatusCode;
use serde::de::DeserializeOwned;
use serde::Deserialize;
use std::time::Duration;
use thiserror::Error;

use crate::config::Config;

/// Backend API error types
#[derive(Error, Debug)]
pub enum ApiError {
    #[error("Session expired, login required")]
    AuthExpired,

    #[error("Backend error {code}: {message}")]
    Backend { code: i64, message: String },

    #[error("Server error: {0}")]
    ServerError(u16),

    #[error("Invalid response: {0}")]
    InvalidResponse(String),

    #[error("Request failed: {0}")]
    RequestFailed(#[from] reqwest::Error),
}

impl ApiError {
    /// Whether this error means the session token is no longer valid
    pub fn is_auth_error(&self) -> bool {
        matches!(self, ApiError::AuthExpired)
    }
}

/// Standard response wrapper used by every backend endpoint
#[derive(Debug, Deserialize)]
pub struct Envelope<T> {
    #[serde(default)]
    pub code: i64,
    #[serde(default)]
    pub success: bool,
    #[serde(default)]
    pub message: String,
    pub data: Option<T>,
}

/// Backend API client.
///
/// Built explicitly from config so there is no ambient session state; the
/// token travels with the client instance.
pub struct ApiClient {
    base_url: String,
    token: Option<String>,
    client: reqwest::Client,
}

impl ApiClient {
    /// Create a client from the loaded configuration
    pub fn new(config: &Config) -> Self {
        Self::with_base_url(config.server_url.clone(), config.auth_token.clone())
    }

    /// Create a client with an explicit base URL (also used by tests)
    pub fn with_base_url(base_url: impl Into<String>, token: Option<String>) -> Self {
        Self {
            base_url: base_url.into(),
            token,
            client: reqwest::Client::builder()
                .timeout(Duration::from_secs(30))
                .build()
                .unwrap_or_default(),
        }
    }

    /// Replace the session token (e.g. after login)
    pub fn set_token(&mut self, token: Option<String>) {
        self.token = token;
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    /// POST a form-encoded request and decode the response envelope.
    ///
    /// HTTP 403 and `success=false` envelopes with code 403 both map to
    /// `AuthExpired`; other failed envelopes carry the backend's code and
    /// message.
    async fn envelope<T: DeserializeOwned>(
        &self,
        endpoint: &str,
        params: &[(&str, String)],
    ) -> Result<Envelope<T>, ApiError> {
        let url = format!("{}{}", self.base_url, endpoint);

        let mut request = self
            .client
            .post(&url)
            .header("Accept", "application/json")
            .form(params);
        if let Some(token) = &self.token {
            request = request.header("Authorization", token);
        }

        let response = request.send().await?;
        let status = response.status();

        if status == StatusCode::FORBIDDEN {
            return Err(ApiError::AuthExpired);
        }
        if status.is_server_error() {
            return Err(ApiError::ServerError(status.as_u16()));
        }
        if !status.is_success() {
            return Err(ApiError::ServerError(status.as_u16()));
        }

        let body = response.text().await?;
        let envelope: Envelope<T> = serde_json::from_str(&body)
            .map_err(|e| ApiError::InvalidResponse(format!("JSON parse error: {}", e)))?;

        if !envelope.success {
            if envelope.code == 403 {
                return Err(ApiError::AuthExpired);
            }
            return Err(ApiError::Backend {
                code: envelope.code,
                message: envelope.message,
            });
        }

        Ok(envelope)
    }

    /// POST and return the envelope's data, which must be present
    pub(crate) async fn post_form<T: DeserializeOwned>(
        &self,
        endpoint: &str,
        params: &[(&str, String)],
    ) -> Result<T, ApiError> {
        let envelope = self.envelope::<T>(endpoint, params).await?;
        envelope
            .data
            .ok_or_else(|| ApiError::InvalidResponse("missing data field".to_string()))
    }

    /// POST for effect only; any data payload is ignored
    pub(crate) async fn post_empty(
        &self,
        endpoint: &str,
        params: &[(&str, String)],
    ) -> Result<(), ApiError> {
        self.envelope::<serde_json::Value>(endpoint, params).await?;
        Ok(())
    }
}
