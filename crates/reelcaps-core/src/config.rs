//! Configuration module
//!
//! Client-side settings for talking to the remote rendering service: base URL,
//! authorization mode, the shared request timeout and the local upload limit.

use std::env;
use std::time::Duration;

use crate::error::SessionError;

const DEFAULT_API_URL: &str = "http://127.0.0.1:5000";
/// Remote renders can take hours; every call shares this ceiling.
const REQUEST_TIMEOUT_MS: u64 = 14_400_000;
const MAX_UPLOAD_MB: u64 = 10;

/// Authorization applied to every remote call.
#[derive(Clone, PartialEq, Eq)]
pub enum AuthMode {
    /// `Authorization: Bearer {token}`
    Bearer(String),
    /// No credential is sent.
    None,
}

impl std::fmt::Debug for AuthMode {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            AuthMode::Bearer(_) => write!(f, "Bearer(***)"),
            AuthMode::None => write!(f, "None"),
        }
    }
}

#[derive(Clone, Debug)]
pub struct ClientConfig {
    pub api_url: String,
    pub auth: AuthMode,
    pub request_timeout_ms: u64,
    pub max_upload_bytes: u64,
}

impl ClientConfig {
    /// Build a config with default timeout and upload limit.
    pub fn new(api_url: impl Into<String>, auth: AuthMode) -> Self {
        Self {
            api_url: api_url.into().trim_end_matches('/').to_string(),
            auth,
            request_timeout_ms: REQUEST_TIMEOUT_MS,
            max_upload_bytes: MAX_UPLOAD_MB * 1024 * 1024,
        }
    }

    /// Load from the process environment (after reading `.env` if present).
    pub fn from_env() -> Result<Self, SessionError> {
        dotenvy::dotenv().ok();
        Self::from_vars(|key| env::var(key).ok())
    }

    /// Load from an arbitrary variable lookup.
    pub fn from_vars<F>(lookup: F) -> Result<Self, SessionError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let api_url = lookup("REELCAPS_API_URL").unwrap_or_else(|| DEFAULT_API_URL.to_string());

        let auth_mode = lookup("REELCAPS_AUTH_MODE")
            .unwrap_or_else(|| "bearer".to_string())
            .to_lowercase();
        let auth = match auth_mode.trim() {
            "bearer" => AuthMode::Bearer(lookup("REELCAPS_API_TOKEN").ok_or_else(|| {
                SessionError::Config(
                    "REELCAPS_API_TOKEN must be set when REELCAPS_AUTH_MODE=bearer".to_string(),
                )
            })?),
            "none" => AuthMode::None,
            other => {
                return Err(SessionError::Config(format!(
                    "REELCAPS_AUTH_MODE must be 'bearer' or 'none', got '{}'",
                    other
                )))
            }
        };

        let request_timeout_ms = match lookup("REELCAPS_REQUEST_TIMEOUT_MS") {
            Some(raw) => raw.trim().parse().map_err(|_| {
                SessionError::Config("REELCAPS_REQUEST_TIMEOUT_MS must be a valid number".into())
            })?,
            None => REQUEST_TIMEOUT_MS,
        };

        let max_upload_mb: u64 = match lookup("REELCAPS_MAX_UPLOAD_MB") {
            Some(raw) => raw.trim().parse().map_err(|_| {
                SessionError::Config("REELCAPS_MAX_UPLOAD_MB must be a valid number".into())
            })?,
            None => MAX_UPLOAD_MB,
        };

        let max_upload_bytes = max_upload_mb.checked_mul(1024 * 1024).ok_or_else(|| {
            SessionError::Config("REELCAPS_MAX_UPLOAD_MB is too large".to_string())
        })?;

        let config = ClientConfig {
            api_url: api_url.trim_end_matches('/').to_string(),
            auth,
            request_timeout_ms,
            max_upload_bytes,
        };
        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> Result<(), SessionError> {
        if self.api_url.is_empty() {
            return Err(SessionError::Config(
                "REELCAPS_API_URL must not be empty".to_string(),
            ));
        }

        if !self.api_url.starts_with("http://") && !self.api_url.starts_with("https://") {
            return Err(SessionError::Config(
                "REELCAPS_API_URL must start with http:// or https://".to_string(),
            ));
        }

        if self.request_timeout_ms == 0 {
            return Err(SessionError::Config(
                "REELCAPS_REQUEST_TIMEOUT_MS must be greater than zero".to_string(),
            ));
        }

        if self.max_upload_bytes == 0 {
            return Err(SessionError::Config(
                "REELCAPS_MAX_UPLOAD_MB must be greater than zero".to_string(),
            ));
        }

        if let AuthMode::Bearer(token) = &self.auth {
            if token.trim().is_empty() {
                return Err(SessionError::Config(
                    "REELCAPS_API_TOKEN must not be empty".to_string(),
                ));
            }
        }

        Ok(())
    }

    pub fn request_timeout(&self) -> Duration {
        Duration::from_millis(self.request_timeout_ms)
    }
}
