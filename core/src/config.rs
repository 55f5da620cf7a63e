//! Client configuration.
//!
//! The config is plain data: callers fill it in directly, through the
//! `with_*` builders, or by deserializing JSON (`baseUrl`, `accessToken`,
//! `apiKey`, `timeoutMs`). `validate` is the only place the base URL is
//! checked and normalized.

use std::time::Duration;

use serde::Deserialize;
use url::Url;

use crate::error::{AuthdogError, Result};

/// Request timeout applied when `timeout_ms` is unset or not positive.
pub const DEFAULT_TIMEOUT_MS: i64 = 30_000;

/// Path of the user-info endpoint, appended to the base URL.
pub const USER_INFO_PATH: &str = "/v1/userinfo";

/// Value of the `User-Agent` header sent with every request.
pub const USER_AGENT: &str = concat!("authdog-rust-sdk/", env!("CARGO_PKG_VERSION"));

#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ClientConfig {
    pub base_url: String,
    /// Fallback credential used when `get_user_info` is called without one.
    #[serde(default)]
    pub access_token: Option<String>,
    /// Takes precedence over any access token in the `Authorization` header.
    #[serde(default)]
    pub api_key: Option<String>,
    #[serde(default)]
    pub timeout_ms: i64,
}

impl ClientConfig {
    pub fn new(base_url: impl Into<String>) -> Self {
        Self {
            base_url: base_url.into(),
            ..Self::default()
        }
    }

    pub fn with_access_token(mut self, token: impl Into<String>) -> Self {
        self.access_token = Some(token.into());
        self
    }

    pub fn with_api_key(mut self, key: impl Into<String>) -> Self {
        self.api_key = Some(key.into());
        self
    }

    pub fn with_timeout_ms(mut self, timeout_ms: i64) -> Self {
        self.timeout_ms = timeout_ms;
        self
    }

    /// Effective per-request deadline.
    pub fn timeout(&self) -> Duration {
        let ms = if self.timeout_ms > 0 {
            self.timeout_ms
        } else {
            DEFAULT_TIMEOUT_MS
        };
        Duration::from_millis(ms as u64)
    }

    /// The configured API key, ignoring empty strings.
    pub fn api_key(&self) -> Option<&str> {
        self.api_key.as_deref().filter(|key| !key.is_empty())
    }

    /// The configured access token, ignoring empty strings.
    pub fn access_token(&self) -> Option<&str> {
        self.access_token.as_deref().filter(|token| !token.is_empty())
    }

    /// Check `base_url` and return it with one trailing `/` removed.
    ///
    /// The endpoint path is appended to the result, so a query or fragment
    /// is rejected.
    pub fn validate(&self) -> Result<String> {
        if self.base_url.trim().is_empty() {
            return Err(AuthdogError::InvalidConfiguration(
                "base URL cannot be empty".to_string(),
            ));
        }

        let parsed = Url::parse(&self.base_url).map_err(|e| {
            AuthdogError::InvalidConfiguration(format!("invalid base URL {:?}: {e}", self.base_url))
        })?;
        if !matches!(parsed.scheme(), "http" | "https") {
            return Err(AuthdogError::InvalidConfiguration(format!(
                "unsupported URL scheme {:?}",
                parsed.scheme()
            )));
        }
        if parsed.host_str().map_or(true, str::is_empty) {
            return Err(AuthdogError::InvalidConfiguration(format!(
                "base URL {:?} has no host",
                self.base_url
            )));
        }
        if parsed.query().is_some() || parsed.fragment().is_some() {
            return Err(AuthdogError::InvalidConfiguration(format!(
                "base URL {:?} must not carry a query or fragment",
                self.base_url
            )));
        }

        let base = self.base_url.strip_suffix('/').unwrap_or(&self.base_url);
        Ok(base.to_string())
    }
}
