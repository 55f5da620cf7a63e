//! User-info client.
//!
//! # Design
//! `AuthdogClient` holds an immutable `ClientConfig` and a transport handle.
//! A call is split into `build_get_user_info` (credential resolution, URL and
//! headers), the transport round trip, and `parse_get_user_info` (status
//! classification, then decoding). The build and parse halves never touch
//! the network, so a host that does its own I/O (the C ABI) can use them
//! directly.
//!
//! `close` drops the client's reference to the transport. A request already
//! in flight keeps its own `Arc` and finishes normally; later calls fail
//! with `AuthdogError::Api` without doing any I/O.

use std::sync::{Arc, PoisonError, RwLock};

use tracing::{debug, warn};

use crate::codec::decode_user_info;
use crate::config::{ClientConfig, USER_AGENT, USER_INFO_PATH};
use crate::error::{AuthdogError, Result};
use crate::http::{HttpMethod, HttpRequest, HttpResponse};
use crate::transport::{Transport, UreqTransport};
use crate::types::{ErrorResponse, UserInfoResponse};

/// 500 bodies whose `error` message is reported as an API error.
const KNOWN_SERVER_ERRORS: [&str; 2] = ["GraphQL query failed", "Failed to fetch user info"];

/// Client for the Authdog user-info endpoint.
///
/// Safe to share between threads; every call builds its own request.
pub struct AuthdogClient<T: Transport = UreqTransport> {
    config: ClientConfig,
    base_url: String,
    transport: RwLock<Option<Arc<T>>>,
}

impl AuthdogClient<UreqTransport> {
    /// Validate `config` and create a client backed by `ureq`.
    pub fn new(config: ClientConfig) -> Result<Self> {
        let transport = UreqTransport::new(config.timeout());
        Self::with_transport(config, transport)
    }
}

impl<T: Transport> AuthdogClient<T> {
    /// Validate `config` and create a client that sends requests through
    /// `transport`.
    pub fn with_transport(config: ClientConfig, transport: T) -> Result<Self> {
        let base_url = config.validate()?;
        debug!(
            base_url = %base_url,
            timeout_ms = config.timeout().as_millis() as u64,
            api_key = config.api_key().is_some(),
            "created authdog client"
        );
        Ok(Self {
            config,
            base_url,
            transport: RwLock::new(Some(Arc::new(transport))),
        })
    }

    /// Base URL with the trailing slash removed.
    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    pub fn config(&self) -> &ClientConfig {
        &self.config
    }

    pub fn user_info_url(&self) -> String {
        format!("{}{USER_INFO_PATH}", self.base_url)
    }

    /// Build the user-info request for `credential`.
    ///
    /// A missing or empty `credential` falls back to the configured access
    /// token. The `Authorization` header carries the API key when one is
    /// configured.
    pub fn build_get_user_info(&self, credential: Option<&str>) -> Result<HttpRequest> {
        let token = credential
            .filter(|t| !t.is_empty())
            .or_else(|| self.config.access_token())
            .ok_or_else(|| {
                AuthdogError::Authentication("credential cannot be empty".to_string())
            })?;
        let bearer = self.config.api_key().unwrap_or(token);

        Ok(HttpRequest {
            method: HttpMethod::Get,
            url: self.user_info_url(),
            headers: vec![
                ("Content-Type".to_string(), "application/json".to_string()),
                ("User-Agent".to_string(), USER_AGENT.to_string()),
                ("Authorization".to_string(), format!("Bearer {bearer}")),
            ],
        })
    }

    /// Classify `response` and decode its body on success.
    pub fn parse_get_user_info(&self, response: HttpResponse) -> Result<UserInfoResponse> {
        classify(&response)?;
        decode_user_info(&response.body).inspect_err(|e| {
            warn!(error = %e, "user-info response did not match schema");
        })
    }

    /// Fetch the user-info resource for `credential`.
    pub fn get_user_info(&self, credential: Option<&str>) -> Result<UserInfoResponse> {
        let request = self.build_get_user_info(credential)?;
        let transport = self
            .transport
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
            .ok_or_else(|| AuthdogError::api("client is closed"))?;

        debug!(url = %request.url, "requesting user info");
        let response = transport.execute(&request).map_err(|e| {
            warn!(url = %request.url, error = %e, "user-info request failed");
            AuthdogError::Network(e.to_string())
        })?;
        debug!(status = response.status, "received user-info response");

        self.parse_get_user_info(response)
    }

    /// Release the transport. Calling this more than once is a no-op.
    pub fn close(&self) {
        let released = self
            .transport
            .write()
            .unwrap_or_else(PoisonError::into_inner)
            .take();
        if released.is_some() {
            debug!(base_url = %self.base_url, "closed authdog client");
        }
    }

    pub fn is_closed(&self) -> bool {
        self.transport
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .is_none()
    }
}

/// Map a response status (and, for 500, its body) to an error, or `Ok` for 200.
pub fn classify(response: &HttpResponse) -> Result<()> {
    let status = response.status;
    let body = response.body.as_str();
    let result = match status {
        200 => return Ok(()),
        401 => Err(AuthdogError::Authentication(
            "unauthorized - invalid or expired credential".to_string(),
        )),
        500 => match serde_json::from_str::<ErrorResponse>(body) {
            Ok(known) if KNOWN_SERVER_ERRORS.contains(&known.error.as_str()) => {
                Err(AuthdogError::http(status, known.error, body))
            }
            _ => Err(AuthdogError::Server {
                status,
                body: body.to_string(),
            }),
        },
        s if s > 500 => Err(AuthdogError::Server {
            status,
            body: body.to_string(),
        }),
        _ => Err(AuthdogError::http(
            status,
            format!("HTTP error {status}: {body}"),
            body,
        )),
    };
    if let Err(e) = &result {
        warn!(status, kind = ?e.kind(), "user-info request was rejected");
    }
    result
}
