//! Error taxonomy for the Authdog client.
//!
//! # Design
//! One enum covers every failure a caller can observe. HTTP 401 maps to
//! `Authentication`, unmatched 5xx responses to `Server`, and everything else
//! that is not a 200 lands in `Api` with the raw status code and body for
//! debugging. `Decode` names the offending field as a dotted path
//! (`user.emails[0].value`) when one is known.

use thiserror::Error;

/// Errors returned by `AuthdogClient`.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum AuthdogError {
    /// The client configuration was rejected at construction time.
    #[error("invalid configuration: {0}")]
    InvalidConfiguration(String),

    /// The credential was empty, or the server answered 401.
    #[error("authentication failed: {0}")]
    Authentication(String),

    /// No HTTP response was received (DNS, connect, timeout, broken body).
    #[error("network error: {0}")]
    Network(String),

    /// The server answered with a 5xx status whose body was not recognized.
    #[error("server error (HTTP {status}): {body}")]
    Server { status: u16, body: String },

    /// Any other non-success outcome, including use after `close`.
    #[error("{message}")]
    Api {
        message: String,
        status: Option<u16>,
        body: Option<String>,
    },

    /// A 200 response whose body did not match the user-info schema.
    #[error("failed to parse response: {message}")]
    Decode {
        field: Option<String>,
        message: String,
    },
}

/// C-like discriminant for `AuthdogError`, stable across the FFI boundary.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ErrorKind {
    InvalidConfiguration,
    Authentication,
    Network,
    Server,
    Api,
    Decode,
}

pub type Result<T> = std::result::Result<T, AuthdogError>;

impl AuthdogError {
    pub(crate) fn api(message: impl Into<String>) -> Self {
        AuthdogError::Api {
            message: message.into(),
            status: None,
            body: None,
        }
    }

    pub(crate) fn http(status: u16, message: impl Into<String>, body: &str) -> Self {
        AuthdogError::Api {
            message: message.into(),
            status: Some(status),
            body: Some(body.to_string()),
        }
    }

    pub(crate) fn decode(field: Option<&str>, message: impl Into<String>) -> Self {
        AuthdogError::Decode {
            field: field.map(str::to_string),
            message: message.into(),
        }
    }

    pub fn kind(&self) -> ErrorKind {
        match self {
            AuthdogError::InvalidConfiguration(_) => ErrorKind::InvalidConfiguration,
            AuthdogError::Authentication(_) => ErrorKind::Authentication,
            AuthdogError::Network(_) => ErrorKind::Network,
            AuthdogError::Server { .. } => ErrorKind::Server,
            AuthdogError::Api { .. } => ErrorKind::Api,
            AuthdogError::Decode { .. } => ErrorKind::Decode,
        }
    }

    /// HTTP status that produced this error, if a response was received.
    pub fn status(&self) -> Option<u16> {
        match self {
            AuthdogError::Server { status, .. } => Some(*status),
            AuthdogError::Api { status, .. } => *status,
            _ => None,
        }
    }

    /// Raw response body that produced this error, if any.
    pub fn body(&self) -> Option<&str> {
        match self {
            AuthdogError::Server { body, .. } => Some(body),
            AuthdogError::Api { body, .. } => body.as_deref(),
            _ => None,
        }
    }

    /// Dotted path of the field that failed to decode.
    pub fn field(&self) -> Option<&str> {
        match self {
            AuthdogError::Decode { field, .. } => field.as_deref(),
            _ => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn server_error_carries_status_and_body() {
        let err = AuthdogError::Server {
            status: 503,
            body: "maintenance".to_string(),
        };
        assert_eq!(err.kind(), ErrorKind::Server);
        assert_eq!(err.status(), Some(503));
        assert_eq!(err.body(), Some("maintenance"));
        assert_eq!(err.to_string(), "server error (HTTP 503): maintenance");
    }

    #[test]
    fn api_error_without_response_has_no_status() {
        let err = AuthdogError::api("client is closed");
        assert_eq!(err.kind(), ErrorKind::Api);
        assert_eq!(err.status(), None);
        assert_eq!(err.body(), None);
        assert_eq!(err.to_string(), "client is closed");
    }

    #[test]
    fn http_api_error_keeps_response() {
        let err = AuthdogError::http(404, "HTTP error 404: Not Found", "Not Found");
        assert_eq!(err.status(), Some(404));
        assert_eq!(err.body(), Some("Not Found"));
    }

    #[test]
    fn decode_error_names_field() {
        let err = AuthdogError::decode(Some("user.id"), "missing field `user.id`");
        assert_eq!(err.kind(), ErrorKind::Decode);
        assert_eq!(err.field(), Some("user.id"));
        assert!(err.to_string().starts_with("failed to parse response: "));
    }

    #[test]
    fn authentication_message_is_prefixed() {
        let err = AuthdogError::Authentication("credential cannot be empty".to_string());
        assert_eq!(
            err.to_string(),
            "authentication failed: credential cannot be empty"
        );
    }

    #[test]
    fn errors_are_std_errors() {
        let err = AuthdogError::Network("connection refused".to_string());
        let _: &dyn std::error::Error = &err;
    }
}
