//! Rust client for the Authdog user-info API.
//!
//! # Overview
//! One operation: given a base URL and a bearer credential, `GET
//! {base_url}/v1/userinfo` and decode the body into `UserInfoResponse`.
//! Non-200 outcomes are classified into `AuthdogError` variants.
//!
//! # Design
//! - `AuthdogClient` owns an immutable `ClientConfig` and a `Transport`
//!   (blocking `ureq` by default); it keeps no other state between calls.
//! - Each call is split into `build_get_user_info` (produces an
//!   `HttpRequest`) and `parse_get_user_info` (consumes an `HttpResponse`),
//!   so hosts that perform their own I/O can drive the client without a
//!   transport.
//! - Decoding is serde deserialization that reports the dotted path of the
//!   first field that is missing or mistyped.

pub mod client;
pub mod codec;
pub mod config;
pub mod error;
pub mod http;
pub mod transport;
pub mod types;

pub use client::{classify, AuthdogClient};
pub use codec::{decode_user_info, encode_user_info};
pub use config::{ClientConfig, DEFAULT_TIMEOUT_MS, USER_AGENT, USER_INFO_PATH};
pub use error::{AuthdogError, ErrorKind, Result};
pub use http::{HttpMethod, HttpRequest, HttpResponse};
pub use transport::{Transport, TransportError, UreqTransport, MAX_BODY_BYTES};
pub use types::{
    Email, ErrorResponse, Meta, Names, Photo, Session, User, UserInfoResponse, Verification,
};
