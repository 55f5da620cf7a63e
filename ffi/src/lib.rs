//! C-ABI wrapper around `authdog-core`.
//!
//! # Overview
//! Exposes the user-info client through `extern "C"` functions. A host can
//! either let the library perform the HTTP call (`authdog_get_user_info`) or
//! do its own I/O by pairing `authdog_build_get_user_info` with
//! `authdog_parse_get_user_info`.
//!
//! # Design
//! - Every `extern "C"` function wraps its body in `catch_unwind` so panics
//!   never cross the FFI boundary.
//! - A single `FfiUserInfoResult` envelope conveys success payloads and
//!   errors uniformly.
//! - The C caller owns all returned pointers and must call the matching
//!   `authdog_free_*` function to release them.
//! - `authdog_client_close` releases the transport but keeps the handle
//!   valid; `authdog_client_free` releases the handle itself.

pub mod types;

use std::os::raw::c_char;
use std::panic::{catch_unwind, AssertUnwindSafe};

use authdog_core::{AuthdogClient, AuthdogError, ClientConfig, HttpResponse};

use types::*;

// ---------------------------------------------------------------------------
// Client lifecycle
// ---------------------------------------------------------------------------

/// Create a new client from `config`.
///
/// Returns null if `config` or its `base_url` is null, if any string is not
/// valid UTF-8, if the base URL is not a valid http(s) URL, or if an
/// internal panic occurs.
/// The caller must free the returned pointer with `authdog_client_free`.
#[unsafe(no_mangle)]
pub extern "C" fn authdog_client_new(config: *const FfiClientConfig) -> *mut FfiAuthdogClient {
    catch_unwind(AssertUnwindSafe(|| {
        if config.is_null() {
            return std::ptr::null_mut();
        }
        let config = unsafe { &*config };
        let (Ok(Some(base_url)), Ok(access_token), Ok(api_key)) = (
            read_c_str(config.base_url),
            read_c_str(config.access_token),
            read_c_str(config.api_key),
        ) else {
            return std::ptr::null_mut();
        };

        let core_config = ClientConfig {
            base_url: base_url.to_string(),
            access_token: access_token.map(str::to_string),
            api_key: api_key.map(str::to_string),
            timeout_ms: i64::from(config.timeout_ms),
        };
        match AuthdogClient::new(core_config) {
            Ok(inner) => Box::into_raw(Box::new(FfiAuthdogClient { inner })),
            Err(_) => std::ptr::null_mut(),
        }
    }))
    .unwrap_or(std::ptr::null_mut())
}

/// Release the client's transport. Later `authdog_get_user_info` calls fail
/// with `Api`. Idempotent; safe to call with null.
#[unsafe(no_mangle)]
pub extern "C" fn authdog_client_close(client: *const FfiAuthdogClient) {
    if !client.is_null() {
        let _ = catch_unwind(AssertUnwindSafe(|| {
            unsafe { &*client }.inner.close();
        }));
    }
}

/// Free a client created by `authdog_client_new`. Safe to call with null.
#[unsafe(no_mangle)]
pub extern "C" fn authdog_client_free(client: *mut FfiAuthdogClient) {
    if !client.is_null() {
        let _ = catch_unwind(AssertUnwindSafe(|| {
            drop(unsafe { Box::from_raw(client) });
        }));
    }
}

// ---------------------------------------------------------------------------
// Blocking call
// ---------------------------------------------------------------------------

/// Fetch user info over the network.
///
/// `access_token` may be null or empty to use the token from the client
/// configuration. A token that is not valid UTF-8 fails with
/// `Authentication`. Blocks for at most the configured timeout.
#[unsafe(no_mangle)]
pub extern "C" fn authdog_get_user_info(
    client: *const FfiAuthdogClient,
    access_token: *const c_char,
) -> *mut FfiUserInfoResult {
    catch_unwind(AssertUnwindSafe(|| {
        if client.is_null() {
            return FfiUserInfoResult::null_arg("client");
        }
        let client = unsafe { &*client };
        let Ok(token) = read_c_str(access_token) else {
            return FfiUserInfoResult::from_error(AuthdogError::Authentication(
                "credential is not valid UTF-8".to_string(),
            ));
        };
        FfiUserInfoResult::from_core(client.inner.get_user_info(token))
    }))
    .unwrap_or_else(|_| FfiUserInfoResult::panic("panic in authdog_get_user_info"))
}

// ---------------------------------------------------------------------------
// Host-does-IO
// ---------------------------------------------------------------------------

/// Build the user-info HTTP request.
///
/// Returns null if `client` is null, if `access_token` is not valid UTF-8,
/// or if no credential is available.
/// The caller must free the returned pointer with `authdog_free_request`.
#[unsafe(no_mangle)]
pub extern "C" fn authdog_build_get_user_info(
    client: *const FfiAuthdogClient,
    access_token: *const c_char,
) -> *mut FfiHttpRequest {
    catch_unwind(AssertUnwindSafe(|| {
        if client.is_null() {
            return std::ptr::null_mut();
        }
        let client = unsafe { &*client };
        let Ok(token) = read_c_str(access_token) else {
            return std::ptr::null_mut();
        };
        let timeout_ms = client.inner.config().timeout().as_millis() as u64;
        match client.inner.build_get_user_info(token) {
            Ok(req) => FfiHttpRequest::from_core(req, timeout_ms),
            Err(_) => std::ptr::null_mut(),
        }
    }))
    .unwrap_or(std::ptr::null_mut())
}

/// Parse the HTTP response to a request built by
/// `authdog_build_get_user_info`.
#[unsafe(no_mangle)]
pub extern "C" fn authdog_parse_get_user_info(
    client: *const FfiAuthdogClient,
    response: *const FfiHttpResponse,
) -> *mut FfiUserInfoResult {
    catch_unwind(AssertUnwindSafe(|| {
        if client.is_null() {
            return FfiUserInfoResult::null_arg("client");
        }
        if response.is_null() {
            return FfiUserInfoResult::null_arg("response");
        }
        let client = unsafe { &*client };
        let resp = unsafe { &*response };
        let Ok(body) = read_c_str(resp.body) else {
            return FfiUserInfoResult::from_error(AuthdogError::Decode {
                field: None,
                message: "response body is not valid UTF-8".to_string(),
            });
        };
        let core_resp = HttpResponse::new(resp.status, body.unwrap_or(""));
        FfiUserInfoResult::from_core(client.inner.parse_get_user_info(core_resp))
    }))
    .unwrap_or_else(|_| FfiUserInfoResult::panic("panic in authdog_parse_get_user_info"))
}

// ---------------------------------------------------------------------------
// Error descriptions
// ---------------------------------------------------------------------------

/// Static description of an `FfiErrorCode`. The returned string must not be
/// freed.
#[unsafe(no_mangle)]
pub extern "C" fn authdog_error_message(code: i32) -> *const c_char {
    let msg = match code {
        0 => c"success",
        1 => c"invalid configuration",
        2 => c"authentication failed",
        3 => c"network error",
        4 => c"server error",
        5 => c"API error",
        6 => c"failed to parse response",
        7 => c"internal panic",
        8 => c"null argument",
        _ => c"unknown error",
    };
    msg.as_ptr()
}

// ---------------------------------------------------------------------------
// Free functions
// ---------------------------------------------------------------------------

/// Free an `FfiHttpRequest` returned by `authdog_build_get_user_info`.
/// Safe to call with null.
#[unsafe(no_mangle)]
pub extern "C" fn authdog_free_request(req: *mut FfiHttpRequest) {
    if req.is_null() {
        return;
    }
    let _ = catch_unwind(AssertUnwindSafe(|| {
        let req = unsafe { Box::from_raw(req) };
        free_c_string(req.url);
        if !req.headers.is_null() && req.headers_len > 0 {
            let headers = unsafe {
                Box::from_raw(std::ptr::slice_from_raw_parts_mut(
                    req.headers,
                    req.headers_len as usize,
                ))
            };
            for h in headers.iter() {
                free_c_string(h.key);
                free_c_string(h.value);
            }
        }
    }));
}

/// Free an `FfiUserInfoResult` returned by any user-info function.
/// Safe to call with null.
#[unsafe(no_mangle)]
pub extern "C" fn authdog_free_result(result: *mut FfiUserInfoResult) {
    if result.is_null() {
        return;
    }
    let _ = catch_unwind(AssertUnwindSafe(|| {
        let result = unsafe { Box::from_raw(result) };
        free_c_string(result.error_message);
        free_c_string(result.error_field);
        if !result.data.is_null() {
            let info = unsafe { Box::from_raw(result.data) };
            info.free_fields();
        }
    }));
}

// ---------------------------------------------------------------------------
// Unit tests
// ---------------------------------------------------------------------------
