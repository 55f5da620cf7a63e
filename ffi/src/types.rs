//! `#[repr(C)]` types for the FFI boundary.
//!
//! # Design
//! Each type mirrors a core type but uses C-compatible representations:
//! `*mut c_char` instead of `String`, raw pointers instead of `Vec`, and
//! enums with explicit discriminants. Optional fields are null pointers when
//! absent, never empty strings. Conversion functions live here to keep
//! `lib.rs` focused on the `extern "C"` surface.

use std::ffi::{CStr, CString};
use std::str::Utf8Error;
use std::os::raw::c_char;

use authdog_core::{AuthdogClient, AuthdogError, ErrorKind, HttpMethod, UserInfoResponse};

/// Opaque handle to an `AuthdogClient`. C callers receive a pointer to this
/// and pass it back into every FFI function.
pub struct FfiAuthdogClient {
    pub(crate) inner: AuthdogClient,
}

/// Client configuration as passed in from C. Null strings mean "not set";
/// `timeout_ms <= 0` selects the default timeout.
#[repr(C)]
pub struct FfiClientConfig {
    pub base_url: *const c_char,
    pub access_token: *const c_char,
    pub api_key: *const c_char,
    pub timeout_ms: i32,
}

// ---------------------------------------------------------------------------
// Request types
// ---------------------------------------------------------------------------

/// HTTP method as a C enum.
#[repr(C)]
pub enum FfiHttpMethod {
    Get = 0,
}

impl From<HttpMethod> for FfiHttpMethod {
    fn from(m: HttpMethod) -> Self {
        match m {
            HttpMethod::Get => FfiHttpMethod::Get,
        }
    }
}

/// A single HTTP header as a key-value pair of C strings.
#[repr(C)]
pub struct FfiHeader {
    pub key: *mut c_char,
    pub value: *mut c_char,
}

/// An HTTP request described as C-compatible plain data.
///
/// Built by `authdog_build_get_user_info`. The C caller executes the request
/// and passes the response back through `authdog_parse_get_user_info`.
#[repr(C)]
pub struct FfiHttpRequest {
    pub method: FfiHttpMethod,
    pub url: *mut c_char,
    pub headers: *mut FfiHeader,
    pub headers_len: u32,
    pub timeout_ms: u64,
}

impl FfiHttpRequest {
    /// Convert a core `HttpRequest` into a heap-allocated `FfiHttpRequest`.
    pub(crate) fn from_core(req: authdog_core::HttpRequest, timeout_ms: u64) -> *mut Self {
        let headers_len = req.headers.len() as u32;
        let headers = if req.headers.is_empty() {
            std::ptr::null_mut()
        } else {
            let ffi_headers: Box<[FfiHeader]> = req
                .headers
                .into_iter()
                .map(|(k, v)| FfiHeader {
                    key: c_string(k),
                    value: c_string(v),
                })
                .collect();
            Box::into_raw(ffi_headers) as *mut FfiHeader
        };

        Box::into_raw(Box::new(FfiHttpRequest {
            method: req.method.into(),
            url: c_string(req.url),
            headers,
            headers_len,
            timeout_ms,
        }))
    }
}

// ---------------------------------------------------------------------------
// Response input (caller-provided, not heap-allocated by us)
// ---------------------------------------------------------------------------

/// An HTTP response described as C-compatible plain data.
///
/// The C caller constructs this on the stack after executing an HTTP request,
/// then passes a pointer to `authdog_parse_get_user_info`. The FFI layer reads
/// but does not free these fields.
#[repr(C)]
pub struct FfiHttpResponse {
    pub status: u16,
    pub body: *const c_char,
}

// ---------------------------------------------------------------------------
// Result types
// ---------------------------------------------------------------------------

/// Error codes returned in `FfiUserInfoResult`.
#[repr(C)]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FfiErrorCode {
    Ok = 0,
    InvalidConfiguration = 1,
    Authentication = 2,
    Network = 3,
    Server = 4,
    Api = 5,
    Decode = 6,
    Panic = 7,
    NullArg = 8,
}

impl From<ErrorKind> for FfiErrorCode {
    fn from(kind: ErrorKind) -> Self {
        match kind {
            ErrorKind::InvalidConfiguration => FfiErrorCode::InvalidConfiguration,
            ErrorKind::Authentication => FfiErrorCode::Authentication,
            ErrorKind::Network => FfiErrorCode::Network,
            ErrorKind::Server => FfiErrorCode::Server,
            ErrorKind::Api => FfiErrorCode::Api,
            ErrorKind::Decode => FfiErrorCode::Decode,
        }
    }
}

/// The most commonly needed user-info fields, flattened for C.
///
/// Nullable fields are null when absent. `json` holds the complete response
/// re-encoded as JSON for everything not flattened here and is never null.
#[repr(C)]
pub struct FfiUserInfo {
    pub id: *mut c_char,
    pub external_id: *mut c_char,
    pub user_name: *mut c_char,
    pub display_name: *mut c_char,
    /// Nullable.
    pub nick_name: *mut c_char,
    /// First email in wire order. Nullable.
    pub email: *mut c_char,
    /// First photo URL in wire order. Nullable.
    pub photo_url: *mut c_char,
    pub locale: *mut c_char,
    pub active: bool,
    pub remaining_seconds: i64,
    pub provider: *mut c_char,
    pub environment_id: *mut c_char,
    pub json: *mut c_char,
}

impl FfiUserInfo {
    fn from_core(info: &UserInfoResponse, json: String) -> Self {
        let user = &info.user;
        FfiUserInfo {
            id: c_string(user.id.as_str()),
            external_id: c_string(user.external_id.as_str()),
            user_name: c_string(user.user_name.as_str()),
            display_name: c_string(user.display_name.as_str()),
            nick_name: opt_c_string(user.nick_name.as_deref()),
            email: opt_c_string(user.primary_email().map(|e| e.value.as_str())),
            photo_url: opt_c_string(user.primary_photo().map(|p| p.value.as_str())),
            locale: c_string(user.locale.as_str()),
            active: user.active,
            remaining_seconds: info.session.remaining_seconds,
            provider: c_string(user.provider.as_str()),
            environment_id: c_string(user.environment_id.as_str()),
            json: c_string(json),
        }
    }

    /// Free the C-string fields (but not the struct itself).
    pub(crate) fn free_fields(&self) {
        for ptr in [
            self.id,
            self.external_id,
            self.user_name,
            self.display_name,
            self.nick_name,
            self.email,
            self.photo_url,
            self.locale,
            self.provider,
            self.environment_id,
            self.json,
        ] {
            free_c_string(ptr);
        }
    }
}

/// Result envelope for user-info operations.
///
/// On success `error_code` is `Ok`, `error_message` and `error_field` are
/// null, and `data` points to the parsed user info.
/// On failure `error_code` describes the category, `error_message` is a
/// human-readable C string, `http_status` is the response status (0 when no
/// response was received), `error_field` names the field that failed to
/// decode (or is null), and `data` is null.
#[repr(C)]
pub struct FfiUserInfoResult {
    pub error_code: FfiErrorCode,
    pub error_message: *mut c_char,
    pub error_field: *mut c_char,
    pub http_status: u16,
    pub data: *mut FfiUserInfo,
}

impl FfiUserInfoResult {
    pub(crate) fn from_core(result: authdog_core::Result<UserInfoResponse>) -> *mut Self {
        match result {
            Ok(info) => match authdog_core::encode_user_info(&info) {
                Ok(json) => Self::ok(&info, json),
                Err(e) => Self::from_error(e),
            },
            Err(e) => Self::from_error(e),
        }
    }

    /// Build a success result carrying an `FfiUserInfo`.
    fn ok(info: &UserInfoResponse, json: String) -> *mut Self {
        let data = Box::into_raw(Box::new(FfiUserInfo::from_core(info, json)));
        Box::into_raw(Box::new(FfiUserInfoResult {
            error_code: FfiErrorCode::Ok,
            error_message: std::ptr::null_mut(),
            error_field: std::ptr::null_mut(),
            http_status: 0,
            data,
        }))
    }

    /// Build an error result from an `AuthdogError`.
    pub(crate) fn from_error(err: AuthdogError) -> *mut Self {
        Box::into_raw(Box::new(FfiUserInfoResult {
            error_code: err.kind().into(),
            error_message: c_string(err.to_string()),
            error_field: opt_c_string(err.field()),
            http_status: err.status().unwrap_or(0),
            data: std::ptr::null_mut(),
        }))
    }

    /// Build an error result for a null argument.
    pub(crate) fn null_arg(name: &str) -> *mut Self {
        Self::failure(FfiErrorCode::NullArg, &format!("null argument: {name}"))
    }

    /// Build an error result for a caught panic.
    pub(crate) fn panic(msg: &str) -> *mut Self {
        Self::failure(FfiErrorCode::Panic, msg)
    }

    fn failure(error_code: FfiErrorCode, msg: &str) -> *mut Self {
        Box::into_raw(Box::new(FfiUserInfoResult {
            error_code,
            error_message: c_string(msg),
            error_field: std::ptr::null_mut(),
            http_status: 0,
            data: std::ptr::null_mut(),
        }))
    }
}

// ---------------------------------------------------------------------------
// C string helpers
// ---------------------------------------------------------------------------

/// Allocate a C string. Interior NUL bytes yield an empty string.
pub(crate) fn c_string(s: impl Into<Vec<u8>>) -> *mut c_char {
    CString::new(s).unwrap_or_default().into_raw()
}

pub(crate) fn opt_c_string(s: Option<&str>) -> *mut c_char {
    s.map_or(std::ptr::null_mut(), c_string)
}

pub(crate) fn free_c_string(ptr: *mut c_char) {
    if !ptr.is_null() {
        drop(unsafe { CString::from_raw(ptr) });
    }
}

/// Borrow a caller-owned C string. Null yields `Ok(None)`.
pub(crate) fn read_c_str<'a>(ptr: *const c_char) -> Result<Option<&'a str>, Utf8Error> {
    if ptr.is_null() {
        return Ok(None);
    }
    unsafe { CStr::from_ptr(ptr) }.to_str().map(Some)
}
