use std::sync::Arc;

use axum::{
    extract::State,
    http::{header, HeaderMap, StatusCode},
    response::{IntoResponse, Response},
    routing::get,
    Json, Router,
};
use serde::{Deserialize, Serialize};
use serde_json::{json, Value};
use tokio::{net::TcpListener, sync::RwLock};
use tracing::{debug, info};

/// Bearer token answered with the fixture user.
pub const VALID_TOKEN: &str = "valid-token";
/// API key answered with the fixture user.
pub const API_KEY: &str = "test-api-key";
/// Bearer token answered with 500 `{"error":"GraphQL query failed"}`.
pub const GRAPHQL_ERROR_TOKEN: &str = "graphql-error";
/// Bearer token answered with 500 `{"error":"Failed to fetch user info"}`.
pub const FETCH_ERROR_TOKEN: &str = "fetch-error";
/// Bearer token answered with 200 and a user missing its `id`.
pub const MALFORMED_TOKEN: &str = "malformed-body";

/// Headers of one request received on `/v1/userinfo`.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct RecordedRequest {
    pub authorization: Option<String>,
    pub content_type: Option<String>,
    pub user_agent: Option<String>,
}

impl RecordedRequest {
    fn from_headers(headers: &HeaderMap) -> Self {
        let get = |name: header::HeaderName| {
            headers
                .get(name)
                .and_then(|v| v.to_str().ok())
                .map(str::to_string)
        };
        Self {
            authorization: get(header::AUTHORIZATION),
            content_type: get(header::CONTENT_TYPE),
            user_agent: get(header::USER_AGENT),
        }
    }

    fn bearer(&self) -> Option<&str> {
        self.authorization.as_deref()?.strip_prefix("Bearer ")
    }
}

#[derive(Debug, Default)]
pub struct MockState {
    pub requests: RwLock<Vec<RecordedRequest>>,
}

pub type SharedState = Arc<MockState>;

pub fn app() -> Router {
    app_with_state(SharedState::default())
}

pub fn app_with_state(state: SharedState) -> Router {
    Router::new()
        .route("/v1/userinfo", get(user_info))
        .route("/__requests", get(list_requests))
        .with_state(state)
}

pub async fn run(listener: TcpListener) -> Result<(), std::io::Error> {
    run_with_state(listener, SharedState::default()).await
}

pub async fn run_with_state(listener: TcpListener, state: SharedState) -> Result<(), std::io::Error> {
    if let Ok(addr) = listener.local_addr() {
        info!(%addr, "mock user-info server listening");
    }
    axum::serve(listener, app_with_state(state)).await
}

/// The user returned for `VALID_TOKEN` and `API_KEY`.
pub fn fixture_user_info() -> Value {
    json!({
        "meta": {"code": 200, "message": "Success"},
        "session": {"remainingSeconds": 3600},
        "user": {
            "id": "user123",
            "externalId": "ext123",
            "userName": "testuser",
            "displayName": "Test User",
            "nickName": null,
            "title": "Developer",
            "locale": "en-US",
            "timezone": "UTC",
            "active": true,
            "names": {
                "id": "name123",
                "formatted": "Test User",
                "familyName": "User",
                "givenName": "Test"
            },
            "photos": [
                {"id": "photo123", "value": "https://example.com/photo.jpg", "type": "profile"}
            ],
            "phoneNumbers": [{"value": "+1 555 0100"}],
            "addresses": [],
            "emails": [
                {"id": "email123", "value": "test@example.com", "type": "work"},
                {"id": "email456", "value": "alt@example.com"}
            ],
            "verifications": [{
                "id": "verification123",
                "email": "test@example.com",
                "verified": true,
                "createdAt": "2023-01-01T00:00:00Z",
                "updatedAt": "2023-01-01T00:00:00Z"
            }],
            "provider": "test",
            "createdAt": "2023-01-01T00:00:00Z",
            "updatedAt": "2023-01-01T00:00:00Z",
            "environmentId": "env123"
        }
    })
}

async fn user_info(State(state): State<SharedState>, headers: HeaderMap) -> Response {
    let recorded = RecordedRequest::from_headers(&headers);
    let token = recorded.bearer().map(str::to_string);
    state.requests.write().await.push(recorded);
    debug!(has_token = token.is_some(), "user-info request");

    match token.as_deref() {
        Some(VALID_TOKEN) | Some(API_KEY) => (StatusCode::OK, Json(fixture_user_info())).into_response(),
        Some(GRAPHQL_ERROR_TOKEN) => server_error("GraphQL query failed"),
        Some(FETCH_ERROR_TOKEN) => server_error("Failed to fetch user info"),
        Some(MALFORMED_TOKEN) => {
            let mut body = fixture_user_info();
            if let Some(user) = body["user"].as_object_mut() {
                user.remove("id");
            }
            (StatusCode::OK, Json(body)).into_response()
        }
        _ => (StatusCode::UNAUTHORIZED, "Unauthorized").into_response(),
    }
}

async fn list_requests(State(state): State<SharedState>) -> Json<Vec<RecordedRequest>> {
    Json(state.requests.read().await.clone())
}

fn server_error(message: &str) -> Response {
    (
        StatusCode::INTERNAL_SERVER_ERROR,
        Json(json!({ "error": message })),
    )
        .into_response()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn fixture_has_required_user_fields() {
        let body = fixture_user_info();
        for key in ["id", "externalId", "userName", "displayName", "locale", "active", "names"] {
            assert!(body["user"].get(key).is_some(), "missing {key}");
        }
        assert_eq!(body["session"]["remainingSeconds"], 3600);
    }

    #[test]
    fn bearer_strips_scheme() {
        let recorded = RecordedRequest {
            authorization: Some("Bearer abc".to_string()),
            ..RecordedRequest::default()
        };
        assert_eq!(recorded.bearer(), Some("abc"));
    }

    #[test]
    fn bearer_requires_scheme() {
        let recorded = RecordedRequest {
            authorization: Some("Basic abc".to_string()),
            ..RecordedRequest::default()
        };
        assert_eq!(recorded.bearer(), None);
        assert_eq!(RecordedRequest::default().bearer(), None);
    }

    #[test]
    fn recorded_request_roundtrips_through_json() {
        let recorded = RecordedRequest {
            authorization: Some("Bearer t".to_string()),
            content_type: Some("application/json".to_string()),
            user_agent: None,
        };
        let json = serde_json::to_string(&recorded).unwrap();
        let back: RecordedRequest = serde_json::from_str(&json).unwrap();
        assert_eq!(back, recorded);
    }
}
