//! Wire codec for the user-info payload.
//!
//! Decoding is serde deserialization run through `serde_path_to_error`, so a
//! failure names the field it happened on (`user.emails[0].value`). A missing
//! required field is reported at its own path rather than at its parent.

use serde_path_to_error::Error as PathError;

use crate::error::{AuthdogError, Result};
use crate::types::UserInfoResponse;

/// Decode a 200 response body into a `UserInfoResponse`.
pub fn decode_user_info(body: &str) -> Result<UserInfoResponse> {
    let mut de = serde_json::Deserializer::from_str(body);
    let info = serde_path_to_error::deserialize(&mut de).map_err(decode_error)?;
    de.end()
        .map_err(|e| AuthdogError::decode(None, e.to_string()))?;
    Ok(info)
}

/// Encode a `UserInfoResponse` back to its wire JSON.
pub fn encode_user_info(response: &UserInfoResponse) -> Result<String> {
    serde_json::to_string(response)
        .map_err(|e| AuthdogError::api(format!("failed to encode response: {e}")))
}

fn decode_error(err: PathError<serde_json::Error>) -> AuthdogError {
    let inner = err.inner().to_string();
    let path = err.path().to_string();
    let parent = (path != ".").then_some(path);
    let missing = inner
        .strip_prefix("missing field `")
        .and_then(|rest| rest.split('`').next());

    let field = match (parent, missing) {
        (Some(parent), Some(name)) => Some(format!("{parent}.{name}")),
        (None, Some(name)) => Some(name.to_string()),
        (parent, None) => parent,
    };
    match field {
        Some(field) => AuthdogError::decode(Some(&field), format!("`{field}`: {inner}")),
        None => AuthdogError::decode(None, inner),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::ErrorKind;
    use serde_json::{json, Value};

    const MINIMAL: &str = r#"{"meta":{"code":0,"message":"ok"},"session":{"remainingSeconds":3600},"user":{"id":"123","externalId":"e1","userName":"u","displayName":"Test User","locale":"en","active":true,"names":{"id":"n1","familyName":"User","givenName":"Test"},"photos":[],"phoneNumbers":[],"addresses":[],"emails":[{"id":"e1","value":"test@example.com"}],"verifications":[],"provider":"p","createdAt":"t1","updatedAt":"t2","environmentId":"env1"}}"#;

    fn full() -> Value {
        json!({
            "meta": {"code": 200, "message": "Success"},
            "session": {"remainingSeconds": 3600},
            "user": {
                "id": "user123",
                "externalId": "ext123",
                "userName": "testuser",
                "displayName": "Test User",
                "nickName": "test",
                "profileUrl": "https://example.com/profile",
                "title": "Developer",
                "userType": "employee",
                "preferredLanguage": "en",
                "locale": "en-US",
                "timezone": "UTC",
                "active": true,
                "names": {
                    "id": "name123",
                    "formatted": "Test User",
                    "familyName": "User",
                    "givenName": "Test",
                    "middleName": "Middle",
                    "honorificPrefix": "Mr.",
                    "honorificSuffix": "Jr."
                },
                "photos": [
                    {"id": "photo1", "value": "https://example.com/1.jpg", "type": "profile"},
                    {"id": "photo2", "value": "https://example.com/2.jpg", "type": "avatar"}
                ],
                "phoneNumbers": [{"value": "+1 555 0100", "primary": true}],
                "addresses": [{"locality": "Paris", "country": "FR"}],
                "emails": [
                    {"id": "email1", "value": "test@example.com", "type": "work"},
                    {"id": "email2", "value": "other@example.com"}
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

    fn with_user_field(key: &str, value: Value) -> String {
        let mut body = full();
        body["user"][key] = value;
        body.to_string()
    }

    fn without_user_field(key: &str) -> String {
        let mut body = full();
        body["user"].as_object_mut().unwrap().remove(key);
        body.to_string()
    }

    #[test]
    fn decodes_minimal_body() {
        let info = decode_user_info(MINIMAL).unwrap();
        assert_eq!(info.meta.code, 0);
        assert_eq!(info.session.remaining_seconds, 3600);
        assert_eq!(info.user.display_name, "Test User");
        assert_eq!(info.user.nick_name, None);
        assert_eq!(info.user.emails[0].value, "test@example.com");
        assert_eq!(info.user.emails[0].email_type, None);
        assert_eq!(info.user.names.middle_name, None);
    }

    #[test]
    fn decodes_full_body() {
        let info = decode_user_info(&full().to_string()).unwrap();
        let user = &info.user;
        assert_eq!(user.nick_name.as_deref(), Some("test"));
        assert_eq!(user.timezone.as_deref(), Some("UTC"));
        assert_eq!(user.names.honorific_suffix.as_deref(), Some("Jr."));
        assert_eq!(user.photos.len(), 2);
        assert_eq!(user.photos[1].photo_type, "avatar");
        assert_eq!(user.phone_numbers[0]["primary"], true);
        assert_eq!(user.addresses[0]["country"], "FR");
        assert_eq!(user.primary_email().unwrap().value, "test@example.com");
        assert_eq!(user.primary_photo().unwrap().id, "photo1");
        assert!(user.verifications[0].verified);
    }

    #[test]
    fn null_optional_is_absent_but_empty_string_is_present() {
        let info = decode_user_info(&with_user_field("nickName", Value::Null)).unwrap();
        assert_eq!(info.user.nick_name, None);

        let info = decode_user_info(&with_user_field("nickName", json!(""))).unwrap();
        assert_eq!(info.user.nick_name.as_deref(), Some(""));
    }

    #[test]
    fn missing_user_id_names_the_field() {
        let err = decode_user_info(&without_user_field("id")).unwrap_err();
        assert_eq!(err.kind(), ErrorKind::Decode);
        assert_eq!(err.field(), Some("user.id"));
        assert!(err.to_string().contains("user.id"));
    }

    #[test]
    fn null_required_field_names_the_field() {
        let err = decode_user_info(&with_user_field("locale", Value::Null)).unwrap_err();
        assert_eq!(err.field(), Some("user.locale"));
    }

    #[test]
    fn wrong_type_names_the_field() {
        let err = decode_user_info(&with_user_field("active", json!("yes"))).unwrap_err();
        assert_eq!(err.field(), Some("user.active"));
        assert!(err.to_string().contains("expected a boolean"));

        let err = decode_user_info(&with_user_field("nickName", json!(42))).unwrap_err();
        assert_eq!(err.field(), Some("user.nickName"));
    }

    #[test]
    fn nested_array_element_path() {
        let mut body = full();
        body["user"]["emails"][1]["value"] = json!(false);
        let err = decode_user_info(&body.to_string()).unwrap_err();
        assert_eq!(err.field(), Some("user.emails[1].value"));

        let mut body = full();
        body["user"]["photos"][0] = json!("https://example.com/1.jpg");
        let err = decode_user_info(&body.to_string()).unwrap_err();
        assert_eq!(err.field(), Some("user.photos[0]"));
    }

    #[test]
    fn missing_nested_object_field() {
        let mut body = full();
        body["user"]["names"].as_object_mut().unwrap().remove("givenName");
        let err = decode_user_info(&body.to_string()).unwrap_err();
        assert_eq!(err.field(), Some("user.names.givenName"));
    }

    #[test]
    fn absent_arrays_decode_empty() {
        let mut body = full();
        let user = body["user"].as_object_mut().unwrap();
        for key in ["photos", "phoneNumbers", "addresses", "emails", "verifications"] {
            user.remove(key);
        }
        user.insert("photos".to_string(), Value::Null);
        let info = decode_user_info(&body.to_string()).unwrap();
        assert!(info.user.photos.is_empty());
        assert!(info.user.phone_numbers.is_empty());
        assert!(info.user.addresses.is_empty());
        assert!(info.user.emails.is_empty());
        assert!(info.user.verifications.is_empty());
        assert!(info.user.primary_email().is_none());
    }

    #[test]
    fn array_of_wrong_type_is_rejected() {
        let err = decode_user_info(&with_user_field("emails", json!({}))).unwrap_err();
        assert_eq!(err.field(), Some("user.emails"));
    }

    #[test]
    fn unknown_keys_are_ignored() {
        let mut body = full();
        body["extra"] = json!({"anything": [1, 2, 3]});
        body["user"]["favouriteColour"] = json!("green");
        assert!(decode_user_info(&body.to_string()).is_ok());
    }

    #[test]
    fn malformed_json_has_no_field() {
        let err = decode_user_info("invalid json").unwrap_err();
        assert_eq!(err.kind(), ErrorKind::Decode);
        assert_eq!(err.field(), None);
        assert!(err.to_string().starts_with("failed to parse response"));
    }

    #[test]
    fn top_level_must_be_object() {
        let err = decode_user_info("[]").unwrap_err();
        assert_eq!(err.field(), None);
        assert!(err.to_string().contains("expected struct UserInfoResponse"));
    }

    #[test]
    fn trailing_garbage_is_rejected() {
        let err = decode_user_info(&format!("{MINIMAL} x")).unwrap_err();
        assert_eq!(err.kind(), ErrorKind::Decode);
        assert_eq!(err.field(), None);
    }

    #[test]
    fn missing_top_level_section_names_it() {
        let mut body = full();
        body.as_object_mut().unwrap().remove("session");
        let err = decode_user_info(&body.to_string()).unwrap_err();
        assert_eq!(err.field(), Some("session"));
    }

    #[test]
    fn encode_preserves_every_schema_field() {
        let original = full();
        let info = decode_user_info(&original.to_string()).unwrap();
        let encoded: Value = serde_json::from_str(&encode_user_info(&info).unwrap()).unwrap();
        assert_eq!(encoded, original);
    }

    #[test]
    fn encode_omits_absent_optionals() {
        let info = decode_user_info(MINIMAL).unwrap();
        let encoded: Value = serde_json::from_str(&encode_user_info(&info).unwrap()).unwrap();
        assert!(encoded["user"].get("nickName").is_none());
        assert!(encoded["user"]["emails"][0].get("type").is_none());
        assert_eq!(encoded, serde_json::from_str::<Value>(MINIMAL).unwrap());
    }
}
