//! Domain model for the `/v1/userinfo` response.
//!
//! # Design
//! Optional profile attributes are `Option<String>`: a missing or `null` key
//! is `None`, while `""` stays `Some("")`. `phone_numbers` and `addresses`
//! are kept as raw JSON because the API does not constrain their shape.
//! Arrays that are absent or `null` decode to an empty `Vec`.

use serde::{Deserialize, Deserializer, Serialize};
use serde_json::Value;

/// Decoded body of a successful user-info call.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct UserInfoResponse {
    pub meta: Meta,
    pub session: Session,
    pub user: User,
}

/// Response code and message reported by the API.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Meta {
    pub code: i64,
    pub message: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Session {
    /// Remaining validity of the credential, in seconds.
    pub remaining_seconds: i64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct User {
    pub id: String,
    pub external_id: String,
    pub user_name: String,
    pub display_name: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub nick_name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub profile_url: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub user_type: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub preferred_language: Option<String>,
    pub locale: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub timezone: Option<String>,
    pub active: bool,
    pub names: Names,
    #[serde(default, deserialize_with = "null_as_empty")]
    pub photos: Vec<Photo>,
    #[serde(default, deserialize_with = "null_as_empty")]
    pub phone_numbers: Vec<Value>,
    #[serde(default, deserialize_with = "null_as_empty")]
    pub addresses: Vec<Value>,
    #[serde(default, deserialize_with = "null_as_empty")]
    pub emails: Vec<Email>,
    #[serde(default, deserialize_with = "null_as_empty")]
    pub verifications: Vec<Verification>,
    pub provider: String,
    pub created_at: String,
    pub updated_at: String,
    pub environment_id: String,
}

impl User {
    /// First email in wire order.
    pub fn primary_email(&self) -> Option<&Email> {
        self.emails.first()
    }

    /// First photo in wire order.
    pub fn primary_photo(&self) -> Option<&Photo> {
        self.photos.first()
    }
}

/// Structured name of a user.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Names {
    pub id: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub formatted: Option<String>,
    pub family_name: String,
    pub given_name: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub middle_name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub honorific_prefix: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub honorific_suffix: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Photo {
    pub id: String,
    pub value: String,
    #[serde(rename = "type")]
    pub photo_type: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Email {
    pub id: String,
    pub value: String,
    #[serde(rename = "type", skip_serializing_if = "Option::is_none")]
    pub email_type: Option<String>,
}

/// Verification state of one of the user's email addresses.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Verification {
    pub id: String,
    pub email: String,
    pub verified: bool,
    pub created_at: String,
    pub updated_at: String,
}

/// Body the API sends alongside some 5xx responses.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ErrorResponse {
    pub error: String,
}

fn null_as_empty<'de, D, T>(deserializer: D) -> Result<Vec<T>, D::Error>
where
    D: Deserializer<'de>,
    T: Deserialize<'de>,
{
    Ok(Option::<Vec<T>>::deserialize(deserializer)?.unwrap_or_default())
}
