//! Paste entity, request bodies and response shapes.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize, Serializer};

/// Format used when `expiresAt` is rendered for clients.
pub const EXPIRES_AT_FORMAT: &str = "%Y-%m-%d %H:%M:%S UTC";

/// Paste row stored in the database.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Paste {
    pub id: String,
    pub content: Vec<String>,
    pub name: Option<String>,
    pub file_type: String,
    pub expires_at: DateTime<Utc>,
    pub access_key: String,
}

/// Request payload for creating a paste.
///
/// `id` and `accessKey` are accepted so older clients keep working, but the
/// server always generates both.
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(deny_unknown_fields, rename_all = "camelCase")]
pub struct CreatePasteRequest {
    pub content: Option<Vec<String>>,
    pub name: Option<String>,
    #[serde(alias = "filetype")]
    pub file_type: Option<String>,
    pub expires_in: Option<i64>,
    pub id: Option<String>,
    pub access_key: Option<String>,
}

/// Request payload for editing a paste.
///
/// `accessKey` authorizes the edit; `newAccessKey` rotates the stored key.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(deny_unknown_fields, rename_all = "camelCase")]
pub struct EditPasteRequest {
    pub access_key: Option<String>,
    pub content: Option<Vec<String>>,
    pub name: Option<String>,
    #[serde(alias = "filetype")]
    pub file_type: Option<String>,
    pub expires_in: Option<i64>,
    pub new_access_key: Option<String>,
}

/// Request payload for deleting a paste.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(deny_unknown_fields, rename_all = "camelCase")]
pub struct DeletePasteRequest {
    pub access_key: Option<String>,
}

/// Response returned after a paste is created.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CreatedPaste {
    pub id: String,
    pub access_key: String,
    #[serde(serialize_with = "serialize_expires_at")]
    pub expires_at: DateTime<Utc>,
}

/// Response returned after a paste is edited.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct EditedPaste {
    pub id: String,
    #[serde(serialize_with = "serialize_expires_at")]
    pub expires_at: DateTime<Utc>,
}

/// Display projection of a paste: everything except `id` and `access_key`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PasteView {
    pub content: Vec<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    pub file_type: String,
    #[serde(serialize_with = "serialize_expires_at")]
    pub expires_at: DateTime<Utc>,
}

/// Key projection of a paste, used to authorize deletes.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct KeyProjection {
    pub access_key: String,
    pub expires_at: DateTime<Utc>,
}

impl Paste {
    /// Whether the paste has expired at `now`.
    pub fn is_expired(&self, now: DateTime<Utc>) -> bool {
        self.expires_at <= now
    }

    /// Project the paste for display.
    pub fn view(&self) -> PasteView {
        PasteView {
            content: self.content.clone(),
            name: self.name.clone(),
            file_type: self.file_type.clone(),
            expires_at: self.expires_at,
        }
    }

    /// Project the fields needed to authorize a delete.
    pub fn key_projection(&self) -> KeyProjection {
        KeyProjection {
            access_key: self.access_key.clone(),
            expires_at: self.expires_at,
        }
    }
}

impl PasteView {
    /// Whether the paste has expired at `now`.
    pub fn is_expired(&self, now: DateTime<Utc>) -> bool {
        self.expires_at <= now
    }
}

impl KeyProjection {
    /// Whether the paste has expired at `now`.
    pub fn is_expired(&self, now: DateTime<Utc>) -> bool {
        self.expires_at <= now
    }
}

impl From<&Paste> for CreatedPaste {
    fn from(value: &Paste) -> Self {
        Self {
            id: value.id.clone(),
            access_key: value.access_key.clone(),
            expires_at: value.expires_at,
        }
    }
}

impl From<&Paste> for EditedPaste {
    fn from(value: &Paste) -> Self {
        Self {
            id: value.id.clone(),
            expires_at: value.expires_at,
        }
    }
}

/// Render an expiry timestamp the way clients see it.
pub fn format_expires_at(expires_at: &DateTime<Utc>) -> String {
    expires_at.format(EXPIRES_AT_FORMAT).to_string()
}

fn serialize_expires_at<S: Serializer>(
    expires_at: &DateTime<Utc>,
    serializer: S,
) -> Result<S::Ok, S::Error> {
    serializer.serialize_str(&format_expires_at(expires_at))
}
