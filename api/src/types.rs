//! Wire types for the backend API

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Successful response from the auth and refresh endpoints
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AuthResponse {
    /// The signed identity token, in its three-part encoded wire form
    pub id_token: String,

    /// Long-lived refresh token
    ///
    /// The refresh endpoint may omit this when the server does not rotate
    /// refresh tokens; callers keep the one they already hold.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub refresh_token: Option<String>,

    /// Identity token lifetime in seconds
    pub expires_in: u64,
}

/// One entry of an image listing result
///
/// The access URL is time-limited and opaque; its validity window is
/// controlled entirely by the backend, so it must not be cached beyond the
/// current query's results.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ImageDescriptor {
    /// Object name, unique within one query's result set
    pub name: String,

    /// Time-limited access URL
    pub url: String,

    /// Object size in bytes
    pub size: u64,

    /// Last-modified timestamp, when the backend reports one
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub last_modified: Option<DateTime<Utc>>,
}

/// Pre-signed write URL returned by the upload-url endpoint
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct UploadUrl {
    /// The pre-signed URL; PUT the object body here
    pub url: String,
}

/// Error body shape shared by all non-success backend responses
#[derive(Debug, Clone, Deserialize)]
pub(crate) struct ErrorBody {
    pub message: String,
}
