//! Error types for the backend API client

use thiserror::Error;

/// Errors that can occur when interacting with the seal image backend
///
/// This is a tagged taxonomy rather than an exception hierarchy: every
/// operation returns the variant explicitly so callers can match on it.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum ApiError {
    /// Missing `SEAL_API_BASE_URL` environment variable
    #[error("Missing SEAL_API_BASE_URL environment variable")]
    MissingBaseUrl,

    /// Credentials or refresh token were rejected by the auth endpoint
    #[error("Authentication failed: {message}")]
    AuthFailed {
        /// Error message from the backend
        message: String,
    },

    /// Rate limited - too many requests (HTTP 429)
    #[error("Rate limited - too many requests")]
    RateLimited,

    /// The backend rejected a query with a non-success status
    #[error("Query failed (status {status}): {message}")]
    QueryFailed {
        /// HTTP status code
        status: u16,
        /// Error message from the backend
        message: String,
    },

    /// Transport-level failure (timeout, DNS, connection reset)
    ///
    /// Distinct from [`ApiError::QueryFailed`]: the server was never
    /// reached, or the connection broke before a status arrived.
    #[error("Network unavailable: {0}")]
    NetworkUnavailable(String),

    /// Response body could not be parsed
    #[error("Response parsing failed: {0}")]
    ParseFailed(String),
}

impl ApiError {
    /// Returns `true` if the failure came from the transport rather than
    /// from a backend decision.
    #[must_use]
    pub const fn is_transport(&self) -> bool {
        matches!(self, Self::NetworkUnavailable(_))
    }
}
