//! Session state types
//!
//! All types are `Clone` to support the functional architecture pattern.

use crate::token::IdToken;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Client-held authentication state
///
/// Initialized empty; populated by hydration from durable storage or by a
/// successful credential exchange. A token is only ever installed through
/// one of those two paths.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct AuthState {
    /// Current identity token, if logged in
    pub token: Option<IdToken>,

    /// Long-lived refresh token paired with the current identity token
    pub refresh_token: Option<String>,

    /// True only strictly between request-sent and response-processed
    ///
    /// Returns to false on every exit path, including network failure.
    pub logging_in: bool,

    /// Whether restoration from durable storage has completed
    ///
    /// Dependent UI defers its auth guard until this is true, avoiding a
    /// flash of "logged out" before stored credentials load.
    pub hydrated: bool,

    /// Message from the most recent failed exchange, surfaced to the user
    pub last_error: Option<String>,
}

impl AuthState {
    /// Whether a non-expired token is currently installed
    #[must_use]
    pub fn is_authenticated(&self, now: DateTime<Utc>) -> bool {
        self.token.as_ref().is_some_and(|t| !t.is_expired(now))
    }

    /// The durable portion of this state, or `None` when logged out
    #[must_use]
    pub fn to_persisted(&self) -> Option<PersistedSession> {
        self.token.as_ref().map(|token| PersistedSession {
            id_token: token.raw.clone(),
            refresh_token: self.refresh_token.clone(),
        })
    }
}

/// The session blob written to durable storage
///
/// Tokens are stored in wire form and re-decoded on hydration, so a blob
/// written by an older build that no longer decodes is treated as
/// "not logged in" rather than a crash.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PersistedSession {
    /// Identity token in its three-part encoded wire form
    pub id_token: String,

    /// Refresh token, when one was issued
    pub refresh_token: Option<String>,
}

#[cfg(test)]
mod tests {
    #![allow(clippy::unwrap_used)]

    use super::*;
    use crate::token::{Header, Payload};

    fn token_expiring_at(exp: i64) -> IdToken {
        IdToken::encode(
            Header {
                alg: "RS256".to_string(),
                kid: "key-1".to_string(),
            },
            Payload {
                jti: "token-1".to_string(),
                iss: "https://issuer.example".to_string(),
                sub: "user-1".to_string(),
                aud: "seal-viewer".to_string(),
                exp,
                iat: exp - 3600,
                auth_time: exp - 3600,
                nonce: None,
            },
            "sig".to_string(),
        )
        .unwrap()
    }

    #[test]
    fn empty_state_is_not_authenticated() {
        let state = AuthState::default();
        assert!(!state.is_authenticated(Utc::now()));
        assert!(state.to_persisted().is_none());
    }

    #[test]
    fn expired_token_is_not_authenticated() {
        let exp = 1_700_000_000;
        let state = AuthState {
            token: Some(token_expiring_at(exp)),
            ..AuthState::default()
        };

        let after = DateTime::from_timestamp(exp + 1, 0).unwrap();
        assert!(!state.is_authenticated(after));

        let before = DateTime::from_timestamp(exp - 1, 0).unwrap();
        assert!(state.is_authenticated(before));
    }

    #[test]
    fn persisted_blob_carries_wire_form() {
        let token = token_expiring_at(1_700_000_000);
        let raw = token.raw.clone();
        let state = AuthState {
            token: Some(token),
            refresh_token: Some("refresh-1".to_string()),
            ..AuthState::default()
        };

        let persisted = state.to_persisted().unwrap();
        assert_eq!(persisted.id_token, raw);
        assert_eq!(persisted.refresh_token.as_deref(), Some("refresh-1"));
    }
}
