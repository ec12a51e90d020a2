//! Session reducer
//!
//! Fail-soft by contract: exchange failures land in state as a message
//! plus a cleared session, never as an error escaping to the caller, and
//! `logging_in` returns to false on every exit path. Every durable
//! mutation is followed by a save effect so storage mirrors state.

use crate::actions::AuthAction;
use crate::environment::AuthEnvironment;
use crate::state::AuthState;
use crate::token::IdToken;
use seal_viewer_api::AuthResponse;
use seal_viewer_core::effect::Effect;
use seal_viewer_core::reducer::Reducer;
use seal_viewer_core::{SmallVec, smallvec};
use std::sync::Arc;

/// Reducer for the session store
#[derive(Debug, Clone, Copy, Default)]
pub struct AuthReducer;

impl Reducer for AuthReducer {
    type State = AuthState;
    type Action = AuthAction;
    type Environment = Arc<dyn AuthEnvironment>;

    fn reduce(
        &self,
        state: &mut Self::State,
        action: Self::Action,
        env: &Self::Environment,
    ) -> SmallVec<[Effect<Self::Action>; 4]> {
        match action {
            AuthAction::Hydrate => smallvec![env.load_session()],

            AuthAction::HydrationLoaded { session } => {
                state.hydrated = true;
                match session {
                    None => SmallVec::new(),
                    Some(session) => match IdToken::decode(&session.id_token) {
                        Ok(token) => {
                            tracing::debug!(sub = %token.payload.sub, "Session restored");
                            state.token = Some(token);
                            state.refresh_token = session.refresh_token;
                            SmallVec::new()
                        },
                        Err(e) => {
                            // A blob that no longer decodes is not a crash,
                            // it is "not logged in". Clear it so the next
                            // start skips the failed decode.
                            tracing::warn!(error = %e, "Stored token is malformed, discarding");
                            smallvec![env.save_session(None)]
                        },
                    },
                }
            },

            AuthAction::Login { username, password } => {
                tracing::info!(username, "Login requested");
                state.logging_in = true;
                state.last_error = None;
                smallvec![env.exchange_credentials(username, password)]
            },

            AuthAction::LoginSucceeded { response } => {
                state.logging_in = false;
                apply_exchange(state, response, false);
                smallvec![env.save_session(state.to_persisted())]
            },

            AuthAction::LoginFailed { error } => {
                tracing::warn!(error, "Login failed");
                state.logging_in = false;
                state.token = None;
                state.refresh_token = None;
                state.last_error = Some(error);
                smallvec![env.save_session(None)]
            },

            AuthAction::Refresh => match state.refresh_token.clone() {
                Some(refresh_token) => {
                    state.logging_in = true;
                    state.last_error = None;
                    smallvec![env.exchange_refresh_token(refresh_token)]
                },
                None => {
                    tracing::debug!("Refresh requested without a refresh token");
                    SmallVec::new()
                },
            },

            AuthAction::RefreshSucceeded { response } => {
                state.logging_in = false;
                apply_exchange(state, response, true);
                smallvec![env.save_session(state.to_persisted())]
            },

            AuthAction::RefreshFailed { error } => {
                tracing::warn!(error, "Refresh failed");
                state.logging_in = false;
                state.token = None;
                state.refresh_token = None;
                state.last_error = Some(error);
                smallvec![env.save_session(None)]
            },

            AuthAction::Logout => {
                state.token = None;
                state.refresh_token = None;
                state.last_error = None;
                smallvec![env.save_session(None)]
            },
        }
    }
}

/// Install the token carried by an exchange response
///
/// `retain_refresh` covers the refresh flow: rotation is optional
/// server-side, so a response without a replacement refresh token keeps
/// the one already held. The login flow takes the response verbatim.
/// A response whose token does not decode clears the session.
fn apply_exchange(state: &mut AuthState, response: AuthResponse, retain_refresh: bool) {
    match IdToken::decode(&response.id_token) {
        Ok(token) => {
            state.token = Some(token);
            state.refresh_token = match response.refresh_token {
                Some(refresh_token) => Some(refresh_token),
                None if retain_refresh => state.refresh_token.take(),
                None => None,
            };
            state.last_error = None;
        },
        Err(e) => {
            tracing::error!(error = %e, "Exchange returned a malformed token");
            state.token = None;
            state.refresh_token = None;
            state.last_error = Some(e.to_string());
        },
    }
}

#[cfg(test)]
mod tests {
    #![allow(clippy::unwrap_used)]

    use super::*;
    use crate::environment::mocks::MockAuthEnvironment;
    use crate::state::PersistedSession;
    use crate::token::{Header, Payload};
    use seal_viewer_testing::{ReducerTest, assertions};

    fn env() -> Arc<dyn AuthEnvironment> {
        Arc::new(MockAuthEnvironment::default())
    }

    fn valid_raw_token() -> String {
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
                exp: 1_700_000_000,
                iat: 1_699_996_400,
                auth_time: 1_699_996_400,
                nonce: None,
            },
            "sig".to_string(),
        )
        .unwrap()
        .raw
    }

    fn response(id_token: &str, refresh_token: Option<&str>) -> AuthResponse {
        AuthResponse {
            id_token: id_token.to_string(),
            refresh_token: refresh_token.map(ToString::to_string),
            expires_in: 3600,
        }
    }

    #[test]
    fn login_sets_in_progress_and_issues_exchange() {
        ReducerTest::new(AuthReducer)
            .with_env(env())
            .given_state(AuthState::default())
            .when_action(AuthAction::Login {
                username: "alice".to_string(),
                password: "s3cret".to_string(),
            })
            .then_state(|state| {
                assert!(state.logging_in);
                assert!(state.last_error.is_none());
            })
            .then_effects(|effects| {
                assertions::assert_effects_count(effects, 1);
                assertions::assert_has_future_effect(effects);
            })
            .run();
    }

    #[test]
    fn login_success_installs_server_provided_raw() {
        let raw = valid_raw_token();
        let expected = raw.clone();

        ReducerTest::new(AuthReducer)
            .with_env(env())
            .given_state(AuthState {
                logging_in: true,
                ..AuthState::default()
            })
            .when_action(AuthAction::LoginSucceeded {
                response: response(&raw, Some("refresh-1")),
            })
            .then_state(move |state| {
                assert!(!state.logging_in);
                assert_eq!(state.token.as_ref().unwrap().raw, expected);
                assert_eq!(state.refresh_token.as_deref(), Some("refresh-1"));
            })
            .then_effects(assertions::assert_has_future_effect)
            .run();
    }

    #[test]
    fn login_failure_clears_session_and_in_progress() {
        ReducerTest::new(AuthReducer)
            .with_env(env())
            .given_state(AuthState {
                logging_in: true,
                ..AuthState::default()
            })
            .when_action(AuthAction::LoginFailed {
                error: "Failed to authenticate.".to_string(),
            })
            .then_state(|state| {
                assert!(!state.logging_in);
                assert!(state.token.is_none());
                assert!(state.refresh_token.is_none());
                assert_eq!(state.last_error.as_deref(), Some("Failed to authenticate."));
            })
            .then_effects(assertions::assert_has_future_effect)
            .run();
    }

    #[test]
    fn malformed_exchange_token_clears_session() {
        ReducerTest::new(AuthReducer)
            .with_env(env())
            .given_state(AuthState {
                logging_in: true,
                ..AuthState::default()
            })
            .when_action(AuthAction::LoginSucceeded {
                response: response("not-a-token", None),
            })
            .then_state(|state| {
                assert!(!state.logging_in);
                assert!(state.token.is_none());
                assert!(state.last_error.is_some());
            })
            .run();
    }

    #[test]
    fn hydration_installs_stored_token() {
        let raw = valid_raw_token();
        let expected = raw.clone();

        ReducerTest::new(AuthReducer)
            .with_env(env())
            .given_state(AuthState::default())
            .when_action(AuthAction::HydrationLoaded {
                session: Some(PersistedSession {
                    id_token: raw,
                    refresh_token: Some("refresh-1".to_string()),
                }),
            })
            .then_state(move |state| {
                assert!(state.hydrated);
                assert_eq!(state.token.as_ref().unwrap().raw, expected);
            })
            .then_effects(assertions::assert_no_effects)
            .run();
    }

    #[test]
    fn hydration_with_corrupt_blob_stays_logged_out() {
        ReducerTest::new(AuthReducer)
            .with_env(env())
            .given_state(AuthState::default())
            .when_action(AuthAction::HydrationLoaded {
                session: Some(PersistedSession {
                    id_token: "garbage".to_string(),
                    refresh_token: None,
                }),
            })
            .then_state(|state| {
                assert!(state.hydrated);
                assert!(state.token.is_none());
            })
            .then_effects(assertions::assert_has_future_effect)
            .run();
    }

    #[test]
    fn refresh_without_token_is_a_no_op() {
        ReducerTest::new(AuthReducer)
            .with_env(env())
            .given_state(AuthState::default())
            .when_action(AuthAction::Refresh)
            .then_state(|state| assert!(!state.logging_in))
            .then_effects(assertions::assert_no_effects)
            .run();
    }

    #[test]
    fn refresh_success_keeps_refresh_token_when_not_rotated() {
        let raw = valid_raw_token();

        ReducerTest::new(AuthReducer)
            .with_env(env())
            .given_state(AuthState {
                refresh_token: Some("refresh-1".to_string()),
                logging_in: true,
                ..AuthState::default()
            })
            .when_action(AuthAction::RefreshSucceeded {
                response: response(&raw, None),
            })
            .then_state(|state| {
                assert!(!state.logging_in);
                assert!(state.token.is_some());
                assert_eq!(state.refresh_token.as_deref(), Some("refresh-1"));
            })
            .run();
    }

    #[test]
    fn refresh_success_adopts_rotated_token() {
        let raw = valid_raw_token();

        ReducerTest::new(AuthReducer)
            .with_env(env())
            .given_state(AuthState {
                refresh_token: Some("refresh-1".to_string()),
                logging_in: true,
                ..AuthState::default()
            })
            .when_action(AuthAction::RefreshSucceeded {
                response: response(&raw, Some("refresh-2")),
            })
            .then_state(|state| {
                assert_eq!(state.refresh_token.as_deref(), Some("refresh-2"));
            })
            .run();
    }

    #[test]
    fn logout_clears_synchronously() {
        let raw = valid_raw_token();
        let token = IdToken::decode(&raw).unwrap();

        ReducerTest::new(AuthReducer)
            .with_env(env())
            .given_state(AuthState {
                token: Some(token),
                refresh_token: Some("refresh-1".to_string()),
                ..AuthState::default()
            })
            .when_action(AuthAction::Logout)
            .then_state(|state| {
                assert!(state.token.is_none());
                assert!(state.refresh_token.is_none());
            })
            .then_effects(assertions::assert_has_future_effect)
            .run();
    }
}
