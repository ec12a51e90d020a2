//! Session environment - injected dependencies
//!
//! The reducer never performs I/O; every exchange and storage access goes
//! through this seam and comes back as an effect whose output is fed into
//! the reducer as an event action.

use crate::actions::AuthAction;
use crate::state::PersistedSession;
use crate::storage::SessionStorage;
use seal_viewer_api::ApiClient;
use seal_viewer_core::effect::Effect;
use std::sync::Arc;

/// Dependencies of the session reducer
///
/// Each method returns an [`Effect`] describing the work; the runtime
/// executes it and feeds the resulting event action back in. Failures
/// come back as `*Failed` actions, never as panics or raw errors.
pub trait AuthEnvironment: Send + Sync {
    /// Exchange credentials for a token
    fn exchange_credentials(&self, username: String, password: String) -> Effect<AuthAction>;

    /// Exchange a refresh token for a fresh identity token
    fn exchange_refresh_token(&self, refresh_token: String) -> Effect<AuthAction>;

    /// Read the stored session blob
    fn load_session(&self) -> Effect<AuthAction>;

    /// Write the session blob; `None` clears storage
    fn save_session(&self, session: Option<PersistedSession>) -> Effect<AuthAction>;
}

/// Production environment wiring the backend client to durable storage
#[derive(Clone)]
pub struct LiveAuthEnvironment {
    api: ApiClient,
    storage: Arc<dyn SessionStorage>,
}

impl LiveAuthEnvironment {
    /// Create a production environment
    pub fn new(api: ApiClient, storage: Arc<dyn SessionStorage>) -> Self {
        Self { api, storage }
    }
}

impl AuthEnvironment for LiveAuthEnvironment {
    fn exchange_credentials(&self, username: String, password: String) -> Effect<AuthAction> {
        let api = self.api.clone();
        Effect::future(async move {
            match api.login(&username, &password).await {
                Ok(response) => Some(AuthAction::LoginSucceeded { response }),
                Err(e) => {
                    tracing::warn!(error = %e, "Credential exchange failed");
                    Some(AuthAction::LoginFailed {
                        error: e.to_string(),
                    })
                },
            }
        })
    }

    fn exchange_refresh_token(&self, refresh_token: String) -> Effect<AuthAction> {
        let api = self.api.clone();
        Effect::future(async move {
            match api.refresh(&refresh_token).await {
                Ok(response) => Some(AuthAction::RefreshSucceeded { response }),
                Err(e) => {
                    tracing::warn!(error = %e, "Refresh exchange failed");
                    Some(AuthAction::RefreshFailed {
                        error: e.to_string(),
                    })
                },
            }
        })
    }

    fn load_session(&self) -> Effect<AuthAction> {
        let storage = Arc::clone(&self.storage);
        Effect::future(async move {
            // A blob that cannot be read or parsed hydrates as logged out.
            let session = match storage.load() {
                Ok(session) => session,
                Err(e) => {
                    tracing::warn!(error = %e, "Session restore failed");
                    None
                },
            };
            Some(AuthAction::HydrationLoaded { session })
        })
    }

    fn save_session(&self, session: Option<PersistedSession>) -> Effect<AuthAction> {
        let storage = Arc::clone(&self.storage);
        Effect::future(async move {
            if let Err(e) = storage.save(session.as_ref()) {
                tracing::error!(error = %e, "Session persist failed");
            }
            None
        })
    }
}

/// Scripted environment for tests
pub mod mocks {
    use super::{AuthAction, AuthEnvironment, Effect, PersistedSession};
    use seal_viewer_api::AuthResponse;
    use std::sync::{Arc, Mutex, PoisonError};

    /// Environment whose exchanges resolve to preset outcomes and whose
    /// storage is an in-process cell that tests can inspect.
    #[derive(Debug, Clone, Default)]
    pub struct MockAuthEnvironment {
        /// Outcome of the next credential exchange
        pub login_result: Option<Result<AuthResponse, String>>,

        /// Outcome of the next refresh exchange
        pub refresh_result: Option<Result<AuthResponse, String>>,

        /// Backing cell standing in for durable storage
        pub stored: Arc<Mutex<Option<PersistedSession>>>,
    }

    impl MockAuthEnvironment {
        /// Environment whose credential exchange succeeds with `response`
        #[must_use]
        pub fn logging_in_as(response: AuthResponse) -> Self {
            Self {
                login_result: Some(Ok(response)),
                ..Self::default()
            }
        }

        /// Environment whose credential exchange fails with `message`
        #[must_use]
        pub fn rejecting_login(message: impl Into<String>) -> Self {
            Self {
                login_result: Some(Err(message.into())),
                ..Self::default()
            }
        }

        /// Snapshot of the storage cell
        ///
        /// # Panics
        ///
        /// Never panics; a poisoned lock is recovered.
        #[must_use]
        pub fn stored_session(&self) -> Option<PersistedSession> {
            self.stored
                .lock()
                .unwrap_or_else(PoisonError::into_inner)
                .clone()
        }
    }

    impl AuthEnvironment for MockAuthEnvironment {
        fn exchange_credentials(&self, _username: String, _password: String) -> Effect<AuthAction> {
            let result = self.login_result.clone();
            Effect::future(async move {
                match result {
                    Some(Ok(response)) => Some(AuthAction::LoginSucceeded { response }),
                    Some(Err(error)) => Some(AuthAction::LoginFailed { error }),
                    None => None,
                }
            })
        }

        fn exchange_refresh_token(&self, _refresh_token: String) -> Effect<AuthAction> {
            let result = self.refresh_result.clone();
            Effect::future(async move {
                match result {
                    Some(Ok(response)) => Some(AuthAction::RefreshSucceeded { response }),
                    Some(Err(error)) => Some(AuthAction::RefreshFailed { error }),
                    None => None,
                }
            })
        }

        fn load_session(&self) -> Effect<AuthAction> {
            let stored = Arc::clone(&self.stored);
            Effect::future(async move {
                let session = stored.lock().unwrap_or_else(PoisonError::into_inner).clone();
                Some(AuthAction::HydrationLoaded { session })
            })
        }

        fn save_session(&self, session: Option<PersistedSession>) -> Effect<AuthAction> {
            let stored = Arc::clone(&self.stored);
            Effect::future(async move {
                *stored.lock().unwrap_or_else(PoisonError::into_inner) = session;
                None
            })
        }
    }
}
