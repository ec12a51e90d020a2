//! Gallery environment - injected dependencies
//!
//! The gallery reducer reads the session through a snapshot, drives the
//! shared loading flag through effects, and reaches the backend only
//! through [`GalleryEnvironment::fetch_images`].

use crate::actions::GalleryAction;
use crate::loading::{LoadingAction, LoadingReducer, LoadingState};
use chrono::{DateTime, Utc};
use seal_viewer_api::ApiClient;
use seal_viewer_auth::AuthState;
use seal_viewer_core::effect::Effect;
use seal_viewer_core::environment::Clock;
use seal_viewer_runtime::Store;
use std::sync::Arc;
use tokio::sync::watch;

/// Handle to the process-wide loading store
pub type LoadingStore = Store<LoadingState, LoadingAction, (), LoadingReducer>;

/// Dependencies of the gallery reducer
pub trait GalleryEnvironment: Send + Sync {
    /// Current time
    fn now(&self) -> DateTime<Utc>;

    /// Snapshot of the session store's state
    fn session(&self) -> AuthState;

    /// Issue an authenticated image listing query
    ///
    /// Resolves to [`GalleryAction::ImagesLoaded`] or
    /// [`GalleryAction::SearchFailed`], both carrying `seq`.
    fn fetch_images(&self, seal_id: String, id_token: String, seq: u64) -> Effect<GalleryAction>;

    /// Drive the shared loading flag
    fn set_loading(&self, loading: bool) -> Effect<GalleryAction>;
}

/// Production environment wiring the backend client, the session store's
/// snapshot channel, and the loading store together.
#[derive(Clone)]
pub struct LiveGalleryEnvironment {
    api: ApiClient,
    session: watch::Receiver<AuthState>,
    loading: LoadingStore,
    clock: Arc<dyn Clock>,
}

impl LiveGalleryEnvironment {
    /// Create a production environment
    ///
    /// `session` is the snapshot channel obtained from the session
    /// store's `subscribe()`.
    pub fn new(
        api: ApiClient,
        session: watch::Receiver<AuthState>,
        loading: LoadingStore,
        clock: Arc<dyn Clock>,
    ) -> Self {
        Self {
            api,
            session,
            loading,
            clock,
        }
    }
}

impl GalleryEnvironment for LiveGalleryEnvironment {
    fn now(&self) -> DateTime<Utc> {
        self.clock.now()
    }

    fn session(&self) -> AuthState {
        self.session.borrow().clone()
    }

    fn fetch_images(&self, seal_id: String, id_token: String, seq: u64) -> Effect<GalleryAction> {
        let api = self.api.clone();
        Effect::future(async move {
            match api.fetch_images(&seal_id, &id_token).await {
                Ok(images) => Some(GalleryAction::ImagesLoaded { seq, images }),
                Err(e) => {
                    tracing::warn!(seal_id, error = %e, "Image query failed");
                    Some(GalleryAction::SearchFailed {
                        seq,
                        error: e.to_string(),
                    })
                },
            }
        })
    }

    fn set_loading(&self, loading: bool) -> Effect<GalleryAction> {
        let store = self.loading.clone();
        Effect::future(async move {
            if store
                .send(LoadingAction::SetLoading(loading))
                .await
                .is_err()
            {
                tracing::debug!("Loading store is shut down");
            }
            None
        })
    }
}

/// Scripted environment for tests
pub mod mocks {
    use super::{AuthState, DateTime, Effect, GalleryAction, GalleryEnvironment, Utc};
    use seal_viewer_api::ImageDescriptor;
    use std::sync::{Arc, Mutex, PoisonError};

    /// Environment with a fixed clock, a fixed session snapshot, and a
    /// preset query outcome. Loading transitions are recorded for
    /// inspection instead of being forwarded anywhere.
    #[derive(Debug, Clone)]
    pub struct MockGalleryEnvironment {
        /// Time returned by `now()`
        pub now: DateTime<Utc>,

        /// Session snapshot returned by `session()`
        pub session: AuthState,

        /// Outcome of the next query
        pub images_result: Option<Result<Vec<ImageDescriptor>, String>>,

        /// Every `set_loading` call, in order
        pub loading_log: Arc<Mutex<Vec<bool>>>,

        /// Number of queries issued
        pub fetch_count: Arc<Mutex<usize>>,
    }

    impl MockGalleryEnvironment {
        /// Environment with the given session snapshot and no scripted query
        #[must_use]
        pub fn with_session(session: AuthState, now: DateTime<Utc>) -> Self {
            Self {
                now,
                session,
                images_result: None,
                loading_log: Arc::new(Mutex::new(Vec::new())),
                fetch_count: Arc::new(Mutex::new(0)),
            }
        }

        /// Loading transitions recorded so far
        #[must_use]
        pub fn loading_transitions(&self) -> Vec<bool> {
            self.loading_log
                .lock()
                .unwrap_or_else(PoisonError::into_inner)
                .clone()
        }

        /// Number of queries issued so far
        #[must_use]
        pub fn fetches(&self) -> usize {
            *self
                .fetch_count
                .lock()
                .unwrap_or_else(PoisonError::into_inner)
        }
    }

    impl GalleryEnvironment for MockGalleryEnvironment {
        fn now(&self) -> DateTime<Utc> {
            self.now
        }

        fn session(&self) -> AuthState {
            self.session.clone()
        }

        fn fetch_images(
            &self,
            _seal_id: String,
            _id_token: String,
            seq: u64,
        ) -> Effect<GalleryAction> {
            *self
                .fetch_count
                .lock()
                .unwrap_or_else(PoisonError::into_inner) += 1;

            let result = self.images_result.clone();
            Effect::future(async move {
                match result {
                    Some(Ok(images)) => Some(GalleryAction::ImagesLoaded { seq, images }),
                    Some(Err(error)) => Some(GalleryAction::SearchFailed { seq, error }),
                    None => None,
                }
            })
        }

        fn set_loading(&self, loading: bool) -> Effect<GalleryAction> {
            self.loading_log
                .lock()
                .unwrap_or_else(PoisonError::into_inner)
                .push(loading);
            Effect::None
        }
    }
}
