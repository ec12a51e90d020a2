//! Session actions
//!
//! Commands express user intent (`Login`, `Logout`); events carry the
//! results of async operations back into the reducer (`LoginSucceeded`,
//! `HydrationLoaded`). Actions are the only way to mutate session state.

use crate::state::PersistedSession;
use seal_viewer_api::AuthResponse;

/// All possible inputs to the session reducer
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AuthAction {
    /// Begin restoring session state from durable storage
    Hydrate,

    /// Restoration finished
    ///
    /// `session` is `None` when storage holds no blob. Carried as the raw
    /// persisted form; the reducer decodes the token and treats a decode
    /// failure as "not logged in".
    HydrationLoaded {
        /// The stored session blob, if any
        session: Option<PersistedSession>,
    },

    /// Exchange credentials for a token
    Login {
        /// Account name
        username: String,
        /// Account password
        password: String,
    },

    /// Credential exchange returned HTTP success
    LoginSucceeded {
        /// The backend's auth response
        response: AuthResponse,
    },

    /// Credential exchange was rejected or never reached the backend
    LoginFailed {
        /// Human-readable failure message
        error: String,
    },

    /// Exchange the held refresh token for a fresh identity token
    Refresh,

    /// Refresh exchange returned HTTP success
    RefreshSucceeded {
        /// The backend's auth response
        response: AuthResponse,
    },

    /// Refresh exchange was rejected or never reached the backend
    RefreshFailed {
        /// Human-readable failure message
        error: String,
    },

    /// Clear the session immediately, no network call
    Logout,
}
