//! Navigation decision
//!
//! "Where should the user be" is a pure function of the session snapshot
//! and the clock. Performing the navigation is the UI shell's job; the
//! reducer only records the decision in state.

use chrono::{DateTime, Utc};
use seal_viewer_auth::AuthState;

/// Where the gallery view should send the user
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NavigationTarget {
    /// Stay on the gallery view
    Gallery,

    /// Redirect to the login view
    Login,

    /// Hydration has not finished; defer the decision
    Pending,
}

/// Decide the navigation target for the gallery view
///
/// Deferred until hydration completes so stored credentials are not
/// mistaken for a logged-out state. After that, a missing or expired
/// token sends the user to login.
#[must_use]
pub fn navigation_target(session: &AuthState, now: DateTime<Utc>) -> NavigationTarget {
    if !session.hydrated {
        return NavigationTarget::Pending;
    }
    if session.is_authenticated(now) {
        NavigationTarget::Gallery
    } else {
        NavigationTarget::Login
    }
}
