//! # Seal Viewer Auth
//!
//! Identity token codec and session store for the seal viewer.
//!
//! The session store owns the client's authentication state: the current
//! identity token, the refresh token paired with it, and a login-in-progress
//! flag. State changes flow through [`AuthReducer`]; network exchanges and
//! durable storage are reached only through [`AuthEnvironment`] effects.
//!
//! ## Lifecycle
//!
//! 1. Send [`AuthAction::Hydrate`] after store creation; the stored session
//!    blob (if any) is decoded and installed, and `hydrated` flips to true.
//! 2. [`AuthAction::Login`] exchanges credentials; success installs the
//!    token, failure clears the session and records a message. Neither path
//!    raises - callers read the outcome from state.
//! 3. [`AuthAction::Refresh`] trades the held refresh token for a fresh
//!    identity token; rotation of the refresh token is optional server-side.
//! 4. [`AuthAction::Logout`] clears the session with no network call.
//!
//! Every durable mutation is mirrored to storage through a save effect.

pub mod actions;
pub mod environment;
pub mod reducer;
pub mod state;
pub mod storage;
pub mod token;

pub use actions::AuthAction;
pub use environment::{AuthEnvironment, LiveAuthEnvironment, mocks::MockAuthEnvironment};
pub use reducer::AuthReducer;
pub use state::{AuthState, PersistedSession};
pub use storage::{JsonFileStorage, MemoryStorage, SessionStorage, StorageError};
pub use token::{Header, IdToken, Payload, TokenError};
