//! # Seal Viewer Gallery
//!
//! Gallery view controller and shared loading store.
//!
//! The view controller orchestrates three concerns:
//!
//! - **Auth guard**: once the session is hydrated, a missing or expired
//!   token produces a login redirect decision. The guard runs at mount
//!   and again on every search submit.
//! - **Search**: submit bumps a request sequence number, flips the shared
//!   loading flag, and issues an authenticated listing query. Responses
//!   carrying a stale sequence are dropped, so the visible list always
//!   reflects the last query issued.
//! - **Lightbox cursor**: an optional index into the current list.
//!   Navigation clamps at both ends; any list replacement clears it.
//!
//! Navigation itself is the UI shell's job: the reducer only records a
//! [`NavigationTarget`] in state.

pub mod actions;
pub mod environment;
pub mod loading;
pub mod navigation;
pub mod reducer;
pub mod state;

pub use actions::GalleryAction;
pub use environment::{
    GalleryEnvironment, LiveGalleryEnvironment, LoadingStore, mocks::MockGalleryEnvironment,
};
pub use loading::{LoadingAction, LoadingReducer, LoadingState};
pub use navigation::{NavigationTarget, navigation_target};
pub use reducer::GalleryReducer;
pub use state::GalleryState;
