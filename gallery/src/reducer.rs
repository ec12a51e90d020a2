//! Gallery reducer
//!
//! The view controller's state machine over three orthogonal axes: the
//! auth guard, the search flow, and the lightbox cursor. The guard runs
//! at mount and again on every submit; queries are sequence-numbered so
//! the list always reflects the last query issued.

use crate::actions::GalleryAction;
use crate::environment::GalleryEnvironment;
use crate::navigation::{NavigationTarget, navigation_target};
use crate::state::GalleryState;
use seal_viewer_core::effect::Effect;
use seal_viewer_core::reducer::Reducer;
use seal_viewer_core::{SmallVec, smallvec};
use std::sync::Arc;

/// Reducer for the gallery view controller
#[derive(Debug, Clone, Copy, Default)]
pub struct GalleryReducer;

impl Reducer for GalleryReducer {
    type State = GalleryState;
    type Action = GalleryAction;
    type Environment = Arc<dyn GalleryEnvironment>;

    fn reduce(
        &self,
        state: &mut Self::State,
        action: Self::Action,
        env: &Self::Environment,
    ) -> SmallVec<[Effect<Self::Action>; 4]> {
        match action {
            GalleryAction::Mounted => {
                // The guard re-runs only here and on submit; a token
                // expiring mid-session is caught on the next search.
                match navigation_target(&env.session(), env.now()) {
                    NavigationTarget::Login => {
                        state.pending_navigation = Some(NavigationTarget::Login);
                    },
                    NavigationTarget::Gallery | NavigationTarget::Pending => {},
                }
                SmallVec::new()
            },

            GalleryAction::SealIdChanged(seal_id) => {
                state.seal_id = seal_id;
                SmallVec::new()
            },

            GalleryAction::Submit => {
                let session = env.session();
                let now = env.now();
                match session.token {
                    Some(token) if !token.is_expired(now) => {
                        state.request_seq += 1;
                        state.last_error = None;
                        tracing::debug!(seal_id = %state.seal_id, seq = state.request_seq, "Search submitted");
                        smallvec![
                            env.set_loading(true),
                            env.fetch_images(state.seal_id.clone(), token.raw, state.request_seq),
                        ]
                    },
                    _ => {
                        // Expired or missing token: redirect without a
                        // network call. Loading was never set, so there
                        // is nothing to reset.
                        state.pending_navigation = Some(NavigationTarget::Login);
                        SmallVec::new()
                    },
                }
            },

            GalleryAction::ImagesLoaded { seq, images } => {
                if seq != state.request_seq {
                    tracing::debug!(seq, current = state.request_seq, "Dropping stale listing");
                    return SmallVec::new();
                }
                state.images = images;
                state.selected = None;
                state.last_error = None;
                smallvec![env.set_loading(false)]
            },

            GalleryAction::SearchFailed { seq, error } => {
                if seq != state.request_seq {
                    tracing::debug!(seq, current = state.request_seq, "Dropping stale failure");
                    return SmallVec::new();
                }
                tracing::warn!(error, "Search failed");
                state.images.clear();
                state.selected = None;
                state.last_error = Some(error);
                smallvec![env.set_loading(false)]
            },

            GalleryAction::Select(index) => {
                if index < state.images.len() {
                    state.selected = Some(index);
                }
                SmallVec::new()
            },

            GalleryAction::NextImage => {
                let last = state.images.len().saturating_sub(1);
                state.selected = state.selected.map(|index| usize::min(index + 1, last));
                SmallVec::new()
            },

            GalleryAction::PrevImage => {
                state.selected = state.selected.map(|index| index.saturating_sub(1));
                SmallVec::new()
            },

            GalleryAction::CloseLightbox => {
                state.selected = None;
                SmallVec::new()
            },

            GalleryAction::NavigationHandled => {
                state.pending_navigation = None;
                SmallVec::new()
            },
        }
    }
}
