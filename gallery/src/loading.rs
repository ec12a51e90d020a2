//! Process-wide loading flag
//!
//! A single boolean with a setter, deliberately free of business logic.
//! It exists so login and search can share one spinner indicator without
//! the session store and the image-query flow knowing about each other.

use seal_viewer_core::SmallVec;
use seal_viewer_core::effect::Effect;
use seal_viewer_core::reducer::Reducer;

/// State of the shared loading indicator
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct LoadingState {
    /// Whether any network operation is currently in flight
    pub is_loading: bool,
}

/// Inputs to the loading reducer
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LoadingAction {
    /// Set the flag
    SetLoading(bool),
}

/// Reducer for the loading flag
#[derive(Debug, Clone, Copy, Default)]
pub struct LoadingReducer;

impl Reducer for LoadingReducer {
    type State = LoadingState;
    type Action = LoadingAction;
    type Environment = ();

    fn reduce(
        &self,
        state: &mut Self::State,
        action: Self::Action,
        _env: &Self::Environment,
    ) -> SmallVec<[Effect<Self::Action>; 4]> {
        match action {
            LoadingAction::SetLoading(flag) => state.is_loading = flag,
        }
        SmallVec::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use seal_viewer_testing::{ReducerTest, assertions};

    #[test]
    fn set_loading_flips_the_flag() {
        ReducerTest::new(LoadingReducer)
            .with_env(())
            .given_state(LoadingState::default())
            .when_action(LoadingAction::SetLoading(true))
            .then_state(|state| assert!(state.is_loading))
            .then_effects(assertions::assert_no_effects)
            .run();
    }

    #[test]
    fn set_loading_is_idempotent() {
        ReducerTest::new(LoadingReducer)
            .with_env(())
            .given_state(LoadingState { is_loading: true })
            .when_action(LoadingAction::SetLoading(true))
            .then_state(|state| assert!(state.is_loading))
            .run();
    }
}
