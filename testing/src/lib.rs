//! # Seal Viewer Testing
//!
//! Testing utilities and helpers for the seal-viewer architecture.
//!
//! This crate provides:
//! - Mock implementations of environment traits (`FixedClock`)
//! - A fluent Given/When/Then harness for reducers ([`ReducerTest`])
//! - Assertion helpers for effect lists

use chrono::{DateTime, Utc};
use seal_viewer_core::environment::Clock;

/// Mock implementations for testing.
pub mod mocks {
    use super::{Clock, DateTime, Utc};

    /// Fixed clock for deterministic tests
    ///
    /// Always returns the same time, making tests reproducible.
    ///
    /// # Example
    ///
    /// ```
    /// use seal_viewer_testing::mocks::FixedClock;
    /// use seal_viewer_core::environment::Clock;
    /// use chrono::Utc;
    ///
    /// let clock = FixedClock::new(Utc::now());
    /// assert_eq!(clock.now(), clock.now());
    /// ```
    #[derive(Debug, Clone)]
    pub struct FixedClock {
        time: DateTime<Utc>,
    }

    impl FixedClock {
        /// Create a new fixed clock with the given time
        #[must_use]
        pub const fn new(time: DateTime<Utc>) -> Self {
            Self { time }
        }
    }

    impl Clock for FixedClock {
        fn now(&self) -> DateTime<Utc> {
            self.time
        }
    }

    /// Create a default fixed clock for tests (2025-01-01 00:00:00 UTC)
    ///
    /// # Panics
    ///
    /// Panics if the hardcoded timestamp fails to parse, which should never
    /// happen in practice.
    #[must_use]
    #[allow(clippy::expect_used)]
    pub fn test_clock() -> FixedClock {
        FixedClock::new(
            DateTime::parse_from_rfc3339("2025-01-01T00:00:00Z")
                .expect("hardcoded timestamp should always parse")
                .with_timezone(&Utc),
        )
    }
}

pub use mocks::{FixedClock, test_clock};
pub use reducer_test::{ReducerTest, assertions};

/// Fluent reducer test harness with Given-When-Then syntax
pub mod reducer_test {
    #![allow(clippy::module_name_repetitions)] // ReducerTest is the natural name

    use seal_viewer_core::{effect::Effect, reducer::Reducer};

    /// Type alias for state assertion functions
    type StateAssertion<S> = Box<dyn FnOnce(&S)>;

    /// Type alias for effect assertion functions
    type EffectAssertion<A> = Box<dyn FnOnce(&[Effect<A>])>;

    /// Fluent API for testing reducers
    ///
    /// # Example
    ///
    /// ```ignore
    /// ReducerTest::new(LoadingReducer)
    ///     .with_env(())
    ///     .given_state(LoadingState::default())
    ///     .when_action(LoadingAction::SetLoading(true))
    ///     .then_state(|state| assert!(state.is_loading))
    ///     .then_effects(assertions::assert_no_effects)
    ///     .run();
    /// ```
    pub struct ReducerTest<R, S, A, E>
    where
        R: Reducer<State = S, Action = A, Environment = E>,
    {
        reducer: R,
        environment: Option<E>,
        initial_state: Option<S>,
        action: Option<A>,
        state_assertions: Vec<StateAssertion<S>>,
        effect_assertions: Vec<EffectAssertion<A>>,
    }

    impl<R, S, A, E> ReducerTest<R, S, A, E>
    where
        R: Reducer<State = S, Action = A, Environment = E>,
    {
        /// Create a new reducer test with the given reducer
        #[must_use]
        pub const fn new(reducer: R) -> Self {
            Self {
                reducer,
                environment: None,
                initial_state: None,
                action: None,
                state_assertions: Vec::new(),
                effect_assertions: Vec::new(),
            }
        }

        /// Set the environment for the test
        #[must_use]
        pub fn with_env(mut self, env: E) -> Self {
            self.environment = Some(env);
            self
        }

        /// Set the initial state (Given)
        #[must_use]
        pub fn given_state(mut self, state: S) -> Self {
            self.initial_state = Some(state);
            self
        }

        /// Set the action to test (When)
        #[must_use]
        pub fn when_action(mut self, action: A) -> Self {
            self.action = Some(action);
            self
        }

        /// Add an assertion about the resulting state (Then)
        #[must_use]
        pub fn then_state<F>(mut self, assertion: F) -> Self
        where
            F: FnOnce(&S) + 'static,
        {
            self.state_assertions.push(Box::new(assertion));
            self
        }

        /// Add an assertion about the resulting effects (Then)
        #[must_use]
        pub fn then_effects<F>(mut self, assertion: F) -> Self
        where
            F: FnOnce(&[Effect<A>]) + 'static,
        {
            self.effect_assertions.push(Box::new(assertion));
            self
        }

        /// Run the test and execute all assertions
        ///
        /// # Panics
        ///
        /// Panics if initial state, action, or environment is not set,
        /// or if any assertion fails.
        #[allow(clippy::expect_used)] // Test code can use expect
        pub fn run(self) {
            let mut state = self
                .initial_state
                .expect("Initial state must be set with given_state()");

            let action = self.action.expect("Action must be set with when_action()");

            let env = self
                .environment
                .expect("Environment must be set with with_env()");

            let effects = self.reducer.reduce(&mut state, action, &env);

            for assertion in self.state_assertions {
                assertion(&state);
            }

            for assertion in self.effect_assertions {
                assertion(&effects);
            }
        }
    }

    /// Helper assertions for effects
    pub mod assertions {
        use seal_viewer_core::effect::Effect;

        /// Assert that there are no effects
        ///
        /// # Panics
        ///
        /// Panics if the effect list is not empty.
        #[allow(clippy::panic)] // Test assertion
        pub fn assert_no_effects<A: std::fmt::Debug>(effects: &[Effect<A>]) {
            assert!(
                effects.is_empty() || matches!(effects, [Effect::None]),
                "Expected no effects, but found {}: {:?}",
                effects.len(),
                effects
            );
        }

        /// Assert the number of effects
        ///
        /// # Panics
        ///
        /// Panics if the number of effects doesn't match the expectation.
        pub fn assert_effects_count<A>(effects: &[Effect<A>], expected: usize) {
            assert_eq!(
                effects.len(),
                expected,
                "Expected {} effects, but found {}",
                expected,
                effects.len()
            );
        }

        /// Assert that effects contain at least one Future effect
        ///
        /// # Panics
        ///
        /// Panics if no Future effect is found.
        pub fn assert_has_future_effect<A>(effects: &[Effect<A>]) {
            assert!(
                effects.iter().any(|e| matches!(e, Effect::Future(_))),
                "Expected at least one Future effect, but none found"
            );
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use seal_viewer_core::{SmallVec, effect::Effect, reducer::Reducer, smallvec};

    #[derive(Clone, Debug)]
    struct TestState {
        count: i32,
    }

    #[derive(Clone, Debug)]
    enum TestAction {
        Increment,
        Kick,
    }

    struct TestReducer;

    impl Reducer for TestReducer {
        type State = TestState;
        type Action = TestAction;
        type Environment = ();

        fn reduce(
            &self,
            state: &mut Self::State,
            action: Self::Action,
            _env: &Self::Environment,
        ) -> SmallVec<[Effect<Self::Action>; 4]> {
            match action {
                TestAction::Increment => {
                    state.count += 1;
                    SmallVec::new()
                },
                TestAction::Kick => {
                    smallvec![Effect::future(async { Some(TestAction::Increment) })]
                },
            }
        }
    }

    #[test]
    fn fixed_clock_is_deterministic() {
        let clock = test_clock();
        assert_eq!(
            seal_viewer_core::environment::Clock::now(&clock),
            seal_viewer_core::environment::Clock::now(&clock)
        );
    }

    #[test]
    fn harness_runs_state_and_effect_assertions() {
        ReducerTest::new(TestReducer)
            .with_env(())
            .given_state(TestState { count: 0 })
            .when_action(TestAction::Increment)
            .then_state(|state| assert_eq!(state.count, 1))
            .then_effects(assertions::assert_no_effects)
            .run();
    }

    #[test]
    fn harness_sees_future_effects() {
        ReducerTest::new(TestReducer)
            .with_env(())
            .given_state(TestState { count: 0 })
            .when_action(TestAction::Kick)
            .then_effects(|effects| {
                assertions::assert_effects_count(effects, 1);
                assertions::assert_has_future_effect(effects);
            })
            .run();
    }
}
