//! # Seal Viewer Runtime
//!
//! Store runtime for the seal-viewer architecture.
//!
//! This crate provides the Store that coordinates reducer execution and
//! effect handling:
//!
//! - **Store**: manages state and executes effects
//! - **Effect executor**: runs effect descriptions and feeds actions back
//! - **Subscription**: a `watch`-based observer stream of state snapshots,
//!   used by the UI shell to defer rendering until hydration completes
//!
//! ## Example
//!
//! ```ignore
//! use seal_viewer_runtime::Store;
//!
//! let store = Store::new(initial_state, my_reducer, environment);
//!
//! let handle = store.send(Action::DoSomething).await?;
//! handle.wait().await;
//!
//! let value = store.state(|s| s.some_field).await;
//! ```

use seal_viewer_core::{effect::Effect, reducer::Reducer};
use std::sync::Arc;
use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
use std::time::Duration;
use tokio::sync::{RwLock, watch};

/// Error types for the Store runtime
pub mod error {
    use thiserror::Error;

    /// Errors that can occur during Store operations
    #[derive(Error, Debug)]
    pub enum StoreError {
        /// Store is shutting down and not accepting new actions
        #[error("Store is shutting down")]
        ShutdownInProgress,

        /// Shutdown timed out waiting for effects to complete
        ///
        /// Some effects were still running when the timeout elapsed.
        #[error("Shutdown timed out with {0} effects still running")]
        ShutdownTimeout(usize),

        /// Timeout waiting for effects to complete
        #[error("Timeout waiting for effects")]
        Timeout,
    }
}

pub use error::StoreError;

/// Handle for tracking effect completion
///
/// Returned by [`Store::send()`] to allow waiting for effects to complete.
/// Tracking is transitive: effects spawned by feedback actions are counted
/// against the same handle, so `wait()` returns only when the whole cascade
/// is done.
///
/// # Example
///
/// ```ignore
/// let handle = store.send(Action::Start).await?;
/// handle.wait_with_timeout(Duration::from_secs(5)).await?;
/// ```
#[derive(Clone)]
pub struct EffectHandle {
    effects: Arc<AtomicUsize>,
    completion: watch::Receiver<()>,
}

impl EffectHandle {
    fn new() -> (Self, EffectTracking) {
        let counter = Arc::new(AtomicUsize::new(0));
        let (tx, rx) = watch::channel(());

        let handle = Self {
            effects: Arc::clone(&counter),
            completion: rx,
        };

        let tracking = EffectTracking {
            counter,
            notifier: Arc::new(tx),
        };

        (handle, tracking)
    }

    /// Create a handle that's already complete
    ///
    /// Useful for initialization in loops where you need a `last_handle`.
    #[must_use]
    pub fn completed() -> Self {
        let (tx, rx) = watch::channel(());
        let _ = tx.send(());

        Self {
            effects: Arc::new(AtomicUsize::new(0)),
            completion: rx,
        }
    }

    /// Wait for all effects (including cascading feedback effects) to finish
    pub async fn wait(&mut self) {
        while self.effects.load(Ordering::SeqCst) > 0 {
            if self.completion.changed().await.is_err() {
                // Notifier dropped - nothing left to wait for.
                break;
            }
        }
    }

    /// Wait for all effects to complete with a timeout
    ///
    /// # Errors
    ///
    /// Returns [`StoreError::Timeout`] if the timeout expires before all
    /// effects complete.
    pub async fn wait_with_timeout(&mut self, timeout: Duration) -> Result<(), StoreError> {
        tokio::time::timeout(timeout, self.wait())
            .await
            .map_err(|_| StoreError::Timeout)
    }
}

impl std::fmt::Debug for EffectHandle {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("EffectHandle")
            .field("pending_effects", &self.effects.load(Ordering::SeqCst))
            .finish_non_exhaustive()
    }
}

/// Internal: effect tracking context passed through effect execution
#[derive(Clone)]
struct EffectTracking {
    counter: Arc<AtomicUsize>,
    notifier: Arc<watch::Sender<()>>,
}

impl EffectTracking {
    fn increment(&self) {
        self.counter.fetch_add(1, Ordering::SeqCst);
    }

    fn decrement(&self) {
        if self.counter.fetch_sub(1, Ordering::SeqCst) == 1 {
            // Counter reached zero, notify waiters
            let _ = self.notifier.send(());
        }
    }
}

/// Internal: RAII guard that decrements the effect counter on drop
///
/// Ensures the counter is always decremented, even if the effect panics.
struct DecrementGuard(EffectTracking);

impl Drop for DecrementGuard {
    fn drop(&mut self) {
        self.0.decrement();
    }
}

struct Inner<S, A, E, R>
where
    R: Reducer<State = S, Action = A, Environment = E>,
{
    state: RwLock<S>,
    reducer: R,
    environment: E,
    shutdown: AtomicBool,
    pending_effects: AtomicUsize,
    /// Snapshot broadcast for state observers.
    ///
    /// Every applied action publishes a fresh snapshot. Receivers only see
    /// the latest value, which is exactly the semantics a render loop wants.
    observers: watch::Sender<S>,
}

/// The Store - runtime coordinator for a reducer
///
/// The Store manages:
/// 1. State (behind `RwLock` for concurrent access)
/// 2. Reducer (feature logic)
/// 3. Environment (injected dependencies)
/// 4. Effect execution (with action feedback loop)
///
/// Concurrent `send()` calls serialize at the reducer: the reducer runs
/// synchronously while holding the write lock, so state transitions are
/// applied atomically per action. Effects execute on spawned tasks and may
/// complete in non-deterministic order.
pub struct Store<S, A, E, R>
where
    R: Reducer<State = S, Action = A, Environment = E>,
{
    inner: Arc<Inner<S, A, E, R>>,
}

impl<S, A, E, R> Clone for Store<S, A, E, R>
where
    R: Reducer<State = S, Action = A, Environment = E>,
{
    fn clone(&self) -> Self {
        Self {
            inner: Arc::clone(&self.inner),
        }
    }
}

impl<S, A, E, R> Store<S, A, E, R>
where
    R: Reducer<State = S, Action = A, Environment = E> + Send + Sync + 'static,
    A: Send + 'static,
    S: Clone + Send + Sync + 'static,
    E: Send + Sync + 'static,
{
    /// Create a new store with initial state, reducer, and environment
    #[must_use]
    pub fn new(initial_state: S, reducer: R, environment: E) -> Self {
        let (observers, _) = watch::channel(initial_state.clone());

        Self {
            inner: Arc::new(Inner {
                state: RwLock::new(initial_state),
                reducer,
                environment,
                shutdown: AtomicBool::new(false),
                pending_effects: AtomicUsize::new(0),
                observers,
            }),
        }
    }

    /// Send an action to the store
    ///
    /// 1. Acquires the write lock on state
    /// 2. Calls the reducer with (state, action, environment)
    /// 3. Publishes a state snapshot to subscribers
    /// 4. Executes returned effects asynchronously; effects may produce more
    ///    actions (feedback loop), which are tracked against the returned
    ///    handle
    ///
    /// `send()` returns after starting effect execution, not completion.
    /// Use the returned [`EffectHandle`] to wait.
    ///
    /// # Errors
    ///
    /// Returns [`StoreError::ShutdownInProgress`] if the store is shutting
    /// down.
    pub async fn send(&self, action: A) -> Result<EffectHandle, StoreError> {
        if self.inner.shutdown.load(Ordering::Acquire) {
            return Err(StoreError::ShutdownInProgress);
        }

        metrics::counter!("store.actions").increment(1);

        let (handle, tracking) = EffectHandle::new();
        Inner::process(&self.inner, action, &tracking).await;
        Ok(handle)
    }

    /// Read a projection of the current state
    pub async fn state<F, T>(&self, f: F) -> T
    where
        F: FnOnce(&S) -> T,
    {
        let state = self.inner.state.read().await;
        f(&state)
    }

    /// Subscribe to state snapshots
    ///
    /// The receiver always holds the latest snapshot; `changed()` resolves
    /// whenever an action has been applied since the last read.
    #[must_use]
    pub fn subscribe(&self) -> watch::Receiver<S> {
        self.inner.observers.subscribe()
    }

    /// Initiate graceful shutdown of the store
    ///
    /// Sets the shutdown flag (rejecting new actions), then waits for
    /// pending effects to complete.
    ///
    /// # Errors
    ///
    /// Returns [`StoreError::ShutdownTimeout`] if the timeout expires before
    /// all pending effects complete.
    pub async fn shutdown(&self, timeout: Duration) -> Result<(), StoreError> {
        tracing::info!("Initiating graceful shutdown");
        metrics::counter!("store.shutdown.initiated").increment(1);

        self.inner.shutdown.store(true, Ordering::Release);

        let start = tokio::time::Instant::now();
        let poll_interval = Duration::from_millis(100);

        loop {
            let pending = self.inner.pending_effects.load(Ordering::Acquire);

            if pending == 0 {
                tracing::info!("All effects completed, shutdown successful");
                metrics::counter!("store.shutdown.completed").increment(1);
                return Ok(());
            }

            if start.elapsed() >= timeout {
                tracing::error!(pending_effects = pending, "Shutdown timeout");
                metrics::counter!("store.shutdown.timeout").increment(1);
                return Err(StoreError::ShutdownTimeout(pending));
            }

            tokio::time::sleep(poll_interval).await;
        }
    }
}

impl<S, A, E, R> Inner<S, A, E, R>
where
    R: Reducer<State = S, Action = A, Environment = E> + Send + Sync + 'static,
    A: Send + 'static,
    S: Clone + Send + Sync + 'static,
    E: Send + Sync + 'static,
{
    /// Apply one action and start its effects
    async fn process(inner: &Arc<Self>, action: A, tracking: &EffectTracking) {
        let effects = {
            let mut state = inner.state.write().await;
            let effects = inner.reducer.reduce(&mut state, action, &inner.environment);
            // Publish while still serialized behind the write lock so
            // observers see snapshots in application order.
            let _ = inner.observers.send_replace(state.clone());
            effects
        };

        for effect in effects {
            Self::spawn_effect(inner, effect, tracking.clone());
        }
    }

    /// Spawn a single effect onto the runtime
    fn spawn_effect(inner: &Arc<Self>, effect: Effect<A>, tracking: EffectTracking) {
        if matches!(effect, Effect::None) {
            return;
        }

        tracking.increment();
        inner.pending_effects.fetch_add(1, Ordering::SeqCst);
        metrics::counter!("store.effects.spawned").increment(1);

        let inner = Arc::clone(inner);
        tokio::spawn(async move {
            let guard = DecrementGuard(tracking.clone());
            Self::execute_effect(&inner, effect, &tracking).await;
            inner.pending_effects.fetch_sub(1, Ordering::SeqCst);
            drop(guard);
        });
    }

    /// Execute an effect, feeding produced actions back into the reducer
    fn execute_effect<'a>(
        inner: &'a Arc<Self>,
        effect: Effect<A>,
        tracking: &'a EffectTracking,
    ) -> std::pin::Pin<Box<dyn std::future::Future<Output = ()> + Send + 'a>> {
        Box::pin(async move {
            match effect {
                Effect::None => {},
                Effect::Parallel(effects) => {
                    for effect in effects {
                        Self::spawn_effect(inner, effect, tracking.clone());
                    }
                },
                Effect::Sequential(effects) => {
                    for effect in effects {
                        Self::execute_effect(inner, effect, tracking).await;
                    }
                },
                Effect::Delay { duration, action } => {
                    tokio::time::sleep(duration).await;
                    Self::process(inner, *action, tracking).await;
                },
                Effect::Future(future) => {
                    if let Some(action) = future.await {
                        Self::process(inner, action, tracking).await;
                    }
                },
            }
        })
    }
}
