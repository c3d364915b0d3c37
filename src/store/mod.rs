//! Typed, composable reducer store.
//!
//! # Architecture
//!
//! ```text
//! Action ──→ Reducer ──→ State ──→ Subscribers
//!    ↑                              │
//!    └──────────────────────────────┘
//! ```
//!
//! - **State**: immutable value behind an `Arc`, replaced on every change
//! - **Action**: an id plus arguments, built by an [`ActionDefinition`]
//! - **Reducer**: pure function from (state, action) to state
//!
//! Change detection is reference equality: a reducer that returns
//! `Arc::clone(state)` produces no notification.

mod action;
mod compose;
mod error;
mod observer;
mod patch;
mod reducer;
mod select;
mod std_actions;

use std::cell::Cell;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Arc, Weak};

use parking_lot::{Mutex, ReentrantMutex, RwLock};

use crate::config::StoreConfig;

pub use action::{define_reducer_action, with_id, Action, ActionArgs, ActionDefinition, ReducerId};
pub use compose::{
    compose_reducers, erase, from_actions_definitions, ComposedReducer, ErasedReducer,
    ReducerEntry,
};
pub use error::StoreError;
pub use observer::{DispatchObserver, TracingObserver};
pub use patch::{patch_state, Patchable};
pub use reducer::{same_state, DispatchAction, FnReducer, Reducer};
pub use std_actions::{reset_state_action, set_state_action, RESET_STATE, SET_STATE};

type CreateState<S> = Arc<dyn Fn() -> S + Send + Sync>;
type Listener<S> = Arc<dyn Fn(&Arc<S>) + Send + Sync>;

/// Everything needed to build a [`Store`].
pub struct StoreDefinition<R: Reducer> {
    pub create_state: CreateState<R::State>,
    pub reduce: R,
    pub on_dispatch: Option<Arc<dyn DispatchObserver>>,
}

impl<R: Reducer> StoreDefinition<R> {
    pub fn new<F>(create_state: F, reduce: R) -> Self
    where
        F: Fn() -> R::State + Send + Sync + 'static,
    {
        Self {
            create_state: Arc::new(create_state),
            reduce,
            on_dispatch: None,
        }
    }

    pub fn with_observer(mut self, observer: impl DispatchObserver + 'static) -> Self {
        self.on_dispatch = Some(Arc::new(observer));
        self
    }
}

/// Outcome of a successful dispatch.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Dispatched {
    /// False when the reducer returned the same state allocation.
    pub changed: bool,
    /// Store version after the dispatch.
    pub version: u64,
}

struct StoreInner<R: Reducer> {
    name: String,
    create_state: CreateState<R::State>,
    reducer: R,
    observer: Option<Arc<dyn DispatchObserver>>,
    state: RwLock<Arc<R::State>>,
    version: AtomicU64,
    /// Held for the whole dispatch. The cell is set while the reducer runs.
    dispatching: ReentrantMutex<Cell<bool>>,
    listeners: Mutex<Vec<(u64, Listener<R::State>)>>,
    next_listener: AtomicU64,
}

/// Shared handle to a reducer store.
///
/// Cloning is cheap and every clone observes the same state. Dispatch runs
/// synchronously to completion; dispatches from different threads are
/// serialised.
pub struct Store<R: Reducer> {
    inner: Arc<StoreInner<R>>,
}

impl<R: Reducer> Clone for Store<R> {
    fn clone(&self) -> Self {
        Self {
            inner: Arc::clone(&self.inner),
        }
    }
}

/// Store driven by a composed table of action definitions.
pub type ActionStore<S> = Store<ComposedReducer<S>>;

impl<R: Reducer> Store<R> {
    /// Create a store. `create_state` runs exactly once here.
    pub fn new(definition: StoreDefinition<R>) -> Self {
        Self::build("store".to_string(), definition)
    }

    /// Create a store named and traced according to `config`.
    ///
    /// The reducer sees the config through [`Reducer::configure`]. With
    /// `trace_dispatch` set and no observer in the definition, a
    /// [`TracingObserver`] is installed.
    pub fn with_config(mut definition: StoreDefinition<R>, config: &StoreConfig) -> Self {
        definition.reduce.configure(config);
        if config.trace_dispatch && definition.on_dispatch.is_none() {
            definition.on_dispatch = Some(Arc::new(TracingObserver::new(config.name.clone())));
        }
        Self::build(config.name.clone(), definition)
    }

    fn build(name: String, definition: StoreDefinition<R>) -> Self {
        let StoreDefinition {
            create_state,
            reduce,
            on_dispatch,
        } = definition;
        let initial = Arc::new(create_state());

        tracing::debug!(store = %name, "Store created");

        Self {
            inner: Arc::new(StoreInner {
                name,
                create_state,
                reducer: reduce,
                observer: on_dispatch,
                state: RwLock::new(initial),
                version: AtomicU64::new(0),
                dispatching: ReentrantMutex::new(Cell::new(false)),
                listeners: Mutex::new(Vec::new()),
                next_listener: AtomicU64::new(0),
            }),
        }
    }

    pub fn name(&self) -> &str {
        &self.inner.name
    }

    /// Current state. Treat it as immutable.
    pub fn get_state(&self) -> Arc<R::State> {
        Arc::clone(&self.inner.state.read())
    }

    /// Number of observable state changes so far.
    pub fn version(&self) -> u64 {
        self.inner.version.load(Ordering::Acquire)
    }

    /// Apply `action` to the current state.
    ///
    /// The observer runs for every accepted dispatch. Subscribers run only
    /// when the reducer returned a different allocation, after the reduction
    /// has finished, and may dispatch themselves.
    ///
    /// # Errors
    /// Returns [`StoreError::ReentrantDispatch`] when called from inside a
    /// reducer. State is unchanged on error.
    ///
    /// # Panics
    /// A panicking reducer propagates to the caller and leaves the previous
    /// state in place.
    pub fn dispatch(&self, action: R::Action) -> Result<Dispatched, StoreError> {
        let dispatching = self.inner.dispatching.lock();
        if dispatching.get() {
            return Err(StoreError::ReentrantDispatch { id: action.id() });
        }

        if let Some(observer) = &self.inner.observer {
            observer.on_dispatch(&action.id(), action.args());
        }

        let prev = self.get_state();
        let next = {
            dispatching.set(true);
            let _reducing = scopeguard::guard(&*dispatching, |flag| flag.set(false));
            self.inner.reducer.reduce(&prev, &action)
        };

        if same_state(&prev, &next) {
            return Ok(Dispatched {
                changed: false,
                version: self.version(),
            });
        }

        let version = self.replace(Arc::clone(&next));
        tracing::debug!(
            store = %self.inner.name,
            action = %action.id(),
            version,
            "State replaced"
        );
        self.notify(&next, version);

        Ok(Dispatched {
            changed: true,
            version,
        })
    }

    /// Replace the state with a fresh `create_state()` value.
    ///
    /// # Errors
    /// Returns [`StoreError::ReentrantDispatch`] when called from inside a
    /// reducer.
    pub fn reset(&self) -> Result<Dispatched, StoreError> {
        let dispatching = self.inner.dispatching.lock();
        if dispatching.get() {
            return Err(StoreError::ReentrantDispatch {
                id: ReducerId::from(RESET_STATE),
            });
        }

        let next = Arc::new((self.inner.create_state)());
        let version = self.replace(Arc::clone(&next));
        tracing::debug!(store = %self.inner.name, version, "State reset");
        self.notify(&next, version);

        Ok(Dispatched {
            changed: true,
            version,
        })
    }

    /// Register a listener for state changes. Dropping the returned
    /// [`Subscription`] releases it.
    pub fn subscribe<F>(&self, listener: F) -> Subscription
    where
        F: Fn(&Arc<R::State>) + Send + Sync + 'static,
    {
        let id = self.inner.next_listener.fetch_add(1, Ordering::Relaxed);
        self.inner.listeners.lock().push((id, Arc::new(listener)));

        let weak = Arc::downgrade(&self.inner);
        let registry: Weak<dyn ListenerRegistry> = weak;
        Subscription {
            id,
            registry: Some(registry),
        }
    }

    pub fn subscriber_count(&self) -> usize {
        self.inner.listeners.lock().len()
    }

    fn replace(&self, next: Arc<R::State>) -> u64 {
        *self.inner.state.write() = next;
        self.inner.version.fetch_add(1, Ordering::AcqRel) + 1
    }

    /// Deliver `state` to every listener. Stops early once a listener has
    /// dispatched a newer state, since that dispatch already notified everyone.
    fn notify(&self, state: &Arc<R::State>, version: u64) {
        let listeners: Vec<_> = self
            .inner
            .listeners
            .lock()
            .iter()
            .map(|(_, listener)| Arc::clone(listener))
            .collect();
        for listener in listeners {
            if self.version() != version {
                break;
            }
            listener(state);
        }
    }
}

trait ListenerRegistry: Send + Sync {
    fn remove_listener(&self, id: u64);
}

impl<R: Reducer> ListenerRegistry for StoreInner<R> {
    fn remove_listener(&self, id: u64) {
        self.listeners.lock().retain(|(listener_id, _)| *listener_id != id);
    }
}

/// Keeps a listener registered until dropped.
#[must_use = "dropping a Subscription unsubscribes immediately"]
pub struct Subscription {
    id: u64,
    registry: Option<Weak<dyn ListenerRegistry>>,
}

impl Subscription {
    pub fn unsubscribe(mut self) {
        self.release();
    }

    fn release(&mut self) {
        if let Some(store) = self.registry.take().and_then(|weak| weak.upgrade()) {
            store.remove_listener(self.id);
        }
    }
}

impl Drop for Subscription {
    fn drop(&mut self) {
        self.release();
    }
}

impl std::fmt::Debug for Subscription {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Subscription").field("id", &self.id).finish()
    }
}
