//! Reducer trait and the action seam it consumes.

use std::fmt::Debug;
use std::marker::PhantomData;
use std::sync::Arc;

use super::action::{Action, ReducerId};
use crate::config::StoreConfig;

/// Anything a store can dispatch.
///
/// Implemented by the dynamic [`Action`] and by closed action enums that are
/// reduced with a single `match`.
pub trait DispatchAction: Clone + Debug + Send + Sync + 'static {
    /// Identifier reported to dispatch observers.
    fn id(&self) -> ReducerId;

    /// Arguments reported to dispatch observers.
    fn args(&self) -> &dyn Debug;
}

impl DispatchAction for Action {
    fn id(&self) -> ReducerId {
        Action::id(self).clone()
    }

    fn args(&self) -> &dyn Debug {
        Action::args(self).as_debug()
    }
}

/// Reducer transforms state based on actions.
///
/// It must be a pure function: (State, Action) -> State. Returning
/// `Arc::clone(state)` signals that nothing changed.
pub trait Reducer: Send + Sync + 'static {
    /// The state type this reducer operates on.
    type State: Send + Sync + 'static;

    /// The action type this reducer handles.
    type Action: DispatchAction;

    fn reduce(&self, state: &Arc<Self::State>, action: &Self::Action) -> Arc<Self::State>;

    /// Apply store settings before the store is built. No-op by default.
    fn configure(&mut self, _config: &StoreConfig) {}
}

/// Reference-equality change detection: true when both handles point at the
/// same allocation.
pub fn same_state<S>(a: &Arc<S>, b: &Arc<S>) -> bool {
    Arc::ptr_eq(a, b)
}

/// Adapts a closure into a [`Reducer`].
pub struct FnReducer<S, A, F> {
    reduce: F,
    _marker: PhantomData<fn(&Arc<S>, &A) -> Arc<S>>,
}

impl<S, A, F> FnReducer<S, A, F>
where
    F: Fn(&Arc<S>, &A) -> Arc<S>,
{
    pub fn new(reduce: F) -> Self {
        Self {
            reduce,
            _marker: PhantomData,
        }
    }
}

impl<S, A, F> Reducer for FnReducer<S, A, F>
where
    S: Send + Sync + 'static,
    A: DispatchAction,
    F: Fn(&Arc<S>, &A) -> Arc<S> + Send + Sync + 'static,
{
    type State = S;
    type Action = A;

    fn reduce(&self, state: &Arc<S>, action: &A) -> Arc<S> {
        (self.reduce)(state, action)
    }
}
