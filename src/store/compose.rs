//! Turning dictionaries of action definitions into one dispatchable reducer.

use std::collections::HashMap;
use std::sync::Arc;

use super::action::{Action, ActionArgs, ActionDefinition, ReducerId};
use super::reducer::Reducer;
use crate::config::StoreConfig;

/// Type-erased handler stored in a composed lookup table.
pub trait ErasedReducer<S>: Send + Sync {
    fn id(&self) -> &ReducerId;

    /// Returns `None` when `args` is not the argument type the handler expects.
    fn reduce_erased(&self, state: &Arc<S>, args: &dyn ActionArgs) -> Option<Arc<S>>;
}

impl<S, A> ErasedReducer<S> for ActionDefinition<S, A>
where
    S: 'static,
    A: ActionArgs,
{
    fn id(&self) -> &ReducerId {
        ActionDefinition::id(self)
    }

    fn reduce_erased(&self, state: &Arc<S>, args: &dyn ActionArgs) -> Option<Arc<S>> {
        let args = args.as_any().downcast_ref::<A>()?;
        Some(self.reduce(state, args))
    }
}

/// Box a definition as a table handler.
pub fn erase<S, A>(definition: ActionDefinition<S, A>) -> Arc<dyn ErasedReducer<S>>
where
    S: 'static,
    A: ActionArgs,
{
    Arc::new(definition)
}

pub type ReducerEntry<S> = (ReducerId, Arc<dyn ErasedReducer<S>>);

/// Flatten a dictionary of named definitions into `(id, handler)` entries,
/// preserving input order.
///
/// The dictionary names are application-facing labels only; routing uses the
/// definitions' ids.
pub fn from_actions_definitions<S, K, I>(dict: I) -> Vec<ReducerEntry<S>>
where
    I: IntoIterator<Item = (K, Arc<dyn ErasedReducer<S>>)>,
{
    dict.into_iter()
        .map(|(_, handler)| (handler.id().clone(), handler))
        .collect()
}

/// Build a dictionary of heterogeneous action definitions for
/// [`from_actions_definitions`].
///
/// ```
/// use std::sync::Arc;
/// use reductor::{actions, define_reducer_action, from_actions_definitions, compose_reducers};
///
/// let inc = define_reducer_action("inc", |s: &Arc<i32>, _: &()| Arc::new(**s + 1));
/// let set = define_reducer_action("set", |_: &Arc<i32>, n: &i32| Arc::new(*n));
/// let reducer = compose_reducers(from_actions_definitions(actions! {
///     Inc: inc,
///     Set: set,
/// }));
/// assert_eq!(reducer.len(), 2);
/// ```
#[macro_export]
macro_rules! actions {
    ($($name:ident : $definition:expr),* $(,)?) => {
        vec![
            $((
                stringify!($name),
                $crate::erase($definition),
            )),*
        ]
    };
}

/// A lookup table routing actions to handlers by id.
pub struct ComposedReducer<S> {
    table: HashMap<ReducerId, Arc<dyn ErasedReducer<S>>>,
    warn_unknown: bool,
}

impl<S> Clone for ComposedReducer<S> {
    fn clone(&self) -> Self {
        Self {
            table: self.table.clone(),
            warn_unknown: self.warn_unknown,
        }
    }
}

/// Compose entries into a single reducer. Later entries shadow earlier ones
/// that share an id.
pub fn compose_reducers<S, I>(entries: I) -> ComposedReducer<S>
where
    I: IntoIterator<Item = ReducerEntry<S>>,
{
    let mut table = HashMap::new();
    for (id, handler) in entries {
        if table.insert(id.clone(), handler).is_some() {
            tracing::debug!(action = %id, "Action definition shadowed by a later one");
        }
    }
    ComposedReducer {
        table,
        warn_unknown: false,
    }
}

impl<S> ComposedReducer<S> {
    pub fn contains(&self, id: &ReducerId) -> bool {
        self.table.contains_key(id)
    }

    pub fn len(&self) -> usize {
        self.table.len()
    }

    pub fn is_empty(&self) -> bool {
        self.table.is_empty()
    }

    /// Registered ids, sorted.
    pub fn ids(&self) -> Vec<ReducerId> {
        let mut ids: Vec<_> = self.table.keys().cloned().collect();
        ids.sort();
        ids
    }

    /// Combine two independently authored action sets. Handlers from `other`
    /// shadow handlers from `self` on colliding ids.
    pub fn merge(mut self, other: ComposedReducer<S>) -> Self {
        for (id, handler) in other.table {
            if self.table.insert(id.clone(), handler).is_some() {
                tracing::debug!(action = %id, "Action definition shadowed by merged set");
            }
        }
        self.warn_unknown |= other.warn_unknown;
        self
    }

    /// Log unknown ids at `warn` instead of `trace`. Dispatch stays a no-op.
    pub fn warn_unknown_actions(mut self, enabled: bool) -> Self {
        self.warn_unknown = enabled;
        self
    }

    /// Route `action` to its handler. Unknown ids and mismatched argument
    /// types leave the state untouched.
    pub fn reduce_action(&self, state: &Arc<S>, action: &Action) -> Arc<S> {
        let Some(handler) = self.table.get(action.id()) else {
            if self.warn_unknown {
                tracing::warn!(action = %action.id(), "No reducer registered for action");
            } else {
                tracing::trace!(action = %action.id(), "No reducer registered for action");
            }
            return Arc::clone(state);
        };

        match handler.reduce_erased(state, action.args()) {
            Some(next) => next,
            None => {
                tracing::warn!(
                    action = %action.id(),
                    args = ?action.args(),
                    "Action arguments do not match the registered definition"
                );
                Arc::clone(state)
            }
        }
    }
}

impl<S> Reducer for ComposedReducer<S>
where
    S: Send + Sync + 'static,
{
    type State = S;
    type Action = Action;

    fn reduce(&self, state: &Arc<S>, action: &Action) -> Arc<S> {
        self.reduce_action(state, action)
    }

    fn configure(&mut self, config: &StoreConfig) {
        self.warn_unknown = config.warn_unknown_actions;
    }
}
