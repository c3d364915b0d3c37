//! A typed, composable reducer store.
//!
//! Actions are declared with [`define_reducer_action`], collected into a
//! lookup table with [`from_actions_definitions`] and [`compose_reducers`],
//! and dispatched through a [`Store`]. Unknown action ids are a no-op.
//!
//! ```
//! use std::sync::Arc;
//! use reductor::{actions, compose_reducers, define_reducer_action, from_actions_definitions,
//!     reset_state_action, Store, StoreDefinition};
//!
//! #[derive(Debug, Clone, PartialEq)]
//! struct Counter { count: i64 }
//!
//! fn create_state() -> Counter { Counter { count: 0 } }
//!
//! let set_count = define_reducer_action("setCount", |s: &Arc<Counter>, n: &i64| {
//!     if s.count == *n { Arc::clone(s) } else { Arc::new(Counter { count: *n }) }
//! });
//! let reset = reset_state_action(create_state);
//!
//! let store = Store::new(StoreDefinition::new(
//!     create_state,
//!     compose_reducers(from_actions_definitions(actions! {
//!         SetCount: set_count.clone(),
//!         ResetState: reset.clone(),
//!     })),
//! ));
//!
//! store.dispatch(set_count.action(5)).unwrap();
//! assert_eq!(store.get_state().count, 5);
//! store.dispatch(reset.action(())).unwrap();
//! assert_eq!(store.get_state().count, 0);
//! ```

pub mod config;
pub mod logging;
pub mod showcase;
pub mod store;

pub use config::{ConfigError, StoreConfig};
pub use store::{
    compose_reducers, define_reducer_action, erase, from_actions_definitions, patch_state,
    reset_state_action, same_state, set_state_action, with_id, Action, ActionArgs,
    ActionDefinition, ActionStore, ComposedReducer, DispatchAction, DispatchObserver, Dispatched,
    ErasedReducer, FnReducer, Patchable, Reducer, ReducerEntry, ReducerId, Store,
    StoreDefinition, StoreError, Subscription, TracingObserver, RESET_STATE, SET_STATE,
};
