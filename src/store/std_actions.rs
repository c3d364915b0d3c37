//! Actions most stores want: shallow patching and resetting.

use std::sync::Arc;

use super::action::{define_reducer_action, ActionArgs, ActionDefinition};
use super::patch::{patch_state, Patchable};

pub const SET_STATE: &str = "setState";
pub const RESET_STATE: &str = "resetState";

/// `setState(patch)`: shallow-merge a patch into the whole state.
pub fn set_state_action<S>() -> ActionDefinition<S, S::Patch>
where
    S: Patchable + 'static,
    S::Patch: ActionArgs + Clone,
{
    define_reducer_action(SET_STATE, |state: &Arc<S>, patch: &S::Patch| {
        patch_state(state, patch.clone())
    })
}

/// `resetState()`: replace the state with a fresh `create_state()` value.
pub fn reset_state_action<S, F>(create_state: F) -> ActionDefinition<S, ()>
where
    S: 'static,
    F: Fn() -> S + Send + Sync + 'static,
{
    define_reducer_action(RESET_STATE, move |_: &Arc<S>, _: &()| Arc::new(create_state()))
}
