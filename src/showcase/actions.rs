use std::sync::Arc;

use crate::config::StoreConfig;
use crate::store::{
    compose_reducers, define_reducer_action, from_actions_definitions, reset_state_action,
    set_state_action, ActionDefinition, ComposedReducer, Patchable, StoreDefinition,
};

use super::state::{create_state, ShowcaseData, ShowcaseState, ShowcaseStatePatch};

pub const SET_DATA: &str = "setData";

/// Action definitions of the showcase store.
#[derive(Clone)]
pub struct ShowcaseActions {
    pub set_state: ActionDefinition<ShowcaseState, ShowcaseStatePatch>,
    pub reset_state: ActionDefinition<ShowcaseState, ()>,
    pub set_data: ActionDefinition<ShowcaseState, ShowcaseData>,
}

impl ShowcaseActions {
    pub fn new() -> Self {
        Self {
            set_state: set_state_action(),
            reset_state: reset_state_action(create_state),
            set_data: define_reducer_action(SET_DATA, reduce_state_data),
        }
    }

    pub fn reducer(&self) -> ComposedReducer<ShowcaseState> {
        compose_reducers(from_actions_definitions(crate::actions! {
            SetState: self.set_state.clone(),
            ResetState: self.reset_state.clone(),
            SetData: self.set_data.clone(),
        }))
    }
}

impl Default for ShowcaseActions {
    fn default() -> Self {
        Self::new()
    }
}

/// Patch the nested `data` map. A missing map starts out empty.
pub fn reduce_state_data(state: &Arc<ShowcaseState>, patch: &ShowcaseData) -> Arc<ShowcaseState> {
    let mut data = match &state.data {
        Some(data) if !data.changes(patch) => return Arc::clone(state),
        Some(data) => data.clone(),
        None => ShowcaseData::new(),
    };
    data.apply_patch(patch.clone());

    Arc::new(ShowcaseState {
        data: Some(data),
        ..ShowcaseState::clone(state)
    })
}

/// Store definition for the showcase. Pair with [`Store::with_config`](crate::Store::with_config)
/// to get dispatch tracing.
pub fn showcase_definition(config: &StoreConfig) -> StoreDefinition<ComposedReducer<ShowcaseState>> {
    let reducer = ShowcaseActions::new()
        .reducer()
        .warn_unknown_actions(config.warn_unknown_actions);

    StoreDefinition::new(create_state, reducer)
}
