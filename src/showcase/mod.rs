//! Demo store: a theme switch plus free-form data, driven by the
//! `reductor-demo` binary.

mod actions;
mod state;

pub use actions::{reduce_state_data, showcase_definition, ShowcaseActions, SET_DATA};
pub use state::{create_state, ShowcaseData, ShowcaseState, ShowcaseStatePatch, Theme, UnknownTheme};
