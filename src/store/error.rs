use thiserror::Error;

use super::action::ReducerId;

/// Errors that can occur while dispatching.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum StoreError {
    /// `dispatch` was called on the same thread while a reduction was running.
    #[error("Dispatch of '{id}' rejected: a reduction is already in progress")]
    ReentrantDispatch { id: ReducerId },
}
