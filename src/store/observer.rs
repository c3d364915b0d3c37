//! Dispatch observers: the injectable replacement for console logging.

use std::fmt::Debug;

use super::action::ReducerId;

/// Hook called for every dispatch, whether or not state changed.
///
/// Intended for logging and tracing. Observers must not dispatch.
pub trait DispatchObserver: Send + Sync {
    fn on_dispatch(&self, id: &ReducerId, args: &dyn Debug);
}

impl<F> DispatchObserver for F
where
    F: Fn(&ReducerId, &dyn Debug) + Send + Sync,
{
    fn on_dispatch(&self, id: &ReducerId, args: &dyn Debug) {
        self(id, args)
    }
}

/// Emits one `debug` event per dispatch.
#[derive(Debug, Clone)]
pub struct TracingObserver {
    store: String,
}

impl TracingObserver {
    pub fn new(store: impl Into<String>) -> Self {
        Self {
            store: store.into(),
        }
    }
}

impl DispatchObserver for TracingObserver {
    fn on_dispatch(&self, id: &ReducerId, args: &dyn Debug) {
        tracing::debug!(
            store = %self.store,
            action = %id,
            args = ?args,
            "Store dispatch"
        );
    }
}
