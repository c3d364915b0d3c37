//! Derived views over store state.

use std::sync::Arc;

use parking_lot::Mutex;

use super::reducer::Reducer;
use super::{Store, Subscription};

impl<R: Reducer> Store<R> {
    /// Read a derived value from the current state.
    pub fn select<T, F>(&self, select: F) -> T
    where
        F: FnOnce(&R::State) -> T,
    {
        select(&self.get_state())
    }

    /// Call `on_change` whenever the selected value changes.
    ///
    /// The selection is evaluated once at subscription time as the baseline,
    /// with dispatch held off so no change slips in before registration.
    /// State changes that leave the selected value equal are not reported.
    pub fn subscribe_selected<T, S, F>(&self, select: S, on_change: F) -> Subscription
    where
        T: PartialEq + Clone + Send + 'static,
        S: Fn(&R::State) -> T + Send + Sync + 'static,
        F: Fn(&T) + Send + Sync + 'static,
    {
        let _dispatching = self.inner.dispatching.lock();
        let last = Mutex::new(select(&self.get_state()));
        self.subscribe(move |state: &Arc<R::State>| {
            let next = select(state);
            {
                let mut last = last.lock();
                if *last == next {
                    return;
                }
                *last = next.clone();
            }
            on_change(&next);
        })
    }
}
