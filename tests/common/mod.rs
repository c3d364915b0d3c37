//! Shared counter store used across integration tests.

#![allow(dead_code, unused_imports)]

use parking_lot::Mutex;
use reductor::{
    actions, compose_reducers, define_reducer_action, from_actions_definitions,
    reset_state_action, ActionDefinition, ActionStore, ReducerId, Store, StoreDefinition,
};
use std::fmt::Debug;
use std::sync::Arc;

#[derive(Debug, Clone, PartialEq)]
pub struct Counter {
    pub count: i64,
}

pub fn create_state() -> Counter {
    Counter { count: 0 }
}

#[derive(Clone)]
pub struct CounterActions {
    pub set_count: ActionDefinition<Counter, i64>,
    pub increment: ActionDefinition<Counter, ()>,
    pub reset_state: ActionDefinition<Counter, ()>,
}

pub fn counter_actions() -> CounterActions {
    CounterActions {
        set_count: define_reducer_action("setCount", |s: &Arc<Counter>, n: &i64| {
            if s.count == *n {
                Arc::clone(s)
            } else {
                Arc::new(Counter { count: *n })
            }
        }),
        increment: define_reducer_action("increment", |s: &Arc<Counter>, _: &()| {
            Arc::new(Counter { count: s.count + 1 })
        }),
        reset_state: reset_state_action(create_state),
    }
}

pub fn counter_definition(actions: &CounterActions) -> StoreDefinition<reductor::ComposedReducer<Counter>> {
    StoreDefinition::new(
        create_state,
        compose_reducers(from_actions_definitions(actions! {
            SetCount: actions.set_count.clone(),
            Increment: actions.increment.clone(),
            ResetState: actions.reset_state.clone(),
        })),
    )
}

pub fn counter_store() -> (ActionStore<Counter>, CounterActions) {
    let actions = counter_actions();
    (Store::new(counter_definition(&actions)), actions)
}

/// Records every observed dispatch as `"id args"`.
#[derive(Clone, Default)]
pub struct RecordingObserver {
    pub seen: Arc<Mutex<Vec<String>>>,
}

impl reductor::DispatchObserver for RecordingObserver {
    fn on_dispatch(&self, id: &ReducerId, args: &dyn Debug) {
        self.seen.lock().push(format!("{id} {args:?}"));
    }
}

pub type SpyBuffer = Arc<Mutex<Vec<u8>>>;

/// `io::Write` sink that appends into a shared buffer.
pub struct SpyWriter(pub SpyBuffer);

impl std::io::Write for SpyWriter {
    fn write(&mut self, buf: &[u8]) -> std::io::Result<usize> {
        self.0.lock().extend_from_slice(buf);
        Ok(buf.len())
    }

    fn flush(&mut self) -> std::io::Result<()> {
        Ok(())
    }
}

/// Run `f` with a thread-local subscriber capturing events at `warn` and
/// above. Returns the formatted log output.
pub fn capture_warnings(f: impl FnOnce()) -> String {
    let buffer = SpyBuffer::default();
    let sink = Arc::clone(&buffer);
    let subscriber = tracing_subscriber::fmt()
        .with_writer(move || SpyWriter(Arc::clone(&sink)))
        .with_max_level(tracing::Level::WARN)
        .with_ansi(false)
        .finish();

    tracing::subscriber::with_default(subscriber, f);

    let bytes = buffer.lock().clone();
    String::from_utf8_lossy(&bytes).into_owned()
}
