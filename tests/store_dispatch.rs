mod common;

use std::panic::{catch_unwind, AssertUnwindSafe};
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, OnceLock};
use std::thread;

use common::{counter_actions, counter_definition, counter_store, create_state, Counter, RecordingObserver};
use parking_lot::Mutex;
use reductor::{
    actions, compose_reducers, define_reducer_action, from_actions_definitions, same_state,
    with_id, Action, ActionStore, Dispatched, ReducerId, Store, StoreDefinition, StoreError,
};

#[test]
fn set_count_then_reset_restores_initial_state() {
    let (store, actions) = counter_store();

    store.dispatch(actions.set_count.action(5)).unwrap();
    assert_eq!(*store.get_state(), Counter { count: 5 });

    store.dispatch(actions.reset_state.action(())).unwrap();
    assert_eq!(*store.get_state(), Counter { count: 0 });
}

#[test]
fn noop_action_is_not_notified() {
    let (store, actions) = counter_store();
    let hits = Arc::new(AtomicUsize::new(0));
    let counted = Arc::clone(&hits);
    let _subscription = store.subscribe(move |_| {
        counted.fetch_add(1, Ordering::SeqCst);
    });
    let before = store.get_state();

    let outcome = store.dispatch(actions.set_count.action(0)).unwrap();

    assert_eq!(outcome, Dispatched { changed: false, version: 0 });
    assert!(same_state(&before, &store.get_state()));
    assert_eq!(hits.load(Ordering::SeqCst), 0);
}

#[test]
fn unknown_action_id_leaves_state_untouched() {
    let (store, _) = counter_store();
    let before = store.get_state();

    for id in ["setcount", "doesNotExist", ""] {
        let outcome = store.dispatch(Action::new(ReducerId::new(id), 1i64)).unwrap();
        assert!(!outcome.changed);
    }

    assert!(same_state(&before, &store.get_state()));
    assert_eq!(store.version(), 0);
}

#[test]
fn observer_sees_every_dispatch_even_noops() {
    let actions = counter_actions();
    let observer = RecordingObserver::default();
    let store = Store::new(counter_definition(&actions).with_observer(observer.clone()));

    store.dispatch(actions.set_count.action(2)).unwrap();
    store.dispatch(actions.set_count.action(2)).unwrap();
    store.dispatch(Action::new(with_id("missing"), ())).unwrap();

    assert_eq!(
        observer.seen.lock().as_slice(),
        ["setCount 2", "setCount 2", "missing ()"]
    );
}

#[test]
fn subscribers_receive_new_state() {
    let (store, actions) = counter_store();
    let seen = Arc::new(Mutex::new(Vec::new()));
    let recorded = Arc::clone(&seen);
    let _subscription = store.subscribe(move |state: &Arc<Counter>| {
        recorded.lock().push(state.count);
    });

    store.dispatch(actions.increment.action(())).unwrap();
    store.dispatch(actions.increment.action(())).unwrap();
    store.reset().unwrap();

    assert_eq!(*seen.lock(), vec![1, 2, 0]);
    assert_eq!(store.version(), 3);
}

#[test]
fn reset_reruns_create_state() {
    let (store, actions) = counter_store();
    store.dispatch(actions.set_count.action(7)).unwrap();

    let outcome = store.reset().unwrap();

    assert!(outcome.changed);
    assert_eq!(*store.get_state(), create_state());
}

#[test]
fn dispatch_from_inside_reducer_is_rejected() {
    let slot: Arc<OnceLock<ActionStore<Counter>>> = Arc::new(OnceLock::new());
    let nested: Arc<Mutex<Option<Result<Dispatched, StoreError>>>> = Arc::new(Mutex::new(None));

    let (handle, outcome) = (Arc::clone(&slot), Arc::clone(&nested));
    let recurse = define_reducer_action("recurse", move |s: &Arc<Counter>, _: &()| {
        if let Some(store) = handle.get() {
            *outcome.lock() = Some(store.dispatch(Action::new(with_id("recurse"), ())));
        }
        Arc::new(Counter { count: s.count + 1 })
    });
    let store = Store::new(StoreDefinition::new(
        create_state,
        compose_reducers(from_actions_definitions(actions! { Recurse: recurse.clone() })),
    ));
    assert!(slot.set(store.clone()).is_ok());

    store.dispatch(recurse.action(())).unwrap();

    assert_eq!(
        nested.lock().clone(),
        Some(Err(StoreError::ReentrantDispatch {
            id: ReducerId::from("recurse")
        }))
    );
    assert_eq!(store.get_state().count, 1);
}

#[test]
fn subscriber_may_dispatch_after_reduction() {
    let (store, actions) = counter_store();
    let follow_up = store.clone();
    let increment = actions.increment.clone();
    let _subscription = store.subscribe(move |state: &Arc<Counter>| {
        if state.count == 1 {
            follow_up.dispatch(increment.action(())).unwrap();
        }
    });

    store.dispatch(actions.set_count.action(1)).unwrap();

    assert_eq!(store.get_state().count, 2);
}

#[test]
fn panicking_reducer_keeps_last_good_state() {
    let boom = define_reducer_action("boom", |_: &Arc<Counter>, _: &()| -> Arc<Counter> {
        panic!("reducer failure")
    });
    let actions = counter_actions();
    let store = Store::new(StoreDefinition::new(
        create_state,
        compose_reducers(from_actions_definitions(actions! {
            SetCount: actions.set_count.clone(),
            Boom: boom.clone(),
        })),
    ));
    store.dispatch(actions.set_count.action(3)).unwrap();

    let result = catch_unwind(AssertUnwindSafe(|| store.dispatch(boom.action(()))));

    assert!(result.is_err());
    assert_eq!(store.get_state().count, 3);
    // The store accepts dispatches again afterwards.
    store.dispatch(actions.set_count.action(4)).unwrap();
    assert_eq!(store.get_state().count, 4);
}

#[test]
fn concurrent_dispatches_are_serialised() {
    let (store, actions) = counter_store();

    let workers: Vec<_> = (0..4)
        .map(|_| {
            let store = store.clone();
            let increment = actions.increment.clone();
            thread::spawn(move || {
                for _ in 0..250 {
                    store.dispatch(increment.action(())).unwrap();
                }
            })
        })
        .collect();
    for worker in workers {
        worker.join().unwrap();
    }

    assert_eq!(store.get_state().count, 1000);
    assert_eq!(store.version(), 1000);
}

#[test]
fn later_listeners_never_see_state_older_than_a_nested_dispatch() {
    let (store, actions) = counter_store();
    let follow_up = store.clone();
    let increment = actions.increment.clone();
    let _first = store.subscribe(move |state: &Arc<Counter>| {
        if state.count == 1 {
            follow_up.dispatch(increment.action(())).unwrap();
        }
    });
    let seen = Arc::new(Mutex::new(Vec::new()));
    let recorded = Arc::clone(&seen);
    let _second = store.subscribe(move |state: &Arc<Counter>| {
        recorded.lock().push(state.count);
    });
    let selected = Arc::new(Mutex::new(Vec::new()));
    let recorded = Arc::clone(&selected);
    let _third = store.subscribe_selected(
        |s: &Counter| s.count,
        move |count: &i64| recorded.lock().push(*count),
    );

    store.dispatch(actions.set_count.action(1)).unwrap();

    assert_eq!(store.get_state().count, 2);
    assert_eq!(*seen.lock(), vec![2]);
    assert_eq!(*selected.lock(), vec![2]);
}

#[test]
fn listeners_are_called_in_subscription_order() {
    let (store, actions) = counter_store();
    let order = Arc::new(Mutex::new(Vec::new()));
    let subscriptions: Vec<_> = ["a", "b", "c"]
        .into_iter()
        .map(|name| {
            let order = Arc::clone(&order);
            store.subscribe(move |state: &Arc<Counter>| {
                order.lock().push(format!("{name}{}", state.count));
            })
        })
        .collect();

    store.dispatch(actions.increment.action(())).unwrap();
    drop(subscriptions);
    store.dispatch(actions.increment.action(())).unwrap();

    assert_eq!(*order.lock(), vec!["a1", "b1", "c1"]);
}

#[test]
fn reset_from_subscriber_wins_over_the_triggering_state() {
    let (store, actions) = counter_store();
    let resetter = store.clone();
    let _first = store.subscribe(move |state: &Arc<Counter>| {
        if state.count == 3 {
            resetter.reset().unwrap();
        }
    });
    let seen = Arc::new(Mutex::new(Vec::new()));
    let recorded = Arc::clone(&seen);
    let _second = store.subscribe(move |state: &Arc<Counter>| {
        recorded.lock().push(state.count);
    });

    store.dispatch(actions.set_count.action(3)).unwrap();

    assert_eq!(*store.get_state(), create_state());
    assert_eq!(store.version(), 2);
    assert_eq!(*seen.lock(), vec![0]);
    assert_eq!(seen.lock().last().copied(), Some(store.get_state().count));
}

#[test]
fn subscribe_selected_from_inside_a_listener() {
    let (store, actions) = counter_store();
    let registered = Arc::new(Mutex::new(Vec::new()));
    let selected = Arc::new(Mutex::new(Vec::new()));
    let (inner_store, slot, recorded) = (store.clone(), Arc::clone(&registered), Arc::clone(&selected));
    let _outer = store.subscribe(move |_: &Arc<Counter>| {
        let mut slot = slot.lock();
        if slot.is_empty() {
            let recorded = Arc::clone(&recorded);
            slot.push(inner_store.subscribe_selected(
                |s: &Counter| s.count,
                move |count: &i64| recorded.lock().push(*count),
            ));
        }
    });

    store.dispatch(actions.increment.action(())).unwrap();
    store.dispatch(actions.increment.action(())).unwrap();

    assert_eq!(registered.lock().len(), 1);
    assert_eq!(*selected.lock(), vec![2]);
}
