//! Shallow, reference-preserving state patches.

use std::collections::{BTreeMap, HashMap};
use std::hash::Hash;
use std::sync::Arc;

use serde_json::Value;

/// State that accepts shallow partial updates.
///
/// Only top-level entries merge. Nested values are replaced wholesale.
pub trait Patchable: Clone {
    type Patch;

    /// Whether applying `patch` would produce an observable difference.
    fn changes(&self, patch: &Self::Patch) -> bool;

    fn apply_patch(&mut self, patch: Self::Patch);
}

/// Shallow-merge `patch` into `state`.
///
/// Returns the same allocation when the merge changes nothing, so callers can
/// skip downstream work with [`same_state`](crate::same_state).
pub fn patch_state<S: Patchable>(state: &Arc<S>, patch: S::Patch) -> Arc<S> {
    if !state.changes(&patch) {
        return Arc::clone(state);
    }
    let mut next = S::clone(state);
    next.apply_patch(patch);
    Arc::new(next)
}

impl<K, V> Patchable for BTreeMap<K, V>
where
    K: Ord + Clone,
    V: PartialEq + Clone,
{
    type Patch = BTreeMap<K, V>;

    fn changes(&self, patch: &Self::Patch) -> bool {
        patch.iter().any(|(k, v)| self.get(k) != Some(v))
    }

    fn apply_patch(&mut self, patch: Self::Patch) {
        self.extend(patch);
    }
}

impl<K, V> Patchable for HashMap<K, V>
where
    K: Eq + Hash + Clone,
    V: PartialEq + Clone,
{
    type Patch = HashMap<K, V>;

    fn changes(&self, patch: &Self::Patch) -> bool {
        patch.iter().any(|(k, v)| self.get(k) != Some(v))
    }

    fn apply_patch(&mut self, patch: Self::Patch) {
        self.extend(patch);
    }
}

/// Objects merge their top-level keys. Any other pairing replaces the value.
impl Patchable for Value {
    type Patch = Value;

    fn changes(&self, patch: &Value) -> bool {
        match (self, patch) {
            (Value::Object(current), Value::Object(partial)) => {
                partial.iter().any(|(k, v)| current.get(k) != Some(v))
            }
            (current, replacement) => current != replacement,
        }
    }

    fn apply_patch(&mut self, patch: Value) {
        match (self, patch) {
            (Value::Object(current), Value::Object(partial)) => {
                current.extend(partial);
            }
            (current, replacement) => *current = replacement,
        }
    }
}

/// Declare a state struct together with a patch struct whose fields are all
/// optional.
///
/// `None` leaves a field untouched; `Some(value)` counts as a change only when
/// it differs from the current value.
///
/// ```
/// use std::sync::Arc;
/// use reductor::{patch_state, patchable_struct, same_state};
///
/// patchable_struct! {
///     #[derive(Debug, Clone, PartialEq, Default)]
///     pub struct Counter / CounterPatch {
///         pub count: i64,
///         pub label: String,
///     }
/// }
///
/// let state = Arc::new(Counter::default());
/// let next = patch_state(&state, CounterPatch { count: Some(0), ..Default::default() });
/// assert!(same_state(&state, &next));
/// ```
#[macro_export]
macro_rules! patchable_struct {
    (
        $(#[$meta:meta])*
        $vis:vis struct $name:ident / $patch:ident {
            $($fvis:vis $field:ident : $ty:ty),* $(,)?
        }
    ) => {
        $(#[$meta])*
        $vis struct $name {
            $($fvis $field: $ty),*
        }

        #[derive(Debug, Clone, PartialEq, Default)]
        $vis struct $patch {
            $($fvis $field: ::std::option::Option<$ty>),*
        }

        impl $crate::Patchable for $name {
            type Patch = $patch;

            fn changes(&self, patch: &$patch) -> bool {
                false $(|| patch.$field.as_ref().is_some_and(|value| *value != self.$field))*
            }

            fn apply_patch(&mut self, patch: $patch) {
                $(
                    if let ::std::option::Option::Some(value) = patch.$field {
                        self.$field = value;
                    }
                )*
            }
        }
    };
}
