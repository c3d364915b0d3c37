//! Action identifiers, type-erased arguments and action definitions.

use std::any::Any;
use std::borrow::Cow;
use std::fmt;
use std::sync::Arc;

/// Identifier selecting which reduction function handles an action.
///
/// Uniqueness within a store is a convention. When two definitions share an
/// id, composition keeps the last one.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct ReducerId(Cow<'static, str>);

impl ReducerId {
    pub fn new(id: impl Into<Cow<'static, str>>) -> Self {
        Self(id.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for ReducerId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&'static str> for ReducerId {
    fn from(id: &'static str) -> Self {
        Self(Cow::Borrowed(id))
    }
}

impl From<String> for ReducerId {
    fn from(id: String) -> Self {
        Self(Cow::Owned(id))
    }
}

/// Shorthand for [`ReducerId::new`].
pub fn with_id(id: impl Into<Cow<'static, str>>) -> ReducerId {
    ReducerId::new(id)
}

/// Arguments carried by an [`Action`].
///
/// Several positional arguments travel as a tuple, none as `()`.
pub trait ActionArgs: Any + fmt::Debug + Send + Sync {
    fn as_any(&self) -> &dyn Any;

    fn as_debug(&self) -> &dyn fmt::Debug;
}

impl<T> ActionArgs for T
where
    T: Any + fmt::Debug + Send + Sync,
{
    fn as_any(&self) -> &dyn Any {
        self
    }

    fn as_debug(&self) -> &dyn fmt::Debug {
        self
    }
}

/// A tagged request to transition state.
#[derive(Clone)]
pub struct Action {
    id: ReducerId,
    args: Arc<dyn ActionArgs>,
}

impl Action {
    pub fn new<A: ActionArgs>(id: ReducerId, args: A) -> Self {
        Self {
            id,
            args: Arc::new(args),
        }
    }

    pub fn id(&self) -> &ReducerId {
        &self.id
    }

    pub fn args(&self) -> &dyn ActionArgs {
        self.args.as_ref()
    }

    /// Typed view of the arguments, `None` when `A` is not the carried type.
    pub fn args_as<A: Any>(&self) -> Option<&A> {
        (*self.args).as_any().downcast_ref::<A>()
    }
}

impl fmt::Debug for Action {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Action")
            .field("id", &self.id)
            .field("args", &(*self.args).as_debug())
            .finish()
    }
}

type ReduceFn<S, A> = dyn Fn(&Arc<S>, &A) -> Arc<S> + Send + Sync;

/// Pairs a [`ReducerId`] with a pure reduction function.
///
/// The function must not mutate its input. It returns either a new state or
/// `Arc::clone(state)` when nothing changed, so the store can detect no-ops by
/// pointer identity.
pub struct ActionDefinition<S, A> {
    id: ReducerId,
    reduce: Arc<ReduceFn<S, A>>,
}

impl<S, A> Clone for ActionDefinition<S, A> {
    fn clone(&self) -> Self {
        Self {
            id: self.id.clone(),
            reduce: Arc::clone(&self.reduce),
        }
    }
}

impl<S, A> fmt::Debug for ActionDefinition<S, A> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ActionDefinition")
            .field("id", &self.id)
            .finish_non_exhaustive()
    }
}

impl<S, A> ActionDefinition<S, A>
where
    A: ActionArgs,
{
    pub fn id(&self) -> &ReducerId {
        &self.id
    }

    /// Build an action routed to this definition.
    pub fn action(&self, args: A) -> Action {
        Action::new(self.id.clone(), args)
    }

    /// Run the wrapped reduction function directly.
    pub fn reduce(&self, state: &Arc<S>, args: &A) -> Arc<S> {
        (self.reduce)(state, args)
    }
}

/// Declare a named action with its reduction function.
///
/// No uniqueness check happens here.
pub fn define_reducer_action<S, A, F>(id: impl Into<ReducerId>, reduce: F) -> ActionDefinition<S, A>
where
    A: ActionArgs,
    F: Fn(&Arc<S>, &A) -> Arc<S> + Send + Sync + 'static,
{
    ActionDefinition {
        id: id.into(),
        reduce: Arc::new(reduce),
    }
}
