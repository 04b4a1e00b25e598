//! Middlewares that read the current state and request the next one.

use super::stack::State;
use super::step::Step;
use crate::core::{Context, Middleware, Outcome, Output};
use std::fmt;
use std::sync::Arc;

/// Context slot holding the state bound for the current call.
#[derive(Debug)]
struct Bound(Option<State>);

/// Derive a context in which [`current`] returns `state`.
pub(crate) fn bind(ctx: &Context, state: Option<State>) -> Context {
    ctx.insert(Bound(state))
}

/// The state bound in `ctx`, if any.
pub fn current(ctx: &Context) -> Option<&State> {
    ctx.get::<Bound>().and_then(|bound| bound.0.as_ref())
}

type Compute = dyn Fn(&Context) -> Outcome<Option<State>> + Send + Sync;

/// Where the next state comes from.
///
/// Sources are resolved when the transition is requested, after the
/// continuation succeeded, against the context of that call.
#[derive(Clone)]
pub enum StateSource {
    /// A fresh bottom state with this key
    Key(String),
    /// This exact state
    State(State),
    /// Computed from the context; may fail or produce no state
    Computed(Arc<Compute>),
}

impl StateSource {
    /// Source computed from the context.
    pub fn computed<F>(f: F) -> Self
    where
        F: Fn(&Context) -> Outcome<Option<State>> + Send + Sync + 'static,
    {
        StateSource::Computed(Arc::new(f))
    }

    /// Produce the state for `ctx`.
    pub fn resolve(&self, ctx: &Context) -> Outcome<Option<State>> {
        match self {
            StateSource::Key(key) => Ok(Some(State::new(key.clone()))),
            StateSource::State(state) => Ok(Some(state.clone())),
            StateSource::Computed(f) => f(ctx),
        }
    }
}

impl fmt::Debug for StateSource {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            StateSource::Key(key) => f.debug_tuple("Key").field(key).finish(),
            StateSource::State(state) => f.debug_tuple("State").field(state).finish(),
            StateSource::Computed(_) => f.write_str("Computed"),
        }
    }
}

impl From<&str> for StateSource {
    fn from(key: &str) -> Self {
        StateSource::Key(key.to_string())
    }
}

impl From<String> for StateSource {
    fn from(key: String) -> Self {
        StateSource::Key(key)
    }
}

impl From<State> for StateSource {
    fn from(state: State) -> Self {
        StateSource::State(state)
    }
}

/// Run the continuation with `state` bound as the current state.
///
/// No store is consulted.
pub fn with<T: Output>(state: State) -> Middleware<T> {
    let state = Some(state);
    Middleware::new(move |ctx, next| next.call(&bind(ctx, state.clone())))
}

/// Request a transition once the continuation succeeds.
///
/// A failing continuation propagates its failure and no transition happens.
/// A continuation that already requested a transition keeps its request.
pub fn next(source: impl Into<StateSource>) -> Middleware<Step> {
    let source = source.into();
    Middleware::new(move |ctx, next| match next.call(ctx)? {
        Step::Stay => Ok(Step::Transition(source.resolve(ctx)?)),
        requested => Ok(requested),
    })
}

/// Push a new state on top of the current one.
pub fn push(source: impl Into<StateSource>) -> Middleware<Step> {
    let source = source.into();
    next(StateSource::computed(move |ctx| {
        let prev = current(ctx).cloned();
        Ok(source.resolve(ctx)?.map(|state| state.with_prev(prev)))
    }))
}

/// Return to the state below the current one.
///
/// Popping the bottom state requests `Step::Transition(None)`.
pub fn pop() -> Middleware<Step> {
    next(StateSource::computed(|ctx| {
        Ok(current(ctx).and_then(State::prev).cloned())
    }))
}
