//! Middleware and the operators that combine them.
//!
//! A middleware receives the context and a continuation [`Handler`] and
//! decides whether and when to call it. Every operator here is a plain
//! function over cloned `Arc`s: building a chain never runs anything, and
//! running a chain never rebuilds the predicates it was given.

use super::context::Context;
use super::handler::{Handler, Outcome, Output};
use super::predicate::Predicate;
use std::fmt;
use std::iter;
use std::sync::Arc;
use tracing::trace;

pub(crate) type MiddlewareFn<T> = dyn Fn(&Context, &Handler<T>) -> Outcome<T> + Send + Sync;

/// Wraps a handler: may intercept, transform or skip the call.
///
/// The identity middleware ([`Middleware::identity`], also the `Default`)
/// calls its continuation directly, so composing with it is a no-op.
///
/// # Example
///
/// ```rust
/// use waypoint::core::{Context, Handler, Middleware};
///
/// let double = Middleware::new(|ctx: &Context, next: &Handler<i32>| Ok(next.call(ctx)? * 2));
/// let answer = double.then(Handler::new(|_: &Context| Ok(21)));
///
/// assert_eq!(answer.call(&Context::new()).unwrap(), 42);
/// ```
pub struct Middleware<T = ()> {
    inner: Option<Arc<MiddlewareFn<T>>>,
}

/// Computes a middleware from the context of the current call.
pub struct Factory<T = ()> {
    build: Arc<dyn Fn(&Context) -> Middleware<T> + Send + Sync>,
}

impl<T: Output> Middleware<T> {
    /// Create a middleware from a function.
    pub fn new<F>(f: F) -> Self
    where
        F: Fn(&Context, &Handler<T>) -> Outcome<T> + Send + Sync + 'static,
    {
        Self {
            inner: Some(Arc::new(f)),
        }
    }

    /// The identity middleware.
    pub fn identity() -> Self {
        Self { inner: None }
    }

    /// True for the identity middleware.
    pub fn is_identity(&self) -> bool {
        self.inner.is_none()
    }

    /// Invoke with an explicit continuation.
    pub fn call(&self, ctx: &Context, next: &Handler<T>) -> Outcome<T> {
        match &self.inner {
            Some(f) => f(ctx, next),
            None => next.call(ctx),
        }
    }

    /// Bind `h` as the continuation, producing a handler.
    ///
    /// The identity middleware returns `h` itself.
    pub fn then(&self, h: Handler<T>) -> Handler<T> {
        match &self.inner {
            None => h,
            Some(f) => {
                let f = Arc::clone(f);
                Handler::new(move |ctx| f(ctx, &h))
            }
        }
    }

    /// Prepend `mws` ahead of this middleware.
    ///
    /// `mw.using([a, b])` runs `a`, then `b`, then `mw`.
    pub fn using<I>(&self, mws: I) -> Self
    where
        I: IntoIterator<Item = Middleware<T>>,
    {
        compose(mws.into_iter().chain(iter::once(self.clone())))
    }

    /// Follow this middleware with `mws`, but only on calls where `predicate`
    /// holds.
    ///
    /// The predicate is evaluated on every invocation against the context of
    /// that invocation. When it fails the receiver runs alone.
    pub fn branch<I>(&self, predicate: Predicate, mws: I) -> Self
    where
        I: IntoIterator<Item = Middleware<T>>,
    {
        let taken = compose(iter::once(self.clone()).chain(mws));
        let skipped = self.clone();
        lazy(Factory::new(move |ctx| {
            if predicate.test(ctx) {
                trace!("branch taken");
                taken.clone()
            } else {
                skipped.clone()
            }
        }))
    }

    /// Run this middleware with `h` as its continuation whenever `predicate`
    /// holds, replacing whatever continuation the caller supplied.
    ///
    /// Chaining `on` calls builds a dispatch table: the earliest registration
    /// whose predicate holds wins, and when none holds the caller's
    /// continuation runs.
    pub fn on(&self, predicate: Predicate, h: Handler<T>) -> Self {
        let mw = self.clone();
        Middleware::new(move |ctx, next| {
            if predicate.test(ctx) {
                trace!("dispatching to guarded handler");
                mw.call(ctx, &h)
            } else {
                mw.call(ctx, next)
            }
        })
    }
}

impl<T> Clone for Middleware<T> {
    fn clone(&self) -> Self {
        Self {
            inner: self.inner.clone(),
        }
    }
}

impl<T> Default for Middleware<T> {
    fn default() -> Self {
        Self { inner: None }
    }
}

impl<T> fmt::Debug for Middleware<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.inner {
            Some(_) => f.write_str("Middleware"),
            None => f.write_str("Middleware(identity)"),
        }
    }
}

impl<T: Output> Factory<T> {
    /// Create a factory from a function.
    pub fn new<F>(f: F) -> Self
    where
        F: Fn(&Context) -> Middleware<T> + Send + Sync + 'static,
    {
        Self { build: Arc::new(f) }
    }

    /// Produce the middleware for `ctx`.
    pub fn build(&self, ctx: &Context) -> Middleware<T> {
        (self.build)(ctx)
    }
}

impl<T> Clone for Factory<T> {
    fn clone(&self) -> Self {
        Self {
            build: Arc::clone(&self.build),
        }
    }
}

/// Combine `mws` into one middleware running them in order.
///
/// Identity members are dropped; composing nothing yields the identity.
pub fn compose<T, I>(mws: I) -> Middleware<T>
where
    T: Output,
    I: IntoIterator<Item = Middleware<T>>,
{
    let mut mws: Vec<Middleware<T>> = mws
        .into_iter()
        .filter(|mw| !mw.is_identity())
        .collect();
    match mws.len() {
        0 => Middleware::identity(),
        1 => mws.remove(0),
        _ => {
            let mws: Arc<[Middleware<T>]> = mws.into();
            Middleware::new(move |ctx, next| next.clone().using(mws.iter().cloned()).call(ctx))
        }
    }
}

/// Run `mws` in order when `predicate` holds, otherwise pass straight
/// through to the caller's continuation.
pub fn optional<T, I>(predicate: Predicate, mws: I) -> Middleware<T>
where
    T: Output,
    I: IntoIterator<Item = Middleware<T>>,
{
    Middleware::identity().branch(predicate, mws)
}

/// Select the middleware for each call from that call's context.
pub fn lazy<T: Output>(factory: Factory<T>) -> Middleware<T> {
    Middleware::new(move |ctx, next| factory.build(ctx).call(ctx, next))
}
