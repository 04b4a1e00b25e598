//! Terminal actions of a chain.

use super::context::Context;
use super::error::Error;
use super::middleware::Middleware;
use std::fmt;
use std::sync::Arc;

/// Success value produced by a chain.
///
/// An absent handler succeeds with `Default::default()`, so every success
/// type needs a neutral value.
pub trait Output: Default + 'static {}

impl<T: Default + 'static> Output for T {}

/// Result of invoking a handler or middleware.
pub type Outcome<T = ()> = Result<T, Error>;

pub(crate) type HandlerFn<T> = dyn Fn(&Context) -> Outcome<T> + Send + Sync;

/// Terminal action over a context.
///
/// A `Handler` is a cheaply clonable, shareable function. The absent handler
/// ([`Handler::none`], also the `Default`) is a no-op that succeeds with
/// `T::default()`, so a middleware may always call its continuation.
///
/// # Example
///
/// ```rust
/// use waypoint::core::{Context, Handler};
///
/// let greet = Handler::new(|ctx: &Context| {
///     Ok(format!("hello {}", ctx.value::<&str>("name").copied().unwrap_or("stranger")))
/// });
///
/// let ctx = Context::new().with_value("name", "ada");
/// assert_eq!(greet.call(&ctx).unwrap(), "hello ada");
/// ```
pub struct Handler<T = ()> {
    inner: Option<Arc<HandlerFn<T>>>,
}

impl<T: Output> Handler<T> {
    /// Create a handler from a function.
    pub fn new<F>(f: F) -> Self
    where
        F: Fn(&Context) -> Outcome<T> + Send + Sync + 'static,
    {
        Self {
            inner: Some(Arc::new(f)),
        }
    }

    /// The absent handler.
    pub fn none() -> Self {
        Self { inner: None }
    }

    /// True for the absent handler.
    pub fn is_none(&self) -> bool {
        self.inner.is_none()
    }

    /// Invoke the handler.
    pub fn call(&self, ctx: &Context) -> Outcome<T> {
        match &self.inner {
            Some(f) => f(ctx),
            None => Ok(T::default()),
        }
    }

    /// Wrap this handler in `mws`.
    ///
    /// The first middleware runs first: `h.using([a, b])` runs `a`, then `b`,
    /// then `h`. Absent middlewares are skipped.
    pub fn using<I>(self, mws: I) -> Self
    where
        I: IntoIterator<Item = Middleware<T>>,
        I::IntoIter: DoubleEndedIterator,
    {
        mws.into_iter().rev().fold(self, |h, mw| mw.then(h))
    }
}

impl<T> Clone for Handler<T> {
    fn clone(&self) -> Self {
        Self {
            inner: self.inner.clone(),
        }
    }
}

impl<T> Default for Handler<T> {
    fn default() -> Self {
        Self { inner: None }
    }
}

impl<T> fmt::Debug for Handler<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.inner {
            Some(_) => f.write_str("Handler"),
            None => f.write_str("Handler(none)"),
        }
    }
}
