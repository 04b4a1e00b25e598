//! Boolean tests over a context.
//!
//! Predicates are pure lookups, evaluated each time a chain is invoked so
//! they always see the context of that particular call.

use super::context::Context;
use std::fmt;
use std::ops;
use std::sync::Arc;

/// Boolean test over a context.
///
/// # Example
///
/// ```rust
/// use waypoint::core::{Context, Predicate};
///
/// let admin = Predicate::new(|ctx: &Context| ctx.value::<&str>("role") == Some(&"admin"));
/// let ctx = Context::new().with_value("role", "admin");
///
/// assert!(admin.test(&ctx));
/// assert!(!(!admin).test(&ctx));
/// ```
#[derive(Clone)]
pub struct Predicate {
    test: Arc<dyn Fn(&Context) -> bool + Send + Sync>,
}

impl Predicate {
    /// Create a predicate from a function.
    pub fn new<F>(f: F) -> Self
    where
        F: Fn(&Context) -> bool + Send + Sync + 'static,
    {
        Self { test: Arc::new(f) }
    }

    /// Predicate that always holds.
    pub fn always() -> Self {
        Self::new(|_| true)
    }

    /// Predicate that never holds.
    pub fn never() -> Self {
        Self::new(|_| false)
    }

    /// Evaluate against `ctx`.
    pub fn test(&self, ctx: &Context) -> bool {
        (self.test)(ctx)
    }

    /// Holds when both hold; `other` is not evaluated if `self` fails.
    pub fn and(self, other: Predicate) -> Self {
        and([self, other])
    }

    /// Holds when either holds; `other` is not evaluated if `self` holds.
    pub fn or(self, other: Predicate) -> Self {
        or([self, other])
    }
}

impl ops::Not for Predicate {
    type Output = Predicate;

    fn not(self) -> Self::Output {
        not(self)
    }
}

impl fmt::Debug for Predicate {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("Predicate")
    }
}

/// Holds when every predicate holds, checked left to right.
///
/// Stops at the first failing predicate. An empty list holds.
pub fn and<I>(predicates: I) -> Predicate
where
    I: IntoIterator<Item = Predicate>,
{
    let predicates: Arc<[Predicate]> = predicates.into_iter().collect();
    Predicate::new(move |ctx| predicates.iter().all(|p| p.test(ctx)))
}

/// Holds when any predicate holds, checked left to right.
///
/// Stops at the first passing predicate. An empty list never holds.
pub fn or<I>(predicates: I) -> Predicate
where
    I: IntoIterator<Item = Predicate>,
{
    let predicates: Arc<[Predicate]> = predicates.into_iter().collect();
    Predicate::new(move |ctx| predicates.iter().any(|p| p.test(ctx)))
}

/// Negate a predicate.
pub fn not(predicate: Predicate) -> Predicate {
    Predicate::new(move |ctx| !predicate.test(ctx))
}
