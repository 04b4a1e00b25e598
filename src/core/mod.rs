//! Middleware composition engine.
//!
//! This module contains the primitives and the operators over them:
//! - `Context`: immutable, derivable environment passed to every call
//! - `Handler`: terminal action producing an [`Outcome`]
//! - `Middleware`: handler wrapper deciding whether to call through
//! - `Predicate` and `Factory`: call-time decisions over the context
//!
//! The engine is agnostic about the success value a chain produces. It only
//! forwards whatever the innermost call returned, and the first failure
//! unwinds the rest of the chain.

mod context;
mod error;
mod handler;
mod middleware;
mod predicate;

pub use context::Context;
pub use error::{BoxError, Error};
pub use handler::{Handler, Outcome, Output};
pub use middleware::{compose, lazy, optional, Factory, Middleware};
pub use predicate::{and, not, or, Predicate};
