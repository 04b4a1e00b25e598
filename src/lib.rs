//! Waypoint: composable middleware chains and a stacked state machine
//!
//! Waypoint builds conditional, short-circuiting pipelines over an immutable
//! [`Context`](core::Context). Everything is an ordinary function call: a
//! chain runs to completion on the caller's stack and the first failure
//! unwinds it.
//!
//! # Core Concepts
//!
//! - **Handler**: terminal action over a context
//! - **Middleware**: wraps a handler and decides whether to call through
//! - **Predicate** and **Factory**: decisions taken per call, from the
//!   context of that call
//! - **State machine**: a middleware that loads a state from a
//!   [`Store`](state::Store), exposes it to the chain, and persists the
//!   transition the chain asks for
//!
//! # Example
//!
//! ```rust
//! use waypoint::core::{compose, optional, Context, Handler, Middleware, Predicate};
//!
//! let audit = Middleware::new(|ctx: &Context, next: &Handler<Vec<&'static str>>| {
//!     let mut trail = next.call(ctx)?;
//!     trail.insert(0, "audit");
//!     Ok(trail)
//! });
//! let admin_only = Middleware::new(|ctx: &Context, next: &Handler<Vec<&'static str>>| {
//!     let mut trail = next.call(ctx)?;
//!     trail.insert(0, "admin");
//!     Ok(trail)
//! });
//! let is_admin = Predicate::new(|ctx| ctx.value::<bool>("admin") == Some(&true));
//!
//! let h = compose([audit, optional(is_admin, [admin_only])])
//!     .then(Handler::new(|_: &Context| Ok(vec!["handler"])));
//!
//! let guest = Context::new().with_value("admin", false);
//! let admin = Context::new().with_value("admin", true);
//!
//! assert_eq!(h.call(&guest).unwrap(), ["audit", "handler"]);
//! assert_eq!(h.call(&admin).unwrap(), ["audit", "admin", "handler"]);
//! ```

pub mod builder;
pub mod checkpoint;
pub mod core;
pub mod state;

// Re-export commonly used types
pub use crate::core::{Context, Error, Handler, Middleware, Outcome, Predicate};
pub use crate::state::{State, Step, Store};
