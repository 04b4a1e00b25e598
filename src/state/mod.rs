//! Stacked state machine built from the composition engine.
//!
//! A chain wrapped in [`machine`] sees the persisted state as its current
//! state ([`current`]) and asks for a new one by succeeding with
//! [`Step::Transition`], typically through [`next`], [`push`] or [`pop`].
//! States link to the state below them, so pushing and popping walk a stack.
//!
//! # Example
//!
//! ```rust
//! use waypoint::core::{Context, Handler, Middleware};
//! use waypoint::state::{self, MemoryStore, State, Step};
//!
//! let store = MemoryStore::with_state(State::new("menu"));
//! let app = {
//!     let store = store.clone();
//!     Handler::new(|_: &Context| Ok(Step::Stay)).using([
//!         state::machine(move |_| store.clone()),
//!         Middleware::identity()
//!             .on(state::matches("menu"), state::push("form").then(Handler::none()))
//!             .on(state::matches("form"), state::pop().then(Handler::none())),
//!     ])
//! };
//!
//! app.call(&Context::new()).unwrap();
//! assert_eq!(store.current().unwrap().key(), "form");
//!
//! app.call(&Context::new()).unwrap();
//! assert_eq!(store.current().unwrap().key(), "menu");
//! ```

mod error;
mod history;
mod machine;
mod matcher;
mod stack;
mod step;
mod store;
mod transition;

pub use error::StoreError;
pub use history::{TransitionLog, TransitionRecord};
pub use machine::{machine, StoreFactory};
pub use matcher::{matches, Matcher};
pub use stack::State;
pub use step::Step;
pub use store::{MemoryStore, Store};
pub use transition::{current, next, pop, push, with, StateSource};

pub(crate) use machine::drive;
