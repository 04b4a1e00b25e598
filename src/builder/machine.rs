//! Builder for state machine middleware.

use crate::builder::error::BuildError;
use crate::core::{Context, Middleware};
use crate::state::{drive, State, Step, Store, StoreFactory};
use std::borrow::Cow;
use std::sync::Arc;

/// Builder for the middleware returned by [`machine`](crate::state::machine)
/// with a fluent API.
///
/// # Example
///
/// ```rust
/// use waypoint::builder::MachineBuilder;
/// use waypoint::core::{Context, Handler};
/// use waypoint::state::{self, MemoryStore, State};
///
/// let store = MemoryStore::new();
/// let machine = MachineBuilder::new()
///     .name("checkout")
///     .initial(State::new("cart"))
///     .store({
///         let store = store.clone();
///         move |_| store.clone()
///     })
///     .build()
///     .unwrap();
///
/// let h = machine.then(state::push("payment").then(Handler::none()));
/// h.call(&Context::new()).unwrap();
///
/// let current = store.current().unwrap();
/// assert_eq!(current.key(), "payment");
/// assert_eq!(current.prev().unwrap().key(), "cart");
/// ```
pub struct MachineBuilder {
    store: Option<StoreFactory>,
    initial: Option<State>,
    name: Cow<'static, str>,
}

impl MachineBuilder {
    /// Create a new builder.
    pub fn new() -> Self {
        Self {
            store: None,
            initial: None,
            name: Cow::Borrowed("machine"),
        }
    }

    /// Set the store factory (required).
    pub fn store<F, S>(mut self, factory: F) -> Self
    where
        F: Fn(&Context) -> S + Send + Sync + 'static,
        S: Store + 'static,
    {
        self.store = Some(Arc::new(move |ctx| Box::new(factory(ctx)) as Box<dyn Store>));
        self
    }

    /// Set the state bound while the store is still empty (optional).
    ///
    /// It is not written to the store until a transition happens.
    pub fn initial(mut self, state: State) -> Self {
        self.initial = Some(state);
        self
    }

    /// Name used in log events (optional, defaults to `machine`).
    pub fn name(mut self, name: impl Into<Cow<'static, str>>) -> Self {
        self.name = name.into();
        self
    }

    /// Build the middleware.
    /// Returns an error if required fields are missing.
    pub fn build(self) -> Result<Middleware<Step>, BuildError> {
        let store = self.store.ok_or(BuildError::MissingStore)?;
        if self.name.is_empty() {
            return Err(BuildError::EmptyName);
        }
        Ok(drive(store, self.initial, self.name))
    }
}

impl Default for MachineBuilder {
    fn default() -> Self {
        Self::new()
    }
}
