//! Persistence boundary for the current state.

use super::error::StoreError;
use super::history::{TransitionLog, TransitionRecord};
use super::stack::State;
use parking_lot::Mutex;
use std::sync::Arc;

/// Loads and saves the current state.
///
/// Implementations own their persistence; the machine only borrows a store
/// for the duration of one call. `set(None)` is what popping past the bottom
/// of the stack persists.
pub trait Store {
    /// Read the current state, `None` if nothing is stored yet.
    fn get(&self) -> Result<Option<State>, StoreError>;

    /// Replace the current state.
    fn set(&self, state: Option<State>) -> Result<(), StoreError>;
}

impl<S: Store + ?Sized> Store for &S {
    fn get(&self) -> Result<Option<State>, StoreError> {
        (**self).get()
    }

    fn set(&self, state: Option<State>) -> Result<(), StoreError> {
        (**self).set(state)
    }
}

impl<S: Store + ?Sized> Store for Box<S> {
    fn get(&self) -> Result<Option<State>, StoreError> {
        (**self).get()
    }

    fn set(&self, state: Option<State>) -> Result<(), StoreError> {
        (**self).set(state)
    }
}

impl<S: Store + ?Sized> Store for Arc<S> {
    fn get(&self) -> Result<Option<State>, StoreError> {
        (**self).get()
    }

    fn set(&self, state: Option<State>) -> Result<(), StoreError> {
        (**self).set(state)
    }
}

#[derive(Debug, Default)]
struct Slot {
    current: Option<State>,
    log: TransitionLog,
}

/// In-memory store shared by its clones.
///
/// Every `set` is appended to a [`TransitionLog`], which makes the store
/// handy for tests and for hosts that only need process-local state.
///
/// # Example
///
/// ```rust
/// use waypoint::state::{MemoryStore, State, Store};
///
/// let store = MemoryStore::with_state(State::new("idle"));
/// store.set(Some(State::new("busy"))).unwrap();
///
/// assert_eq!(store.current().unwrap().key(), "busy");
/// assert_eq!(store.log().len(), 1);
/// ```
#[derive(Clone, Debug, Default)]
pub struct MemoryStore {
    slot: Arc<Mutex<Slot>>,
}

impl MemoryStore {
    /// Create an empty store.
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a store already holding `state`.
    pub fn with_state(state: State) -> Self {
        Self {
            slot: Arc::new(Mutex::new(Slot {
                current: Some(state),
                log: TransitionLog::new(),
            })),
        }
    }

    /// Snapshot of the stored state.
    pub fn current(&self) -> Option<State> {
        self.slot.lock().current.clone()
    }

    /// Snapshot of every write made so far.
    pub fn log(&self) -> TransitionLog {
        self.slot.lock().log.clone()
    }
}

impl Store for MemoryStore {
    fn get(&self) -> Result<Option<State>, StoreError> {
        Ok(self.current())
    }

    fn set(&self, state: Option<State>) -> Result<(), StoreError> {
        let mut slot = self.slot.lock();
        let record = TransitionRecord::between(slot.current.as_ref(), state.as_ref());
        slot.log.push(record);
        slot.current = state;
        Ok(())
    }
}
