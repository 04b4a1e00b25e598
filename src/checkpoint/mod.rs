//! Checkpoint envelope for persisted state stacks.
//!
//! Stores that write state outside the process can wrap it in a
//! [`Checkpoint`], which carries a format version and a timestamp next to
//! the whole stack and encodes to JSON or a compact binary form.
//!
//! # Example
//!
//! A store keeping its state as a JSON document:
//!
//! ```rust
//! use parking_lot::Mutex;
//! use std::sync::Arc;
//! use waypoint::checkpoint::Checkpoint;
//! use waypoint::core::{Context, Handler};
//! use waypoint::state::{self, State, Store, StoreError};
//!
//! #[derive(Clone, Default)]
//! struct JsonStore {
//!     doc: Arc<Mutex<Option<String>>>,
//! }
//!
//! impl Store for JsonStore {
//!     fn get(&self) -> Result<Option<State>, StoreError> {
//!         match self.doc.lock().as_deref() {
//!             Some(json) => Ok(Checkpoint::from_json(json).map_err(StoreError::backend)?.state),
//!             None => Ok(None),
//!         }
//!     }
//!
//!     fn set(&self, state: Option<State>) -> Result<(), StoreError> {
//!         let json = Checkpoint::new(state).to_json().map_err(StoreError::backend)?;
//!         *self.doc.lock() = Some(json);
//!         Ok(())
//!     }
//! }
//!
//! let store = JsonStore::default();
//! let h = state::machine({
//!     let store = store.clone();
//!     move |_| store.clone()
//! })
//! .then(state::push("next").then(Handler::none()));
//!
//! h.call(&Context::new()).unwrap();
//! h.call(&Context::new()).unwrap();
//!
//! assert_eq!(store.get().unwrap().map(|s| s.depth()), Some(2));
//!
//! *store.doc.lock() = Some("not json".into());
//! assert!(h.call(&Context::new()).unwrap_err().is_store());
//! ```

use crate::state::State;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

pub mod error;

pub use error::CheckpointError;

/// Version identifier for checkpoint format
pub const CHECKPOINT_VERSION: u32 = 1;

/// Serializable snapshot of a store's current state.
///
/// # Example
///
/// ```rust
/// use waypoint::checkpoint::Checkpoint;
/// use waypoint::state::State;
///
/// let state = State::new("b").with_prev(Some(State::new("a")));
/// let bytes = Checkpoint::new(Some(state.clone())).to_binary().unwrap();
///
/// let restored = Checkpoint::from_binary(&bytes).unwrap();
/// assert_eq!(restored.state, Some(state));
/// ```
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Checkpoint {
    /// Checkpoint format version
    pub version: u32,

    /// Unique checkpoint identifier
    pub id: String,

    /// When checkpoint was created
    pub timestamp: DateTime<Utc>,

    /// Current state, `None` once the stack was emptied
    pub state: Option<State>,
}

impl Checkpoint {
    /// Capture `state` now.
    pub fn new(state: Option<State>) -> Self {
        Self {
            version: CHECKPOINT_VERSION,
            id: Uuid::new_v4().to_string(),
            timestamp: Utc::now(),
            state,
        }
    }

    /// Encode as JSON.
    pub fn to_json(&self) -> Result<String, CheckpointError> {
        serde_json::to_string(self).map_err(|e| CheckpointError::SerializationFailed(e.to_string()))
    }

    /// Decode from JSON, rejecting unknown versions.
    pub fn from_json(json: &str) -> Result<Self, CheckpointError> {
        let checkpoint: Self = serde_json::from_str(json)
            .map_err(|e| CheckpointError::DeserializationFailed(e.to_string()))?;
        checkpoint.validated()
    }

    /// Encode as binary.
    pub fn to_binary(&self) -> Result<Vec<u8>, CheckpointError> {
        bincode::serialize(self).map_err(|e| CheckpointError::SerializationFailed(e.to_string()))
    }

    /// Decode from binary, rejecting unknown versions.
    pub fn from_binary(bytes: &[u8]) -> Result<Self, CheckpointError> {
        let checkpoint: Self = bincode::deserialize(bytes)
            .map_err(|e| CheckpointError::DeserializationFailed(e.to_string()))?;
        checkpoint.validated()
    }

    fn validated(self) -> Result<Self, CheckpointError> {
        if self.version != CHECKPOINT_VERSION {
            return Err(CheckpointError::UnsupportedVersion {
                found: self.version,
                supported: CHECKPOINT_VERSION,
            });
        }
        Ok(self)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn stack() -> State {
        State::new("review")
            .with_value(&vec!["draft", "final"])
            .unwrap()
            .with_prev(Some(State::new("edit").with_prev(Some(State::new("start")))))
    }

    #[test]
    fn json_preserves_stack_and_payload() {
        let checkpoint = Checkpoint::new(Some(stack()));
        let json = checkpoint.to_json().unwrap();
        let restored = Checkpoint::from_json(&json).unwrap();

        assert_eq!(restored, checkpoint);
        let state = restored.state.unwrap();
        assert_eq!(state.depth(), 3);
        assert_eq!(state.value::<Vec<String>>().unwrap(), ["draft", "final"]);
    }

    #[test]
    fn binary_preserves_empty_state() {
        let checkpoint = Checkpoint::new(None);
        let restored = Checkpoint::from_binary(&checkpoint.to_binary().unwrap()).unwrap();
        assert_eq!(restored.state, None);
        assert_eq!(restored.id, checkpoint.id);
    }

    #[test]
    fn unknown_version_is_rejected() {
        let mut checkpoint = Checkpoint::new(Some(State::new("x")));
        checkpoint.version = CHECKPOINT_VERSION + 1;
        let json = checkpoint.to_json().unwrap();

        assert!(matches!(
            Checkpoint::from_json(&json),
            Err(CheckpointError::UnsupportedVersion { found: 2, supported: 1 })
        ));
    }

    #[test]
    fn garbage_fails_to_decode() {
        assert!(matches!(
            Checkpoint::from_json("{"),
            Err(CheckpointError::DeserializationFailed(_))
        ));
        assert!(matches!(
            Checkpoint::from_binary(&[1, 2, 3]),
            Err(CheckpointError::DeserializationFailed(_))
        ));
    }

    fn tower(depth: usize) -> State {
        (1..depth).fold(State::new("0"), |prev, i| {
            State::new(format!("s{}", i)).with_prev(Some(prev))
        })
    }

    #[test]
    fn deep_stack_round_trips_through_json() {
        let checkpoint = Checkpoint::new(Some(tower(250)));
        let restored = Checkpoint::from_json(&checkpoint.to_json().unwrap()).unwrap();

        assert_eq!(restored.state.as_ref().map(State::depth), Some(250));
        assert_eq!(restored, checkpoint);
    }

    #[test]
    fn deep_stack_round_trips_through_binary() {
        let checkpoint = Checkpoint::new(Some(tower(250)));
        let restored = Checkpoint::from_binary(&checkpoint.to_binary().unwrap()).unwrap();

        assert_eq!(restored.state.as_ref().map(State::key), Some("s249"));
        assert_eq!(restored, checkpoint);
    }

    #[test]
    fn ids_are_unique() {
        assert_ne!(Checkpoint::new(None).id, Checkpoint::new(None).id);
    }
}
