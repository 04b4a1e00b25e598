//! Transition history tracking.
//!
//! Provides immutable tracking of persisted transitions over time. The log
//! records keys rather than whole states so it stays small however deep the
//! stacks get.

use super::stack::State;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::time::Duration;

/// Record of a single persisted transition.
///
/// `from` is `None` when nothing was stored before; `to` is `None` when the
/// stack was popped past its bottom.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct TransitionRecord {
    /// Key of the state being replaced
    pub from: Option<String>,
    /// Key of the state being stored
    pub to: Option<String>,
    /// Stack depth after the transition
    pub depth: usize,
    /// When the transition was stored
    pub timestamp: DateTime<Utc>,
}

impl TransitionRecord {
    /// Describe the move from `from` to `to`, stamped now.
    pub fn between(from: Option<&State>, to: Option<&State>) -> Self {
        Self {
            from: from.map(|s| s.key().to_string()),
            to: to.map(|s| s.key().to_string()),
            depth: to.map_or(0, State::depth),
            timestamp: Utc::now(),
        }
    }
}

/// Ordered log of transitions.
///
/// The log is immutable - `record` returns a new log with the transition
/// appended.
///
/// # Example
///
/// ```rust
/// use waypoint::state::{State, TransitionLog, TransitionRecord};
///
/// let start = State::new("start");
/// let middle = State::new("middle").with_prev(Some(start.clone()));
///
/// let log = TransitionLog::new()
///     .record(TransitionRecord::between(None, Some(&start)))
///     .record(TransitionRecord::between(Some(&start), Some(&middle)));
///
/// assert_eq!(log.path(), vec![Some("start"), Some("middle")]);
/// ```
#[derive(Clone, Debug, Default, Serialize, Deserialize)]
pub struct TransitionLog {
    transitions: Vec<TransitionRecord>,
}

impl TransitionLog {
    /// Create an empty log.
    pub fn new() -> Self {
        Self {
            transitions: Vec::new(),
        }
    }

    /// Record a transition, returning a new log.
    pub fn record(&self, transition: TransitionRecord) -> Self {
        let mut log = self.clone();
        log.push(transition);
        log
    }

    /// Append in place.
    pub(crate) fn push(&mut self, transition: TransitionRecord) {
        self.transitions.push(transition);
    }

    /// Keys of the states traversed.
    ///
    /// The first entry is the state the first transition started from,
    /// omitted when the store started out empty.
    pub fn path(&self) -> Vec<Option<&str>> {
        let mut path = Vec::new();
        if let Some(first) = self.transitions.first() {
            if first.from.is_some() {
                path.push(first.from.as_deref());
            }
        }
        for transition in &self.transitions {
            path.push(transition.to.as_deref());
        }
        path
    }

    /// Time between the first and last transition.
    pub fn duration(&self) -> Option<Duration> {
        let (first, last) = (self.transitions.first()?, self.transitions.last()?);
        last.timestamp
            .signed_duration_since(first.timestamp)
            .to_std()
            .ok()
    }

    /// All recorded transitions, oldest first.
    pub fn transitions(&self) -> &[TransitionRecord] {
        &self.transitions
    }

    /// Number of recorded transitions.
    pub fn len(&self) -> usize {
        self.transitions.len()
    }

    /// True when nothing was recorded.
    pub fn is_empty(&self) -> bool {
        self.transitions.is_empty()
    }
}
