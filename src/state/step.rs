//! Success value of a state-machine chain.

use super::stack::State;

/// What a state-machine chain asks for after it succeeds.
///
/// Failures travel as `Err` and never as a `Step`, so a transition can only
/// be requested by a chain that completed.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub enum Step {
    /// Keep the current state.
    #[default]
    Stay,

    /// Persist a new current state. `None` means the stack was popped past
    /// its bottom.
    Transition(Option<State>),
}

impl Step {
    /// Request a transition to `state`.
    pub fn to(state: impl Into<State>) -> Self {
        Step::Transition(Some(state.into()))
    }

    /// True when a transition was requested.
    pub fn is_transition(&self) -> bool {
        matches!(self, Step::Transition(_))
    }

    /// The requested state, if any.
    pub fn target(&self) -> Option<&State> {
        match self {
            Step::Transition(state) => state.as_ref(),
            Step::Stay => None,
        }
    }
}
