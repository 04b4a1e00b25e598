//! Predicates over the current state.

use super::stack::State;
use super::transition::current;
use crate::core::Predicate;
use regex::Regex;

/// What the current state is compared against.
#[derive(Clone, Debug)]
pub enum Matcher {
    /// Key equality
    Key(String),
    /// Equality of the whole state: key, payload and stack
    State(State),
    /// Regular expression searched in the key
    Pattern(Regex),
}

impl Matcher {
    /// True when `state` satisfies this matcher.
    pub fn is_match(&self, state: &State) -> bool {
        match self {
            Matcher::Key(key) => state.key() == key,
            Matcher::State(expected) => state == expected,
            Matcher::Pattern(pattern) => pattern.is_match(state.key()),
        }
    }
}

impl From<&str> for Matcher {
    fn from(key: &str) -> Self {
        Matcher::Key(key.to_string())
    }
}

impl From<String> for Matcher {
    fn from(key: String) -> Self {
        Matcher::Key(key)
    }
}

impl From<State> for Matcher {
    fn from(state: State) -> Self {
        Matcher::State(state)
    }
}

impl From<Regex> for Matcher {
    fn from(pattern: Regex) -> Self {
        Matcher::Pattern(pattern)
    }
}

/// Predicate holding when the current state satisfies `target`.
///
/// Never holds when no state is bound.
///
/// # Example
///
/// ```rust
/// use regex::Regex;
/// use waypoint::core::{Context, Handler};
/// use waypoint::state::{self, State};
///
/// let is_form = state::matches(Regex::new("^form/").unwrap());
/// let h = state::with::<bool>(State::new("form/address"))
///     .then(Handler::new(move |ctx: &Context| Ok(is_form.test(ctx))));
///
/// assert!(h.call(&Context::new()).unwrap());
/// ```
pub fn matches(target: impl Into<Matcher>) -> Predicate {
    let matcher = target.into();
    Predicate::new(move |ctx| current(ctx).is_some_and(|state| matcher.is_match(state)))
}
