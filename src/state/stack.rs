//! State values and the stack they form.

use crate::core::Error;
use serde::de::{self, DeserializeOwned};
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use std::fmt;
use std::iter;
use std::sync::Arc;

/// A named, stack-linked snapshot.
///
/// States are immutable: every transition builds a new value. `prev` links to
/// the state that was current when this one was pushed; a state without
/// `prev` is the bottom of its stack.
///
/// A state serializes as the flat list of its stack entries, top first, so
/// encoded depth does not grow with the stack.
///
/// # Example
///
/// ```rust
/// use waypoint::state::State;
///
/// let menu = State::new("menu");
/// let form = State::new("form").with_prev(Some(menu.clone()));
///
/// assert_eq!(form.prev(), Some(&menu));
/// assert_eq!(form.depth(), 2);
/// assert!(menu.is_bottom());
/// ```
#[derive(Clone, Debug)]
pub struct State {
    key: String,
    payload: Vec<u8>,
    prev: Option<Arc<State>>,
}

/// One stack entry as written out.
#[derive(Serialize)]
struct FrameRef<'a> {
    key: &'a str,
    payload: &'a [u8],
}

/// One stack entry as read back.
#[derive(Deserialize)]
struct Frame {
    key: String,
    #[serde(default)]
    payload: Vec<u8>,
}

impl State {
    /// Create a bottom state with an empty payload.
    pub fn new(key: impl Into<String>) -> Self {
        Self {
            key: key.into(),
            payload: Vec::new(),
            prev: None,
        }
    }

    /// The state identifier.
    pub fn key(&self) -> &str {
        &self.key
    }

    /// The raw serialized payload.
    pub fn payload(&self) -> &[u8] {
        &self.payload
    }

    /// The state below this one on the stack.
    pub fn prev(&self) -> Option<&State> {
        self.prev.as_deref()
    }

    /// True when nothing lies below this state.
    pub fn is_bottom(&self) -> bool {
        self.prev.is_none()
    }

    /// Number of states on the stack, this one included.
    pub fn depth(&self) -> usize {
        self.stack().count()
    }

    /// Walk the stack from this state down to the bottom.
    pub fn stack(&self) -> impl Iterator<Item = &State> {
        iter::successors(Some(self), |s| s.prev())
    }

    /// Same state placed on top of `prev`.
    pub fn with_prev(mut self, prev: Option<State>) -> Self {
        self.prev = prev.map(Arc::new);
        self
    }

    /// Same state carrying `payload` verbatim.
    pub fn with_payload(mut self, payload: impl Into<Vec<u8>>) -> Self {
        self.payload = payload.into();
        self
    }

    /// Same state carrying `value` encoded as JSON.
    pub fn with_value<V: Serialize>(self, value: &V) -> Result<Self, Error> {
        let payload = serde_json::to_vec(value)?;
        Ok(self.with_payload(payload))
    }

    /// Decode the payload into `V`.
    ///
    /// An empty payload is a decoding error, not a default value.
    pub fn value<V: DeserializeOwned>(&self) -> Result<V, Error> {
        Ok(serde_json::from_slice(&self.payload)?)
    }
}

impl PartialEq for State {
    fn eq(&self, other: &Self) -> bool {
        self.stack()
            .map(|s| (&s.key, &s.payload))
            .eq(other.stack().map(|s| (&s.key, &s.payload)))
    }
}

impl Eq for State {}

impl Drop for State {
    // Unlink iteratively; the default drop recurses once per stack entry.
    fn drop(&mut self) {
        let mut prev = self.prev.take();
        while let Some(state) = prev {
            prev = match Arc::try_unwrap(state) {
                Ok(mut state) => state.prev.take(),
                Err(_) => None,
            };
        }
    }
}

impl Serialize for State {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let frames: Vec<FrameRef<'_>> = self
            .stack()
            .map(|s| FrameRef {
                key: &s.key,
                payload: &s.payload,
            })
            .collect();
        frames.serialize(serializer)
    }
}

impl<'de> Deserialize<'de> for State {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let frames = Vec::<Frame>::deserialize(deserializer)?;
        frames
            .into_iter()
            .rev()
            .fold(None, |prev: Option<State>, frame| {
                Some(State::new(frame.key).with_payload(frame.payload).with_prev(prev))
            })
            .ok_or_else(|| de::Error::invalid_length(0, &"at least one stack entry"))
    }
}

impl fmt::Display for State {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.key)
    }
}

impl From<&str> for State {
    fn from(key: &str) -> Self {
        State::new(key)
    }
}

impl From<String> for State {
    fn from(key: String) -> Self {
        State::new(key)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[derive(Debug, PartialEq, Serialize, Deserialize)]
    struct Draft {
        title: String,
        words: u32,
    }

    #[test]
    fn new_state_is_bottom() {
        let s = State::new("idle");
        assert_eq!(s.key(), "idle");
        assert!(s.payload().is_empty());
        assert!(s.is_bottom());
        assert_eq!(s.depth(), 1);
    }

    #[test]
    fn payload_round_trips_through_json() {
        let draft = Draft {
            title: "notes".into(),
            words: 12,
        };
        let s = State::new("editing").with_value(&draft).unwrap();

        assert_eq!(s.value::<Draft>().unwrap(), draft);
        assert_eq!(s.payload(), br#"{"title":"notes","words":12}"#);
    }

    #[test]
    fn empty_payload_fails_to_decode() {
        let err = State::new("idle").value::<u32>().unwrap_err();
        assert!(matches!(err, Error::Payload(_)));
    }

    #[test]
    fn stack_walks_to_bottom() {
        let a = State::new("a");
        let b = State::new("b").with_prev(Some(a.clone()));
        let c = State::new("c").with_prev(Some(b.clone()));

        let keys: Vec<&str> = c.stack().map(State::key).collect();
        assert_eq!(keys, ["c", "b", "a"]);
        assert_eq!(c.prev(), Some(&b));
        assert_eq!(c.depth(), 3);
    }

    #[test]
    fn equality_covers_payload_and_stack() {
        let base = State::new("x");
        assert_ne!(base.clone(), base.clone().with_payload(b"1".to_vec()));
        assert_ne!(base.clone(), base.clone().with_prev(Some(State::new("y"))));
        assert_eq!(base.clone(), State::new("x"));
    }

    #[test]
    fn display_renders_key() {
        assert_eq!(State::new("checkout").to_string(), "checkout");
    }

    #[test]
    fn serializes_whole_stack() {
        let s = State::new("b")
            .with_value(&7)
            .unwrap()
            .with_prev(Some(State::new("a")));
        let json = serde_json::to_string(&s).unwrap();
        assert_eq!(json, r#"[{"key":"b","payload":[55]},{"key":"a","payload":[]}]"#);
        let back: State = serde_json::from_str(&json).unwrap();
        assert_eq!(back, s);
    }

    #[test]
    fn empty_stack_is_rejected() {
        assert!(serde_json::from_str::<State>("[]").is_err());
    }

    fn tower(depth: usize) -> State {
        (1..depth).fold(State::new("0"), |prev, i| {
            State::new(i.to_string()).with_prev(Some(prev))
        })
    }

    #[test]
    fn deep_stack_round_trips_through_json() {
        let s = tower(1_000);
        let back: State = serde_json::from_str(&serde_json::to_string(&s).unwrap()).unwrap();

        assert_eq!(back.depth(), 1_000);
        assert_eq!(back, s);
    }

    #[test]
    fn deep_stack_drops_without_overflow() {
        let s = tower(200_000);
        assert_eq!(s.depth(), 200_000);
        drop(s);
    }

    #[test]
    fn dropping_top_keeps_shared_tail() {
        let tail = tower(10);
        let top = State::new("top").with_prev(Some(tail.clone()));
        let below = top.prev().cloned().unwrap();
        drop(top);

        assert_eq!(below, tail);
        assert_eq!(below.depth(), 10);
    }
}
