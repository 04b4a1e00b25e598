//! Immutable request context threaded through every call.
//!
//! A `Context` is a persistent chain of bindings. Deriving a context never
//! touches the original: it allocates one new binding pointing at the old
//! head, so the derived view shadows earlier bindings for the same key while
//! every other holder keeps seeing what it saw before.

use std::any::{Any, TypeId};
use std::borrow::Cow;
use std::fmt;
use std::sync::Arc;

#[derive(Clone, Debug, PartialEq, Eq)]
enum Key {
    Name(Cow<'static, str>),
    Type(TypeId, &'static str),
}

struct Binding {
    key: Key,
    value: Arc<dyn Any + Send + Sync>,
    parent: Option<Arc<Binding>>,
}

/// Immutable, derivable key-value carrier.
///
/// Values can be bound either under a string key ([`Context::with_value`])
/// or in a slot indexed by their type ([`Context::insert`]). Lookups walk
/// from the newest binding to the oldest and stop at the first key match.
///
/// # Example
///
/// ```rust
/// use waypoint::core::Context;
///
/// let root = Context::new().with_value("user", 7u32);
/// let child = root.with_value("user", 8u32);
///
/// assert_eq!(root.value::<u32>("user"), Some(&7));
/// assert_eq!(child.value::<u32>("user"), Some(&8));
/// ```
#[derive(Clone, Default)]
pub struct Context {
    head: Option<Arc<Binding>>,
}

impl Context {
    /// Create an empty context.
    pub fn new() -> Self {
        Self { head: None }
    }

    /// Derive a context with `value` bound under `key`.
    pub fn with_value<V>(&self, key: impl Into<Cow<'static, str>>, value: V) -> Self
    where
        V: Any + Send + Sync,
    {
        self.bind(Key::Name(key.into()), Arc::new(value))
    }

    /// Read the value bound under `key`.
    ///
    /// Returns `None` when the key is unbound or when the nearest binding for
    /// the key holds a different type.
    pub fn value<V: Any>(&self, key: &str) -> Option<&V> {
        self.find(|k| matches!(k, Key::Name(name) if name == key))
            .and_then(|value| value.downcast_ref::<V>())
    }

    /// Derive a context with `value` stored in the slot for its type.
    pub fn insert<V>(&self, value: V) -> Self
    where
        V: Any + Send + Sync,
    {
        self.bind(
            Key::Type(TypeId::of::<V>(), std::any::type_name::<V>()),
            Arc::new(value),
        )
    }

    /// Read the slot for type `V`.
    pub fn get<V: Any>(&self) -> Option<&V> {
        let wanted = TypeId::of::<V>();
        self.find(|k| matches!(k, Key::Type(id, _) if *id == wanted))
            .and_then(|value| value.downcast_ref::<V>())
    }

    /// True when nothing has been bound.
    pub fn is_empty(&self) -> bool {
        self.head.is_none()
    }

    fn bind(&self, key: Key, value: Arc<dyn Any + Send + Sync>) -> Self {
        Self {
            head: Some(Arc::new(Binding {
                key,
                value,
                parent: self.head.clone(),
            })),
        }
    }

    fn find<P>(&self, is_key: P) -> Option<&(dyn Any + Send + Sync + 'static)>
    where
        P: Fn(&Key) -> bool,
    {
        let mut cursor = self.head.as_deref();
        while let Some(binding) = cursor {
            if is_key(&binding.key) {
                return Some(binding.value.as_ref());
            }
            cursor = binding.parent.as_deref();
        }
        None
    }

    fn keys(&self) -> impl Iterator<Item = &Key> {
        std::iter::successors(self.head.as_deref(), |b| b.parent.as_deref()).map(|b| &b.key)
    }
}

impl fmt::Debug for Context {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut list = f.debug_list();
        for key in self.keys() {
            match key {
                Key::Name(name) => list.entry(name),
                Key::Type(_, name) => list.entry(name),
            };
        }
        list.finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[derive(Debug, PartialEq)]
    struct RequestId(u64);

    #[test]
    fn empty_context_has_no_values() {
        let ctx = Context::new();
        assert!(ctx.is_empty());
        assert_eq!(ctx.value::<i32>("key"), None);
        assert_eq!(ctx.get::<RequestId>(), None);
    }

    #[test]
    fn derivation_leaves_parent_untouched() {
        let parent = Context::new().with_value("key", 1);
        let child = parent.with_value("key", 2);

        assert_eq!(parent.value::<i32>("key"), Some(&1));
        assert_eq!(child.value::<i32>("key"), Some(&2));
    }

    #[test]
    fn nearest_binding_wins_even_with_other_type() {
        let ctx = Context::new().with_value("key", 1).with_value("key", "one");

        assert_eq!(ctx.value::<i32>("key"), None);
        assert_eq!(ctx.value::<&str>("key"), Some(&"one"));
    }

    #[test]
    fn typed_slots_are_separate_from_named_keys() {
        let ctx = Context::new()
            .insert(RequestId(42))
            .with_value("RequestId", 7u8);

        assert_eq!(ctx.get::<RequestId>(), Some(&RequestId(42)));
        assert_eq!(ctx.value::<u8>("RequestId"), Some(&7));
        assert_eq!(ctx.value::<RequestId>("RequestId"), None);
    }

    #[test]
    fn debug_lists_newest_first() {
        let ctx = Context::new().with_value("a", 1).with_value("b", 2);
        assert_eq!(format!("{:?}", ctx), r#"["b", "a"]"#);
    }
}
