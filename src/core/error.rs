//! Failure type carried through handler and middleware chains.

use crate::state::StoreError;
use thiserror::Error;

/// Boxed error produced by host code.
pub type BoxError = Box<dyn std::error::Error + Send + Sync + 'static>;

/// Failures that unwind a chain.
///
/// The engine never inspects or wraps these: the first `Err` returned by any
/// link propagates unchanged to whoever invoked the outermost handler.
#[derive(Debug, Error)]
pub enum Error {
    /// Plain failure message raised by a handler.
    #[error("{0}")]
    Message(String),

    /// Failure raised by host code with its own error type.
    #[error("{0}")]
    Handler(BoxError),

    /// The state store failed to load or persist.
    #[error(transparent)]
    Store(#[from] StoreError),

    /// A state payload could not be encoded or decoded.
    #[error("state payload codec failed: {0}")]
    Payload(#[from] serde_json::Error),
}

impl Error {
    /// Build a failure from a message.
    pub fn msg(message: impl Into<String>) -> Self {
        Error::Message(message.into())
    }

    /// Wrap an arbitrary host error.
    pub fn handler<E>(error: E) -> Self
    where
        E: Into<BoxError>,
    {
        Error::Handler(error.into())
    }

    /// True when the failure originates from the state store.
    pub fn is_store(&self) -> bool {
        matches!(self, Error::Store(_))
    }
}
