//! State store error types.

use crate::core::BoxError;
use thiserror::Error;

/// Errors raised by a [`Store`](super::Store) implementation.
#[derive(Debug, Error)]
pub enum StoreError {
    /// Reading the current state failed
    #[error("failed to load state: {0}")]
    Load(String),

    /// Writing the next state failed; the transition is lost
    #[error("failed to persist state '{key}': {reason}")]
    Persist { key: String, reason: String },

    /// The storage backend reported its own error
    #[error("state store backend error: {0}")]
    Backend(BoxError),
}

impl StoreError {
    /// Wrap a backend error.
    pub fn backend<E>(error: E) -> Self
    where
        E: Into<BoxError>,
    {
        StoreError::Backend(error.into())
    }
}
