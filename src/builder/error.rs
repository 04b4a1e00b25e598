//! Build errors for the machine builder.

use thiserror::Error;

/// Errors that can occur when building a state machine middleware.
#[derive(Debug, Error)]
pub enum BuildError {
    #[error("State store not specified. Call .store(factory) before .build()")]
    MissingStore,

    #[error("Machine name must not be empty")]
    EmptyName,
}
