//! Builder API for state machine construction.
//!
//! [`state::machine`](crate::state::machine) covers the common case of a
//! store factory alone; the builder adds an initial state and a name for log
//! events while validating what it was given.

pub mod error;
pub mod machine;

pub use error::BuildError;
pub use machine::MachineBuilder;
