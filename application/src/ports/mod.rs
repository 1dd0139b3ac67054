//! Ports (interfaces) for external collaborators.
//!
//! These traits define how the application layer talks to the outside
//! world. Implementations (adapters) live in the infrastructure layer.

pub mod chat_relay;
pub mod state_store;

pub use chat_relay::{ChatRelay, RelayError, RelayTurn, StreamHandle};
pub use state_store::{NoStateStore, StateStore, StateStoreError};
