//! Application layer for assist-chat
//!
//! This crate owns the chat store (session state + persistence policy),
//! the ports to external collaborators (streaming relay, snapshot storage),
//! and the use cases that orchestrate them. Adapters implementing the ports
//! live in the infrastructure layer.

pub mod ports;
pub mod store;
pub mod use_cases;

// Re-export commonly used types
pub use ports::chat_relay::{ChatRelay, RelayError, RelayTurn, StreamHandle};
pub use ports::state_store::{NoStateStore, StateStore, StateStoreError};
pub use store::ChatStore;
pub use use_cases::{SendMessageUseCase, SendOutcome};
