//! Use cases orchestrating the store and the relay port.

pub mod send_message;

pub use send_message::{SendMessageUseCase, SendOutcome};
