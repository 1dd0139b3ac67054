//! Infrastructure layer for assist-chat
//!
//! This crate contains adapters that implement the ports defined
//! in the application layer, including configuration file loading.

pub mod config;
pub mod relay;
pub mod storage;

// Re-export commonly used types
pub use config::{ConfigLoader, DEFAULT_RELAY_ENDPOINT, FileConfig};
pub use relay::SseChatRelay;
pub use storage::{DEFAULT_MAX_SESSIONS, JsonFileStore};
