//! Snapshot persistence adapter.

pub mod json_store;

pub use json_store::{DEFAULT_MAX_SESSIONS, JsonFileStore};
