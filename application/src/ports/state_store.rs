//! Port for snapshot persistence.
//!
//! Defines the [`StateStore`] trait for reading and writing the persisted
//! chat snapshot. The methods are intentionally synchronous and the store
//! swallows failures; persistence is best-effort.

use assist_domain::StoredState;
use thiserror::Error;

/// Errors that can occur while loading or saving the snapshot.
#[derive(Error, Debug)]
pub enum StateStoreError {
    #[error("Storage I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Snapshot serialization error: {0}")]
    Serialization(#[from] serde_json::Error),
}

/// Port for persisting the chat store snapshot.
///
/// Implementations write the whole snapshot as one document; writes are
/// last-writer-wins with exactly one writer (the single interaction task).
pub trait StateStore: Send + Sync {
    /// Read the persisted snapshot. `Ok(None)` means nothing was stored yet.
    fn load(&self) -> Result<Option<StoredState>, StateStoreError>;

    /// Write the snapshot, replacing any previous one.
    fn save(&self, state: &StoredState) -> Result<(), StateStoreError>;
}

/// No-op implementation for tests and when persistence is disabled.
pub struct NoStateStore;

impl StateStore for NoStateStore {
    fn load(&self) -> Result<Option<StoredState>, StateStoreError> {
        Ok(None)
    }

    fn save(&self, _state: &StoredState) -> Result<(), StateStoreError> {
        Ok(())
    }
}
