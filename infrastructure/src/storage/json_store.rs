//! JSON file adapter for snapshot persistence.
//!
//! [`JsonFileStore`] keeps the whole [`StoredState`] as one JSON document
//! at a fixed path. Writes go through a temp-file-then-rename so a crash
//! mid-write never corrupts the previous snapshot. It also hosts the
//! startup housekeeping routine that caps the number of stored sessions.

use assist_application::ports::state_store::{StateStore, StateStoreError};
use assist_domain::StoredState;
use std::fs;
use std::path::{Path, PathBuf};
use tracing::{debug, info, warn};

/// Default cap applied by startup housekeeping.
pub const DEFAULT_MAX_SESSIONS: usize = 50;

/// Snapshot store backed by a single JSON file.
pub struct JsonFileStore {
    path: PathBuf,
}

impl JsonFileStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    /// Path of the snapshot document.
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Cap stored sessions at `max_sessions`, discarding the
    /// least-recently-updated ones beyond the cap.
    ///
    /// Invoked once at startup. All failures are logged and swallowed.
    pub fn prune_sessions(&self, max_sessions: usize) {
        let state = match self.load() {
            Ok(Some(state)) => state,
            Ok(None) => return,
            Err(e) => {
                warn!("Skipping session pruning, could not read snapshot: {}", e);
                return;
            }
        };

        if state.sessions.len() <= max_sessions {
            return;
        }

        let mut state = state;
        let total = state.sessions.len();
        state
            .sessions
            .sort_by(|a, b| b.updated_at.cmp(&a.updated_at));
        state.sessions.truncate(max_sessions);

        match self.save(&state) {
            Ok(()) => info!(
                "Pruned {} stored sessions (cap {})",
                total - max_sessions,
                max_sessions
            ),
            Err(e) => warn!("Failed to write pruned snapshot: {}", e),
        }
    }

    fn write_document(&self, json: &str) -> std::io::Result<()> {
        if let Some(parent) = self.path.parent() {
            fs::create_dir_all(parent)?;
        }
        // Rename is atomic on the same filesystem: a crash mid-write
        // leaves the previous snapshot intact.
        let tmp = self.path.with_extension("json.tmp");
        fs::write(&tmp, json)?;
        fs::rename(&tmp, &self.path)
    }
}

impl StateStore for JsonFileStore {
    fn load(&self) -> Result<Option<StoredState>, StateStoreError> {
        let raw = match fs::read_to_string(&self.path) {
            Ok(raw) => raw,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
                debug!("No snapshot at {}", self.path.display());
                return Ok(None);
            }
            Err(e) => return Err(e.into()),
        };
        let state = serde_json::from_str(&raw)?;
        Ok(Some(state))
    }

    fn save(&self, state: &StoredState) -> Result<(), StateStoreError> {
        let json = serde_json::to_string(state)?;
        self.write_document(&json)?;
        Ok(())
    }
}
