//! Raw TOML configuration data types
//!
//! These structs represent the exact structure of the TOML config file.
//! They are deserialized directly; path resolution and defaulting beyond
//! serde happens in the binary.

use serde::{Deserialize, Serialize};
use std::path::PathBuf;

use crate::storage::json_store::DEFAULT_MAX_SESSIONS;

/// Relay endpoint used when no config file or flag overrides it.
pub const DEFAULT_RELAY_ENDPOINT: &str = "http://localhost:3000/api/chat/stream";

/// Complete file configuration (raw TOML structure)
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct FileConfig {
    /// Streaming relay settings
    pub relay: FileRelayConfig,
    /// Snapshot storage settings
    pub storage: FileStorageConfig,
}

/// `[relay]` section
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct FileRelayConfig {
    /// URL of the streaming relay endpoint.
    pub endpoint: String,
}

impl Default for FileRelayConfig {
    fn default() -> Self {
        Self {
            endpoint: DEFAULT_RELAY_ENDPOINT.to_string(),
        }
    }
}

/// `[storage]` section
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct FileStorageConfig {
    /// Snapshot file path; `None` resolves to the platform data directory.
    pub path: Option<PathBuf>,
    /// Startup housekeeping cap on stored sessions.
    pub max_sessions: usize,
}

impl Default for FileStorageConfig {
    fn default() -> Self {
        Self {
            path: None,
            max_sessions: DEFAULT_MAX_SESSIONS,
        }
    }
}
