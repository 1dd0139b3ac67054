//! Persisted store snapshot.
//!
//! [`StoredState`] is the single JSON document written to local storage:
//! `{sessions, currentSessionId, userPreferences}`. The store-level
//! streaming flag and error slot are transient and deliberately absent.

use crate::chat::entities::ChatSession;
use crate::chat::preferences::UserPreferences;
use serde::{Deserialize, Serialize};

/// The persisted snapshot of the chat store.
///
/// Timestamps serialize as RFC 3339 strings; field names stay camelCase so
/// the on-disk document matches the documented storage format.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StoredState {
    #[serde(default)]
    pub sessions: Vec<ChatSession>,
    #[serde(default)]
    pub current_session_id: Option<String>,
    #[serde(default)]
    pub user_preferences: UserPreferences,
}
