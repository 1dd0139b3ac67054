//! The chat store — session state container.
//!
//! [`ChatStore`] owns the set of conversation sessions, the active session
//! pointer, the global streaming/error flags, and user preferences. Every
//! mutation that changes durable state persists a snapshot through the
//! injected [`StateStore`] port; persistence failures are logged and
//! swallowed.
//!
//! All mutation happens on the single interaction task, so the store takes
//! plain `&mut self` and needs no locking. Suspension points only occur
//! between whole mutations, never inside one.

use crate::ports::state_store::StateStore;
use assist_domain::{
    ChatSession, DraftMessage, PreferencesPatch, StoredState, UserPreferences,
};
use std::sync::Arc;
use tracing::{debug, warn};

/// Session state container with snapshot persistence.
///
/// Sessions are kept newest-first; that ordering is a display property of
/// the in-memory list, not an invariant of the persisted snapshot.
pub struct ChatStore {
    sessions: Vec<ChatSession>,
    current_session_id: Option<String>,
    is_streaming: bool,
    error: Option<String>,
    preferences: UserPreferences,
    storage: Arc<dyn StateStore>,
}

impl ChatStore {
    pub fn new(storage: Arc<dyn StateStore>) -> Self {
        Self {
            sessions: Vec::new(),
            current_session_id: None,
            is_streaming: false,
            error: None,
            preferences: UserPreferences::default(),
            storage,
        }
    }

    // ==================== Read accessors ====================

    pub fn sessions(&self) -> &[ChatSession] {
        &self.sessions
    }

    pub fn session(&self, session_id: &str) -> Option<&ChatSession> {
        self.sessions.iter().find(|s| s.id == session_id)
    }

    pub fn current_session_id(&self) -> Option<&str> {
        self.current_session_id.as_deref()
    }

    pub fn current_session(&self) -> Option<&ChatSession> {
        self.current_session_id
            .as_deref()
            .and_then(|id| self.session(id))
    }

    pub fn is_streaming(&self) -> bool {
        self.is_streaming
    }

    pub fn error(&self) -> Option<&str> {
        self.error.as_deref()
    }

    pub fn preferences(&self) -> &UserPreferences {
        &self.preferences
    }

    // ==================== Mutations ====================

    /// Insert a new empty session at the front of the list, make it
    /// current, clear any error, and persist. Returns the new session id.
    pub fn create_session(&mut self) -> String {
        let session = ChatSession::new();
        let id = session.id.clone();
        self.sessions.insert(0, session);
        self.current_session_id = Some(id.clone());
        self.error = None;
        self.save_to_storage();
        id
    }

    /// Point the store at the given session and clear any error.
    ///
    /// No existence check is performed; a stale id simply makes downstream
    /// reads return no session.
    pub fn select_session(&mut self, session_id: impl Into<String>) {
        self.current_session_id = Some(session_id.into());
        self.error = None;
    }

    /// Append a message to the target session, resolving the draft's id and
    /// timestamp where unset, and persist. Returns the message id, or
    /// `None` (silently) when no session matches.
    pub fn append_message(&mut self, session_id: &str, draft: DraftMessage) -> Option<String> {
        let Some(session) = self.sessions.iter_mut().find(|s| s.id == session_id) else {
            debug!("append_message: no session {}", session_id);
            return None;
        };
        let message = draft.into_message();
        let message_id = message.id.clone();
        session.push_message(message);
        self.save_to_storage();
        Some(message_id)
    }

    /// Replace the addressed message's content wholesale and mark it
    /// streaming.
    ///
    /// This is the high-frequency path, so it does not persist — a crash
    /// mid-stream loses the in-progress text but never corrupts the stored
    /// snapshot. Persistence is deferred to [`set_streaming`](Self::set_streaming)`(false)`.
    pub fn update_streaming_content(
        &mut self,
        session_id: &str,
        message_id: &str,
        content: impl Into<String>,
    ) {
        let Some(session) = self.sessions.iter_mut().find(|s| s.id == session_id) else {
            return;
        };
        if let Some(message) = session.message_mut(message_id) {
            message.content = content.into();
            message.is_streaming = true;
        }
        session.touch();
    }

    /// Set the global streaming flag.
    ///
    /// Transitioning to `false` also force-clears `is_streaming` on every
    /// message in every session (cleanup for a stream that ended abnormally
    /// and left a stale flag) and persists.
    pub fn set_streaming(&mut self, streaming: bool) {
        self.is_streaming = streaming;
        if !streaming {
            for session in &mut self.sessions {
                for message in &mut session.messages {
                    message.is_streaming = false;
                }
            }
            self.save_to_storage();
        }
    }

    pub fn set_error(&mut self, error: Option<String>) {
        self.error = error;
    }

    /// Remove the session; if it was current, clear the pointer. Persists.
    pub fn delete_session(&mut self, session_id: &str) {
        self.sessions.retain(|s| s.id != session_id);
        if self.current_session_id.as_deref() == Some(session_id) {
            self.current_session_id = None;
        }
        self.save_to_storage();
    }

    /// Merge a partial preferences update and persist.
    pub fn update_preferences(&mut self, patch: PreferencesPatch) {
        self.preferences.apply(patch);
        self.save_to_storage();
    }

    // ==================== Persistence ====================

    /// Replace in-memory state from the persisted snapshot.
    ///
    /// Absent or corrupt storage leaves the current state unchanged; the
    /// failure is logged and never surfaced to the caller.
    pub fn load_from_storage(&mut self) {
        match self.storage.load() {
            Ok(Some(state)) => {
                self.sessions = state.sessions;
                self.current_session_id = state.current_session_id;
                // Serde defaults already merged missing preference keys.
                self.preferences = state.user_preferences;
            }
            Ok(None) => {
                debug!("no stored chat state");
            }
            Err(e) => {
                warn!("Failed to load chat state: {}", e);
            }
        }
    }

    /// Write the snapshot. Best-effort: failures are logged, not surfaced.
    pub fn save_to_storage(&self) {
        let state = StoredState {
            sessions: self.sessions.clone(),
            current_session_id: self.current_session_id.clone(),
            user_preferences: self.preferences.clone(),
        };
        if let Err(e) = self.storage.save(&state) {
            warn!("Failed to save chat state: {}", e);
        }
    }
}
