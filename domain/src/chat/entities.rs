//! Conversation domain entities

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Maximum number of characters kept when deriving a session title
/// from its first user message.
const TITLE_MAX_CHARS: usize = 50;

/// Title given to a session before any user message arrives.
pub const DEFAULT_SESSION_TITLE: &str = "New Chat";

/// Role of a message in a conversation
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    User,
    Assistant,
}

/// A message in a conversation (Entity)
///
/// Owned exclusively by its parent [`ChatSession`]. Assistant messages are
/// created empty as placeholders and have their `content` replaced wholesale
/// while a response streams in; `is_streaming` settles to `false` once the
/// stream ends for any reason and never flips back.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Message {
    pub id: String,
    pub role: Role,
    pub content: String,
    pub timestamp: DateTime<Utc>,
    #[serde(default)]
    pub is_streaming: bool,
}

impl Message {
    pub fn new(role: Role, content: impl Into<String>) -> Self {
        Self {
            id: uuid::Uuid::new_v4().to_string(),
            role,
            content: content.into(),
            timestamp: Utc::now(),
            is_streaming: false,
        }
    }

    pub fn user(content: impl Into<String>) -> Self {
        Self::new(Role::User, content)
    }

    pub fn assistant(content: impl Into<String>) -> Self {
        Self::new(Role::Assistant, content)
    }
}

/// A message awaiting insertion into a session.
///
/// Carries the role and content, and optionally a pre-assigned id and
/// timestamp. The pre-assigned id path exists so a caller can allocate an
/// assistant placeholder's id up front and address it later with streaming
/// updates.
#[derive(Debug, Clone)]
pub struct DraftMessage {
    pub role: Role,
    pub content: String,
    pub id: Option<String>,
    pub timestamp: Option<DateTime<Utc>>,
}

impl DraftMessage {
    pub fn new(role: Role, content: impl Into<String>) -> Self {
        Self {
            role,
            content: content.into(),
            id: None,
            timestamp: None,
        }
    }

    pub fn user(content: impl Into<String>) -> Self {
        Self::new(Role::User, content)
    }

    /// An empty assistant placeholder with a caller-allocated id.
    pub fn assistant_placeholder(id: impl Into<String>) -> Self {
        Self {
            role: Role::Assistant,
            content: String::new(),
            id: Some(id.into()),
            timestamp: None,
        }
    }

    /// Resolve the draft into a full [`Message`], generating an id and
    /// stamping the current time where the draft left them unset.
    pub fn into_message(self) -> Message {
        Message {
            id: self.id.unwrap_or_else(|| uuid::Uuid::new_v4().to_string()),
            role: self.role,
            content: self.content,
            timestamp: self.timestamp.unwrap_or_else(Utc::now),
            is_streaming: false,
        }
    }
}

/// One independent conversation thread (Entity)
///
/// The title is derived from the first user message the moment that message
/// is appended (truncated to 50 characters with a trailing ellipsis) and is
/// never recomputed afterwards. `updated_at` refreshes on every message
/// mutation.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ChatSession {
    pub id: String,
    pub title: String,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
    pub messages: Vec<Message>,
}

impl ChatSession {
    pub fn new() -> Self {
        let now = Utc::now();
        Self {
            id: uuid::Uuid::new_v4().to_string(),
            title: DEFAULT_SESSION_TITLE.to_string(),
            created_at: now,
            updated_at: now,
            messages: Vec::new(),
        }
    }

    /// Append a message, applying the first-user-message title rule and
    /// refreshing `updated_at`.
    pub fn push_message(&mut self, message: Message) {
        if self.messages.is_empty() && message.role == Role::User {
            self.title = derive_title(&message.content);
        }
        self.messages.push(message);
        self.updated_at = Utc::now();
    }

    pub fn message_mut(&mut self, message_id: &str) -> Option<&mut Message> {
        self.messages.iter_mut().find(|m| m.id == message_id)
    }

    /// Refresh `updated_at` after an in-place message mutation.
    pub fn touch(&mut self) {
        self.updated_at = Utc::now();
    }
}

impl Default for ChatSession {
    fn default() -> Self {
        Self::new()
    }
}

/// Derive a session title from message content: the first 50 characters,
/// with a trailing `...` when the content was longer.
fn derive_title(content: &str) -> String {
    let mut title: String = content.chars().take(TITLE_MAX_CHARS).collect();
    if content.chars().count() > TITLE_MAX_CHARS {
        title.push_str("...");
    }
    title
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn new_session_has_default_title_and_no_messages() {
        let session = ChatSession::new();
        assert_eq!(session.title, DEFAULT_SESSION_TITLE);
        assert!(session.messages.is_empty());
        assert_eq!(session.created_at, session.updated_at);
    }

    #[test]
    fn first_user_message_sets_title() {
        let mut session = ChatSession::new();
        session.push_message(Message::user("How do I reset my password?"));
        assert_eq!(session.title, "How do I reset my password?");
    }

    #[test]
    fn long_first_message_truncates_title_with_ellipsis() {
        let content = "a".repeat(60);
        let mut session = ChatSession::new();
        session.push_message(Message::user(content.clone()));
        assert_eq!(session.title, format!("{}...", "a".repeat(50)));
        assert_eq!(session.title.chars().count(), 53);
    }

    #[test]
    fn exactly_fifty_chars_gets_no_ellipsis() {
        let content = "b".repeat(50);
        let mut session = ChatSession::new();
        session.push_message(Message::user(content.clone()));
        assert_eq!(session.title, content);
    }

    #[test]
    fn title_is_never_recomputed() {
        let mut session = ChatSession::new();
        session.push_message(Message::user("first question"));
        session.push_message(Message::assistant("answer"));
        session.push_message(Message::user("second question"));
        assert_eq!(session.title, "first question");
    }

    #[test]
    fn first_assistant_message_leaves_default_title() {
        let mut session = ChatSession::new();
        session.push_message(Message::assistant("Hello! How can I help?"));
        assert_eq!(session.title, DEFAULT_SESSION_TITLE);
    }

    #[test]
    fn truncation_counts_chars_not_bytes() {
        let content = "é".repeat(60);
        let mut session = ChatSession::new();
        session.push_message(Message::user(content));
        assert_eq!(session.title.chars().count(), 53);
        assert!(session.title.ends_with("..."));
    }

    #[test]
    fn draft_without_id_generates_one() {
        let a = DraftMessage::user("hi").into_message();
        let b = DraftMessage::user("hi").into_message();
        assert_ne!(a.id, b.id);
        assert!(!a.is_streaming);
    }

    #[test]
    fn draft_with_preassigned_id_keeps_it() {
        let draft = DraftMessage::assistant_placeholder("msg-42");
        let message = draft.into_message();
        assert_eq!(message.id, "msg-42");
        assert_eq!(message.role, Role::Assistant);
        assert!(message.content.is_empty());
    }

    #[test]
    fn message_serializes_with_camel_case_and_lowercase_role() {
        let message = Message::user("hello");
        let json = serde_json::to_value(&message).unwrap();
        assert_eq!(json["role"], "user");
        assert!(json.get("isStreaming").is_some());
        assert!(json.get("timestamp").unwrap().is_string());
    }

    #[test]
    fn message_deserializes_without_streaming_flag() {
        let json = serde_json::json!({
            "id": "m1",
            "role": "assistant",
            "content": "hi",
            "timestamp": "2025-06-01T12:00:00Z",
        });
        let message: Message = serde_json::from_value(json).unwrap();
        assert!(!message.is_streaming);
        assert_eq!(message.role, Role::Assistant);
    }
}
