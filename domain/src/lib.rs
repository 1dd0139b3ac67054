//! Domain layer for assist-chat
//!
//! This crate contains the conversation entities and value objects shared by
//! every other layer. It has no dependencies on infrastructure or
//! presentation concerns.
//!
//! # Core Concepts
//!
//! ## Sessions
//!
//! A [`ChatSession`] is one independent conversation thread with its own
//! message history. The store keeps sessions ordered newest-first for
//! display; that ordering is not an invariant of the persisted snapshot.
//!
//! ## Streaming
//!
//! Assistant responses arrive as a stream of [`StreamEvent`]s: zero or more
//! text deltas followed by exactly one terminal event. The placeholder
//! message they feed is addressed by a pre-allocated id.

pub mod chat;

// Re-export commonly used types
pub use chat::{
    entities::{ChatSession, DEFAULT_SESSION_TITLE, DraftMessage, Message, Role},
    preferences::{PreferencesPatch, Theme, UserPreferences},
    snapshot::StoredState,
    stream::StreamEvent,
};
