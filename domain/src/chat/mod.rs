//! Chat conversation domain.
//!
//! - [`entities::ChatSession`] — one conversation thread and its messages
//! - [`entities::Message`] / [`entities::DraftMessage`] — messages and their
//!   pre-insertion form
//! - [`preferences::UserPreferences`] — theme and scrolling preferences
//! - [`snapshot::StoredState`] — the persisted store snapshot
//! - [`stream::StreamEvent`] — events in a streaming relay response

pub mod entities;
pub mod preferences;
pub mod snapshot;
pub mod stream;
