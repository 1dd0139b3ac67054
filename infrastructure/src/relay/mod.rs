//! Streaming relay adapter.
//!
//! - [`client::SseChatRelay`] — reqwest-based implementation of the
//!   [`ChatRelay`](assist_application::ChatRelay) port
//! - [`sse::SseDecoder`] — incremental decoder for the event stream

pub mod client;
pub mod sse;

pub use client::SseChatRelay;
