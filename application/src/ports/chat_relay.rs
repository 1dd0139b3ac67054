//! Chat relay port
//!
//! Defines the interface for the streaming relay endpoint that forwards
//! conversations to the upstream language-model provider.

use assist_domain::{Role, StreamEvent};
use async_trait::async_trait;
use serde::Serialize;
use thiserror::Error;
use tokio::sync::mpsc;

/// Errors that can occur when opening or consuming a relay stream.
///
/// Display strings are the user-facing classification surfaced in the
/// store's error slot, so they are written for humans, not for logs.
#[derive(Error, Debug)]
pub enum RelayError {
    #[error("Invalid API key. Please check your configuration.")]
    InvalidApiKey,

    #[error("Rate limit exceeded. Please try again later.")]
    RateLimited,

    #[error("Server error. Please try again.")]
    ServerError,

    #[error("AI service temporarily unavailable.")]
    Unavailable,

    /// The relay returned a structured `{error}` body; its message takes
    /// precedence over the status-code classification.
    #[error("{message}")]
    Api { status: u16, message: String },

    #[error("Request failed with status {0}")]
    Http(u16),

    #[error("Network error: {0}")]
    Network(String),

    /// An in-stream `{error}` record after the response already opened.
    #[error("{0}")]
    Stream(String),
}

impl RelayError {
    /// Classify a non-success HTTP status without a structured error body.
    pub fn from_status(status: u16) -> Self {
        match status {
            401 => RelayError::InvalidApiKey,
            429 => RelayError::RateLimited,
            500 => RelayError::ServerError,
            503 => RelayError::Unavailable,
            other => RelayError::Http(other),
        }
    }
}

/// One turn of the conversation as sent over the wire.
#[derive(Debug, Clone, Serialize)]
pub struct RelayTurn {
    pub role: Role,
    pub content: String,
}

impl RelayTurn {
    pub fn new(role: Role, content: impl Into<String>) -> Self {
        Self {
            role,
            content: content.into(),
        }
    }
}

/// Handle for receiving streaming events from an open relay request.
///
/// Wraps an `mpsc::Receiver<StreamEvent>`. A well-formed stream delivers
/// zero or more `Delta` events and then exactly one terminal event; a
/// cancelled stream closes the channel without any terminal event.
pub struct StreamHandle {
    pub receiver: mpsc::Receiver<StreamEvent>,
}

impl StreamHandle {
    pub fn new(receiver: mpsc::Receiver<StreamEvent>) -> Self {
        Self { receiver }
    }

    /// Consume the stream and collect all chunk text into a single string.
    ///
    /// Useful when streaming display is not needed (e.g. one-shot mode).
    /// A channel that closes without a terminal event (cancellation) returns
    /// whatever text had arrived.
    pub async fn collect_text(mut self) -> Result<String, RelayError> {
        let mut full_text = String::new();
        while let Some(event) = self.receiver.recv().await {
            match event {
                StreamEvent::Delta(chunk) => full_text.push_str(&chunk),
                StreamEvent::Done => return Ok(full_text),
                StreamEvent::Error(reason) => return Err(RelayError::Stream(reason)),
            }
        }
        Ok(full_text)
    }
}

/// Gateway to the streaming relay endpoint.
///
/// Implementations (adapters) live in the infrastructure layer. Each
/// `open_stream` call opens exactly one underlying request; only the most
/// recent request is tracked for cancellation, so a second concurrent call
/// supersedes the first call's cancellation state.
#[async_trait]
pub trait ChatRelay: Send + Sync {
    /// Open a streaming request carrying the full conversation so far.
    ///
    /// The caller is responsible for excluding the empty assistant
    /// placeholder and ensuring the last entry is the new user turn.
    async fn open_stream(&self, history: Vec<RelayTurn>) -> Result<StreamHandle, RelayError>;

    /// Abort the in-flight request, if any.
    ///
    /// Cancellation is silent: the stream's channel closes without a
    /// terminal event.
    fn cancel(&self);
}
