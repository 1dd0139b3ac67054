//! HTTP adapter for the streaming relay endpoint.
//!
//! [`SseChatRelay`] implements the [`ChatRelay`] port over reqwest: one
//! `POST` per [`open_stream`](ChatRelay::open_stream) call, a background
//! pump task that feeds decoded [`StreamEvent`]s into the returned channel,
//! and a per-request [`CancellationToken`] for silent cancellation.
//!
//! Only the most recent request's token is tracked: a second concurrent
//! call supersedes the first call's cancellation state, so callers should
//! serialize sends or accept that `cancel` aborts the latest request only.
//!
//! No timeouts are imposed here — a hung connection blocks until the
//! caller cancels.

use crate::relay::sse::{SseDecoder, SsePayload};
use assist_application::ports::chat_relay::{ChatRelay, RelayError, RelayTurn, StreamHandle};
use assist_domain::StreamEvent;
use async_trait::async_trait;
use futures::{Stream, StreamExt};
use serde::{Deserialize, Serialize};
use std::sync::Mutex;
use tokio::sync::mpsc;
use tokio_util::sync::CancellationToken;
use tracing::debug;

/// Events buffered between the pump task and a slow consumer.
const CHANNEL_CAPACITY: usize = 32;

#[derive(Debug, Serialize)]
struct RelayRequest {
    messages: Vec<RelayTurn>,
}

#[derive(Debug, Deserialize)]
struct ErrorBody {
    error: Option<String>,
}

/// Streaming relay client over HTTP + SSE.
pub struct SseChatRelay {
    client: reqwest::Client,
    endpoint: String,
    current: Mutex<CancellationToken>,
}

impl SseChatRelay {
    pub fn new(endpoint: impl Into<String>) -> Self {
        Self {
            client: reqwest::Client::new(),
            endpoint: endpoint.into(),
            current: Mutex::new(CancellationToken::new()),
        }
    }

    pub fn endpoint(&self) -> &str {
        &self.endpoint
    }
}

#[async_trait]
impl ChatRelay for SseChatRelay {
    async fn open_stream(&self, history: Vec<RelayTurn>) -> Result<StreamHandle, RelayError> {
        // A fresh token per request; storing it supersedes the previous
        // request's cancellation state.
        let token = CancellationToken::new();
        if let Ok(mut current) = self.current.lock() {
            *current = token.clone();
        }

        debug!("Opening relay stream ({} turns)", history.len());

        let response = self
            .client
            .post(&self.endpoint)
            .json(&RelayRequest { messages: history })
            .send()
            .await
            .map_err(|e| RelayError::Network(e.to_string()))?;

        let status = response.status();
        if !status.is_success() {
            let status = status.as_u16();
            // A structured {error} body takes precedence over the bare
            // status-code classification.
            let body = response.json::<ErrorBody>().await.ok();
            return Err(match body.and_then(|b| b.error) {
                Some(message) => RelayError::Api { status, message },
                None => RelayError::from_status(status),
            });
        }

        let (tx, rx) = mpsc::channel(CHANNEL_CAPACITY);
        let byte_stream = Box::pin(response.bytes_stream());
        tokio::spawn(pump_stream(byte_stream, tx, token));

        Ok(StreamHandle::new(rx))
    }

    fn cancel(&self) {
        if let Ok(current) = self.current.lock() {
            debug!("Cancelling in-flight relay request");
            current.cancel();
        }
    }
}

/// Read the response body, decode records, and forward events until a
/// terminal payload, stream exhaustion, or cancellation.
///
/// Emits at most one terminal event. Cancellation exits without emitting
/// anything; the channel just closes.
async fn pump_stream<S, B, E>(
    mut stream: S,
    tx: mpsc::Sender<StreamEvent>,
    cancellation: CancellationToken,
) where
    S: Stream<Item = Result<B, E>> + Unpin,
    B: AsRef<[u8]>,
    E: std::fmt::Display,
{
    let mut decoder = SseDecoder::new();

    loop {
        let chunk = tokio::select! {
            biased;
            _ = cancellation.cancelled() => {
                debug!("Relay stream cancelled");
                return;
            }
            chunk = stream.next() => chunk,
        };

        match chunk {
            Some(Ok(bytes)) => {
                for payload in decoder.feed(bytes.as_ref()) {
                    match payload {
                        SsePayload::Content(text) => {
                            if tx.send(StreamEvent::Delta(text)).await.is_err() {
                                // Receiver gone; nobody is listening.
                                return;
                            }
                        }
                        SsePayload::Done => {
                            let _ = tx.send(StreamEvent::Done).await;
                            return;
                        }
                        SsePayload::StreamError(reason) => {
                            let _ = tx.send(StreamEvent::Error(reason)).await;
                            return;
                        }
                    }
                }
            }
            Some(Err(e)) => {
                let reason = RelayError::Network(e.to_string()).to_string();
                let _ = tx.send(StreamEvent::Error(reason)).await;
                return;
            }
            // Exhaustion without an explicit [DONE] is an implicit
            // completion.
            None => {
                debug!("Relay stream ended without completion sentinel");
                let _ = tx.send(StreamEvent::Done).await;
                return;
            }
        }
    }
}
