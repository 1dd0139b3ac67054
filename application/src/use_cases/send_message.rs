//! SendMessage use case — drives one user turn end to end.
//!
//! Appends the user message, creates the assistant placeholder, opens the
//! relay stream, and feeds accumulated text back into the store as chunks
//! arrive. Exactly one of the [`SendOutcome`] variants describes how the
//! turn ended.

use crate::ports::chat_relay::{ChatRelay, RelayTurn};
use crate::store::ChatStore;
use assist_domain::{DraftMessage, StreamEvent};
use std::sync::Arc;
use tracing::debug;

/// Placeholder text shown when a stream fails; the user must resend.
const APOLOGY_MESSAGE: &str = "Sorry, I encountered an error. Please try again.";

/// How a send finished.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SendOutcome {
    /// The stream completed; carries the full assistant response.
    Completed(String),
    /// The request or stream failed; carries the user-facing reason, which
    /// has also been recorded in the store's error slot.
    Failed(String),
    /// The caller cancelled the request. Store flags are left untouched —
    /// the cancelling caller settles them.
    Cancelled,
}

/// Use case for sending one user message and streaming the reply.
pub struct SendMessageUseCase<R: ChatRelay> {
    relay: Arc<R>,
}

impl<R: ChatRelay> SendMessageUseCase<R> {
    pub fn new(relay: Arc<R>) -> Self {
        Self { relay }
    }

    /// Send `content` as the next user turn of the current session,
    /// creating a session when none is selected.
    ///
    /// `on_chunk` fires once per received chunk, in transmission order,
    /// for live display. The store receives the whole accumulated text on
    /// every chunk (replace, not append), so out-of-order application is
    /// structurally impossible.
    pub async fn execute(
        &self,
        store: &mut ChatStore,
        content: &str,
        mut on_chunk: impl FnMut(&str),
    ) -> SendOutcome {
        let session_id = match store.current_session_id() {
            Some(id) => id.to_string(),
            None => store.create_session(),
        };

        store.append_message(&session_id, DraftMessage::user(content));

        // Snapshot the history before the placeholder exists: all messages
        // so far, ending with the new user turn.
        let history: Vec<RelayTurn> = store
            .session(&session_id)
            .map(|session| {
                session
                    .messages
                    .iter()
                    .map(|m| RelayTurn::new(m.role, m.content.clone()))
                    .collect()
            })
            .unwrap_or_default();

        // Pre-allocate the placeholder id so streaming updates can address
        // the message directly.
        let placeholder_id = uuid::Uuid::new_v4().to_string();
        store.append_message(
            &session_id,
            DraftMessage::assistant_placeholder(placeholder_id.clone()),
        );

        store.set_streaming(true);
        store.set_error(None);

        let handle = match self.relay.open_stream(history).await {
            Ok(handle) => handle,
            Err(e) => {
                return self.fail(store, &session_id, &placeholder_id, e.to_string());
            }
        };

        let mut receiver = handle.receiver;
        let mut accumulated = String::new();
        let mut terminal: Option<Result<(), String>> = None;

        while let Some(event) = receiver.recv().await {
            match event {
                StreamEvent::Delta(chunk) => {
                    on_chunk(&chunk);
                    accumulated.push_str(&chunk);
                    store.update_streaming_content(
                        &session_id,
                        &placeholder_id,
                        accumulated.clone(),
                    );
                }
                StreamEvent::Done => {
                    terminal = Some(Ok(()));
                    break;
                }
                StreamEvent::Error(reason) => {
                    terminal = Some(Err(reason));
                    break;
                }
            }
        }

        match terminal {
            Some(Ok(())) => {
                // Settles every streaming flag and persists the streamed
                // content that update_streaming_content deferred.
                store.set_streaming(false);
                SendOutcome::Completed(accumulated)
            }
            Some(Err(reason)) => self.fail(store, &session_id, &placeholder_id, reason),
            // Channel closed without a terminal event: caller-initiated
            // cancellation. Partial text stays in the session; the
            // cancelling caller is responsible for set_streaming(false).
            None => {
                debug!("stream closed without terminal event, treating as cancelled");
                SendOutcome::Cancelled
            }
        }
    }

    fn fail(
        &self,
        store: &mut ChatStore,
        session_id: &str,
        placeholder_id: &str,
        reason: String,
    ) -> SendOutcome {
        store.set_error(Some(reason.clone()));
        store.update_streaming_content(session_id, placeholder_id, APOLOGY_MESSAGE);
        store.set_streaming(false);
        SendOutcome::Failed(reason)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ports::chat_relay::{RelayError, StreamHandle};
    use crate::ports::state_store::NoStateStore;
    use assist_domain::Role;
    use async_trait::async_trait;
    use std::sync::Mutex;
    use tokio::sync::mpsc;

    /// Relay fake that replays a scripted event sequence and records the
    /// history it was given. A script without a terminal event closes the
    /// channel silently, the same shape a cancelled request produces.
    struct ScriptedRelay {
        script: Mutex<Vec<StreamEvent>>,
        seen_history: Mutex<Option<Vec<RelayTurn>>>,
    }

    impl ScriptedRelay {
        fn new(script: Vec<StreamEvent>) -> Self {
            Self {
                script: Mutex::new(script),
                seen_history: Mutex::new(None),
            }
        }
    }

    #[async_trait]
    impl ChatRelay for ScriptedRelay {
        async fn open_stream(
            &self,
            history: Vec<RelayTurn>,
        ) -> Result<StreamHandle, RelayError> {
            *self.seen_history.lock().unwrap() = Some(history);
            let script: Vec<StreamEvent> = self.script.lock().unwrap().drain(..).collect();
            let (tx, rx) = mpsc::channel(16);
            tokio::spawn(async move {
                for event in script {
                    if tx.send(event).await.is_err() {
                        return;
                    }
                }
                // Sender drops here; without a terminal event in the script
                // this closes the channel silently.
            });
            Ok(StreamHandle::new(rx))
        }

        fn cancel(&self) {}
    }

    /// Relay fake whose request fails before any stream opens.
    struct RefusingRelay(u16);

    #[async_trait]
    impl ChatRelay for RefusingRelay {
        async fn open_stream(
            &self,
            _history: Vec<RelayTurn>,
        ) -> Result<StreamHandle, RelayError> {
            Err(RelayError::from_status(self.0))
        }

        fn cancel(&self) {}
    }

    fn store() -> ChatStore {
        ChatStore::new(std::sync::Arc::new(NoStateStore))
    }

    #[tokio::test]
    async fn completed_turn_grows_session_by_two_settled_messages() {
        let relay = Arc::new(ScriptedRelay::new(vec![
            StreamEvent::Delta("Hi".to_string()),
            StreamEvent::Delta(" there".to_string()),
            StreamEvent::Done,
        ]));
        let use_case = SendMessageUseCase::new(relay.clone());
        let mut store = store();

        let mut chunks = Vec::new();
        let outcome = use_case
            .execute(&mut store, "hello?", |chunk| chunks.push(chunk.to_string()))
            .await;

        assert_eq!(outcome, SendOutcome::Completed("Hi there".to_string()));
        assert_eq!(chunks, vec!["Hi", " there"]);

        let session = store.current_session().unwrap();
        assert_eq!(session.messages.len(), 2);
        assert_eq!(session.messages[0].role, Role::User);
        assert_eq!(session.messages[0].content, "hello?");
        assert_eq!(session.messages[1].role, Role::Assistant);
        assert_eq!(session.messages[1].content, "Hi there");
        assert!(!session.messages[1].is_streaming);
        assert!(!store.is_streaming());
        assert!(store.error().is_none());

        // The placeholder was excluded from the transmitted history.
        let history = relay.seen_history.lock().unwrap().take().unwrap();
        assert_eq!(history.len(), 1);
        assert_eq!(history[0].content, "hello?");
    }

    #[tokio::test]
    async fn creates_a_session_when_none_is_current() {
        let relay = Arc::new(ScriptedRelay::new(vec![StreamEvent::Done]));
        let use_case = SendMessageUseCase::new(relay);
        let mut store = store();
        assert!(store.current_session_id().is_none());

        use_case.execute(&mut store, "hello?", |_| {}).await;

        assert!(store.current_session_id().is_some());
        assert_eq!(store.sessions().len(), 1);
    }

    #[tokio::test]
    async fn stream_error_overwrites_placeholder_with_apology() {
        let relay = Arc::new(ScriptedRelay::new(vec![
            StreamEvent::Delta("partial".to_string()),
            StreamEvent::Error("quota exceeded".to_string()),
        ]));
        let use_case = SendMessageUseCase::new(relay);
        let mut store = store();

        let outcome = use_case.execute(&mut store, "hello?", |_| {}).await;

        assert_eq!(outcome, SendOutcome::Failed("quota exceeded".to_string()));
        assert_eq!(store.error(), Some("quota exceeded"));
        let session = store.current_session().unwrap();
        assert_eq!(session.messages[1].content, APOLOGY_MESSAGE);
        assert!(!session.messages[1].is_streaming);
        assert!(!store.is_streaming());
    }

    #[tokio::test]
    async fn request_failure_maps_status_to_readable_reason() {
        let use_case = SendMessageUseCase::new(Arc::new(RefusingRelay(429)));
        let mut store = store();

        let outcome = use_case.execute(&mut store, "hello?", |_| {}).await;

        assert_eq!(
            outcome,
            SendOutcome::Failed("Rate limit exceeded. Please try again later.".to_string())
        );
        assert_eq!(
            store.error(),
            Some("Rate limit exceeded. Please try again later.")
        );
    }

    #[tokio::test]
    async fn silent_close_is_cancellation_and_leaves_flags_to_caller() {
        let relay = Arc::new(ScriptedRelay::new(vec![StreamEvent::Delta(
            "partial answer".to_string(),
        )]));
        let use_case = SendMessageUseCase::new(relay);
        let mut store = store();

        let outcome = use_case.execute(&mut store, "hello?", |_| {}).await;

        assert_eq!(outcome, SendOutcome::Cancelled);
        // Partial text stays; the global flag is still set until the
        // cancelling caller settles it.
        assert!(store.is_streaming());
        let session = store.current_session().unwrap();
        assert_eq!(session.messages[1].content, "partial answer");

        store.set_streaming(false);
        assert!(!store.current_session().unwrap().messages[1].is_streaming);
    }

    #[tokio::test]
    async fn history_ends_with_the_new_user_turn() {
        let relay = Arc::new(ScriptedRelay::new(vec![StreamEvent::Done]));
        let use_case = SendMessageUseCase::new(relay.clone());
        let mut store = store();
        let session_id = store.create_session();
        store.append_message(&session_id, DraftMessage::user("earlier question"));
        store.append_message(
            &session_id,
            DraftMessage::new(Role::Assistant, "earlier answer"),
        );

        use_case.execute(&mut store, "follow-up", |_| {}).await;

        let history = relay.seen_history.lock().unwrap().take().unwrap();
        assert_eq!(history.len(), 3);
        assert_eq!(history[0].content, "earlier question");
        assert_eq!(history[1].content, "earlier answer");
        assert_eq!(history[2].content, "follow-up");
        assert_eq!(history[2].role, Role::User);
    }
}
