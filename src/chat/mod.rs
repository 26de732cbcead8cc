//! Follow-up chat about the currently viewed block.
//!
//! One send at a time: the client owns an explicit in-flight guard instead
//! of trusting the shell to disable its input. Per send the state machine
//! is idle → sending → streaming → idle, with every failure after the
//! stream opened absorbed back to idle (the partial answer stays in the
//! transcript). Failing to reach the service at all before any chunk
//! arrived takes the same absorption path; only constructing the service
//! client itself is a hard error, and that happens elsewhere.

mod transcript;

use futures::StreamExt;
use thiserror::Error;
use tracing::{debug, warn};
use uuid::Uuid;

use crate::genai::{GenerativeService, Turn};
use crate::prompts;

pub use transcript::{ChatMessage, Transcript};

/// Hard failures only; transport and stream failures are absorbed into
/// the transcript (see [`ChatClient::send`]). Failures to construct the
/// service client itself surface as [`crate::genai::ServiceError`] where
/// the client is built.
#[derive(Error, Debug)]
pub enum ChatError {
    #[error("a chat request is already in flight")]
    Busy,
}

/// Whether a send actually went out.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SendOutcome {
    /// The message was sent and the reply (possibly partial) is in the
    /// transcript.
    Completed,
    /// Whitespace-only input; nothing appended, no request issued.
    Ignored,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum SendState {
    Idle,
    Sending,
    Streaming,
}

/// Conversational context with the service, lazily created on first send
/// and scoped to the current viewing context. The framing string is fixed
/// at creation; the history holds completed exchanges only.
#[derive(Debug)]
struct ChatSession {
    id: Uuid,
    framing: String,
    history: Vec<Turn>,
}

impl ChatSession {
    fn new(framing: &str) -> Self {
        let session = Self {
            id: Uuid::new_v4(),
            framing: framing.to_string(),
            history: Vec::new(),
        };
        debug!(session_id = %session.id, "chat session created");
        session
    }

    /// Full turn sequence for one request: completed history plus the
    /// message being sent.
    fn request_turns(&self, pending: &str) -> Vec<Turn> {
        let mut turns = self.history.clone();
        turns.push(Turn::user(pending));
        turns
    }

    fn record(&mut self, user: &str, model: &str) {
        self.history.push(Turn::user(user));
        self.history.push(Turn::model(model));
    }
}

pub struct ChatClient<S> {
    service: S,
    session: Option<ChatSession>,
    transcript: Transcript,
    state: SendState,
}

impl<S: GenerativeService> ChatClient<S> {
    pub fn new(service: S) -> Self {
        Self {
            service,
            session: None,
            transcript: Transcript::new(),
            state: SendState::Idle,
        }
    }

    pub fn transcript(&self) -> &Transcript {
        &self.transcript
    }

    pub fn is_busy(&self) -> bool {
        self.state != SendState::Idle
    }

    #[cfg(test)]
    pub(crate) fn force_busy(&mut self) {
        self.state = SendState::Sending;
    }

    /// Discard the session and transcript together. Called whenever the
    /// viewed block changes; the next send starts a fresh context.
    pub fn reset(&mut self) {
        self.session = None;
        self.transcript.clear();
        self.state = SendState::Idle;
    }

    /// Send one user message and stream the reply into the transcript.
    ///
    /// The user message is appended before any network activity, followed
    /// by a streaming placeholder. `on_chunk` is invoked after each chunk
    /// has been applied, with the chunk text (not the accumulator). A
    /// stream that fails after opening leaves the partial reply in the
    /// transcript with the fixed error notice appended, and still returns
    /// `Ok(Completed)`.
    pub async fn send(
        &mut self,
        message: &str,
        mut on_chunk: impl FnMut(&str) + Send,
    ) -> Result<SendOutcome, ChatError> {
        let trimmed = message.trim();
        if trimmed.is_empty() {
            return Ok(SendOutcome::Ignored);
        }
        if self.is_busy() {
            return Err(ChatError::Busy);
        }

        let (framing, turns) = {
            let session = self
                .session
                .get_or_insert_with(|| ChatSession::new(&prompts::pack().chat.framing));
            (session.framing.clone(), session.request_turns(trimmed))
        };

        self.transcript.push_user(trimmed);
        self.transcript.push_placeholder();
        self.state = SendState::Sending;

        let mut accumulated = String::new();
        let mut interrupted = false;

        match self.service.stream_chat(&framing, &turns).await {
            Ok(mut chunks) => {
                self.state = SendState::Streaming;
                while let Some(item) = chunks.next().await {
                    match item {
                        Ok(chunk) => {
                            accumulated.push_str(&chunk);
                            self.transcript.apply_chunk(&accumulated);
                            on_chunk(&chunk);
                        }
                        Err(e) => {
                            warn!(error = %e, "chat stream failed mid-reply");
                            interrupted = true;
                            break;
                        }
                    }
                }
            }
            Err(e) => {
                warn!(error = %e, "chat request could not be issued");
                interrupted = true;
            }
        }

        if interrupted {
            self.transcript.fail_streaming(&prompts::pack().chat.error_notice);
        } else {
            self.transcript.finish_streaming();
            // Only completed exchanges are replayed to the service.
            if let Some(session) = self.session.as_mut() {
                session.record(trimmed, &accumulated);
            }
        }
        self.state = SendState::Idle;

        Ok(SendOutcome::Completed)
    }
}
