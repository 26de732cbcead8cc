//! Conversation transcript and the streaming-update reducer.
//!
//! The transcript is append-only except for one mutation: while a model
//! reply streams in, the trailing placeholder message's text is replaced
//! with the running accumulator on every chunk. That update lives here,
//! behind [`Transcript::apply_chunk`], so it is testable without any
//! transport.

use serde::Serialize;
use tracing::warn;

use crate::genai::Role;

/// One displayed chat message. `streaming` marks a model message still
/// being extended by incoming chunks.
#[derive(Debug, Clone, Serialize)]
pub struct ChatMessage {
    pub role: Role,
    pub text: String,
    pub streaming: bool,
}

#[derive(Debug, Default, Clone)]
pub struct Transcript {
    messages: Vec<ChatMessage>,
}

impl Transcript {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn messages(&self) -> &[ChatMessage] {
        &self.messages
    }

    pub fn last(&self) -> Option<&ChatMessage> {
        self.messages.last()
    }

    pub fn is_empty(&self) -> bool {
        self.messages.is_empty()
    }

    pub fn clear(&mut self) {
        self.messages.clear();
    }

    pub fn push_user(&mut self, text: impl Into<String>) {
        self.messages.push(ChatMessage {
            role: Role::User,
            text: text.into(),
            streaming: false,
        });
    }

    /// Empty model message awaiting streamed text.
    pub fn push_placeholder(&mut self) {
        self.messages.push(ChatMessage {
            role: Role::Model,
            text: String::new(),
            streaming: true,
        });
    }

    /// Replace the trailing streaming message's text with `accumulated`
    /// (the full text so far, not a delta). The intermediate state is
    /// observable after every call.
    pub fn apply_chunk(&mut self, accumulated: &str) {
        match self.streaming_tail() {
            Some(msg) => msg.text = accumulated.to_string(),
            None => warn!("chunk arrived with no streaming message in the transcript"),
        }
    }

    /// Mark the trailing streaming message complete; text unchanged.
    pub fn finish_streaming(&mut self) {
        if let Some(msg) = self.streaming_tail() {
            msg.streaming = false;
        }
    }

    /// Append `notice` to whatever text accumulated and mark the message
    /// complete. The partial answer is preserved, not discarded.
    pub fn fail_streaming(&mut self, notice: &str) {
        if let Some(msg) = self.streaming_tail() {
            msg.text.push_str(notice);
            msg.streaming = false;
        }
    }

    fn streaming_tail(&mut self) -> Option<&mut ChatMessage> {
        self.messages.last_mut().filter(|m| m.streaming)
    }
}
