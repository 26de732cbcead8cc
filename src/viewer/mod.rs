//! Composition of layout, selection, explanation and chat.
//!
//! `Viewer` is the surface an embedding shell drives: it forwards block
//! clicks into [`select`](Viewer::select), reads back the explanation and
//! chat transcript for the side panel, and renders the block layout from
//! [`blocks`](Viewer::blocks).
//!
//! Selection changes bump an epoch counter, and every explanation fetch is
//! two-phase against it: in-flight service calls are never cancelled, so a
//! response that arrives after the context changed must be detected and
//! dropped instead of overwriting newer state.

use std::sync::Arc;

use thiserror::Error;
use tracing::debug;

use crate::chat::{ChatClient, ChatError, SendOutcome, Transcript};
use crate::config::{ApiConfig, ConfigError};
use crate::explain::ExplanationClient;
use crate::genai::{GeminiClient, GenerativeService, ServiceError};
use crate::layout::{self, Block};
use crate::selection::Selection;

#[derive(Error, Debug)]
pub enum ViewerError {
    #[error("unknown block id: {0}")]
    UnknownBlock(String),
    #[error("configuration error: {0}")]
    Config(#[from] ConfigError),
    #[error("service error: {0}")]
    Service(#[from] ServiceError),
    #[error(transparent)]
    Chat(#[from] ChatError),
}

/// Ticket for one explanation fetch, pinned to the selection context it
/// was issued under.
#[derive(Debug, Clone)]
pub struct ExplanationRequest {
    epoch: u64,
    pub label: String,
}

pub struct Viewer<S: GenerativeService> {
    selection: Selection,
    epoch: u64,
    explanation: Option<String>,
    explainer: ExplanationClient<Arc<S>>,
    chat: ChatClient<Arc<S>>,
}

impl Viewer<GeminiClient> {
    /// Viewer over the production service, configured from the
    /// environment. Hard failure here (missing key, bad config) leaves
    /// the shell free to render the diagram without the AI panel.
    pub fn from_env() -> Result<Self, ViewerError> {
        let config = ApiConfig::from_env()?;
        Ok(Self::new(GeminiClient::new(config)?))
    }
}

impl<S: GenerativeService> Viewer<S> {
    pub fn new(service: S) -> Self {
        let service = Arc::new(service);
        Self {
            selection: Selection::new(),
            epoch: 0,
            explanation: None,
            explainer: ExplanationClient::new(Arc::clone(&service)),
            chat: ChatClient::new(service),
        }
    }

    /// The immutable diagram this viewer presents.
    pub fn blocks(&self) -> &'static [Block] {
        layout::diagram()
    }

    pub fn selection(&self) -> Option<&str> {
        self.selection.current()
    }

    pub fn selected_block(&self) -> Option<&'static Block> {
        layout::find(self.selection.current()?)
    }

    pub fn explanation(&self) -> Option<&str> {
        self.explanation.as_deref()
    }

    pub fn transcript(&self) -> &Transcript {
        self.chat.transcript()
    }

    pub fn is_chat_busy(&self) -> bool {
        self.chat.is_busy()
    }

    /// Select a block by id. Discards the previous explanation and chat
    /// context, even when reselecting the same block (which re-fetches).
    pub fn select(&mut self, id: &str) -> Result<&'static Block, ViewerError> {
        let block = layout::find(id).ok_or_else(|| ViewerError::UnknownBlock(id.to_string()))?;
        self.selection.select(block.id.as_str());
        self.enter_new_context();
        Ok(block)
    }

    /// Close the inspection panel: no selection, no dependent state.
    pub fn clear(&mut self) {
        self.selection.clear();
        self.enter_new_context();
    }

    fn enter_new_context(&mut self) {
        self.epoch += 1;
        self.explanation = None;
        self.chat.reset();
    }

    /// First phase of an explanation fetch: capture the label and the
    /// context it belongs to. `None` when nothing is selected.
    pub fn begin_explanation(&self) -> Option<ExplanationRequest> {
        let block = self.selected_block()?;
        Some(ExplanationRequest {
            epoch: self.epoch,
            label: block.label.clone(),
        })
    }

    /// Second phase: store the fetched text, unless the selection context
    /// moved on while the request was in flight. Returns whether the text
    /// was applied.
    pub fn apply_explanation(&mut self, request: &ExplanationRequest, text: String) -> bool {
        if request.epoch != self.epoch {
            debug!(label = %request.label, "dropping stale explanation response");
            return false;
        }
        self.explanation = Some(text);
        true
    }

    /// Both phases in one call, for single-task callers.
    pub async fn explain_selected(&mut self) -> Option<&str> {
        let request = self.begin_explanation()?;
        let text = self.explainer.explain(&request.label).await;
        self.apply_explanation(&request, text);
        self.explanation.as_deref()
    }

    /// Forward one chat message about the current selection. Without a
    /// selection there is no panel, so the input is ignored.
    pub async fn send_chat(
        &mut self,
        message: &str,
        on_chunk: impl FnMut(&str) + Send,
    ) -> Result<SendOutcome, ViewerError> {
        if self.selection.current().is_none() {
            return Ok(SendOutcome::Ignored);
        }
        Ok(self.chat.send(message, on_chunk).await?)
    }
}

#[cfg(test)]
mod tests {
    use async_trait::async_trait;
    use futures::StreamExt;

    use super::*;
    use crate::genai::{ChunkStream, Turn};

    /// Always answers; enough to drive the composition paths.
    struct CannedService;

    #[async_trait]
    impl GenerativeService for CannedService {
        async fn generate(&self, _framing: &str, prompt: &str) -> Result<String, ServiceError> {
            Ok(format!("explanation for: {prompt}"))
        }

        async fn stream_chat(
            &self,
            _framing: &str,
            _history: &[Turn],
        ) -> Result<ChunkStream, ServiceError> {
            Ok(futures::stream::iter(vec![Ok("reply".to_string())]).boxed())
        }
    }

    fn viewer() -> Viewer<CannedService> {
        Viewer::new(CannedService)
    }

    #[test]
    fn selecting_an_unknown_id_fails() {
        let mut v = viewer();
        assert!(matches!(
            v.select("Encoder-dropout"),
            Err(ViewerError::UnknownBlock(_))
        ));
        assert_eq!(v.selection(), None);
    }

    #[tokio::test]
    async fn select_then_clear_discards_explanation_and_transcript() {
        let mut v = viewer();
        let block = v.select("Encoder-attention").unwrap();
        assert_eq!(block.label, "Multi-Head Self-Attention");

        v.explain_selected().await;
        v.send_chat("why?", |_| {}).await.unwrap();
        assert!(v.explanation().is_some());
        assert!(!v.transcript().is_empty());

        v.clear();
        assert_eq!(v.selection(), None);
        assert!(v.explanation().is_none());
        assert!(v.transcript().is_empty());
    }

    #[tokio::test]
    async fn selecting_another_block_resets_dependent_state() {
        let mut v = viewer();
        v.select("Encoder-attention").unwrap();
        v.explain_selected().await;
        v.send_chat("why?", |_| {}).await.unwrap();

        v.select("Decoder-softmax").unwrap();
        assert_eq!(v.selection(), Some("Decoder-softmax"));
        assert!(v.explanation().is_none());
        assert!(v.transcript().is_empty());

        let text = v.explain_selected().await.unwrap();
        assert!(text.contains("Softmax"));
    }

    #[tokio::test]
    async fn stale_explanation_response_is_dropped() {
        let mut v = viewer();
        v.select("Encoder-ffn").unwrap();
        let stale = v.begin_explanation().unwrap();

        // Context moves on before the response lands.
        v.select("Decoder-linear").unwrap();
        assert!(!v.apply_explanation(&stale, "late answer".to_string()));
        assert!(v.explanation().is_none());

        let fresh = v.begin_explanation().unwrap();
        assert!(v.apply_explanation(&fresh, "on time".to_string()));
        assert_eq!(v.explanation(), Some("on time"));
    }

    #[tokio::test]
    async fn chat_without_a_selection_is_ignored() {
        let mut v = viewer();
        let outcome = v.send_chat("hello", |_| {}).await.unwrap();
        assert_eq!(outcome, SendOutcome::Ignored);
        assert!(v.transcript().is_empty());
    }

    #[test]
    fn begin_explanation_requires_a_selection() {
        let v = viewer();
        assert!(v.begin_explanation().is_none());
    }
}
