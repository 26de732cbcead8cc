//! AI explanation lookup for a selected block.
//!
//! One non-streamed request per selection change. Failures never escape:
//! the caller always gets text to display, either the service's answer
//! verbatim or the fixed fallback string.

use tracing::{debug, warn};

use crate::genai::GenerativeService;
use crate::prompts;

pub struct ExplanationClient<S> {
    service: S,
}

impl<S: GenerativeService> ExplanationClient<S> {
    pub fn new(service: S) -> Self {
        Self { service }
    }

    /// Fetch an explanation for one block label. Infallible by design: any
    /// failure (transport, auth, malformed or empty response) is swallowed,
    /// logged for operators, and replaced by the fallback text. No retries,
    /// no caching; reselecting the same block re-requests.
    pub async fn explain(&self, label: &str) -> String {
        let texts = &prompts::pack().explain;
        let prompt = prompts::explanation_prompt(label);

        match self.service.generate(&texts.framing, &prompt).await {
            Ok(text) => {
                debug!(label, chars = text.len(), "explanation fetched");
                text
            }
            Err(e) => {
                warn!(label, error = %e, "explanation fetch failed, serving fallback");
                texts.fallback.clone()
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use std::sync::Mutex;

    use async_trait::async_trait;

    use super::*;
    use crate::genai::{ChunkStream, ServiceError, Turn};

    struct StubService {
        reply: Result<&'static str, ()>,
        prompts: Mutex<Vec<(String, String)>>,
    }

    impl StubService {
        fn answering(reply: &'static str) -> Self {
            Self {
                reply: Ok(reply),
                prompts: Mutex::new(Vec::new()),
            }
        }

        fn failing() -> Self {
            Self {
                reply: Err(()),
                prompts: Mutex::new(Vec::new()),
            }
        }
    }

    #[async_trait]
    impl GenerativeService for StubService {
        async fn generate(&self, framing: &str, prompt: &str) -> Result<String, ServiceError> {
            self.prompts
                .lock()
                .unwrap()
                .push((framing.to_string(), prompt.to_string()));
            match self.reply {
                Ok(text) => Ok(text.to_string()),
                Err(()) => Err(ServiceError::Transport("down".to_string())),
            }
        }

        async fn stream_chat(
            &self,
            _framing: &str,
            _history: &[Turn],
        ) -> Result<ChunkStream, ServiceError> {
            unimplemented!("explanation tests never stream")
        }
    }

    #[tokio::test]
    async fn returns_service_text_verbatim() {
        let client = ExplanationClient::new(StubService::answering("It routes attention."));
        let text = client.explain("Multi-Head Self-Attention").await;
        assert_eq!(text, "It routes attention.");
    }

    #[tokio::test]
    async fn prompt_embeds_the_label_and_uses_explain_framing() {
        let service = StubService::answering("ok");
        let client = ExplanationClient::new(service);
        client.explain("Softmax").await;

        let calls = client.service.prompts.lock().unwrap();
        let (framing, prompt) = &calls[0];
        assert_eq!(framing, &prompts::pack().explain.framing);
        assert!(prompt.contains("\"Softmax\""));
    }

    #[tokio::test]
    async fn failure_resolves_to_the_fallback_never_raises() {
        let client = ExplanationClient::new(StubService::failing());
        let text = client.explain("Linear").await;
        assert_eq!(text, prompts::pack().explain.fallback);
    }
}
