//! Client for the external generative-language service.
//!
//! Two call shapes are consumed: single-shot content generation (used for
//! block explanations) and streamed chat generation (used for follow-up
//! questions). Everything above this module talks to the
//! [`GenerativeService`] trait, so the transport can be replaced by an
//! in-memory double in tests.

mod stream;
mod types;

use std::sync::Arc;

use async_trait::async_trait;
use futures::{future, StreamExt, TryStreamExt};
use thiserror::Error;
use tracing::{debug, instrument};
use url::Url;

use crate::config::ApiConfig;

use self::stream::{chunk_text, SseDecoder};
use self::types::GenerateContentRequest;

pub use self::types::{Role, Turn};

#[derive(Error, Debug)]
pub enum ServiceError {
    #[error("failed to build request: {0}")]
    Request(String),
    #[error("network error: {0}")]
    Transport(String),
    #[error("authentication failed - check your API key")]
    Auth,
    #[error("rate limit exceeded - too many requests")]
    RateLimited,
    #[error("server error ({status}): {body}")]
    Server { status: u16, body: String },
    #[error("HTTP error {status}: {body}")]
    Http { status: u16, body: String },
    #[error("failed to parse API response: {0}")]
    Malformed(String),
    #[error("API returned no text")]
    Empty,
    #[error("stream interrupted: {0}")]
    Stream(String),
}

/// Ordered text chunks of one streamed reply, terminated by completion or
/// by the first error.
pub type ChunkStream = futures::stream::BoxStream<'static, Result<String, ServiceError>>;

/// Seam between the clients and the network.
#[async_trait]
pub trait GenerativeService: Send + Sync {
    /// Single-shot generation: one framing string, one prompt, full reply.
    async fn generate(&self, framing: &str, prompt: &str) -> Result<String, ServiceError>;

    /// Streamed chat generation over a complete turn history. The returned
    /// stream yields reply text incrementally, in arrival order.
    async fn stream_chat(
        &self,
        framing: &str,
        history: &[Turn],
    ) -> Result<ChunkStream, ServiceError>;
}

#[async_trait]
impl<S: GenerativeService + ?Sized> GenerativeService for Arc<S> {
    async fn generate(&self, framing: &str, prompt: &str) -> Result<String, ServiceError> {
        (**self).generate(framing, prompt).await
    }

    async fn stream_chat(
        &self,
        framing: &str,
        history: &[Turn],
    ) -> Result<ChunkStream, ServiceError> {
        (**self).stream_chat(framing, history).await
    }
}

/// Production implementation over the Gemini REST API.
#[derive(Debug, Clone)]
pub struct GeminiClient {
    http: reqwest::Client,
    config: ApiConfig,
}

impl GeminiClient {
    pub fn new(config: ApiConfig) -> Result<Self, ServiceError> {
        let http = reqwest::Client::builder()
            .timeout(config.request_timeout)
            .build()
            .map_err(|e| ServiceError::Request(e.to_string()))?;
        Ok(Self { http, config })
    }

    /// `{api_url}/v1beta/models/{model}:{verb}`, keyed by the ambient
    /// credential; `alt=sse` selects the event-stream response format.
    fn endpoint(&self, verb: &str, sse: bool) -> Result<Url, ServiceError> {
        let mut url =
            Url::parse(&self.config.api_url).map_err(|e| ServiceError::Request(e.to_string()))?;
        url.set_path(&format!("v1beta/models/{}:{}", self.config.model, verb));
        if sse {
            url.query_pairs_mut().append_pair("alt", "sse");
        }
        url.query_pairs_mut().append_pair("key", &self.config.api_key);
        Ok(url)
    }

    async fn post(
        &self,
        url: Url,
        body: &GenerateContentRequest,
    ) -> Result<reqwest::Response, ServiceError> {
        let response = self
            .http
            .post(url)
            .json(body)
            .send()
            .await
            .map_err(transport_error)?;

        let status = response.status();
        if status.is_success() {
            return Ok(response);
        }
        let body = response
            .text()
            .await
            .unwrap_or_else(|_| "unknown error".to_string());
        Err(match status.as_u16() {
            401 | 403 => ServiceError::Auth,
            429 => ServiceError::RateLimited,
            500..=599 => ServiceError::Server {
                status: status.as_u16(),
                body,
            },
            _ => ServiceError::Http {
                status: status.as_u16(),
                body,
            },
        })
    }
}

fn transport_error(e: reqwest::Error) -> ServiceError {
    if e.is_timeout() {
        ServiceError::Transport("request timeout - the API took too long to respond".to_string())
    } else if e.is_connect() {
        ServiceError::Transport("connection error - unable to reach the API".to_string())
    } else {
        ServiceError::Transport(e.to_string())
    }
}

#[async_trait]
impl GenerativeService for GeminiClient {
    #[instrument(skip(self, framing, prompt))]
    async fn generate(&self, framing: &str, prompt: &str) -> Result<String, ServiceError> {
        let url = self.endpoint("generateContent", false)?;
        let body = GenerateContentRequest::single_shot(framing, prompt);
        let response = self.post(url, &body).await?;

        let parsed: types::GenerateContentResponse = response
            .json()
            .await
            .map_err(|e| ServiceError::Malformed(e.to_string()))?;

        match parsed.text() {
            Some(text) if !text.trim().is_empty() => Ok(text),
            _ => Err(ServiceError::Empty),
        }
    }

    #[instrument(skip(self, framing, history), fields(turns = history.len()))]
    async fn stream_chat(
        &self,
        framing: &str,
        history: &[Turn],
    ) -> Result<ChunkStream, ServiceError> {
        let url = self.endpoint("streamGenerateContent", true)?;
        let body = GenerateContentRequest::conversation(framing, history);
        let response = self.post(url, &body).await?;
        debug!("stream opened");

        let chunks = response
            .bytes_stream()
            .map_err(|e| ServiceError::Stream(e.to_string()))
            .scan(SseDecoder::new(), |decoder, item| {
                let out: Vec<Result<String, ServiceError>> = match item {
                    Ok(bytes) => decoder
                        .feed(bytes)
                        .iter()
                        .filter_map(|payload| chunk_text(payload))
                        .map(Ok)
                        .collect(),
                    Err(e) => vec![Err(e)],
                };
                future::ready(Some(futures::stream::iter(out)))
            })
            .flatten();

        Ok(chunks.boxed())
    }
}
