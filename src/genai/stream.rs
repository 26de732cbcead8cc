//! Server-sent-event decoding for streamed generation responses.
//!
//! The service emits one `data: {json}` line per chunk, delimited by
//! newlines. Network reads split events at arbitrary byte boundaries, so
//! the decoder buffers a partial trailing line between feeds.

use bytes::Bytes;
use tracing::debug;

use super::types::GenerateContentResponse;

pub(crate) struct SseDecoder {
    buf: String,
}

impl SseDecoder {
    pub fn new() -> Self {
        Self { buf: String::new() }
    }

    /// Feed raw bytes, returning the payloads of every `data:` line that
    /// completed. Non-data lines (comments, blank event delimiters) are
    /// skipped. Invalid UTF-8 is replaced rather than failing the stream.
    pub fn feed(&mut self, bytes: Bytes) -> Vec<String> {
        self.buf.push_str(&String::from_utf8_lossy(&bytes));

        let mut payloads = Vec::new();
        while let Some(newline) = self.buf.find('\n') {
            let line: String = self.buf.drain(..=newline).collect();
            let line = line.trim_end_matches(&['\n', '\r'][..]);
            if let Some(payload) = line.strip_prefix("data:") {
                let payload = payload.trim_start();
                if !payload.is_empty() {
                    payloads.push(payload.to_string());
                }
            }
        }
        payloads
    }
}

/// Extract the text carried by one SSE payload. Payloads without text
/// (e.g. usage metadata events) and unparseable payloads are dropped.
pub(crate) fn chunk_text(payload: &str) -> Option<String> {
    match serde_json::from_str::<GenerateContentResponse>(payload) {
        Ok(resp) => resp.text(),
        Err(e) => {
            debug!(error = %e, "skipping unparseable stream event");
            None
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn decodes_complete_data_lines() {
        let mut dec = SseDecoder::new();
        let payloads = dec.feed(Bytes::from_static(b"data: {\"a\":1}\n\ndata: {\"b\":2}\n"));
        assert_eq!(payloads, vec!["{\"a\":1}", "{\"b\":2}"]);
    }

    #[test]
    fn buffers_partial_lines_across_feeds() {
        let mut dec = SseDecoder::new();
        assert!(dec.feed(Bytes::from_static(b"data: {\"te")).is_empty());
        let payloads = dec.feed(Bytes::from_static(b"xt\":1}\n"));
        assert_eq!(payloads, vec!["{\"text\":1}"]);
    }

    #[test]
    fn ignores_comments_and_crlf() {
        let mut dec = SseDecoder::new();
        let payloads = dec.feed(Bytes::from_static(b": keepalive\r\ndata: {}\r\n\r\n"));
        assert_eq!(payloads, vec!["{}"]);
    }

    #[test]
    fn chunk_text_extracts_candidate_text() {
        let payload = r#"{"candidates":[{"content":{"parts":[{"text":"Hel"}]}}]}"#;
        assert_eq!(chunk_text(payload).as_deref(), Some("Hel"));
    }

    #[test]
    fn chunk_text_drops_metadata_and_garbage() {
        assert!(chunk_text(r#"{"usageMetadata":{"totalTokenCount":3}}"#).is_none());
        assert!(chunk_text("not json").is_none());
    }
}
