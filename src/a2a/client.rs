//! A2A Client
//!
//! HTTP client for the remote detective agent. Discovers the agent card once,
//! then sends each investigation as a JSON-RPC `message/stream` call and parses
//! the Server-Sent Events reply into [`AgentEvent`]s.

use std::time::Duration;

use async_trait::async_trait;
use futures::{Stream, StreamExt};
use tokio::sync::OnceCell;
use tracing::{debug, info};

use super::events::{AgentEvent, EventStream};
use super::types::{AgentCard, Message, MessageStreamRequest, StreamResponse, discovery_url};
use super::RemoteAgent;
use crate::types::{AppError, Result};

/// Default request timeout in seconds.
const DEFAULT_TIMEOUT_SECS: u64 = 300;

/// Configuration for the A2A client.
#[derive(Debug, Clone)]
pub struct A2aClientConfig {
    /// Whole-request timeout, including the streamed body.
    pub timeout: Duration,
    /// Optional bearer token for authenticated agents.
    pub auth_token: Option<String>,
    /// Sent as message metadata so the agent can scope its sessions.
    pub user_id: Option<String>,
}

impl Default for A2aClientConfig {
    fn default() -> Self {
        Self {
            timeout: Duration::from_secs(DEFAULT_TIMEOUT_SECS),
            auth_token: None,
            user_id: None,
        }
    }
}

/// HTTP client for one remote A2A agent.
pub struct A2aClient {
    http: reqwest::Client,
    base_url: String,
    config: A2aClientConfig,
    card: OnceCell<AgentCard>,
}

impl A2aClient {
    /// Creates a client for the agent served at `base_url`.
    pub fn with_config(base_url: impl Into<String>, config: A2aClientConfig) -> Result<Self> {
        let http = reqwest::Client::builder()
            .timeout(config.timeout)
            .build()
            .map_err(|e| AppError::Internal(format!("Failed to create HTTP client: {}", e)))?;

        Ok(Self::with_reqwest_client(http, base_url, config))
    }

    /// Creates a client wrapping an existing `reqwest::Client`.
    pub fn with_reqwest_client(
        http: reqwest::Client,
        base_url: impl Into<String>,
        config: A2aClientConfig,
    ) -> Self {
        Self {
            http,
            base_url: base_url.into(),
            config,
            card: OnceCell::new(),
        }
    }

    /// Fetches and validates the agent card. The card is cached after the
    /// first successful call.
    pub async fn discover(&self) -> Result<&AgentCard> {
        self.card
            .get_or_try_init(|| async {
                let url = discovery_url(&self.base_url);
                debug!(url = %url, "Fetching agent card");

                let response = self.http.get(&url).send().await?;
                let status = response.status();
                if !status.is_success() {
                    let body = response.text().await.unwrap_or_default();
                    return Err(AppError::Remote(format!(
                        "agent card request returned {}: {}",
                        status, body
                    )));
                }

                let card: AgentCard = response.json().await.map_err(|e| {
                    AppError::Remote(format!("Failed to parse agent card: {}", e))
                })?;
                card.validate()?;

                info!(agent = %card.name, endpoint = %card.url, "Discovered remote agent");
                Ok::<AgentCard, AppError>(card)
            })
            .await
    }
}

#[async_trait]
impl RemoteAgent for A2aClient {
    async fn run(&self, query: &str, session_id: &str) -> Result<EventStream> {
        let card = self.discover().await?;
        let mut message = Message::user(query, session_id);
        if let Some(user_id) = &self.config.user_id {
            message = message.with_user_id(user_id);
        }
        let request = MessageStreamRequest::from_message(message);

        let mut builder = self
            .http
            .post(&card.url)
            .header(reqwest::header::ACCEPT, "text/event-stream")
            .json(&request);
        if let Some(token) = &self.config.auth_token {
            builder = builder.bearer_auth(token);
        }

        let response = builder.send().await?;
        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(AppError::Remote(format!(
                "agent returned {}: {}",
                status, body
            )));
        }

        Ok(sse_events(response.bytes_stream()))
    }

    fn endpoint(&self) -> &str {
        &self.base_url
    }
}

/// Turns a raw SSE byte stream into agent events.
///
/// Chunks are buffered until a full line is available; a trailing line
/// without a newline is flushed when the body ends.
pub fn sse_events<S, B>(bytes: S) -> EventStream
where
    S: Stream<Item = std::result::Result<B, reqwest::Error>> + Send + 'static,
    B: AsRef<[u8]> + Send,
{
    Box::pin(async_stream::stream! {
        let mut bytes = Box::pin(bytes);
        // Bytes, not text: a multi-byte character may straddle two chunks.
        let mut buffer: Vec<u8> = Vec::new();

        while let Some(chunk) = bytes.next().await {
            let chunk = match chunk {
                Ok(chunk) => chunk,
                Err(e) => {
                    yield Err(AppError::Remote(format!("Stream read error: {}", e)));
                    return;
                }
            };
            buffer.extend_from_slice(chunk.as_ref());

            while let Some(pos) = buffer.iter().position(|&b| b == b'\n') {
                let line: Vec<u8> = buffer.drain(..=pos).collect();
                if let Some(event) = parse_sse_line(&String::from_utf8_lossy(&line)) {
                    yield event;
                }
            }
        }

        if let Some(event) = parse_sse_line(&String::from_utf8_lossy(&buffer)) {
            yield event;
        }
    })
}

/// Parses a single SSE line.
///
/// Returns `None` for blank lines, comments, non-data fields, `[DONE]` and
/// frames that carry no text.
pub fn parse_sse_line(line: &str) -> Option<Result<AgentEvent>> {
    let trimmed = line.trim();
    if trimmed.is_empty() || trimmed.starts_with(':') {
        return None;
    }

    let data = trimmed.strip_prefix("data:")?.trim_start();
    if data == "[DONE]" {
        return None;
    }

    match serde_json::from_str::<StreamResponse>(data) {
        Ok(frame) => frame.into_event().transpose(),
        Err(e) => Some(Err(AppError::Remote(format!(
            "Failed to parse SSE event: {} (data: {})",
            e, data
        )))),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use futures::stream;

    #[test]
    fn test_client_config_default() {
        let config = A2aClientConfig::default();
        assert_eq!(config.timeout, Duration::from_secs(300));
        assert!(config.auth_token.is_none());
    }

    #[test]
    fn test_parse_sse_line_skips_noise() {
        assert!(parse_sse_line("").is_none());
        assert!(parse_sse_line(": keep-alive").is_none());
        assert!(parse_sse_line("event: message").is_none());
        assert!(parse_sse_line("data: [DONE]").is_none());
    }

    #[test]
    fn test_parse_sse_line_message() {
        let line = r#"data: {"result":{"kind":"message","parts":[{"kind":"text","text":"hello"}]}}"#;
        let event = parse_sse_line(line).unwrap().unwrap();
        assert_eq!(event, AgentEvent::RawText("hello".into()));
    }

    #[test]
    fn test_parse_sse_line_invalid_json() {
        let result = parse_sse_line("data: {not json");
        assert!(matches!(result, Some(Err(AppError::Remote(_)))));
    }

    #[tokio::test]
    async fn test_sse_events_across_chunk_boundaries() {
        let chunks: Vec<std::result::Result<Vec<u8>, reqwest::Error>> = vec![
            Ok(br#"data: {"result":{"kind":"message","parts":[{"kind":"#.to_vec()),
            Ok(br#""text","text":"one"}]}}"#.to_vec()),
            Ok(b"\n\ndata: {\"result\":{\"kind\":\"artifact-update\",\"artifact\":{\"parts\":[{\"kind\":\"text\",\"text\":\"two\"}]}}}".to_vec()),
        ];

        let events: Vec<_> = sse_events(stream::iter(chunks)).collect().await;
        assert_eq!(events.len(), 2);
        assert_eq!(
            events[0].as_ref().unwrap(),
            &AgentEvent::RawText("one".into())
        );
        assert_eq!(
            events[1].as_ref().unwrap(),
            &AgentEvent::FinalResponse("two".into())
        );
    }

    #[tokio::test]
    async fn test_sse_events_split_multibyte_character() {
        let frame = "data: {\"result\":{\"kind\":\"message\",\"parts\":[{\"kind\":\"text\",\"text\":\"🚩 flag\"}]}}\n";
        let bytes = frame.as_bytes();
        let split = frame.find('🚩').unwrap() + 2;
        let chunks: Vec<std::result::Result<Vec<u8>, reqwest::Error>> =
            vec![Ok(bytes[..split].to_vec()), Ok(bytes[split..].to_vec())];

        let events: Vec<_> = sse_events(stream::iter(chunks)).collect().await;
        assert_eq!(events.len(), 1);
        assert_eq!(
            events[0].as_ref().unwrap(),
            &AgentEvent::RawText("🚩 flag".into())
        );
    }
}
