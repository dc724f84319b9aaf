//! A2A Protocol Types
//!
//! Wire structures for the subset of the Agent-to-Agent protocol the detective
//! client speaks:
//! - `AgentCard`: discovery metadata served at [`WELL_KNOWN_PATH`]
//! - `MessageStreamRequest`: JSON-RPC 2.0 `message/stream` call
//! - `StreamResponse` / `StreamResult`: the JSON-RPC envelopes carried by SSE

use serde::{Deserialize, Serialize};
use serde_json::Value;

use super::events::AgentEvent;
use crate::types::{AppError, Result};

/// The well-known path for agent discovery.
pub const WELL_KNOWN_PATH: &str = "/.well-known/agent-card.json";

// ============================================================================
// Agent Card (Discovery)
// ============================================================================

/// Metadata describing a remote A2A agent.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AgentCard {
    pub name: String,
    #[serde(default)]
    pub description: String,
    /// Endpoint that accepts JSON-RPC calls.
    pub url: String,
    #[serde(default)]
    pub version: String,
    #[serde(default)]
    pub capabilities: Value,
}

impl AgentCard {
    /// Validates that the fields the client relies on are present.
    pub fn validate(&self) -> Result<()> {
        if self.name.trim().is_empty() {
            return Err(AppError::Remote("agent card: name is empty".to_string()));
        }
        if self.url.trim().is_empty() {
            return Err(AppError::Remote("agent card: url is empty".to_string()));
        }
        Ok(())
    }
}

/// Builds the discovery URL, tolerating trailing slashes.
pub fn discovery_url(base_url: &str) -> String {
    format!("{}{}", base_url.trim_end_matches('/'), WELL_KNOWN_PATH)
}

// ============================================================================
// Messages
// ============================================================================

/// A content part. Only text parts carry anything the detective uses.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "lowercase")]
pub enum Part {
    Text {
        text: String,
    },
    #[serde(other)]
    Other,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Message {
    pub role: String,
    pub parts: Vec<Part>,
    pub message_id: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub context_id: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub metadata: Option<Value>,
}

impl Message {
    pub fn user(text: impl Into<String>, context_id: impl Into<String>) -> Self {
        Self {
            role: "user".to_string(),
            parts: vec![Part::Text { text: text.into() }],
            message_id: uuid::Uuid::new_v4().to_string(),
            context_id: Some(context_id.into()),
            metadata: None,
        }
    }

    /// Tags the message with the caller's user id.
    pub fn with_user_id(mut self, user_id: &str) -> Self {
        self.metadata = Some(serde_json::json!({ "userId": user_id }));
        self
    }
}

/// Concatenates the text parts, ignoring everything else.
fn parts_text(parts: &[Part]) -> String {
    parts
        .iter()
        .filter_map(|part| match part {
            Part::Text { text } => Some(text.as_str()),
            Part::Other => None,
        })
        .collect()
}

// ============================================================================
// JSON-RPC 2.0 Request
// ============================================================================

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MessageSendParams {
    pub message: Message,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MessageStreamRequest {
    pub jsonrpc: String,
    pub id: String,
    pub method: String,
    pub params: MessageSendParams,
}

impl MessageStreamRequest {
    pub fn new(query: &str, session_id: &str) -> Self {
        Self::from_message(Message::user(query, session_id))
    }

    pub fn from_message(message: Message) -> Self {
        Self {
            jsonrpc: "2.0".to_string(),
            id: uuid::Uuid::new_v4().to_string(),
            method: "message/stream".to_string(),
            params: MessageSendParams { message },
        }
    }
}

// ============================================================================
// Streamed results
// ============================================================================

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TaskStatus {
    pub state: String,
    #[serde(default)]
    pub message: Option<Message>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Artifact {
    #[serde(default)]
    pub parts: Vec<Part>,
}

/// Result payload of one SSE frame, tagged by `kind`.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "kebab-case")]
pub enum StreamResult {
    StatusUpdate {
        status: TaskStatus,
        #[serde(default, rename = "final")]
        is_final: bool,
    },
    ArtifactUpdate {
        artifact: Artifact,
    },
    Message {
        #[serde(default)]
        parts: Vec<Part>,
    },
    Task {
        #[serde(default)]
        artifacts: Vec<Artifact>,
    },
    #[serde(other)]
    Unknown,
}

impl StreamResult {
    /// Maps a wire frame onto the closed event model.
    ///
    /// Frames that carry no text at all (bare state transitions, unknown kinds)
    /// produce no event.
    pub fn into_event(self) -> Option<AgentEvent> {
        match self {
            StreamResult::StatusUpdate { status, is_final } => {
                let text = status.message.map(|m| parts_text(&m.parts))?;
                if is_final {
                    Some(AgentEvent::FinalResponse(text))
                } else {
                    Some(AgentEvent::IntermediateEvent(text))
                }
            }
            StreamResult::ArtifactUpdate { artifact } => {
                Some(AgentEvent::FinalResponse(parts_text(&artifact.parts)))
            }
            StreamResult::Message { parts } => Some(AgentEvent::RawText(parts_text(&parts))),
            StreamResult::Task { artifacts } => {
                let text: String = artifacts.iter().map(|a| parts_text(&a.parts)).collect();
                Some(AgentEvent::FinalResponse(text))
            }
            StreamResult::Unknown => None,
        }
    }
}

/// A JSON-RPC 2.0 error object.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct JsonRpcError {
    pub code: i64,
    pub message: String,
}

/// One JSON-RPC response as carried in an SSE `data:` line.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StreamResponse {
    #[serde(default)]
    pub result: Option<StreamResult>,
    #[serde(default)]
    pub error: Option<JsonRpcError>,
}

impl StreamResponse {
    pub fn into_event(self) -> Result<Option<AgentEvent>> {
        if let Some(err) = self.error {
            return Err(AppError::Remote(format!(
                "JSON-RPC error {}: {}",
                err.code, err.message
            )));
        }
        Ok(self.result.and_then(StreamResult::into_event))
    }
}
