//! Remote Agent (A2A) Adapter
//!
//! The detective itself runs behind an Agent-to-Agent endpoint owned by an
//! external framework. This module is the client side only: enough of the
//! protocol to discover the agent, send one investigation message and turn the
//! streamed reply into [`AgentEvent`]s.
//!
//! # Module Structure
//!
//! - [`events`](crate::a2a::events) - The closed event model consumed by the requester
//! - [`types`](crate::a2a::types) - Agent card and JSON-RPC wire types
//! - [`client`](crate::a2a::client) - reqwest-based client with SSE parsing
//!
//! # Example
//!
//! ```ignore
//! use detective::a2a::{A2aClient, A2aClientConfig, RemoteAgent};
//! use futures::StreamExt;
//!
//! let client = A2aClient::with_config("http://localhost:8001", A2aClientConfig::default())?;
//! let mut events = client.run("Investigate Tesla", "session_1a2b3c4d").await?;
//! while let Some(event) = events.next().await {
//!     if let Some(text) = event?.text() {
//!         print!("{}", text);
//!     }
//! }
//! ```

/// HTTP client for the remote detective agent.
pub mod client;
/// Closed event model and text extraction.
pub mod events;
/// Agent card and JSON-RPC wire types.
pub mod types;

pub use client::{A2aClient, A2aClientConfig};
pub use events::{AgentEvent, EventStream};
pub use types::{AgentCard, WELL_KNOWN_PATH};

use crate::types::Result;
use async_trait::async_trait;

/// A remote agent that answers one query with a stream of events.
///
/// This is the seam between the requester and the transport; tests replace it
/// with scripted agents.
#[async_trait]
pub trait RemoteAgent: Send + Sync {
    /// Send `query` within `session_id` and stream back the agent's events.
    async fn run(&self, query: &str, session_id: &str) -> Result<EventStream>;

    /// Base URL of the agent, used in diagnostics.
    fn endpoint(&self) -> &str;
}
