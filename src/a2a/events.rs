//! Agent events
//!
//! Every reply fragment the remote agent sends is one of three shapes. The
//! requester only ever asks an event for its text.

use crate::types::Result;
use futures::Stream;
use std::pin::Pin;

/// Boxed stream of agent events as returned by [`RemoteAgent::run`](super::RemoteAgent::run).
pub type EventStream = Pin<Box<dyn Stream<Item = Result<AgentEvent>> + Send>>;

/// One event emitted by the remote agent.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AgentEvent {
    /// The agent's final answer for this turn.
    FinalResponse(String),
    /// Progress or partial output emitted while the agent works.
    IntermediateEvent(String),
    /// Bare text with no envelope.
    RawText(String),
}

impl AgentEvent {
    /// Text carried by the event, if any is worth keeping.
    ///
    /// Blank fragments yield `None`. Intermediate events whose content is the
    /// literal `"None"` are placeholders emitted by the agent runtime and are
    /// skipped as well.
    pub fn text(&self) -> Option<&str> {
        let text = match self {
            AgentEvent::FinalResponse(content) => content.as_str(),
            AgentEvent::IntermediateEvent(content) if content == "None" => return None,
            AgentEvent::IntermediateEvent(content) => content.as_str(),
            AgentEvent::RawText(text) => text.as_str(),
        };

        if text.trim().is_empty() {
            None
        } else {
            Some(text)
        }
    }

    /// Whether this event closes the agent's turn.
    pub fn is_final(&self) -> bool {
        matches!(self, AgentEvent::FinalResponse(_))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_text_extraction() {
        assert_eq!(
            AgentEvent::FinalResponse("# Report".into()).text(),
            Some("# Report")
        );
        assert_eq!(
            AgentEvent::IntermediateEvent("searching".into()).text(),
            Some("searching")
        );
        assert_eq!(AgentEvent::RawText("raw".into()).text(), Some("raw"));
    }

    #[test]
    fn test_blank_and_placeholder_text_skipped() {
        assert_eq!(AgentEvent::FinalResponse("   \n".into()).text(), None);
        assert_eq!(AgentEvent::IntermediateEvent("None".into()).text(), None);
        assert_eq!(AgentEvent::RawText(String::new()).text(), None);
        // Only intermediate events use the placeholder
        assert_eq!(AgentEvent::RawText("None".into()).text(), Some("None"));
    }

    #[test]
    fn test_is_final() {
        assert!(AgentEvent::FinalResponse("x".into()).is_final());
        assert!(!AgentEvent::IntermediateEvent("x".into()).is_final());
    }
}
