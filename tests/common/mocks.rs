//! Test doubles shared by the integration tests.
//!
//! Every collaborator of the requester has a scripted or recording stand-in
//! here so tests run without a network and without real sleeping.

use async_trait::async_trait;
use detective::a2a::{AgentEvent, EventStream, RemoteAgent};
use detective::investigation::{
    AttemptReport, InvestigationResult, Investigator, Outcome, ProgressSink, ReportSource, Sleeper,
};
use detective::types::{AppError, Result};
use futures::stream::{self, StreamExt};
use parking_lot::Mutex;
use std::collections::VecDeque;
use std::sync::Arc;
use std::time::Duration;

/// A report long enough to pass the acceptance check.
pub const GOOD_REPORT: &str = "# Tesla\n\n## 📊 Company Overview\nListen kid, \
    the numbers look solid: revenue up, debt manageable, leadership noisy.";

pub const GOOD_STATUS: &str = "✅ Investigation complete! Session: session_0000abcd | Events: 4";

// ============= Report Sources =============

/// Returns scripted attempt results in order.
///
/// Once the script runs out, every further call fails so a test that
/// over-calls the source notices.
pub struct ScriptedSource {
    script: Mutex<VecDeque<Result<AttemptReport>>>,
    queries: Mutex<Vec<String>>,
}

impl ScriptedSource {
    pub fn new(script: Vec<Result<AttemptReport>>) -> Self {
        Self {
            script: Mutex::new(script.into()),
            queries: Mutex::new(Vec::new()),
        }
    }

    /// Shorthand for a script of `(report, status)` pairs.
    pub fn replies(replies: &[(&str, &str)]) -> Self {
        Self::new(
            replies
                .iter()
                .map(|(report, status)| Ok(AttemptReport::new(*report, *status)))
                .collect(),
        )
    }

    pub fn calls(&self) -> usize {
        self.queries.lock().len()
    }

    pub fn queries(&self) -> Vec<String> {
        self.queries.lock().clone()
    }
}

#[async_trait]
impl ReportSource for ScriptedSource {
    async fn fetch(&self, query: &str, _progress: Arc<dyn ProgressSink>) -> Result<AttemptReport> {
        self.queries.lock().push(query.to_string());
        self.script
            .lock()
            .pop_front()
            .unwrap_or_else(|| Err(AppError::Internal("script exhausted".to_string())))
    }

    fn troubleshooting(&self) -> Vec<String> {
        vec!["Restart the scripted agent".to_string()]
    }
}

// ============= Sleepers =============

/// Records requested sleeps and returns immediately.
#[derive(Default)]
pub struct RecordingSleeper {
    sleeps: Mutex<Vec<Duration>>,
}

impl RecordingSleeper {
    pub fn sleeps(&self) -> Vec<Duration> {
        self.sleeps.lock().clone()
    }

    pub fn total(&self) -> Duration {
        self.sleeps.lock().iter().sum()
    }
}

#[async_trait]
impl Sleeper for RecordingSleeper {
    async fn sleep(&self, duration: Duration) {
        self.sleeps.lock().push(duration);
    }
}

// ============= Progress =============

#[derive(Default)]
pub struct RecordingProgress {
    updates: Mutex<Vec<(f32, String)>>,
}

impl RecordingProgress {
    pub fn updates(&self) -> Vec<(f32, String)> {
        self.updates.lock().clone()
    }

    pub fn fractions(&self) -> Vec<f32> {
        self.updates.lock().iter().map(|(f, _)| *f).collect()
    }
}

impl ProgressSink for RecordingProgress {
    fn report(&self, fraction: f32, description: &str) {
        self.updates.lock().push((fraction, description.to_string()));
    }
}

// ============= Remote Agents =============

/// What a scripted agent does on one call.
#[derive(Clone)]
pub enum AgentReply {
    Events(Vec<AgentEvent>),
    Fail(String),
    /// Never yields an event.
    Stall,
}

/// Remote agent that replays scripted replies and records queries.
pub struct ScriptedAgent {
    replies: Mutex<VecDeque<AgentReply>>,
    calls: Mutex<Vec<(String, String)>>,
}

impl ScriptedAgent {
    pub fn new(replies: Vec<AgentReply>) -> Self {
        Self {
            replies: Mutex::new(replies.into()),
            calls: Mutex::new(Vec::new()),
        }
    }

    /// `(query, session_id)` for every call so far.
    pub fn calls(&self) -> Vec<(String, String)> {
        self.calls.lock().clone()
    }
}

#[async_trait]
impl RemoteAgent for ScriptedAgent {
    async fn run(&self, query: &str, session_id: &str) -> Result<EventStream> {
        self.calls
            .lock()
            .push((query.to_string(), session_id.to_string()));

        let reply = self.replies.lock().pop_front().unwrap_or(AgentReply::Stall);
        match reply {
            AgentReply::Events(events) => {
                Ok(stream::iter(events.into_iter().map(Ok::<_, AppError>)).boxed())
            }
            AgentReply::Fail(message) => Err(AppError::Remote(message)),
            AgentReply::Stall => Ok(stream::pending::<Result<AgentEvent>>().boxed()),
        }
    }

    fn endpoint(&self) -> &str {
        "http://agent.test"
    }
}

// ============= Investigators =============

/// Returns the same result for every query and records what it was asked.
pub struct CannedInvestigator {
    result: InvestigationResult,
    queries: Mutex<Vec<String>>,
}

impl CannedInvestigator {
    pub fn new(result: InvestigationResult) -> Self {
        Self {
            result,
            queries: Mutex::new(Vec::new()),
        }
    }

    pub fn accepted() -> Self {
        Self::new(InvestigationResult {
            report_text: GOOD_REPORT.to_string(),
            status_message: GOOD_STATUS.to_string(),
            attempt_count: 1,
            outcome: Outcome::Accepted,
        })
    }

    pub fn exhausted() -> Self {
        Self::new(InvestigationResult {
            report_text: "⚠️ Agent returned minimal response.".to_string(),
            status_message: "⚠️ Investigation incomplete - see debug info above".to_string(),
            attempt_count: 3,
            outcome: Outcome::Exhausted,
        })
    }

    pub fn queries(&self) -> Vec<String> {
        self.queries.lock().clone()
    }
}

#[async_trait]
impl Investigator for CannedInvestigator {
    async fn investigate(
        &self,
        query: &str,
        _progress: Arc<dyn ProgressSink>,
    ) -> InvestigationResult {
        self.queries.lock().push(query.to_string());
        self.result.clone()
    }
}
