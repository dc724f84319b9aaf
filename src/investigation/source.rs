//! Report sources
//!
//! A [`ReportSource`] performs exactly one investigation attempt. The retry
//! loop lives in [`ReportRequester`](super::ReportRequester).

use async_trait::async_trait;
use futures::StreamExt;
use std::fmt::Write as _;
use std::sync::Arc;
use std::time::Duration;
use tracing::{debug, info};

use super::acceptance::{STATUS_INCOMPLETE, has_min_length, status_complete};
use super::progress::{ProgressSink, ProgressTicker};
use crate::a2a::RemoteAgent;
use crate::types::{AppError, Result};

/// Text and status produced by one attempt.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AttemptReport {
    pub report_text: String,
    pub status_message: String,
}

impl AttemptReport {
    pub fn new(report_text: impl Into<String>, status_message: impl Into<String>) -> Self {
        Self {
            report_text: report_text.into(),
            status_message: status_message.into(),
        }
    }
}

/// One investigation attempt against some backend.
#[async_trait]
pub trait ReportSource: Send + Sync {
    /// Run one attempt for `query`.
    async fn fetch(&self, query: &str, progress: Arc<dyn ProgressSink>) -> Result<AttemptReport>;

    /// Remediation steps shown when an attempt fails with an error.
    fn troubleshooting(&self) -> Vec<String> {
        Vec::new()
    }
}

/// Prefixes bare company names with an investigation request.
pub fn enrich_query(query: &str) -> String {
    if query.to_lowercase().contains("investigate") {
        query.to_string()
    } else {
        format!(
            "Investigate the financial health and leadership of {}",
            query
        )
    }
}

/// A fresh session identifier, `session_` followed by eight hex digits.
pub fn new_session_id() -> String {
    let id = uuid::Uuid::new_v4().simple().to_string();
    format!("session_{}", &id[..8])
}

#[derive(Debug, Default)]
struct Collected {
    event_count: usize,
    fragments: Vec<String>,
    saw_final: bool,
}

/// Report source backed by the remote detective agent.
pub struct RemoteReportSource {
    agent: Arc<dyn RemoteAgent>,
    attempt_timeout: Option<Duration>,
}

impl RemoteReportSource {
    pub fn new(agent: Arc<dyn RemoteAgent>) -> Self {
        Self {
            agent,
            attempt_timeout: None,
        }
    }

    /// Bounds the time spent waiting on the agent within one attempt.
    pub fn with_attempt_timeout(mut self, timeout: Option<Duration>) -> Self {
        self.attempt_timeout = timeout;
        self
    }

    async fn collect(
        &self,
        query: &str,
        session_id: &str,
        progress: &Arc<dyn ProgressSink>,
        ticker: &mut ProgressTicker,
    ) -> Result<Collected> {
        let mut events = self.agent.run(query, session_id).await?;
        let mut collected = Collected::default();

        while let Some(event) = events.next().await {
            let event = event?;
            collected.event_count += 1;
            collected.saw_final |= event.is_final();

            if ticker.is_running() {
                ticker.stop().await;
            }
            progress.report(0.95, "📝 Compiling final report...");

            if let Some(text) = event.text() {
                collected.fragments.push(text.to_string());
            }
        }

        Ok(collected)
    }

    fn diagnostic_report(&self, collected: &Collected, session_id: &str, partial: &str) -> String {
        let mut report = String::from("⚠️ Agent returned minimal response.\n\n");
        let _ = writeln!(report, "**Debug Info:**");
        let _ = writeln!(report, "- Events processed: {}", collected.event_count);
        let _ = writeln!(report, "- Response parts: {}", collected.fragments.len());
        let _ = writeln!(
            report,
            "- Final response: {}",
            if collected.saw_final { "yes" } else { "no" }
        );
        let _ = writeln!(report, "- Server URL: {}", self.agent.endpoint());
        let _ = writeln!(report, "- Session ID: {}\n", session_id);
        let _ = writeln!(report, "**Troubleshooting:**");
        let _ = writeln!(report, "1. Check server terminal logs for errors");
        let _ = writeln!(
            report,
            "2. Verify agent card: `curl {}`",
            crate::a2a::types::discovery_url(self.agent.endpoint())
        );
        let _ = writeln!(report, "3. Try a simpler query like 'Tesla'");
        let _ = writeln!(report, "4. Check if the agent's search tool is working (server logs)\n");

        if !collected.fragments.is_empty() {
            let _ = write!(report, "**Partial Response Captured:**\n```\n{}\n```", partial);
        }
        report
    }
}

#[async_trait]
impl ReportSource for RemoteReportSource {
    async fn fetch(&self, query: &str, progress: Arc<dyn ProgressSink>) -> Result<AttemptReport> {
        progress.report(0.0, "🔌 Connecting to Detective Ed D....");
        progress.report(0.1, "🕵️ Ed D. is starting the investigation...");

        let session_id = new_session_id();
        progress.report(0.2, &format!("💾 Opening session {}...", session_id));

        let query = enrich_query(query);
        progress.report(0.3, "🔧 Preparing the request...");
        progress.report(0.4, "🔍 Searching for company information...");

        let mut ticker = ProgressTicker::start(progress.clone());
        let collected = match self.attempt_timeout {
            Some(limit) => {
                match tokio::time::timeout(
                    limit,
                    self.collect(&query, &session_id, &progress, &mut ticker),
                )
                .await
                {
                    Ok(collected) => collected,
                    Err(_) => Err(AppError::Remote(format!(
                        "no complete answer within {}s",
                        limit.as_secs()
                    ))),
                }
            }
            None => {
                self.collect(&query, &session_id, &progress, &mut ticker)
                    .await
            }
        };
        ticker.stop().await;
        let collected = collected?;

        progress.report(1.0, "✅ Investigation complete!");
        debug!(
            session_id = %session_id,
            events = collected.event_count,
            parts = collected.fragments.len(),
            saw_final = collected.saw_final,
            "Collected agent response"
        );

        let final_report = collected.fragments.concat();
        if !has_min_length(&final_report) {
            let report = self.diagnostic_report(&collected, &session_id, &final_report);
            return Ok(AttemptReport::new(report, STATUS_INCOMPLETE));
        }

        info!(session_id = %session_id, events = collected.event_count, "Investigation complete");
        Ok(AttemptReport::new(
            final_report,
            status_complete(&session_id, collected.event_count),
        ))
    }

    fn troubleshooting(&self) -> Vec<String> {
        let endpoint = self.agent.endpoint();
        vec![
            format!("Make sure the detective agent is running at {}", endpoint),
            format!(
                "Verify the agent card is accessible: `curl {}`",
                crate::a2a::types::discovery_url(endpoint)
            ),
            "Check the agent's logs for model or search errors".to_string(),
        ]
    }
}
