//! Investigation Requester
//!
//! Obtains a usable report from the remote detective, retrying with
//! exponential backoff when a reply looks empty or degraded.
//!
//! # Module Structure
//!
//! - [`acceptance`](crate::investigation::acceptance) - What counts as a usable report
//! - [`retry`](crate::investigation::retry) - Retry policy and sleepers
//! - [`progress`](crate::investigation::progress) - Progress sinks and the wall-clock ticker
//! - [`source`](crate::investigation::source) - One attempt against the remote agent
//! - [`requester`](crate::investigation::requester) - The retry loop
//!
//! # Example
//!
//! ```ignore
//! use detective::investigation::{RemoteReportSource, ReportRequester, RetryPolicy};
//! use std::sync::Arc;
//!
//! let source = RemoteReportSource::new(Arc::new(a2a_client));
//! let requester = ReportRequester::new(Arc::new(source), RetryPolicy::default());
//! let result = requester.obtain_report("Tesla").await;
//! println!("{} ({} attempts)", result.status_message, result.attempt_count);
//! ```

pub mod acceptance;
pub mod progress;
pub mod requester;
pub mod retry;
pub mod source;

pub use acceptance::is_acceptable;
pub use progress::{NoProgress, ProgressSink, ProgressTicker, TracingProgress};
pub use requester::ReportRequester;
pub use retry::{RetryPolicy, Sleeper, TokioSleeper};
pub use source::{AttemptReport, RemoteReportSource, ReportSource};

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use utoipa::ToSchema;

/// How an investigation ended.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "lowercase")]
pub enum Outcome {
    /// A report passed the acceptance check.
    Accepted,
    /// Every attempt failed; the last report is returned as-is.
    Exhausted,
    /// The query was blank; nothing was sent.
    Rejected,
}

/// Result of one top-level investigation.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct InvestigationResult {
    pub report_text: String,
    pub status_message: String,
    /// Always at least 1.
    pub attempt_count: u32,
    pub outcome: Outcome,
}

impl InvestigationResult {
    /// Whether the report may be exported.
    pub fn is_downloadable(&self) -> bool {
        self.outcome == Outcome::Accepted
    }
}

/// Anything that can turn a query into an investigation result.
///
/// The web front end depends on this trait rather than on the requester so
/// tests can supply canned results.
#[async_trait]
pub trait Investigator: Send + Sync {
    async fn investigate(&self, query: &str, progress: Arc<dyn ProgressSink>)
        -> InvestigationResult;
}
