use async_trait::async_trait;
use std::fmt::Write as _;
use std::sync::Arc;
use tracing::{info, warn};

use super::acceptance::{STATUS_EMPTY_QUERY, exhaustion_note, is_acceptable};
use super::progress::{AttemptBandProgress, NoProgress, ProgressSink};
use super::retry::{RetryPolicy, Sleeper, TokioSleeper};
use super::source::{AttemptReport, ReportSource};
use super::{InvestigationResult, Investigator, Outcome};
use crate::types::AppError;

/// Runs investigations with retry and exponential backoff.
///
/// Attempts are strictly sequential. The only state carried between them is
/// the attempt counter and the last report/status pair.
pub struct ReportRequester {
    source: Arc<dyn ReportSource>,
    policy: RetryPolicy,
    sleeper: Arc<dyn Sleeper>,
}

impl ReportRequester {
    pub fn new(source: Arc<dyn ReportSource>, policy: RetryPolicy) -> Self {
        Self {
            source,
            policy,
            sleeper: Arc::new(TokioSleeper),
        }
    }

    /// Replaces the wall-clock sleeper.
    pub fn with_sleeper(mut self, sleeper: Arc<dyn Sleeper>) -> Self {
        self.sleeper = sleeper;
        self
    }

    pub fn policy(&self) -> RetryPolicy {
        self.policy
    }

    /// Obtain a report for `query` without progress reporting.
    pub async fn obtain_report(&self, query: &str) -> InvestigationResult {
        self.obtain_report_with_progress(query, Arc::new(NoProgress))
            .await
    }

    /// Obtain a report for `query`, reporting progress to `progress`.
    ///
    /// Never fails: errors from the source are folded into the status of the
    /// attempt that raised them.
    pub async fn obtain_report_with_progress(
        &self,
        query: &str,
        progress: Arc<dyn ProgressSink>,
    ) -> InvestigationResult {
        if query.trim().is_empty() {
            return InvestigationResult {
                report_text: String::new(),
                status_message: STATUS_EMPTY_QUERY.to_string(),
                attempt_count: 1,
                outcome: Outcome::Rejected,
            };
        }

        let max_attempts = self.policy.max_attempts;
        let mut attempt = 1;

        loop {
            let band = Arc::new(AttemptBandProgress::new(
                progress.clone(),
                attempt,
                max_attempts,
            ));
            let report = match self.source.fetch(query, band).await {
                Ok(report) => report,
                Err(e) => {
                    warn!(attempt, error = %e, "Investigation attempt failed");
                    AttemptReport::new(String::new(), self.error_status(&e))
                }
            };

            if is_acceptable(&report.report_text, &report.status_message) {
                info!(attempt, "Investigation accepted");
                progress.report(1.0, "✅ Investigation complete!");
                return InvestigationResult {
                    report_text: report.report_text,
                    status_message: report.status_message,
                    attempt_count: attempt,
                    outcome: Outcome::Accepted,
                };
            }

            if !self.policy.has_next(attempt) {
                warn!(
                    attempts = max_attempts,
                    "All attempts exhausted, returning last result"
                );
                return InvestigationResult {
                    report_text: report.report_text,
                    status_message: report.status_message + &exhaustion_note(max_attempts),
                    attempt_count: max_attempts,
                    outcome: Outcome::Exhausted,
                };
            }

            let wait = self.policy.backoff(attempt);
            warn!(
                attempt,
                max_attempts,
                wait_secs = wait.as_secs(),
                status = %truncate(&report.status_message, 100),
                "Investigation incomplete, backing off"
            );
            let band_end = attempt as f32 / max_attempts as f32;
            progress.report(
                band_end,
                &format!(
                    "🔄 Investigation incomplete. Retrying ({}/{}) in {}s...",
                    attempt,
                    max_attempts,
                    wait.as_secs()
                ),
            );

            self.sleeper.sleep(wait).await;

            attempt += 1;
            progress.report(
                band_end,
                &format!(
                    "🔄 Retrying investigation (attempt {}/{})...",
                    attempt, max_attempts
                ),
            );
        }
    }

    fn error_status(&self, error: &AppError) -> String {
        let mut status = format!("❌ Error: {}\n\n**Troubleshooting:**\n", error);
        for (i, step) in self.source.troubleshooting().iter().enumerate() {
            let _ = writeln!(status, "{}. {}", i + 1, step);
        }
        status
    }
}

#[async_trait]
impl Investigator for ReportRequester {
    async fn investigate(
        &self,
        query: &str,
        progress: Arc<dyn ProgressSink>,
    ) -> InvestigationResult {
        self.obtain_report_with_progress(query, progress).await
    }
}

fn truncate(text: &str, max_chars: usize) -> &str {
    match text.char_indices().nth(max_chars) {
        Some((idx, _)) => &text[..idx],
        None => text,
    }
}
