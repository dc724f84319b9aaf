//! Progress reporting
//!
//! Progress is purely observational: sinks may drop every call without
//! affecting the investigation.

use parking_lot::Mutex;
use std::sync::Arc;
use std::time::Duration;
use tokio::task::JoinHandle;
use tracing::debug;

/// Receives `(fraction, description)` updates, `fraction` in `[0, 1]`.
pub trait ProgressSink: Send + Sync {
    fn report(&self, fraction: f32, description: &str);
}

/// Discards every update.
#[derive(Debug, Default, Clone, Copy)]
pub struct NoProgress;

impl ProgressSink for NoProgress {
    fn report(&self, _fraction: f32, _description: &str) {}
}

/// Forwards updates to the log at debug level.
#[derive(Debug, Default, Clone, Copy)]
pub struct TracingProgress;

impl ProgressSink for TracingProgress {
    fn report(&self, fraction: f32, description: &str) {
        debug!(progress = fraction, "{}", description);
    }
}

/// Maps one attempt's local progress into its share of the whole run.
///
/// Attempt `k` of `n` owns the band `[(k-1)/n, k/n]`. Reports never move
/// backwards, even when the ticker and the first event race.
pub struct AttemptBandProgress {
    inner: Arc<dyn ProgressSink>,
    start: f32,
    width: f32,
    high_water: Mutex<f32>,
}

impl AttemptBandProgress {
    pub fn new(inner: Arc<dyn ProgressSink>, attempt: u32, max_attempts: u32) -> Self {
        let max_attempts = max_attempts.max(1) as f32;
        let start = (attempt.saturating_sub(1)) as f32 / max_attempts;
        Self {
            inner,
            start,
            width: 1.0 / max_attempts,
            high_water: Mutex::new(start),
        }
    }
}

impl ProgressSink for AttemptBandProgress {
    fn report(&self, fraction: f32, description: &str) {
        let overall = self.start + fraction.clamp(0.0, 1.0) * self.width;
        let mut high_water = self.high_water.lock();
        if overall > *high_water {
            *high_water = overall;
        }
        self.inner.report(*high_water, description);
    }
}

/// Interval between simulated progress updates.
pub const TICK_INTERVAL: Duration = Duration::from_secs(2);

/// Wall-clock window over which the ticker advances.
pub const TICK_WINDOW: Duration = Duration::from_secs(60);

const TICK_FLOOR: f32 = 0.4;
const TICK_CEILING: f32 = 0.9;

const ACTIVITIES: [&str; 8] = [
    "🔍 Searching company databases...",
    "📊 Analyzing financial reports...",
    "👔 Investigating leadership...",
    "💰 Checking revenue trends...",
    "🚩 Looking for red flags...",
    "✅ Finding positive indicators...",
    "📸 Locating CEO information...",
    "🔎 Cross-referencing sources...",
];

/// Simulated progress after `elapsed` time waiting for the agent.
pub fn ticker_fraction(elapsed: Duration) -> f32 {
    let share = elapsed.as_secs_f32() / TICK_WINDOW.as_secs_f32();
    (TICK_FLOOR + share * (TICK_CEILING - TICK_FLOOR)).min(TICK_CEILING)
}

/// Activity shown after `elapsed`; rotates every eight seconds.
pub fn ticker_activity(elapsed: Duration) -> &'static str {
    ACTIVITIES[(elapsed.as_secs() / 8) as usize % ACTIVITIES.len()]
}

/// Cooperative timer that advances progress while the agent is silent.
///
/// It carries no data. [`stop`](Self::stop) aborts and joins the task; owners
/// call it on the first event and on every exit path.
pub struct ProgressTicker {
    handle: Option<JoinHandle<()>>,
}

impl ProgressTicker {
    pub fn start(sink: Arc<dyn ProgressSink>) -> Self {
        let handle = tokio::spawn(async move {
            let started = tokio::time::Instant::now();
            let mut elapsed = Duration::ZERO;
            while elapsed < TICK_WINDOW {
                tokio::time::sleep(TICK_INTERVAL).await;
                elapsed = started.elapsed();
                let description =
                    format!("{} ({}s)", ticker_activity(elapsed), elapsed.as_secs());
                sink.report(ticker_fraction(elapsed), &description);
            }
        });

        Self {
            handle: Some(handle),
        }
    }

    pub fn is_running(&self) -> bool {
        self.handle.is_some()
    }

    /// Cancels the timer and waits for the task to finish.
    pub async fn stop(&mut self) {
        if let Some(handle) = self.handle.take() {
            handle.abort();
            let _ = handle.await;
        }
    }
}

impl Drop for ProgressTicker {
    fn drop(&mut self) {
        if let Some(handle) = self.handle.take() {
            handle.abort();
        }
    }
}
