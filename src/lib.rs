//! # Detective Agent - Ed D.
//!
//! Front end for a remote "financial detective" agent. A query such as
//! `"Tesla"` is sent to the agent over A2A, the streamed reply is collected
//! into a Markdown report, incomplete replies are retried with exponential
//! backoff, and accepted reports can be exported as PDF.
//!
//! ## Overview
//!
//! The crate can be used in two ways:
//!
//! 1. **As a standalone server** - Run the `detective-server` binary
//! 2. **As a library** - Use the requester and renderer directly
//!
//! ### Basic Example
//!
//! ```rust,ignore
//! use detective::a2a::A2aClient;
//! use detective::investigation::{RemoteReportSource, ReportRequester, RetryPolicy};
//! use detective::report::ReportRenderer;
//! use std::sync::Arc;
//!
//! let agent = A2aClient::with_config("http://localhost:8001", Default::default())?;
//! let source = RemoteReportSource::new(Arc::new(agent));
//! let requester = ReportRequester::new(Arc::new(source), RetryPolicy::default());
//!
//! let result = requester.obtain_report("Tesla").await;
//! if result.is_downloadable() {
//!     ReportRenderer::default().write_to(&result.report_text, None, "tesla.pdf".as_ref())?;
//! }
//! ```
//!
//! ## Modules
//!
//! - [`a2a`] - Remote agent client (agent card, `message/stream`, SSE)
//! - [`investigation`] - Acceptance check, retry loop, progress reporting
//! - [`report`] - Markdown classification and PDF rendering
//! - [`api`] - HTTP front end
//! - [`cli`] - Command-line interface
//! - [`types`] - Common types and error handling
//! - [`utils`] - Configuration and tracing setup

#![warn(rustdoc::missing_crate_level_docs)]

/// A2A client for the remote detective agent.
pub mod a2a;
/// HTTP API handlers and routes.
pub mod api;
/// Command-line interface.
pub mod cli;
/// Report requester with retry and backoff.
pub mod investigation;
/// Report renderer (Markdown to PDF).
pub mod report;
/// Core types (requests, responses, errors).
pub mod types;
/// Configuration utilities.
pub mod utils;

pub use investigation::{InvestigationResult, Investigator, Outcome, ReportRequester};
pub use report::ReportRenderer;
pub use types::{AppError, Result};
pub use utils::toml_config::{ConfigManager, DetectiveConfig};

use a2a::{A2aClient, A2aClientConfig};
use investigation::RemoteReportSource;
use std::sync::Arc;

/// Application state shared across handlers
#[derive(Clone)]
pub struct AppState {
    /// TOML configuration with hot-reload support
    pub config_manager: Arc<ConfigManager>,
    /// Runs investigations; the remote requester in production
    pub investigator: Arc<dyn Investigator>,
    /// PDF renderer
    pub renderer: Arc<ReportRenderer>,
}

impl AppState {
    pub fn new(
        config_manager: Arc<ConfigManager>,
        investigator: Arc<dyn Investigator>,
        renderer: Arc<ReportRenderer>,
    ) -> Self {
        Self {
            config_manager,
            investigator,
            renderer,
        }
    }

    /// Wires the A2A client, requester and renderer from configuration.
    pub fn from_config(config_manager: Arc<ConfigManager>) -> Result<Self> {
        let config = config_manager.config();
        let requester = build_requester(&config)?;
        let renderer = ReportRenderer::new(config.report.theme());

        Ok(Self::new(
            config_manager,
            Arc::new(requester),
            Arc::new(renderer),
        ))
    }
}

/// Builds a requester talking to the configured remote agent.
pub fn build_requester(config: &DetectiveConfig) -> Result<ReportRequester> {
    let client = A2aClient::with_config(
        config.agent.server_url.clone(),
        A2aClientConfig {
            timeout: config.agent.timeout(),
            auth_token: config.agent.auth_token(),
            user_id: Some(config.agent.user_id.clone()),
        },
    )?;
    let source = RemoteReportSource::new(Arc::new(client))
        .with_attempt_timeout(config.agent.attempt_timeout());

    Ok(ReportRequester::new(
        Arc::new(source),
        config.retry.policy(),
    ))
}
