//! Subcommand implementations.

use anyhow::Context;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use tracing::info;

use super::output::Output;
use crate::investigation::{Outcome, ProgressSink};
use crate::report::ReportRenderer;
use crate::utils::toml_config::{ConfigManager, DetectiveConfig};
use crate::{AppState, api};

/// Starts the web front end and serves until Ctrl-C.
pub async fn serve(mut manager: ConfigManager, watch: bool, output: &Output) -> anyhow::Result<()> {
    if watch {
        manager
            .start_watching()
            .context("failed to watch configuration file")?;
    }

    let config = manager.config();
    let addr = config.bind_addr();
    let state = AppState::from_config(Arc::new(manager))?;
    let app = api::routes::app(state);

    let listener = tokio::net::TcpListener::bind(&addr)
        .await
        .with_context(|| format!("failed to bind {}", addr))?;

    output.banner();
    output.kv("Front end", &format!("http://{}", addr));
    output.kv("Remote agent", &config.agent.server_url);
    output.kv("Reports", &config.report.output_dir.display().to_string());
    output.newline();
    info!(addr = %addr, agent = %config.agent.server_url, "Detective front end listening");

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await
        .context("server error")?;

    info!("Server stopped");
    Ok(())
}

async fn shutdown_signal() {
    let _ = tokio::signal::ctrl_c().await;
}

/// Runs one investigation in the terminal. Returns the outcome so the
/// caller can choose an exit code.
pub async fn investigate(
    config: &DetectiveConfig,
    query: &str,
    pdf: Option<&Path>,
    output: &Output,
) -> anyhow::Result<Outcome> {
    let requester = crate::build_requester(config)?;
    let progress: Arc<dyn ProgressSink> = Arc::new(*output);

    output.header(&format!("Investigating: {}", query.trim()));
    let result = requester.obtain_report_with_progress(query, progress).await;

    output.print_report(&result.report_text);
    output.newline();
    match result.outcome {
        Outcome::Accepted => output.success(&result.status_message),
        Outcome::Exhausted | Outcome::Rejected => output.warning(&result.status_message),
    }
    output.kv("Attempts", &result.attempt_count.to_string());

    if let Some(dest) = pdf {
        if result.is_downloadable() {
            let renderer = ReportRenderer::new(config.report.theme());
            let written = renderer.write_to(
                &result.report_text,
                config.report.image_path.as_deref(),
                dest,
            )?;
            output.created("pdf", &written.display().to_string());
        } else {
            output.warning("Report is incomplete, PDF not written");
        }
    }

    Ok(result.outcome)
}

/// Renders a Markdown report file to PDF.
pub fn render(
    config: &DetectiveConfig,
    file: &Path,
    out: Option<&Path>,
    image: Option<&Path>,
    output: &Output,
) -> anyhow::Result<PathBuf> {
    let text = std::fs::read_to_string(file)
        .with_context(|| format!("failed to read {}", file.display()))?;

    let dest = out
        .map(Path::to_path_buf)
        .unwrap_or_else(|| file.with_extension("pdf"));
    let image = image.or(config.report.image_path.as_deref());

    let renderer = ReportRenderer::new(config.report.theme());
    let written = renderer.write_to(&text, image, &dest)?;

    output.created("pdf", &written.display().to_string());
    Ok(written)
}

/// Prints the effective configuration, or only validates it.
pub fn show_config(
    path: &Path,
    config: &DetectiveConfig,
    validate_only: bool,
    output: &Output,
) -> anyhow::Result<()> {
    let warnings = config.validate_with_warnings()?;

    if validate_only {
        for warning in &warnings {
            output.warning(&warning.to_string());
        }
        output.success(&format!("{} is valid", path.display()));
        return Ok(());
    }

    output.header("Configuration");
    output.kv("File", &path.display().to_string());
    output.kv("Exists", &path.exists().to_string());

    output.subheader("Server");
    output.kv("Address", &config.bind_addr());
    output.kv("Log level", &config.server.log_level);
    output.kv("Log format", &config.server.log_format);

    output.subheader("Agent");
    output.kv("Server URL", &config.agent.server_url);
    output.kv("Timeout", &format!("{}s", config.agent.timeout_secs));
    output.kv(
        "Attempt timeout",
        &config
            .agent
            .attempt_timeout_secs
            .map_or_else(|| "none".to_string(), |s| format!("{}s", s)),
    );
    output.kv("User id", &config.agent.user_id);

    output.subheader("Retry");
    let policy = config.retry.policy();
    output.kv("Max attempts", &policy.max_attempts.to_string());
    output.kv("Backoff base", &policy.backoff_base.to_string());
    output.kv(
        "Worst-case waiting",
        &format!("{}s", policy.total_backoff().as_secs()),
    );

    output.subheader("Report");
    output.kv("Output dir", &config.report.output_dir.display().to_string());
    output.kv(
        "Image",
        &config
            .report
            .image_path
            .as_ref()
            .map_or_else(|| "none".to_string(), |p| p.display().to_string()),
    );
    output.kv("Title", &config.report.theme().title);

    for warning in &warnings {
        output.warning(&warning.to_string());
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_render_defaults_to_pdf_extension() {
        let dir = tempfile::tempdir().unwrap();
        let file = dir.path().join("tesla.md");
        std::fs::write(&file, "# Tesla\n\n## 🚩 Red Flags\n- Debt").unwrap();

        let mut config = DetectiveConfig::default();
        config.report.image_path = None;

        let written = render(&config, &file, None, None, &Output::no_color()).unwrap();

        assert_eq!(written, dir.path().join("tesla.pdf"));
        assert!(written.exists());
    }

    #[test]
    fn test_render_missing_input() {
        let config = DetectiveConfig::default();
        let result = render(
            &config,
            Path::new("/no/such/report.md"),
            None,
            None,
            &Output::no_color(),
        );
        assert!(result.is_err());
    }

    #[test]
    fn test_show_config() {
        let config = DetectiveConfig::default();
        show_config(Path::new("detective.toml"), &config, false, &Output::no_color()).unwrap();
        show_config(Path::new("detective.toml"), &config, true, &Output::no_color()).unwrap();
    }
}
