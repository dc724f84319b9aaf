//! TOML-based configuration for the detective front end
//!
//! All settings live in `detective.toml`. Every section has defaults, so a
//! missing file yields a runnable configuration pointed at a local agent.
//!
//! # Hot Reloading
//!
//! [`ConfigManager`] holds the current configuration behind an `ArcSwap`.
//! Call [`ConfigManager::start_watching`] to pick up edits at runtime.

use arc_swap::ArcSwap;
use notify::{Event, RecommendedWatcher, RecursiveMode, Watcher};
use parking_lot::RwLock;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::mpsc;
use tracing::{error, info, warn};

use crate::investigation::RetryPolicy;
use crate::report::DocumentTheme;

/// Environment variable that overrides `agent.server_url`.
pub const SERVER_URL_ENV: &str = "DETECTIVE_SERVER_URL";

/// Root configuration structure loaded from detective.toml
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct DetectiveConfig {
    #[serde(default)]
    pub server: ServerConfig,

    #[serde(default)]
    pub agent: AgentConfig,

    #[serde(default)]
    pub retry: RetryConfig,

    #[serde(default)]
    pub report: ReportConfig,
}

// ============= Server Configuration =============

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ServerConfig {
    #[serde(default = "default_host")]
    pub host: String,

    #[serde(default = "default_port")]
    pub port: u16,

    #[serde(default = "default_log_level")]
    pub log_level: String,

    /// "pretty" or "json"
    #[serde(default = "default_log_format")]
    pub log_format: String,
}

fn default_host() -> String {
    "127.0.0.1".to_string()
}

fn default_port() -> u16 {
    7860
}

fn default_log_level() -> String {
    "info".to_string()
}

fn default_log_format() -> String {
    "pretty".to_string()
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: default_host(),
            port: default_port(),
            log_level: default_log_level(),
            log_format: default_log_format(),
        }
    }
}

// ============= Remote Agent Configuration =============

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AgentConfig {
    /// Base URL of the remote detective agent
    #[serde(default = "default_server_url")]
    pub server_url: String,

    /// HTTP timeout for one streamed request, in seconds
    #[serde(default = "default_timeout_secs")]
    pub timeout_secs: u64,

    /// Upper bound on one attempt including streaming; unset means none
    #[serde(default)]
    pub attempt_timeout_secs: Option<u64>,

    /// Name of an env var holding a bearer token for the agent
    #[serde(default)]
    pub auth_token_env: Option<String>,

    #[serde(default = "default_user_id")]
    pub user_id: String,
}

fn default_server_url() -> String {
    "http://localhost:8001".to_string()
}

fn default_timeout_secs() -> u64 {
    300
}

fn default_user_id() -> String {
    "web_user".to_string()
}

impl Default for AgentConfig {
    fn default() -> Self {
        Self {
            server_url: default_server_url(),
            timeout_secs: default_timeout_secs(),
            attempt_timeout_secs: None,
            auth_token_env: None,
            user_id: default_user_id(),
        }
    }
}

impl AgentConfig {
    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_secs)
    }

    pub fn attempt_timeout(&self) -> Option<Duration> {
        self.attempt_timeout_secs.map(Duration::from_secs)
    }

    /// Bearer token resolved from `auth_token_env`, if both are set.
    pub fn auth_token(&self) -> Option<String> {
        self.auth_token_env
            .as_deref()
            .and_then(|name| std::env::var(name).ok())
            .filter(|token| !token.trim().is_empty())
    }
}

// ============= Retry Configuration =============

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RetryConfig {
    #[serde(default = "default_max_attempts")]
    pub max_attempts: u32,

    /// Wait before attempt k+1 is `backoff_base^k` seconds
    #[serde(default = "default_backoff_base")]
    pub backoff_base: u64,
}

fn default_max_attempts() -> u32 {
    3
}

fn default_backoff_base() -> u64 {
    2
}

impl Default for RetryConfig {
    fn default() -> Self {
        Self {
            max_attempts: default_max_attempts(),
            backoff_base: default_backoff_base(),
        }
    }
}

impl RetryConfig {
    pub fn policy(&self) -> RetryPolicy {
        RetryPolicy::new(self.max_attempts, self.backoff_base)
    }
}

// ============= Report Configuration =============

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ReportConfig {
    /// Directory exported PDFs are written to
    #[serde(default = "default_output_dir")]
    pub output_dir: PathBuf,

    /// Optional image placed at the top of every report
    #[serde(default = "default_image_path")]
    pub image_path: Option<PathBuf>,

    #[serde(default)]
    pub title: Option<String>,

    #[serde(default)]
    pub subtitle: Option<String>,

    #[serde(default)]
    pub footer: Option<String>,
}

fn default_output_dir() -> PathBuf {
    PathBuf::from("reports")
}

fn default_image_path() -> Option<PathBuf> {
    Some(PathBuf::from("detective_sketch.png"))
}

impl Default for ReportConfig {
    fn default() -> Self {
        Self {
            output_dir: default_output_dir(),
            image_path: default_image_path(),
            title: None,
            subtitle: None,
            footer: None,
        }
    }
}

impl ReportConfig {
    /// Document theme with configured overrides applied.
    pub fn theme(&self) -> DocumentTheme {
        let mut theme = DocumentTheme::default();
        if let Some(title) = &self.title {
            theme.title = title.clone();
        }
        if let Some(subtitle) = &self.subtitle {
            theme.subtitle = subtitle.clone();
        }
        if let Some(footer) = &self.footer {
            theme.attribution = footer.clone();
        }
        theme
    }
}

// ============= Configuration Loading & Validation =============

/// Configuration warnings that don't prevent operation but may indicate issues
#[derive(Debug, Clone)]
pub struct ConfigWarning {
    pub kind: ConfigWarningKind,
    pub message: String,
}

#[derive(Debug, Clone, PartialEq)]
pub enum ConfigWarningKind {
    MissingAuthToken,
    MissingImage,
}

impl std::fmt::Display for ConfigWarning {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.message)
    }
}

/// Errors that can occur during configuration loading
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("Failed to read configuration file: {0}")]
    ReadError(#[from] std::io::Error),

    #[error("Failed to parse TOML: {0}")]
    ParseError(#[from] toml::de::Error),

    #[error("Validation error: {0}")]
    ValidationError(String),

    #[error("Watch error: {0}")]
    WatchError(#[from] notify::Error),
}

impl DetectiveConfig {
    /// Load configuration from a TOML file, falling back to defaults when
    /// the file does not exist.
    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self, ConfigError> {
        let path = path.as_ref();

        let mut config = if path.exists() {
            let content = fs::read_to_string(path)?;
            toml::from_str::<DetectiveConfig>(&content)?
        } else {
            warn!(path = %path.display(), "Configuration file not found, using defaults");
            DetectiveConfig::default()
        };

        config.apply_env_overrides();
        config.validate()?;

        Ok(config)
    }

    /// Parse configuration from a TOML string
    pub fn parse(content: &str) -> Result<Self, ConfigError> {
        let config: DetectiveConfig = toml::from_str(content)?;
        config.validate()?;
        Ok(config)
    }

    fn apply_env_overrides(&mut self) {
        if let Ok(url) = std::env::var(SERVER_URL_ENV)
            && !url.trim().is_empty()
        {
            self.agent.server_url = url.trim().to_string();
        }
    }

    /// Validate value ranges
    pub fn validate(&self) -> Result<(), ConfigError> {
        let url = &self.agent.server_url;
        if !(url.starts_with("http://") || url.starts_with("https://")) {
            return Err(ConfigError::ValidationError(format!(
                "agent.server_url must be an http(s) URL, got '{}'",
                url
            )));
        }

        if self.agent.timeout_secs == 0 {
            return Err(ConfigError::ValidationError(
                "agent.timeout_secs must be greater than 0".to_string(),
            ));
        }

        if self.agent.attempt_timeout_secs == Some(0) {
            return Err(ConfigError::ValidationError(
                "agent.attempt_timeout_secs must be greater than 0 when set".to_string(),
            ));
        }

        if self.retry.max_attempts == 0 {
            return Err(ConfigError::ValidationError(
                "retry.max_attempts must be at least 1".to_string(),
            ));
        }

        if self.retry.backoff_base == 0 {
            return Err(ConfigError::ValidationError(
                "retry.backoff_base must be at least 1".to_string(),
            ));
        }

        if !matches!(self.server.log_format.as_str(), "pretty" | "json") {
            return Err(ConfigError::ValidationError(format!(
                "server.log_format must be 'pretty' or 'json', got '{}'",
                self.server.log_format
            )));
        }

        Ok(())
    }

    /// Validate and collect non-fatal issues
    pub fn validate_with_warnings(&self) -> Result<Vec<ConfigWarning>, ConfigError> {
        self.validate()?;

        let mut warnings = Vec::new();

        if let Some(name) = &self.agent.auth_token_env
            && self.agent.auth_token().is_none()
        {
            warnings.push(ConfigWarning {
                kind: ConfigWarningKind::MissingAuthToken,
                message: format!(
                    "agent.auth_token_env is '{}' but that variable is not set",
                    name
                ),
            });
        }

        if let Some(image) = &self.report.image_path
            && !image.is_file()
        {
            warnings.push(ConfigWarning {
                kind: ConfigWarningKind::MissingImage,
                message: format!(
                    "report.image_path '{}' does not exist; reports render without it",
                    image.display()
                ),
            });
        }

        Ok(warnings)
    }

    /// Address the web front end binds to
    pub fn bind_addr(&self) -> String {
        format!("{}:{}", self.server.host, self.server.port)
    }
}

// ============= Hot Reloading Configuration Manager =============

/// Thread-safe configuration manager with hot reloading support
pub struct ConfigManager {
    config: Arc<ArcSwap<DetectiveConfig>>,
    config_path: PathBuf,
    watcher: RwLock<Option<RecommendedWatcher>>,
    reload_tx: Option<mpsc::UnboundedSender<()>>,
}

impl ConfigManager {
    /// Create a new configuration manager and load the initial config
    pub fn new<P: AsRef<Path>>(path: P) -> Result<Self, ConfigError> {
        // Absolute path for reliable file watching
        let path = path.as_ref();
        let path = if path.is_absolute() {
            path.to_path_buf()
        } else {
            std::env::current_dir()
                .map_err(ConfigError::ReadError)?
                .join(path)
        };

        let config = DetectiveConfig::load(&path)?;

        Ok(Self {
            config: Arc::new(ArcSwap::from_pointee(config)),
            config_path: path,
            watcher: RwLock::new(None),
            reload_tx: None,
        })
    }

    /// Get the current configuration (lockless read)
    pub fn config(&self) -> Arc<DetectiveConfig> {
        self.config.load_full()
    }

    pub fn path(&self) -> &Path {
        &self.config_path
    }

    /// Manually reload the configuration from disk
    pub fn reload(&self) -> Result<(), ConfigError> {
        info!("Reloading configuration from {:?}", self.config_path);

        let new_config = DetectiveConfig::load(&self.config_path)?;
        self.config.store(Arc::new(new_config));

        info!("Configuration reloaded successfully");
        Ok(())
    }

    /// Start watching for configuration file changes
    pub fn start_watching(&mut self) -> Result<(), ConfigError> {
        let (tx, mut rx) = mpsc::unbounded_channel::<()>();
        self.reload_tx = Some(tx.clone());

        let config_path = self.config_path.clone();
        let config_arc = Arc::clone(&self.config);
        let watched = config_path.clone();

        let mut watcher = notify::recommended_watcher(move |res: Result<Event, notify::Error>| {
            match res {
                Ok(event) => {
                    let ours = event.paths.iter().any(|p| p == &watched);
                    if ours && (event.kind.is_modify() || event.kind.is_create()) {
                        let _ = tx.send(());
                    }
                }
                Err(e) => {
                    error!("Config watcher error: {:?}", e);
                }
            }
        })?;

        // The file itself may be replaced, so watch its directory
        if let Some(parent) = self.config_path.parent() {
            watcher.watch(parent, RecursiveMode::NonRecursive)?;
        }

        *self.watcher.write() = Some(watcher);

        tokio::spawn(async move {
            let debounce_duration = Duration::from_millis(500);

            while rx.recv().await.is_some() {
                // Coalesce the burst of events a single save produces
                tokio::time::sleep(debounce_duration).await;
                while rx.try_recv().is_ok() {}

                match DetectiveConfig::load(&config_path) {
                    Ok(new_config) => {
                        config_arc.store(Arc::new(new_config));
                        info!("Configuration hot-reloaded successfully");
                    }
                    Err(e) => {
                        warn!(
                            "Failed to hot-reload config: {}. Keeping previous config.",
                            e
                        );
                    }
                }
            }
        });

        info!("Configuration hot-reload watcher started");
        Ok(())
    }

    /// Stop watching for configuration changes
    pub fn stop_watching(&self) {
        *self.watcher.write() = None;
        info!("Configuration hot-reload watcher stopped");
    }

    /// Create a config manager directly from a config (useful for testing)
    /// This won't have file watching capabilities.
    pub fn from_config(config: DetectiveConfig) -> Self {
        Self {
            config: Arc::new(ArcSwap::from_pointee(config)),
            config_path: PathBuf::from("test-config.toml"),
            watcher: RwLock::new(None),
            reload_tx: None,
        }
    }
}

impl Clone for ConfigManager {
    fn clone(&self) -> Self {
        Self {
            config: Arc::clone(&self.config),
            config_path: self.config_path.clone(),
            watcher: RwLock::new(None), // Watcher is not cloned
            reload_tx: self.reload_tx.clone(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let config = DetectiveConfig::parse("").unwrap();

        assert_eq!(config.server.host, "127.0.0.1");
        assert_eq!(config.server.port, 7860);
        assert_eq!(config.server.log_format, "pretty");
        assert_eq!(config.agent.server_url, "http://localhost:8001");
        assert_eq!(config.agent.timeout_secs, 300);
        assert_eq!(config.agent.attempt_timeout(), None);
        assert_eq!(config.retry.max_attempts, 3);
        assert_eq!(config.retry.backoff_base, 2);
        assert_eq!(config.report.output_dir, PathBuf::from("reports"));
    }

    #[test]
    fn test_parse_sections() {
        let config = DetectiveConfig::parse(
            r#"
[server]
port = 9000
log_format = "json"

[agent]
server_url = "https://detective.example.com"
attempt_timeout_secs = 120

[retry]
max_attempts = 5

[report]
output_dir = "/tmp/reports"
title = "DUE DILIGENCE"
"#,
        )
        .unwrap();

        assert_eq!(config.bind_addr(), "127.0.0.1:9000");
        assert_eq!(config.agent.attempt_timeout(), Some(Duration::from_secs(120)));
        assert_eq!(config.retry.policy().max_attempts, 5);
        assert_eq!(config.report.theme().title, "DUE DILIGENCE");
        assert_eq!(config.report.theme().subtitle, "Detective Agent - Ed D.");
    }

    #[test]
    fn test_validation_errors() {
        let cases = [
            "[agent]\nserver_url = \"localhost:8001\"",
            "[agent]\ntimeout_secs = 0",
            "[agent]\nattempt_timeout_secs = 0",
            "[retry]\nmax_attempts = 0",
            "[retry]\nbackoff_base = 0",
            "[server]\nlog_format = \"xml\"",
        ];

        for case in cases {
            let result = DetectiveConfig::parse(case);
            assert!(
                matches!(result, Err(ConfigError::ValidationError(_))),
                "expected validation error for {:?}",
                case
            );
        }
    }

    #[test]
    fn test_parse_error() {
        let result = DetectiveConfig::parse("[server\nport = 1");
        assert!(matches!(result, Err(ConfigError::ParseError(_))));
    }

    #[test]
    fn test_missing_image_warning() {
        let mut config = DetectiveConfig::default();
        config.report.image_path = Some(PathBuf::from("/no/such/sketch.png"));

        let warnings = config.validate_with_warnings().unwrap();
        assert!(warnings
            .iter()
            .any(|w| w.kind == ConfigWarningKind::MissingImage));
    }

    #[test]
    fn test_load_missing_file_uses_defaults() {
        let dir = tempfile::tempdir().unwrap();
        let config = DetectiveConfig::load(dir.path().join("absent.toml")).unwrap();
        assert_eq!(config.retry.max_attempts, 3);
    }

    #[test]
    fn test_manager_reload() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("detective.toml");
        fs::write(&path, "[retry]\nmax_attempts = 2\n").unwrap();

        let manager = ConfigManager::new(&path).unwrap();
        assert_eq!(manager.config().retry.max_attempts, 2);

        fs::write(&path, "[retry]\nmax_attempts = 4\n").unwrap();
        manager.reload().unwrap();
        assert_eq!(manager.config().retry.max_attempts, 4);

        // Invalid edits keep the previous config
        fs::write(&path, "[retry]\nmax_attempts = 0\n").unwrap();
        assert!(manager.reload().is_err());
        assert_eq!(manager.config().retry.max_attempts, 4);
    }

    #[test]
    fn test_config_manager_from_config() {
        let manager = ConfigManager::from_config(DetectiveConfig::default());
        let cloned = manager.clone();
        assert_eq!(cloned.config().server.port, 7860);
    }
}
