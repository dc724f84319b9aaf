//! Integration tests for the TOML configuration system
//!
//! These tests verify that configuration files load end to end:
//! - Missing files fall back to defaults
//! - Files on disk parse and validate
//! - The manager reloads after the file changes
//! - Loaded settings flow into the requester

use detective::utils::toml_config::{ConfigError, ConfigManager, DetectiveConfig};
use std::fs;
use std::time::Duration;
use tempfile::TempDir;

const CONFIG: &str = r#"
[server]
port = 9100
log_format = "json"

[agent]
server_url = "http://agent.internal:8001"
attempt_timeout_secs = 120

[retry]
max_attempts = 4
backoff_base = 3

[report]
output_dir = "out"
title = "CASE FILE"
"#;

#[test]
fn test_load_from_file() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("detective.toml");
    fs::write(&path, CONFIG).unwrap();

    let manager = ConfigManager::new(&path).unwrap();
    let config = manager.config();

    assert_eq!(config.server.port, 9100);
    assert_eq!(config.server.host, "127.0.0.1");
    assert_eq!(config.agent.attempt_timeout(), Some(Duration::from_secs(120)));
    assert_eq!(config.retry.policy().total_backoff(), Duration::from_secs(3 + 9 + 27));
    assert_eq!(config.report.theme().title, "CASE FILE");
    assert_eq!(
        config.report.theme().subtitle,
        "Detective Agent - Ed D."
    );
}

#[test]
fn test_missing_file_uses_defaults() {
    let dir = TempDir::new().unwrap();
    let manager = ConfigManager::new(dir.path().join("absent.toml")).unwrap();
    let config = manager.config();

    assert_eq!(config.retry.max_attempts, 3);
    assert_eq!(config.retry.backoff_base, 2);
    assert_eq!(config.agent.user_id, "web_user");
}

#[test]
fn test_invalid_file_is_rejected() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("detective.toml");
    fs::write(&path, "[retry]\nmax_attempts = 0\n").unwrap();

    assert!(matches!(
        ConfigManager::new(&path),
        Err(ConfigError::ValidationError(_))
    ));

    fs::write(&path, "[retry\n").unwrap();
    assert!(matches!(
        ConfigManager::new(&path),
        Err(ConfigError::ParseError(_))
    ));
}

#[test]
fn test_reload_picks_up_changes() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("detective.toml");
    fs::write(&path, CONFIG).unwrap();

    let manager = ConfigManager::new(&path).unwrap();
    assert_eq!(manager.config().retry.max_attempts, 4);

    fs::write(&path, CONFIG.replace("max_attempts = 4", "max_attempts = 6")).unwrap();
    manager.reload().unwrap();
    assert_eq!(manager.config().retry.max_attempts, 6);
}

#[test]
fn test_failed_reload_keeps_previous_config() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("detective.toml");
    fs::write(&path, CONFIG).unwrap();

    let manager = ConfigManager::new(&path).unwrap();
    fs::write(&path, "[agent]\nserver_url = \"ftp://nope\"\n").unwrap();

    assert!(manager.reload().is_err());
    assert_eq!(manager.config().agent.server_url, "http://agent.internal:8001");
}

#[tokio::test]
async fn test_watcher_reloads_on_write() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("detective.toml");
    fs::write(&path, CONFIG).unwrap();

    let mut manager = ConfigManager::new(&path).unwrap();
    manager.start_watching().unwrap();

    fs::write(&path, CONFIG.replace("port = 9100", "port = 9200")).unwrap();

    // debounce is 500ms; allow generous slack for slow filesystems
    let mut port = manager.config().server.port;
    for _ in 0..50 {
        if port == 9200 {
            break;
        }
        tokio::time::sleep(Duration::from_millis(100)).await;
        port = manager.config().server.port;
    }
    manager.stop_watching();

    assert_eq!(port, 9200);
}

#[test]
fn test_requester_built_from_config() {
    let config = DetectiveConfig::parse(CONFIG).unwrap();
    let requester = detective::build_requester(&config).unwrap();

    assert_eq!(requester.policy().max_attempts, 4);
    assert_eq!(requester.policy().backoff_base, 3);
}
