//! CLI Integration Tests for detective-server
//!
//! Runs the built binary for the commands that need no remote agent:
//! help, init, config and render.

use std::fs;
use std::path::Path;
use std::process::{Command, Output};
use tempfile::TempDir;

/// Run detective-server with arguments inside `working_dir`
fn run_detective(args: &[&str], working_dir: &Path) -> Output {
    Command::new(env!("CARGO_BIN_EXE_detective-server"))
        .args(args)
        .arg("--no-color")
        .current_dir(working_dir)
        .env_remove("DETECTIVE_SERVER_URL")
        .output()
        .expect("Failed to execute command")
}

fn stdout(output: &Output) -> String {
    String::from_utf8_lossy(&output.stdout).into_owned()
}

// =============================================================================
// Help and Version Tests
// =============================================================================

#[test]
fn test_help_command() {
    let dir = TempDir::new().unwrap();
    let output = run_detective(&["--help"], dir.path());

    assert!(output.status.success());
    let text = stdout(&output);
    assert!(text.contains("Detective Agent"));
    assert!(text.contains("investigate"));
    assert!(text.contains("render"));
    assert!(text.contains("init"));
}

#[test]
fn test_version_command() {
    let dir = TempDir::new().unwrap();
    let output = run_detective(&["--version"], dir.path());

    assert!(output.status.success());
    assert!(stdout(&output).contains(env!("CARGO_PKG_VERSION")));
}

// =============================================================================
// Init and Config Tests
// =============================================================================

#[test]
fn test_init_then_config() {
    let dir = TempDir::new().unwrap();

    let output = run_detective(&["init", "--port", "9400"], dir.path());
    assert!(output.status.success(), "{}", stdout(&output));
    assert!(dir.path().join("detective.toml").exists());
    assert!(dir.path().join(".env.example").exists());
    assert!(dir.path().join("reports").is_dir());

    let output = run_detective(&["config"], dir.path());
    assert!(output.status.success());
    let text = stdout(&output);
    assert!(text.contains("127.0.0.1:9400"));
    assert!(text.contains("http://localhost:8001"));
}

#[test]
fn test_init_refuses_to_overwrite() {
    let dir = TempDir::new().unwrap();
    fs::write(dir.path().join("detective.toml"), "# mine\n").unwrap();

    let output = run_detective(&["init"], dir.path());

    assert!(!output.status.success());
    assert_eq!(
        fs::read_to_string(dir.path().join("detective.toml")).unwrap(),
        "# mine\n"
    );
}

#[test]
fn test_config_validate_rejects_bad_file() {
    let dir = TempDir::new().unwrap();
    fs::write(
        dir.path().join("detective.toml"),
        "[retry]\nbackoff_base = 0\n",
    )
    .unwrap();

    let output = run_detective(&["config", "--validate"], dir.path());

    assert!(!output.status.success());
    assert!(String::from_utf8_lossy(&output.stderr).contains("backoff_base"));
}

// =============================================================================
// Render Tests
// =============================================================================

#[test]
fn test_render_command() {
    let dir = TempDir::new().unwrap();
    fs::write(
        dir.path().join("tesla.md"),
        "# Tesla\n\n## 🚩 Red Flags\n- Debt\n\n**CEO:** Elon Musk\n",
    )
    .unwrap();

    let output = run_detective(&["render", "tesla.md", "-o", "out.pdf"], dir.path());

    assert!(output.status.success(), "{}", stdout(&output));
    let bytes = fs::read(dir.path().join("out.pdf")).unwrap();
    assert!(bytes.starts_with(b"%PDF"));
}

#[test]
fn test_render_missing_file() {
    let dir = TempDir::new().unwrap();
    let output = run_detective(&["render", "missing.md"], dir.path());

    assert!(!output.status.success());
}
