//! Init command implementation
//!
//! Scaffolds `detective.toml`, `.env.example` and the reports directory.

use super::output::Output;
use std::fs;
use std::path::{Path, PathBuf};

/// Result of the init operation
#[derive(Debug)]
pub enum InitResult {
    /// Initialization completed successfully
    Success,
    /// Project already exists (detective.toml found)
    AlreadyExists,
    /// An error occurred during initialization
    Error(String),
}

/// Configuration for the init command
pub struct InitConfig {
    /// Directory to initialize
    pub path: PathBuf,
    /// Overwrite existing files
    pub force: bool,
    /// Remote agent base URL written to the config
    pub server_url: String,
    /// Port for the web front end
    pub port: u16,
}

/// Run the init command
pub fn run(config: InitConfig, output: &Output) -> InitResult {
    output.banner();
    output.header("Initializing Detective Agent");

    let base_path = &config.path;

    let config_path = base_path.join("detective.toml");
    if config_path.exists() && !config.force {
        output.warning("detective.toml already exists!");
        output.hint("Use --force to overwrite existing files");
        return InitResult::AlreadyExists;
    }

    output.subheader("Creating directories");
    let reports_dir = base_path.join("reports");
    if reports_dir.exists() {
        output.skipped("reports", "already exists");
    } else if let Err(e) = fs::create_dir_all(&reports_dir) {
        output.error(&format!("Failed to create reports: {}", e));
        return InitResult::Error(e.to_string());
    } else {
        output.created_dir("reports");
    }

    output.subheader("Creating configuration files");

    if let Err(e) = write_file(&config_path, &generate_detective_toml(&config), config.force) {
        output.error(&format!("Failed to create detective.toml: {}", e));
        return InitResult::Error(e.to_string());
    }
    output.created("config", "detective.toml");

    let env_example_path = base_path.join(".env.example");
    if let Err(e) = write_file(&env_example_path, &generate_env_example(&config), config.force) {
        output.error(&format!("Failed to create .env.example: {}", e));
        return InitResult::Error(e.to_string());
    }
    output.created("env", ".env.example");

    let gitignore_path = base_path.join(".gitignore");
    if !gitignore_path.exists() {
        if let Err(e) = write_file(&gitignore_path, GITIGNORE, false) {
            output.warning(&format!("Failed to create .gitignore: {}", e));
        } else {
            output.created("file", ".gitignore");
        }
    }

    output.complete("Detective Agent initialized successfully!");

    output.header("Next Steps");
    output.newline();
    output.info("1. Start the remote detective agent:");
    output.command("python remote_agent.py  # serves on port 8001");
    output.newline();
    output.info("2. Start the front end:");
    output.command("detective-server");
    output.newline();
    output.info("3. Or investigate from the terminal:");
    output.command("detective-server investigate Tesla --pdf tesla.pdf");

    output.hint(&format!(
        "Front end will be available at http://127.0.0.1:{}",
        config.port
    ));

    InitResult::Success
}

fn write_file(path: &Path, content: &str, force: bool) -> std::io::Result<()> {
    if path.exists() && !force {
        return Ok(()); // Skip existing files unless force is true
    }
    fs::write(path, content)
}

fn generate_detective_toml(config: &InitConfig) -> String {
    format!(
        r#"# Detective Agent - Ed D. configuration

[server]
host = "127.0.0.1"
port = {port}
log_level = "info"
# "pretty" or "json"
log_format = "pretty"

[agent]
# DETECTIVE_SERVER_URL overrides this
server_url = "{server_url}"
timeout_secs = 300
# Hard ceiling for one attempt; unset means none
# attempt_timeout_secs = 240
# auth_token_env = "DETECTIVE_AGENT_TOKEN"
user_id = "web_user"

[retry]
max_attempts = 3
# Wait before attempt k+1 is backoff_base^k seconds
backoff_base = 2

[report]
output_dir = "reports"
image_path = "detective_sketch.png"
# title = "FINANCIAL INVESTIGATION REPORT"
# subtitle = "Detective Agent - Ed D."
# footer = "Generated by Detective Agent - Ed D. | Financial Investigation Services"
"#,
        port = config.port,
        server_url = config.server_url,
    )
}

fn generate_env_example(config: &InitConfig) -> String {
    format!(
        r#"# Remote detective agent
DETECTIVE_SERVER_URL={}

# Bearer token, if the agent requires one (see agent.auth_token_env)
# DETECTIVE_AGENT_TOKEN=

# Logging
RUST_LOG=detective=info,tower_http=info
"#,
        config.server_url
    )
}

const GITIGNORE: &str = r#"/target
.env
reports/
"#;
