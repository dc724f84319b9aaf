//! Tracing initialisation for the `detective-server` binary.
//!
//! `RUST_LOG` takes precedence over the configured level. Calling
//! [`init_tracing`] more than once is harmless; only the first call installs
//! a subscriber.

use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;
use tracing_subscriber::{EnvFilter, fmt};

/// Output format of log lines.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LogFormat {
    Pretty,
    Json,
}

impl LogFormat {
    /// Parses `server.log_format`. Anything but "json" is pretty.
    pub fn from_config(value: &str) -> Self {
        if value.eq_ignore_ascii_case("json") {
            LogFormat::Json
        } else {
            LogFormat::Pretty
        }
    }
}

/// Filter used when `RUST_LOG` is unset.
pub fn default_filter(level: &str, verbose: bool) -> String {
    let level = if verbose { "debug" } else { level };
    format!("detective={level},detective_server={level},tower_http={level},warn")
}

/// Install the global subscriber.
pub fn init_tracing(format: LogFormat, level: &str, verbose: bool) {
    let env_filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(default_filter(level, verbose)));

    match format {
        LogFormat::Json => tracing_subscriber::registry()
            .with(env_filter)
            .with(fmt::layer().with_target(false).json())
            .try_init()
            .ok(),
        LogFormat::Pretty => tracing_subscriber::registry()
            .with(env_filter)
            .with(fmt::layer().with_target(false))
            .try_init()
            .ok(),
    };
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_log_format_from_config() {
        assert_eq!(LogFormat::from_config("json"), LogFormat::Json);
        assert_eq!(LogFormat::from_config("JSON"), LogFormat::Json);
        assert_eq!(LogFormat::from_config("pretty"), LogFormat::Pretty);
    }

    #[test]
    fn test_verbose_forces_debug() {
        assert!(default_filter("info", true).starts_with("detective=debug"));
        assert!(default_filter("warn", false).starts_with("detective=warn"));
    }
}
