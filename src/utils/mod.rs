//! Configuration and process utilities.

/// Tracing subscriber setup for the binary.
pub mod telemetry;
/// `detective.toml` loading, validation and hot reload.
pub mod toml_config;
