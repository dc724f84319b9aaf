//! API request handlers.

/// Health check handler.
pub mod health;
/// Investigation handler.
pub mod investigate;
/// PDF export handler.
pub mod report;
/// Static investigation page.
pub mod ui;
