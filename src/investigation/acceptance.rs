//! Acceptance of remote reports
//!
//! The status strings produced by a report source and the predicate that
//! judges them share the markers below, so formatting and control flow cannot
//! drift apart.

/// Minimum trimmed length, in characters, of a usable report.
pub const MIN_REPORT_CHARS: usize = 50;

/// Glyph that marks a degraded status.
pub const WARNING_GLYPH: char = '⚠';

/// Phrase that marks an incomplete investigation (matched case-insensitively).
pub const INCOMPLETE_MARKER: &str = "incomplete";

/// Phrase that marks a minimal agent response (matched case-insensitively).
pub const MINIMAL_RESPONSE_MARKER: &str = "minimal response";

/// Status returned for an empty or blank query.
pub const STATUS_EMPTY_QUERY: &str = "❌ Please enter a company name or query";

/// Status returned when the agent produced too little text.
pub const STATUS_INCOMPLETE: &str = "⚠️ Investigation incomplete - see debug info above";

/// Whether a report and its status describe a usable investigation.
///
/// The report must be non-empty with at least [`MIN_REPORT_CHARS`] characters
/// once trimmed, and the status must carry none of the failure markers.
pub fn is_acceptable(report_text: &str, status_message: &str) -> bool {
    if report_text.is_empty() || !has_min_length(report_text) {
        return false;
    }

    let status = status_message.to_lowercase();
    !status_message.contains(WARNING_GLYPH)
        && !status.contains(INCOMPLETE_MARKER)
        && !status.contains(MINIMAL_RESPONSE_MARKER)
}

/// Whether `text` is long enough to be a report at all.
pub fn has_min_length(text: &str) -> bool {
    text.trim().chars().count() >= MIN_REPORT_CHARS
}

/// Status for a completed attempt.
pub fn status_complete(session_id: &str, event_count: usize) -> String {
    format!(
        "✅ Investigation complete! Session: {} | Events: {}",
        session_id, event_count
    )
}

/// Note appended to the status once every attempt failed.
pub fn exhaustion_note(max_attempts: u32) -> String {
    format!(
        "\n\n⚠️ **Note:** Investigation attempted {} times but remained incomplete.",
        max_attempts
    )
}
