use crate::{
    AppState,
    investigation::TracingProgress,
    types::{InvestigateRequest, InvestigateResponse},
};
use axum::{Json, extract::State};
use std::sync::Arc;
use std::time::Instant;
use tracing::info;

/// Investigate a company
///
/// Runs the full retry loop before answering, so this can take minutes.
/// A blank query is answered immediately with outcome `rejected`.
#[utoipa::path(
    post,
    path = "/api/investigate",
    request_body = InvestigateRequest,
    responses(
        (status = 200, description = "Investigation finished", body = InvestigateResponse)
    ),
    tag = "investigation"
)]
pub async fn investigate(
    State(state): State<AppState>,
    Json(payload): Json<InvestigateRequest>,
) -> Json<InvestigateResponse> {
    let start = Instant::now();

    let result = state
        .investigator
        .investigate(&payload.query, Arc::new(TracingProgress))
        .await;

    info!(
        attempts = result.attempt_count,
        outcome = ?result.outcome,
        duration_ms = start.elapsed().as_millis() as u64,
        "Investigation request finished"
    );

    Json(InvestigateResponse::from(result))
}
