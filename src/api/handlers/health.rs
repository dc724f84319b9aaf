use crate::{AppState, types::HealthResponse};
use axum::{Json, extract::State};

/// Service health and the configured agent
#[utoipa::path(
    get,
    path = "/api/health",
    responses(
        (status = 200, description = "Service is up", body = HealthResponse)
    ),
    tag = "health"
)]
pub async fn health_check(State(state): State<AppState>) -> Json<HealthResponse> {
    let config = state.config_manager.config();
    Json(HealthResponse {
        status: "ok".to_string(),
        version: env!("CARGO_PKG_VERSION").to_string(),
        agent_url: config.agent.server_url.clone(),
    })
}
