use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

use crate::investigation::{InvestigationResult, Outcome};

// ============= API Request/Response Types =============

#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct InvestigateRequest {
    pub query: String,
}

#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct InvestigateResponse {
    pub report: String,
    pub status: String,
    pub attempts: u32,
    pub outcome: Outcome,
    /// Only accepted reports may be exported
    pub downloadable: bool,
    pub completed_at: DateTime<Utc>,
}

impl From<InvestigationResult> for InvestigateResponse {
    fn from(result: InvestigationResult) -> Self {
        Self {
            downloadable: result.is_downloadable(),
            report: result.report_text,
            status: result.status_message,
            attempts: result.attempt_count,
            outcome: result.outcome,
            completed_at: Utc::now(),
        }
    }
}

#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct ExportRequest {
    pub report: String,
    #[serde(default)]
    pub query: String,
}

#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct HealthResponse {
    pub status: String,
    pub version: String,
    pub agent_url: String,
}

// ============= Error Types =============

#[derive(Debug, thiserror::Error)]
pub enum AppError {
    #[error("Invalid input: {0}")]
    InvalidInput(String),

    #[error("Remote agent error: {0}")]
    Remote(String),

    #[error("Render error: {0}")]
    Render(String),

    #[error("Could not write report: {0}")]
    RenderIo(String),

    #[error("Configuration error: {0}")]
    Config(String),

    #[error("Not found: {0}")]
    NotFound(String),

    #[error("Internal error: {0}")]
    Internal(String),
}

impl From<reqwest::Error> for AppError {
    fn from(err: reqwest::Error) -> Self {
        if err.is_timeout() {
            AppError::Remote(format!("request timed out: {}", err))
        } else if err.is_connect() {
            AppError::Remote(format!("connection failed: {}", err))
        } else {
            AppError::Remote(err.to_string())
        }
    }
}

impl axum::response::IntoResponse for AppError {
    fn into_response(self) -> axum::response::Response {
        let status = match &self {
            AppError::InvalidInput(_) => axum::http::StatusCode::BAD_REQUEST,
            AppError::Remote(_) => axum::http::StatusCode::BAD_GATEWAY,
            AppError::NotFound(_) => axum::http::StatusCode::NOT_FOUND,
            AppError::Render(_)
            | AppError::RenderIo(_)
            | AppError::Config(_)
            | AppError::Internal(_) => axum::http::StatusCode::INTERNAL_SERVER_ERROR,
        };

        let body = serde_json::json!({
            "error": self.to_string()
        });

        (status, axum::Json(body)).into_response()
    }
}

pub type Result<T> = std::result::Result<T, AppError>;

#[cfg(test)]
mod tests {
    use super::*;
    use axum::response::IntoResponse;

    #[test]
    fn test_error_status_codes() {
        let cases = [
            (AppError::InvalidInput("x".into()), 400),
            (AppError::Remote("x".into()), 502),
            (AppError::NotFound("x".into()), 404),
            (AppError::RenderIo("x".into()), 500),
        ];

        for (err, code) in cases {
            assert_eq!(err.into_response().status().as_u16(), code);
        }
    }

    #[test]
    fn test_response_from_result() {
        let result = InvestigationResult {
            report_text: "x".repeat(60),
            status_message: "✅ Investigation complete!".to_string(),
            attempt_count: 2,
            outcome: Outcome::Accepted,
        };

        let response = InvestigateResponse::from(result);
        assert!(response.downloadable);
        assert_eq!(response.attempts, 2);
    }
}
