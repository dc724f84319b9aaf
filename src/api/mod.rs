//! HTTP API Handlers and Routes
//!
//! The web front end, built on axum: a static page plus a small JSON API.
//!
//! # Module Structure
//!
//! - [`api::handlers`](crate::api::handlers) - Request handlers for each endpoint
//! - [`api::routes`](crate::api::routes) - Route definitions and router configuration
//!
//! # API Endpoints
//!
//! - `GET /` - Investigation page
//! - `GET /api/health` - Health check
//! - `POST /api/investigate` - Run an investigation (with retries)
//! - `POST /api/report/pdf` - Export a report as PDF
//!
//! # OpenAPI Documentation
//!
//! When the `swagger-ui` feature is enabled, interactive API documentation
//! is available at `/swagger-ui/`.

/// Request handlers for all API endpoints.
pub mod handlers;
/// Router configuration and route definitions.
pub mod routes;

use utoipa::OpenApi;

/// OpenAPI description of the JSON endpoints.
#[derive(OpenApi)]
#[openapi(
    paths(
        handlers::health::health_check,
        handlers::investigate::investigate,
        handlers::report::export_pdf,
    ),
    components(schemas(
        crate::types::InvestigateRequest,
        crate::types::InvestigateResponse,
        crate::types::ExportRequest,
        crate::types::HealthResponse,
        crate::investigation::Outcome,
    )),
    tags(
        (name = "investigation", description = "Company investigations"),
        (name = "report", description = "Report export"),
        (name = "health", description = "Service health")
    )
)]
pub struct ApiDoc;
