use crate::{
    AppState,
    investigation::acceptance::has_min_length,
    report::export_file_name,
    types::{AppError, ExportRequest, Result},
};
use axum::{
    Json,
    extract::State,
    http::header,
    response::{IntoResponse, Response},
};
use std::path::PathBuf;

/// Export a report as PDF
///
/// The PDF is saved under the configured output directory and returned as
/// an attachment.
#[utoipa::path(
    post,
    path = "/api/report/pdf",
    request_body = ExportRequest,
    responses(
        (status = 200, description = "PDF document", body = Vec<u8>, content_type = "application/pdf"),
        (status = 400, description = "Report too short to export"),
        (status = 500, description = "Report could not be written")
    ),
    tag = "report"
)]
pub async fn export_pdf(
    State(state): State<AppState>,
    Json(payload): Json<ExportRequest>,
) -> Result<Response> {
    if !has_min_length(&payload.report) {
        return Err(AppError::InvalidInput(
            "report is too short to export".to_string(),
        ));
    }

    let config = state.config_manager.config();
    let file_name = export_file_name(&payload.query);
    let dest: PathBuf = config.report.output_dir.join(&file_name);
    let image = config.report.image_path.clone();
    let renderer = state.renderer.clone();

    let bytes = tokio::task::spawn_blocking(move || -> Result<Vec<u8>> {
        std::fs::create_dir_all(&config.report.output_dir).map_err(|e| {
            AppError::RenderIo(format!("{}: {}", config.report.output_dir.display(), e))
        })?;
        renderer.write_to(&payload.report, image.as_deref(), &dest)?;
        std::fs::read(&dest).map_err(|e| AppError::RenderIo(format!("{}: {}", dest.display(), e)))
    })
    .await
    .map_err(|e| AppError::Internal(format!("render task failed: {}", e)))??;

    Ok((
        [
            (header::CONTENT_TYPE, "application/pdf".to_string()),
            (
                header::CONTENT_DISPOSITION,
                format!("attachment; filename=\"{}\"", file_name),
            ),
        ],
        bytes,
    )
        .into_response())
}
