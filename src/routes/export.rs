use axum::{
    extract::State,
    http::{header, StatusCode},
    response::IntoResponse,
    Json,
};

use crate::dto::metrics_dto::ExportRequest;
use crate::middleware::auth::AuthUser;
use crate::AppState;

#[utoipa::path(
    post,
    path = "/api/export",
    request_body = ExportRequest,
    responses(
        (status = 200, description = "Export file generated"),
        (status = 400, description = "Unsupported export format"),
    ),
)]
#[axum::debug_handler]
pub async fn export_metrics(
    State(state): State<AppState>,
    _user: AuthUser,
    Json(payload): Json<ExportRequest>,
) -> crate::error::Result<impl IntoResponse> {
    let file = state.export_service.export(&payload).await?;
    let disposition = format!("attachment; filename=\"{}\"", file.filename);

    Ok((
        StatusCode::OK,
        [
            (header::CONTENT_TYPE, file.content_type.to_string()),
            (header::CONTENT_DISPOSITION, disposition),
        ],
        file.bytes,
    ))
}
