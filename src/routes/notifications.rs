use axum::{extract::State, http::StatusCode, response::IntoResponse, Json};
use validator::Validate;

use crate::dto::alert_dto::{CreateAlertRequest, MarkReadRequest};
use crate::middleware::auth::AuthUser;
use crate::models::alert::MetricAlert;
use crate::AppState;

#[axum::debug_handler]
pub async fn list_notifications(
    State(state): State<AppState>,
    user: AuthUser,
) -> crate::error::Result<Json<Vec<MetricAlert>>> {
    let alerts = state.alert_service.unread(user.user_id).await?;
    Ok(Json(alerts))
}

#[utoipa::path(
    post,
    path = "/api/notifications",
    request_body = CreateAlertRequest,
    responses(
        (status = 201, description = "Alert created", body = Json<serde_json::Value>),
        (status = 400, description = "Invalid severity or empty message"),
        (status = 404, description = "Metric not found"),
    ),
)]
#[axum::debug_handler]
pub async fn create_notification(
    State(state): State<AppState>,
    user: AuthUser,
    Json(payload): Json<CreateAlertRequest>,
) -> crate::error::Result<impl IntoResponse> {
    payload.validate()?;
    let alert = state.alert_service.create(user.user_id, &payload).await?;
    Ok((StatusCode::CREATED, Json(alert)))
}

#[axum::debug_handler]
pub async fn mark_notification_read(
    State(state): State<AppState>,
    user: AuthUser,
    Json(payload): Json<MarkReadRequest>,
) -> crate::error::Result<Json<MetricAlert>> {
    let alert = state
        .alert_service
        .mark_read(user.user_id, payload.alert_id)
        .await?;
    Ok(Json(alert))
}
