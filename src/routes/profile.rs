use axum::{extract::State, Json};

use crate::dto::profile_dto::{DashboardStats, ProgressResponse};
use crate::middleware::auth::AuthUser;
use crate::AppState;

#[axum::debug_handler]
pub async fn get_progress(
    State(state): State<AppState>,
    user: AuthUser,
) -> crate::error::Result<Json<ProgressResponse>> {
    let progress = state.progress_service.get_progress(user.user_id).await?;
    Ok(Json(progress))
}

#[axum::debug_handler]
pub async fn dashboard_stats(
    State(state): State<AppState>,
    user: AuthUser,
) -> crate::error::Result<Json<DashboardStats>> {
    let stats = state.progress_service.dashboard_stats(user.user_id).await?;
    Ok(Json(stats))
}
