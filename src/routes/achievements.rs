use axum::{extract::State, http::StatusCode, response::IntoResponse, Json};

use crate::dto::achievement_dto::{AchievementView, UnlockAchievementRequest};
use crate::middleware::auth::AuthUser;
use crate::AppState;

#[axum::debug_handler]
pub async fn list_achievements(
    State(state): State<AppState>,
    user: AuthUser,
) -> crate::error::Result<Json<Vec<AchievementView>>> {
    let achievements = state
        .achievement_service
        .list_with_state(user.user_id)
        .await?;
    Ok(Json(achievements))
}

#[axum::debug_handler]
pub async fn unlock_achievement(
    State(state): State<AppState>,
    user: AuthUser,
    Json(payload): Json<UnlockAchievementRequest>,
) -> crate::error::Result<impl IntoResponse> {
    let unlocked = state
        .achievement_service
        .unlock(user.user_id, payload.achievement_id)
        .await?;
    Ok((StatusCode::CREATED, Json(unlocked)))
}
