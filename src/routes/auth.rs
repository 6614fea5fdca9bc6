use axum::{extract::State, Json};
use validator::Validate;

use crate::dto::auth_dto::{AuthResponse, LoginRequest, RegisterRequest};
use crate::AppState;

#[axum::debug_handler]
pub async fn register(
    State(state): State<AppState>,
    Json(payload): Json<RegisterRequest>,
) -> crate::error::Result<Json<AuthResponse>> {
    payload.validate()?;
    let response = state.auth_service.register(&payload).await?;
    Ok(Json(response))
}

#[axum::debug_handler]
pub async fn login(
    State(state): State<AppState>,
    Json(payload): Json<LoginRequest>,
) -> crate::error::Result<Json<AuthResponse>> {
    payload.validate()?;
    let response = state.auth_service.login(&payload).await?;
    Ok(Json(response))
}
