use axum::{
    extract::{Path, State},
    Json,
};
use uuid::Uuid;
use validator::Validate;

use crate::dto::test_dto::{SubmitTestRequest, SubmitTestResponse, TestDetail, TestSummary};
use crate::middleware::auth::AuthUser;
use crate::AppState;

#[axum::debug_handler]
pub async fn list_tests(
    State(state): State<AppState>,
    _user: AuthUser,
) -> crate::error::Result<Json<Vec<TestSummary>>> {
    let tests = state.test_service.list_tests().await?;
    Ok(Json(tests))
}

#[axum::debug_handler]
pub async fn get_test(
    State(state): State<AppState>,
    user: AuthUser,
    Path(test_id): Path<Uuid>,
) -> crate::error::Result<Json<TestDetail>> {
    let test = state
        .test_service
        .get_test_for_taking(user.user_id, test_id)
        .await?;
    Ok(Json(test))
}

#[utoipa::path(
    post,
    path = "/api/tests/submit",
    request_body = SubmitTestRequest,
    responses(
        (status = 200, description = "Submission graded and recorded", body = Json<serde_json::Value>),
        (status = 400, description = "Test already completed or invalid payload"),
        (status = 404, description = "Test not found"),
    ),
)]
#[axum::debug_handler]
pub async fn submit_test(
    State(state): State<AppState>,
    user: AuthUser,
    Json(payload): Json<SubmitTestRequest>,
) -> crate::error::Result<Json<SubmitTestResponse>> {
    payload.validate()?;
    let response = state.progress_service.submit(user.user_id, &payload).await?;
    Ok(Json(response))
}
