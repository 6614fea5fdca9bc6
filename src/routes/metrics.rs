use axum::{extract::State, Json};

use crate::dto::metrics_dto::{ComparisonRow, RecommendationItem};
use crate::middleware::auth::AuthUser;
use crate::models::metric::Metric;
use crate::AppState;

#[axum::debug_handler]
pub async fn list_metrics(
    State(state): State<AppState>,
    _user: AuthUser,
) -> crate::error::Result<Json<Vec<Metric>>> {
    let metrics = state.metric_service.list_metrics().await?;
    Ok(Json(metrics))
}

#[axum::debug_handler]
pub async fn recommendations(
    State(state): State<AppState>,
    _user: AuthUser,
) -> crate::error::Result<Json<Vec<RecommendationItem>>> {
    let recommendations = state.analytics_service.recommendations().await?;
    Ok(Json(recommendations))
}

#[axum::debug_handler]
pub async fn comparison(
    State(state): State<AppState>,
    _user: AuthUser,
) -> crate::error::Result<Json<Vec<ComparisonRow>>> {
    let rows = state.analytics_service.comparison().await?;
    Ok(Json(rows))
}
