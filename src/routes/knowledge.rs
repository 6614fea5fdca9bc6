use axum::{
    extract::{Path, State},
    Json,
};
use uuid::Uuid;

use crate::dto::knowledge_dto::{CategoryWithTopics, TopicDetail};
use crate::middleware::auth::AuthUser;
use crate::AppState;

#[axum::debug_handler]
pub async fn list_knowledge(
    State(state): State<AppState>,
    _user: AuthUser,
) -> crate::error::Result<Json<Vec<CategoryWithTopics>>> {
    let categories = state.knowledge_service.list_categories().await?;
    Ok(Json(categories))
}

#[axum::debug_handler]
pub async fn get_topic(
    State(state): State<AppState>,
    _user: AuthUser,
    Path(topic_id): Path<Uuid>,
) -> crate::error::Result<Json<TopicDetail>> {
    let topic = state.knowledge_service.get_topic(topic_id).await?;
    Ok(Json(topic))
}
