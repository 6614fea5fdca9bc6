use serde::Serialize;

use crate::dto::test_dto::TestSummary;

#[derive(Debug, Clone, Serialize)]
pub struct TopicSummary {
    pub id: uuid::Uuid,
    pub name: String,
    pub description: Option<String>,
    pub position: i32,
}

#[derive(Debug, Clone, Serialize)]
pub struct CategoryWithTopics {
    pub id: uuid::Uuid,
    pub name: String,
    pub description: Option<String>,
    pub position: i32,
    pub topics: Vec<TopicSummary>,
}

#[derive(Debug, Clone, Serialize)]
pub struct TopicDetail {
    pub id: uuid::Uuid,
    pub category_id: uuid::Uuid,
    pub name: String,
    pub description: Option<String>,
    pub content: String,
    pub position: i32,
    pub tests: Vec<TestSummary>,
}
