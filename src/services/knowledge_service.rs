use sqlx::PgPool;
use uuid::Uuid;

use crate::dto::knowledge_dto::{CategoryWithTopics, TopicDetail, TopicSummary};
use crate::dto::test_dto::TestSummary;
use crate::error::{Error, Result};
use crate::models::knowledge::{KnowledgeCategory, Topic};

#[derive(Clone)]
pub struct KnowledgeService {
    pool: PgPool,
}

impl KnowledgeService {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    pub async fn list_categories(&self) -> Result<Vec<CategoryWithTopics>> {
        let categories = sqlx::query_as::<_, KnowledgeCategory>(
            r#"SELECT * FROM knowledge_categories ORDER BY position"#,
        )
        .fetch_all(&self.pool)
        .await?;

        let topics =
            sqlx::query_as::<_, Topic>(r#"SELECT * FROM topics ORDER BY category_id, position"#)
                .fetch_all(&self.pool)
                .await?;

        let result = categories
            .into_iter()
            .map(|category| {
                let category_topics = topics
                    .iter()
                    .filter(|topic| topic.category_id == category.id)
                    .map(|topic| TopicSummary {
                        id: topic.id,
                        name: topic.name.clone(),
                        description: topic.description.clone(),
                        position: topic.position,
                    })
                    .collect();
                CategoryWithTopics {
                    id: category.id,
                    name: category.name,
                    description: category.description,
                    position: category.position,
                    topics: category_topics,
                }
            })
            .collect();

        Ok(result)
    }

    pub async fn get_topic(&self, topic_id: Uuid) -> Result<TopicDetail> {
        let topic = sqlx::query_as::<_, Topic>(r#"SELECT * FROM topics WHERE id = $1"#)
            .bind(topic_id)
            .fetch_optional(&self.pool)
            .await?
            .ok_or_else(|| Error::NotFound("Topic not found".to_string()))?;

        let tests = sqlx::query_as::<_, TestSummary>(
            r#"
            SELECT t.id, t.topic_id, t.title, t.description, t.difficulty,
                   t.time_limit_minutes, t.passing_score,
                   COUNT(q.id) AS question_count
            FROM tests t
            LEFT JOIN questions q ON q.test_id = t.id
            WHERE t.topic_id = $1
            GROUP BY t.id
            ORDER BY t.created_at
            "#,
        )
        .bind(topic_id)
        .fetch_all(&self.pool)
        .await?;

        Ok(TopicDetail {
            id: topic.id,
            category_id: topic.category_id,
            name: topic.name,
            description: topic.description,
            content: topic.content,
            position: topic.position,
            tests,
        })
    }
}
