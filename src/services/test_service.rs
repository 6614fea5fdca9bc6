use sqlx::PgPool;
use uuid::Uuid;

use crate::dto::test_dto::{QuestionView, TestDetail, TestSummary};
use crate::error::{Error, Result};
use crate::models::question::Question;
use crate::models::test::Test;

#[derive(Clone)]
pub struct TestService {
    pool: PgPool,
}

impl TestService {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    pub async fn list_tests(&self) -> Result<Vec<TestSummary>> {
        let tests = sqlx::query_as::<_, TestSummary>(
            r#"
            SELECT t.id, t.topic_id, t.title, t.description, t.difficulty,
                   t.time_limit_minutes, t.passing_score,
                   COUNT(q.id) AS question_count
            FROM tests t
            LEFT JOIN questions q ON q.test_id = t.id
            GROUP BY t.id
            ORDER BY t.created_at
            "#,
        )
        .fetch_all(&self.pool)
        .await?;
        Ok(tests)
    }

    /// Full test for taking, with answer keys and explanations stripped.
    /// Rejects callers who already have a recorded result for the test.
    pub async fn get_test_for_taking(&self, user_id: Uuid, test_id: Uuid) -> Result<TestDetail> {
        let test = sqlx::query_as::<_, Test>(r#"SELECT * FROM tests WHERE id = $1"#)
            .bind(test_id)
            .fetch_optional(&self.pool)
            .await?
            .ok_or_else(|| Error::NotFound("Test not found".to_string()))?;

        let already_completed: bool = sqlx::query_scalar(
            r#"SELECT EXISTS(SELECT 1 FROM test_results WHERE user_id = $1 AND test_id = $2)"#,
        )
        .bind(user_id)
        .bind(test_id)
        .fetch_one(&self.pool)
        .await?;
        if already_completed {
            return Err(Error::Conflict("Test already completed".to_string()));
        }

        let questions = sqlx::query_as::<_, Question>(
            r#"SELECT * FROM questions WHERE test_id = $1 ORDER BY position"#,
        )
        .bind(test_id)
        .fetch_all(&self.pool)
        .await?;

        let questions = questions.into_iter().map(sanitize_question).collect();

        Ok(TestDetail {
            id: test.id,
            topic_id: test.topic_id,
            title: test.title,
            description: test.description,
            difficulty: test.difficulty,
            time_limit_minutes: test.time_limit_minutes,
            passing_score: test.passing_score,
            questions,
        })
    }
}

fn sanitize_question(question: Question) -> QuestionView {
    QuestionView {
        id: question.id,
        position: question.position,
        text: question.text,
        kind: question.kind,
        options: question.options.0,
        points: question.points,
    }
}
