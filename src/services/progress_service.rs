use sqlx::PgPool;
use uuid::Uuid;

use crate::dto::profile_dto::{DashboardStats, ProgressResponse, RecentResult};
use crate::dto::test_dto::{SubmitTestRequest, SubmitTestResponse};
use crate::error::{Error, Result};
use crate::models::profile::Profile;
use crate::models::question::Question;
use crate::models::test::Test;
use crate::services::scoring_service::ScoringService;

#[derive(Clone)]
pub struct ProgressService {
    pool: PgPool,
}

impl ProgressService {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    /// Grades a submission and folds it into the caller's profile.
    ///
    /// The result insert and the profile update happen in one transaction, so
    /// a concurrent reader never sees a recorded result without its matching
    /// profile counters. The insert skips on the UNIQUE (user_id, test_id)
    /// constraint, so a race between two submissions of the same test resolves
    /// to one recorded result and one duplicate rejection.
    pub async fn submit(
        &self,
        user_id: Uuid,
        req: &SubmitTestRequest,
    ) -> Result<SubmitTestResponse> {
        let test = sqlx::query_as::<_, Test>(r#"SELECT * FROM tests WHERE id = $1"#)
            .bind(req.test_id)
            .fetch_optional(&self.pool)
            .await?
            .ok_or_else(|| Error::NotFound("Test not found".to_string()))?;

        let questions = sqlx::query_as::<_, Question>(
            r#"SELECT * FROM questions WHERE test_id = $1 ORDER BY position"#,
        )
        .bind(test.id)
        .fetch_all(&self.pool)
        .await?;

        let outcome = ScoringService::score(&questions, &req.answers, test.passing_score);
        let answers_json = serde_json::to_value(&req.answers)?;

        let mut tx = self.pool.begin().await?;

        let already_completed: bool = sqlx::query_scalar(
            r#"SELECT EXISTS(SELECT 1 FROM test_results WHERE user_id = $1 AND test_id = $2)"#,
        )
        .bind(user_id)
        .bind(test.id)
        .fetch_one(&mut *tx)
        .await?;
        if already_completed {
            return Err(Error::Conflict("Test already completed".to_string()));
        }

        let result_id: Uuid = sqlx::query_scalar(
            r#"
            INSERT INTO test_results (user_id, test_id, answers, score, max_score, time_spent_seconds, passed)
            VALUES ($1, $2, $3, $4, $5, $6, $7)
            ON CONFLICT (user_id, test_id) DO NOTHING
            RETURNING id
            "#,
        )
        .bind(user_id)
        .bind(test.id)
        .bind(&answers_json)
        .bind(outcome.score)
        .bind(outcome.max_score)
        .bind(req.time_spent_seconds)
        .bind(outcome.passed)
        .fetch_optional(&mut *tx)
        .await?
        .ok_or_else(|| Error::Conflict("Test already completed".to_string()))?;

        // Aggregates derive from test_results inside the same transaction, so
        // the stored success_rate can never drift from the recorded results.
        let updated = sqlx::query(
            r#"
            UPDATE profiles
            SET total_points = total_points + $2,
                total_tasks = total_tasks + 1,
                completed_tasks = completed_tasks + CASE WHEN $3 THEN 1 ELSE 0 END,
                success_rate = (SELECT COUNT(*) FILTER (WHERE passed) * 100.0 / COUNT(*)
                                FROM test_results
                                WHERE user_id = $1),
                level = (total_points + $2) / 100 + 1,
                updated_at = NOW()
            WHERE user_id = $1
            "#,
        )
        .bind(user_id)
        .bind(outcome.score)
        .bind(outcome.passed)
        .execute(&mut *tx)
        .await?;
        if updated.rows_affected() == 0 {
            return Err(Error::NotFound("Profile not found".to_string()));
        }

        tx.commit().await?;

        tracing::info!(
            %user_id,
            test_id = %test.id,
            score = outcome.score,
            max_score = outcome.max_score,
            passed = outcome.passed,
            "test submission recorded"
        );

        Ok(SubmitTestResponse {
            result_id,
            score: outcome.score,
            max_score: outcome.max_score,
            percentage: outcome.percentage,
            passed: outcome.passed,
            time_spent_seconds: req.time_spent_seconds,
        })
    }

    pub async fn get_progress(&self, user_id: Uuid) -> Result<ProgressResponse> {
        let profile = sqlx::query_as::<_, Profile>(r#"SELECT * FROM profiles WHERE user_id = $1"#)
            .bind(user_id)
            .fetch_optional(&self.pool)
            .await?
            .ok_or_else(|| Error::NotFound("Profile not found".to_string()))?;

        let recent_results = sqlx::query_as::<_, RecentResult>(
            r#"
            SELECT tr.test_id, t.title AS test_title, tr.score, tr.max_score, tr.passed, tr.created_at
            FROM test_results tr
            JOIN tests t ON t.id = tr.test_id
            WHERE tr.user_id = $1
            ORDER BY tr.created_at DESC
            LIMIT 5
            "#,
        )
        .bind(user_id)
        .fetch_all(&self.pool)
        .await?;

        let next_level_points = profile.next_level_points();
        Ok(ProgressResponse {
            total_points: profile.total_points,
            completed_tasks: profile.completed_tasks,
            total_tasks: profile.total_tasks,
            success_rate: profile.success_rate,
            level: profile.level,
            next_level_points,
            recent_results,
        })
    }

    pub async fn dashboard_stats(&self, user_id: Uuid) -> Result<DashboardStats> {
        let (tests_taken, tests_passed): (i64, i64) = sqlx::query_as(
            r#"
            SELECT COUNT(*), COUNT(*) FILTER (WHERE passed)
            FROM test_results
            WHERE user_id = $1
            "#,
        )
        .bind(user_id)
        .fetch_one(&self.pool)
        .await?;

        let total_points: i32 =
            sqlx::query_scalar(r#"SELECT total_points FROM profiles WHERE user_id = $1"#)
                .bind(user_id)
                .fetch_optional(&self.pool)
                .await?
                .ok_or_else(|| Error::NotFound("Profile not found".to_string()))?;

        let unread_alerts: i64 = sqlx::query_scalar(
            r#"SELECT COUNT(*) FROM metric_alerts WHERE user_id = $1 AND is_read = FALSE"#,
        )
        .bind(user_id)
        .fetch_one(&self.pool)
        .await?;

        let metrics_tracked: i64 = sqlx::query_scalar(r#"SELECT COUNT(*) FROM metrics"#)
            .fetch_one(&self.pool)
            .await?;

        Ok(DashboardStats {
            tests_taken,
            tests_passed,
            total_points,
            unread_alerts,
            metrics_tracked,
        })
    }
}
