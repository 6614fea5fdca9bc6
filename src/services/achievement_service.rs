use sqlx::PgPool;
use uuid::Uuid;

use crate::dto::achievement_dto::AchievementView;
use crate::error::{Error, Result};
use crate::models::achievement::UserAchievement;

#[derive(Clone)]
pub struct AchievementService {
    pool: PgPool,
}

impl AchievementService {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    pub async fn list_with_state(&self, user_id: Uuid) -> Result<Vec<AchievementView>> {
        let achievements = sqlx::query_as::<_, AchievementView>(
            r#"
            SELECT a.id, a.title, a.description, a.icon, a.criteria,
                   (ua.id IS NOT NULL) AS unlocked,
                   ua.unlocked_at
            FROM achievements a
            LEFT JOIN user_achievements ua
                ON ua.achievement_id = a.id AND ua.user_id = $1
            ORDER BY a.created_at
            "#,
        )
        .bind(user_id)
        .fetch_all(&self.pool)
        .await?;
        Ok(achievements)
    }

    /// Explicit unlock. There are no automatic triggers, a client calls this
    /// when the user claims an achievement.
    pub async fn unlock(&self, user_id: Uuid, achievement_id: Uuid) -> Result<UserAchievement> {
        let achievement_exists: bool =
            sqlx::query_scalar(r#"SELECT EXISTS(SELECT 1 FROM achievements WHERE id = $1)"#)
                .bind(achievement_id)
                .fetch_one(&self.pool)
                .await?;
        if !achievement_exists {
            return Err(Error::NotFound("Achievement not found".to_string()));
        }

        let already_unlocked: bool = sqlx::query_scalar(
            r#"SELECT EXISTS(SELECT 1 FROM user_achievements WHERE user_id = $1 AND achievement_id = $2)"#,
        )
        .bind(user_id)
        .bind(achievement_id)
        .fetch_one(&self.pool)
        .await?;
        if already_unlocked {
            return Err(Error::Conflict("Achievement already unlocked".to_string()));
        }

        let unlocked = sqlx::query_as::<_, UserAchievement>(
            r#"
            INSERT INTO user_achievements (user_id, achievement_id)
            VALUES ($1, $2)
            RETURNING *
            "#,
        )
        .bind(user_id)
        .bind(achievement_id)
        .fetch_one(&self.pool)
        .await?;

        tracing::info!(%user_id, %achievement_id, "achievement unlocked");
        Ok(unlocked)
    }
}
