use sqlx::PgPool;

use crate::dto::auth_dto::{AuthResponse, LoginRequest, RegisterRequest, UserSummary};
use crate::error::{Error, Result};
use crate::models::user::User;
use crate::utils::crypto::{hash_password, verify_password};
use crate::utils::token::mint_token;

#[derive(Clone)]
pub struct AuthService {
    pool: PgPool,
}

impl AuthService {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    /// Creates the user together with an empty profile, so every account has
    /// progress counters from its first request.
    pub async fn register(&self, req: &RegisterRequest) -> Result<AuthResponse> {
        let email_taken: bool =
            sqlx::query_scalar(r#"SELECT EXISTS(SELECT 1 FROM users WHERE email = $1)"#)
                .bind(&req.email)
                .fetch_one(&self.pool)
                .await?;
        if email_taken {
            return Err(Error::Conflict("Email already registered".to_string()));
        }

        let password_hash = hash_password(&req.password)
            .map_err(|e| Error::Internal(format!("password hashing failed: {e}")))?;

        let mut tx = self.pool.begin().await?;
        let user = sqlx::query_as::<_, User>(
            r#"
            INSERT INTO users (email, name, password_hash)
            VALUES ($1, $2, $3)
            RETURNING *
            "#,
        )
        .bind(&req.email)
        .bind(&req.name)
        .bind(&password_hash)
        .fetch_one(&mut *tx)
        .await?;

        sqlx::query(r#"INSERT INTO profiles (user_id) VALUES ($1)"#)
            .bind(user.id)
            .execute(&mut *tx)
            .await?;
        tx.commit().await?;

        tracing::info!(user_id = %user.id, "user registered");

        let token = mint_token(user.id)?;
        Ok(AuthResponse {
            token,
            user: UserSummary {
                id: user.id,
                email: user.email,
                name: user.name,
            },
        })
    }

    pub async fn login(&self, req: &LoginRequest) -> Result<AuthResponse> {
        let user = sqlx::query_as::<_, User>(r#"SELECT * FROM users WHERE email = $1"#)
            .bind(&req.email)
            .fetch_optional(&self.pool)
            .await?
            .ok_or_else(|| Error::Unauthorized("Invalid email or password".to_string()))?;

        let password_ok = verify_password(&req.password, &user.password_hash)
            .map_err(|e| Error::Internal(format!("password verification failed: {e}")))?;
        if !password_ok {
            return Err(Error::Unauthorized("Invalid email or password".to_string()));
        }

        let token = mint_token(user.id)?;
        Ok(AuthResponse {
            token,
            user: UserSummary {
                id: user.id,
                email: user.email,
                name: user.name,
            },
        })
    }
}
