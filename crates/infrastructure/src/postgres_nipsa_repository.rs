//! PostgreSQL-backed NIPSA registry.
//!
//! The flag lives on the `users` row; flagging an identifier with no row
//! is a no-op.

use async_trait::async_trait;
use sqlx::PgPool;
use tracing::debug;

use margin_application::NipsaRepository;
use margin_core::{AppError, AppResult};
use margin_domain::UserId;

/// PostgreSQL implementation of the NIPSA registry port.
#[derive(Clone)]
pub struct PostgresNipsaRepository {
    pool: PgPool,
}

impl PostgresNipsaRepository {
    /// Creates a repository with the provided connection pool.
    #[must_use]
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    async fn set_flag(&self, userid: &UserId, nipsa: bool) -> AppResult<()> {
        let result = sqlx::query(
            r#"
            UPDATE users
            SET nipsa = $3
            WHERE username = $1 AND authority = $2
            "#,
        )
        .bind(userid.username())
        .bind(userid.authority())
        .bind(nipsa)
        .execute(&self.pool)
        .await
        .map_err(|error| AppError::Internal(format!("failed to update nipsa flag: {error}")))?;

        debug!(
            userid = %userid,
            nipsa,
            rows = result.rows_affected(),
            "updated nipsa flag"
        );

        Ok(())
    }
}

#[async_trait]
impl NipsaRepository for PostgresNipsaRepository {
    async fn flagged_userids(&self) -> AppResult<Vec<UserId>> {
        let rows = sqlx::query_as::<_, (String, String)>(
            r#"
            SELECT username, authority
            FROM users
            WHERE nipsa
            ORDER BY authority, username
            "#,
        )
        .fetch_all(&self.pool)
        .await
        .map_err(|error| AppError::Internal(format!("failed to list nipsa users: {error}")))?;

        Ok(rows
            .into_iter()
            .map(|(username, authority)| UserId::new(username, authority))
            .collect())
    }

    async fn is_flagged(&self, userid: &UserId) -> AppResult<bool> {
        let flagged = sqlx::query_scalar::<_, bool>(
            r#"
            SELECT nipsa
            FROM users
            WHERE username = $1 AND authority = $2
            "#,
        )
        .bind(userid.username())
        .bind(userid.authority())
        .fetch_optional(&self.pool)
        .await
        .map_err(|error| AppError::Internal(format!("failed to read nipsa flag: {error}")))?;

        Ok(flagged.unwrap_or(false))
    }

    async fn flag(&self, userid: &UserId) -> AppResult<()> {
        self.set_flag(userid, true).await
    }

    async fn unflag(&self, userid: &UserId) -> AppResult<()> {
        self.set_flag(userid, false).await
    }
}
