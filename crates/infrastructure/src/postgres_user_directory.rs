//! PostgreSQL-backed user directory.

use async_trait::async_trait;
use sqlx::PgPool;

use margin_application::{UserAccount, UserDirectory};
use margin_core::{AppError, AppResult};
use margin_domain::UserId;

use crate::is_lookup_candidate;

/// PostgreSQL implementation of the user directory port.
#[derive(Clone)]
pub struct PostgresUserDirectory {
    pool: PgPool,
}

impl PostgresUserDirectory {
    /// Creates a directory with the provided connection pool.
    #[must_use]
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[derive(Debug, sqlx::FromRow)]
struct UserRow {
    username: String,
    authority: String,
}

impl From<UserRow> for UserAccount {
    fn from(row: UserRow) -> Self {
        Self {
            username: row.username,
            authority: row.authority,
        }
    }
}

#[async_trait]
impl UserDirectory for PostgresUserDirectory {
    async fn find_by_username(
        &self,
        username: &str,
        authority: &str,
    ) -> AppResult<Option<UserAccount>> {
        if !is_lookup_candidate(username) {
            return Ok(None);
        }

        let row = sqlx::query_as::<_, UserRow>(
            r#"
            SELECT username, authority
            FROM users
            WHERE username = $1 AND authority = $2
            LIMIT 1
            "#,
        )
        .bind(username)
        .bind(authority)
        .fetch_optional(&self.pool)
        .await
        .map_err(|error| {
            AppError::Internal(format!("failed to find user by username: {error}"))
        })?;

        Ok(row.map(UserAccount::from))
    }

    async fn find_by_userid(&self, userid: &UserId) -> AppResult<Option<UserAccount>> {
        self.find_by_username(userid.username(), userid.authority())
            .await
    }
}
