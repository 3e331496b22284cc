//! PostgreSQL-backed group repository.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use sqlx::PgPool;
use uuid::Uuid;

use margin_application::{GroupRecord, GroupRepository, NewGroup};
use margin_core::{AppError, AppResult};
use margin_domain::GroupId;

/// PostgreSQL implementation of the group repository port.
#[derive(Clone)]
pub struct PostgresGroupRepository {
    pool: PgPool,
}

impl PostgresGroupRepository {
    /// Creates a repository with the provided connection pool.
    #[must_use]
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[derive(Debug, sqlx::FromRow)]
struct GroupRow {
    pubid: String,
    name: String,
    description: Option<String>,
    authority: String,
    authority_provided_id: Option<String>,
    created_at: DateTime<Utc>,
}

impl TryFrom<GroupRow> for GroupRecord {
    type Error = AppError;

    fn try_from(row: GroupRow) -> Result<Self, Self::Error> {
        let groupid = row
            .authority_provided_id
            .map(|authority_provided_id| GroupId::new(authority_provided_id, row.authority.as_str()))
            .transpose()
            .map_err(|error| {
                AppError::Internal(format!("stored group '{}' is invalid: {error}", row.pubid))
            })?;

        Ok(Self {
            pubid: row.pubid,
            name: row.name,
            description: row.description,
            authority: row.authority,
            groupid,
            created_at: row.created_at,
        })
    }
}

#[async_trait]
impl GroupRepository for PostgresGroupRepository {
    async fn find_by_pubid(&self, pubid: &str) -> AppResult<Option<GroupRecord>> {
        let row = sqlx::query_as::<_, GroupRow>(
            r#"
            SELECT pubid, name, description, authority, authority_provided_id, created_at
            FROM groups
            WHERE pubid = $1
            "#,
        )
        .bind(pubid)
        .fetch_optional(&self.pool)
        .await
        .map_err(|error| AppError::Internal(format!("failed to find group by pubid: {error}")))?;

        row.map(GroupRecord::try_from).transpose()
    }

    async fn find_by_groupid(&self, groupid: &GroupId) -> AppResult<Option<GroupRecord>> {
        let row = sqlx::query_as::<_, GroupRow>(
            r#"
            SELECT pubid, name, description, authority, authority_provided_id, created_at
            FROM groups
            WHERE authority = $1 AND authority_provided_id = $2
            "#,
        )
        .bind(groupid.authority())
        .bind(groupid.authority_provided_id())
        .fetch_optional(&self.pool)
        .await
        .map_err(|error| {
            AppError::Internal(format!("failed to find group by groupid: {error}"))
        })?;

        row.map(GroupRecord::try_from).transpose()
    }

    async fn create(&self, group: NewGroup) -> AppResult<GroupRecord> {
        let result = sqlx::query_as::<_, GroupRow>(
            r#"
            INSERT INTO groups (id, pubid, name, description, authority, authority_provided_id)
            VALUES ($1, $2, $3, $4, $5, $6)
            RETURNING pubid, name, description, authority, authority_provided_id, created_at
            "#,
        )
        .bind(Uuid::new_v4())
        .bind(Uuid::new_v4().simple().to_string())
        .bind(group.name.as_str())
        .bind(group.description.as_deref())
        .bind(group.authority.as_str())
        .bind(
            group
                .groupid
                .as_ref()
                .map(|groupid| groupid.authority_provided_id()),
        )
        .fetch_one(&self.pool)
        .await;

        match result {
            Ok(row) => GroupRecord::try_from(row),
            Err(error) => {
                if let sqlx::Error::Database(database_error) = &error
                    && database_error.code().as_deref() == Some("23505")
                {
                    let message = match group.groupid.as_ref() {
                        Some(groupid) => format!("group with groupid '{groupid}' already exists"),
                        None => format!("group '{}' could not be stored uniquely", group.name),
                    };
                    return Err(AppError::Conflict(message));
                }

                Err(AppError::Internal(format!("failed to create group: {error}")))
            }
        }
    }
}

#[cfg(test)]
mod tests;
