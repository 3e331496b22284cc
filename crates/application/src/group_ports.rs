use async_trait::async_trait;
use chrono::{DateTime, Utc};

use margin_core::AppResult;
use margin_domain::GroupId;

/// Persisted group.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GroupRecord {
    /// Public identifier used in URLs.
    pub pubid: String,
    /// Group name.
    pub name: String,
    /// Optional description.
    pub description: Option<String>,
    /// Authority owning the group.
    pub authority: String,
    /// Third-party identifier, only set outside the default authority.
    pub groupid: Option<GroupId>,
    /// Creation timestamp.
    pub created_at: DateTime<Utc>,
}

/// Input for group creation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewGroup {
    /// Group name.
    pub name: String,
    /// Optional description.
    pub description: Option<String>,
    /// Authority owning the group.
    pub authority: String,
    /// Third-party identifier.
    pub groupid: Option<GroupId>,
}

/// Repository port for group persistence.
#[async_trait]
pub trait GroupRepository: Send + Sync {
    /// Finds a group by its public identifier.
    async fn find_by_pubid(&self, pubid: &str) -> AppResult<Option<GroupRecord>>;

    /// Finds a group by its third-party identifier.
    async fn find_by_groupid(&self, groupid: &GroupId) -> AppResult<Option<GroupRecord>>;

    /// Creates a group and returns the stored record.
    async fn create(&self, group: NewGroup) -> AppResult<GroupRecord>;
}
