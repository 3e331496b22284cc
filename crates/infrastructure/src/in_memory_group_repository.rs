use std::collections::HashMap;

use async_trait::async_trait;
use chrono::Utc;
use margin_application::{GroupRecord, GroupRepository, NewGroup};
use margin_core::{AppError, AppResult};
use margin_domain::GroupId;
use tokio::sync::RwLock;
use uuid::Uuid;

/// In-memory group repository keyed by pubid.
#[derive(Debug, Default)]
pub struct InMemoryGroupRepository {
    groups: RwLock<HashMap<String, GroupRecord>>,
}

impl InMemoryGroupRepository {
    /// Creates an empty repository.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl GroupRepository for InMemoryGroupRepository {
    async fn find_by_pubid(&self, pubid: &str) -> AppResult<Option<GroupRecord>> {
        Ok(self.groups.read().await.get(pubid).cloned())
    }

    async fn find_by_groupid(&self, groupid: &GroupId) -> AppResult<Option<GroupRecord>> {
        Ok(self
            .groups
            .read()
            .await
            .values()
            .find(|group| group.groupid.as_ref() == Some(groupid))
            .cloned())
    }

    async fn create(&self, group: NewGroup) -> AppResult<GroupRecord> {
        let mut groups = self.groups.write().await;

        if let Some(groupid) = group.groupid.as_ref()
            && groups
                .values()
                .any(|existing| existing.groupid.as_ref() == Some(groupid))
        {
            return Err(AppError::Conflict(format!(
                "group with groupid '{groupid}' already exists"
            )));
        }

        let record = GroupRecord {
            pubid: Uuid::new_v4().simple().to_string(),
            name: group.name,
            description: group.description,
            authority: group.authority,
            groupid: group.groupid,
            created_at: Utc::now(),
        };
        groups.insert(record.pubid.clone(), record.clone());

        Ok(record)
    }
}
