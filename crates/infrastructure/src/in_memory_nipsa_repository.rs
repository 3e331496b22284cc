use std::collections::BTreeSet;

use async_trait::async_trait;
use margin_application::NipsaRepository;
use margin_core::AppResult;
use margin_domain::UserId;
use tokio::sync::RwLock;

/// In-memory NIPSA registry.
#[derive(Debug, Default)]
pub struct InMemoryNipsaRepository {
    flagged: RwLock<BTreeSet<UserId>>,
}

impl InMemoryNipsaRepository {
    /// Creates an empty registry.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates a registry with the given accounts already flagged.
    #[must_use]
    pub fn with_flagged(userids: impl IntoIterator<Item = UserId>) -> Self {
        Self {
            flagged: RwLock::new(userids.into_iter().collect()),
        }
    }
}

#[async_trait]
impl NipsaRepository for InMemoryNipsaRepository {
    async fn flagged_userids(&self) -> AppResult<Vec<UserId>> {
        Ok(self.flagged.read().await.iter().cloned().collect())
    }

    async fn is_flagged(&self, userid: &UserId) -> AppResult<bool> {
        Ok(self.flagged.read().await.contains(userid))
    }

    async fn flag(&self, userid: &UserId) -> AppResult<()> {
        self.flagged.write().await.insert(userid.clone());
        Ok(())
    }

    async fn unflag(&self, userid: &UserId) -> AppResult<()> {
        self.flagged.write().await.remove(userid);
        Ok(())
    }
}
