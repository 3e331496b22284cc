use std::collections::HashMap;

use async_trait::async_trait;
use margin_application::{UserAccount, UserDirectory};
use margin_core::AppResult;
use margin_domain::UserId;
use tokio::sync::RwLock;

use crate::is_lookup_candidate;

/// In-memory user directory keyed by canonical user identifier.
#[derive(Debug, Default)]
pub struct InMemoryUserDirectory {
    accounts: RwLock<HashMap<UserId, UserAccount>>,
}

impl InMemoryUserDirectory {
    /// Creates an empty directory.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates a directory holding the given accounts.
    #[must_use]
    pub fn with_accounts(accounts: impl IntoIterator<Item = UserAccount>) -> Self {
        Self {
            accounts: RwLock::new(
                accounts
                    .into_iter()
                    .map(|account| (account.userid(), account))
                    .collect(),
            ),
        }
    }

    /// Adds or replaces an account.
    pub async fn insert(&self, account: UserAccount) {
        self.accounts.write().await.insert(account.userid(), account);
    }
}

#[async_trait]
impl UserDirectory for InMemoryUserDirectory {
    async fn find_by_username(
        &self,
        username: &str,
        authority: &str,
    ) -> AppResult<Option<UserAccount>> {
        if !is_lookup_candidate(username) {
            return Ok(None);
        }

        self.find_by_userid(&UserId::new(username, authority)).await
    }

    async fn find_by_userid(&self, userid: &UserId) -> AppResult<Option<UserAccount>> {
        Ok(self.accounts.read().await.get(userid).cloned())
    }
}
