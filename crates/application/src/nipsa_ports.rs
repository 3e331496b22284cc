use async_trait::async_trait;

use margin_core::AppResult;
use margin_domain::UserId;

/// Account returned by user directory lookups.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UserAccount {
    /// Short username, unique within the authority.
    pub username: String,
    /// Authority the account belongs to.
    pub authority: String,
}

impl UserAccount {
    /// Returns the canonical identifier of this account.
    #[must_use]
    pub fn userid(&self) -> UserId {
        UserId::new(self.username.as_str(), self.authority.as_str())
    }
}

/// Port resolving usernames and user identifiers to accounts.
#[async_trait]
pub trait UserDirectory: Send + Sync {
    /// Finds an account by username within an authority.
    ///
    /// Malformed usernames (empty, control characters) resolve to `None`.
    async fn find_by_username(
        &self,
        username: &str,
        authority: &str,
    ) -> AppResult<Option<UserAccount>>;

    /// Finds an account by its canonical identifier.
    async fn find_by_userid(&self, userid: &UserId) -> AppResult<Option<UserAccount>>;
}

/// Registry of accounts flagged as NIPSA.
#[async_trait]
pub trait NipsaRepository: Send + Sync {
    /// Lists every flagged account identifier.
    async fn flagged_userids(&self) -> AppResult<Vec<UserId>>;

    /// Returns whether the account is flagged.
    async fn is_flagged(&self, userid: &UserId) -> AppResult<bool>;

    /// Flags an account. Flagging a flagged account is a no-op.
    async fn flag(&self, userid: &UserId) -> AppResult<()>;

    /// Unflags an account. Unflagging an unflagged account is a no-op.
    async fn unflag(&self, userid: &UserId) -> AppResult<()>;
}
