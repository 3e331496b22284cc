//! NIPSA ("not in public site areas") administration.
//!
//! Admins flag and unflag accounts by username. Usernames are resolved in
//! the service's default authority before the flag registry is touched, so
//! an unknown username never mutates the registry.

use std::collections::BTreeSet;
use std::sync::Arc;

use thiserror::Error;

use margin_core::{AppError, AppResult, NonEmptyString};

use crate::{NipsaRepository, UserAccount, UserDirectory};

/// Path of the NIPSA listing view.
pub const NIPSA_INDEX_PATH: &str = "/adm/nipsa";

/// Where the caller should send the browser after a mutation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RedirectInstruction {
    location: String,
}

impl RedirectInstruction {
    fn to_index() -> Self {
        Self {
            location: NIPSA_INDEX_PATH.to_owned(),
        }
    }

    /// Returns the redirect target path.
    #[must_use]
    pub fn location(&self) -> &str {
        self.location.as_str()
    }
}

/// Raised when a username does not resolve to an account.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("Could not find user with username {username:?} and authority {authority:?}")]
pub struct UserNotFoundError {
    /// Username as supplied by the caller.
    pub username: String,
    /// Authority the lookup ran in.
    pub authority: String,
}

/// Failure of a NIPSA add or remove.
#[derive(Debug, Error)]
pub enum NipsaError {
    /// The username did not resolve to an account.
    #[error(transparent)]
    UserNotFound(#[from] UserNotFoundError),

    /// A collaborator failed.
    #[error(transparent)]
    Repository(#[from] AppError),
}

impl From<NipsaError> for AppError {
    fn from(value: NipsaError) -> Self {
        match value {
            NipsaError::UserNotFound(error) => Self::NotFound(error.to_string()),
            NipsaError::Repository(error) => error,
        }
    }
}

/// Application service for flagging accounts as NIPSA.
#[derive(Clone)]
pub struct NipsaService {
    user_directory: Arc<dyn UserDirectory>,
    nipsa_repository: Arc<dyn NipsaRepository>,
    default_authority: NonEmptyString,
}

impl NipsaService {
    /// Creates a new NIPSA service.
    #[must_use]
    pub fn new(
        user_directory: Arc<dyn UserDirectory>,
        nipsa_repository: Arc<dyn NipsaRepository>,
        default_authority: NonEmptyString,
    ) -> Self {
        Self {
            user_directory,
            nipsa_repository,
            default_authority,
        }
    }

    /// Returns the authority usernames are resolved in.
    #[must_use]
    pub fn default_authority(&self) -> &str {
        self.default_authority.as_str()
    }

    /// Lists the usernames of all flagged accounts, sorted.
    ///
    /// Identifiers the directory no longer knows are listed by the username
    /// they encode.
    pub async fn list(&self) -> AppResult<Vec<String>> {
        let mut usernames = BTreeSet::new();

        for userid in self.nipsa_repository.flagged_userids().await? {
            let username = match self.user_directory.find_by_userid(&userid).await? {
                Some(account) => account.username,
                None => userid.username().to_owned(),
            };
            usernames.insert(username);
        }

        Ok(usernames.into_iter().collect())
    }

    /// Flags the account with the given username.
    pub async fn add(&self, username: &str) -> Result<RedirectInstruction, NipsaError> {
        let userid = self.resolve(username).await?.userid();

        if !self.nipsa_repository.is_flagged(&userid).await? {
            self.nipsa_repository.flag(&userid).await?;
        }

        Ok(RedirectInstruction::to_index())
    }

    /// Unflags the account with the given username.
    pub async fn remove(&self, username: &str) -> Result<RedirectInstruction, NipsaError> {
        let userid = self.resolve(username).await?.userid();

        if self.nipsa_repository.is_flagged(&userid).await? {
            self.nipsa_repository.unflag(&userid).await?;
        }

        Ok(RedirectInstruction::to_index())
    }

    async fn resolve(&self, username: &str) -> Result<UserAccount, NipsaError> {
        let authority = self.default_authority.as_str();

        self.user_directory
            .find_by_username(username, authority)
            .await?
            .ok_or_else(|| {
                NipsaError::UserNotFound(UserNotFoundError {
                    username: username.to_owned(),
                    authority: authority.to_owned(),
                })
            })
    }
}
