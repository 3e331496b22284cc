//! Account identifiers.

use std::fmt::{Display, Formatter};

use margin_core::{AppError, AppResult};

/// Canonical account identifier, `acct:<username>@<authority>`.
///
/// Construction from parts is unchecked so that identifiers read back from
/// storage are representable even when they no longer resolve to an account.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct UserId {
    username: String,
    authority: String,
}

impl UserId {
    /// Creates a user identifier from a username and authority.
    #[must_use]
    pub fn new(username: impl Into<String>, authority: impl Into<String>) -> Self {
        Self {
            username: username.into(),
            authority: authority.into(),
        }
    }

    /// Parses the textual `acct:<username>@<authority>` form.
    ///
    /// The username must be non-empty and the first `@` separates it from
    /// the authority.
    pub fn parse(value: &str) -> AppResult<Self> {
        let invalid = || AppError::Validation(format!("'{value}' is not a valid userid"));

        let (username, authority) = value
            .strip_prefix("acct:")
            .and_then(|rest| rest.split_once('@'))
            .ok_or_else(invalid)?;

        if username.is_empty() {
            return Err(invalid());
        }

        Ok(Self::new(username, authority))
    }

    /// Returns the username part.
    #[must_use]
    pub fn username(&self) -> &str {
        self.username.as_str()
    }

    /// Returns the authority part.
    #[must_use]
    pub fn authority(&self) -> &str {
        self.authority.as_str()
    }
}

impl Display for UserId {
    fn fmt(&self, formatter: &mut Formatter<'_>) -> std::fmt::Result {
        write!(formatter, "acct:{}@{}", self.username, self.authority)
    }
}
