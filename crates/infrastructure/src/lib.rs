//! Infrastructure adapters for application ports.

#![forbid(unsafe_code)]

mod in_memory_group_repository;
mod in_memory_nipsa_repository;
mod in_memory_user_directory;
mod json_message_catalog;
mod postgres_group_repository;
mod postgres_nipsa_repository;
mod postgres_user_directory;

pub use in_memory_group_repository::InMemoryGroupRepository;
pub use in_memory_nipsa_repository::InMemoryNipsaRepository;
pub use in_memory_user_directory::InMemoryUserDirectory;
pub use json_message_catalog::{load_message_catalog, parse_message_catalog};
pub use postgres_group_repository::PostgresGroupRepository;
pub use postgres_nipsa_repository::PostgresNipsaRepository;
pub use postgres_user_directory::PostgresUserDirectory;

/// Returns whether a username can possibly name an account.
///
/// Lookups short-circuit on empty usernames and control characters; the
/// database would otherwise reject some of them (NUL) as a driver error.
pub(crate) fn is_lookup_candidate(username: &str) -> bool {
    !username.is_empty() && !username.chars().any(char::is_control)
}
