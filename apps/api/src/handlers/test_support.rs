use std::sync::Arc;

use margin_application::{GroupService, NipsaService, UserAccount};
use margin_core::{NonEmptyString, SourceLanguage};
use margin_domain::UserId;
use margin_infrastructure::{InMemoryGroupRepository, InMemoryNipsaRepository, InMemoryUserDirectory};

use crate::state::AppState;

pub const AUTHORITY: &str = "example.com";

pub fn account(username: &str) -> UserAccount {
    UserAccount {
        username: username.to_owned(),
        authority: AUTHORITY.to_owned(),
    }
}

/// State with carl, kiki, ursula and osono registered and all but carl flagged.
pub fn seeded_state() -> (AppState, Arc<InMemoryNipsaRepository>) {
    let nipsa_repository = Arc::new(InMemoryNipsaRepository::with_flagged(
        ["kiki", "ursula", "osono"]
            .into_iter()
            .map(|username| UserId::new(username, AUTHORITY)),
    ));
    let user_directory = Arc::new(InMemoryUserDirectory::with_accounts(
        ["carl", "kiki", "ursula", "osono"].into_iter().map(account),
    ));
    let default_authority = NonEmptyString::new(AUTHORITY).unwrap_or_else(|_| panic!("test"));

    let state = AppState {
        group_service: GroupService::new(
            Arc::new(InMemoryGroupRepository::new()),
            Arc::new(SourceLanguage),
            default_authority.clone(),
        ),
        nipsa_service: NipsaService::new(
            user_directory,
            nipsa_repository.clone(),
            default_authority,
        ),
    };

    (state, nipsa_repository)
}
