use std::sync::Arc;

use margin_application::{
    GroupRepository, GroupService, NipsaRepository, NipsaService, UserAccount, UserDirectory,
};
use margin_core::{AppError, SourceLanguage, Translator};
use margin_infrastructure::{
    InMemoryGroupRepository, InMemoryNipsaRepository, InMemoryUserDirectory,
    PostgresGroupRepository, PostgresNipsaRepository, PostgresUserDirectory,
    load_message_catalog,
};
use tracing::info;

use crate::api_config::{ApiConfig, StorageBackendConfig};
use crate::state::AppState;

use super::database::connect_and_migrate;

struct RepositorySet {
    user_directory: Arc<dyn UserDirectory>,
    nipsa_repository: Arc<dyn NipsaRepository>,
    group_repository: Arc<dyn GroupRepository>,
}

pub async fn build_app_state(config: &ApiConfig) -> Result<AppState, AppError> {
    let translator = build_translator(config).await?;
    let repositories = build_repository_set(config).await?;

    Ok(AppState {
        group_service: GroupService::new(
            repositories.group_repository,
            translator,
            config.default_authority.clone(),
        ),
        nipsa_service: NipsaService::new(
            repositories.user_directory,
            repositories.nipsa_repository,
            config.default_authority.clone(),
        ),
    })
}

async fn build_translator(config: &ApiConfig) -> Result<Arc<dyn Translator>, AppError> {
    match config.message_catalog_path.as_deref() {
        Some(path) => Ok(Arc::new(load_message_catalog(path).await?)),
        None => Ok(Arc::new(SourceLanguage)),
    }
}

async fn build_repository_set(config: &ApiConfig) -> Result<RepositorySet, AppError> {
    match &config.storage_backend {
        StorageBackendConfig::Memory { seed_usernames } => {
            let authority = config.default_authority.as_str();
            let user_directory = InMemoryUserDirectory::with_accounts(seed_usernames.iter().map(
                |username| UserAccount {
                    username: username.clone(),
                    authority: authority.to_owned(),
                },
            ));

            info!(
                seeded_users = seed_usernames.len(),
                "using in-memory storage backend"
            );

            Ok(RepositorySet {
                user_directory: Arc::new(user_directory),
                nipsa_repository: Arc::new(InMemoryNipsaRepository::new()),
                group_repository: Arc::new(InMemoryGroupRepository::new()),
            })
        }
        StorageBackendConfig::Postgres { database_url } => {
            let pool = connect_and_migrate(database_url).await?;

            info!("using postgres storage backend");

            Ok(RepositorySet {
                user_directory: Arc::new(PostgresUserDirectory::new(pool.clone())),
                nipsa_repository: Arc::new(PostgresNipsaRepository::new(pool.clone())),
                group_repository: Arc::new(PostgresGroupRepository::new(pool)),
            })
        }
    }
}
