use std::env;
use std::net::{IpAddr, SocketAddr};
use std::path::PathBuf;
use std::str::FromStr;

use margin_core::{AppError, NonEmptyString};
use tracing_subscriber::EnvFilter;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum StorageBackendConfig {
    Memory { seed_usernames: Vec<String> },
    Postgres { database_url: String },
}

#[derive(Debug, Clone)]
pub struct ApiConfig {
    pub migrate_only: bool,
    pub api_host: String,
    pub api_port: u16,
    pub default_authority: NonEmptyString,
    pub storage_backend: StorageBackendConfig,
    pub message_catalog_path: Option<PathBuf>,
}

impl ApiConfig {
    pub fn load() -> Result<Self, AppError> {
        let migrate_only = env::args().nth(1).as_deref() == Some("migrate");

        let api_host = env::var("API_HOST").unwrap_or_else(|_| "127.0.0.1".to_owned());
        let api_port = env::var("API_PORT")
            .ok()
            .and_then(|value| value.parse::<u16>().ok())
            .unwrap_or(3001);

        let default_authority = NonEmptyString::new(
            env::var("DEFAULT_AUTHORITY").unwrap_or_else(|_| "localhost".to_owned()),
        )
        .map_err(|_| AppError::Validation("DEFAULT_AUTHORITY must not be empty".to_owned()))?;

        let storage_backend = match env::var("STORAGE_BACKEND")
            .unwrap_or_else(|_| "memory".to_owned())
            .as_str()
        {
            "memory" => StorageBackendConfig::Memory {
                seed_usernames: parse_username_list(
                    env::var("DEV_SEED_USERNAMES").unwrap_or_default().as_str(),
                ),
            },
            "postgres" => StorageBackendConfig::Postgres {
                database_url: required_non_empty_env("DATABASE_URL")?,
            },
            other => {
                return Err(AppError::Validation(format!(
                    "STORAGE_BACKEND must be either 'memory' or 'postgres', got '{other}'"
                )));
            }
        };

        if migrate_only && !matches!(storage_backend, StorageBackendConfig::Postgres { .. }) {
            return Err(AppError::Validation(
                "the migrate command requires STORAGE_BACKEND=postgres".to_owned(),
            ));
        }

        let message_catalog_path = env::var("MESSAGE_CATALOG_PATH")
            .ok()
            .filter(|value| !value.trim().is_empty())
            .map(PathBuf::from);

        Ok(Self {
            migrate_only,
            api_host,
            api_port,
            default_authority,
            storage_backend,
            message_catalog_path,
        })
    }

    pub fn socket_address(&self) -> Result<SocketAddr, AppError> {
        let host = IpAddr::from_str(&self.api_host).map_err(|error| {
            AppError::Internal(format!("invalid API_HOST '{}': {error}", self.api_host))
        })?;
        Ok(SocketAddr::from((host, self.api_port)))
    }
}

pub fn init_tracing() {
    let env_filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));

    tracing_subscriber::fmt()
        .with_env_filter(env_filter)
        .with_target(false)
        .compact()
        .init();
}

fn parse_username_list(value: &str) -> Vec<String> {
    value
        .split(',')
        .map(str::trim)
        .filter(|username| !username.is_empty())
        .map(ToOwned::to_owned)
        .collect()
}

fn required_env(name: &str) -> Result<String, AppError> {
    env::var(name).map_err(|_| AppError::Validation(format!("{name} is required")))
}

fn required_non_empty_env(name: &str) -> Result<String, AppError> {
    let value = required_env(name)?;
    if value.trim().is_empty() {
        return Err(AppError::Validation(format!("{name} must not be empty")));
    }

    Ok(value)
}

#[cfg(test)]
mod tests {
    use super::parse_username_list;

    #[test]
    fn username_list_skips_blank_entries() {
        assert_eq!(
            parse_username_list(" carl, kiki,,ursula ,"),
            vec!["carl".to_owned(), "kiki".to_owned(), "ursula".to_owned()]
        );
        assert!(parse_username_list("").is_empty());
    }
}
