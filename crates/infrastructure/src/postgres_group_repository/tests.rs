use margin_application::{GroupRepository, NewGroup};
use margin_core::AppError;
use margin_domain::GroupId;
use sqlx::PgPool;
use sqlx::migrate::Migrator;
use sqlx::postgres::PgPoolOptions;
use uuid::Uuid;

use super::PostgresGroupRepository;

static MIGRATOR: Migrator = sqlx::migrate!("./migrations");

async fn test_pool() -> Option<PgPool> {
    let Ok(database_url) = std::env::var("DATABASE_URL") else {
        return None;
    };

    let pool = match PgPoolOptions::new()
        .max_connections(2)
        .connect(database_url.as_str())
        .await
    {
        Ok(pool) => pool,
        Err(error) => panic!("failed to connect to DATABASE_URL in test: {error}"),
    };

    if let Err(error) = MIGRATOR.run(&pool).await {
        panic!("failed to run migrations for postgres group tests: {error}");
    }

    Some(pool)
}

fn third_party_group(authority: &str) -> NewGroup {
    NewGroup {
        name: "Birdwatchers".to_owned(),
        description: Some("Birds!".to_owned()),
        authority: authority.to_owned(),
        groupid: GroupId::new("birds", authority).ok(),
    }
}

#[tokio::test]
async fn created_group_round_trips_through_lookups() {
    let Some(pool) = test_pool().await else {
        return;
    };

    let repository = PostgresGroupRepository::new(pool);
    let authority = format!("{}.thirdparty.com", Uuid::new_v4().simple());
    let new_group = third_party_group(authority.as_str());
    let groupid = new_group
        .groupid
        .clone()
        .unwrap_or_else(|| panic!("test groupid must be valid"));

    let created = repository
        .create(new_group)
        .await
        .unwrap_or_else(|error| panic!("unexpected error: {error}"));

    assert_eq!(created.name, "Birdwatchers");
    assert_eq!(created.description.as_deref(), Some("Birds!"));
    assert_eq!(created.authority, authority);
    assert_eq!(created.groupid.as_ref(), Some(&groupid));

    let by_pubid = repository.find_by_pubid(created.pubid.as_str()).await;
    let by_groupid = repository.find_by_groupid(&groupid).await;

    assert_eq!(by_pubid.ok().flatten(), Some(created.clone()));
    assert_eq!(by_groupid.ok().flatten(), Some(created));
}

#[tokio::test]
async fn duplicate_groupid_is_a_conflict() {
    let Some(pool) = test_pool().await else {
        return;
    };

    let repository = PostgresGroupRepository::new(pool);
    let authority = format!("{}.thirdparty.com", Uuid::new_v4().simple());

    let first = repository
        .create(third_party_group(authority.as_str()))
        .await;
    let second = repository
        .create(third_party_group(authority.as_str()))
        .await;

    assert!(first.is_ok());
    assert!(matches!(
        second,
        Err(AppError::Conflict(message)) if message.contains(authority.as_str())
    ));
}

#[tokio::test]
async fn groups_without_groupid_do_not_conflict() {
    let Some(pool) = test_pool().await else {
        return;
    };

    let repository = PostgresGroupRepository::new(pool);
    let new_group = || NewGroup {
        name: "Birdwatchers".to_owned(),
        description: None,
        authority: "example.com".to_owned(),
        groupid: None,
    };

    let first = repository.create(new_group()).await;
    let second = repository.create(new_group()).await;

    assert!(first.is_ok());
    assert!(second.is_ok());
    assert!(matches!(
        repository.find_by_pubid("missing").await,
        Ok(None)
    ));
}
