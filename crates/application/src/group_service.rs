//! Group creation and retrieval.

use std::sync::Arc;

use serde_json::Value;

use margin_core::{AppError, AppResult, NonEmptyString, Translator};
use margin_domain::CreateGroupValidator;

use crate::{GroupRecord, GroupRepository, NewGroup};

/// Application service for groups created through the API.
#[derive(Clone)]
pub struct GroupService {
    group_repository: Arc<dyn GroupRepository>,
    translator: Arc<dyn Translator>,
    default_authority: NonEmptyString,
}

impl GroupService {
    /// Creates a new group service.
    #[must_use]
    pub fn new(
        group_repository: Arc<dyn GroupRepository>,
        translator: Arc<dyn Translator>,
        default_authority: NonEmptyString,
    ) -> Self {
        Self {
            group_repository,
            translator,
            default_authority,
        }
    }

    /// Validates a create-group payload and persists the group.
    ///
    /// `client_authority` is the authority of the calling client, if it has
    /// one; otherwise the group belongs to the default authority and may not
    /// carry a `groupid`.
    pub async fn create_group(
        &self,
        client_authority: Option<&str>,
        payload: &Value,
    ) -> AppResult<GroupRecord> {
        let group_authority = client_authority.unwrap_or(self.default_authority.as_str());
        let validator = CreateGroupValidator::new(
            Some(group_authority.to_owned()),
            Some(self.default_authority.as_str().to_owned()),
        );

        let payload = validator
            .validate(payload)
            .map_err(|error| AppError::Validation(error.localized(self.translator.as_ref())))?;

        if let Some(groupid) = payload.groupid()
            && self
                .group_repository
                .find_by_groupid(groupid)
                .await?
                .is_some()
        {
            return Err(AppError::Conflict(format!(
                "group with groupid '{groupid}' already exists"
            )));
        }

        self.group_repository
            .create(NewGroup {
                name: payload.name().to_owned(),
                description: payload.description().map(ToOwned::to_owned),
                authority: group_authority.to_owned(),
                groupid: payload.groupid().cloned(),
            })
            .await
    }

    /// Returns a group by its public identifier.
    pub async fn get_group(&self, pubid: &str) -> AppResult<GroupRecord> {
        self.group_repository
            .find_by_pubid(pubid)
            .await?
            .ok_or_else(|| AppError::NotFound(format!("group '{pubid}' does not exist")))
    }
}
