//! Domain entities and invariants.

#![forbid(unsafe_code)]

mod group;
mod user;

pub use group::{
    CreateGroupPayload, CreateGroupValidator, GROUP_DESCRIPTION_MAX_LENGTH,
    GROUP_NAME_MAX_LENGTH, GROUP_NAME_MIN_LENGTH, GROUPID_PATTERN, GroupId, GroupValidationError,
    PayloadField, StructuralViolation,
};
pub use user::UserId;
