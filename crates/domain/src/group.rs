//! Group payload types and the create-group validation rules.
//!
//! A `groupid` is a compound identifier that only third-party authorities
//! may assign: `group:<authority_provided_id>@<authority>`. Groups owned by
//! the default authority ("first-party" groups) never carry one.

use std::fmt::{Display, Formatter};
use std::sync::LazyLock;

use margin_core::{AppError, AppResult, SourceLanguage, Translator};
use regex::Regex;
use serde_json::{Map, Value};
use thiserror::Error;

/// Minimum group name length in characters.
pub const GROUP_NAME_MIN_LENGTH: usize = 3;

/// Maximum group name length in characters.
pub const GROUP_NAME_MAX_LENGTH: usize = 25;

/// Maximum group description length in characters.
pub const GROUP_DESCRIPTION_MAX_LENGTH: usize = 250;

/// Pattern every `groupid` must match.
pub const GROUPID_PATTERN: &str = r"^group:([a-zA-Z0-9._\-+!~*()']{1,1024})@(.*)$";

// Catalog key, spelled as existing message catalogs spell it.
const AUTHORITY_POLICY_MSGID: &str =
    "groupid may only be set on groups oustide of the default authority";
const AUTHORITY_POLICY_MESSAGE: &str =
    "groupid may only be set on groups outside of the default authority";
const AUTHORITY_MISMATCH_MSGID: &str = "Invalid authority specified in groupid";

#[allow(clippy::expect_used)]
fn groupid_regex() -> &'static Regex {
    // Compiled from a constant; a failure here is a programming error.
    static REGEX: LazyLock<Regex> =
        LazyLock::new(|| Regex::new(GROUPID_PATTERN).expect("GROUPID_PATTERN must compile"));
    &REGEX
}

/// Third-party group identifier split into its two parts.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct GroupId {
    authority_provided_id: String,
    authority: String,
}

impl GroupId {
    /// Builds a groupid from its parts, checking the combined form.
    pub fn new(
        authority_provided_id: impl Into<String>,
        authority: impl Into<String>,
    ) -> AppResult<Self> {
        let authority_provided_id = authority_provided_id.into();
        let authority = authority.into();
        let groupid = Self::parse(&format!("group:{authority_provided_id}@{authority}"))?;

        if groupid.authority_provided_id != authority_provided_id {
            return Err(AppError::Validation(format!(
                "'{authority_provided_id}' is not a valid authority-provided id"
            )));
        }

        Ok(groupid)
    }

    /// Parses the textual `group:<id>@<authority>` form.
    pub fn parse(value: &str) -> AppResult<Self> {
        let captures = groupid_regex().captures(value).ok_or_else(|| {
            AppError::Validation(format!("'{value}' is not a valid groupid"))
        })?;

        let authority_provided_id = captures.get(1).map(|part| part.as_str());
        let authority = captures.get(2).map(|part| part.as_str());

        match (authority_provided_id, authority) {
            (Some(authority_provided_id), Some(authority)) => Ok(Self {
                authority_provided_id: authority_provided_id.to_owned(),
                authority: authority.to_owned(),
            }),
            _ => Err(AppError::Validation(format!(
                "'{value}' is not a valid groupid"
            ))),
        }
    }

    /// Returns the identifier assigned by the owning authority.
    #[must_use]
    pub fn authority_provided_id(&self) -> &str {
        self.authority_provided_id.as_str()
    }

    /// Returns the authority part.
    #[must_use]
    pub fn authority(&self) -> &str {
        self.authority.as_str()
    }
}

impl Display for GroupId {
    fn fmt(&self, formatter: &mut Formatter<'_>) -> std::fmt::Result {
        write!(
            formatter,
            "group:{}@{}",
            self.authority_provided_id, self.authority
        )
    }
}

/// Payload fields checked by the create-group validator.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum PayloadField {
    /// The payload as a whole.
    Payload,
    /// Group name.
    Name,
    /// Group description.
    Description,
    /// Third-party group identifier.
    Groupid,
}

impl PayloadField {
    /// Returns the JSON key for this field.
    #[must_use]
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Payload => "payload",
            Self::Name => "name",
            Self::Description => "description",
            Self::Groupid => "groupid",
        }
    }
}

impl Display for PayloadField {
    fn fmt(&self, formatter: &mut Formatter<'_>) -> std::fmt::Result {
        formatter.write_str(self.as_str())
    }
}

/// Structural constraint a payload field failed.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StructuralViolation {
    /// Payload is not a JSON object.
    NotAnObject,
    /// A required field is missing.
    Required,
    /// Field value is not a JSON string.
    NotAString,
    /// Field value is shorter than allowed.
    TooShort {
        /// Minimum length in characters.
        min: usize,
    },
    /// Field value is longer than allowed.
    TooLong {
        /// Maximum length in characters.
        max: usize,
    },
    /// Field value does not match its pattern.
    PatternMismatch,
}

impl StructuralViolation {
    fn msgid(&self) -> &'static str {
        match self {
            Self::NotAnObject => "must be an object",
            Self::Required => "is a required property",
            Self::NotAString => "must be a string",
            Self::TooShort { .. } => "must be at least {min} characters long",
            Self::TooLong { .. } => "must be at most {max} characters long",
            Self::PatternMismatch => "does not match the expected pattern",
        }
    }

    /// Renders the violation through a translator.
    #[must_use]
    pub fn describe(&self, translator: &dyn Translator) -> String {
        let template = translator.translate(self.msgid());
        match self {
            Self::TooShort { min } => template.replace("{min}", &min.to_string()),
            Self::TooLong { max } => template.replace("{max}", &max.to_string()),
            _ => template,
        }
    }
}

impl Display for StructuralViolation {
    fn fmt(&self, formatter: &mut Formatter<'_>) -> std::fmt::Result {
        formatter.write_str(&self.describe(&SourceLanguage))
    }
}

/// Failure raised while validating a create-group payload.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum GroupValidationError {
    /// A field broke a structural constraint.
    #[error("{field}: {violation}")]
    Structural {
        /// Offending field.
        field: PayloadField,
        /// Broken constraint.
        violation: StructuralViolation,
    },

    /// A groupid was supplied for a first-party (or unknown) authority.
    #[error(
        "{} '{}'",
        AUTHORITY_POLICY_MESSAGE,
        .default_authority.as_deref().unwrap_or_default()
    )]
    AuthorityPolicy {
        /// The service's default authority.
        default_authority: Option<String>,
    },

    /// The groupid names an authority other than the group's.
    #[error("{} '{}'", AUTHORITY_MISMATCH_MSGID, .groupid)]
    AuthorityMismatch {
        /// The rejected groupid.
        groupid: String,
    },
}

impl GroupValidationError {
    /// Renders the error message through a translator.
    #[must_use]
    pub fn localized(&self, translator: &dyn Translator) -> String {
        match self {
            Self::Structural { field, violation } => {
                format!("{field}: {}", violation.describe(translator))
            }
            Self::AuthorityPolicy { default_authority } => {
                let translated = translator.translate(AUTHORITY_POLICY_MSGID);
                let message = if translated == AUTHORITY_POLICY_MSGID {
                    AUTHORITY_POLICY_MESSAGE.to_owned()
                } else {
                    translated
                };
                format!(
                    "{message} '{}'",
                    default_authority.as_deref().unwrap_or_default()
                )
            }
            Self::AuthorityMismatch { groupid } => format!(
                "{} '{groupid}'",
                translator.translate(AUTHORITY_MISMATCH_MSGID)
            ),
        }
    }

    fn structural(field: PayloadField, violation: StructuralViolation) -> Self {
        Self::Structural { field, violation }
    }
}

impl From<GroupValidationError> for AppError {
    fn from(value: GroupValidationError) -> Self {
        Self::Validation(value.to_string())
    }
}

/// Normalized create-group payload.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CreateGroupPayload {
    name: String,
    description: Option<String>,
    groupid: Option<GroupId>,
}

impl CreateGroupPayload {
    /// Returns the group name.
    #[must_use]
    pub fn name(&self) -> &str {
        self.name.as_str()
    }

    /// Returns the description, if supplied.
    #[must_use]
    pub fn description(&self) -> Option<&str> {
        self.description.as_deref()
    }

    /// Returns the decomposed groupid, if supplied.
    #[must_use]
    pub fn groupid(&self) -> Option<&GroupId> {
        self.groupid.as_ref()
    }
}

/// Validates create-group payloads for one authority context.
///
/// `group_authority` is the authority the new group will belong to and
/// `default_authority` is the service's own. Both only matter when the
/// payload carries a `groupid`.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CreateGroupValidator {
    group_authority: Option<String>,
    default_authority: Option<String>,
}

impl CreateGroupValidator {
    /// Creates a validator for the given authority context.
    #[must_use]
    pub fn new(group_authority: Option<String>, default_authority: Option<String>) -> Self {
        Self {
            group_authority,
            default_authority,
        }
    }

    /// Validates the payload structure, then the groupid authority rules.
    pub fn validate(&self, payload: &Value) -> Result<CreateGroupPayload, GroupValidationError> {
        let payload = validate_structure(payload)?;
        if let Some(groupid) = payload.groupid() {
            self.validate_groupid(groupid)?;
        }

        Ok(payload)
    }

    fn validate_groupid(&self, groupid: &GroupId) -> Result<(), GroupValidationError> {
        let group_authority = match self.group_authority.as_deref() {
            Some(group_authority) if Some(group_authority) != self.default_authority.as_deref() => {
                group_authority
            }
            _ => {
                return Err(GroupValidationError::AuthorityPolicy {
                    default_authority: self.default_authority.clone(),
                });
            }
        };

        if groupid.authority() != group_authority {
            return Err(GroupValidationError::AuthorityMismatch {
                groupid: groupid.to_string(),
            });
        }

        Ok(())
    }
}

fn validate_structure(payload: &Value) -> Result<CreateGroupPayload, GroupValidationError> {
    let object = payload.as_object().ok_or_else(|| {
        GroupValidationError::structural(PayloadField::Payload, StructuralViolation::NotAnObject)
    })?;

    let name = string_field(object, PayloadField::Name)?.ok_or_else(|| {
        GroupValidationError::structural(PayloadField::Name, StructuralViolation::Required)
    })?;
    check_length(
        PayloadField::Name,
        name,
        Some(GROUP_NAME_MIN_LENGTH),
        GROUP_NAME_MAX_LENGTH,
    )?;

    let description = string_field(object, PayloadField::Description)?;
    if let Some(description) = description {
        check_length(
            PayloadField::Description,
            description,
            None,
            GROUP_DESCRIPTION_MAX_LENGTH,
        )?;
    }

    let groupid = string_field(object, PayloadField::Groupid)?
        .map(|value| {
            GroupId::parse(value).map_err(|_| {
                GroupValidationError::structural(
                    PayloadField::Groupid,
                    StructuralViolation::PatternMismatch,
                )
            })
        })
        .transpose()?;

    Ok(CreateGroupPayload {
        name: name.to_owned(),
        description: description.map(ToOwned::to_owned),
        groupid,
    })
}

fn string_field(
    object: &Map<String, Value>,
    field: PayloadField,
) -> Result<Option<&str>, GroupValidationError> {
    match object.get(field.as_str()) {
        None => Ok(None),
        Some(Value::String(value)) => Ok(Some(value.as_str())),
        Some(_) => Err(GroupValidationError::structural(
            field,
            StructuralViolation::NotAString,
        )),
    }
}

fn check_length(
    field: PayloadField,
    value: &str,
    min: Option<usize>,
    max: usize,
) -> Result<(), GroupValidationError> {
    let char_count = value.chars().count();

    if let Some(min) = min.filter(|min| char_count < *min) {
        return Err(GroupValidationError::structural(
            field,
            StructuralViolation::TooShort { min },
        ));
    }

    if char_count > max {
        return Err(GroupValidationError::structural(
            field,
            StructuralViolation::TooLong { max },
        ));
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use std::collections::HashMap;

    use margin_core::MessageCatalog;
    use proptest::prelude::*;
    use serde_json::json;

    use super::*;

    fn third_party_validator() -> CreateGroupValidator {
        CreateGroupValidator::new(
            Some("thirdparty.com".to_owned()),
            Some("hypothes.is".to_owned()),
        )
    }

    fn structural_field(result: Result<CreateGroupPayload, GroupValidationError>) -> PayloadField {
        match result {
            Err(GroupValidationError::Structural { field, .. }) => field,
            other => panic!("expected structural error, got {other:?}"),
        }
    }

    #[test]
    fn minimal_payload_is_accepted() {
        let result = CreateGroupValidator::default().validate(&json!({ "name": "Birdwatchers" }));

        let payload = result.unwrap_or_else(|error| panic!("unexpected error: {error}"));
        assert_eq!(payload.name(), "Birdwatchers");
        assert_eq!(payload.description(), None);
        assert_eq!(payload.groupid(), None);
    }

    #[test]
    fn unknown_keys_are_ignored() {
        let result = CreateGroupValidator::default()
            .validate(&json!({ "name": "Birdwatchers", "organization": "__default__" }));

        assert!(result.is_ok());
    }

    #[test]
    fn non_object_payload_is_rejected() {
        let result = CreateGroupValidator::default().validate(&json!(["name"]));

        assert_eq!(structural_field(result), PayloadField::Payload);
    }

    #[test]
    fn missing_name_is_rejected() {
        let result = CreateGroupValidator::default().validate(&json!({ "description": "x" }));

        assert!(matches!(
            result,
            Err(GroupValidationError::Structural {
                field: PayloadField::Name,
                violation: StructuralViolation::Required,
            })
        ));
    }

    #[test]
    fn name_length_bounds_are_inclusive() {
        let validator = CreateGroupValidator::default();

        assert!(validator.validate(&json!({ "name": "a".repeat(3) })).is_ok());
        assert!(validator.validate(&json!({ "name": "a".repeat(25) })).is_ok());
        assert!(matches!(
            validator.validate(&json!({ "name": "ab" })),
            Err(GroupValidationError::Structural {
                field: PayloadField::Name,
                violation: StructuralViolation::TooShort { min: 3 },
            })
        ));
        assert!(matches!(
            validator.validate(&json!({ "name": "a".repeat(26) })),
            Err(GroupValidationError::Structural {
                field: PayloadField::Name,
                violation: StructuralViolation::TooLong { max: 25 },
            })
        ));
    }

    #[test]
    fn name_length_counts_characters_not_bytes() {
        let result = CreateGroupValidator::default().validate(&json!({ "name": "ü".repeat(25) }));

        assert!(result.is_ok());
    }

    #[test]
    fn long_description_is_rejected() {
        let validator = CreateGroupValidator::default();

        assert!(
            validator
                .validate(&json!({ "name": "Birdwatchers", "description": "d".repeat(250) }))
                .is_ok()
        );
        assert_eq!(
            structural_field(
                validator.validate(&json!({ "name": "Birdwatchers", "description": "d".repeat(251) }))
            ),
            PayloadField::Description
        );
    }

    #[test]
    fn null_fields_are_not_strings() {
        let result = CreateGroupValidator::default()
            .validate(&json!({ "name": "Birdwatchers", "description": null }));

        assert!(matches!(
            result,
            Err(GroupValidationError::Structural {
                field: PayloadField::Description,
                violation: StructuralViolation::NotAString,
            })
        ));
    }

    #[test]
    fn malformed_groupid_is_rejected_before_authority_checks() {
        let result = third_party_validator()
            .validate(&json!({ "name": "Birdwatchers", "groupid": "nope@thirdparty.com" }));

        assert!(matches!(
            result,
            Err(GroupValidationError::Structural {
                field: PayloadField::Groupid,
                violation: StructuralViolation::PatternMismatch,
            })
        ));
    }

    #[test]
    fn groupid_with_trailing_newline_is_rejected() {
        let result = third_party_validator()
            .validate(&json!({ "name": "Birdwatchers", "groupid": "group:a@thirdparty.com\n" }));

        assert!(matches!(
            result,
            Err(GroupValidationError::Structural {
                field: PayloadField::Groupid,
                violation: StructuralViolation::PatternMismatch,
            })
        ));
    }

    #[test]
    fn groupid_is_accepted_for_matching_third_party_authority() {
        let result = third_party_validator().validate(
            &json!({ "name": "Birdwatchers", "groupid": "group:birds.01@thirdparty.com" }),
        );

        let payload = result.unwrap_or_else(|error| panic!("unexpected error: {error}"));
        let groupid = payload.groupid().unwrap_or_else(|| panic!("missing groupid"));
        assert_eq!(groupid.authority_provided_id(), "birds.01");
        assert_eq!(groupid.authority(), "thirdparty.com");
    }

    #[test]
    fn groupid_is_rejected_for_default_authority() {
        let validator = CreateGroupValidator::new(
            Some("hypothes.is".to_owned()),
            Some("hypothes.is".to_owned()),
        );

        let result =
            validator.validate(&json!({ "name": "Birdwatchers", "groupid": "group:birds@hypothes.is" }));

        assert_eq!(
            result,
            Err(GroupValidationError::AuthorityPolicy {
                default_authority: Some("hypothes.is".to_owned()),
            })
        );
    }

    #[test]
    fn groupid_is_rejected_without_group_authority() {
        let validator = CreateGroupValidator::new(None, Some("hypothes.is".to_owned()));

        let result =
            validator.validate(&json!({ "name": "Birdwatchers", "groupid": "group:birds@hypothes.is" }));

        assert!(matches!(
            result,
            Err(GroupValidationError::AuthorityPolicy { .. })
        ));
    }

    #[test]
    fn groupid_with_foreign_authority_is_rejected() {
        let result = third_party_validator()
            .validate(&json!({ "name": "Birdwatchers", "groupid": "group:birds@elsewhere.org" }));

        assert_eq!(
            result,
            Err(GroupValidationError::AuthorityMismatch {
                groupid: "group:birds@elsewhere.org".to_owned(),
            })
        );
    }

    #[test]
    fn error_messages_quote_their_detail() {
        let policy = GroupValidationError::AuthorityPolicy {
            default_authority: Some("hypothes.is".to_owned()),
        };
        let mismatch = GroupValidationError::AuthorityMismatch {
            groupid: "group:birds@elsewhere.org".to_owned(),
        };

        assert_eq!(
            policy.to_string(),
            "groupid may only be set on groups outside of the default authority 'hypothes.is'"
        );
        assert_eq!(
            mismatch.to_string(),
            "Invalid authority specified in groupid 'group:birds@elsewhere.org'"
        );
    }

    #[test]
    fn localized_messages_use_the_translator() {
        let catalog = MessageCatalog::new(HashMap::from([
            (
                "Invalid authority specified in groupid".to_owned(),
                "Ungültige Autorität in groupid".to_owned(),
            ),
            (
                "must be at most {max} characters long".to_owned(),
                "darf höchstens {max} Zeichen lang sein".to_owned(),
            ),
        ]));
        let mismatch = GroupValidationError::AuthorityMismatch {
            groupid: "group:birds@elsewhere.org".to_owned(),
        };
        let too_long = GroupValidationError::Structural {
            field: PayloadField::Name,
            violation: StructuralViolation::TooLong { max: 25 },
        };

        assert_eq!(
            mismatch.localized(&catalog),
            "Ungültige Autorität in groupid 'group:birds@elsewhere.org'"
        );
        assert_eq!(
            too_long.localized(&catalog),
            "name: darf höchstens 25 Zeichen lang sein"
        );
    }

    #[test]
    fn authority_policy_message_is_looked_up_under_catalog_msgid() {
        let policy = GroupValidationError::AuthorityPolicy {
            default_authority: Some("hypothes.is".to_owned()),
        };
        let catalog = MessageCatalog::new(HashMap::from([(
            "groupid may only be set on groups oustide of the default authority".to_owned(),
            "groupid ne peut être défini qu'en dehors de l'autorité par défaut".to_owned(),
        )]));

        assert_eq!(
            policy.localized(&catalog),
            "groupid ne peut être défini qu'en dehors de l'autorité par défaut 'hypothes.is'"
        );
        assert_eq!(
            policy.localized(&SourceLanguage),
            "groupid may only be set on groups outside of the default authority 'hypothes.is'"
        );
    }

    #[test]
    fn groupid_parts_round_trip_through_display() {
        let groupid = GroupId::new("birds", "thirdparty.com");

        assert_eq!(
            groupid.map(|groupid| groupid.to_string()).ok().as_deref(),
            Some("group:birds@thirdparty.com")
        );
        assert!(GroupId::new("", "thirdparty.com").is_err());
        assert!(GroupId::new("has@sign", "thirdparty.com").is_err());
    }

    fn authority() -> impl Strategy<Value = String> {
        "[a-z]{1,12}\\.(com|org|is)"
    }

    fn local_id() -> impl Strategy<Value = String> {
        "[a-zA-Z0-9._~*()'!+-]{1,32}"
    }

    fn group_name() -> impl Strategy<Value = String> {
        "[a-zA-Z ]{3,25}"
    }

    proptest! {
        #[test]
        fn groupid_for_first_party_groups_is_always_rejected(
            name in group_name(),
            id in local_id(),
            default_authority in authority(),
            groupid_authority in authority(),
            omit_group_authority in any::<bool>(),
        ) {
            let group_authority = if omit_group_authority {
                None
            } else {
                Some(default_authority.clone())
            };
            let validator = CreateGroupValidator::new(group_authority, Some(default_authority));
            let payload = json!({ "name": name, "groupid": format!("group:{id}@{groupid_authority}") });

            let result = validator.validate(&payload);

            let is_policy_error = matches!(result, Err(GroupValidationError::AuthorityPolicy { .. }));
            prop_assert!(is_policy_error);
        }

        #[test]
        fn groupid_with_other_authority_is_always_a_mismatch(
            name in group_name(),
            id in local_id(),
            group_authority in authority(),
            default_authority in authority(),
            groupid_authority in authority(),
        ) {
            prop_assume!(group_authority != default_authority);
            prop_assume!(groupid_authority != group_authority);
            let validator = CreateGroupValidator::new(Some(group_authority), Some(default_authority));
            let payload = json!({ "name": name, "groupid": format!("group:{id}@{groupid_authority}") });

            let result = validator.validate(&payload);

            let is_mismatch = matches!(result, Err(GroupValidationError::AuthorityMismatch { .. }));
            prop_assert!(is_mismatch);
        }

        #[test]
        fn payload_without_groupid_skips_authority_checks(
            name in group_name(),
            group_authority in proptest::option::of(authority()),
            default_authority in proptest::option::of(authority()),
        ) {
            let validator = CreateGroupValidator::new(group_authority, default_authority);

            let result = validator.validate(&json!({ "name": name }));

            prop_assert!(result.is_ok());
        }
    }
}
