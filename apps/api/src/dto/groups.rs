use margin_application::GroupRecord;
use serde::Serialize;
use ts_rs::TS;

/// API representation of a group.
#[derive(Debug, Serialize, TS)]
#[ts(
    export,
    export_to = "group-response.ts"
)]
pub struct GroupResponse {
    pub id: String,
    pub name: String,
    pub description: Option<String>,
    pub authority: String,
    pub groupid: Option<String>,
    pub created: String,
}

impl From<GroupRecord> for GroupResponse {
    fn from(value: GroupRecord) -> Self {
        Self {
            id: value.pubid,
            name: value.name,
            description: value.description,
            authority: value.authority,
            groupid: value.groupid.map(|groupid| groupid.to_string()),
            created: value.created_at.to_rfc3339(),
        }
    }
}
