use serde::{Deserialize, Serialize};
use ts_rs::TS;

/// Flagged accounts listing.
#[derive(Debug, Serialize, TS)]
#[ts(
    export,
    export_to = "nipsa-index-response.ts"
)]
pub struct NipsaIndexResponse {
    pub usernames: Vec<String>,
    pub default_authority: String,
}

/// Form payload flagging a username.
#[derive(Debug, Deserialize, TS)]
#[ts(
    export,
    export_to = "nipsa-add-request.ts"
)]
pub struct NipsaAddRequest {
    #[serde(default)]
    pub add: String,
}

/// Form payload unflagging a username.
#[derive(Debug, Deserialize, TS)]
#[ts(
    export,
    export_to = "nipsa-remove-request.ts"
)]
pub struct NipsaRemoveRequest {
    #[serde(default)]
    pub remove: String,
}
