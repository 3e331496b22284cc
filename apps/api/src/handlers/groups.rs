use axum::Json;
use axum::extract::{Extension, Path, State};
use axum::http::StatusCode;
use serde_json::Value;
use tracing::info;

use crate::dto::GroupResponse;
use crate::error::ApiResult;
use crate::state::{AppState, ClientAuthority};

pub async fn create_group_handler(
    State(state): State<AppState>,
    client_authority: Option<Extension<ClientAuthority>>,
    Json(payload): Json<Value>,
) -> ApiResult<(StatusCode, Json<GroupResponse>)> {
    let client_authority = client_authority.map(|Extension(ClientAuthority(authority))| authority);

    let group = state
        .group_service
        .create_group(client_authority.as_deref(), &payload)
        .await?;

    info!(
        pubid = %group.pubid,
        authority = %group.authority,
        "group created"
    );

    Ok((StatusCode::CREATED, Json(GroupResponse::from(group))))
}

pub async fn get_group_handler(
    State(state): State<AppState>,
    Path(pubid): Path<String>,
) -> ApiResult<Json<GroupResponse>> {
    let group = state.group_service.get_group(pubid.as_str()).await?;

    Ok(Json(GroupResponse::from(group)))
}
