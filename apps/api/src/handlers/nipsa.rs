use axum::Json;
use axum::extract::{Form, State};
use axum::response::Redirect;
use margin_application::{NipsaError, RedirectInstruction};
use tracing::{info, warn};

use crate::dto::{NipsaAddRequest, NipsaIndexResponse, NipsaRemoveRequest};
use crate::error::ApiResult;
use crate::state::AppState;

pub async fn nipsa_index_handler(
    State(state): State<AppState>,
) -> ApiResult<Json<NipsaIndexResponse>> {
    let usernames = state.nipsa_service.list().await?;

    Ok(Json(NipsaIndexResponse {
        usernames,
        default_authority: state.nipsa_service.default_authority().to_owned(),
    }))
}

pub async fn nipsa_add_handler(
    State(state): State<AppState>,
    Form(payload): Form<NipsaAddRequest>,
) -> ApiResult<Redirect> {
    let result = state.nipsa_service.add(payload.add.as_str()).await;
    let redirect = log_outcome("flag", payload.add.as_str(), result)?;

    Ok(Redirect::to(redirect.location()))
}

pub async fn nipsa_remove_handler(
    State(state): State<AppState>,
    Form(payload): Form<NipsaRemoveRequest>,
) -> ApiResult<Redirect> {
    let result = state.nipsa_service.remove(payload.remove.as_str()).await;
    let redirect = log_outcome("unflag", payload.remove.as_str(), result)?;

    Ok(Redirect::to(redirect.location()))
}

fn log_outcome(
    action: &str,
    username: &str,
    result: Result<RedirectInstruction, NipsaError>,
) -> Result<RedirectInstruction, NipsaError> {
    match &result {
        Ok(_) => info!(action, username = %username.escape_debug(), "nipsa flag updated"),
        Err(NipsaError::UserNotFound(error)) => {
            warn!(action, error = %error, "nipsa target not found");
        }
        Err(NipsaError::Repository(error)) => {
            warn!(action, error = %error, "nipsa registry update failed");
        }
    }

    result
}
