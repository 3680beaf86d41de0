use axum::Json;
use axum::extract::Extension;
use axum::http::StatusCode;
use tenantdesk_core::{AppError, UserIdentity};
use tenantdesk_domain::Actor;
use tower_sessions::Session;
use tracing::info;

use crate::dto::ActorContextResponse;
use crate::error::ApiResult;

use super::SESSION_USER_KEY;

pub async fn logout_handler(session: Session) -> ApiResult<StatusCode> {
    let user_id = session
        .get::<UserIdentity>(SESSION_USER_KEY)
        .await
        .map_err(|error| AppError::Internal(format!("failed to read session identity: {error}")))?
        .map(|identity| identity.user_id());

    session
        .delete()
        .await
        .map_err(|error| AppError::Internal(format!("failed to delete session: {error}")))?;

    if let Some(user_id) = user_id {
        info!(user_id = %user_id, "session closed");
    }

    Ok(StatusCode::NO_CONTENT)
}

pub async fn me_handler(
    Extension(identity): Extension<UserIdentity>,
    Extension(actor): Extension<Actor>,
) -> Json<ActorContextResponse> {
    Json(ActorContextResponse::from_actor(&identity, &actor))
}
