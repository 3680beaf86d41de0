use axum::Json;
use axum::extract::State;
use axum::http::StatusCode;
use tenantdesk_core::{AppError, UserId, UserIdentity};
use tower_sessions::Session;
use tracing::{info, warn};

use crate::dto::BootstrapRequest;
use crate::error::ApiResult;
use crate::state::AppState;

use super::{SESSION_CREATED_AT_KEY, SESSION_USER_KEY};

/// Opens a session for a seeded user when the shared bootstrap token matches.
///
/// The actor is loaded once up front so that inactive users or broken tenant
/// links are refused before a session exists.
pub async fn bootstrap_handler(
    State(state): State<AppState>,
    session: Session,
    Json(payload): Json<BootstrapRequest>,
) -> ApiResult<StatusCode> {
    if payload.token != state.bootstrap_token {
        warn!(user_id = payload.user_id, "bootstrap attempt with invalid token");
        return Err(AppError::Unauthorized("invalid bootstrap token".to_owned()).into());
    }

    let user_id = UserId::new(payload.user_id);
    let probe = UserIdentity::new(user_id, String::new(), None);
    let actor = state.identity_service.load_actor(&probe).await?;
    let identity = UserIdentity::new(user_id, actor.display_name(), None);

    session
        .cycle_id()
        .await
        .map_err(|error| AppError::Internal(format!("failed to cycle session id: {error}")))?;

    session
        .insert(SESSION_USER_KEY, &identity)
        .await
        .map_err(|error| {
            AppError::Internal(format!("failed to persist session identity: {error}"))
        })?;

    session
        .insert(SESSION_CREATED_AT_KEY, chrono::Utc::now().timestamp())
        .await
        .map_err(|error| {
            AppError::Internal(format!("failed to persist session creation time: {error}"))
        })?;

    info!(user_id = %user_id, "bootstrap session opened");
    Ok(StatusCode::NO_CONTENT)
}
