use axum::extract::{Extension, Path, Request, State};
use axum::http::{HeaderValue, Method, header};
use axum::middleware::Next;
use axum::response::Response;
use tenantdesk_application::tenant_guard;
use tenantdesk_core::{AppError, OrganizationId, UserIdentity};
use tenantdesk_domain::Actor;
use tower_sessions::Session;
use tracing::warn;

use crate::auth::{SESSION_ABSOLUTE_TIMEOUT_SECONDS, SESSION_CREATED_AT_KEY, SESSION_USER_KEY};
use crate::error::ApiResult;
use crate::state::AppState;

/// Resolves the session identity into a fresh [`Actor`] for this request.
///
/// Both the identity and the actor are inserted as request extensions.
pub async fn require_auth(
    State(state): State<AppState>,
    session: Session,
    mut request: Request,
    next: Next,
) -> ApiResult<Response> {
    let identity = session
        .get::<UserIdentity>(SESSION_USER_KEY)
        .await
        .map_err(|error| AppError::Internal(format!("failed to read session identity: {error}")))?
        .ok_or_else(|| AppError::Unauthorized("authentication required".to_owned()))?;

    let created_at = session
        .get::<i64>(SESSION_CREATED_AT_KEY)
        .await
        .map_err(|error| {
            AppError::Internal(format!("failed to read session creation time: {error}"))
        })?
        .unwrap_or_default();
    if chrono::Utc::now().timestamp() - created_at > SESSION_ABSOLUTE_TIMEOUT_SECONDS {
        session
            .delete()
            .await
            .map_err(|error| AppError::Internal(format!("failed to delete session: {error}")))?;
        return Err(AppError::Unauthorized("session expired".to_owned()).into());
    }

    let actor = state
        .identity_service
        .load_actor(&identity)
        .await
        .inspect_err(|error| {
            warn!(user_id = %identity.user_id(), %error, "failed to load actor for session");
        })?;

    request.extensions_mut().insert(identity);
    request.extensions_mut().insert(actor);
    Ok(next.run(request).await)
}

/// Admits only actors whose scope covers the organization in the path.
pub async fn require_organization_scope(
    Extension(actor): Extension<Actor>,
    Path(organization_id): Path<i64>,
    request: Request,
    next: Next,
) -> ApiResult<Response> {
    tenant_guard::require_organization_access(
        Some(&actor),
        Some(OrganizationId::new(organization_id)),
    )?;

    Ok(next.run(request).await)
}

pub async fn require_same_origin_for_mutations(
    State(state): State<AppState>,
    request: Request,
    next: Next,
) -> ApiResult<Response> {
    if is_state_changing_method(request.method()) {
        let headers = request.headers();

        if let Some(fetch_site) = headers.get("sec-fetch-site") {
            if fetch_site == HeaderValue::from_static("cross-site") {
                return Err(AppError::Unauthorized("cross-site request blocked".to_owned()).into());
            }
        }

        let origin = headers
            .get(header::ORIGIN)
            .and_then(|value| value.to_str().ok())
            .unwrap_or_default();
        let referer = headers
            .get(header::REFERER)
            .and_then(|value| value.to_str().ok())
            .unwrap_or_default();

        let allowed_origin = state.frontend_url;
        let origin_is_allowed = origin == allowed_origin;
        let referer_is_allowed = referer.starts_with(&allowed_origin);

        if !origin_is_allowed && !referer_is_allowed {
            return Err(AppError::Unauthorized("origin validation failed".to_owned()).into());
        }
    }

    Ok(next.run(request).await)
}

fn is_state_changing_method(method: &Method) -> bool {
    matches!(
        *method,
        Method::POST | Method::PUT | Method::PATCH | Method::DELETE
    )
}
