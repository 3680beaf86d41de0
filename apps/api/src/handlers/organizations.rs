use tenantdesk_core::OrganizationId;

use crate::dto::{CreateOrganizationRequest, OrganizationResponse, UpdateOrganizationStatusRequest};

use super::*;

pub async fn list_organizations_handler(
    State(state): State<AppState>,
    Extension(actor): Extension<Actor>,
) -> ApiResult<Json<Vec<OrganizationResponse>>> {
    let organizations = state
        .organization_service
        .list_organizations(&actor)
        .await?
        .into_iter()
        .map(OrganizationResponse::from)
        .collect();

    Ok(Json(organizations))
}

pub async fn get_organization_handler(
    State(state): State<AppState>,
    Extension(actor): Extension<Actor>,
    Path(organization_id): Path<i64>,
) -> ApiResult<Json<OrganizationResponse>> {
    let organization = state
        .organization_service
        .get_organization(&actor, OrganizationId::new(organization_id))
        .await?;

    Ok(Json(OrganizationResponse::from(organization)))
}

pub async fn create_organization_handler(
    State(state): State<AppState>,
    Extension(actor): Extension<Actor>,
    Json(payload): Json<CreateOrganizationRequest>,
) -> ApiResult<(StatusCode, Json<OrganizationResponse>)> {
    let organization = state
        .organization_service
        .create_client_organization(&actor, payload.name.as_str())
        .await?;

    Ok((StatusCode::CREATED, Json(OrganizationResponse::from(organization))))
}

pub async fn update_organization_status_handler(
    State(state): State<AppState>,
    Extension(actor): Extension<Actor>,
    Path(organization_id): Path<i64>,
    Json(payload): Json<UpdateOrganizationStatusRequest>,
) -> ApiResult<Json<OrganizationResponse>> {
    let organization = state
        .organization_service
        .set_organization_active(&actor, OrganizationId::new(organization_id), payload.is_active)
        .await?;

    Ok(Json(OrganizationResponse::from(organization)))
}
