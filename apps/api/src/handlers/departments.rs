use tenantdesk_core::{DepartmentId, OrganizationId};

use crate::dto::{
    CreateDepartmentRequest, DepartmentListQuery, DepartmentResponse, UpdateDepartmentRequest,
};

use super::*;

pub async fn list_departments_handler(
    State(state): State<AppState>,
    Extension(actor): Extension<Actor>,
    Query(query): Query<DepartmentListQuery>,
) -> ApiResult<Json<Vec<DepartmentResponse>>> {
    let departments = state
        .department_service
        .list_departments(&actor, query.organization_id.map(OrganizationId::new))
        .await?
        .into_iter()
        .map(DepartmentResponse::from)
        .collect();

    Ok(Json(departments))
}

/// Departments of one organization; the path organization is checked by the
/// organization scope middleware before this runs.
pub async fn list_organization_departments_handler(
    State(state): State<AppState>,
    Extension(actor): Extension<Actor>,
    Path(organization_id): Path<i64>,
) -> ApiResult<Json<Vec<DepartmentResponse>>> {
    let departments = state
        .department_service
        .list_departments(&actor, Some(OrganizationId::new(organization_id)))
        .await?
        .into_iter()
        .map(DepartmentResponse::from)
        .collect();

    Ok(Json(departments))
}

pub async fn get_department_handler(
    State(state): State<AppState>,
    Extension(actor): Extension<Actor>,
    Path(department_id): Path<i64>,
) -> ApiResult<Json<DepartmentResponse>> {
    let department = state
        .department_service
        .get_department(&actor, DepartmentId::new(department_id))
        .await?;

    Ok(Json(DepartmentResponse::from(department)))
}

pub async fn create_department_handler(
    State(state): State<AppState>,
    Extension(actor): Extension<Actor>,
    Json(payload): Json<CreateDepartmentRequest>,
) -> ApiResult<(StatusCode, Json<DepartmentResponse>)> {
    let department = state
        .department_service
        .create_department(&actor, payload.into())
        .await?;

    Ok((StatusCode::CREATED, Json(DepartmentResponse::from(department))))
}

pub async fn update_department_handler(
    State(state): State<AppState>,
    Extension(actor): Extension<Actor>,
    Path(department_id): Path<i64>,
    Json(payload): Json<UpdateDepartmentRequest>,
) -> ApiResult<Json<DepartmentResponse>> {
    let department_id = DepartmentId::new(department_id);
    let department = state
        .department_service
        .update_department(&actor, department_id, payload.into_input(department_id))
        .await?;

    Ok(Json(DepartmentResponse::from(department)))
}
