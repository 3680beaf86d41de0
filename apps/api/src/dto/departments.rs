use serde::{Deserialize, Serialize};
use tenantdesk_application::{CreateDepartmentInput, UpdateDepartmentInput};
use tenantdesk_core::{DepartmentId, OrganizationId, UserId};
use tenantdesk_domain::Department;
use tracing::warn;
use ts_rs::TS;

use super::common::present;

/// API representation of a department.
#[derive(Debug, Serialize, TS)]
#[ts(
    export,
    export_to = "../../../packages/api-types/src/generated/department-response.ts"
)]
pub struct DepartmentResponse {
    pub id: i64,
    pub organization_id: i64,
    pub name: String,
    pub parent_id: Option<i64>,
    pub manager_id: Option<i64>,
    pub is_active: bool,
    pub created_at: String,
    pub updated_at: String,
}

impl From<Department> for DepartmentResponse {
    fn from(value: Department) -> Self {
        Self {
            id: value.id().as_i64(),
            organization_id: value.organization_id().as_i64(),
            name: value.name().as_str().to_owned(),
            parent_id: value.parent_id().map(|id| id.as_i64()),
            manager_id: value.manager_id().map(|id| id.as_i64()),
            is_active: value.is_active(),
            created_at: value.created_at().to_rfc3339(),
            updated_at: value.updated_at().to_rfc3339(),
        }
    }
}

/// Query parameters for department listing.
#[derive(Debug, Default, Deserialize)]
pub struct DepartmentListQuery {
    pub organization_id: Option<i64>,
}

/// Incoming payload for department creation.
#[derive(Debug, Deserialize, TS)]
#[ts(
    export,
    export_to = "../../../packages/api-types/src/generated/create-department-request.ts"
)]
pub struct CreateDepartmentRequest {
    #[ts(optional)]
    pub organization_id: Option<i64>,
    pub name: String,
    #[ts(optional)]
    pub parent_id: Option<i64>,
    #[ts(optional)]
    pub manager_id: Option<i64>,
}

impl From<CreateDepartmentRequest> for CreateDepartmentInput {
    fn from(value: CreateDepartmentRequest) -> Self {
        Self {
            organization_id: value.organization_id.map(OrganizationId::new),
            name: value.name,
            parent_id: value.parent_id.map(DepartmentId::new),
            manager_id: value.manager_id.map(UserId::new),
        }
    }
}

/// Incoming payload for department updates.
///
/// `organization_id` is accepted only to be discarded: departments never move
/// between organizations.
#[derive(Debug, Default, Deserialize, TS)]
#[ts(
    export,
    export_to = "../../../packages/api-types/src/generated/update-department-request.ts"
)]
pub struct UpdateDepartmentRequest {
    #[ts(optional)]
    pub name: Option<String>,
    #[serde(default, deserialize_with = "present")]
    #[ts(type = "number | null")]
    pub parent_id: Option<Option<i64>>,
    #[serde(default, deserialize_with = "present")]
    #[ts(type = "number | null")]
    pub manager_id: Option<Option<i64>>,
    #[ts(optional)]
    pub is_active: Option<bool>,
    #[ts(skip)]
    pub organization_id: Option<i64>,
}

impl UpdateDepartmentRequest {
    /// Converts the payload, dropping any organization change.
    #[must_use]
    pub fn into_input(self, department_id: DepartmentId) -> UpdateDepartmentInput {
        if let Some(organization_id) = self.organization_id {
            warn!(
                department_id = %department_id,
                organization_id,
                "ignoring organization_id in department update"
            );
        }

        UpdateDepartmentInput {
            name: self.name,
            parent_id: self
                .parent_id
                .map(|parent| parent.map(DepartmentId::new)),
            manager_id: self.manager_id.map(|manager| manager.map(UserId::new)),
            is_active: self.is_active,
        }
    }
}
