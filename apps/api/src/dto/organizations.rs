use serde::{Deserialize, Serialize};
use tenantdesk_domain::Organization;
use ts_rs::TS;

/// API representation of an organization.
#[derive(Debug, Serialize, TS)]
#[ts(
    export,
    export_to = "../../../packages/api-types/src/generated/organization-response.ts"
)]
pub struct OrganizationResponse {
    pub id: i64,
    pub name: String,
    pub organization_type: String,
    pub is_active: bool,
    pub created_at: String,
}

impl From<Organization> for OrganizationResponse {
    fn from(value: Organization) -> Self {
        Self {
            id: value.id().as_i64(),
            name: value.name().as_str().to_owned(),
            organization_type: value.organization_type().as_str().to_owned(),
            is_active: value.is_active(),
            created_at: value.created_at().to_rfc3339(),
        }
    }
}

/// Incoming payload for client-company registration.
#[derive(Debug, Deserialize, TS)]
#[ts(
    export,
    export_to = "../../../packages/api-types/src/generated/create-organization-request.ts"
)]
pub struct CreateOrganizationRequest {
    pub name: String,
}

/// Incoming payload for organization activation changes.
#[derive(Debug, Deserialize, TS)]
#[ts(
    export,
    export_to = "../../../packages/api-types/src/generated/update-organization-status-request.ts"
)]
pub struct UpdateOrganizationStatusRequest {
    pub is_active: bool,
}
