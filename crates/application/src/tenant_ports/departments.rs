use async_trait::async_trait;
use chrono::{DateTime, Utc};
use tenantdesk_core::{AppResult, DepartmentId, NonEmptyString, OrganizationId, UserId};
use tenantdesk_domain::Department;

/// Values for a new department row.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewDepartment {
    /// Owning organization.
    pub organization_id: OrganizationId,
    /// Department name, unique within the organization.
    pub name: NonEmptyString,
    /// Optional parent in the same organization.
    pub parent_id: Option<DepartmentId>,
    /// Optional manager in the same organization.
    pub manager_id: Option<UserId>,
    /// Creation timestamp.
    pub created_at: DateTime<Utc>,
}

/// Port for department persistence.
#[async_trait]
pub trait DepartmentRepository: Send + Sync {
    /// Finds one department.
    async fn find_department(&self, department_id: DepartmentId)
    -> AppResult<Option<Department>>;

    /// Lists departments ordered by id, optionally restricted to one organization.
    async fn list_departments(
        &self,
        organization_id: Option<OrganizationId>,
    ) -> AppResult<Vec<Department>>;

    /// Creates a department.
    ///
    /// Returns [`tenantdesk_core::AppError::Conflict`] when the name is
    /// already used inside the organization.
    async fn create_department(&self, department: NewDepartment) -> AppResult<Department>;

    /// Persists changes to an existing department.
    ///
    /// Returns [`tenantdesk_core::AppError::Conflict`] when a rename collides
    /// with another department of the organization.
    async fn save_department(&self, department: Department) -> AppResult<()>;
}
