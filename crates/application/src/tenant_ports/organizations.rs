use async_trait::async_trait;
use tenantdesk_core::{AppResult, NonEmptyString, OrganizationId};
use tenantdesk_domain::{Organization, OrganizationType};

/// Values for a new organization row.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewOrganization {
    /// Display name.
    pub name: NonEmptyString,
    /// Tenant kind.
    pub organization_type: OrganizationType,
}

/// Port for organization persistence.
#[async_trait]
pub trait OrganizationRepository: Send + Sync {
    /// Finds one organization.
    async fn find_organization(
        &self,
        organization_id: OrganizationId,
    ) -> AppResult<Option<Organization>>;

    /// Lists every organization ordered by id.
    async fn list_organizations(&self) -> AppResult<Vec<Organization>>;

    /// Creates an organization.
    async fn create_organization(&self, organization: NewOrganization) -> AppResult<Organization>;

    /// Persists changes to an existing organization.
    async fn save_organization(&self, organization: Organization) -> AppResult<()>;
}
