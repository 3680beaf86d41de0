use std::sync::Arc;

use tenantdesk_core::{AppError, AppResult, UserIdentity};
use tenantdesk_domain::{Actor, ActorAttributes, PermissionSet};

use crate::{DepartmentRepository, OrganizationRepository, UserRepository};

/// Builds the per-request [`Actor`] from an authenticated identity.
///
/// Any gap in the chain from user to organization and department fails
/// closed with [`AppError::Unauthorized`].
#[derive(Clone)]
pub struct IdentityService {
    user_repository: Arc<dyn UserRepository>,
    organization_repository: Arc<dyn OrganizationRepository>,
    department_repository: Arc<dyn DepartmentRepository>,
}

impl IdentityService {
    /// Creates the identity loader.
    #[must_use]
    pub fn new(
        user_repository: Arc<dyn UserRepository>,
        organization_repository: Arc<dyn OrganizationRepository>,
        department_repository: Arc<dyn DepartmentRepository>,
    ) -> Self {
        Self {
            user_repository,
            organization_repository,
            department_repository,
        }
    }

    /// Loads the identity context for one request.
    pub async fn load_actor(&self, identity: &UserIdentity) -> AppResult<Actor> {
        let user_id = identity.user_id();
        let account = self
            .user_repository
            .find_user(user_id)
            .await?
            .ok_or_else(|| unresolved(format!("user '{user_id}' does not exist")))?;

        if !account.is_active {
            return Err(unresolved(format!("user '{user_id}' is inactive")));
        }

        let organization = match account.organization_id {
            Some(organization_id) => Some(
                self.organization_repository
                    .find_organization(organization_id)
                    .await?
                    .ok_or_else(|| {
                        unresolved(format!(
                            "organization '{organization_id}' of user '{user_id}' does not exist"
                        ))
                    })?,
            ),
            None => None,
        };

        if let Some(organization) = &organization
            && !organization.is_active()
            && !account.is_super_user
        {
            return Err(unresolved(format!(
                "organization '{}' is deactivated",
                organization.id()
            )));
        }

        if let Some(department_id) = account.department_id {
            let department = self
                .department_repository
                .find_department(department_id)
                .await?;
            let consistent = department.is_some_and(|department| {
                Some(department.organization_id()) == account.organization_id
            });
            if !consistent {
                return Err(unresolved(format!(
                    "department '{department_id}' of user '{user_id}' does not belong to its organization"
                )));
            }
        }

        let permissions: PermissionSet = self
            .user_repository
            .list_permissions_for_user(user_id)
            .await?
            .into_iter()
            .collect();

        Ok(Actor::new(ActorAttributes {
            id: account.id,
            display_name: account.display_name,
            role: account.role,
            organization_id: account.organization_id,
            organization_type: organization.map(|value| value.organization_type()),
            department_id: account.department_id,
            is_super_user: account.is_super_user,
            can_cross_organizations: account.can_cross_organizations,
            can_cross_departments: account.can_cross_departments,
            permissions,
        }))
    }
}

fn unresolved(reason: String) -> AppError {
    AppError::Unauthorized(format!("identity could not be resolved: {reason}"))
}

#[cfg(test)]
mod tests;
