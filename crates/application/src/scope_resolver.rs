//! Tenant scope enumeration and membership.
//!
//! Each question has an enumeration form and a membership form. For the same
//! actor, filter and stored data the two always agree: an id is returned by
//! the enumeration exactly when the membership check accepts it.

use std::collections::BTreeSet;
use std::sync::Arc;

use tenantdesk_core::{AppResult, DepartmentId, OrganizationId};
use tenantdesk_domain::{Actor, Department, EffectiveScope, Organization};

use crate::{DepartmentRepository, OrganizationRepository};

/// Resolves which organizations and departments an actor may reach.
#[derive(Clone)]
pub struct ScopeResolver {
    organization_repository: Arc<dyn OrganizationRepository>,
    department_repository: Arc<dyn DepartmentRepository>,
}

/// Department reach after applying an optional organization filter.
enum DepartmentReach {
    Nothing,
    Organizations(Option<OrganizationId>),
    Single(DepartmentId),
}

impl ScopeResolver {
    /// Creates a resolver over the tenant repositories.
    #[must_use]
    pub fn new(
        organization_repository: Arc<dyn OrganizationRepository>,
        department_repository: Arc<dyn DepartmentRepository>,
    ) -> Self {
        Self {
            organization_repository,
            department_repository,
        }
    }

    /// Enumerates organization ids the actor may access.
    pub async fn accessible_organization_ids(
        &self,
        actor: &Actor,
    ) -> AppResult<BTreeSet<OrganizationId>> {
        if actor.scope().is_global() {
            return Ok(self
                .organization_repository
                .list_organizations()
                .await?
                .iter()
                .map(Organization::id)
                .collect());
        }

        Ok(actor.scope().own_organization().into_iter().collect())
    }

    /// Lists organizations the actor may access.
    pub async fn accessible_organizations(&self, actor: &Actor) -> AppResult<Vec<Organization>> {
        if actor.scope().is_global() {
            return self.organization_repository.list_organizations().await;
        }

        match actor.scope().own_organization() {
            Some(organization_id) => Ok(self
                .organization_repository
                .find_organization(organization_id)
                .await?
                .into_iter()
                .collect()),
            None => Ok(Vec::new()),
        }
    }

    /// Returns whether the actor may access the organization.
    pub async fn can_access_organization(
        &self,
        actor: &Actor,
        organization_id: OrganizationId,
    ) -> AppResult<bool> {
        if actor.scope().is_global() {
            return Ok(self
                .organization_repository
                .find_organization(organization_id)
                .await?
                .is_some());
        }

        Ok(actor.scope().own_organization() == Some(organization_id))
    }

    /// Enumerates department ids the actor may access, optionally narrowed to
    /// one organization.
    pub async fn accessible_department_ids(
        &self,
        actor: &Actor,
        organization_filter: Option<OrganizationId>,
    ) -> AppResult<BTreeSet<DepartmentId>> {
        match self.department_reach(actor, organization_filter).await? {
            DepartmentReach::Nothing => Ok(BTreeSet::new()),
            DepartmentReach::Single(department_id) => Ok(BTreeSet::from([department_id])),
            DepartmentReach::Organizations(organization_id) => Ok(self
                .department_repository
                .list_departments(organization_id)
                .await?
                .iter()
                .map(Department::id)
                .collect()),
        }
    }

    /// Lists departments the actor may access, optionally narrowed to one
    /// organization.
    pub async fn accessible_departments(
        &self,
        actor: &Actor,
        organization_filter: Option<OrganizationId>,
    ) -> AppResult<Vec<Department>> {
        match self.department_reach(actor, organization_filter).await? {
            DepartmentReach::Nothing => Ok(Vec::new()),
            DepartmentReach::Single(department_id) => Ok(self
                .department_repository
                .find_department(department_id)
                .await?
                .into_iter()
                .collect()),
            DepartmentReach::Organizations(organization_id) => {
                self.department_repository
                    .list_departments(organization_id)
                    .await
            }
        }
    }

    /// Returns whether the actor may access the department, optionally
    /// requiring it to belong to one organization.
    pub async fn can_access_department(
        &self,
        actor: &Actor,
        department_id: DepartmentId,
        organization_filter: Option<OrganizationId>,
    ) -> AppResult<bool> {
        match self.department_reach(actor, organization_filter).await? {
            DepartmentReach::Nothing => Ok(false),
            DepartmentReach::Single(own) => Ok(own == department_id),
            DepartmentReach::Organizations(organization_id) => Ok(self
                .department_repository
                .find_department(department_id)
                .await?
                .is_some_and(|department| {
                    organization_id.is_none_or(|value| value == department.organization_id())
                })),
        }
    }

    /// Collapses scope and filter into the set of departments reachable.
    async fn department_reach(
        &self,
        actor: &Actor,
        organization_filter: Option<OrganizationId>,
    ) -> AppResult<DepartmentReach> {
        let own_department = match actor.scope() {
            EffectiveScope::Global => {
                return Ok(DepartmentReach::Organizations(organization_filter));
            }
            EffectiveScope::CrossDepartments {
                organization_id: Some(own),
                ..
            } => {
                if organization_filter.is_some_and(|filter| filter != own) {
                    return Ok(DepartmentReach::Nothing);
                }
                return Ok(DepartmentReach::Organizations(Some(own)));
            }
            EffectiveScope::CrossDepartments {
                organization_id: None,
                department_id: Some(own),
            }
            | EffectiveScope::Department {
                department_id: own, ..
            } => own,
            EffectiveScope::CrossDepartments {
                organization_id: None,
                department_id: None,
            }
            | EffectiveScope::Organization(_)
            | EffectiveScope::None => return Ok(DepartmentReach::Nothing),
        };

        let Some(filter) = organization_filter else {
            return Ok(DepartmentReach::Single(own_department));
        };

        let in_filter = self
            .department_repository
            .find_department(own_department)
            .await?
            .is_some_and(|department| department.organization_id() == filter);

        Ok(if in_filter {
            DepartmentReach::Single(own_department)
        } else {
            DepartmentReach::Nothing
        })
    }
}

#[cfg(test)]
mod tests;
