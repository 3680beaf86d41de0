use std::collections::BTreeSet;
use std::sync::Arc;

use chrono::Utc;
use tenantdesk_core::{AppError, AppResult, DepartmentId, NonEmptyString, OrganizationId, UserId};
use tenantdesk_domain::{Action, Actor, AuditAction, Department, Resource};

use crate::ScopeResolver;
use crate::permission_resolver::has_permission;
use crate::tenant_ports::{
    AuditEvent, AuditRepository, DepartmentRepository, NewDepartment, OrganizationRepository,
    UserRepository, append_committed_event,
};

/// Upper bound on parent hops walked while checking for cycles.
const MAX_DEPARTMENT_DEPTH: usize = 64;

/// Input payload for department creation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CreateDepartmentInput {
    /// Target organization, the actor's own when absent.
    pub organization_id: Option<OrganizationId>,
    /// Department name.
    pub name: String,
    /// Optional parent in the same organization.
    pub parent_id: Option<DepartmentId>,
    /// Optional manager in the same organization.
    pub manager_id: Option<UserId>,
}

/// Partial department update; `None` leaves a field untouched.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct UpdateDepartmentInput {
    /// New name.
    pub name: Option<String>,
    /// New parent; `Some(None)` detaches it.
    pub parent_id: Option<Option<DepartmentId>>,
    /// New manager; `Some(None)` clears it.
    pub manager_id: Option<Option<UserId>>,
    /// Activation flag.
    pub is_active: Option<bool>,
}

/// Application service for the department lifecycle.
#[derive(Clone)]
pub struct DepartmentService {
    department_repository: Arc<dyn DepartmentRepository>,
    organization_repository: Arc<dyn OrganizationRepository>,
    user_repository: Arc<dyn UserRepository>,
    audit_repository: Arc<dyn AuditRepository>,
    scope_resolver: ScopeResolver,
}

impl DepartmentService {
    /// Creates the department service.
    #[must_use]
    pub fn new(
        department_repository: Arc<dyn DepartmentRepository>,
        organization_repository: Arc<dyn OrganizationRepository>,
        user_repository: Arc<dyn UserRepository>,
        audit_repository: Arc<dyn AuditRepository>,
        scope_resolver: ScopeResolver,
    ) -> Self {
        Self {
            department_repository,
            organization_repository,
            user_repository,
            audit_repository,
            scope_resolver,
        }
    }

    /// Lists departments in the actor's scope, optionally for one organization.
    pub async fn list_departments(
        &self,
        actor: &Actor,
        organization_filter: Option<OrganizationId>,
    ) -> AppResult<Vec<Department>> {
        self.scope_resolver
            .accessible_departments(actor, organization_filter)
            .await
    }

    /// Returns one department in the actor's scope.
    pub async fn get_department(
        &self,
        actor: &Actor,
        department_id: DepartmentId,
    ) -> AppResult<Department> {
        let missing = || AppError::NotFound(format!("department '{department_id}' not found"));

        if !self
            .scope_resolver
            .can_access_department(actor, department_id, None)
            .await?
        {
            return Err(missing());
        }

        self.department_repository
            .find_department(department_id)
            .await?
            .ok_or_else(missing)
    }

    /// Creates a department.
    ///
    /// Global actors may create anywhere. Others are limited to their own
    /// organization and need `departments:create` or an organization-admin role.
    pub async fn create_department(
        &self,
        actor: &Actor,
        input: CreateDepartmentInput,
    ) -> AppResult<Department> {
        let organization_id = input
            .organization_id
            .or(actor.organization_id())
            .ok_or_else(|| {
                AppError::Validation("an organization is required for a department".to_owned())
            })?;

        self.authorize_change(actor, organization_id, Action::Create, "create")?;

        if self
            .organization_repository
            .find_organization(organization_id)
            .await?
            .is_none()
        {
            return Err(AppError::Validation(format!(
                "organization '{organization_id}' does not exist"
            )));
        }

        if let Some(parent_id) = input.parent_id {
            self.require_department_in(parent_id, organization_id)
                .await?;
        }
        if let Some(manager_id) = input.manager_id {
            self.require_manager_in(manager_id, organization_id).await?;
        }

        let department = self
            .department_repository
            .create_department(NewDepartment {
                organization_id,
                name: NonEmptyString::new(input.name)?,
                parent_id: input.parent_id,
                manager_id: input.manager_id,
                created_at: Utc::now(),
            })
            .await?;

        self.append_department_event(actor, &department, AuditAction::DepartmentCreated)
            .await;

        Ok(department)
    }

    /// Applies a partial update to a department.
    ///
    /// Organization admins may update any department of their organization;
    /// departments outside the actor's reach are reported missing.
    pub async fn update_department(
        &self,
        actor: &Actor,
        department_id: DepartmentId,
        input: UpdateDepartmentInput,
    ) -> AppResult<Department> {
        let mut department = self.find_for_change(actor, department_id).await?;
        let organization_id = department.organization_id();

        self.authorize_change(actor, organization_id, Action::Update, "update")?;

        if let Some(name) = input.name {
            department.rename(name)?;
        }

        if let Some(parent_id) = input.parent_id {
            match parent_id {
                Some(parent_id) => {
                    let parent = self
                        .require_department_in(parent_id, organization_id)
                        .await?;
                    self.reject_cycle(department_id, &parent).await?;
                    department.set_parent(Some(&parent))?;
                }
                None => department.set_parent(None)?,
            }
        }

        if let Some(manager_id) = input.manager_id {
            if let Some(manager_id) = manager_id {
                self.require_manager_in(manager_id, organization_id).await?;
            }
            department.set_manager(manager_id);
        }

        if let Some(is_active) = input.is_active {
            department.set_active(is_active);
        }

        department.touch(Utc::now());
        self.department_repository
            .save_department(department.clone())
            .await?;
        self.append_department_event(actor, &department, AuditAction::DepartmentUpdated)
            .await;

        Ok(department)
    }

    /// Loads a department for update.
    ///
    /// Organization admins and `departments:update` holders reach every
    /// department of their own organization, whatever their department scope.
    /// Anything else falls back to scope visibility.
    async fn find_for_change(
        &self,
        actor: &Actor,
        department_id: DepartmentId,
    ) -> AppResult<Department> {
        let administers = |department: &Department| {
            actor.organization_id() == Some(department.organization_id())
                && (actor.role().manages_organization()
                    || has_permission(actor, Resource::Departments, Action::Update))
        };

        match self.department_repository.find_department(department_id).await? {
            Some(department) if administers(&department) => Ok(department),
            _ => self.get_department(actor, department_id).await,
        }
    }

    fn authorize_change(
        &self,
        actor: &Actor,
        organization_id: OrganizationId,
        action: Action,
        verb: &str,
    ) -> AppResult<()> {
        if actor.scope().is_global() {
            return Ok(());
        }

        if actor.organization_id() != Some(organization_id) {
            return Err(AppError::ScopeDenied(format!(
                "cannot {verb} department for different organization '{organization_id}'"
            )));
        }

        if has_permission(actor, Resource::Departments, action) || actor.role().manages_organization()
        {
            return Ok(());
        }

        Err(AppError::Forbidden(format!(
            "user '{}' may not {verb} departments without permission 'departments:{}'",
            actor.id(),
            action.as_str()
        )))
    }

    async fn require_department_in(
        &self,
        department_id: DepartmentId,
        organization_id: OrganizationId,
    ) -> AppResult<Department> {
        self.department_repository
            .find_department(department_id)
            .await?
            .filter(|department| department.organization_id() == organization_id)
            .ok_or_else(|| {
                AppError::Validation(format!(
                    "parent department '{department_id}' does not exist in organization '{organization_id}'"
                ))
            })
    }

    async fn require_manager_in(
        &self,
        manager_id: UserId,
        organization_id: OrganizationId,
    ) -> AppResult<()> {
        let belongs = self
            .user_repository
            .find_user(manager_id)
            .await?
            .is_some_and(|user| user.organization_id == Some(organization_id));

        if !belongs {
            return Err(AppError::Validation(format!(
                "manager '{manager_id}' does not belong to organization '{organization_id}'"
            )));
        }

        Ok(())
    }

    /// Walks up from the proposed parent and fails if the department is reached.
    async fn reject_cycle(&self, department_id: DepartmentId, parent: &Department) -> AppResult<()> {
        let mut visited = BTreeSet::new();
        let mut cursor = Some(parent.clone());

        while let Some(current) = cursor {
            if current.id() == department_id {
                return Err(AppError::Validation(format!(
                    "department '{department_id}' cannot be nested under its own descendant"
                )));
            }
            if !visited.insert(current.id()) || visited.len() > MAX_DEPARTMENT_DEPTH {
                return Err(AppError::Validation(format!(
                    "department hierarchy above '{}' is too deep or cyclic",
                    parent.id()
                )));
            }

            cursor = match current.parent_id() {
                Some(parent_id) => {
                    self.department_repository
                        .find_department(parent_id)
                        .await?
                }
                None => None,
            };
        }

        Ok(())
    }

    async fn append_department_event(
        &self,
        actor: &Actor,
        department: &Department,
        action: AuditAction,
    ) {
        append_committed_event(
            self.audit_repository.as_ref(),
            AuditEvent {
                organization_id: Some(department.organization_id()),
                actor_id: actor.id(),
                action,
                resource_type: "department".to_owned(),
                resource_id: department.id().to_string(),
                detail: Some(department.name().as_str().to_owned()),
            },
        )
        .await;
    }
}

#[cfg(test)]
mod tests;
