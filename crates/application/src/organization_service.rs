use std::sync::Arc;

use tenantdesk_core::{AppError, AppResult, NonEmptyString, OrganizationId};
use tenantdesk_domain::{Action, Actor, AuditAction, Organization, OrganizationType, Resource};

use crate::ScopeResolver;
use crate::permission_resolver::require_permission;
use crate::tenant_ports::{
    AuditEvent, AuditRepository, NewOrganization, OrganizationRepository, append_committed_event,
};

/// Application service for organization reads and client-company management.
///
/// Only the system owner manages client companies: writes need the matching
/// `organizations:*` permission and an actor from the system-owner
/// organization, or a super user.
#[derive(Clone)]
pub struct OrganizationService {
    organization_repository: Arc<dyn OrganizationRepository>,
    audit_repository: Arc<dyn AuditRepository>,
    scope_resolver: ScopeResolver,
}

impl OrganizationService {
    /// Creates the organization service.
    #[must_use]
    pub fn new(
        organization_repository: Arc<dyn OrganizationRepository>,
        audit_repository: Arc<dyn AuditRepository>,
        scope_resolver: ScopeResolver,
    ) -> Self {
        Self {
            organization_repository,
            audit_repository,
            scope_resolver,
        }
    }

    /// Lists organizations in the actor's scope.
    pub async fn list_organizations(&self, actor: &Actor) -> AppResult<Vec<Organization>> {
        self.scope_resolver.accessible_organizations(actor).await
    }

    /// Returns one organization in the actor's scope.
    pub async fn get_organization(
        &self,
        actor: &Actor,
        organization_id: OrganizationId,
    ) -> AppResult<Organization> {
        let missing = || AppError::NotFound(format!("organization '{organization_id}' not found"));

        if !self
            .scope_resolver
            .can_access_organization(actor, organization_id)
            .await?
        {
            return Err(missing());
        }

        self.organization_repository
            .find_organization(organization_id)
            .await?
            .ok_or_else(missing)
    }

    /// Registers a new client company.
    pub async fn create_client_organization(
        &self,
        actor: &Actor,
        name: &str,
    ) -> AppResult<Organization> {
        require_permission(actor, Resource::Organizations, Action::Create)?;
        require_system_side(actor)?;

        let organization = self
            .organization_repository
            .create_organization(NewOrganization {
                name: NonEmptyString::new(name)?,
                organization_type: OrganizationType::ClientCompany,
            })
            .await?;

        self.append_organization_event(
            actor,
            &organization,
            AuditAction::OrganizationCreated,
            Some(organization.name().as_str().to_owned()),
        )
        .await;

        Ok(organization)
    }

    /// Activates or deactivates an organization; the system owner stays active.
    pub async fn set_organization_active(
        &self,
        actor: &Actor,
        organization_id: OrganizationId,
        is_active: bool,
    ) -> AppResult<Organization> {
        require_permission(actor, Resource::Organizations, Action::Update)?;
        require_system_side(actor)?;

        let mut organization = self
            .organization_repository
            .find_organization(organization_id)
            .await?
            .ok_or_else(|| {
                AppError::NotFound(format!("organization '{organization_id}' not found"))
            })?;

        if organization.is_active() == is_active {
            return Ok(organization);
        }

        organization.set_active(is_active)?;
        self.organization_repository
            .save_organization(organization.clone())
            .await?;
        self.append_organization_event(
            actor,
            &organization,
            AuditAction::OrganizationStatusChanged,
            Some(if is_active { "activated" } else { "deactivated" }.to_owned()),
        )
        .await;

        Ok(organization)
    }

    async fn append_organization_event(
        &self,
        actor: &Actor,
        organization: &Organization,
        action: AuditAction,
        detail: Option<String>,
    ) {
        append_committed_event(
            self.audit_repository.as_ref(),
            AuditEvent {
                organization_id: Some(organization.id()),
                actor_id: actor.id(),
                action,
                resource_type: "organization".to_owned(),
                resource_id: organization.id().to_string(),
                detail,
            },
        )
        .await;
    }
}

fn require_system_side(actor: &Actor) -> AppResult<()> {
    if actor.is_super_user() || actor.belongs_to_system_owner() {
        return Ok(());
    }

    Err(AppError::Forbidden(format!(
        "user '{}' does not belong to the system-owner organization",
        actor.id()
    )))
}
