use std::sync::Arc;

use chrono::Utc;
use tenantdesk_core::{
    AppError, AppResult, CompanyId, DepartmentId, NonEmptyString, OrganizationId, TicketId,
    UserId,
};
use tenantdesk_domain::{
    Action, Actor, AuditAction, NewTicket, OrganizationType, Resource, SlaDeadlines, Ticket,
    TicketPriority, TicketStatus, TicketType,
};

use crate::permission_resolver::{has_permission, require_permission};
use crate::tenant_ports::{
    AuditEvent, AuditRepository, DepartmentRepository, OrganizationRepository, TicketAccessFilter,
    TicketQuery, TicketRepository, UserRepository, append_committed_event,
};

mod assignment;
mod create;
mod update;

/// Largest page size served by ticket listing.
pub const MAX_TICKET_PAGE_SIZE: usize = 200;

/// Input payload for ticket creation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CreateTicketInput {
    /// Title.
    pub title: String,
    /// Optional description.
    pub description: Option<String>,
    /// Priority, `medium` when absent.
    pub priority: Option<TicketPriority>,
    /// Category, `incident` when absent.
    pub ticket_type: Option<TicketType>,
    /// Target organization, the actor's own when absent.
    pub organization_id: Option<OrganizationId>,
    /// Target department, the actor's own when absent and the organization is its own.
    pub department_id: Option<DepartmentId>,
    /// Customer company.
    pub customer_company_id: Option<CompanyId>,
    /// Client-side point of contact.
    pub client_responsible_id: Option<UserId>,
}

/// Partial ticket update; `None` leaves a field untouched.
///
/// There is no organization field: a ticket never changes tenant.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct UpdateTicketInput {
    /// New title.
    pub title: Option<String>,
    /// New description.
    pub description: Option<String>,
    /// New priority.
    pub priority: Option<TicketPriority>,
    /// New status.
    pub status: Option<TicketStatus>,
    /// New category.
    pub ticket_type: Option<TicketType>,
    /// New department; `Some(None)` clears it.
    pub department_id: Option<Option<DepartmentId>>,
    /// New client responsible; `Some(None)` clears it.
    pub client_responsible_id: Option<Option<UserId>>,
}

/// Optional filters for ticket listing.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct TicketListFilter {
    /// Organization filter.
    pub organization_id: Option<OrganizationId>,
    /// Department filter.
    pub department_id: Option<DepartmentId>,
    /// Status filter.
    pub status: Option<TicketStatus>,
    /// Priority filter.
    pub priority: Option<TicketPriority>,
    /// Assignee filter.
    pub assignee_id: Option<UserId>,
    /// Page size, clamped to [`MAX_TICKET_PAGE_SIZE`].
    pub limit: Option<usize>,
    /// Rows skipped.
    pub offset: Option<usize>,
}

/// Application service for tenant-scoped ticket operations.
#[derive(Clone)]
pub struct TicketService {
    ticket_repository: Arc<dyn TicketRepository>,
    organization_repository: Arc<dyn OrganizationRepository>,
    department_repository: Arc<dyn DepartmentRepository>,
    user_repository: Arc<dyn UserRepository>,
    audit_repository: Arc<dyn AuditRepository>,
}

impl TicketService {
    /// Creates the ticket service.
    #[must_use]
    pub fn new(
        ticket_repository: Arc<dyn TicketRepository>,
        organization_repository: Arc<dyn OrganizationRepository>,
        department_repository: Arc<dyn DepartmentRepository>,
        user_repository: Arc<dyn UserRepository>,
        audit_repository: Arc<dyn AuditRepository>,
    ) -> Self {
        Self {
            ticket_repository,
            organization_repository,
            department_repository,
            user_repository,
            audit_repository,
        }
    }

    /// Returns one ticket visible to the actor.
    ///
    /// Tickets outside the actor's visibility are reported as missing.
    pub async fn get_ticket(&self, actor: &Actor, ticket_id: TicketId) -> AppResult<Ticket> {
        let access = TicketAccessFilter::for_actor(actor);
        self.ticket_repository
            .find_ticket(ticket_id)
            .await?
            .filter(|ticket| access.allows(ticket))
            .ok_or_else(|| AppError::NotFound(format!("ticket '{ticket_id}' not found")))
    }

    /// Lists tickets visible to the actor.
    pub async fn list_tickets(
        &self,
        actor: &Actor,
        filter: TicketListFilter,
    ) -> AppResult<Vec<Ticket>> {
        self.ticket_repository
            .list_tickets(TicketQuery {
                access: TicketAccessFilter::for_actor(actor),
                organization_id: filter.organization_id,
                department_id: filter.department_id,
                status: filter.status,
                priority: filter.priority,
                assignee_id: filter.assignee_id,
                limit: filter
                    .limit
                    .unwrap_or(MAX_TICKET_PAGE_SIZE)
                    .clamp(1, MAX_TICKET_PAGE_SIZE),
                offset: filter.offset.unwrap_or_default(),
            })
            .await
    }

    async fn append_ticket_event(
        &self,
        actor: &Actor,
        ticket: &Ticket,
        action: AuditAction,
        detail: Option<String>,
    ) {
        append_committed_event(
            self.audit_repository.as_ref(),
            AuditEvent {
                organization_id: Some(ticket.organization_id()),
                actor_id: actor.id(),
                action,
                resource_type: "ticket".to_owned(),
                resource_id: ticket.id().to_string(),
                detail,
            },
        )
        .await;
    }

    /// Ensures a referenced user exists and belongs to the organization.
    async fn require_member(
        &self,
        user_id: UserId,
        organization_id: OrganizationId,
        role: &str,
    ) -> AppResult<()> {
        let user = self
            .user_repository
            .find_user(user_id)
            .await?
            .ok_or_else(|| AppError::Validation(format!("{role} '{user_id}' does not exist")))?;

        if user.organization_id != Some(organization_id) {
            return Err(AppError::Validation(format!(
                "{role} '{user_id}' does not belong to organization '{organization_id}'"
            )));
        }

        Ok(())
    }
}
