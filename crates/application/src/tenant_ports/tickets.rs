use async_trait::async_trait;
use tenantdesk_core::{AppResult, DepartmentId, OrganizationId, TicketId, UserId};
use tenantdesk_domain::{
    Actor, EffectiveScope, NewTicket, Ticket, TicketPriority, TicketStatus,
};

/// Visibility predicate for ticket reads.
///
/// A ticket is visible when the scope covers its organization and department,
/// or when the user created it, is assigned to it or is its client responsible.
/// Adapters apply the predicate inside the query so that hidden rows are never
/// loaded.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TicketAccessFilter {
    /// Scope of the reading actor.
    pub scope: EffectiveScope,
    /// Reading user, for the ownership grant.
    pub user_id: UserId,
}

impl TicketAccessFilter {
    /// Builds the filter for one actor.
    #[must_use]
    pub fn for_actor(actor: &Actor) -> Self {
        Self {
            scope: actor.scope(),
            user_id: actor.id(),
        }
    }

    /// Returns whether the ticket passes the filter.
    #[must_use]
    pub fn allows(&self, ticket: &Ticket) -> bool {
        self.scope
            .covers_record(ticket.organization_id(), ticket.department_id())
            || ticket.grants_ownership_to(self.user_id)
    }
}

/// Ticket list query; every optional field narrows the result.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TicketQuery {
    /// Visibility predicate.
    pub access: TicketAccessFilter,
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
    /// Maximum rows returned.
    pub limit: usize,
    /// Number of rows skipped for offset pagination.
    pub offset: usize,
}

impl TicketQuery {
    /// Returns whether the ticket matches the visibility predicate and every filter.
    #[must_use]
    pub fn matches(&self, ticket: &Ticket) -> bool {
        self.access.allows(ticket)
            && self
                .organization_id
                .is_none_or(|value| value == ticket.organization_id())
            && self
                .department_id
                .is_none_or(|value| Some(value) == ticket.department_id())
            && self.status.is_none_or(|value| value == ticket.status())
            && self.priority.is_none_or(|value| value == ticket.priority())
            && self
                .assignee_id
                .is_none_or(|value| Some(value) == ticket.assignee_id())
    }
}

/// Port for ticket persistence.
#[async_trait]
pub trait TicketRepository: Send + Sync {
    /// Creates a ticket and returns it with its assigned id.
    async fn create_ticket(&self, ticket: NewTicket) -> AppResult<Ticket>;

    /// Finds one ticket regardless of visibility.
    async fn find_ticket(&self, ticket_id: TicketId) -> AppResult<Option<Ticket>>;

    /// Lists tickets matching the query, newest first.
    async fn list_tickets(&self, query: TicketQuery) -> AppResult<Vec<Ticket>>;

    /// Persists changes to an existing ticket.
    async fn save_ticket(&self, ticket: Ticket) -> AppResult<()>;
}
