use chrono::{DateTime, Duration, Utc};
use serde::{Deserialize, Serialize};
use tenantdesk_core::{
    AppError, AppResult, CompanyId, DepartmentId, NonEmptyString, OrganizationId, TicketId, UserId,
};

/// Ticket urgency.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TicketPriority {
    /// Low urgency.
    Low,
    /// Default urgency.
    Medium,
    /// High urgency.
    High,
    /// Service is down.
    Critical,
}

impl TicketPriority {
    /// Returns a stable storage value for this priority.
    #[must_use]
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Low => "low",
            Self::Medium => "medium",
            Self::High => "high",
            Self::Critical => "critical",
        }
    }

    /// Parses a stored priority.
    pub fn parse(value: &str) -> AppResult<Self> {
        match value {
            "low" => Ok(Self::Low),
            "medium" => Ok(Self::Medium),
            "high" => Ok(Self::High),
            "critical" => Ok(Self::Critical),
            _ => Err(AppError::Validation(format!(
                "unknown ticket priority '{value}'"
            ))),
        }
    }

    /// Returns `(first_response, resolution)` SLA targets.
    #[must_use]
    pub fn sla_targets(&self) -> (Duration, Duration) {
        match self {
            Self::Critical => (Duration::hours(1), Duration::hours(4)),
            Self::High => (Duration::hours(2), Duration::hours(8)),
            Self::Medium => (Duration::hours(4), Duration::hours(24)),
            Self::Low => (Duration::hours(8), Duration::hours(72)),
        }
    }
}

/// Ticket lifecycle state.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TicketStatus {
    /// Newly opened.
    Open,
    /// Being worked on.
    InProgress,
    /// Waiting on the customer.
    WaitingCustomer,
    /// Fix delivered.
    Resolved,
    /// Finished.
    Closed,
}

impl TicketStatus {
    /// Returns a stable storage value for this status.
    #[must_use]
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Open => "open",
            Self::InProgress => "in_progress",
            Self::WaitingCustomer => "waiting_customer",
            Self::Resolved => "resolved",
            Self::Closed => "closed",
        }
    }

    /// Parses a stored status.
    pub fn parse(value: &str) -> AppResult<Self> {
        match value {
            "open" => Ok(Self::Open),
            "in_progress" => Ok(Self::InProgress),
            "waiting_customer" => Ok(Self::WaitingCustomer),
            "resolved" => Ok(Self::Resolved),
            "closed" => Ok(Self::Closed),
            _ => Err(AppError::Validation(format!(
                "unknown ticket status '{value}'"
            ))),
        }
    }

    /// Closed tickets can only be reopened.
    #[must_use]
    pub fn can_transition_to(&self, next: Self) -> bool {
        match self {
            Self::Closed => matches!(next, Self::Open | Self::Closed),
            _ => true,
        }
    }

    fn is_finished(&self) -> bool {
        matches!(self, Self::Resolved | Self::Closed)
    }
}

/// Ticket category.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TicketType {
    /// Something is broken.
    Incident,
    /// Service request.
    Request,
    /// Root-cause investigation.
    Problem,
    /// Planned change.
    Change,
}

impl TicketType {
    /// Returns a stable storage value for this type.
    #[must_use]
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Incident => "incident",
            Self::Request => "request",
            Self::Problem => "problem",
            Self::Change => "change",
        }
    }

    /// Parses a stored ticket type.
    pub fn parse(value: &str) -> AppResult<Self> {
        match value {
            "incident" => Ok(Self::Incident),
            "request" => Ok(Self::Request),
            "problem" => Ok(Self::Problem),
            "change" => Ok(Self::Change),
            _ => Err(AppError::Validation(format!("unknown ticket type '{value}'"))),
        }
    }
}

/// SLA deadlines derived from priority.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct SlaDeadlines {
    /// First response due.
    pub first_response_due_at: DateTime<Utc>,
    /// Resolution due.
    pub resolution_due_at: DateTime<Utc>,
}

impl SlaDeadlines {
    /// Computes deadlines for a ticket opened at `opened_at`.
    #[must_use]
    pub fn for_priority(priority: TicketPriority, opened_at: DateTime<Utc>) -> Self {
        let (first_response, resolution) = priority.sla_targets();
        Self {
            first_response_due_at: opened_at + first_response,
            resolution_due_at: opened_at + resolution,
        }
    }
}

/// Validated ticket ready to be persisted; tenant context already resolved.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewTicket {
    /// Ticket title.
    pub title: NonEmptyString,
    /// Free-form description.
    pub description: String,
    /// Urgency.
    pub priority: TicketPriority,
    /// Category.
    pub ticket_type: TicketType,
    /// Owning organization.
    pub organization_id: OrganizationId,
    /// Owning department.
    pub department_id: Option<DepartmentId>,
    /// Customer company reference.
    pub customer_company_id: Option<CompanyId>,
    /// Creating user.
    pub creator_id: UserId,
    /// Client-side point of contact.
    pub client_responsible_id: Option<UserId>,
    /// SLA deadlines.
    pub sla: SlaDeadlines,
    /// Creation timestamp.
    pub created_at: DateTime<Utc>,
}

/// Stored values used to build a ticket.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TicketInput {
    /// Ticket id.
    pub id: TicketId,
    /// Ticket title.
    pub title: String,
    /// Free-form description.
    pub description: String,
    /// Urgency.
    pub priority: TicketPriority,
    /// Lifecycle state.
    pub status: TicketStatus,
    /// Category.
    pub ticket_type: TicketType,
    /// Owning organization.
    pub organization_id: OrganizationId,
    /// Owning department.
    pub department_id: Option<DepartmentId>,
    /// Customer company reference.
    pub customer_company_id: Option<CompanyId>,
    /// Assigned user.
    pub assignee_id: Option<UserId>,
    /// Creating user.
    pub creator_id: UserId,
    /// Client-side point of contact.
    pub client_responsible_id: Option<UserId>,
    /// SLA deadlines.
    pub sla: SlaDeadlines,
    /// Resolution timestamp.
    pub resolved_at: Option<DateTime<Utc>>,
    /// Creation timestamp.
    pub created_at: DateTime<Utc>,
    /// Last update timestamp.
    pub updated_at: DateTime<Utc>,
}

/// Helpdesk ticket owned by exactly one organization.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Ticket {
    id: TicketId,
    title: NonEmptyString,
    description: String,
    priority: TicketPriority,
    status: TicketStatus,
    ticket_type: TicketType,
    organization_id: OrganizationId,
    department_id: Option<DepartmentId>,
    customer_company_id: Option<CompanyId>,
    assignee_id: Option<UserId>,
    creator_id: UserId,
    client_responsible_id: Option<UserId>,
    sla: SlaDeadlines,
    resolved_at: Option<DateTime<Utc>>,
    created_at: DateTime<Utc>,
    updated_at: DateTime<Utc>,
}

impl Ticket {
    /// Creates a ticket from stored values.
    pub fn new(input: TicketInput) -> AppResult<Self> {
        Ok(Self {
            id: input.id,
            title: NonEmptyString::new(input.title)?,
            description: input.description,
            priority: input.priority,
            status: input.status,
            ticket_type: input.ticket_type,
            organization_id: input.organization_id,
            department_id: input.department_id,
            customer_company_id: input.customer_company_id,
            assignee_id: input.assignee_id,
            creator_id: input.creator_id,
            client_responsible_id: input.client_responsible_id,
            sla: input.sla,
            resolved_at: input.resolved_at,
            created_at: input.created_at,
            updated_at: input.updated_at,
        })
    }

    /// Materializes a freshly inserted ticket.
    #[must_use]
    pub fn from_new(id: TicketId, ticket: NewTicket) -> Self {
        Self {
            id,
            title: ticket.title,
            description: ticket.description,
            priority: ticket.priority,
            status: TicketStatus::Open,
            ticket_type: ticket.ticket_type,
            organization_id: ticket.organization_id,
            department_id: ticket.department_id,
            customer_company_id: ticket.customer_company_id,
            assignee_id: None,
            creator_id: ticket.creator_id,
            client_responsible_id: ticket.client_responsible_id,
            sla: ticket.sla,
            resolved_at: None,
            created_at: ticket.created_at,
            updated_at: ticket.created_at,
        }
    }

    /// Returns the ticket id.
    #[must_use]
    pub fn id(&self) -> TicketId {
        self.id
    }

    /// Returns the title.
    #[must_use]
    pub fn title(&self) -> &NonEmptyString {
        &self.title
    }

    /// Returns the description.
    #[must_use]
    pub fn description(&self) -> &str {
        self.description.as_str()
    }

    /// Returns the priority.
    #[must_use]
    pub fn priority(&self) -> TicketPriority {
        self.priority
    }

    /// Returns the status.
    #[must_use]
    pub fn status(&self) -> TicketStatus {
        self.status
    }

    /// Returns the category.
    #[must_use]
    pub fn ticket_type(&self) -> TicketType {
        self.ticket_type
    }

    /// Returns the owning organization.
    #[must_use]
    pub fn organization_id(&self) -> OrganizationId {
        self.organization_id
    }

    /// Returns the owning department.
    #[must_use]
    pub fn department_id(&self) -> Option<DepartmentId> {
        self.department_id
    }

    /// Returns the customer company.
    #[must_use]
    pub fn customer_company_id(&self) -> Option<CompanyId> {
        self.customer_company_id
    }

    /// Returns the assignee.
    #[must_use]
    pub fn assignee_id(&self) -> Option<UserId> {
        self.assignee_id
    }

    /// Returns the creator.
    #[must_use]
    pub fn creator_id(&self) -> UserId {
        self.creator_id
    }

    /// Returns the client-side point of contact.
    #[must_use]
    pub fn client_responsible_id(&self) -> Option<UserId> {
        self.client_responsible_id
    }

    /// Returns SLA deadlines.
    #[must_use]
    pub fn sla(&self) -> SlaDeadlines {
        self.sla
    }

    /// Returns the resolution timestamp.
    #[must_use]
    pub fn resolved_at(&self) -> Option<DateTime<Utc>> {
        self.resolved_at
    }

    /// Returns the creation timestamp.
    #[must_use]
    pub fn created_at(&self) -> DateTime<Utc> {
        self.created_at
    }

    /// Returns the last update timestamp.
    #[must_use]
    pub fn updated_at(&self) -> DateTime<Utc> {
        self.updated_at
    }

    /// Returns whether the user is creator, assignee or client responsible.
    #[must_use]
    pub fn grants_ownership_to(&self, user_id: UserId) -> bool {
        self.creator_id == user_id
            || self.assignee_id == Some(user_id)
            || self.client_responsible_id == Some(user_id)
    }

    /// Updates the title.
    pub fn set_title(&mut self, title: impl Into<String>) -> AppResult<()> {
        self.title = NonEmptyString::new(title)?;
        Ok(())
    }

    /// Updates the description.
    pub fn set_description(&mut self, description: impl Into<String>) {
        self.description = description.into();
    }

    /// Updates the category.
    pub fn set_ticket_type(&mut self, ticket_type: TicketType) {
        self.ticket_type = ticket_type;
    }

    /// Changes priority and recomputes SLA deadlines from the opening time.
    pub fn set_priority(&mut self, priority: TicketPriority) {
        if self.priority != priority {
            self.priority = priority;
            self.sla = SlaDeadlines::for_priority(priority, self.created_at);
        }
    }

    /// Moves the ticket to a department of the same organization.
    ///
    /// The caller passes the department's owning organization as loaded from
    /// storage.
    pub fn set_department(
        &mut self,
        department: Option<(DepartmentId, OrganizationId)>,
    ) -> AppResult<()> {
        match department {
            Some((department_id, organization_id)) if organization_id != self.organization_id => {
                Err(AppError::Validation(format!(
                    "department '{department_id}' does not belong to organization '{}'",
                    self.organization_id
                )))
            }
            Some((department_id, _)) => {
                self.department_id = Some(department_id);
                Ok(())
            }
            None => {
                self.department_id = None;
                Ok(())
            }
        }
    }

    /// Sets or clears the client-side point of contact.
    pub fn set_client_responsible(&mut self, user_id: Option<UserId>) {
        self.client_responsible_id = user_id;
    }

    /// Sets or clears the assignee; an open ticket starts progressing once assigned.
    pub fn assign(&mut self, assignee_id: Option<UserId>) {
        self.assignee_id = assignee_id;
        if assignee_id.is_some() && self.status == TicketStatus::Open {
            self.status = TicketStatus::InProgress;
        }
    }

    /// Applies a status change.
    pub fn transition_to(&mut self, next: TicketStatus, now: DateTime<Utc>) -> AppResult<()> {
        if !self.status.can_transition_to(next) {
            return Err(AppError::ConflictingStateTransition(format!(
                "ticket '{}' cannot move from '{}' to '{}'",
                self.id,
                self.status.as_str(),
                next.as_str()
            )));
        }

        if next == TicketStatus::Resolved && self.status != TicketStatus::Resolved {
            self.resolved_at = Some(now);
        } else if !next.is_finished() {
            self.resolved_at = None;
        }

        self.status = next;
        Ok(())
    }

    /// Stamps the update time.
    pub fn touch(&mut self, now: DateTime<Utc>) {
        self.updated_at = now;
    }
}
