use serde::{Deserialize, Serialize};
use tenantdesk_application::{CreateTicketInput, TicketListFilter, UpdateTicketInput};
use tenantdesk_core::{AppError, CompanyId, DepartmentId, OrganizationId, TicketId, UserId};
use tenantdesk_domain::{Ticket, TicketPriority, TicketStatus, TicketType};
use tracing::warn;
use ts_rs::TS;

use super::common::present;

/// API representation of a ticket.
#[derive(Debug, Serialize, TS)]
#[ts(
    export,
    export_to = "../../../packages/api-types/src/generated/ticket-response.ts"
)]
pub struct TicketResponse {
    pub id: i64,
    pub title: String,
    pub description: String,
    pub priority: String,
    pub status: String,
    pub ticket_type: String,
    pub organization_id: i64,
    pub department_id: Option<i64>,
    pub customer_company_id: Option<i64>,
    pub assignee_id: Option<i64>,
    pub creator_id: i64,
    pub client_responsible_id: Option<i64>,
    pub first_response_due_at: String,
    pub resolution_due_at: String,
    pub resolved_at: Option<String>,
    pub created_at: String,
    pub updated_at: String,
}

impl From<Ticket> for TicketResponse {
    fn from(value: Ticket) -> Self {
        let sla = value.sla();
        Self {
            id: value.id().as_i64(),
            title: value.title().as_str().to_owned(),
            description: value.description().to_owned(),
            priority: value.priority().as_str().to_owned(),
            status: value.status().as_str().to_owned(),
            ticket_type: value.ticket_type().as_str().to_owned(),
            organization_id: value.organization_id().as_i64(),
            department_id: value.department_id().map(|id| id.as_i64()),
            customer_company_id: value.customer_company_id().map(|id| id.as_i64()),
            assignee_id: value.assignee_id().map(|id| id.as_i64()),
            creator_id: value.creator_id().as_i64(),
            client_responsible_id: value.client_responsible_id().map(|id| id.as_i64()),
            first_response_due_at: sla.first_response_due_at.to_rfc3339(),
            resolution_due_at: sla.resolution_due_at.to_rfc3339(),
            resolved_at: value.resolved_at().map(|at| at.to_rfc3339()),
            created_at: value.created_at().to_rfc3339(),
            updated_at: value.updated_at().to_rfc3339(),
        }
    }
}

/// Query parameters for ticket listing.
#[derive(Debug, Default, Deserialize)]
pub struct TicketListQuery {
    pub organization_id: Option<i64>,
    pub department_id: Option<i64>,
    pub status: Option<String>,
    pub priority: Option<String>,
    pub assignee_id: Option<i64>,
    pub limit: Option<usize>,
    pub offset: Option<usize>,
}

impl TryFrom<TicketListQuery> for TicketListFilter {
    type Error = AppError;

    fn try_from(value: TicketListQuery) -> Result<Self, Self::Error> {
        Ok(Self {
            organization_id: value.organization_id.map(OrganizationId::new),
            department_id: value.department_id.map(DepartmentId::new),
            status: value.status.as_deref().map(TicketStatus::parse).transpose()?,
            priority: value
                .priority
                .as_deref()
                .map(TicketPriority::parse)
                .transpose()?,
            assignee_id: value.assignee_id.map(UserId::new),
            limit: value.limit,
            offset: value.offset,
        })
    }
}

/// Incoming payload for ticket creation.
#[derive(Debug, Deserialize, TS)]
#[ts(
    export,
    export_to = "../../../packages/api-types/src/generated/create-ticket-request.ts"
)]
pub struct CreateTicketRequest {
    pub title: String,
    #[ts(optional)]
    pub description: Option<String>,
    #[ts(optional)]
    pub priority: Option<String>,
    #[ts(optional)]
    pub ticket_type: Option<String>,
    #[ts(optional)]
    pub organization_id: Option<i64>,
    #[ts(optional)]
    pub department_id: Option<i64>,
    #[ts(optional)]
    pub customer_company_id: Option<i64>,
    #[ts(optional)]
    pub client_responsible_id: Option<i64>,
}

impl TryFrom<CreateTicketRequest> for CreateTicketInput {
    type Error = AppError;

    fn try_from(value: CreateTicketRequest) -> Result<Self, Self::Error> {
        Ok(Self {
            title: value.title,
            description: value.description,
            priority: value
                .priority
                .as_deref()
                .map(TicketPriority::parse)
                .transpose()?,
            ticket_type: value
                .ticket_type
                .as_deref()
                .map(TicketType::parse)
                .transpose()?,
            organization_id: value.organization_id.map(OrganizationId::new),
            department_id: value.department_id.map(DepartmentId::new),
            customer_company_id: value.customer_company_id.map(CompanyId::new),
            client_responsible_id: value.client_responsible_id.map(UserId::new),
        })
    }
}

/// Incoming payload for ticket updates.
///
/// `organization_id` is accepted only to be discarded: tickets never move
/// between organizations.
#[derive(Debug, Default, Deserialize, TS)]
#[ts(
    export,
    export_to = "../../../packages/api-types/src/generated/update-ticket-request.ts"
)]
pub struct UpdateTicketRequest {
    #[ts(optional)]
    pub title: Option<String>,
    #[ts(optional)]
    pub description: Option<String>,
    #[ts(optional)]
    pub priority: Option<String>,
    #[ts(optional)]
    pub status: Option<String>,
    #[ts(optional)]
    pub ticket_type: Option<String>,
    #[serde(default, deserialize_with = "present")]
    #[ts(type = "number | null")]
    pub department_id: Option<Option<i64>>,
    #[serde(default, deserialize_with = "present")]
    #[ts(type = "number | null")]
    pub client_responsible_id: Option<Option<i64>>,
    #[ts(skip)]
    pub organization_id: Option<i64>,
}

impl UpdateTicketRequest {
    /// Converts the payload, dropping any organization change.
    pub fn into_input(self, ticket_id: TicketId) -> Result<UpdateTicketInput, AppError> {
        if let Some(organization_id) = self.organization_id {
            warn!(
                ticket_id = %ticket_id,
                organization_id,
                "ignoring organization_id in ticket update"
            );
        }

        Ok(UpdateTicketInput {
            title: self.title,
            description: self.description,
            priority: self
                .priority
                .as_deref()
                .map(TicketPriority::parse)
                .transpose()?,
            status: self.status.as_deref().map(TicketStatus::parse).transpose()?,
            ticket_type: self
                .ticket_type
                .as_deref()
                .map(TicketType::parse)
                .transpose()?,
            department_id: self
                .department_id
                .map(|department| department.map(DepartmentId::new)),
            client_responsible_id: self
                .client_responsible_id
                .map(|user| user.map(UserId::new)),
        })
    }
}

/// Incoming payload for same-organization assignment.
#[derive(Debug, Deserialize, TS)]
#[ts(
    export,
    export_to = "../../../packages/api-types/src/generated/assign-ticket-request.ts"
)]
pub struct AssignTicketRequest {
    pub assignee_id: Option<i64>,
}

/// Incoming payload for system-owner technician assignment.
#[derive(Debug, Deserialize, TS)]
#[ts(
    export,
    export_to = "../../../packages/api-types/src/generated/assign-technician-request.ts"
)]
pub struct AssignTechnicianRequest {
    pub technician_id: i64,
}
