//! PostgreSQL-backed ticket repository.
//!
//! Visibility is compiled into the `WHERE` clause so hidden tickets are never
//! read from the database.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use sqlx::{FromRow, PgPool, Postgres, QueryBuilder};

use tenantdesk_application::{TicketAccessFilter, TicketQuery, TicketRepository};
use tenantdesk_core::{
    AppError, AppResult, CompanyId, DepartmentId, OrganizationId, TicketId, UserId,
};
use tenantdesk_domain::{
    EffectiveScope, NewTicket, SlaDeadlines, Ticket, TicketInput, TicketPriority, TicketStatus,
    TicketType,
};

const TICKET_COLUMNS: &str = "id, title, description, priority, status, ticket_type, \
    organization_id, department_id, customer_company_id, assignee_id, creator_id, \
    client_responsible_id, first_response_due_at, resolution_due_at, resolved_at, \
    created_at, updated_at";

/// PostgreSQL implementation of the ticket repository port.
#[derive(Clone)]
pub struct PostgresTicketRepository {
    pool: PgPool,
}

impl PostgresTicketRepository {
    /// Creates a repository with the provided connection pool.
    #[must_use]
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[derive(Debug, FromRow)]
struct TicketRow {
    id: i64,
    title: String,
    description: String,
    priority: String,
    status: String,
    ticket_type: String,
    organization_id: i64,
    department_id: Option<i64>,
    customer_company_id: Option<i64>,
    assignee_id: Option<i64>,
    creator_id: i64,
    client_responsible_id: Option<i64>,
    first_response_due_at: DateTime<Utc>,
    resolution_due_at: DateTime<Utc>,
    resolved_at: Option<DateTime<Utc>>,
    created_at: DateTime<Utc>,
    updated_at: DateTime<Utc>,
}

impl TryFrom<TicketRow> for Ticket {
    type Error = AppError;

    fn try_from(row: TicketRow) -> Result<Self, Self::Error> {
        Ticket::new(TicketInput {
            id: TicketId::new(row.id),
            title: row.title,
            description: row.description,
            priority: TicketPriority::parse(row.priority.as_str())?,
            status: TicketStatus::parse(row.status.as_str())?,
            ticket_type: TicketType::parse(row.ticket_type.as_str())?,
            organization_id: OrganizationId::new(row.organization_id),
            department_id: row.department_id.map(DepartmentId::new),
            customer_company_id: row.customer_company_id.map(CompanyId::new),
            assignee_id: row.assignee_id.map(UserId::new),
            creator_id: UserId::new(row.creator_id),
            client_responsible_id: row.client_responsible_id.map(UserId::new),
            sla: SlaDeadlines {
                first_response_due_at: row.first_response_due_at,
                resolution_due_at: row.resolution_due_at,
            },
            resolved_at: row.resolved_at,
            created_at: row.created_at,
            updated_at: row.updated_at,
        })
    }
}

/// Appends the visibility predicate for one reader as a parenthesized clause.
fn push_access_predicate(builder: &mut QueryBuilder<'_, Postgres>, access: &TicketAccessFilter) {
    builder.push("(");
    match access.scope {
        EffectiveScope::Global => {
            builder.push("TRUE");
        }
        EffectiveScope::Organization(organization_id)
        | EffectiveScope::CrossDepartments {
            organization_id: Some(organization_id),
            ..
        } => {
            builder.push("organization_id = ");
            builder.push_bind(organization_id.as_i64());
        }
        EffectiveScope::Department {
            organization_id: Some(organization_id),
            department_id,
        } => {
            builder.push("(organization_id = ");
            builder.push_bind(organization_id.as_i64());
            builder.push(" AND (department_id IS NULL OR department_id = ");
            builder.push_bind(department_id.as_i64());
            builder.push("))");
        }
        EffectiveScope::CrossDepartments {
            organization_id: None,
            ..
        }
        | EffectiveScope::Department {
            organization_id: None,
            ..
        }
        | EffectiveScope::None => {
            builder.push("FALSE");
        }
    }

    let user_id = access.user_id.as_i64();
    builder.push(" OR creator_id = ");
    builder.push_bind(user_id);
    builder.push(" OR assignee_id = ");
    builder.push_bind(user_id);
    builder.push(" OR client_responsible_id = ");
    builder.push_bind(user_id);
    builder.push(")");
}

#[async_trait]
impl TicketRepository for PostgresTicketRepository {
    async fn create_ticket(&self, ticket: NewTicket) -> AppResult<Ticket> {
        let row = sqlx::query_as::<_, TicketRow>(&format!(
            r#"
            INSERT INTO tickets (
                title,
                description,
                priority,
                status,
                ticket_type,
                organization_id,
                department_id,
                customer_company_id,
                creator_id,
                client_responsible_id,
                first_response_due_at,
                resolution_due_at,
                created_at,
                updated_at
            )
            VALUES ($1, $2, $3, 'open', $4, $5, $6, $7, $8, $9, $10, $11, $12, $12)
            RETURNING {TICKET_COLUMNS}
            "#
        ))
        .bind(ticket.title.as_str())
        .bind(ticket.description.as_str())
        .bind(ticket.priority.as_str())
        .bind(ticket.ticket_type.as_str())
        .bind(ticket.organization_id.as_i64())
        .bind(ticket.department_id.map(|value| value.as_i64()))
        .bind(ticket.customer_company_id.map(|value| value.as_i64()))
        .bind(ticket.creator_id.as_i64())
        .bind(ticket.client_responsible_id.map(|value| value.as_i64()))
        .bind(ticket.sla.first_response_due_at)
        .bind(ticket.sla.resolution_due_at)
        .bind(ticket.created_at)
        .fetch_one(&self.pool)
        .await
        .map_err(|error| AppError::Internal(format!("failed to create ticket: {error}")))?;

        Ticket::try_from(row)
    }

    async fn find_ticket(&self, ticket_id: TicketId) -> AppResult<Option<Ticket>> {
        let row = sqlx::query_as::<_, TicketRow>(&format!(
            "SELECT {TICKET_COLUMNS} FROM tickets WHERE id = $1"
        ))
        .bind(ticket_id.as_i64())
        .fetch_optional(&self.pool)
        .await
        .map_err(|error| {
            AppError::Internal(format!("failed to find ticket '{ticket_id}': {error}"))
        })?;

        row.map(Ticket::try_from).transpose()
    }

    async fn list_tickets(&self, query: TicketQuery) -> AppResult<Vec<Ticket>> {
        let limit = i64::try_from(query.limit).map_err(|error| {
            AppError::Validation(format!("invalid ticket query limit: {error}"))
        })?;
        let offset = i64::try_from(query.offset).map_err(|error| {
            AppError::Validation(format!("invalid ticket query offset: {error}"))
        })?;

        let mut builder: QueryBuilder<'_, Postgres> =
            QueryBuilder::new(format!("SELECT {TICKET_COLUMNS} FROM tickets WHERE "));
        push_access_predicate(&mut builder, &query.access);

        if let Some(organization_id) = query.organization_id {
            builder.push(" AND organization_id = ");
            builder.push_bind(organization_id.as_i64());
        }
        if let Some(department_id) = query.department_id {
            builder.push(" AND department_id = ");
            builder.push_bind(department_id.as_i64());
        }
        if let Some(status) = query.status {
            builder.push(" AND status = ");
            builder.push_bind(status.as_str());
        }
        if let Some(priority) = query.priority {
            builder.push(" AND priority = ");
            builder.push_bind(priority.as_str());
        }
        if let Some(assignee_id) = query.assignee_id {
            builder.push(" AND assignee_id = ");
            builder.push_bind(assignee_id.as_i64());
        }

        builder.push(" ORDER BY created_at DESC, id DESC LIMIT ");
        builder.push_bind(limit);
        builder.push(" OFFSET ");
        builder.push_bind(offset);

        let rows = builder
            .build_query_as::<TicketRow>()
            .fetch_all(&self.pool)
            .await
            .map_err(|error| AppError::Internal(format!("failed to list tickets: {error}")))?;

        rows.into_iter().map(Ticket::try_from).collect()
    }

    async fn save_ticket(&self, ticket: Ticket) -> AppResult<()> {
        let result = sqlx::query(
            r#"
            UPDATE tickets
            SET title = $2,
                description = $3,
                priority = $4,
                status = $5,
                ticket_type = $6,
                department_id = $7,
                assignee_id = $8,
                client_responsible_id = $9,
                first_response_due_at = $10,
                resolution_due_at = $11,
                resolved_at = $12,
                updated_at = $13
            WHERE id = $1
            "#,
        )
        .bind(ticket.id().as_i64())
        .bind(ticket.title().as_str())
        .bind(ticket.description())
        .bind(ticket.priority().as_str())
        .bind(ticket.status().as_str())
        .bind(ticket.ticket_type().as_str())
        .bind(ticket.department_id().map(|value| value.as_i64()))
        .bind(ticket.assignee_id().map(|value| value.as_i64()))
        .bind(ticket.client_responsible_id().map(|value| value.as_i64()))
        .bind(ticket.sla().first_response_due_at)
        .bind(ticket.sla().resolution_due_at)
        .bind(ticket.resolved_at())
        .bind(ticket.updated_at())
        .execute(&self.pool)
        .await
        .map_err(|error| {
            AppError::Internal(format!("failed to save ticket '{}': {error}", ticket.id()))
        })?;

        if result.rows_affected() == 0 {
            return Err(AppError::NotFound(format!(
                "ticket '{}' not found",
                ticket.id()
            )));
        }

        Ok(())
    }
}
