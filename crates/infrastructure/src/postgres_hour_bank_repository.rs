//! PostgreSQL-backed hour-bank repository.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use sqlx::{FromRow, PgPool};

use tenantdesk_application::{
    HourBankDecisionRecord, HourBankRepository, ProcessedHourBankRequest,
};
use tenantdesk_core::{
    AppError, AppResult, CompanyId, HourBankId, HourBankRequestId, OrganizationId, UserId,
};
use tenantdesk_domain::{
    HourBank, HourBankDecision, HourBankInput, HourBankRequest, HourBankRequestInput,
    HourBankRequestStatus, NewHourBankRequest,
};

const HOUR_BANK_COLUMNS: &str = "id, organization_id, company_id, total_hours, used_hours, \
    hourly_rate, is_active, created_at, updated_at";

const REQUEST_COLUMNS: &str = "id, organization_id, company_id, requested_hours, hourly_rate, \
    justification, status, requested_by, approver_id, decision_notes, created_at, processed_at";

/// PostgreSQL implementation of the hour-bank repository port.
#[derive(Clone)]
pub struct PostgresHourBankRepository {
    pool: PgPool,
}

impl PostgresHourBankRepository {
    /// Creates a repository with the provided connection pool.
    #[must_use]
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[derive(Debug, FromRow)]
struct HourBankRow {
    id: i64,
    organization_id: i64,
    company_id: i64,
    total_hours: Decimal,
    used_hours: Decimal,
    hourly_rate: Decimal,
    is_active: bool,
    created_at: DateTime<Utc>,
    updated_at: DateTime<Utc>,
}

impl TryFrom<HourBankRow> for HourBank {
    type Error = AppError;

    fn try_from(row: HourBankRow) -> Result<Self, Self::Error> {
        HourBank::new(HourBankInput {
            id: HourBankId::new(row.id),
            organization_id: OrganizationId::new(row.organization_id),
            company_id: CompanyId::new(row.company_id),
            total_hours: row.total_hours,
            used_hours: row.used_hours,
            hourly_rate: row.hourly_rate,
            is_active: row.is_active,
            created_at: row.created_at,
            updated_at: row.updated_at,
        })
    }
}

#[derive(Debug, FromRow)]
struct HourBankRequestRow {
    id: i64,
    organization_id: i64,
    company_id: i64,
    requested_hours: Decimal,
    hourly_rate: Option<Decimal>,
    justification: Option<String>,
    status: String,
    requested_by: i64,
    approver_id: Option<i64>,
    decision_notes: Option<String>,
    created_at: DateTime<Utc>,
    processed_at: Option<DateTime<Utc>>,
}

impl TryFrom<HourBankRequestRow> for HourBankRequest {
    type Error = AppError;

    fn try_from(row: HourBankRequestRow) -> Result<Self, Self::Error> {
        Ok(HourBankRequest::new(HourBankRequestInput {
            id: HourBankRequestId::new(row.id),
            organization_id: OrganizationId::new(row.organization_id),
            company_id: CompanyId::new(row.company_id),
            requested_hours: row.requested_hours,
            hourly_rate: row.hourly_rate,
            justification: row.justification,
            status: HourBankRequestStatus::parse(row.status.as_str())?,
            requested_by: UserId::new(row.requested_by),
            approver_id: row.approver_id.map(UserId::new),
            decision_notes: row.decision_notes,
            created_at: row.created_at,
            processed_at: row.processed_at,
        }))
    }
}

#[async_trait]
impl HourBankRepository for PostgresHourBankRepository {
    async fn list_hour_banks(
        &self,
        organization_id: Option<OrganizationId>,
    ) -> AppResult<Vec<HourBank>> {
        let rows = sqlx::query_as::<_, HourBankRow>(&format!(
            r#"
            SELECT {HOUR_BANK_COLUMNS}
            FROM hour_banks
            WHERE $1::BIGINT IS NULL OR organization_id = $1
            ORDER BY organization_id, company_id, id
            "#
        ))
        .bind(organization_id.map(|value| value.as_i64()))
        .fetch_all(&self.pool)
        .await
        .map_err(|error| AppError::Internal(format!("failed to list hour banks: {error}")))?;

        rows.into_iter().map(HourBank::try_from).collect()
    }

    async fn create_request(&self, request: NewHourBankRequest) -> AppResult<HourBankRequest> {
        let row = sqlx::query_as::<_, HourBankRequestRow>(&format!(
            r#"
            INSERT INTO hour_bank_requests (
                organization_id,
                company_id,
                requested_hours,
                hourly_rate,
                justification,
                requested_by,
                created_at
            )
            VALUES ($1, $2, $3, $4, $5, $6, $7)
            RETURNING {REQUEST_COLUMNS}
            "#
        ))
        .bind(request.organization_id().as_i64())
        .bind(request.company_id().as_i64())
        .bind(request.requested_hours())
        .bind(request.hourly_rate())
        .bind(request.justification())
        .bind(request.requested_by().as_i64())
        .bind(request.created_at())
        .fetch_one(&self.pool)
        .await
        .map_err(|error| {
            AppError::Internal(format!("failed to create hour bank request: {error}"))
        })?;

        HourBankRequest::try_from(row)
    }

    async fn find_request(
        &self,
        request_id: HourBankRequestId,
    ) -> AppResult<Option<HourBankRequest>> {
        let row = sqlx::query_as::<_, HourBankRequestRow>(&format!(
            "SELECT {REQUEST_COLUMNS} FROM hour_bank_requests WHERE id = $1"
        ))
        .bind(request_id.as_i64())
        .fetch_optional(&self.pool)
        .await
        .map_err(|error| {
            AppError::Internal(format!(
                "failed to find hour bank request '{request_id}': {error}"
            ))
        })?;

        row.map(HourBankRequest::try_from).transpose()
    }

    async fn list_requests(
        &self,
        organization_id: Option<OrganizationId>,
        status: Option<HourBankRequestStatus>,
    ) -> AppResult<Vec<HourBankRequest>> {
        let rows = sqlx::query_as::<_, HourBankRequestRow>(&format!(
            r#"
            SELECT {REQUEST_COLUMNS}
            FROM hour_bank_requests
            WHERE ($1::BIGINT IS NULL OR organization_id = $1)
                AND ($2::TEXT IS NULL OR status = $2)
            ORDER BY created_at DESC, id DESC
            "#
        ))
        .bind(organization_id.map(|value| value.as_i64()))
        .bind(status.map(|value| value.as_str()))
        .fetch_all(&self.pool)
        .await
        .map_err(|error| {
            AppError::Internal(format!("failed to list hour bank requests: {error}"))
        })?;

        rows.into_iter().map(HourBankRequest::try_from).collect()
    }

    async fn process_request(
        &self,
        request_id: HourBankRequestId,
        decision: HourBankDecisionRecord,
    ) -> AppResult<ProcessedHourBankRequest> {
        let mut transaction = self.pool.begin().await.map_err(|error| {
            AppError::Internal(format!(
                "failed to start transaction for hour bank request '{request_id}': {error}"
            ))
        })?;

        // The status guard makes the transition the single point of contention.
        let row = sqlx::query_as::<_, HourBankRequestRow>(&format!(
            r#"
            UPDATE hour_bank_requests
            SET status = $2,
                approver_id = $3,
                decision_notes = $4,
                processed_at = $5
            WHERE id = $1 AND status = 'pending'
            RETURNING {REQUEST_COLUMNS}
            "#
        ))
        .bind(request_id.as_i64())
        .bind(decision.decision.target_status().as_str())
        .bind(decision.approver_id.as_i64())
        .bind(decision.notes.as_deref())
        .bind(decision.processed_at)
        .fetch_optional(&mut *transaction)
        .await
        .map_err(|error| {
            AppError::Internal(format!(
                "failed to decide hour bank request '{request_id}': {error}"
            ))
        })?;

        let Some(row) = row else {
            let current: Option<String> =
                sqlx::query_scalar("SELECT status FROM hour_bank_requests WHERE id = $1")
                    .bind(request_id.as_i64())
                    .fetch_optional(&mut *transaction)
                    .await
                    .map_err(|error| {
                        AppError::Internal(format!(
                            "failed to read hour bank request '{request_id}': {error}"
                        ))
                    })?;

            return Err(match current {
                Some(status) => AppError::ConflictingStateTransition(format!(
                    "hour bank request '{request_id}' was already {status}"
                )),
                None => AppError::NotFound(format!("hour bank request '{request_id}' not found")),
            });
        };
        let request = HourBankRequest::try_from(row)?;

        let hour_bank = match decision.decision {
            HourBankDecision::Approve => {
                let row = sqlx::query_as::<_, HourBankRow>(&format!(
                    r#"
                    INSERT INTO hour_banks (
                        organization_id,
                        company_id,
                        total_hours,
                        hourly_rate,
                        created_at,
                        updated_at
                    )
                    VALUES ($1, $2, $3, COALESCE($4::NUMERIC, 0), $5, $5)
                    ON CONFLICT (organization_id, company_id) WHERE is_active
                    DO UPDATE SET
                        total_hours = hour_banks.total_hours + EXCLUDED.total_hours,
                        hourly_rate = COALESCE($4::NUMERIC, hour_banks.hourly_rate),
                        updated_at = EXCLUDED.updated_at
                    RETURNING {HOUR_BANK_COLUMNS}
                    "#
                ))
                .bind(request.organization_id().as_i64())
                .bind(request.company_id().as_i64())
                .bind(request.requested_hours())
                .bind(request.hourly_rate())
                .bind(decision.processed_at)
                .fetch_one(&mut *transaction)
                .await
                .map_err(|error| {
                    AppError::Internal(format!(
                        "failed to credit hour bank for request '{request_id}': {error}"
                    ))
                })?;

                Some(HourBank::try_from(row)?)
            }
            HourBankDecision::Reject => None,
        };

        transaction.commit().await.map_err(|error| {
            AppError::Internal(format!(
                "failed to commit hour bank request '{request_id}': {error}"
            ))
        })?;

        Ok(ProcessedHourBankRequest { request, hour_bank })
    }
}
