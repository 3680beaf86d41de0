use async_trait::async_trait;
use sqlx::PgPool;
use tracing::debug;

use tenantdesk_application::{AuditEvent, AuditRepository};
use tenantdesk_core::{AppError, AppResult};

/// Audit trail stored in `audit_log_entries`, one row per event.
///
/// Rows are filed under the event's organization. Events that carry none are
/// filed under the acting user's organization; system-wide actors without an
/// organization produce rows with a NULL organization.
#[derive(Clone)]
pub struct PostgresAuditRepository {
    pool: PgPool,
}

impl PostgresAuditRepository {
    /// Creates a repository with the provided connection pool.
    #[must_use]
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

fn unknown_organization_or_internal(error: sqlx::Error, event: &AuditEvent) -> AppError {
    if let sqlx::Error::Database(ref database_error) = error
        && database_error.code().as_deref() == Some("23503")
    {
        return AppError::Validation(format!(
            "audit event for {} '{}' references an unknown organization",
            event.resource_type, event.resource_id
        ));
    }

    AppError::Internal(format!(
        "failed to record audit event '{}': {error}",
        event.action.as_str()
    ))
}

#[async_trait]
impl AuditRepository for PostgresAuditRepository {
    async fn append_event(&self, event: AuditEvent) -> AppResult<()> {
        let filed_under: Option<i64> = sqlx::query_scalar(
            r#"
            INSERT INTO audit_log_entries (
                organization_id,
                actor_id,
                action,
                resource_type,
                resource_id,
                detail
            )
            SELECT
                COALESCE($1::BIGINT, acting_user.organization_id),
                acting.actor_id,
                $3,
                $4,
                $5,
                $6
            FROM (SELECT $2::BIGINT AS actor_id) AS acting
            LEFT JOIN users AS acting_user ON acting_user.id = acting.actor_id
            RETURNING organization_id
            "#,
        )
        .bind(event.organization_id.map(|value| value.as_i64()))
        .bind(event.actor_id.as_i64())
        .bind(event.action.as_str())
        .bind(event.resource_type.as_str())
        .bind(event.resource_id.as_str())
        .bind(event.detail.as_deref())
        .fetch_one(&self.pool)
        .await
        .map_err(|error| unknown_organization_or_internal(error, &event))?;

        debug!(
            action = event.action.as_str(),
            resource_type = %event.resource_type,
            resource_id = %event.resource_id,
            organization_id = ?filed_under,
            "recorded audit event"
        );

        Ok(())
    }
}
