//! PostgreSQL-backed organization repository.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use sqlx::{FromRow, PgPool};

use tenantdesk_application::{NewOrganization, OrganizationRepository};
use tenantdesk_core::{AppError, AppResult, OrganizationId};
use tenantdesk_domain::{Organization, OrganizationType};

/// PostgreSQL implementation of the organization repository port.
#[derive(Clone)]
pub struct PostgresOrganizationRepository {
    pool: PgPool,
}

impl PostgresOrganizationRepository {
    /// Creates a repository with the provided connection pool.
    #[must_use]
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[derive(Debug, FromRow)]
struct OrganizationRow {
    id: i64,
    name: String,
    organization_type: String,
    is_active: bool,
    created_at: DateTime<Utc>,
}

impl TryFrom<OrganizationRow> for Organization {
    type Error = AppError;

    fn try_from(row: OrganizationRow) -> Result<Self, Self::Error> {
        Organization::new(
            OrganizationId::new(row.id),
            row.name,
            OrganizationType::parse(row.organization_type.as_str())?,
            row.is_active,
            row.created_at,
        )
    }
}

#[async_trait]
impl OrganizationRepository for PostgresOrganizationRepository {
    async fn find_organization(
        &self,
        organization_id: OrganizationId,
    ) -> AppResult<Option<Organization>> {
        let row = sqlx::query_as::<_, OrganizationRow>(
            r#"
            SELECT id, name, organization_type, is_active, created_at
            FROM organizations
            WHERE id = $1
            "#,
        )
        .bind(organization_id.as_i64())
        .fetch_optional(&self.pool)
        .await
        .map_err(|error| {
            AppError::Internal(format!(
                "failed to find organization '{organization_id}': {error}"
            ))
        })?;

        row.map(Organization::try_from).transpose()
    }

    async fn list_organizations(&self) -> AppResult<Vec<Organization>> {
        let rows = sqlx::query_as::<_, OrganizationRow>(
            r#"
            SELECT id, name, organization_type, is_active, created_at
            FROM organizations
            ORDER BY id
            "#,
        )
        .fetch_all(&self.pool)
        .await
        .map_err(|error| AppError::Internal(format!("failed to list organizations: {error}")))?;

        rows.into_iter().map(Organization::try_from).collect()
    }

    async fn create_organization(&self, organization: NewOrganization) -> AppResult<Organization> {
        let row = sqlx::query_as::<_, OrganizationRow>(
            r#"
            INSERT INTO organizations (name, organization_type)
            VALUES ($1, $2)
            RETURNING id, name, organization_type, is_active, created_at
            "#,
        )
        .bind(organization.name.as_str())
        .bind(organization.organization_type.as_str())
        .fetch_one(&self.pool)
        .await
        .map_err(|error| {
            if let sqlx::Error::Database(ref database_error) = error
                && database_error.code().as_deref() == Some("23505")
            {
                return AppError::Conflict(
                    "a system-owner organization already exists".to_owned(),
                );
            }

            AppError::Internal(format!("failed to create organization: {error}"))
        })?;

        Organization::try_from(row)
    }

    async fn save_organization(&self, organization: Organization) -> AppResult<()> {
        let result = sqlx::query(
            r#"
            UPDATE organizations
            SET name = $2, is_active = $3
            WHERE id = $1
            "#,
        )
        .bind(organization.id().as_i64())
        .bind(organization.name().as_str())
        .bind(organization.is_active())
        .execute(&self.pool)
        .await
        .map_err(|error| {
            AppError::Internal(format!(
                "failed to save organization '{}': {error}",
                organization.id()
            ))
        })?;

        if result.rows_affected() == 0 {
            return Err(AppError::NotFound(format!(
                "organization '{}' not found",
                organization.id()
            )));
        }

        Ok(())
    }
}
