//! PostgreSQL-backed department repository.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use sqlx::{FromRow, PgPool};

use tenantdesk_application::{DepartmentRepository, NewDepartment};
use tenantdesk_core::{AppError, AppResult, DepartmentId, OrganizationId, UserId};
use tenantdesk_domain::{Department, DepartmentInput};

/// PostgreSQL implementation of the department repository port.
#[derive(Clone)]
pub struct PostgresDepartmentRepository {
    pool: PgPool,
}

impl PostgresDepartmentRepository {
    /// Creates a repository with the provided connection pool.
    #[must_use]
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[derive(Debug, FromRow)]
struct DepartmentRow {
    id: i64,
    organization_id: i64,
    name: String,
    parent_id: Option<i64>,
    manager_id: Option<i64>,
    is_active: bool,
    created_at: DateTime<Utc>,
    updated_at: DateTime<Utc>,
}

impl TryFrom<DepartmentRow> for Department {
    type Error = AppError;

    fn try_from(row: DepartmentRow) -> Result<Self, Self::Error> {
        Department::new(DepartmentInput {
            id: DepartmentId::new(row.id),
            organization_id: OrganizationId::new(row.organization_id),
            name: row.name,
            parent_id: row.parent_id.map(DepartmentId::new),
            manager_id: row.manager_id.map(UserId::new),
            is_active: row.is_active,
            created_at: row.created_at,
            updated_at: row.updated_at,
        })
    }
}

fn duplicate_name_or_internal(error: sqlx::Error, name: &str, operation: &str) -> AppError {
    if let sqlx::Error::Database(ref database_error) = error
        && database_error.code().as_deref() == Some("23505")
    {
        return AppError::Conflict(format!(
            "department '{name}' already exists in this organization"
        ));
    }

    AppError::Internal(format!("failed to {operation}: {error}"))
}

#[async_trait]
impl DepartmentRepository for PostgresDepartmentRepository {
    async fn find_department(
        &self,
        department_id: DepartmentId,
    ) -> AppResult<Option<Department>> {
        let row = sqlx::query_as::<_, DepartmentRow>(
            r#"
            SELECT id, organization_id, name, parent_id, manager_id, is_active, created_at, updated_at
            FROM departments
            WHERE id = $1
            "#,
        )
        .bind(department_id.as_i64())
        .fetch_optional(&self.pool)
        .await
        .map_err(|error| {
            AppError::Internal(format!(
                "failed to find department '{department_id}': {error}"
            ))
        })?;

        row.map(Department::try_from).transpose()
    }

    async fn list_departments(
        &self,
        organization_id: Option<OrganizationId>,
    ) -> AppResult<Vec<Department>> {
        let rows = sqlx::query_as::<_, DepartmentRow>(
            r#"
            SELECT id, organization_id, name, parent_id, manager_id, is_active, created_at, updated_at
            FROM departments
            WHERE $1::BIGINT IS NULL OR organization_id = $1
            ORDER BY id
            "#,
        )
        .bind(organization_id.map(|value| value.as_i64()))
        .fetch_all(&self.pool)
        .await
        .map_err(|error| AppError::Internal(format!("failed to list departments: {error}")))?;

        rows.into_iter().map(Department::try_from).collect()
    }

    async fn create_department(&self, department: NewDepartment) -> AppResult<Department> {
        let row = sqlx::query_as::<_, DepartmentRow>(
            r#"
            INSERT INTO departments (
                organization_id,
                name,
                parent_id,
                manager_id,
                created_at,
                updated_at
            )
            VALUES ($1, $2, $3, $4, $5, $5)
            RETURNING id, organization_id, name, parent_id, manager_id, is_active, created_at, updated_at
            "#,
        )
        .bind(department.organization_id.as_i64())
        .bind(department.name.as_str())
        .bind(department.parent_id.map(|value| value.as_i64()))
        .bind(department.manager_id.map(|value| value.as_i64()))
        .bind(department.created_at)
        .fetch_one(&self.pool)
        .await
        .map_err(|error| {
            duplicate_name_or_internal(error, department.name.as_str(), "create department")
        })?;

        Department::try_from(row)
    }

    async fn save_department(&self, department: Department) -> AppResult<()> {
        let result = sqlx::query(
            r#"
            UPDATE departments
            SET name = $2,
                parent_id = $3,
                manager_id = $4,
                is_active = $5,
                updated_at = $6
            WHERE id = $1
            "#,
        )
        .bind(department.id().as_i64())
        .bind(department.name().as_str())
        .bind(department.parent_id().map(|value| value.as_i64()))
        .bind(department.manager_id().map(|value| value.as_i64()))
        .bind(department.is_active())
        .bind(department.updated_at())
        .execute(&self.pool)
        .await
        .map_err(|error| {
            duplicate_name_or_internal(error, department.name().as_str(), "save department")
        })?;

        if result.rows_affected() == 0 {
            return Err(AppError::NotFound(format!(
                "department '{}' not found",
                department.id()
            )));
        }

        Ok(())
    }
}
