//! PostgreSQL-backed user repository.

use async_trait::async_trait;
use sqlx::{FromRow, PgPool};
use tracing::warn;

use tenantdesk_application::UserRepository;
use tenantdesk_core::{AppError, AppResult, DepartmentId, OrganizationId, UserId};
use tenantdesk_domain::{Permission, UserAccount, UserRole};

/// PostgreSQL implementation of the user repository port.
#[derive(Clone)]
pub struct PostgresUserRepository {
    pool: PgPool,
}

impl PostgresUserRepository {
    /// Creates a repository with the provided connection pool.
    #[must_use]
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[derive(Debug, FromRow)]
struct UserRow {
    id: i64,
    display_name: String,
    email: Option<String>,
    role: String,
    organization_id: Option<i64>,
    department_id: Option<i64>,
    is_super_user: bool,
    can_cross_organizations: bool,
    can_cross_departments: bool,
    is_active: bool,
}

impl TryFrom<UserRow> for UserAccount {
    type Error = AppError;

    fn try_from(row: UserRow) -> Result<Self, Self::Error> {
        Ok(Self {
            id: UserId::new(row.id),
            display_name: row.display_name,
            email: row.email,
            role: UserRole::parse(row.role.as_str())?,
            organization_id: row.organization_id.map(OrganizationId::new),
            department_id: row.department_id.map(DepartmentId::new),
            is_super_user: row.is_super_user,
            can_cross_organizations: row.can_cross_organizations,
            can_cross_departments: row.can_cross_departments,
            is_active: row.is_active,
        })
    }
}

#[derive(Debug, FromRow)]
struct PermissionRow {
    permission: String,
}

#[async_trait]
impl UserRepository for PostgresUserRepository {
    async fn find_user(&self, user_id: UserId) -> AppResult<Option<UserAccount>> {
        let row = sqlx::query_as::<_, UserRow>(
            r#"
            SELECT
                id,
                display_name,
                email,
                role,
                organization_id,
                department_id,
                is_super_user,
                can_cross_organizations,
                can_cross_departments,
                is_active
            FROM users
            WHERE id = $1
            "#,
        )
        .bind(user_id.as_i64())
        .fetch_optional(&self.pool)
        .await
        .map_err(|error| {
            AppError::Internal(format!("failed to find user '{user_id}': {error}"))
        })?;

        row.map(UserAccount::try_from).transpose()
    }

    async fn list_permissions_for_user(&self, user_id: UserId) -> AppResult<Vec<Permission>> {
        let rows = sqlx::query_as::<_, PermissionRow>(
            r#"
            SELECT DISTINCT grants.permission
            FROM user_roles
            INNER JOIN role_permissions AS grants
                ON grants.role_id = user_roles.role_id
            WHERE user_roles.user_id = $1
            ORDER BY grants.permission
            "#,
        )
        .bind(user_id.as_i64())
        .fetch_all(&self.pool)
        .await
        .map_err(|error| {
            AppError::Internal(format!(
                "failed to load permissions for user '{user_id}': {error}"
            ))
        })?;

        Ok(decode_permissions(user_id, rows.into_iter().map(|row| row.permission)))
    }
}

/// Decodes stored grants, dropping values that name no known permission.
pub(crate) fn decode_permissions(
    user_id: UserId,
    values: impl IntoIterator<Item = String>,
) -> Vec<Permission> {
    values
        .into_iter()
        .filter_map(|value| match Permission::from_storage(value.as_str()) {
            Ok(permission) => Some(permission),
            Err(error) => {
                warn!(
                    user_id = %user_id,
                    permission = %value,
                    error = %error,
                    "skipping undecodable permission"
                );
                None
            }
        })
        .collect()
}
