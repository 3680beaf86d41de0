use sqlx::PgPool;
use sqlx::migrate::Migrator;
use sqlx::postgres::PgPoolOptions;
use tenantdesk_core::{DepartmentId, OrganizationId, UserId};

static MIGRATOR: Migrator = sqlx::migrate!("./migrations");

pub(crate) async fn test_pool() -> Option<PgPool> {
    let Ok(database_url) = std::env::var("DATABASE_URL") else {
        return None;
    };

    let pool = match PgPoolOptions::new()
        .max_connections(4)
        .connect(database_url.as_str())
        .await
    {
        Ok(pool) => pool,
        Err(error) => panic!("failed to connect to DATABASE_URL in test: {error}"),
    };

    if let Err(error) = MIGRATOR.run(&pool).await {
        panic!("failed to run migrations for postgres tenant tests: {error}");
    }

    Some(pool)
}

pub(crate) async fn insert_client_organization(pool: &PgPool, name: &str) -> OrganizationId {
    let id: Result<i64, sqlx::Error> = sqlx::query_scalar(
        r#"
            INSERT INTO organizations (name, organization_type)
            VALUES ($1, 'client_company')
            RETURNING id
            "#,
    )
    .bind(name)
    .fetch_one(pool)
    .await;

    OrganizationId::new(id.unwrap_or_else(|error| panic!("organization insert failed: {error}")))
}

pub(crate) async fn insert_department(
    pool: &PgPool,
    organization_id: OrganizationId,
    name: &str,
) -> DepartmentId {
    let id: Result<i64, sqlx::Error> = sqlx::query_scalar(
        r#"
            INSERT INTO departments (organization_id, name)
            VALUES ($1, $2)
            RETURNING id
            "#,
    )
    .bind(organization_id.as_i64())
    .bind(name)
    .fetch_one(pool)
    .await;

    DepartmentId::new(id.unwrap_or_else(|error| panic!("department insert failed: {error}")))
}

pub(crate) async fn insert_user(
    pool: &PgPool,
    organization_id: OrganizationId,
    department_id: Option<DepartmentId>,
    role: &str,
) -> UserId {
    let id: Result<i64, sqlx::Error> = sqlx::query_scalar(
        r#"
            INSERT INTO users (display_name, role, organization_id, department_id)
            VALUES ('Test User', $1, $2, $3)
            RETURNING id
            "#,
    )
    .bind(role)
    .bind(organization_id.as_i64())
    .bind(department_id.map(|value| value.as_i64()))
    .fetch_one(pool)
    .await;

    UserId::new(id.unwrap_or_else(|error| panic!("user insert failed: {error}")))
}
