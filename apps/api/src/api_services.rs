use std::sync::Arc;

use sqlx::PgPool;
use sqlx::postgres::PgPoolOptions;
use tenantdesk_application::{
    DepartmentService, HourBankService, IdentityService, OrganizationService, ScopeResolver,
    TicketService,
};
use tenantdesk_core::AppError;
use tenantdesk_infrastructure::{
    PostgresAuditRepository, PostgresDepartmentRepository, PostgresHourBankRepository,
    PostgresOrganizationRepository, PostgresTicketRepository, PostgresUserRepository,
};
use tower_sessions::cookie::SameSite;
use tower_sessions::cookie::time::Duration;
use tower_sessions::{Expiry, SessionManagerLayer};
use tower_sessions_sqlx_store::PostgresStore;

use crate::api_config::ApiConfig;
use crate::state::AppState;

pub async fn connect_and_migrate(config: &ApiConfig) -> Result<PgPool, AppError> {
    let pool = PgPoolOptions::new()
        .max_connections(config.database_max_connections)
        .connect(&config.database_url)
        .await
        .map_err(|error| AppError::Internal(format!("failed to connect to database: {error}")))?;

    sqlx::migrate!("../../crates/infrastructure/migrations")
        .run(&pool)
        .await
        .map_err(|error| AppError::Internal(format!("failed to run migrations: {error}")))?;

    Ok(pool)
}

pub async fn build_session_layer(
    pool: PgPool,
    cookie_secure: bool,
) -> Result<SessionManagerLayer<PostgresStore>, AppError> {
    let session_store = PostgresStore::new(pool)
        .with_table_name("tower_sessions")
        .map_err(|error| {
            AppError::Validation(format!("invalid session table name configuration: {error}"))
        })?;
    session_store.migrate().await.map_err(|error| {
        AppError::Internal(format!("failed to initialize session store: {error}"))
    })?;

    Ok(SessionManagerLayer::new(session_store)
        .with_secure(cookie_secure)
        .with_same_site(SameSite::Lax)
        .with_http_only(true)
        .with_expiry(Expiry::OnInactivity(Duration::minutes(30))))
}

pub fn build_app_state(pool: PgPool, config: &ApiConfig) -> AppState {
    let organization_repository = Arc::new(PostgresOrganizationRepository::new(pool.clone()));
    let department_repository = Arc::new(PostgresDepartmentRepository::new(pool.clone()));
    let user_repository = Arc::new(PostgresUserRepository::new(pool.clone()));
    let ticket_repository = Arc::new(PostgresTicketRepository::new(pool.clone()));
    let hour_bank_repository = Arc::new(PostgresHourBankRepository::new(pool.clone()));
    let audit_repository = Arc::new(PostgresAuditRepository::new(pool));

    let scope_resolver =
        ScopeResolver::new(organization_repository.clone(), department_repository.clone());

    AppState {
        identity_service: IdentityService::new(
            user_repository.clone(),
            organization_repository.clone(),
            department_repository.clone(),
        ),
        organization_service: OrganizationService::new(
            organization_repository.clone(),
            audit_repository.clone(),
            scope_resolver.clone(),
        ),
        department_service: DepartmentService::new(
            department_repository.clone(),
            organization_repository.clone(),
            user_repository.clone(),
            audit_repository.clone(),
            scope_resolver,
        ),
        ticket_service: TicketService::new(
            ticket_repository,
            organization_repository.clone(),
            department_repository,
            user_repository,
            audit_repository.clone(),
        ),
        hour_bank_service: HourBankService::new(
            hour_bank_repository,
            organization_repository,
            audit_repository,
        ),
        frontend_url: config.frontend_url.clone(),
        bootstrap_token: config.bootstrap_token.clone(),
    }
}
