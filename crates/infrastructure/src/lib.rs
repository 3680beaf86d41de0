//! Infrastructure adapters for application ports.

#![forbid(unsafe_code)]

mod in_memory_tenant_store;
mod postgres_audit_repository;
mod postgres_department_repository;
mod postgres_hour_bank_repository;
mod postgres_organization_repository;
mod postgres_ticket_repository;
mod postgres_user_repository;

#[cfg(test)]
mod postgres_test_support;

pub use in_memory_tenant_store::InMemoryTenantStore;
pub use postgres_audit_repository::PostgresAuditRepository;
pub use postgres_department_repository::PostgresDepartmentRepository;
pub use postgres_hour_bank_repository::PostgresHourBankRepository;
pub use postgres_organization_repository::PostgresOrganizationRepository;
pub use postgres_ticket_repository::PostgresTicketRepository;
pub use postgres_user_repository::PostgresUserRepository;
