//! Application services and ports.

#![forbid(unsafe_code)]

mod department_service;
mod hour_bank_service;
mod identity_service;
mod organization_service;
pub mod permission_resolver;
mod scope_resolver;
mod ticket_service;
pub mod tenant_guard;
mod tenant_ports;

#[cfg(test)]
mod test_support;

pub use department_service::{CreateDepartmentInput, DepartmentService, UpdateDepartmentInput};
pub use hour_bank_service::{CreateHourBankRequestInput, HourBankService};
pub use identity_service::IdentityService;
pub use organization_service::OrganizationService;
pub use scope_resolver::ScopeResolver;
pub use tenant_ports::{
    AuditEvent, AuditRepository, DepartmentRepository, HourBankDecisionRecord,
    HourBankRepository, NewDepartment, NewOrganization, OrganizationRepository,
    ProcessedHourBankRequest, TicketAccessFilter, TicketQuery, TicketRepository, UserRepository,
};
pub use ticket_service::{
    CreateTicketInput, MAX_TICKET_PAGE_SIZE, TicketListFilter, TicketService, UpdateTicketInput,
};
