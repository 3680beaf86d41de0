use tenantdesk_application::{
    DepartmentService, HourBankService, IdentityService, OrganizationService, TicketService,
};

/// Shared application state.
#[derive(Clone)]
pub struct AppState {
    pub identity_service: IdentityService,
    pub organization_service: OrganizationService,
    pub department_service: DepartmentService,
    pub ticket_service: TicketService,
    pub hour_bank_service: HourBankService,
    pub frontend_url: String,
    pub bootstrap_token: String,
}
