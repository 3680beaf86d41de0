use axum::Json;
use axum::extract::{Extension, Path, Query, State};
use axum::http::StatusCode;
use tenantdesk_domain::Actor;

use crate::error::ApiResult;
use crate::state::AppState;

mod departments;
mod health;
mod hour_banks;
mod organizations;
mod tickets;

pub use departments::{
    create_department_handler, get_department_handler, list_departments_handler,
    list_organization_departments_handler, update_department_handler,
};
pub use health::health_handler;
pub use hour_banks::{
    create_hour_bank_request_handler, get_hour_bank_request_handler,
    list_hour_bank_requests_handler, list_hour_banks_handler, process_hour_bank_request_handler,
};
pub use organizations::{
    create_organization_handler, get_organization_handler, list_organizations_handler,
    update_organization_status_handler,
};
pub use tickets::{
    assign_technician_handler, assign_ticket_handler, create_ticket_handler, get_ticket_handler,
    list_tickets_handler, update_ticket_handler,
};
