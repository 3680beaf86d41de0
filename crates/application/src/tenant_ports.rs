mod audit;
mod departments;
mod hour_banks;
mod organizations;
mod tickets;
mod users;

pub use audit::{AuditEvent, AuditRepository, append_committed_event};
pub use departments::{DepartmentRepository, NewDepartment};
pub use hour_banks::{HourBankDecisionRecord, HourBankRepository, ProcessedHourBankRequest};
pub use organizations::{NewOrganization, OrganizationRepository};
pub use tickets::{TicketAccessFilter, TicketQuery, TicketRepository};
pub use users::UserRepository;
