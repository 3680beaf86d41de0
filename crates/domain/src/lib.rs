//! Domain entities and invariants.

#![forbid(unsafe_code)]

mod actor;
mod department;
mod hour_bank;
mod organization;
mod security;
mod ticket;
mod user;

pub use actor::{Actor, ActorAttributes, EffectiveScope};
pub use department::{Department, DepartmentInput};
pub use hour_bank::{
    HourBank, HourBankDecision, HourBankInput, HourBankRequest, HourBankRequestInput,
    HourBankRequestStatus, NewHourBankRequest,
};
pub use organization::{Organization, OrganizationType};
pub use security::{Action, AuditAction, Permission, PermissionSet, Resource};
pub use ticket::{
    NewTicket, SlaDeadlines, Ticket, TicketInput, TicketPriority, TicketStatus, TicketType,
};
pub use user::{UserAccount, UserRole};
