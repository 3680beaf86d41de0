use std::collections::BTreeSet;
use std::fmt::{Display, Formatter};
use std::str::FromStr;

use serde::{Deserialize, Serialize};
use tenantdesk_core::AppError;

/// Resources guarded by permission checks.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Resource {
    /// Helpdesk tickets.
    Tickets,
    /// Organization departments.
    Departments,
    /// Tenant organizations.
    Organizations,
    /// User accounts.
    Users,
    /// Client companies serviced by the system owner.
    Clients,
    /// Prepaid hour banks.
    HourBanks,
    /// Requests to add hours to a bank.
    HourBankRequests,
    /// Reporting surfaces.
    Reports,
    /// RBAC roles.
    Roles,
}

impl Resource {
    /// Returns a stable storage value for this resource.
    #[must_use]
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Tickets => "tickets",
            Self::Departments => "departments",
            Self::Organizations => "organizations",
            Self::Users => "users",
            Self::Clients => "clients",
            Self::HourBanks => "hour_banks",
            Self::HourBankRequests => "hour_bank_requests",
            Self::Reports => "reports",
            Self::Roles => "roles",
        }
    }

    /// Returns all known resources.
    #[must_use]
    pub fn all() -> &'static [Self] {
        const ALL: &[Resource] = &[
            Resource::Tickets,
            Resource::Departments,
            Resource::Organizations,
            Resource::Users,
            Resource::Clients,
            Resource::HourBanks,
            Resource::HourBankRequests,
            Resource::Reports,
            Resource::Roles,
        ];

        ALL
    }
}

impl FromStr for Resource {
    type Err = AppError;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        Self::all()
            .iter()
            .copied()
            .find(|resource| resource.as_str() == value)
            .ok_or_else(|| AppError::Validation(format!("unknown resource value '{value}'")))
    }
}

/// Actions that can be performed on a resource.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Action {
    /// Create new records.
    Create,
    /// Read or list records.
    Read,
    /// Update existing records.
    Update,
    /// Delete or deactivate records.
    Delete,
    /// Assign records to users.
    Assign,
    /// Approve or reject pending requests.
    Approve,
    /// Full administrative control.
    Manage,
}

impl Action {
    /// Returns a stable storage value for this action.
    #[must_use]
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Create => "create",
            Self::Read => "read",
            Self::Update => "update",
            Self::Delete => "delete",
            Self::Assign => "assign",
            Self::Approve => "approve",
            Self::Manage => "manage",
        }
    }

    /// Returns all known actions.
    #[must_use]
    pub fn all() -> &'static [Self] {
        const ALL: &[Action] = &[
            Action::Create,
            Action::Read,
            Action::Update,
            Action::Delete,
            Action::Assign,
            Action::Approve,
            Action::Manage,
        ];

        ALL
    }
}

impl FromStr for Action {
    type Err = AppError;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        Self::all()
            .iter()
            .copied()
            .find(|action| action.as_str() == value)
            .ok_or_else(|| AppError::Validation(format!("unknown action value '{value}'")))
    }
}

/// A single `resource:action` grant.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct Permission {
    resource: Resource,
    action: Action,
}

impl Permission {
    /// Creates a permission from its parts.
    #[must_use]
    pub const fn new(resource: Resource, action: Action) -> Self {
        Self { resource, action }
    }

    /// Returns the guarded resource.
    #[must_use]
    pub fn resource(&self) -> Resource {
        self.resource
    }

    /// Returns the granted action.
    #[must_use]
    pub fn action(&self) -> Action {
        self.action
    }

    /// Parses a stored `resource:action` value.
    pub fn from_storage(value: &str) -> Result<Self, AppError> {
        Self::from_str(value)
    }
}

impl Display for Permission {
    fn fmt(&self, formatter: &mut Formatter<'_>) -> std::fmt::Result {
        write!(
            formatter,
            "{}:{}",
            self.resource.as_str(),
            self.action.as_str()
        )
    }
}

impl FromStr for Permission {
    type Err = AppError;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        let (resource, action) = value.split_once(':').ok_or_else(|| {
            AppError::Validation(format!(
                "permission '{value}' must use the 'resource:action' form"
            ))
        })?;

        Ok(Self::new(
            Resource::from_str(resource.trim())?,
            Action::from_str(action.trim())?,
        ))
    }
}

/// Flattened union of every permission granted through a user's roles.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PermissionSet(BTreeSet<Permission>);

impl PermissionSet {
    /// Creates an empty permission set.
    #[must_use]
    pub fn new() -> Self {
        Self(BTreeSet::new())
    }

    /// Returns whether the exact grant is present.
    #[must_use]
    pub fn contains(&self, resource: Resource, action: Action) -> bool {
        self.0.contains(&Permission::new(resource, action))
    }

    /// Adds one grant.
    pub fn insert(&mut self, permission: Permission) {
        self.0.insert(permission);
    }

    /// Iterates grants in stable order.
    pub fn iter(&self) -> impl Iterator<Item = &Permission> {
        self.0.iter()
    }

    /// Number of distinct grants.
    #[must_use]
    pub fn len(&self) -> usize {
        self.0.len()
    }

    /// Returns whether no grants are present.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

impl FromIterator<Permission> for PermissionSet {
    fn from_iter<T: IntoIterator<Item = Permission>>(iter: T) -> Self {
        Self(iter.into_iter().collect())
    }
}

/// Stable audit actions emitted by application use-cases.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AuditAction {
    /// Emitted when a ticket is created.
    TicketCreated,
    /// Emitted when ticket fields change.
    TicketUpdated,
    /// Emitted when a ticket assignee changes within its organization.
    TicketAssigned,
    /// Emitted when a system technician is assigned to a client ticket.
    TicketTechnicianAssigned,
    /// Emitted when a department is created.
    DepartmentCreated,
    /// Emitted when a department is updated.
    DepartmentUpdated,
    /// Emitted when a client organization is created.
    OrganizationCreated,
    /// Emitted when an organization is activated or deactivated.
    OrganizationStatusChanged,
    /// Emitted when hours are requested for a bank.
    HourBankRequestCreated,
    /// Emitted when an hour bank request is approved.
    HourBankRequestApproved,
    /// Emitted when an hour bank request is rejected.
    HourBankRequestRejected,
}

impl AuditAction {
    /// Returns a stable storage value for this action.
    #[must_use]
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::TicketCreated => "ticket.created",
            Self::TicketUpdated => "ticket.updated",
            Self::TicketAssigned => "ticket.assigned",
            Self::TicketTechnicianAssigned => "ticket.technician_assigned",
            Self::DepartmentCreated => "department.created",
            Self::DepartmentUpdated => "department.updated",
            Self::OrganizationCreated => "organization.created",
            Self::OrganizationStatusChanged => "organization.status_changed",
            Self::HourBankRequestCreated => "hour_bank_request.created",
            Self::HourBankRequestApproved => "hour_bank_request.approved",
            Self::HourBankRequestRejected => "hour_bank_request.rejected",
        }
    }
}

#[cfg(test)]
mod tests {
    use std::str::FromStr;

    use super::{Action, Permission, PermissionSet, Resource};

    #[test]
    fn permission_storage_value_uses_resource_action_form() {
        let permission = Permission::new(Resource::HourBankRequests, Action::Approve);
        assert_eq!(permission.to_string(), "hour_bank_requests:approve");

        let restored = Permission::from_str("hour_bank_requests:approve");
        assert!(matches!(restored, Ok(value) if value == permission));
    }

    #[test]
    fn unknown_permission_is_rejected() {
        assert!(Permission::from_str("tickets:teleport").is_err());
        assert!(Permission::from_str("dashboards:read").is_err());
        assert!(Permission::from_str("tickets").is_err());
    }

    #[test]
    fn permission_set_flattens_duplicates() {
        let set: PermissionSet = [
            Permission::new(Resource::Tickets, Action::Create),
            Permission::new(Resource::Tickets, Action::Create),
            Permission::new(Resource::Tickets, Action::Read),
        ]
        .into_iter()
        .collect();

        assert_eq!(set.len(), 2);
        assert!(set.contains(Resource::Tickets, Action::Read));
        assert!(!set.contains(Resource::Tickets, Action::Update));
    }
}
