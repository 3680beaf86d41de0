//! User account types used to build the per-request actor.

use serde::{Deserialize, Serialize};
use tenantdesk_core::{AppError, AppResult, DepartmentId, OrganizationId, UserId};

/// Seeded role assigned to every user account.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum UserRole {
    /// Unrestricted operator role.
    SuperAdmin,
    /// Administrator of the system-owner organization.
    SystemAdmin,
    /// Technician of the system-owner organization.
    SystemAgent,
    /// Administrator of a client company.
    CompanyAdmin,
    /// Manager inside a client company.
    CompanyManager,
    /// Support agent inside a client company.
    CompanyAgent,
    /// Regular client user.
    CompanyUser,
}

impl UserRole {
    /// Returns a stable storage value for this role.
    #[must_use]
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::SuperAdmin => "super_admin",
            Self::SystemAdmin => "system_admin",
            Self::SystemAgent => "system_agent",
            Self::CompanyAdmin => "company_admin",
            Self::CompanyManager => "company_manager",
            Self::CompanyAgent => "company_agent",
            Self::CompanyUser => "company_user",
        }
    }

    /// Parses a stored role value.
    pub fn parse(value: &str) -> AppResult<Self> {
        match value {
            "super_admin" => Ok(Self::SuperAdmin),
            "system_admin" => Ok(Self::SystemAdmin),
            "system_agent" => Ok(Self::SystemAgent),
            "company_admin" => Ok(Self::CompanyAdmin),
            "company_manager" => Ok(Self::CompanyManager),
            "company_agent" => Ok(Self::CompanyAgent),
            "company_user" => Ok(Self::CompanyUser),
            _ => Err(AppError::Validation(format!("unknown user role '{value}'"))),
        }
    }

    /// Returns whether the role administers its own organization's structure.
    #[must_use]
    pub fn manages_organization(&self) -> bool {
        matches!(
            self,
            Self::SuperAdmin | Self::SystemAdmin | Self::CompanyAdmin | Self::CompanyManager
        )
    }
}

/// Stored user account as read by the identity loader and assignment checks.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UserAccount {
    /// User id.
    pub id: UserId,
    /// Display name.
    pub display_name: String,
    /// Contact email.
    pub email: Option<String>,
    /// Seeded role.
    pub role: UserRole,
    /// Owning organization.
    pub organization_id: Option<OrganizationId>,
    /// Department inside the organization.
    pub department_id: Option<DepartmentId>,
    /// Unconditional global scope.
    pub is_super_user: bool,
    /// Scope spans every organization.
    pub can_cross_organizations: bool,
    /// Scope spans every department of the user's organization.
    pub can_cross_departments: bool,
    /// Inactive accounts cannot act.
    pub is_active: bool,
}

#[cfg(test)]
mod tests {
    use super::UserRole;

    #[test]
    fn role_storage_values_roundtrip() {
        for role in [
            UserRole::SuperAdmin,
            UserRole::SystemAdmin,
            UserRole::SystemAgent,
            UserRole::CompanyAdmin,
            UserRole::CompanyManager,
            UserRole::CompanyAgent,
            UserRole::CompanyUser,
        ] {
            assert!(matches!(UserRole::parse(role.as_str()), Ok(parsed) if parsed == role));
        }
    }

    #[test]
    fn only_admin_and_manager_roles_manage_organization() {
        assert!(UserRole::CompanyManager.manages_organization());
        assert!(UserRole::SystemAdmin.manages_organization());
        assert!(!UserRole::CompanyAgent.manages_organization());
        assert!(!UserRole::SystemAgent.manages_organization());
    }
}
