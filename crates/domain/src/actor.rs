//! Per-request identity context.
//!
//! An [`Actor`] is built once per request from the stored user account, its
//! organization and the flattened role permissions. Every authorization
//! decision reads from this immutable value; nothing is cached beyond the
//! request that built it.

use serde::{Deserialize, Serialize};
use tenantdesk_core::{DepartmentId, OrganizationId, UserId};

use crate::{OrganizationType, PermissionSet, UserRole};

/// Tenant reach of an actor, derived once from the capability flags.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum EffectiveScope {
    /// Super user or cross-organization actor: every organization and department.
    Global,
    /// Cross-department actor: every department of its own organization.
    CrossDepartments {
        /// Own organization, if assigned.
        organization_id: Option<OrganizationId>,
        /// Own department, if assigned.
        department_id: Option<DepartmentId>,
    },
    /// Actor confined to its own department.
    Department {
        /// Own organization, if assigned.
        organization_id: Option<OrganizationId>,
        /// Own department.
        department_id: DepartmentId,
    },
    /// Actor with an organization but no department.
    Organization(OrganizationId),
    /// Actor with neither organization nor department.
    None,
}

impl EffectiveScope {
    /// Derives the scope from raw account flags.
    #[must_use]
    pub fn derive(
        is_super_user: bool,
        can_cross_organizations: bool,
        can_cross_departments: bool,
        organization_id: Option<OrganizationId>,
        department_id: Option<DepartmentId>,
    ) -> Self {
        if is_super_user || can_cross_organizations {
            return Self::Global;
        }

        if can_cross_departments {
            return Self::CrossDepartments {
                organization_id,
                department_id,
            };
        }

        match (organization_id, department_id) {
            (organization_id, Some(department_id)) => Self::Department {
                organization_id,
                department_id,
            },
            (Some(organization_id), None) => Self::Organization(organization_id),
            (None, None) => Self::None,
        }
    }

    /// Returns whether the scope is unconditionally global.
    #[must_use]
    pub fn is_global(&self) -> bool {
        matches!(self, Self::Global)
    }

    /// Own organization for non-global scopes.
    #[must_use]
    pub fn own_organization(&self) -> Option<OrganizationId> {
        match self {
            Self::Global | Self::None => None,
            Self::CrossDepartments {
                organization_id, ..
            }
            | Self::Department {
                organization_id, ..
            } => *organization_id,
            Self::Organization(organization_id) => Some(*organization_id),
        }
    }

    /// Own department for non-global scopes.
    #[must_use]
    pub fn own_department(&self) -> Option<DepartmentId> {
        match self {
            Self::Global | Self::None | Self::Organization(_) => None,
            Self::CrossDepartments { department_id, .. } => *department_id,
            Self::Department { department_id, .. } => Some(*department_id),
        }
    }

    /// Returns whether an organization-wide record of `organization_id`
    /// placed in `department_id` falls inside this scope.
    ///
    /// Department-confined actors see their own department and records with
    /// no department; organization-level scopes see every department.
    #[must_use]
    pub fn covers_record(
        &self,
        organization_id: OrganizationId,
        department_id: Option<DepartmentId>,
    ) -> bool {
        match self {
            Self::Global => true,
            Self::None => false,
            Self::Organization(own) => *own == organization_id,
            Self::CrossDepartments {
                organization_id: own,
                ..
            } => *own == Some(organization_id),
            Self::Department {
                organization_id: own_organization,
                department_id: own_department,
            } => {
                *own_organization == Some(organization_id)
                    && department_id.is_none_or(|value| value == *own_department)
            }
        }
    }
}

/// Attributes used to build an [`Actor`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ActorAttributes {
    /// User id.
    pub id: UserId,
    /// Display name.
    pub display_name: String,
    /// Seeded role.
    pub role: UserRole,
    /// Own organization.
    pub organization_id: Option<OrganizationId>,
    /// Type of the own organization.
    pub organization_type: Option<OrganizationType>,
    /// Own department.
    pub department_id: Option<DepartmentId>,
    /// Unconditional global scope.
    pub is_super_user: bool,
    /// Scope spans every organization.
    pub can_cross_organizations: bool,
    /// Scope spans every department of the own organization.
    pub can_cross_departments: bool,
    /// Flattened role permissions.
    pub permissions: PermissionSet,
}

/// Immutable identity context threaded through every authorization call.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Actor {
    id: UserId,
    display_name: String,
    role: UserRole,
    organization_id: Option<OrganizationId>,
    organization_type: Option<OrganizationType>,
    department_id: Option<DepartmentId>,
    is_super_user: bool,
    can_cross_organizations: bool,
    can_cross_departments: bool,
    permissions: PermissionSet,
    scope: EffectiveScope,
}

impl Actor {
    /// Builds the actor and computes its effective scope.
    #[must_use]
    pub fn new(attributes: ActorAttributes) -> Self {
        let scope = EffectiveScope::derive(
            attributes.is_super_user,
            attributes.can_cross_organizations,
            attributes.can_cross_departments,
            attributes.organization_id,
            attributes.department_id,
        );

        Self {
            id: attributes.id,
            display_name: attributes.display_name,
            role: attributes.role,
            organization_id: attributes.organization_id,
            organization_type: attributes.organization_type,
            department_id: attributes.department_id,
            is_super_user: attributes.is_super_user,
            can_cross_organizations: attributes.can_cross_organizations,
            can_cross_departments: attributes.can_cross_departments,
            permissions: attributes.permissions,
            scope,
        }
    }

    /// Returns the user id.
    #[must_use]
    pub fn id(&self) -> UserId {
        self.id
    }

    /// Returns the display name.
    #[must_use]
    pub fn display_name(&self) -> &str {
        self.display_name.as_str()
    }

    /// Returns the seeded role.
    #[must_use]
    pub fn role(&self) -> UserRole {
        self.role
    }

    /// Returns the own organization.
    #[must_use]
    pub fn organization_id(&self) -> Option<OrganizationId> {
        self.organization_id
    }

    /// Returns the type of the own organization.
    #[must_use]
    pub fn organization_type(&self) -> Option<OrganizationType> {
        self.organization_type
    }

    /// Returns the own department.
    #[must_use]
    pub fn department_id(&self) -> Option<DepartmentId> {
        self.department_id
    }

    /// Returns the super-user flag.
    #[must_use]
    pub fn is_super_user(&self) -> bool {
        self.is_super_user
    }

    /// Returns the cross-organization flag.
    #[must_use]
    pub fn can_cross_organizations(&self) -> bool {
        self.can_cross_organizations
    }

    /// Returns the cross-department flag.
    #[must_use]
    pub fn can_cross_departments(&self) -> bool {
        self.can_cross_departments
    }

    /// Returns the flattened permission set.
    #[must_use]
    pub fn permissions(&self) -> &PermissionSet {
        &self.permissions
    }

    /// Returns the effective scope.
    #[must_use]
    pub fn scope(&self) -> EffectiveScope {
        self.scope
    }

    /// Returns whether the actor belongs to the system-owner organization.
    #[must_use]
    pub fn belongs_to_system_owner(&self) -> bool {
        self.organization_type == Some(OrganizationType::SystemOwner)
    }
}
