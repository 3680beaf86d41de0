use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use tenantdesk_core::{AppError, AppResult, NonEmptyString, OrganizationId};

/// Tenant kind in the two-level hierarchy.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum OrganizationType {
    /// The single operator organization that services clients.
    SystemOwner,
    /// A client company serviced by the system owner.
    ClientCompany,
}

impl OrganizationType {
    /// Returns a stable storage value for this type.
    #[must_use]
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::SystemOwner => "system_owner",
            Self::ClientCompany => "client_company",
        }
    }

    /// Parses a stored organization type.
    pub fn parse(value: &str) -> AppResult<Self> {
        match value {
            "system_owner" => Ok(Self::SystemOwner),
            "client_company" => Ok(Self::ClientCompany),
            _ => Err(AppError::Validation(format!(
                "unknown organization type '{value}'"
            ))),
        }
    }
}

/// Top-level tenant.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Organization {
    id: OrganizationId,
    name: NonEmptyString,
    organization_type: OrganizationType,
    is_active: bool,
    created_at: DateTime<Utc>,
}

impl Organization {
    /// Creates an organization from stored values.
    pub fn new(
        id: OrganizationId,
        name: impl Into<String>,
        organization_type: OrganizationType,
        is_active: bool,
        created_at: DateTime<Utc>,
    ) -> AppResult<Self> {
        Ok(Self {
            id,
            name: NonEmptyString::new(name)?,
            organization_type,
            is_active,
            created_at,
        })
    }

    /// Returns the organization id.
    #[must_use]
    pub fn id(&self) -> OrganizationId {
        self.id
    }

    /// Returns the display name.
    #[must_use]
    pub fn name(&self) -> &NonEmptyString {
        &self.name
    }

    /// Returns the tenant kind.
    #[must_use]
    pub fn organization_type(&self) -> OrganizationType {
        self.organization_type
    }

    /// Returns whether this is the operator organization.
    #[must_use]
    pub fn is_system_owner(&self) -> bool {
        self.organization_type == OrganizationType::SystemOwner
    }

    /// Returns whether the organization is active.
    #[must_use]
    pub fn is_active(&self) -> bool {
        self.is_active
    }

    /// Returns the creation timestamp.
    #[must_use]
    pub fn created_at(&self) -> DateTime<Utc> {
        self.created_at
    }

    /// Activates or deactivates the organization.
    ///
    /// The system owner is never deactivated.
    pub fn set_active(&mut self, is_active: bool) -> AppResult<()> {
        if !is_active && self.is_system_owner() {
            return Err(AppError::Validation(
                "the system-owner organization cannot be deactivated".to_owned(),
            ));
        }

        self.is_active = is_active;
        Ok(())
    }
}
