use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use tenantdesk_core::{AppError, AppResult, DepartmentId, NonEmptyString, OrganizationId, UserId};

/// Stored values used to build a department.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DepartmentInput {
    /// Department id.
    pub id: DepartmentId,
    /// Owning organization.
    pub organization_id: OrganizationId,
    /// Department name.
    pub name: String,
    /// Optional parent department.
    pub parent_id: Option<DepartmentId>,
    /// Optional manager user.
    pub manager_id: Option<UserId>,
    /// Active flag.
    pub is_active: bool,
    /// Creation timestamp.
    pub created_at: DateTime<Utc>,
    /// Last update timestamp.
    pub updated_at: DateTime<Utc>,
}

/// Sub-unit of an organization.
///
/// The owning organization is fixed at construction; there is no setter for
/// it, so a department can never move between tenants.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Department {
    id: DepartmentId,
    organization_id: OrganizationId,
    name: NonEmptyString,
    parent_id: Option<DepartmentId>,
    manager_id: Option<UserId>,
    is_active: bool,
    created_at: DateTime<Utc>,
    updated_at: DateTime<Utc>,
}

impl Department {
    /// Creates a department with validated fields.
    pub fn new(input: DepartmentInput) -> AppResult<Self> {
        if input.parent_id == Some(input.id) {
            return Err(AppError::Validation(format!(
                "department '{}' cannot be its own parent",
                input.id
            )));
        }

        Ok(Self {
            id: input.id,
            organization_id: input.organization_id,
            name: NonEmptyString::new(input.name)?,
            parent_id: input.parent_id,
            manager_id: input.manager_id,
            is_active: input.is_active,
            created_at: input.created_at,
            updated_at: input.updated_at,
        })
    }

    /// Returns the department id.
    #[must_use]
    pub fn id(&self) -> DepartmentId {
        self.id
    }

    /// Returns the owning organization.
    #[must_use]
    pub fn organization_id(&self) -> OrganizationId {
        self.organization_id
    }

    /// Returns the department name.
    #[must_use]
    pub fn name(&self) -> &NonEmptyString {
        &self.name
    }

    /// Returns the parent department.
    #[must_use]
    pub fn parent_id(&self) -> Option<DepartmentId> {
        self.parent_id
    }

    /// Returns the manager user.
    #[must_use]
    pub fn manager_id(&self) -> Option<UserId> {
        self.manager_id
    }

    /// Returns whether the department is active.
    #[must_use]
    pub fn is_active(&self) -> bool {
        self.is_active
    }

    /// Returns the creation timestamp.
    #[must_use]
    pub fn created_at(&self) -> DateTime<Utc> {
        self.created_at
    }

    /// Returns the last update timestamp.
    #[must_use]
    pub fn updated_at(&self) -> DateTime<Utc> {
        self.updated_at
    }

    /// Renames the department.
    pub fn rename(&mut self, name: impl Into<String>) -> AppResult<()> {
        self.name = NonEmptyString::new(name)?;
        Ok(())
    }

    /// Moves the department under another parent of the same organization.
    pub fn set_parent(&mut self, parent: Option<&Department>) -> AppResult<()> {
        match parent {
            Some(parent) if parent.id == self.id => Err(AppError::Validation(format!(
                "department '{}' cannot be its own parent",
                self.id
            ))),
            Some(parent) if parent.organization_id != self.organization_id => {
                Err(AppError::Validation(format!(
                    "parent department '{}' belongs to a different organization",
                    parent.id
                )))
            }
            Some(parent) => {
                self.parent_id = Some(parent.id);
                Ok(())
            }
            None => {
                self.parent_id = None;
                Ok(())
            }
        }
    }

    /// Sets or clears the manager.
    pub fn set_manager(&mut self, manager_id: Option<UserId>) {
        self.manager_id = manager_id;
    }

    /// Activates or deactivates the department.
    pub fn set_active(&mut self, is_active: bool) {
        self.is_active = is_active;
    }

    /// Stamps the update time.
    pub fn touch(&mut self, now: DateTime<Utc>) {
        self.updated_at = now;
    }
}
