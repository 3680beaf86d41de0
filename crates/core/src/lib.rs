//! Shared primitives for all Rust crates in Tenantdesk.

#![forbid(unsafe_code)]

/// Authentication primitives shared across services.
pub mod auth;
mod ids;

use serde::{Deserialize, Serialize};
use thiserror::Error;

pub use auth::UserIdentity;
pub use ids::{
    CompanyId, DepartmentId, HourBankId, HourBankRequestId, OrganizationId, RoleId, TicketId,
    UserId,
};

/// Result type used across Tenantdesk crates.
pub type AppResult<T> = Result<T, AppError>;

/// A validated non-empty UTF-8 string.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct NonEmptyString(String);

impl NonEmptyString {
    /// Creates a validated non-empty string.
    pub fn new(value: impl Into<String>) -> AppResult<Self> {
        let value = value.into();
        if value.trim().is_empty() {
            return Err(AppError::Validation(
                "value must not be empty or whitespace".to_owned(),
            ));
        }

        Ok(Self(value.trim().to_owned()))
    }

    /// Returns the underlying string slice.
    #[must_use]
    pub fn as_str(&self) -> &str {
        self.0.as_str()
    }
}

impl From<NonEmptyString> for String {
    fn from(value: NonEmptyString) -> Self {
        value.0
    }
}

impl std::fmt::Display for NonEmptyString {
    fn fmt(&self, formatter: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        formatter.write_str(self.0.as_str())
    }
}

/// Common application error categories.
///
/// The authorization variants are kept distinct so callers can tell a scope
/// denial from a missing permission or an invalid cross-tenant request
/// without parsing the message.
#[derive(Debug, Error)]
pub enum AppError {
    /// Invalid input or violated invariant.
    #[error("validation error: {0}")]
    Validation(String),

    /// Requested resource does not exist or is not visible to the actor.
    #[error("not found: {0}")]
    NotFound(String),

    /// Write operation conflicts with existing state.
    #[error("conflict: {0}")]
    Conflict(String),

    /// No actor could be resolved for the request.
    #[error("unauthorized: {0}")]
    Unauthorized(String),

    /// Actor is authenticated but blocked by a permission or ownership rule.
    #[error("forbidden: {0}")]
    Forbidden(String),

    /// Actor's organization or department scope does not cover the target.
    #[error("scope denied: {0}")]
    ScopeDenied(String),

    /// A tenant-type precondition of a cross-tenant operation is not met.
    #[error("invalid cross-tenant operation: {0}")]
    InvalidCrossTenantOperation(String),

    /// Requested state change is not allowed from the current state.
    #[error("conflicting state transition: {0}")]
    ConflictingStateTransition(String),

    /// Internal unexpected error.
    #[error("internal error: {0}")]
    Internal(String),
}
