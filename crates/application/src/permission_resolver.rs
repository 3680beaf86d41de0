//! Capability checks against an actor's flattened permission set.
//!
//! Super users and the `super_admin` role hold every permission; everyone else
//! needs the exact `resource:action` grant. Checks are pure and never touch
//! storage.

use tenantdesk_core::{AppError, AppResult};
use tenantdesk_domain::{Action, Actor, Permission, Resource, UserRole};

/// Returns whether the actor holds the permission.
#[must_use]
pub fn has_permission(actor: &Actor, resource: Resource, action: Action) -> bool {
    bypasses_permissions(actor) || actor.permissions().contains(resource, action)
}

/// Returns whether the actor holds at least one of the permissions.
///
/// An empty list is never satisfied, except by actors that bypass checks.
#[must_use]
pub fn has_any_permission(actor: &Actor, required: &[(Resource, Action)]) -> bool {
    bypasses_permissions(actor)
        || required
            .iter()
            .any(|(resource, action)| actor.permissions().contains(*resource, *action))
}

/// Fails with [`AppError::Forbidden`] unless the actor holds the permission.
pub fn require_permission(actor: &Actor, resource: Resource, action: Action) -> AppResult<()> {
    if has_permission(actor, resource, action) {
        return Ok(());
    }

    Err(AppError::Forbidden(format!(
        "user '{}' is missing permission '{}'",
        actor.id(),
        Permission::new(resource, action)
    )))
}

fn bypasses_permissions(actor: &Actor) -> bool {
    actor.is_super_user() || actor.role() == UserRole::SuperAdmin
}
