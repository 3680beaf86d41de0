//! Pre-flight tenant gates for handlers that address an organization or
//! department directly.
//!
//! Both gates are pure. A missing actor is always [`AppError::Unauthorized`];
//! a present actor outside the target tenant is [`AppError::ScopeDenied`].

use tenantdesk_core::{AppError, AppResult, DepartmentId, OrganizationId};
use tenantdesk_domain::{Actor, EffectiveScope};

/// Admits the actor to an organization.
///
/// Global actors pass for any target. Without a target the actor only needs an
/// organization of its own; with one, the target must be that organization.
pub fn require_organization_access(
    actor: Option<&Actor>,
    target: Option<OrganizationId>,
) -> AppResult<&Actor> {
    let actor = authenticated(actor)?;
    if actor.scope().is_global() {
        return Ok(actor);
    }

    let own = actor.scope().own_organization();
    match (target, own) {
        (_, None) => Err(AppError::ScopeDenied(format!(
            "user '{}' is not assigned to an organization",
            actor.id()
        ))),
        (None, Some(_)) => Ok(actor),
        (Some(target), Some(own)) if target == own => Ok(actor),
        (Some(target), Some(_)) => Err(AppError::ScopeDenied(format!(
            "organization '{target}' is outside the scope of user '{}'",
            actor.id()
        ))),
    }
}

/// Admits the actor to a department.
///
/// Global and cross-department actors pass for any target. Otherwise the actor
/// needs a department of its own and the target, when given, must be it.
pub fn require_department_access(
    actor: Option<&Actor>,
    target: Option<DepartmentId>,
) -> AppResult<&Actor> {
    let actor = authenticated(actor)?;
    if matches!(
        actor.scope(),
        EffectiveScope::Global | EffectiveScope::CrossDepartments { .. }
    ) {
        return Ok(actor);
    }

    let own = actor.scope().own_department();
    match (target, own) {
        (_, None) => Err(AppError::ScopeDenied(format!(
            "user '{}' is not assigned to a department",
            actor.id()
        ))),
        (None, Some(_)) => Ok(actor),
        (Some(target), Some(own)) if target == own => Ok(actor),
        (Some(target), Some(_)) => Err(AppError::ScopeDenied(format!(
            "department '{target}' is outside the scope of user '{}'",
            actor.id()
        ))),
    }
}

fn authenticated(actor: Option<&Actor>) -> AppResult<&Actor> {
    actor.ok_or_else(|| AppError::Unauthorized("authentication required".to_owned()))
}
