use async_trait::async_trait;
use tenantdesk_core::{AppResult, OrganizationId, UserId};
use tenantdesk_domain::AuditAction;
use tracing::warn;

/// Immutable audit event payload emitted by application services.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AuditEvent {
    /// Organization the affected record belongs to.
    pub organization_id: Option<OrganizationId>,
    /// User that performed the action.
    pub actor_id: UserId,
    /// Stable audit action identifier.
    pub action: AuditAction,
    /// Resource type label.
    pub resource_type: String,
    /// Resource identifier.
    pub resource_id: String,
    /// Optional audit detail payload.
    pub detail: Option<String>,
}

/// Port for persisting append-only audit events.
#[async_trait]
pub trait AuditRepository: Send + Sync {
    /// Persists one audit event.
    async fn append_event(&self, event: AuditEvent) -> AppResult<()>;
}

/// Appends an event describing a change that has already been committed.
///
/// A failed append is logged at warn level and never fails the caller.
pub async fn append_committed_event(repository: &dyn AuditRepository, event: AuditEvent) {
    let action = event.action;
    let resource_type = event.resource_type.clone();
    let resource_id = event.resource_id.clone();

    if let Err(error) = repository.append_event(event).await {
        warn!(
            action = action.as_str(),
            %resource_type,
            %resource_id,
            %error,
            "failed to append audit event for committed change"
        );
    }
}
