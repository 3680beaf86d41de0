use std::sync::Arc;

use chrono::Utc;
use rust_decimal::Decimal;
use tenantdesk_core::{AppError, AppResult, CompanyId, HourBankRequestId, OrganizationId};
use tenantdesk_domain::{
    Action, Actor, AuditAction, HourBank, HourBankDecision, HourBankRequest,
    HourBankRequestStatus, NewHourBankRequest, Resource,
};

use crate::permission_resolver::require_permission;
use crate::tenant_ports::{
    AuditEvent, AuditRepository, HourBankDecisionRecord, HourBankRepository, OrganizationRepository,
    ProcessedHourBankRequest, append_committed_event,
};

/// Input payload for an hour-bank request.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CreateHourBankRequestInput {
    /// Target organization, the actor's own when absent.
    pub organization_id: Option<OrganizationId>,
    /// Customer company the hours are for.
    pub company_id: CompanyId,
    /// Hours requested.
    pub requested_hours: Decimal,
    /// Optional proposed rate.
    pub hourly_rate: Option<Decimal>,
    /// Optional justification.
    pub justification: Option<String>,
}

/// Application service for hour banks and their approval workflow.
///
/// Visibility is organization-level: global actors see every organization,
/// everyone else only their own.
#[derive(Clone)]
pub struct HourBankService {
    hour_bank_repository: Arc<dyn HourBankRepository>,
    organization_repository: Arc<dyn OrganizationRepository>,
    audit_repository: Arc<dyn AuditRepository>,
}

/// Organization reach for hour-bank reads.
enum OrganizationReach {
    All,
    One(OrganizationId),
    Nothing,
}

impl HourBankService {
    /// Creates the hour-bank service.
    #[must_use]
    pub fn new(
        hour_bank_repository: Arc<dyn HourBankRepository>,
        organization_repository: Arc<dyn OrganizationRepository>,
        audit_repository: Arc<dyn AuditRepository>,
    ) -> Self {
        Self {
            hour_bank_repository,
            organization_repository,
            audit_repository,
        }
    }

    /// Lists hour banks in the actor's organization scope.
    pub async fn list_hour_banks(&self, actor: &Actor) -> AppResult<Vec<HourBank>> {
        match reach(actor) {
            OrganizationReach::All => self.hour_bank_repository.list_hour_banks(None).await,
            OrganizationReach::One(organization_id) => {
                self.hour_bank_repository
                    .list_hour_banks(Some(organization_id))
                    .await
            }
            OrganizationReach::Nothing => Ok(Vec::new()),
        }
    }

    /// Lists hour-bank requests in the actor's organization scope.
    pub async fn list_hour_bank_requests(
        &self,
        actor: &Actor,
        status: Option<HourBankRequestStatus>,
    ) -> AppResult<Vec<HourBankRequest>> {
        match reach(actor) {
            OrganizationReach::All => self.hour_bank_repository.list_requests(None, status).await,
            OrganizationReach::One(organization_id) => {
                self.hour_bank_repository
                    .list_requests(Some(organization_id), status)
                    .await
            }
            OrganizationReach::Nothing => Ok(Vec::new()),
        }
    }

    /// Returns one request in the actor's organization scope.
    pub async fn get_hour_bank_request(
        &self,
        actor: &Actor,
        request_id: HourBankRequestId,
    ) -> AppResult<HourBankRequest> {
        self.hour_bank_repository
            .find_request(request_id)
            .await?
            .filter(|request| covers(actor, request.organization_id()))
            .ok_or_else(|| {
                AppError::NotFound(format!("hour bank request '{request_id}' not found"))
            })
    }

    /// Files a pending request for more hours.
    pub async fn create_hour_bank_request(
        &self,
        actor: &Actor,
        input: CreateHourBankRequestInput,
    ) -> AppResult<HourBankRequest> {
        require_permission(actor, Resource::HourBankRequests, Action::Create)?;

        let organization_id = input
            .organization_id
            .or(actor.organization_id())
            .ok_or_else(|| {
                AppError::Validation("an organization is required to request hours".to_owned())
            })?;

        if !covers(actor, organization_id) {
            return Err(AppError::ScopeDenied(format!(
                "cannot request hours for different organization '{organization_id}'"
            )));
        }

        if self
            .organization_repository
            .find_organization(organization_id)
            .await?
            .is_none()
        {
            return Err(AppError::Validation(format!(
                "organization '{organization_id}' does not exist"
            )));
        }

        let request = self
            .hour_bank_repository
            .create_request(NewHourBankRequest::new(
                organization_id,
                input.company_id,
                input.requested_hours,
                input.hourly_rate,
                input.justification,
                actor.id(),
                Utc::now(),
            )?)
            .await?;

        self.append_request_event(
            actor,
            &request,
            AuditAction::HourBankRequestCreated,
            Some(format!("{} hours", request.requested_hours())),
        )
        .await;

        Ok(request)
    }

    /// Approves or rejects a pending request.
    ///
    /// An approval credits the active bank for the request's organization and
    /// company, creating it when missing. Processing happens at most once: a
    /// request that is no longer pending, including one decided by a
    /// concurrent call, fails with
    /// [`AppError::ConflictingStateTransition`].
    pub async fn process_hour_bank_request(
        &self,
        actor: &Actor,
        request_id: HourBankRequestId,
        decision: HourBankDecision,
        notes: Option<String>,
    ) -> AppResult<ProcessedHourBankRequest> {
        require_permission(actor, Resource::HourBankRequests, Action::Approve)?;

        let request = self.get_hour_bank_request(actor, request_id).await?;
        request.ensure_pending()?;

        let processed = self
            .hour_bank_repository
            .process_request(
                request_id,
                HourBankDecisionRecord {
                    decision,
                    approver_id: actor.id(),
                    notes: notes
                        .map(|value| value.trim().to_owned())
                        .filter(|value| !value.is_empty()),
                    processed_at: Utc::now(),
                },
            )
            .await?;

        let (action, detail) = match decision {
            HourBankDecision::Approve => (
                AuditAction::HourBankRequestApproved,
                processed
                    .hour_bank
                    .as_ref()
                    .map(|bank| format!("credited hour bank '{}'", bank.id())),
            ),
            HourBankDecision::Reject => (AuditAction::HourBankRequestRejected, None),
        };
        self.append_request_event(actor, &processed.request, action, detail)
            .await;

        Ok(processed)
    }

    async fn append_request_event(
        &self,
        actor: &Actor,
        request: &HourBankRequest,
        action: AuditAction,
        detail: Option<String>,
    ) {
        append_committed_event(
            self.audit_repository.as_ref(),
            AuditEvent {
                organization_id: Some(request.organization_id()),
                actor_id: actor.id(),
                action,
                resource_type: "hour_bank_request".to_owned(),
                resource_id: request.id().to_string(),
                detail,
            },
        )
        .await;
    }
}

fn reach(actor: &Actor) -> OrganizationReach {
    if actor.scope().is_global() {
        return OrganizationReach::All;
    }

    match actor.scope().own_organization() {
        Some(organization_id) => OrganizationReach::One(organization_id),
        None => OrganizationReach::Nothing,
    }
}

fn covers(actor: &Actor, organization_id: OrganizationId) -> bool {
    match reach(actor) {
        OrganizationReach::All => true,
        OrganizationReach::One(own) => own == organization_id,
        OrganizationReach::Nothing => false,
    }
}

#[cfg(test)]
mod tests;
