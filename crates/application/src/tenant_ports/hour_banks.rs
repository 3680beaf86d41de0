use async_trait::async_trait;
use chrono::{DateTime, Utc};
use tenantdesk_core::{AppResult, HourBankRequestId, OrganizationId, UserId};
use tenantdesk_domain::{
    HourBank, HourBankDecision, HourBankRequest, HourBankRequestStatus, NewHourBankRequest,
};

/// Decision applied to a pending hour-bank request.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HourBankDecisionRecord {
    /// Approve or reject.
    pub decision: HourBankDecision,
    /// Deciding user.
    pub approver_id: UserId,
    /// Optional notes recorded with the decision.
    pub notes: Option<String>,
    /// Decision timestamp.
    pub processed_at: DateTime<Utc>,
}

/// Outcome of processing one request.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProcessedHourBankRequest {
    /// The request after the decision.
    pub request: HourBankRequest,
    /// The credited bank, for approvals.
    pub hour_bank: Option<HourBank>,
}

/// Port for hour banks and hour-bank requests.
#[async_trait]
pub trait HourBankRepository: Send + Sync {
    /// Lists hour banks, optionally restricted to one organization.
    async fn list_hour_banks(
        &self,
        organization_id: Option<OrganizationId>,
    ) -> AppResult<Vec<HourBank>>;

    /// Creates a pending request.
    async fn create_request(&self, request: NewHourBankRequest) -> AppResult<HourBankRequest>;

    /// Finds one request regardless of visibility.
    async fn find_request(
        &self,
        request_id: HourBankRequestId,
    ) -> AppResult<Option<HourBankRequest>>;

    /// Lists requests newest first, optionally restricted by organization and status.
    async fn list_requests(
        &self,
        organization_id: Option<OrganizationId>,
        status: Option<HourBankRequestStatus>,
    ) -> AppResult<Vec<HourBankRequest>>;

    /// Applies a decision to a pending request.
    ///
    /// The status change and, for approvals, the credit of the single active
    /// bank for the request's organization and company happen atomically.
    /// Exactly one of several concurrent calls for the same request succeeds;
    /// the others fail with
    /// [`tenantdesk_core::AppError::ConflictingStateTransition`].
    async fn process_request(
        &self,
        request_id: HourBankRequestId,
        decision: HourBankDecisionRecord,
    ) -> AppResult<ProcessedHourBankRequest>;
}
