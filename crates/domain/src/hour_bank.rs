use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use tenantdesk_core::{
    AppError, AppResult, CompanyId, HourBankId, HourBankRequestId, OrganizationId, UserId,
};

/// Stored values used to build an hour bank.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HourBankInput {
    /// Bank id.
    pub id: HourBankId,
    /// Owning organization.
    pub organization_id: OrganizationId,
    /// Customer company.
    pub company_id: CompanyId,
    /// Hours purchased.
    pub total_hours: Decimal,
    /// Hours consumed.
    pub used_hours: Decimal,
    /// Hourly rate.
    pub hourly_rate: Decimal,
    /// Active flag.
    pub is_active: bool,
    /// Creation timestamp.
    pub created_at: DateTime<Utc>,
    /// Last update timestamp.
    pub updated_at: DateTime<Utc>,
}

/// Prepaid pool of service hours for one organization and company.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct HourBank {
    id: HourBankId,
    organization_id: OrganizationId,
    company_id: CompanyId,
    total_hours: Decimal,
    used_hours: Decimal,
    hourly_rate: Decimal,
    is_active: bool,
    created_at: DateTime<Utc>,
    updated_at: DateTime<Utc>,
}

impl HourBank {
    /// Creates an hour bank from stored values.
    pub fn new(input: HourBankInput) -> AppResult<Self> {
        if input.total_hours.is_sign_negative() || input.used_hours.is_sign_negative() {
            return Err(AppError::Validation(format!(
                "hour bank '{}' cannot hold negative hours",
                input.id
            )));
        }

        Ok(Self {
            id: input.id,
            organization_id: input.organization_id,
            company_id: input.company_id,
            total_hours: input.total_hours,
            used_hours: input.used_hours,
            hourly_rate: input.hourly_rate,
            is_active: input.is_active,
            created_at: input.created_at,
            updated_at: input.updated_at,
        })
    }

    /// Returns the bank id.
    #[must_use]
    pub fn id(&self) -> HourBankId {
        self.id
    }

    /// Returns the owning organization.
    #[must_use]
    pub fn organization_id(&self) -> OrganizationId {
        self.organization_id
    }

    /// Returns the customer company.
    #[must_use]
    pub fn company_id(&self) -> CompanyId {
        self.company_id
    }

    /// Returns hours purchased.
    #[must_use]
    pub fn total_hours(&self) -> Decimal {
        self.total_hours
    }

    /// Returns hours consumed.
    #[must_use]
    pub fn used_hours(&self) -> Decimal {
        self.used_hours
    }

    /// Returns hours still available.
    #[must_use]
    pub fn remaining_hours(&self) -> Decimal {
        self.total_hours - self.used_hours
    }

    /// Returns the hourly rate.
    #[must_use]
    pub fn hourly_rate(&self) -> Decimal {
        self.hourly_rate
    }

    /// Returns whether the bank is active.
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

    /// Adds approved hours; a rate carried by the request replaces the bank rate.
    pub fn credit(&mut self, hours: Decimal, hourly_rate: Option<Decimal>, now: DateTime<Utc>) {
        self.total_hours += hours;
        if let Some(rate) = hourly_rate {
            self.hourly_rate = rate;
        }
        self.updated_at = now;
    }
}

/// Request lifecycle state.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum HourBankRequestStatus {
    /// Awaiting a decision.
    Pending,
    /// Hours were credited.
    Approved,
    /// Request declined.
    Rejected,
}

impl HourBankRequestStatus {
    /// Returns a stable storage value for this status.
    #[must_use]
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Pending => "pending",
            Self::Approved => "approved",
            Self::Rejected => "rejected",
        }
    }

    /// Parses a stored status.
    pub fn parse(value: &str) -> AppResult<Self> {
        match value {
            "pending" => Ok(Self::Pending),
            "approved" => Ok(Self::Approved),
            "rejected" => Ok(Self::Rejected),
            _ => Err(AppError::Validation(format!(
                "unknown hour bank request status '{value}'"
            ))),
        }
    }
}

/// Approver decision on a pending request.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum HourBankDecision {
    /// Credit the hours.
    Approve,
    /// Decline the request.
    Reject,
}

impl HourBankDecision {
    /// Parses a transport decision value.
    pub fn parse(value: &str) -> AppResult<Self> {
        match value {
            "approve" => Ok(Self::Approve),
            "reject" => Ok(Self::Reject),
            _ => Err(AppError::Validation(format!(
                "decision must be either 'approve' or 'reject', got '{value}'"
            ))),
        }
    }

    /// Returns the status the request moves to.
    #[must_use]
    pub fn target_status(&self) -> HourBankRequestStatus {
        match self {
            Self::Approve => HourBankRequestStatus::Approved,
            Self::Reject => HourBankRequestStatus::Rejected,
        }
    }
}

/// Validated request ready to be persisted.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewHourBankRequest {
    organization_id: OrganizationId,
    company_id: CompanyId,
    requested_hours: Decimal,
    hourly_rate: Option<Decimal>,
    justification: Option<String>,
    requested_by: UserId,
    created_at: DateTime<Utc>,
}

impl NewHourBankRequest {
    /// Validates a new request.
    pub fn new(
        organization_id: OrganizationId,
        company_id: CompanyId,
        requested_hours: Decimal,
        hourly_rate: Option<Decimal>,
        justification: Option<String>,
        requested_by: UserId,
        created_at: DateTime<Utc>,
    ) -> AppResult<Self> {
        if requested_hours <= Decimal::ZERO {
            return Err(AppError::Validation(
                "requested hours must be greater than zero".to_owned(),
            ));
        }

        if hourly_rate.is_some_and(|rate| rate.is_sign_negative()) {
            return Err(AppError::Validation(
                "hourly rate must not be negative".to_owned(),
            ));
        }

        Ok(Self {
            organization_id,
            company_id,
            requested_hours,
            hourly_rate,
            justification: justification
                .map(|value| value.trim().to_owned())
                .filter(|value| !value.is_empty()),
            requested_by,
            created_at,
        })
    }

    /// Returns the owning organization.
    #[must_use]
    pub fn organization_id(&self) -> OrganizationId {
        self.organization_id
    }

    /// Returns the customer company.
    #[must_use]
    pub fn company_id(&self) -> CompanyId {
        self.company_id
    }

    /// Returns requested hours.
    #[must_use]
    pub fn requested_hours(&self) -> Decimal {
        self.requested_hours
    }

    /// Returns the proposed hourly rate.
    #[must_use]
    pub fn hourly_rate(&self) -> Option<Decimal> {
        self.hourly_rate
    }

    /// Returns the justification.
    #[must_use]
    pub fn justification(&self) -> Option<&str> {
        self.justification.as_deref()
    }

    /// Returns the requesting user.
    #[must_use]
    pub fn requested_by(&self) -> UserId {
        self.requested_by
    }

    /// Returns the creation timestamp.
    #[must_use]
    pub fn created_at(&self) -> DateTime<Utc> {
        self.created_at
    }
}

/// Stored values used to build an hour bank request.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HourBankRequestInput {
    /// Request id.
    pub id: HourBankRequestId,
    /// Owning organization.
    pub organization_id: OrganizationId,
    /// Customer company.
    pub company_id: CompanyId,
    /// Requested hours.
    pub requested_hours: Decimal,
    /// Proposed hourly rate.
    pub hourly_rate: Option<Decimal>,
    /// Free-form justification.
    pub justification: Option<String>,
    /// Lifecycle state.
    pub status: HourBankRequestStatus,
    /// Requesting user.
    pub requested_by: UserId,
    /// Deciding user.
    pub approver_id: Option<UserId>,
    /// Decision notes.
    pub decision_notes: Option<String>,
    /// Creation timestamp.
    pub created_at: DateTime<Utc>,
    /// Decision timestamp.
    pub processed_at: Option<DateTime<Utc>>,
}

/// Request to add hours to a bank.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct HourBankRequest {
    id: HourBankRequestId,
    organization_id: OrganizationId,
    company_id: CompanyId,
    requested_hours: Decimal,
    hourly_rate: Option<Decimal>,
    justification: Option<String>,
    status: HourBankRequestStatus,
    requested_by: UserId,
    approver_id: Option<UserId>,
    decision_notes: Option<String>,
    created_at: DateTime<Utc>,
    processed_at: Option<DateTime<Utc>>,
}

impl HourBankRequest {
    /// Creates a request from stored values.
    #[must_use]
    pub fn new(input: HourBankRequestInput) -> Self {
        Self {
            id: input.id,
            organization_id: input.organization_id,
            company_id: input.company_id,
            requested_hours: input.requested_hours,
            hourly_rate: input.hourly_rate,
            justification: input.justification,
            status: input.status,
            requested_by: input.requested_by,
            approver_id: input.approver_id,
            decision_notes: input.decision_notes,
            created_at: input.created_at,
            processed_at: input.processed_at,
        }
    }

    /// Materializes a freshly inserted request.
    #[must_use]
    pub fn from_new(id: HourBankRequestId, request: NewHourBankRequest) -> Self {
        Self {
            id,
            organization_id: request.organization_id,
            company_id: request.company_id,
            requested_hours: request.requested_hours,
            hourly_rate: request.hourly_rate,
            justification: request.justification,
            status: HourBankRequestStatus::Pending,
            requested_by: request.requested_by,
            approver_id: None,
            decision_notes: None,
            created_at: request.created_at,
            processed_at: None,
        }
    }

    /// Returns the request id.
    #[must_use]
    pub fn id(&self) -> HourBankRequestId {
        self.id
    }

    /// Returns the owning organization.
    #[must_use]
    pub fn organization_id(&self) -> OrganizationId {
        self.organization_id
    }

    /// Returns the customer company.
    #[must_use]
    pub fn company_id(&self) -> CompanyId {
        self.company_id
    }

    /// Returns requested hours.
    #[must_use]
    pub fn requested_hours(&self) -> Decimal {
        self.requested_hours
    }

    /// Returns the proposed hourly rate.
    #[must_use]
    pub fn hourly_rate(&self) -> Option<Decimal> {
        self.hourly_rate
    }

    /// Returns the justification.
    #[must_use]
    pub fn justification(&self) -> Option<&str> {
        self.justification.as_deref()
    }

    /// Returns the lifecycle state.
    #[must_use]
    pub fn status(&self) -> HourBankRequestStatus {
        self.status
    }

    /// Returns the requesting user.
    #[must_use]
    pub fn requested_by(&self) -> UserId {
        self.requested_by
    }

    /// Returns the deciding user.
    #[must_use]
    pub fn approver_id(&self) -> Option<UserId> {
        self.approver_id
    }

    /// Returns decision notes.
    #[must_use]
    pub fn decision_notes(&self) -> Option<&str> {
        self.decision_notes.as_deref()
    }

    /// Returns the creation timestamp.
    #[must_use]
    pub fn created_at(&self) -> DateTime<Utc> {
        self.created_at
    }

    /// Returns the decision timestamp.
    #[must_use]
    pub fn processed_at(&self) -> Option<DateTime<Utc>> {
        self.processed_at
    }

    /// Fails unless the request still awaits a decision.
    pub fn ensure_pending(&self) -> AppResult<()> {
        if self.status != HourBankRequestStatus::Pending {
            return Err(AppError::ConflictingStateTransition(format!(
                "hour bank request '{}' was already {}",
                self.id,
                self.status.as_str()
            )));
        }

        Ok(())
    }

    /// Records a decision; only a pending request can be decided.
    pub fn decide(
        &mut self,
        decision: HourBankDecision,
        approver_id: UserId,
        notes: Option<String>,
        now: DateTime<Utc>,
    ) -> AppResult<()> {
        self.ensure_pending()?;
        self.status = decision.target_status();
        self.approver_id = Some(approver_id);
        self.decision_notes = notes;
        self.processed_at = Some(now);
        Ok(())
    }
}
