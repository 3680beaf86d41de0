use std::str::FromStr;

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use tenantdesk_application::{CreateHourBankRequestInput, ProcessedHourBankRequest};
use tenantdesk_core::{AppError, CompanyId, OrganizationId};
use tenantdesk_domain::{HourBank, HourBankRequest};
use ts_rs::TS;

/// API representation of an hour bank. Amounts are decimal strings.
#[derive(Debug, Serialize, TS)]
#[ts(
    export,
    export_to = "../../../packages/api-types/src/generated/hour-bank-response.ts"
)]
pub struct HourBankResponse {
    pub id: i64,
    pub organization_id: i64,
    pub company_id: i64,
    pub total_hours: String,
    pub used_hours: String,
    pub remaining_hours: String,
    pub hourly_rate: String,
    pub is_active: bool,
    pub updated_at: String,
}

impl From<HourBank> for HourBankResponse {
    fn from(value: HourBank) -> Self {
        Self {
            id: value.id().as_i64(),
            organization_id: value.organization_id().as_i64(),
            company_id: value.company_id().as_i64(),
            total_hours: value.total_hours().to_string(),
            used_hours: value.used_hours().to_string(),
            remaining_hours: value.remaining_hours().to_string(),
            hourly_rate: value.hourly_rate().to_string(),
            is_active: value.is_active(),
            updated_at: value.updated_at().to_rfc3339(),
        }
    }
}

/// API representation of an hour-bank request.
#[derive(Debug, Serialize, TS)]
#[ts(
    export,
    export_to = "../../../packages/api-types/src/generated/hour-bank-request-response.ts"
)]
pub struct HourBankRequestResponse {
    pub id: i64,
    pub organization_id: i64,
    pub company_id: i64,
    pub requested_hours: String,
    pub hourly_rate: Option<String>,
    pub justification: Option<String>,
    pub status: String,
    pub requested_by: i64,
    pub approver_id: Option<i64>,
    pub decision_notes: Option<String>,
    pub created_at: String,
    pub processed_at: Option<String>,
}

impl From<HourBankRequest> for HourBankRequestResponse {
    fn from(value: HourBankRequest) -> Self {
        Self {
            id: value.id().as_i64(),
            organization_id: value.organization_id().as_i64(),
            company_id: value.company_id().as_i64(),
            requested_hours: value.requested_hours().to_string(),
            hourly_rate: value.hourly_rate().map(|rate| rate.to_string()),
            justification: value.justification().map(ToOwned::to_owned),
            status: value.status().as_str().to_owned(),
            requested_by: value.requested_by().as_i64(),
            approver_id: value.approver_id().map(|id| id.as_i64()),
            decision_notes: value.decision_notes().map(ToOwned::to_owned),
            created_at: value.created_at().to_rfc3339(),
            processed_at: value.processed_at().map(|at| at.to_rfc3339()),
        }
    }
}

/// Outcome of an approval or rejection.
#[derive(Debug, Serialize, TS)]
#[ts(
    export,
    export_to = "../../../packages/api-types/src/generated/hour-bank-decision-response.ts"
)]
pub struct HourBankDecisionResponse {
    pub request: HourBankRequestResponse,
    pub hour_bank: Option<HourBankResponse>,
}

impl From<ProcessedHourBankRequest> for HourBankDecisionResponse {
    fn from(value: ProcessedHourBankRequest) -> Self {
        Self {
            request: value.request.into(),
            hour_bank: value.hour_bank.map(HourBankResponse::from),
        }
    }
}

/// Query parameters for hour-bank request listing.
#[derive(Debug, Default, Deserialize)]
pub struct HourBankRequestListQuery {
    pub status: Option<String>,
}

/// Incoming payload for an hour-bank request.
#[derive(Debug, Deserialize, TS)]
#[ts(
    export,
    export_to = "../../../packages/api-types/src/generated/create-hour-bank-request-request.ts"
)]
pub struct CreateHourBankRequestRequest {
    #[ts(optional)]
    pub organization_id: Option<i64>,
    pub company_id: i64,
    pub requested_hours: String,
    #[ts(optional)]
    pub hourly_rate: Option<String>,
    #[ts(optional)]
    pub justification: Option<String>,
}

fn parse_amount(field: &str, value: &str) -> Result<Decimal, AppError> {
    Decimal::from_str(value.trim())
        .map_err(|error| AppError::Validation(format!("invalid {field} '{value}': {error}")))
}

impl TryFrom<CreateHourBankRequestRequest> for CreateHourBankRequestInput {
    type Error = AppError;

    fn try_from(value: CreateHourBankRequestRequest) -> Result<Self, Self::Error> {
        Ok(Self {
            organization_id: value.organization_id.map(OrganizationId::new),
            company_id: CompanyId::new(value.company_id),
            requested_hours: parse_amount("requested_hours", value.requested_hours.as_str())?,
            hourly_rate: value
                .hourly_rate
                .as_deref()
                .map(|rate| parse_amount("hourly_rate", rate))
                .transpose()?,
            justification: value.justification,
        })
    }
}

/// Incoming payload for approving or rejecting a request.
#[derive(Debug, Deserialize, TS)]
#[ts(
    export,
    export_to = "../../../packages/api-types/src/generated/hour-bank-decision-request.ts"
)]
pub struct HourBankDecisionRequest {
    #[ts(type = "\"approve\" | \"reject\"")]
    pub decision: String,
    #[ts(optional)]
    pub notes: Option<String>,
}
