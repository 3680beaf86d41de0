use tenantdesk_core::HourBankRequestId;
use tenantdesk_domain::{HourBankDecision, HourBankRequestStatus};

use crate::dto::{
    CreateHourBankRequestRequest, HourBankDecisionRequest, HourBankDecisionResponse,
    HourBankRequestListQuery, HourBankRequestResponse, HourBankResponse,
};

use super::*;

pub async fn list_hour_banks_handler(
    State(state): State<AppState>,
    Extension(actor): Extension<Actor>,
) -> ApiResult<Json<Vec<HourBankResponse>>> {
    let hour_banks = state
        .hour_bank_service
        .list_hour_banks(&actor)
        .await?
        .into_iter()
        .map(HourBankResponse::from)
        .collect();

    Ok(Json(hour_banks))
}

pub async fn list_hour_bank_requests_handler(
    State(state): State<AppState>,
    Extension(actor): Extension<Actor>,
    Query(query): Query<HourBankRequestListQuery>,
) -> ApiResult<Json<Vec<HourBankRequestResponse>>> {
    let status = query
        .status
        .as_deref()
        .map(HourBankRequestStatus::parse)
        .transpose()?;
    let requests = state
        .hour_bank_service
        .list_hour_bank_requests(&actor, status)
        .await?
        .into_iter()
        .map(HourBankRequestResponse::from)
        .collect();

    Ok(Json(requests))
}

pub async fn get_hour_bank_request_handler(
    State(state): State<AppState>,
    Extension(actor): Extension<Actor>,
    Path(request_id): Path<i64>,
) -> ApiResult<Json<HourBankRequestResponse>> {
    let request = state
        .hour_bank_service
        .get_hour_bank_request(&actor, HourBankRequestId::new(request_id))
        .await?;

    Ok(Json(HourBankRequestResponse::from(request)))
}

pub async fn create_hour_bank_request_handler(
    State(state): State<AppState>,
    Extension(actor): Extension<Actor>,
    Json(payload): Json<CreateHourBankRequestRequest>,
) -> ApiResult<(StatusCode, Json<HourBankRequestResponse>)> {
    let request = state
        .hour_bank_service
        .create_hour_bank_request(&actor, payload.try_into()?)
        .await?;

    Ok((StatusCode::CREATED, Json(HourBankRequestResponse::from(request))))
}

pub async fn process_hour_bank_request_handler(
    State(state): State<AppState>,
    Extension(actor): Extension<Actor>,
    Path(request_id): Path<i64>,
    Json(payload): Json<HourBankDecisionRequest>,
) -> ApiResult<Json<HourBankDecisionResponse>> {
    let decision = HourBankDecision::parse(payload.decision.as_str())?;
    let processed = state
        .hour_bank_service
        .process_hour_bank_request(
            &actor,
            HourBankRequestId::new(request_id),
            decision,
            payload.notes,
        )
        .await?;

    Ok(Json(HourBankDecisionResponse::from(processed)))
}
