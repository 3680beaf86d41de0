use tenantdesk_core::{TicketId, UserId};

use crate::dto::{
    AssignTechnicianRequest, AssignTicketRequest, CreateTicketRequest, TicketListQuery,
    TicketResponse, UpdateTicketRequest,
};

use super::*;

pub async fn list_tickets_handler(
    State(state): State<AppState>,
    Extension(actor): Extension<Actor>,
    Query(query): Query<TicketListQuery>,
) -> ApiResult<Json<Vec<TicketResponse>>> {
    let tickets = state
        .ticket_service
        .list_tickets(&actor, query.try_into()?)
        .await?
        .into_iter()
        .map(TicketResponse::from)
        .collect();

    Ok(Json(tickets))
}

pub async fn get_ticket_handler(
    State(state): State<AppState>,
    Extension(actor): Extension<Actor>,
    Path(ticket_id): Path<i64>,
) -> ApiResult<Json<TicketResponse>> {
    let ticket = state
        .ticket_service
        .get_ticket(&actor, TicketId::new(ticket_id))
        .await?;

    Ok(Json(TicketResponse::from(ticket)))
}

pub async fn create_ticket_handler(
    State(state): State<AppState>,
    Extension(actor): Extension<Actor>,
    Json(payload): Json<CreateTicketRequest>,
) -> ApiResult<(StatusCode, Json<TicketResponse>)> {
    let ticket = state
        .ticket_service
        .create_ticket(&actor, payload.try_into()?)
        .await?;

    Ok((StatusCode::CREATED, Json(TicketResponse::from(ticket))))
}

pub async fn update_ticket_handler(
    State(state): State<AppState>,
    Extension(actor): Extension<Actor>,
    Path(ticket_id): Path<i64>,
    Json(payload): Json<UpdateTicketRequest>,
) -> ApiResult<Json<TicketResponse>> {
    let ticket_id = TicketId::new(ticket_id);
    let ticket = state
        .ticket_service
        .update_ticket(&actor, ticket_id, payload.into_input(ticket_id)?)
        .await?;

    Ok(Json(TicketResponse::from(ticket)))
}

pub async fn assign_ticket_handler(
    State(state): State<AppState>,
    Extension(actor): Extension<Actor>,
    Path(ticket_id): Path<i64>,
    Json(payload): Json<AssignTicketRequest>,
) -> ApiResult<Json<TicketResponse>> {
    let ticket = state
        .ticket_service
        .assign_ticket(
            &actor,
            TicketId::new(ticket_id),
            payload.assignee_id.map(UserId::new),
        )
        .await?;

    Ok(Json(TicketResponse::from(ticket)))
}

pub async fn assign_technician_handler(
    State(state): State<AppState>,
    Extension(actor): Extension<Actor>,
    Path(ticket_id): Path<i64>,
    Json(payload): Json<AssignTechnicianRequest>,
) -> ApiResult<Json<TicketResponse>> {
    let ticket = state
        .ticket_service
        .assign_system_technician(
            &actor,
            TicketId::new(ticket_id),
            UserId::new(payload.technician_id),
        )
        .await?;

    Ok(Json(TicketResponse::from(ticket)))
}
