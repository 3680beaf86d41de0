use axum::Router;
use axum::middleware::{from_fn, from_fn_with_state};
use axum::routing::{get, post, put};
use tenantdesk_core::AppError;
use tower_http::trace::TraceLayer;
use tower_sessions::{SessionManagerLayer, SessionStore};

use crate::state::AppState;
use crate::{auth, handlers, middleware};

mod cors;


use cors::build_cors_layer;

pub fn build_router<Store>(
    app_state: AppState,
    frontend_url: &str,
    session_layer: SessionManagerLayer<Store>,
) -> Result<Router, AppError>
where
    Store: SessionStore + Clone,
{
    let organization_scoped_routes = Router::new()
        .route(
            "/api/organizations/{organization_id}/departments",
            get(handlers::list_organization_departments_handler),
        )
        .route_layer(from_fn(middleware::require_organization_scope));

    let protected_routes = Router::new()
        .route("/auth/me", get(auth::me_handler))
        .route(
            "/api/organizations",
            get(handlers::list_organizations_handler).post(handlers::create_organization_handler),
        )
        .route(
            "/api/organizations/{organization_id}",
            get(handlers::get_organization_handler),
        )
        .route(
            "/api/organizations/{organization_id}/status",
            put(handlers::update_organization_status_handler),
        )
        .merge(organization_scoped_routes)
        .route(
            "/api/departments",
            get(handlers::list_departments_handler).post(handlers::create_department_handler),
        )
        .route(
            "/api/departments/{department_id}",
            get(handlers::get_department_handler).put(handlers::update_department_handler),
        )
        .route(
            "/api/tickets",
            get(handlers::list_tickets_handler).post(handlers::create_ticket_handler),
        )
        .route(
            "/api/tickets/{ticket_id}",
            get(handlers::get_ticket_handler).put(handlers::update_ticket_handler),
        )
        .route(
            "/api/tickets/{ticket_id}/assignee",
            put(handlers::assign_ticket_handler),
        )
        .route(
            "/api/tickets/{ticket_id}/technician",
            put(handlers::assign_technician_handler),
        )
        .route("/api/hour-banks", get(handlers::list_hour_banks_handler))
        .route(
            "/api/hour-bank-requests",
            get(handlers::list_hour_bank_requests_handler)
                .post(handlers::create_hour_bank_request_handler),
        )
        .route(
            "/api/hour-bank-requests/{request_id}",
            get(handlers::get_hour_bank_request_handler),
        )
        .route(
            "/api/hour-bank-requests/{request_id}/decision",
            post(handlers::process_hour_bank_request_handler),
        )
        .route_layer(from_fn_with_state(
            app_state.clone(),
            middleware::require_auth,
        ));

    Ok(Router::new()
        .route("/health", get(handlers::health_handler))
        .route("/auth/bootstrap", post(auth::bootstrap_handler))
        .route("/auth/logout", post(auth::logout_handler))
        .merge(protected_routes)
        .route_layer(from_fn_with_state(
            app_state.clone(),
            middleware::require_same_origin_for_mutations,
        ))
        .layer(TraceLayer::new_for_http())
        .layer(build_cors_layer(frontend_url)?)
        .layer(session_layer)
        .with_state(app_state))
}
