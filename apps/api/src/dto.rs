mod common;
mod departments;
mod hour_banks;
mod organizations;
mod tickets;

pub use common::{ActorContextResponse, BootstrapRequest, HealthResponse};
pub use departments::{
    CreateDepartmentRequest, DepartmentListQuery, DepartmentResponse, UpdateDepartmentRequest,
};
pub use hour_banks::{
    CreateHourBankRequestRequest, HourBankDecisionRequest, HourBankDecisionResponse,
    HourBankRequestListQuery, HourBankRequestResponse, HourBankResponse,
};
pub use organizations::{
    CreateOrganizationRequest, OrganizationResponse, UpdateOrganizationStatusRequest,
};
pub use tickets::{
    AssignTechnicianRequest, AssignTicketRequest, CreateTicketRequest, TicketListQuery,
    TicketResponse, UpdateTicketRequest,
};

#[cfg(test)]
mod tests {
    use rust_decimal::Decimal;
    use tenantdesk_application::{
        CreateHourBankRequestInput, CreateTicketInput, TicketListFilter, UpdateTicketInput,
    };
    use tenantdesk_core::{AppError, DepartmentId, TicketId, UserId};
    use tenantdesk_domain::{TicketPriority, TicketStatus};
    use ts_rs::Config;
    use ts_rs::TS;

    use super::{
        ActorContextResponse, AssignTechnicianRequest, AssignTicketRequest, BootstrapRequest,
        CreateDepartmentRequest, CreateHourBankRequestRequest, CreateOrganizationRequest,
        CreateTicketRequest, DepartmentResponse, HealthResponse, HourBankDecisionRequest,
        HourBankDecisionResponse, HourBankRequestResponse, HourBankResponse, OrganizationResponse,
        TicketListQuery, TicketResponse, UpdateDepartmentRequest, UpdateOrganizationStatusRequest,
        UpdateTicketRequest,
    };
    use crate::error::ErrorResponse;

    #[test]
    fn export_ts_bindings() -> Result<(), ts_rs::ExportError> {
        let config = Config::default();

        HealthResponse::export(&config)?;
        BootstrapRequest::export(&config)?;
        ActorContextResponse::export(&config)?;
        OrganizationResponse::export(&config)?;
        CreateOrganizationRequest::export(&config)?;
        UpdateOrganizationStatusRequest::export(&config)?;
        DepartmentResponse::export(&config)?;
        CreateDepartmentRequest::export(&config)?;
        UpdateDepartmentRequest::export(&config)?;
        TicketResponse::export(&config)?;
        CreateTicketRequest::export(&config)?;
        UpdateTicketRequest::export(&config)?;
        AssignTicketRequest::export(&config)?;
        AssignTechnicianRequest::export(&config)?;
        HourBankResponse::export(&config)?;
        HourBankRequestResponse::export(&config)?;
        HourBankDecisionResponse::export(&config)?;
        CreateHourBankRequestRequest::export(&config)?;
        HourBankDecisionRequest::export(&config)?;
        ErrorResponse::export(&config)?;

        Ok(())
    }

    #[test]
    fn department_update_drops_organization_and_keeps_explicit_nulls() {
        let request: UpdateDepartmentRequest =
            serde_json::from_str(r#"{"organization_id": 9, "parent_id": null}"#)
                .unwrap_or_else(|_| unreachable!());
        let input = request.into_input(DepartmentId::new(4));

        assert_eq!(input.parent_id, Some(None));
        assert_eq!(input.manager_id, None);
        assert_eq!(input.name, None);
    }

    #[test]
    fn ticket_update_drops_organization() {
        let request: UpdateTicketRequest = serde_json::from_str(
            r#"{"organization_id": 9, "status": "in_progress", "department_id": 3}"#,
        )
        .unwrap_or_else(|_| unreachable!());
        let input: UpdateTicketInput = request
            .into_input(TicketId::new(1))
            .unwrap_or_else(|_| unreachable!());

        assert_eq!(input.status, Some(TicketStatus::InProgress));
        assert_eq!(input.department_id, Some(Some(DepartmentId::new(3))));
        assert_eq!(input.client_responsible_id, None);
    }

    #[test]
    fn unknown_ticket_priority_is_a_validation_error() {
        let request: CreateTicketRequest =
            serde_json::from_str(r#"{"title": "Printer", "priority": "whenever"}"#)
                .unwrap_or_else(|_| unreachable!());

        let result = CreateTicketInput::try_from(request);
        assert!(matches!(result, Err(AppError::Validation(_))));
    }

    #[test]
    fn ticket_list_query_parses_filters() {
        let filter = TicketListFilter::try_from(TicketListQuery {
            priority: Some("high".to_owned()),
            assignee_id: Some(7),
            limit: Some(25),
            ..TicketListQuery::default()
        })
        .unwrap_or_else(|_| unreachable!());

        assert_eq!(filter.priority, Some(TicketPriority::High));
        assert_eq!(filter.assignee_id, Some(UserId::new(7)));
        assert_eq!(filter.limit, Some(25));
        assert_eq!(filter.status, None);
    }

    #[test]
    fn hour_amounts_are_parsed_as_decimals() {
        let request: CreateHourBankRequestRequest = serde_json::from_str(
            r#"{"company_id": 2, "requested_hours": "12.5", "hourly_rate": "80"}"#,
        )
        .unwrap_or_else(|_| unreachable!());
        let input =
            CreateHourBankRequestInput::try_from(request).unwrap_or_else(|_| unreachable!());

        assert_eq!(input.requested_hours, Decimal::new(125, 1));
        assert_eq!(input.hourly_rate, Some(Decimal::new(80, 0)));
        assert_eq!(input.organization_id, None);
    }

    #[test]
    fn malformed_hour_amount_is_rejected() {
        let request: CreateHourBankRequestRequest =
            serde_json::from_str(r#"{"company_id": 2, "requested_hours": "ten"}"#)
                .unwrap_or_else(|_| unreachable!());

        let result = CreateHourBankRequestInput::try_from(request);
        assert!(matches!(result, Err(AppError::Validation(_))));
    }
}
