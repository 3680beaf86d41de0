use super::*;

impl TicketService {
    /// Opens a ticket inside the actor's tenant.
    ///
    /// A non-global actor naming another organization is denied outright.
    pub async fn create_ticket(&self, actor: &Actor, input: CreateTicketInput) -> AppResult<Ticket> {
        require_permission(actor, Resource::Tickets, Action::Create)?;

        let organization_id = input
            .organization_id
            .or(actor.organization_id())
            .ok_or_else(|| {
                AppError::Validation("an organization is required to open a ticket".to_owned())
            })?;

        if !actor.scope().is_global() && actor.organization_id() != Some(organization_id) {
            return Err(AppError::ScopeDenied(format!(
                "cannot create ticket for different organization '{organization_id}'"
            )));
        }

        let organization = self
            .organization_repository
            .find_organization(organization_id)
            .await?
            .ok_or_else(|| {
                AppError::Validation(format!("organization '{organization_id}' does not exist"))
            })?;
        if !organization.is_active() {
            return Err(AppError::Validation(format!(
                "organization '{organization_id}' is deactivated"
            )));
        }

        let department_id = match input.department_id {
            Some(department_id) => {
                self.require_ticket_department(department_id, organization_id)
                    .await?;
                Some(department_id)
            }
            None if actor.organization_id() == Some(organization_id) => actor.department_id(),
            None => None,
        };

        if let Some(client_responsible_id) = input.client_responsible_id {
            self.require_member(client_responsible_id, organization_id, "client responsible")
                .await?;
        }

        let priority = input.priority.unwrap_or(TicketPriority::Medium);
        let now = Utc::now();
        let ticket = self
            .ticket_repository
            .create_ticket(NewTicket {
                title: NonEmptyString::new(input.title)?,
                description: input.description.unwrap_or_default(),
                priority,
                ticket_type: input.ticket_type.unwrap_or(TicketType::Incident),
                organization_id,
                department_id,
                customer_company_id: input.customer_company_id,
                creator_id: actor.id(),
                client_responsible_id: input.client_responsible_id,
                sla: SlaDeadlines::for_priority(priority, now),
                created_at: now,
            })
            .await?;

        self.append_ticket_event(
            actor,
            &ticket,
            AuditAction::TicketCreated,
            Some(format!(
                "opened in organization '{organization_id}' with priority '{}'",
                priority.as_str()
            )),
        )
        .await;

        Ok(ticket)
    }

    /// Ensures an active department of the ticket's organization.
    pub(super) async fn require_ticket_department(
        &self,
        department_id: DepartmentId,
        organization_id: OrganizationId,
    ) -> AppResult<()> {
        let department = self
            .department_repository
            .find_department(department_id)
            .await?
            .ok_or_else(|| {
                AppError::Validation(format!("department '{department_id}' does not exist"))
            })?;

        if department.organization_id() != organization_id {
            return Err(AppError::Validation(format!(
                "department '{department_id}' does not belong to organization '{organization_id}'"
            )));
        }

        if !department.is_active() {
            return Err(AppError::Validation(format!(
                "department '{department_id}' is inactive"
            )));
        }

        Ok(())
    }
}
