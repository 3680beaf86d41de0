use super::*;

impl TicketService {
    /// Assigns a ticket to a user of the same organization, or clears the assignee.
    ///
    /// Owners (creator, assignee, client responsible) may reassign outside
    /// their tenant scope; the new assignee must still share the ticket's
    /// organization.
    pub async fn assign_ticket(
        &self,
        actor: &Actor,
        ticket_id: TicketId,
        assignee_id: Option<UserId>,
    ) -> AppResult<Ticket> {
        require_permission(actor, Resource::Tickets, Action::Assign)?;

        let mut ticket = self.get_ticket(actor, ticket_id).await?;
        let owner = ticket.grants_ownership_to(actor.id());
        let scoped = actor
            .scope()
            .covers_record(ticket.organization_id(), ticket.department_id());
        if !owner && !scoped {
            return Err(AppError::Forbidden(format!(
                "user '{}' may only assign tickets inside their scope",
                actor.id()
            )));
        }

        if let Some(assignee_id) = assignee_id {
            let assignee = self
                .user_repository
                .find_user(assignee_id)
                .await?
                .filter(|user| user.is_active)
                .ok_or_else(|| {
                    AppError::Validation(format!("assignee '{assignee_id}' is not an active user"))
                })?;

            if assignee.organization_id != Some(ticket.organization_id()) {
                return Err(AppError::Validation(format!(
                    "assignee '{assignee_id}' belongs to another organization; use technician assignment"
                )));
            }
        }

        ticket.assign(assignee_id);
        ticket.touch(Utc::now());
        self.ticket_repository.save_ticket(ticket.clone()).await?;
        self.append_ticket_event(
            actor,
            &ticket,
            AuditAction::TicketAssigned,
            assignee_id.map(|value| format!("assigned to user '{value}'")),
        )
        .await;

        Ok(ticket)
    }

    /// Assigns a system-owner technician to a client-company ticket.
    ///
    /// This is the only path that links users across organizations. The actor
    /// must belong to the system owner (or be a super user); scope over the
    /// ticket is not required.
    pub async fn assign_system_technician(
        &self,
        actor: &Actor,
        ticket_id: TicketId,
        technician_id: UserId,
    ) -> AppResult<Ticket> {
        require_permission(actor, Resource::Tickets, Action::Assign)?;

        if !actor.is_super_user() && !actor.belongs_to_system_owner() {
            return Err(AppError::Forbidden(
                "only system-owner staff can assign technicians to client tickets".to_owned(),
            ));
        }

        let mut ticket = self
            .ticket_repository
            .find_ticket(ticket_id)
            .await?
            .ok_or_else(|| AppError::NotFound("ticket not found".to_owned()))?;

        let ticket_organization = self
            .organization_repository
            .find_organization(ticket.organization_id())
            .await?
            .ok_or_else(|| {
                AppError::Internal(format!(
                    "organization '{}' of ticket '{ticket_id}' is missing",
                    ticket.organization_id()
                ))
            })?;
        if ticket_organization.organization_type() != OrganizationType::ClientCompany {
            return Err(AppError::InvalidCrossTenantOperation(
                "ticket does not belong to a client company".to_owned(),
            ));
        }

        let technician = self
            .user_repository
            .find_user(technician_id)
            .await?
            .filter(|user| user.is_active)
            .ok_or_else(|| {
                AppError::Validation(format!(
                    "technician '{technician_id}' is not an active user"
                ))
            })?;
        let technician_organization = match technician.organization_id {
            Some(organization_id) => {
                self.organization_repository
                    .find_organization(organization_id)
                    .await?
            }
            None => None,
        };
        if !technician_organization.is_some_and(|organization| organization.is_system_owner()) {
            return Err(AppError::InvalidCrossTenantOperation(
                "technician must belong to the system-owner organization".to_owned(),
            ));
        }

        ticket.assign(Some(technician_id));
        ticket.touch(Utc::now());
        self.ticket_repository.save_ticket(ticket.clone()).await?;
        self.append_ticket_event(
            actor,
            &ticket,
            AuditAction::TicketTechnicianAssigned,
            Some(format!("technician '{technician_id}'")),
        )
        .await;

        Ok(ticket)
    }
}
