use super::*;

impl TicketService {
    /// Applies a partial update to a visible ticket.
    ///
    /// Owners (creator, assignee, client responsible) may always edit their
    /// ticket; everyone else needs `tickets:update` and scope over it.
    pub async fn update_ticket(
        &self,
        actor: &Actor,
        ticket_id: TicketId,
        input: UpdateTicketInput,
    ) -> AppResult<Ticket> {
        let mut ticket = self.get_ticket(actor, ticket_id).await?;

        let owner = ticket.grants_ownership_to(actor.id());
        let scoped = actor
            .scope()
            .covers_record(ticket.organization_id(), ticket.department_id());
        if !owner && !(scoped && has_permission(actor, Resource::Tickets, Action::Update)) {
            return Err(AppError::Forbidden(format!(
                "cannot update ticket '{ticket_id}' outside your scope"
            )));
        }

        let mut changed = Vec::new();

        if let Some(title) = input.title {
            ticket.set_title(title)?;
            changed.push("title");
        }
        if let Some(description) = input.description {
            ticket.set_description(description);
            changed.push("description");
        }
        if let Some(ticket_type) = input.ticket_type {
            ticket.set_ticket_type(ticket_type);
            changed.push("ticket_type");
        }
        if let Some(priority) = input.priority {
            ticket.set_priority(priority);
            changed.push("priority");
        }
        if let Some(department_id) = input.department_id {
            let department = match department_id {
                Some(department_id) => {
                    self.require_ticket_department(department_id, ticket.organization_id())
                        .await?;
                    Some((department_id, ticket.organization_id()))
                }
                None => None,
            };
            ticket.set_department(department)?;
            changed.push("department_id");
        }
        if let Some(client_responsible_id) = input.client_responsible_id {
            if let Some(user_id) = client_responsible_id {
                self.require_member(user_id, ticket.organization_id(), "client responsible")
                    .await?;
            }
            ticket.set_client_responsible(client_responsible_id);
            changed.push("client_responsible_id");
        }

        let now = Utc::now();
        if let Some(status) = input.status {
            ticket.transition_to(status, now)?;
            changed.push("status");
        }

        if changed.is_empty() {
            return Ok(ticket);
        }

        ticket.touch(now);
        self.ticket_repository.save_ticket(ticket.clone()).await?;
        self.append_ticket_event(
            actor,
            &ticket,
            AuditAction::TicketUpdated,
            Some(format!("changed {}", changed.join(", "))),
        )
        .await;

        Ok(ticket)
    }
}
