//! Shared fakes for service tests.

use std::collections::{BTreeMap, HashMap};

use async_trait::async_trait;
use chrono::Utc;
use rust_decimal::Decimal;
use tenantdesk_core::{
    AppError, AppResult, CompanyId, DepartmentId, HourBankId, HourBankRequestId, OrganizationId,
    TicketId, UserId,
};
use tenantdesk_domain::{
    Actor, ActorAttributes, Department, DepartmentInput, HourBank, HourBankDecision,
    HourBankInput, HourBankRequest, HourBankRequestStatus, NewHourBankRequest, NewTicket,
    Organization, OrganizationType, Permission, PermissionSet, SlaDeadlines, Ticket, TicketInput,
    TicketPriority, TicketStatus, TicketType, UserAccount, UserRole,
};
use tokio::sync::Mutex;

use crate::{
    AuditEvent, AuditRepository, DepartmentRepository, HourBankDecisionRecord,
    HourBankRepository, NewDepartment, NewOrganization, OrganizationRepository,
    ProcessedHourBankRequest, TicketQuery, TicketRepository, UserRepository,
};

pub(crate) fn permissions(values: &[&str]) -> PermissionSet {
    values
        .iter()
        .filter_map(|value| Permission::from_storage(value).ok())
        .collect()
}

pub(crate) struct ActorBuilder {
    attributes: ActorAttributes,
}

impl ActorBuilder {
    pub(crate) fn new(id: i64, role: UserRole) -> Self {
        Self {
            attributes: ActorAttributes {
                id: UserId::new(id),
                display_name: format!("User {id}"),
                role,
                organization_id: None,
                organization_type: None,
                department_id: None,
                is_super_user: false,
                can_cross_organizations: false,
                can_cross_departments: false,
                permissions: PermissionSet::new(),
            },
        }
    }

    pub(crate) fn organization(mut self, organization_id: i64) -> Self {
        self.attributes.organization_id = Some(OrganizationId::new(organization_id));
        self.attributes.organization_type = Some(OrganizationType::ClientCompany);
        self
    }

    pub(crate) fn system_owner(mut self, organization_id: i64) -> Self {
        self.attributes.organization_id = Some(OrganizationId::new(organization_id));
        self.attributes.organization_type = Some(OrganizationType::SystemOwner);
        self
    }

    pub(crate) fn department(mut self, department_id: i64) -> Self {
        self.attributes.department_id = Some(DepartmentId::new(department_id));
        self
    }

    pub(crate) fn super_user(mut self) -> Self {
        self.attributes.is_super_user = true;
        self
    }

    pub(crate) fn cross_organizations(mut self) -> Self {
        self.attributes.can_cross_organizations = true;
        self
    }

    pub(crate) fn cross_departments(mut self) -> Self {
        self.attributes.can_cross_departments = true;
        self
    }

    pub(crate) fn permissions(mut self, permissions: PermissionSet) -> Self {
        self.attributes.permissions = permissions;
        self
    }

    pub(crate) fn account(&self) -> UserAccount {
        UserAccount {
            id: self.attributes.id,
            display_name: self.attributes.display_name.clone(),
            email: None,
            role: self.attributes.role,
            organization_id: self.attributes.organization_id,
            department_id: self.attributes.department_id,
            is_super_user: self.attributes.is_super_user,
            can_cross_organizations: self.attributes.can_cross_organizations,
            can_cross_departments: self.attributes.can_cross_departments,
            is_active: true,
        }
    }

    pub(crate) fn build(self) -> Actor {
        Actor::new(self.attributes)
    }
}

pub(crate) fn ticket_input(
    id: i64,
    organization_id: i64,
    department_id: Option<i64>,
    creator_id: i64,
) -> TicketInput {
    let now = Utc::now();
    TicketInput {
        id: TicketId::new(id),
        title: format!("Ticket {id}"),
        description: String::new(),
        priority: TicketPriority::Medium,
        status: TicketStatus::Open,
        ticket_type: TicketType::Incident,
        organization_id: OrganizationId::new(organization_id),
        department_id: department_id.map(DepartmentId::new),
        customer_company_id: None,
        assignee_id: None,
        creator_id: UserId::new(creator_id),
        client_responsible_id: None,
        sla: SlaDeadlines::for_priority(TicketPriority::Medium, now),
        resolved_at: None,
        created_at: now,
        updated_at: now,
    }
}

#[derive(Default)]
struct FakeState {
    organizations: BTreeMap<OrganizationId, Organization>,
    departments: BTreeMap<DepartmentId, Department>,
    users: BTreeMap<UserId, UserAccount>,
    permissions: HashMap<UserId, Vec<Permission>>,
    tickets: BTreeMap<TicketId, Ticket>,
    hour_banks: BTreeMap<HourBankId, HourBank>,
    hour_bank_requests: BTreeMap<HourBankRequestId, HourBankRequest>,
    audit_events: Vec<AuditEvent>,
    audit_unavailable: bool,
    next_id: i64,
}

impl FakeState {
    fn allocate_id(&mut self) -> i64 {
        self.next_id += 1;
        1_000 + self.next_id
    }
}

/// Single in-process store implementing every port for service tests.
#[derive(Default)]
pub(crate) struct FakeStore {
    state: Mutex<FakeState>,
}

impl FakeStore {
    pub(crate) async fn seed_organization(
        &self,
        id: i64,
        name: &str,
        organization_type: OrganizationType,
    ) {
        let organization = Organization::new(
            OrganizationId::new(id),
            name,
            organization_type,
            true,
            Utc::now(),
        )
        .unwrap_or_else(|_| unreachable!());
        self.state
            .lock()
            .await
            .organizations
            .insert(organization.id(), organization);
    }

    pub(crate) async fn seed_department(&self, id: i64, organization_id: i64, name: &str) {
        let now = Utc::now();
        let department = Department::new(DepartmentInput {
            id: DepartmentId::new(id),
            organization_id: OrganizationId::new(organization_id),
            name: name.to_owned(),
            parent_id: None,
            manager_id: None,
            is_active: true,
            created_at: now,
            updated_at: now,
        })
        .unwrap_or_else(|_| unreachable!());
        self.state
            .lock()
            .await
            .departments
            .insert(department.id(), department);
    }

    pub(crate) async fn seed_user(&self, account: UserAccount, permissions: &[&str]) {
        let mut state = self.state.lock().await;
        state.permissions.insert(
            account.id,
            permissions
                .iter()
                .filter_map(|value| Permission::from_storage(value).ok())
                .collect(),
        );
        state.users.insert(account.id, account);
    }

    pub(crate) async fn seed_ticket(&self, input: TicketInput) -> Ticket {
        let ticket = Ticket::new(input).unwrap_or_else(|_| unreachable!());
        self.state
            .lock()
            .await
            .tickets
            .insert(ticket.id(), ticket.clone());
        ticket
    }

    pub(crate) async fn seed_hour_bank_request(
        &self,
        id: i64,
        organization_id: i64,
        company_id: i64,
        hours: i64,
    ) -> HourBankRequest {
        let request = NewHourBankRequest::new(
            OrganizationId::new(organization_id),
            CompanyId::new(company_id),
            Decimal::new(hours, 0),
            None,
            None,
            UserId::new(1),
            Utc::now(),
        )
        .unwrap_or_else(|_| unreachable!());
        let request = HourBankRequest::from_new(HourBankRequestId::new(id), request);
        self.state
            .lock()
            .await
            .hour_bank_requests
            .insert(request.id(), request.clone());
        request
    }

    pub(crate) async fn ticket(&self, id: i64) -> Option<Ticket> {
        self.state
            .lock()
            .await
            .tickets
            .get(&TicketId::new(id))
            .cloned()
    }

    pub(crate) async fn hour_banks(&self) -> Vec<HourBank> {
        self.state.lock().await.hour_banks.values().cloned().collect()
    }

    pub(crate) async fn audit_events(&self) -> Vec<AuditEvent> {
        self.state.lock().await.audit_events.clone()
    }

    /// Makes every later audit append fail.
    pub(crate) async fn break_audit_log(&self) {
        self.state.lock().await.audit_unavailable = true;
    }
}

#[async_trait]
impl UserRepository for FakeStore {
    async fn find_user(&self, user_id: UserId) -> AppResult<Option<UserAccount>> {
        Ok(self.state.lock().await.users.get(&user_id).cloned())
    }

    async fn list_permissions_for_user(&self, user_id: UserId) -> AppResult<Vec<Permission>> {
        Ok(self
            .state
            .lock()
            .await
            .permissions
            .get(&user_id)
            .cloned()
            .unwrap_or_default())
    }
}

#[async_trait]
impl OrganizationRepository for FakeStore {
    async fn find_organization(
        &self,
        organization_id: OrganizationId,
    ) -> AppResult<Option<Organization>> {
        Ok(self
            .state
            .lock()
            .await
            .organizations
            .get(&organization_id)
            .cloned())
    }

    async fn list_organizations(&self) -> AppResult<Vec<Organization>> {
        Ok(self
            .state
            .lock()
            .await
            .organizations
            .values()
            .cloned()
            .collect())
    }

    async fn create_organization(&self, organization: NewOrganization) -> AppResult<Organization> {
        let mut state = self.state.lock().await;
        let id = OrganizationId::new(state.allocate_id());
        let created = Organization::new(
            id,
            organization.name.as_str(),
            organization.organization_type,
            true,
            Utc::now(),
        )?;
        state.organizations.insert(id, created.clone());
        Ok(created)
    }

    async fn save_organization(&self, organization: Organization) -> AppResult<()> {
        self.state
            .lock()
            .await
            .organizations
            .insert(organization.id(), organization);
        Ok(())
    }
}

#[async_trait]
impl DepartmentRepository for FakeStore {
    async fn find_department(
        &self,
        department_id: DepartmentId,
    ) -> AppResult<Option<Department>> {
        Ok(self
            .state
            .lock()
            .await
            .departments
            .get(&department_id)
            .cloned())
    }

    async fn list_departments(
        &self,
        organization_id: Option<OrganizationId>,
    ) -> AppResult<Vec<Department>> {
        Ok(self
            .state
            .lock()
            .await
            .departments
            .values()
            .filter(|department| {
                organization_id.is_none_or(|value| value == department.organization_id())
            })
            .cloned()
            .collect())
    }

    async fn create_department(&self, department: NewDepartment) -> AppResult<Department> {
        let mut state = self.state.lock().await;
        let duplicate = state.departments.values().any(|existing| {
            existing.organization_id() == department.organization_id
                && existing.name().as_str() == department.name.as_str()
        });
        if duplicate {
            return Err(AppError::Conflict(format!(
                "department '{}' already exists",
                department.name
            )));
        }

        let id = DepartmentId::new(state.allocate_id());
        let created = Department::new(DepartmentInput {
            id,
            organization_id: department.organization_id,
            name: department.name.into(),
            parent_id: department.parent_id,
            manager_id: department.manager_id,
            is_active: true,
            created_at: department.created_at,
            updated_at: department.created_at,
        })?;
        state.departments.insert(id, created.clone());
        Ok(created)
    }

    async fn save_department(&self, department: Department) -> AppResult<()> {
        let mut state = self.state.lock().await;
        let duplicate = state.departments.values().any(|existing| {
            existing.id() != department.id()
                && existing.organization_id() == department.organization_id()
                && existing.name() == department.name()
        });
        if duplicate {
            return Err(AppError::Conflict(format!(
                "department '{}' already exists",
                department.name()
            )));
        }

        state.departments.insert(department.id(), department);
        Ok(())
    }
}

#[async_trait]
impl TicketRepository for FakeStore {
    async fn create_ticket(&self, ticket: NewTicket) -> AppResult<Ticket> {
        let mut state = self.state.lock().await;
        let id = TicketId::new(state.allocate_id());
        let created = Ticket::from_new(id, ticket);
        state.tickets.insert(id, created.clone());
        Ok(created)
    }

    async fn find_ticket(&self, ticket_id: TicketId) -> AppResult<Option<Ticket>> {
        Ok(self.state.lock().await.tickets.get(&ticket_id).cloned())
    }

    async fn list_tickets(&self, query: TicketQuery) -> AppResult<Vec<Ticket>> {
        Ok(self
            .state
            .lock()
            .await
            .tickets
            .values()
            .rev()
            .filter(|ticket| query.matches(ticket))
            .skip(query.offset)
            .take(query.limit)
            .cloned()
            .collect())
    }

    async fn save_ticket(&self, ticket: Ticket) -> AppResult<()> {
        self.state.lock().await.tickets.insert(ticket.id(), ticket);
        Ok(())
    }
}

#[async_trait]
impl HourBankRepository for FakeStore {
    async fn list_hour_banks(
        &self,
        organization_id: Option<OrganizationId>,
    ) -> AppResult<Vec<HourBank>> {
        Ok(self
            .state
            .lock()
            .await
            .hour_banks
            .values()
            .filter(|bank| organization_id.is_none_or(|value| value == bank.organization_id()))
            .cloned()
            .collect())
    }

    async fn create_request(&self, request: NewHourBankRequest) -> AppResult<HourBankRequest> {
        let mut state = self.state.lock().await;
        let id = HourBankRequestId::new(state.allocate_id());
        let created = HourBankRequest::from_new(id, request);
        state.hour_bank_requests.insert(id, created.clone());
        Ok(created)
    }

    async fn find_request(
        &self,
        request_id: HourBankRequestId,
    ) -> AppResult<Option<HourBankRequest>> {
        Ok(self
            .state
            .lock()
            .await
            .hour_bank_requests
            .get(&request_id)
            .cloned())
    }

    async fn list_requests(
        &self,
        organization_id: Option<OrganizationId>,
        status: Option<HourBankRequestStatus>,
    ) -> AppResult<Vec<HourBankRequest>> {
        Ok(self
            .state
            .lock()
            .await
            .hour_bank_requests
            .values()
            .rev()
            .filter(|request| {
                organization_id.is_none_or(|value| value == request.organization_id())
                    && status.is_none_or(|value| value == request.status())
            })
            .cloned()
            .collect())
    }

    async fn process_request(
        &self,
        request_id: HourBankRequestId,
        decision: HourBankDecisionRecord,
    ) -> AppResult<ProcessedHourBankRequest> {
        let mut state = self.state.lock().await;
        let mut request = state
            .hour_bank_requests
            .get(&request_id)
            .cloned()
            .ok_or_else(|| {
                AppError::NotFound(format!("hour bank request '{request_id}' not found"))
            })?;

        request.decide(
            decision.decision,
            decision.approver_id,
            decision.notes,
            decision.processed_at,
        )?;

        let hour_bank = if decision.decision == HourBankDecision::Approve {
            let existing = state
                .hour_banks
                .values()
                .find(|bank| {
                    bank.is_active()
                        && bank.organization_id() == request.organization_id()
                        && bank.company_id() == request.company_id()
                })
                .cloned();
            let bank = match existing {
                Some(mut bank) => {
                    bank.credit(
                        request.requested_hours(),
                        request.hourly_rate(),
                        decision.processed_at,
                    );
                    bank
                }
                None => HourBank::new(HourBankInput {
                    id: HourBankId::new(state.allocate_id()),
                    organization_id: request.organization_id(),
                    company_id: request.company_id(),
                    total_hours: request.requested_hours(),
                    used_hours: Decimal::ZERO,
                    hourly_rate: request.hourly_rate().unwrap_or_default(),
                    is_active: true,
                    created_at: decision.processed_at,
                    updated_at: decision.processed_at,
                })?,
            };
            state.hour_banks.insert(bank.id(), bank.clone());
            Some(bank)
        } else {
            None
        };

        state
            .hour_bank_requests
            .insert(request.id(), request.clone());
        Ok(ProcessedHourBankRequest { request, hour_bank })
    }
}

#[async_trait]
impl AuditRepository for FakeStore {
    async fn append_event(&self, event: AuditEvent) -> AppResult<()> {
        let mut state = self.state.lock().await;
        if state.audit_unavailable {
            return Err(AppError::Internal("audit log unavailable".to_owned()));
        }
        state.audit_events.push(event);
        Ok(())
    }
}
