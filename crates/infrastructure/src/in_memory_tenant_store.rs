//! In-process adapter implementing every tenant port.

use std::collections::{BTreeMap, HashMap};
use std::sync::atomic::{AtomicI64, Ordering};

use async_trait::async_trait;
use chrono::Utc;
use rust_decimal::Decimal;
use tenantdesk_application::{
    AuditEvent, AuditRepository, DepartmentRepository, HourBankDecisionRecord,
    HourBankRepository, NewDepartment, NewOrganization, OrganizationRepository,
    ProcessedHourBankRequest, TicketQuery, TicketRepository, UserRepository,
};
use tenantdesk_core::{
    AppError, AppResult, DepartmentId, HourBankId, HourBankRequestId, OrganizationId, TicketId,
    UserId,
};
use tenantdesk_domain::{
    Department, DepartmentInput, HourBank, HourBankDecision, HourBankInput, HourBankRequest,
    HourBankRequestStatus, NewHourBankRequest, NewTicket, Organization, OrganizationType,
    Permission, Ticket, UserAccount,
};
use tokio::sync::RwLock;

/// In-memory store for organizations, users, departments, tickets, hour banks
/// and audit events.
#[derive(Debug)]
pub struct InMemoryTenantStore {
    organizations: RwLock<BTreeMap<OrganizationId, Organization>>,
    users: RwLock<BTreeMap<UserId, UserAccount>>,
    permissions: RwLock<HashMap<UserId, Vec<Permission>>>,
    departments: RwLock<BTreeMap<DepartmentId, Department>>,
    tickets: RwLock<BTreeMap<TicketId, Ticket>>,
    hour_banks: RwLock<BTreeMap<HourBankId, HourBank>>,
    hour_bank_requests: RwLock<BTreeMap<HourBankRequestId, HourBankRequest>>,
    audit_events: RwLock<Vec<AuditEvent>>,
    next_id: AtomicI64,
}

impl Default for InMemoryTenantStore {
    fn default() -> Self {
        Self::new()
    }
}

impl InMemoryTenantStore {
    /// Creates an empty store.
    #[must_use]
    pub fn new() -> Self {
        Self {
            organizations: RwLock::new(BTreeMap::new()),
            users: RwLock::new(BTreeMap::new()),
            permissions: RwLock::new(HashMap::new()),
            departments: RwLock::new(BTreeMap::new()),
            tickets: RwLock::new(BTreeMap::new()),
            hour_banks: RwLock::new(BTreeMap::new()),
            hour_bank_requests: RwLock::new(BTreeMap::new()),
            audit_events: RwLock::new(Vec::new()),
            next_id: AtomicI64::new(0),
        }
    }

    fn allocate_id(&self) -> i64 {
        self.next_id.fetch_add(1, Ordering::Relaxed) + 1
    }

    /// Stores an organization with a caller-chosen id.
    pub async fn insert_organization(&self, organization: Organization) {
        self.bump_past(organization.id().as_i64());
        self.organizations
            .write()
            .await
            .insert(organization.id(), organization);
    }

    /// Stores a department with a caller-chosen id.
    pub async fn insert_department(&self, department: Department) {
        self.bump_past(department.id().as_i64());
        self.departments
            .write()
            .await
            .insert(department.id(), department);
    }

    /// Stores a user account and the permissions granted through its roles.
    pub async fn insert_user(&self, account: UserAccount, permissions: Vec<Permission>) {
        self.bump_past(account.id.as_i64());
        self.permissions
            .write()
            .await
            .insert(account.id, permissions);
        self.users.write().await.insert(account.id, account);
    }

    /// Returns a snapshot of the recorded audit events.
    pub async fn audit_events(&self) -> Vec<AuditEvent> {
        self.audit_events.read().await.clone()
    }

    fn bump_past(&self, id: i64) {
        self.next_id.fetch_max(id, Ordering::Relaxed);
    }
}

#[async_trait]
impl UserRepository for InMemoryTenantStore {
    async fn find_user(&self, user_id: UserId) -> AppResult<Option<UserAccount>> {
        Ok(self.users.read().await.get(&user_id).cloned())
    }

    async fn list_permissions_for_user(&self, user_id: UserId) -> AppResult<Vec<Permission>> {
        Ok(self
            .permissions
            .read()
            .await
            .get(&user_id)
            .cloned()
            .unwrap_or_default())
    }
}

#[async_trait]
impl OrganizationRepository for InMemoryTenantStore {
    async fn find_organization(
        &self,
        organization_id: OrganizationId,
    ) -> AppResult<Option<Organization>> {
        Ok(self.organizations.read().await.get(&organization_id).cloned())
    }

    async fn list_organizations(&self) -> AppResult<Vec<Organization>> {
        Ok(self.organizations.read().await.values().cloned().collect())
    }

    async fn create_organization(&self, organization: NewOrganization) -> AppResult<Organization> {
        let mut organizations = self.organizations.write().await;
        if organization.organization_type == OrganizationType::SystemOwner
            && organizations.values().any(Organization::is_system_owner)
        {
            return Err(AppError::Conflict(
                "a system-owner organization already exists".to_owned(),
            ));
        }

        let created = Organization::new(
            OrganizationId::new(self.allocate_id()),
            organization.name.as_str(),
            organization.organization_type,
            true,
            Utc::now(),
        )?;
        organizations.insert(created.id(), created.clone());
        Ok(created)
    }

    async fn save_organization(&self, organization: Organization) -> AppResult<()> {
        let mut organizations = self.organizations.write().await;
        let Some(slot) = organizations.get_mut(&organization.id()) else {
            return Err(AppError::NotFound(format!(
                "organization '{}' not found",
                organization.id()
            )));
        };

        *slot = organization;
        Ok(())
    }
}

fn duplicate_department_name(
    departments: &BTreeMap<DepartmentId, Department>,
    candidate_id: Option<DepartmentId>,
    organization_id: OrganizationId,
    name: &str,
) -> bool {
    departments.values().any(|existing| {
        Some(existing.id()) != candidate_id
            && existing.organization_id() == organization_id
            && existing.name().as_str() == name
    })
}

#[async_trait]
impl DepartmentRepository for InMemoryTenantStore {
    async fn find_department(
        &self,
        department_id: DepartmentId,
    ) -> AppResult<Option<Department>> {
        Ok(self.departments.read().await.get(&department_id).cloned())
    }

    async fn list_departments(
        &self,
        organization_id: Option<OrganizationId>,
    ) -> AppResult<Vec<Department>> {
        Ok(self
            .departments
            .read()
            .await
            .values()
            .filter(|department| {
                organization_id.is_none_or(|value| value == department.organization_id())
            })
            .cloned()
            .collect())
    }

    async fn create_department(&self, department: NewDepartment) -> AppResult<Department> {
        let mut departments = self.departments.write().await;
        if duplicate_department_name(
            &departments,
            None,
            department.organization_id,
            department.name.as_str(),
        ) {
            return Err(AppError::Conflict(format!(
                "department '{}' already exists in organization '{}'",
                department.name, department.organization_id
            )));
        }

        let created = Department::new(DepartmentInput {
            id: DepartmentId::new(self.allocate_id()),
            organization_id: department.organization_id,
            name: department.name.into(),
            parent_id: department.parent_id,
            manager_id: department.manager_id,
            is_active: true,
            created_at: department.created_at,
            updated_at: department.created_at,
        })?;
        departments.insert(created.id(), created.clone());
        Ok(created)
    }

    async fn save_department(&self, department: Department) -> AppResult<()> {
        let mut departments = self.departments.write().await;
        if !departments.contains_key(&department.id()) {
            return Err(AppError::NotFound(format!(
                "department '{}' not found",
                department.id()
            )));
        }
        if duplicate_department_name(
            &departments,
            Some(department.id()),
            department.organization_id(),
            department.name().as_str(),
        ) {
            return Err(AppError::Conflict(format!(
                "department '{}' already exists in organization '{}'",
                department.name(),
                department.organization_id()
            )));
        }

        departments.insert(department.id(), department);
        Ok(())
    }
}

#[async_trait]
impl TicketRepository for InMemoryTenantStore {
    async fn create_ticket(&self, ticket: NewTicket) -> AppResult<Ticket> {
        let created = Ticket::from_new(TicketId::new(self.allocate_id()), ticket);
        self.tickets
            .write()
            .await
            .insert(created.id(), created.clone());
        Ok(created)
    }

    async fn find_ticket(&self, ticket_id: TicketId) -> AppResult<Option<Ticket>> {
        Ok(self.tickets.read().await.get(&ticket_id).cloned())
    }

    async fn list_tickets(&self, query: TicketQuery) -> AppResult<Vec<Ticket>> {
        let tickets = self.tickets.read().await;
        let mut visible: Vec<&Ticket> = tickets
            .values()
            .filter(|ticket| query.matches(ticket))
            .collect();
        visible.sort_by(|left, right| {
            right
                .created_at()
                .cmp(&left.created_at())
                .then_with(|| right.id().cmp(&left.id()))
        });

        Ok(visible
            .into_iter()
            .skip(query.offset)
            .take(query.limit)
            .cloned()
            .collect())
    }

    async fn save_ticket(&self, ticket: Ticket) -> AppResult<()> {
        let mut tickets = self.tickets.write().await;
        let Some(slot) = tickets.get_mut(&ticket.id()) else {
            return Err(AppError::NotFound(format!(
                "ticket '{}' not found",
                ticket.id()
            )));
        };

        *slot = ticket;
        Ok(())
    }
}

#[async_trait]
impl HourBankRepository for InMemoryTenantStore {
    async fn list_hour_banks(
        &self,
        organization_id: Option<OrganizationId>,
    ) -> AppResult<Vec<HourBank>> {
        Ok(self
            .hour_banks
            .read()
            .await
            .values()
            .filter(|bank| organization_id.is_none_or(|value| value == bank.organization_id()))
            .cloned()
            .collect())
    }

    async fn create_request(&self, request: NewHourBankRequest) -> AppResult<HourBankRequest> {
        let created =
            HourBankRequest::from_new(HourBankRequestId::new(self.allocate_id()), request);
        self.hour_bank_requests
            .write()
            .await
            .insert(created.id(), created.clone());
        Ok(created)
    }

    async fn find_request(
        &self,
        request_id: HourBankRequestId,
    ) -> AppResult<Option<HourBankRequest>> {
        Ok(self.hour_bank_requests.read().await.get(&request_id).cloned())
    }

    async fn list_requests(
        &self,
        organization_id: Option<OrganizationId>,
        status: Option<HourBankRequestStatus>,
    ) -> AppResult<Vec<HourBankRequest>> {
        Ok(self
            .hour_bank_requests
            .read()
            .await
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
        // Both guards are held until the decision and the credit are stored.
        let mut requests = self.hour_bank_requests.write().await;
        let mut banks = self.hour_banks.write().await;

        let Some(current) = requests.get(&request_id) else {
            return Err(AppError::NotFound(format!(
                "hour bank request '{request_id}' not found"
            )));
        };
        let mut request = current.clone();
        request.decide(
            decision.decision,
            decision.approver_id,
            decision.notes,
            decision.processed_at,
        )?;

        let hour_bank = match decision.decision {
            HourBankDecision::Approve => {
                let active = banks.values_mut().find(|bank| {
                    bank.is_active()
                        && bank.organization_id() == request.organization_id()
                        && bank.company_id() == request.company_id()
                });
                let bank = match active {
                    Some(bank) => {
                        bank.credit(
                            request.requested_hours(),
                            request.hourly_rate(),
                            decision.processed_at,
                        );
                        bank.clone()
                    }
                    None => {
                        let bank = HourBank::new(HourBankInput {
                            id: HourBankId::new(self.allocate_id()),
                            organization_id: request.organization_id(),
                            company_id: request.company_id(),
                            total_hours: request.requested_hours(),
                            used_hours: Decimal::ZERO,
                            hourly_rate: request.hourly_rate().unwrap_or_default(),
                            is_active: true,
                            created_at: decision.processed_at,
                            updated_at: decision.processed_at,
                        })?;
                        banks.insert(bank.id(), bank.clone());
                        bank
                    }
                };
                Some(bank)
            }
            HourBankDecision::Reject => None,
        };

        requests.insert(request.id(), request.clone());
        Ok(ProcessedHourBankRequest { request, hour_bank })
    }
}

#[async_trait]
impl AuditRepository for InMemoryTenantStore {
    async fn append_event(&self, event: AuditEvent) -> AppResult<()> {
        self.audit_events.write().await.push(event);
        Ok(())
    }
}
