use std::sync::Arc;

use tenantdesk_core::{AppError, DepartmentId, OrganizationId, UserId};
use tenantdesk_domain::{Actor, AuditAction, Department, OrganizationType, UserRole};

use crate::ScopeResolver;
use crate::test_support::{ActorBuilder, FakeStore, permissions};

use super::{CreateDepartmentInput, DepartmentService, UpdateDepartmentInput};

async fn seeded_store() -> Arc<FakeStore> {
    let store = Arc::new(FakeStore::default());
    store
        .seed_organization(1, "Operator", OrganizationType::SystemOwner)
        .await;
    store
        .seed_organization(2, "Acme", OrganizationType::ClientCompany)
        .await;
    store
        .seed_organization(3, "Globex", OrganizationType::ClientCompany)
        .await;
    store.seed_department(10, 2, "Finance").await;
    store.seed_department(11, 2, "Support").await;
    store.seed_department(20, 3, "Operations").await;
    store
        .seed_user(
            ActorBuilder::new(200, UserRole::CompanyManager)
                .organization(2)
                .account(),
            &[],
        )
        .await;
    store
        .seed_user(
            ActorBuilder::new(300, UserRole::CompanyAgent)
                .organization(3)
                .account(),
            &[],
        )
        .await;
    store
}

fn service(store: &Arc<FakeStore>) -> DepartmentService {
    DepartmentService::new(
        store.clone(),
        store.clone(),
        store.clone(),
        store.clone(),
        ScopeResolver::new(store.clone(), store.clone()),
    )
}

fn acme(role: UserRole, grants: &[&str]) -> Actor {
    ActorBuilder::new(201, role)
        .organization(2)
        .permissions(permissions(grants))
        .build()
}

fn acme_admin() -> Actor {
    ActorBuilder::new(202, UserRole::CompanyAdmin)
        .organization(2)
        .cross_departments()
        .build()
}

fn rename(name: &str) -> UpdateDepartmentInput {
    UpdateDepartmentInput {
        name: Some(name.to_owned()),
        ..UpdateDepartmentInput::default()
    }
}

fn listed_ids(departments: &[Department]) -> Vec<DepartmentId> {
    let mut ids: Vec<_> = departments.iter().map(Department::id).collect();
    ids.sort();
    ids
}

fn create_input(name: &str) -> CreateDepartmentInput {
    CreateDepartmentInput {
        organization_id: None,
        name: name.to_owned(),
        parent_id: None,
        manager_id: None,
    }
}

#[tokio::test]
async fn permission_holder_creates_in_own_organization() {
    let store = seeded_store().await;
    let actor = acme(UserRole::CompanyAgent, &["departments:create"]);

    let department = service(&store)
        .create_department(
            &actor,
            CreateDepartmentInput {
                parent_id: Some(DepartmentId::new(10)),
                manager_id: Some(UserId::new(200)),
                ..create_input("Payroll")
            },
        )
        .await
        .unwrap_or_else(|_| unreachable!());

    assert_eq!(department.organization_id(), OrganizationId::new(2));
    assert_eq!(department.parent_id(), Some(DepartmentId::new(10)));
    assert!(
        store
            .audit_events()
            .await
            .iter()
            .any(|event| event.action == AuditAction::DepartmentCreated)
    );
}

#[tokio::test]
async fn organization_admin_role_creates_without_permission() {
    let store = seeded_store().await;
    let actor = acme(UserRole::CompanyAdmin, &[]);

    let result = service(&store)
        .create_department(&actor, create_input("Legal"))
        .await;

    assert!(result.is_ok());
}

#[tokio::test]
async fn plain_member_without_permission_is_forbidden() {
    let store = seeded_store().await;
    let actor = acme(UserRole::CompanyAgent, &[]);

    let result = service(&store)
        .create_department(&actor, create_input("Legal"))
        .await;

    assert!(matches!(result, Err(AppError::Forbidden(_))));
}

#[tokio::test]
async fn foreign_organization_is_scope_denied() {
    let store = seeded_store().await;
    let actor = acme(UserRole::CompanyAdmin, &["departments:create"]);

    let result = service(&store)
        .create_department(
            &actor,
            CreateDepartmentInput {
                organization_id: Some(OrganizationId::new(3)),
                ..create_input("Infiltration")
            },
        )
        .await;

    assert!(matches!(
        result,
        Err(AppError::ScopeDenied(ref message))
            if message.contains("cannot create department for different organization")
    ));
}

#[tokio::test]
async fn global_actor_creates_anywhere() {
    let store = seeded_store().await;
    let actor = ActorBuilder::new(1, UserRole::SuperAdmin).super_user().build();

    let department = service(&store)
        .create_department(
            &actor,
            CreateDepartmentInput {
                organization_id: Some(OrganizationId::new(3)),
                ..create_input("Logistics")
            },
        )
        .await
        .unwrap_or_else(|_| unreachable!());

    assert_eq!(department.organization_id(), OrganizationId::new(3));
}

#[tokio::test]
async fn duplicate_name_conflicts_and_foreign_parent_is_rejected() {
    let store = seeded_store().await;
    let actor = acme(UserRole::CompanyAdmin, &[]);
    let service = service(&store);

    let duplicate = service
        .create_department(&actor, create_input("Finance"))
        .await;
    let foreign_parent = service
        .create_department(
            &actor,
            CreateDepartmentInput {
                parent_id: Some(DepartmentId::new(20)),
                ..create_input("Treasury")
            },
        )
        .await;
    let foreign_manager = service
        .create_department(
            &actor,
            CreateDepartmentInput {
                manager_id: Some(UserId::new(300)),
                ..create_input("Treasury")
            },
        )
        .await;

    assert!(matches!(duplicate, Err(AppError::Conflict(_))));
    assert!(matches!(foreign_parent, Err(AppError::Validation(_))));
    assert!(matches!(foreign_manager, Err(AppError::Validation(_))));
}

#[tokio::test]
async fn reparenting_under_descendant_is_rejected() {
    let store = seeded_store().await;
    let actor = acme_admin();
    let service = service(&store);

    let child = service
        .create_department(
            &actor,
            CreateDepartmentInput {
                parent_id: Some(DepartmentId::new(10)),
                ..create_input("Accounts Payable")
            },
        )
        .await
        .unwrap_or_else(|_| unreachable!());

    let result = service
        .update_department(
            &actor,
            DepartmentId::new(10),
            UpdateDepartmentInput {
                parent_id: Some(Some(child.id())),
                ..UpdateDepartmentInput::default()
            },
        )
        .await;

    assert!(matches!(result, Err(AppError::Validation(_))));
}

#[tokio::test]
async fn update_outside_scope_is_reported_missing() {
    let store = seeded_store().await;
    let actor = acme_admin();

    let result = service(&store)
        .update_department(
            &actor,
            DepartmentId::new(20),
            UpdateDepartmentInput {
                name: Some("Renamed".to_owned()),
                ..UpdateDepartmentInput::default()
            },
        )
        .await;

    assert!(matches!(result, Err(AppError::NotFound(_))));
}

#[tokio::test]
async fn confined_manager_updates_own_department() {
    let store = seeded_store().await;
    let actor = ActorBuilder::new(200, UserRole::CompanyManager)
        .organization(2)
        .department(10)
        .build();

    let department = service(&store)
        .update_department(
            &actor,
            DepartmentId::new(10),
            UpdateDepartmentInput {
                name: Some("Finance & Control".to_owned()),
                is_active: Some(false),
                ..UpdateDepartmentInput::default()
            },
        )
        .await
        .unwrap_or_else(|_| unreachable!());

    assert_eq!(department.name().as_str(), "Finance & Control");
    assert!(!department.is_active());
}

#[tokio::test]
async fn department_bound_admin_renames_sibling_department() {
    let store = seeded_store().await;
    let actor = ActorBuilder::new(200, UserRole::CompanyAdmin)
        .organization(2)
        .department(10)
        .build();

    let department = service(&store)
        .update_department(&actor, DepartmentId::new(11), rename("Customer Care"))
        .await
        .unwrap_or_else(|_| unreachable!());

    assert_eq!(department.name().as_str(), "Customer Care");
    assert_eq!(
        store
            .audit_events()
            .await
            .iter()
            .filter(|event| event.action == AuditAction::DepartmentUpdated)
            .count(),
        1
    );
}

#[tokio::test]
async fn department_bound_update_permission_reaches_sibling_department() {
    let store = seeded_store().await;
    let actor = ActorBuilder::new(201, UserRole::CompanyAgent)
        .organization(2)
        .department(10)
        .permissions(permissions(&["departments:update"]))
        .build();

    let result = service(&store)
        .update_department(&actor, DepartmentId::new(11), rename("Helpdesk"))
        .await;

    assert!(result.is_ok());
}

#[tokio::test]
async fn department_bound_member_cannot_see_sibling_department() {
    let store = seeded_store().await;
    let actor = ActorBuilder::new(201, UserRole::CompanyAgent)
        .organization(2)
        .department(10)
        .build();

    let result = service(&store)
        .update_department(&actor, DepartmentId::new(11), rename("Helpdesk"))
        .await;

    assert!(matches!(result, Err(AppError::NotFound(_))));
}

#[tokio::test]
async fn department_bound_admin_cannot_reach_foreign_organization() {
    let store = seeded_store().await;
    let actor = ActorBuilder::new(200, UserRole::CompanyAdmin)
        .organization(2)
        .department(10)
        .permissions(permissions(&["departments:update"]))
        .build();

    let result = service(&store)
        .update_department(&actor, DepartmentId::new(20), rename("Renamed"))
        .await;

    assert!(matches!(result, Err(AppError::NotFound(_))));
}

#[tokio::test]
async fn department_bound_admin_creates_and_lists_own_department() {
    let store = seeded_store().await;
    let actor = ActorBuilder::new(200, UserRole::CompanyAdmin)
        .organization(2)
        .department(10)
        .build();
    let service = service(&store);

    let created = service
        .create_department(&actor, create_input("Legal"))
        .await
        .unwrap_or_else(|_| unreachable!());
    let listed = service
        .list_departments(&actor, None)
        .await
        .unwrap_or_else(|_| unreachable!());

    assert_eq!(created.organization_id(), OrganizationId::new(2));
    assert_eq!(listed_ids(&listed), vec![DepartmentId::new(10)]);
}

#[tokio::test]
async fn organization_wide_admin_creates_updates_and_lists() {
    let store = seeded_store().await;
    let actor = acme(UserRole::CompanyAdmin, &[]);
    let service = service(&store);

    let created = service
        .create_department(&actor, create_input("Legal"))
        .await
        .unwrap_or_else(|_| unreachable!());
    let updated = service
        .update_department(&actor, DepartmentId::new(11), rename("Customer Care"))
        .await
        .unwrap_or_else(|_| unreachable!());
    let listed = service
        .list_departments(&actor, None)
        .await
        .unwrap_or_else(|_| unreachable!());

    assert_eq!(updated.name().as_str(), "Customer Care");
    assert_eq!(
        listed_ids(&listed),
        vec![DepartmentId::new(10), DepartmentId::new(11), created.id()]
    );
}

#[tokio::test]
async fn created_department_is_returned_when_audit_append_fails() {
    let store = seeded_store().await;
    store.break_audit_log().await;

    let department = service(&store)
        .create_department(&acme(UserRole::CompanyAdmin, &[]), create_input("Legal"))
        .await
        .unwrap_or_else(|_| unreachable!());

    assert_eq!(department.name().as_str(), "Legal");
    assert!(store.audit_events().await.is_empty());
}
