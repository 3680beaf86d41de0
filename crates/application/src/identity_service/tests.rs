use std::sync::Arc;

use tenantdesk_core::{AppError, DepartmentId, OrganizationId, UserId, UserIdentity};
use tenantdesk_domain::{
    Action, EffectiveScope, OrganizationType, Resource, UserAccount, UserRole,
};

use crate::test_support::{ActorBuilder, FakeStore};

use super::IdentityService;

async fn seeded_store() -> Arc<FakeStore> {
    let store = Arc::new(FakeStore::default());
    store
        .seed_organization(1, "Operator", OrganizationType::SystemOwner)
        .await;
    store
        .seed_organization(2, "Acme", OrganizationType::ClientCompany)
        .await;
    store.seed_department(10, 2, "Finance").await;
    store.seed_department(20, 1, "Service Desk").await;
    store
}

fn service(store: &Arc<FakeStore>) -> IdentityService {
    IdentityService::new(store.clone(), store.clone(), store.clone())
}

fn identity(id: i64) -> UserIdentity {
    UserIdentity::new(UserId::new(id), format!("User {id}"), None)
}

#[tokio::test]
async fn loads_scope_and_permissions() {
    let store = seeded_store().await;
    let account = ActorBuilder::new(7, UserRole::CompanyAgent)
        .organization(2)
        .department(10)
        .account();
    store
        .seed_user(account, &["tickets:create", "tickets:read", "bogus"])
        .await;

    let actor = service(&store).load_actor(&identity(7)).await;

    assert!(actor.is_ok());
    let actor = actor.unwrap_or_else(|_| unreachable!());
    assert_eq!(
        actor.scope(),
        EffectiveScope::Department {
            organization_id: Some(OrganizationId::new(2)),
            department_id: DepartmentId::new(10),
        }
    );
    assert_eq!(actor.organization_type(), Some(OrganizationType::ClientCompany));
    assert_eq!(actor.permissions().len(), 2);
    assert!(
        actor
            .permissions()
            .contains(Resource::Tickets, Action::Create)
    );
}

#[tokio::test]
async fn unknown_user_is_unauthorized() {
    let store = seeded_store().await;

    let result = service(&store).load_actor(&identity(404)).await;

    assert!(matches!(result, Err(AppError::Unauthorized(_))));
}

#[tokio::test]
async fn inactive_user_is_unauthorized() {
    let store = seeded_store().await;
    let account = UserAccount {
        is_active: false,
        ..ActorBuilder::new(8, UserRole::CompanyUser)
            .organization(2)
            .account()
    };
    store.seed_user(account, &[]).await;

    let result = service(&store).load_actor(&identity(8)).await;

    assert!(matches!(result, Err(AppError::Unauthorized(_))));
}

#[tokio::test]
async fn department_of_another_organization_fails_closed() {
    let store = seeded_store().await;
    let account = ActorBuilder::new(9, UserRole::CompanyAgent)
        .organization(2)
        .department(20)
        .account();
    store.seed_user(account, &[]).await;

    let result = service(&store).load_actor(&identity(9)).await;

    assert!(matches!(result, Err(AppError::Unauthorized(_))));
}

#[tokio::test]
async fn system_owner_staff_are_marked() {
    let store = seeded_store().await;
    let account = ActorBuilder::new(3, UserRole::SystemAgent)
        .system_owner(1)
        .department(20)
        .cross_organizations()
        .account();
    store.seed_user(account, &["tickets:assign"]).await;

    let actor = service(&store)
        .load_actor(&identity(3))
        .await
        .unwrap_or_else(|_| unreachable!());

    assert!(actor.belongs_to_system_owner());
    assert!(actor.scope().is_global());
}
