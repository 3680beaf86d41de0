use std::collections::BTreeSet;
use std::sync::Arc;

use tenantdesk_core::{DepartmentId, OrganizationId};
use tenantdesk_domain::{Actor, OrganizationType, UserRole};

use crate::test_support::{ActorBuilder, FakeStore};

use super::ScopeResolver;

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
    store.seed_department(1, 1, "Service Desk").await;
    store.seed_department(10, 2, "Finance").await;
    store.seed_department(11, 2, "Support").await;
    store.seed_department(20, 3, "Operations").await;
    store
}

fn resolver(store: &Arc<FakeStore>) -> ScopeResolver {
    ScopeResolver::new(store.clone(), store.clone())
}

fn actors() -> Vec<Actor> {
    vec![
        ActorBuilder::new(1, UserRole::SuperAdmin)
            .system_owner(1)
            .super_user()
            .build(),
        ActorBuilder::new(2, UserRole::SystemAgent)
            .system_owner(1)
            .department(1)
            .cross_organizations()
            .build(),
        ActorBuilder::new(3, UserRole::CompanyManager)
            .organization(2)
            .department(10)
            .cross_departments()
            .build(),
        ActorBuilder::new(4, UserRole::CompanyAgent)
            .organization(2)
            .department(10)
            .build(),
        ActorBuilder::new(5, UserRole::CompanyAdmin)
            .organization(2)
            .build(),
        ActorBuilder::new(6, UserRole::CompanyUser).build(),
    ]
}

fn ids(values: &[i64]) -> BTreeSet<DepartmentId> {
    values.iter().copied().map(DepartmentId::new).collect()
}

#[tokio::test]
async fn department_enumeration_agrees_with_membership() {
    let store = seeded_store().await;
    let resolver = resolver(&store);
    let filters = [None, Some(1), Some(2), Some(3), Some(99)];
    let candidates = [1, 10, 11, 20, 404];

    for actor in actors() {
        for filter in filters.map(|value| value.map(OrganizationId::new)) {
            let enumerated = resolver
                .accessible_department_ids(&actor, filter)
                .await
                .unwrap_or_default();

            for candidate in candidates.map(DepartmentId::new) {
                let member = resolver
                    .can_access_department(&actor, candidate, filter)
                    .await
                    .unwrap_or_default();
                assert_eq!(
                    enumerated.contains(&candidate),
                    member,
                    "actor {} filter {filter:?} department {candidate}",
                    actor.id()
                );
            }
        }
    }
}

#[tokio::test]
async fn organization_enumeration_agrees_with_membership() {
    let store = seeded_store().await;
    let resolver = resolver(&store);

    for actor in actors() {
        let enumerated = resolver
            .accessible_organization_ids(&actor)
            .await
            .unwrap_or_default();
        for candidate in [1, 2, 3, 404].map(OrganizationId::new) {
            let member = resolver
                .can_access_organization(&actor, candidate)
                .await
                .unwrap_or_default();
            assert_eq!(enumerated.contains(&candidate), member);
        }
    }
}

#[tokio::test]
async fn global_actor_reaches_every_department() {
    let store = seeded_store().await;
    let resolver = resolver(&store);
    let actor = ActorBuilder::new(1, UserRole::SuperAdmin).super_user().build();

    let all = resolver
        .accessible_department_ids(&actor, None)
        .await
        .unwrap_or_default();
    let filtered = resolver
        .accessible_department_ids(&actor, Some(OrganizationId::new(2)))
        .await
        .unwrap_or_default();

    assert_eq!(all, ids(&[1, 10, 11, 20]));
    assert_eq!(filtered, ids(&[10, 11]));
}

#[tokio::test]
async fn cross_department_actor_is_confined_to_own_organization() {
    let store = seeded_store().await;
    let resolver = resolver(&store);
    let actor = ActorBuilder::new(3, UserRole::CompanyManager)
        .organization(2)
        .cross_departments()
        .build();

    let own = resolver
        .accessible_department_ids(&actor, None)
        .await
        .unwrap_or_default();
    let foreign = resolver
        .accessible_department_ids(&actor, Some(OrganizationId::new(3)))
        .await
        .unwrap_or_default();

    assert_eq!(own, ids(&[10, 11]));
    assert!(foreign.is_empty());
}

#[tokio::test]
async fn confined_actor_sees_only_own_department() {
    let store = seeded_store().await;
    let resolver = resolver(&store);
    let actor = ActorBuilder::new(4, UserRole::CompanyAgent)
        .organization(2)
        .department(10)
        .build();

    let departments = resolver
        .accessible_departments(&actor, None)
        .await
        .unwrap_or_default();
    let organizations = resolver
        .accessible_organization_ids(&actor)
        .await
        .unwrap_or_default();

    assert_eq!(departments.len(), 1);
    assert_eq!(
        departments.first().map(|department| department.id()),
        Some(DepartmentId::new(10))
    );
    assert_eq!(organizations, BTreeSet::from([OrganizationId::new(2)]));
}

#[tokio::test]
async fn actor_without_tenant_reaches_nothing() {
    let store = seeded_store().await;
    let resolver = resolver(&store);
    let actor = ActorBuilder::new(6, UserRole::CompanyUser).build();

    assert!(
        resolver
            .accessible_organizations(&actor)
            .await
            .unwrap_or_default()
            .is_empty()
    );
    assert!(
        resolver
            .accessible_departments(&actor, None)
            .await
            .unwrap_or_default()
            .is_empty()
    );
}
