use std::sync::Arc;

use rust_decimal::Decimal;
use tenantdesk_core::{AppError, CompanyId, HourBankRequestId, OrganizationId};
use tenantdesk_domain::{
    Actor, AuditAction, HourBankDecision, HourBankRequestStatus, OrganizationType, UserRole,
};

use crate::test_support::{ActorBuilder, FakeStore, permissions};

use super::{CreateHourBankRequestInput, HourBankService};

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
    store
}

fn service(store: &Arc<FakeStore>) -> HourBankService {
    HourBankService::new(store.clone(), store.clone(), store.clone())
}

fn approver() -> Actor {
    ActorBuilder::new(5, UserRole::CompanyManager)
        .organization(2)
        .permissions(permissions(&["hour_bank_requests:approve"]))
        .build()
}

#[tokio::test]
async fn approval_creates_and_then_credits_the_active_bank() {
    let store = seeded_store().await;
    store.seed_hour_bank_request(1, 2, 4, 10).await;
    store.seed_hour_bank_request(2, 2, 4, 5).await;
    let service = service(&store);
    let actor = approver();

    let first = service
        .process_hour_bank_request(
            &actor,
            HourBankRequestId::new(1),
            HourBankDecision::Approve,
            Some("  ok  ".to_owned()),
        )
        .await
        .unwrap_or_else(|_| unreachable!());
    let second = service
        .process_hour_bank_request(
            &actor,
            HourBankRequestId::new(2),
            HourBankDecision::Approve,
            None,
        )
        .await
        .unwrap_or_else(|_| unreachable!());

    assert_eq!(first.request.status(), HourBankRequestStatus::Approved);
    assert_eq!(first.request.decision_notes(), Some("ok"));
    assert_eq!(
        second.hour_bank.as_ref().map(|bank| bank.total_hours()),
        Some(Decimal::new(15, 0))
    );

    let banks = store.hour_banks().await;
    assert_eq!(banks.len(), 1);
    assert!(banks.iter().all(|bank| {
        bank.organization_id() == OrganizationId::new(2) && bank.company_id() == CompanyId::new(4)
    }));
}

#[tokio::test]
async fn rejection_leaves_banks_untouched() {
    let store = seeded_store().await;
    store.seed_hour_bank_request(1, 2, 4, 10).await;

    let processed = service(&store)
        .process_hour_bank_request(
            &approver(),
            HourBankRequestId::new(1),
            HourBankDecision::Reject,
            None,
        )
        .await
        .unwrap_or_else(|_| unreachable!());

    assert_eq!(processed.request.status(), HourBankRequestStatus::Rejected);
    assert!(processed.hour_bank.is_none());
    assert!(store.hour_banks().await.is_empty());
    assert!(
        store
            .audit_events()
            .await
            .iter()
            .any(|event| event.action == AuditAction::HourBankRequestRejected)
    );
}

#[tokio::test]
async fn second_decision_conflicts() {
    let store = seeded_store().await;
    store.seed_hour_bank_request(1, 2, 4, 10).await;
    let service = service(&store);
    let actor = approver();

    let first = service
        .process_hour_bank_request(
            &actor,
            HourBankRequestId::new(1),
            HourBankDecision::Approve,
            None,
        )
        .await;
    let second = service
        .process_hour_bank_request(
            &actor,
            HourBankRequestId::new(1),
            HourBankDecision::Reject,
            None,
        )
        .await;

    assert!(first.is_ok());
    assert!(matches!(
        second,
        Err(AppError::ConflictingStateTransition(_))
    ));
}

#[tokio::test]
async fn committed_approval_stands_when_audit_append_fails() {
    let store = seeded_store().await;
    store.seed_hour_bank_request(1, 2, 4, 10).await;
    store.break_audit_log().await;
    let service = service(&store);
    let actor = approver();

    let processed = service
        .process_hour_bank_request(
            &actor,
            HourBankRequestId::new(1),
            HourBankDecision::Approve,
            None,
        )
        .await
        .unwrap_or_else(|_| unreachable!());
    let retry = service
        .process_hour_bank_request(
            &actor,
            HourBankRequestId::new(1),
            HourBankDecision::Approve,
            None,
        )
        .await;

    assert_eq!(processed.request.status(), HourBankRequestStatus::Approved);
    assert!(matches!(
        retry,
        Err(AppError::ConflictingStateTransition(_))
    ));
    let banks = store.hour_banks().await;
    assert_eq!(banks.len(), 1);
    assert!(banks.iter().all(|bank| bank.total_hours() == Decimal::new(10, 0)));
    assert!(store.audit_events().await.is_empty());
}

#[tokio::test]
async fn concurrent_approvals_credit_exactly_once() {
    let store = seeded_store().await;
    store.seed_hour_bank_request(1, 2, 4, 10).await;
    let service = service(&store);
    let actor = approver();

    let (left, right) = tokio::join!(
        service.process_hour_bank_request(
            &actor,
            HourBankRequestId::new(1),
            HourBankDecision::Approve,
            None,
        ),
        service.process_hour_bank_request(
            &actor,
            HourBankRequestId::new(1),
            HourBankDecision::Approve,
            None,
        ),
    );

    let successes = [left.is_ok(), right.is_ok()]
        .into_iter()
        .filter(|value| *value)
        .count();
    assert_eq!(successes, 1);
    assert!(
        [left, right]
            .into_iter()
            .filter_map(Result::err)
            .all(|error| matches!(error, AppError::ConflictingStateTransition(_)))
    );

    let banks = store.hour_banks().await;
    assert_eq!(
        banks.first().map(|bank| bank.total_hours()),
        Some(Decimal::new(10, 0))
    );
}

#[tokio::test]
async fn foreign_request_is_reported_missing() {
    let store = seeded_store().await;
    store.seed_hour_bank_request(1, 3, 4, 10).await;

    let result = service(&store)
        .process_hour_bank_request(
            &approver(),
            HourBankRequestId::new(1),
            HourBankDecision::Approve,
            None,
        )
        .await;

    assert!(matches!(result, Err(AppError::NotFound(_))));
}

#[tokio::test]
async fn processing_requires_approve_permission() {
    let store = seeded_store().await;
    store.seed_hour_bank_request(1, 2, 4, 10).await;
    let actor = ActorBuilder::new(6, UserRole::CompanyUser)
        .organization(2)
        .build();

    let result = service(&store)
        .process_hour_bank_request(
            &actor,
            HourBankRequestId::new(1),
            HourBankDecision::Approve,
            None,
        )
        .await;

    assert!(matches!(result, Err(AppError::Forbidden(_))));
}

#[tokio::test]
async fn requests_are_filed_in_own_organization_only() {
    let store = seeded_store().await;
    let actor = ActorBuilder::new(6, UserRole::CompanyUser)
        .organization(2)
        .permissions(permissions(&["hour_bank_requests:create"]))
        .build();
    let service = service(&store);
    let input = CreateHourBankRequestInput {
        organization_id: None,
        company_id: CompanyId::new(4),
        requested_hours: Decimal::new(8, 0),
        hourly_rate: None,
        justification: Some("Month-end close".to_owned()),
    };

    let own = service.create_hour_bank_request(&actor, input.clone()).await;
    let foreign = service
        .create_hour_bank_request(
            &actor,
            CreateHourBankRequestInput {
                organization_id: Some(OrganizationId::new(3)),
                ..input
            },
        )
        .await;

    assert!(own.is_ok_and(|request| request.status() == HourBankRequestStatus::Pending));
    assert!(matches!(foreign, Err(AppError::ScopeDenied(_))));
}
