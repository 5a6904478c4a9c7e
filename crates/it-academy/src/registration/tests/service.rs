use super::common::*;
use crate::config::RegistrationConfig;
use crate::registration::domain::{FieldName, FieldValue};
use crate::registration::redirect::TokioRedirectScheduler;
use crate::registration::session::WizardId;
use crate::registration::wizard::{SubmitOutcome, WizardError};
use crate::registration::{RegistrationService, RegistrationServiceError, StoreError};
use std::sync::atomic::Ordering;
use std::sync::Arc;

async fn fill_all<N>(service: &TestService<N>, id: &WizardId)
where
    N: crate::registration::NotificationSender + 'static,
{
    let fields = [
        (FieldName::FullName, FieldValue::from("Jane Doe")),
        (FieldName::Email, FieldValue::from("jane@example.com")),
        (FieldName::Phone, FieldValue::from("5551234567")),
        (FieldName::CourseInterest, FieldValue::from("data-science")),
        (FieldName::ExperienceLevel, FieldValue::from("beginner")),
        (FieldName::EducationLevel, FieldValue::from("high school")),
        (FieldName::AgreeTerms, FieldValue::from(true)),
    ];
    for (name, value) in fields {
        service
            .set_field(id, name, value)
            .await
            .expect("field accepted");
    }
}

#[tokio::test]
async fn create_registers_an_empty_wizard() {
    let (service, store, _) = build_service(RecordingSender::default(), settings());

    let view = service.create().await.expect("wizard created");

    assert!(view.wizard_id.0.starts_with("wiz-"));
    assert_eq!(view.current_step, 0);
    assert_eq!(view.step_label, "Personal Info");
    assert_eq!(view.steps.len(), 4);
    assert!(view.errors.is_empty());
    assert!(!view.succeeded);
    assert_eq!(store.len(), 1);
}

#[tokio::test]
async fn operations_on_unknown_sessions_report_not_found() {
    let (service, _, _) = build_service(RecordingSender::default(), settings());
    let id = WizardId("wiz-missing".to_string());

    assert!(matches!(
        service.view(&id).await,
        Err(RegistrationServiceError::NotFound(_))
    ));
    assert!(matches!(
        service.advance(&id).await,
        Err(RegistrationServiceError::NotFound(_))
    ));
    assert!(matches!(
        service.discard(&id).await,
        Err(RegistrationServiceError::NotFound(_))
    ));
}

#[tokio::test]
async fn create_propagates_store_failures() {
    let service = RegistrationService::new(
        Arc::new(UnavailableStore),
        Arc::new(RecordingSender::default()),
        Arc::new(TokioRedirectScheduler),
        settings(),
    );

    match service.create().await {
        Err(RegistrationServiceError::Store(StoreError::Unavailable(_))) => {}
        other => panic!("expected store failure, got {other:?}"),
    }
}

#[tokio::test]
async fn advance_reports_blocked_transitions() {
    let (service, _, _) = build_service(RecordingSender::default(), settings());
    let id = service.create().await.expect("wizard created").wizard_id;

    let blocked = service.advance(&id).await.expect("advance runs");
    assert!(!blocked.advanced);
    assert_eq!(blocked.view.current_step, 0);
    assert_eq!(blocked.view.errors.len(), 3);

    fill_all(&service, &id).await;
    let moved = service.advance(&id).await.expect("advance runs");
    assert!(moved.advanced);
    assert_eq!(moved.view.step_label, "Course Selection");

    let back = service.retreat(&id).await.expect("retreat runs");
    assert_eq!(back.current_step, 0);
    assert_eq!(back.draft.full_name, "Jane Doe");
}

#[tokio::test]
async fn submit_records_the_scheduled_redirect() {
    let store = Arc::new(MemoryStore::default());
    let sender = Arc::new(RecordingSender::default());
    let scheduler = Arc::new(RecordingScheduler::default());
    let service = RegistrationService::new(store.clone(), sender.clone(), scheduler.clone(), settings());
    let id = service.create().await.expect("wizard created").wizard_id;
    fill_all(&service, &id).await;

    let report = service.submit(&id).await.expect("submit runs");

    assert_eq!(report.outcome, SubmitOutcome::Delivered);
    assert!(report.view.succeeded);
    assert!(!report.view.submitting);
    assert_eq!(sender.sent().len(), 1);
    let scheduled = scheduler.scheduled();
    assert_eq!(scheduled.len(), 1);
    assert_eq!(scheduled[0].to, "/itacademy");
    assert_eq!(scheduled[0].after, secs(4));
    assert_eq!(report.view.redirect, Some(scheduled[0].clone()));
}

#[tokio::test]
async fn invalid_submit_does_not_schedule_anything() {
    let store = Arc::new(MemoryStore::default());
    let sender = Arc::new(RecordingSender::default());
    let scheduler = Arc::new(RecordingScheduler::default());
    let service = RegistrationService::new(store, sender.clone(), scheduler.clone(), settings());
    let id = service.create().await.expect("wizard created").wizard_id;

    let report = service.submit(&id).await.expect("submit runs");

    assert_eq!(report.outcome, SubmitOutcome::Invalid { step: 0 });
    assert!(sender.sent().is_empty());
    assert!(scheduler.scheduled().is_empty());
    assert!(report.view.redirect.is_none());
}

#[tokio::test(start_paused = true)]
async fn redirect_discards_the_session_after_delay() {
    let (service, store, _) = build_service(RecordingSender::failing(), settings());
    let id = service.create().await.expect("wizard created").wizard_id;
    fill_all(&service, &id).await;

    let report = service.submit(&id).await.expect("submit runs");
    assert_eq!(report.outcome, SubmitOutcome::DeliveryMasked);
    assert_eq!(report.view.redirect.as_ref().map(|r| r.after), Some(secs(3)));

    tokio::time::sleep(secs(2)).await;
    assert_eq!(store.len(), 1);

    tokio::time::sleep(secs(2)).await;
    tokio::task::yield_now().await;
    assert_eq!(store.len(), 0);
    assert!(matches!(
        service.view(&id).await,
        Err(RegistrationServiceError::NotFound(_))
    ));
}

#[tokio::test(start_paused = true)]
async fn discard_cancels_the_pending_redirect() {
    let (service, store, _) = build_service(RecordingSender::default(), settings());
    let first = service.create().await.expect("wizard created").wizard_id;
    let second = service.create().await.expect("wizard created").wizard_id;
    fill_all(&service, &first).await;
    service.submit(&first).await.expect("submit runs");

    service.discard(&first).await.expect("discard succeeds");
    assert_eq!(store.len(), 1);

    tokio::time::sleep(secs(10)).await;
    assert_eq!(store.len(), 1);
    assert!(service.view(&second).await.is_ok());
}

#[tokio::test]
async fn concurrent_submit_is_rejected_while_in_flight() {
    let (service, _, sender) = build_service(GatedSender::default(), settings());
    let id = service.create().await.expect("wizard created").wizard_id;
    fill_all(&service, &id).await;

    let in_flight = {
        let service = Arc::clone(&service);
        let id = id.clone();
        tokio::spawn(async move { service.submit(&id).await })
    };
    sender.entered.notified().await;

    let view = service.view(&id).await.expect("view while sending");
    assert!(view.submitting);
    match service.submit(&id).await {
        Err(RegistrationServiceError::Wizard(WizardError::SubmitInProgress)) => {}
        other => panic!("expected in-progress rejection, got {other:?}"),
    }

    sender.release.notify_one();
    let report = in_flight
        .await
        .expect("submit task joins")
        .expect("submit succeeds");
    assert_eq!(report.outcome, SubmitOutcome::Delivered);
    assert_eq!(sender.calls.load(Ordering::SeqCst), 1);
}

#[tokio::test]
async fn strict_mode_keeps_session_open_after_delivery_failure() {
    let (service, store, sender) = build_service(RecordingSender::failing(), strict_settings());
    let id = service.create().await.expect("wizard created").wizard_id;
    fill_all(&service, &id).await;

    let report = service.submit(&id).await.expect("submit runs");

    assert!(matches!(report.outcome, SubmitOutcome::DeliveryFailed { .. }));
    assert!(!report.view.succeeded);
    assert!(report.view.redirect.is_none());
    assert_eq!(sender.sent().len(), 1);
    assert_eq!(store.len(), 1);
    service
        .set_field(&id, FieldName::FullName, FieldValue::from("Jane Q. Doe"))
        .await
        .expect("wizard still editable");
}

#[tokio::test]
async fn draft_cannot_change_while_notification_is_in_flight() {
    let (service, _, sender) = build_service(GatedSender::default(), settings());
    let id = service.create().await.expect("wizard created").wizard_id;
    fill_all(&service, &id).await;
    for _ in 0..3 {
        assert!(service.advance(&id).await.expect("advance runs").advanced);
    }

    let in_flight = {
        let service = Arc::clone(&service);
        let id = id.clone();
        tokio::spawn(async move { service.submit(&id).await })
    };
    sender.entered.notified().await;

    assert!(matches!(
        service
            .set_field(&id, FieldName::Email, FieldValue::from("garbage"))
            .await,
        Err(RegistrationServiceError::Wizard(WizardError::SubmitInProgress))
    ));
    assert!(matches!(
        service.retreat(&id).await,
        Err(RegistrationServiceError::Wizard(WizardError::SubmitInProgress))
    ));
    assert!(matches!(
        service.validate(&id).await,
        Err(RegistrationServiceError::Wizard(WizardError::SubmitInProgress))
    ));

    sender.release.notify_one();
    let report = in_flight
        .await
        .expect("submit task joins")
        .expect("submit succeeds");
    assert!(report.view.succeeded);
    assert_eq!(report.view.current_step, 3);
    assert_eq!(report.view.draft.email, "jane@example.com");
}

fn short_idle_settings() -> RegistrationConfig {
    RegistrationConfig {
        idle_timeout: secs(60),
        ..settings()
    }
}

#[tokio::test(start_paused = true)]
async fn expire_idle_discards_only_untouched_sessions() {
    let (service, store, _) = build_service(RecordingSender::default(), short_idle_settings());
    let abandoned = service.create().await.expect("wizard created").wizard_id;
    let active = service.create().await.expect("wizard created").wizard_id;

    tokio::time::sleep(secs(45)).await;
    service
        .set_field(&active, FieldName::FullName, FieldValue::from("Jane Doe"))
        .await
        .expect("field accepted");
    assert_eq!(service.expire_idle().expect("sweep runs"), 0);

    tokio::time::sleep(secs(20)).await;
    assert_eq!(service.expire_idle().expect("sweep runs"), 1);
    assert_eq!(store.len(), 1);
    assert!(matches!(
        service.view(&abandoned).await,
        Err(RegistrationServiceError::NotFound(_))
    ));
    assert_eq!(
        service.view(&active).await.expect("still open").draft.full_name,
        "Jane Doe"
    );
}

#[tokio::test(start_paused = true)]
async fn idle_sweep_skips_submissions_in_flight() {
    let (service, store, sender) = build_service(GatedSender::default(), short_idle_settings());
    let id = service.create().await.expect("wizard created").wizard_id;
    fill_all(&service, &id).await;

    let in_flight = {
        let service = Arc::clone(&service);
        let id = id.clone();
        tokio::spawn(async move { service.submit(&id).await })
    };
    sender.entered.notified().await;

    tokio::time::sleep(secs(120)).await;
    assert_eq!(service.expire_idle().expect("sweep runs"), 0);
    assert_eq!(store.len(), 1);

    sender.release.notify_one();
    let report = in_flight
        .await
        .expect("submit task joins")
        .expect("submit succeeds");
    assert_eq!(report.outcome, SubmitOutcome::Delivered);
}

#[tokio::test(start_paused = true)]
async fn background_sweeper_evicts_abandoned_wizards() {
    let (service, store, _) = build_service(RecordingSender::default(), short_idle_settings());
    for _ in 0..25 {
        service.create().await.expect("wizard created");
    }
    let sweeper = service.spawn_idle_sweeper();

    tokio::time::sleep(secs(30)).await;
    assert_eq!(store.len(), 25);

    tokio::time::sleep(secs(60)).await;
    tokio::task::yield_now().await;
    assert_eq!(store.len(), 0);
    sweeper.abort();
}
