use std::collections::HashMap;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};
use std::time::Duration;

use async_trait::async_trait;
use axum::response::Response;
use serde_json::Value;
use tokio::sync::Notify;

use crate::config::RegistrationConfig;
use crate::registration::domain::{FieldName, RegistrationDraft};
use crate::registration::notification::{NotificationError, NotificationSender};
use crate::registration::redirect::{
    NavigateFn, Redirect, RedirectScheduler, ScheduledRedirect, TokioRedirectScheduler,
};
use crate::registration::session::{SharedWizard, StoreError, WizardId, WizardStore};
use crate::registration::wizard::RegistrationWizard;
use crate::registration::{registration_router, RegistrationService};

pub(super) fn settings() -> RegistrationConfig {
    RegistrationConfig::default()
}

pub(super) fn strict_settings() -> RegistrationConfig {
    RegistrationConfig {
        mask_delivery_failures: false,
        ..RegistrationConfig::default()
    }
}

pub(super) fn fill_personal_info(wizard: &mut RegistrationWizard) {
    wizard
        .set_field(FieldName::FullName, "Jane Doe")
        .expect("set name");
    wizard
        .set_field(FieldName::Email, "jane@example.com")
        .expect("set email");
    wizard
        .set_field(FieldName::Phone, "555-123-4567")
        .expect("set phone");
}

pub(super) fn fill_course_selection(wizard: &mut RegistrationWizard) {
    wizard
        .set_field(FieldName::CourseInterest, "cybersecurity")
        .expect("set course");
    wizard
        .set_field(FieldName::ExperienceLevel, "intermediate")
        .expect("set experience");
}

pub(super) fn fill_background(wizard: &mut RegistrationWizard) {
    wizard
        .set_field(FieldName::EducationLevel, "bachelor")
        .expect("set education");
    wizard
        .set_field(FieldName::HearAboutUs, "friend")
        .expect("set referral");
}

/// Wizard with every field valid except the terms checkbox.
pub(super) fn wizard_without_terms(settings: RegistrationConfig) -> RegistrationWizard {
    let mut wizard = RegistrationWizard::new(settings);
    fill_personal_info(&mut wizard);
    fill_course_selection(&mut wizard);
    fill_background(&mut wizard);
    wizard
}

pub(super) fn complete_wizard(settings: RegistrationConfig) -> RegistrationWizard {
    let mut wizard = wizard_without_terms(settings);
    wizard
        .set_field(FieldName::AgreeTerms, true)
        .expect("accept terms");
    wizard
}

/// Sender that records every draft and resolves or rejects as configured.
#[derive(Default)]
pub(super) struct RecordingSender {
    sent: Mutex<Vec<RegistrationDraft>>,
    fail: bool,
}

impl RecordingSender {
    pub(super) fn failing() -> Self {
        Self {
            sent: Mutex::new(Vec::new()),
            fail: true,
        }
    }

    pub(super) fn sent(&self) -> Vec<RegistrationDraft> {
        self.sent.lock().expect("sender mutex poisoned").clone()
    }
}

#[async_trait]
impl NotificationSender for RecordingSender {
    async fn send_registration_notification(
        &self,
        draft: &RegistrationDraft,
    ) -> Result<(), NotificationError> {
        self.sent
            .lock()
            .expect("sender mutex poisoned")
            .push(draft.clone());
        if self.fail {
            Err(NotificationError::Transport("smtp relay offline".to_string()))
        } else {
            Ok(())
        }
    }
}

/// Sender that parks until released so tests can observe an in-flight submit.
#[derive(Default)]
pub(super) struct GatedSender {
    pub(super) entered: Notify,
    pub(super) release: Notify,
    pub(super) calls: AtomicUsize,
}

#[async_trait]
impl NotificationSender for GatedSender {
    async fn send_registration_notification(
        &self,
        _draft: &RegistrationDraft,
    ) -> Result<(), NotificationError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        self.entered.notify_one();
        self.release.notified().await;
        Ok(())
    }
}

/// Scheduler that records intent without starting timers.
#[derive(Default)]
pub(super) struct RecordingScheduler {
    scheduled: Mutex<Vec<Redirect>>,
}

impl RecordingScheduler {
    pub(super) fn scheduled(&self) -> Vec<Redirect> {
        self.scheduled
            .lock()
            .expect("scheduler mutex poisoned")
            .clone()
    }
}

impl RedirectScheduler for RecordingScheduler {
    fn schedule(&self, redirect: Redirect, _navigate: NavigateFn) -> ScheduledRedirect {
        self.scheduled
            .lock()
            .expect("scheduler mutex poisoned")
            .push(redirect.clone());
        ScheduledRedirect::detached(redirect)
    }
}

#[derive(Default)]
pub(super) struct MemoryStore {
    sessions: Mutex<HashMap<WizardId, SharedWizard>>,
}

impl MemoryStore {
    pub(super) fn len(&self) -> usize {
        self.sessions.lock().expect("store mutex poisoned").len()
    }
}

impl WizardStore for MemoryStore {
    fn insert(&self, id: WizardId, wizard: SharedWizard) -> Result<(), StoreError> {
        let mut guard = self.sessions.lock().expect("store mutex poisoned");
        if guard.contains_key(&id) {
            return Err(StoreError::Conflict);
        }
        guard.insert(id, wizard);
        Ok(())
    }

    fn fetch(&self, id: &WizardId) -> Result<Option<SharedWizard>, StoreError> {
        Ok(self
            .sessions
            .lock()
            .expect("store mutex poisoned")
            .get(id)
            .cloned())
    }

    fn remove(&self, id: &WizardId) -> Result<Option<SharedWizard>, StoreError> {
        Ok(self
            .sessions
            .lock()
            .expect("store mutex poisoned")
            .remove(id))
    }

    fn entries(&self) -> Result<Vec<(WizardId, SharedWizard)>, StoreError> {
        Ok(self
            .sessions
            .lock()
            .expect("store mutex poisoned")
            .iter()
            .map(|(id, wizard)| (id.clone(), wizard.clone()))
            .collect())
    }
}

pub(super) struct UnavailableStore;

impl WizardStore for UnavailableStore {
    fn insert(&self, _id: WizardId, _wizard: SharedWizard) -> Result<(), StoreError> {
        Err(StoreError::Unavailable("session cache offline".to_string()))
    }

    fn fetch(&self, _id: &WizardId) -> Result<Option<SharedWizard>, StoreError> {
        Err(StoreError::Unavailable("session cache offline".to_string()))
    }

    fn remove(&self, _id: &WizardId) -> Result<Option<SharedWizard>, StoreError> {
        Err(StoreError::Unavailable("session cache offline".to_string()))
    }

    fn entries(&self) -> Result<Vec<(WizardId, SharedWizard)>, StoreError> {
        Err(StoreError::Unavailable("session cache offline".to_string()))
    }
}

pub(super) type TestService<N> = RegistrationService<MemoryStore, N>;

pub(super) fn build_service<N>(
    sender: N,
    settings: RegistrationConfig,
) -> (Arc<TestService<N>>, Arc<MemoryStore>, Arc<N>)
where
    N: NotificationSender + 'static,
{
    let store = Arc::new(MemoryStore::default());
    let sender = Arc::new(sender);
    let service = Arc::new(RegistrationService::new(
        store.clone(),
        sender.clone(),
        Arc::new(TokioRedirectScheduler),
        settings,
    ));
    (service, store, sender)
}

pub(super) fn router_with_service<N>(service: Arc<TestService<N>>) -> axum::Router
where
    N: NotificationSender + 'static,
{
    registration_router(service)
}

pub(super) async fn read_json_body(response: Response) -> Value {
    let body = axum::body::to_bytes(response.into_body(), 64 * 1024)
        .await
        .expect("read body");
    serde_json::from_slice(&body).expect("json payload")
}

pub(super) fn secs(value: u64) -> Duration {
    Duration::from_secs(value)
}
