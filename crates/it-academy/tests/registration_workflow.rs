//! End-to-end registration scenarios driven through the public service facade
//! and HTTP router.

mod common {
    use std::collections::HashMap;
    use std::sync::{Arc, Mutex};

    use async_trait::async_trait;
    use axum::body::Body;
    use axum::http::{header, Method, Request};
    use serde_json::Value;

    use it_academy::config::RegistrationConfig;
    use it_academy::registration::{
        NotificationError, NotificationSender, RegistrationDraft, RegistrationService,
        SharedWizard, StoreError, TokioRedirectScheduler, WizardId, WizardStore,
    };

    #[derive(Default)]
    pub(super) struct SessionTable {
        sessions: Mutex<HashMap<WizardId, SharedWizard>>,
    }

    impl SessionTable {
        pub(super) fn len(&self) -> usize {
            self.sessions.lock().expect("table mutex poisoned").len()
        }
    }

    impl WizardStore for SessionTable {
        fn insert(&self, id: WizardId, wizard: SharedWizard) -> Result<(), StoreError> {
            let mut guard = self.sessions.lock().expect("table mutex poisoned");
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
                .expect("table mutex poisoned")
                .get(id)
                .cloned())
        }

        fn remove(&self, id: &WizardId) -> Result<Option<SharedWizard>, StoreError> {
            Ok(self
                .sessions
                .lock()
                .expect("table mutex poisoned")
                .remove(id))
        }

        fn entries(&self) -> Result<Vec<(WizardId, SharedWizard)>, StoreError> {
            Ok(self
                .sessions
                .lock()
                .expect("table mutex poisoned")
                .iter()
                .map(|(id, wizard)| (id.clone(), Arc::clone(wizard)))
                .collect())
        }
    }

    /// Mailbox standing in for the admissions relay.
    #[derive(Default)]
    pub(super) struct Mailbox {
        delivered: Mutex<Vec<RegistrationDraft>>,
        offline: bool,
    }

    impl Mailbox {
        pub(super) fn offline() -> Self {
            Self {
                delivered: Mutex::new(Vec::new()),
                offline: true,
            }
        }

        pub(super) fn delivered(&self) -> Vec<RegistrationDraft> {
            self.delivered.lock().expect("mailbox mutex poisoned").clone()
        }
    }

    #[async_trait]
    impl NotificationSender for Mailbox {
        async fn send_registration_notification(
            &self,
            draft: &RegistrationDraft,
        ) -> Result<(), NotificationError> {
            if self.offline {
                return Err(NotificationError::Rejected { status: 503 });
            }
            self.delivered
                .lock()
                .expect("mailbox mutex poisoned")
                .push(draft.clone());
            Ok(())
        }
    }

    pub(super) struct Harness {
        pub(super) router: axum::Router,
        pub(super) sessions: Arc<SessionTable>,
        pub(super) mailbox: Arc<Mailbox>,
    }

    pub(super) fn harness(mailbox: Mailbox, settings: RegistrationConfig) -> Harness {
        let sessions = Arc::new(SessionTable::default());
        let mailbox = Arc::new(mailbox);
        let service = Arc::new(RegistrationService::new(
            sessions.clone(),
            mailbox.clone(),
            Arc::new(TokioRedirectScheduler),
            settings,
        ));
        Harness {
            router: it_academy::registration::registration_router(service),
            sessions,
            mailbox,
        }
    }

    pub(super) fn request(method: Method, uri: &str, body: Option<Value>) -> Request<Body> {
        let builder = Request::builder().method(method).uri(uri);
        match body {
            Some(json) => builder
                .header(header::CONTENT_TYPE, "application/json")
                .body(Body::from(serde_json::to_vec(&json).expect("encode body")))
                .expect("request"),
            None => builder.body(Body::empty()).expect("request"),
        }
    }

    pub(super) async fn json_body(response: axum::response::Response) -> Value {
        let bytes = axum::body::to_bytes(response.into_body(), 64 * 1024)
            .await
            .expect("read body");
        serde_json::from_slice(&bytes).expect("json body")
    }
}

use std::time::Duration;

use axum::http::{Method, StatusCode};
use common::*;
use it_academy::config::RegistrationConfig;
use it_academy::registration::{CourseInterest, ReferralSource};
use serde_json::{json, Value};
use tower::ServiceExt;

async fn call(harness: &Harness, method: Method, uri: &str, body: Option<Value>) -> (StatusCode, Value) {
    let response = harness
        .router
        .clone()
        .oneshot(request(method, uri, body))
        .await
        .expect("router responds");
    let status = response.status();
    if status == StatusCode::NO_CONTENT {
        return (status, Value::Null);
    }
    (status, json_body(response).await)
}

async fn set(harness: &Harness, id: &str, name: &str, value: Value) -> (StatusCode, Value) {
    call(
        harness,
        Method::PUT,
        &format!("/api/v1/registrations/{id}/fields"),
        Some(json!({ "name": name, "value": value })),
    )
    .await
}

async fn open(harness: &Harness) -> String {
    let (status, body) = call(harness, Method::POST, "/api/v1/registrations", None).await;
    assert_eq!(status, StatusCode::CREATED);
    body["wizard_id"].as_str().expect("wizard id").to_string()
}

async fn advance(harness: &Harness, id: &str) -> (StatusCode, Value) {
    call(
        harness,
        Method::POST,
        &format!("/api/v1/registrations/{id}/advance"),
        None,
    )
    .await
}

#[tokio::test(start_paused = true)]
async fn visitor_completes_registration_and_is_redirected() {
    let harness = harness(Mailbox::default(), RegistrationConfig::default());
    let id = open(&harness).await;

    set(&harness, &id, "fullName", json!("Amina Yusuf")).await;
    set(&harness, &id, "email", json!("amina@example.org")).await;
    let (_, view) = set(&harness, &id, "phone", json!("+1 (202) 555-0147")).await;
    assert_eq!(view["draft"]["phone"], "1202555014");
    let (status, view) = advance(&harness, &id).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(view["step_label"], "Course Selection");

    let (status, view) = advance(&harness, &id).await;
    assert_eq!(status, StatusCode::UNPROCESSABLE_ENTITY);
    assert_eq!(view["errors"]["courseInterest"], "Please select a course");

    set(&harness, &id, "courseInterest", json!("ai-ml")).await;
    set(&harness, &id, "experienceLevel", json!("beginner")).await;
    assert_eq!(advance(&harness, &id).await.0, StatusCode::OK);

    let (_, view) = call(
        &harness,
        Method::POST,
        &format!("/api/v1/registrations/{id}/retreat"),
        None,
    )
    .await;
    assert_eq!(view["current_step"], 1);
    assert_eq!(view["draft"]["courseInterest"], "ai-ml");
    assert_eq!(advance(&harness, &id).await.0, StatusCode::OK);

    set(&harness, &id, "educationLevel", json!("high school")).await;
    set(&harness, &id, "hearAboutUs", json!("search-engine")).await;
    assert_eq!(advance(&harness, &id).await.0, StatusCode::OK);
    set(&harness, &id, "agreeTerms", json!(true)).await;

    let (status, body) = call(
        &harness,
        Method::POST,
        &format!("/api/v1/registrations/{id}/submit"),
        None,
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["outcome"], "delivered");
    assert_eq!(body["wizard"]["redirect"]["after_secs"], 4);

    let delivered = harness.mailbox.delivered();
    assert_eq!(delivered.len(), 1);
    assert_eq!(delivered[0].course_interest, Some(CourseInterest::AiMl));
    assert_eq!(delivered[0].hear_about_us, Some(ReferralSource::SearchEngine));

    tokio::time::sleep(Duration::from_secs(5)).await;
    assert_eq!(harness.sessions.len(), 0);
    let (status, _) = call(&harness, Method::GET, &format!("/api/v1/registrations/{id}"), None).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
}

#[tokio::test(start_paused = true)]
async fn relay_outage_is_masked_and_redirects_sooner() {
    let harness = harness(Mailbox::offline(), RegistrationConfig::default());
    let id = open(&harness).await;
    for (name, value) in [
        ("fullName", json!("Amina Yusuf")),
        ("email", json!("amina@example.org")),
        ("phone", json!("2025550147")),
        ("courseInterest", json!("cloud-computing")),
        ("experienceLevel", json!("advanced")),
        ("educationLevel", json!("other")),
        ("agreeTerms", json!("on")),
    ] {
        let (status, _) = set(&harness, &id, name, value).await;
        assert_eq!(status, StatusCode::OK, "{name}");
    }

    let (status, body) = call(
        &harness,
        Method::POST,
        &format!("/api/v1/registrations/{id}/submit"),
        None,
    )
    .await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["outcome"], "delivery_masked");
    assert_eq!(body["wizard"]["succeeded"], true);
    assert_eq!(body["wizard"]["redirect"]["after_secs"], 3);
    assert!(harness.mailbox.delivered().is_empty());

    tokio::time::sleep(Duration::from_millis(2_500)).await;
    assert_eq!(harness.sessions.len(), 1);
    tokio::time::sleep(Duration::from_secs(1)).await;
    assert_eq!(harness.sessions.len(), 0);
}

#[tokio::test]
async fn abandoned_wizard_is_discarded_without_side_effects() {
    let harness = harness(Mailbox::default(), RegistrationConfig::default());
    let id = open(&harness).await;
    set(&harness, &id, "fullName", json!("Amina Yusuf")).await;

    let (status, _) = call(&harness, Method::DELETE, &format!("/api/v1/registrations/{id}"), None).await;
    assert_eq!(status, StatusCode::NO_CONTENT);
    assert_eq!(harness.sessions.len(), 0);
    assert!(harness.mailbox.delivered().is_empty());

    let (status, _) = call(&harness, Method::DELETE, &format!("/api/v1/registrations/{id}"), None).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
}
