use std::sync::Arc;

use axum::{
    extract::{Path, State},
    http::StatusCode,
    response::{IntoResponse, Response},
    routing::{get, post, put},
    Router,
};
use serde::{Deserialize, Serialize};
use serde_json::json;

use super::domain::{
    CourseInterest, EducationLevel, ExperienceLevel, FieldName, FieldValue, ReferralSource,
};
use super::notification::NotificationSender;
use super::service::{RegistrationService, RegistrationServiceError};
use super::session::{WizardId, WizardStore, WizardView};
use super::steps::{StepDefinition, FORM_STEPS};
use super::wizard::{SubmitOutcome, WizardError};

/// Router builder exposing the registration wizard over HTTP.
pub fn registration_router<S, N>(service: Arc<RegistrationService<S, N>>) -> Router
where
    S: WizardStore + 'static,
    N: NotificationSender + 'static,
{
    Router::new()
        .route("/api/v1/registration-steps", get(steps_handler))
        .route("/api/v1/registrations", post(create_handler::<S, N>))
        .route(
            "/api/v1/registrations/:wizard_id",
            get(view_handler::<S, N>).delete(discard_handler::<S, N>),
        )
        .route(
            "/api/v1/registrations/:wizard_id/fields",
            put(set_field_handler::<S, N>),
        )
        .route(
            "/api/v1/registrations/:wizard_id/validate",
            post(validate_handler::<S, N>),
        )
        .route(
            "/api/v1/registrations/:wizard_id/advance",
            post(advance_handler::<S, N>),
        )
        .route(
            "/api/v1/registrations/:wizard_id/retreat",
            post(retreat_handler::<S, N>),
        )
        .route(
            "/api/v1/registrations/:wizard_id/submit",
            post(submit_handler::<S, N>),
        )
        .with_state(service)
}

/// Body of a field update.
#[derive(Debug, Clone, Deserialize)]
pub struct FieldUpdate {
    pub name: FieldName,
    pub value: FieldValue,
}

#[derive(Debug, Serialize)]
pub(crate) struct SubmitResponse {
    #[serde(flatten)]
    outcome: SubmitOutcome,
    wizard: WizardView,
}

#[derive(Debug, Serialize)]
pub(crate) struct FieldOption {
    value: &'static str,
    label: &'static str,
}

#[derive(Debug, Serialize)]
pub(crate) struct StepCatalog {
    steps: &'static [StepDefinition],
    course_interest: Vec<FieldOption>,
    experience_level: Vec<FieldOption>,
    education_level: Vec<FieldOption>,
    hear_about_us: Vec<FieldOption>,
}

pub(crate) async fn steps_handler() -> Response {
    let catalog = StepCatalog {
        steps: &FORM_STEPS,
        course_interest: CourseInterest::ALL
            .into_iter()
            .map(|option| FieldOption {
                value: option.as_str(),
                label: option.label(),
            })
            .collect(),
        experience_level: ExperienceLevel::ALL
            .into_iter()
            .map(|option| FieldOption {
                value: option.as_str(),
                label: option.label(),
            })
            .collect(),
        education_level: EducationLevel::ALL
            .into_iter()
            .map(|option| FieldOption {
                value: option.as_str(),
                label: option.label(),
            })
            .collect(),
        hear_about_us: ReferralSource::ALL
            .into_iter()
            .map(|option| FieldOption {
                value: option.as_str(),
                label: option.label(),
            })
            .collect(),
    };
    (StatusCode::OK, axum::Json(catalog)).into_response()
}

pub(crate) async fn create_handler<S, N>(
    State(service): State<Arc<RegistrationService<S, N>>>,
) -> Response
where
    S: WizardStore + 'static,
    N: NotificationSender + 'static,
{
    match service.create().await {
        Ok(view) => (StatusCode::CREATED, axum::Json(view)).into_response(),
        Err(err) => error_response(err),
    }
}

pub(crate) async fn view_handler<S, N>(
    State(service): State<Arc<RegistrationService<S, N>>>,
    Path(wizard_id): Path<String>,
) -> Response
where
    S: WizardStore + 'static,
    N: NotificationSender + 'static,
{
    match service.view(&WizardId(wizard_id)).await {
        Ok(view) => (StatusCode::OK, axum::Json(view)).into_response(),
        Err(err) => error_response(err),
    }
}

pub(crate) async fn set_field_handler<S, N>(
    State(service): State<Arc<RegistrationService<S, N>>>,
    Path(wizard_id): Path<String>,
    axum::Json(update): axum::Json<FieldUpdate>,
) -> Response
where
    S: WizardStore + 'static,
    N: NotificationSender + 'static,
{
    match service
        .set_field(&WizardId(wizard_id), update.name, update.value)
        .await
    {
        Ok(view) => (StatusCode::OK, axum::Json(view)).into_response(),
        Err(err) => error_response(err),
    }
}

pub(crate) async fn validate_handler<S, N>(
    State(service): State<Arc<RegistrationService<S, N>>>,
    Path(wizard_id): Path<String>,
) -> Response
where
    S: WizardStore + 'static,
    N: NotificationSender + 'static,
{
    match service.validate(&WizardId(wizard_id)).await {
        Ok((valid, view)) => (step_status(valid), axum::Json(view)).into_response(),
        Err(err) => error_response(err),
    }
}

pub(crate) async fn advance_handler<S, N>(
    State(service): State<Arc<RegistrationService<S, N>>>,
    Path(wizard_id): Path<String>,
) -> Response
where
    S: WizardStore + 'static,
    N: NotificationSender + 'static,
{
    match service.advance(&WizardId(wizard_id)).await {
        Ok(transition) => {
            (step_status(transition.advanced), axum::Json(transition.view)).into_response()
        }
        Err(err) => error_response(err),
    }
}

pub(crate) async fn retreat_handler<S, N>(
    State(service): State<Arc<RegistrationService<S, N>>>,
    Path(wizard_id): Path<String>,
) -> Response
where
    S: WizardStore + 'static,
    N: NotificationSender + 'static,
{
    match service.retreat(&WizardId(wizard_id)).await {
        Ok(view) => (StatusCode::OK, axum::Json(view)).into_response(),
        Err(err) => error_response(err),
    }
}

pub(crate) async fn submit_handler<S, N>(
    State(service): State<Arc<RegistrationService<S, N>>>,
    Path(wizard_id): Path<String>,
) -> Response
where
    S: WizardStore + 'static,
    N: NotificationSender + 'static,
{
    match service.submit(&WizardId(wizard_id)).await {
        Ok(report) => {
            let status = match &report.outcome {
                SubmitOutcome::Delivered | SubmitOutcome::DeliveryMasked => StatusCode::OK,
                SubmitOutcome::Invalid { .. } => StatusCode::UNPROCESSABLE_ENTITY,
                SubmitOutcome::DeliveryFailed { .. } => StatusCode::BAD_GATEWAY,
            };
            let body = SubmitResponse {
                outcome: report.outcome,
                wizard: report.view,
            };
            (status, axum::Json(body)).into_response()
        }
        Err(err) => error_response(err),
    }
}

pub(crate) async fn discard_handler<S, N>(
    State(service): State<Arc<RegistrationService<S, N>>>,
    Path(wizard_id): Path<String>,
) -> Response
where
    S: WizardStore + 'static,
    N: NotificationSender + 'static,
{
    match service.discard(&WizardId(wizard_id)).await {
        Ok(()) => StatusCode::NO_CONTENT.into_response(),
        Err(err) => error_response(err),
    }
}

fn step_status(valid: bool) -> StatusCode {
    if valid {
        StatusCode::OK
    } else {
        StatusCode::UNPROCESSABLE_ENTITY
    }
}

fn error_response(err: RegistrationServiceError) -> Response {
    let status = match &err {
        RegistrationServiceError::NotFound(_) => StatusCode::NOT_FOUND,
        RegistrationServiceError::Wizard(
            WizardError::Completed | WizardError::SubmitInProgress,
        ) => StatusCode::CONFLICT,
        RegistrationServiceError::Wizard(
            WizardError::UnknownOption { .. }
            | WizardError::InvalidValue { .. }
            | WizardError::StepOutOfRange(_),
        ) => StatusCode::BAD_REQUEST,
        RegistrationServiceError::Store(_) => StatusCode::INTERNAL_SERVER_ERROR,
    };

    let payload = json!({
        "error": err.to_string(),
    });
    (status, axum::Json(payload)).into_response()
}
