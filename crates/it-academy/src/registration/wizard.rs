//! Four-step registration wizard.
//!
//! The wizard owns the draft, the per-field errors, and the step cursor. Every
//! mutation goes through the operations below; callers never touch the draft
//! directly. Submission is split into [`RegistrationWizard::begin_submit`] and
//! [`RegistrationWizard::finish_submit`] so a caller can release its lock while
//! the notification is in flight and still observe `submitting`.

use std::time::Duration;

use serde::Serialize;
use tokio::time::Instant;
use tracing::{error, info, warn};

use super::domain::{
    CourseInterest, EducationLevel, ErrorSet, ExperienceLevel, FieldName, FieldValue,
    ReferralSource, RegistrationDraft,
};
use super::notification::{NotificationError, NotificationSender};
use super::redirect::{NavigateFn, Redirect, RedirectScheduler, ScheduledRedirect};
use super::steps::{self, FORM_STEPS, LAST_STEP};
use super::validation::{normalize_phone, validate_fields};
use crate::config::RegistrationConfig;

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum WizardError {
    #[error("step {0} does not exist")]
    StepOutOfRange(usize),
    #[error("registration already completed")]
    Completed,
    #[error("a submission is already in progress")]
    SubmitInProgress,
    #[error("'{value}' is not a valid option for {field}")]
    UnknownOption { field: FieldName, value: String },
    #[error("{field} expects {expected}")]
    InvalidValue {
        field: FieldName,
        expected: &'static str,
    },
}

/// Result of the validation half of a submission.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SubmitStart {
    /// Every step passed; send this snapshot and hand the result to `finish_submit`.
    Ready(RegistrationDraft),
    /// The wizard moved back to the first failing step.
    Invalid { step: usize },
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "outcome", rename_all = "snake_case")]
pub enum SubmitOutcome {
    Invalid { step: usize },
    Delivered,
    /// Delivery failed but the visitor is shown the success state anyway.
    DeliveryMasked,
    DeliveryFailed { reason: String },
}

impl SubmitOutcome {
    pub fn succeeded(&self) -> bool {
        matches!(self, SubmitOutcome::Delivered | SubmitOutcome::DeliveryMasked)
    }
}

#[derive(Debug)]
pub struct RegistrationWizard {
    draft: RegistrationDraft,
    errors: ErrorSet,
    current_step: usize,
    submitting: bool,
    succeeded: bool,
    settings: RegistrationConfig,
    redirect: Option<Redirect>,
    scheduled: Option<ScheduledRedirect>,
    last_active: Instant,
}

impl RegistrationWizard {
    pub fn new(settings: RegistrationConfig) -> Self {
        Self {
            draft: RegistrationDraft::default(),
            errors: ErrorSet::new(),
            current_step: 0,
            submitting: false,
            succeeded: false,
            settings,
            redirect: None,
            scheduled: None,
            last_active: Instant::now(),
        }
    }

    pub fn draft(&self) -> &RegistrationDraft {
        &self.draft
    }

    pub fn errors(&self) -> &ErrorSet {
        &self.errors
    }

    pub fn current_step(&self) -> usize {
        self.current_step
    }

    pub fn submitting(&self) -> bool {
        self.submitting
    }

    pub fn succeeded(&self) -> bool {
        self.succeeded
    }

    /// Navigation planned after a successful submission.
    pub fn redirect(&self) -> Option<&Redirect> {
        self.redirect.as_ref()
    }

    /// Record visitor activity; idle sessions are expired by the service.
    pub fn touch(&mut self) {
        self.last_active = Instant::now();
    }

    pub fn idle_for(&self, now: Instant) -> Duration {
        now.saturating_duration_since(self.last_active)
    }

    pub fn set_field(
        &mut self,
        name: FieldName,
        value: impl Into<FieldValue>,
    ) -> Result<(), WizardError> {
        self.ensure_editable()?;
        let value = value.into();

        match name {
            FieldName::FullName => self.draft.full_name = text(name, value)?,
            FieldName::Email => self.draft.email = text(name, value)?,
            FieldName::Phone => self.draft.phone = normalize_phone(&text(name, value)?),
            FieldName::CourseInterest => {
                self.draft.course_interest = option(name, value, CourseInterest::parse)?
            }
            FieldName::ExperienceLevel => {
                self.draft.experience_level = option(name, value, ExperienceLevel::parse)?
            }
            FieldName::EducationLevel => {
                self.draft.education_level = option(name, value, EducationLevel::parse)?
            }
            FieldName::HearAboutUs => {
                self.draft.hear_about_us = option(name, value, ReferralSource::parse)?
            }
            FieldName::AgreeTerms => self.draft.agree_terms = flag(name, value)?,
        }

        self.errors.remove(name);
        Ok(())
    }

    /// Replace the error set with the errors of `step` and report whether it passed.
    pub fn validate_step(&mut self, step: usize) -> Result<bool, WizardError> {
        let definition = steps::step(step).ok_or(WizardError::StepOutOfRange(step))?;
        self.errors = validate_fields(&self.draft, definition);
        Ok(self.errors.is_empty())
    }

    /// Validate the step the visitor is on. Rejected while a submission is in flight.
    pub fn validate_current_step(&mut self) -> Result<bool, WizardError> {
        if self.submitting {
            return Err(WizardError::SubmitInProgress);
        }
        self.validate_step(self.current_step)
    }

    /// Move forward one step if the current one validates. Returns whether the
    /// current step passed.
    pub fn advance(&mut self) -> Result<bool, WizardError> {
        self.ensure_editable()?;
        if !self.validate_step(self.current_step)? {
            return Ok(false);
        }
        if self.current_step < LAST_STEP {
            self.current_step += 1;
        }
        Ok(true)
    }

    pub fn retreat(&mut self) -> Result<(), WizardError> {
        self.ensure_editable()?;
        self.current_step = self.current_step.saturating_sub(1);
        Ok(())
    }

    /// Validate every step in order, stopping at the first failure.
    pub fn begin_submit(&mut self) -> Result<SubmitStart, WizardError> {
        if self.submitting {
            return Err(WizardError::SubmitInProgress);
        }
        self.ensure_open()?;
        self.submitting = true;

        for step in 0..FORM_STEPS.len() {
            if !self.validate_step(step)? {
                warn!(
                    step,
                    label = FORM_STEPS[step].label,
                    invalid_fields = self.errors.len(),
                    "registration submit blocked by validation"
                );
                self.current_step = step;
                self.submitting = false;
                return Ok(SubmitStart::Invalid { step });
            }
        }

        Ok(SubmitStart::Ready(self.draft.clone()))
    }

    /// Record the notification result, enter the success state, and plan the redirect.
    pub fn finish_submit(&mut self, delivery: Result<(), NotificationError>) -> SubmitOutcome {
        let outcome = match delivery {
            Ok(()) => {
                info!(course = ?self.draft.course_interest, "registration notification sent");
                let delay = self.settings.success_redirect_delay;
                self.complete(delay);
                SubmitOutcome::Delivered
            }
            Err(err) if self.settings.mask_delivery_failures => {
                error!(error = %err, "registration notification failed; showing success");
                let delay = self.settings.failure_redirect_delay;
                self.complete(delay);
                SubmitOutcome::DeliveryMasked
            }
            Err(err) => {
                error!(error = %err, "registration notification failed");
                SubmitOutcome::DeliveryFailed {
                    reason: err.to_string(),
                }
            }
        };

        self.submitting = false;
        outcome
    }

    /// Validate, send, and record the outcome in one call.
    pub async fn submit<N>(&mut self, sender: &N) -> Result<SubmitOutcome, WizardError>
    where
        N: NotificationSender + ?Sized,
    {
        let draft = match self.begin_submit()? {
            SubmitStart::Ready(draft) => draft,
            SubmitStart::Invalid { step } => return Ok(SubmitOutcome::Invalid { step }),
        };

        let delivery = sender.send_registration_notification(&draft).await;
        Ok(self.finish_submit(delivery))
    }

    /// Start the planned redirect timer. Returns `false` when nothing is planned
    /// or a timer is already running.
    pub fn arm_redirect<S>(&mut self, scheduler: &S, navigate: NavigateFn) -> bool
    where
        S: RedirectScheduler + ?Sized,
    {
        match (&self.redirect, &self.scheduled) {
            (Some(redirect), None) => {
                self.scheduled = Some(scheduler.schedule(redirect.clone(), navigate));
                true
            }
            _ => false,
        }
    }

    /// Cancel any pending redirect; used when the wizard is torn down early.
    pub fn teardown(&mut self) {
        if let Some(scheduled) = self.scheduled.take() {
            scheduled.cancel();
        }
    }

    fn complete(&mut self, delay: Duration) {
        self.succeeded = true;
        self.redirect = Some(Redirect {
            to: self.settings.redirect_path.clone(),
            after: delay,
        });
    }

    fn ensure_open(&self) -> Result<(), WizardError> {
        if self.succeeded {
            Err(WizardError::Completed)
        } else {
            Ok(())
        }
    }

    /// The draft and step are frozen from `begin_submit` until `finish_submit`.
    fn ensure_editable(&self) -> Result<(), WizardError> {
        self.ensure_open()?;
        if self.submitting {
            return Err(WizardError::SubmitInProgress);
        }
        Ok(())
    }
}

impl Default for RegistrationWizard {
    fn default() -> Self {
        Self::new(RegistrationConfig::default())
    }
}

fn text(field: FieldName, value: FieldValue) -> Result<String, WizardError> {
    match value {
        FieldValue::Text(value) => Ok(value),
        FieldValue::Flag(_) => Err(WizardError::InvalidValue {
            field,
            expected: "text",
        }),
    }
}

fn option<T>(
    field: FieldName,
    value: FieldValue,
    parse: fn(&str) -> Option<T>,
) -> Result<Option<T>, WizardError> {
    let value = text(field, value)?;
    if value.is_empty() {
        return Ok(None);
    }
    parse(&value)
        .map(Some)
        .ok_or(WizardError::UnknownOption { field, value })
}

fn flag(field: FieldName, value: FieldValue) -> Result<bool, WizardError> {
    match value {
        FieldValue::Flag(value) => Ok(value),
        FieldValue::Text(value) => match value.trim().to_ascii_lowercase().as_str() {
            "true" | "on" | "1" => Ok(true),
            "false" | "off" | "0" | "" => Ok(false),
            _ => Err(WizardError::InvalidValue {
                field,
                expected: "a boolean",
            }),
        },
    }
}
