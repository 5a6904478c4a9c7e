//! Multi-step registration wizard, its notification collaborator, and the HTTP
//! session layer that lets each visitor drive their own wizard.

pub mod domain;
pub mod notification;
pub mod redirect;
pub mod router;
pub mod service;
pub mod session;
pub mod steps;
pub(crate) mod validation;
pub mod wizard;

#[cfg(test)]
mod tests;

pub use domain::{
    CourseInterest, EducationLevel, ErrorSet, ExperienceLevel, FieldName, FieldValue,
    ReferralSource, RegistrationDraft, UnknownField,
};
pub use notification::{
    ConfiguredSender, EmailMessage, LoggingNotificationSender, NotificationError,
    NotificationSender, RegistrationNotification, WebhookNotificationSender,
};
pub use redirect::{NavigateFn, Redirect, RedirectScheduler, ScheduledRedirect, TokioRedirectScheduler};
pub use router::{registration_router, FieldUpdate};
pub use service::{RegistrationService, RegistrationServiceError, StepTransition, SubmitReport};
pub use session::{SharedWizard, StoreError, WizardId, WizardStore, WizardView};
pub use steps::{StepDefinition, FORM_STEPS, LAST_STEP};
pub use validation::{is_valid_email, normalize_phone};
pub use wizard::{RegistrationWizard, SubmitOutcome, SubmitStart, WizardError};
