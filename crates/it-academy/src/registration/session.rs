use std::fmt;
use std::sync::Arc;

use serde::{Deserialize, Serialize};
use tokio::sync::Mutex;

use super::domain::{ErrorSet, RegistrationDraft};
use super::redirect::Redirect;
use super::steps::FORM_STEPS;
use super::wizard::RegistrationWizard;

/// Identifier handed to the browser for its wizard session.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct WizardId(pub String);

impl fmt::Display for WizardId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Wizard shared between request handlers; each session has its own lock.
pub type SharedWizard = Arc<Mutex<RegistrationWizard>>;

/// Session storage abstraction so the service can be exercised in isolation.
pub trait WizardStore: Send + Sync {
    fn insert(&self, id: WizardId, wizard: SharedWizard) -> Result<(), StoreError>;
    fn fetch(&self, id: &WizardId) -> Result<Option<SharedWizard>, StoreError>;
    fn remove(&self, id: &WizardId) -> Result<Option<SharedWizard>, StoreError>;
    /// Every live session; used by the idle sweep.
    fn entries(&self) -> Result<Vec<(WizardId, SharedWizard)>, StoreError>;
}

#[derive(Debug, thiserror::Error)]
pub enum StoreError {
    #[error("wizard session already exists")]
    Conflict,
    #[error("session store unavailable: {0}")]
    Unavailable(String),
}

/// Snapshot of a wizard returned to the browser.
#[derive(Debug, Clone, Serialize)]
pub struct WizardView {
    pub wizard_id: WizardId,
    pub current_step: usize,
    pub step_label: &'static str,
    pub steps: Vec<&'static str>,
    pub draft: RegistrationDraft,
    pub errors: ErrorSet,
    pub submitting: bool,
    pub succeeded: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub redirect: Option<Redirect>,
}

impl WizardView {
    pub fn capture(id: &WizardId, wizard: &RegistrationWizard) -> Self {
        Self {
            wizard_id: id.clone(),
            current_step: wizard.current_step(),
            step_label: FORM_STEPS[wizard.current_step()].label,
            steps: FORM_STEPS.iter().map(|step| step.label).collect(),
            draft: wizard.draft().clone(),
            errors: wizard.errors().clone(),
            submitting: wizard.submitting(),
            succeeded: wizard.succeeded(),
            redirect: wizard.redirect().cloned(),
        }
    }
}
