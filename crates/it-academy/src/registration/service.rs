use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;

use tokio::sync::{Mutex, OwnedMutexGuard};
use tokio::task::JoinHandle;
use tokio::time::{Instant, MissedTickBehavior};
use tracing::{debug, info, warn};

use super::domain::{FieldName, FieldValue};
use super::notification::NotificationSender;
use super::redirect::{NavigateFn, Redirect, RedirectScheduler};
use super::session::{SharedWizard, StoreError, WizardId, WizardStore, WizardView};
use super::wizard::{RegistrationWizard, SubmitOutcome, SubmitStart, WizardError};
use crate::config::RegistrationConfig;

/// Service composing the session store, notification sender, and redirect scheduler.
pub struct RegistrationService<S, N> {
    store: Arc<S>,
    sender: Arc<N>,
    scheduler: Arc<dyn RedirectScheduler>,
    settings: RegistrationConfig,
}

static WIZARD_SEQUENCE: AtomicU64 = AtomicU64::new(1);

fn next_wizard_id() -> WizardId {
    let id = WIZARD_SEQUENCE.fetch_add(1, Ordering::Relaxed);
    WizardId(format!("wiz-{id:06}"))
}

/// Result of an `advance` request.
#[derive(Debug, Clone)]
pub struct StepTransition {
    pub advanced: bool,
    pub view: WizardView,
}

/// Result of a `submit` request.
#[derive(Debug, Clone)]
pub struct SubmitReport {
    pub outcome: SubmitOutcome,
    pub view: WizardView,
}

impl<S, N> RegistrationService<S, N>
where
    S: WizardStore + 'static,
    N: NotificationSender + 'static,
{
    pub fn new(
        store: Arc<S>,
        sender: Arc<N>,
        scheduler: Arc<dyn RedirectScheduler>,
        settings: RegistrationConfig,
    ) -> Self {
        Self {
            store,
            sender,
            scheduler,
            settings,
        }
    }

    pub fn settings(&self) -> &RegistrationConfig {
        &self.settings
    }

    /// Open a fresh wizard with an empty draft.
    pub async fn create(&self) -> Result<WizardView, RegistrationServiceError> {
        let id = next_wizard_id();
        let wizard = RegistrationWizard::new(self.settings.clone());
        let view = WizardView::capture(&id, &wizard);
        self.store
            .insert(id.clone(), Arc::new(Mutex::new(wizard)))?;
        info!(wizard_id = %id, "registration wizard opened");
        Ok(view)
    }

    pub async fn view(&self, id: &WizardId) -> Result<WizardView, RegistrationServiceError> {
        let wizard = self.open(id).await?;
        Ok(WizardView::capture(id, &wizard))
    }

    pub async fn set_field(
        &self,
        id: &WizardId,
        name: FieldName,
        value: FieldValue,
    ) -> Result<WizardView, RegistrationServiceError> {
        let mut wizard = self.open(id).await?;
        wizard.set_field(name, value)?;
        Ok(WizardView::capture(id, &wizard))
    }

    /// Validate the current step without moving.
    pub async fn validate(
        &self,
        id: &WizardId,
    ) -> Result<(bool, WizardView), RegistrationServiceError> {
        let mut wizard = self.open(id).await?;
        let valid = wizard.validate_current_step()?;
        Ok((valid, WizardView::capture(id, &wizard)))
    }

    pub async fn advance(&self, id: &WizardId) -> Result<StepTransition, RegistrationServiceError> {
        let mut wizard = self.open(id).await?;
        let advanced = wizard.advance()?;
        if !advanced {
            debug!(wizard_id = %id, step = wizard.current_step(), "advance blocked by validation");
        }
        Ok(StepTransition {
            advanced,
            view: WizardView::capture(id, &wizard),
        })
    }

    pub async fn retreat(&self, id: &WizardId) -> Result<WizardView, RegistrationServiceError> {
        let mut wizard = self.open(id).await?;
        wizard.retreat()?;
        Ok(WizardView::capture(id, &wizard))
    }

    /// Validate all steps, send the notification with the session unlocked, then
    /// record the outcome and arm the redirect.
    pub async fn submit(&self, id: &WizardId) -> Result<SubmitReport, RegistrationServiceError> {
        let shared = self.session(id)?;

        let draft = {
            let mut wizard = shared.lock().await;
            wizard.touch();
            match wizard.begin_submit()? {
                SubmitStart::Ready(draft) => draft,
                SubmitStart::Invalid { step } => {
                    return Ok(SubmitReport {
                        outcome: SubmitOutcome::Invalid { step },
                        view: WizardView::capture(id, &wizard),
                    });
                }
            }
        };

        info!(wizard_id = %id, "sending registration notification");
        let delivery = self.sender.send_registration_notification(&draft).await;

        let mut wizard = shared.lock().await;
        wizard.touch();
        let outcome = wizard.finish_submit(delivery);
        if outcome.succeeded() {
            wizard.arm_redirect(self.scheduler.as_ref(), self.discard_on_navigate(id));
        }

        Ok(SubmitReport {
            outcome,
            view: WizardView::capture(id, &wizard),
        })
    }

    /// Tear the session down, cancelling any pending redirect.
    pub async fn discard(&self, id: &WizardId) -> Result<(), RegistrationServiceError> {
        let shared = self
            .store
            .remove(id)?
            .ok_or_else(|| RegistrationServiceError::NotFound(id.clone()))?;
        shared.lock().await.teardown();
        info!(wizard_id = %id, "registration wizard discarded");
        Ok(())
    }

    /// Discard every session left untouched for longer than the idle timeout.
    /// Sessions that are locked or mid-submission are left for the next sweep.
    pub fn expire_idle(&self) -> Result<usize, RegistrationServiceError> {
        let now = Instant::now();
        let mut expired = 0;
        for (id, shared) in self.store.entries()? {
            let Ok(mut wizard) = shared.try_lock() else {
                continue;
            };
            if wizard.submitting() || wizard.idle_for(now) < self.settings.idle_timeout {
                continue;
            }
            wizard.teardown();
            self.store.remove(&id)?;
            expired += 1;
            debug!(wizard_id = %id, "idle registration wizard expired");
        }
        Ok(expired)
    }

    /// Run [`Self::expire_idle`] on a timer until the returned task is aborted.
    pub fn spawn_idle_sweeper(self: &Arc<Self>) -> JoinHandle<()> {
        let service = Arc::clone(self);
        tokio::spawn(async move {
            let mut ticker = tokio::time::interval(service.settings.idle_sweep_interval());
            ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);
            loop {
                ticker.tick().await;
                match service.expire_idle() {
                    Ok(0) => {}
                    Ok(expired) => info!(expired, "expired idle registration wizards"),
                    Err(err) => warn!(error = %err, "idle session sweep failed"),
                }
            }
        })
    }

    async fn open(
        &self,
        id: &WizardId,
    ) -> Result<OwnedMutexGuard<RegistrationWizard>, RegistrationServiceError> {
        let mut wizard = self.session(id)?.lock_owned().await;
        wizard.touch();
        Ok(wizard)
    }

    fn session(&self, id: &WizardId) -> Result<SharedWizard, RegistrationServiceError> {
        self.store
            .fetch(id)?
            .ok_or_else(|| RegistrationServiceError::NotFound(id.clone()))
    }

    fn discard_on_navigate(&self, id: &WizardId) -> NavigateFn {
        let store = Arc::clone(&self.store);
        let id = id.clone();
        Box::new(move |redirect: &Redirect| {
            info!(wizard_id = %id, to = %redirect.to, "registration complete; leaving wizard");
            if let Err(err) = store.remove(&id) {
                warn!(wizard_id = %id, error = %err, "failed to discard completed wizard");
            }
        })
    }
}

/// Error raised by the registration service.
#[derive(Debug, thiserror::Error)]
pub enum RegistrationServiceError {
    #[error("registration session {0} not found")]
    NotFound(WizardId),
    #[error(transparent)]
    Wizard(#[from] WizardError),
    #[error(transparent)]
    Store(#[from] StoreError),
}
