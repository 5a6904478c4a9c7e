use it_academy::registration::{
    ConfiguredSender, RegistrationService, SharedWizard, StoreError, WizardId, WizardStore,
};
use metrics_exporter_prometheus::PrometheusHandle;
use std::collections::HashMap;
use std::sync::atomic::AtomicBool;
use std::sync::{Arc, Mutex};

pub(crate) type ApiRegistrationService = RegistrationService<InMemoryWizardStore, ConfiguredSender>;

#[derive(Clone)]
pub(crate) struct AppState {
    pub(crate) readiness: Arc<AtomicBool>,
    pub(crate) metrics: Arc<PrometheusHandle>,
}

/// Process-local session table. Sessions are lost on restart.
#[derive(Default, Clone)]
pub(crate) struct InMemoryWizardStore {
    sessions: Arc<Mutex<HashMap<WizardId, SharedWizard>>>,
}

impl InMemoryWizardStore {
    fn guard(
        &self,
    ) -> Result<std::sync::MutexGuard<'_, HashMap<WizardId, SharedWizard>>, StoreError> {
        self.sessions
            .lock()
            .map_err(|_| StoreError::Unavailable("session table poisoned".to_string()))
    }

    pub(crate) fn len(&self) -> usize {
        self.guard().map(|sessions| sessions.len()).unwrap_or_default()
    }
}

impl WizardStore for InMemoryWizardStore {
    fn insert(&self, id: WizardId, wizard: SharedWizard) -> Result<(), StoreError> {
        let mut guard = self.guard()?;
        if guard.contains_key(&id) {
            return Err(StoreError::Conflict);
        }
        guard.insert(id, wizard);
        Ok(())
    }

    fn fetch(&self, id: &WizardId) -> Result<Option<SharedWizard>, StoreError> {
        Ok(self.guard()?.get(id).cloned())
    }

    fn remove(&self, id: &WizardId) -> Result<Option<SharedWizard>, StoreError> {
        Ok(self.guard()?.remove(id))
    }

    fn entries(&self) -> Result<Vec<(WizardId, SharedWizard)>, StoreError> {
        Ok(self
            .guard()?
            .iter()
            .map(|(id, wizard)| (id.clone(), Arc::clone(wizard)))
            .collect())
    }
}
