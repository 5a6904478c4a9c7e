use std::time::Duration;

use serde::Serialize;
use tokio::task::AbortHandle;
use tracing::debug;

/// Navigation the wizard performs once registration has completed.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Redirect {
    pub to: String,
    #[serde(rename = "after_secs", serialize_with = "serialize_secs")]
    pub after: Duration,
}

fn serialize_secs<S>(value: &Duration, serializer: S) -> Result<S::Ok, S::Error>
where
    S: serde::Serializer,
{
    serializer.serialize_u64(value.as_secs())
}

/// Callback run when a scheduled redirect fires.
pub type NavigateFn = Box<dyn FnOnce(&Redirect) + Send + 'static>;

/// Scheduled-callback abstraction for deferred navigation.
pub trait RedirectScheduler: Send + Sync {
    fn schedule(&self, redirect: Redirect, navigate: NavigateFn) -> ScheduledRedirect;
}

/// Handle to a pending redirect. Dropping it cancels the callback.
#[derive(Debug)]
pub struct ScheduledRedirect {
    redirect: Redirect,
    task: Option<AbortHandle>,
}

impl ScheduledRedirect {
    /// A handle with no backing timer, for schedulers that only record intent.
    pub fn detached(redirect: Redirect) -> Self {
        Self {
            redirect,
            task: None,
        }
    }

    pub fn redirect(&self) -> &Redirect {
        &self.redirect
    }

    pub fn is_finished(&self) -> bool {
        self.task.as_ref().map_or(true, AbortHandle::is_finished)
    }

    pub fn cancel(mut self) {
        self.abort();
    }

    fn abort(&mut self) {
        if let Some(task) = self.task.take() {
            if !task.is_finished() {
                debug!(to = %self.redirect.to, "cancelling pending redirect");
            }
            task.abort();
        }
    }
}

impl Drop for ScheduledRedirect {
    fn drop(&mut self) {
        self.abort();
    }
}

/// Runs each redirect on the tokio runtime after its delay.
#[derive(Debug, Default, Clone, Copy)]
pub struct TokioRedirectScheduler;

impl RedirectScheduler for TokioRedirectScheduler {
    fn schedule(&self, redirect: Redirect, navigate: NavigateFn) -> ScheduledRedirect {
        let pending = redirect.clone();
        let handle = tokio::spawn(async move {
            tokio::time::sleep(pending.after).await;
            debug!(to = %pending.to, "redirect fired");
            navigate(&pending);
        });

        ScheduledRedirect {
            redirect,
            task: Some(handle.abort_handle()),
        }
    }
}
