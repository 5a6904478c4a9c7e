use crate::infra::{ApiRegistrationService, InMemoryWizardStore};
use clap::Args;
use it_academy::config::{NotificationConfig, RegistrationConfig};
use it_academy::error::AppError;
use it_academy::registration::{
    ConfiguredSender, FieldName, FieldValue, LoggingNotificationSender, RegistrationService,
    SubmitOutcome, TokioRedirectScheduler, WebhookNotificationSender, WizardId, WizardView,
};
use std::sync::Arc;

/// Relay address nothing listens on, used to force a delivery failure.
const UNREACHABLE_RELAY: &str = "http://127.0.0.1:9/registrations";

#[derive(Args, Debug, Default)]
pub(crate) struct DemoArgs {
    /// Point notifications at an unreachable relay so delivery fails.
    #[arg(long)]
    pub(crate) fail_delivery: bool,
    /// Report delivery failures instead of masking them as success.
    #[arg(long)]
    pub(crate) strict: bool,
    /// Stay alive until the post-registration redirect fires.
    #[arg(long)]
    pub(crate) wait_redirect: bool,
}

pub(crate) async fn run_demo(args: DemoArgs) -> Result<(), AppError> {
    let DemoArgs {
        fail_delivery,
        strict,
        wait_redirect,
    } = args;

    let settings = RegistrationConfig {
        mask_delivery_failures: !strict,
        ..RegistrationConfig::default()
    };
    let sender = if fail_delivery {
        ConfiguredSender::Webhook(WebhookNotificationSender::new(
            UNREACHABLE_RELAY,
            NotificationConfig::DEFAULT_ADMIN_EMAIL,
        )?)
    } else {
        ConfiguredSender::Logging(LoggingNotificationSender::new(
            NotificationConfig::DEFAULT_ADMIN_EMAIL,
        ))
    };
    let store = InMemoryWizardStore::default();
    let service: ApiRegistrationService = RegistrationService::new(
        Arc::new(store.clone()),
        Arc::new(sender),
        Arc::new(TokioRedirectScheduler),
        settings,
    );

    println!("IT Academy registration demo");
    println!(
        "- delivery: {} | failures {}",
        if fail_delivery { "unreachable relay" } else { "logging only" },
        if strict { "reported" } else { "masked" }
    );

    let view = service.create().await?;
    let id = view.wizard_id.clone();
    render_view("Opened wizard", &view);

    let blocked = service.advance(&id).await?;
    render_view("Tried to continue with an empty form", &blocked.view);

    let script: [(&str, &[(FieldName, &str)]); 3] = [
        (
            "Personal Info",
            &[
                (FieldName::FullName, "Jane Doe"),
                (FieldName::Email, "jane.doe@example.com"),
                (FieldName::Phone, "(555) 123-4567"),
            ],
        ),
        (
            "Course Selection",
            &[
                (FieldName::CourseInterest, "cybersecurity"),
                (FieldName::ExperienceLevel, "intermediate"),
            ],
        ),
        (
            "Background",
            &[
                (FieldName::EducationLevel, "bachelor"),
                (FieldName::HearAboutUs, "friend"),
            ],
        ),
    ];

    for (label, fields) in script {
        fill(&service, &id, fields).await?;
        let transition = service.advance(&id).await?;
        render_view(&format!("Completed {label}"), &transition.view);
    }

    let early = service.submit(&id).await?;
    render_outcome("Submitted without accepting the terms", &early.outcome);
    render_view("Wizard after rejected submit", &early.view);

    service
        .set_field(&id, FieldName::AgreeTerms, FieldValue::from(true))
        .await?;
    let report = service.submit(&id).await?;
    render_outcome("Submitted registration", &report.outcome);
    render_view("Wizard after submit", &report.view);

    match (&report.view.redirect, wait_redirect) {
        (Some(redirect), true) => {
            println!(
                "\nWaiting {}s for redirect to {}...",
                redirect.after.as_secs(),
                redirect.to
            );
            tokio::time::sleep(redirect.after + std::time::Duration::from_millis(100)).await;
            println!(
                "- session {} after redirect ({} open sessions)",
                if store.len() == 0 { "discarded" } else { "still open" },
                store.len()
            );
        }
        (Some(_), false) => {
            service.discard(&id).await?;
            println!("\nSession discarded before the redirect fired (pass --wait-redirect to watch it).");
        }
        (None, _) => {
            println!("\nNo redirect scheduled; the wizard stays open for a retry.");
        }
    }

    Ok(())
}

async fn fill(
    service: &ApiRegistrationService,
    id: &WizardId,
    fields: &[(FieldName, &str)],
) -> Result<(), AppError> {
    for (name, value) in fields {
        service
            .set_field(id, *name, FieldValue::from(*value))
            .await?;
    }
    Ok(())
}

fn render_view(heading: &str, view: &WizardView) {
    println!("\n{heading}");
    println!(
        "- step {} of {}: {}",
        view.current_step + 1,
        view.steps.len(),
        view.step_label
    );
    for field in FieldName::ALL {
        let value = view.draft.display_value(field);
        if !value.is_empty() {
            println!("  {}: {}", field.label(), value);
        }
    }
    if !view.errors.is_empty() {
        println!("- validation errors:");
        for (field, message) in view.errors.iter() {
            println!("  {}: {}", field.label(), message);
        }
    }
    if view.succeeded {
        println!("- registration successful");
    }
    if let Some(redirect) = &view.redirect {
        println!(
            "- redirecting to {} in {}s",
            redirect.to,
            redirect.after.as_secs()
        );
    }
}

fn render_outcome(heading: &str, outcome: &SubmitOutcome) {
    let summary = match outcome {
        SubmitOutcome::Invalid { step } => format!("blocked at step {}", step + 1),
        SubmitOutcome::Delivered => "notification delivered".to_string(),
        SubmitOutcome::DeliveryMasked => {
            "notification failed; reported to the visitor as success".to_string()
        }
        SubmitOutcome::DeliveryFailed { reason } => format!("notification failed: {reason}"),
    };
    println!("\n{heading}: {summary}");
}
