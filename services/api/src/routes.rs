use crate::infra::AppState;
use axum::extract::{Path, Query, State};
use axum::http::{header, StatusCode};
use axum::response::{Html, IntoResponse, Redirect};
use axum::routing::get;
use axum::{Extension, Json, Router};
use it_academy::activities::{Gallery, TournamentPage};
use it_academy::catalog::{CatalogTab, TabView, TrackCatalog};
use it_academy::error::AppError;
use it_academy::pages;
use it_academy::registration::{
    registration_router, NotificationSender, RegistrationService, WizardId, WizardStore,
};
use serde::{Deserialize, Serialize};
use serde_json::json;
use std::sync::Arc;

#[derive(Debug, Default, Deserialize)]
pub(crate) struct TabQuery {
    #[serde(default)]
    pub(crate) tab: Option<String>,
}

impl TabQuery {
    fn tab(&self) -> CatalogTab {
        self.tab
            .as_deref()
            .map(CatalogTab::parse)
            .unwrap_or(CatalogTab::Overview)
    }
}

#[derive(Debug, Default, Deserialize)]
pub(crate) struct GalleryQuery {
    #[serde(default)]
    pub(crate) image: Option<usize>,
}

#[derive(Debug, Serialize)]
pub(crate) struct TrackResponse {
    pub(crate) catalog: TrackCatalog,
    pub(crate) selected: TabView,
}

#[derive(Debug, Serialize)]
pub(crate) struct ActivitiesResponse {
    pub(crate) page: TournamentPage,
    pub(crate) active_index: usize,
    pub(crate) prev_index: usize,
    pub(crate) next_index: usize,
    pub(crate) auto_advance_secs: u64,
}

pub(crate) fn with_site_routes<S, N>(service: Arc<RegistrationService<S, N>>) -> Router
where
    S: WizardStore + 'static,
    N: NotificationSender + 'static,
{
    let wizard_pages = Router::new()
        .route(
            pages::REGISTER_PATH,
            get(registration_page).post(start_registration::<S, N>),
        )
        .route("/register/:wizard_id", get(wizard_page::<S, N>))
        .with_state(Arc::clone(&service));

    registration_router(service)
        .merge(wizard_pages)
        .route("/", get(root_redirect))
        .route("/health", get(healthcheck))
        .route("/ready", get(readiness_endpoint))
        .route("/metrics", get(metrics_endpoint))
        .route("/api/v1/tracks/cybersecurity", get(track_endpoint))
        .route("/api/v1/activities/volleyball", get(activities_endpoint))
        .route(pages::LANDING_PATH, get(landing_page))
        .route("/itacademy/cybersecurity", get(track_page))
        .route("/activities", get(activities_page))
}

pub(crate) async fn healthcheck() -> Json<serde_json::Value> {
    Json(json!({ "status": "ok" }))
}

pub(crate) async fn readiness_endpoint(Extension(state): Extension<AppState>) -> impl IntoResponse {
    let ready = state.readiness.load(std::sync::atomic::Ordering::Relaxed);
    let status = if ready {
        StatusCode::OK
    } else {
        StatusCode::SERVICE_UNAVAILABLE
    };

    let payload = if ready {
        json!({ "status": "ready" })
    } else {
        json!({ "status": "initializing" })
    };

    (status, Json(payload))
}

pub(crate) async fn metrics_endpoint(Extension(state): Extension<AppState>) -> impl IntoResponse {
    (
        StatusCode::OK,
        [(header::CONTENT_TYPE, "text/plain; version=0.0.4")],
        state.metrics.render(),
    )
}

async fn root_redirect() -> Redirect {
    Redirect::to(pages::LANDING_PATH)
}

pub(crate) async fn track_endpoint(Query(query): Query<TabQuery>) -> Json<TrackResponse> {
    let catalog = TrackCatalog::cybersecurity();
    let selected = catalog.tab_view(query.tab());
    Json(TrackResponse { catalog, selected })
}

pub(crate) async fn activities_endpoint(
    Query(query): Query<GalleryQuery>,
) -> Result<Json<ActivitiesResponse>, AppError> {
    let page = TournamentPage::volleyball();
    let gallery = select_image(&page, query.image)?;
    Ok(Json(ActivitiesResponse {
        active_index: gallery.active_index(),
        prev_index: gallery.prev_index(),
        next_index: gallery.next_index(),
        auto_advance_secs: it_academy::activities::AUTO_ADVANCE_INTERVAL.as_secs(),
        page,
    }))
}

async fn landing_page() -> Html<String> {
    Html(pages::render_landing())
}

async fn track_page(Query(query): Query<TabQuery>) -> Html<String> {
    Html(pages::render_track(&TrackCatalog::cybersecurity(), query.tab()))
}

async fn activities_page(Query(query): Query<GalleryQuery>) -> Result<Html<String>, AppError> {
    let page = TournamentPage::volleyball();
    let gallery = select_image(&page, query.image)?;
    Ok(Html(pages::render_activities(&page, &gallery)))
}

async fn registration_page() -> Html<String> {
    Html(pages::render_registration_overview())
}

/// Browser entry point: open a wizard and land on its page.
async fn start_registration<S, N>(
    State(service): State<Arc<RegistrationService<S, N>>>,
) -> Result<Redirect, AppError>
where
    S: WizardStore + 'static,
    N: NotificationSender + 'static,
{
    let view = service.create().await?;
    Ok(Redirect::to(&format!(
        "{}/{}",
        pages::REGISTER_PATH,
        view.wizard_id
    )))
}

async fn wizard_page<S, N>(
    State(service): State<Arc<RegistrationService<S, N>>>,
    Path(wizard_id): Path<String>,
) -> Result<Html<String>, AppError>
where
    S: WizardStore + 'static,
    N: NotificationSender + 'static,
{
    let view = service.view(&WizardId(wizard_id)).await?;
    Ok(Html(pages::render_wizard(&view)))
}

fn select_image(page: &TournamentPage, image: Option<usize>) -> Result<Gallery, AppError> {
    let gallery = match image {
        Some(index) => Gallery::at(page.images.len(), index)?,
        None => page.gallery(),
    };
    Ok(gallery)
}
