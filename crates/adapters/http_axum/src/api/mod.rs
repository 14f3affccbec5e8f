//! JSON REST API handler modules.

#[allow(clippy::missing_errors_doc)]
pub mod automation;
#[allow(clippy::missing_errors_doc)]
pub mod events;
#[allow(clippy::missing_errors_doc)]
pub mod jobs;
#[allow(clippy::missing_errors_doc)]
pub mod readings;
#[allow(clippy::missing_errors_doc)]
pub mod sites;
pub mod sse;

use axum::Router;
use axum::routing::{get, post, put};

use luxmon_app::ports::{
    EventPublisher, EventStore, JobRepository, ReadingRepository, SiteRepository,
};

use crate::state::AppState;

/// Build the `/api` sub-router.
pub fn routes<SR, RR, JR, EP, ES>() -> Router<AppState<SR, RR, JR, EP, ES>>
where
    SR: SiteRepository + Send + Sync + 'static,
    RR: ReadingRepository + Send + Sync + 'static,
    JR: JobRepository + Send + Sync + 'static,
    EP: EventPublisher + Send + Sync + 'static,
    ES: EventStore + Send + Sync + 'static,
{
    Router::new()
        // Sites
        .route(
            "/sites",
            get(sites::list::<SR, RR, JR, EP, ES>).post(sites::create::<SR, RR, JR, EP, ES>),
        )
        .route(
            "/sites/{id}",
            get(sites::get::<SR, RR, JR, EP, ES>).delete(sites::delete::<SR, RR, JR, EP, ES>),
        )
        // Readings
        .route(
            "/sites/{id}/readings",
            get(readings::list::<SR, RR, JR, EP, ES>)
                .post(readings::create::<SR, RR, JR, EP, ES>),
        )
        .route(
            "/sites/{id}/readings/latest",
            get(readings::latest::<SR, RR, JR, EP, ES>),
        )
        // Jobs
        .route(
            "/jobs",
            get(jobs::list::<SR, RR, JR, EP, ES>).post(jobs::create::<SR, RR, JR, EP, ES>),
        )
        .route("/jobs/{id}", get(jobs::get::<SR, RR, JR, EP, ES>))
        .route(
            "/jobs/{id}/status",
            put(jobs::update_status::<SR, RR, JR, EP, ES>),
        )
        // Events
        .route("/events", get(events::list::<SR, RR, JR, EP, ES>))
        .route("/events/stream", get(sse::stream::<SR, RR, JR, EP, ES>))
        .route("/events/{id}", get(events::get::<SR, RR, JR, EP, ES>))
        // Automation
        .route(
            "/automation/sweep",
            post(automation::sweep::<SR, RR, JR, EP, ES>),
        )
}
