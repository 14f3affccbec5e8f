//! Shared application state for axum handlers.

use std::sync::Arc;

use luxmon_app::automation_engine::AutomationEngine;
use luxmon_app::event_bus::InProcessEventBus;
use luxmon_app::ports::{
    EventPublisher, EventStore, JobRepository, ReadingRepository, SiteRepository,
};
use luxmon_app::services::job_service::JobService;
use luxmon_app::services::reading_service::ReadingService;
use luxmon_app::services::site_service::SiteService;

/// Application state shared across all axum handlers.
///
/// Generic over the repository types, event publisher, and event store to
/// avoid dynamic dispatch. `Clone` is implemented manually so the underlying
/// types themselves do not need to be `Clone` — only the `Arc` wrappers are
/// cloned.
pub struct AppState<SR, RR, JR, EP, ES> {
    /// Site CRUD service.
    pub site_service: Arc<SiteService<SR, EP>>,
    /// Reading time-series service.
    pub reading_service: Arc<ReadingService<RR, EP>>,
    /// Job CRUD and status service.
    pub job_service: Arc<JobService<JR, EP>>,
    /// Event store for querying persisted events.
    pub event_store: Arc<ES>,
    /// Rule evaluator, exposed for the manual sweep endpoint.
    pub automation_engine: Arc<AutomationEngine<SR, RR, JR, EP>>,
    /// Event bus for SSE subscriptions.
    pub event_bus: Arc<InProcessEventBus>,
}

impl<SR, RR, JR, EP, ES> Clone for AppState<SR, RR, JR, EP, ES> {
    fn clone(&self) -> Self {
        Self {
            site_service: Arc::clone(&self.site_service),
            reading_service: Arc::clone(&self.reading_service),
            job_service: Arc::clone(&self.job_service),
            event_store: Arc::clone(&self.event_store),
            automation_engine: Arc::clone(&self.automation_engine),
            event_bus: Arc::clone(&self.event_bus),
        }
    }
}

impl<SR, RR, JR, EP, ES> AppState<SR, RR, JR, EP, ES>
where
    SR: SiteRepository + Send + Sync + 'static,
    RR: ReadingRepository + Send + Sync + 'static,
    JR: JobRepository + Send + Sync + 'static,
    EP: EventPublisher + Send + Sync + 'static,
    ES: EventStore + Send + Sync + 'static,
{
    /// Create a new application state from service instances.
    pub fn new(
        site_service: SiteService<SR, EP>,
        reading_service: ReadingService<RR, EP>,
        job_service: JobService<JR, EP>,
        event_store: ES,
        automation_engine: AutomationEngine<SR, RR, JR, EP>,
        event_bus: Arc<InProcessEventBus>,
    ) -> Self {
        Self {
            site_service: Arc::new(site_service),
            reading_service: Arc::new(reading_service),
            job_service: Arc::new(job_service),
            event_store: Arc::new(event_store),
            automation_engine: Arc::new(automation_engine),
            event_bus,
        }
    }

    /// Create a new application state from pre-wrapped `Arc` services.
    ///
    /// Use this when services need to be shared with background tasks
    /// before constructing the HTTP state.
    pub fn from_arcs(
        site_service: Arc<SiteService<SR, EP>>,
        reading_service: Arc<ReadingService<RR, EP>>,
        job_service: Arc<JobService<JR, EP>>,
        event_store: Arc<ES>,
        automation_engine: Arc<AutomationEngine<SR, RR, JR, EP>>,
        event_bus: Arc<InProcessEventBus>,
    ) -> Self {
        Self {
            site_service,
            reading_service,
            job_service,
            event_store,
            automation_engine,
            event_bus,
        }
    }
}
