//! # luxmond — luxmon daemon
//!
//! Composition root that wires all adapters together and starts the server.
//!
//! ## Responsibilities
//! - Parse configuration (TOML file, env vars)
//! - Initialize the `SQLite` connection pool and run migrations
//! - Construct repository implementations (adapters)
//! - Construct application services, injecting repositories via port traits
//! - Seed demo sites from the simulator integration when enabled
//! - Spawn the periodic automation sweep task and the event persistence task
//! - Build the axum router, injecting application services
//! - Bind to a TCP port and serve until SIGTERM/SIGINT
//!
//! ## Dependency rule
//! This is the **only** crate that depends on all other crates.
//! It is the wiring layer — no domain logic belongs here.

mod config;

use std::sync::Arc;

use tokio::sync::broadcast;
use tracing_subscriber::EnvFilter;

use luxmon_adapter_http_axum::router;
use luxmon_adapter_http_axum::state::AppState;
use luxmon_adapter_simulator::SimulatorIntegration;
use luxmon_adapter_storage_sqlite_sqlx::{
    SqliteEventStore, SqliteJobRepository, SqliteReadingRepository, SqliteSiteRepository,
};
use luxmon_app::automation_engine::AutomationEngine;
use luxmon_app::event_bus::InProcessEventBus;
use luxmon_app::ports::{EventStore, MeterIntegration};
use luxmon_app::services::job_service::JobService;
use luxmon_app::services::reading_service::ReadingService;
use luxmon_app::services::site_service::SiteService;

use config::Config;

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let config = Config::load()?;

    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_new(&config.logging.filter)?)
        .init();

    // Database
    let db = luxmon_adapter_storage_sqlite_sqlx::Config {
        database_url: config.database_url().to_string(),
    }
    .build()
    .await?;
    let pool = db.pool().clone();

    // Event bus
    let event_bus = Arc::new(InProcessEventBus::new(256));

    // Services
    let site_service = Arc::new(SiteService::new(
        SqliteSiteRepository::new(pool.clone()),
        Arc::clone(&event_bus),
    ));
    let reading_service = Arc::new(ReadingService::new(
        SqliteReadingRepository::new(pool.clone()),
        Arc::clone(&event_bus),
    ));
    let job_service = Arc::new(JobService::new(
        SqliteJobRepository::new(pool.clone()),
        Arc::clone(&event_bus),
    ));
    let event_store = Arc::new(SqliteEventStore::new(pool.clone()));

    // Automation engine — separate repository instances over the same pool
    let automation_engine = Arc::new(AutomationEngine::new(
        SqliteSiteRepository::new(pool.clone()),
        SqliteReadingRepository::new(pool.clone()),
        SqliteJobRepository::new(pool.clone()),
        Arc::clone(&event_bus),
        config.automation.rule_set(),
    ));

    // Persist every event published on the bus
    spawn_event_persistence(event_bus.subscribe(), Arc::clone(&event_store));

    // Demo data
    if config.integrations.simulator_enabled {
        seed_simulator(&site_service, &reading_service).await?;
    }

    // Periodic automation sweeps
    spawn_sweep_task(
        Arc::clone(&automation_engine),
        config.automation.sweep_interval_minutes,
    );

    // HTTP
    let state = AppState::from_arcs(
        site_service,
        reading_service,
        job_service,
        event_store,
        automation_engine,
        Arc::clone(&event_bus),
    );
    let app = router::build(state, &config.http.cors_allowed_origins);

    let bind_addr = config.bind_addr();
    tracing::info!(%bind_addr, "luxmond listening");

    let listener = tokio::net::TcpListener::bind(&bind_addr).await?;
    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    Ok(())
}

/// Store every event broadcast on the bus into the event store.
fn spawn_event_persistence(
    mut rx: broadcast::Receiver<luxmon_domain::event::Event>,
    store: Arc<SqliteEventStore>,
) {
    tokio::spawn(async move {
        loop {
            match rx.recv().await {
                Ok(event) => {
                    if let Err(err) = store.store(event).await {
                        tracing::error!(error = %err, "failed to persist event");
                    }
                }
                Err(broadcast::error::RecvError::Lagged(skipped)) => {
                    tracing::warn!(skipped, "event persistence lagged, events dropped");
                }
                Err(broadcast::error::RecvError::Closed) => break,
            }
        }
    });
}

/// Run the automation sweep on a fixed cadence. The first tick fires
/// immediately so a freshly started daemon evaluates its backlog.
fn spawn_sweep_task<SR, RR, JR, P>(engine: Arc<AutomationEngine<SR, RR, JR, P>>, minutes: u64)
where
    SR: luxmon_app::ports::SiteRepository + Send + Sync + 'static,
    RR: luxmon_app::ports::ReadingRepository + Send + Sync + 'static,
    JR: luxmon_app::ports::JobRepository + Send + Sync + 'static,
    P: luxmon_app::ports::EventPublisher + Send + Sync + 'static,
{
    tokio::spawn(async move {
        let period = std::time::Duration::from_secs(minutes * 60);
        let mut ticker = tokio::time::interval(period);
        ticker.set_missed_tick_behavior(tokio::time::MissedTickBehavior::Skip);
        loop {
            ticker.tick().await;
            if let Err(err) = engine.run_sweep().await {
                tracing::error!(error = %err, "automation sweep failed");
            }
        }
    });
}

/// Seed demo sites and readings when the database is still empty.
async fn seed_simulator<SR, RR, P>(
    site_service: &SiteService<SR, P>,
    reading_service: &ReadingService<RR, P>,
) -> Result<(), luxmon_domain::error::LuxmonError>
where
    SR: luxmon_app::ports::SiteRepository,
    RR: luxmon_app::ports::ReadingRepository,
    P: luxmon_app::ports::EventPublisher,
{
    if !site_service.list_sites().await?.is_empty() {
        tracing::debug!("sites already present, skipping simulator seed");
        return Ok(());
    }

    let mut integration = SimulatorIntegration::default();
    let discovered = integration.setup().await?;
    tracing::info!(
        integration = integration.name(),
        sites = discovered.len(),
        "seeding demo sites"
    );

    for entry in discovered {
        site_service.create_site(entry.site).await?;
        for reading in entry.readings {
            reading_service.record_reading(reading).await?;
        }
    }

    Ok(())
}

/// Resolve when SIGINT or SIGTERM arrives.
async fn shutdown_signal() {
    let ctrl_c = async {
        tokio::signal::ctrl_c()
            .await
            .expect("failed to install Ctrl+C handler");
    };

    #[cfg(unix)]
    let terminate = async {
        tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate())
            .expect("failed to install SIGTERM handler")
            .recv()
            .await;
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        () = ctrl_c => {}
        () = terminate => {}
    }
}
