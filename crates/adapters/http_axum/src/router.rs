//! Axum router assembly.

use axum::Router;
use axum::http::HeaderValue;
use axum::routing::get;
use tower_http::cors::{AllowOrigin, Any, CorsLayer};
use tower_http::trace::TraceLayer;

use luxmon_app::ports::{
    EventPublisher, EventStore, JobRepository, ReadingRepository, SiteRepository,
};

use crate::state::AppState;

/// Build the top-level axum [`Router`].
///
/// Nests API routes under `/api` and applies a [`TraceLayer`] that logs each
/// HTTP request/response at the `DEBUG` level, plus a CORS layer built from
/// `allowed_origins`.
pub fn build<SR, RR, JR, EP, ES>(
    state: AppState<SR, RR, JR, EP, ES>,
    allowed_origins: &[String],
) -> Router
where
    SR: SiteRepository + Send + Sync + 'static,
    RR: ReadingRepository + Send + Sync + 'static,
    JR: JobRepository + Send + Sync + 'static,
    EP: EventPublisher + Send + Sync + 'static,
    ES: EventStore + Send + Sync + 'static,
{
    Router::new()
        .route("/health", get(health_check))
        .nest("/api", crate::api::routes())
        .layer(cors_layer(allowed_origins))
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

/// Build the CORS layer for the configured origins.
///
/// An empty list means no restriction (development mode); otherwise only the
/// listed origins are allowed. Origins that fail to parse as header values
/// are skipped with a warning.
fn cors_layer(allowed_origins: &[String]) -> CorsLayer {
    if allowed_origins.is_empty() {
        return CorsLayer::new()
            .allow_origin(Any)
            .allow_methods(Any)
            .allow_headers(Any);
    }

    let origins: Vec<HeaderValue> = allowed_origins
        .iter()
        .filter_map(|origin| match origin.parse::<HeaderValue>() {
            Ok(value) => Some(value),
            Err(_) => {
                tracing::warn!(origin, "ignoring unparseable CORS origin");
                None
            }
        })
        .collect();

    CorsLayer::new()
        .allow_origin(AllowOrigin::list(origins))
        .allow_methods(Any)
        .allow_headers(Any)
}

async fn health_check() -> &'static str {
    "OK"
}
