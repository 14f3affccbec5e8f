//! JSON REST handler for the manual automation trigger.

use axum::Json;
use axum::extract::State;
use axum::response::{IntoResponse, Response};

use luxmon_app::automation_engine::SweepReport;
use luxmon_app::ports::{
    EventPublisher, EventStore, JobRepository, ReadingRepository, SiteRepository,
};

use crate::error::ApiError;
use crate::state::AppState;

/// Possible responses from the sweep endpoint.
pub enum SweepResponse {
    Ok(Json<SweepReport>),
}

impl IntoResponse for SweepResponse {
    fn into_response(self) -> Response {
        match self {
            Self::Ok(json) => json.into_response(),
        }
    }
}

/// `POST /api/automation/sweep` — run one rule-evaluation pass immediately.
///
/// The periodic background task runs the same sweep; this endpoint exists so
/// operators can force a pass after fixing data or changing a site.
pub async fn sweep<SR, RR, JR, EP, ES>(
    State(state): State<AppState<SR, RR, JR, EP, ES>>,
) -> Result<SweepResponse, ApiError>
where
    SR: SiteRepository + Send + Sync + 'static,
    RR: ReadingRepository + Send + Sync + 'static,
    JR: JobRepository + Send + Sync + 'static,
    EP: EventPublisher + Send + Sync + 'static,
    ES: EventStore + Send + Sync + 'static,
{
    let report = state.automation_engine.run_sweep().await?;
    Ok(SweepResponse::Ok(Json(report)))
}
