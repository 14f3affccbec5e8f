//! JSON REST handlers for the reading time-series.

use axum::Json;
use axum::extract::{Path, Query, State};
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use chrono::Duration;
use serde::Deserialize;

use luxmon_app::ports::{
    EventPublisher, EventStore, JobRepository, ReadingRepository, SiteRepository,
};
use luxmon_domain::error::{LuxmonError, ValidationError};
use luxmon_domain::reading::Reading;
use luxmon_domain::time::{Timestamp, now};

use crate::api::sites::parse_site_id;
use crate::error::ApiError;
use crate::state::AppState;

/// Default limit for reading records.
const DEFAULT_LIMIT: usize = 1000;

/// Default time range: last 7 days.
const DEFAULT_DAYS: i64 = 7;

/// Query parameters for the reading list endpoint.
#[derive(Deserialize)]
pub struct ListQuery {
    /// Start of time range (RFC 3339). Defaults to 7 days ago.
    pub from: Option<String>,
    /// End of time range (RFC 3339). Defaults to now.
    pub to: Option<String>,
    /// Maximum number of records. Defaults to 1000.
    pub limit: Option<usize>,
}

/// Request body for recording a reading.
#[derive(Deserialize)]
pub struct CreateReadingRequest {
    /// Energy generated in the reporting period, in kWh.
    pub value: f64,
    /// When the reading was taken (RFC 3339). Defaults to now.
    pub recorded_at: Option<String>,
}

/// Possible responses from the list endpoint.
pub enum ListResponse {
    Ok(Json<Vec<Reading>>),
}

impl IntoResponse for ListResponse {
    fn into_response(self) -> Response {
        match self {
            Self::Ok(json) => json.into_response(),
        }
    }
}

/// Possible responses from the latest endpoint.
pub enum LatestResponse {
    Ok(Json<Reading>),
    NoContent,
}

impl IntoResponse for LatestResponse {
    fn into_response(self) -> Response {
        match self {
            Self::Ok(json) => json.into_response(),
            Self::NoContent => StatusCode::NO_CONTENT.into_response(),
        }
    }
}

/// Possible responses from the create endpoint.
pub enum CreateResponse {
    Created(Json<Reading>),
}

impl IntoResponse for CreateResponse {
    fn into_response(self) -> Response {
        match self {
            Self::Created(json) => (StatusCode::CREATED, json).into_response(),
        }
    }
}

/// Parse an optional RFC 3339 timestamp string, returning a validation error on failure.
fn parse_timestamp(value: &str) -> Result<Timestamp, ApiError> {
    chrono::DateTime::parse_from_rfc3339(value)
        .map(|dt| dt.to_utc())
        .map_err(|_| {
            ApiError::from(LuxmonError::Validation(ValidationError::InvalidTimestamp(
                value.to_owned(),
            )))
        })
}

/// `GET /api/sites/:id/readings?from=&to=&limit=`
pub async fn list<SR, RR, JR, EP, ES>(
    State(state): State<AppState<SR, RR, JR, EP, ES>>,
    Path(id): Path<String>,
    Query(params): Query<ListQuery>,
) -> Result<ListResponse, ApiError>
where
    SR: SiteRepository + Send + Sync + 'static,
    RR: ReadingRepository + Send + Sync + 'static,
    JR: JobRepository + Send + Sync + 'static,
    EP: EventPublisher + Send + Sync + 'static,
    ES: EventStore + Send + Sync + 'static,
{
    let site_id = parse_site_id(&id)?;

    let current = now();
    let from = params
        .from
        .as_deref()
        .map(parse_timestamp)
        .transpose()?
        .unwrap_or_else(|| current - Duration::days(DEFAULT_DAYS));
    let to = params
        .to
        .as_deref()
        .map(parse_timestamp)
        .transpose()?
        .unwrap_or(current);
    let limit = params.limit.unwrap_or(DEFAULT_LIMIT);

    let readings = state
        .reading_service
        .list_readings(site_id, from, to, Some(limit))
        .await?;

    Ok(ListResponse::Ok(Json(readings)))
}

/// `GET /api/sites/:id/readings/latest`
pub async fn latest<SR, RR, JR, EP, ES>(
    State(state): State<AppState<SR, RR, JR, EP, ES>>,
    Path(id): Path<String>,
) -> Result<LatestResponse, ApiError>
where
    SR: SiteRepository + Send + Sync + 'static,
    RR: ReadingRepository + Send + Sync + 'static,
    JR: JobRepository + Send + Sync + 'static,
    EP: EventPublisher + Send + Sync + 'static,
    ES: EventStore + Send + Sync + 'static,
{
    let site_id = parse_site_id(&id)?;
    let reading = state.reading_service.latest_reading(site_id).await?;
    Ok(match reading {
        Some(reading) => LatestResponse::Ok(Json(reading)),
        None => LatestResponse::NoContent,
    })
}

/// `POST /api/sites/:id/readings`
pub async fn create<SR, RR, JR, EP, ES>(
    State(state): State<AppState<SR, RR, JR, EP, ES>>,
    Path(id): Path<String>,
    Json(req): Json<CreateReadingRequest>,
) -> Result<CreateResponse, ApiError>
where
    SR: SiteRepository + Send + Sync + 'static,
    RR: ReadingRepository + Send + Sync + 'static,
    JR: JobRepository + Send + Sync + 'static,
    EP: EventPublisher + Send + Sync + 'static,
    ES: EventStore + Send + Sync + 'static,
{
    let site_id = parse_site_id(&id)?;

    // Readings recorded against missing sites must 404, not land as
    // orphaned rows.
    state.site_service.get_site(site_id).await?;

    let mut builder = Reading::builder().site_id(site_id).value(req.value);
    if let Some(recorded_at) = req.recorded_at.as_deref() {
        builder = builder.recorded_at(parse_timestamp(recorded_at)?);
    }
    let reading = builder.build()?;

    let recorded = state.reading_service.record_reading(reading).await?;
    Ok(CreateResponse::Created(Json(recorded)))
}
