//! JSON REST handlers for persisted events.

use std::str::FromStr;

use axum::Json;
use axum::extract::{Path, Query, State};
use axum::response::{IntoResponse, Response};
use serde::Deserialize;

use luxmon_app::ports::{
    EventPublisher, EventStore, JobRepository, ReadingRepository, SiteRepository,
};
use luxmon_domain::error::{LuxmonError, NotFoundError, ValidationError};
use luxmon_domain::event::Event;
use luxmon_domain::id::EventId;

use crate::api::sites::parse_site_id;
use crate::error::ApiError;
use crate::state::AppState;

/// Default limit for event records.
const DEFAULT_LIMIT: usize = 100;

/// Query parameters for the event list endpoint.
#[derive(Deserialize)]
pub struct ListQuery {
    /// Restrict to a single site.
    pub site: Option<String>,
    /// Maximum number of records. Defaults to 100.
    pub limit: Option<usize>,
}

/// Possible responses from the list endpoint.
pub enum ListResponse {
    Ok(Json<Vec<Event>>),
}

impl IntoResponse for ListResponse {
    fn into_response(self) -> Response {
        match self {
            Self::Ok(json) => json.into_response(),
        }
    }
}

/// Possible responses from the get endpoint.
pub enum GetResponse {
    Ok(Json<Event>),
}

impl IntoResponse for GetResponse {
    fn into_response(self) -> Response {
        match self {
            Self::Ok(json) => json.into_response(),
        }
    }
}

/// `GET /api/events?site=&limit=`
pub async fn list<SR, RR, JR, EP, ES>(
    State(state): State<AppState<SR, RR, JR, EP, ES>>,
    Query(params): Query<ListQuery>,
) -> Result<ListResponse, ApiError>
where
    SR: SiteRepository + Send + Sync + 'static,
    RR: ReadingRepository + Send + Sync + 'static,
    JR: JobRepository + Send + Sync + 'static,
    EP: EventPublisher + Send + Sync + 'static,
    ES: EventStore + Send + Sync + 'static,
{
    let limit = params.limit.unwrap_or(DEFAULT_LIMIT);
    let events = match params.site.as_deref() {
        Some(site) => {
            let site_id = parse_site_id(site)?;
            state.event_store.find_by_site(site_id, limit).await?
        }
        None => state.event_store.get_recent(limit).await?,
    };
    Ok(ListResponse::Ok(Json(events)))
}

/// `GET /api/events/:id`
pub async fn get<SR, RR, JR, EP, ES>(
    State(state): State<AppState<SR, RR, JR, EP, ES>>,
    Path(id): Path<String>,
) -> Result<GetResponse, ApiError>
where
    SR: SiteRepository + Send + Sync + 'static,
    RR: ReadingRepository + Send + Sync + 'static,
    JR: JobRepository + Send + Sync + 'static,
    EP: EventPublisher + Send + Sync + 'static,
    ES: EventStore + Send + Sync + 'static,
{
    let event_id = EventId::from_str(&id).map_err(|_| {
        ApiError::from(LuxmonError::Validation(ValidationError::InvalidId(
            id.clone(),
        )))
    })?;
    let event = state.event_store.get_by_id(event_id).await?.ok_or_else(|| {
        ApiError::from(LuxmonError::NotFound(NotFoundError {
            entity: "Event",
            id,
        }))
    })?;
    Ok(GetResponse::Ok(Json(event)))
}
