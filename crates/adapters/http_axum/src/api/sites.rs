//! JSON REST handlers for sites.

use std::str::FromStr;

use axum::Json;
use axum::extract::{Path, State};
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use serde::Deserialize;

use luxmon_app::ports::{
    EventPublisher, EventStore, JobRepository, ReadingRepository, SiteRepository,
};
use luxmon_domain::error::{LuxmonError, ValidationError};
use luxmon_domain::id::SiteId;
use luxmon_domain::site::Site;

use crate::error::ApiError;
use crate::state::AppState;

/// Request body for creating a site.
#[derive(Deserialize)]
pub struct CreateSiteRequest {
    pub name: String,
    pub region: Option<String>,
}

/// Possible responses from the list endpoint.
pub enum ListResponse {
    Ok(Json<Vec<Site>>),
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
    Ok(Json<Site>),
}

impl IntoResponse for GetResponse {
    fn into_response(self) -> Response {
        match self {
            Self::Ok(json) => json.into_response(),
        }
    }
}

/// Possible responses from the create endpoint.
pub enum CreateResponse {
    Created(Json<Site>),
}

impl IntoResponse for CreateResponse {
    fn into_response(self) -> Response {
        match self {
            Self::Created(json) => (StatusCode::CREATED, json).into_response(),
        }
    }
}

/// Possible responses from the delete endpoint.
pub enum DeleteResponse {
    NoContent,
}

impl IntoResponse for DeleteResponse {
    fn into_response(self) -> Response {
        match self {
            Self::NoContent => StatusCode::NO_CONTENT.into_response(),
        }
    }
}

/// Parse a site id path segment, mapping failures to a validation error.
pub(crate) fn parse_site_id(id: &str) -> Result<SiteId, ApiError> {
    SiteId::from_str(id).map_err(|_| {
        ApiError::from(LuxmonError::Validation(ValidationError::InvalidId(
            id.to_owned(),
        )))
    })
}

/// `GET /api/sites`
pub async fn list<SR, RR, JR, EP, ES>(
    State(state): State<AppState<SR, RR, JR, EP, ES>>,
) -> Result<ListResponse, ApiError>
where
    SR: SiteRepository + Send + Sync + 'static,
    RR: ReadingRepository + Send + Sync + 'static,
    JR: JobRepository + Send + Sync + 'static,
    EP: EventPublisher + Send + Sync + 'static,
    ES: EventStore + Send + Sync + 'static,
{
    let sites = state.site_service.list_sites().await?;
    Ok(ListResponse::Ok(Json(sites)))
}

/// `GET /api/sites/:id`
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
    let site_id = parse_site_id(&id)?;
    let site = state.site_service.get_site(site_id).await?;
    Ok(GetResponse::Ok(Json(site)))
}

/// `POST /api/sites`
pub async fn create<SR, RR, JR, EP, ES>(
    State(state): State<AppState<SR, RR, JR, EP, ES>>,
    Json(req): Json<CreateSiteRequest>,
) -> Result<CreateResponse, ApiError>
where
    SR: SiteRepository + Send + Sync + 'static,
    RR: ReadingRepository + Send + Sync + 'static,
    JR: JobRepository + Send + Sync + 'static,
    EP: EventPublisher + Send + Sync + 'static,
    ES: EventStore + Send + Sync + 'static,
{
    let mut builder = Site::builder().name(req.name);
    if let Some(region) = req.region {
        builder = builder.region(region);
    }
    let site = builder.build()?;

    let created = state.site_service.create_site(site).await?;
    Ok(CreateResponse::Created(Json(created)))
}

/// `DELETE /api/sites/:id`
pub async fn delete<SR, RR, JR, EP, ES>(
    State(state): State<AppState<SR, RR, JR, EP, ES>>,
    Path(id): Path<String>,
) -> Result<DeleteResponse, ApiError>
where
    SR: SiteRepository + Send + Sync + 'static,
    RR: ReadingRepository + Send + Sync + 'static,
    JR: JobRepository + Send + Sync + 'static,
    EP: EventPublisher + Send + Sync + 'static,
    ES: EventStore + Send + Sync + 'static,
{
    let site_id = parse_site_id(&id)?;
    state.site_service.delete_site(site_id).await?;
    Ok(DeleteResponse::NoContent)
}
