//! JSON REST handlers for jobs.

use std::str::FromStr;

use axum::Json;
use axum::extract::{Path, Query, State};
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use serde::Deserialize;

use luxmon_app::ports::{
    EventPublisher, EventStore, JobRepository, ReadingRepository, SiteRepository,
};
use luxmon_domain::error::{LuxmonError, ValidationError};
use luxmon_domain::id::JobId;
use luxmon_domain::job::{Job, JobStatus};

use crate::api::sites::parse_site_id;
use crate::error::ApiError;
use crate::state::AppState;

/// Query parameters for the job list endpoint.
#[derive(Deserialize)]
pub struct ListQuery {
    /// Restrict to a single site.
    pub site: Option<String>,
    /// Only return open (not resolved or cancelled) jobs.
    #[serde(default)]
    pub open: bool,
}

/// Request body for creating a job manually.
#[derive(Deserialize)]
pub struct CreateJobRequest {
    pub site_id: String,
    pub job_type: String,
}

/// Request body for updating a job's status.
#[derive(Deserialize)]
pub struct UpdateStatusRequest {
    pub status: JobStatus,
}

/// Possible responses from the list endpoint.
pub enum ListResponse {
    Ok(Json<Vec<Job>>),
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
    Ok(Json<Job>),
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
    Created(Json<Job>),
}

impl IntoResponse for CreateResponse {
    fn into_response(self) -> Response {
        match self {
            Self::Created(json) => (StatusCode::CREATED, json).into_response(),
        }
    }
}

/// Parse a job id path segment, mapping failures to a validation error.
fn parse_job_id(id: &str) -> Result<JobId, ApiError> {
    JobId::from_str(id).map_err(|_| {
        ApiError::from(LuxmonError::Validation(ValidationError::InvalidId(
            id.to_owned(),
        )))
    })
}

/// `GET /api/jobs?site=&open=`
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
    let jobs = match params.site.as_deref() {
        Some(site) => {
            let site_id = parse_site_id(site)?;
            state
                .job_service
                .list_jobs_for_site(site_id, params.open)
                .await?
        }
        None => state.job_service.list_jobs(params.open).await?,
    };
    Ok(ListResponse::Ok(Json(jobs)))
}

/// `GET /api/jobs/:id`
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
    let job_id = parse_job_id(&id)?;
    let job = state.job_service.get_job(job_id).await?;
    Ok(GetResponse::Ok(Json(job)))
}

/// `POST /api/jobs`
pub async fn create<SR, RR, JR, EP, ES>(
    State(state): State<AppState<SR, RR, JR, EP, ES>>,
    Json(req): Json<CreateJobRequest>,
) -> Result<CreateResponse, ApiError>
where
    SR: SiteRepository + Send + Sync + 'static,
    RR: ReadingRepository + Send + Sync + 'static,
    JR: JobRepository + Send + Sync + 'static,
    EP: EventPublisher + Send + Sync + 'static,
    ES: EventStore + Send + Sync + 'static,
{
    let site_id = parse_site_id(&req.site_id)?;

    // Jobs raised against missing sites must 404, not land as orphaned rows.
    state.site_service.get_site(site_id).await?;

    let job = Job::builder()
        .site_id(site_id)
        .job_type(req.job_type)
        .build()?;

    let created = state.job_service.create_job(job).await?;
    Ok(CreateResponse::Created(Json(created)))
}

/// `PUT /api/jobs/:id/status`
pub async fn update_status<SR, RR, JR, EP, ES>(
    State(state): State<AppState<SR, RR, JR, EP, ES>>,
    Path(id): Path<String>,
    Json(req): Json<UpdateStatusRequest>,
) -> Result<GetResponse, ApiError>
where
    SR: SiteRepository + Send + Sync + 'static,
    RR: ReadingRepository + Send + Sync + 'static,
    JR: JobRepository + Send + Sync + 'static,
    EP: EventPublisher + Send + Sync + 'static,
    ES: EventStore + Send + Sync + 'static,
{
    let job_id = parse_job_id(&id)?;
    let updated = state.job_service.update_status(job_id, req.status).await?;
    Ok(GetResponse::Ok(Json(updated)))
}
