//! `SQLite` implementation of [`JobRepository`].

use sqlx::sqlite::SqliteRow;
use sqlx::{FromRow, Row, SqlitePool};

use luxmon_app::ports::JobRepository;
use luxmon_domain::error::LuxmonError;
use luxmon_domain::id::{JobId, SiteId};
use luxmon_domain::job::{Job, JobSource, JobStatus};

use crate::error::StorageError;

/// Wrapper for converting database rows into domain types without polluting
/// domain structs with database concerns.
struct Wrapper(Job);

impl<'r> FromRow<'r, SqliteRow> for Wrapper {
    fn from_row(row: &'r SqliteRow) -> Result<Self, sqlx::Error> {
        let id: uuid::Uuid = row.try_get("id")?;
        let site_id: uuid::Uuid = row.try_get("site_id")?;
        let job_type: String = row.try_get("job_type")?;
        let status_str: String = row.try_get("status")?;
        let source_json: String = row.try_get("source")?;
        let created_at_str: String = row.try_get("created_at")?;
        let resolved_at_str: Option<String> = row.try_get("resolved_at")?;

        let id = JobId::from_uuid(id);
        let site_id = SiteId::from_uuid(site_id);
        let status: JobStatus = serde_json::from_str(&format!("\"{status_str}\""))
            .map_err(|err| sqlx::Error::Decode(Box::new(err)))?;
        let source: JobSource = serde_json::from_str(&source_json)
            .map_err(|err| sqlx::Error::Decode(Box::new(err)))?;
        let created_at = chrono::DateTime::parse_from_rfc3339(&created_at_str)
            .map_err(|err| sqlx::Error::Decode(Box::new(err)))?
            .to_utc();
        let resolved_at = resolved_at_str
            .map(|s| chrono::DateTime::parse_from_rfc3339(&s).map(|dt| dt.to_utc()))
            .transpose()
            .map_err(|err| sqlx::Error::Decode(Box::new(err)))?;

        Ok(Self(Job {
            id,
            site_id,
            job_type,
            status,
            source,
            created_at,
            resolved_at,
        }))
    }
}

const INSERT: &str = r"
    INSERT INTO jobs (id, site_id, job_type, status, source, created_at, resolved_at)
    VALUES (?, ?, ?, ?, ?, ?, ?)
";

const SELECT_BY_ID: &str = "SELECT * FROM jobs WHERE id = ?";
const SELECT_ALL: &str = "SELECT * FROM jobs ORDER BY created_at DESC";
const SELECT_BY_SITE: &str = "SELECT * FROM jobs WHERE site_id = ? ORDER BY created_at DESC";

const SELECT_OPEN_BY_SITE_AND_TYPE: &str = r"
    SELECT * FROM jobs
    WHERE site_id = ? AND job_type = ? AND status IN ('open', 'in_progress')
    ORDER BY created_at DESC
    LIMIT 1
";

const UPDATE: &str = r"
    UPDATE jobs
    SET site_id = ?, job_type = ?, status = ?, source = ?, created_at = ?, resolved_at = ?
    WHERE id = ?
";

/// `SQLite`-backed job repository.
pub struct SqliteJobRepository {
    pool: SqlitePool,
}

impl SqliteJobRepository {
    /// Create a new repository using the given connection pool.
    #[must_use]
    pub fn new(pool: SqlitePool) -> Self {
        Self { pool }
    }
}

impl JobRepository for SqliteJobRepository {
    async fn create(&self, job: Job) -> Result<Job, LuxmonError> {
        let source_json = serde_json::to_string(&job.source).map_err(StorageError::from)?;

        sqlx::query(INSERT)
            .bind(job.id.as_uuid())
            .bind(job.site_id.as_uuid())
            .bind(&job.job_type)
            .bind(job.status.as_str())
            .bind(&source_json)
            .bind(job.created_at.to_rfc3339())
            .bind(job.resolved_at.map(|ts| ts.to_rfc3339()))
            .execute(&self.pool)
            .await
            .map_err(StorageError::from)?;

        Ok(job)
    }

    async fn get_by_id(&self, id: JobId) -> Result<Option<Job>, LuxmonError> {
        let row: Option<Wrapper> = sqlx::query_as(SELECT_BY_ID)
            .bind(id.as_uuid())
            .fetch_optional(&self.pool)
            .await
            .map_err(StorageError::from)?;

        Ok(row.map(|w| w.0))
    }

    async fn get_all(&self) -> Result<Vec<Job>, LuxmonError> {
        let rows: Vec<Wrapper> = sqlx::query_as(SELECT_ALL)
            .fetch_all(&self.pool)
            .await
            .map_err(StorageError::from)?;

        Ok(rows.into_iter().map(|w| w.0).collect())
    }

    async fn find_by_site(&self, site_id: SiteId) -> Result<Vec<Job>, LuxmonError> {
        let rows: Vec<Wrapper> = sqlx::query_as(SELECT_BY_SITE)
            .bind(site_id.as_uuid())
            .fetch_all(&self.pool)
            .await
            .map_err(StorageError::from)?;

        Ok(rows.into_iter().map(|w| w.0).collect())
    }

    async fn find_open_by_site_and_type(
        &self,
        site_id: SiteId,
        job_type: &str,
    ) -> Result<Option<Job>, LuxmonError> {
        let row: Option<Wrapper> = sqlx::query_as(SELECT_OPEN_BY_SITE_AND_TYPE)
            .bind(site_id.as_uuid())
            .bind(job_type)
            .fetch_optional(&self.pool)
            .await
            .map_err(StorageError::from)?;

        Ok(row.map(|w| w.0))
    }

    async fn update(&self, job: Job) -> Result<Job, LuxmonError> {
        let source_json = serde_json::to_string(&job.source).map_err(StorageError::from)?;

        sqlx::query(UPDATE)
            .bind(job.site_id.as_uuid())
            .bind(&job.job_type)
            .bind(job.status.as_str())
            .bind(&source_json)
            .bind(job.created_at.to_rfc3339())
            .bind(job.resolved_at.map(|ts| ts.to_rfc3339()))
            .bind(job.id.as_uuid())
            .execute(&self.pool)
            .await
            .map_err(StorageError::from)?;

        Ok(job)
    }
}
