//! `SQLite` implementation of [`ReadingRepository`].

use sqlx::sqlite::SqliteRow;
use sqlx::{FromRow, Row, SqlitePool};

use luxmon_app::ports::ReadingRepository;
use luxmon_domain::error::LuxmonError;
use luxmon_domain::id::{ReadingId, SiteId};
use luxmon_domain::reading::Reading;
use luxmon_domain::time::Timestamp;

use crate::error::StorageError;

/// Wrapper for converting database rows into domain types without polluting
/// domain structs with database concerns.
struct Wrapper(Reading);

impl<'r> FromRow<'r, SqliteRow> for Wrapper {
    fn from_row(row: &'r SqliteRow) -> Result<Self, sqlx::Error> {
        let id: uuid::Uuid = row.try_get("id")?;
        let site_id: uuid::Uuid = row.try_get("site_id")?;
        let value: f64 = row.try_get("value")?;
        let recorded_at_str: String = row.try_get("recorded_at")?;

        let id = ReadingId::from_uuid(id);
        let site_id = SiteId::from_uuid(site_id);
        let recorded_at = chrono::DateTime::parse_from_rfc3339(&recorded_at_str)
            .map_err(|err| sqlx::Error::Decode(Box::new(err)))?
            .to_utc();

        Ok(Self(Reading {
            id,
            site_id,
            value,
            recorded_at,
        }))
    }
}

const INSERT: &str = r"
    INSERT INTO readings (id, site_id, value, recorded_at)
    VALUES (?, ?, ?, ?)
";

const SELECT_BY_ID: &str = "SELECT * FROM readings WHERE id = ?";

const SELECT_BY_SITE_IN_RANGE: &str = r"
    SELECT * FROM readings
    WHERE site_id = ? AND recorded_at >= ? AND recorded_at <= ?
    ORDER BY recorded_at ASC
    LIMIT ?
";

const SELECT_BY_SITE_IN_RANGE_NO_LIMIT: &str = r"
    SELECT * FROM readings
    WHERE site_id = ? AND recorded_at >= ? AND recorded_at <= ?
    ORDER BY recorded_at ASC
";

const SELECT_LATEST: &str = r"
    SELECT * FROM readings
    WHERE site_id = ?
    ORDER BY recorded_at DESC
    LIMIT 1
";

/// `SQLite`-backed reading repository.
pub struct SqliteReadingRepository {
    pool: SqlitePool,
}

impl SqliteReadingRepository {
    /// Create a new repository using the given connection pool.
    #[must_use]
    pub fn new(pool: SqlitePool) -> Self {
        Self { pool }
    }
}

impl ReadingRepository for SqliteReadingRepository {
    async fn record(&self, reading: Reading) -> Result<Reading, LuxmonError> {
        sqlx::query(INSERT)
            .bind(reading.id.as_uuid())
            .bind(reading.site_id.as_uuid())
            .bind(reading.value)
            .bind(reading.recorded_at.to_rfc3339())
            .execute(&self.pool)
            .await
            .map_err(StorageError::from)?;

        Ok(reading)
    }

    async fn get_by_id(&self, id: ReadingId) -> Result<Option<Reading>, LuxmonError> {
        let row: Option<Wrapper> = sqlx::query_as(SELECT_BY_ID)
            .bind(id.as_uuid())
            .fetch_optional(&self.pool)
            .await
            .map_err(StorageError::from)?;

        Ok(row.map(|w| w.0))
    }

    async fn find_by_site_in_range(
        &self,
        site_id: SiteId,
        from: Timestamp,
        to: Timestamp,
        limit: Option<usize>,
    ) -> Result<Vec<Reading>, LuxmonError> {
        let rows: Vec<Wrapper> = if let Some(limit) = limit {
            let limit_i64 = i64::try_from(limit).unwrap_or(i64::MAX);
            sqlx::query_as(SELECT_BY_SITE_IN_RANGE)
                .bind(site_id.as_uuid())
                .bind(from.to_rfc3339())
                .bind(to.to_rfc3339())
                .bind(limit_i64)
                .fetch_all(&self.pool)
                .await
                .map_err(StorageError::from)?
        } else {
            sqlx::query_as(SELECT_BY_SITE_IN_RANGE_NO_LIMIT)
                .bind(site_id.as_uuid())
                .bind(from.to_rfc3339())
                .bind(to.to_rfc3339())
                .fetch_all(&self.pool)
                .await
                .map_err(StorageError::from)?
        };

        Ok(rows.into_iter().map(|w| w.0).collect())
    }

    async fn find_latest(&self, site_id: SiteId) -> Result<Option<Reading>, LuxmonError> {
        let row: Option<Wrapper> = sqlx::query_as(SELECT_LATEST)
            .bind(site_id.as_uuid())
            .fetch_optional(&self.pool)
            .await
            .map_err(StorageError::from)?;

        Ok(row.map(|w| w.0))
    }
}
