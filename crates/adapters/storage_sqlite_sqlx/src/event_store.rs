//! `SQLite` implementation of [`EventStore`].

use sqlx::sqlite::SqliteRow;
use sqlx::{FromRow, Row, SqlitePool};

use luxmon_app::ports::EventStore;
use luxmon_domain::error::LuxmonError;
use luxmon_domain::event::{Event, EventType};
use luxmon_domain::id::{EventId, SiteId};

use crate::error::StorageError;

struct Wrapper(Event);

impl Wrapper {
    fn maybe(value: Option<Self>) -> Option<Event> {
        value.map(|w| w.0)
    }
}

impl<'r> FromRow<'r, SqliteRow> for Wrapper {
    fn from_row(row: &'r SqliteRow) -> Result<Self, sqlx::Error> {
        let id: uuid::Uuid = row.try_get("id")?;
        let event_type: String = row.try_get("event_type")?;
        let site_id: Option<uuid::Uuid> = row.try_get("site_id")?;
        let timestamp_str: String = row.try_get("timestamp")?;
        let data_json: String = row.try_get("data")?;

        let id = EventId::from_uuid(id);
        let event_type: EventType = serde_json::from_str(&format!("\"{event_type}\""))
            .map_err(|err| sqlx::Error::Decode(Box::new(err)))?;
        let site_id = site_id.map(SiteId::from_uuid);
        let timestamp = chrono::DateTime::parse_from_rfc3339(&timestamp_str)
            .map_err(|err| sqlx::Error::Decode(Box::new(err)))?
            .to_utc();
        let data: serde_json::Value =
            serde_json::from_str(&data_json).map_err(|err| sqlx::Error::Decode(Box::new(err)))?;

        Ok(Self(Event {
            id,
            event_type,
            site_id,
            timestamp,
            data,
        }))
    }
}

const INSERT: &str = r"
    INSERT INTO events (id, event_type, site_id, timestamp, data)
    VALUES (?, ?, ?, ?, ?)
";

const SELECT_BY_ID: &str = "SELECT * FROM events WHERE id = ?";
const SELECT_RECENT: &str = "SELECT * FROM events ORDER BY timestamp DESC LIMIT ?";
const SELECT_BY_SITE: &str =
    "SELECT * FROM events WHERE site_id = ? ORDER BY timestamp DESC LIMIT ?";

/// `SQLite`-backed event store.
pub struct SqliteEventStore {
    pool: SqlitePool,
}

impl SqliteEventStore {
    /// Create a new event store using the given connection pool.
    #[must_use]
    pub fn new(pool: SqlitePool) -> Self {
        Self { pool }
    }
}

impl EventStore for SqliteEventStore {
    async fn store(&self, event: Event) -> Result<Event, LuxmonError> {
        let data_json = serde_json::to_string(&event.data).map_err(StorageError::from)?;

        sqlx::query(INSERT)
            .bind(event.id.as_uuid())
            .bind(event.event_type.as_str())
            .bind(event.site_id.map(SiteId::as_uuid))
            .bind(event.timestamp.to_rfc3339())
            .bind(&data_json)
            .execute(&self.pool)
            .await
            .map_err(StorageError::from)?;

        Ok(event)
    }

    async fn get_by_id(&self, id: EventId) -> Result<Option<Event>, LuxmonError> {
        let row: Option<Wrapper> = sqlx::query_as(SELECT_BY_ID)
            .bind(id.as_uuid())
            .fetch_optional(&self.pool)
            .await
            .map_err(StorageError::from)?;

        Ok(Wrapper::maybe(row))
    }

    async fn get_recent(&self, limit: usize) -> Result<Vec<Event>, LuxmonError> {
        let limit = i32::try_from(limit).unwrap_or(i32::MAX);
        let rows: Vec<Wrapper> = sqlx::query_as(SELECT_RECENT)
            .bind(limit)
            .fetch_all(&self.pool)
            .await
            .map_err(StorageError::from)?;

        Ok(rows.into_iter().map(|w| w.0).collect())
    }

    async fn find_by_site(&self, site_id: SiteId, limit: usize) -> Result<Vec<Event>, LuxmonError> {
        let limit = i32::try_from(limit).unwrap_or(i32::MAX);
        let rows: Vec<Wrapper> = sqlx::query_as(SELECT_BY_SITE)
            .bind(site_id.as_uuid())
            .bind(limit)
            .fetch_all(&self.pool)
            .await
            .map_err(StorageError::from)?;

        Ok(rows.into_iter().map(|w| w.0).collect())
    }
}
