//! `SQLite` implementation of [`SiteRepository`].

use sqlx::sqlite::SqliteRow;
use sqlx::{FromRow, Row, SqlitePool};

use luxmon_app::ports::SiteRepository;
use luxmon_domain::error::LuxmonError;
use luxmon_domain::id::SiteId;
use luxmon_domain::site::Site;

use crate::error::StorageError;

/// Wrapper for converting database rows into domain types without polluting
/// domain structs with database concerns.
struct Wrapper(Site);

impl<'r> FromRow<'r, SqliteRow> for Wrapper {
    fn from_row(row: &'r SqliteRow) -> Result<Self, sqlx::Error> {
        let id: uuid::Uuid = row.try_get("id")?;
        let name: String = row.try_get("name")?;
        let region: Option<String> = row.try_get("region")?;
        let created_at_str: String = row.try_get("created_at")?;

        let id = SiteId::from_uuid(id);
        let created_at = chrono::DateTime::parse_from_rfc3339(&created_at_str)
            .map_err(|err| sqlx::Error::Decode(Box::new(err)))?
            .to_utc();

        Ok(Self(Site {
            id,
            name,
            region,
            created_at,
        }))
    }
}

const INSERT: &str = r"
    INSERT INTO sites (id, name, region, created_at)
    VALUES (?, ?, ?, ?)
";

const SELECT_BY_ID: &str = "SELECT * FROM sites WHERE id = ?";
const SELECT_ALL: &str = "SELECT * FROM sites ORDER BY created_at ASC";
const DELETE: &str = "DELETE FROM sites WHERE id = ?";

/// `SQLite`-backed site repository.
pub struct SqliteSiteRepository {
    pool: SqlitePool,
}

impl SqliteSiteRepository {
    /// Create a new repository using the given connection pool.
    #[must_use]
    pub fn new(pool: SqlitePool) -> Self {
        Self { pool }
    }
}

impl SiteRepository for SqliteSiteRepository {
    async fn create(&self, site: Site) -> Result<Site, LuxmonError> {
        sqlx::query(INSERT)
            .bind(site.id.as_uuid())
            .bind(&site.name)
            .bind(&site.region)
            .bind(site.created_at.to_rfc3339())
            .execute(&self.pool)
            .await
            .map_err(StorageError::from)?;

        Ok(site)
    }

    async fn get_by_id(&self, id: SiteId) -> Result<Option<Site>, LuxmonError> {
        let row: Option<Wrapper> = sqlx::query_as(SELECT_BY_ID)
            .bind(id.as_uuid())
            .fetch_optional(&self.pool)
            .await
            .map_err(StorageError::from)?;

        Ok(row.map(|w| w.0))
    }

    async fn get_all(&self) -> Result<Vec<Site>, LuxmonError> {
        let rows: Vec<Wrapper> = sqlx::query_as(SELECT_ALL)
            .fetch_all(&self.pool)
            .await
            .map_err(StorageError::from)?;

        Ok(rows.into_iter().map(|w| w.0).collect())
    }

    async fn delete(&self, id: SiteId) -> Result<(), LuxmonError> {
        sqlx::query(DELETE)
            .bind(id.as_uuid())
            .execute(&self.pool)
            .await
            .map_err(StorageError::from)?;

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::pool::Config;

    async fn setup() -> SqliteSiteRepository {
        let db = Config {
            database_url: "sqlite::memory:".to_string(),
        }
        .build()
        .await
        .unwrap();
        SqliteSiteRepository::new(db.pool().clone())
    }

    fn test_site(name: &str) -> Site {
        Site::builder().name(name).region("North").build().unwrap()
    }

    #[tokio::test]
    async fn should_create_and_retrieve_site() {
        let repo = setup().await;
        let site = test_site("Rooftop 1");
        let id = site.id;

        repo.create(site).await.unwrap();

        let found = repo.get_by_id(id).await.unwrap().unwrap();
        assert_eq!(found.id, id);
        assert_eq!(found.name, "Rooftop 1");
        assert_eq!(found.region.as_deref(), Some("North"));
    }

    #[tokio::test]
    async fn should_return_none_for_missing_site() {
        let repo = setup().await;
        let found = repo.get_by_id(SiteId::new()).await.unwrap();
        assert!(found.is_none());
    }

    #[tokio::test]
    async fn should_list_sites_in_creation_order() {
        let repo = setup().await;
        let first = Site::builder()
            .name("First")
            .created_at(luxmon_domain::time::now() - chrono::Duration::hours(2))
            .build()
            .unwrap();
        let second = Site::builder()
            .name("Second")
            .created_at(luxmon_domain::time::now() - chrono::Duration::hours(1))
            .build()
            .unwrap();

        repo.create(second.clone()).await.unwrap();
        repo.create(first.clone()).await.unwrap();

        let all = repo.get_all().await.unwrap();
        assert_eq!(all.len(), 2);
        assert_eq!(all[0].id, first.id);
        assert_eq!(all[1].id, second.id);
    }

    #[tokio::test]
    async fn should_delete_site() {
        let repo = setup().await;
        let site = test_site("Doomed");
        let id = site.id;
        repo.create(site).await.unwrap();

        repo.delete(id).await.unwrap();

        assert!(repo.get_by_id(id).await.unwrap().is_none());
    }

    #[tokio::test]
    async fn should_preserve_null_region() {
        let repo = setup().await;
        let site = Site::builder().name("No Region").build().unwrap();
        let id = site.id;
        repo.create(site).await.unwrap();

        let found = repo.get_by_id(id).await.unwrap().unwrap();
        assert!(found.region.is_none());
    }
}
