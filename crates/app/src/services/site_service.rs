//! Site service — use-cases for managing sites.

use luxmon_domain::error::{LuxmonError, NotFoundError};
use luxmon_domain::event::{Event, EventType};
use luxmon_domain::id::SiteId;
use luxmon_domain::site::Site;

use crate::ports::{EventPublisher, SiteRepository};

/// Application service for site CRUD operations.
pub struct SiteService<R, P> {
    repo: R,
    publisher: P,
}

impl<R: SiteRepository, P: EventPublisher> SiteService<R, P> {
    /// Create a new service backed by the given repository.
    pub fn new(repo: R, publisher: P) -> Self {
        Self { repo, publisher }
    }

    /// Create a new site after validating domain invariants.
    ///
    /// # Errors
    ///
    /// Returns [`LuxmonError::Validation`] if invariants fail, or a
    /// storage error propagated from the repository.
    #[tracing::instrument(skip(self, site), fields(site_name = %site.name))]
    pub async fn create_site(&self, site: Site) -> Result<Site, LuxmonError> {
        site.validate()?;
        let site = self.repo.create(site).await?;

        let event = Event::new(
            EventType::SiteCreated,
            Some(site.id),
            serde_json::json!({"name": site.name}),
        );
        let _ = self.publisher.publish(event).await;

        Ok(site)
    }

    /// Look up a site by id, returning an error if not found.
    ///
    /// # Errors
    ///
    /// Returns [`LuxmonError::NotFound`] when no site with `id` exists,
    /// or a storage error from the repository.
    pub async fn get_site(&self, id: SiteId) -> Result<Site, LuxmonError> {
        self.repo.get_by_id(id).await?.ok_or_else(|| {
            NotFoundError {
                entity: "Site",
                id: id.to_string(),
            }
            .into()
        })
    }

    /// List all sites.
    ///
    /// # Errors
    ///
    /// Returns a storage error propagated from the repository.
    pub async fn list_sites(&self) -> Result<Vec<Site>, LuxmonError> {
        self.repo.get_all().await
    }

    /// Delete a site by id.
    ///
    /// # Errors
    ///
    /// Returns a storage error propagated from the repository.
    #[tracing::instrument(skip(self))]
    pub async fn delete_site(&self, id: SiteId) -> Result<(), LuxmonError> {
        self.repo.delete(id).await
    }
}
