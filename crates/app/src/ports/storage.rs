//! Storage ports — repository traits for persistence.

use std::future::Future;

use luxmon_domain::error::LuxmonError;
use luxmon_domain::id::{JobId, ReadingId, SiteId};
use luxmon_domain::job::Job;
use luxmon_domain::reading::Reading;
use luxmon_domain::site::Site;
use luxmon_domain::time::Timestamp;

/// Repository for persisting and querying [`Site`]s.
pub trait SiteRepository {
    /// Create a new site in storage.
    fn create(&self, site: Site) -> impl Future<Output = Result<Site, LuxmonError>> + Send;

    /// Get a site by its unique identifier.
    fn get_by_id(
        &self,
        id: SiteId,
    ) -> impl Future<Output = Result<Option<Site>, LuxmonError>> + Send;

    /// Get all sites.
    fn get_all(&self) -> impl Future<Output = Result<Vec<Site>, LuxmonError>> + Send;

    /// Delete a site by its unique identifier.
    fn delete(&self, id: SiteId) -> impl Future<Output = Result<(), LuxmonError>> + Send;
}

/// Repository for appending and querying time-series [`Reading`]s.
pub trait ReadingRepository {
    /// Append a reading. Readings are immutable once recorded.
    fn record(
        &self,
        reading: Reading,
    ) -> impl Future<Output = Result<Reading, LuxmonError>> + Send;

    /// Get a reading by its unique identifier.
    fn get_by_id(
        &self,
        id: ReadingId,
    ) -> impl Future<Output = Result<Option<Reading>, LuxmonError>> + Send;

    /// Readings for a site within `[from, to]`, oldest first, optionally
    /// capped at `limit` records.
    fn find_by_site_in_range(
        &self,
        site_id: SiteId,
        from: Timestamp,
        to: Timestamp,
        limit: Option<usize>,
    ) -> impl Future<Output = Result<Vec<Reading>, LuxmonError>> + Send;

    /// The most recent reading for a site, if any.
    fn find_latest(
        &self,
        site_id: SiteId,
    ) -> impl Future<Output = Result<Option<Reading>, LuxmonError>> + Send;
}

/// Repository for persisting and querying [`Job`]s.
pub trait JobRepository {
    /// Create a new job in storage.
    fn create(&self, job: Job) -> impl Future<Output = Result<Job, LuxmonError>> + Send;

    /// Get a job by its unique identifier.
    fn get_by_id(
        &self,
        id: JobId,
    ) -> impl Future<Output = Result<Option<Job>, LuxmonError>> + Send;

    /// Get all jobs, newest first.
    fn get_all(&self) -> impl Future<Output = Result<Vec<Job>, LuxmonError>> + Send;

    /// Jobs for a single site, newest first.
    fn find_by_site(
        &self,
        site_id: SiteId,
    ) -> impl Future<Output = Result<Vec<Job>, LuxmonError>> + Send;

    /// An open (not yet resolved or cancelled) job of the given type for a
    /// site, if one exists. This is the duplicate-suppression lookup.
    fn find_open_by_site_and_type(
        &self,
        site_id: SiteId,
        job_type: &str,
    ) -> impl Future<Output = Result<Option<Job>, LuxmonError>> + Send;

    /// Update an existing job.
    fn update(&self, job: Job) -> impl Future<Output = Result<Job, LuxmonError>> + Send;
}
