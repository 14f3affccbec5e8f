//! Event store port — append-only persistence for domain events.

use std::future::Future;

use luxmon_domain::error::LuxmonError;
use luxmon_domain::event::Event;
use luxmon_domain::id::{EventId, SiteId};

/// Append-only store for [`Event`]s.
pub trait EventStore {
    /// Persist an event.
    fn store(&self, event: Event) -> impl Future<Output = Result<Event, LuxmonError>> + Send;

    /// Get an event by its unique identifier.
    fn get_by_id(
        &self,
        id: EventId,
    ) -> impl Future<Output = Result<Option<Event>, LuxmonError>> + Send;

    /// The most recent events, newest first.
    fn get_recent(
        &self,
        limit: usize,
    ) -> impl Future<Output = Result<Vec<Event>, LuxmonError>> + Send;

    /// The most recent events for a site, newest first.
    fn find_by_site(
        &self,
        site_id: SiteId,
        limit: usize,
    ) -> impl Future<Output = Result<Vec<Event>, LuxmonError>> + Send;
}
