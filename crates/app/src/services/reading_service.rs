//! Reading service — use-cases for recording and querying readings.

use luxmon_domain::error::LuxmonError;
use luxmon_domain::event::{Event, EventType};
use luxmon_domain::id::SiteId;
use luxmon_domain::reading::Reading;
use luxmon_domain::time::Timestamp;

use crate::ports::{EventPublisher, ReadingRepository};

/// Application service for the reading time-series.
pub struct ReadingService<R, P> {
    repo: R,
    publisher: P,
}

impl<R: ReadingRepository, P: EventPublisher> ReadingService<R, P> {
    /// Create a new service backed by the given repository.
    pub fn new(repo: R, publisher: P) -> Self {
        Self { repo, publisher }
    }

    /// Record a new reading after validating domain invariants.
    ///
    /// # Errors
    ///
    /// Returns [`LuxmonError::Validation`] if the value is invalid, or a
    /// storage error propagated from the repository.
    #[tracing::instrument(skip(self, reading), fields(site_id = %reading.site_id))]
    pub async fn record_reading(&self, reading: Reading) -> Result<Reading, LuxmonError> {
        reading.validate()?;
        let reading = self.repo.record(reading).await?;

        let event = Event::new(
            EventType::ReadingRecorded,
            Some(reading.site_id),
            serde_json::json!({
                "reading_id": reading.id,
                "value": reading.value,
                "recorded_at": reading.recorded_at,
            }),
        );
        let _ = self.publisher.publish(event).await;

        Ok(reading)
    }

    /// Readings for a site within `[from, to]`, oldest first.
    ///
    /// # Errors
    ///
    /// Returns a storage error propagated from the repository.
    pub async fn list_readings(
        &self,
        site_id: SiteId,
        from: Timestamp,
        to: Timestamp,
        limit: Option<usize>,
    ) -> Result<Vec<Reading>, LuxmonError> {
        self.repo.find_by_site_in_range(site_id, from, to, limit).await
    }

    /// The most recent reading for a site, if any.
    ///
    /// # Errors
    ///
    /// Returns a storage error propagated from the repository.
    pub async fn latest_reading(&self, site_id: SiteId) -> Result<Option<Reading>, LuxmonError> {
        self.repo.find_latest(site_id).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Duration;
    use luxmon_domain::error::ValidationError;
    use luxmon_domain::id::ReadingId;
    use luxmon_domain::time::now;
    use std::future::Future;
    use std::sync::Mutex;

    struct InMemoryReadingRepo {
        store: Mutex<Vec<Reading>>,
    }

    impl Default for InMemoryReadingRepo {
        fn default() -> Self {
            Self {
                store: Mutex::new(Vec::new()),
            }
        }
    }

    impl ReadingRepository for InMemoryReadingRepo {
        fn record(
            &self,
            reading: Reading,
        ) -> impl Future<Output = Result<Reading, LuxmonError>> + Send {
            let mut store = self.store.lock().unwrap();
            store.push(reading.clone());
            async { Ok(reading) }
        }
        fn get_by_id(
            &self,
            id: ReadingId,
        ) -> impl Future<Output = Result<Option<Reading>, LuxmonError>> + Send {
            let store = self.store.lock().unwrap();
            let result = store.iter().find(|r| r.id == id).cloned();
            async { Ok(result) }
        }
        fn find_by_site_in_range(
            &self,
            site_id: SiteId,
            from: Timestamp,
            to: Timestamp,
            limit: Option<usize>,
        ) -> impl Future<Output = Result<Vec<Reading>, LuxmonError>> + Send {
            let store = self.store.lock().unwrap();
            let mut result: Vec<Reading> = store
                .iter()
                .filter(|r| r.site_id == site_id && (from..=to).contains(&r.recorded_at))
                .cloned()
                .collect();
            result.sort_by_key(|r| r.recorded_at);
            if let Some(limit) = limit {
                result.truncate(limit);
            }
            async { Ok(result) }
        }
        fn find_latest(
            &self,
            site_id: SiteId,
        ) -> impl Future<Output = Result<Option<Reading>, LuxmonError>> + Send {
            let store = self.store.lock().unwrap();
            let result = store
                .iter()
                .filter(|r| r.site_id == site_id)
                .max_by_key(|r| r.recorded_at)
                .cloned();
            async { Ok(result) }
        }
    }

    struct SpyPublisher {
        events: Mutex<Vec<Event>>,
    }

    impl Default for SpyPublisher {
        fn default() -> Self {
            Self {
                events: Mutex::new(Vec::new()),
            }
        }
    }

    impl EventPublisher for SpyPublisher {
        fn publish(&self, event: Event) -> impl Future<Output = Result<(), LuxmonError>> + Send {
            self.events.lock().unwrap().push(event);
            async { Ok(()) }
        }
    }

    fn make_service() -> ReadingService<InMemoryReadingRepo, SpyPublisher> {
        ReadingService::new(InMemoryReadingRepo::default(), SpyPublisher::default())
    }

    fn valid_reading(site_id: SiteId, value: f64, recorded_at: Timestamp) -> Reading {
        Reading::builder()
            .site_id(site_id)
            .value(value)
            .recorded_at(recorded_at)
            .build()
            .unwrap()
    }

    #[tokio::test]
    async fn should_record_reading_when_valid() {
        let svc = make_service();
        let site_id = SiteId::new();
        let ts = now();

        let recorded = svc
            .record_reading(valid_reading(site_id, 3.3, ts))
            .await
            .unwrap();
        assert_eq!(recorded.site_id, site_id);

        let latest = svc.latest_reading(site_id).await.unwrap().unwrap();
        assert_eq!(latest.id, recorded.id);
    }

    #[tokio::test]
    async fn should_reject_invalid_reading() {
        let svc = make_service();
        let mut reading = valid_reading(SiteId::new(), 1.0, now());
        reading.value = -5.0;

        let result = svc.record_reading(reading).await;
        assert!(matches!(
            result,
            Err(LuxmonError::Validation(
                ValidationError::InvalidReadingValue
            ))
        ));
    }

    #[tokio::test]
    async fn should_publish_reading_recorded_event() {
        let svc = make_service();
        let site_id = SiteId::new();

        svc.record_reading(valid_reading(site_id, 2.5, now()))
            .await
            .unwrap();

        let events = svc.publisher.events.lock().unwrap();
        assert_eq!(events.len(), 1);
        assert_eq!(events[0].event_type, EventType::ReadingRecorded);
        assert_eq!(events[0].site_id, Some(site_id));
        assert_eq!(events[0].data["value"], 2.5);
    }

    #[tokio::test]
    async fn should_list_readings_in_range_oldest_first() {
        let svc = make_service();
        let site_id = SiteId::new();
        let base = now();

        let r1 = valid_reading(site_id, 1.0, base - Duration::hours(3));
        let r2 = valid_reading(site_id, 2.0, base - Duration::hours(2));
        let r3 = valid_reading(site_id, 3.0, base - Duration::hours(1));
        svc.record_reading(r2.clone()).await.unwrap();
        svc.record_reading(r3.clone()).await.unwrap();
        svc.record_reading(r1.clone()).await.unwrap();

        let listed = svc
            .list_readings(site_id, base - Duration::hours(4), base, None)
            .await
            .unwrap();
        assert_eq!(listed.len(), 3);
        assert_eq!(listed[0].id, r1.id);
        assert_eq!(listed[2].id, r3.id);
    }

    #[tokio::test]
    async fn should_respect_limit_when_listing() {
        let svc = make_service();
        let site_id = SiteId::new();
        let base = now();

        for hour in 1..=5 {
            svc.record_reading(valid_reading(site_id, 1.0, base - Duration::hours(hour)))
                .await
                .unwrap();
        }

        let listed = svc
            .list_readings(site_id, base - Duration::hours(10), base, Some(2))
            .await
            .unwrap();
        assert_eq!(listed.len(), 2);
    }

    #[tokio::test]
    async fn should_return_none_for_latest_when_no_readings() {
        let svc = make_service();
        let latest = svc.latest_reading(SiteId::new()).await.unwrap();
        assert!(latest.is_none());
    }

    #[tokio::test]
    async fn should_not_mix_readings_between_sites() {
        let svc = make_service();
        let site_a = SiteId::new();
        let site_b = SiteId::new();
        let ts = now();

        svc.record_reading(valid_reading(site_a, 1.0, ts))
            .await
            .unwrap();
        svc.record_reading(valid_reading(site_b, 2.0, ts))
            .await
            .unwrap();

        let latest_a = svc.latest_reading(site_a).await.unwrap().unwrap();
        assert!((latest_a.value - 1.0).abs() < f64::EPSILON);
    }
}
