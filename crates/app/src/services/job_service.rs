//! Job service — use-cases for managing jobs.

use luxmon_domain::error::{LuxmonError, NotFoundError};
use luxmon_domain::event::{Event, EventType};
use luxmon_domain::id::{JobId, SiteId};
use luxmon_domain::job::{Job, JobStatus};
use luxmon_domain::time::now;

use crate::ports::{EventPublisher, JobRepository};

/// Application service for job CRUD and status transitions.
pub struct JobService<R, P> {
    repo: R,
    publisher: P,
}

impl<R: JobRepository, P: EventPublisher> JobService<R, P> {
    /// Create a new service backed by the given repository.
    pub fn new(repo: R, publisher: P) -> Self {
        Self { repo, publisher }
    }

    /// Create a new job after validating domain invariants.
    ///
    /// # Errors
    ///
    /// Returns [`LuxmonError::Validation`] if invariants fail, or a
    /// storage error propagated from the repository.
    #[tracing::instrument(skip(self, job), fields(site_id = %job.site_id, job_type = %job.job_type))]
    pub async fn create_job(&self, job: Job) -> Result<Job, LuxmonError> {
        job.validate()?;
        let job = self.repo.create(job).await?;

        let event = Event::new(
            EventType::JobCreated,
            Some(job.site_id),
            serde_json::json!({
                "job_id": job.id,
                "job_type": job.job_type,
                "source": job.source,
            }),
        );
        let _ = self.publisher.publish(event).await;

        Ok(job)
    }

    /// Look up a job by id, returning an error if not found.
    ///
    /// # Errors
    ///
    /// Returns [`LuxmonError::NotFound`] when no job with `id` exists,
    /// or a storage error from the repository.
    pub async fn get_job(&self, id: JobId) -> Result<Job, LuxmonError> {
        self.repo.get_by_id(id).await?.ok_or_else(|| {
            NotFoundError {
                entity: "Job",
                id: id.to_string(),
            }
            .into()
        })
    }

    /// List all jobs, optionally only the open ones.
    ///
    /// # Errors
    ///
    /// Returns a storage error propagated from the repository.
    pub async fn list_jobs(&self, open_only: bool) -> Result<Vec<Job>, LuxmonError> {
        let mut jobs = self.repo.get_all().await?;
        if open_only {
            jobs.retain(|j| j.status.is_open());
        }
        Ok(jobs)
    }

    /// List jobs for a single site, optionally only the open ones.
    ///
    /// # Errors
    ///
    /// Returns a storage error propagated from the repository.
    pub async fn list_jobs_for_site(
        &self,
        site_id: SiteId,
        open_only: bool,
    ) -> Result<Vec<Job>, LuxmonError> {
        let mut jobs = self.repo.find_by_site(site_id).await?;
        if open_only {
            jobs.retain(|j| j.status.is_open());
        }
        Ok(jobs)
    }

    /// Transition a job to a new status.
    ///
    /// Terminal transitions stamp `resolved_at`; reopening clears it.
    /// Publishes a `JobStatusChanged` event.
    ///
    /// # Errors
    ///
    /// Returns [`LuxmonError::NotFound`] if the job does not exist,
    /// or a storage error from the repository.
    #[tracing::instrument(skip(self))]
    pub async fn update_status(&self, id: JobId, status: JobStatus) -> Result<Job, LuxmonError> {
        let mut job = self.get_job(id).await?;
        let previous = job.status;
        job.set_status(status, now());
        let job = self.repo.update(job).await?;

        let event = Event::new(
            EventType::JobStatusChanged,
            Some(job.site_id),
            serde_json::json!({
                "job_id": job.id,
                "from": previous,
                "to": job.status,
            }),
        );
        let _ = self.publisher.publish(event).await;

        Ok(job)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use luxmon_domain::error::ValidationError;
    use std::collections::HashMap;
    use std::future::Future;
    use std::sync::Mutex;

    struct InMemoryJobRepo {
        store: Mutex<HashMap<JobId, Job>>,
    }

    impl Default for InMemoryJobRepo {
        fn default() -> Self {
            Self {
                store: Mutex::new(HashMap::new()),
            }
        }
    }

    impl JobRepository for InMemoryJobRepo {
        fn create(&self, job: Job) -> impl Future<Output = Result<Job, LuxmonError>> + Send {
            let mut store = self.store.lock().unwrap();
            store.insert(job.id, job.clone());
            async { Ok(job) }
        }
        fn get_by_id(
            &self,
            id: JobId,
        ) -> impl Future<Output = Result<Option<Job>, LuxmonError>> + Send {
            let store = self.store.lock().unwrap();
            let result = store.get(&id).cloned();
            async { Ok(result) }
        }
        fn get_all(&self) -> impl Future<Output = Result<Vec<Job>, LuxmonError>> + Send {
            let store = self.store.lock().unwrap();
            let result: Vec<Job> = store.values().cloned().collect();
            async { Ok(result) }
        }
        fn find_by_site(
            &self,
            site_id: SiteId,
        ) -> impl Future<Output = Result<Vec<Job>, LuxmonError>> + Send {
            let store = self.store.lock().unwrap();
            let result: Vec<Job> = store
                .values()
                .filter(|j| j.site_id == site_id)
                .cloned()
                .collect();
            async { Ok(result) }
        }
        fn find_open_by_site_and_type(
            &self,
            site_id: SiteId,
            job_type: &str,
        ) -> impl Future<Output = Result<Option<Job>, LuxmonError>> + Send {
            let store = self.store.lock().unwrap();
            let result = store
                .values()
                .find(|j| j.site_id == site_id && j.job_type == job_type && j.status.is_open())
                .cloned();
            async { Ok(result) }
        }
        fn update(&self, job: Job) -> impl Future<Output = Result<Job, LuxmonError>> + Send {
            let mut store = self.store.lock().unwrap();
            store.insert(job.id, job.clone());
            async { Ok(job) }
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

    fn make_service() -> JobService<InMemoryJobRepo, SpyPublisher> {
        JobService::new(InMemoryJobRepo::default(), SpyPublisher::default())
    }

    fn valid_job(site_id: SiteId) -> Job {
        Job::builder()
            .site_id(site_id)
            .job_type("Panel Inspection")
            .build()
            .unwrap()
    }

    #[tokio::test]
    async fn should_create_job_when_valid() {
        let svc = make_service();
        let job = valid_job(SiteId::new());
        let id = job.id;

        let created = svc.create_job(job).await.unwrap();
        assert_eq!(created.id, id);

        let fetched = svc.get_job(id).await.unwrap();
        assert_eq!(fetched.job_type, "Panel Inspection");
    }

    #[tokio::test]
    async fn should_reject_create_when_job_type_is_empty() {
        let svc = make_service();
        let mut job = valid_job(SiteId::new());
        job.job_type = String::new();

        let result = svc.create_job(job).await;
        assert!(matches!(
            result,
            Err(LuxmonError::Validation(ValidationError::EmptyJobType))
        ));
    }

    #[tokio::test]
    async fn should_return_not_found_when_job_missing() {
        let svc = make_service();
        let result = svc.get_job(JobId::new()).await;
        assert!(matches!(result, Err(LuxmonError::NotFound(_))));
    }

    #[tokio::test]
    async fn should_list_only_open_jobs_when_requested() {
        let svc = make_service();
        let site_id = SiteId::new();
        let open = valid_job(site_id);
        let resolved = valid_job(site_id);
        let resolved_id = resolved.id;
        svc.create_job(open).await.unwrap();
        svc.create_job(resolved).await.unwrap();
        svc.update_status(resolved_id, JobStatus::Resolved)
            .await
            .unwrap();

        let all = svc.list_jobs(false).await.unwrap();
        assert_eq!(all.len(), 2);

        let open_only = svc.list_jobs(true).await.unwrap();
        assert_eq!(open_only.len(), 1);
        assert!(open_only[0].status.is_open());
    }

    #[tokio::test]
    async fn should_list_jobs_for_single_site() {
        let svc = make_service();
        let site_a = SiteId::new();
        let site_b = SiteId::new();
        svc.create_job(valid_job(site_a)).await.unwrap();
        svc.create_job(valid_job(site_b)).await.unwrap();

        let for_a = svc.list_jobs_for_site(site_a, false).await.unwrap();
        assert_eq!(for_a.len(), 1);
        assert_eq!(for_a[0].site_id, site_a);
    }

    #[tokio::test]
    async fn should_stamp_resolved_at_when_resolving() {
        let svc = make_service();
        let job = valid_job(SiteId::new());
        let id = job.id;
        svc.create_job(job).await.unwrap();

        let updated = svc.update_status(id, JobStatus::Resolved).await.unwrap();
        assert_eq!(updated.status, JobStatus::Resolved);
        assert!(updated.resolved_at.is_some());
    }

    #[tokio::test]
    async fn should_clear_resolved_at_when_reopening() {
        let svc = make_service();
        let job = valid_job(SiteId::new());
        let id = job.id;
        svc.create_job(job).await.unwrap();

        svc.update_status(id, JobStatus::Cancelled).await.unwrap();
        let reopened = svc.update_status(id, JobStatus::Open).await.unwrap();
        assert!(reopened.resolved_at.is_none());
    }

    #[tokio::test]
    async fn should_publish_status_change_event() {
        let svc = make_service();
        let job = valid_job(SiteId::new());
        let id = job.id;
        svc.create_job(job).await.unwrap();

        svc.update_status(id, JobStatus::InProgress).await.unwrap();

        let events = svc.publisher.events.lock().unwrap();
        let change = events
            .iter()
            .find(|e| e.event_type == EventType::JobStatusChanged)
            .unwrap();
        assert_eq!(change.data["from"], "open");
        assert_eq!(change.data["to"], "in_progress");
    }

    #[tokio::test]
    async fn should_error_when_updating_status_of_missing_job() {
        let svc = make_service();
        let result = svc.update_status(JobId::new(), JobStatus::Resolved).await;
        assert!(matches!(result, Err(LuxmonError::NotFound(_))));
    }
}
