//! Automation engine — periodic rule evaluation over site reading history.
//!
//! Each sweep walks every site, asks the configured rules whether their
//! condition holds, and raises a job per firing rule. When a rule has
//! `check_duplicate` set, a new job is suppressed while an open job of the
//! same type exists for the site.

use chrono::Duration;

use luxmon_domain::error::LuxmonError;
use luxmon_domain::event::{Event, EventType};
use luxmon_domain::job::{Job, JobSource};
use luxmon_domain::rule::{RuleKind, RuleSet};
use luxmon_domain::site::Site;
use luxmon_domain::time::{Timestamp, now};

use crate::ports::{EventPublisher, JobRepository, ReadingRepository, SiteRepository};

/// Outcome of a single automation sweep.
#[derive(Debug, Clone, Default, PartialEq, Eq, serde::Serialize)]
pub struct SweepReport {
    /// Number of sites walked.
    pub sites_examined: usize,
    /// Jobs raised during this sweep.
    pub jobs_created: usize,
    /// Firings swallowed because an open job of the same type existed.
    pub duplicates_suppressed: usize,
}

/// Batch rule evaluator and job creator.
pub struct AutomationEngine<SR, RR, JR, P> {
    site_repo: SR,
    reading_repo: RR,
    job_repo: JR,
    publisher: P,
    rules: RuleSet,
}

impl<SR, RR, JR, P> AutomationEngine<SR, RR, JR, P>
where
    SR: SiteRepository,
    RR: ReadingRepository,
    JR: JobRepository,
    P: EventPublisher,
{
    /// Create a new engine with the given rule configuration.
    pub fn new(site_repo: SR, reading_repo: RR, job_repo: JR, publisher: P, rules: RuleSet) -> Self {
        Self {
            site_repo,
            reading_repo,
            job_repo,
            publisher,
            rules,
        }
    }

    /// The rule configuration this engine runs with.
    #[must_use]
    pub fn rules(&self) -> &RuleSet {
        &self.rules
    }

    /// Run one full sweep over all sites.
    ///
    /// The pass is a single-threaded batch: sites are examined in storage
    /// order and each enabled rule is evaluated against that site's recent
    /// reading history. A `SweepCompleted` event is published at the end.
    ///
    /// # Errors
    ///
    /// Returns a storage error if loading sites, readings, or jobs fails,
    /// or if creating a job fails.
    #[tracing::instrument(skip(self))]
    pub async fn run_sweep(&self) -> Result<SweepReport, LuxmonError> {
        let at = now();
        let sites = self.site_repo.get_all().await?;
        let mut report = SweepReport::default();

        for site in &sites {
            report.sites_examined += 1;
            self.evaluate_no_coms(site, at, &mut report).await?;
            self.evaluate_zero_reads(site, at, &mut report).await?;
        }

        tracing::info!(
            sites = report.sites_examined,
            created = report.jobs_created,
            suppressed = report.duplicates_suppressed,
            "automation sweep completed"
        );

        // Publish SweepCompleted event (fire-and-forget)
        let event = Event::new(
            EventType::SweepCompleted,
            None,
            serde_json::json!({
                "sites_examined": report.sites_examined,
                "jobs_created": report.jobs_created,
                "duplicates_suppressed": report.duplicates_suppressed,
            }),
        );
        let _ = self.publisher.publish(event).await;

        Ok(report)
    }

    /// Evaluate the no-communication rule for one site.
    async fn evaluate_no_coms(
        &self,
        site: &Site,
        at: Timestamp,
        report: &mut SweepReport,
    ) -> Result<(), LuxmonError> {
        let rule = &self.rules.no_coms;
        if !rule.enabled {
            return Ok(());
        }

        let latest = self.reading_repo.find_latest(site.id).await?;
        if rule.is_met(latest.map(|r| r.recorded_at), at) {
            self.raise_job(
                site,
                RuleKind::NoComs,
                &rule.job_type_name,
                rule.check_duplicate,
                at,
                report,
            )
            .await?;
        }
        Ok(())
    }

    /// Evaluate the zero-generation rule for one site.
    async fn evaluate_zero_reads(
        &self,
        site: &Site,
        at: Timestamp,
        report: &mut SweepReport,
    ) -> Result<(), LuxmonError> {
        let rule = &self.rules.zero_reads;
        if !rule.enabled {
            return Ok(());
        }

        let from = at - Duration::days(i64::from(rule.days_to_check));
        let readings = self
            .reading_repo
            .find_by_site_in_range(site.id, from, at, None)
            .await?;
        if rule.is_met(&readings, at) {
            self.raise_job(
                site,
                RuleKind::ZeroReads,
                &rule.job_type_name,
                rule.check_duplicate,
                at,
                report,
            )
            .await?;
        }
        Ok(())
    }

    /// Create a job for a firing rule, honouring duplicate suppression.
    async fn raise_job(
        &self,
        site: &Site,
        rule: RuleKind,
        job_type: &str,
        check_duplicate: bool,
        at: Timestamp,
        report: &mut SweepReport,
    ) -> Result<(), LuxmonError> {
        if check_duplicate
            && let Some(existing) = self
                .job_repo
                .find_open_by_site_and_type(site.id, job_type)
                .await?
        {
            tracing::debug!(
                site_id = %site.id,
                job_id = %existing.id,
                job_type,
                "open job of same type exists, suppressing"
            );
            report.duplicates_suppressed += 1;
            return Ok(());
        }

        let job = Job::builder()
            .site_id(site.id)
            .job_type(job_type)
            .source(JobSource::Automation { rule })
            .created_at(at)
            .build()?;
        let job = self.job_repo.create(job).await?;

        tracing::info!(site_id = %site.id, job_id = %job.id, job_type, %rule, "raised job");

        // Publish JobCreated event (fire-and-forget)
        let event = Event::new(
            EventType::JobCreated,
            Some(site.id),
            serde_json::json!({
                "job_id": job.id,
                "job_type": job.job_type,
                "rule": rule,
            }),
        );
        let _ = self.publisher.publish(event).await;

        report.jobs_created += 1;
        Ok(())
    }
}
