//! Job — a tracked work item raised against a site.
//!
//! Jobs are created either by the automation engine (when a rule condition
//! is met) or manually through the API. A job is **open** until an operator
//! resolves or cancels it; the duplicate-suppression invariant only looks
//! at open jobs.

use serde::{Deserialize, Serialize};

use crate::error::{LuxmonError, ValidationError};
use crate::id::{JobId, SiteId};
use crate::rule::RuleKind;
use crate::time::Timestamp;

/// Lifecycle state of a [`Job`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum JobStatus {
    Open,
    InProgress,
    Resolved,
    Cancelled,
}

impl JobStatus {
    /// Stable string form used for persistence and display.
    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Open => "open",
            Self::InProgress => "in_progress",
            Self::Resolved => "resolved",
            Self::Cancelled => "cancelled",
        }
    }

    /// Whether the job still counts towards duplicate suppression.
    #[must_use]
    pub fn is_open(self) -> bool {
        matches!(self, Self::Open | Self::InProgress)
    }

    /// Whether the job has reached a final state.
    #[must_use]
    pub fn is_terminal(self) -> bool {
        matches!(self, Self::Resolved | Self::Cancelled)
    }
}

impl std::fmt::Display for JobStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Where a [`Job`] came from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum JobSource {
    /// Raised by the automation engine for the given rule.
    Automation { rule: RuleKind },
    /// Raised by an operator through the API.
    Manual,
}

/// A tracked work item for a site.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Job {
    pub id: JobId,
    pub site_id: SiteId,
    /// Human-facing label, e.g. `"No Communication"`.
    pub job_type: String,
    pub status: JobStatus,
    pub source: JobSource,
    pub created_at: Timestamp,
    /// Set when the job reaches a terminal status.
    pub resolved_at: Option<Timestamp>,
}

impl Job {
    /// Create a builder for constructing a [`Job`].
    #[must_use]
    pub fn builder() -> JobBuilder {
        JobBuilder::default()
    }

    /// Check domain invariants.
    ///
    /// # Errors
    ///
    /// Returns [`LuxmonError::Validation`] when `job_type` is empty
    /// ([`ValidationError::EmptyJobType`]).
    pub fn validate(&self) -> Result<(), LuxmonError> {
        if self.job_type.is_empty() {
            return Err(ValidationError::EmptyJobType.into());
        }
        Ok(())
    }

    /// Transition to a new status, stamping `resolved_at` on terminal
    /// transitions and clearing it when a job is reopened.
    pub fn set_status(&mut self, status: JobStatus, at: Timestamp) {
        self.resolved_at = if status.is_terminal() { Some(at) } else { None };
        self.status = status;
    }
}

/// Step-by-step builder for [`Job`].
#[derive(Debug, Default)]
pub struct JobBuilder {
    id: Option<JobId>,
    site_id: Option<SiteId>,
    job_type: Option<String>,
    status: Option<JobStatus>,
    source: Option<JobSource>,
    created_at: Option<Timestamp>,
}

impl JobBuilder {
    #[must_use]
    pub fn id(mut self, id: JobId) -> Self {
        self.id = Some(id);
        self
    }

    #[must_use]
    pub fn site_id(mut self, site_id: SiteId) -> Self {
        self.site_id = Some(site_id);
        self
    }

    #[must_use]
    pub fn job_type(mut self, job_type: impl Into<String>) -> Self {
        self.job_type = Some(job_type.into());
        self
    }

    #[must_use]
    pub fn status(mut self, status: JobStatus) -> Self {
        self.status = Some(status);
        self
    }

    #[must_use]
    pub fn source(mut self, source: JobSource) -> Self {
        self.source = Some(source);
        self
    }

    #[must_use]
    pub fn created_at(mut self, created_at: Timestamp) -> Self {
        self.created_at = Some(created_at);
        self
    }

    /// Consume the builder, validate, and return a [`Job`].
    ///
    /// # Errors
    ///
    /// Returns [`LuxmonError::Validation`] if required fields are missing or empty.
    pub fn build(self) -> Result<Job, LuxmonError> {
        let job = Job {
            id: self.id.unwrap_or_default(),
            site_id: self.site_id.unwrap_or_default(),
            job_type: self.job_type.unwrap_or_default(),
            status: self.status.unwrap_or(JobStatus::Open),
            source: self.source.unwrap_or(JobSource::Manual),
            created_at: self.created_at.unwrap_or_else(crate::time::now),
            resolved_at: None,
        };
        job.validate()?;
        Ok(job)
    }
}
