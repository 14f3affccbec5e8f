//! Event — an immutable record of something that happened.
//!
//! Events are produced when sites are created, readings arrive, jobs are
//! raised or change status, and when an automation sweep completes.

use serde::{Deserialize, Serialize};

use crate::id::{EventId, SiteId};
use crate::time::Timestamp;

/// The kind of occurrence an [`Event`] records.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum EventType {
    SiteCreated,
    ReadingRecorded,
    JobCreated,
    JobStatusChanged,
    SweepCompleted,
}

impl EventType {
    /// Stable string form used for persistence.
    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            Self::SiteCreated => "site_created",
            Self::ReadingRecorded => "reading_recorded",
            Self::JobCreated => "job_created",
            Self::JobStatusChanged => "job_status_changed",
            Self::SweepCompleted => "sweep_completed",
        }
    }
}

impl std::fmt::Display for EventType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// An append-only record of a domain occurrence.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Event {
    pub id: EventId,
    pub event_type: EventType,
    /// The site the event concerns, if any.
    pub site_id: Option<SiteId>,
    pub timestamp: Timestamp,
    /// Free-form payload; shape depends on `event_type`.
    pub data: serde_json::Value,
}

impl Event {
    /// Create a new event stamped with the current time.
    #[must_use]
    pub fn new(event_type: EventType, site_id: Option<SiteId>, data: serde_json::Value) -> Self {
        Self {
            id: EventId::new(),
            event_type,
            site_id,
            timestamp: crate::time::now(),
            data,
        }
    }
}
