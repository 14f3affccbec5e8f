//! Automation rules — anomaly detectors over a site's reading history.
//!
//! Two rules exist: [`NoComsRule`] fires when a site has gone quiet, and
//! [`ZeroReadsRule`] fires when a site keeps reporting but generates
//! nothing. Both carry their tunable parameters and evaluate purely over
//! data handed to them — fetching the data is the application layer's job.

use chrono::Duration;
use serde::{Deserialize, Serialize};

use crate::error::{LuxmonError, ValidationError};
use crate::reading::Reading;
use crate::time::Timestamp;

/// Identifies which detector a rule or job came from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RuleKind {
    NoComs,
    ZeroReads,
}

impl RuleKind {
    /// Stable string form used for logging and persistence.
    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            Self::NoComs => "no_coms",
            Self::ZeroReads => "zero_reads",
        }
    }
}

impl std::fmt::Display for RuleKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Detects sites that have stopped communicating.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct NoComsRule {
    pub enabled: bool,
    /// No readings for this many days means the site has gone quiet.
    pub days_threshold: u32,
    /// Label given to jobs raised by this rule.
    pub job_type_name: String,
    /// Suppress a new job while one of the same type is still open.
    pub check_duplicate: bool,
}

impl Default for NoComsRule {
    fn default() -> Self {
        Self {
            enabled: true,
            days_threshold: 3,
            job_type_name: "No Communication".to_string(),
            check_duplicate: true,
        }
    }
}

impl NoComsRule {
    /// Check tunable-parameter invariants.
    ///
    /// # Errors
    ///
    /// Returns [`LuxmonError::Validation`] when the threshold is zero or the
    /// job type label is empty.
    pub fn validate(&self) -> Result<(), LuxmonError> {
        if self.days_threshold == 0 {
            return Err(ValidationError::ZeroThreshold("days_threshold").into());
        }
        if self.job_type_name.is_empty() {
            return Err(ValidationError::EmptyJobType.into());
        }
        Ok(())
    }

    /// Whether the no-communication condition holds at `at`.
    ///
    /// `last_reading_at` is the timestamp of the site's most recent reading,
    /// or `None` when the site has never reported — which counts as
    /// condition met.
    #[must_use]
    pub fn is_met(&self, last_reading_at: Option<Timestamp>, at: Timestamp) -> bool {
        if !self.enabled {
            return false;
        }
        let cutoff = at - Duration::days(i64::from(self.days_threshold));
        match last_reading_at {
            Some(recorded_at) => recorded_at < cutoff,
            None => true,
        }
    }
}

/// Detects sites that keep reporting but generate nothing.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ZeroReadsRule {
    pub enabled: bool,
    /// Only readings recorded within this many days are considered.
    pub days_to_check: u32,
    /// How many of the most recent readings must all be zero.
    pub readings_to_compare: usize,
    /// Label given to jobs raised by this rule.
    pub job_type_name: String,
    /// Suppress a new job while one of the same type is still open.
    pub check_duplicate: bool,
}

impl Default for ZeroReadsRule {
    fn default() -> Self {
        Self {
            enabled: true,
            days_to_check: 4,
            readings_to_compare: 3,
            job_type_name: "Zero Generation".to_string(),
            check_duplicate: true,
        }
    }
}

impl ZeroReadsRule {
    /// Check tunable-parameter invariants.
    ///
    /// # Errors
    ///
    /// Returns [`LuxmonError::Validation`] when a window or count is zero or
    /// the job type label is empty.
    pub fn validate(&self) -> Result<(), LuxmonError> {
        if self.days_to_check == 0 {
            return Err(ValidationError::ZeroThreshold("days_to_check").into());
        }
        if self.readings_to_compare == 0 {
            return Err(ValidationError::ZeroThreshold("readings_to_compare").into());
        }
        if self.job_type_name.is_empty() {
            return Err(ValidationError::EmptyJobType.into());
        }
        Ok(())
    }

    /// Whether the zero-generation condition holds at `at`.
    ///
    /// `readings` is the site's reading history in any order; only readings
    /// recorded within `days_to_check` days of `at` are considered. The
    /// condition is met when at least `readings_to_compare` readings fall in
    /// the window and the most recent `readings_to_compare` of them all
    /// report zero. Fewer readings than that is insufficient evidence, and
    /// the rule does not fire.
    #[must_use]
    pub fn is_met(&self, readings: &[Reading], at: Timestamp) -> bool {
        if !self.enabled {
            return false;
        }
        let cutoff = at - Duration::days(i64::from(self.days_to_check));
        let mut in_window: Vec<&Reading> = readings
            .iter()
            .filter(|r| (cutoff..=at).contains(&r.recorded_at))
            .collect();
        if in_window.len() < self.readings_to_compare {
            return false;
        }
        in_window.sort_by_key(|r| std::cmp::Reverse(r.recorded_at));
        in_window
            .iter()
            .take(self.readings_to_compare)
            .all(|r| r.is_zero())
    }
}

/// The full set of configured automation rules.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct RuleSet {
    pub no_coms: NoComsRule,
    pub zero_reads: ZeroReadsRule,
}

impl RuleSet {
    /// Check tunable-parameter invariants for every rule.
    ///
    /// # Errors
    ///
    /// Returns [`LuxmonError::Validation`] if any rule carries invalid
    /// parameters.
    pub fn validate(&self) -> Result<(), LuxmonError> {
        self.no_coms.validate()?;
        self.zero_reads.validate()?;
        Ok(())
    }
}
