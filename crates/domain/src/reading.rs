//! Reading — an immutable timestamped generation measurement.
//!
//! A reading records how much a site generated over its reporting period,
//! in kWh. Readings are append-only: once recorded they are never updated.

use serde::{Deserialize, Serialize};

use crate::error::{LuxmonError, ValidationError};
use crate::id::{ReadingId, SiteId};
use crate::time::Timestamp;

/// A single generation measurement for a site.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Reading {
    pub id: ReadingId,
    pub site_id: SiteId,
    /// Energy generated in the reporting period, in kWh.
    pub value: f64,
    pub recorded_at: Timestamp,
}

impl Reading {
    /// Create a builder for constructing a [`Reading`].
    #[must_use]
    pub fn builder() -> ReadingBuilder {
        ReadingBuilder::default()
    }

    /// Check domain invariants.
    ///
    /// # Errors
    ///
    /// Returns [`LuxmonError::Validation`] when `value` is negative, NaN,
    /// or infinite ([`ValidationError::InvalidReadingValue`]).
    pub fn validate(&self) -> Result<(), LuxmonError> {
        if !self.value.is_finite() || self.value < 0.0 {
            return Err(ValidationError::InvalidReadingValue.into());
        }
        Ok(())
    }

    /// Whether this reading reports zero generation.
    #[must_use]
    pub fn is_zero(&self) -> bool {
        self.value == 0.0
    }
}

/// Step-by-step builder for [`Reading`].
#[derive(Debug, Default)]
pub struct ReadingBuilder {
    id: Option<ReadingId>,
    site_id: Option<SiteId>,
    value: Option<f64>,
    recorded_at: Option<Timestamp>,
}

impl ReadingBuilder {
    #[must_use]
    pub fn id(mut self, id: ReadingId) -> Self {
        self.id = Some(id);
        self
    }

    #[must_use]
    pub fn site_id(mut self, site_id: SiteId) -> Self {
        self.site_id = Some(site_id);
        self
    }

    #[must_use]
    pub fn value(mut self, value: f64) -> Self {
        self.value = Some(value);
        self
    }

    #[must_use]
    pub fn recorded_at(mut self, recorded_at: Timestamp) -> Self {
        self.recorded_at = Some(recorded_at);
        self
    }

    /// Consume the builder, validate, and return a [`Reading`].
    ///
    /// # Errors
    ///
    /// Returns [`LuxmonError::Validation`] if the value is invalid.
    pub fn build(self) -> Result<Reading, LuxmonError> {
        let reading = Reading {
            id: self.id.unwrap_or_default(),
            site_id: self.site_id.unwrap_or_default(),
            value: self.value.unwrap_or_default(),
            recorded_at: self.recorded_at.unwrap_or_else(crate::time::now),
        };
        reading.validate()?;
        Ok(reading)
    }
}
