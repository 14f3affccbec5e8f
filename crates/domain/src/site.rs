//! Site — an installation that produces periodic generation readings.

use serde::{Deserialize, Serialize};

use crate::error::{LuxmonError, ValidationError};
use crate::id::SiteId;
use crate::time::Timestamp;

/// A monitored generation site.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Site {
    pub id: SiteId,
    pub name: String,
    /// Free-form geographic grouping (e.g. `"Yorkshire"`).
    pub region: Option<String>,
    pub created_at: Timestamp,
}

impl Site {
    /// Create a builder for constructing a [`Site`].
    #[must_use]
    pub fn builder() -> SiteBuilder {
        SiteBuilder::default()
    }

    /// Check domain invariants.
    ///
    /// # Errors
    ///
    /// Returns [`LuxmonError::Validation`] when `name` is empty
    /// ([`ValidationError::EmptyName`]).
    pub fn validate(&self) -> Result<(), LuxmonError> {
        if self.name.is_empty() {
            return Err(ValidationError::EmptyName.into());
        }
        Ok(())
    }
}

/// Step-by-step builder for [`Site`].
#[derive(Debug, Default)]
pub struct SiteBuilder {
    id: Option<SiteId>,
    name: Option<String>,
    region: Option<String>,
    created_at: Option<Timestamp>,
}

impl SiteBuilder {
    #[must_use]
    pub fn id(mut self, id: SiteId) -> Self {
        self.id = Some(id);
        self
    }

    #[must_use]
    pub fn name(mut self, name: impl Into<String>) -> Self {
        self.name = Some(name.into());
        self
    }

    #[must_use]
    pub fn region(mut self, region: impl Into<String>) -> Self {
        self.region = Some(region.into());
        self
    }

    #[must_use]
    pub fn created_at(mut self, created_at: Timestamp) -> Self {
        self.created_at = Some(created_at);
        self
    }

    /// Consume the builder, validate, and return a [`Site`].
    ///
    /// # Errors
    ///
    /// Returns [`LuxmonError::Validation`] if required fields are missing or empty.
    pub fn build(self) -> Result<Site, LuxmonError> {
        let site = Site {
            id: self.id.unwrap_or_default(),
            name: self.name.unwrap_or_default(),
            region: self.region,
            created_at: self.created_at.unwrap_or_else(crate::time::now),
        };
        site.validate()?;
        Ok(site)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn should_build_valid_site_when_name_provided() {
        let site = Site::builder().name("Rooftop Array 12").build().unwrap();
        assert_eq!(site.name, "Rooftop Array 12");
        assert!(site.region.is_none());
    }

    #[test]
    fn should_return_validation_error_when_name_is_empty() {
        let result = Site::builder().build();
        assert!(matches!(
            result,
            Err(LuxmonError::Validation(ValidationError::EmptyName))
        ));
    }

    #[test]
    fn should_set_custom_id_and_region_via_builder() {
        let id = SiteId::new();
        let site = Site::builder()
            .id(id)
            .name("Farm A")
            .region("Yorkshire")
            .build()
            .unwrap();
        assert_eq!(site.id, id);
        assert_eq!(site.region.as_deref(), Some("Yorkshire"));
    }

    #[test]
    fn should_set_created_at_via_builder() {
        let ts = crate::time::now();
        let site = Site::builder()
            .name("Farm B")
            .created_at(ts)
            .build()
            .unwrap();
        assert_eq!(site.created_at, ts);
    }

    #[test]
    fn should_roundtrip_site_through_serde_json() {
        let site = Site::builder()
            .name("Roundtrip")
            .region("North")
            .build()
            .unwrap();
        let json = serde_json::to_string(&site).unwrap();
        let parsed: Site = serde_json::from_str(&json).unwrap();
        assert_eq!(parsed.id, site.id);
        assert_eq!(parsed.name, site.name);
        assert_eq!(parsed.region, site.region);
    }
}
