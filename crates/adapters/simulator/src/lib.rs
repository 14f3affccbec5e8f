//! # luxmon-adapter-simulator
//!
//! Simulator integration that provides demo sites for testing and
//! demonstration purposes.
//!
//! ## Provided sites
//!
//! | Site | Behaviour |
//! |------|-----------|
//! | Simulated Healthy Site | Positive reading every day |
//! | Simulated Silent Site | No readings for days — trips `NO_COMS` |
//! | Simulated Flatlined Site | Recent readings all zero — trips `ZERO_READS` |
//!
//! ## Dependency rule
//!
//! Depends on `luxmon-app` (port traits) and `luxmon-domain` only.

mod sites;

use luxmon_app::ports::{DiscoveredSite, MeterIntegration};
use luxmon_domain::error::LuxmonError;
use luxmon_domain::time::now;

pub use sites::{Profile, SimulatedSite};

/// Simulator integration that creates demo sites.
pub struct SimulatorIntegration {
    sites: Vec<SimulatedSite>,
}

impl Default for SimulatorIntegration {
    fn default() -> Self {
        Self {
            sites: vec![
                SimulatedSite::new(Profile::Healthy),
                SimulatedSite::new(Profile::Silent),
                SimulatedSite::new(Profile::Flatlined),
            ],
        }
    }
}

impl MeterIntegration for SimulatorIntegration {
    fn name(&self) -> &'static str {
        "simulator"
    }

    async fn setup(&mut self) -> Result<Vec<DiscoveredSite>, LuxmonError> {
        let at = now();
        Ok(self.sites.iter().map(|s| s.discover(at)).collect())
    }

    async fn teardown(&mut self) -> Result<(), LuxmonError> {
        Ok(())
    }
}
