//! Integration port — external sources of sites and readings.

use std::future::Future;

use luxmon_domain::error::LuxmonError;
use luxmon_domain::reading::Reading;
use luxmon_domain::site::Site;

/// A site discovered by an integration, together with the readings it has
/// already accumulated.
#[derive(Debug, Clone)]
pub struct DiscoveredSite {
    pub site: Site,
    pub readings: Vec<Reading>,
}

/// An external source of monitored sites (a metering backend, a demo
/// simulator, …).
pub trait MeterIntegration {
    /// A short, stable name for logging (`"simulator"`, …).
    fn name(&self) -> &'static str;

    /// Initialise the integration and return everything it knows about.
    fn setup(
        &mut self,
    ) -> impl Future<Output = Result<Vec<DiscoveredSite>, LuxmonError>> + Send;

    /// Release any resources held by the integration.
    fn teardown(&mut self) -> impl Future<Output = Result<(), LuxmonError>> + Send;
}
