//! Simulated site profiles and their generated reading histories.

use chrono::Duration;

use luxmon_app::ports::DiscoveredSite;
use luxmon_domain::id::SiteId;
use luxmon_domain::reading::Reading;
use luxmon_domain::site::Site;
use luxmon_domain::time::Timestamp;

/// Daily generation figures cycled through by the healthy profile, in kWh.
const HEALTHY_VALUES: [f64; 7] = [3.4, 4.1, 2.8, 5.0, 4.6, 3.9, 4.4];

/// How a simulated site behaves.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Profile {
    /// Reports a positive reading every day.
    Healthy,
    /// Stopped reporting days ago — trips the no-communication rule.
    Silent,
    /// Keeps reporting, but every recent reading is zero — trips the
    /// zero-generation rule.
    Flatlined,
}

/// A single simulated site.
#[derive(Debug)]
pub struct SimulatedSite {
    profile: Profile,
    site_id: SiteId,
}

impl SimulatedSite {
    /// Create a simulated site with the given profile.
    #[must_use]
    pub fn new(profile: Profile) -> Self {
        Self {
            profile,
            site_id: SiteId::new(),
        }
    }

    /// The site identifier this profile reports under.
    #[must_use]
    pub fn site_id(&self) -> SiteId {
        self.site_id
    }

    /// Produce the site descriptor and its reading history as of `at`.
    #[must_use]
    pub fn discover(&self, at: Timestamp) -> DiscoveredSite {
        let (name, region) = match self.profile {
            Profile::Healthy => ("Simulated Healthy Site", "Demo North"),
            Profile::Silent => ("Simulated Silent Site", "Demo South"),
            Profile::Flatlined => ("Simulated Flatlined Site", "Demo East"),
        };

        let site = Site {
            id: self.site_id,
            name: name.to_string(),
            region: Some(region.to_string()),
            created_at: at - Duration::days(30),
        };

        DiscoveredSite {
            readings: self.readings(at),
            site,
        }
    }

    /// Deterministic reading history for this profile.
    fn readings(&self, at: Timestamp) -> Vec<Reading> {
        let days: Vec<(i64, f64)> = match self.profile {
            // One positive reading per day for the last week.
            Profile::Healthy => (1..=7)
                .map(|day| {
                    let value = HEALTHY_VALUES[usize::try_from(day - 1).unwrap_or(0)];
                    (day, value)
                })
                .collect(),
            // Last reading is comfortably older than the default
            // no-communication threshold.
            Profile::Silent => vec![(5, 4.2), (6, 3.7), (7, 4.8)],
            // Recent zeros preceded by a healthy tail.
            Profile::Flatlined => vec![(1, 0.0), (2, 0.0), (3, 0.0), (5, 3.1), (6, 4.0)],
        };

        days.into_iter()
            .map(|(day, value)| {
                Reading::builder()
                    .site_id(self.site_id)
                    .value(value)
                    .recorded_at(at - Duration::days(day))
                    .build()
                    .expect("simulated readings are always valid")
            })
            .collect()
    }
}
