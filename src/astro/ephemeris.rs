//! Earth–Sun distance source.

use chrono::{DateTime, Utc};
use std::sync::OnceLock;

use super::sun::SunPosition;
use crate::constants::ASTRONOMICAL_UNIT_KM;

/// Provides the Earth–Sun separation at an instant.
#[cfg_attr(test, mockall::automock)]
pub trait Ephemeris {
    fn earth_sun_distance_km(&self, instant: DateTime<Utc>) -> f64;
}

/// Analytic solar orbit, no data files to load.
#[derive(Debug, Default)]
pub struct AnalyticEphemeris;

impl AnalyticEphemeris {
    /// Process-wide instance.
    pub fn shared() -> &'static AnalyticEphemeris {
        static EPHEMERIS: OnceLock<AnalyticEphemeris> = OnceLock::new();
        EPHEMERIS.get_or_init(AnalyticEphemeris::default)
    }
}

impl Ephemeris for AnalyticEphemeris {
    fn earth_sun_distance_km(&self, instant: DateTime<Utc>) -> f64 {
        SunPosition::at(instant).radius_vector_au * ASTRONOMICAL_UNIT_KM
    }
}
