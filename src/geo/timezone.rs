//! Timezone detection from coordinates.
//!
//! Uses the tzf-rs crate for timezone detection based on geographic boundaries.

use chrono_tz::Tz;
use std::sync::OnceLock;
use tzf_rs::DefaultFinder;

/// Maps coordinates to an IANA timezone.
#[cfg_attr(test, mockall::automock)]
pub trait TimezoneResolver {
    /// `None` when the coordinates have no known timezone.
    fn lookup(&self, latitude: f64, longitude: f64) -> Option<Tz>;
}

/// Timezone resolver backed by tzf-rs boundary data.
#[derive(Debug, Default, Clone, Copy)]
pub struct BoundaryTimezones;

impl TimezoneResolver for BoundaryTimezones {
    fn lookup(&self, latitude: f64, longitude: f64) -> Option<Tz> {
        determine_timezone_from_coordinates(latitude, longitude)
    }
}

/// Determine the timezone for given coordinates using timezone boundary data.
pub fn determine_timezone_from_coordinates(latitude: f64, longitude: f64) -> Option<Tz> {
    // The finder is expensive to build; share one per process
    static FINDER: OnceLock<DefaultFinder> = OnceLock::new();
    let finder = FINDER.get_or_init(DefaultFinder::new);

    // Note: tzf-rs uses (longitude, latitude) order
    let tz_name = finder.get_tz_name(longitude, latitude);
    if tz_name.is_empty() {
        return None;
    }

    tz_name.parse::<Tz>().ok()
}
