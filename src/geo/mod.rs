//! Geographic location resolution and sun event calculations.
//!
//! This module provides functionality for:
//! - City name lookup against an offline city database
//! - Timezone detection from coordinates
//! - Sunset and civil dusk times for a location and date
//! - Solar elevation at an arbitrary instant

pub mod geocoder;
pub mod solar;
pub mod timezone;

pub use geocoder::{CityDatabase, GeoPoint, Geocoder};
pub use solar::{Almanac, SolarAlmanac, SunEvents};
pub use timezone::{BoundaryTimezones, TimezoneResolver};

use chrono_tz::Tz;

use crate::error::PlanError;
use crate::logger::Log;

/// Which half of the globe a location is in; selects the seasonal temperature table.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Hemisphere {
    Northern,
    Southern,
}

/// A resolved place: immutable once built.
#[derive(Debug, Clone, PartialEq)]
pub struct Location {
    pub name: String,
    pub latitude: f64,
    pub longitude: f64,
    pub timezone: Tz,
}

impl Location {
    /// Build a location, rejecting out-of-range coordinates.
    pub fn new(
        name: impl Into<String>,
        latitude: f64,
        longitude: f64,
        timezone: Tz,
    ) -> Result<Self, PlanError> {
        if !(-90.0..=90.0).contains(&latitude) || !(-180.0..=180.0).contains(&longitude) {
            return Err(PlanError::InvalidCoordinates {
                latitude,
                longitude,
            });
        }

        Ok(Self {
            name: name.into(),
            latitude,
            longitude,
            timezone,
        })
    }

    /// Latitudes strictly above the equator are northern; the equator itself
    /// uses the southern table.
    pub fn hemisphere(&self) -> Hemisphere {
        if self.latitude > 0.0 {
            Hemisphere::Northern
        } else {
            Hemisphere::Southern
        }
    }
}

/// Resolve a city name to a [`Location`] with its timezone.
///
/// An unknown timezone falls back to UTC with a warning; sun events are still
/// computed correctly, only the displayed clock times shift.
pub fn resolve_location(
    geocoder: &dyn Geocoder,
    timezones: &dyn TimezoneResolver,
    city_name: &str,
) -> Result<Location, PlanError> {
    let trimmed = city_name.trim();
    if trimmed.is_empty() {
        return Err(PlanError::LocationNotFound(city_name.to_string()));
    }

    let point = geocoder
        .resolve(trimmed)
        .ok_or_else(|| PlanError::LocationNotFound(trimmed.to_string()))?;

    let timezone = match timezones.lookup(point.latitude, point.longitude) {
        Some(tz) => tz,
        None => {
            Log::log_warning(&format!(
                "No timezone found for {}, using UTC",
                crate::utils::format_coordinates(point.latitude, point.longitude)
            ));
            Tz::UTC
        }
    };

    let name = point.name.unwrap_or_else(|| trimmed.to_string());
    Location::new(name, point.latitude, point.longitude, timezone)
}
