//! Sunset and civil dusk times plus solar elevation for a location.
//!
//! Event times come from the `sunrise` crate. That crate always answers with a
//! timestamp, even where the sun never reaches the requested elevation, so the
//! hour-angle check in [`crate::astro::sun::crosses_elevation`] decides first
//! whether the event exists at all.

use chrono::{DateTime, Duration, NaiveDate, NaiveTime, TimeZone, Utc};
use chrono_tz::Tz;
use sunrise::{Coordinates, DawnType, SolarDay, SolarEvent};

use super::Location;
use crate::astro::sun;
use crate::constants::{CIVIL_DUSK_ELEVATION, SUNSET_ELEVATION};

/// Sunset and end of civil twilight on one day, in the location's timezone.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SunEvents {
    pub sunset: DateTime<Tz>,
    pub dusk: DateTime<Tz>,
}

impl SunEvents {
    /// Minutes from sunset to civil dusk. Negative only if the almanac is wrong.
    pub fn civil_twilight_minutes(&self) -> f64 {
        self.dusk.signed_duration_since(self.sunset).num_seconds() as f64 / 60.0
    }
}

/// Source of sun event times and solar elevation.
#[cfg_attr(test, mockall::automock)]
pub trait Almanac {
    /// `None` when sunset or civil dusk does not happen on `date`.
    fn sun_events(&self, location: &Location, date: NaiveDate) -> Option<SunEvents>;

    /// Apparent solar elevation in degrees.
    fn solar_elevation(&self, location: &Location, instant: DateTime<Utc>) -> f64;
}

/// Almanac computed locally from the observer's coordinates.
#[derive(Debug, Default, Clone, Copy)]
pub struct SolarAlmanac;

impl Almanac for SolarAlmanac {
    fn sun_events(&self, location: &Location, date: NaiveDate) -> Option<SunEvents> {
        let (latitude, longitude) = (location.latitude, location.longitude);

        // White nights and polar days/nights have no crossing to compute
        if !sun::crosses_elevation(latitude, longitude, date, SUNSET_ELEVATION)
            || !sun::crosses_elevation(latitude, longitude, date, CIVIL_DUSK_ELEVATION)
        {
            return None;
        }

        let coord = Coordinates::new(latitude, longitude)?;
        let solar_day = SolarDay::new(coord, date);

        let sunset_utc = solar_day.event_time(SolarEvent::Sunset);
        let dusk_utc = solar_day.event_time(SolarEvent::Dusk(DawnType::Civil));
        if !is_near_date(sunset_utc, date) || !is_near_date(dusk_utc, date) {
            return None;
        }

        Some(SunEvents {
            sunset: sunset_utc.with_timezone(&location.timezone),
            dusk: dusk_utc.with_timezone(&location.timezone),
        })
    }

    fn solar_elevation(&self, location: &Location, instant: DateTime<Utc>) -> f64 {
        sun::solar_elevation(location.latitude, location.longitude, instant)
    }
}

/// Reject the epoch-like instants produced when the event equation has no solution.
fn is_near_date(instant: DateTime<Utc>, date: NaiveDate) -> bool {
    let midnight = Utc.from_utc_datetime(&date.and_time(NaiveTime::MIN));
    let offset = instant.signed_duration_since(midnight);
    offset > -Duration::days(1) && offset < Duration::days(2)
}
