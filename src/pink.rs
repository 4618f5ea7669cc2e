//! Pink time: the part of civil twilight when the Belt of Venus is visible.
//!
//! The sun's elevation is sampled every minute from sunset to civil dusk. The
//! window runs from the first to the last sample inside the elevation band.

use chrono::{DateTime, Duration, NaiveDate, Utc};
use chrono_tz::Tz;

use crate::constants::{
    DEFAULT_PINK_MAX_ELEVATION, DEFAULT_PINK_MIN_ELEVATION, PINK_SCAN_STEP_MINUTES,
};
use crate::geo::{Almanac, Location};

/// Solar elevation band in degrees, bounds inclusive.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ElevationBand {
    pub min: f64,
    pub max: f64,
}

impl Default for ElevationBand {
    fn default() -> Self {
        Self {
            min: DEFAULT_PINK_MIN_ELEVATION,
            max: DEFAULT_PINK_MAX_ELEVATION,
        }
    }
}

impl ElevationBand {
    pub fn contains(&self, elevation: f64) -> bool {
        (self.min..=self.max).contains(&elevation)
    }
}

/// First and last in-band minute, in the location's timezone.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PinkWindow {
    pub start: DateTime<Tz>,
    pub end: DateTime<Tz>,
}

/// Find the pink window of `date`, or `None` when the sun never enters the band
/// between sunset and civil dusk (or those events do not happen).
pub fn find_pink_window(
    almanac: &dyn Almanac,
    location: &Location,
    date: NaiveDate,
    band: &ElevationBand,
) -> Option<PinkWindow> {
    let events = almanac.sun_events(location, date)?;
    let sunset = events.sunset.with_timezone(&Utc);
    let dusk = events.dusk.with_timezone(&Utc);

    let mut first: Option<DateTime<Utc>> = None;
    let mut last: Option<DateTime<Utc>> = None;

    let mut instant = sunset;
    while instant <= dusk {
        if band.contains(almanac.solar_elevation(location, instant)) {
            first.get_or_insert(instant);
            last = Some(instant);
        }
        instant += Duration::minutes(PINK_SCAN_STEP_MINUTES);
    }

    Some(PinkWindow {
        start: first?.with_timezone(&location.timezone),
        end: last?.with_timezone(&location.timezone),
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::geo::SunEvents;
    use crate::geo::solar::MockAlmanac;
    use chrono::{TimeZone, Timelike};

    fn location() -> Location {
        Location::new("London", 51.5, -0.13, Tz::Europe__London).unwrap()
    }

    /// Sunset at 19:00 UTC, dusk 36 minutes later, sun sinking 0.2° per minute from -0.9°.
    fn linear_almanac() -> MockAlmanac {
        let sunset = Utc.with_ymd_and_hms(2026, 4, 20, 19, 0, 0).unwrap();
        let mut almanac = MockAlmanac::new();
        almanac.expect_sun_events().returning(move |location, _| {
            Some(SunEvents {
                sunset: sunset.with_timezone(&location.timezone),
                dusk: (sunset + Duration::minutes(36)).with_timezone(&location.timezone),
            })
        });
        almanac.expect_solar_elevation().returning(move |_, instant| {
            let minutes = instant.signed_duration_since(sunset).num_minutes() as f64;
            -0.9 - 0.2 * minutes
        });
        almanac
    }

    #[test]
    fn test_window_spans_band() {
        let almanac = linear_almanac();
        let date = NaiveDate::from_ymd_opt(2026, 4, 20).unwrap();
        let window =
            find_pink_window(&almanac, &location(), date, &ElevationBand::default()).unwrap();

        // -1.1° after 1 minute, -3.9° after 15 minutes; BST is UTC+1
        assert_eq!((window.start.hour(), window.start.minute()), (20, 1));
        assert_eq!((window.end.hour(), window.end.minute()), (20, 15));
    }

    #[test]
    fn test_band_never_reached() {
        let almanac = linear_almanac();
        let date = NaiveDate::from_ymd_opt(2026, 4, 20).unwrap();
        let band = ElevationBand {
            min: -12.0,
            max: -10.0,
        };
        assert!(find_pink_window(&almanac, &location(), date, &band).is_none());
    }

    #[test]
    fn test_undefined_sun_events() {
        let mut almanac = MockAlmanac::new();
        almanac.expect_sun_events().returning(|_, _| None);
        almanac.expect_solar_elevation().never();
        let date = NaiveDate::from_ymd_opt(2026, 6, 21).unwrap();
        assert!(find_pink_window(&almanac, &location(), date, &ElevationBand::default()).is_none());
    }

    #[test]
    fn test_real_almanac_finds_pink_time() {
        let almanac = crate::geo::SolarAlmanac;
        let date = NaiveDate::from_ymd_opt(2026, 4, 20).unwrap();
        let window =
            find_pink_window(&almanac, &location(), date, &ElevationBand::default()).unwrap();
        assert!(window.start < window.end);
        let minutes = window.end.signed_duration_since(window.start).num_minutes();
        assert!((10..30).contains(&minutes), "pink time {} min", minutes);
    }
}
