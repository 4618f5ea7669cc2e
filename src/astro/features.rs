//! Per-day astronomical features.

use chrono::{NaiveDate, NaiveTime, TimeZone, Utc};

use super::ephemeris::Ephemeris;
use super::lunar::{LunarPhase, illuminated_fraction};
use crate::error::DaySkip;
use crate::geo::{Almanac, Location};

/// Astronomical features of one usable day.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct AstronomicalDayRecord {
    pub date: NaiveDate,
    pub civil_twilight_minutes: f64,
    pub moon_illumination: f64,
    pub sun_earth_distance_km: f64,
}

/// The collaborators a day's features are computed from.
#[derive(Clone, Copy)]
pub struct AstroSources<'a> {
    pub almanac: &'a dyn Almanac,
    pub lunar: &'a dyn LunarPhase,
    pub ephemeris: &'a dyn Ephemeris,
}

/// Compute the features of `date` at `location`.
///
/// The day is skipped when sunset or civil dusk is undefined, or when the
/// almanac reports dusk before sunset.
pub fn compute_day(
    sources: &AstroSources<'_>,
    location: &Location,
    date: NaiveDate,
) -> Result<AstronomicalDayRecord, DaySkip> {
    let events = sources
        .almanac
        .sun_events(location, date)
        .ok_or(DaySkip::PolarDayNight)?;

    let civil_twilight_minutes = events.civil_twilight_minutes();
    if civil_twilight_minutes < 0.0 {
        return Err(DaySkip::NegativeTwilight);
    }

    let midnight = Utc.from_utc_datetime(&date.and_time(NaiveTime::MIN));

    Ok(AstronomicalDayRecord {
        date,
        civil_twilight_minutes,
        moon_illumination: illuminated_fraction(sources.lunar.phase_age(date)),
        sun_earth_distance_km: sources.ephemeris.earth_sun_distance_km(midnight),
    })
}
