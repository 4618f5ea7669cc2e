//! Moon phase age and illuminated fraction.

use chrono::{NaiveDate, NaiveTime, TimeZone, Utc};
use std::f64::consts::PI;

use super::sun::julian_day;
use crate::constants::SYNODIC_MONTH_DAYS;

/// Mean length of the synodic month used for phase age, days.
const MEAN_LUNATION_DAYS: f64 = 29.530588861;
/// Julian day of the new moon of 2000-01-06 18:14 UTC.
const REFERENCE_NEW_MOON_JD: f64 = 2_451_550.09766;

/// Provides the moon's phase age for a calendar date.
#[cfg_attr(test, mockall::automock)]
pub trait LunarPhase {
    /// Days since the last new moon, in `[0, 29.53)`.
    fn phase_age(&self, date: NaiveDate) -> f64;
}

/// Phase age from the mean lunation, evaluated at 00:00 UTC.
///
/// Ignores the lunar orbit's eccentricity, so it can be off by up to about
/// half a day against a true new moon.
#[derive(Debug, Default, Clone, Copy)]
pub struct MeanLunation;

impl LunarPhase for MeanLunation {
    fn phase_age(&self, date: NaiveDate) -> f64 {
        let midnight = Utc.from_utc_datetime(&date.and_time(NaiveTime::MIN));
        (julian_day(midnight) - REFERENCE_NEW_MOON_JD).rem_euclid(MEAN_LUNATION_DAYS)
    }
}

/// Illuminated fraction for a phase age: 0 at new moon, 1 at full moon.
///
/// # Examples
/// ```
/// use bigring::astro::lunar::illuminated_fraction;
/// assert_eq!(illuminated_fraction(0.0), 0.0);
/// assert!((illuminated_fraction(29.530588 / 2.0) - 1.0).abs() < 1e-12);
/// ```
pub fn illuminated_fraction(age_days: f64) -> f64 {
    let fraction = (1.0 - (2.0 * PI * age_days / SYNODIC_MONTH_DAYS).cos()) / 2.0;
    fraction.clamp(0.0, 1.0)
}
