//! Low-precision solar coordinates (NOAA solar calculator formulation).
//!
//! Accurate to roughly 0.01° in elevation and 10⁻⁵ AU in distance for dates
//! within a few centuries of J2000, which is far below what day ranking needs.

use chrono::{DateTime, NaiveDate, NaiveTime, TimeZone, Timelike, Utc};
use std::f64::consts::PI;

const DEG: f64 = PI / 180.0;
const UNIX_EPOCH_JD: f64 = 2_440_587.5;
const J2000_JD: f64 = 2_451_545.0;

/// Sun coordinates at one instant.
#[derive(Debug, Clone, Copy)]
pub struct SunPosition {
    /// Declination in degrees.
    pub declination: f64,
    /// Equation of time in minutes.
    pub equation_of_time: f64,
    /// Earth–Sun distance in astronomical units.
    pub radius_vector_au: f64,
}

/// Julian day of a UTC instant.
pub fn julian_day(instant: DateTime<Utc>) -> f64 {
    let seconds = instant.timestamp() as f64 + instant.timestamp_subsec_nanos() as f64 * 1e-9;
    seconds / 86_400.0 + UNIX_EPOCH_JD
}

/// Julian centuries since J2000.
pub fn julian_century(jd: f64) -> f64 {
    (jd - J2000_JD) / 36_525.0
}

fn normalize_degrees(deg: f64) -> f64 {
    deg.rem_euclid(360.0)
}

impl SunPosition {
    pub fn at(instant: DateTime<Utc>) -> Self {
        let t = julian_century(julian_day(instant));

        let mean_longitude = normalize_degrees(280.46646 + t * (36000.76983 + t * 0.0003032));
        let mean_anomaly = 357.52911 + t * (35999.05029 - 0.0001537 * t);
        let eccentricity = 0.016708634 - t * (0.000042037 + 0.0000001267 * t);

        let m = mean_anomaly * DEG;
        let equation_of_center = m.sin() * (1.914602 - t * (0.004817 + 0.000014 * t))
            + (2.0 * m).sin() * (0.019993 - 0.000101 * t)
            + (3.0 * m).sin() * 0.000289;

        let true_longitude = mean_longitude + equation_of_center;
        let true_anomaly = (mean_anomaly + equation_of_center) * DEG;
        let radius_vector_au = 1.000001018 * (1.0 - eccentricity * eccentricity)
            / (1.0 + eccentricity * true_anomaly.cos());

        let omega = (125.04 - 1934.136 * t) * DEG;
        let apparent_longitude = (true_longitude - 0.00569 - 0.00478 * omega.sin()) * DEG;

        let mean_obliquity =
            23.0 + (26.0 + (21.448 - t * (46.815 + t * (0.00059 - t * 0.001813))) / 60.0) / 60.0;
        let obliquity = (mean_obliquity + 0.00256 * omega.cos()) * DEG;

        let declination = (obliquity.sin() * apparent_longitude.sin()).asin() / DEG;

        let y = (obliquity / 2.0).tan().powi(2);
        let l0 = mean_longitude * DEG;
        let equation_of_time = 4.0
            * (y * (2.0 * l0).sin() - 2.0 * eccentricity * m.sin()
                + 4.0 * eccentricity * y * m.sin() * (2.0 * l0).cos()
                - 0.5 * y * y * (4.0 * l0).sin()
                - 1.25 * eccentricity * eccentricity * (2.0 * m).sin())
            / DEG;

        Self {
            declination,
            equation_of_time,
            radius_vector_au,
        }
    }
}

/// Atmospheric refraction correction in degrees for a true elevation.
fn refraction_correction(elevation: f64) -> f64 {
    if elevation > 85.0 {
        return 0.0;
    }

    let te = (elevation * DEG).tan();
    let arcseconds = if elevation > 5.0 {
        58.1 / te - 0.07 / te.powi(3) + 0.000086 / te.powi(5)
    } else if elevation > -0.575 {
        1735.0
            + elevation * (-518.2 + elevation * (103.4 + elevation * (-12.79 + elevation * 0.711)))
    } else {
        -20.772 / te
    };

    arcseconds / 3600.0
}

/// Apparent solar elevation in degrees, refraction included.
pub fn solar_elevation(latitude: f64, longitude: f64, instant: DateTime<Utc>) -> f64 {
    let elevation = geometric_elevation(latitude, longitude, instant);
    elevation + refraction_correction(elevation)
}

/// Solar elevation of the sun's center in degrees, without refraction.
pub fn geometric_elevation(latitude: f64, longitude: f64, instant: DateTime<Utc>) -> f64 {
    let sun = SunPosition::at(instant);

    let minutes = instant.hour() as f64 * 60.0
        + instant.minute() as f64
        + instant.second() as f64 / 60.0;
    let true_solar_time = (minutes + sun.equation_of_time + 4.0 * longitude).rem_euclid(1440.0);
    let hour_angle = true_solar_time / 4.0 - 180.0;

    let lat = latitude * DEG;
    let dec = sun.declination * DEG;
    let cos_zenith =
        (lat.sin() * dec.sin() + lat.cos() * dec.cos() * (hour_angle * DEG).cos()).clamp(-1.0, 1.0);
    90.0 - cos_zenith.acos() / DEG
}

/// Whether the sun crosses `elevation` on `date` at this place.
///
/// Evaluated at local solar noon. Near the poles the hour-angle equation has
/// no solution: the sun stays above (white night) or below the elevation.
pub fn crosses_elevation(latitude: f64, longitude: f64, date: NaiveDate, elevation: f64) -> bool {
    let noon = Utc.from_utc_datetime(&date.and_time(NaiveTime::MIN))
        + chrono::Duration::seconds(((12.0 - longitude / 15.0) * 3600.0) as i64);
    let dec = SunPosition::at(noon).declination * DEG;
    let lat = latitude * DEG;

    let denominator = lat.cos() * dec.cos();
    if denominator.abs() < 1e-12 {
        return false;
    }

    let cos_hour_angle = ((elevation * DEG).sin() - lat.sin() * dec.sin()) / denominator;
    (-1.0..=1.0).contains(&cos_hour_angle)
}
