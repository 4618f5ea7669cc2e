//! Day scoring and ranking.
//!
//! Astronomical features are normalized across the window and blended into a
//! twilight score. Each day's climatology bucket gives a weather score and a
//! vibe. The final romance score mixes the two and orders the window.

pub mod normalize;
pub mod vibe;
pub mod weather;

pub use vibe::Vibe;
pub use weather::{VibeThresholds, WeatherBreakdown, ideal_temperature, score_day};

use chrono::{Datelike, NaiveDate};

use crate::astro::AstronomicalDayRecord;
use crate::climate::{ClimatologyDayRecord, ClimatologyTable, MonthlyClimatology};
use crate::constants::{
    MOON_DARKNESS_WEIGHT, ROMANCE_SCORE_DECIMALS, ROMANCE_TWILIGHT_WEIGHT,
    ROMANCE_WEATHER_WEIGHT, SUN_DISTANCE_WEIGHT, TWILIGHT_DURATION_WEIGHT,
};
use crate::geo::Hemisphere;
use crate::utils::round_to;

/// A window day with all of its scores.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ScoredDay {
    pub date: NaiveDate,
    pub twilight_score: f64,
    pub weather_score: f64,
    pub vibe: Vibe,
    pub romance_score: f64,
    /// False when the day's climatology bucket was missing.
    pub has_weather: bool,
}

/// Twilight composite of each record, in input order.
///
/// Long twilight and a dark moon dominate; the Earth–Sun distance only
/// separates otherwise similar days.
pub fn twilight_scores(records: &[AstronomicalDayRecord]) -> Vec<f64> {
    let column = |feature: fn(&AstronomicalDayRecord) -> f64| {
        normalize::min_max(&records.iter().map(feature).collect::<Vec<_>>())
    };

    let duration = column(|r| r.civil_twilight_minutes);
    let illumination = column(|r| r.moon_illumination);
    let distance = column(|r| r.sun_earth_distance_km);

    (0..records.len())
        .map(|i| {
            TWILIGHT_DURATION_WEIGHT * duration[i]
                + MOON_DARKNESS_WEIGHT * (1.0 - illumination[i])
                + SUN_DISTANCE_WEIGHT * distance[i]
        })
        .collect()
}

/// `0.6 * twilight + 0.4 * weather`, rounded to four decimals.
pub fn romance_score(twilight_score: f64, weather_score: f64) -> f64 {
    round_to(
        ROMANCE_TWILIGHT_WEIGHT * twilight_score + ROMANCE_WEATHER_WEIGHT * weather_score,
        ROMANCE_SCORE_DECIMALS,
    )
}

/// Score every window day, in date order.
///
/// A day without a climatology bucket gets weather score 0 and the Earth vibe.
pub fn score_window(
    records: &[AstronomicalDayRecord],
    climatology: &ClimatologyTable,
    hemisphere: Hemisphere,
    thresholds: &VibeThresholds,
) -> Vec<ScoredDay> {
    let twilight = twilight_scores(records);

    records
        .iter()
        .zip(twilight)
        .map(|(record, twilight_score)| {
            let weather = climatology.lookup(record.date).map(|bucket| {
                score_day(
                    bucket,
                    ideal_temperature(record.date.month(), hemisphere),
                    thresholds,
                )
            });
            let (weather_score, vibe) = weather.unwrap_or((0.0, Vibe::Earth));

            ScoredDay {
                date: record.date,
                twilight_score,
                weather_score,
                vibe,
                romance_score: romance_score(twilight_score, weather_score),
                has_weather: weather.is_some(),
            }
        })
        .collect()
}

/// Sort by romance score, best first; equal scores keep the earlier date first.
pub fn order_by_score(mut days: Vec<ScoredDay>) -> Vec<ScoredDay> {
    days.sort_by(|a, b| {
        b.romance_score
            .total_cmp(&a.romance_score)
            .then_with(|| a.date.cmp(&b.date))
    });
    days
}

/// Score and order a window.
pub fn rank(
    records: &[AstronomicalDayRecord],
    climatology: &ClimatologyTable,
    hemisphere: Hemisphere,
    thresholds: &VibeThresholds,
) -> Vec<ScoredDay> {
    order_by_score(score_window(records, climatology, hemisphere, thresholds))
}

/// The first `n` entries of an ordered list.
pub fn top_n<T: Clone>(ranked: &[T], n: usize) -> Vec<T> {
    ranked.iter().take(n).cloned().collect()
}

/// A day-of-month bucket ranked by weather alone.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct WeatherDay {
    pub date: NaiveDate,
    pub record: ClimatologyDayRecord,
    pub breakdown: WeatherBreakdown,
    pub vibe: Vibe,
}

/// Order the buckets of one month by weather score, best first.
pub fn rank_by_weather(
    climatology: &MonthlyClimatology,
    hemisphere: Hemisphere,
    thresholds: &VibeThresholds,
) -> Vec<WeatherDay> {
    let ideal = ideal_temperature(climatology.month, hemisphere);

    let mut days: Vec<WeatherDay> = climatology
        .days
        .values()
        .filter_map(|record| {
            let date =
                NaiveDate::from_ymd_opt(climatology.year, climatology.month, record.day_of_month)?;
            let breakdown = WeatherBreakdown::from_record(record, ideal);
            Some(WeatherDay {
                date,
                record: *record,
                breakdown,
                vibe: breakdown.vibe(thresholds),
            })
        })
        .collect();

    days.sort_by(|a, b| {
        b.breakdown
            .score
            .total_cmp(&a.breakdown.score)
            .then_with(|| a.date.cmp(&b.date))
    });
    days
}
