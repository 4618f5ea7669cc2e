//! Weather score and vibe of a climatology bucket.
//!
//! The score is a weighted sum of five terms on a 0..1 scale plus a small
//! ozone color bonus. Each penalty multiplier is an independent term, so one
//! bad factor lowers the score without collapsing it.

use super::vibe::Vibe;
use crate::climate::ClimatologyDayRecord;
use crate::constants::*;
use crate::geo::Hemisphere;

/// Comfortable maximum temperature for the season, °C.
pub fn ideal_temperature(month: u32, hemisphere: Hemisphere) -> f64 {
    let (summer, winter) = match hemisphere {
        Hemisphere::Northern => ([6, 7, 8], [12, 1, 2]),
        Hemisphere::Southern => ([12, 1, 2], [6, 7, 8]),
    };

    if summer.contains(&month) {
        20.0
    } else if winter.contains(&month) {
        5.0
    } else if (3..=5).contains(&month) {
        15.0
    } else {
        12.0
    }
}

/// Cutoffs of the vibe decision list.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct VibeThresholds {
    /// Rain or wind multiplier below this decides the vibe.
    pub penalty_cutoff: f64,
    pub color_bonus: f64,
    pub ether: f64,
    pub fire: f64,
}

impl Default for VibeThresholds {
    fn default() -> Self {
        Self {
            penalty_cutoff: DEFAULT_PENALTY_CUTOFF,
            color_bonus: DEFAULT_COLOR_BONUS_THRESHOLD,
            ether: DEFAULT_ETHER_THRESHOLD,
            fire: DEFAULT_FIRE_THRESHOLD,
        }
    }
}

/// Every intermediate term of a weather score.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct WeatherBreakdown {
    pub cloud_score: f64,
    pub temperature_score: f64,
    pub color_bonus: f64,
    pub rain_multiplier: f64,
    pub wind_multiplier: f64,
    pub pollution_multiplier: f64,
    /// Weighted sum plus bonus, clamped to `[0, 1]`.
    pub score: f64,
}

impl WeatherBreakdown {
    pub fn from_record(record: &ClimatologyDayRecord, ideal_temperature_c: f64) -> Self {
        let cloud_score = ((100.0 - record.cloud_cover_pct) / 100.0).clamp(0.0, 1.0);

        let deviation = record.max_temperature_c - ideal_temperature_c;
        let temperature_score =
            (-(deviation * deviation) / (2.0 * TEMPERATURE_STD_DEV_C * TEMPERATURE_STD_DEV_C)).exp();

        let color_bonus = (record.ozone / OZONE_REFERENCE * MAXIMUM_COLOR_BONUS)
            .clamp(0.0, MAXIMUM_COLOR_BONUS);

        let rain_multiplier = if record.precipitation_mm < RAIN_FREE_BELOW_MM {
            1.0
        } else {
            (1.0 - record.precipitation_mm / RAIN_WASHOUT_MM).max(0.0)
        };

        let wind_multiplier = if record.wind_speed_kmh < CALM_WIND_BELOW_KMH {
            1.0
        } else {
            (1.0 - record.wind_speed_kmh / GALE_WIND_KMH).max(WIND_MULTIPLIER_FLOOR)
        };

        let pollution_multiplier = if record.pm2_5 < CLEAN_AIR_BELOW_PM2_5 {
            1.0
        } else {
            (1.0 - (record.pm2_5 - CLEAN_AIR_BELOW_PM2_5) / PM2_5_PENALTY_SPAN).max(0.0)
        };

        let weighted = cloud_score * CLOUD_WEIGHT
            + temperature_score * TEMPERATURE_WEIGHT
            + rain_multiplier * RAIN_WEIGHT
            + wind_multiplier * WIND_WEIGHT
            + pollution_multiplier * POLLUTION_WEIGHT;

        Self {
            cloud_score,
            temperature_score,
            color_bonus,
            rain_multiplier,
            wind_multiplier,
            pollution_multiplier,
            score: (weighted + color_bonus).clamp(0.0, 1.0),
        }
    }

    /// First matching rule wins: rain, wind, sky color, overall score, warmth.
    pub fn vibe(&self, thresholds: &VibeThresholds) -> Vibe {
        if self.rain_multiplier < thresholds.penalty_cutoff {
            Vibe::Water
        } else if self.wind_multiplier < thresholds.penalty_cutoff {
            Vibe::Air
        } else if self.color_bonus > thresholds.color_bonus {
            Vibe::CottonCandy
        } else if self.score > thresholds.ether {
            Vibe::Ether
        } else if self.temperature_score > thresholds.fire {
            Vibe::Fire
        } else {
            Vibe::Earth
        }
    }
}

/// Weather score and vibe of one bucket.
pub fn score_day(
    record: &ClimatologyDayRecord,
    ideal_temperature_c: f64,
    thresholds: &VibeThresholds,
) -> (f64, Vibe) {
    let breakdown = WeatherBreakdown::from_record(record, ideal_temperature_c);
    (breakdown.score, breakdown.vibe(thresholds))
}
