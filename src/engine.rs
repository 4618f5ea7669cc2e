//! Request orchestration.
//!
//! A proposal request runs in four steps: resolve the city, build the
//! astronomical window, aggregate climatology for every month the window
//! touches, then rank the days and refine the best ones with their pink time.

use chrono::{Duration, NaiveDate};

use crate::astro::{AstroSources, AstronomicalWindow, Ephemeris, LunarPhase, build_window};
use crate::climate::{ClimatologyTable, WeatherProvider, aggregate_month};
use crate::constants::*;
use crate::error::PlanError;
use crate::geo::{Almanac, Geocoder, Location, SunEvents, TimezoneResolver, resolve_location};
use crate::logger::Log;
use crate::pink::{ElevationBand, PinkWindow, find_pink_window};
use crate::scoring::{self, ScoredDay, VibeThresholds, WeatherDay};
use crate::utils::{distinct_months, format_coordinates};

/// Tunables of a request, normally derived from the configuration file.
#[derive(Debug, Clone, PartialEq)]
pub struct EngineSettings {
    pub window_days: u32,
    pub minimum_valid_days: usize,
    pub top_days: usize,
    pub historical_years: i32,
    pub max_start_offset_days: i64,
    pub allow_astronomical_fallback: bool,
    pub thresholds: VibeThresholds,
    pub pink_band: ElevationBand,
}

impl Default for EngineSettings {
    fn default() -> Self {
        Self {
            window_days: DEFAULT_WINDOW_DAYS,
            minimum_valid_days: DEFAULT_MINIMUM_VALID_DAYS,
            top_days: DEFAULT_TOP_DAYS,
            historical_years: DEFAULT_HISTORICAL_YEARS,
            max_start_offset_days: DEFAULT_MAX_START_OFFSET_DAYS,
            allow_astronomical_fallback: DEFAULT_ALLOW_ASTRONOMICAL_FALLBACK,
            thresholds: VibeThresholds::default(),
            pink_band: ElevationBand::default(),
        }
    }
}

/// External data sources of the engine.
#[derive(Clone, Copy)]
pub struct Collaborators<'a> {
    pub geocoder: &'a dyn Geocoder,
    pub timezones: &'a dyn TimezoneResolver,
    pub almanac: &'a dyn Almanac,
    pub lunar: &'a dyn LunarPhase,
    pub ephemeris: &'a dyn Ephemeris,
    pub weather: &'a dyn WeatherProvider,
}

/// One of the top days, ready for display.
#[derive(Debug, Clone, PartialEq)]
pub struct Recommendation {
    /// 1-based position in the ranking.
    pub rank: usize,
    pub day: ScoredDay,
    pub sun: Option<SunEvents>,
    pub pink: Option<PinkWindow>,
}

/// Outcome of a proposal request.
#[derive(Debug, Clone, PartialEq)]
pub struct ProposalPlan {
    pub location: Location,
    pub start: NaiveDate,
    pub window_days: u32,
    pub skipped_days: usize,
    /// Every usable day, best first.
    pub ranked: Vec<ScoredDay>,
    pub recommendations: Vec<Recommendation>,
    /// False when the ranking ran on astronomy alone.
    pub weather_available: bool,
}

/// Outcome of a weather-only request for one month.
#[derive(Debug, Clone, PartialEq)]
pub struct WeatherOutlook {
    pub location: Location,
    pub year: i32,
    pub month: u32,
    pub years_used: Vec<i32>,
    /// Best days first, at most `top_days`.
    pub days: Vec<WeatherDay>,
}

pub struct RomanceEngine<'a> {
    collaborators: Collaborators<'a>,
    settings: EngineSettings,
}

impl<'a> RomanceEngine<'a> {
    pub fn new(collaborators: Collaborators<'a>, settings: EngineSettings) -> Self {
        Self {
            collaborators,
            settings,
        }
    }

    pub fn settings(&self) -> &EngineSettings {
        &self.settings
    }

    /// Check that `start` lies within `today ..= today + max_start_offset_days`.
    pub fn validate_start_date(&self, start: NaiveDate, today: NaiveDate) -> Result<(), PlanError> {
        let latest = today + Duration::days(self.settings.max_start_offset_days);
        if start < today || start > latest {
            return Err(PlanError::StartDateOutOfRange {
                date: start,
                earliest: today,
                latest,
            });
        }
        Ok(())
    }

    pub fn resolve(&self, city_name: &str) -> Result<Location, PlanError> {
        let location = resolve_location(
            self.collaborators.geocoder,
            self.collaborators.timezones,
            city_name,
        )?;

        Log::log_block_start(&format!("Location: {}", location.name));
        Log::log_indented(&format!(
            "Coordinates: {}",
            format_coordinates(location.latitude, location.longitude)
        ));
        Log::log_indented(&format!("Timezone: {}", location.timezone));

        Ok(location)
    }

    /// Resolve `city_name` and plan the window starting at `start`.
    pub fn plan(&self, city_name: &str, start: NaiveDate) -> Result<ProposalPlan, PlanError> {
        let location = self.resolve(city_name)?;
        self.plan_for_location(location, start)
    }

    /// Plan the window starting at `start` for an already resolved location.
    pub fn plan_for_location(
        &self,
        location: Location,
        start: NaiveDate,
    ) -> Result<ProposalPlan, PlanError> {
        let window = self.astronomical_window(&location, start)?;

        let months = distinct_months(window.records.iter().map(|r| r.date));
        let climatology = self.climatology(&location, &months);

        let weather_available = !climatology.is_empty();
        if !weather_available && !self.settings.allow_astronomical_fallback {
            return Err(PlanError::NoClimatologyData {
                city: location.name.clone(),
            });
        }

        let ranked = scoring::rank(
            &window.records,
            &climatology,
            location.hemisphere(),
            &self.settings.thresholds,
        );

        let recommendations = scoring::top_n(&ranked, self.settings.top_days)
            .into_iter()
            .enumerate()
            .map(|(index, day)| self.recommend(&location, index + 1, day))
            .collect();

        Ok(ProposalPlan {
            location,
            start,
            window_days: window.days,
            skipped_days: window.skipped,
            ranked,
            recommendations,
            weather_available,
        })
    }

    fn astronomical_window(
        &self,
        location: &Location,
        start: NaiveDate,
    ) -> Result<AstronomicalWindow, PlanError> {
        let sources = AstroSources {
            almanac: self.collaborators.almanac,
            lunar: self.collaborators.lunar,
            ephemeris: self.collaborators.ephemeris,
        };

        Log::log_block_start(&format!(
            "Computing twilight for {} days from {}",
            self.settings.window_days, start
        ));
        let window = build_window(&sources, location, start, self.settings.window_days);

        for record in &window.records {
            Log::log_detail(&format!(
                "{}: twilight {:.1} min, moon {:.0}%, sun {:.0} km",
                record.date,
                record.civil_twilight_minutes,
                record.moon_illumination * 100.0,
                record.sun_earth_distance_km
            ));
        }

        window.ensure_viable(self.settings.minimum_valid_days)?;
        Ok(window)
    }

    fn climatology(&self, location: &Location, months: &[(i32, u32)]) -> ClimatologyTable {
        Log::log_block_start(&format!(
            "Fetching {} years of weather history",
            self.settings.historical_years
        ));
        ClimatologyTable::build(
            self.collaborators.weather,
            location,
            months,
            self.settings.historical_years,
        )
    }

    fn recommend(&self, location: &Location, rank: usize, day: ScoredDay) -> Recommendation {
        let almanac = self.collaborators.almanac;
        Recommendation {
            rank,
            day,
            sun: almanac.sun_events(location, day.date),
            pink: find_pink_window(almanac, location, day.date, &self.settings.pink_band),
        }
    }

    /// Rank the days of one month by historical weather alone.
    pub fn weather_outlook(
        &self,
        city_name: &str,
        year: i32,
        month: u32,
    ) -> Result<WeatherOutlook, PlanError> {
        let location = self.resolve(city_name)?;

        Log::log_block_start(&format!(
            "Fetching {} years of weather history",
            self.settings.historical_years
        ));
        let climatology = aggregate_month(
            self.collaborators.weather,
            &location,
            year,
            month,
            self.settings.historical_years,
        );
        if climatology.is_empty() {
            return Err(PlanError::NoClimatologyData {
                city: location.name.clone(),
            });
        }

        let ranked = scoring::rank_by_weather(
            &climatology,
            location.hemisphere(),
            &self.settings.thresholds,
        );

        Ok(WeatherOutlook {
            years_used: climatology.years_used.clone(),
            days: scoring::top_n(&ranked, self.settings.top_days),
            location,
            year,
            month,
        })
    }
}
