//! Application constants and default values for bigring.
//!
//! This module contains the configuration defaults, validation limits,
//! scoring weights and operational constants used throughout the application.

// ═══ Window and Ranking Defaults ═══
// These values are used when config options are not specified by the user

pub const DEFAULT_WINDOW_DAYS: u32 = 30; // consecutive days scored per request
pub const DEFAULT_MINIMUM_VALID_DAYS: usize = 5; // below this the window is not scored
pub const DEFAULT_TOP_DAYS: usize = 3; // recommendations returned
pub const DEFAULT_MAX_START_OFFSET_DAYS: i64 = 90; // start date may be at most this far ahead
pub const DEFAULT_HISTORICAL_YEARS: i32 = 3; // years of climatology preceding the target year
pub const DEFAULT_ALLOW_ASTRONOMICAL_FALLBACK: bool = false; // score without weather when none is available

// ═══ Historical Data Provider ═══

pub const DEFAULT_WEATHER_ARCHIVE_URL: &str = "https://archive-api.open-meteo.com/v1/archive";
pub const DEFAULT_AIR_QUALITY_URL: &str = "https://air-quality-api.open-meteo.com/v1/air-quality";
pub const DEFAULT_REQUEST_TIMEOUT_SECS: u64 = 30;
pub const DEFAULT_MAX_FETCH_ATTEMPTS: u32 = 3; // including the first attempt
pub const DEFAULT_RETRY_BASE_DELAY_MS: u64 = 250; // doubled after every failed attempt
pub const MAX_RETRY_DELAY_MS: u64 = 10_000;

pub const DEFAULT_PM2_5: f64 = 10.0; // µg/m³, clean-air baseline when the series is missing
pub const DEFAULT_OZONE: f64 = 300.0; // baseline column density when the series is missing

// ═══ Vibe Thresholds ═══
// All scores live on a 0..1 scale

pub const DEFAULT_PENALTY_CUTOFF: f64 = 0.9; // rain/wind multiplier below this sets the vibe
pub const DEFAULT_COLOR_BONUS_THRESHOLD: f64 = 0.085; // ozone bonus above this is "cotton-candy"
pub const DEFAULT_ETHER_THRESHOLD: f64 = 0.8; // weather score above this is a perfect match
pub const DEFAULT_FIRE_THRESHOLD: f64 = 0.8; // temperature score above this is "fire"

// ═══ Pink Time ═══
// Solar elevation band of the Belt of Venus, degrees

pub const DEFAULT_PINK_MIN_ELEVATION: f64 = -4.0;
pub const DEFAULT_PINK_MAX_ELEVATION: f64 = -1.0;
pub const PINK_SCAN_STEP_MINUTES: i64 = 1;

// ═══ Validation Limits ═══
// These limits ensure user inputs are within reasonable and safe ranges

pub const MINIMUM_WINDOW_DAYS: u32 = 7;
pub const MAXIMUM_WINDOW_DAYS: u32 = 60;
pub const MINIMUM_TOP_DAYS: usize = 1;
pub const MAXIMUM_TOP_DAYS: usize = 10;
pub const MINIMUM_HISTORICAL_YEARS: i32 = 1;
pub const MAXIMUM_HISTORICAL_YEARS: i32 = 10;
pub const MAXIMUM_START_OFFSET_DAYS: i64 = 365;
pub const MINIMUM_REQUEST_TIMEOUT_SECS: u64 = 1;
pub const MAXIMUM_REQUEST_TIMEOUT_SECS: u64 = 300;
pub const MINIMUM_FETCH_ATTEMPTS: u32 = 1;
pub const MAXIMUM_FETCH_ATTEMPTS: u32 = 10;
pub const MAXIMUM_RETRY_BASE_DELAY_MS: u64 = 10_000;
pub const MAXIMUM_COLOR_BONUS: f64 = 0.1;
pub const MINIMUM_PINK_ELEVATION: f64 = -18.0; // astronomical twilight floor
pub const MAXIMUM_PINK_ELEVATION: f64 = 0.0;

// ═══ Scoring Weights ═══
// Fixed weights of the ranking formulas

pub const TWILIGHT_DURATION_WEIGHT: f64 = 0.55;
pub const MOON_DARKNESS_WEIGHT: f64 = 0.35;
pub const SUN_DISTANCE_WEIGHT: f64 = 0.10;

pub const CLOUD_WEIGHT: f64 = 0.35;
pub const TEMPERATURE_WEIGHT: f64 = 0.20;
pub const RAIN_WEIGHT: f64 = 0.25;
pub const WIND_WEIGHT: f64 = 0.15;
pub const POLLUTION_WEIGHT: f64 = 0.05;

pub const ROMANCE_TWILIGHT_WEIGHT: f64 = 0.6;
pub const ROMANCE_WEATHER_WEIGHT: f64 = 0.4;
pub const ROMANCE_SCORE_DECIMALS: i32 = 4;

pub const DEGENERATE_NORMALIZED_VALUE: f64 = 0.5; // every value of a constant column

// ═══ Weather Penalty Curves ═══

pub const TEMPERATURE_STD_DEV_C: f64 = 5.0;
pub const RAIN_FREE_BELOW_MM: f64 = 0.1;
pub const RAIN_WASHOUT_MM: f64 = 3.0;
pub const CALM_WIND_BELOW_KMH: f64 = 12.0;
pub const GALE_WIND_KMH: f64 = 18.0;
pub const WIND_MULTIPLIER_FLOOR: f64 = 0.1;
pub const CLEAN_AIR_BELOW_PM2_5: f64 = 10.0;
pub const PM2_5_PENALTY_SPAN: f64 = 40.0;
pub const OZONE_REFERENCE: f64 = 350.0; // reference column density for the color bonus

// ═══ Astronomy ═══

pub const SYNODIC_MONTH_DAYS: f64 = 29.530588;
pub const ASTRONOMICAL_UNIT_KM: f64 = 149_597_870.7;
pub const SUNSET_ELEVATION: f64 = -0.833; // upper limb with standard refraction
pub const CIVIL_DUSK_ELEVATION: f64 = -6.0;

// ═══ Exit Codes ═══

pub const EXIT_FAILURE: i32 = 1; // General failure
