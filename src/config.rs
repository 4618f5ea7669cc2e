//! Configuration system for bigring with defaults and validation.
//!
//! This module handles the TOML configuration file, fills in defaults for
//! missing keys, validates every value against the limits in
//! [`crate::constants`], and converts the result into engine and provider
//! settings.
//!
//! ## Configuration Sources
//!
//! 1. An explicit path given with `--config`
//! 2. **XDG_CONFIG_HOME**/bigring/bigring.toml, created with commented defaults
//!    on first use
//!
//! ## Configuration Structure
//!
//! ```toml
//! #[Window]
//! window_days = 30                  # Consecutive days scored from the start date
//! minimum_valid_days = 5            # Fewer usable days than this aborts the request
//! top_days = 3                      # Days recommended
//! max_start_offset_days = 90        # How far ahead the window may start
//!
//! #[Weather history]
//! historical_years = 3              # Past years averaged into the climatology
//! allow_astronomical_fallback = false
//! request_timeout_secs = 30
//! max_fetch_attempts = 3
//! retry_base_delay_ms = 250
//!
//! #[Vibes]
//! penalty_cutoff = 0.9
//! color_bonus_threshold = 0.085
//! ether_threshold = 0.8
//! fire_threshold = 0.8
//!
//! #[Pink time]
//! pink_min_elevation = -4.0
//! pink_max_elevation = -1.0
//! ```
//!
//! Every key is optional.

use anyhow::{Context, Result};
use serde::Deserialize;
use std::fs;
use std::path::{Path, PathBuf};
use std::time::Duration;

use crate::climate::{ProviderSettings, RetryPolicy};
use crate::constants::*;
use crate::engine::EngineSettings;
use crate::logger::Log;
use crate::pink::ElevationBand;
use crate::scoring::VibeThresholds;

/// Contents of `bigring.toml`. Missing keys are `None` until defaults are applied.
#[derive(Debug, Deserialize, Clone, Default, PartialEq)]
pub struct Config {
    pub window_days: Option<u32>,
    pub minimum_valid_days: Option<usize>,
    pub top_days: Option<usize>,
    pub max_start_offset_days: Option<i64>,

    pub historical_years: Option<i32>,
    /// Rank on twilight alone when no historical weather can be fetched.
    pub allow_astronomical_fallback: Option<bool>,
    pub weather_archive_url: Option<String>,
    pub air_quality_url: Option<String>,
    pub request_timeout_secs: Option<u64>,
    pub max_fetch_attempts: Option<u32>,
    pub retry_base_delay_ms: Option<u64>,

    pub penalty_cutoff: Option<f64>,
    pub color_bonus_threshold: Option<f64>,
    pub ether_threshold: Option<f64>,
    pub fire_threshold: Option<f64>,

    pub pink_min_elevation: Option<f64>, // degrees
    pub pink_max_elevation: Option<f64>, // degrees
}

impl Config {
    pub fn get_config_path() -> Result<PathBuf> {
        let config_dir = dirs::config_dir().context("Could not determine config directory")?;
        Ok(config_dir.join("bigring").join("bigring.toml"))
    }

    /// Write a commented configuration file holding every default.
    pub fn create_default_config(path: &Path) -> Result<()> {
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent).context("Failed to create config directory")?;
        }

        let content = ConfigBuilder::new()
            .add_section("Window")
            .add_setting(
                "window_days",
                &DEFAULT_WINDOW_DAYS.to_string(),
                &format!(
                    "Consecutive days scored from the start date ({}-{})",
                    MINIMUM_WINDOW_DAYS, MAXIMUM_WINDOW_DAYS
                ),
            )
            .add_setting(
                "minimum_valid_days",
                &DEFAULT_MINIMUM_VALID_DAYS.to_string(),
                "Fewer usable days than this aborts the request",
            )
            .add_setting(
                "top_days",
                &DEFAULT_TOP_DAYS.to_string(),
                &format!(
                    "Days recommended ({}-{})",
                    MINIMUM_TOP_DAYS, MAXIMUM_TOP_DAYS
                ),
            )
            .add_setting(
                "max_start_offset_days",
                &DEFAULT_MAX_START_OFFSET_DAYS.to_string(),
                "How many days ahead the window may start",
            )
            .add_section("Weather history")
            .add_setting(
                "historical_years",
                &DEFAULT_HISTORICAL_YEARS.to_string(),
                &format!(
                    "Past years averaged into the climatology ({}-{})",
                    MINIMUM_HISTORICAL_YEARS, MAXIMUM_HISTORICAL_YEARS
                ),
            )
            .add_setting(
                "allow_astronomical_fallback",
                &DEFAULT_ALLOW_ASTRONOMICAL_FALLBACK.to_string(),
                "Rank on twilight alone when no weather history is available",
            )
            .add_setting(
                "weather_archive_url",
                &format!("\"{}\"", DEFAULT_WEATHER_ARCHIVE_URL),
                "Open-Meteo historical weather endpoint",
            )
            .add_setting(
                "air_quality_url",
                &format!("\"{}\"", DEFAULT_AIR_QUALITY_URL),
                "Open-Meteo air quality endpoint",
            )
            .add_setting(
                "request_timeout_secs",
                &DEFAULT_REQUEST_TIMEOUT_SECS.to_string(),
                "Timeout of a single request",
            )
            .add_setting(
                "max_fetch_attempts",
                &DEFAULT_MAX_FETCH_ATTEMPTS.to_string(),
                "Attempts per request, including the first",
            )
            .add_setting(
                "retry_base_delay_ms",
                &DEFAULT_RETRY_BASE_DELAY_MS.to_string(),
                "Delay before the first retry, doubled after each failure",
            )
            .add_section("Vibes")
            .add_setting(
                "penalty_cutoff",
                &format!("{:?}", DEFAULT_PENALTY_CUTOFF),
                "Rain or wind multiplier below this decides the vibe",
            )
            .add_setting(
                "color_bonus_threshold",
                &format!("{:?}", DEFAULT_COLOR_BONUS_THRESHOLD),
                "Ozone color bonus above this is a cotton-candy sky (max 0.1)",
            )
            .add_setting(
                "ether_threshold",
                &format!("{:?}", DEFAULT_ETHER_THRESHOLD),
                "Weather score above this is a perfect match",
            )
            .add_setting(
                "fire_threshold",
                &format!("{:?}", DEFAULT_FIRE_THRESHOLD),
                "Temperature score above this is a fire day",
            )
            .add_section("Pink time")
            .add_setting(
                "pink_min_elevation",
                &format!("{:?}", DEFAULT_PINK_MIN_ELEVATION),
                "Lowest solar elevation of the Belt of Venus (degrees)",
            )
            .add_setting(
                "pink_max_elevation",
                &format!("{:?}", DEFAULT_PINK_MAX_ELEVATION),
                "Highest solar elevation of the Belt of Venus (degrees)",
            )
            .build();

        fs::write(path, content).context("Failed to write default config file")?;
        Ok(())
    }

    fn apply_defaults(config: &mut Config) {
        config.window_days.get_or_insert(DEFAULT_WINDOW_DAYS);
        config
            .minimum_valid_days
            .get_or_insert(DEFAULT_MINIMUM_VALID_DAYS);
        config.top_days.get_or_insert(DEFAULT_TOP_DAYS);
        config
            .max_start_offset_days
            .get_or_insert(DEFAULT_MAX_START_OFFSET_DAYS);
        config.historical_years.get_or_insert(DEFAULT_HISTORICAL_YEARS);
        config
            .allow_astronomical_fallback
            .get_or_insert(DEFAULT_ALLOW_ASTRONOMICAL_FALLBACK);
        config
            .weather_archive_url
            .get_or_insert_with(|| DEFAULT_WEATHER_ARCHIVE_URL.to_string());
        config
            .air_quality_url
            .get_or_insert_with(|| DEFAULT_AIR_QUALITY_URL.to_string());
        config
            .request_timeout_secs
            .get_or_insert(DEFAULT_REQUEST_TIMEOUT_SECS);
        config
            .max_fetch_attempts
            .get_or_insert(DEFAULT_MAX_FETCH_ATTEMPTS);
        config
            .retry_base_delay_ms
            .get_or_insert(DEFAULT_RETRY_BASE_DELAY_MS);
        config.penalty_cutoff.get_or_insert(DEFAULT_PENALTY_CUTOFF);
        config
            .color_bonus_threshold
            .get_or_insert(DEFAULT_COLOR_BONUS_THRESHOLD);
        config.ether_threshold.get_or_insert(DEFAULT_ETHER_THRESHOLD);
        config.fire_threshold.get_or_insert(DEFAULT_FIRE_THRESHOLD);
        config
            .pink_min_elevation
            .get_or_insert(DEFAULT_PINK_MIN_ELEVATION);
        config
            .pink_max_elevation
            .get_or_insert(DEFAULT_PINK_MAX_ELEVATION);
    }

    /// Parse configuration text, apply defaults and validate.
    pub fn from_toml_str(content: &str) -> Result<Self> {
        let mut config: Config = toml::from_str(content).context("Failed to parse config")?;
        Self::apply_defaults(&mut config);
        validate_config(&config)?;
        Ok(config)
    }

    /// Load from a specific path. Does NOT create a default config if the path doesn't exist.
    pub fn load_from_path(path: &Path) -> Result<Self> {
        if !path.exists() {
            anyhow::bail!(
                "Configuration file not found at specified path: {}",
                path.display()
            );
        }

        let content = fs::read_to_string(path)
            .with_context(|| format!("Failed to read config from {}", path.display()))?;

        Self::from_toml_str(&content)
            .with_context(|| format!("Invalid configuration in {}", path.display()))
    }

    /// Load the default config file, creating it on first use.
    pub fn load() -> Result<Self> {
        let config_path = Self::get_config_path()?;

        if !config_path.exists() {
            Self::create_default_config(&config_path)
                .context("Failed to create default config during load")?;
            Log::log_indented(&format!(
                "Created default configuration at {}",
                crate::utils::path_for_display(&config_path)
            ));
        }

        Self::load_from_path(&config_path).with_context(|| {
            format!(
                "Failed to load configuration from {}",
                config_path.display()
            )
        })
    }

    pub fn engine_settings(&self) -> EngineSettings {
        EngineSettings {
            window_days: self.window_days.unwrap_or(DEFAULT_WINDOW_DAYS),
            minimum_valid_days: self
                .minimum_valid_days
                .unwrap_or(DEFAULT_MINIMUM_VALID_DAYS),
            top_days: self.top_days.unwrap_or(DEFAULT_TOP_DAYS),
            historical_years: self.historical_years.unwrap_or(DEFAULT_HISTORICAL_YEARS),
            max_start_offset_days: self
                .max_start_offset_days
                .unwrap_or(DEFAULT_MAX_START_OFFSET_DAYS),
            allow_astronomical_fallback: self
                .allow_astronomical_fallback
                .unwrap_or(DEFAULT_ALLOW_ASTRONOMICAL_FALLBACK),
            thresholds: VibeThresholds {
                penalty_cutoff: self.penalty_cutoff.unwrap_or(DEFAULT_PENALTY_CUTOFF),
                color_bonus: self
                    .color_bonus_threshold
                    .unwrap_or(DEFAULT_COLOR_BONUS_THRESHOLD),
                ether: self.ether_threshold.unwrap_or(DEFAULT_ETHER_THRESHOLD),
                fire: self.fire_threshold.unwrap_or(DEFAULT_FIRE_THRESHOLD),
            },
            pink_band: ElevationBand {
                min: self
                    .pink_min_elevation
                    .unwrap_or(DEFAULT_PINK_MIN_ELEVATION),
                max: self
                    .pink_max_elevation
                    .unwrap_or(DEFAULT_PINK_MAX_ELEVATION),
            },
        }
    }

    pub fn provider_settings(&self) -> ProviderSettings {
        ProviderSettings {
            archive_url: self
                .weather_archive_url
                .clone()
                .unwrap_or_else(|| DEFAULT_WEATHER_ARCHIVE_URL.to_string()),
            air_quality_url: self
                .air_quality_url
                .clone()
                .unwrap_or_else(|| DEFAULT_AIR_QUALITY_URL.to_string()),
            timeout: Duration::from_secs(
                self.request_timeout_secs
                    .unwrap_or(DEFAULT_REQUEST_TIMEOUT_SECS),
            ),
            retry: RetryPolicy::new(
                self.max_fetch_attempts
                    .unwrap_or(DEFAULT_MAX_FETCH_ATTEMPTS),
                self.retry_base_delay_ms
                    .unwrap_or(DEFAULT_RETRY_BASE_DELAY_MS),
                MAX_RETRY_DELAY_MS,
            ),
        }
    }

    /// Print the effective settings.
    pub fn log_config(&self, source: &Path) {
        let engine = self.engine_settings();
        let provider = self.provider_settings();

        Log::log_block_start(&format!(
            "Loaded configuration from {}",
            crate::utils::path_for_display(source)
        ));
        Log::log_indented(&format!(
            "Window: {} days, top {}, at least {} usable",
            engine.window_days, engine.top_days, engine.minimum_valid_days
        ));
        Log::log_indented(&format!(
            "Start date: up to {} days ahead",
            engine.max_start_offset_days
        ));
        Log::log_indented(&format!(
            "Weather history: {} years, {} attempts per request, {}s timeout",
            engine.historical_years,
            provider.retry.max_attempts,
            provider.timeout.as_secs()
        ));
        if engine.allow_astronomical_fallback {
            Log::log_indented("Astronomical fallback: enabled");
        }
        Log::log_indented(&format!(
            "Pink time band: {:.1}° to {:.1}°",
            engine.pink_band.min, engine.pink_band.max
        ));
    }
}

/// Check every configured value against its limits.
pub fn validate_config(config: &Config) -> Result<()> {
    let window_days = config.window_days.unwrap_or(DEFAULT_WINDOW_DAYS);
    if !(MINIMUM_WINDOW_DAYS..=MAXIMUM_WINDOW_DAYS).contains(&window_days) {
        anyhow::bail!(
            "window_days ({}) must be between {} and {}",
            window_days,
            MINIMUM_WINDOW_DAYS,
            MAXIMUM_WINDOW_DAYS
        );
    }

    let minimum_valid_days = config
        .minimum_valid_days
        .unwrap_or(DEFAULT_MINIMUM_VALID_DAYS);
    if minimum_valid_days < 1 || minimum_valid_days > window_days as usize {
        anyhow::bail!(
            "minimum_valid_days ({}) must be between 1 and window_days ({})",
            minimum_valid_days,
            window_days
        );
    }

    let top_days = config.top_days.unwrap_or(DEFAULT_TOP_DAYS);
    if !(MINIMUM_TOP_DAYS..=MAXIMUM_TOP_DAYS).contains(&top_days) {
        anyhow::bail!(
            "top_days ({}) must be between {} and {}",
            top_days,
            MINIMUM_TOP_DAYS,
            MAXIMUM_TOP_DAYS
        );
    }

    let offset = config
        .max_start_offset_days
        .unwrap_or(DEFAULT_MAX_START_OFFSET_DAYS);
    if !(0..=MAXIMUM_START_OFFSET_DAYS).contains(&offset) {
        anyhow::bail!(
            "max_start_offset_days ({}) must be between 0 and {}",
            offset,
            MAXIMUM_START_OFFSET_DAYS
        );
    }

    let years = config.historical_years.unwrap_or(DEFAULT_HISTORICAL_YEARS);
    if !(MINIMUM_HISTORICAL_YEARS..=MAXIMUM_HISTORICAL_YEARS).contains(&years) {
        anyhow::bail!(
            "historical_years ({}) must be between {} and {}",
            years,
            MINIMUM_HISTORICAL_YEARS,
            MAXIMUM_HISTORICAL_YEARS
        );
    }

    for (key, url) in [
        ("weather_archive_url", config.weather_archive_url.as_deref()),
        ("air_quality_url", config.air_quality_url.as_deref()),
    ] {
        if let Some(url) = url {
            if !(url.starts_with("http://") || url.starts_with("https://")) {
                anyhow::bail!("{} must be an http(s) URL (got \"{}\")", key, url);
            }
        }
    }

    let timeout = config
        .request_timeout_secs
        .unwrap_or(DEFAULT_REQUEST_TIMEOUT_SECS);
    if !(MINIMUM_REQUEST_TIMEOUT_SECS..=MAXIMUM_REQUEST_TIMEOUT_SECS).contains(&timeout) {
        anyhow::bail!(
            "request_timeout_secs ({}) must be between {} and {}",
            timeout,
            MINIMUM_REQUEST_TIMEOUT_SECS,
            MAXIMUM_REQUEST_TIMEOUT_SECS
        );
    }

    let attempts = config
        .max_fetch_attempts
        .unwrap_or(DEFAULT_MAX_FETCH_ATTEMPTS);
    if !(MINIMUM_FETCH_ATTEMPTS..=MAXIMUM_FETCH_ATTEMPTS).contains(&attempts) {
        anyhow::bail!(
            "max_fetch_attempts ({}) must be between {} and {}",
            attempts,
            MINIMUM_FETCH_ATTEMPTS,
            MAXIMUM_FETCH_ATTEMPTS
        );
    }

    let delay = config
        .retry_base_delay_ms
        .unwrap_or(DEFAULT_RETRY_BASE_DELAY_MS);
    if delay > MAXIMUM_RETRY_BASE_DELAY_MS {
        anyhow::bail!(
            "retry_base_delay_ms ({}) must be at most {}",
            delay,
            MAXIMUM_RETRY_BASE_DELAY_MS
        );
    }

    let cutoff = config.penalty_cutoff.unwrap_or(DEFAULT_PENALTY_CUTOFF);
    if !(cutoff > 0.0 && cutoff <= 1.0) {
        anyhow::bail!("penalty_cutoff ({}) must be greater than 0 and at most 1", cutoff);
    }

    let color = config
        .color_bonus_threshold
        .unwrap_or(DEFAULT_COLOR_BONUS_THRESHOLD);
    if !(0.0..=MAXIMUM_COLOR_BONUS).contains(&color) {
        anyhow::bail!(
            "color_bonus_threshold ({}) must be between 0 and {}",
            color,
            MAXIMUM_COLOR_BONUS
        );
    }

    for (key, value) in [
        (
            "ether_threshold",
            config.ether_threshold.unwrap_or(DEFAULT_ETHER_THRESHOLD),
        ),
        (
            "fire_threshold",
            config.fire_threshold.unwrap_or(DEFAULT_FIRE_THRESHOLD),
        ),
    ] {
        if !(0.0..=1.0).contains(&value) {
            anyhow::bail!("{} ({}) must be between 0 and 1", key, value);
        }
    }

    let pink_min = config
        .pink_min_elevation
        .unwrap_or(DEFAULT_PINK_MIN_ELEVATION);
    let pink_max = config
        .pink_max_elevation
        .unwrap_or(DEFAULT_PINK_MAX_ELEVATION);
    for (key, value) in [
        ("pink_min_elevation", pink_min),
        ("pink_max_elevation", pink_max),
    ] {
        if !(MINIMUM_PINK_ELEVATION..=MAXIMUM_PINK_ELEVATION).contains(&value) {
            anyhow::bail!(
                "{} ({}) must be between {} and {} degrees",
                key,
                value,
                MINIMUM_PINK_ELEVATION,
                MAXIMUM_PINK_ELEVATION
            );
        }
    }
    if pink_min >= pink_max {
        anyhow::bail!(
            "pink_min_elevation ({}) must be lower than pink_max_elevation ({})",
            pink_min,
            pink_max
        );
    }

    Ok(())
}

/// Builds a configuration file with aligned trailing comments.
struct ConfigBuilder {
    entries: Vec<ConfigEntry>,
}

enum ConfigEntry {
    Section(String),
    Setting { line: String, comment: String },
}

impl ConfigBuilder {
    fn new() -> Self {
        Self {
            entries: Vec::new(),
        }
    }

    fn add_section(mut self, title: &str) -> Self {
        self.entries.push(ConfigEntry::Section(format!("#[{}]", title)));
        self
    }

    fn add_setting(mut self, key: &str, value: &str, comment: &str) -> Self {
        self.entries.push(ConfigEntry::Setting {
            line: format!("{} = {}", key, value),
            comment: format!("# {}", comment),
        });
        self
    }

    fn build(self) -> String {
        // One space between the widest setting and its comment
        let width = self
            .entries
            .iter()
            .filter_map(|entry| match entry {
                ConfigEntry::Setting { line, .. } => Some(line.len()),
                ConfigEntry::Section(_) => None,
            })
            .max()
            .unwrap_or(0)
            + 1;

        let mut result = Vec::new();
        for (index, entry) in self.entries.into_iter().enumerate() {
            match entry {
                ConfigEntry::Section(title) => {
                    if index > 0 {
                        result.push(String::new());
                    }
                    result.push(title);
                }
                ConfigEntry::Setting { line, comment } => {
                    let padding = " ".repeat(width - line.len());
                    result.push(format!("{}{}{}", line, padding, comment));
                }
            }
        }

        result.push(String::new());
        result.join("\n")
    }
}
