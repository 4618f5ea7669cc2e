//! Historical weather climatology.
//!
//! This module provides functionality for:
//! - Fetching daily weather and hourly air quality from Open-Meteo
//! - Retrying transient provider failures with backoff
//! - Averaging several past years into day-of-month buckets

pub mod climatology;
pub mod provider;
pub mod retry;

pub use climatology::{ClimatologyDayRecord, ClimatologyTable, MonthlyClimatology, aggregate_month};
pub use provider::{
    DailyWeather, HourlyAirQuality, OpenMeteoClient, ProviderSettings, WeatherProvider,
};
pub use retry::RetryPolicy;
