//! Error types surfaced by a proposal request.
//!
//! Per-day and per-year failures are recovered where they happen (a skipped
//! day, a dropped historical year). Only the failures below reach the caller.

use chrono::NaiveDate;
use thiserror::Error;

/// Request-level failures.
#[derive(Debug, Error, PartialEq)]
pub enum PlanError {
    #[error("City not found: {0}. Please enter a valid city name.")]
    LocationNotFound(String),

    #[error("Invalid coordinates ({latitude}, {longitude}): latitude must be within ±90° and longitude within ±180°")]
    InvalidCoordinates { latitude: f64, longitude: f64 },

    #[error(
        "Too few valid days to generate recommendations: {valid} of {window} days usable ({skipped} skipped), at least {minimum} required"
    )]
    InsufficientValidDays {
        valid: usize,
        skipped: usize,
        window: u32,
        minimum: usize,
    },

    #[error("Could not fetch historical weather data for {city}")]
    NoClimatologyData { city: String },

    #[error("Start date {date} must be between {earliest} and {latest}")]
    StartDateOutOfRange {
        date: NaiveDate,
        earliest: NaiveDate,
        latest: NaiveDate,
    },
}

/// Why a single day was left out of the astronomical window.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DaySkip {
    /// Sunset or civil dusk does not occur (white night, polar day or night).
    PolarDayNight,
    /// The almanac reported dusk before sunset.
    NegativeTwilight,
}

/// Failures of the historical weather/air-quality provider.
#[derive(Debug, Error, Clone, PartialEq)]
pub enum ProviderError {
    #[error("request failed: {0}")]
    Transport(String),

    #[error("provider answered with HTTP status {0}")]
    Status(u16),

    #[error("could not decode provider response: {0}")]
    Decode(String),

    #[error("provider response has no {0} series")]
    MissingSeries(&'static str),
}

impl ProviderError {
    /// Whether retrying the same request may succeed.
    pub fn is_transient(&self) -> bool {
        match self {
            ProviderError::Transport(_) => true,
            ProviderError::Status(code) => *code == 429 || (500..600).contains(code),
            ProviderError::Decode(_) | ProviderError::MissingSeries(_) => false,
        }
    }
}
