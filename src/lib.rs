//! # bigring
//!
//! Finds the most romantic evenings to propose in a city over the coming weeks.
//!
//! Each day of a window is scored from its twilight geometry and from what the
//! weather has historically been like on that day of the month. The best days
//! are refined with their "pink time", the minutes after sunset when the Belt
//! of Venus colors the sky.
//!
//! ## Architecture
//!
//! - **args**: Command-line parsing
//! - **astro**: Per-day astronomical features and the scored window
//! - **climate**: Historical weather fetching and day-of-month climatology
//! - **config**: Configuration loading, validation, and default generation
//! - **constants**: Application-wide constants and defaults
//! - **engine**: Request orchestration
//! - **error**: Typed failures of a request
//! - **geo**: City lookup, timezones, and sun events
//! - **logger**: Console output tree for each request phase
//! - **pink**: Pink time refinement
//! - **report**: Console rendering of results
//! - **scoring**: Normalization, weather scoring, vibes, and ranking
//! - **utils**: Numeric and calendar helpers

pub mod args;
pub mod astro;
pub mod climate;
pub mod config;
pub mod constants;
pub mod engine;
pub mod error;
pub mod geo;
pub mod logger;
pub mod pink;
pub mod report;
pub mod scoring;
pub mod utils;

// Re-export important types for easier access
pub use config::Config;
pub use engine::{Collaborators, EngineSettings, ProposalPlan, RomanceEngine, WeatherOutlook};
pub use error::{DaySkip, PlanError, ProviderError};
pub use geo::{Hemisphere, Location};
pub use logger::Log;
pub use scoring::{ScoredDay, Vibe};
