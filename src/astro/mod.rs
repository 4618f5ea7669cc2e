//! Astronomical features of candidate days.
//!
//! Each day in the window is described by three numbers: how long civil
//! twilight lasts after sunset, how much of the moon is lit, and how far the
//! Earth is from the Sun. Days without a sunset or civil dusk are skipped.

pub mod ephemeris;
pub mod features;
pub mod lunar;
pub mod sun;
pub mod window;

pub use ephemeris::{AnalyticEphemeris, Ephemeris};
pub use features::{AstroSources, AstronomicalDayRecord, compute_day};
pub use lunar::{LunarPhase, MeanLunation};
pub use window::{AstronomicalWindow, build_window};
