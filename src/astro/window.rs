//! Rolling window of astronomical day records.

use chrono::{Duration, NaiveDate};

use super::features::{AstroSources, AstronomicalDayRecord, compute_day};
use crate::error::{DaySkip, PlanError};
use crate::geo::Location;
use crate::logger::Log;

/// Records for the usable days of a window, in date order.
///
/// Skipped days are not replaced, so `records.len() + skipped == days`.
#[derive(Debug, Clone, PartialEq)]
pub struct AstronomicalWindow {
    pub start: NaiveDate,
    pub days: u32,
    pub records: Vec<AstronomicalDayRecord>,
    pub skipped: usize,
}

impl AstronomicalWindow {
    /// Fail when too few days survived to be worth ranking.
    pub fn ensure_viable(&self, minimum: usize) -> Result<(), PlanError> {
        if self.records.len() < minimum {
            return Err(PlanError::InsufficientValidDays {
                valid: self.records.len(),
                skipped: self.skipped,
                window: self.days,
                minimum,
            });
        }
        Ok(())
    }

    /// Every calendar date of the window, skipped days included.
    pub fn dates(&self) -> impl Iterator<Item = NaiveDate> + '_ {
        (0..self.days as i64).map(move |offset| self.start + Duration::days(offset))
    }
}

/// Compute `days` consecutive days starting at `start`, skipping undefined ones.
pub fn build_window(
    sources: &AstroSources<'_>,
    location: &Location,
    start: NaiveDate,
    days: u32,
) -> AstronomicalWindow {
    let mut records = Vec::with_capacity(days as usize);
    let mut skipped = 0;

    for offset in 0..days as i64 {
        let date = start + Duration::days(offset);
        match compute_day(sources, location, date) {
            Ok(record) => records.push(record),
            Err(reason) => {
                skipped += 1;
                match reason {
                    DaySkip::PolarDayNight => {
                        Log::log_detail(&format!("{}: no sunset or civil dusk, skipped", date))
                    }
                    DaySkip::NegativeTwilight => Log::log_warning(&format!(
                        "{}: civil dusk reported before sunset, skipped",
                        date
                    )),
                }
            }
        }
    }

    AstronomicalWindow {
        start,
        days,
        records,
        skipped,
    }
}
