//! Day-of-month climatology built from several past years.
//!
//! Observations of the same day-of-month in different years share one bucket,
//! so "day 1" of April averages April 1st of every fetched year.

use chrono::{Datelike, NaiveDate};
use std::collections::BTreeMap;

use super::provider::WeatherProvider;
use crate::constants::{DEFAULT_OZONE, DEFAULT_PM2_5};
use crate::geo::Location;
use crate::logger::Log;
use crate::utils::{days_in_month, mean_of_present};

/// Average weather of one day-of-month.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ClimatologyDayRecord {
    pub day_of_month: u32,
    pub cloud_cover_pct: f64,
    pub max_temperature_c: f64,
    pub precipitation_mm: f64,
    pub wind_speed_kmh: f64,
    pub pm2_5: f64,
    pub ozone: f64,
}

/// One observed day of one historical year.
#[derive(Debug, Clone, Copy, Default)]
struct Observation {
    cloud_cover_pct: Option<f64>,
    max_temperature_c: Option<f64>,
    precipitation_mm: Option<f64>,
    wind_speed_kmh: Option<f64>,
    pm2_5: f64,
    ozone: f64,
}

/// Climatology of one target month.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct MonthlyClimatology {
    pub year: i32,
    pub month: u32,
    pub days: BTreeMap<u32, ClimatologyDayRecord>,
    /// Historical years that contributed data, oldest first.
    pub years_used: Vec<i32>,
}

impl MonthlyClimatology {
    pub fn is_empty(&self) -> bool {
        self.days.is_empty()
    }

    pub fn day(&self, day_of_month: u32) -> Option<&ClimatologyDayRecord> {
        self.days.get(&day_of_month)
    }
}

/// Aggregate `month` over the `historical_years` years before `year`.
///
/// A year whose daily weather cannot be fetched is dropped. A year whose air
/// quality cannot be fetched keeps its weather and uses baseline PM2.5 and
/// ozone. When every year fails the result is empty.
pub fn aggregate_month(
    provider: &dyn WeatherProvider,
    location: &Location,
    year: i32,
    month: u32,
    historical_years: i32,
) -> MonthlyClimatology {
    let mut buckets: BTreeMap<u32, Vec<Observation>> = BTreeMap::new();
    let mut years_used = Vec::new();

    for past_year in (year - historical_years)..year {
        let Some(last_day) = days_in_month(past_year, month) else {
            continue;
        };
        let (Some(start), Some(end)) = (
            NaiveDate::from_ymd_opt(past_year, month, 1),
            NaiveDate::from_ymd_opt(past_year, month, last_day),
        ) else {
            continue;
        };

        let daily = match provider.fetch_daily(location.latitude, location.longitude, start, end)
        {
            Ok(daily) => daily,
            Err(e) => {
                Log::log_warning(&format!(
                    "Weather for {} unavailable ({}), year dropped",
                    start.format("%B %Y"),
                    e
                ));
                continue;
            }
        };

        let air_quality =
            match provider.fetch_hourly(location.latitude, location.longitude, start, end) {
                Ok(hourly) => hourly.daily_means(),
                Err(e) => {
                    Log::log_indented(&format!(
                        "Air quality for {} unavailable ({}), using baseline values",
                        start.format("%B %Y"),
                        e
                    ));
                    BTreeMap::new()
                }
            };

        let mut rows = 0;
        for (index, date) in daily.time.iter().enumerate() {
            if date.year() != past_year || date.month() != month {
                continue;
            }
            let quality = air_quality.get(date).copied().unwrap_or_default();
            buckets.entry(date.day()).or_default().push(Observation {
                cloud_cover_pct: daily.cloud_cover_mean.get(index).copied().flatten(),
                max_temperature_c: daily.temperature_2m_max.get(index).copied().flatten(),
                precipitation_mm: daily.precipitation_sum.get(index).copied().flatten(),
                wind_speed_kmh: daily.wind_speed_10m_max.get(index).copied().flatten(),
                pm2_5: quality.pm2_5.unwrap_or(DEFAULT_PM2_5),
                ozone: quality.ozone.unwrap_or(DEFAULT_OZONE),
            });
            rows += 1;
        }

        Log::log_detail(&format!("{}: {} daily rows", start.format("%B %Y"), rows));
        years_used.push(past_year);
    }

    // Day 29 of a historical leap February has no counterpart in a short target month
    let target_length = days_in_month(year, month).unwrap_or(31);
    let days = buckets
        .into_iter()
        .filter(|(day, _)| *day <= target_length)
        .filter_map(|(day, observations)| average_bucket(day, &observations))
        .map(|record| (record.day_of_month, record))
        .collect();

    MonthlyClimatology {
        year,
        month,
        days,
        years_used,
    }
}

/// Mean of every field; `None` when a weather field was never observed.
fn average_bucket(day_of_month: u32, observations: &[Observation]) -> Option<ClimatologyDayRecord> {
    Some(ClimatologyDayRecord {
        day_of_month,
        cloud_cover_pct: mean_of_present(observations.iter().map(|o| o.cloud_cover_pct))?,
        max_temperature_c: mean_of_present(observations.iter().map(|o| o.max_temperature_c))?,
        precipitation_mm: mean_of_present(observations.iter().map(|o| o.precipitation_mm))?,
        wind_speed_kmh: mean_of_present(observations.iter().map(|o| o.wind_speed_kmh))?,
        pm2_5: mean_of_present(observations.iter().map(|o| Some(o.pm2_5)))?,
        ozone: mean_of_present(observations.iter().map(|o| Some(o.ozone)))?,
    })
}

/// Climatologies of every month a window touches.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ClimatologyTable {
    months: BTreeMap<(i32, u32), MonthlyClimatology>,
}

impl ClimatologyTable {
    pub fn from_months(months: impl IntoIterator<Item = MonthlyClimatology>) -> Self {
        Self {
            months: months.into_iter().map(|m| ((m.year, m.month), m)).collect(),
        }
    }

    /// Aggregate each `(year, month)` in turn.
    pub fn build(
        provider: &dyn WeatherProvider,
        location: &Location,
        months: &[(i32, u32)],
        historical_years: i32,
    ) -> Self {
        Self::from_months(months.iter().map(|&(year, month)| {
            aggregate_month(provider, location, year, month, historical_years)
        }))
    }

    /// The bucket matching `date`'s month and day-of-month.
    pub fn lookup(&self, date: NaiveDate) -> Option<&ClimatologyDayRecord> {
        self.months
            .get(&(date.year(), date.month()))
            .and_then(|month| month.day(date.day()))
    }

    pub fn month(&self, year: i32, month: u32) -> Option<&MonthlyClimatology> {
        self.months.get(&(year, month))
    }

    /// True when no month has any usable bucket.
    pub fn is_empty(&self) -> bool {
        self.months.values().all(MonthlyClimatology::is_empty)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::climate::provider::{DailyWeather, HourlyAirQuality, MockWeatherProvider};
    use crate::error::ProviderError;
    use chrono::{Duration, NaiveDateTime};
    use chrono_tz::Tz;

    fn location() -> Location {
        Location::new("Bristol", 51.45, -2.58, Tz::Europe__London).unwrap()
    }

    /// Daily weather where every value depends on the year, so averages are checkable.
    fn daily_for(start: NaiveDate, end: NaiveDate) -> DailyWeather {
        let mut daily = DailyWeather::default();
        let offset = (start.year() - 2020) as f64;
        let mut date = start;
        while date <= end {
            daily.time.push(date);
            daily.temperature_2m_max.push(Some(10.0 + offset));
            daily.precipitation_sum.push(Some(0.0));
            daily.cloud_cover_mean.push(Some(20.0 * offset));
            daily.wind_speed_10m_max.push(Some(5.0));
            date += Duration::days(1);
        }
        daily
    }

    fn hourly_for(start: NaiveDate, end: NaiveDate, pm: f64) -> HourlyAirQuality {
        let mut hourly = HourlyAirQuality {
            pm2_5: Some(Vec::new()),
            ozone: Some(Vec::new()),
            ..Default::default()
        };
        let mut date = start;
        while date <= end {
            for hour in [6, 18] {
                let time: NaiveDateTime = date.and_hms_opt(hour, 0, 0).unwrap();
                hourly.time.push(time);
                hourly.pm2_5.as_mut().unwrap().push(Some(pm));
                hourly.ozone.as_mut().unwrap().push(Some(320.0));
            }
            date += Duration::days(1);
        }
        hourly
    }

    #[test]
    fn test_averages_same_day_across_years() {
        Log::set_enabled(false);
        let mut provider = MockWeatherProvider::new();
        provider
            .expect_fetch_daily()
            .times(3)
            .returning(|_, _, start, end| Ok(daily_for(start, end)));
        provider
            .expect_fetch_hourly()
            .returning(|_, _, start, end| Ok(hourly_for(start, end, 8.0)));

        let climatology = aggregate_month(&provider, &location(), 2026, 4, 3);
        assert_eq!(climatology.years_used, vec![2023, 2024, 2025]);
        assert_eq!(climatology.days.len(), 30);

        let day = climatology.day(1).unwrap();
        // Years 2023..2025 give offsets 3, 4, 5
        assert_eq!(day.max_temperature_c, 14.0);
        assert_eq!(day.cloud_cover_pct, 80.0);
        assert_eq!(day.pm2_5, 8.0);
        assert_eq!(day.ozone, 320.0);
    }

    #[test]
    fn test_failed_year_is_dropped() {
        Log::set_enabled(false);
        let mut provider = MockWeatherProvider::new();
        provider.expect_fetch_daily().returning(|_, _, start, end| {
            if start.year() == 2024 {
                Err(ProviderError::Status(500))
            } else {
                Ok(daily_for(start, end))
            }
        });
        provider
            .expect_fetch_hourly()
            .returning(|_, _, start, end| Ok(hourly_for(start, end, 8.0)));

        let climatology = aggregate_month(&provider, &location(), 2026, 4, 3);
        assert_eq!(climatology.years_used, vec![2023, 2025]);
        assert_eq!(climatology.day(15).unwrap().max_temperature_c, 14.0);
    }

    #[test]
    fn test_all_years_failing_gives_empty_climatology() {
        Log::set_enabled(false);
        let mut provider = MockWeatherProvider::new();
        provider
            .expect_fetch_daily()
            .times(3)
            .returning(|_, _, _, _| Err(ProviderError::Transport("offline".into())));
        provider.expect_fetch_hourly().never();

        let climatology = aggregate_month(&provider, &location(), 2026, 4, 3);
        assert!(climatology.is_empty());
        assert!(climatology.years_used.is_empty());

        let table = ClimatologyTable::from_months([climatology]);
        assert!(table.is_empty());
    }

    #[test]
    fn test_missing_air_quality_uses_baseline() {
        Log::set_enabled(false);
        let mut provider = MockWeatherProvider::new();
        provider
            .expect_fetch_daily()
            .returning(|_, _, start, end| Ok(daily_for(start, end)));
        provider.expect_fetch_hourly().returning(|_, _, start, _| {
            if start.year() == 2025 {
                Err(ProviderError::Status(404))
            } else {
                Ok(HourlyAirQuality::default())
            }
        });

        let climatology = aggregate_month(&provider, &location(), 2026, 4, 3);
        let day = climatology.day(10).unwrap();
        assert_eq!(day.pm2_5, DEFAULT_PM2_5);
        assert_eq!(day.ozone, DEFAULT_OZONE);
        assert_eq!(climatology.years_used.len(), 3);
    }

    #[test]
    fn test_bucket_without_weather_values_is_absent() {
        Log::set_enabled(false);
        let mut provider = MockWeatherProvider::new();
        provider.expect_fetch_daily().returning(|_, _, start, end| {
            let mut daily = daily_for(start, end);
            daily.cloud_cover_mean[4] = None; // day 5 never has cloud data
            Ok(daily)
        });
        provider
            .expect_fetch_hourly()
            .returning(|_, _, _, _| Ok(HourlyAirQuality::default()));

        let climatology = aggregate_month(&provider, &location(), 2026, 4, 3);
        assert!(climatology.day(5).is_none());
        assert!(climatology.day(6).is_some());
    }

    #[test]
    fn test_leap_day_not_reported_for_short_february() {
        Log::set_enabled(false);
        let mut provider = MockWeatherProvider::new();
        provider
            .expect_fetch_daily()
            .returning(|_, _, start, end| Ok(daily_for(start, end)));
        provider
            .expect_fetch_hourly()
            .returning(|_, _, _, _| Ok(HourlyAirQuality::default()));

        // 2024 is a leap year inside the 2023..=2025 history of February 2026
        let climatology = aggregate_month(&provider, &location(), 2026, 2, 3);
        assert_eq!(climatology.days.len(), 28);
        assert!(climatology.day(29).is_none());
    }

    #[test]
    fn test_table_lookup_by_month_and_day() {
        let record = |day| ClimatologyDayRecord {
            day_of_month: day,
            cloud_cover_pct: 10.0,
            max_temperature_c: 5.0,
            precipitation_mm: 0.0,
            wind_speed_kmh: 3.0,
            pm2_5: 5.0,
            ozone: 300.0,
        };
        let december = MonthlyClimatology {
            year: 2026,
            month: 12,
            days: [(31, record(31))].into_iter().collect(),
            years_used: vec![2025],
        };
        let january = MonthlyClimatology {
            year: 2027,
            month: 1,
            days: [(1, record(1))].into_iter().collect(),
            years_used: vec![2026],
        };
        let table = ClimatologyTable::from_months([december, january]);

        assert!(table.lookup(NaiveDate::from_ymd_opt(2026, 12, 31).unwrap()).is_some());
        assert!(table.lookup(NaiveDate::from_ymd_opt(2027, 1, 1).unwrap()).is_some());
        assert!(table.lookup(NaiveDate::from_ymd_opt(2026, 1, 1).unwrap()).is_none());
        assert!(!table.is_empty());
    }
}
