//! Historical weather and air-quality data from Open-Meteo.
//!
//! Two endpoints are used: the ERA5 archive for daily weather and the CAMS
//! air-quality API for hourly PM2.5 and ozone. Both answer with column arrays
//! aligned to a `time` array; any column may be absent or contain nulls.

use chrono::{NaiveDate, NaiveDateTime};
use serde::Deserialize;
use std::collections::BTreeMap;
use std::time::Duration;
use ureq::Agent;

use super::retry::RetryPolicy;
use crate::constants::{
    DEFAULT_AIR_QUALITY_URL, DEFAULT_REQUEST_TIMEOUT_SECS, DEFAULT_WEATHER_ARCHIVE_URL,
};
use crate::error::ProviderError;
use crate::utils::mean_of_present;

const DAILY_FIELDS: &str = "temperature_2m_max,precipitation_sum,cloud_cover_mean,wind_speed_10m_max";
const HOURLY_FIELDS: &str = "pm2_5,ozone";

/// Daily weather rows of one request, one entry per date.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct DailyWeather {
    pub time: Vec<NaiveDate>,
    pub temperature_2m_max: Vec<Option<f64>>,
    pub precipitation_sum: Vec<Option<f64>>,
    pub cloud_cover_mean: Vec<Option<f64>>,
    pub wind_speed_10m_max: Vec<Option<f64>>,
}

/// Hourly air-quality rows. A `None` series was omitted by the provider.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct HourlyAirQuality {
    pub time: Vec<NaiveDateTime>,
    pub pm2_5: Option<Vec<Option<f64>>>,
    pub ozone: Option<Vec<Option<f64>>>,
}

/// Air quality averaged over one calendar date.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct DailyAirQuality {
    pub pm2_5: Option<f64>,
    pub ozone: Option<f64>,
}

impl HourlyAirQuality {
    /// Mean of each series per calendar date of the local timestamps.
    pub fn daily_means(&self) -> BTreeMap<NaiveDate, DailyAirQuality> {
        let mut buckets: BTreeMap<NaiveDate, (Vec<Option<f64>>, Vec<Option<f64>>)> =
            BTreeMap::new();

        for (index, time) in self.time.iter().enumerate() {
            let (pm, ozone) = buckets.entry(time.date()).or_default();
            pm.push(value_at(self.pm2_5.as_deref(), index));
            ozone.push(value_at(self.ozone.as_deref(), index));
        }

        buckets
            .into_iter()
            .map(|(date, (pm, ozone))| {
                (
                    date,
                    DailyAirQuality {
                        pm2_5: mean_of_present(pm),
                        ozone: mean_of_present(ozone),
                    },
                )
            })
            .collect()
    }
}

fn value_at(series: Option<&[Option<f64>]>, index: usize) -> Option<f64> {
    series.and_then(|values| values.get(index).copied().flatten())
}

/// Source of historical daily weather and hourly air quality.
///
/// Both calls cover `start..=end` inclusive, in the location's local time.
#[cfg_attr(test, mockall::automock)]
pub trait WeatherProvider {
    fn fetch_daily(
        &self,
        latitude: f64,
        longitude: f64,
        start: NaiveDate,
        end: NaiveDate,
    ) -> Result<DailyWeather, ProviderError>;

    fn fetch_hourly(
        &self,
        latitude: f64,
        longitude: f64,
        start: NaiveDate,
        end: NaiveDate,
    ) -> Result<HourlyAirQuality, ProviderError>;
}

/// Endpoints, timeout and retry behavior of [`OpenMeteoClient`].
#[derive(Debug, Clone, PartialEq)]
pub struct ProviderSettings {
    pub archive_url: String,
    pub air_quality_url: String,
    pub timeout: Duration,
    pub retry: RetryPolicy,
}

impl Default for ProviderSettings {
    fn default() -> Self {
        Self {
            archive_url: DEFAULT_WEATHER_ARCHIVE_URL.to_string(),
            air_quality_url: DEFAULT_AIR_QUALITY_URL.to_string(),
            timeout: Duration::from_secs(DEFAULT_REQUEST_TIMEOUT_SECS),
            retry: RetryPolicy::default(),
        }
    }
}

/// Blocking Open-Meteo client.
pub struct OpenMeteoClient {
    agent: Agent,
    settings: ProviderSettings,
}

impl OpenMeteoClient {
    pub fn new(settings: ProviderSettings) -> Self {
        let config = Agent::config_builder()
            .timeout_global(Some(settings.timeout))
            .build();

        Self {
            agent: config.into(),
            settings,
        }
    }

    fn get(&self, url: &str, query: &[(&str, String)]) -> Result<String, ProviderError> {
        self.settings.retry.run(url, || {
            let mut request = self.agent.get(url);
            for (key, value) in query {
                request = request.query(*key, value);
            }
            Ok(request.call()?.body_mut().read_to_string()?)
        })
    }
}

fn range_query(
    latitude: f64,
    longitude: f64,
    start: NaiveDate,
    end: NaiveDate,
) -> Vec<(&'static str, String)> {
    vec![
        ("latitude", format!("{:.4}", latitude)),
        ("longitude", format!("{:.4}", longitude)),
        ("start_date", start.format("%Y-%m-%d").to_string()),
        ("end_date", end.format("%Y-%m-%d").to_string()),
        ("timezone", "auto".to_string()),
    ]
}

impl WeatherProvider for OpenMeteoClient {
    fn fetch_daily(
        &self,
        latitude: f64,
        longitude: f64,
        start: NaiveDate,
        end: NaiveDate,
    ) -> Result<DailyWeather, ProviderError> {
        let mut query = range_query(latitude, longitude, start, end);
        query.push(("daily", DAILY_FIELDS.to_string()));
        let body = self.get(&self.settings.archive_url, &query)?;
        parse_archive(&body)
    }

    fn fetch_hourly(
        &self,
        latitude: f64,
        longitude: f64,
        start: NaiveDate,
        end: NaiveDate,
    ) -> Result<HourlyAirQuality, ProviderError> {
        let mut query = range_query(latitude, longitude, start, end);
        query.push(("hourly", HOURLY_FIELDS.to_string()));
        let body = self.get(&self.settings.air_quality_url, &query)?;
        parse_air_quality(&body)
    }
}

// ═══ Response Decoding ═══

#[derive(Debug, Deserialize)]
struct ArchiveResponse {
    daily: Option<DailySeries>,
}

#[derive(Debug, Deserialize)]
struct DailySeries {
    #[serde(default)]
    time: Vec<String>,
    #[serde(default)]
    temperature_2m_max: Option<Vec<Option<f64>>>,
    #[serde(default)]
    precipitation_sum: Option<Vec<Option<f64>>>,
    #[serde(default)]
    cloud_cover_mean: Option<Vec<Option<f64>>>,
    #[serde(default)]
    wind_speed_10m_max: Option<Vec<Option<f64>>>,
}

#[derive(Debug, Deserialize)]
struct AirQualityResponse {
    hourly: Option<HourlySeries>,
}

#[derive(Debug, Deserialize)]
struct HourlySeries {
    #[serde(default)]
    time: Vec<String>,
    #[serde(default)]
    pm2_5: Option<Vec<Option<f64>>>,
    #[serde(default)]
    ozone: Option<Vec<Option<f64>>>,
}

/// Pad or cut a column to the length of its time axis.
fn aligned(series: Option<Vec<Option<f64>>>, len: usize) -> Vec<Option<f64>> {
    let mut values = series.unwrap_or_default();
    values.resize(len, None);
    values
}

/// Decode an archive response body into daily rows.
pub fn parse_archive(body: &str) -> Result<DailyWeather, ProviderError> {
    let response: ArchiveResponse = serde_json::from_str(body)?;
    let daily = response.daily.ok_or(ProviderError::MissingSeries("daily"))?;

    let time = daily
        .time
        .iter()
        .map(|t| {
            NaiveDate::parse_from_str(t, "%Y-%m-%d")
                .map_err(|e| ProviderError::Decode(format!("bad date '{}': {}", t, e)))
        })
        .collect::<Result<Vec<_>, _>>()?;
    let len = time.len();

    Ok(DailyWeather {
        time,
        temperature_2m_max: aligned(daily.temperature_2m_max, len),
        precipitation_sum: aligned(daily.precipitation_sum, len),
        cloud_cover_mean: aligned(daily.cloud_cover_mean, len),
        wind_speed_10m_max: aligned(daily.wind_speed_10m_max, len),
    })
}

/// Decode an air-quality response body. A missing `hourly` block yields no rows.
pub fn parse_air_quality(body: &str) -> Result<HourlyAirQuality, ProviderError> {
    let response: AirQualityResponse = serde_json::from_str(body)?;
    let Some(hourly) = response.hourly else {
        return Ok(HourlyAirQuality::default());
    };

    let time = hourly
        .time
        .iter()
        .map(|t| {
            NaiveDateTime::parse_from_str(t, "%Y-%m-%dT%H:%M")
                .map_err(|e| ProviderError::Decode(format!("bad timestamp '{}': {}", t, e)))
        })
        .collect::<Result<Vec<_>, _>>()?;
    let len = time.len();

    Ok(HourlyAirQuality {
        time,
        pm2_5: hourly.pm2_5.map(|s| aligned(Some(s), len)),
        ozone: hourly.ozone.map(|s| aligned(Some(s), len)),
    })
}

impl From<ureq::Error> for ProviderError {
    fn from(e: ureq::Error) -> Self {
        match e {
            ureq::Error::StatusCode(code) => ProviderError::Status(code),
            other => ProviderError::Transport(other.to_string()),
        }
    }
}

impl From<serde_json::Error> for ProviderError {
    fn from(e: serde_json::Error) -> Self {
        ProviderError::Decode(e.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const ARCHIVE_BODY: &str = r#"{
        "latitude": 51.5,
        "longitude": -0.12,
        "timezone": "Europe/London",
        "daily_units": {"time": "iso8601", "temperature_2m_max": "°C"},
        "daily": {
            "time": ["2023-04-01", "2023-04-02", "2023-04-03"],
            "temperature_2m_max": [12.1, 13.4, null],
            "precipitation_sum": [0.0, 2.4, 0.3],
            "cloud_cover_mean": [40.0, 85.0, 60.0],
            "wind_speed_10m_max": [10.2, 22.0]
        }
    }"#;

    #[test]
    fn test_parse_archive_aligns_columns() {
        let daily = parse_archive(ARCHIVE_BODY).unwrap();
        assert_eq!(daily.time.len(), 3);
        assert_eq!(daily.time[0], NaiveDate::from_ymd_opt(2023, 4, 1).unwrap());
        assert_eq!(daily.temperature_2m_max[2], None);
        assert_eq!(daily.precipitation_sum[1], Some(2.4));
        // Short column padded with nulls
        assert_eq!(daily.wind_speed_10m_max, vec![Some(10.2), Some(22.0), None]);
    }

    #[test]
    fn test_parse_archive_without_daily_block() {
        let result = parse_archive(r#"{"latitude": 1.0}"#);
        assert_eq!(result, Err(ProviderError::MissingSeries("daily")));
    }

    #[test]
    fn test_parse_archive_rejects_garbage() {
        assert!(matches!(
            parse_archive("<html>busy</html>"),
            Err(ProviderError::Decode(_))
        ));
    }

    #[test]
    fn test_parse_air_quality_and_daily_means() {
        let body = r#"{
            "hourly": {
                "time": ["2023-04-01T00:00", "2023-04-01T01:00", "2023-04-02T00:00"],
                "pm2_5": [8.0, 12.0, null],
                "ozone": [280.0, 300.0, 320.0]
            }
        }"#;
        let hourly = parse_air_quality(body).unwrap();
        let means = hourly.daily_means();

        let first = means[&NaiveDate::from_ymd_opt(2023, 4, 1).unwrap()];
        assert_eq!(first.pm2_5, Some(10.0));
        assert_eq!(first.ozone, Some(290.0));

        let second = means[&NaiveDate::from_ymd_opt(2023, 4, 2).unwrap()];
        assert_eq!(second.pm2_5, None);
        assert_eq!(second.ozone, Some(320.0));
    }

    #[test]
    fn test_parse_air_quality_missing_series() {
        let hourly = parse_air_quality(r#"{"hourly": {"time": ["2023-04-01T00:00"], "ozone": [300.0]}}"#)
            .unwrap();
        assert!(hourly.pm2_5.is_none());
        assert_eq!(hourly.ozone, Some(vec![Some(300.0)]));

        let empty = parse_air_quality(r#"{"latitude": 1.0}"#).unwrap();
        assert!(empty.time.is_empty());
        assert!(empty.daily_means().is_empty());
    }

    #[test]
    fn test_ureq_status_maps_to_provider_status() {
        let error: ProviderError = ureq::Error::StatusCode(502).into();
        assert_eq!(error, ProviderError::Status(502));
        assert!(error.is_transient());
    }
}
