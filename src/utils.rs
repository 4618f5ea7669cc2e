//! Utility functions shared across the codebase.
//!
//! Small numeric and calendar helpers used by the scoring and climatology code.

use chrono::{Datelike, NaiveDate};

/// Round a value to a fixed number of decimal places.
///
/// # Examples
/// ```
/// use bigring::utils::round_to;
/// assert_eq!(round_to(0.123456, 4), 0.1235);
/// assert_eq!(round_to(2.5, 0), 3.0);
/// ```
pub fn round_to(value: f64, decimals: i32) -> f64 {
    let factor = 10f64.powi(decimals);
    (value * factor).round() / factor
}

/// Arithmetic mean of the present values, `None` when nothing is present.
///
/// # Examples
/// ```
/// use bigring::utils::mean_of_present;
/// assert_eq!(mean_of_present([Some(1.0), None, Some(3.0)]), Some(2.0));
/// assert_eq!(mean_of_present([None, None]), None);
/// ```
pub fn mean_of_present<I>(values: I) -> Option<f64>
where
    I: IntoIterator<Item = Option<f64>>,
{
    let (sum, count) = values
        .into_iter()
        .flatten()
        .filter(|v| v.is_finite())
        .fold((0.0, 0usize), |(sum, count), v| (sum + v, count + 1));

    if count == 0 { None } else { Some(sum / count as f64) }
}

/// Number of days in the given month, `None` for an invalid month.
///
/// # Examples
/// ```
/// use bigring::utils::days_in_month;
/// assert_eq!(days_in_month(2024, 2), Some(29));
/// assert_eq!(days_in_month(2023, 2), Some(28));
/// assert_eq!(days_in_month(2023, 13), None);
/// ```
pub fn days_in_month(year: i32, month: u32) -> Option<u32> {
    let first = NaiveDate::from_ymd_opt(year, month, 1)?;
    let next = if month == 12 {
        NaiveDate::from_ymd_opt(year + 1, 1, 1)?
    } else {
        NaiveDate::from_ymd_opt(year, month + 1, 1)?
    };
    Some(next.signed_duration_since(first).num_days() as u32)
}

/// The month following `(year, month)`, wrapping December into January of the next year.
pub fn next_month(year: i32, month: u32) -> (i32, u32) {
    if month >= 12 { (year + 1, 1) } else { (year, month + 1) }
}

/// The next occurrence of `month` on or after the month of `from`.
///
/// # Examples
/// ```
/// use bigring::utils::upcoming_month;
/// use chrono::NaiveDate;
/// let from = NaiveDate::from_ymd_opt(2026, 10, 19).unwrap();
/// assert_eq!(upcoming_month(from, 12), (2026, 12));
/// assert_eq!(upcoming_month(from, 10), (2026, 10));
/// assert_eq!(upcoming_month(from, 3), (2027, 3));
/// ```
pub fn upcoming_month(from: NaiveDate, month: u32) -> (i32, u32) {
    if month < from.month() {
        (from.year() + 1, month)
    } else {
        (from.year(), month)
    }
}

/// Distinct `(year, month)` pairs of a date sequence, in first-seen order.
pub fn distinct_months<I>(dates: I) -> Vec<(i32, u32)>
where
    I: IntoIterator<Item = NaiveDate>,
{
    let mut months: Vec<(i32, u32)> = Vec::new();
    for date in dates {
        let key = (date.year(), date.month());
        if !months.contains(&key) {
            months.push(key);
        }
    }
    months
}

/// Format a latitude/longitude pair with hemisphere letters.
pub fn format_coordinates(latitude: f64, longitude: f64) -> String {
    format!(
        "{:.4}°{}, {:.4}°{}",
        latitude.abs(),
        if latitude >= 0.0 { "N" } else { "S" },
        longitude.abs(),
        if longitude >= 0.0 { "E" } else { "W" }
    )
}

/// Convert a path to a display-friendly string, replacing the home directory with ~
pub fn path_for_display(path: &std::path::Path) -> String {
    if let Some(home) = dirs::home_dir() {
        if let Ok(stripped) = path.strip_prefix(&home) {
            return format!("~/{}", stripped.display());
        }
    }
    path.display().to_string()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_round_to_four_places() {
        assert_eq!(round_to(0.91234, 4), 0.9123);
        assert_eq!(round_to(0.91235001, 4), 0.9124);
        assert_eq!(round_to(-0.00004, 4), -0.0);
    }

    #[test]
    fn test_mean_ignores_missing_and_non_finite() {
        assert_eq!(mean_of_present([Some(2.0), Some(f64::NAN), Some(4.0)]), Some(3.0));
        assert_eq!(mean_of_present(Vec::<Option<f64>>::new()), None);
    }

    #[test]
    fn test_days_in_month_edges() {
        assert_eq!(days_in_month(2025, 12), Some(31));
        assert_eq!(days_in_month(2025, 4), Some(30));
        assert_eq!(days_in_month(2100, 2), Some(28));
        assert_eq!(days_in_month(2000, 2), Some(29));
        assert_eq!(days_in_month(2025, 0), None);
    }

    #[test]
    fn test_next_month_wraps_year() {
        assert_eq!(next_month(2026, 12), (2027, 1));
        assert_eq!(next_month(2026, 4), (2026, 5));
    }

    #[test]
    fn test_distinct_months_keeps_order() {
        let start = NaiveDate::from_ymd_opt(2026, 12, 20).unwrap();
        let dates = (0..30).map(|i| start + chrono::Duration::days(i));
        assert_eq!(distinct_months(dates), vec![(2026, 12), (2027, 1)]);
    }

    #[test]
    fn test_format_coordinates() {
        assert_eq!(format_coordinates(51.5, -0.25), "51.5000°N, 0.2500°W");
        assert_eq!(format_coordinates(-33.9, 151.2), "33.9000°S, 151.2000°E");
    }

    #[test]
    fn test_path_for_display() {
        use std::path::PathBuf;

        if let Some(home) = dirs::home_dir() {
            let path = home.join("test").join("file.txt");
            assert_eq!(path_for_display(&path), "~/test/file.txt");
        }

        let path = PathBuf::from("/etc/bigring.toml");
        assert_eq!(path_for_display(&path), "/etc/bigring.toml");
    }
}
