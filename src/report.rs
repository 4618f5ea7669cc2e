//! Console rendering of plans and weather outlooks.

use chrono::{DateTime, NaiveDate};
use chrono_tz::Tz;

use crate::engine::{ProposalPlan, Recommendation, WeatherOutlook};
use crate::logger::Log;
use crate::scoring::WeatherDay;

const PINK_UNAVAILABLE: &str = "Not available for this date.";

/// `"Saturday, 02 May 2026"`
pub fn format_long_date(date: NaiveDate) -> String {
    date.format("%A, %d %B %Y").to_string()
}

/// Score in `[0, 1]` as a whole percentage.
pub fn format_percent(score: f64) -> String {
    format!("{:.0}%", score * 100.0)
}

/// `"HH:MM ~ HH:MM"` in the times' own timezone.
pub fn format_span(start: DateTime<Tz>, end: DateTime<Tz>) -> String {
    format!("{} ~ {}", start.format("%H:%M"), end.format("%H:%M"))
}

/// Detail lines of one recommended day.
pub fn recommendation_lines(recommendation: &Recommendation) -> Vec<String> {
    let day = &recommendation.day;
    let mut lines = vec![format!(
        "Romance score: {} (twilight {}, weather {})",
        format_percent(day.romance_score),
        format_percent(day.twilight_score),
        if day.has_weather {
            format_percent(day.weather_score)
        } else {
            "n/a".to_string()
        }
    )];

    if let Some(sun) = &recommendation.sun {
        lines.push(format!("Civil twilight: {}", format_span(sun.sunset, sun.dusk)));
    }

    lines.push(format!(
        "Pink time: {}",
        recommendation
            .pink
            .map(|pink| format_span(pink.start, pink.end))
            .unwrap_or_else(|| PINK_UNAVAILABLE.to_string())
    ));
    lines.push(day.vibe.to_string());
    lines
}

/// Detail lines of one day of a weather outlook.
pub fn weather_day_lines(day: &WeatherDay) -> Vec<String> {
    let record = &day.record;
    vec![
        format!("Weather score: {}", format_percent(day.breakdown.score)),
        format!(
            "Clouds {:.0}%, max {:.1}°C, rain {:.1} mm, wind {:.1} km/h",
            record.cloud_cover_pct,
            record.max_temperature_c,
            record.precipitation_mm,
            record.wind_speed_kmh
        ),
        format!("PM2.5 {:.1} µg/m³, ozone {:.0}", record.pm2_5, record.ozone),
        day.vibe.to_string(),
    ]
}

/// Caveats shown above the recommendations.
pub fn plan_notes(plan: &ProposalPlan) -> Vec<String> {
    let mut notes = Vec::new();
    if plan.skipped_days > 0 {
        notes.push(format!(
            "{} day(s) skipped due to White Night conditions.",
            plan.skipped_days
        ));
    }
    if !plan.weather_available {
        notes.push("Ranked by twilight alone, no weather history was available".to_string());
    }
    notes
}

pub fn print_plan(plan: &ProposalPlan) {
    Log::log_block_start(&format!(
        "Best days to propose in {} ({} days from {})",
        plan.location.name,
        plan.window_days,
        format_long_date(plan.start)
    ));

    for note in plan_notes(plan) {
        Log::log_warning(&note);
    }

    for recommendation in &plan.recommendations {
        Log::log_block_start(&format!(
            "#{} {}",
            recommendation.rank,
            format_long_date(recommendation.day.date)
        ));
        for line in recommendation_lines(recommendation) {
            Log::log_indented(&line);
        }
    }
}

pub fn print_outlook(outlook: &WeatherOutlook) {
    let month_name = NaiveDate::from_ymd_opt(outlook.year, outlook.month, 1)
        .map(|d| d.format("%B %Y").to_string())
        .unwrap_or_else(|| format!("{}-{:02}", outlook.year, outlook.month));

    Log::log_block_start(&format!(
        "Best weather in {} for {} ({} years of history)",
        outlook.location.name,
        month_name,
        outlook.years_used.len()
    ));

    for (index, day) in outlook.days.iter().enumerate() {
        Log::log_block_start(&format!("#{} {}", index + 1, format_long_date(day.date)));
        for line in weather_day_lines(day) {
            Log::log_indented(&line);
        }
    }
}
