use bigring::astro::lunar::illuminated_fraction;
use bigring::climate::ClimatologyDayRecord;
use bigring::constants::*;
use bigring::scoring::normalize::min_max;
use bigring::scoring::{
    ScoredDay, Vibe, VibeThresholds, WeatherBreakdown, order_by_score, romance_score, top_n,
};
use chrono::{Duration, NaiveDate};
use proptest::prelude::*;

fn bucket(
    cloud: f64,
    temperature: f64,
    precipitation: f64,
    wind: f64,
    pm2_5: f64,
    ozone: f64,
) -> ClimatologyDayRecord {
    ClimatologyDayRecord {
        day_of_month: 1,
        cloud_cover_pct: cloud,
        max_temperature_c: temperature,
        precipitation_mm: precipitation,
        wind_speed_kmh: wind,
        pm2_5,
        ozone,
    }
}

fn scored(date: NaiveDate, romance: f64) -> ScoredDay {
    ScoredDay {
        date,
        twilight_score: 0.0,
        weather_score: 0.0,
        vibe: Vibe::Earth,
        romance_score: romance,
        has_weather: true,
    }
}

proptest! {
    #![proptest_config(ProptestConfig {
        cases: 500,
        ..ProptestConfig::default()
    })]

    /// Illumination stays in [0, 1] and repeats every synodic month
    #[test]
    fn test_moon_illumination_periodic_and_bounded(age in -1000.0f64..1000.0) {
        let fraction = illuminated_fraction(age);
        prop_assert!((0.0..=1.0).contains(&fraction));

        let next_cycle = illuminated_fraction(age + SYNODIC_MONTH_DAYS);
        prop_assert!((fraction - next_cycle).abs() < 1e-9);
    }

    /// A column with any spread is stretched to exactly [0, 1]
    #[test]
    fn test_normalized_column_spans_unit_interval(
        values in prop::collection::vec(-1.0e9f64..1.0e9, 2..60)
    ) {
        let min = values.iter().copied().fold(f64::INFINITY, f64::min);
        let max = values.iter().copied().fold(f64::NEG_INFINITY, f64::max);
        prop_assume!(max > min);

        let normalized = min_max(&values);
        let low = normalized.iter().copied().fold(f64::INFINITY, f64::min);
        let high = normalized.iter().copied().fold(f64::NEG_INFINITY, f64::max);
        prop_assert_eq!(low, 0.0);
        prop_assert_eq!(high, 1.0);
    }

    /// Raising either input never lowers the romance score
    #[test]
    fn test_romance_score_monotone(
        a in 0.0f64..=1.0,
        b in 0.0f64..=1.0,
        fixed in 0.0f64..=1.0,
    ) {
        let (low, high) = if a <= b { (a, b) } else { (b, a) };
        prop_assert!(romance_score(low, fixed) <= romance_score(high, fixed));
        prop_assert!(romance_score(fixed, low) <= romance_score(fixed, high));
    }

    /// Equal scores keep calendar order; higher scores come first
    #[test]
    fn test_ranking_is_stable_for_ties(
        scores in prop::collection::vec(prop_oneof![Just(0.25), Just(0.5), Just(0.75)], 1..40),
        rotation in 0usize..40,
    ) {
        let start = NaiveDate::from_ymd_opt(2026, 6, 1).unwrap();
        let mut days: Vec<ScoredDay> = scores
            .iter()
            .enumerate()
            .map(|(i, score)| scored(start + Duration::days(i as i64), *score))
            .collect();
        let len = days.len();
        days.rotate_left(rotation % len);

        let ordered = order_by_score(days);
        for pair in ordered.windows(2) {
            prop_assert!(pair[0].romance_score >= pair[1].romance_score);
            if pair[0].romance_score == pair[1].romance_score {
                prop_assert!(pair[0].date < pair[1].date);
            }
        }
    }

    /// Enough rain to cut the multiplier below the cutoff always reads as Water
    #[test]
    fn test_rain_always_wins(
        cloud in 0.0f64..=100.0,
        temperature in -20.0f64..45.0,
        precipitation in 0.31f64..50.0,
        wind in 0.0f64..80.0,
        pm2_5 in 0.0f64..100.0,
        ozone in 0.0f64..600.0,
        ideal in prop_oneof![Just(12.0), Just(15.0), Just(20.0), Just(25.0)],
    ) {
        let record = bucket(cloud, temperature, precipitation, wind, pm2_5, ozone);
        let breakdown = WeatherBreakdown::from_record(&record, ideal);
        prop_assert_eq!(breakdown.vibe(&VibeThresholds::default()), Vibe::Water);
    }

    /// Dry calm days only ever get the sky, score or warmth vibes, in that priority
    #[test]
    fn test_dry_calm_days_never_water_or_air(
        cloud in 0.0f64..=100.0,
        temperature in -20.0f64..45.0,
        wind in 0.0f64..11.99,
        pm2_5 in 0.0f64..100.0,
        ozone in 0.0f64..600.0,
    ) {
        let thresholds = VibeThresholds::default();
        let record = bucket(cloud, temperature, 0.0, wind, pm2_5, ozone);
        let breakdown = WeatherBreakdown::from_record(&record, 20.0);
        let vibe = breakdown.vibe(&thresholds);

        let expected = if breakdown.color_bonus > thresholds.color_bonus {
            Vibe::CottonCandy
        } else if breakdown.score > thresholds.ether {
            Vibe::Ether
        } else if breakdown.temperature_score > thresholds.fire {
            Vibe::Fire
        } else {
            Vibe::Earth
        };
        prop_assert_eq!(vibe, expected);
        prop_assert!((0.0..=1.0).contains(&breakdown.score));
    }
}

#[test]
fn test_romance_weights() {
    assert_eq!(romance_score(1.0, 0.0), ROMANCE_TWILIGHT_WEIGHT);
    assert_eq!(romance_score(0.0, 1.0), ROMANCE_WEATHER_WEIGHT);
    assert_eq!(romance_score(1.0, 1.0), 1.0);
}

#[test]
fn test_top_three_with_tied_leaders() {
    let d = |day: u32| NaiveDate::from_ymd_opt(2026, 6, day).unwrap();
    let ranked = order_by_score(vec![
        scored(d(1), 0.91),
        scored(d(2), 0.91),
        scored(d(3), 0.50),
        scored(d(4), 0.88),
    ]);

    let top: Vec<NaiveDate> = top_n(&ranked, 3).iter().map(|day| day.date).collect();
    assert_eq!(top, vec![d(1), d(2), d(4)]);
}
