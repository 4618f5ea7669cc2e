use anyhow::Result;
use chrono::{Datelike, Local, NaiveDate};
use std::path::PathBuf;

use bigring::args::{CliAction, ParsedArgs, display_help, display_version_info};
use bigring::astro::{AnalyticEphemeris, MeanLunation};
use bigring::climate::OpenMeteoClient;
use bigring::config::Config;
use bigring::constants::EXIT_FAILURE;
use bigring::engine::{Collaborators, RomanceEngine};
use bigring::geo::{BoundaryTimezones, CityDatabase, SolarAlmanac};
use bigring::logger::Log;
use bigring::report;
use bigring::utils::upcoming_month;

/// What the user asked for once the arguments are understood.
enum Request {
    Plan,
    WeatherOnly { month: Option<u32> },
}

fn main() {
    let parsed = ParsedArgs::from_env();

    let outcome = match parsed.action {
        CliAction::ShowVersion => {
            display_version_info();
            return;
        }
        CliAction::ShowHelp => {
            display_help();
            return;
        }
        CliAction::ShowHelpDueToError => {
            display_help();
            std::process::exit(EXIT_FAILURE);
        }
        CliAction::Plan {
            city,
            start,
            config,
            debug_enabled,
        } => run(&city, start, config, debug_enabled, Request::Plan),
        CliAction::WeatherOnly {
            city,
            start,
            month,
            config,
            debug_enabled,
        } => run(
            &city,
            start,
            config,
            debug_enabled,
            Request::WeatherOnly { month },
        ),
    };

    if let Err(e) = outcome {
        Log::log_pipe();
        Log::log_error(&format!("{:#}", e));
        Log::log_end();
        std::process::exit(EXIT_FAILURE);
    }
}

fn run(
    city: &str,
    start: Option<NaiveDate>,
    config_path: Option<PathBuf>,
    debug_enabled: bool,
    request: Request,
) -> Result<()> {
    Log::set_debug(debug_enabled);
    Log::log_version();

    let (config, source) = match config_path {
        Some(path) => (Config::load_from_path(&path)?, path),
        None => (Config::load()?, Config::get_config_path()?),
    };
    config.log_config(&source);

    let geocoder = CityDatabase::new();
    let timezones = BoundaryTimezones;
    let almanac = SolarAlmanac;
    let lunar = MeanLunation;
    let weather = OpenMeteoClient::new(config.provider_settings());

    let engine = RomanceEngine::new(
        Collaborators {
            geocoder: &geocoder,
            timezones: &timezones,
            almanac: &almanac,
            lunar: &lunar,
            ephemeris: AnalyticEphemeris::shared(),
            weather: &weather,
        },
        config.engine_settings(),
    );

    let today = Local::now().date_naive();
    let start = start.unwrap_or(today);
    engine.validate_start_date(start, today)?;

    match request {
        Request::Plan => {
            let plan = engine.plan(city, start)?;
            report::print_plan(&plan);
        }
        Request::WeatherOnly { month } => {
            let (year, month) = upcoming_month(start, month.unwrap_or(start.month()));
            let outlook = engine.weather_outlook(city, year, month)?;
            report::print_outlook(&outlook);
        }
    }

    Log::log_end();
    Ok(())
}
