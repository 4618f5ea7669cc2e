//! Command-line argument parsing and processing.
//!
//! This module turns the raw argument list into a [`CliAction`] for the main
//! application logic. Every word that is not an option becomes part of the
//! city name, so `bigring New York` needs no quoting.

use chrono::NaiveDate;
use std::path::PathBuf;

use crate::logger::Log;

/// Represents the parsed command-line arguments and their intended actions.
#[derive(Debug, PartialEq)]
pub enum CliAction {
    /// Rank the window starting at `start` (today when `None`)
    Plan {
        city: String,
        start: Option<NaiveDate>,
        config: Option<PathBuf>,
        debug_enabled: bool,
    },
    /// Rank the days of one month by historical weather alone
    WeatherOnly {
        city: String,
        start: Option<NaiveDate>,
        month: Option<u32>,
        config: Option<PathBuf>,
        debug_enabled: bool,
    },
    /// Display help information and exit
    ShowHelp,
    /// Display version information and exit
    ShowVersion,
    /// Show help due to unknown or malformed arguments and exit
    ShowHelpDueToError,
}

/// Result of parsing command-line arguments.
pub struct ParsedArgs {
    pub action: CliAction,
}

impl ParsedArgs {
    /// Parse command-line arguments into a structured result.
    ///
    /// The first item is the program name and is skipped.
    pub fn parse<I, S>(args: I) -> ParsedArgs
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let mut debug_enabled = false;
        let mut display_help = false;
        let mut display_version = false;
        let mut weather_only = false;
        let mut start: Option<NaiveDate> = None;
        let mut month: Option<u32> = None;
        let mut config: Option<PathBuf> = None;
        let mut city_words: Vec<String> = Vec::new();
        let mut invalid_arg_found = false;

        let args_vec: Vec<String> = args
            .into_iter()
            .skip(1)
            .map(|s| s.as_ref().to_string())
            .collect();

        let mut i = 0;
        while i < args_vec.len() {
            let arg_str = args_vec[i].as_str();
            match arg_str {
                "--help" | "-h" => display_help = true,
                "--version" | "-V" => display_version = true,
                "--debug" | "-d" => debug_enabled = true,
                "--weather-only" | "-w" => weather_only = true,
                "--start" | "-s" | "--month" | "-m" | "--config" | "-c" => {
                    let Some(value) = args_vec.get(i + 1) else {
                        Log::log_warning(&format!("Missing value for {}", arg_str));
                        invalid_arg_found = true;
                        i += 1;
                        continue;
                    };

                    match arg_str {
                        "--start" | "-s" => match NaiveDate::parse_from_str(value, "%Y-%m-%d") {
                            Ok(date) => start = Some(date),
                            Err(_) => {
                                Log::log_warning(&format!(
                                    "Invalid start date: {} (expected YYYY-MM-DD)",
                                    value
                                ));
                                invalid_arg_found = true;
                            }
                        },
                        "--month" | "-m" => match value.parse::<u32>() {
                            Ok(m) if (1..=12).contains(&m) => month = Some(m),
                            _ => {
                                Log::log_warning(&format!(
                                    "Invalid month: {} (expected 1-12)",
                                    value
                                ));
                                invalid_arg_found = true;
                            }
                        },
                        _ => config = Some(PathBuf::from(value)),
                    }

                    i += 1; // Skip the value
                }
                _ => {
                    if arg_str.starts_with('-') {
                        Log::log_warning(&format!("Unknown option: {}", arg_str));
                        invalid_arg_found = true;
                    } else {
                        city_words.push(arg_str.to_string());
                    }
                }
            }
            i += 1;
        }

        let city = city_words.join(" ");

        let action = if display_version {
            CliAction::ShowVersion
        } else if invalid_arg_found {
            CliAction::ShowHelpDueToError
        } else if display_help {
            CliAction::ShowHelp
        } else if city.is_empty() {
            Log::log_warning("Missing city name");
            CliAction::ShowHelpDueToError
        } else if month.is_some() && !weather_only {
            Log::log_warning("--month requires --weather-only");
            CliAction::ShowHelpDueToError
        } else if weather_only {
            CliAction::WeatherOnly {
                city,
                start,
                month,
                config,
                debug_enabled,
            }
        } else {
            CliAction::Plan {
                city,
                start,
                config,
                debug_enabled,
            }
        };

        ParsedArgs { action }
    }

    /// Convenience method to parse from std::env::args()
    pub fn from_env() -> ParsedArgs {
        Self::parse(std::env::args())
    }
}

/// Displays version information using custom logging style.
pub fn display_version_info() {
    Log::log_version();
    Log::log_pipe();
    println!("┗ {}", env!("CARGO_PKG_DESCRIPTION"));
}

/// Displays custom help message using logger methods.
pub fn display_help() {
    Log::log_version();
    Log::log_block_start(env!("CARGO_PKG_DESCRIPTION"));
    Log::log_block_start("Usage: bigring [OPTIONS] <CITY...>");
    Log::log_block_start("Options:");
    Log::log_indented("-s, --start <YYYY-MM-DD>  First day of the window (default: today)");
    Log::log_indented("-w, --weather-only        Rank one month by weather history only");
    Log::log_indented("-m, --month <1-12>        Month for --weather-only (default: start month)");
    Log::log_indented("-c, --config <PATH>       Use this configuration file");
    Log::log_indented("-d, --debug               Enable detailed debug output");
    Log::log_indented("-h, --help                Print help information");
    Log::log_indented("-V, --version             Print version information");
    Log::log_end();
}

#[cfg(test)]
mod tests {
    use super::*;

    fn plan(city: &str) -> CliAction {
        CliAction::Plan {
            city: city.to_string(),
            start: None,
            config: None,
            debug_enabled: false,
        }
    }

    #[test]
    fn test_parse_city_only() {
        let parsed = ParsedArgs::parse(vec!["bigring", "Paris"]);
        assert_eq!(parsed.action, plan("Paris"));
    }

    #[test]
    fn test_multi_word_city() {
        let parsed = ParsedArgs::parse(vec!["bigring", "New", "York"]);
        assert_eq!(parsed.action, plan("New York"));
    }

    #[test]
    fn test_parse_no_args() {
        let parsed = ParsedArgs::parse(vec!["bigring"]);
        assert_eq!(parsed.action, CliAction::ShowHelpDueToError);
    }

    #[test]
    fn test_parse_all_plan_options() {
        let parsed = ParsedArgs::parse(vec![
            "bigring",
            "-d",
            "--start",
            "2026-05-01",
            "-c",
            "/tmp/bigring.toml",
            "Rome",
        ]);
        assert_eq!(
            parsed.action,
            CliAction::Plan {
                city: "Rome".to_string(),
                start: NaiveDate::from_ymd_opt(2026, 5, 1),
                config: Some(PathBuf::from("/tmp/bigring.toml")),
                debug_enabled: true,
            }
        );
    }

    #[test]
    fn test_parse_weather_only() {
        let parsed = ParsedArgs::parse(vec!["bigring", "Tokyo", "-w", "-m", "10"]);
        assert_eq!(
            parsed.action,
            CliAction::WeatherOnly {
                city: "Tokyo".to_string(),
                start: None,
                month: Some(10),
                config: None,
                debug_enabled: false,
            }
        );
    }

    #[test]
    fn test_month_without_weather_only() {
        let parsed = ParsedArgs::parse(vec!["bigring", "Tokyo", "--month", "10"]);
        assert_eq!(parsed.action, CliAction::ShowHelpDueToError);
    }

    #[test]
    fn test_invalid_values() {
        for args in [
            vec!["bigring", "Paris", "--start", "01/05/2026"],
            vec!["bigring", "Paris", "-w", "--month", "13"],
            vec!["bigring", "Paris", "--start"],
        ] {
            assert_eq!(ParsedArgs::parse(args).action, CliAction::ShowHelpDueToError);
        }
    }

    #[test]
    fn test_parse_help_flags() {
        assert_eq!(
            ParsedArgs::parse(vec!["bigring", "--help"]).action,
            CliAction::ShowHelp
        );
        assert_eq!(ParsedArgs::parse(vec!["bigring", "-h"]).action, CliAction::ShowHelp);
    }

    #[test]
    fn test_parse_unknown_flag() {
        let parsed = ParsedArgs::parse(vec!["bigring", "Paris", "--unknown"]);
        assert_eq!(parsed.action, CliAction::ShowHelpDueToError);
    }

    #[test]
    fn test_version_takes_precedence() {
        let parsed = ParsedArgs::parse(vec!["bigring", "--version", "--help", "--debug"]);
        assert_eq!(parsed.action, CliAction::ShowVersion);
    }
}
