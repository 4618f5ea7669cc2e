use std::fs;

use bigring::config::Config;
use bigring::constants::*;
use bigring::engine::EngineSettings;
use bigring::logger::Log;
use serial_test::serial;
use tempfile::tempdir;

/// Run `f` with XDG_CONFIG_HOME pointing at `dir`, restoring the original afterwards.
fn with_config_home<F: FnOnce()>(dir: &std::path::Path, f: F) {
    let original = std::env::var("XDG_CONFIG_HOME").ok();
    unsafe {
        std::env::set_var("XDG_CONFIG_HOME", dir);
    }

    f();

    unsafe {
        match original {
            Some(value) => std::env::set_var("XDG_CONFIG_HOME", value),
            None => std::env::remove_var("XDG_CONFIG_HOME"),
        }
    }
}

#[test]
#[serial]
fn test_config_load_creates_default_file() {
    Log::set_enabled(false);
    let temp_dir = tempdir().unwrap();

    with_config_home(temp_dir.path(), || {
        let path = Config::get_config_path().unwrap();
        assert!(path.ends_with("bigring/bigring.toml"));
        assert!(!path.exists());

        let config = Config::load().unwrap();
        assert!(path.exists());
        assert_eq!(config.engine_settings(), EngineSettings::default());

        let content = fs::read_to_string(&path).unwrap();
        assert!(content.contains("#[Window]"));
        assert!(content.contains("#[Pink time]"));
        assert!(content.contains("pink_min_elevation = -4.0"));
    });
}

#[test]
#[serial]
fn test_config_load_keeps_existing_file() {
    Log::set_enabled(false);
    let temp_dir = tempdir().unwrap();

    with_config_home(temp_dir.path(), || {
        let path = Config::get_config_path().unwrap();
        fs::create_dir_all(path.parent().unwrap()).unwrap();
        fs::write(&path, "top_days = 7\nhistorical_years = 5\n").unwrap();

        let config = Config::load().unwrap();
        let settings = config.engine_settings();
        assert_eq!(settings.top_days, 7);
        assert_eq!(settings.historical_years, 5);
        assert_eq!(settings.window_days, DEFAULT_WINDOW_DAYS);
    });
}

#[test]
fn test_explicit_path_overrides() {
    let temp_dir = tempdir().unwrap();
    let path = temp_dir.path().join("custom.toml");
    fs::write(
        &path,
        r#"
window_days = 14
minimum_valid_days = 3
weather_archive_url = "http://localhost:8080/archive"
max_fetch_attempts = 5
retry_base_delay_ms = 0
pink_min_elevation = -6.0
pink_max_elevation = -2.0
"#,
    )
    .unwrap();

    let config = Config::load_from_path(&path).unwrap();
    let engine = config.engine_settings();
    let provider = config.provider_settings();

    assert_eq!(engine.window_days, 14);
    assert_eq!(engine.minimum_valid_days, 3);
    assert_eq!(engine.pink_band.min, -6.0);
    assert_eq!(engine.pink_band.max, -2.0);
    assert_eq!(provider.archive_url, "http://localhost:8080/archive");
    assert_eq!(provider.air_quality_url, DEFAULT_AIR_QUALITY_URL);
    assert_eq!(provider.retry.max_attempts, 5);
    assert_eq!(provider.retry.base_delay_ms, 0);
}

#[test]
fn test_invalid_file_names_the_path() {
    let temp_dir = tempdir().unwrap();
    let path = temp_dir.path().join("broken.toml");
    fs::write(&path, "window_days = 2\n").unwrap();

    let error = Config::load_from_path(&path).unwrap_err();
    let message = format!("{:#}", error);
    assert!(message.contains("broken.toml"), "{}", message);
    assert!(message.contains("window_days"), "{}", message);
}
