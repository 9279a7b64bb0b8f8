/*!
 * Tests for application configuration functionality
 */

use std::time::Duration;
use tokio_test::{assert_err, assert_ok};

use yttranscript::app_config::{Config, LogLevel};
use yttranscript::transcript::TrackFormat;

/// Test default configuration values
#[test]
fn test_defaultConfig_withNoParameters_shouldHaveCorrectDefaults() {
    let config = Config::default();

    assert_eq!(config.language_preferences, vec!["en".to_string()]);
    assert_eq!(config.cache_capacity, 256);
    assert_eq!(config.cache_ttl(), Duration::from_secs(3600));
    assert_eq!(config.fetch_timeout(), Duration::from_millis(10_000));
    assert_eq!(config.max_fetch_retries, 2);
    assert_eq!(config.caption_format, TrackFormat::Xml);
    assert_eq!(config.upstream.client_name, "ANDROID");
    assert_eq!(config.log_level, LogLevel::Info);
    assert!(config.validate().is_ok());
}

#[test]
fn test_configJson_withPartialFields_shouldFillDefaults() {
    let json = r#"{
        "languagePreferences": ["fr", "en-GB"],
        "cacheTtlSeconds": 60,
        "captionFormat": "vtt",
        "upstream": {"clientVersion": "1.2.3"},
        "logLevel": "debug"
    }"#;

    let config: Config = serde_json::from_str(json).unwrap();

    assert_eq!(config.language_preferences, vec!["fr", "en-GB"]);
    assert_eq!(config.cache_ttl_seconds, 60);
    assert_eq!(config.cache_capacity, 256);
    assert_eq!(config.caption_format, TrackFormat::Vtt);
    assert_eq!(config.upstream.client_version, "1.2.3");
    assert_eq!(config.upstream.client_name, "ANDROID");
    assert_eq!(config.log_level.to_level_filter(), log::LevelFilter::Debug);
    assert!(config.validate().is_ok());
}

/// Test configuration validation
#[test]
fn test_configValidation_withVariousConfigs_shouldValidateCorrectly() {
    let mut config = Config::default();
    config.language_preferences.clear();
    assert_err!(config.validate());

    let mut config = Config::default();
    config.language_preferences = vec!["en".to_string(), "123".to_string()];
    assert!(config.validate().is_err());

    let mut config = Config::default();
    config.fetch_timeout_ms = 0;
    assert!(config.validate().is_err());

    let mut config = Config::default();
    config.retry_backoff_ms = 1_000;
    config.max_retry_backoff_ms = 10;
    assert!(config.validate().is_err());

    let mut config = Config::default();
    config.upstream.player_endpoint = "   ".to_string();
    assert!(config.validate().is_err());

    let mut config = Config::default();
    config.upstream.player_endpoint = "not a url".to_string();
    assert!(config.validate().is_err());

    let mut config = Config::default();
    config.cache_capacity = 0;
    config.max_fetch_retries = 0;
    assert_ok!(config.validate());
}

#[test]
fn test_config_saveAndLoad_shouldPreserveValues() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("conf.json");

    let mut config = Config::default();
    config.language_preferences = vec!["de".to_string(), "en".to_string()];
    config.cache_capacity = 8;
    config.save(&path).unwrap();

    let raw = std::fs::read_to_string(&path).unwrap();
    assert!(raw.contains("\"languagePreferences\""));
    assert!(raw.contains("\"cacheCapacity\": 8"));

    let loaded = Config::from_file(&path).unwrap();
    assert_eq!(loaded, config);
}

#[test]
fn test_config_fromFile_withMissingOrInvalidFile_shouldFail() {
    let dir = tempfile::tempdir().unwrap();
    assert!(Config::from_file(dir.path().join("missing.json")).is_err());

    let path = dir.path().join("broken.json");
    std::fs::write(&path, "{ not json").unwrap();
    assert!(Config::from_file(&path).is_err());
}
