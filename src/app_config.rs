use anyhow::{anyhow, Context, Result};
use serde::{Deserialize, Serialize};
use std::default::Default;
use std::fs::File;
use std::io::BufReader;
use std::path::Path;
use std::time::Duration;

use crate::transcript::TrackFormat;

/// Application configuration module
/// This module handles the configuration of the retrieval core including
/// loading, validating and saving configuration settings.
/// Represents the retrieval configuration
#[derive(Debug, Serialize, Deserialize, Clone, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct Config {
    /// Ordered list of preferred caption languages
    #[serde(default = "default_language_preferences")]
    pub language_preferences: Vec<String>,

    /// Maximum number of cached transcripts (0 disables the cache)
    #[serde(default = "default_cache_capacity")]
    pub cache_capacity: usize,

    /// Time-to-live of a cached transcript in seconds
    #[serde(default = "default_cache_ttl_seconds")]
    pub cache_ttl_seconds: u64,

    /// Per-request timeout in milliseconds
    #[serde(default = "default_fetch_timeout_ms")]
    pub fetch_timeout_ms: u64,

    /// Retries after the first download attempt
    #[serde(default = "default_max_fetch_retries")]
    pub max_fetch_retries: u32,

    /// Base backoff time in milliseconds, doubled on each retry
    #[serde(default = "default_retry_backoff_ms")]
    pub retry_backoff_ms: u64,

    /// Upper bound for a single backoff delay
    #[serde(default = "default_max_retry_backoff_ms")]
    pub max_retry_backoff_ms: u64,

    /// Payload format requested from the caption host
    #[serde(default)]
    pub caption_format: TrackFormat,

    /// Caption host settings
    #[serde(default)]
    pub upstream: UpstreamConfig,

    /// Log level
    #[serde(default)]
    pub log_level: LogLevel,
}

/// Caption host configuration
#[derive(Debug, Serialize, Deserialize, Clone, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct UpstreamConfig {
    // @field: Player API endpoint used to list caption tracks
    #[serde(default = "default_player_endpoint")]
    pub player_endpoint: String,

    // @field: Client name sent in the player request context
    #[serde(default = "default_client_name")]
    pub client_name: String,

    // @field: Client version sent in the player request context
    #[serde(default = "default_client_version")]
    pub client_version: String,

    // @field: User-Agent header
    #[serde(default = "default_user_agent")]
    pub user_agent: String,

    // @field: Accept-Language header
    #[serde(default = "default_accept_language")]
    pub accept_language: String,
}

impl Default for UpstreamConfig {
    fn default() -> Self {
        Self {
            player_endpoint: default_player_endpoint(),
            client_name: default_client_name(),
            client_version: default_client_version(),
            user_agent: default_user_agent(),
            accept_language: default_accept_language(),
        }
    }
}

/// Log verbosity level
#[derive(Debug, Serialize, Deserialize, Clone, PartialEq, Default)]
#[serde(rename_all = "lowercase")]
pub enum LogLevel {
    Error,
    Warn,
    #[default]
    Info,
    Debug,
    Trace,
}

impl LogLevel {
    /// Convert to the level filter understood by the log facade
    pub fn to_level_filter(&self) -> log::LevelFilter {
        match self {
            LogLevel::Error => log::LevelFilter::Error,
            LogLevel::Warn => log::LevelFilter::Warn,
            LogLevel::Info => log::LevelFilter::Info,
            LogLevel::Debug => log::LevelFilter::Debug,
            LogLevel::Trace => log::LevelFilter::Trace,
        }
    }
}

fn default_language_preferences() -> Vec<String> {
    vec!["en".to_string()]
}

fn default_cache_capacity() -> usize {
    256
}

fn default_cache_ttl_seconds() -> u64 {
    3600
}

fn default_fetch_timeout_ms() -> u64 {
    10_000
}

fn default_max_fetch_retries() -> u32 {
    2 // 3 attempts in total
}

fn default_retry_backoff_ms() -> u64 {
    500
}

fn default_max_retry_backoff_ms() -> u64 {
    8_000
}

fn default_player_endpoint() -> String {
    "https://www.youtube.com/youtubei/v1/player".to_string()
}

fn default_client_name() -> String {
    "ANDROID".to_string()
}

fn default_client_version() -> String {
    "20.10.38".to_string()
}

fn default_user_agent() -> String {
    "Mozilla/5.0 (Windows NT 10.0; Win64; x64) AppleWebKit/537.36 (KHTML, like Gecko) Chrome/124.0.0.0 Safari/537.36".to_string()
}

fn default_accept_language() -> String {
    "en-US".to_string()
}

impl Config {
    /// Validate the configuration for consistency and required values
    pub fn validate(&self) -> Result<()> {
        if self.language_preferences.is_empty() {
            return Err(anyhow!("languagePreferences must contain at least one language code"));
        }

        for code in &self.language_preferences {
            crate::language_utils::validate_language_tag(code)
                .with_context(|| format!("Invalid entry in languagePreferences: '{}'", code))?;
        }

        if self.fetch_timeout_ms == 0 {
            return Err(anyhow!("fetchTimeoutMs must be greater than zero"));
        }

        if self.max_retry_backoff_ms < self.retry_backoff_ms {
            return Err(anyhow!(
                "maxRetryBackoffMs ({}) must not be smaller than retryBackoffMs ({})",
                self.max_retry_backoff_ms,
                self.retry_backoff_ms
            ));
        }

        if self.upstream.player_endpoint.trim().is_empty() {
            return Err(anyhow!("upstream.playerEndpoint cannot be empty"));
        }

        url::Url::parse(&self.upstream.player_endpoint)
            .with_context(|| format!("Invalid upstream.playerEndpoint: {}", self.upstream.player_endpoint))?;

        Ok(())
    }

    /// Load a configuration from a JSON file
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();
        let file = File::open(path)
            .with_context(|| format!("Failed to open config file: {}", path.display()))?;

        let reader = BufReader::new(file);
        let config: Config = serde_json::from_reader(reader)
            .with_context(|| format!("Failed to parse config file: {}", path.display()))?;

        Ok(config)
    }

    /// Write the configuration as pretty JSON
    pub fn save<P: AsRef<Path>>(&self, path: P) -> Result<()> {
        let path = path.as_ref();
        let config_json = serde_json::to_string_pretty(self)
            .context("Failed to serialize config to JSON")?;

        std::fs::write(path, config_json)
            .with_context(|| format!("Failed to write config to file: {}", path.display()))?;

        Ok(())
    }

    /// Per-request timeout
    pub fn fetch_timeout(&self) -> Duration {
        Duration::from_millis(self.fetch_timeout_ms)
    }

    /// Cache entry time-to-live
    pub fn cache_ttl(&self) -> Duration {
        Duration::from_secs(self.cache_ttl_seconds)
    }
}

/// Default implementation for Config
impl Default for Config {
    fn default() -> Self {
        Config {
            language_preferences: default_language_preferences(),
            cache_capacity: default_cache_capacity(),
            cache_ttl_seconds: default_cache_ttl_seconds(),
            fetch_timeout_ms: default_fetch_timeout_ms(),
            max_fetch_retries: default_max_fetch_retries(),
            retry_backoff_ms: default_retry_backoff_ms(),
            max_retry_backoff_ms: default_max_retry_backoff_ms(),
            caption_format: TrackFormat::default(),
            upstream: UpstreamConfig::default(),
            log_level: LogLevel::default(),
        }
    }
}
