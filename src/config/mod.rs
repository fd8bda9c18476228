//! Configuration management.
//!
//! Every field has a default, so running without a config file is the normal
//! case. A TOML file (see [`file_config`]) and `ANTIBODY_LEADS__*`
//! environment variables can override any value, e.g.
//! `ANTIBODY_LEADS__CRAWL__CONCURRENCY=4`.

mod file_config;

pub use file_config::{
    find_config_file, read_config_file, save_config, ConfigFileError, LOCAL_CONFIG_FILE,
};

use serde::{Deserialize, Serialize};
use std::path::Path;
use std::time::Duration;

use crate::enrich::KeywordEntry;
use crate::models::DEFAULT_MAX_RESULTS;
use crate::sources::PUBMED_BASE_URL;
use crate::utils::{RetryConfig, DEFAULT_USER_AGENT};

/// Prefix of environment variable overrides
pub const ENV_PREFIX: &str = "ANTIBODY_LEADS";

/// Application configuration
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Config {
    /// HTTP transport settings
    #[serde(default)]
    pub http: HttpConfig,

    /// Crawl orchestration settings
    #[serde(default)]
    pub crawl: CrawlConfig,

    /// Summarizer settings
    #[serde(default)]
    pub summary: SummaryConfig,
}

impl Config {
    /// Check value ranges that serde cannot express
    pub fn validate(&self) -> Result<(), config::ConfigError> {
        if self.crawl.concurrency == 0 {
            return Err(config::ConfigError::Message(
                "crawl.concurrency must be at least 1".to_string(),
            ));
        }
        if self.crawl.page_delay_min_ms > self.crawl.page_delay_max_ms {
            return Err(config::ConfigError::Message(
                "crawl.page_delay_min_ms must not exceed crawl.page_delay_max_ms".to_string(),
            ));
        }
        if self.http.max_attempts == 0 {
            return Err(config::ConfigError::Message(
                "http.max_attempts must be at least 1".to_string(),
            ));
        }
        if !self.http.backoff_multiplier.is_finite() || self.http.backoff_multiplier < 1.0 {
            return Err(config::ConfigError::Message(
                "http.backoff_multiplier must be a finite number of at least 1.0".to_string(),
            ));
        }
        url::Url::parse(&self.http.base_url).map_err(|e| {
            config::ConfigError::Message(format!("http.base_url is not a valid URL: {}", e))
        })?;
        Ok(())
    }
}

/// HTTP transport configuration
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct HttpConfig {
    /// Per-request timeout
    #[serde(default = "default_timeout_secs")]
    pub timeout_secs: u64,

    /// Connection establishment timeout
    #[serde(default = "default_connect_timeout_secs")]
    pub connect_timeout_secs: u64,

    /// User-Agent header sent with every request
    #[serde(default = "default_user_agent")]
    pub user_agent: String,

    /// Attempts per retried request, including the first
    #[serde(default = "default_max_attempts")]
    pub max_attempts: u32,

    /// Backoff after the first failed attempt
    #[serde(default = "default_backoff_initial_ms")]
    pub backoff_initial_ms: u64,

    /// Backoff growth factor
    #[serde(default = "default_backoff_multiplier")]
    pub backoff_multiplier: f64,

    /// Site root that search and article URLs are built from
    #[serde(default = "default_base_url")]
    pub base_url: String,
}

impl Default for HttpConfig {
    fn default() -> Self {
        Self {
            timeout_secs: default_timeout_secs(),
            connect_timeout_secs: default_connect_timeout_secs(),
            user_agent: default_user_agent(),
            max_attempts: default_max_attempts(),
            backoff_initial_ms: default_backoff_initial_ms(),
            backoff_multiplier: default_backoff_multiplier(),
            base_url: default_base_url(),
        }
    }
}

impl HttpConfig {
    /// Retry policy for [`crate::sources::FetchMode::Retried`] requests
    pub fn retry_config(&self) -> RetryConfig {
        RetryConfig {
            max_attempts: self.max_attempts.max(1),
            initial_delay: Duration::from_millis(self.backoff_initial_ms),
            max_delay: Duration::from_secs(2).max(Duration::from_millis(self.backoff_initial_ms)),
            backoff_multiplier: self.backoff_multiplier,
            max_total_time: Duration::from_secs(self.timeout_secs.max(1).saturating_mul(4)),
        }
    }
}

fn default_timeout_secs() -> u64 {
    30
}

fn default_connect_timeout_secs() -> u64 {
    10
}

fn default_user_agent() -> String {
    DEFAULT_USER_AGENT.to_string()
}

fn default_max_attempts() -> u32 {
    5
}

fn default_backoff_initial_ms() -> u64 {
    100
}

fn default_backoff_multiplier() -> f64 {
    2.0
}

fn default_base_url() -> String {
    PUBMED_BASE_URL.to_string()
}

/// Crawl orchestration configuration
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CrawlConfig {
    /// Concurrent enrichment workers
    #[serde(default = "default_concurrency")]
    pub concurrency: usize,

    /// Result cap used when the caller does not give one
    #[serde(default = "default_max_results")]
    pub default_max_results: usize,

    /// Lower bound of the pause between result pages
    #[serde(default = "default_page_delay_min_ms")]
    pub page_delay_min_ms: u64,

    /// Upper bound of the pause between result pages
    #[serde(default = "default_page_delay_max_ms")]
    pub page_delay_max_ms: u64,

    /// Pause before retrying a page that failed to load
    #[serde(default = "default_error_backoff_ms")]
    pub error_backoff_ms: u64,

    /// Consecutive failures of one page before the run is aborted.
    /// Unset means retry forever.
    #[serde(default)]
    pub max_page_failures: Option<u32>,
}

impl Default for CrawlConfig {
    fn default() -> Self {
        Self {
            concurrency: default_concurrency(),
            default_max_results: default_max_results(),
            page_delay_min_ms: default_page_delay_min_ms(),
            page_delay_max_ms: default_page_delay_max_ms(),
            error_backoff_ms: default_error_backoff_ms(),
            max_page_failures: None,
        }
    }
}

impl CrawlConfig {
    /// Configuration without pauses, for tests and local mirrors
    pub fn without_delays() -> Self {
        Self {
            page_delay_min_ms: 0,
            page_delay_max_ms: 0,
            error_backoff_ms: 0,
            ..Self::default()
        }
    }

    pub fn page_delay_range(&self) -> (Duration, Duration) {
        (
            Duration::from_millis(self.page_delay_min_ms),
            Duration::from_millis(self.page_delay_max_ms),
        )
    }

    pub fn error_backoff(&self) -> Duration {
        Duration::from_millis(self.error_backoff_ms)
    }
}

fn default_concurrency() -> usize {
    10
}

fn default_max_results() -> usize {
    DEFAULT_MAX_RESULTS
}

fn default_page_delay_min_ms() -> u64 {
    1000
}

fn default_page_delay_max_ms() -> u64 {
    3000
}

fn default_error_backoff_ms() -> u64 {
    5000
}

/// Summarizer configuration
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct SummaryConfig {
    /// Keywords appended to the built-in dictionary
    #[serde(default)]
    pub extra_keywords: Vec<KeywordEntry>,
}

/// Load configuration from a file, layered under environment overrides
pub fn load_config(path: &Path) -> Result<Config, config::ConfigError> {
    let settings = config::Config::builder()
        .add_source(config::File::from(path))
        .add_source(env_source())
        .build()?;

    let config: Config = settings.try_deserialize()?;
    config.validate()?;
    Ok(config)
}

/// Get the configuration from defaults and environment overrides only
pub fn get_config() -> Result<Config, config::ConfigError> {
    let settings = config::Config::builder().add_source(env_source()).build()?;

    let config: Config = settings.try_deserialize()?;
    config.validate()?;
    Ok(config)
}

fn env_source() -> config::Environment {
    config::Environment::with_prefix(ENV_PREFIX)
        .separator("__")
        .try_parsing(true)
}
