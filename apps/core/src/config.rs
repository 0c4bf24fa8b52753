//! Runtime configuration.
//!
//! Every knob comes from the environment (a `.env` file is honoured when
//! loaded through [`SearchConfig::load`]) and falls back to the storefront's
//! stock values: a 300 ms autocomplete debounce and a 20 s inactivity prompt.

use crate::error::AppError;
use serde::{Deserialize, Serialize};
use std::env;
use std::str::FromStr;
use std::time::Duration;
use validator::Validate;

const DEFAULT_API_BASE: &str = "http://localhost:5000/api";
const DEFAULT_ANALYSIS_BASE: &str = "http://localhost:5001";
const DEFAULT_DEBOUNCE_MS: u64 = 300;
const DEFAULT_AUTOCOMPLETE_MIN_CHARS: usize = 2;
const DEFAULT_PROMPT_SECS: u64 = 20;
const DEFAULT_PROMPT_MIN_CHARS: usize = 5;
const DEFAULT_HTTP_TIMEOUT_SECS: u64 = 15;

/// Output format for the tracing subscriber.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LogFormat {
    #[default]
    Pretty,
    Json,
    Bunyan,
}

impl FromStr for LogFormat {
    type Err = AppError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "pretty" | "text" => Ok(LogFormat::Pretty),
            "json" => Ok(LogFormat::Json),
            "bunyan" => Ok(LogFormat::Bunyan),
            other => Err(AppError::Config(format!("unknown LOG_FORMAT '{}'", other))),
        }
    }
}

/// Endpoints and timings for the storefront client.
#[derive(Debug, Clone, PartialEq, Validate)]
pub struct SearchConfig {
    /// Base of the destination and autocomplete endpoints (`{base}/destinations`, ...).
    #[validate(url)]
    pub api_base: String,
    /// Base of the analysis service (`{analysis_base}/api/search`, ...).
    #[validate(url)]
    pub analysis_base: String,
    /// Quiet period before an autocomplete fetch is issued.
    pub debounce: Duration,
    /// Queries shorter than this never reach the autocomplete endpoint.
    #[validate(range(min = 1))]
    pub autocomplete_min_chars: usize,
    /// Quiet period before the inactivity prompt appears.
    pub prompt_delay: Duration,
    /// The prompt only arms when the trimmed query is longer than this.
    pub prompt_min_chars: usize,
    pub request_timeout: Duration,
    pub log_format: LogFormat,
}

impl Default for SearchConfig {
    fn default() -> Self {
        Self {
            api_base: DEFAULT_API_BASE.to_string(),
            analysis_base: DEFAULT_ANALYSIS_BASE.to_string(),
            debounce: Duration::from_millis(DEFAULT_DEBOUNCE_MS),
            autocomplete_min_chars: DEFAULT_AUTOCOMPLETE_MIN_CHARS,
            prompt_delay: Duration::from_secs(DEFAULT_PROMPT_SECS),
            prompt_min_chars: DEFAULT_PROMPT_MIN_CHARS,
            request_timeout: Duration::from_secs(DEFAULT_HTTP_TIMEOUT_SECS),
            log_format: LogFormat::Pretty,
        }
    }
}

impl SearchConfig {
    /// Loads `.env` (if present) and then reads the process environment.
    pub fn load() -> Result<Self, AppError> {
        dotenv::dotenv().ok();
        Self::from_env()
    }

    /// Reads the configuration from the process environment only.
    pub fn from_env() -> Result<Self, AppError> {
        let defaults = Self::default();

        let config = Self {
            api_base: env::var("STOREFRONT_API_BASE").unwrap_or(defaults.api_base),
            analysis_base: env::var("ANALYSIS_API_BASE").unwrap_or(defaults.analysis_base),
            debounce: read_parsed::<u64>("AUTOCOMPLETE_DEBOUNCE_MS")?
                .map(Duration::from_millis)
                .unwrap_or(defaults.debounce),
            autocomplete_min_chars: read_parsed("AUTOCOMPLETE_MIN_CHARS")?
                .unwrap_or(defaults.autocomplete_min_chars),
            prompt_delay: read_parsed::<u64>("INACTIVITY_PROMPT_SECS")?
                .map(Duration::from_secs)
                .unwrap_or(defaults.prompt_delay),
            prompt_min_chars: read_parsed("INACTIVITY_MIN_CHARS")?
                .unwrap_or(defaults.prompt_min_chars),
            request_timeout: read_parsed::<u64>("HTTP_TIMEOUT_SECS")?
                .map(Duration::from_secs)
                .unwrap_or(defaults.request_timeout),
            log_format: read_parsed("LOG_FORMAT")?.unwrap_or(defaults.log_format),
        };

        config
            .validate()
            .map_err(|e| AppError::Config(format!("invalid configuration: {}", e)))?;
        Ok(config)
    }
}

fn read_parsed<T>(key: &str) -> Result<Option<T>, AppError>
where
    T: FromStr,
    T::Err: std::fmt::Display,
{
    match env::var(key) {
        Ok(raw) if raw.trim().is_empty() => Ok(None),
        Ok(raw) => raw
            .trim()
            .parse::<T>()
            .map(Some)
            .map_err(|e| AppError::Config(format!("{}='{}': {}", key, raw, e))),
        Err(_) => Ok(None),
    }
}
