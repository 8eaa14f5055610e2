// src/config.rs

use crate::timing::Millis;
use std::path::PathBuf;
use std::time::Duration;
use thiserror::Error;

pub const DEFAULT_API_URL: &str = "https://estate-insight-backend.onrender.com/api/houses";

#[derive(Debug, Error, PartialEq)]
pub enum ConfigError {
    #[error("{var} is not a valid URL: {reason}")]
    InvalidUrl { var: &'static str, reason: String },
    #[error("{var} must be a non-negative integer, got {value:?}")]
    InvalidNumber { var: &'static str, value: String },
}

#[derive(Debug, Clone, PartialEq)]
pub struct Config {
    pub api_url: url::Url,
    pub fetch_limit: u32,
    pub cache_path: PathBuf,
    pub cache_max_age: Millis,
    pub bounds_debounce: Millis,
    pub pointer_throttle: Millis,
    pub request_timeout: Millis,
    pub output_path: PathBuf,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            api_url: url::Url::parse(DEFAULT_API_URL).expect("default API URL is valid"),
            fetch_limit: 300,
            cache_path: PathBuf::from("estate_cache.sqlite3"),
            cache_max_age: 120_000,
            bounds_debounce: 400,
            pointer_throttle: 50,
            request_timeout: 15_000,
            output_path: PathBuf::from("heatmap.png"),
        }
    }
}

impl Config {
    /// Reads `ESTATE_*` variables from the process environment.
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Builds a config from any key lookup; unset keys keep their defaults.
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let mut cfg = Config::default();

        if let Some(raw) = lookup("ESTATE_API_URL") {
            cfg.api_url = url::Url::parse(raw.trim()).map_err(|e| ConfigError::InvalidUrl {
                var: "ESTATE_API_URL",
                reason: e.to_string(),
            })?;
        }
        if let Some(raw) = lookup("ESTATE_CACHE_PATH") {
            cfg.cache_path = PathBuf::from(raw);
        }
        if let Some(raw) = lookup("ESTATE_OUTPUT") {
            cfg.output_path = PathBuf::from(raw);
        }

        cfg.fetch_limit = number(&lookup, "ESTATE_FETCH_LIMIT", cfg.fetch_limit)?;
        cfg.cache_max_age = number(&lookup, "ESTATE_CACHE_MAX_AGE_MS", cfg.cache_max_age)?;
        cfg.bounds_debounce = number(&lookup, "ESTATE_BOUNDS_DEBOUNCE_MS", cfg.bounds_debounce)?;
        cfg.pointer_throttle = number(&lookup, "ESTATE_POINTER_THROTTLE_MS", cfg.pointer_throttle)?;
        cfg.request_timeout = number(&lookup, "ESTATE_REQUEST_TIMEOUT_MS", cfg.request_timeout)?;

        Ok(cfg)
    }

    pub fn http_timeout(&self) -> Duration {
        Duration::from_millis(self.request_timeout)
    }
}

fn number<F, T>(lookup: &F, var: &'static str, default: T) -> Result<T, ConfigError>
where
    F: Fn(&str) -> Option<String>,
    T: std::str::FromStr,
{
    match lookup(var) {
        None => Ok(default),
        Some(raw) => raw.trim().parse().map_err(|_| ConfigError::InvalidNumber { var, value: raw }),
    }
}
