use std::str::FromStr;

use anyhow::{ensure, Context, Result};

use crate::screening::duplicates::DEFAULT_DUPLICATE_THRESHOLD;
use crate::screening::pipeline::{ScreeningOptions, DEFAULT_TOP_N};
use crate::screening::vectorizer::DEFAULT_MAX_FEATURES;

const DEFAULT_MAX_UPLOAD_BYTES: usize = 10 * 1024 * 1024;

/// Application configuration loaded from environment variables.
/// Every variable has a default; malformed values fail startup.
#[derive(Debug, Clone)]
pub struct Config {
    pub port: u16,
    pub rust_log: String,
    /// Vocabulary cap for TF-IDF.
    pub max_features: usize,
    pub duplicate_threshold: f64,
    pub top_n: usize,
    pub max_upload_bytes: usize,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            port: 8080,
            rust_log: "info".to_string(),
            max_features: DEFAULT_MAX_FEATURES,
            duplicate_threshold: DEFAULT_DUPLICATE_THRESHOLD,
            top_n: DEFAULT_TOP_N,
            max_upload_bytes: DEFAULT_MAX_UPLOAD_BYTES,
        }
    }
}

impl Config {
    pub fn from_env() -> Result<Self> {
        dotenvy::dotenv().ok(); // load .env if present; ignore if missing

        let defaults = Config::default();
        let config = Config {
            port: env_or("PORT", defaults.port)?,
            rust_log: std::env::var("RUST_LOG").unwrap_or(defaults.rust_log),
            max_features: env_or("MAX_FEATURES", defaults.max_features)?,
            duplicate_threshold: env_or("DUPLICATE_THRESHOLD", defaults.duplicate_threshold)?,
            top_n: env_or("TOP_N", defaults.top_n)?,
            max_upload_bytes: env_or("MAX_UPLOAD_BYTES", defaults.max_upload_bytes)?,
        };
        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> Result<()> {
        ensure!(self.max_features > 0, "MAX_FEATURES must be greater than 0");
        ensure!(self.top_n > 0, "TOP_N must be greater than 0");
        ensure!(
            (0.0..=1.0).contains(&self.duplicate_threshold),
            "DUPLICATE_THRESHOLD must be within [0, 1], got {}",
            self.duplicate_threshold
        );
        Ok(())
    }

    /// Pipeline defaults; requests may override `top_n` and `duplicate_threshold`.
    pub fn screening_options(&self) -> ScreeningOptions {
        ScreeningOptions {
            max_features: self.max_features,
            top_n: self.top_n,
            duplicate_threshold: self.duplicate_threshold,
        }
    }
}

fn env_or<T>(key: &str, default: T) -> Result<T>
where
    T: FromStr,
    T::Err: std::error::Error + Send + Sync + 'static,
{
    parse_or(key, std::env::var(key).ok(), default)
}

fn parse_or<T>(key: &str, raw: Option<String>, default: T) -> Result<T>
where
    T: FromStr,
    T::Err: std::error::Error + Send + Sync + 'static,
{
    match raw {
        None => Ok(default),
        Some(value) => value
            .trim()
            .parse::<T>()
            .with_context(|| format!("Environment variable '{key}' has invalid value '{value}'")),
    }
}
