use std::path::PathBuf;
use std::time::Duration;

use thiserror::Error;
use url::Url;

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("invalid value for {name}: {message}")]
    InvalidValue { name: String, message: String },
    #[error("failed to parse {name} as integer: {source}")]
    ParseInt {
        name: String,
        #[source]
        source: std::num::ParseIntError,
    },
}

/// Client configuration loaded from environment variables.
#[derive(Debug, Clone)]
pub struct Config {
    // API
    pub api_base_url: String,

    // Session storage
    pub storage_path: PathBuf,

    // Form behaviour
    pub validation_delay: Duration,
    pub search_delay: Duration,
    pub flash_duration: Duration,

    // CLI rendering
    pub render_timeout: Duration,
}

impl Config {
    /// Load configuration from environment variables.
    ///
    /// # Errors
    ///
    /// Returns an error if a numeric variable cannot be parsed.
    pub fn from_env() -> Result<Self, ConfigError> {
        Ok(Self {
            // API
            api_base_url: env_or_default("API_BASE_URL", "http://localhost:8080"),

            // Session storage
            storage_path: PathBuf::from(env_or_default("STORAGE_PATH", "./data/storage.json")),

            // Form behaviour
            validation_delay: Duration::from_millis(parse_env_u64("VALIDATION_DELAY_MS", 750)?),
            search_delay: Duration::from_millis(parse_env_u64("SEARCH_DELAY_MS", 750)?),
            flash_duration: Duration::from_millis(parse_env_u64("FLASH_DURATION_MS", 3000)?),

            // CLI rendering
            render_timeout: Duration::from_secs(parse_env_u64("RENDER_TIMEOUT_SECS", 15)?),
        })
    }

    /// Configuration pointing at a local API with short delays, for tests.
    #[must_use]
    pub fn for_testing() -> Self {
        Self {
            api_base_url: "http://127.0.0.1:9".to_string(),
            storage_path: PathBuf::from("./data/test-storage.json"),
            validation_delay: Duration::from_millis(50),
            search_delay: Duration::from_millis(50),
            flash_duration: Duration::from_millis(3000),
            render_timeout: Duration::from_secs(5),
        }
    }

    /// Validate that the configuration is usable.
    ///
    /// # Errors
    ///
    /// Returns an error if the configuration is invalid.
    pub fn validate(&self) -> Result<(), ConfigError> {
        let base = Url::parse(&self.api_base_url).map_err(|e| ConfigError::InvalidValue {
            name: "API_BASE_URL".to_string(),
            message: e.to_string(),
        })?;
        if !matches!(base.scheme(), "http" | "https") {
            return Err(ConfigError::InvalidValue {
                name: "API_BASE_URL".to_string(),
                message: format!("unsupported scheme '{}'", base.scheme()),
            });
        }
        if self.storage_path.as_os_str().is_empty() {
            return Err(ConfigError::InvalidValue {
                name: "STORAGE_PATH".to_string(),
                message: "cannot be empty".to_string(),
            });
        }
        if self.validation_delay.is_zero() {
            return Err(ConfigError::InvalidValue {
                name: "VALIDATION_DELAY_MS".to_string(),
                message: "must be at least 1".to_string(),
            });
        }
        Ok(())
    }
}

fn env_or_default(name: &str, default: &str) -> String {
    std::env::var(name)
        .ok()
        .filter(|s| !s.is_empty())
        .unwrap_or_else(|| default.to_string())
}

fn parse_env_u64(name: &str, default: u64) -> Result<u64, ConfigError> {
    match std::env::var(name) {
        Ok(val) if !val.is_empty() => val.parse().map_err(|e| ConfigError::ParseInt {
            name: name.to_string(),
            source: e,
        }),
        _ => Ok(default),
    }
}
