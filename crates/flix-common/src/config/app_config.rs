//! Application configuration structs
//!
//! Loads configuration from environment variables (and an optional `.env`
//! file) through a `config::Config` source, falling back to defaults.

use std::time::Duration;

use serde::de::DeserializeOwned;
use serde::Deserialize;

/// Main application configuration
#[derive(Debug, Clone, Deserialize)]
pub struct AppConfig {
    pub app: AppSettings,
    pub feed: FeedConfig,
    pub snowflake: SnowflakeConfig,
}

/// General application settings
#[derive(Debug, Clone, Deserialize)]
pub struct AppSettings {
    #[serde(default = "default_app_name")]
    pub name: String,
    #[serde(default)]
    pub env: Environment,
}

/// Environment type
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum Environment {
    #[default]
    Development,
    Staging,
    Production,
}

impl Environment {
    #[must_use]
    pub fn is_production(&self) -> bool {
        matches!(self, Self::Production)
    }

    #[must_use]
    pub fn is_development(&self) -> bool {
        matches!(self, Self::Development)
    }

    fn parse(value: &str) -> Option<Self> {
        match value.to_lowercase().as_str() {
            "production" => Some(Self::Production),
            "staging" => Some(Self::Staging),
            "development" => Some(Self::Development),
            _ => None,
        }
    }
}

/// Feed engine tuning
#[derive(Debug, Clone, Deserialize)]
pub struct FeedConfig {
    /// Period of the timer that re-evaluates live feeds so posts age out
    /// without a write
    #[serde(default = "default_refresh_interval_ms")]
    pub refresh_interval_ms: u64,
    /// How long a resolved author profile may be reused
    #[serde(default = "default_profile_cache_ttl_secs")]
    pub profile_cache_ttl_secs: u64,
    /// Reject a new post while the author still holds a valid one
    #[serde(default = "default_enforce_single_post")]
    pub enforce_single_post: bool,
}

impl FeedConfig {
    #[must_use]
    pub fn refresh_interval(&self) -> Duration {
        Duration::from_millis(self.refresh_interval_ms)
    }

    #[must_use]
    pub fn profile_cache_ttl(&self) -> Duration {
        Duration::from_secs(self.profile_cache_ttl_secs)
    }
}

impl Default for FeedConfig {
    fn default() -> Self {
        Self {
            refresh_interval_ms: default_refresh_interval_ms(),
            profile_cache_ttl_secs: default_profile_cache_ttl_secs(),
            enforce_single_post: default_enforce_single_post(),
        }
    }
}

/// Snowflake ID generator configuration
#[derive(Debug, Clone, Default, Deserialize)]
pub struct SnowflakeConfig {
    #[serde(default)]
    pub worker_id: u16,
}

// Default value functions
fn default_app_name() -> String {
    "flix".to_string()
}

fn default_refresh_interval_ms() -> u64 {
    30_000
}

fn default_profile_cache_ttl_secs() -> u64 {
    300
}

fn default_enforce_single_post() -> bool {
    true
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            app: AppSettings {
                name: default_app_name(),
                env: Environment::default(),
            },
            feed: FeedConfig::default(),
            snowflake: SnowflakeConfig::default(),
        }
    }
}

impl AppConfig {
    /// Load configuration from environment variables
    ///
    /// Reads `.env` if present. Every key is optional.
    pub fn from_env() -> Result<Self, ConfigError> {
        // Missing .env is fine
        let _ = dotenvy::dotenv();

        let source = config::Config::builder()
            .add_source(config::Environment::default().try_parsing(true))
            .build()
            .map_err(|e| ConfigError::Source(e.to_string()))?;

        Self::from_source(&source)
    }

    /// Build from an already assembled `config::Config`.
    ///
    /// Keys are the lowercase forms of the environment variables
    /// (`app_env`, `feed_refresh_interval_ms`, `worker_id`, ...).
    pub fn from_source(source: &config::Config) -> Result<Self, ConfigError> {
        let env = match read::<String>(source, "app_env")? {
            Some(value) => Environment::parse(&value)
                .ok_or(ConfigError::InvalidValue("APP_ENV", value))?,
            None => Environment::default(),
        };

        let refresh_interval_ms = read(source, "feed_refresh_interval_ms")?
            .unwrap_or_else(default_refresh_interval_ms);
        if refresh_interval_ms == 0 {
            return Err(ConfigError::InvalidValue(
                "FEED_REFRESH_INTERVAL_MS",
                "must be greater than zero".to_string(),
            ));
        }

        let worker_id: u16 = read(source, "worker_id")?.unwrap_or(0);
        if worker_id >= 1024 {
            return Err(ConfigError::InvalidValue(
                "WORKER_ID",
                format!("{worker_id} is not below 1024"),
            ));
        }

        Ok(Self {
            app: AppSettings {
                name: read(source, "app_name")?.unwrap_or_else(default_app_name),
                env,
            },
            feed: FeedConfig {
                refresh_interval_ms,
                profile_cache_ttl_secs: read(source, "profile_cache_ttl_secs")?
                    .unwrap_or_else(default_profile_cache_ttl_secs),
                enforce_single_post: read(source, "enforce_single_post")?
                    .unwrap_or_else(default_enforce_single_post),
            },
            snowflake: SnowflakeConfig { worker_id },
        })
    }
}

fn read<T: DeserializeOwned>(
    source: &config::Config,
    key: &'static str,
) -> Result<Option<T>, ConfigError> {
    match source.get::<T>(key) {
        Ok(value) => Ok(Some(value)),
        Err(config::ConfigError::NotFound(_)) => Ok(None),
        Err(e) => Err(ConfigError::InvalidValue(key, e.to_string())),
    }
}

/// Configuration errors
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("Invalid value for {0}: {1}")]
    InvalidValue(&'static str, String),

    #[error("Configuration source error: {0}")]
    Source(String),
}
