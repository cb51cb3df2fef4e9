//! [`Config`]-related definitions.

use std::time::Duration;

use config::{builder::DefaultState, ConfigBuilder, ConfigError};
use serde::Deserialize;
use smart_default::SmartDefault;

/// Application configuration.
#[derive(Clone, Debug, Default, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Listing backend configuration.
    pub api: Api,

    /// Reverse geocoding configuration.
    pub geocoder: Geocoder,

    /// Log configuration.
    pub log: Log,
}

impl Config {
    /// Creates a new [`Config`] by:
    /// - loading it from the provided `path` (if any);
    /// - merging it with the environment variables (if any);
    /// - using default values for missing fields.
    ///
    /// # Errors
    ///
    /// Returns an error if the configuration is invalid.
    pub fn new(path: impl AsRef<str>) -> Result<Self, ConfigError> {
        ConfigBuilder::<DefaultState>::default()
            .add_source(config::File::with_name(path.as_ref()).required(false))
            .add_source(config::Environment::with_prefix("CONF").separator("."))
            .build()?
            .try_deserialize()
    }
}

/// Listing backend configuration.
#[derive(Clone, Debug, Deserialize, SmartDefault)]
#[serde(default)]
pub struct Api {
    /// Base URL the `properties/` and `property-types/` endpoints live
    /// under.
    #[default("http://127.0.0.1:8000/api".to_owned())]
    pub base_url: String,

    /// Timeout of a single request.
    #[default(Duration::from_secs(30))]
    #[serde(with = "humantime_serde")]
    pub timeout: Duration,

    /// `User-Agent` header sent with every request.
    #[default(concat!("property-browser/", env!("CARGO_PKG_VERSION")).to_owned())]
    pub user_agent: String,
}

/// Reverse geocoding configuration.
#[derive(Clone, Debug, Deserialize, SmartDefault)]
#[serde(default)]
pub struct Geocoder {
    /// Endpoint accepting `lat`, `lon` and `format=json`.
    #[default("https://nominatim.openstreetmap.org/reverse".to_owned())]
    pub url: String,

    /// Timeout of a single lookup.
    #[default(Duration::from_secs(5))]
    #[serde(with = "humantime_serde")]
    pub timeout: Duration,
}

/// Logging of the driver binary. `RUST_LOG` takes precedence.
#[derive(Clone, Copy, Debug, Default, Deserialize)]
#[serde(default)]
pub struct Log {
    /// Most verbose level printed.
    pub level: LogLevel,
}

/// Level names accepted in the `[log]` section and in `CONF_LOG.LEVEL`.
#[derive(Clone, Copy, Debug, Default, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum LogLevel {
    /// Every reconcile pass and issued request.
    Trace,

    /// Page corrections, dropped stale responses and request bookkeeping.
    Debug,

    /// Completed fetches and loaded property types.
    #[default]
    Info,

    /// Recovered failures: unreadable URLs, failed lookups, failed searches.
    Warn,

    Error,
}

impl From<LogLevel> for tracing::Level {
    fn from(value: LogLevel) -> Self {
        match value {
            LogLevel::Trace => Self::TRACE,
            LogLevel::Debug => Self::DEBUG,
            LogLevel::Info => Self::INFO,
            LogLevel::Warn => Self::WARN,
            LogLevel::Error => Self::ERROR,
        }
    }
}
