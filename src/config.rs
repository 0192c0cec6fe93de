use serde::Deserialize;
use std::net::{IpAddr, SocketAddr};

use crate::domain::{BookingPolicy, MAX_PLACES_PER_BOOKING};

#[derive(Debug, Clone, Deserialize)]
pub struct Config {
    pub server: ServerConfig,
    pub storage: StorageConfig,
    pub logging: LoggingConfig,
    #[serde(default)]
    pub booking: BookingConfig,
}

#[derive(Debug, Clone, Deserialize)]
pub struct ServerConfig {
    #[serde(default = "default_host")]
    pub host: String,

    #[serde(default = "default_port")]
    pub port: u16,
}

/// Locations of the two stored documents
#[derive(Debug, Clone, Deserialize)]
pub struct StorageConfig {
    #[serde(default = "default_clubs_path")]
    pub clubs_path: String,

    #[serde(default = "default_competitions_path")]
    pub competitions_path: String,
}

#[derive(Debug, Clone, Deserialize)]
pub struct LoggingConfig {
    /// Level for this service's own events
    #[serde(default = "default_log_level")]
    pub level: String,

    /// Level for the per-request traces
    #[serde(default = "default_log_level")]
    pub http_level: String,

    #[serde(default)]
    pub format: LogFormat,
}

/// Output layout of log lines
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LogFormat {
    /// One JSON object per event
    Json,
    /// Single-line human-readable output
    Compact,
    /// Multi-line human-readable output
    #[default]
    Pretty,
}

const LOG_LEVELS: [&str; 6] = ["trace", "debug", "info", "warn", "error", "off"];

#[derive(Debug, Clone, Deserialize)]
pub struct BookingConfig {
    /// Most places a club may book in one request
    #[serde(default = "default_max_places_per_booking")]
    pub max_places_per_booking: u32,
}

impl Default for BookingConfig {
    fn default() -> Self {
        Self {
            max_places_per_booking: default_max_places_per_booking(),
        }
    }
}

impl From<&BookingConfig> for BookingPolicy {
    fn from(config: &BookingConfig) -> Self {
        BookingPolicy {
            max_places: config.max_places_per_booking,
        }
    }
}

// Default value functions
fn default_host() -> String {
    "127.0.0.1".to_string()
}
fn default_port() -> u16 {
    5000
}
fn default_clubs_path() -> String {
    "data/clubs.json".to_string()
}
fn default_competitions_path() -> String {
    "data/competitions.json".to_string()
}
fn default_log_level() -> String {
    "info".to_string()
}
fn default_max_places_per_booking() -> u32 {
    MAX_PLACES_PER_BOOKING
}

/// Configuration validation error
#[derive(Debug, thiserror::Error)]
pub enum ConfigValidationError {
    #[error("Missing required configuration: {0}")]
    MissingRequired(String),

    #[error("Invalid configuration value: {0}")]
    InvalidValue(String),
}

impl Config {
    /// Load configuration from `config/default`, an optional `config/local`, then
    /// `BOOKING__*` environment variables.
    pub fn load() -> Result<Self, config::ConfigError> {
        let config = config::Config::builder()
            .add_source(config::File::with_name("config/default"))
            .add_source(config::File::with_name("config/local").required(false))
            .add_source(config::Environment::with_prefix("BOOKING").separator("__"))
            .build()?;

        let cfg: Self = config.try_deserialize()?;
        cfg.validate()
            .map_err(|e| config::ConfigError::Message(e.to_string()))?;
        Ok(cfg)
    }

    /// Load configuration for testing with custom overrides.
    ///
    /// Built entirely from embedded defaults and overrides, without reading config files.
    pub fn load_for_test(overrides: &[(&str, &str)]) -> Result<Self, config::ConfigError> {
        let defaults = r#"
            [server]
            host = "127.0.0.1"
            port = 5000

            [storage]
            clubs_path = "data/clubs.json"
            competitions_path = "data/competitions.json"

            [logging]
            level = "info"
            http_level = "info"
            format = "pretty"

            [booking]
            max_places_per_booking = 12
        "#;

        let mut builder = config::Config::builder()
            .add_source(config::File::from_str(defaults, config::FileFormat::Toml));

        for (key, value) in overrides {
            builder = builder.set_override(*key, *value)?;
        }

        builder.build()?.try_deserialize()
    }

    /// Validate configuration values.
    pub fn validate(&self) -> Result<(), ConfigValidationError> {
        if self.server.port == 0 {
            return Err(ConfigValidationError::InvalidValue(
                "Server port cannot be 0".to_string(),
            ));
        }

        if self.server.host.parse::<IpAddr>().is_err() {
            return Err(ConfigValidationError::InvalidValue(format!(
                "Server host is not an IP address: {}",
                self.server.host
            )));
        }

        if self.storage.clubs_path.is_empty() {
            return Err(ConfigValidationError::MissingRequired(
                "BOOKING__STORAGE__CLUBS_PATH must not be empty".to_string(),
            ));
        }

        if self.storage.competitions_path.is_empty() {
            return Err(ConfigValidationError::MissingRequired(
                "BOOKING__STORAGE__COMPETITIONS_PATH must not be empty".to_string(),
            ));
        }

        for level in [&self.logging.level, &self.logging.http_level] {
            if !LOG_LEVELS.contains(&level.to_ascii_lowercase().as_str()) {
                return Err(ConfigValidationError::InvalidValue(format!(
                    "Unknown log level: {level}"
                )));
            }
        }

        if self.booking.max_places_per_booking == 0 {
            return Err(ConfigValidationError::InvalidValue(
                "max_places_per_booking must be at least 1".to_string(),
            ));
        }

        Ok(())
    }

    /// Address to listen on
    ///
    /// Falls back to localhost when the host does not parse; [`Config::validate`] rejects that
    /// case up front.
    pub fn socket_addr(&self) -> SocketAddr {
        let ip = self
            .server
            .host
            .parse()
            .unwrap_or(IpAddr::from([127, 0, 0, 1]));
        SocketAddr::new(ip, self.server.port)
    }

    pub fn booking_policy(&self) -> BookingPolicy {
        BookingPolicy::from(&self.booking)
    }
}
