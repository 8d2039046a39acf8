use crate::error::ConfigError;
use serde::Deserialize;
use std::path::PathBuf;

/// The root configuration structure for the entire application.
///
/// Every section has defaults, so an empty or missing file is a valid configuration.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct Settings {
    pub server: ServerSettings,
    pub data: DataSettings,
    pub forecast: ForecastSettings,
    pub logging: LoggingSettings,
}

impl Settings {
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.server.port == 0 {
            return Err(ConfigError::ValidationError("server.port must be greater than 0".to_string()));
        }
        if self.server.host.trim().is_empty() {
            return Err(ConfigError::ValidationError("server.host must not be empty".to_string()));
        }
        if self.forecast.max_sessions == 0 {
            return Err(ConfigError::ValidationError(
                "forecast.max_sessions must be greater than 0".to_string(),
            ));
        }
        Ok(())
    }
}

/// Where the HTTP API listens.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct ServerSettings {
    pub host: String,
    pub port: u16,
    /// Maximum accepted request body size.
    pub body_limit_bytes: usize,
}

impl Default for ServerSettings {
    fn default() -> Self {
        Self {
            host: "0.0.0.0".to_string(),
            port: 3000,
            body_limit_bytes: 1024 * 1024,
        }
    }
}

/// Where the dataset comes from.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct DataSettings {
    /// A JSON dataset file. The built-in seed data is used when unset.
    pub path: Option<PathBuf>,
}

/// How forecast ids are generated.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize)]
#[cfg_attr(feature = "clap", derive(clap::ValueEnum))]
#[serde(rename_all = "lowercase")]
pub enum IdStrategy {
    /// `FC-000001`, `FC-000002`, ...
    #[default]
    Sequential,
    /// Random v4 UUIDs.
    Uuid,
}

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct ForecastSettings {
    pub id_strategy: IdStrategy,
    /// Number of sessions whose last forecast run is kept. The oldest session is
    /// dropped when a new one would exceed this.
    pub max_sessions: usize,
}

impl Default for ForecastSettings {
    fn default() -> Self {
        Self {
            id_strategy: IdStrategy::default(),
            max_sessions: 1024,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct LoggingSettings {
    /// `EnvFilter` directive used when `RUST_LOG` is not set.
    pub level: String,
    /// When set, logs are also written to a daily rolling file in this directory.
    pub directory: Option<PathBuf>,
}

impl Default for LoggingSettings {
    fn default() -> Self {
        Self {
            level: "info".to_string(),
            directory: None,
        }
    }
}
