use crate::error::ConfigError;
use std::path::Path;

// Declare the modules that make up this crate.
pub mod error;
pub mod logging;
pub mod settings;

// Re-export the core types to provide a clean public API.
pub use logging::init_tracing;
pub use settings::{
    DataSettings, ForecastSettings, IdStrategy, LoggingSettings, ServerSettings, Settings,
};

/// Prefix of environment variables that override file settings,
/// e.g. `DEALER_INSIGHTS__SERVER__PORT=8080`.
pub const ENV_PREFIX: &str = "DEALER_INSIGHTS";

/// Loads the application settings.
///
/// Sources are layered: built-in defaults, then the TOML file at `path` (skipped
/// when it does not exist), then `DEALER_INSIGHTS__*` environment variables.
/// The result is validated before it is returned.
pub fn load_settings(path: &Path) -> Result<Settings, ConfigError> {
    let builder = config::Config::builder()
        .add_source(config::File::from(path).required(false))
        .add_source(
            config::Environment::with_prefix(ENV_PREFIX)
                .prefix_separator("__")
                .separator("__"),
        )
        .build()?;

    let settings = builder.try_deserialize::<Settings>()?;
    settings.validate()?;

    Ok(settings)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn missing_file_yields_defaults() {
        let settings = load_settings(Path::new("/nonexistent/dealer-insights.toml")).unwrap();
        assert_eq!(settings, Settings::default());
    }

    #[test]
    fn file_overrides_defaults() {
        let mut file = tempfile::Builder::new().suffix(".toml").tempfile().unwrap();
        write!(
            file,
            r#"
            [server]
            port = 8080

            [forecast]
            id_strategy = "uuid"
            "#
        )
        .unwrap();

        let settings = load_settings(file.path()).unwrap();
        assert_eq!(settings.server.port, 8080);
        assert_eq!(settings.server.host, "0.0.0.0");
        assert_eq!(settings.forecast.id_strategy, IdStrategy::Uuid);
        assert_eq!(settings.forecast.max_sessions, 1024);
    }

    #[test]
    fn invalid_values_are_rejected() {
        let mut file = tempfile::Builder::new().suffix(".toml").tempfile().unwrap();
        write!(file, "[forecast]\nmax_sessions = 0\n").unwrap();

        assert!(matches!(load_settings(file.path()), Err(ConfigError::ValidationError(_))));
    }
}
