use crate::error::ConfigError;
use std::path::Path;

// Declare the modules that make up this crate.
pub mod error;
pub mod logging;
pub mod settings;

// Re-export the core types to provide a clean public API.
pub use logging::init_tracing;
pub use settings::{Config, LoggingSettings, ReportMode, ReportSettings, ServerSettings};

/// Prefix of the environment variables that override file settings,
/// e.g. `JOURNAL__REPORTS__ADHOC_TOP_N=3`.
pub const ENV_PREFIX: &str = "JOURNAL";

/// Loads the application configuration from `config.toml` and the environment.
///
/// The file is optional; every setting has a default.
pub fn load_config() -> Result<Config, ConfigError> {
    load_config_from(Path::new("config.toml"))
}

/// Loads the configuration from the given TOML file (if it exists) and the environment.
pub fn load_config_from(path: &Path) -> Result<Config, ConfigError> {
    let builder = config::Config::builder()
        .add_source(config::File::from(path).required(false))
        .add_source(
            config::Environment::with_prefix(ENV_PREFIX)
                .separator("__")
                .list_separator(",")
                .with_list_parse_key("reports.emotional_mistakes")
                .try_parsing(true),
        )
        .build()?;

    // Attempt to deserialize the entire configuration into our `Config` struct
    let config = builder.try_deserialize::<Config>()?;
    validate(&config)?;

    Ok(config)
}

fn validate(config: &Config) -> Result<(), ConfigError> {
    if config.reports.scheduled_top_n == 0 || config.reports.adhoc_top_n == 0 {
        return Err(ConfigError::ValidationError(
            "report top_n values must be at least 1".to_string(),
        ));
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    fn write_config(contents: &str) -> tempfile::NamedTempFile {
        let mut file = tempfile::Builder::new().suffix(".toml").tempfile().unwrap();
        file.write_all(contents.as_bytes()).unwrap();
        file
    }

    #[test]
    fn missing_file_falls_back_to_defaults() {
        let config = load_config_from(Path::new("does-not-exist.toml")).unwrap();
        assert_eq!(config.reports.scheduled_top_n, 10);
        assert_eq!(config.reports.adhoc_top_n, 5);
        assert_eq!(config.reports.emotional_mistakes.len(), 5);
        assert_eq!(ReportMode::AdHoc.top_n(&config.reports), 5);
        assert_eq!(config.server.addr().unwrap().port(), 3000);
    }

    #[test]
    fn file_values_override_defaults() {
        let file = write_config(
            r#"
            [reports]
            adhoc_top_n = 3
            emotional_mistakes = ["FOMO trading"]

            [logging]
            level = "debug"
            "#,
        );

        let config = load_config_from(file.path()).unwrap();

        assert_eq!(config.reports.adhoc_top_n, 3);
        assert_eq!(config.reports.scheduled_top_n, 10);
        assert_eq!(config.reports.emotional_mistakes, vec!["FOMO trading".to_string()]);
        assert_eq!(config.logging.level, "debug");
        assert!(config.logging.directory.is_none());
    }

    #[test]
    fn zero_top_n_is_rejected() {
        let file = write_config("[reports]\nscheduled_top_n = 0\n");
        assert!(matches!(
            load_config_from(file.path()),
            Err(ConfigError::ValidationError(_))
        ));
    }

    #[test]
    fn non_ip_host_only_matters_when_listening() {
        let file = write_config("[server]\nhost = \"localhost\"\n");

        let config = load_config_from(file.path()).unwrap();

        assert_eq!(config.reports.adhoc_top_n, 5);
        assert!(config.server.addr().is_none());
    }
}
