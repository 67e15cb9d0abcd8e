use crate::error::ConfigError;
use config::builder::DefaultState;
use config::ConfigBuilder;
use std::path::Path;

// Declare the modules that make up this crate.
pub mod error;
pub mod logging;
pub mod settings;

// Re-export the core types to provide a clean public API.
pub use logging::init_tracing;
pub use settings::{
    AnalyticsSettings, DatabaseSettings, LogFormat, LoggingSettings, ServerSettings, Settings,
};

/// Default settings file, read from the working directory when present.
pub const DEFAULT_CONFIG_FILE: &str = "config.toml";

/// Prefix for environment overrides, e.g. `SALESIGHT__SERVER__PORT=8080`.
pub const ENV_PREFIX: &str = "SALESIGHT";

/// Loads the application settings.
///
/// Sources are layered: built-in defaults, then the settings file (`path`, or an
/// optional `config.toml`), then `SALESIGHT__*` environment variables. A missing
/// `database.url` falls back to `DATABASE_URL`. The result is validated.
pub fn load_settings(path: Option<&Path>) -> Result<Settings, ConfigError> {
    let file = match path {
        Some(path) => config::File::from(path).required(true),
        None => config::File::from(Path::new(DEFAULT_CONFIG_FILE)).required(false),
    };

    let settings = defaults()?
        .add_source(file)
        .add_source(
            config::Environment::with_prefix(ENV_PREFIX)
                .separator("__")
                .try_parsing(true),
        )
        .build()?
        .try_deserialize::<Settings>()?
        .with_database_url_fallback(std::env::var("DATABASE_URL").ok());

    settings.validate()?;
    Ok(settings)
}

/// Builds settings from TOML text layered over the defaults. Environment
/// variables are not consulted.
pub fn settings_from_toml(toml: &str) -> Result<Settings, ConfigError> {
    let settings = defaults()?
        .add_source(config::File::from_str(toml, config::FileFormat::Toml))
        .build()?
        .try_deserialize::<Settings>()?;

    settings.validate()?;
    Ok(settings)
}

fn defaults() -> Result<ConfigBuilder<DefaultState>, ConfigError> {
    let builder = config::Config::builder()
        .set_default("server.host", "127.0.0.1")?
        .set_default("server.port", 8000_i64)?
        .set_default("database.max_connections", 5_i64)?
        .set_default("database.acquire_timeout", "5s")?
        .set_default("database.user_index", true)?
        .set_default("analytics.default_window", 7_i64)?
        .set_default("logging.filter", "info")?
        .set_default("logging.format", "full")?;
    Ok(builder)
}
