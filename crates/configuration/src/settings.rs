use crate::error::ConfigError;
use serde::Deserialize;
use std::net::{IpAddr, SocketAddr};
use std::path::PathBuf;
use std::time::Duration;

/// The root configuration structure for the entire application.
#[derive(Debug, Clone, Deserialize)]
pub struct Settings {
    pub server: ServerSettings,
    pub database: DatabaseSettings,
    pub analytics: AnalyticsSettings,
    pub logging: LoggingSettings,
}

/// Where the HTTP server listens.
#[derive(Debug, Clone, Deserialize)]
pub struct ServerSettings {
    pub host: IpAddr,
    pub port: u16,
}

impl ServerSettings {
    pub fn socket_addr(&self) -> SocketAddr {
        SocketAddr::new(self.host, self.port)
    }
}

/// Contains parameters for the PostgreSQL connection pool.
#[derive(Debug, Clone, Deserialize)]
pub struct DatabaseSettings {
    /// Falls back to the `DATABASE_URL` environment variable when unset.
    pub url: Option<String>,
    pub max_connections: u32,
    /// How long a request may wait for a pooled connection before failing.
    #[serde(with = "humantime_serde")]
    pub acquire_timeout: Duration,
    /// Whether `sales(user_id)` should be indexed. Affects latency only.
    pub user_index: bool,
}

#[derive(Debug, Clone, Deserialize)]
pub struct AnalyticsSettings {
    /// Window used when a request does not name one.
    pub default_window: i64,
}

#[derive(Debug, Clone, Deserialize)]
pub struct LoggingSettings {
    /// An `EnvFilter` directive such as `info` or `web_server=debug,info`.
    /// `RUST_LOG` takes precedence when set.
    pub filter: String,
    pub format: LogFormat,
    /// When set, logs go to a daily-rolling file in this directory instead of stdout.
    pub directory: Option<PathBuf>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
#[cfg_attr(feature = "clap", derive(clap::ValueEnum))]
#[serde(rename_all = "lowercase")]
pub enum LogFormat {
    Full,
    Compact,
}

impl Settings {
    /// Uses `env_url` for the database when no URL was configured.
    pub fn with_database_url_fallback(mut self, env_url: Option<String>) -> Self {
        if self.database.url.is_none() {
            self.database.url = env_url;
        }
        self
    }

    /// Rejects values that deserialize fine but cannot work at runtime.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.analytics.default_window < 1 {
            return Err(ConfigError::ValidationError(format!(
                "analytics.default_window must be at least 1, got {}",
                self.analytics.default_window
            )));
        }
        if self.database.max_connections == 0 {
            return Err(ConfigError::ValidationError(
                "database.max_connections must be at least 1".to_string(),
            ));
        }
        if self.server.port == 0 {
            return Err(ConfigError::ValidationError(
                "server.port must not be 0".to_string(),
            ));
        }
        Ok(())
    }
}
