//! # Configuration
//!
//! Environment-sourced settings for the data-access layer.
//!
//! ## Sources
//!
//! Values are read from the process environment through the `config` crate,
//! after an optional `.env` file has been merged in by `dotenvy` (existing
//! variables win). Keys are matched case-insensitively, so `POSTGRES_URL` and
//! `postgres_url` are the same setting.
//!
//! | Variable              | Required | Default |
//! |-----------------------|----------|---------|
//! | `POSTGRES_URL`        | yes      |         |
//! | `TZ`                  | yes      |         |
//! | `DEBUG`               | no       | `false` |
//! | `LOGGING_FORMAT_JSON` | no       | `false` |
//! | `TEST_MODE`           | no       | `false` |
//! | `ENV`                 | no       | `dev`   |
//! | `VERSION_COMMIT_HASH` | no       |         |
//! | `VERSION`             | no       |         |
//! | `DB_MAX_CONNECTIONS`  | no       | `10`    |
//!
//! ## Usage
//!
//! ```rust,no_run
//! use pansen_sqla::config::AppConfig;
//!
//! # fn main() -> Result<(), Box<dyn std::error::Error>> {
//! let config = AppConfig::load()?;
//! println!("connecting to {}", config.connection.host);
//! # Ok(())
//! # }
//! ```

pub mod connection_args;
pub mod error;
pub mod loader;

use crate::constants::defaults;
use chrono_tz::Tz;
use serde::Deserialize;

pub use connection_args::{mask_url, PostgresConnectionArgs};
pub use error::{ConfigResult, ConfigurationError};

/// Settings exactly as the environment provides them, before validation
#[derive(Debug, Clone, Deserialize)]
pub(crate) struct RawConfig {
    #[serde(default)]
    pub debug: bool,
    #[serde(default)]
    pub logging_format_json: bool,
    #[serde(default)]
    pub test_mode: bool,
    pub postgres_url: Option<String>,
    #[serde(default = "default_environment")]
    pub env: String,
    pub tz: Option<String>,
    pub version_commit_hash: Option<String>,
    pub version: Option<String>,
    #[serde(default = "default_max_connections")]
    pub db_max_connections: u32,
}

fn default_environment() -> String {
    defaults::ENVIRONMENT.to_string()
}

fn default_max_connections() -> u32 {
    defaults::MAX_CONNECTIONS
}

/// Validated application configuration
#[derive(Debug, Clone)]
pub struct AppConfig {
    pub debug: bool,
    pub logging_format_json: bool,
    pub test_mode: bool,
    /// The URL as configured, untouched by test-mode rewriting
    pub postgres_url: String,
    /// Connection parameters split out of `postgres_url` (with the test suffix applied in test mode)
    pub connection: PostgresConnectionArgs,
    pub env: String,
    pub tz: Tz,
    pub version_commit_hash: Option<String>,
    pub version: Option<String>,
    pub max_connections: u32,
}

impl AppConfig {
    /// Validate raw settings and derive the connection parameters
    pub(crate) fn from_raw(raw: RawConfig) -> ConfigResult<Self> {
        let postgres_url = raw
            .postgres_url
            .filter(|url| !url.trim().is_empty())
            .ok_or_else(|| ConfigurationError::missing_required_field("POSTGRES_URL", "environment"))?;

        let tz_name = raw
            .tz
            .filter(|tz| !tz.trim().is_empty())
            .ok_or_else(|| ConfigurationError::missing_required_field("TZ", "environment"))?;
        let tz = parse_timezone(&tz_name)?;

        if raw.db_max_connections == 0 {
            return Err(ConfigurationError::invalid_value(
                "DB_MAX_CONNECTIONS",
                "0",
                "the pool needs at least one connection",
            ));
        }

        let mut connection = PostgresConnectionArgs::parse(&postgres_url)?;
        if raw.test_mode {
            connection = connection.into_test_database();
        }

        Ok(Self {
            debug: raw.debug,
            logging_format_json: raw.logging_format_json,
            test_mode: raw.test_mode,
            postgres_url,
            connection,
            env: raw.env,
            tz,
            version_commit_hash: raw.version_commit_hash,
            version: raw.version,
            max_connections: raw.db_max_connections,
        })
    }

    /// URL handed to the async driver
    pub fn sqlx_url(&self) -> String {
        self.connection.sqlx_url()
    }

    /// Switch an already loaded configuration into test mode
    pub fn into_test_mode(mut self) -> Self {
        self.test_mode = true;
        self.connection = self.connection.into_test_database();
        self
    }

    /// The current wall-clock time in the configured timezone
    pub fn now(&self) -> chrono::DateTime<Tz> {
        chrono::Utc::now().with_timezone(&self.tz)
    }
}

/// Parse an IANA timezone identifier such as `Europe/Berlin`
pub fn parse_timezone(name: &str) -> ConfigResult<Tz> {
    name.trim()
        .parse::<Tz>()
        .map_err(|e| ConfigurationError::invalid_value("TZ", name, e.to_string()))
}
