//! Configuration Loader
//!
//! Merges an optional dotenv file with the process environment and hands the
//! result to the `config` crate for deserialization. The process environment
//! always wins over the dotenv file, and neither source is mutated.

use super::error::{ConfigResult, ConfigurationError};
use super::{mask_url, AppConfig, RawConfig};
use crate::constants::defaults;
use config::{Config, Environment};
use serde_json::json;
use std::path::Path;
use tracing::debug;

impl AppConfig {
    /// Load configuration from `./.env` (if present) and the process environment
    pub fn load() -> ConfigResult<Self> {
        Self::load_with_dotenv(Path::new(defaults::DOTENV_FILE))
    }

    /// Load configuration from a specific dotenv file (if present) and the process environment
    pub fn load_with_dotenv(path: &Path) -> ConfigResult<Self> {
        let mut vars = read_dotenv(path)?;
        vars.extend(
            std::env::vars_os()
                .filter_map(|(key, value)| Some((key.into_string().ok()?, value.into_string().ok()?))),
        );

        Self::from_env_map(vars)
    }

    /// Build configuration from an explicit set of environment variables
    ///
    /// This is what tests use instead of touching the real process environment.
    pub fn from_env_map(vars: config::Map<String, String>) -> ConfigResult<Self> {
        let raw: RawConfig = Config::builder()
            .add_source(Environment::default().source(Some(vars)))
            .build()
            .and_then(Config::try_deserialize)
            .map_err(|e| ConfigurationError::source_error("environment", e))?;

        let config = Self::from_raw(raw)?;

        debug!(
            config = %config.debug_config(),
            "Configuration loaded successfully"
        );

        Ok(config)
    }

    /// JSON view of the configuration with secrets masked, safe for logs and the CLI
    pub fn debug_config(&self) -> serde_json::Value {
        let mut value = json!({
            "debug": self.debug,
            "logging_format_json": self.logging_format_json,
            "test_mode": self.test_mode,
            "postgres_url": mask_url(&self.postgres_url),
            "connection": self.connection,
            "env": self.env,
            "tz": self.tz.name(),
            "version_commit_hash": self.version_commit_hash,
            "version": self.version,
            "max_connections": self.max_connections,
        });

        sanitize_json_recursive(&mut value, &["password", "secret", "token", "credential"]);
        value
    }
}

fn read_dotenv(path: &Path) -> ConfigResult<config::Map<String, String>> {
    let source_name = path.display().to_string();

    let iter = match dotenvy::from_path_iter(path) {
        Ok(iter) => iter,
        Err(e) if e.not_found() => {
            debug!(path = %source_name, "No dotenv file, using process environment only");
            return Ok(config::Map::new());
        }
        Err(e) => return Err(ConfigurationError::source_error(source_name, e)),
    };

    iter.map(|item| item.map_err(|e| ConfigurationError::source_error(source_name.clone(), e)))
        .collect()
}

/// Recursively mask fields whose name looks sensitive
fn sanitize_json_recursive(value: &mut serde_json::Value, sensitive_patterns: &[&str]) {
    match value {
        serde_json::Value::Object(map) => {
            for (key, val) in map.iter_mut() {
                let key_lower = key.to_lowercase();
                let is_sensitive = sensitive_patterns
                    .iter()
                    .any(|pattern| key_lower.contains(pattern));

                if is_sensitive && !val.is_null() {
                    *val = serde_json::Value::String("[MASKED]".to_string());
                } else {
                    sanitize_json_recursive(val, sensitive_patterns);
                }
            }
        }
        serde_json::Value::Array(items) => {
            for item in items {
                sanitize_json_recursive(item, sensitive_patterns);
            }
        }
        _ => {}
    }
}
