//! # Structured Logging Module
//!
//! Console logging through the tracing ecosystem with two output formats:
//! plain text for humans and JSON for log shippers. Every target can be given
//! its own level; `RUST_LOG` still takes precedence when set.

use crate::config::AppConfig;
use crate::constants::log_targets;
use std::sync::OnceLock;
use tracing::Level;
use tracing_subscriber::{fmt, layer::SubscriberExt, util::SubscriberInitExt, EnvFilter, Layer};

static LOGGER_INITIALIZED: OnceLock<()> = OnceLock::new();

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LogFormat {
    Plain,
    Json,
}

/// Base level plus optional per-target overrides
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LogConfig {
    pub level: Level,
    pub format: LogFormat,
    pub targets: Vec<(String, Level)>,
}

impl LogConfig {
    pub fn new(level: Level, format: LogFormat) -> Self {
        Self {
            level,
            format,
            targets: Vec::new(),
        }
    }

    /// Derive logging from the application settings: `DEBUG` picks the level,
    /// `LOGGING_FORMAT_JSON` the format. `sqlx` statement logging stays at
    /// `WARN` unless debugging.
    pub fn from_app_config(config: &AppConfig) -> Self {
        let level = if config.debug {
            Level::DEBUG
        } else {
            Level::INFO
        };
        let format = if config.logging_format_json {
            LogFormat::Json
        } else {
            LogFormat::Plain
        };

        Self::new(level, format)
            .with_target(log_targets::CRATE, level)
            .with_target(log_targets::SQLX, if config.debug { Level::DEBUG } else { Level::WARN })
    }

    pub fn with_target(mut self, target: impl Into<String>, level: Level) -> Self {
        let target = target.into();
        self.targets.retain(|(existing, _)| *existing != target);
        self.targets.push((target, level));
        self
    }

    /// `EnvFilter` directive string, e.g. `info,pansen_sqla=debug,sqlx=warn`
    pub fn directives(&self) -> String {
        std::iter::once(level_name(self.level))
            .chain(
                self.targets
                    .iter()
                    .map(|(target, level)| format!("{target}={}", level_name(*level))),
            )
            .collect::<Vec<_>>()
            .join(",")
    }

    fn env_filter(&self) -> EnvFilter {
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(self.directives()))
    }
}

fn level_name(level: Level) -> String {
    level.as_str().to_ascii_lowercase()
}

/// Initialize console logging once per process
///
/// Later calls are no-ops, and an already installed global subscriber is left alone.
pub fn init_structured_logging(config: &LogConfig) {
    LOGGER_INITIALIZED.get_or_init(|| {
        let layer = match config.format {
            LogFormat::Plain => fmt::layer()
                .with_target(true)
                .with_thread_ids(true)
                .with_thread_names(true)
                .with_level(true)
                .boxed(),
            LogFormat::Json => fmt::layer()
                .json()
                .with_target(true)
                .with_thread_names(true)
                .with_level(true)
                .boxed(),
        };

        let subscriber = tracing_subscriber::registry().with(layer.with_filter(config.env_filter()));

        if subscriber.try_init().is_err() {
            tracing::debug!("Global tracing subscriber already initialized - continuing with existing subscriber");
        }

        tracing::info!(
            format = ?config.format,
            directives = %config.directives(),
            "Structured logging initialized"
        );
    });
}
