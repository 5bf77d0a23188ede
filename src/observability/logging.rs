//! Logging setup
//!
//! Installs a `tracing-subscriber` fmt subscriber for binaries that embed the
//! adapters. Libraries should not call this; they only emit events.
//!
//! Settings come from `DATORA_LOG_LEVEL`, `DATORA_LOG_FORMAT` (`text`, `json`,
//! `json-flat`) and `DATORA_LOG_FILE`, like the rest of [`crate::config`].
//!
//! ```rust,ignore
//! let _guard = init_subscriber(LoggingConfig::from_env())?;
//! ```

use crate::config::parse_var;
use crate::defaults;
use crate::error::AdapterError;
use std::path::PathBuf;
use std::str::FromStr;
use tracing::{Level, Subscriber};
use tracing_appender::non_blocking::WorkerGuard;
use tracing_subscriber::EnvFilter;
use tracing_subscriber::fmt::writer::BoxMakeWriter;

/// Output format for logs
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum OutputFormat {
    #[default]
    Text,
    /// One JSON object per line
    Json,
    /// JSON with event fields lifted to the top level
    JsonFlat,
}

impl FromStr for OutputFormat {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "text" | "pretty" => Ok(Self::Text),
            "json" => Ok(Self::Json),
            "json-flat" | "json_flat" | "flat" => Ok(Self::JsonFlat),
            other => Err(format!("unknown log format: {other}")),
        }
    }
}

/// Subscriber settings
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LoggingConfig {
    pub level: Level,
    pub format: OutputFormat,
    /// Daily-rolling log file; stdout when unset
    pub file: Option<PathBuf>,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: defaults::logging::LOG_LEVEL.parse().unwrap_or(Level::INFO),
            format: OutputFormat::default(),
            file: None,
        }
    }
}

impl LoggingConfig {
    /// Read `DATORA_LOG_*` environment variables
    pub fn from_env() -> Self {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Same as [`from_env`](Self::from_env) with an explicit lookup function.
    /// Unparseable values are logged and ignored.
    pub fn from_lookup<F>(lookup: F) -> Self
    where
        F: Fn(&str) -> Option<String>,
    {
        let get = |key: &str| lookup(key).filter(|v| !v.trim().is_empty());
        let mut config = Self::default();
        if let Some(level) = parse_var::<Level>(&get, "DATORA_LOG_LEVEL") {
            config.level = level;
        }
        if let Some(format) = parse_var::<OutputFormat>(&get, "DATORA_LOG_FORMAT") {
            config.format = format;
        }
        config.file = get("DATORA_LOG_FILE").map(PathBuf::from);
        config
    }

    fn filter_directive(&self) -> String {
        format!(
            "datora_adapters={}",
            self.level.as_str().to_ascii_lowercase()
        )
    }
}

/// Boxed subscriber plus the file writer's guard, if any
pub type BuiltSubscriber = (Box<dyn Subscriber + Send + Sync>, Option<WorkerGuard>);

/// Build the subscriber described by `config` without installing it.
///
/// `RUST_LOG` overrides the configured level when set.
pub fn build_subscriber(config: &LoggingConfig) -> Result<BuiltSubscriber, AdapterError> {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(config.filter_directive()));

    let (writer, guard) = match &config.file {
        Some(path) => {
            let directory = path
                .parent()
                .filter(|p| !p.as_os_str().is_empty())
                .map(PathBuf::from)
                .unwrap_or_else(|| PathBuf::from("."));
            let file_name = path.file_name().ok_or_else(|| {
                AdapterError::ConfigurationError(format!(
                    "Log file path has no file name: {}",
                    path.display()
                ))
            })?;
            let appender = tracing_appender::rolling::daily(directory, file_name);
            let (non_blocking, guard) = tracing_appender::non_blocking(appender);
            (BoxMakeWriter::new(non_blocking), Some(guard))
        }
        None => (BoxMakeWriter::new(std::io::stdout), None),
    };

    let builder = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(writer)
        .with_target(true);

    let subscriber: Box<dyn Subscriber + Send + Sync> = match config.format {
        OutputFormat::Text => Box::new(builder.finish()),
        OutputFormat::Json => Box::new(builder.json().finish()),
        OutputFormat::JsonFlat => Box::new(builder.json().flatten_event(true).finish()),
    };
    Ok((subscriber, guard))
}

/// Initialize the global tracing subscriber.
///
/// Returns the `WorkerGuard` of the file writer, which must be kept alive
/// for the program's lifetime. Calling this when a subscriber is already
/// installed is not an error; the earlier subscriber stays in place.
pub fn init_subscriber(config: LoggingConfig) -> Result<Option<WorkerGuard>, AdapterError> {
    let (subscriber, guard) = build_subscriber(&config)?;
    if tracing::subscriber::set_global_default(subscriber).is_err() {
        tracing::debug!("global subscriber already installed, keeping it");
    }
    Ok(guard)
}
