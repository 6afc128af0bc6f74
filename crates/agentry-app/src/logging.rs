//! Logging and tracing setup for the agentry binary
//!
//! Console output goes to stderr so command output on stdout stays clean.
//! JSON logs are written to a daily-rolling file for later inspection.
//! `RUST_LOG` overrides the configured filter.

use std::path::PathBuf;

use tracing_appender::non_blocking::WorkerGuard;
use tracing_subscriber::{
    EnvFilter, Layer,
    fmt::{self, format::FmtSpan},
    layer::SubscriberExt,
    util::SubscriberInitExt,
};

/// Logging configuration
#[derive(Debug, Clone)]
pub struct LoggingConfig {
    /// Directory where log files should be written
    pub log_dir: PathBuf,

    /// Whether to write JSON logs to a rolling file
    pub enable_json_logs: bool,

    /// Whether to log to the console (stderr)
    pub enable_console_logs: bool,

    /// Whether to include file/line information in logs
    pub include_location: bool,

    /// Whether to log span open/close events
    pub enable_spans: bool,

    /// Default log level filter
    pub default_filter: String,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            log_dir: log_directory(),
            enable_json_logs: true,
            enable_console_logs: true,
            include_location: cfg!(debug_assertions),
            enable_spans: cfg!(debug_assertions),
            default_filter: "info,agentry_app=debug,agentry_agents=debug,agentry_pool=debug,agentry_core=debug".to_string(),
        }
    }
}

impl LoggingConfig {
    /// Quiet console, JSON logs on disk
    pub fn production() -> Self {
        Self {
            log_dir: log_directory(),
            enable_json_logs: true,
            enable_console_logs: true,
            include_location: false,
            enable_spans: false,
            default_filter: "warn,agentry_app=info,agentry_agents=info,agentry_pool=info".to_string(),
        }
    }

    /// Verbose console output
    pub fn development() -> Self {
        Self::default()
    }

    /// Console only, no files
    #[allow(dead_code)]
    pub fn testing() -> Self {
        Self {
            log_dir: std::env::temp_dir().join("agentry-tests"),
            enable_json_logs: false,
            enable_console_logs: true,
            include_location: true,
            enable_spans: true,
            default_filter: "debug".to_string(),
        }
    }

    /// Replace the default filter if one is given
    pub fn with_filter(mut self, filter: Option<String>) -> Self {
        if let Some(filter) = filter {
            self.default_filter = filter;
        }
        self
    }
}

/// Initialize the logging system with the given configuration
///
/// Returns the file writer's guard when JSON logs are enabled; keep it alive
/// until exit so buffered lines are flushed.
pub fn init(config: LoggingConfig) -> anyhow::Result<Option<WorkerGuard>> {
    let env_filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(&config.default_filter));

    let span_events = if config.enable_spans {
        FmtSpan::NEW | FmtSpan::CLOSE
    } else {
        FmtSpan::NONE
    };

    let mut layers = Vec::new();
    let mut guard = None;

    if config.enable_console_logs {
        let console_layer = fmt::layer()
            .with_writer(std::io::stderr)
            .with_target(true)
            .with_file(config.include_location)
            .with_line_number(config.include_location)
            .with_span_events(span_events.clone())
            .compact()
            .with_filter(env_filter.clone())
            .boxed();

        layers.push(console_layer);
    }

    if config.enable_json_logs {
        std::fs::create_dir_all(&config.log_dir)?;
        let file_appender = tracing_appender::rolling::daily(&config.log_dir, "agentry.log");
        let (non_blocking, worker_guard) = tracing_appender::non_blocking(file_appender);
        guard = Some(worker_guard);

        let json_layer = fmt::layer()
            .with_target(true)
            .with_thread_ids(true)
            .with_thread_names(true)
            .with_file(true)
            .with_line_number(true)
            .with_span_events(span_events)
            .with_ansi(false)
            .json()
            .with_current_span(true)
            .with_span_list(true)
            .with_writer(non_blocking)
            .with_filter(env_filter)
            .boxed();

        layers.push(json_layer);
    }

    tracing_subscriber::registry().with(layers).try_init()?;

    tracing::debug!(
        log_dir = %config.log_dir.display(),
        json_enabled = config.enable_json_logs,
        console_enabled = config.enable_console_logs,
        "logging initialized"
    );

    Ok(guard)
}

/// Get the log directory path
pub fn log_directory() -> PathBuf {
    dirs::data_local_dir()
        .unwrap_or_else(|| PathBuf::from("."))
        .join("agentry")
        .join("logs")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_logging_config_defaults() {
        let config = LoggingConfig::default();
        assert!(config.enable_console_logs);
        assert!(config.enable_json_logs);
        assert!(config.log_dir.ends_with("agentry/logs"));
    }

    #[test]
    fn test_production_config() {
        let config = LoggingConfig::production();
        assert!(config.enable_json_logs);
        assert!(!config.include_location);
        assert!(config.default_filter.starts_with("warn"));
    }

    #[test]
    fn test_filter_override() {
        let config = LoggingConfig::testing().with_filter(Some("trace".into()));
        assert_eq!(config.default_filter, "trace");
        assert!(!config.enable_json_logs);

        let config = LoggingConfig::testing().with_filter(None);
        assert_eq!(config.default_filter, "debug");
    }
}
