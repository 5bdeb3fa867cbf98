//! Process-wide log output.
//!
//! Logs always go to stderr: stdout belongs to the stdio transport and to
//! the boundary worker's single JSON result. A log file can be added on top.

use crate::config::FileLoggingConfig;
use std::fs::OpenOptions;
use thiserror::Error;
use tracing_appender::non_blocking::WorkerGuard;
use tracing_subscriber::{EnvFilter, Layer, layer::SubscriberExt, util::SubscriberInitExt};

#[derive(Debug, Error)]
pub enum LoggingError {
    #[error("Cannot open log file {path}: {source}")]
    OpenFile {
        path: String,
        #[source]
        source: std::io::Error,
    },

    #[error("Logging already initialized: {0}")]
    Init(#[from] tracing_subscriber::util::TryInitError),
}

/// Pick the filter directive.
///
/// `-v` flags win over the configured level. `None` defers to `RUST_LOG`,
/// and failing that only warnings and errors are shown.
pub fn filter_directive(verbosity: u8, level: Option<&str>) -> Option<String> {
    match (verbosity, level) {
        (0, Some(level)) if !level.trim().is_empty() => Some(level.trim().to_string()),
        (0, _) => None,
        (1, _) => Some("info".to_string()),
        (2, _) => Some("debug".to_string()),
        _ => Some("trace".to_string()), // -vvv or more
    }
}

fn build_filter(directive: Option<&str>) -> EnvFilter {
    let filter = match directive {
        Some(directive) => EnvFilter::try_new(directive).ok(),
        None => EnvFilter::try_from_default_env().ok(),
    };
    filter.unwrap_or_else(|| EnvFilter::new("warn"))
}

/// Install the global subscriber.
///
/// Keep the returned guard alive until exit, or buffered file lines are lost.
pub fn init_logging(
    verbosity: u8,
    config: &FileLoggingConfig,
) -> Result<Option<WorkerGuard>, LoggingError> {
    let directive = filter_directive(verbosity, config.level.as_deref());

    let stderr_layer = tracing_subscriber::fmt::layer()
        .with_writer(std::io::stderr)
        .with_target(false)
        .with_filter(build_filter(directive.as_deref()));

    let (file_layer, guard) = match config.file.as_deref().filter(|p| !p.trim().is_empty()) {
        Some(path) => {
            let file = OpenOptions::new()
                .create(true)
                .append(true)
                .open(path)
                .map_err(|source| LoggingError::OpenFile {
                    path: path.to_string(),
                    source,
                })?;
            let (writer, guard) = tracing_appender::non_blocking(file);
            let layer = tracing_subscriber::fmt::layer()
                .with_writer(writer)
                .with_ansi(false)
                .with_filter(build_filter(directive.as_deref()));
            (Some(layer), Some(guard))
        }
        None => (None, None),
    };

    tracing_subscriber::registry()
        .with(stderr_layer)
        .with(file_layer)
        .try_init()?;

    Ok(guard)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_verbosity_overrides_configured_level() {
        assert_eq!(filter_directive(0, None), None);
        assert_eq!(filter_directive(0, Some("debug")).as_deref(), Some("debug"));
        assert_eq!(filter_directive(0, Some("  ")), None);
        assert_eq!(filter_directive(1, Some("error")).as_deref(), Some("info"));
        assert_eq!(filter_directive(2, None).as_deref(), Some("debug"));
        assert_eq!(filter_directive(5, None).as_deref(), Some("trace"));
    }

    #[test]
    fn test_unopenable_log_file_is_reported() {
        let dir = tempfile::tempdir().unwrap();
        let config = FileLoggingConfig {
            level: None,
            file: Some(dir.path().join("missing/dir/app.log").display().to_string()),
        };
        let err = init_logging(0, &config).unwrap_err();
        assert!(matches!(err, LoggingError::OpenFile { .. }));
    }
}
