use std::fs;

use tracing::Subscriber;
use tracing_appender::non_blocking::WorkerGuard;
use tracing_subscriber::registry::LookupSpan;
use tracing_subscriber::{fmt, prelude::*, EnvFilter, Layer};

use crate::config::LoggingConfig;

/// Initializes console logging on stderr plus, when a directory is
/// configured, a daily-rolling JSON log file.
///
/// Keep the returned guard alive until exit so buffered file logs flush.
pub fn init_logging(config: &LoggingConfig) -> Option<WorkerGuard> {
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(&config.filter));

    let Some(directory) = &config.directory else {
        let _ = tracing_subscriber::registry()
            .with(console_layer())
            .with(filter)
            .try_init();
        return None;
    };

    if let Err(e) = fs::create_dir_all(directory) {
        eprintln!("Could not create log directory '{}': {e}", directory.display());
    }

    let file_appender = tracing_appender::rolling::daily(directory, &config.file_name);
    let (non_blocking_writer, guard) = tracing_appender::non_blocking(file_appender);

    let file_layer = if config.json_file {
        fmt::layer().json().with_writer(non_blocking_writer).boxed()
    } else {
        fmt::layer().with_ansi(false).with_writer(non_blocking_writer).boxed()
    };

    let _ = tracing_subscriber::registry()
        .with(file_layer)
        .with(console_layer())
        .with(filter)
        .try_init();

    Some(guard)
}

/// Human-readable output on stderr, so stdout stays clean for exports
fn console_layer<S>() -> Box<dyn Layer<S> + Send + Sync>
where
    S: Subscriber + for<'a> LookupSpan<'a> + 'static,
{
    fmt::layer().with_writer(std::io::stderr).with_target(false).boxed()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_file_logging_creates_directory() {
        let dir = tempfile::tempdir().unwrap();
        let log_dir = dir.path().join("logs");
        let config = LoggingConfig {
            directory: Some(log_dir.clone()),
            ..Default::default()
        };

        let guard = init_logging(&config);
        assert!(guard.is_some());
        assert!(log_dir.is_dir());
    }

    #[test]
    fn test_console_only_logging_has_no_guard() {
        let config = LoggingConfig::default();
        assert!(init_logging(&config).is_none());
    }
}
