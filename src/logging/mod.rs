//! Structured logging setup
//!
//! Console output uses the human-readable `fmt` layer; when a log directory is
//! configured, JSON lines are also written to a daily rolling file.

pub mod config;

pub use config::LoggingConfig;

use tracing_appender::non_blocking::WorkerGuard;
use tracing_subscriber::{fmt, layer::SubscriberExt, util::SubscriberInitExt, EnvFilter, Layer};

/// Keeps the file writer alive; dropping it flushes pending log lines.
#[must_use = "dropping the guard stops file logging"]
pub struct LoggingGuard {
    _file_guard: Option<WorkerGuard>,
}

/// Install the global subscriber. `RUST_LOG` takes precedence over the configured level.
pub fn init_logging(config: &LoggingConfig) -> crate::Result<LoggingGuard> {
    config.validate().map_err(|e| anyhow::anyhow!(e))?;

    let env_filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| {
        EnvFilter::new(format!(
            "{}={}",
            env!("CARGO_PKG_NAME").replace('-', "_"),
            config.global_level
        ))
    });

    let mut layers = Vec::new();

    if config.console_output {
        let console_layer = fmt::layer()
            .with_target(true)
            .with_line_number(config.include_file_location)
            .with_file(config.include_file_location)
            .with_writer(std::io::stderr);
        layers.push(console_layer.boxed());
    }

    let mut file_guard = None;
    if let Some(ref log_dir) = config.log_directory {
        let file_appender = tracing_appender::rolling::daily(log_dir, "vision-utils.log");
        let (non_blocking, guard) = tracing_appender::non_blocking(file_appender);
        file_guard = Some(guard);

        let file_layer = fmt::layer()
            .with_writer(non_blocking)
            .with_ansi(false)
            .json();
        layers.push(file_layer.boxed());
    }

    tracing_subscriber::registry()
        .with(env_filter)
        .with(layers)
        .try_init()?;

    tracing::debug!(?config, "Logging initialized");
    Ok(LoggingGuard {
        _file_guard: file_guard,
    })
}
