use std::path::Path;

use clap::ValueEnum;
use tracing_appender::non_blocking::WorkerGuard;
use tracing_appender::rolling::{RollingFileAppender, Rotation};
use tracing_subscriber::fmt::time::UtcTime;
use tracing_subscriber::{fmt, EnvFilter, layer::SubscriberExt, util::SubscriberInitExt};
use crate::config::settings::{LogFormat, LoggingConfig};
use crate::config::types::ServiceConfig;


#[derive(Debug, Clone, Copy, ValueEnum)]
pub enum LogLevel {
    TRACE,
    DEBUG,
    INFO,
    WARN,
    ERROR,
}

impl LogLevel {
    pub fn as_str(&self) -> &'static str {
        match *self {
            LogLevel::TRACE => "trace",
            LogLevel::DEBUG => "debug",
            LogLevel::INFO => "info",
            LogLevel::WARN => "warn",
            LogLevel::ERROR => "error",
        }
    }
}

/// Resolve the logging config (CLI level wins over the file) and install it.
/// Keep the returned guard alive until exit so buffered lines are flushed.
pub fn run(service_config: Option<&ServiceConfig>, arg_log_level: Option<LogLevel>) -> WorkerGuard {
    let mut logging_config = service_config
        .and_then(|config| config.settings.logging.clone())
        .unwrap_or_default();

    if let Some(level) = arg_log_level {
        logging_config.level = level.as_str().to_owned();
    }

    init_logging(&logging_config)
}


/// Initialize tracing with the desired config.
///
/// stdout belongs to the credential protocol: logs go to stderr, or to
/// `cfg.file` when set.
pub fn init_logging(cfg: &LoggingConfig) -> WorkerGuard {
    let env_filter = EnvFilter::try_new(&cfg.level)
        .unwrap_or_else(|_| EnvFilter::new("error"));

    // Base layer: filter + writer
    let registry = tracing_subscriber::registry().with(env_filter);

    let appender = cfg.file.as_deref().and_then(file_appender);
    let ansi = appender.is_none();
    let (writer, guard) = match appender {
        Some(appender) => tracing_appender::non_blocking(appender),
        None => tracing_appender::non_blocking(std::io::stderr()),
    };

    // Choose format layer
    match cfg.format {
        LogFormat::Json => {
            let layer = fmt::layer()
                .json()
                .with_timer(UtcTime::rfc_3339())
                .flatten_event(true)
                .with_writer(writer)
                .with_ansi(false);

            let _ = registry.with(layer).try_init();
        }
        LogFormat::Compact => {
            let layer = fmt::layer()
                .compact()
                .with_timer(UtcTime::rfc_3339())
                .with_writer(writer)
                .with_ansi(ansi);

            let _ = registry.with(layer).try_init();
        }
    };
    guard
}

fn file_appender(file: &str) -> Option<RollingFileAppender> {
    let path = Path::new(file);
    let dir = path.parent()?;
    let name = path.file_name()?.to_string_lossy().into_owned();
    RollingFileAppender::builder()
        .rotation(Rotation::NEVER)
        .filename_prefix(name)
        .build(dir)
        .inspect_err(|err| eprintln!("cannot open log file {}: {}, logging to stderr", file, err))
        .ok()
}
