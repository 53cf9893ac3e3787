//! Tracing subscriber setup.

use tracing_appender::non_blocking::WorkerGuard;
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;
use tracing_subscriber::{EnvFilter, fmt};

use crate::config::LoggingConfig;

const LOG_FILE_PREFIX: &str = "attendance-service.log";

fn env_filter() -> EnvFilter {
    EnvFilter::from_default_env().add_directive(tracing::Level::INFO.into())
}

/// Install the global subscriber.
///
/// With a log directory configured, output is also written to a daily
/// rotated file. Keep the returned guard alive until shutdown so buffered
/// lines get flushed.
pub fn init(config: &LoggingConfig) -> Option<WorkerGuard> {
    match &config.directory {
        Some(directory) => {
            let appender = tracing_appender::rolling::daily(directory, LOG_FILE_PREFIX);
            let (writer, guard) = tracing_appender::non_blocking(appender);

            tracing_subscriber::registry()
                .with(env_filter())
                .with(fmt::layer())
                .with(fmt::layer().with_ansi(false).with_writer(writer))
                .init();

            Some(guard)
        }
        None => {
            tracing_subscriber::fmt().with_env_filter(env_filter()).init();
            None
        }
    }
}
