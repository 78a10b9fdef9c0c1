use tracing_appender::non_blocking::WorkerGuard;
use tracing_subscriber::{fmt, layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

use crate::config::AppConfig;

/// Install stdout and daily-rolling file logging.
///
/// Keep the returned guards alive until exit or buffered lines are lost.
pub fn init_tracing(config: &AppConfig) -> Vec<WorkerGuard> {
    let file_appender = tracing_appender::rolling::daily(&config.log_dir, "ledger.log");
    let (file_writer, file_guard) = tracing_appender::non_blocking(file_appender);
    let (stdout_writer, stdout_guard) = tracing_appender::non_blocking(std::io::stdout());

    let filter = EnvFilter::try_new(&config.log_level).unwrap_or_else(|_| EnvFilter::new("info"));

    let result = tracing_subscriber::registry()
        .with(filter)
        .with(fmt::layer().with_writer(stdout_writer))
        .with(fmt::layer().with_ansi(false).with_writer(file_writer))
        .try_init();

    if let Err(e) = result {
        eprintln!("tracing already initialized: {}", e);
    }

    vec![file_guard, stdout_guard]
}
