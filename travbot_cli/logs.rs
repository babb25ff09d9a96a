use tracing_appender::non_blocking::WorkerGuard;
use tracing_subscriber::{EnvFilter, fmt, prelude::*};

/// Sets up the logging configuration for the bot.
///
/// Two layers: stdout, and a daily rotating file in `logs/`.
/// Log levels come from `RUST_LOG`, defaulting to `info` for everything and
/// `debug` for the bot crates.
///
/// The returned guard flushes the file writer when dropped, keep it alive
/// until the end of `main`.
pub fn setup_logging() -> WorkerGuard {
    let file_appender = tracing_appender::rolling::daily("logs", "travbot.log");
    let (non_blocking_file, guard) = tracing_appender::non_blocking(file_appender);

    // stdout is reserved to command results
    let console_layer = fmt::layer()
        .with_writer(std::io::stderr)
        .with_target(true);

    let file_layer = fmt::layer()
        .with_writer(non_blocking_file)
        .with_ansi(false)
        .with_thread_ids(true)
        .with_target(true);

    let default_filter = "info,travbot_app=debug,travbot_game=debug,travbot=debug";

    let env_filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_filter));

    tracing_subscriber::registry()
        .with(env_filter)
        .with(file_layer)
        .with(console_layer)
        .init();

    guard
}
