use std::fs;
use std::path::Path;
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

const DEFAULT_FILTER: &str = "owner_resolver=info";
const LOG_FILE_PREFIX: &str = "owner-resolver.log";

/// Initializes logging: human-readable output on stderr (stdout carries the
/// JSON documents) and, when `log_dir` is given, daily-rolling JSON files.
///
/// `RUST_LOG` overrides the default `owner_resolver=info` filter. Calling this
/// twice is harmless; the second call keeps the first subscriber.
pub fn init_logging(log_dir: Option<&Path>) {
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(DEFAULT_FILTER));

    let console_layer = fmt::layer().with_writer(std::io::stderr).with_target(false);

    let file_layer = log_dir.and_then(|dir| {
        if let Err(e) = fs::create_dir_all(dir) {
            eprintln!("⚠️  Could not create log directory {}: {}", dir.display(), e);
            return None;
        }

        let file_appender = tracing_appender::rolling::daily(dir, LOG_FILE_PREFIX);
        let (non_blocking_writer, guard) = tracing_appender::non_blocking(file_appender);

        // The guard flushes on drop; keep it for the life of the process
        std::mem::forget(guard);

        Some(fmt::layer().json().with_writer(non_blocking_writer))
    });

    let _ = tracing_subscriber::registry()
        .with(filter)
        .with(console_layer)
        .with(file_layer)
        .try_init();
}
