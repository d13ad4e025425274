use std::env;
use std::io;
use std::path::Path;
use tracing::debug;
use tracing_appender::non_blocking::WorkerGuard;
use tracing_subscriber::prelude::*;
use tracing_subscriber::{fmt, EnvFilter};

use dupe_tree::AppConfig;

/// Human-readable events on stderr, plus a plain-text copy in the configured
/// log file. `TRACING_LEVEL` overrides the configured level.
///
/// Keep the returned guard alive for the whole run or buffered file output is lost.
pub fn init_logger(config: &AppConfig) -> Option<WorkerGuard> {
    let filter = env::var("TRACING_LEVEL").unwrap_or_else(|_| config.log_level.clone());
    let filter_layer = EnvFilter::try_new(&filter).unwrap_or_else(|_| EnvFilter::new("info"));

    let stderr_layer = fmt::layer()
        .with_writer(io::stderr)
        .with_target(false)
        .without_time()
        .with_ansi(true);

    let (file_layer, guard) = match &config.log_file {
        Some(path) => {
            let dir = path
                .parent()
                .filter(|p| !p.as_os_str().is_empty())
                .unwrap_or_else(|| Path::new("."));
            let name = path
                .file_name()
                .map(|n| n.to_os_string())
                .unwrap_or_else(|| "dupe-tree.log".into());
            let (writer, guard) = tracing_appender::non_blocking(tracing_appender::rolling::never(dir, name));
            let layer = fmt::layer().with_writer(writer).with_ansi(false);
            (Some(layer), Some(guard))
        }
        None => (None, None),
    };

    tracing_subscriber::registry()
        .with(filter_layer)
        .with(stderr_layer)
        .with(file_layer)
        .init();

    debug!(
        "Logging at '{}' to stderr{}",
        filter,
        config
            .log_file
            .as_ref()
            .map(|p| format!(" and {}", p.display()))
            .unwrap_or_default()
    );

    guard
}
