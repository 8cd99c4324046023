//! Tracing setup shared by the binaries: stderr plus an optional daily rolling file.
//!
//! - **RUST_LOG**: filter, e.g. `info`, `datahopper=debug`. When unset: `info`, or
//!   `debug` when `verbose` is requested.
//! - **`<APP>_LOG_DIR`** (e.g. `DATAHOPPER_LOG_DIR`): when set, logs are also written to
//!   `<dir>/<app>.log.<date>` without ANSI colours.

use tracing_appender::non_blocking::WorkerGuard;
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;
use tracing_subscriber::EnvFilter;

/// Keeps the file writer flushing; hold it until the program exits.
pub type TracingGuard = Option<WorkerGuard>;

/// Environment variable naming the log directory for `app_name`.
pub fn log_dir_var(app_name: &str) -> String {
    format!("{}_LOG_DIR", app_name.to_uppercase().replace('-', "_"))
}

/// Filter used when `RUST_LOG` is not set.
pub fn default_directive(verbose: bool) -> &'static str {
    if verbose {
        "debug,hyper_util=info,reqwest=info"
    } else {
        "info,hyper_util=off"
    }
}

/// Installs the global subscriber. Fails if one is already installed.
pub fn init_tracing(
    app_name: &str,
    verbose: bool,
) -> Result<TracingGuard, Box<dyn std::error::Error + Send + Sync>> {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(default_directive(verbose)));

    let stderr_layer = tracing_subscriber::fmt::layer()
        .with_writer(std::io::stderr)
        .with_target(true);

    let (file_layer, guard) = match std::env::var_os(log_dir_var(app_name)) {
        Some(dir) if !dir.is_empty() => {
            let appender = tracing_appender::rolling::daily(dir, format!("{}.log", app_name));
            let (writer, guard) = tracing_appender::non_blocking(appender);
            let layer = tracing_subscriber::fmt::layer()
                .with_writer(writer)
                .with_ansi(false);
            (Some(layer), Some(guard))
        }
        _ => (None, None),
    };

    tracing_subscriber::registry()
        .with(filter)
        .with(stderr_layer)
        .with(file_layer)
        .try_init()?;
    Ok(guard)
}
