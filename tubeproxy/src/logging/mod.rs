//! Logging setup: console output plus an optional daily-rotated log file.
//!
//! File output goes through `tracing_appender::non_blocking`, so request
//! handlers only push formatted lines into a bounded channel and a dedicated
//! worker thread does the writing.

use chrono::Local;
use std::path::Path;
use tracing_appender::non_blocking::WorkerGuard;
use tracing_subscriber::{
    EnvFilter,
    fmt::{self, format::Writer, time::FormatTime},
    layer::SubscriberExt,
    util::SubscriberInitExt,
};

/// Default log filter directive.
pub const DEFAULT_LOG_FILTER: &str = "tubeproxy=info,tube_extractor=info,tower_http=info";

/// File name prefix of the rotated log files (`tubeproxy.log.YYYY-MM-DD`).
const LOG_FILE_PREFIX: &str = "tubeproxy.log";

/// Timer that formats timestamps in the server's local timezone.
#[derive(Debug, Clone, Copy)]
struct LocalTimer;

impl FormatTime for LocalTimer {
    fn format_time(&self, w: &mut Writer<'_>) -> std::fmt::Result {
        let now = Local::now();
        write!(w, "{}", now.format("%Y-%m-%dT%H:%M:%S%.3f%:z"))
    }
}

/// Resolves the active filter. `RUST_LOG` wins over the configured directive.
pub fn build_filter(directive: &str) -> crate::Result<EnvFilter> {
    if let Ok(filter) = EnvFilter::try_from_default_env() {
        return Ok(filter);
    }
    EnvFilter::try_new(directive)
        .map_err(|e| crate::Error::config(format!("Invalid log filter '{directive}': {e}")))
}

/// Initialize logging.
///
/// Returns the file writer guard when `log_dir` is set; keep it alive for the
/// whole process or buffered lines are lost on exit.
pub fn init_logging(directive: &str, log_dir: Option<&Path>) -> crate::Result<Option<WorkerGuard>> {
    let filter = build_filter(directive)?;

    let (file_layer, guard) = match log_dir {
        Some(dir) => {
            std::fs::create_dir_all(dir)?;
            let file_appender = tracing_appender::rolling::daily(dir, LOG_FILE_PREFIX);
            let (non_blocking, guard) = tracing_appender::non_blocking(file_appender);
            let layer = fmt::layer()
                .with_writer(non_blocking)
                .with_ansi(false)
                .with_timer(LocalTimer);
            (Some(layer), Some(guard))
        }
        None => (None, None),
    };

    tracing_subscriber::registry()
        .with(filter)
        .with(fmt::layer().with_ansi(true).with_timer(LocalTimer))
        .with(file_layer)
        .try_init()
        .map_err(|e| crate::Error::Other(format!("Failed to set global default subscriber: {e}")))?;

    Ok(guard)
}
