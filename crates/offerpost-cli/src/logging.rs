//! Tracing setup: stdout plus an append-only log file.

use std::path::Path;
use std::sync::OnceLock;
use std::{fs, io};

use tracing_appender::non_blocking::{NonBlocking, WorkerGuard};
use tracing_subscriber::fmt::writer::BoxMakeWriter;
use tracing_subscriber::{EnvFilter, fmt, prelude::*, registry};

static LOG_GUARD: OnceLock<WorkerGuard> = OnceLock::new();

const TIME_FORMAT: &str = "%Y-%m-%dT%H:%M:%S%.3fZ";

fn default_directives() -> &'static str {
    "info,hyper=warn,reqwest=warn"
}

fn env_filter() -> EnvFilter {
    EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_directives()))
}

/// Install the global subscriber. If `log_file` cannot be opened, logs go to
/// stdout only.
pub fn init(log_file: &Path) -> anyhow::Result<()> {
    let file_writer = match build_file_writer(log_file) {
        Ok(writer) => Some(writer),
        Err(err) => {
            eprintln!(
                "failed to open log file {}, logging to stdout only: {err}",
                log_file.display()
            );
            None
        }
    };

    let stdout_layer = fmt::layer()
        .with_timer(fmt::time::ChronoUtc::new(TIME_FORMAT.to_string()))
        .with_target(false)
        .with_writer(BoxMakeWriter::new(io::stdout));

    let file_layer = file_writer.map(|writer| {
        fmt::layer()
            .with_timer(fmt::time::ChronoUtc::new(TIME_FORMAT.to_string()))
            .with_target(false)
            .with_ansi(false)
            .with_writer(writer)
    });

    registry()
        .with(env_filter())
        .with(stdout_layer)
        .with(file_layer)
        .try_init()?;
    Ok(())
}

fn build_file_writer(log_file: &Path) -> anyhow::Result<NonBlocking> {
    let dir = match log_file.parent() {
        Some(dir) if !dir.as_os_str().is_empty() => dir,
        _ => Path::new("."),
    };
    let name = log_file
        .file_name()
        .ok_or_else(|| anyhow::anyhow!("log path {} has no file name", log_file.display()))?;
    fs::create_dir_all(dir)?;

    let appender = tracing_appender::rolling::never(dir, name);
    let (non_blocking, guard) = tracing_appender::non_blocking(appender);

    LOG_GUARD
        .set(guard)
        .map_err(|_| anyhow::anyhow!("log guard already initialized"))?;

    Ok(non_blocking)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_directives_parse() {
        let filter = EnvFilter::try_new(default_directives());
        assert!(filter.is_ok());
    }

    #[test]
    fn path_without_file_name_is_rejected() {
        assert!(build_file_writer(Path::new("/")).is_err());
    }
}
