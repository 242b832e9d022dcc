//! Tracing setup.
//!
//! One-shot commands log to stderr. The TUI owns the terminal, so it only logs
//! when a file is given.

use std::path::Path;

use tracing_appender::non_blocking::WorkerGuard;
use tracing_subscriber::{EnvFilter, fmt, layer::SubscriberExt, util::SubscriberInitExt};

use crate::error::{AppError, EXIT_IO};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LogTarget<'a> {
    Stderr,
    File(&'a Path),
    Off,
}

/// Install the global subscriber.
///
/// The returned guard flushes the file writer on drop; keep it alive for the
/// life of the program.
pub fn init(target: LogTarget<'_>, verbose: bool) -> Result<Option<WorkerGuard>, AppError> {
    let filter = if verbose {
        EnvFilter::new("statdash=debug")
    } else {
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"))
    };

    match target {
        LogTarget::Off => Ok(None),
        LogTarget::Stderr => {
            tracing_subscriber::registry()
                .with(filter)
                .with(fmt::layer().compact().with_writer(std::io::stderr))
                .try_init()
                .map_err(|e| AppError::new(EXIT_IO, format!("Failed to install logger: {e}")))?;
            Ok(None)
        }
        LogTarget::File(path) => {
            let dir = path.parent().filter(|p| !p.as_os_str().is_empty()).unwrap_or(Path::new("."));
            let name = path
                .file_name()
                .ok_or_else(|| AppError::new(EXIT_IO, format!("Log path '{}' has no file name", path.display())))?;
            std::fs::create_dir_all(dir)
                .map_err(|e| AppError::new(EXIT_IO, format!("Failed to create log dir '{}': {e}", dir.display())))?;

            let (writer, guard) = tracing_appender::non_blocking(tracing_appender::rolling::never(dir, name));
            tracing_subscriber::registry()
                .with(filter)
                .with(fmt::layer().with_ansi(false).with_writer(writer))
                .try_init()
                .map_err(|e| AppError::new(EXIT_IO, format!("Failed to install logger: {e}")))?;
            Ok(Some(guard))
        }
    }
}
