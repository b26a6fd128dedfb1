use tracing_appender::non_blocking::WorkerGuard;
use tracing_subscriber::EnvFilter;

use crate::config::{self, LoggingSettings};

/// Send `tracing` output to a daily log file; the terminal belongs to the UI.
///
/// `RUST_LOG` overrides the configured filter. The returned guard flushes the
/// writer when dropped, so keep it for the life of the program.
pub fn init_logging(settings: &LoggingSettings) -> Option<WorkerGuard> {
    let dir = settings
        .directory
        .clone()
        .or_else(config::default_log_dir)?;
    if let Err(e) = std::fs::create_dir_all(&dir) {
        eprintln!("swipetune: cannot create log directory {}: {e}", dir.display());
        return None;
    }

    let file_appender = tracing_appender::rolling::daily(&dir, &settings.file_name);
    let (file_writer, guard) = tracing_appender::non_blocking(file_appender);

    let filter = EnvFilter::try_from_default_env()
        .or_else(|_| EnvFilter::try_new(&settings.filter))
        .unwrap_or_else(|_| EnvFilter::new("info"));

    let installed = tracing_subscriber::fmt()
        .with_writer(file_writer)
        .with_target(true)
        .with_level(true)
        .with_ansi(false)
        .with_env_filter(filter)
        .try_init();
    if let Err(e) = installed {
        eprintln!("swipetune: logging disabled: {e}");
        return None;
    }

    Some(guard)
}
