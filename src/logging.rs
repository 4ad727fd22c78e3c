use std::fs::{self, OpenOptions};
use std::path::Path;

use tracing_appender::non_blocking::WorkerGuard;
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;
use tracing_subscriber::{EnvFilter, fmt};

const LOG_FILE: &str = "spotstats.log";

fn env_filter() -> EnvFilter {
    EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"))
}

/// For the command-line binaries: human-readable lines on stderr.
pub fn init_stderr() {
    let _ = tracing_subscriber::registry()
        .with(env_filter())
        .with(fmt::layer().with_writer(std::io::stderr).with_target(false))
        .try_init();
}

/// For the dashboard, whose stdout belongs to the terminal UI. Returns `None`
/// (and logs nothing) when the directory is not writable. Keep the guard alive
/// for the life of the process.
pub fn init_file(dir: &Path) -> Option<WorkerGuard> {
    // rolling::daily panics if it cannot create the file, so check it first.
    fs::create_dir_all(dir).ok()?;
    let write_test = dir.join(".spotstats_write_test");
    OpenOptions::new()
        .create(true)
        .append(true)
        .open(&write_test)
        .ok()?;
    let _ = fs::remove_file(&write_test);

    let appender = tracing_appender::rolling::daily(dir, LOG_FILE);
    let (writer, guard) = tracing_appender::non_blocking(appender);
    tracing_subscriber::registry()
        .with(env_filter())
        .with(fmt::layer().with_writer(writer).with_ansi(false))
        .try_init()
        .ok()?;
    Some(guard)
}
