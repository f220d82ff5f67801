//! Tracing setup: stderr plus a per-session log file.
use std::path::PathBuf;
use std::time::{SystemTime, UNIX_EPOCH};

use anyhow::Result;
use tracing_appender::non_blocking::WorkerGuard;
use tracing_subscriber::EnvFilter;
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;

use crate::config::ClientConfig;

/// Install the global subscriber.
///
/// The returned guard flushes the file writer on drop and must be kept alive
/// for the whole session.
pub fn setup_logging(config: &ClientConfig) -> Result<WorkerGuard> {
    let session_id = config.session_id.clone().unwrap_or_else(|| {
        let timestamp = SystemTime::now()
            .duration_since(UNIX_EPOCH)
            .map(|elapsed| elapsed.as_secs())
            .unwrap_or_default();
        format!("session_{}", timestamp)
    });

    let log_dir = config.log_dir.clone().unwrap_or_else(default_log_directory);
    let session_log_dir = log_dir.join(&session_id);
    std::fs::create_dir_all(&session_log_dir)?;

    let file_appender = tracing_appender::rolling::never(&session_log_dir, "autopilot.log");
    let (non_blocking_file, guard) = tracing_appender::non_blocking(file_appender);

    let env_filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));

    let file_layer = tracing_subscriber::fmt::layer()
        .with_writer(non_blocking_file)
        .with_ansi(false);
    let stderr_layer = tracing_subscriber::fmt::layer().with_writer(std::io::stderr);

    tracing_subscriber::registry()
        .with(env_filter)
        .with(stderr_layer)
        .with(file_layer)
        .try_init()?;

    tracing::info!("Logging initialized: session={}", session_id);
    tracing::info!("Log file: {}/autopilot.log", session_log_dir.display());

    Ok(guard)
}

/// Platform cache directory, falling back to the system temp directory.
fn default_log_directory() -> PathBuf {
    directories::ProjectDirs::from("", "", "autopilot")
        .map(|dirs| dirs.cache_dir().join("logs"))
        .unwrap_or_else(|| std::env::temp_dir().join("autopilot").join("logs"))
}
