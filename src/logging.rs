//! Tracing setup.
//!
//! The dashboard owns the terminal, so its logs go to a file in the config
//! directory. One-shot CLI commands log to stderr instead. Both honor
//! `RUST_LOG` and default to `info`.

use anyhow::{Context, Result};
use std::fs::OpenOptions;
use std::path::Path;
use std::sync::Mutex;
use tracing_subscriber::{fmt, layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

pub const LOG_FILE_NAME: &str = "dronedeck.log";

fn env_filter() -> EnvFilter {
    EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"))
}

/// Append logs to `path`, creating the file if needed.
pub fn init_file(path: &Path) -> Result<()> {
    let file = OpenOptions::new()
        .create(true)
        .append(true)
        .open(path)
        .with_context(|| format!("failed to open log file {}", path.display()))?;

    tracing_subscriber::registry()
        .with(env_filter())
        .with(
            fmt::layer()
                .with_target(true)
                .with_ansi(false)
                .with_writer(Mutex::new(file)),
        )
        .try_init()
        .context("failed to install tracing subscriber")
}

pub fn init_stderr() -> Result<()> {
    tracing_subscriber::registry()
        .with(env_filter())
        .with(fmt::layer().with_target(false).with_writer(std::io::stderr))
        .try_init()
        .context("failed to install tracing subscriber")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_init_file_creates_log_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join(LOG_FILE_NAME);

        // The only test in this binary that installs the global subscriber
        init_file(&path).unwrap();
        tracing::info!("log file ready");

        assert!(path.exists());
    }

    #[test]
    fn test_init_file_reports_unopenable_path() {
        let dir = tempfile::tempdir().unwrap();

        let err = init_file(dir.path()).unwrap_err();
        assert!(err.to_string().contains("failed to open log file"));
    }
}
