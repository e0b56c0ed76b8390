//! Diagnostic logging
//!
//! The game owns the terminal, so logs never go to stdout or stderr. They are
//! written to a file when one is given and dropped otherwise.

use anyhow::{Context, Result};
use std::fs::OpenOptions;
use std::path::Path;
use std::sync::Mutex;
use tracing_subscriber::EnvFilter;

/// Filter used when `RUST_LOG` is not set
pub const DEFAULT_FILTER: &str = "info";

/// Install the global subscriber, appending to `log_file` if provided
pub fn init(log_file: Option<&Path>) -> Result<()> {
    let Some(path) = log_file else {
        return Ok(());
    };

    let file = OpenOptions::new()
        .create(true)
        .append(true)
        .open(path)
        .with_context(|| format!("Failed to open log file {}", path.display()))?;

    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(DEFAULT_FILTER));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(Mutex::new(file))
        .with_ansi(false)
        .with_target(false)
        .try_init()
        .map_err(|err| anyhow::anyhow!("Failed to install log subscriber: {err}"))?;

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_no_log_file_is_a_no_op() {
        assert!(init(None).is_ok());
    }

    #[test]
    fn test_unwritable_log_path_fails() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("missing").join("snake.log");
        let err = init(Some(&path)).unwrap_err();
        assert!(err.to_string().contains("Failed to open log file"));
    }
}
