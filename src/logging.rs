//! Tracing subscriber setup.
//!
//! CLI commands log to stderr so stdout stays clean for tables and JSON.
//! The TUI owns the terminal, so it logs to a file instead.

use std::fs::OpenOptions;
use std::path::PathBuf;
use std::sync::Mutex;

use tracing_subscriber::EnvFilter;

use crate::error::AppError;

/// Where log lines go.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LogTarget {
    Stderr,
    File(PathBuf),
}

/// Log file used by the TUI.
pub const TUI_LOG_FILE: &str = "areas.log";

/// Install the global subscriber. A second call is a no-op.
pub fn init_logging(directive: &str, target: LogTarget) -> Result<(), AppError> {
    let filter = EnvFilter::try_new(directive)
        .map_err(|e| AppError::input(format!("Invalid log filter '{directive}': {e}")))?;

    let builder = tracing_subscriber::fmt().with_env_filter(filter).with_target(false);

    let installed = match target {
        LogTarget::Stderr => builder.with_writer(std::io::stderr).try_init(),
        LogTarget::File(path) => {
            let file = OpenOptions::new()
                .create(true)
                .append(true)
                .open(&path)
                .map_err(|e| AppError::runtime(format!("Failed to open log file '{}': {e}", path.display())))?;
            builder.with_ansi(false).with_writer(Mutex::new(file)).try_init()
        }
    };

    // Tests and embedders may have installed a subscriber already.
    if let Err(err) = installed {
        tracing::debug!(error = %err, "keeping the existing tracing subscriber");
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn invalid_directive_is_rejected() {
        let err = init_logging("enrollment_areas=loud", LogTarget::Stderr).unwrap_err();
        assert_eq!(err.exit_code(), crate::error::EXIT_INPUT);
    }

    #[test]
    fn second_install_keeps_the_first_subscriber() {
        init_logging("enrollment_areas=info", LogTarget::Stderr).unwrap();
        init_logging("enrollment_areas=debug", LogTarget::Stderr).unwrap();
    }

    #[test]
    fn file_target_creates_the_log_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("areas.log");
        init_logging("enrollment_areas=info", LogTarget::File(path.clone())).unwrap();
        assert!(path.exists());
    }
}
