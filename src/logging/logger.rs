//! Thin facade over [`tracing`] used by the launch command.
use std::path::{Path, PathBuf};

use super::utils::log_file_path;

/// Target used for stage headers, rendered as `==> message`.
pub(super) const STAGE_TARGET: &str = "drac_kvm::stage";

/// Console and file logger for one command run.
///
/// The log file itself is created by
/// [`init_subscriber`](super::subscriber::init_subscriber); the logger only
/// remembers where it lives so the path can be reported on failure.
#[derive(Debug)]
pub struct Logger {
    log_file: Option<PathBuf>,
}

impl Logger {
    /// Create a logger for `command`.
    #[must_use]
    pub fn new(command: &str) -> Self {
        Self {
            log_file: log_file_path(command),
        }
    }

    /// Path of the persistent log file, if the cache directory is usable.
    #[must_use]
    pub fn log_path(&self) -> Option<&Path> {
        self.log_file.as_deref()
    }

    /// Log an error message.
    pub fn error(&self, msg: &str) {
        tracing::error!("{msg}");
    }

    /// Log a warning message.
    pub fn warn(&self, msg: &str) {
        tracing::warn!("{msg}");
    }

    /// Log a stage header.
    pub fn stage(&self, msg: &str) {
        tracing::info!(target: STAGE_TARGET, "{msg}");
    }

    /// Log an informational message.
    pub fn info(&self, msg: &str) {
        tracing::info!("{msg}");
    }

    /// Log a debug message (console only when verbose; always in the file).
    pub fn debug(&self, msg: &str) {
        tracing::debug!("{msg}");
    }
}
