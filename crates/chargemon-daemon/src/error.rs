//! Daemon error types.
//!
//! Only startup failures surface here. Runtime faults (unreadable sensor,
//! failed persistence, failed notification delivery) are recovered locally
//! and logged; no tick-loop error is fatal.

use std::io;
use thiserror::Error;

/// Result type for daemon operations.
pub type DaemonResult<T> = Result<T, DaemonError>;

/// Errors that can occur in the daemon.
#[derive(Debug, Error)]
pub enum DaemonError {
    /// IO error (PID file, config directory, etc.).
    #[error("IO error: {0}")]
    Io(#[from] io::Error),

    /// Another monitor instance is already running.
    #[error("monitor is already running (PID file exists: {path})")]
    AlreadyRunning { path: String },

    /// Configuration error.
    #[error("configuration error: {message}")]
    Config { message: String },
}

impl DaemonError {
    /// Creates a configuration error.
    pub fn config(message: impl Into<String>) -> Self {
        Self::Config {
            message: message.into(),
        }
    }

    /// Creates an already-running error.
    pub fn already_running(path: impl Into<String>) -> Self {
        Self::AlreadyRunning { path: path.into() }
    }
}
