//! Error types for duuh-exec

use std::time::Duration;

use thiserror::Error;

/// Errors that can occur while running an external command
#[derive(Error, Debug, Clone)]
pub enum ExecError {
    /// Command exited with an unexpected status
    #[error("command `{command}` failed with status {status}: {stderr}")]
    CommandFailed {
        /// Rendered command line
        command: String,
        /// Exit status code (-1 when killed by a signal)
        status: i32,
        /// Stderr output, empty when stderr was inherited
        stderr: String,
    },

    /// Command timed out
    #[error("command `{command}` timed out after {timeout:?}")]
    Timeout {
        /// Rendered command line
        command: String,
        /// Timeout duration that was exceeded
        timeout: Duration,
    },

    /// Process spawn error
    #[error("failed to spawn `{command}`: {message}")]
    SpawnError {
        /// Rendered command line
        command: String,
        /// Underlying I/O error
        message: String,
    },

    /// I/O error while waiting for the process
    #[error("I/O error: {0}")]
    IoError(String),
}
