//! Error types for duuh-pkg

use duuh_exec::ExecError;
use thiserror::Error;

/// Errors that can occur while probing package managers
#[derive(Error, Debug, Clone)]
pub enum PackageError {
    /// Package metadata refresh failed
    #[error("repository unavailable: {command} exited with {status}: {message}")]
    RepositoryUnavailable {
        /// Rendered command line
        command: String,
        /// Exit status
        status: i32,
        /// Error message
        message: String,
    },

    /// Command exited with a status that carries no special meaning
    #[error("command failed: {command} exited with {status}: {message}")]
    CommandFailed {
        /// Rendered command line
        command: String,
        /// Exit status
        status: i32,
        /// Error message
        message: String,
    },

    /// Distro family tag not handled by this build
    #[error("unhandled ostype {0:?}")]
    UnhandledFamily(String),

    /// Report could not be encoded
    #[error("serialization error: {0}")]
    Serialization(String),

    /// Execution error from the executor
    #[error(transparent)]
    Execution(#[from] ExecError),
}
