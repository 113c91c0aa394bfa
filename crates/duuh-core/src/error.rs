//! Core error types for duuh-core

use duuh_exec::ExecError;
use thiserror::Error;

/// Errors that can occur while checking or rebuilding an image
#[derive(Error, Debug)]
pub enum CoreError {
    /// Container runtime command failed or could not be run
    #[error("container runtime error: {0}")]
    Runtime(#[from] ExecError),

    /// In-container check printed something that is not a report
    #[error("malformed upgrade report from {image}: {source}")]
    MalformedReport {
        /// Image that was checked
        image: String,
        /// Decoder error
        #[source]
        source: serde_json::Error,
    },

    /// No upgrade command for this family
    #[error("unhandled ostype {0:?}")]
    UnhandledFamily(String),

    /// Path of the running executable could not be determined
    #[error("cannot locate own executable: {0}")]
    SelfLocation(#[source] std::io::Error),

    /// Build context I/O failed
    #[error("build context error: {0}")]
    Io(#[from] std::io::Error),

    /// Configuration error
    #[error("configuration error: {0}")]
    ConfigError(String),
}
