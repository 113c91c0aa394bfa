//! Result types for command execution

use std::time::Duration;

use serde::{Deserialize, Serialize};

use crate::error::ExecError;

/// Result of a command execution
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CommandResult {
    /// Rendered command line, for diagnostics
    pub command: String,
    /// Exit status code (0 for success, -1 when killed by a signal)
    pub status: i32,
    /// stdout output
    pub stdout: String,
    /// stderr output
    pub stderr: String,
    /// Time taken to execute
    pub duration: Duration,
}

impl CommandResult {
    /// Check if command succeeded (exit code 0)
    #[must_use]
    pub fn success(&self) -> bool {
        self.status == 0
    }

    /// Turn a non-zero exit status into [`ExecError::CommandFailed`]
    ///
    /// # Errors
    /// Returns `ExecError::CommandFailed` if the command did not exit with 0
    pub fn check(self) -> Result<Self, ExecError> {
        if self.success() {
            Ok(self)
        } else {
            Err(ExecError::CommandFailed {
                command: self.command,
                status: self.status,
                stderr: self.stderr.trim().to_string(),
            })
        }
    }
}

/// Render a program and its arguments as a single line for logs and errors
#[must_use]
pub fn render_command(program: &str, args: &[&str]) -> String {
    if args.is_empty() {
        program.to_string()
    } else {
        format!("{program} {}", args.join(" "))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn result(status: i32) -> CommandResult {
        CommandResult {
            command: "apk --no-cache list -u".to_string(),
            status,
            stdout: String::new(),
            stderr: "ERROR: unable to lock database\n".to_string(),
            duration: Duration::from_millis(3),
        }
    }

    #[test]
    fn test_check_passes_success_through() {
        let checked = result(0).check().unwrap();
        assert!(checked.success());
    }

    #[test]
    fn test_check_rejects_failure() {
        let err = result(99).check().unwrap_err();
        match err {
            ExecError::CommandFailed {
                command,
                status,
                stderr,
            } => {
                assert_eq!(command, "apk --no-cache list -u");
                assert_eq!(status, 99);
                assert_eq!(stderr, "ERROR: unable to lock database");
            }
            other => panic!("unexpected error: {other}"),
        }
    }

    #[test]
    fn test_render_command() {
        assert_eq!(render_command("docker", &[]), "docker");
        assert_eq!(
            render_command("docker", &["image", "inspect", "alpine"]),
            "docker image inspect alpine"
        );
    }
}
