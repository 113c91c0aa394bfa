//! Local command execution using `tokio::process`

use std::process::Stdio;
use std::time::{Duration, Instant};

use async_trait::async_trait;
use tokio::process::Command;
use tokio::time::timeout;
use tracing::{debug, error, instrument};

use crate::error::ExecError;
use crate::result::{CommandResult, render_command};
use crate::traits::CommandExecutor;

/// Local command executor
///
/// Executes programs directly (no shell) on the local machine.
#[derive(Debug, Clone, Default)]
pub struct LocalExecutor {
    /// Pass child stderr through to our own stderr instead of capturing it
    inherit_stderr: bool,
}

impl LocalExecutor {
    /// Create a new local executor that captures stdout and stderr
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Stream child stderr to the terminal; `CommandResult::stderr` stays empty
    #[must_use]
    pub fn with_inherited_stderr(mut self) -> Self {
        self.inherit_stderr = true;
        self
    }

    /// Internal method to execute command
    #[instrument(skip(self), level = "debug")]
    async fn execute(&self, program: &str, args: &[&str]) -> Result<CommandResult, ExecError> {
        let start = Instant::now();
        let command = render_command(program, args);

        debug!(command = %command, "executing local command");

        let stderr = if self.inherit_stderr {
            Stdio::inherit()
        } else {
            Stdio::piped()
        };

        let child = Command::new(program)
            .args(args)
            .stdin(Stdio::null())
            .stdout(Stdio::piped())
            .stderr(stderr)
            .kill_on_drop(true)
            .spawn()
            .map_err(|e| ExecError::SpawnError {
                command: command.clone(),
                message: e.to_string(),
            })?;

        let output = child
            .wait_with_output()
            .await
            .map_err(|e| ExecError::IoError(e.to_string()))?;

        let duration = start.elapsed();

        let status = output.status.code().unwrap_or(-1);
        let stdout = String::from_utf8_lossy(&output.stdout).to_string();
        let stderr = String::from_utf8_lossy(&output.stderr).to_string();

        debug!(
            command = %command,
            status = status,
            duration = ?duration,
            "command completed"
        );

        Ok(CommandResult {
            command,
            status,
            stdout,
            stderr,
            duration,
        })
    }
}

#[async_trait]
impl CommandExecutor for LocalExecutor {
    #[instrument(skip(self), level = "debug")]
    async fn run(&self, program: &str, args: &[&str]) -> Result<CommandResult, ExecError> {
        self.execute(program, args).await
    }

    #[instrument(skip(self), level = "debug")]
    async fn run_with_timeout(
        &self,
        program: &str,
        args: &[&str],
        timeout_duration: Duration,
    ) -> Result<CommandResult, ExecError> {
        let start = Instant::now();
        let command = render_command(program, args);

        debug!(command = %command, timeout = ?timeout_duration, "executing with timeout");

        // Dropping the pending future kills the child (kill_on_drop).
        match timeout(timeout_duration, self.execute(program, args)).await {
            Ok(result) => result,
            Err(_) => {
                error!(
                    command = %command,
                    timeout = ?timeout_duration,
                    elapsed = ?start.elapsed(),
                    "command timed out"
                );
                Err(ExecError::Timeout {
                    command,
                    timeout: timeout_duration,
                })
            }
        }
    }

    fn executor_type(&self) -> &'static str {
        "local"
    }
}
