//! Command executor trait

use std::time::Duration;

use async_trait::async_trait;

use crate::error::ExecError;
use crate::result::CommandResult;

/// Runs external programs and captures their output.
///
/// A non-zero exit status is not an error at this level: callers inspect
/// [`CommandResult::status`] themselves, or use [`CommandResult::check`] when
/// any failure should be fatal.
#[async_trait]
pub trait CommandExecutor: Send + Sync {
    /// Run `program` with `args` and wait for it to exit
    async fn run(&self, program: &str, args: &[&str]) -> Result<CommandResult, ExecError>;

    /// Run `program`, killing it if it does not exit within `timeout`
    async fn run_with_timeout(
        &self,
        program: &str,
        args: &[&str],
        timeout: Duration,
    ) -> Result<CommandResult, ExecError>;

    /// Short name of the executor, used in logs
    fn executor_type(&self) -> &'static str;

    /// Run with `timeout` when one is given, unbounded otherwise
    async fn run_bounded(
        &self,
        program: &str,
        args: &[&str],
        timeout: Option<Duration>,
    ) -> Result<CommandResult, ExecError> {
        match timeout {
            Some(limit) => self.run_with_timeout(program, args, limit).await,
            None => self.run(program, args).await,
        }
    }
}
