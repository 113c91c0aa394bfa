//! Package manager traits

use std::io::ErrorKind;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use duuh_exec::{CommandExecutor, CommandResult};

use crate::error::PackageError;
use crate::types::DistroFamily;

/// Shared state for the package managers of one probe run
#[derive(Clone)]
pub struct ManagerContext {
    /// Executor for package manager commands
    executor: Arc<dyn CommandExecutor>,
    /// Filesystem root the markers and tools are resolved against
    root: PathBuf,
    /// Per-command time limit
    timeout: Option<Duration>,
}

impl ManagerContext {
    /// Create a context rooted at `/`
    pub fn new(executor: Arc<dyn CommandExecutor>) -> Self {
        Self {
            executor,
            root: PathBuf::from("/"),
            timeout: None,
        }
    }

    /// Resolve markers and tools below `root` instead of `/`
    #[must_use]
    pub fn with_root(mut self, root: impl Into<PathBuf>) -> Self {
        self.root = root.into();
        self
    }

    /// Bound every command to `timeout`
    #[must_use]
    pub fn with_timeout(mut self, timeout: Option<Duration>) -> Self {
        self.timeout = timeout;
        self
    }

    /// Absolute tool path resolved against the root
    #[must_use]
    pub fn resolve(&self, absolute: &str) -> PathBuf {
        self.root.join(absolute.trim_start_matches('/'))
    }

    /// Whether a marker path exists
    ///
    /// Only a definite "not found" counts as absent; other stat failures
    /// (permissions, for example) still count as present.
    pub async fn has_marker(&self, marker: &Path) -> bool {
        match tokio::fs::metadata(marker).await {
            Ok(_) => true,
            Err(e) => e.kind() != ErrorKind::NotFound,
        }
    }

    /// Run a tool and return its raw result, whatever the exit status
    ///
    /// # Errors
    /// Returns `PackageError::Execution` if the tool cannot be run or times out
    pub async fn run(&self, tool: &str, args: &[&str]) -> Result<CommandResult, PackageError> {
        let program = self.resolve(tool);
        let program = program.to_string_lossy();
        Ok(self
            .executor
            .run_bounded(&program, args, self.timeout)
            .await?)
    }

    /// Run a tool that must exit with status 0
    ///
    /// # Errors
    /// Returns `PackageError::CommandFailed` on a non-zero exit status
    pub async fn run_checked(
        &self,
        tool: &str,
        args: &[&str],
    ) -> Result<CommandResult, PackageError> {
        let result = self.run(tool, args).await?;
        if result.success() {
            Ok(result)
        } else {
            Err(PackageError::CommandFailed {
                command: result.command,
                status: result.status,
                message: result.stderr.trim().to_string(),
            })
        }
    }
}

impl std::fmt::Debug for ManagerContext {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ManagerContext")
            .field("executor", &self.executor.executor_type())
            .field("root", &self.root)
            .field("timeout", &self.timeout)
            .finish()
    }
}

/// A package manager family that can list its pending upgrades
#[async_trait]
pub trait PackageManager: Send + Sync {
    /// Family reported when this manager is probed
    fn family(&self) -> DistroFamily;

    /// Path whose presence identifies this manager
    fn marker(&self) -> PathBuf;

    /// Whether the manager is installed
    async fn is_available(&self) -> bool;

    /// Upgrade descriptors, verbatim from the tool output
    async fn list_upgradable(&self) -> Result<Vec<String>, PackageError>;
}
