//! Thin wrapper over a docker-compatible container runtime CLI

use std::path::Path;
use std::sync::Arc;
use std::time::Duration;

use duuh_exec::{CommandExecutor, CommandResult};
use tracing::{info, instrument};

use crate::error::CoreError;

/// Container runtime CLI (`docker`, `podman`, ...)
#[derive(Clone)]
pub struct ContainerRuntime {
    executor: Arc<dyn CommandExecutor>,
    binary: String,
    timeout: Option<Duration>,
}

impl ContainerRuntime {
    /// Create a runtime wrapper invoking `binary`
    pub fn new(executor: Arc<dyn CommandExecutor>, binary: impl Into<String>) -> Self {
        Self {
            executor,
            binary: binary.into(),
            timeout: None,
        }
    }

    /// Bound every runtime command to `timeout`
    #[must_use]
    pub fn with_timeout(mut self, timeout: Option<Duration>) -> Self {
        self.timeout = timeout;
        self
    }

    /// Runtime binary name
    #[must_use]
    pub fn binary(&self) -> &str {
        &self.binary
    }

    /// Run a runtime subcommand that must succeed
    ///
    /// # Errors
    /// Returns `CoreError::Runtime` if the command cannot run or exits non-zero
    pub async fn exec(&self, args: &[&str]) -> Result<CommandResult, CoreError> {
        self.exec_bounded(args, self.timeout).await
    }

    /// Run a runtime subcommand under its own time limit
    ///
    /// # Errors
    /// Returns `CoreError::Runtime` if the command cannot run or exits non-zero
    pub async fn exec_bounded(
        &self,
        args: &[&str],
        timeout: Option<Duration>,
    ) -> Result<CommandResult, CoreError> {
        let result = self
            .executor
            .run_bounded(&self.binary, args, timeout)
            .await?;
        Ok(result.check()?)
    }

    /// Refresh `image` from its registry
    #[instrument(skip(self))]
    pub async fn pull(&self, image: &str) -> Result<(), CoreError> {
        info!("pulling image");
        self.exec(&["pull", image]).await?;
        Ok(())
    }

    /// Push `image` to its registry
    #[instrument(skip(self))]
    pub async fn push(&self, image: &str) -> Result<(), CoreError> {
        info!("pushing image");
        self.exec(&["push", image]).await?;
        Ok(())
    }

    /// User the image is configured to run as, empty when unset
    #[instrument(skip(self))]
    pub async fn image_user(&self, image: &str) -> Result<String, CoreError> {
        let result = self
            .exec(&["image", "inspect", "-f", "{{.Config.User}}", image])
            .await?;
        Ok(result.stdout.trim().to_string())
    }

    /// Build the context in `dir` and tag the result as `tag`
    #[instrument(skip(self))]
    pub async fn build(&self, tag: &str, dir: &Path) -> Result<(), CoreError> {
        info!("building image");
        let dir = dir.to_string_lossy();
        self.exec(&["build", "-t", tag, &*dir]).await?;
        Ok(())
    }
}

impl std::fmt::Debug for ContainerRuntime {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ContainerRuntime")
            .field("executor", &self.executor.executor_type())
            .field("binary", &self.binary)
            .field("timeout", &self.timeout)
            .finish()
    }
}
