//! Runs the package probe inside a target image
//!
//! Our own executable is bind-mounted read-only into a throwaway container
//! created from the image and started as its entrypoint in check mode. The
//! check prints an [`UpgradeReport`] as JSON on stdout, which is decoded here.

use std::path::{Path, PathBuf};
use std::time::Duration;

use duuh_pkg::UpgradeReport;
use tracing::{debug, info, instrument};

use crate::error::CoreError;
use crate::runtime::ContainerRuntime;

/// Flag that switches the binary into check mode
pub const CHECK_FLAG: &str = "--check";
/// Flag passing the command time limit to the in-container check
pub const TIMEOUT_FLAG: &str = "--command-timeout";

/// Most commands one check runs (apk, apt-get update, apt list, yum)
const MAX_CHECK_COMMANDS: u32 = 4;
/// Container start-up and teardown allowance on top of the commands
const CONTAINER_OVERHEAD: Duration = Duration::from_secs(60);

/// Host side of the in-container check
#[derive(Debug, Clone)]
pub struct SelfCheckBridge {
    runtime: ContainerRuntime,
    /// Our executable on the host
    self_path: PathBuf,
    /// Where it is mounted inside the container
    mount_path: String,
    /// Time limit forwarded to the in-container commands, in seconds
    command_timeout_secs: Option<u64>,
}

impl SelfCheckBridge {
    /// Create a bridge that mounts `self_path` at `mount_path`
    pub fn new(
        runtime: ContainerRuntime,
        self_path: impl Into<PathBuf>,
        mount_path: impl Into<String>,
    ) -> Self {
        Self {
            runtime,
            self_path: self_path.into(),
            mount_path: mount_path.into(),
            command_timeout_secs: None,
        }
    }

    /// Create a bridge for the currently running executable
    ///
    /// # Errors
    /// Returns `CoreError::SelfLocation` if the executable path is unknown
    pub fn for_current_exe(
        runtime: ContainerRuntime,
        mount_path: impl Into<String>,
    ) -> Result<Self, CoreError> {
        let self_path = std::env::current_exe().map_err(CoreError::SelfLocation)?;
        Ok(Self::new(runtime, self_path, mount_path))
    }

    /// Forward a per-command time limit to the in-container check
    #[must_use]
    pub fn with_command_timeout(mut self, secs: Option<u64>) -> Self {
        self.command_timeout_secs = secs;
        self
    }

    /// Executable mounted into the container
    #[must_use]
    pub fn self_path(&self) -> &Path {
        &self.self_path
    }

    /// Runtime arguments that start the check for `image`
    #[must_use]
    pub fn run_args(&self, image: &str) -> Vec<String> {
        let mut args = vec![
            "run".to_string(),
            "--rm".to_string(),
            "-u".to_string(),
            "root".to_string(),
            "--entrypoint".to_string(),
            self.mount_path.clone(),
            "-v".to_string(),
            format!("{}:{}:ro", self.self_path.display(), self.mount_path),
            image.to_string(),
            CHECK_FLAG.to_string(),
        ];
        if let Some(secs) = self.command_timeout_secs {
            args.push(TIMEOUT_FLAG.to_string());
            args.push(secs.to_string());
        }
        args
    }

    /// Time limit for the whole `run`, `None` when commands are unbounded
    ///
    /// Covers every command the check may run back to back, so the
    /// container is never cut short while its own commands are in time.
    #[must_use]
    pub fn run_timeout(&self) -> Option<Duration> {
        self.command_timeout_secs
            .filter(|secs| *secs > 0)
            .map(|secs| Duration::from_secs(secs) * MAX_CHECK_COMMANDS + CONTAINER_OVERHEAD)
    }

    /// Run the check inside `image` and decode its report
    ///
    /// # Errors
    /// Returns `CoreError::Runtime` if the container fails, and
    /// `CoreError::MalformedReport` if its stdout is not a report
    #[instrument(skip(self))]
    pub async fn fetch_report(&self, image: &str) -> Result<UpgradeReport, CoreError> {
        info!("checking unattended upgrades");

        let args = self.run_args(image);
        let args: Vec<&str> = args.iter().map(String::as_str).collect();
        let result = self.runtime.exec_bounded(&args, self.run_timeout()).await?;
        debug!(payload = %result.stdout.trim_end(), "check finished");

        UpgradeReport::from_json(result.stdout.trim()).map_err(|source| {
            CoreError::MalformedReport {
                image: image.to_string(),
                source,
            }
        })
    }
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use duuh_exec::LocalExecutor;

    use super::*;

    fn bridge() -> SelfCheckBridge {
        let runtime = ContainerRuntime::new(Arc::new(LocalExecutor::new()), "docker");
        SelfCheckBridge::new(runtime, "/usr/local/bin/duuh", "/duuh")
    }

    #[test]
    fn test_run_args() {
        assert_eq!(
            bridge().run_args("alpine:3.18"),
            vec![
                "run",
                "--rm",
                "-u",
                "root",
                "--entrypoint",
                "/duuh",
                "-v",
                "/usr/local/bin/duuh:/duuh:ro",
                "alpine:3.18",
                "--check",
            ]
        );
    }

    #[test]
    fn test_run_args_forward_timeout() {
        let args = bridge()
            .with_command_timeout(Some(600))
            .run_args("debian:12");

        assert_eq!(&args[args.len() - 3..], ["--check", "--command-timeout", "600"]);
    }

    #[test]
    fn test_run_timeout_covers_every_check_command() {
        let bridge = bridge().with_command_timeout(Some(600));

        assert_eq!(bridge.run_timeout(), Some(Duration::from_secs(4 * 600 + 60)));
    }

    #[test]
    fn test_run_timeout_disabled() {
        assert_eq!(bridge().run_timeout(), None);
        assert_eq!(bridge().with_command_timeout(Some(0)).run_timeout(), None);
    }

    #[test]
    fn test_for_current_exe() {
        let runtime = ContainerRuntime::new(Arc::new(LocalExecutor::new()), "docker");
        let bridge = SelfCheckBridge::for_current_exe(runtime, "/duuh").unwrap();

        assert!(bridge.self_path().is_absolute());
    }
}
