//! YUM package manager (CentOS/RHEL)

use std::path::PathBuf;

use async_trait::async_trait;
use tracing::{debug, info, instrument};

use crate::error::PackageError;
use crate::parser::filter_upgrades;
use crate::traits::{ManagerContext, PackageManager};
use crate::types::DistroFamily;

/// Marker and tool path
pub const YUM: &str = "/usr/bin/yum";

/// Exit status of `yum check-update` when updates are available
pub const UPDATES_AVAILABLE: i32 = 100;

/// Meaning of a `yum check-update` exit status
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ExitDisposition {
    /// Nothing to update
    Clean,
    /// Updates are listed on stdout
    Pending,
    /// The check itself failed
    Failed,
}

impl ExitDisposition {
    /// Classify a `yum check-update` exit status
    #[must_use]
    pub const fn of_check_update(status: i32) -> Self {
        match status {
            0 => ExitDisposition::Clean,
            UPDATES_AVAILABLE => ExitDisposition::Pending,
            _ => ExitDisposition::Failed,
        }
    }
}

/// YUM package manager implementation
#[derive(Debug, Clone)]
pub struct YumManager {
    ctx: ManagerContext,
}

impl YumManager {
    /// Create a new YUM manager
    pub fn new(ctx: ManagerContext) -> Self {
        Self { ctx }
    }
}

#[async_trait]
impl PackageManager for YumManager {
    fn family(&self) -> DistroFamily {
        DistroFamily::Centos
    }

    fn marker(&self) -> PathBuf {
        self.ctx.resolve(YUM)
    }

    async fn is_available(&self) -> bool {
        self.ctx.has_marker(&self.marker()).await
    }

    #[instrument(skip(self))]
    async fn list_upgradable(&self) -> Result<Vec<String>, PackageError> {
        debug!("checking for updates");

        let result = self.ctx.run(YUM, &["check-update"]).await?;

        match ExitDisposition::of_check_update(result.status) {
            ExitDisposition::Clean => {
                info!("no updates available");
                Ok(Vec::new())
            }
            ExitDisposition::Pending => {
                let upgrades = filter_upgrades(DistroFamily::Centos, &result.stdout);
                info!(count = upgrades.len(), "found upgradable packages");
                Ok(upgrades)
            }
            ExitDisposition::Failed => Err(PackageError::CommandFailed {
                command: result.command,
                status: result.status,
                message: result.stderr.trim().to_string(),
            }),
        }
    }
}
