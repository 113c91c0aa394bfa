//! Package manager detection and upgrade collection

use tracing::{info, instrument, warn};

use crate::apk::ApkManager;
use crate::apt::AptManager;
use crate::error::PackageError;
use crate::traits::{ManagerContext, PackageManager};
use crate::types::UpgradeReport;
use crate::yum::YumManager;

/// Probes every installed package manager on the current filesystem
pub struct Probe {
    managers: Vec<Box<dyn PackageManager>>,
}

impl Probe {
    /// Probe apk, apt and yum, in that order
    pub fn new(ctx: ManagerContext) -> Self {
        Self::with_managers(vec![
            Box::new(ApkManager::new(ctx.clone())),
            Box::new(AptManager::new(ctx.clone())),
            Box::new(YumManager::new(ctx)),
        ])
    }

    /// Probe a custom set of managers, in the given order
    pub fn with_managers(managers: Vec<Box<dyn PackageManager>>) -> Self {
        Self { managers }
    }

    /// Run every available manager and collect its upgrades
    ///
    /// Each marker is checked right before its manager would run. When
    /// several are installed the report carries the family of the last one
    /// and the upgrades of all of them. A manager that is not installed is
    /// skipped.
    ///
    /// # Errors
    /// The first manager failure aborts the run; later markers are not
    /// checked.
    #[instrument(skip(self))]
    pub async fn run(&self) -> Result<UpgradeReport, PackageError> {
        let mut report = UpgradeReport::new();
        for manager in &self.managers {
            if !manager.is_available().await {
                continue;
            }

            if let Some(previous) = report.distro_family {
                warn!(
                    previous = %previous,
                    family = %manager.family(),
                    "multiple package managers detected, reporting the last one"
                );
            }

            info!(family = %manager.family(), marker = %manager.marker().display(), "probing package manager");
            let upgrades = manager.list_upgradable().await?;
            report.record(manager.family(), upgrades);
        }

        Ok(report)
    }
}
