//! Host-side check of one image

use duuh_pkg::UpgradeReport;
use tracing::{debug, info, instrument, warn};

use crate::bridge::SelfCheckBridge;
use crate::error::CoreError;
use crate::rebuild::RebuildDriver;
use crate::runtime::ContainerRuntime;

/// What to do around the check
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct CheckOptions {
    /// Refresh the image from its registry first
    pub pull: bool,
    /// Rebuild the image when upgrades are pending
    pub build: bool,
    /// Push the rebuilt image
    pub push: bool,
}

/// Result of checking one image
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Outcome {
    /// Nothing to upgrade
    NoUpgrades(UpgradeReport),
    /// Upgrades are pending and were not applied
    UpgradesPending(UpgradeReport),
    /// Upgrades were applied and the image re-tagged
    Rebuilt(UpgradeReport),
}

impl Outcome {
    /// Process exit status for this outcome
    #[must_use]
    pub const fn exit_code(&self) -> u8 {
        match self {
            Outcome::NoUpgrades(_) | Outcome::Rebuilt(_) => 0,
            Outcome::UpgradesPending(_) => 2,
        }
    }

    /// Report the outcome is based on
    #[must_use]
    pub const fn report(&self) -> &UpgradeReport {
        match self {
            Outcome::NoUpgrades(r) | Outcome::UpgradesPending(r) | Outcome::Rebuilt(r) => r,
        }
    }
}

/// Pull, check, rebuild and push, strictly in sequence
#[derive(Debug, Clone)]
pub struct Pipeline {
    runtime: ContainerRuntime,
    bridge: SelfCheckBridge,
    driver: RebuildDriver,
}

impl Pipeline {
    /// Create a pipeline from its parts
    pub fn new(runtime: ContainerRuntime, bridge: SelfCheckBridge, driver: RebuildDriver) -> Self {
        Self {
            runtime,
            bridge,
            driver,
        }
    }

    /// Check `image` and act on the result according to `options`
    ///
    /// # Errors
    /// Any runtime, report or build failure is returned as is
    #[instrument(skip(self))]
    pub async fn check_image(
        &self,
        image: &str,
        options: CheckOptions,
    ) -> Result<Outcome, CoreError> {
        if options.pull {
            self.runtime.pull(image).await?;
        }

        let report = self.bridge.fetch_report(image).await?;
        match report.distro_family {
            Some(family) => info!(family = %family, "detected os type"),
            None => warn!("no supported package manager found in image"),
        }
        for upgrade in &report.upgrades {
            debug!(upgrade = %upgrade, "detected upgrade");
        }

        if !report.has_upgrades() {
            info!("image has no unattended upgrades");
            return Ok(Outcome::NoUpgrades(report));
        }

        if !options.build {
            info!(
                count = report.upgrades.len(),
                "upgrades pending, not building"
            );
            return Ok(Outcome::UpgradesPending(report));
        }

        self.driver
            .rebuild(image, report.distro_family, &report.upgrades)
            .await?;

        if options.push {
            self.runtime.push(image).await?;
        }

        Ok(Outcome::Rebuilt(report))
    }
}
