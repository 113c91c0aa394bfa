//! APT package manager (Debian/Ubuntu)

use std::path::PathBuf;

use async_trait::async_trait;
use tracing::{debug, info, instrument};

use crate::error::PackageError;
use crate::parser::filter_upgrades;
use crate::traits::{ManagerContext, PackageManager};
use crate::types::DistroFamily;

/// Marker, also used to refresh package lists
pub const APT_GET: &str = "/usr/bin/apt-get";
/// Lists upgradable packages
pub const APT: &str = "/usr/bin/apt";

/// APT package manager implementation
#[derive(Debug, Clone)]
pub struct AptManager {
    ctx: ManagerContext,
}

impl AptManager {
    /// Create a new APT manager
    pub fn new(ctx: ManagerContext) -> Self {
        Self { ctx }
    }
}

#[async_trait]
impl PackageManager for AptManager {
    fn family(&self) -> DistroFamily {
        DistroFamily::Debian
    }

    fn marker(&self) -> PathBuf {
        self.ctx.resolve(APT_GET)
    }

    async fn is_available(&self) -> bool {
        self.ctx.has_marker(&self.marker()).await
    }

    #[instrument(skip(self))]
    async fn list_upgradable(&self) -> Result<Vec<String>, PackageError> {
        debug!("listing upgradable packages");

        // First update package lists
        let update = self.ctx.run(APT_GET, &["update"]).await?;
        if !update.success() {
            return Err(PackageError::RepositoryUnavailable {
                command: update.command,
                status: update.status,
                message: update.stderr.trim().to_string(),
            });
        }
        debug!(output = %update.stdout.trim_end(), "package lists refreshed");

        // List upgradable packages
        let result = self.ctx.run_checked(APT, &["list", "--upgradable"]).await?;

        let upgrades = filter_upgrades(DistroFamily::Debian, &result.stdout);
        info!(count = upgrades.len(), "found upgradable packages");

        Ok(upgrades)
    }
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use super::*;
    use crate::testing::{ScriptedExecutor, context, fake_root};

    #[tokio::test]
    async fn test_list_upgradable_refreshes_first() {
        let root = fake_root(&[APT_GET, APT]);
        let executor = Arc::new(
            ScriptedExecutor::default()
                .respond("apt-get update", 0, "Reading package lists... Done\n")
                .respond(
                    "apt list --upgradable",
                    0,
                    "Listing... Done\n\
                     libssl3/stable-security 3.0.11-1~deb12u2 amd64 [upgradable from: 3.0.11-1~deb12u1]\n",
                ),
        );
        let manager = AptManager::new(context(&executor, root.path()));

        let upgrades = manager.list_upgradable().await.unwrap();

        assert_eq!(
            upgrades,
            vec!["libssl3/stable-security 3.0.11-1~deb12u2 amd64 [upgradable from: 3.0.11-1~deb12u1]"]
        );
        let calls = executor.calls();
        assert_eq!(calls.len(), 2);
        assert!(calls[0].ends_with("/usr/bin/apt-get update"));
        assert!(calls[1].ends_with("/usr/bin/apt list --upgradable"));
    }

    #[tokio::test]
    async fn test_refresh_failure_is_fatal() {
        let root = fake_root(&[APT_GET]);
        let executor = Arc::new(ScriptedExecutor::default().respond("apt-get update", 100, ""));
        let manager = AptManager::new(context(&executor, root.path()));

        let err = manager.list_upgradable().await.unwrap_err();

        assert!(matches!(
            err,
            PackageError::RepositoryUnavailable { status: 100, .. }
        ));
        assert_eq!(executor.calls().len(), 1);
    }
}
