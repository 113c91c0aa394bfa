//! APK package manager (Alpine)

use std::path::PathBuf;

use async_trait::async_trait;
use tracing::{debug, info, instrument};

use crate::error::PackageError;
use crate::parser::filter_upgrades;
use crate::traits::{ManagerContext, PackageManager};
use crate::types::DistroFamily;

/// Marker and tool path
pub const APK: &str = "/sbin/apk";

/// APK package manager implementation
#[derive(Debug, Clone)]
pub struct ApkManager {
    ctx: ManagerContext,
}

impl ApkManager {
    /// Create a new APK manager
    pub fn new(ctx: ManagerContext) -> Self {
        Self { ctx }
    }
}

#[async_trait]
impl PackageManager for ApkManager {
    fn family(&self) -> DistroFamily {
        DistroFamily::Alpine
    }

    fn marker(&self) -> PathBuf {
        self.ctx.resolve(APK)
    }

    async fn is_available(&self) -> bool {
        self.ctx.has_marker(&self.marker()).await
    }

    #[instrument(skip(self))]
    async fn list_upgradable(&self) -> Result<Vec<String>, PackageError> {
        debug!("listing upgradable packages");

        // --no-cache fetches fresh indexes without touching /var/cache/apk
        let result = self
            .ctx
            .run_checked(APK, &["--no-cache", "list", "-u"])
            .await?;

        let upgrades = filter_upgrades(DistroFamily::Alpine, &result.stdout);
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
    async fn test_list_upgradable() {
        let root = fake_root(&[APK]);
        let executor = Arc::new(ScriptedExecutor::default().respond(
            "apk --no-cache list -u",
            0,
            "fetch https://dl-cdn.alpinelinux.org/alpine/v3.18/main/x86_64/APKINDEX.tar.gz\n\
             libcrypto3-3.1.4-r1 x86_64 {openssl} (Apache-2.0) [upgradable from: libcrypto3-3.1.3-r0]\n",
        ));
        let manager = ApkManager::new(context(&executor, root.path()));

        assert!(manager.is_available().await);
        let upgrades = manager.list_upgradable().await.unwrap();

        assert_eq!(
            upgrades,
            vec![
                "libcrypto3-3.1.4-r1 x86_64 {openssl} (Apache-2.0) [upgradable from: libcrypto3-3.1.3-r0]"
            ]
        );
    }

    #[tokio::test]
    async fn test_failure_is_fatal() {
        let root = fake_root(&[APK]);
        let executor =
            Arc::new(ScriptedExecutor::default().respond("apk --no-cache list -u", 1, ""));
        let manager = ApkManager::new(context(&executor, root.path()));

        let err = manager.list_upgradable().await.unwrap_err();
        assert!(matches!(err, PackageError::CommandFailed { status: 1, .. }));
    }

    #[tokio::test]
    async fn test_missing_marker() {
        let root = fake_root(&[]);
        let executor = Arc::new(ScriptedExecutor::default());
        let manager = ApkManager::new(context(&executor, root.path()));

        assert!(!manager.is_available().await);
    }
}
