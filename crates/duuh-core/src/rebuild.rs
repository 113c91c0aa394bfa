//! Rebuilds an image in place with its pending upgrades applied

use duuh_pkg::DistroFamily;
use tracing::{info, instrument};

use crate::error::CoreError;
use crate::recipe::BuildRecipe;
use crate::runtime::ContainerRuntime;

/// Name of the recipe inside the build context
const DOCKERFILE: &str = "Dockerfile";

/// Generates the build recipe and runs the build
#[derive(Debug, Clone)]
pub struct RebuildDriver {
    runtime: ContainerRuntime,
    label_key: String,
}

impl RebuildDriver {
    /// Create a driver labelling images with `label_key`
    pub fn new(runtime: ContainerRuntime, label_key: impl Into<String>) -> Self {
        Self {
            runtime,
            label_key: label_key.into(),
        }
    }

    /// Recipe for `image`, honoring its configured user
    ///
    /// # Errors
    /// Returns `CoreError::UnhandledFamily` without a family, and
    /// `CoreError::Runtime` if the image cannot be inspected
    pub async fn recipe(
        &self,
        image: &str,
        family: Option<DistroFamily>,
        upgrades: &[String],
    ) -> Result<BuildRecipe, CoreError> {
        let family = family.ok_or_else(|| CoreError::UnhandledFamily(String::new()))?;
        let user = self.runtime.image_user(image).await?;

        Ok(BuildRecipe::new(image, family, upgrades)
            .with_label_key(self.label_key.as_str())
            .with_image_user(&user))
    }

    /// Build `image` with the upgrades applied and re-tag it
    ///
    /// The build context lives in a temporary directory that is removed
    /// before returning, whether the build succeeded or not.
    ///
    /// # Errors
    /// Returns an error if the recipe cannot be produced, the context cannot
    /// be written or removed, or the build fails
    #[instrument(skip(self, upgrades), fields(upgrades = upgrades.len()))]
    pub async fn rebuild(
        &self,
        image: &str,
        family: Option<DistroFamily>,
        upgrades: &[String],
    ) -> Result<(), CoreError> {
        let recipe = self.recipe(image, family, upgrades).await?;
        let dockerfile = recipe.render();
        info!(recipe = %dockerfile, "generated build recipe");

        let dir = tempfile::Builder::new().prefix("duuh").tempdir()?;
        let built = async {
            tokio::fs::write(dir.path().join(DOCKERFILE), &dockerfile).await?;
            self.runtime.build(image, dir.path()).await
        }
        .await;
        let removed = dir.close();

        built?;
        removed?;
        info!("image rebuilt");
        Ok(())
    }
}
