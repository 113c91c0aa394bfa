//! duuh-pkg: Package manager probing
//!
//! Detects which distribution package manager (apk, apt, yum) is present on
//! the current filesystem, lists pending upgrades and normalizes them into an
//! [`UpgradeReport`].

pub mod apk;
pub mod apt;
pub mod error;
pub mod parser;
pub mod probe;
pub mod traits;
pub mod types;
pub mod yum;

#[cfg(test)]
pub(crate) mod testing;

pub use error::PackageError;
pub use probe::Probe;
pub use traits::{ManagerContext, PackageManager};
pub use types::{DistroFamily, UpgradeReport};
