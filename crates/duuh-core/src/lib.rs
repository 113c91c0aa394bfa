//! duuh-core: Image check and rebuild orchestration
//!
//! Runs the package probe inside a target image through the container
//! runtime, and rebuilds the image with the pending upgrades applied.

pub mod bridge;
pub mod config;
pub mod error;
pub mod pipeline;
pub mod rebuild;
pub mod recipe;
pub mod runtime;

pub use bridge::SelfCheckBridge;
pub use config::Config;
pub use error::CoreError;
pub use pipeline::{CheckOptions, Outcome, Pipeline};
pub use rebuild::RebuildDriver;
pub use recipe::BuildRecipe;
pub use runtime::ContainerRuntime;
