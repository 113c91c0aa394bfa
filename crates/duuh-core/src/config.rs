//! Configuration loading and types

use std::path::{Path, PathBuf};
use std::time::Duration;

use serde::{Deserialize, Serialize};

use crate::error::CoreError;

/// Environment variable naming an explicit config file
pub const CONFIG_ENV: &str = "DUUH_CONFIG";
/// Environment variable overriding the container runtime binary
pub const RUNTIME_ENV: &str = "DUUH_RUNTIME";
/// Environment variable overriding the log filter
pub const LOG_ENV: &str = "DUUH_LOG";

/// Top-level configuration
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Config {
    /// Container runtime binary (docker-compatible CLI)
    #[serde(default = "default_runtime")]
    pub runtime: String,
    /// Where our own binary is mounted inside the checked container
    #[serde(default = "default_mount_path")]
    pub mount_path: String,
    /// Image label that records the applied upgrades
    #[serde(default = "default_label_key")]
    pub label_key: String,
    /// Time limit for each external command, 0 disables it
    #[serde(default = "default_command_timeout_secs")]
    pub command_timeout_secs: u64,
    /// Log level (trace, debug, info, warn, error) or filter directive
    #[serde(default = "default_log_level")]
    pub log_level: String,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            runtime: default_runtime(),
            mount_path: default_mount_path(),
            label_key: default_label_key(),
            command_timeout_secs: default_command_timeout_secs(),
            log_level: default_log_level(),
        }
    }
}

fn default_runtime() -> String {
    "docker".to_string()
}

fn default_mount_path() -> String {
    "/duuh".to_string()
}

fn default_label_key() -> String {
    "duuh.upgrades".to_string()
}

fn default_command_timeout_secs() -> u64 {
    3600
}

fn default_log_level() -> String {
    "info".to_string()
}

impl Config {
    /// Load configuration from file
    ///
    /// # Errors
    /// Returns `CoreError::ConfigError` if the file cannot be read or parsed
    pub fn load(path: &Path) -> Result<Self, CoreError> {
        let content = std::fs::read_to_string(path)
            .map_err(|e| CoreError::ConfigError(format!("{}: {e}", path.display())))?;
        Self::parse(&content).map_err(|e| match e {
            CoreError::ConfigError(msg) => {
                CoreError::ConfigError(format!("{}: {msg}", path.display()))
            }
            other => other,
        })
    }

    /// Parse configuration from TOML text
    ///
    /// # Errors
    /// Returns `CoreError::ConfigError` on invalid TOML or a bad value
    pub fn parse(content: &str) -> Result<Self, CoreError> {
        let config: Config =
            toml::from_str(content).map_err(|e| CoreError::ConfigError(e.to_string()))?;
        config.validate()?;
        Ok(config)
    }

    /// Load from default paths or use defaults
    ///
    /// # Errors
    /// Returns `CoreError::ConfigError` if a file is found but invalid
    pub fn load_default() -> Result<Self, CoreError> {
        if let Ok(path) = std::env::var(CONFIG_ENV) {
            return Self::load(Path::new(&path));
        }

        let mut paths = vec![
            PathBuf::from("duuh.toml"),
            PathBuf::from("/etc/duuh/duuh.toml"),
        ];
        if let Some(dir) = dirs::config_dir() {
            paths.push(dir.join("duuh/duuh.toml"));
        }

        for path in paths {
            if path.exists() {
                tracing::debug!(path = %path.display(), "loading config");
                return Self::load(&path);
            }
        }

        Ok(Config::default())
    }

    /// Apply environment overrides read through `lookup`
    #[must_use]
    pub fn with_env(mut self, lookup: impl Fn(&str) -> Option<String>) -> Self {
        if let Some(runtime) = lookup(RUNTIME_ENV).filter(|v| !v.is_empty()) {
            self.runtime = runtime;
        }
        if let Some(level) = lookup(LOG_ENV).filter(|v| !v.is_empty()) {
            self.log_level = level;
        }
        self
    }

    /// Per-command time limit, `None` when disabled
    #[must_use]
    pub fn command_timeout(&self) -> Option<Duration> {
        (self.command_timeout_secs > 0).then(|| Duration::from_secs(self.command_timeout_secs))
    }

    fn validate(&self) -> Result<(), CoreError> {
        if self.runtime.trim().is_empty() {
            return Err(CoreError::ConfigError("runtime must not be empty".to_string()));
        }
        if !self.mount_path.starts_with('/') {
            return Err(CoreError::ConfigError(format!(
                "mount_path must be absolute, got {:?}",
                self.mount_path
            )));
        }
        if self.label_key.trim().is_empty() {
            return Err(CoreError::ConfigError(
                "label_key must not be empty".to_string(),
            ));
        }
        Ok(())
    }
}
